use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Default relevance keyword set for CNC troubleshooting content.
const DEFAULT_KEYWORDS: &[&str] = &[
    "error",
    "alarm",
    "fault",
    "parameter",
    "axis",
    "reset",
    "homing",
    "speed",
    "motor",
    "limit",
    "gain",
    "calibration",
    "warning",
    "failure",
    "overload",
    "encoder",
];

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub postgres: PostgresConfig,
    pub gemini: GeminiConfig,
    pub manual: ManualConfig,
    pub chunking: ChunkingConfig,
    pub quota: QuotaConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            postgres: PostgresConfig::from_env(),
            gemini: GeminiConfig::from_env(),
            manual: ManualConfig::from_env(),
            chunking: ChunkingConfig::from_env(),
            quota: QuotaConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  postgres:  configured={}", self.postgres.is_configured());
        tracing::info!(
            "  gemini:    configured={}, embedding_model={}, dimensions={}",
            self.gemini.is_configured(),
            self.gemini.embedding_model,
            self.gemini.dimensions
        );
        tracing::info!(
            "  manual:    path={}, pages={}..{}",
            self.manual.pdf_path.display(),
            self.manual.start_page,
            self.manual.end_page
        );
        tracing::info!(
            "  chunking:  max_words={}, min_chars={}, keywords={}",
            self.chunking.max_words,
            self.chunking.min_chars,
            self.chunking.keywords.len()
        );
        tracing::info!(
            "  quota:     daily_limit={}, safety_buffer={}, delay_ms={}",
            self.quota.daily_limit,
            self.quota.safety_buffer,
            self.quota.request_delay_ms
        );
    }
}

// ── PostgreSQL ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl PostgresConfig {
    fn from_env() -> Self {
        Self {
            database_url: env_opt("DATABASE_URL"),
            max_connections: env_u32("PG_MAX_CONNECTIONS", 5),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.database_url.is_some()
    }
}

// ── Gemini ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub embedding_model: String,
    pub generation_model: String,
    /// Output dimensionality requested from the embedding API. Must match the
    /// `vector(N)` column in the destination schema.
    pub dimensions: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GeminiConfig {
    fn from_env() -> Self {
        Self {
            api_key: env_opt("GEMINI_API_KEY"),
            embedding_model: env_or("GEMINI_EMBEDDING_MODEL", "gemini-embedding-001"),
            generation_model: env_or("GEMINI_GENERATION_MODEL", "gemini-2.5-flash"),
            dimensions: env_usize("EMBEDDING_DIMENSIONS", 768),
            temperature: env_or("LLM_TEMPERATURE", "0.1").parse().unwrap_or(0.1),
            max_tokens: env_u32("LLM_MAX_TOKENS", 2048),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

// ── Manual source ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualConfig {
    pub pdf_path: PathBuf,
    /// First page to ingest, 0-indexed.
    pub start_page: usize,
    /// One past the last page to ingest, 0-indexed.
    pub end_page: usize,
}

impl ManualConfig {
    fn from_env() -> Self {
        Self {
            pdf_path: PathBuf::from(env_or("MANUAL_PDF_PATH", "data/manual.pdf")),
            start_page: env_usize("MANUAL_START_PAGE", 20),
            end_page: env_usize("MANUAL_END_PAGE", 200),
        }
    }
}

// ── Chunking ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Flush the accumulator before a line that would reach this word count.
    pub max_words: usize,
    /// Candidates shorter than this many characters are dropped.
    pub min_chars: usize,
    /// A candidate must contain at least one of these (case-insensitive).
    pub keywords: Vec<String>,
}

impl ChunkingConfig {
    fn from_env() -> Self {
        let keywords = match env_opt("RELEVANT_KEYWORDS") {
            Some(csv) => csv
                .split(',')
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            None => DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        };
        Self {
            max_words: env_usize("CHUNK_MAX_WORDS", 350),
            min_chars: env_usize("CHUNK_MIN_CHARS", 150),
            keywords,
        }
    }
}

// ── Quota ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Provider's hard daily request cap.
    pub daily_limit: u32,
    /// Requests held back from the hard cap to absorb accounting drift.
    pub safety_buffer: u32,
    /// Path of the JSON usage ledger.
    pub state_file: PathBuf,
    /// Pause after every embed attempt, success or failure.
    pub request_delay_ms: u64,
}

impl QuotaConfig {
    fn from_env() -> Self {
        Self {
            daily_limit: env_u32("DAILY_QUOTA", 1500),
            safety_buffer: env_u32("QUOTA_SAFETY_BUFFER", 50),
            state_file: PathBuf::from(env_or("QUOTA_FILE", ".gemini_quota.json")),
            request_delay_ms: env_u64("REQUEST_DELAY_MS", 1200),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let chunking = ChunkingConfig {
            max_words: 350,
            min_chars: 150,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        };
        assert_eq!(chunking.max_words, 350);
        assert_eq!(chunking.keywords.len(), 16);
        assert!(chunking.keywords.contains(&"encoder".to_string()));
    }

    #[test]
    fn postgres_unconfigured_without_url() {
        let pg = PostgresConfig {
            database_url: None,
            max_connections: 5,
        };
        assert!(!pg.is_configured());
        let pg = PostgresConfig {
            database_url: Some("postgres://localhost/troubledesk".into()),
            max_connections: 5,
        };
        assert!(pg.is_configured());
    }
}
