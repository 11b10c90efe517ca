//! Gemini REST backends for embedding and generation.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::provider::{Embedder, EmbeddingError, LlmError, LlmProvider, Message, Role};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// ── Embedding ───────────────────────────────────────────────────────

/// Embedder backed by the Gemini `embedContent` endpoint.
pub struct GeminiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

impl GeminiEmbedder {
    pub fn new(api_key: String, model: String, dimensions: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            dimensions,
        }
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!(
            "{}/{}:embedContent?key={}",
            API_BASE, self.model, self.api_key,
        );

        let body = json!({
            "content": { "parts": [{ "text": text }] },
            "outputDimensionality": self.dimensions,
        });

        debug!("Gemini embed request, model={}", self.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api { status, body });
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Parse(e.to_string()))?;

        let vector = parsed.embedding.values;
        if vector.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }

        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Generation ──────────────────────────────────────────────────────

/// Chat completion via the Gemini `generateContent` endpoint.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Build the request body for the Gemini generateContent API.
    fn build_request_body(
        messages: &[Message],
        temperature: f32,
        max_tokens: u32,
    ) -> serde_json::Value {
        // Gemini takes the system prompt in a separate system_instruction field.
        let system_msg = messages
            .iter()
            .find(|m| matches!(m.role, Role::System))
            .map(|m| m.content.clone());

        let contents: Vec<serde_json::Value> = messages
            .iter()
            .filter(|m| !matches!(m.role, Role::System))
            .map(|m| {
                json!({
                    "role": match m.role {
                        Role::User => "user",
                        Role::Assistant => "model",
                        Role::System => unreachable!(),
                    },
                    "parts": [{ "text": m.content }],
                })
            })
            .collect();

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": temperature,
                "maxOutputTokens": max_tokens,
            },
        });

        if let Some(system) = system_msg {
            body["system_instruction"] = json!({
                "parts": [{ "text": system }],
            });
        }

        body
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key,
        );

        let body = Self::build_request_body(&messages, temperature, max_tokens);

        debug!("Gemini generate request, model={}", self.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        let content = resp["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                LlmError::Parse("missing candidates[0].content.parts[0].text".into())
            })?
            .trim()
            .to_string();

        Ok(content)
    }
}
