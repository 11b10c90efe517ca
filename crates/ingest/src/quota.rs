//! File-backed daily quota ledger for embedding requests.
//!
//! A tiny JSON record `{date, used}` persisted after every successful call.
//! A crash between the external call and the write undercounts by at most
//! one request — the safety buffer absorbs that drift against the provider's
//! hard daily cap.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use troubledesk_core::config::QuotaConfig;

#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("quota file IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("quota file serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Count of embedding calls made on a given calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    pub date: NaiveDate,
    pub used: u32,
}

/// Loads, checks, and persists the daily request budget.
pub struct QuotaTracker {
    path: PathBuf,
    daily_limit: u32,
    safety_buffer: u32,
}

impl QuotaTracker {
    pub fn new(config: &QuotaConfig) -> Self {
        Self {
            path: config.state_file.clone(),
            daily_limit: config.daily_limit,
            safety_buffer: config.safety_buffer,
        }
    }

    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// Read persisted state. A missing or unreadable file, or a stored date
    /// other than today, yields a fresh `{today, 0}`.
    pub fn load(&self) -> QuotaState {
        let fresh = QuotaState {
            date: Self::today(),
            used: 0,
        };

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return fresh,
        };
        let state: QuotaState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "quota file unreadable, starting fresh");
                return fresh;
            }
        };

        if state.date == fresh.date {
            state
        } else {
            fresh
        }
    }

    /// Usable requests left today; negative signals exhaustion.
    pub fn remaining(&self, state: &QuotaState) -> i64 {
        i64::from(self.daily_limit) - i64::from(self.safety_buffer) - i64::from(state.used)
    }

    /// Charge one request and persist immediately, before any further work.
    pub fn record_use(&self, state: &mut QuotaState) -> Result<(), QuotaError> {
        state.used += 1;
        fs::write(&self.path, serde_json::to_string(state)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use troubledesk_core::config::QuotaConfig;

    fn tracker(dir: &std::path::Path, daily_limit: u32, safety_buffer: u32) -> QuotaTracker {
        QuotaTracker::new(&QuotaConfig {
            daily_limit,
            safety_buffer,
            state_file: dir.join("quota.json"),
            request_delay_ms: 0,
        })
    }

    #[test]
    fn missing_file_yields_fresh_state() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker(dir.path(), 1500, 50);
        let state = tracker.load();
        assert_eq!(state.used, 0);
        assert_eq!(state.date, QuotaTracker::today());
    }

    #[test]
    fn record_use_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker(dir.path(), 1500, 50);
        let mut state = tracker.load();
        tracker.record_use(&mut state).unwrap();
        tracker.record_use(&mut state).unwrap();
        assert_eq!(state.used, 2);

        let reloaded = tracker.load();
        assert_eq!(reloaded.used, 2);
    }

    #[test]
    fn stale_date_resets_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker(dir.path(), 1500, 50);
        let yesterday = QuotaTracker::today().checked_sub_days(Days::new(1)).unwrap();
        let stale = QuotaState {
            date: yesterday,
            used: 900,
        };
        std::fs::write(
            dir.path().join("quota.json"),
            serde_json::to_string(&stale).unwrap(),
        )
        .unwrap();

        let state = tracker.load();
        assert_eq!(state.used, 0, "yesterday's usage must not carry over");
    }

    #[test]
    fn corrupt_file_yields_fresh_state() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker(dir.path(), 1500, 50);
        std::fs::write(dir.path().join("quota.json"), "{not json").unwrap();
        assert_eq!(tracker.load().used, 0);
    }

    #[test]
    fn remaining_accounts_for_safety_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker(dir.path(), 1500, 50);
        let mut state = tracker.load();
        state.used = 1500 - 50 - 1;
        assert_eq!(tracker.remaining(&state), 1);

        tracker.record_use(&mut state).unwrap();
        assert_eq!(tracker.remaining(&state), 0);
    }

    #[test]
    fn remaining_can_go_negative() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker(dir.path(), 100, 50);
        let state = QuotaState {
            date: QuotaTracker::today(),
            used: 60,
        };
        assert_eq!(tracker.remaining(&state), -10);
    }
}
