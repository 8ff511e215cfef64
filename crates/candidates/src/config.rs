use crate::error::{CandidateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const MAX_DEBOUNCE_MS: u64 = 5_000;

/// Tunables for ranking and for the session debounce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Quiet period after the last keystroke before options are recomputed
    pub debounce_ms: u64,

    /// Maximum number of recent conversations to show
    pub max_recents: usize,

    /// Maximum number of contacts to show
    pub max_contacts: usize,

    /// Country code prepended to bare national phone numbers
    pub default_country_code: String,

    /// Offer multi-participant conversations (they cannot be committed)
    pub include_group_conversations: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 75,
            max_recents: 5,
            max_contacts: 500,
            default_country_code: "1".to_string(),
            include_group_conversations: false,
        }
    }
}

impl PickerConfig {
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_recents == 0 {
            return Err(CandidateError::invalid_config("max_recents must be > 0"));
        }

        if self.max_contacts == 0 {
            return Err(CandidateError::invalid_config("max_contacts must be > 0"));
        }

        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(CandidateError::invalid_config(format!(
                "debounce_ms ({}) cannot exceed {MAX_DEBOUNCE_MS}",
                self.debounce_ms
            )));
        }

        let code = &self.default_country_code;
        if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(CandidateError::invalid_config(format!(
                "default_country_code ({code:?}) must be 1-3 digits"
            )));
        }

        Ok(())
    }

    /// Parse and validate a TOML document; omitted keys keep their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
