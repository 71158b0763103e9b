//! Runtime configuration.
//!
//! All invariants are checked once, at startup, through
//! [`RuntimeConfig::validate`]. A config that passes validation is
//! never re-checked per request.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use docgrade_core::{RoundPlan, ScoreWeights, WeightError};

/// Upper bound on self-consistency rounds, capping cost and latency.
pub const MAX_ROUNDS: u32 = 10;

/// Configuration errors. Fatal at startup only.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Weights(#[from] WeightError),

    #[error("rounds must be in 1..={MAX_ROUNDS}, got {0}")]
    BadRounds(u32),

    #[error("deadline must be positive")]
    BadDeadline,

    #[error("min_input_len must be at least 1")]
    BadMinInputLen,

    #[error("temperature step must be non-negative, got {0}")]
    BadTemperatureStep(f64),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Per-judge backend settings. Credentials are optional everywhere:
/// a missing credential disables that judge, it never fails a
/// request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgesConfig {
    pub gigachat: GigachatConfig,
    pub gemini: GeminiConfig,
    pub ollama: OllamaConfig,
    pub qwen: QwenConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GigachatConfig {
    /// Credential; falls back to `GIGACHAT_CREDENTIALS` env
    pub credentials: Option<String>,

    /// Custom API base URL
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; falls back to `GEMINI_API_KEY` env
    pub api_key: Option<String>,

    /// Model name override
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Whether the local judge participates at all
    pub enabled: bool,

    /// OpenAI-compatible base URL of the local server
    pub base_url: String,

    /// Model to query
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: crate::judges::OLLAMA_DEFAULT_URL.to_string(),
            model: crate::judges::OLLAMA_DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QwenConfig {
    /// API key; falls back to `QWEN_API_KEY` env
    pub api_key: Option<String>,

    /// OpenAI-compatible base URL of the hosted endpoint
    pub base_url: String,

    /// Model to query
    pub model: String,
}

impl Default for QwenConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string(),
            model: "qwen-plus".to_string(),
        }
    }
}

/// Full runtime configuration for the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Weight triple for the blended score
    pub weights: ScoreWeights,

    /// Self-consistency round count, `1..=10`
    pub rounds: u32,

    /// Temperature of the first round
    pub base_temperature: f64,

    /// Temperature increment per round
    pub temperature_step: f64,

    /// Global deadline for the whole judge fan-out (e.g. `"60s"`)
    #[serde(with = "duration_str")]
    pub deadline: Duration,

    /// Minimum accepted length for code and doc inputs
    pub min_input_len: usize,

    /// Judge backend settings
    pub judges: JudgesConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let plan = RoundPlan::default();
        Self {
            weights: ScoreWeights::default(),
            rounds: plan.rounds,
            base_temperature: plan.base_temperature,
            temperature_step: plan.temperature_step,
            deadline: Duration::from_secs(60),
            min_input_len: 5,
            judges: JudgesConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Check every startup invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;

        if self.rounds < 1 || self.rounds > MAX_ROUNDS {
            return Err(ConfigError::BadRounds(self.rounds));
        }
        if self.deadline.is_zero() {
            return Err(ConfigError::BadDeadline);
        }
        if self.min_input_len < 1 {
            return Err(ConfigError::BadMinInputLen);
        }
        if self.temperature_step < 0.0 {
            return Err(ConfigError::BadTemperatureStep(self.temperature_step));
        }

        Ok(())
    }

    /// The round plan this config describes.
    pub fn round_plan(&self) -> RoundPlan {
        RoundPlan {
            rounds: self.rounds,
            base_temperature: self.base_temperature,
            temperature_step: self.temperature_step,
        }
    }
}

/// Serde adapter for humantime duration strings (`"60s"`, `"2m"`).
mod duration_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RuntimeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bad_weight_sum_rejected_at_startup() {
        let mut config = RuntimeConfig::default();
        config.weights = ScoreWeights {
            semantic: 0.5,
            coverage: 0.5,
            llm: 0.5,
        };
        assert!(matches!(config.validate(), Err(ConfigError::Weights(_))));
    }

    #[test]
    fn test_rounds_out_of_range_rejected() {
        let mut config = RuntimeConfig::default();
        config.rounds = 0;
        assert!(matches!(config.validate(), Err(ConfigError::BadRounds(0))));

        config.rounds = 11;
        assert!(matches!(config.validate(), Err(ConfigError::BadRounds(11))));
    }

    #[test]
    fn test_from_yaml_with_duration_string() {
        let config = RuntimeConfig::from_yaml(
            r#"
rounds: 2
deadline: "30s"
weights:
  semantic: 0.3
  coverage: 0.3
  llm: 0.4
judges:
  ollama:
    enabled: false
"#,
        )
        .unwrap();

        assert_eq!(config.rounds, 2);
        assert_eq!(config.deadline, Duration::from_secs(30));
        assert!(!config.judges.ollama.enabled);
        assert!((config.weights.llm - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_from_yaml_rejects_bad_weights() {
        let result = RuntimeConfig::from_yaml(
            r#"
weights:
  semantic: 0.9
  coverage: 0.9
  llm: 0.9
"#,
        );
        assert!(matches!(result, Err(ConfigError::Weights(_))));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = RuntimeConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = RuntimeConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.rounds, config.rounds);
        assert_eq!(parsed.deadline, config.deadline);
    }
}
