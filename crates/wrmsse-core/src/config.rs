use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Evaluator configuration. Defaults match the reference M5 setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Length of the held-out evaluation horizon, in days. The weight
    /// reference window has the same length and immediately precedes it.
    #[serde(default = "default_horizon")]
    pub horizon: usize,

    /// Directory the derived artifacts are persisted to.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            artifact_dir: default_artifact_dir(),
        }
    }
}

fn default_horizon() -> usize {
    crate::hierarchy::M5_HORIZON
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.horizon, 28);
        assert_eq!(config.artifact_dir, PathBuf::from("artifacts"));
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: EvalConfig = serde_json::from_str("{\"horizon\": 14}").unwrap();
        assert_eq!(config.horizon, 14);
        assert_eq!(config.artifact_dir, PathBuf::from("artifacts"));
    }
}
