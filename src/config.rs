//! Projection configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Config file name looked up by [`ProjectionConfig::read_from`].
pub const CONFIG_FILE_NAME: &str = "relview.json";

/// Tuning knobs for partition decode and prefix queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Decode partition columns in parallel (default: true)
    pub parallel_decode: bool,
    /// Minimum physical column count before decode goes parallel (default: 8)
    pub parallel_threshold: usize,
    /// Textual prefix term treated as the wildcard (default: "_")
    pub wildcard: String,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            parallel_decode: true,
            parallel_threshold: 8,
            wildcard: "_".to_string(),
        }
    }
}

impl ProjectionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read config from `dir`. Returns None if the file doesn't exist.
    pub fn read_from(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(Some(Self::from_json(&contents)?))
    }

    /// Write config to `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE_NAME);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(())
    }

    /// Whether a partition with `columns` physical columns decodes in parallel.
    pub fn decodes_in_parallel(&self, columns: usize) -> bool {
        self.parallel_decode && columns >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_defaults() {
        let config = ProjectionConfig::default();
        assert!(config.parallel_decode);
        assert_eq!(config.parallel_threshold, 8);
        assert_eq!(config.wildcard, "_");
    }

    #[test]
    fn test_config_partial_json() {
        let config = ProjectionConfig::from_json(r#"{"parallel_threshold": 2}"#).unwrap();
        assert_eq!(config.parallel_threshold, 2);
        assert!(config.parallel_decode);
        assert_eq!(config.wildcard, "_");
    }

    #[test]
    fn test_config_parallel_gate() {
        let config = ProjectionConfig {
            parallel_decode: true,
            parallel_threshold: 4,
            wildcard: "_".into(),
        };
        assert!(!config.decodes_in_parallel(3));
        assert!(config.decodes_in_parallel(4));

        let serial = ProjectionConfig {
            parallel_decode: false,
            ..config
        };
        assert!(!serial.decodes_in_parallel(100));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempdir().unwrap();
        assert_eq!(ProjectionConfig::read_from(dir.path()).unwrap(), None);

        let config = ProjectionConfig {
            parallel_decode: false,
            parallel_threshold: 16,
            wildcard: "*".into(),
        };
        config.write_to(dir.path()).unwrap();
        let loaded = ProjectionConfig::read_from(dir.path()).unwrap();
        assert_eq!(loaded, Some(config));
    }
}
