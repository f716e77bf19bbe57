//! Optional `tmcodec.toml` defaults for the command line.
//!
//! ```toml
//! source_lang = "en"
//! target_lang = "sv"
//! threshold = 0.7
//! ```
//!
//! Flags given on the command line always win over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "tmcodec.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub threshold: Option<f64>,
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self, String> {
        toml::from_str(s).map_err(|e| format!("invalid config: {}", e))
    }

    /// Source language: the flag, else the file, else `"en"`.
    pub fn source_lang(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.source_lang.clone())
            .unwrap_or_else(|| tmcodec::types::DEFAULT_SOURCE_LANG.to_string())
    }

    /// Target language: the flag, else the file, else empty.
    pub fn target_lang(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.target_lang.clone()).unwrap_or_default()
    }

    pub fn threshold(&self, flag: Option<f64>) -> f64 {
        flag.or(self.threshold).unwrap_or(tmcodec::DEFAULT_THRESHOLD)
    }
}

/// Loads the config named by `--config`, or `tmcodec.toml` from `cwd`.
///
/// An explicit path must exist and parse. The implicit file is optional,
/// but if it is present it must parse too.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config, String> {
    let (path, required): (PathBuf, bool) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (cwd.join(CONFIG_FILE_NAME), false),
    };

    let contents = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Config::default());
        }
        Err(e) => return Err(format!("cannot read config {}: {}", path.display(), e)),
    };

    let config = Config::from_toml(&contents).map_err(|e| format!("{} ({})", e, path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_file() {
        let config = Config::from_toml("source_lang = \"de\"\nthreshold = 0.8\n").unwrap();
        assert_eq!(config.source_lang(None), "de");
        assert_eq!(config.source_lang(Some("fr".into())), "fr");
        assert_eq!(config.target_lang(None), "");
        assert_eq!(config.threshold(None), 0.8);
        assert_eq!(config.threshold(Some(0.5)), 0.5);
    }

    #[test]
    fn test_defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.source_lang(None), "en");
        assert_eq!(config.threshold(None), tmcodec::DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Config::from_toml("treshold = 0.8").is_err());
    }

    #[test]
    fn test_load_config_lookup() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(load_config(None, temp_dir.path()).unwrap(), Config::default());

        let missing = temp_dir.path().join("nope.toml");
        assert!(load_config(Some(&missing), temp_dir.path()).is_err());

        std::fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "target_lang = \"sv\"").unwrap();
        let config = load_config(None, temp_dir.path()).unwrap();
        assert_eq!(config.target_lang(None), "sv");
    }
}
