//! Configuration file loading
//!
//! Each setting resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Steps 1, 2, and 4 are handled by clap in the service crate; this module
//! supplies step 3.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Optional settings read from `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// HTTP listen port
    pub port: Option<u16>,

    /// SQLite database file path
    pub database_path: Option<PathBuf>,

    /// API key for the LLM generator backend. Absent key selects the
    /// randomized mock generators (development mode).
    pub openai_api_key: Option<String>,

    /// Override for the chat-completions base URL
    pub openai_base_url: Option<String>,
}

impl FileConfig {
    /// Load the first config file found at the platform default locations,
    /// or an empty config if none exists.
    pub fn load() -> Result<FileConfig> {
        for path in default_config_paths() {
            if path.exists() {
                debug!("Loading config file: {}", path.display());
                return Self::load_from(&path);
            }
        }
        Ok(FileConfig::default())
    }

    /// Load and parse a specific TOML config file
    pub fn load_from(path: &Path) -> Result<FileConfig> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Candidate config file locations, highest priority first
///
/// Linux: `~/.config/neurapeace/config.toml`, then `/etc/neurapeace/config.toml`.
/// Other platforms use the OS config directory only.
fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("neurapeace").join("config.toml"));
    }

    if cfg!(target_os = "linux") {
        paths.push(PathBuf::from("/etc/neurapeace/config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_parses_all_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
port = 5800
database_path = "/tmp/neurapeace.db"
openai_api_key = "sk-test"
"#
        )
        .unwrap();

        let config = FileConfig::load_from(file.path()).unwrap();
        assert_eq!(config.port, Some(5800));
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/neurapeace.db")));
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert!(config.openai_base_url.is_none());
    }

    #[test]
    fn test_load_from_rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number").unwrap();

        assert!(FileConfig::load_from(file.path()).is_err());
    }
}
