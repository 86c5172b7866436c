//! Service configuration
//!
//! clap supplies CLI > env resolution; the TOML config file sits between
//! env and the compiled defaults.

use crate::error::{Error, Result};
use crate::generator::llm;
use clap::Parser;
use npai_common::config::FileConfig;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE: &str = "neurapeace.db";

/// Command-line arguments for npai-api
#[derive(Parser, Debug)]
#[command(name = "npai-api")]
#[command(about = "NeuraPeace AI backend service")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "NPAI_PORT")]
    pub port: Option<u16>,

    /// SQLite database file path
    #[arg(short, long, env = "NPAI_DATABASE")]
    pub database: Option<PathBuf>,

    /// Keep all state in memory instead of SQLite (development)
    #[arg(long, env = "NPAI_IN_MEMORY")]
    pub in_memory: bool,

    /// API key for the LLM generator backend; omit to use the randomized
    /// mock generators
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Chat-completions base URL override
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// Explicit config file path (otherwise platform defaults are probed)
    #[arg(long, env = "NPAI_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    pub in_memory: bool,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
}

impl Config {
    /// Merge CLI/env arguments with the config file and defaults
    pub fn resolve(args: Args) -> Result<Config> {
        let file = match &args.config {
            Some(path) => FileConfig::load_from(path),
            None => FileConfig::load(),
        }
        .map_err(|e| Error::upstream("Failed to load config file", e))?;

        Ok(Config {
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            database_path: args
                .database
                .or(file.database_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
            in_memory: args.in_memory,
            openai_api_key: args.openai_api_key.or(file.openai_api_key),
            openai_base_url: args
                .openai_base_url
                .or(file.openai_base_url)
                .unwrap_or_else(|| llm::DEFAULT_BASE_URL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_args() -> Args {
        Args {
            port: None,
            database: None,
            in_memory: false,
            openai_api_key: None,
            openai_base_url: None,
            config: None,
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(bare_args()).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE));
        assert!(!config.in_memory);
        assert_eq!(config.openai_base_url, llm::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_cli_wins_over_defaults() {
        let config = Config::resolve(Args {
            port: Some(8123),
            database: Some(PathBuf::from("/tmp/np.db")),
            openai_api_key: Some("sk-test".to_string()),
            ..bare_args()
        })
        .unwrap();

        assert_eq!(config.port, 8123);
        assert_eq!(config.database_path, PathBuf::from("/tmp/np.db"));
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
    }
}
