use crate::error::ConfigurationError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const TOKEN_ENV_VAR: &str = "LYREBIRD_BEARER_TOKEN";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Screen name the bot posts as.
    pub handle: String,
    pub corpus: PathBuf,
    pub log_level: String,
    pub twitter: TwitterConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TwitterConfig {
    pub stream_url: String,
    pub update_url: String,
    pub bearer_token: Option<String>,
    /// Wait before retrying a failed connect. Hangups reconnect immediately.
    pub connect_retry_secs: u64,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            handle: "pyswizzle".to_string(),
            corpus: PathBuf::from("taylor.txt"),
            log_level: "info".to_string(),
            twitter: TwitterConfig::default(),
        }
    }
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            stream_url: "https://userstream.twitter.com/1.1/user.json".to_string(),
            update_url: "https://api.twitter.com/1.1/statuses/update.json".to_string(),
            bearer_token: None,
            connect_retry_secs: 5,
            timeout_secs: 20,
        }
    }
}

impl Config {
    /// `<config dir>/lyrebird/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lyrebird").join("config.toml"))
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigurationError> {
        toml::from_str(content).map_err(|source| ConfigurationError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load an explicitly requested file. It must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigurationError::Unreadable {
                what: "config file",
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&content, path)
    }

    /// Load the default file if there is one, built-in defaults otherwise.
    pub fn load_or_default() -> Result<Self, ConfigurationError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Bearer token from the config file, or from the environment.
    pub fn bearer_token(&self) -> Result<String, ConfigurationError> {
        self.twitter
            .bearer_token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty()))
            .ok_or(ConfigurationError::MissingCredential(TOKEN_ENV_VAR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.handle, "pyswizzle");
        assert_eq!(config.corpus, PathBuf::from("taylor.txt"));
        assert_eq!(config.twitter.connect_retry_secs, 5);
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::parse(
            "handle = \"swiftbot\"\n\n[twitter]\nconnect_retry_secs = 1\n",
            Path::new("config.toml"),
        )
        .unwrap();
        assert_eq!(config.handle, "swiftbot");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.twitter.connect_retry_secs, 1);
        assert_eq!(config.twitter.timeout_secs, 20);
    }

    #[test]
    fn test_parse_invalid() {
        let err = Config::parse("handle = [", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidConfig { .. }));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "corpus = \"lyrics/red.txt\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.corpus, PathBuf::from("lyrics/red.txt"));
    }

    #[test]
    fn test_token_from_file() {
        let mut config = Config::default();
        config.twitter.bearer_token = Some("abc".to_string());
        assert_eq!(config.bearer_token().unwrap(), "abc");
    }
}
