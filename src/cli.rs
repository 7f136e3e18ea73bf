use crate::config::Config;
use crate::error::ConfigurationError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lyrebird", version, about = "Reply to @mentions with the closest matching lyric")]
pub struct Cli {
    /// Config file (defaults to <config dir>/lyrebird/config.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Use a JSON script of tweets instead of going live
    #[arg(long, value_name = "SCRIPT")]
    pub local: Option<PathBuf>,

    /// File to log to (stdout by default)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level for output
    #[arg(long)]
    pub level: Option<String>,

    /// Account to answer as
    #[arg(long)]
    pub handle: Option<String>,

    /// File of candidate reply lines
    #[arg(long)]
    pub corpus: Option<PathBuf>,
}

impl Cli {
    /// Config file values with command line overrides applied.
    pub fn resolve_config(&self) -> Result<Config, ConfigurationError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default()?,
        };

        if let Some(level) = &self.level {
            config.log_level = level.clone();
        }
        if let Some(handle) = &self.handle {
            config.handle = handle.clone();
        }
        if let Some(corpus) = &self.corpus {
            config.corpus = corpus.clone();
        }
        Ok(config)
    }
}
