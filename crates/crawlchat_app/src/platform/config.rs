//! Front-end configuration: a RON file with command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crawlchat_engine::{CrawlLimits, ServiceSettings};
use crawlchat_logging::LogDestination;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "crawlchat.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub max_depth: Option<u32>,
    pub max_pages: Option<u32>,
    pub connect_timeout_secs: u64,
    /// Unset means a request may wait forever.
    pub request_timeout_secs: Option<u64>,
    pub state_dir: PathBuf,
    pub log_target: LogTarget,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            max_depth: Some(3),
            max_pages: Some(50),
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            state_dir: PathBuf::from("."),
            log_target: LogTarget::File,
            log_file: PathBuf::from("crawlchat.log"),
            log_level: "info".to_string(),
        }
    }
}

/// Values given on the command line; `None` keeps the file's value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub max_depth: Option<u32>,
    pub max_pages: Option<u32>,
    pub log: Option<LogTarget>,
    pub state_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn apply(&mut self, overrides: CliOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if overrides.max_depth.is_some() {
            self.max_depth = overrides.max_depth;
        }
        if overrides.max_pages.is_some() {
            self.max_pages = overrides.max_pages;
        }
        if let Some(target) = overrides.log {
            self.log_target = target;
        }
        if let Some(dir) = overrides.state_dir {
            self.state_dir = dir;
        }
    }

    /// Unknown level names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn service_settings(&self, session_cookie: Option<String>) -> ServiceSettings {
        ServiceSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            crawl_limits: CrawlLimits {
                max_depth: self.max_depth,
                max_pages: self.max_pages,
            },
            session_cookie,
        }
    }
}

/// Load `explicit`, or `./crawlchat.ron` if it exists, or defaults.
/// A missing explicit file is an error; a missing default file is not.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(AppConfig::default());
            }
            default
        }
    };

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    parse(&content).map_err(|source| ConfigError::Parse { path, source })
}

fn parse(content: &str) -> Result<AppConfig, ron::error::SpannedError> {
    ron::from_str(content)
}
