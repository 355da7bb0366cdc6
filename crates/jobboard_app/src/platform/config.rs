//! Front-end configuration: an optional RON file overridden by CLI flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use board_logging::{board_info, LogDestination};
use clap::Parser;
use jobboard_client::{BackendSettings, DEFAULT_ENDPOINT};
use jobboard_core::{DashboardConfig, PollErrorPolicy, DEFAULT_PAGE_SIZE};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_CONFIG_FILENAME: &str = "jobboard.ron";

#[derive(Debug, Parser)]
#[command(
    name = "jobboard",
    version,
    about = "Terminal dashboard for the job scrape-and-match backend"
)]
pub struct Cli {
    /// Path to a RON config file (default: ./jobboard.ron when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Backend base url, e.g. http://127.0.0.1:5001
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Where to write logs: file, terminal or both
    #[arg(long = "log")]
    pub log_to: Option<LogDestination>,
    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// On-disk shape. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: String,
    pub page_size: usize,
    pub poll_interval_ms: u64,
    pub search_debounce_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Give up on a run after this many consecutive failed status checks.
    pub poll_error_limit: Option<u32>,
    pub log_to: String,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            poll_interval_ms: 500,
            search_debounce_ms: 300,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            poll_error_limit: None,
            log_to: LogDestination::File.to_string(),
            log_file: board_logging::default_log_file(),
        }
    }
}

/// Validated settings handed to the rest of the app.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dashboard: DashboardConfig,
    pub backend: BackendSettings,
    pub poll_interval: Duration,
    pub log_to: LogDestination,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

pub fn load(cli: &Cli) -> Result<Settings, ConfigError> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => {
            let implicit = PathBuf::from(DEFAULT_CONFIG_FILENAME);
            implicit.exists().then_some(implicit)
        }
    };

    let mut config = match path {
        Some(path) => read_file(&path)?,
        None => AppConfig::default(),
    };

    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if let Some(log_to) = cli.log_to {
        config.log_to = log_to.to_string();
    }

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    validate(config, level)
}

pub fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = ron::from_str(&text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    board_info!("Loaded configuration from {:?}", path);
    Ok(config)
}

pub fn validate(config: AppConfig, log_level: LevelFilter) -> Result<Settings, ConfigError> {
    if config.page_size == 0 {
        return Err(ConfigError::Invalid("page_size must be positive".into()));
    }
    if config.poll_interval_ms == 0 {
        return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
    }
    if config.poll_error_limit == Some(0) {
        return Err(ConfigError::Invalid(
            "poll_error_limit must be positive when set".into(),
        ));
    }
    url::Url::parse(config.endpoint.trim())
        .map_err(|err| ConfigError::Invalid(format!("endpoint {:?}: {err}", config.endpoint)))?;
    let log_to = config
        .log_to
        .parse::<LogDestination>()
        .map_err(|err| ConfigError::Invalid(err.to_string()))?;

    let poll_error_policy = match config.poll_error_limit {
        Some(limit) => PollErrorPolicy::GiveUpAfter(limit),
        None => PollErrorPolicy::KeepPolling,
    };

    Ok(Settings {
        dashboard: DashboardConfig {
            page_size: config.page_size,
            search_debounce: Duration::from_millis(config.search_debounce_ms),
            poll_error_policy,
        },
        backend: BackendSettings {
            endpoint: config.endpoint,
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        },
        poll_interval: Duration::from_millis(config.poll_interval_ms),
        log_to,
        log_level,
        log_file: config.log_file,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn cli_with(config: Option<PathBuf>) -> Cli {
        Cli {
            config,
            endpoint: None,
            page_size: None,
            log_to: None,
            verbose: false,
        }
    }

    #[test]
    fn defaults_cover_an_empty_file() {
        let settings = validate(AppConfig::default(), LevelFilter::Info).unwrap();
        assert_eq!(settings.dashboard.page_size, 20);
        assert_eq!(settings.poll_interval, Duration::from_millis(500));
        assert_eq!(settings.dashboard.search_debounce, Duration::from_millis(300));
        assert_eq!(
            settings.dashboard.poll_error_policy,
            PollErrorPolicy::KeepPolling
        );
        assert_eq!(settings.log_to, LogDestination::File);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "(endpoint: \"http://backend.local:8080\", page_size: 50, poll_error_limit: Some(5))"
        )
        .unwrap();

        let settings = load(&cli_with(Some(file.path().to_path_buf()))).unwrap();
        assert_eq!(settings.backend.endpoint, "http://backend.local:8080");
        assert_eq!(settings.dashboard.page_size, 50);
        assert_eq!(
            settings.dashboard.poll_error_policy,
            PollErrorPolicy::GiveUpAfter(5)
        );
        assert_eq!(settings.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn cli_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "(page_size: 50, log_to: \"both\")").unwrap();

        let mut cli = cli_with(Some(file.path().to_path_buf()));
        cli.page_size = Some(10);
        cli.endpoint = Some("http://10.0.0.2:5001".to_string());
        cli.log_to = Some(LogDestination::Terminal);
        cli.verbose = true;

        let settings = load(&cli).unwrap();
        assert_eq!(settings.dashboard.page_size, 10);
        assert_eq!(settings.backend.endpoint, "http://10.0.0.2:5001");
        assert_eq!(settings.log_to, LogDestination::Terminal);
        assert_eq!(settings.log_level, LevelFilter::Debug);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let config = AppConfig {
            page_size: 0,
            ..AppConfig::default()
        };
        let err = validate(config, LevelFilter::Info).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_endpoint_is_rejected() {
        let config = AppConfig {
            endpoint: "not a url".to_string(),
            ..AppConfig::default()
        };
        assert!(validate(config, LevelFilter::Info).is_err());
    }

    #[test]
    fn malformed_file_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "(page_size: \"many\")").unwrap();

        let err = read_file(file.path()).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_file(Path::new("/definitely/not/here.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
