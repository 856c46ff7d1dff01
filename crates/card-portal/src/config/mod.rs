use std::env;
use std::fmt;
use std::path::PathBuf;

use directories::ProjectDirs;
use reqwest::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_APP_NAME: &str = "Credit Card Application";

/// Distinguishes runtime behavior for different stages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub app_name: String,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let app_name = env::var("APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.to_string());

        let raw_url = env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let base_url = parse_api_url(&raw_url)?;

        let timeout_secs = env::var("APP_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let state_dir = match env::var("APP_STATE_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => ProjectDirs::from("com", "cardportal", "card-portal")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or(ConfigError::MissingStateDir)?,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            environment,
            app_name,
            api: ApiConfig {
                base_url,
                timeout_secs,
            },
            storage: StorageConfig { state_dir },
            telemetry: TelemetryConfig {
                log_level,
                format: LogFormat::for_environment(environment),
            },
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidApiUrl {
        value: raw.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(url.scheme().to_string())),
    }
}

/// Where and how the remote API is reached.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout_secs: u64,
}

/// Location of the persisted session file.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub state_dir: PathBuf,
}

impl StorageConfig {
    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Shape of each log line. Development adds the emitting module and source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Verbose,
    Compact,
}

impl LogFormat {
    pub fn for_environment(environment: AppEnvironment) -> Self {
        match environment {
            AppEnvironment::Development => LogFormat::Verbose,
            AppEnvironment::Test | AppEnvironment::Production => LogFormat::Compact,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidApiUrl { value: String },
    UnsupportedScheme(String),
    InvalidTimeout,
    MissingStateDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidApiUrl { value } => {
                write!(f, "API_URL '{value}' is not a valid URL")
            }
            ConfigError::UnsupportedScheme(scheme) => {
                write!(f, "API_URL must use http or https, found '{scheme}'")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "APP_HTTP_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::MissingStateDir => write!(
                f,
                "could not determine a data directory; set APP_STATE_DIR"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
