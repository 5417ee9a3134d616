//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use secrecy::SecretString;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_API_BASE_URL: &str = "http://localhost:8080/api";
    pub const DEV_GRAPHQL_URL: &str = "http://localhost:8080/query";
    pub const DEV_PAGE_SIZE: u32 = 10;
    pub const DEV_REQUEST_TIMEOUT_SECS: u64 = 10;
    pub const DEV_CONNECT_TIMEOUT_SECS: u64 = 5;
}

/// Largest page the backend accepts for `testRuns(first: ...)`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// REST base URL (user preferences, favorites, summaries)
    pub api_base_url: String,
    /// GraphQL endpoint (test runs)
    pub graphql_url: String,
    /// Records requested per cursor page
    pub page_size: u32,
    /// Total request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Optional bearer token forwarded on every request
    pub access_token: Option<SecretString>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `FERN_REPORTER_BASE_URL`: REST base URL
    /// - `FERN_REPORTER_GRAPHQL_BASE_URL`: GraphQL endpoint
    /// - `FERN_PAGE_SIZE`: Cursor page size (default: 10, max: 100)
    /// - `FERN_REQUEST_TIMEOUT_SECS`: Request timeout (default: 10)
    /// - `FERN_CONNECT_TIMEOUT_SECS`: Connect timeout (default: 5)
    /// - `FERN_ACCESS_TOKEN`: Bearer token (optional)
    ///
    /// In production both URLs must be set explicitly.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let api_base_url = env::var("FERN_REPORTER_BASE_URL")
            .unwrap_or_else(|_| defaults::DEV_API_BASE_URL.to_string());

        let graphql_url = env::var("FERN_REPORTER_GRAPHQL_BASE_URL")
            .unwrap_or_else(|_| defaults::DEV_GRAPHQL_URL.to_string());

        let page_size = env::var("FERN_PAGE_SIZE")
            .unwrap_or_else(|_| defaults::DEV_PAGE_SIZE.to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidValue("FERN_PAGE_SIZE must be a valid number"))?;

        let request_timeout_secs = env::var("FERN_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults::DEV_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("FERN_REQUEST_TIMEOUT_SECS must be a valid number")
            })?;

        let connect_timeout_secs = env::var("FERN_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults::DEV_CONNECT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("FERN_CONNECT_TIMEOUT_SECS must be a valid number")
            })?;

        let access_token = env::var("FERN_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .map(SecretString::from);

        let config = Config {
            environment,
            api_base_url,
            graphql_url,
            page_size,
            request_timeout_secs,
            connect_timeout_secs,
            access_token,
        };

        config.validate()?;

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Development configuration pointing at the given backend.
    pub fn development(api_base_url: &str, graphql_url: &str) -> Self {
        Config {
            environment: Environment::Development,
            api_base_url: api_base_url.to_string(),
            graphql_url: graphql_url.to_string(),
            page_size: defaults::DEV_PAGE_SIZE,
            request_timeout_secs: defaults::DEV_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: defaults::DEV_CONNECT_TIMEOUT_SECS,
            access_token: None,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue(
                "FERN_PAGE_SIZE must be between 1 and 100",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "FERN_REQUEST_TIMEOUT_SECS must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.api_base_url == defaults::DEV_API_BASE_URL {
            errors.push(format!(
                "FERN_REPORTER_BASE_URL is using development default '{}'.",
                defaults::DEV_API_BASE_URL
            ));
        }

        if self.graphql_url == defaults::DEV_GRAPHQL_URL {
            errors.push(format!(
                "FERN_REPORTER_GRAPHQL_BASE_URL is using development default '{}'.",
                defaults::DEV_GRAPHQL_URL
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}

impl From<ConfigError> for crate::error::AppError {
    fn from(err: ConfigError) -> Self {
        crate::error::AppError::Config(err.to_string())
    }
}
