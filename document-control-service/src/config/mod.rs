use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentControlConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: String,
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Load the fixture catalog, users, and documents at startup.
    pub seed_fixtures: bool,
    /// Maximum entries returned by the audit trail page.
    pub audit_display_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub allowed_origins: Vec<String>,
}

pub const DEFAULT_AUDIT_DISPLAY_LIMIT: usize = 50;

impl Default for DocumentControlConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            environment: "dev".to_string(),
            logging: LoggingConfig {
                level: "info".to_string(),
                otlp_endpoint: None,
            },
            store: StoreConfig {
                seed_fixtures: true,
                audit_display_limit: DEFAULT_AUDIT_DISPLAY_LIMIT,
            },
            http: HttpConfig {
                allowed_origins: Vec::new(),
            },
        }
    }
}

impl DocumentControlConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let is_prod = environment == "prod";

        let default_level = common_config.log_level.clone();
        let default_limit = DEFAULT_AUDIT_DISPLAY_LIMIT.to_string();

        Ok(DocumentControlConfig {
            common: common_config,
            environment,
            logging: LoggingConfig {
                level: get_env("LOG_LEVEL", Some(&default_level), false)?,
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            },
            store: StoreConfig {
                seed_fixtures: parse_env(
                    "SEED_FIXTURES",
                    &get_env("SEED_FIXTURES", Some("true"), false)?,
                )?,
                audit_display_limit: parse_env(
                    "AUDIT_DISPLAY_LIMIT",
                    &get_env("AUDIT_DISPLAY_LIMIT", Some(&default_limit), false)?,
                )?,
            },
            http: HttpConfig {
                allowed_origins: parse_origins(&get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?),
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "prod"
    }
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e))
    })
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}
