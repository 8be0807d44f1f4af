//! Application configuration loaded from environment variables.
//!
//! Fail-fast loading with validation: required variables must be present
//! and valid or startup aborts with a clear message. There is no lazily
//! initialized global config; `main` loads this once and passes it down.

use std::env;
use thiserror::Error;

/// Development-only session secret. Production startup refuses it.
pub const INSECURE_JWT_SECRET: &str = "development-jwt-secret-change-in-production!!";

/// Minimum pepper length when `AUTH_EMAIL_PEPPER` is set.
const MIN_PEPPER_CHARS: usize = 16;

/// Application environment mode.
///
/// Controls security enforcement behavior:
/// - `Development`: insecure defaults are allowed with WARN-level logging.
/// - `Production`: insecure defaults cause the application to refuse startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    /// Parse from the `APP_ENV` environment variable value.
    /// Defaults to `Development` if unset or unrecognized.
    #[must_use]
    pub fn from_env_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => {
                tracing::warn!(
                    value = other,
                    "Unrecognized APP_ENV value, defaulting to Development"
                );
                Self::Development
            }
        }
    }

    /// Returns true if this is production mode.
    #[must_use]
    pub fn is_production(&self) -> bool {
        *self == Self::Production
    }
}

impl std::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidVar {
        name: &'static str,
        reason: String,
    },

    #[error("Insecure default for {0} is not allowed in production")]
    InsecureInProduction(&'static str),
}

/// Validated application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment mode (development/production).
    pub environment: AppEnvironment,

    /// Port to listen on.
    pub port: u16,

    /// Postgres connection string.
    pub database_url: String,

    /// Connection pool size.
    pub database_max_connections: u32,

    /// Session JWT secret (base64 or raw, at least 32 bytes).
    pub auth_jwt_secret: String,

    /// Optional AES-256 key for notes/feature encryption.
    pub data_encryption_key: Option<String>,

    /// Optional pepper for email HMACs.
    pub auth_email_pepper: Option<String>,

    /// Google OAuth client id.
    pub google_client_id: Option<String>,

    /// Google OAuth client secret.
    pub google_client_secret: Option<String>,

    /// Redirect URL registered with Google.
    pub google_redirect_url: Option<String>,

    /// Default tracing filter directive.
    pub log_filter: String,
}

fn optional_var(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = AppEnvironment::from_env_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let port = match optional_var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidVar {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => 8080,
        };

        let database_url =
            optional_var("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?;

        let database_max_connections = match optional_var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().map_err(|e| ConfigError::InvalidVar {
                name: "DATABASE_MAX_CONNECTIONS",
                reason: e.to_string(),
            })?,
            None => 10,
        };

        let auth_jwt_secret =
            optional_var("AUTH_JWT_SECRET").ok_or(ConfigError::MissingVar("AUTH_JWT_SECRET"))?;
        if auth_jwt_secret.len() < 32 {
            return Err(ConfigError::InvalidVar {
                name: "AUTH_JWT_SECRET",
                reason: "must be at least 32 bytes".to_string(),
            });
        }
        if environment.is_production() && auth_jwt_secret == INSECURE_JWT_SECRET {
            return Err(ConfigError::InsecureInProduction("AUTH_JWT_SECRET"));
        }

        let auth_email_pepper = optional_var("AUTH_EMAIL_PEPPER");
        if let Some(pepper) = &auth_email_pepper {
            if pepper.len() < MIN_PEPPER_CHARS {
                return Err(ConfigError::InvalidVar {
                    name: "AUTH_EMAIL_PEPPER",
                    reason: format!("must be at least {MIN_PEPPER_CHARS} characters"),
                });
            }
        }

        let google_client_id = optional_var("AUTH_GOOGLE_ID");
        let google_client_secret = optional_var("AUTH_GOOGLE_SECRET");
        let google_redirect_url = optional_var("AUTH_GOOGLE_REDIRECT_URL");
        // Google config is all-or-nothing
        let google_vars = [
            google_client_id.is_some(),
            google_client_secret.is_some(),
            google_redirect_url.is_some(),
        ];
        if google_vars.iter().any(|&set| set) && !google_vars.iter().all(|&set| set) {
            return Err(ConfigError::InvalidVar {
                name: "AUTH_GOOGLE_ID",
                reason: "AUTH_GOOGLE_ID, AUTH_GOOGLE_SECRET and AUTH_GOOGLE_REDIRECT_URL \
                         must be set together"
                    .to_string(),
            });
        }

        Ok(Self {
            environment,
            port,
            database_url,
            database_max_connections,
            auth_jwt_secret,
            data_encryption_key: optional_var("DATA_ENCRYPTION_KEY"),
            auth_email_pepper,
            google_client_id,
            google_client_secret,
            google_redirect_url,
            log_filter: optional_var("LOG_FILTER")
                .unwrap_or_else(|| "info,pulsecheck=debug".to_string()),
        })
    }

    /// Address string to bind.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.environment.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_environment_parsing() {
        assert_eq!(
            AppEnvironment::from_env_str("production"),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from_env_str("PROD"),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from_env_str("dev"),
            AppEnvironment::Development
        );
        assert_eq!(
            AppEnvironment::from_env_str("weird"),
            AppEnvironment::Development
        );
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(AppEnvironment::Production.to_string(), "production");
        assert_eq!(AppEnvironment::Development.to_string(), "development");
    }

    #[test]
    fn test_bind_addr_formats_port() {
        let config = Config {
            environment: AppEnvironment::Development,
            port: 9999,
            database_url: "postgres://localhost/x".to_string(),
            database_max_connections: 10,
            auth_jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            data_encryption_key: None,
            auth_email_pepper: None,
            google_client_id: None,
            google_client_secret: None,
            google_redirect_url: None,
            log_filter: "info".to_string(),
        };
        assert_eq!(config.bind_addr(), "0.0.0.0:9999");
        assert!(!config.secure_cookies());
    }
}
