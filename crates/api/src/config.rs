use std::str::FromStr;

use figtree_core::access::AccessConfig;

use crate::auth::jwt::JwtConfig;
use crate::mail::EmailConfig;

/// A missing or unparsable environment variable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Read `var` through `lookup` and parse it, falling back to `default`.
pub(crate) fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long open connections may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Minimum password length for signup and password reset.
    pub password_min_length: usize,
    pub activation_token_ttl_hours: i64,
    pub password_reset_token_ttl_mins: i64,
    /// Base URL of the web client, used to build links in emails.
    pub public_base_url: String,
    pub jwt: JwtConfig,
    /// `None` when `SMTP_HOST` is unset; mail is then logged instead of sent.
    pub email: Option<EmailConfig>,
    /// Role thresholds. Not read from the environment.
    pub access: AccessConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                          | Default                  |
    /// |----------------------------------|--------------------------|
    /// | `HOST`                           | `0.0.0.0`                |
    /// | `PORT`                           | `3000`                   |
    /// | `CORS_ORIGINS`                   | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`           | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`          | `30`                     |
    /// | `PASSWORD_MIN_LENGTH`            | `12`                     |
    /// | `ACTIVATION_TOKEN_TTL_HOURS`     | `72`                     |
    /// | `PASSWORD_RESET_TOKEN_TTL_MINS`  | `60`                     |
    /// | `PUBLIC_BASE_URL`                | `http://localhost:5173`  |
    ///
    /// See [`JwtConfig::from_lookup`] and [`EmailConfig::from_lookup`] for
    /// the `JWT_*` and `SMTP_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            host,
            port: parse_or(&lookup, "PORT", 3000)?,
            cors_origins,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30)?,
            password_min_length: parse_or(&lookup, "PASSWORD_MIN_LENGTH", 12)?,
            activation_token_ttl_hours: parse_or(&lookup, "ACTIVATION_TOKEN_TTL_HOURS", 72)?,
            password_reset_token_ttl_mins: parse_or(&lookup, "PASSWORD_RESET_TOKEN_TTL_MINS", 60)?,
            public_base_url,
            jwt: JwtConfig::from_lookup(&lookup)?,
            email: EmailConfig::from_lookup(&lookup)?,
            access: AccessConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.password_min_length, 12);
        assert_eq!(config.activation_token_ttl_hours, 72);
        assert_eq!(config.password_reset_token_ttl_mins, 60);
        assert!(config.email.is_none());
        assert_eq!(config.access, AccessConfig::default());
    }

    #[test]
    fn missing_jwt_secret_is_an_error() {
        assert_matches!(load(&[]), Err(ConfigError::Missing("JWT_SECRET")));
        assert_matches!(
            load(&[("JWT_SECRET", "")]),
            Err(ConfigError::Missing("JWT_SECRET"))
        );
    }

    #[test]
    fn invalid_number_names_the_variable() {
        let err = load(&[("JWT_SECRET", "s"), ("PORT", "eighty")]).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "PORT", .. });
        assert_eq!(err.to_string(), "PORT has an invalid value 'eighty'");
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = load(&[
            ("JWT_SECRET", "s"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,,"),
        ])
        .unwrap();
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn public_base_url_loses_trailing_slash() {
        let config = load(&[("JWT_SECRET", "s"), ("PUBLIC_BASE_URL", "https://fig.example/")])
            .unwrap();
        assert_eq!(config.public_base_url, "https://fig.example");
    }

    #[test]
    fn smtp_host_enables_email() {
        let config = load(&[
            ("JWT_SECRET", "s"),
            ("SMTP_HOST", "smtp.example"),
            ("SMTP_PORT", "2525"),
        ])
        .unwrap();
        let email = config.email.expect("email configured");
        assert_eq!(email.smtp_host, "smtp.example");
        assert_eq!(email.smtp_port, 2525);
    }
}
