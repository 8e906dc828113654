//! Centralized configuration (environment variables + defaults).

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaBackend {
    Cloudinary,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is `Postgres`.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiry: Duration,
    pub client_origin: String,
    pub media_backend: MediaBackend,
    /// Required when `media_backend` is `Cloudinary`.
    pub cloudinary: Option<CloudinaryConfig>,
    pub user_folder: String,
    pub post_folder: String,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_backend = match get("STORE_BACKEND").as_deref().unwrap_or("postgres") {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => return Err(invalid("STORE_BACKEND", other, "expected postgres or memory")),
        };
        let database_url = get("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let media_backend = match get("MEDIA_BACKEND").as_deref().unwrap_or("cloudinary") {
            "cloudinary" => MediaBackend::Cloudinary,
            "memory" => MediaBackend::Memory,
            other => return Err(invalid("MEDIA_BACKEND", other, "expected cloudinary or memory")),
        };
        let cloudinary = match media_backend {
            MediaBackend::Cloudinary => Some(CloudinaryConfig {
                cloud_name: get("CLOUDINARY_CLOUD_NAME")
                    .ok_or(ConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?,
                api_key: get("CLOUDINARY_API_KEY").ok_or(ConfigError::Missing("CLOUDINARY_API_KEY"))?,
                api_secret: get("CLOUDINARY_API_SECRET")
                    .ok_or(ConfigError::Missing("CLOUDINARY_API_SECRET"))?,
            }),
            MediaBackend::Memory => None,
        };

        let jwt_expiry_raw = get("JWT_EXPIRY").unwrap_or_else(|| "7d".to_string());
        let jwt_expiry = parse_duration(&jwt_expiry_raw)
            .ok_or_else(|| invalid("JWT_EXPIRY", &jwt_expiry_raw, "expected e.g. 3600, 90m, 12h, 7d"))?;

        let log_format = match get("LOG_FORMAT").as_deref().unwrap_or("pretty") {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => return Err(invalid("LOG_FORMAT", other, "expected pretty or json")),
        };

        Ok(Self {
            port: parse_or("PORT", get("PORT"), 4000)?,
            store_backend,
            database_url,
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                5,
            )?,
            jwt_secret: get("JWT_SECRET_KEY").ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?,
            jwt_expiry,
            client_origin: get("CLIENT_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            media_backend,
            cloudinary,
            user_folder: get("CLOUD_USER_FOLDER").unwrap_or_else(|| "avatars".to_string()),
            post_folder: get("CLOUD_POST_FOLDER").unwrap_or_else(|| "posts".to_string()),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", get("MAX_UPLOAD_BYTES"), 10 * 1024 * 1024)?,
            log_format,
        })
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(var, &v, &e.to_string())),
    }
}

/// Parses `<n>`, `<n>s`, `<n>m`, `<n>h` or `<n>d` into a non-zero duration.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit_secs) = match raw.chars().last()? {
        's' => (&raw[..raw.len() - 1], 1),
        'm' => (&raw[..raw.len() - 1], 60),
        'h' => (&raw[..raw.len() - 1], 60 * 60),
        'd' => (&raw[..raw.len() - 1], 24 * 60 * 60),
        c if c.is_ascii_digit() => (raw, 1),
        _ => return None,
    };
    let n: u64 = digits.parse().ok()?;
    let secs = n.checked_mul(unit_secs)?;
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("90"), Some(Duration::from_secs(90)));
        assert_eq!(parse_duration("15m"), Some(Duration::from_secs(900)));
        assert_eq!(parse_duration("12h"), Some(Duration::from_secs(43_200)));
        assert_eq!(parse_duration("7d"), Some(Duration::from_secs(604_800)));
        assert_eq!(parse_duration("0"), None);
        assert_eq!(parse_duration("7w"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn memory_backends_need_only_a_secret() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("MEDIA_BACKEND", "memory"),
            ("JWT_SECRET_KEY", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.jwt_expiry, Duration::from_secs(7 * 24 * 3600));
        assert!(cfg.cloudinary.is_none());
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn postgres_backend_requires_a_url() {
        let err = AppConfig::from_lookup(lookup(&[
            ("MEDIA_BACKEND", "memory"),
            ("JWT_SECRET_KEY", "s3cret"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn bad_numbers_name_the_variable() {
        let err = AppConfig::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("MEDIA_BACKEND", "memory"),
            ("JWT_SECRET_KEY", "s3cret"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().starts_with("PORT has an invalid value"));
    }
}
