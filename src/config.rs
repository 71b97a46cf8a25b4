/*
 * Responsibility
 * - 環境変数や設定の読み込み (JWT_SECRET, TTL, DATABASE_URL, CORS 許可など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動後は不変 (secret / TTL はプロセス全体で共有する read-only 値)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

// Shortest signing secret accepted when running in production.
const MIN_PRODUCTION_SECRET_BYTES: usize = 32;
// Longest access token lifetime accepted (one year).
const MAX_ACCESS_TOKEN_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // HS256 shared secret. Never printed.
    pub jwt_secret: String,
    pub access_token_ttl_seconds: u64,

    // None => seeded in-memory user directory
    pub database_url: Option<String>,

    pub cors_allowed_origins: Vec<String>,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("request_timeout", &self.request_timeout)
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (the process
    /// environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if app_env.is_production() && jwt_secret.len() < MIN_PRODUCTION_SECRET_BYTES {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let access_token_ttl_seconds = match lookup("ACCESS_TOKEN_TTL_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ttl| (1..=MAX_ACCESS_TOKEN_TTL_SECONDS).contains(ttl))
                .ok_or(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))?,
            None => 60,
        };

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let sqids_min_length = lookup("SQIDS_MIN_LENGTH")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(10);

        let sqids_alphabet = lookup("SQIDS_ALPHABET").unwrap_or_else(|| {
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string()
        });

        let request_timeout = lookup("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let request_body_limit_bytes = lookup("REQUEST_BODY_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            jwt_secret,
            access_token_ttl_seconds,
            database_url,
            cors_allowed_origins,
            sqids_min_length,
            sqids_alphabet,
            request_timeout,
            request_body_limit_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "dev-secret")])).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.access_token_ttl_seconds, 60);
        assert!(config.database_url.is_none());
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.request_body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn missing_secret_fails_startup() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));

        let err = Config::from_lookup(lookup_from(&[("JWT_SECRET", "")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn production_rejects_short_secret() {
        let err = Config::from_lookup(lookup_from(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", "too-short"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("JWT_SECRET"));
    }

    #[test]
    fn zero_or_garbage_ttl_is_invalid() {
        for raw in ["0", "soon"] {
            let err = Config::from_lookup(lookup_from(&[
                ("JWT_SECRET", "dev-secret"),
                ("ACCESS_TOKEN_TTL_SECONDS", raw),
            ]))
            .unwrap_err();
            assert_eq!(err, ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
        }
    }

    #[test]
    fn ttl_beyond_upper_bound_is_invalid() {
        for raw in ["31536001", "9223372036854775807", "18446744073709551615"] {
            let err = Config::from_lookup(lookup_from(&[
                ("JWT_SECRET", "dev-secret"),
                ("ACCESS_TOKEN_TTL_SECONDS", raw),
            ]))
            .unwrap_err();
            assert_eq!(err, ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"), "{raw}");
        }

        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "dev-secret"),
            ("ACCESS_TOKEN_TTL_SECONDS", "31536000"),
        ]))
        .unwrap();
        assert_eq!(config.access_token_ttl_seconds, 31_536_000);
    }

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "dev-secret"),
            ("CORS_ALLOWED_ORIGINS", " https://a.example , ,https://b.example"),
        ]))
        .unwrap();

        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config =
            Config::from_lookup(lookup_from(&[("JWT_SECRET", "super-secret-value")])).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret-value"));
    }
}
