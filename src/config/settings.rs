//! Settings loaded from environment variables (and `.env` when present).

use std::env;

use anyhow::{bail, Context};

use super::constants::{
    DEFAULT_BODY_LIMIT_BYTES, DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};

const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

#[derive(Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    /// Origins allowed by CORS in production
    pub frontend_origins: Vec<String>,
    pub production: bool,
    pub server_host: String,
    pub server_port: u16,
    pub low_stock_threshold: i32,
    pub body_limit_bytes: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("frontend_origins", &self.frontend_origins)
            .field("production", &self.production)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("low_stock_threshold", &self.low_stock_threshold)
            .field("body_limit_bytes", &self.body_limit_bytes)
            .finish()
    }
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `JWT_SECRET` is mandatory when `APP_ENV=production`; elsewhere an
    /// insecure development secret is used with a warning.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if production => bail!("JWT_SECRET must be set in production"),
            Err(_) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
        };
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            bail!("JWT_SECRET must be at least {MIN_JWT_SECRET_LENGTH} characters long");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
            jwt_secret,
            jwt_expiration_hours: parse_var("JWT_EXPIRATION_HOURS")?
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            frontend_origins: env::var("FRONTEND_URL")
                .map(|v| split_origins(&v))
                .unwrap_or_default(),
            production,
            server_host: env::var("HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_var("PORT")?.unwrap_or(DEFAULT_SERVER_PORT),
            low_stock_threshold: parse_var("LOW_STOCK_THRESHOLD")?
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
            body_limit_bytes: parse_var("BODY_LIMIT_BYTES")?.unwrap_or(DEFAULT_BODY_LIMIT_BYTES),
        })
    }

    /// Development defaults with the given signing secret. No database URL.
    pub fn local(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: None,
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            frontend_origins: Vec::new(),
            production: false,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }

    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(None),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
