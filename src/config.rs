use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

/// Endpoints of the third-party demo post API proxied under `/dummyPost`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub read_base_url: String,
    pub write_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let positive = |key: &str| {
            lookup(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|v| *v > 0)
        };

        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").context("JWT_SECRET must be set")?,
            ttl_minutes: lookup("JWT_TTL_MINUTES")
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(24 * 60),
        };
        let upstream = UpstreamConfig {
            read_base_url: lookup("DUMMY_READ_BASE_URL")
                .unwrap_or_else(|| "https://jsonplaceholder.typicode.com".into())
                .trim_end_matches('/')
                .to_string(),
            write_url: lookup("DUMMY_WRITE_URL")
                .unwrap_or_else(|| "https://dummyjson.com/posts/add".into()),
            timeout_secs: positive("UPSTREAM_TIMEOUT_SECS").unwrap_or(10),
        };

        Ok(Self {
            database_url,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("APP_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(1414),
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(10),
            request_timeout_secs: positive("REQUEST_TIMEOUT_SECS").unwrap_or(10),
            jwt,
            upstream,
        })
    }
}
