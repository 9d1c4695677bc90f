use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Raw `SPENDWISE_JWT_SECRET`; a random per-process key is used when unset.
    pub jwt_secret: Option<String>,
    pub token_ttl: Duration,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub webhook_url: Option<String>,
    pub webhook_timeout: Duration,
    pub log_format: String,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn number<T: std::str::FromStr>(name: &str, default: T) -> T {
    var(name).and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = var("SPENDWISE_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid SPENDWISE_LISTEN_ADDR")?;
        let db_path = var("SPENDWISE_DB_PATH").unwrap_or_else(|| "./db/spendwise.db".into());
        let cors_allow = var("SPENDWISE_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = number("SPENDWISE_REQUEST_TIMEOUT_MS", 30_000);
        let ttl_minutes: u64 = number("SPENDWISE_TOKEN_TTL_MINUTES", 480);
        let webhook_timeout_ms: u64 = number("SPENDWISE_WEBHOOK_TIMEOUT_MS", 5_000);

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret: var("SPENDWISE_JWT_SECRET"),
            token_ttl: Duration::from_secs(ttl_minutes * 60),
            upload_dir: PathBuf::from(
                var("SPENDWISE_UPLOAD_DIR").unwrap_or_else(|| "./uploads".into()),
            ),
            max_upload_bytes: number("SPENDWISE_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            webhook_url: var("SPENDWISE_WEBHOOK_URL"),
            webhook_timeout: Duration::from_millis(webhook_timeout_ms),
            log_format: var("SPENDWISE_LOG_FORMAT").unwrap_or_else(|| "text".into()),
        })
    }
}
