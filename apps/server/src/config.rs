use std::{net::SocketAddr, time::Duration};

use anyhow::{anyhow, Context};
use stockhist_core::history::Frequency;
use stockhist_market_data::DEFAULT_BASE_URL;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub upstream_url: String,
    /// Admin routes are only mounted when this is set.
    pub admin_api_key: Option<String>,
    pub default_frequency: Frequency,
    pub detail_throttle: Duration,
    pub scheduler_enabled: bool,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset and blank values take
    /// their defaults; malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let listen_addr: SocketAddr = match (get("SH_LISTEN_ADDR"), get("PORT")) {
            (Some(addr), _) => addr.parse().context("Invalid SH_LISTEN_ADDR")?,
            (None, Some(port)) => {
                let port: u16 = port.parse().context("Invalid PORT")?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
            (None, None) => SocketAddr::from(([0, 0, 0, 0], 8000)),
        };
        let db_path = get("SH_DB_PATH").unwrap_or_else(|| "./db/stockhist.db".into());
        let upstream_url = get("SH_UPSTREAM_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let admin_api_key = get("SH_ADMIN_API_KEY");
        let default_frequency = match get("SH_DEFAULT_FREQUENCY") {
            Some(raw) => raw
                .parse::<Frequency>()
                .map_err(|e| anyhow!("Invalid SH_DEFAULT_FREQUENCY: {}", e))?,
            None => Frequency::Hourly,
        };
        let throttle_ms: u64 = get("SH_DETAIL_THROTTLE_MS")
            .unwrap_or_else(|| "500".into())
            .parse()
            .context("Invalid SH_DETAIL_THROTTLE_MS")?;
        let scheduler_enabled = match get("SH_SCHEDULER_ENABLED") {
            Some(raw) => parse_flag(&raw).context("Invalid SH_SCHEDULER_ENABLED")?,
            None => true,
        };
        let cors_allow = get("SH_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = get("SH_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .context("Invalid SH_REQUEST_TIMEOUT_MS")?;

        Ok(Self {
            listen_addr,
            db_path,
            upstream_url,
            admin_api_key,
            default_frequency,
            detail_throttle: Duration::from_millis(throttle_ms),
            scheduler_enabled,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("expected true/false, got '{}'", other)),
    }
}
