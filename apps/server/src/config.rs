use anyhow::Context;
use std::{net::SocketAddr, path::PathBuf, time::Duration};

use tidecast_core::constants::{DEFAULT_FORECAST_HORIZON, DEFAULT_MIN_POINTS, DEFAULT_WINDOW_DAYS};
use tidecast_core::update::PipelineSettings;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub entities_file: Option<PathBuf>,
    pub pipeline: PipelineSettings,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub pocketbase_url: Option<String>,
    pub monthly_pull: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("TC_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
            .parse()
            .context("Invalid TC_LISTEN_ADDR")?;
        let data_dir = std::env::var("TC_DATA_DIR")
            .unwrap_or_else(|_| "./prophet_data".into())
            .into();
        let entities_file = non_empty_var("TC_ENTITIES_FILE").map(PathBuf::from);
        let pipeline = PipelineSettings {
            window_days: parse_or("TC_WINDOW_DAYS", DEFAULT_WINDOW_DAYS),
            min_points: parse_or("TC_MIN_POINTS", DEFAULT_MIN_POINTS),
            horizon: parse_or("TC_FORECAST_HORIZON", DEFAULT_FORECAST_HORIZON),
        };
        let cors_allow = std::env::var("TC_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_or("TC_REQUEST_TIMEOUT_MS", 30000);
        let pocketbase_url = non_empty_var("POCKETBASE_URL");
        let monthly_pull = std::env::var("TC_MONTHLY_PULL")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            listen_addr,
            data_dir,
            entities_file,
            pipeline,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            pocketbase_url,
            monthly_pull,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
