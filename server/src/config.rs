use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use ledger::payments::AllocationConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub cors_allowed_origins: Vec<String>,
    pub allocation: AllocationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL missing")?;

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        let mut allocation = AllocationConfig::default();
        if let Ok(raw) = std::env::var("PAYROLL_ALLOC_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("invalid PAYROLL_ALLOC_TIMEOUT_SECS: {raw}"))?;
            if secs == 0 {
                return Err(anyhow!("PAYROLL_ALLOC_TIMEOUT_SECS must be positive"));
            }
            allocation.timeout = Duration::from_secs(secs);
        }

        Ok(Self {
            database_url,
            cors_allowed_origins,
            allocation,
        })
    }
}
