use std::env;

use crate::domain::LoanPolicy;
use crate::domain::loan_policy::{DEFAULT_FINE_PER_DAY, MAX_LOAN_PERIOD_DAYS};

pub const DEFAULT_OPENLIBRARY_URL: &str = "https://openlibrary.org";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub loan_policy: LoanPolicy,
    pub openlibrary_url: String,
    pub lookup_timeout_secs: u64,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://library.db?mode=rwc".to_string());

        let loan_period_days = parse_loan_period(env::var("LOAN_PERIOD_DAYS").ok().as_deref());

        let fine_per_day = env::var("FINE_PER_DAY")
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|rate| rate.is_finite() && *rate >= 0.0)
            .unwrap_or(DEFAULT_FINE_PER_DAY);

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8182),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            loan_policy: LoanPolicy {
                loan_period_days,
                fine_per_day,
            },
            openlibrary_url: env::var("OPENLIBRARY_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_OPENLIBRARY_URL.to_string()),
            lookup_timeout_secs: env::var("LOOKUP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            seed_demo: env::var("SEED_DEMO").is_ok(),
        }
    }
}

/// `LOAN_PERIOD_DAYS`: unset or 0 keeps due-date tracking off; values outside
/// `1..=MAX_LOAN_PERIOD_DAYS` are rejected with a warning.
fn parse_loan_period(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    match raw.parse::<i64>() {
        Ok(0) => None,
        Ok(days) if (1..=MAX_LOAN_PERIOD_DAYS).contains(&days) => Some(days),
        _ => {
            tracing::warn!(
                "Ignoring LOAN_PERIOD_DAYS={:?}: expected 0..={}, due-date tracking disabled",
                raw,
                MAX_LOAN_PERIOD_DAYS
            );
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 8182,
            cors_allowed_origins: Vec::new(),
            loan_policy: LoanPolicy::default(),
            openlibrary_url: DEFAULT_OPENLIBRARY_URL.to_string(),
            lookup_timeout_secs: 10,
            seed_demo: false,
        }
    }
}
