//! Runtime configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/storefront | database + log directory |
//! | TIMEZONE | UTC | business timezone for calendar bucketing |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | STATS_TOP_PRODUCTS | 5 | top-N size for best-seller statistics |
//! | WRITE_GATE_TIMEOUT_MS | 5000 | max wait for the order write gate |
//! | WRITE_RETRY_LIMIT | 2 | gate acquisition retries before Conflict |

use chrono_tz::Tz;

/// Order subsystem configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database file and logs
    pub work_dir: String,
    /// Business timezone: "today" and month buckets are computed here
    pub timezone: Tz,
    /// Running environment: development | staging | production
    pub environment: String,
    /// Number of products returned by the top-sellers statistic
    pub stats_top_products: usize,
    /// How long a mutating call may wait for the write gate (milliseconds)
    pub write_gate_timeout_ms: u64,
    /// Gate acquisition attempts before surfacing a conflict
    pub write_retry_limit: u32,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/storefront".into()),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::UTC),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            stats_top_products: std::env::var("STATS_TOP_PRODUCTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            write_gate_timeout_ms: std::env::var("WRITE_GATE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            write_retry_limit: std::env::var("WRITE_RETRY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
        }
    }

    /// Override the working directory (test scenarios)
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
