//! Configuration for Sower
//!
//! CLI arguments and environment variable handling using clap. The binary
//! is meant to run on an external cadence (cron or similar) with no
//! required arguments; every knob has a default and an env override.

use clap::Parser;
use std::path::PathBuf;

/// Sower - scheduled review seeding engine
#[derive(Parser, Debug, Clone)]
#[command(name = "sower")]
#[command(about = "Scheduled review seeding against the external record store")]
pub struct Args {
    /// Base URL of the record store API
    #[arg(long, env = "STORE_URL", default_value = "http://localhost:8090")]
    pub store_url: String,

    /// Bearer token for the record store (optional)
    #[arg(long, env = "STORE_API_KEY")]
    pub store_api_key: Option<String>,

    /// Directory holding the content library partitions (star{1..5}.json)
    #[arg(long, env = "LIBRARY_DIR", default_value = "data/reviews")]
    pub library_dir: PathBuf,

    /// Run-wide cap on posted reviews per invocation
    #[arg(long, env = "MAX_POSTS_PER_RUN", default_value = "5")]
    pub max_posts_per_run: usize,

    /// Courtesy delay between record store writes, in milliseconds
    #[arg(long, env = "WRITE_DELAY_MS", default_value = "1500")]
    pub write_delay_ms: u64,

    /// Record store request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// Seed for the run's random draws (reproducible runs; random if unset)
    #[arg(long, env = "SEED")]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_posts_per_run == 0 {
            return Err("MAX_POSTS_PER_RUN must be at least 1".to_string());
        }
        if self.store_url.trim().is_empty() {
            return Err("STORE_URL must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let args = Args::parse_from(["sower"]);
        assert!(args.validate().is_ok());
        assert_eq!(args.max_posts_per_run, 5);
        assert_eq!(args.write_delay_ms, 1500);
        assert!(args.seed.is_none());
    }

    #[test]
    fn test_zero_cap_rejected() {
        let args = Args::parse_from(["sower", "--max-posts-per-run", "0"]);
        assert!(args.validate().is_err());
    }
}
