//! Sower - scheduled review seeding engine
//!
//! Sower runs as a recurring job against an external record store of site
//! records. Each run it decides which sites receive a seed review today,
//! which star rating to assign under the site's quality tier policy, which
//! pre-authored template to reuse without near-term repetition, and which
//! display identity to attach.
//!
//! ## Components
//!
//! - **Policy**: quality tier classification and posting policies
//! - **Library**: the rating-partitioned pool of reusable review templates
//! - **Ledger**: per-site repetition tracking with a 30-day window
//! - **Rating**: weighted, uniform, and band-convergence star selection
//! - **Vocab**: cross-category and complaint vocabulary filtering
//! - **Identity**: reviewer username generation with a recency window
//! - **Scheduler**: the per-run orchestration and report

pub mod config;
pub mod identity;
pub mod ledger;
pub mod library;
pub mod policy;
pub mod rating;
pub mod scheduler;
pub mod store;
pub mod types;
pub mod vocab;

pub use config::Args;
pub use scheduler::{RunReport, Scheduler, SchedulerConfig};
pub use types::{Result, SowerError};
