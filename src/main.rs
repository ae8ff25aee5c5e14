//! Sower - scheduled review seeding engine

use chrono::Utc;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sower::{
    config::Args,
    library::ReviewLibrary,
    scheduler::{Scheduler, SchedulerConfig},
    store::{HttpRecordStore, StoreConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("sower={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("======================================");
    info!("  Sower - review seeding engine");
    info!("======================================");
    info!("Record store: {}", args.store_url);
    info!("Library dir: {}", args.library_dir.display());
    info!("Run cap: {} post(s)", args.max_posts_per_run);
    info!("Write delay: {}ms", args.write_delay_ms);
    match args.seed {
        Some(seed) => info!("Seed: {} (reproducible run)", seed),
        None => info!("Seed: OS entropy"),
    }
    info!("======================================");

    // Load the content library; missing partitions degrade to skips
    let library = ReviewLibrary::load(&args.library_dir);
    let sizes = library.partition_sizes();
    info!(
        "Content library loaded: {} template(s) (1★:{} 2★:{} 3★:{} 4★:{} 5★:{})",
        library.total(),
        sizes[0],
        sizes[1],
        sizes[2],
        sizes[3],
        sizes[4]
    );

    // Record store client
    let store = match HttpRecordStore::new(StoreConfig {
        base_url: args.store_url.clone(),
        api_key: args.store_api_key.clone(),
        timeout_ms: args.request_timeout_ms,
    }) {
        Ok(s) => s,
        Err(e) => {
            error!("Record store client setup failed: {}", e);
            std::process::exit(1);
        }
    };

    let config = SchedulerConfig {
        max_posts_per_run: args.max_posts_per_run,
        write_delay: std::time::Duration::from_millis(args.write_delay_ms),
    };

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };

    // One pass per invocation; cadence is the scheduling host's job
    let mut scheduler = Scheduler::new(&store, &library, config);
    match scheduler.run(Utc::now().date_naive(), &mut rng).await {
        Ok(report) => {
            for entry in &report.outcomes {
                info!(entity = %entry.entity_id, outcome = ?entry.outcome, "Outcome");
            }
            info!("{}", report.summary());
            Ok(())
        }
        Err(e) => {
            error!("Run aborted: {}", e);
            std::process::exit(1);
        }
    }
}
