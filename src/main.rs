//! cve-harvest CLI
//!
//! Command-line interface for harvesting CVE records

use clap::Parser;
use cve_harvest::cli::{Cli, Runner};
use cve_harvest::harvest::shutdown_channel;
use tracing::Level;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let (trigger, shutdown) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.trigger();
        }
    });

    let runner = Runner::new(cli).with_shutdown(shutdown);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        eprintln!("{}", e.category().message());
        std::process::exit(1);
    }
}
