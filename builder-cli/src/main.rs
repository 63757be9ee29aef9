//! # Site Builder
//!
//! Command-line entry point.

use builder_cli::{commands, BuilderConfig, CliArgs};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = BuilderConfig::from(&args);

    let filter = if config.verbose {
        tracing_subscriber::EnvFilter::new(config.log_filter())
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| config.log_filter().into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Running as user {}", config.user);

    let mut stdout = std::io::stdout().lock();
    commands::run(&config, args.command, &mut stdout).await
}
