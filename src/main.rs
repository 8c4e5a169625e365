//! This is the main entry point for slash-router.

use slash_router::{cli, config::load_router_config};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = load_router_config(&std::env::current_dir()?);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter.as_deref().unwrap_or("info")))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(cli::parse(None))
}
