mod shell;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use signal_desk::config::Config;

use crate::shell::DeskShell;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let mut shell = DeskShell::new(cfg.shared()).await;
    shell.run().await?;

    Ok(())
}
