use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use scour::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins when set; --verbose only raises the default level.
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    cli.run()
}
