use anyhow::Result;
use clap::Parser;
use playground_canvas::logging::{LoggingConfig, init_logging};

fn main() -> Result<()> {
    let cli = playground_canvas::cli::Cli::parse();
    init_logging(&LoggingConfig::from_cli(&cli));
    playground_canvas::app::run(cli)
}
