#![forbid(unsafe_code)]

use anyhow::Result;
use cartconv::cli::{Cli, Commands, conversion_options, convert_lines};
use cartconv::config::ServerConfig;
use cartconv::server::run_server;
use clap::Parser;
use std::io;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // stdout carries conversion results
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Serve { config } => {
            let config = ServerConfig::load(config.as_deref())?;
            run_server(config).await
        }
        Commands::Convert {
            from,
            to,
            bits,
            precision,
            lv95,
        } => {
            let options = conversion_options(bits, precision, lv95);
            let summary = convert_lines(
                io::stdin().lock(),
                io::stdout().lock(),
                io::stderr().lock(),
                from,
                to,
                &options,
            )?;
            info!(from = %from, to = %to, converted = summary.converted, "conversion finished");
            if summary.failed > 0 {
                warn!(failed = summary.failed, "some lines could not be converted");
            }
            Ok(())
        }
    }
}
