pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Grow {
            inputs,
            size,
            output,
            fill,
            zip,
            level,
            chunk_size,
            direct,
        } => handlers::handle_grow(inputs, size, output, fill, zip, level, chunk_size, direct),
        Commands::Info { inputs, json } => handlers::handle_info(inputs, json),
        Commands::Zip {
            inputs,
            zip,
            level,
            zstd,
        } => handlers::handle_zip(inputs, zip, level, zstd),
        Commands::Demo {
            input,
            size,
            out_dir,
        } => handlers::handle_demo(input, size, out_dir),
    }
}
