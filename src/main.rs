use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hexrate::cli::{Cli, Commands};
use hexrate::commands::{grid, neighbors, pedestrian, rate, roads, stops};

/// `RUST_LOG` wins over `-v` when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hexrate={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Grid(args) => grid::run(&cli, args),
        Commands::Roads(args) => roads::run(&cli, args),
        Commands::Pedestrian(args) => pedestrian::run(&cli, args),
        Commands::Stops(args) => stops::run(&cli, args),
        Commands::Neighbors(args) => neighbors::run(&cli, args),
        Commands::Rate(args) => rate::run(&cli, args),
    }
}
