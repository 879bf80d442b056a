use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::rating::Persona;

/// Hexagonal grid rating pipeline
#[derive(Parser, Debug)]
#[command(name = "hexrate", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a hexagonal grid clipped to a boundary polygon
    Grid(GridArgs),

    /// Attach road edges to hexagons by longest overlap
    Roads(LineArgs),

    /// Attach pedestrian edges to hexagons by longest overlap
    Pedestrian(LineArgs),

    /// Attach transit stops to the hexagons containing them
    Stops(StopsArgs),

    /// Compute adjacent hexagons from cell geometry
    Neighbors(NeighborsArgs),

    /// Rate hexagons for a persona
    Rate(RateArgs),
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output grid file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct GridArgs {
    #[command(flatten)]
    pub out: OutputArgs,

    /// Hexagon circumradius in kilometres
    #[arg(long, default_value_t = 1.2)]
    pub radius_km: f64,

    #[arg(long, default_value_t = 53.4, allow_negative_numbers = true)]
    pub lat_min: f64,

    #[arg(long, default_value_t = 59.0, allow_negative_numbers = true)]
    pub lat_max: f64,

    #[arg(long, default_value_t = 33.5, allow_negative_numbers = true)]
    pub lon_min: f64,

    #[arg(long, default_value_t = 40.0, allow_negative_numbers = true)]
    pub lon_max: f64,

    /// Clipping polygon as a JSON ring or WKT POLYGON (defaults to the Moscow metro area)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub boundary: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct LineArgs {
    /// Input grid file
    #[arg(value_hint = ValueHint::FilePath)]
    pub grid: PathBuf,

    /// `;`-delimited edge table with WKT geometry
    #[arg(value_hint = ValueHint::FilePath)]
    pub table: PathBuf,

    #[command(flatten)]
    pub out: OutputArgs,

    /// Keep every Nth row of the edge table
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u64).range(1..))]
    pub downsample: u64,

    /// Checkpoint file (defaults to the output path with a `.checkpoint.json` suffix)
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "no_checkpoint")]
    pub checkpoint: Option<PathBuf>,

    /// Features processed between checkpoint writes
    #[arg(long, default_value_t = 50_000)]
    pub checkpoint_interval: usize,

    /// Run without a checkpoint
    #[arg(long)]
    pub no_checkpoint: bool,
}

#[derive(Args, Debug)]
pub struct StopsArgs {
    /// Input grid file
    #[arg(value_hint = ValueHint::FilePath)]
    pub grid: PathBuf,

    /// `,`-delimited stop schedule
    #[arg(value_hint = ValueHint::FilePath)]
    pub table: PathBuf,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Args, Debug)]
pub struct NeighborsArgs {
    /// Input grid file
    #[arg(value_hint = ValueHint::FilePath)]
    pub grid: PathBuf,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Args, Debug)]
pub struct PersonaArgs {
    #[arg(long)]
    pub builder: bool,

    #[arg(long)]
    pub driver: bool,

    #[arg(long)]
    pub public_transport: bool,

    #[arg(long)]
    pub parent: bool,

    #[arg(long)]
    pub pet_owner: bool,

    #[arg(long)]
    pub big_family: bool,

    #[arg(long)]
    pub old_family: bool,
}

impl From<&PersonaArgs> for Persona {
    fn from(args: &PersonaArgs) -> Self {
        Self {
            builder: args.builder,
            driver: args.driver,
            uses_public_transport: args.public_transport,
            parent: args.parent,
            pet_owner: args.pet_owner,
            big_family: args.big_family,
            old_family: args.old_family,
        }
    }
}

#[derive(Args, Debug)]
pub struct RateArgs {
    /// Enriched grid file
    #[arg(value_hint = ValueHint::FilePath)]
    pub grid: PathBuf,

    /// Hexagon to rate
    #[arg(long, required_unless_present = "all", conflicts_with = "all")]
    pub hex: Option<String>,

    /// Rate every hexagon
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub persona: PersonaArgs,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn line_pass_defaults() {
        let cli = Cli::parse_from(["hexrate", "roads", "grid.json", "roads.csv", "-o", "out.json"]);
        let Commands::Roads(args) = cli.command else { panic!("expected roads") };
        assert_eq!(args.downsample, 6);
        assert_eq!(args.checkpoint_interval, 50_000);
        assert!(args.checkpoint.is_none() && !args.no_checkpoint);
    }

    #[test]
    fn rate_needs_a_target() {
        assert!(Cli::try_parse_from(["hexrate", "rate", "grid.json"]).is_err());
        assert!(Cli::try_parse_from(["hexrate", "rate", "grid.json", "--hex", "1", "--all"]).is_err());

        let cli = Cli::parse_from(["hexrate", "-vv", "rate", "grid.json", "--hex", "7", "--driver", "--parent"]);
        assert_eq!(cli.verbose, 2);
        let Commands::Rate(args) = cli.command else { panic!("expected rate") };
        let persona = Persona::from(&args.persona);
        assert!(persona.driver && persona.parent && !persona.builder);
    }
}
