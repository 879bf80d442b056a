use anyhow::Result;
use tracing::info;

use crate::cli::GridArgs;
use crate::grid::{Boundary, GridConfig, generate_grid};

pub fn run(_cli: &crate::cli::Cli, args: &GridArgs) -> Result<()> {
    super::check_output(&args.out)?;

    let config = GridConfig {
        radius_km: args.radius_km,
        lat_min: args.lat_min,
        lat_max: args.lat_max,
        lon_min: args.lon_min,
        lon_max: args.lon_max,
    };

    let boundary = match &args.boundary {
        Some(path) => Boundary::read(path)?,
        None => Boundary::moscow()?,
    };

    info!("[grid] radius={}km -> {}", config.radius_km, args.out.output.display());

    let grid = generate_grid(&config, &boundary)?;
    info!("[grid] kept {} hexagons inside the boundary", grid.len());

    grid.write_json(&args.out.output)?;
    println!("Wrote {} hexagons -> {}", grid.len(), args.out.output.display());
    Ok(())
}
