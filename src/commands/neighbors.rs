use anyhow::Result;
use tracing::info;

use crate::cli::NeighborsArgs;
use crate::grid::{Grid, resolve_neighbors};

pub fn run(_cli: &crate::cli::Cli, args: &NeighborsArgs) -> Result<()> {
    super::check_output(&args.out)?;

    info!("[neighbors] grid={} -> {}", args.grid.display(), args.out.output.display());

    let mut grid = Grid::read_json(&args.grid)?;
    let pairs = resolve_neighbors(&mut grid);
    info!("[neighbors] {pairs} adjacent pairs across {} hexagons", grid.len());

    grid.write_json(&args.out.output)?;
    println!("Wrote {} hexagons -> {}", grid.len(), args.out.output.display());
    Ok(())
}
