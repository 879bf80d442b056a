use anyhow::Result;
use tracing::info;

use crate::attach::{PassSummary, apply_stops, attach_stops, read_stop_records};
use crate::cli::StopsArgs;
use crate::geom::HexIndex;
use crate::grid::Grid;
use crate::io::csv::CsvOptions;

pub fn run(_cli: &crate::cli::Cli, args: &StopsArgs) -> Result<()> {
    super::check_output(&args.out)?;

    info!("[stops] grid={} schedule={} -> {}", args.grid.display(), args.table.display(), args.out.output.display());

    let mut grid = Grid::read_json(&args.grid)?;
    let index = HexIndex::new(&grid);

    let mut summary = PassSummary::default();
    let records = read_stop_records(&args.table, &CsvOptions::schedule_export(), &mut summary)?;
    let tallies = attach_stops(&records, &index, &mut summary);

    apply_stops(&mut grid, &tallies);
    grid.write_json(&args.out.output)?;

    summary.log("stops");
    println!("Wrote {} hexagons -> {}", grid.len(), args.out.output.display());
    Ok(())
}
