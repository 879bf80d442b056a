pub mod grid;
pub mod neighbors;
pub mod pedestrian;
pub mod rate;
pub mod roads;
pub mod stops;

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::info;

use crate::attach::{
    CheckpointStore, EdgeAggregate, JoinOptions, LineColumns, PassSummary, attach_lines, read_line_features,
};
use crate::cli::{LineArgs, OutputArgs};
use crate::geom::HexIndex;
use crate::grid::Grid;
use crate::io::csv::CsvOptions;

/// Reject stdout and refuse to clobber an existing file unless forced.
pub(crate) fn check_output(out: &OutputArgs) -> Result<()> {
    if out.output == Path::new("-") { bail!("stdout is not supported."); }
    if out.output.exists() && !out.force {
        bail!("{} already exists (pass --force to overwrite)", out.output.display());
    }
    Ok(())
}

fn checkpoint_path(args: &LineArgs) -> Option<PathBuf> {
    if args.no_checkpoint { return None }
    args.checkpoint.clone().or_else(|| {
        let mut name = args.out.output.file_name()?.to_os_string();
        name.push(".checkpoint.json");
        Some(args.out.output.with_file_name(name))
    })
}

/// Shared driver for the roads and pedestrian passes.
pub(crate) fn line_pass(
    pass: &str,
    args: &LineArgs,
    columns: LineColumns,
    apply: impl FnOnce(&mut Grid, &EdgeAggregate),
) -> Result<()> {
    check_output(&args.out)?;

    let options = JoinOptions {
        downsample: usize::try_from(args.downsample).unwrap_or(usize::MAX),
        checkpoint_interval: args.checkpoint_interval,
        checkpoint: checkpoint_path(args),
    };

    let mut grid = Grid::read_json(&args.grid)?;
    let index = HexIndex::new(&grid);

    let mut summary = PassSummary::default();
    let features = read_line_features(&args.table, &CsvOptions::graph_export(), columns, options.downsample, &mut summary)?;
    info!("[{pass}] {} features after filtering", features.len());

    let state = attach_lines(&features, &index, &options, &mut summary)?;
    apply(&mut grid, &state);
    grid.write_json(&args.out.output)?;

    if let Some(path) = &options.checkpoint {
        CheckpointStore::new(path).remove()?;
    }

    summary.log(pass);
    println!("Wrote {} hexagons -> {}", grid.len(), args.out.output.display());
    Ok(())
}
