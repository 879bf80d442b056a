use anyhow::Result;
use tracing::info;

use crate::attach::{LineColumns, apply_pedestrian};
use crate::cli::LineArgs;

pub fn run(_cli: &crate::cli::Cli, args: &LineArgs) -> Result<()> {
    info!("[pedestrian] grid={} edges={} -> {}", args.grid.display(), args.table.display(), args.out.output.display());
    super::line_pass("pedestrian", args, LineColumns::PEDESTRIAN, apply_pedestrian)
}
