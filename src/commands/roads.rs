use anyhow::Result;
use tracing::info;

use crate::attach::{LineColumns, apply_roads};
use crate::cli::LineArgs;

pub fn run(_cli: &crate::cli::Cli, args: &LineArgs) -> Result<()> {
    info!("[roads] grid={} edges={} -> {}", args.grid.display(), args.table.display(), args.out.output.display());
    super::line_pass("roads", args, LineColumns::ROADS, apply_roads)
}
