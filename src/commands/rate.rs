use anyhow::Result;
use serde_json::json;
use tracing::info;

use crate::cli::RateArgs;
use crate::grid::{Grid, HexId};
use crate::rating::{Persona, get_rating, rate_all};

pub fn run(_cli: &crate::cli::Cli, args: &RateArgs) -> Result<()> {
    let grid = Grid::read_json(&args.grid)?;
    let persona = Persona::from(&args.persona);

    info!("[rate] grid={} persona={persona:?}", args.grid.display());

    let output = match &args.hex {
        Some(id) => json!({ "rating": get_rating(&grid, &HexId::new(id), &persona)? }),
        None => serde_json::to_value(rate_all(&grid, &persona)?)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
