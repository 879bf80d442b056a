use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::common::write_json_atomic;
use super::{HexId, Hexagon};

/// Ordered collection of hexagons keyed by id. Serialises as the grid file:
/// a JSON object mapping id to hexagon record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    hexagons: BTreeMap<HexId, Hexagon>,
}

impl Grid {
    #[inline] pub fn len(&self) -> usize { self.hexagons.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.hexagons.is_empty() }

    #[inline] pub fn get(&self, id: &HexId) -> Option<&Hexagon> { self.hexagons.get(id) }

    #[inline] pub fn get_mut(&mut self, id: &HexId) -> Option<&mut Hexagon> { self.hexagons.get_mut(id) }

    pub fn insert(&mut self, id: HexId, hexagon: Hexagon) -> Option<Hexagon> {
        self.hexagons.insert(id, hexagon)
    }

    /// Iterate hexagons in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&HexId, &Hexagon)> { self.hexagons.iter() }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&HexId, &mut Hexagon)> { self.hexagons.iter_mut() }

    pub fn ids(&self) -> impl Iterator<Item = &HexId> { self.hexagons.keys() }

    /// Load a grid (or enriched grid) file.
    pub fn read_json(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("[grid::read] Failed to open grid file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("[grid::read] Failed to parse grid file: {}", path.display()))
    }

    /// Atomically write the grid to `path` as indented JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)
            .with_context(|| format!("[grid::write] Failed to write grid file: {}", path.display()))
    }
}

impl FromIterator<(HexId, Hexagon)> for Grid {
    fn from_iter<I: IntoIterator<Item = (HexId, Hexagon)>>(iter: I) -> Self {
        Self { hexagons: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");

        let mut grid = Grid::default();
        let mut hexagon = Hexagon::new([37.6, 55.7], vec![[37.61, 55.7]; 6]);
        hexagon.stop_count = Some(3);
        grid.insert(HexId::new("2"), hexagon);
        grid.insert(HexId::new("10"), Hexagon::new([37.7, 55.7], vec![]));
        grid.write_json(&path).unwrap();

        let back = Grid::read_json(&path).unwrap();
        assert_eq!(back, grid);
        assert_eq!(back.ids().map(HexId::as_str).collect::<Vec<_>>(), vec!["2", "10"]);
    }

    #[test]
    fn missing_or_invalid_grid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Grid::read_json(&dir.path().join("absent.json")).is_err());

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"1\": {\"center\": ").unwrap();
        assert!(Grid::read_json(&path).is_err());
    }
}
