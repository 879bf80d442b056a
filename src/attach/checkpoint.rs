//! Durable partial results for the line join.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{common::write_json_atomic, grid::HexId};

/// Edges attributed to one hexagon so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTally {
    #[serde(default)]
    pub roads: Vec<String>,
    #[serde(default)]
    pub type_road: BTreeMap<String, u32>,
}

impl EdgeTally {
    pub(crate) fn record(&mut self, edge_id: &str, category: &str) {
        self.roads.push(edge_id.to_string());
        *self.type_road.entry(category.to_string()).or_default() += 1;
    }
}

/// State of a line join: which feature ids are final, and what they
/// contributed. Every processed id's contribution is already in `hexagons`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeAggregate {
    pub processed: BTreeSet<String>,
    pub hexagons: BTreeMap<HexId, EdgeTally>,
}

impl EdgeAggregate {
    /// Build from a bare `{hex_id: {roads, type_road}}` mapping, treating
    /// every listed edge as processed.
    fn from_tallies(hexagons: BTreeMap<HexId, EdgeTally>) -> Self {
        let processed = hexagons.values()
            .flat_map(|tally| tally.roads.iter().cloned())
            .collect();
        Self { processed, hexagons }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CheckpointFile {
    Full(EdgeAggregate),
    Bare(BTreeMap<HexId, EdgeTally>),
}

/// Checkpoint file at a fixed path.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    #[inline] pub fn path(&self) -> &Path { &self.path }

    /// Previously saved state, if any. An unreadable checkpoint is reported
    /// and ignored so the pass restarts from scratch.
    pub fn load(&self) -> Option<EdgeAggregate> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("ignoring unreadable checkpoint {}: {e}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str::<CheckpointFile>(&text) {
            Ok(CheckpointFile::Full(state)) => {
                info!("resuming from {} ({} edges done)", self.path.display(), state.processed.len());
                Some(state)
            }
            Ok(CheckpointFile::Bare(tallies)) => {
                let state = EdgeAggregate::from_tallies(tallies);
                info!("resuming from {} ({} edges done)", self.path.display(), state.processed.len());
                Some(state)
            }
            Err(e) => {
                warn!("ignoring corrupt checkpoint {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Replace the checkpoint atomically.
    pub fn save(&self, state: &EdgeAggregate) -> Result<()> {
        write_json_atomic(&self.path, state)
            .with_context(|| format!("[attach::checkpoint] Failed to save {}", self.path.display()))
    }

    /// Delete the checkpoint once the final output exists.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e)
                .with_context(|| format!("[attach::checkpoint] Failed to remove {}", self.path.display())),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EdgeAggregate {
        let mut state = EdgeAggregate::default();
        state.hexagons.entry(HexId::new("7")).or_default().record("e1", "3");
        state.processed.extend(["e1".to_string(), "e2".to_string()]);
        state
    }

    #[test]
    fn saved_state_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("ckpt.json"));
        store.save(&sample()).unwrap();
        assert_eq!(store.load(), Some(sample()));
    }

    #[test]
    fn absent_checkpoint_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("missing.json"));
        assert_eq!(store.load(), None);
        assert!(store.remove().is_ok());
    }

    #[test]
    fn corrupt_checkpoint_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ckpt.json");
        fs::write(&path, "{\"processed\": [").unwrap();
        assert_eq!(CheckpointStore::new(&path).load(), None);
    }

    #[test]
    fn bare_mapping_marks_listed_edges_processed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ckpt.json");
        fs::write(&path, r#"{"4": {"roads": ["a", "b"], "type_road": {"3": 2}}, "9": {}}"#).unwrap();

        let state = CheckpointStore::new(&path).load().unwrap();
        assert_eq!(state.processed, BTreeSet::from(["a".to_string(), "b".to_string()]));
        assert_eq!(state.hexagons[&HexId::new("4")].type_road["3"], 2);
        assert!(state.hexagons[&HexId::new("9")].roads.is_empty());
    }

    #[test]
    fn remove_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("ckpt.json"));
        store.save(&sample()).unwrap();
        store.remove().unwrap();
        assert!(!store.path().exists());
    }
}
