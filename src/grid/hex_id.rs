use std::{cmp::Ordering, fmt, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable key for a hexagon within one grid file.
/// Ids are kept as text, since grid files use string keys and downstream
/// storage may assign non-numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexId(Arc<str>);

impl HexId {
    pub fn new(id: impl AsRef<str>) -> Self { Self(Arc::from(id.as_ref())) }

    /// Sequential id as assigned by the grid generator.
    pub fn from_index(index: usize) -> Self { Self(Arc::from(index.to_string())) }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }

    /// Plain decimal ids without leading zeros compare numerically.
    fn is_numeric(&self) -> bool {
        !self.0.is_empty()
            && self.0.bytes().all(|b| b.is_ascii_digit())
            && !(self.0.len() > 1 && self.0.starts_with('0'))
    }
}

impl Ord for HexId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_numeric(), other.is_numeric()) {
            (true, true) => self.0.len().cmp(&other.0.len()).then_with(|| self.0.cmp(&other.0)),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for HexId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl fmt::Display for HexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for HexId {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl Serialize for HexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for HexId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Neighbour lists written by other tools may hold bare integers.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw { Text(String), Number(u64) }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self::new(text),
            Raw::Number(n) => Self::new(n.to_string()),
        })
    }
}
