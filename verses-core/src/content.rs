//! Editorial text shown for a clicked node.
//!
//! The catalog is plain data keyed by [`NodeId`]. Nodes without an entry
//! get a generic description built from their id and position, so a lookup
//! never fails.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::NodeId,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: NodeId,
    pub title: String,
    /// Grammatical label printed before the definition, e.g. `n.`
    #[serde(default)]
    pub part_of_speech: Option<String>,
    pub definition: String,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: BTreeMap<NodeId, Entry>,
}

/// What the modal shows for one node.
#[derive(Clone, Debug, PartialEq)]
pub enum Description<'a> {
    Curated(&'a Entry),
    Fallback { heading: String, detail: String },
}

impl Catalog {
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for entry in entries {
            let id = entry.id;
            if map.insert(id, entry).is_some() {
                return Err(Error::DuplicateEntry { id });
            }
        }
        Ok(Self { entries: map })
    }

    /// Parses a JSON array of [`Entry`] values.
    pub fn from_json(text: &str) -> Result<Self> {
        let entries: Vec<Entry> = serde_json::from_str(text)?;
        Self::from_entries(entries)
    }

    pub fn get(&self, id: NodeId) -> Option<&Entry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up `id`, falling back to its id and `pos` (two decimals).
    pub fn describe(&self, id: NodeId, pos: Vec2) -> Description<'_> {
        match self.get(id) {
            Some(entry) => Description::Curated(entry),
            None => Description::Fallback {
                heading: format!("Node {id}"),
                detail: format!("Position: ({:.2}, {:.2})", pos.x, pos.y),
            },
        }
    }
}
