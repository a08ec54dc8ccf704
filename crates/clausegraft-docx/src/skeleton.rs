//! Identity map: stable id → paragraph handle, independent of tree shape.

use std::collections::HashMap;

use tracing::warn;

use crate::document::{DocxDocument, ParaKey};

#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    by_id: HashMap<String, ParaKey>,
}

impl IdentityMap {
    /// One linear pass over the paragraph stream.
    ///
    /// Paragraphs without an id are not addressable. Duplicate ids resolve to
    /// the last paragraph carrying them.
    pub fn build(doc: &DocxDocument) -> Self {
        let mut map = Self::default();
        for (key, paragraph) in doc.paragraphs() {
            let Some(id) = paragraph.stable_id() else {
                continue;
            };
            if let Some(previous) = map.by_id.insert(id.clone(), key) {
                warn!(%id, ?previous, ?key, "duplicate paragraph id, last occurrence wins");
            }
        }
        map
    }

    pub fn lookup(&self, id: &str) -> Option<ParaKey> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn all_ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(String::as_str)
    }

    pub fn register(&mut self, id: String, key: ParaKey) {
        self.by_id.insert(id, key);
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
