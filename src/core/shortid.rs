//! Short ID system for easier entity selection
//!
//! Provides session-local aliases like `PROJ@1`, `PART@2` (or just `@2`) that
//! map to full entity IDs. They are never persisted: each index is rebuilt
//! from catalog order on every run, so a given catalog always yields the
//! same aliases.

use std::collections::HashMap;

use crate::core::identity::{EntityId, EntityPrefix};

/// A mapping of short IDs (PREFIX@N) to full entity IDs for one entity type
#[derive(Debug, Clone)]
pub struct ShortIdIndex {
    prefix: EntityPrefix,
    /// Maps short number to full entity ID string
    entries: HashMap<u32, String>,
    /// Maps full entity ID to short number (reverse lookup)
    reverse: HashMap<String, u32>,
    /// Next available short ID
    next_id: u32,
}

impl ShortIdIndex {
    /// Create a new empty index
    pub fn new(prefix: EntityPrefix) -> Self {
        Self {
            prefix,
            entries: HashMap::new(),
            reverse: HashMap::new(),
            next_id: 1,
        }
    }

    /// Build an index numbering the given IDs from 1 in iteration order
    pub fn from_ids<'a>(prefix: EntityPrefix, ids: impl IntoIterator<Item = &'a EntityId>) -> Self {
        let mut index = Self::new(prefix);
        for id in ids {
            index.add(id.to_string());
        }
        index
    }

    /// Add an entity ID and return its short ID
    pub fn add(&mut self, entity_id: String) -> u32 {
        if let Some(&short_id) = self.reverse.get(&entity_id) {
            return short_id;
        }

        let short_id = self.next_id;
        self.next_id += 1;
        self.entries.insert(short_id, entity_id.clone());
        self.reverse.insert(entity_id, short_id);
        short_id
    }

    /// Resolve a short ID reference to a full entity ID
    ///
    /// Accepts:
    /// - `PREFIX@N` format (e.g., `PROJ@1`), prefix case-insensitive
    /// - `@N` format (e.g., `@1`, `@42`)
    /// - Anything else is passed through unchanged
    ///
    /// Returns `None` only for a well-formed short reference with no entry
    /// (or one carrying another entity type's prefix).
    pub fn resolve(&self, reference: &str) -> Option<String> {
        let Some((prefix, num_str)) = reference.split_once('@') else {
            return Some(reference.to_string());
        };

        if !prefix.is_empty() && !prefix.eq_ignore_ascii_case(self.prefix.as_str()) {
            return None;
        }

        num_str
            .parse::<u32>()
            .ok()
            .and_then(|n| self.entries.get(&n).cloned())
    }

    /// Get the short reference (e.g., "PROJ@3") for a full entity ID
    pub fn get_short_id(&self, entity_id: &str) -> Option<String> {
        self.reverse
            .get(entity_id)
            .map(|n| format!("{}@{}", self.prefix, n))
    }

    /// Number of entries in the index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
