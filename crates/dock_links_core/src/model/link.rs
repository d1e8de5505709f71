//! Link records and the ordered database that holds them.

use serde::{Deserialize, Serialize};

/// Schema marker written into freshly seeded databases.
pub const DEFAULT_SCHEMA_ID: i64 = 1;
/// Target of the single record a fresh database is seeded with.
pub const DEFAULT_LINK_TARGET: &str = "/home/";

/// One entry of the links tray.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkRecord {
    /// Display/sort position. Intended to be unique, not enforced.
    pub order: i64,
    /// Filesystem path or URI. Serialized as `link`.
    #[serde(rename = "link")]
    pub target: String,
}

impl LinkRecord {
    pub fn new(order: i64, target: impl Into<String>) -> Self {
        Self {
            order,
            target: target.into(),
        }
    }
}

/// The whole on-disk document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkDatabase {
    /// Schema/version marker of the stored document.
    pub id: i64,
    pub links: Vec<LinkRecord>,
}

impl LinkDatabase {
    /// Empty database carrying only its schema marker.
    pub fn new(id: i64) -> Self {
        Self { id, links: vec![] }
    }

    /// Seed content written when no database file exists yet.
    ///
    /// # Invariants
    /// - Holds exactly one record with `order = 1`.
    pub fn seed(id: i64, default_target: impl Into<String>) -> Self {
        Self {
            id,
            links: vec![LinkRecord::new(1, default_target)],
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkRecord> {
        self.links.iter()
    }

    /// Appends a record as-is, keeping insertion order.
    pub fn push(&mut self, record: LinkRecord) {
        self.links.push(record);
    }

    /// Appends `target` after the highest existing `order`.
    pub fn push_target(&mut self, target: impl Into<String>) -> &LinkRecord {
        let order = self.next_order();
        self.links.push(LinkRecord::new(order, target));
        &self.links[self.links.len() - 1]
    }

    /// `max(order) + 1`, or `1` for an empty database.
    pub fn next_order(&self) -> i64 {
        self.links
            .iter()
            .map(|record| record.order)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    /// Removes the record at `index`; `None` when out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<LinkRecord> {
        if index < self.links.len() {
            Some(self.links.remove(index))
        } else {
            None
        }
    }

    /// Removes every record pointing at `target` and returns how many went.
    pub fn remove_target(&mut self, target: &str) -> usize {
        let before = self.links.len();
        self.links.retain(|record| record.target != target);
        before - self.links.len()
    }

    /// Re-sorts by `order`. Stable, so equal orders keep insertion order.
    pub fn sort_by_order(&mut self) {
        self.links.sort_by_key(|record| record.order);
    }
}

impl Default for LinkDatabase {
    fn default() -> Self {
        Self::seed(DEFAULT_SCHEMA_ID, DEFAULT_LINK_TARGET)
    }
}
