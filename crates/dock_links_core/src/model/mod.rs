//! Link database model persisted by the link store.
//!
//! # Responsibility
//! - Define the records the links tray renders and reorders.
//! - Own the exact JSON document shape written to disk.
//!
//! # Invariants
//! - A `LinkDatabase` always serializes to
//!   `{ "id": <int>, "links": [ { "order": <int>, "link": <string> } ] }`.
//! - Insertion order of `links` is authoritative unless re-sorted by `order`.

pub mod link;
