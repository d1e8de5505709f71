//! Grouped signal subscriptions with bulk teardown.
//!
//! # Responsibility
//! - Subscribe callbacks through each object's own `SignalSource` capability.
//! - File the resulting handles under a label so they can be dropped together.
//!
//! # Invariants
//! - Every stored handle came from a `subscribe` made by the registry and has
//!   not been disconnected yet.
//! - A group leaves the registry before any of its handles is unsubscribed,
//!   so no handle can be disconnected twice.

mod registry;
mod source;

pub use registry::{SignalBinding, SignalRegistry, DEFAULT_SIGNAL_LABEL};
pub use source::{DisconnectError, SignalCallback, SignalHandle, SignalSource, UnsubscribeError};
