//! Core of the dock links tray extension.
//!
//! Holds the file-backed link database and the labeled signal subscription
//! registry the extension wires its callbacks through. Translation and
//! settings-schema lookup stay with the host shell.

pub mod config;
pub mod logging;
pub mod model;
pub mod signal;
pub mod storage;

pub use config::{ConfigError, LinkStoreConfig, StoragePaths};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::link::{LinkDatabase, LinkRecord};
pub use signal::{
    DisconnectError, SignalBinding, SignalCallback, SignalHandle, SignalRegistry, SignalSource,
    UnsubscribeError, DEFAULT_SIGNAL_LABEL,
};
pub use storage::fs::{LocalFs, StorageFs};
pub use storage::{LinkStore, StoreError, StoreResult, StoreState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
