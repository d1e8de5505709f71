//! Capability contract for objects that emit signals.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque connection id handed out by a `SignalSource`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignalHandle(pub u64);

impl Display for SignalHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Callback attached to one signal. Host loops run callbacks on a single
/// thread, so no `Send` bound is required.
pub type SignalCallback = Box<dyn FnMut()>;

/// Object that can connect and disconnect named signal callbacks.
pub trait SignalSource {
    fn subscribe(&self, event: &str, callback: SignalCallback) -> SignalHandle;
    fn unsubscribe(&self, handle: SignalHandle) -> Result<(), UnsubscribeError>;
}

/// Raised by a source that no longer knows `handle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsubscribeError {
    pub handle: SignalHandle,
    pub reason: String,
}

impl UnsubscribeError {
    pub fn new(handle: SignalHandle, reason: impl Into<String>) -> Self {
        Self {
            handle,
            reason: reason.into(),
        }
    }
}

impl Display for UnsubscribeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to disconnect handle {}: {}", self.handle, self.reason)
    }
}

impl Error for UnsubscribeError {}

/// Every unsubscribe failure raised while tearing down groups.
///
/// Handles that failed are still gone from the registry; the remaining
/// handles of the same teardown were disconnected regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectError {
    pub failures: Vec<(String, UnsubscribeError)>,
}

impl Display for DisconnectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} signal handle(s) failed to disconnect", self.failures.len())?;
        for (label, failure) in &self.failures {
            write!(f, "; [{label}] {failure}")?;
        }
        Ok(())
    }
}

impl Error for DisconnectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.failures
            .first()
            .map(|(_, failure)| failure as &(dyn Error + 'static))
    }
}
