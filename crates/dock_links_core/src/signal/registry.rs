//! Labeled signal subscription registry.

use super::source::{DisconnectError, SignalCallback, SignalHandle, SignalSource, UnsubscribeError};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Label used by `subscribe` and `subscribe_many`.
pub const DEFAULT_SIGNAL_LABEL: &str = "generic";

/// One (object, event, callback) triple to subscribe.
pub struct SignalBinding {
    pub source: Rc<dyn SignalSource>,
    pub event: String,
    pub callback: SignalCallback,
}

impl SignalBinding {
    pub fn new(
        source: Rc<dyn SignalSource>,
        event: impl Into<String>,
        callback: impl FnMut() + 'static,
    ) -> Self {
        Self {
            source,
            event: event.into(),
            callback: Box::new(callback),
        }
    }
}

struct Subscription {
    source: Rc<dyn SignalSource>,
    handle: SignalHandle,
}

/// Groups of live subscriptions keyed by label.
///
/// Teardown is explicit: dropping the registry does not disconnect anything.
#[derive(Default)]
pub struct SignalRegistry {
    groups: BTreeMap<String, Vec<Subscription>>,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes one callback under the `generic` label.
    pub fn subscribe(
        &mut self,
        source: Rc<dyn SignalSource>,
        event: &str,
        callback: impl FnMut() + 'static,
    ) {
        self.subscribe_many(std::iter::once(SignalBinding::new(source, event, callback)));
    }

    /// Subscribes every binding under the `generic` label.
    pub fn subscribe_many(&mut self, bindings: impl IntoIterator<Item = SignalBinding>) {
        self.subscribe_many_with_label(DEFAULT_SIGNAL_LABEL, bindings);
    }

    /// Subscribes every binding under `label`, in iteration order.
    ///
    /// An empty `bindings` leaves the registry untouched.
    pub fn subscribe_many_with_label(
        &mut self,
        label: &str,
        bindings: impl IntoIterator<Item = SignalBinding>,
    ) {
        let mut bindings = bindings.into_iter().peekable();
        if bindings.peek().is_none() {
            return;
        }

        let group = self.groups.entry(label.to_string()).or_default();
        for binding in bindings {
            let handle = binding.source.subscribe(&binding.event, binding.callback);
            group.push(Subscription {
                source: binding.source,
                handle,
            });
        }
        debug!(
            "event=signal_subscribe module=signal status=ok label={} handles={}",
            label,
            group.len()
        );
    }

    /// Disconnects every handle filed under `label` and forgets the group.
    ///
    /// Unknown labels are a no-op. A failing handle does not stop the rest
    /// of the group from being disconnected.
    pub fn disconnect_label(&mut self, label: &str) -> Result<(), DisconnectError> {
        let Some(group) = self.groups.remove(label) else {
            return Ok(());
        };

        let failures = disconnect_group(label, group);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DisconnectError {
                failures: failures
                    .into_iter()
                    .map(|failure| (label.to_string(), failure))
                    .collect(),
            })
        }
    }

    /// Disconnects every group, in label order, leaving the registry empty.
    pub fn disconnect_all(&mut self) -> Result<(), DisconnectError> {
        let groups = std::mem::take(&mut self.groups);
        let mut failures = Vec::new();
        for (label, group) in groups {
            for failure in disconnect_group(&label, group) {
                failures.push((label.clone(), failure));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DisconnectError { failures })
        }
    }

    /// Labels with at least one live subscription, sorted.
    pub fn labels(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    /// Live handles under `label`; `0` for unknown labels.
    pub fn handle_count(&self, label: &str) -> usize {
        self.groups.get(label).map_or(0, Vec::len)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn disconnect_group(label: &str, group: Vec<Subscription>) -> Vec<UnsubscribeError> {
    let total = group.len();
    let mut failures = Vec::new();
    for subscription in group {
        if let Err(err) = subscription.source.unsubscribe(subscription.handle) {
            failures.push(err);
        }
    }

    if failures.is_empty() {
        debug!(
            "event=signal_disconnect module=signal status=ok label={} handles={}",
            label, total
        );
    } else {
        warn!(
            "event=signal_disconnect module=signal status=error label={} handles={} failed={}",
            label,
            total,
            failures.len()
        );
    }
    failures
}
