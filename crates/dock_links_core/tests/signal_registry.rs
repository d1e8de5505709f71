use dock_links_core::{
    SignalBinding, SignalCallback, SignalHandle, SignalRegistry, SignalSource, UnsubscribeError,
};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

#[derive(Default)]
struct CountingSource {
    next_id: Cell<u64>,
    live: RefCell<BTreeSet<u64>>,
    unsubscribe_calls: Cell<usize>,
}

impl SignalSource for CountingSource {
    fn subscribe(&self, _event: &str, _callback: SignalCallback) -> SignalHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.live.borrow_mut().insert(id);
        SignalHandle(id)
    }

    fn unsubscribe(&self, handle: SignalHandle) -> Result<(), UnsubscribeError> {
        self.unsubscribe_calls.set(self.unsubscribe_calls.get() + 1);
        if self.live.borrow_mut().remove(&handle.0) {
            Ok(())
        } else {
            Err(UnsubscribeError::new(handle, "already disconnected"))
        }
    }
}

#[test]
fn disconnect_generic_after_subscribe_many_unsubscribes_n_handles() {
    let source = Rc::new(CountingSource::default());
    let mut registry = SignalRegistry::new();
    let bindings: Vec<SignalBinding> = (0..5)
        .map(|i| SignalBinding::new(source.clone(), format!("event-{i}"), || {}))
        .collect();

    registry.subscribe_many(bindings);
    assert_eq!(registry.handle_count("generic"), 5);

    registry.disconnect_label("generic").unwrap();

    assert_eq!(source.unsubscribe_calls.get(), 5);
    assert!(source.live.borrow().is_empty());
    assert!(!registry.labels().contains(&"generic".to_string()));
}

#[test]
fn disconnect_all_then_again_never_double_disconnects() {
    let source = Rc::new(CountingSource::default());
    let mut registry = SignalRegistry::new();
    registry.subscribe(source.clone(), "a", || {});
    registry.subscribe_many_with_label("tray", [SignalBinding::new(source.clone(), "b", || {})]);

    registry.disconnect_all().unwrap();
    registry.disconnect_all().unwrap();
    registry.disconnect_label("tray").unwrap();

    assert_eq!(source.unsubscribe_calls.get(), 2);
    assert!(registry.is_empty());
}

#[test]
fn disconnect_all_reports_failures_from_every_group() {
    let source = Rc::new(CountingSource::default());
    let mut registry = SignalRegistry::new();
    registry.subscribe(source.clone(), "a", || {});
    registry.subscribe_many_with_label("tray", [SignalBinding::new(source.clone(), "b", || {})]);
    source.live.borrow_mut().clear();

    let err = registry.disconnect_all().unwrap_err();

    let labels: Vec<&str> = err.failures.iter().map(|(label, _)| label.as_str()).collect();
    assert_eq!(labels, vec!["generic", "tray"]);
    assert!(err.to_string().contains("2 signal handle(s) failed"));
    assert!(registry.is_empty());
}
