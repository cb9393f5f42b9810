//! # Snippet Ref
//!
//! The channel a snippet uses to tell its owner what it wants.
//!
//! ## Philosophy
//!
//! - **One ref per snippet**: The owner creates a [`SnippetRef`] and hands it to exactly
//!   one snippet; it is not `Clone`
//! - **Typed intents**: Snippets emit [`SnippetEvent`]s, never reach into their siblings
//! - **Synchronous and ordered**: Every current listener sees an event, in subscription
//!   order, before [`SnippetRef::emit`] returns
//! - **Fire and forget**: Emitting with nobody listening is not an error
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A buffered queue (late subscribers see nothing that came before)
//! - Thread-safe (all delivery happens on the UI thread)

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;
use uuid::Uuid;

/// Identity of a [`SnippetRef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnippetRefId(Uuid);

impl SnippetRefId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SnippetRefId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnippetRefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ref:{}", self.0)
    }
}

/// Navigation intent a snippet can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnippetEventName {
    /// Delete the emitting snippet
    RemoveThis,
    /// Give focus to the snippet above
    MoveFocusToPrevious,
    /// Give focus to the snippet below
    MoveFocusToNext,
}

impl fmt::Display for SnippetEventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoveThis => write!(f, "REMOVE_THIS"),
            Self::MoveFocusToPrevious => write!(f, "MOVE_FOCUS_TO_PREVIOUS"),
            Self::MoveFocusToNext => write!(f, "MOVE_FOCUS_TO_NEXT"),
        }
    }
}

/// An intent paired with the ref that raised it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnippetEvent {
    pub name: SnippetEventName,
    pub source: SnippetRefId,
}

impl SnippetEvent {
    pub fn new(name: SnippetEventName, source: &SnippetRef) -> Self {
        Self {
            name,
            source: source.id(),
        }
    }
}

type Listener = Rc<dyn Fn(&SnippetEvent)>;

#[derive(Default)]
struct ListenerRegistry {
    next_listener_id: u64,
    listeners: Vec<(u64, Listener)>,
}

impl ListenerRegistry {
    fn contains(&self, listener_id: u64) -> bool {
        self.listeners.iter().any(|(id, _)| *id == listener_id)
    }
}

/// Per-snippet event channel
pub struct SnippetRef {
    id: SnippetRefId,
    registry: Rc<RefCell<ListenerRegistry>>,
}

impl SnippetRef {
    pub fn new() -> Self {
        Self {
            id: SnippetRefId::new(),
            registry: Rc::new(RefCell::new(ListenerRegistry::default())),
        }
    }

    pub fn id(&self) -> SnippetRefId {
        self.id
    }

    /// Subscription side of this channel
    pub fn events(&self) -> SnippetEventStream {
        SnippetEventStream {
            source: self.id,
            registry: Rc::clone(&self.registry),
        }
    }

    /// Delivers an event to every current listener.
    ///
    /// Returns the number of listeners that received it. Listeners removed
    /// while the event is being delivered do not receive it.
    pub fn emit(&self, event: SnippetEvent) -> usize {
        let snapshot: Vec<(u64, Listener)> = self.registry.borrow().listeners.clone();

        let mut delivered = 0;
        for (listener_id, listener) in snapshot {
            if !self.registry.borrow().contains(listener_id) {
                continue;
            }
            listener(&event);
            delivered += 1;
        }

        trace!(source = %self.id, event = %event.name, delivered, "snippet event emitted");
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

impl Default for SnippetRef {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for SnippetRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SnippetRef {}

impl fmt::Debug for SnippetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnippetRef")
            .field("id", &self.id)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Multicast, replay-free stream of a ref's events
#[derive(Clone)]
pub struct SnippetEventStream {
    source: SnippetRefId,
    registry: Rc<RefCell<ListenerRegistry>>,
}

impl SnippetEventStream {
    /// Registers a listener for events emitted from now on
    pub fn subscribe(&self, listener: impl Fn(&SnippetEvent) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let listener_id = registry.next_listener_id;
        registry.next_listener_id += 1;
        registry.listeners.push((listener_id, Rc::new(listener)));

        trace!(source = %self.source, listener_id, "snippet listener subscribed");
        Subscription {
            source: self.source,
            listener_id,
            registry: Rc::downgrade(&self.registry),
        }
    }
}

impl fmt::Debug for SnippetEventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnippetEventStream")
            .field("source", &self.source)
            .finish()
    }
}

/// Handle to one registered listener
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to stop delivery.
#[derive(Debug)]
pub struct Subscription {
    source: SnippetRefId,
    listener_id: u64,
    registry: Weak<RefCell<ListenerRegistry>>,
}

impl Subscription {
    /// Ref this subscription listens to
    pub fn source(&self) -> SnippetRefId {
        self.source
    }

    /// Returns true while the listener is registered and its ref still exists
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.borrow().contains(self.listener_id))
            .unwrap_or(false)
    }

    /// Stops delivery to this listener immediately
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.listener_id);
            trace!(source = %self.source, listener_id = self.listener_id, "snippet listener unsubscribed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder() -> (Rc<RefCell<Vec<SnippetEvent>>>, impl Fn(&SnippetEvent) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |event: &SnippetEvent| sink.borrow_mut().push(*event))
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let snippet_ref = SnippetRef::new();
        let delivered = snippet_ref.emit(SnippetEvent::new(SnippetEventName::RemoveThis, &snippet_ref));
        assert_eq!(delivered, 0);
    }

    #[test]
    fn test_event_carries_ref_identity() {
        let a = SnippetRef::new();
        let b = SnippetRef::new();

        let event = SnippetEvent::new(SnippetEventName::MoveFocusToNext, &a);
        assert_eq!(event, SnippetEvent::new(SnippetEventName::MoveFocusToNext, &a));
        assert_ne!(event, SnippetEvent::new(SnippetEventName::MoveFocusToNext, &b));
        assert_ne!(event, SnippetEvent::new(SnippetEventName::MoveFocusToPrevious, &a));
    }

    #[test]
    fn test_multicast_in_subscription_order() {
        let snippet_ref = SnippetRef::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second"] {
            let order = Rc::clone(&order);
            let _ = snippet_ref
                .events()
                .subscribe(move |_event: &SnippetEvent| order.borrow_mut().push(tag));
        }

        let delivered = snippet_ref.emit(SnippetEvent::new(SnippetEventName::RemoveThis, &snippet_ref));
        assert_eq!(delivered, 2);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_events_delivered_in_emission_order() {
        let snippet_ref = SnippetRef::new();
        let (seen, listener) = recorder();
        let _subscription = snippet_ref.events().subscribe(listener);

        snippet_ref.emit(SnippetEvent::new(SnippetEventName::MoveFocusToPrevious, &snippet_ref));
        snippet_ref.emit(SnippetEvent::new(SnippetEventName::MoveFocusToNext, &snippet_ref));

        let names: Vec<SnippetEventName> = seen.borrow().iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec![
                SnippetEventName::MoveFocusToPrevious,
                SnippetEventName::MoveFocusToNext
            ]
        );
    }

    #[test]
    fn test_no_replay_for_late_subscribers() {
        let snippet_ref = SnippetRef::new();
        snippet_ref.emit(SnippetEvent::new(SnippetEventName::RemoveThis, &snippet_ref));

        let (seen, listener) = recorder();
        let _subscription = snippet_ref.events().subscribe(listener);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let snippet_ref = SnippetRef::new();
        let (seen, listener) = recorder();
        let subscription = snippet_ref.events().subscribe(listener);
        assert!(subscription.is_active());

        subscription.unsubscribe();
        assert_eq!(snippet_ref.listener_count(), 0);

        snippet_ref.emit(SnippetEvent::new(SnippetEventName::RemoveThis, &snippet_ref));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe_during_delivery() {
        let snippet_ref = SnippetRef::new();
        let late_calls = Rc::new(Cell::new(0));
        let pending: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let to_cancel = Rc::clone(&pending);
        let _first = snippet_ref.events().subscribe(move |_event: &SnippetEvent| {
            if let Some(subscription) = to_cancel.borrow_mut().take() {
                subscription.unsubscribe();
            }
        });

        let counter = Rc::clone(&late_calls);
        let second = snippet_ref
            .events()
            .subscribe(move |_event: &SnippetEvent| counter.set(counter.get() + 1));
        *pending.borrow_mut() = Some(second);

        let delivered = snippet_ref.emit(SnippetEvent::new(SnippetEventName::RemoveThis, &snippet_ref));
        assert_eq!(delivered, 1);
        assert_eq!(late_calls.get(), 0);
    }

    #[test]
    fn test_subscription_inactive_after_ref_dropped() {
        let snippet_ref = SnippetRef::new();
        let subscription = snippet_ref.events().subscribe(|_event: &SnippetEvent| {});
        assert_eq!(subscription.source(), snippet_ref.id());

        drop(snippet_ref);
        assert!(!subscription.is_active());
        subscription.unsubscribe();
    }

    #[test]
    fn test_event_name_serialization() {
        let json = serde_json::to_string(&SnippetEventName::MoveFocusToPrevious).unwrap();
        assert_eq!(json, "\"MOVE_FOCUS_TO_PREVIOUS\"");
        assert_eq!(SnippetEventName::RemoveThis.to_string(), "REMOVE_THIS");
    }
}
