//! # maquette_event - Typed Event Bus
//!
//! Publish/subscribe channel registry for editor notifications:
//! - Typed events grouped into per-kind channels
//! - Subscriber tokens with explicit unsubscribe
//! - One-shot subscriptions
//! - Synchronous, in-order delivery
//!
//! The bus holds no state beyond its subscriber lists. Callbacks receive the
//! event by reference only, so a subscriber cannot re-enter the bus while a
//! delivery is in flight.

use std::collections::HashMap;
use std::hash::Hash;

/// Trait for events carried by the bus.
///
/// `Kind` is the channel discriminant: subscribers register per kind and
/// `emit` routes an event to the channel matching `event.kind()`.
pub trait Event {
    type Kind: Copy + Eq + Hash + std::fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

/// Token returned by a subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

type Callback<E> = Box<dyn FnMut(&E)>;

struct Subscriber<E> {
    id: SubscriberId,
    callback: Callback<E>,
    once: bool,
}

/// Event bus for publishing and subscribing to editor events.
pub struct EventBus<E: Event> {
    listeners: HashMap<E::Kind, Vec<Subscriber<E>>>,
    next_subscriber_id: u64,
    enabled: bool,
}

impl<E: Event> EventBus<E> {
    /// Create a new bus with no subscribers.
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_subscriber_id: 1,
            enabled: true,
        }
    }

    /// Subscribe to a channel. The callback runs on every matching emit
    /// until unsubscribed.
    pub fn on<F>(&mut self, kind: E::Kind, callback: F) -> SubscriberId
    where
        F: FnMut(&E) + 'static,
    {
        self.subscribe(kind, Box::new(callback), false)
    }

    /// Subscribe to a channel for a single delivery.
    pub fn once<F>(&mut self, kind: E::Kind, callback: F) -> SubscriberId
    where
        F: FnMut(&E) + 'static,
    {
        self.subscribe(kind, Box::new(callback), true)
    }

    fn subscribe(&mut self, kind: E::Kind, callback: Callback<E>, once: bool) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        self.listeners
            .entry(kind)
            .or_default()
            .push(Subscriber { id, callback, once });

        id
    }

    /// Remove a subscriber. Returns `false` for unknown tokens.
    pub fn off(&mut self, id: SubscriberId) -> bool {
        let mut removed = false;
        self.listeners.retain(|_, subs| {
            let before = subs.len();
            subs.retain(|s| s.id != id);
            removed |= subs.len() != before;
            !subs.is_empty()
        });
        removed
    }

    /// Deliver an event to its channel's subscribers, in subscription order.
    ///
    /// One-shot subscribers are dropped after the delivery. Emits on a
    /// disabled bus are discarded.
    pub fn emit(&mut self, event: &E) {
        if !self.enabled {
            return;
        }

        let kind = event.kind();
        if let Some(subs) = self.listeners.get_mut(&kind) {
            for sub in subs.iter_mut() {
                (sub.callback)(event);
            }
            subs.retain(|s| !s.once);
            if subs.is_empty() {
                self.listeners.remove(&kind);
            }
        }
    }

    /// Remove every subscriber on one channel, or on all channels.
    pub fn remove_all(&mut self, kind: Option<E::Kind>) {
        match kind {
            Some(kind) => {
                self.listeners.remove(&kind);
            }
            None => self.listeners.clear(),
        }
    }

    /// Check whether a channel has subscribers.
    pub fn has_listeners(&self, kind: E::Kind) -> bool {
        self.listener_count(kind) > 0
    }

    /// Number of subscribers on a channel.
    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.listeners.get(&kind).map_or(0, |subs| subs.len())
    }

    /// Resume delivery.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Suspend delivery; emits are discarded while disabled.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Check whether delivery is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Drop all subscribers and disable the bus.
    pub fn dispose(&mut self) {
        self.listeners.clear();
        self.enabled = false;
    }
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

pub mod prelude {
    pub use crate::{Event, EventBus, SubscriberId};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug)]
    enum TestEvent {
        Ping(i32),
        Pong(i32),
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum TestKind {
        Ping,
        Pong,
    }

    impl Event for TestEvent {
        type Kind = TestKind;

        fn kind(&self) -> TestKind {
            match self {
                TestEvent::Ping(_) => TestKind::Ping,
                TestEvent::Pong(_) => TestKind::Pong,
            }
        }
    }

    #[test]
    fn test_emit_routes_by_kind() {
        let mut bus: EventBus<TestEvent> = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_ping = seen.clone();
        bus.on(TestKind::Ping, move |e| {
            if let TestEvent::Ping(n) = e {
                seen_ping.borrow_mut().push(*n);
            }
        });

        bus.emit(&TestEvent::Ping(1));
        bus.emit(&TestEvent::Pong(2));
        bus.emit(&TestEvent::Ping(3));

        assert_eq!(*seen.borrow(), vec![1, 3]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus: EventBus<TestEvent> = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let c = count.clone();
        let id = bus.on(TestKind::Ping, move |_| *c.borrow_mut() += 1);

        bus.emit(&TestEvent::Ping(0));
        assert!(bus.off(id));
        bus.emit(&TestEvent::Ping(0));

        assert_eq!(*count.borrow(), 1);
        assert!(!bus.off(id));
        assert!(!bus.has_listeners(TestKind::Ping));
    }

    #[test]
    fn test_once_fires_single_delivery() {
        let mut bus: EventBus<TestEvent> = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let c = count.clone();
        bus.once(TestKind::Ping, move |_| *c.borrow_mut() += 1);

        bus.emit(&TestEvent::Ping(0));
        bus.emit(&TestEvent::Ping(0));

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.listener_count(TestKind::Ping), 0);
    }

    #[test]
    fn test_delivery_order() {
        let mut bus: EventBus<TestEvent> = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = order.clone();
        bus.on(TestKind::Ping, move |_| first.borrow_mut().push("first"));
        let second = order.clone();
        bus.on(TestKind::Ping, move |_| second.borrow_mut().push("second"));

        bus.emit(&TestEvent::Ping(0));

        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_disabled_bus_drops_emits() {
        let mut bus: EventBus<TestEvent> = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let c = count.clone();
        bus.on(TestKind::Ping, move |_| *c.borrow_mut() += 1);

        bus.disable();
        bus.emit(&TestEvent::Ping(0));
        assert_eq!(*count.borrow(), 0);

        bus.enable();
        bus.emit(&TestEvent::Ping(0));
        assert_eq!(*count.borrow(), 1);
    }
}
