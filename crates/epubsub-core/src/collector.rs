//! Subscription-bound event holders.
//!
//! These tie a subscription to the lifetime of a value: the value
//! subscribes when built and unsubscribes when dropped. View layers can
//! keep one per mounted component.

use crate::event::SharedEvent;
use crate::observer::{Callback, ObserverOptions};
use crate::pubsub::{PubSub, Subscription};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects every event delivered to its subscription.
pub struct EventCollector<T: Send + Sync + 'static> {
    events: Arc<Mutex<Vec<SharedEvent<T>>>>,
    _subscription: Subscription<T>,
}

impl<T: Send + Sync + 'static> EventCollector<T> {
    /// Subscribe to `pubsub` and start collecting.
    ///
    /// Replay options apply, so `collect_previous_events` starts the
    /// collector with the namespace's history.
    #[must_use]
    pub fn attach(pubsub: &PubSub<T>, options: ObserverOptions) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let callback = Callback::new(move |event: &SharedEvent<T>| {
            sink.lock().push(Arc::clone(event));
        });

        Self {
            events,
            _subscription: pubsub.subscribe_scoped(&callback, options),
        }
    }

    /// Get the collected events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<SharedEvent<T>> {
        self.events.lock().clone()
    }

    /// Get the most recently collected event.
    #[must_use]
    pub fn last(&self) -> Option<SharedEvent<T>> {
        self.events.lock().last().cloned()
    }

    /// Get the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

/// Holds the single event a one-shot subscription receives.
///
/// Subscribes with `once` and `collect_last_event`: an existing last
/// event is taken immediately, otherwise the next publish is.
pub struct LatestEvent<T: Send + Sync + 'static> {
    event: Arc<Mutex<Option<SharedEvent<T>>>>,
    _subscription: Subscription<T>,
}

impl<T: Send + Sync + 'static> LatestEvent<T> {
    /// Subscribe to `pubsub` for a single event.
    #[must_use]
    pub fn attach(pubsub: &PubSub<T>) -> Self {
        let event = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&event);
        let callback = Callback::new(move |received: &SharedEvent<T>| {
            *slot.lock() = Some(Arc::clone(received));
        });
        let options = ObserverOptions::new().once().collect_last_event();

        Self {
            event,
            _subscription: pubsub.subscribe_scoped(&callback, options),
        }
    }

    /// Get the received event, if any.
    #[must_use]
    pub fn get(&self) -> Option<SharedEvent<T>> {
        self.event.lock().clone()
    }
}
