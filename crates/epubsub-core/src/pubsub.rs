//! Namespace handles.
//!
//! A [`PubSub`] is a cheap handle bound to one namespace. It owns no
//! storage: every handle for the same namespace reads and writes the same
//! event log and observer list, so handles can be created and dropped
//! freely.
//!
//! ## Delivery rules
//!
//! - `publish` stamps the event, delivers it to a snapshot of the current
//!   observers in subscription order, then appends it to the log.
//! - Observers added during delivery wait for the next event; observers
//!   removed during delivery are skipped if not yet reached.
//! - `once` observers are retired right after their first delivery. When
//!   a subscribe-time replay delivered something, that replay counts.
//! - Callbacks run with no lock held and may reenter the bus. A panicking
//!   callback unwinds through `publish`; later observers are not reached
//!   and the event is not logged.

use crate::error::PubSubError;
use crate::event::{Event, SharedEvent};
use crate::observer::{Callback, Observer, ObserverOptions};
use crate::registry::Registry;
use crate::topic::{ErasedTopic, Topic};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A publish/subscribe handle for one namespace.
pub struct PubSub<T> {
    topic: Arc<Topic<T>>,
}

impl<T: Send + Sync + 'static> PubSub<T> {
    /// Bind a handle to `namespace` in the global registry.
    ///
    /// The namespace is created on first use. Any string is a valid
    /// namespace, including the empty string.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace was created with a different
    /// payload type.
    pub fn new(namespace: &str) -> Result<Self, PubSubError> {
        Registry::global().handle(namespace)
    }

    pub(crate) fn from_topic(topic: Arc<Topic<T>>) -> Self {
        Self { topic }
    }

    /// Get the namespace name.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.topic.namespace()
    }

    /// Subscribe a callback.
    ///
    /// The observer is registered before any replay, so a replaying
    /// callback that publishes will also see its own event. Subscribing
    /// the same callback twice registers two observers.
    pub fn subscribe(&self, callback: &Callback<T>, options: ObserverOptions) {
        let observer = Arc::new(Observer::new(callback.clone(), options));
        let observers = self.topic.add_observer(observer);

        debug!(
            namespace = %self.namespace(),
            observers,
            once = options.once,
            replay = options.replays(),
            "Subscribed"
        );

        let mut replayed = false;

        if options.collect_previous_events {
            let history = self.topic.events();
            trace!(
                namespace = %self.namespace(),
                replayed = history.len(),
                "Replaying history"
            );
            for event in &history {
                callback.call(event);
            }
            replayed |= !history.is_empty();
        }

        if options.collect_last_event {
            if let Some(last) = self.topic.last_event() {
                trace!(namespace = %self.namespace(), "Replaying last event");
                callback.call(&last);
                replayed = true;
            }
        }

        if options.once && replayed {
            debug!(namespace = %self.namespace(), "One-shot observer retired after replay");
            self.unsubscribe(callback);
        }
    }

    /// Wrap a closure, subscribe it, and return the callback for later
    /// removal.
    pub fn subscribe_fn<F>(&self, f: F, options: ObserverOptions) -> Callback<T>
    where
        F: Fn(&SharedEvent<T>) + Send + Sync + 'static,
    {
        let callback = Callback::new(f);
        self.subscribe(&callback, options);
        callback
    }

    /// Subscribe a callback for as long as the returned guard lives.
    ///
    /// Dropping the guard calls [`PubSub::unsubscribe`] with the callback,
    /// which also removes any other subscription of that same callback,
    /// including ones made without a guard.
    pub fn subscribe_scoped(
        &self,
        callback: &Callback<T>,
        options: ObserverOptions,
    ) -> Subscription<T> {
        let subscription = Subscription {
            pubsub: self.clone(),
            callback: callback.clone(),
        };
        self.subscribe(callback, options);
        subscription
    }

    /// Remove every observer registered with `callback`.
    ///
    /// Unknown callbacks are ignored.
    pub fn unsubscribe(&self, callback: &Callback<T>) {
        self.topic.remove_callback(callback);
    }

    /// Publish an event to the namespace.
    pub fn publish(&self, data: T) {
        let event = Arc::new(Event::new(data));
        let observers = self.topic.observers();
        let mut recipients = 0usize;

        for observer in &observers {
            if !observer.is_active() {
                continue;
            }

            observer.callback().call(&event);
            recipients += 1;

            if observer.options().once {
                debug!(namespace = %self.namespace(), "One-shot observer retired");
                self.unsubscribe(observer.callback());
            }
        }

        self.topic.append(event);
        trace!(namespace = %self.namespace(), recipients, "Published event");
    }

    /// Snapshot of the event log, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<SharedEvent<T>> {
        self.topic.events()
    }

    /// Get the most recent logged event.
    #[must_use]
    pub fn last_event(&self) -> Option<SharedEvent<T>> {
        self.topic.last_event()
    }

    /// Get the number of logged events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.topic.event_count()
    }

    /// Get the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.topic.observer_count()
    }
}

impl<T> Clone for PubSub<T> {
    fn clone(&self) -> Self {
        Self {
            topic: Arc::clone(&self.topic),
        }
    }
}

impl<T> fmt::Debug for PubSub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PubSub")
            .field("namespace", &self.topic.namespace())
            .finish()
    }
}

/// Guard returned by [`PubSub::subscribe_scoped`].
///
/// Dropping the guard unsubscribes its callback.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription<T: Send + Sync + 'static> {
    pubsub: PubSub<T>,
    callback: Callback<T>,
}

impl<T: Send + Sync + 'static> Subscription<T> {
    /// Get the subscribed callback.
    #[must_use]
    pub fn callback(&self) -> &Callback<T> {
        &self.callback
    }

    /// Get the handle the subscription was made through.
    #[must_use]
    pub fn pubsub(&self) -> &PubSub<T> {
        &self.pubsub
    }

    /// Unsubscribe now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl<T: Send + Sync + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.pubsub.unsubscribe(&self.callback);
    }
}

impl<T: Send + Sync + 'static> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("namespace", &self.pubsub.namespace())
            .field("callback", &self.callback)
            .finish()
    }
}
