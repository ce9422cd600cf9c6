//! Observers: a callback plus the options it was subscribed with.
//!
//! Observers are identified by callback identity. Cloning a [`Callback`]
//! keeps its identity; wrapping the same closure twice does not.

use crate::event::SharedEvent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type CallbackFn<T> = dyn Fn(&SharedEvent<T>) + Send + Sync;

/// A subscribable callback with reference identity.
pub struct Callback<T> {
    inner: Arc<CallbackFn<T>>,
}

impl<T> Callback<T> {
    /// Wrap a closure into a callback.
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&SharedEvent<T>) + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Invoke the callback with an event.
    pub fn call(&self, event: &SharedEvent<T>) {
        (self.inner)(event);
    }

    /// Check whether two callbacks are the same callback.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Callback<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Callback<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<T> Eq for Callback<T> {}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// Subscription options.
///
/// The flags are independent and compose: previous events are replayed
/// first, then the last event, then `once` retires the observer if
/// anything was replayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObserverOptions {
    /// Retire after the first delivery, replayed or published.
    pub once: bool,
    /// Replay the most recent logged event on subscribe.
    pub collect_last_event: bool,
    /// Replay every logged event, oldest first, on subscribe.
    pub collect_previous_events: bool,
}

impl ObserverOptions {
    /// Options with every flag cleared.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            once: false,
            collect_last_event: false,
            collect_previous_events: false,
        }
    }

    /// Set the `once` flag.
    #[must_use]
    pub const fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Set the `collect_last_event` flag.
    #[must_use]
    pub const fn collect_last_event(mut self) -> Self {
        self.collect_last_event = true;
        self
    }

    /// Set the `collect_previous_events` flag.
    #[must_use]
    pub const fn collect_previous_events(mut self) -> Self {
        self.collect_previous_events = true;
        self
    }

    /// Whether any replay flag is set.
    #[must_use]
    pub const fn replays(&self) -> bool {
        self.collect_last_event || self.collect_previous_events
    }
}

/// A registered observer.
///
/// Records are shared between the observer list and in-flight publish
/// snapshots; `active` is cleared when the record leaves the list.
pub(crate) struct Observer<T> {
    callback: Callback<T>,
    options: ObserverOptions,
    active: AtomicBool,
}

impl<T> Observer<T> {
    pub(crate) fn new(callback: Callback<T>, options: ObserverOptions) -> Self {
        Self {
            callback,
            options,
            active: AtomicBool::new(true),
        }
    }

    pub(crate) fn callback(&self) -> &Callback<T> {
        &self.callback
    }

    pub(crate) fn options(&self) -> ObserverOptions {
        self.options
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn retire(&self) {
        self.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_callback_identity() {
        let a = Callback::<u8>::new(|_| {});
        let b = Callback::<u8>::new(|_| {});
        let a2 = a.clone();

        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert!(a.same_as(&a2));
        assert!(!a.same_as(&b));
    }

    #[test]
    fn test_callback_call() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let callback = Callback::new(move |event: &SharedEvent<u32>| {
            counter.fetch_add(event.data as usize, Ordering::SeqCst);
        });

        callback.call(&Arc::new(Event::new(3)));
        callback.clone().call(&Arc::new(Event::new(4)));

        assert_eq!(hits.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_options_builder() {
        let options = ObserverOptions::new().once().collect_last_event();
        assert!(options.once);
        assert!(options.collect_last_event);
        assert!(!options.collect_previous_events);
        assert!(options.replays());
        assert!(!ObserverOptions::default().replays());
    }

    #[test]
    fn test_options_from_json_keys() {
        let options: ObserverOptions =
            serde_json::from_str(r#"{ "once": true, "collectPreviousEvents": true }"#).unwrap();
        assert_eq!(
            options,
            ObserverOptions::new().once().collect_previous_events()
        );

        let empty: ObserverOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ObserverOptions::default());
    }

    #[test]
    fn test_observer_retire() {
        let observer = Observer::new(Callback::<u8>::new(|_| {}), ObserverOptions::new().once());
        assert!(observer.is_active());
        assert!(observer.options().once);

        observer.retire();
        assert!(!observer.is_active());
    }
}
