//! Per-namespace storage.
//!
//! A topic owns one namespace's event log and observer list. Locks are
//! only held for the duration of a single read or write; callbacks always
//! run with every lock released.

use crate::event::SharedEvent;
use crate::observer::{Callback, Observer};
use parking_lot::{Mutex, RwLock};
use std::any::{self, Any};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Type-erased view of a topic, as held by the registry.
pub(crate) trait ErasedTopic: Send + Sync {
    fn payload_type(&self) -> &'static str;

    fn event_count(&self) -> usize;

    fn observer_count(&self) -> usize;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Event log and observer list for a single namespace.
pub(crate) struct Topic<T> {
    namespace: String,
    events: RwLock<VecDeque<SharedEvent<T>>>,
    observers: Mutex<Vec<Arc<Observer<T>>>>,
    max_history: Option<usize>,
}

impl<T> Topic<T> {
    pub(crate) fn new(namespace: impl Into<String>, max_history: Option<usize>) -> Self {
        Self {
            namespace: namespace.into(),
            events: RwLock::new(VecDeque::new()),
            observers: Mutex::new(Vec::new()),
            max_history,
        }
    }

    pub(crate) fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Snapshot of the event log, oldest first.
    pub(crate) fn events(&self) -> Vec<SharedEvent<T>> {
        self.events.read().iter().cloned().collect()
    }

    pub(crate) fn last_event(&self) -> Option<SharedEvent<T>> {
        self.events.read().back().cloned()
    }

    /// Append an event, evicting the oldest entries past `max_history`.
    pub(crate) fn append(&self, event: SharedEvent<T>) {
        let mut events = self.events.write();
        events.push_back(event);
        if let Some(max) = self.max_history {
            while events.len() > max {
                events.pop_front();
            }
        }
    }

    pub(crate) fn add_observer(&self, observer: Arc<Observer<T>>) -> usize {
        let mut observers = self.observers.lock();
        observers.push(observer);
        observers.len()
    }

    /// Snapshot of the observer list in subscription order.
    pub(crate) fn observers(&self) -> Vec<Arc<Observer<T>>> {
        self.observers.lock().clone()
    }

    /// Remove and retire every observer registered with `callback`.
    ///
    /// Returns the number of records removed.
    pub(crate) fn remove_callback(&self, callback: &Callback<T>) -> usize {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|observer| {
            if observer.callback().same_as(callback) {
                observer.retire();
                false
            } else {
                true
            }
        });
        let removed = before - observers.len();
        if removed > 0 {
            debug!(
                namespace = %self.namespace,
                removed,
                observers = observers.len(),
                "Observers removed"
            );
        }
        removed
    }
}

impl<T: Send + Sync + 'static> ErasedTopic for Topic<T> {
    fn payload_type(&self) -> &'static str {
        any::type_name::<T>()
    }

    fn event_count(&self) -> usize {
        self.events.read().len()
    }

    fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::observer::ObserverOptions;

    fn observer(callback: &Callback<&'static str>) -> Arc<Observer<&'static str>> {
        Arc::new(Observer::new(callback.clone(), ObserverOptions::default()))
    }

    #[test]
    fn test_topic_creation() {
        let topic = Topic::<&'static str>::new("test:room", None);
        assert_eq!(topic.namespace(), "test:room");
        assert_eq!(topic.event_count(), 0);
        assert_eq!(topic.observer_count(), 0);
        assert!(topic.last_event().is_none());
        assert_eq!(topic.payload_type(), "&str");
    }

    #[test]
    fn test_topic_append_keeps_order() {
        let topic = Topic::new("test", None);
        for data in ["a", "b", "c"] {
            topic.append(Arc::new(Event::new(data)));
        }

        let data: Vec<_> = topic.events().iter().map(|e| e.data).collect();
        assert_eq!(data, vec!["a", "b", "c"]);
        assert_eq!(topic.last_event().map(|e| e.data), Some("c"));
    }

    #[test]
    fn test_topic_history_limit() {
        let topic = Topic::new("test", Some(2));
        for data in ["a", "b", "c"] {
            topic.append(Arc::new(Event::new(data)));
        }

        let data: Vec<_> = topic.events().iter().map(|e| e.data).collect();
        assert_eq!(data, vec!["b", "c"]);

        let empty = Topic::new("test", Some(0));
        empty.append(Arc::new(Event::new("a")));
        assert_eq!(empty.event_count(), 0);
    }

    #[test]
    fn test_topic_remove_callback() {
        let topic = Topic::new("test", None);
        let a = Callback::<&'static str>::new(|_| {});
        let b = Callback::<&'static str>::new(|_| {});

        let first = observer(&a);
        topic.add_observer(Arc::clone(&first));
        topic.add_observer(observer(&b));
        assert_eq!(topic.add_observer(observer(&a)), 3);

        assert_eq!(topic.remove_callback(&a), 2);
        assert_eq!(topic.observer_count(), 1);
        assert!(!first.is_active());

        // Removing an unknown callback
        assert_eq!(topic.remove_callback(&a), 0);
        assert_eq!(topic.observer_count(), 1);
    }

    #[test]
    fn test_topic_downcast() {
        let erased: Arc<dyn ErasedTopic> = Arc::new(Topic::<u32>::new("test", None));
        assert!(Arc::clone(&erased).into_any().downcast::<Topic<u32>>().is_ok());
        assert!(erased.into_any().downcast::<Topic<String>>().is_err());
    }
}
