//! Shared fixtures for epubsub benchmarks.

use epubsub_core::{ObserverOptions, PubSub, Registry};

/// Payload published by the benchmarks.
pub type Payload = Vec<u8>;

/// Build a handle on a standalone registry with `observers` no-op
/// observers and `events` logged events.
///
/// # Panics
///
/// Panics if the namespace cannot be bound, which only happens on a
/// payload type mismatch.
#[must_use]
pub fn populated(
    registry: &Registry,
    namespace: &str,
    observers: usize,
    events: usize,
) -> PubSub<Payload> {
    let pubsub = registry
        .handle::<Payload>(namespace)
        .expect("fresh registry namespace");
    for _ in 0..observers {
        pubsub.subscribe_fn(|_| {}, ObserverOptions::default());
    }
    for _ in 0..events {
        pubsub.publish(vec![0u8; 64]);
    }
    pubsub
}
