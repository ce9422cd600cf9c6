//! # epubsub-core
//!
//! Namespaced in-process publish/subscribe bus with event replay.
//!
//! This crate provides the building blocks:
//!
//! - **Registry** - Process-wide map of namespaces to event logs and observers
//! - **PubSub** - Handle bound to one namespace: subscribe, publish, unsubscribe
//! - **Observer options** - One-shot delivery, last-event and full-history replay
//! - **Collectors** - Values that hold a subscription for their lifetime
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   PubSub    │────▶│  Registry   │────▶│    Topic    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                           │         │
//!                                           ▼         ▼
//!                                      event log   observers
//! ```
//!
//! ## Example
//!
//! ```rust
//! use epubsub_core::{ObserverOptions, PubSub};
//!
//! let chat = PubSub::<String>::new("docs:chat").unwrap();
//! chat.publish("hello".to_string());
//!
//! // Another handle for the same namespace sees the same history
//! let late = PubSub::<String>::new("docs:chat").unwrap();
//! let callback = late.subscribe_fn(
//!     |event| println!("{}", event.data),
//!     ObserverOptions::new().collect_previous_events(),
//! );
//! late.unsubscribe(&callback);
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod event;
pub mod observer;
pub mod pubsub;
pub mod registry;
mod topic;

pub use collector::{EventCollector, LatestEvent};
pub use config::RegistryConfig;
pub use error::PubSubError;
pub use event::{Event, SharedEvent};
pub use observer::{Callback, ObserverOptions};
pub use pubsub::{PubSub, Subscription};
pub use registry::{install, Registry, RegistryStats};
