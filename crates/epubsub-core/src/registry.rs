//! Shared registry of namespaces.
//!
//! The registry maps each namespace to its event log and observer list.
//! One registry lives for the whole process and is reachable from
//! anywhere through [`Registry::global`], so independently constructed
//! handles for the same namespace share the same state.

use crate::config::RegistryConfig;
use crate::error::PubSubError;
use crate::pubsub::PubSub;
use crate::topic::{ErasedTopic, Topic};
use dashmap::DashMap;
use std::any;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Create the global registry with an explicit configuration.
///
/// # Errors
///
/// Returns [`PubSubError::AlreadyInitialized`] if the global registry
/// already exists, either from an earlier `install` or from a handle
/// constructed before this call.
pub fn install(config: RegistryConfig) -> Result<&'static Registry, PubSubError> {
    let mut installed = false;
    let registry = GLOBAL.get_or_init(|| {
        installed = true;
        Registry::with_config(config)
    });

    if installed {
        Ok(registry)
    } else {
        Err(PubSubError::AlreadyInitialized)
    }
}

/// The namespace registry.
pub struct Registry {
    /// Topics indexed by namespace.
    namespaces: DashMap<String, Arc<dyn ErasedTopic>>,
    /// Configuration.
    config: RegistryConfig,
}

impl Registry {
    /// Create a standalone registry with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a standalone registry with custom configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        info!("Creating registry with config: {:?}", config);
        Self {
            namespaces: DashMap::new(),
            config,
        }
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(|| Registry::with_config(RegistryConfig::from_env()))
    }

    /// Get the registry configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Bind a handle to a namespace of this registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace was created with a different
    /// payload type.
    pub fn handle<T: Send + Sync + 'static>(
        &self,
        namespace: &str,
    ) -> Result<PubSub<T>, PubSubError> {
        self.topic(namespace).map(PubSub::from_topic)
    }

    /// Make sure the event log and observer list for `namespace` exist.
    ///
    /// Existing contents are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace was created with a different
    /// payload type.
    pub fn ensure_namespace<T: Send + Sync + 'static>(
        &self,
        namespace: &str,
    ) -> Result<(), PubSubError> {
        self.topic::<T>(namespace).map(drop)
    }

    pub(crate) fn topic<T: Send + Sync + 'static>(
        &self,
        namespace: &str,
    ) -> Result<Arc<Topic<T>>, PubSubError> {
        let erased = {
            let entry = self
                .namespaces
                .entry(namespace.to_string())
                .or_insert_with(|| {
                    debug!(
                        namespace = %namespace,
                        payload = any::type_name::<T>(),
                        "Creating namespace"
                    );
                    let topic: Arc<dyn ErasedTopic> =
                        Arc::new(Topic::<T>::new(namespace, self.config.max_history));
                    topic
                });
            Arc::clone(entry.value())
        };

        let found = erased.payload_type();
        erased
            .into_any()
            .downcast::<Topic<T>>()
            .map_err(|_| PubSubError::PayloadTypeMismatch {
                namespace: namespace.to_string(),
                expected: any::type_name::<T>(),
                found,
            })
    }

    /// Check if a namespace exists.
    #[must_use]
    pub fn contains(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Get all namespace names.
    #[must_use]
    pub fn namespaces(&self) -> Vec<String> {
        self.namespaces.iter().map(|e| e.key().clone()).collect()
    }

    /// Get the payload type a namespace was created with.
    #[must_use]
    pub fn payload_type(&self, namespace: &str) -> Option<&'static str> {
        self.namespaces.get(namespace).map(|e| e.payload_type())
    }

    /// Get the number of logged events for a namespace.
    #[must_use]
    pub fn event_count(&self, namespace: &str) -> usize {
        self.namespaces
            .get(namespace)
            .map(|e| e.event_count())
            .unwrap_or(0)
    }

    /// Get the number of observers for a namespace.
    #[must_use]
    pub fn observer_count(&self, namespace: &str) -> usize {
        self.namespaces
            .get(namespace)
            .map(|e| e.observer_count())
            .unwrap_or(0)
    }

    /// Get registry statistics.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            namespace_count: 0,
            total_events: 0,
            total_observers: 0,
        };
        for entry in self.namespaces.iter() {
            stats.namespace_count += 1;
            stats.total_events += entry.event_count();
            stats.total_observers += entry.observer_count();
        }
        stats
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of namespaces.
    pub namespace_count: usize,
    /// Events held across all namespace logs.
    pub total_events: usize,
    /// Observers registered across all namespaces.
    pub total_observers: usize,
}
