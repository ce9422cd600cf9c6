//! Error types for epubsub.
//!
//! Delivery itself never fails: `subscribe`, `unsubscribe` and `publish`
//! are total. Errors only come from binding a handle to a namespace and
//! from loading configuration.

use thiserror::Error;

/// Bus errors.
#[derive(Debug, Error)]
pub enum PubSubError {
    /// The namespace already exists with a different payload type.
    #[error("Namespace '{namespace}' carries {found}, not {expected}")]
    PayloadTypeMismatch {
        /// Namespace that was requested.
        namespace: String,
        /// Payload type of the handle being constructed.
        expected: &'static str,
        /// Payload type the namespace was created with.
        found: &'static str,
    },

    /// The global registry was created before `install` was called.
    #[error("Global registry is already initialized")]
    AlreadyInitialized,

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_names_both_types() {
        let err = PubSubError::PayloadTypeMismatch {
            namespace: "chat".to_string(),
            expected: "u32",
            found: "alloc::string::String",
        };
        let text = err.to_string();
        assert!(text.contains("chat"));
        assert!(text.contains("u32"));
        assert!(text.contains("alloc::string::String"));
    }
}
