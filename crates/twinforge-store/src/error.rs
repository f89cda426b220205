//! Error types for the entity store.
//!
//! Lookups never fail: a missing id is `None`. The only store operation
//! that can be refused is registering a user whose username or e-mail is
//! already taken.

/// Errors that can occur when writing to the entity store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint would be violated.
    #[error("conflict: {field} `{value}` is already taken")]
    Conflict {
        /// Which unique field collided.
        field: &'static str,
        /// The colliding value.
        value: String,
    },
}
