//! Error types for the server binary.
//!
//! [`ConfigError`] covers everything that can go wrong before the server
//! starts listening. `main` wraps it in `anyhow` context.

/// Configuration loading or validation failed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the expected shape.
    #[error("config load error: {source}")]
    Load {
        /// The underlying `config` crate error.
        #[from]
        source: ::config::ConfigError,
    },

    /// A value was read but is not usable.
    #[error("invalid config value for `{key}`: {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
