//! In-memory entity store for the Twinforge digital-twin platform.
//!
//! # Modules
//!
//! - [`store`] -- [`EntityStore`]: keyed collections and the shared id counter
//! - [`merge`] -- Field-by-field partial update merges
//! - [`seed`] -- Sample platform data
//! - [`stats`] -- Dashboard aggregates
//! - [`error`] -- Store error types

pub mod error;
pub mod merge;
pub mod seed;
pub mod stats;
pub mod store;

pub use error::StoreError;
pub use seed::{FIRST_FREE_ID, SAMPLE_USER_ID};
pub use store::EntityStore;
