//! HTTP API and realtime channel for the Twinforge digital-twin platform.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for projects, digital twins, IoT devices,
//!   workflow templates, users and the dashboard aggregates
//! - **Generation endpoints** that call the model adapter to synthesize
//!   twins, suggest optimizations and analyze uploaded files
//! - **`WebSocket` endpoint** (`/ws`) that acknowledges each connection,
//!   echoes client frames and fans out synthetic device readings via
//!   [`tokio::sync::broadcast`]
//! - **Minimal HTML status page** (`GET /`)
//!
//! # Architecture
//!
//! Handlers share one [`AppState`] holding the entity store behind an
//! async read-write lock and the generation service. Store calls are
//! short and synchronous; no lock is held across a model call. A single
//! background task started by [`spawn_ticker`] publishes readings to
//! whichever sockets are subscribed when it fires.

pub mod ai;
pub mod broadcast;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod simulation;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use broadcast::{RandomReadings, ReadingSource, RealtimeError, spawn_ticker, tick};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::{ApiSettings, AppState, DEFAULT_MAX_UPLOAD_BYTES, MULTIPART_OVERHEAD_BYTES};
