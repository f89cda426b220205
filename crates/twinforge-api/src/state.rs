//! Shared application state for the HTTP API and socket channel.
//!
//! [`AppState`] owns the entity store, the generation service and the
//! broadcast channel that fans synthetic readings out to every open
//! socket. It is built once at process start and handed to the router;
//! there is no ambient global.

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use twinforge_genai::GenerationService;
use twinforge_store::{EntityStore, SAMPLE_USER_ID};
use twinforge_types::{ServerMessage, UserId};

/// Capacity of the broadcast channel for realtime messages.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// Default upload ceiling: 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 52_428_800;

/// Allowance on top of the file ceiling for multipart boundaries and
/// part headers.
pub const MULTIPART_OVERHEAD_BYTES: usize = 65_536;

/// Request-handling knobs that are fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiSettings {
    /// Owner used for dashboard listings and generated twins.
    pub default_user_id: UserId,
    /// Largest accepted uploaded file, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            default_user_id: SAMPLE_USER_ID,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. Store
/// operations are synchronous and run to completion under the lock, so
/// each one is atomic relative to the others. The lock is never held
/// across a generation call.
pub struct AppState {
    /// Broadcast sender for realtime messages.
    pub tx: broadcast::Sender<ServerMessage>,
    /// The entity store.
    pub store: Arc<RwLock<EntityStore>>,
    /// The generative-model adapter.
    pub generation: Arc<GenerationService>,
    /// Fixed request-handling settings.
    pub settings: ApiSettings,
}

impl AppState {
    /// Create application state around an existing store and adapter.
    pub fn new(store: EntityStore, generation: GenerationService, settings: ApiSettings) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            store: Arc::new(RwLock::new(store)),
            generation: Arc::new(generation),
            settings,
        }
    }

    /// Subscribe to the realtime channel.
    ///
    /// Each open socket holds exactly one receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.tx.subscribe()
    }

    /// Number of sockets currently subscribed.
    pub fn connected_clients(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish a message to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, message: ServerMessage) -> usize {
        // send returns Err only when there are zero receivers.
        self.tx.send(message).unwrap_or(0)
    }
}
