//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the registry of live rooms, the artwork store every room hands
//! its result to, and the room tuning knobs. Room state itself lives inside
//! each room's actor task; the registry only stores handles.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::RoomConfig;
use crate::room::RoomHandle;
use crate::services::persistence::DrawingStore;

/// Live rooms keyed by room id.
pub type RoomRegistry = Arc<RwLock<HashMap<String, RoomHandle>>>;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub rooms: RoomRegistry,
    pub store: Arc<dyn DrawingStore>,
    pub config: Arc<RoomConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn DrawingStore>, config: RoomConfig) -> Self {
        Self { rooms: Arc::new(RwLock::new(HashMap::new())), store, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
