//! Persistence service — final artwork handoff.
//!
//! DESIGN
//! ======
//! A room writes exactly one `drawings` row, when it terminates. The room
//! actor owns the single-shot guarantee; this module owns the record shape,
//! the store seam, and failure reporting.
//!
//! ERROR HANDLING
//! ==============
//! A failed write is logged and dropped. Teardown never waits on a retry,
//! so a broken database cannot keep a finished room alive.

use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::room::model::Path;

// =============================================================================
// TYPES
// =============================================================================

/// The record handed to the durable store when a room terminates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDrawing {
    /// Committed strokes in commit order.
    pub paths: Vec<Path>,
    /// Every session admitted over the room's life, first admission first.
    pub user_ids: Vec<String>,
    pub users_count: i32,
    /// Room mode label the drawing was made under.
    pub mode: String,
    /// Always zero: nothing in this service collects votes.
    pub votes: i32,
}

impl NewDrawing {
    #[must_use]
    pub fn new(paths: Vec<Path>, user_ids: Vec<String>, mode: impl Into<String>) -> Self {
        let users_count = i32::try_from(user_ids.len()).unwrap_or(i32::MAX);
        Self { paths, user_ids, users_count, mode: mode.into(), votes: 0 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Create-only sink for finished drawings.
#[async_trait::async_trait]
pub trait DrawingStore: Send + Sync {
    async fn create(&self, drawing: &NewDrawing) -> Result<Uuid, StoreError>;
}

// =============================================================================
// POSTGRES STORE
// =============================================================================

pub struct PgDrawingStore {
    pool: PgPool,
}

impl PgDrawingStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DrawingStore for PgDrawingStore {
    async fn create(&self, drawing: &NewDrawing) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let paths = serde_json::to_value(&drawing.paths)?;
        sqlx::query(
            "INSERT INTO drawings (id, paths, user_ids, users_count, mode, votes)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(&paths)
        .bind(&drawing.user_ids)
        .bind(drawing.users_count)
        .bind(&drawing.mode)
        .bind(drawing.votes)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}

// =============================================================================
// HANDOFF
// =============================================================================

/// Submit one drawing to the store. Failures are logged, never propagated.
pub async fn persist_drawing(store: Arc<dyn DrawingStore>, room_id: &str, drawing: NewDrawing) -> Option<Uuid> {
    let paths = drawing.paths.len();
    match store.create(&drawing).await {
        Ok(id) => {
            info!(%room_id, drawing_id = %id, paths, users = drawing.users_count, "drawing persisted");
            Some(id)
        }
        Err(e) => {
            error!(%room_id, error = %e, paths, "drawing persist failed; artwork dropped");
            None
        }
    }
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;
