use super::*;
use crate::room::model::Point;
use crate::state::test_helpers::RecordingStore;
#[cfg(feature = "live-db-tests")]
use sqlx::postgres::PgPoolOptions;

fn sample_paths() -> Vec<Path> {
    vec![
        Path::new(vec![Point(0.0, 0.0), Point(1.0, 1.0)], Some("red".into()), None),
        Path::new(vec![Point(5.0, 5.0)], None, None),
    ]
}

// =============================================================================
// NewDrawing
// =============================================================================

#[test]
fn new_drawing_counts_users_and_zeroes_votes() {
    let drawing = NewDrawing::new(sample_paths(), vec!["a".into(), "b".into(), "c".into()], "speed");
    assert_eq!(drawing.users_count, 3);
    assert_eq!(drawing.votes, 0);
    assert_eq!(drawing.mode, "speed");
    assert_eq!(drawing.paths.len(), 2);
}

#[test]
fn new_drawing_serializes_record_fields() {
    let drawing = NewDrawing::new(sample_paths(), vec!["a".into()], "default");
    let json = serde_json::to_value(&drawing).unwrap();
    assert_eq!(json["users_count"], 1);
    assert_eq!(json["votes"], 0);
    assert_eq!(json["user_ids"][0], "a");
    assert_eq!(json["paths"][0]["points"][1][0], 1.0);
}

// =============================================================================
// persist_drawing
// =============================================================================

#[tokio::test]
async fn persist_drawing_hands_record_to_store() {
    let store = Arc::new(RecordingStore::default());
    let drawing = NewDrawing::new(sample_paths(), vec!["a".into()], "default");

    let id = persist_drawing(store.clone(), "room-1", drawing.clone()).await;

    assert!(id.is_some());
    assert_eq!(store.drawings(), vec![drawing]);
}

#[tokio::test]
async fn persist_drawing_failure_is_swallowed() {
    let store = Arc::new(RecordingStore::failing());
    let drawing = NewDrawing::new(vec![], vec![], "default");

    let id = persist_drawing(store.clone(), "room-1", drawing).await;

    assert!(id.is_none());
    assert_eq!(store.drawings().len(), 1);
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
async fn pg_store_inserts_drawing_row() {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required for live-db-tests");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("connect");
    sqlx::migrate!("src/db/migrations")
        .run(&pool)
        .await
        .expect("migrate");

    let store = PgDrawingStore::new(pool.clone());
    let drawing = NewDrawing::new(sample_paths(), vec!["a".into(), "b".into()], "live-test");
    let id = store.create(&drawing).await.expect("insert");

    let (mode, users_count): (String, i32) = sqlx::query_as("SELECT mode, users_count FROM drawings WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .expect("select");
    assert_eq!(mode, "live-test");
    assert_eq!(users_count, 2);
}
