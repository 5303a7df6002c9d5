use super::*;
use crate::room::lifecycle::Phase;
use crate::room::{ClientMessage, ServerMessage};
use crate::state::test_helpers;
use tokio::sync::mpsc;

fn outbox() -> (Outbox, mpsc::Receiver<ServerMessage>) {
    mpsc::channel(64)
}

#[tokio::test(start_paused = true)]
async fn create_room_registers_handle_with_fresh_id() {
    let (state, _store) = test_helpers::test_app_state();
    let a = create_room(&state, &CreateOptions::default()).await;
    let b = create_room(&state, &CreateOptions::default()).await;

    assert_ne!(a.id(), b.id());
    assert_eq!(state.rooms.read().await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn create_room_applies_options_and_clamping() {
    let (state, _store) = test_helpers::test_app_state();
    let options = CreateOptions { expiration: Some(1_000_000), mode: Some("speed".into()) };
    let handle = create_room(&state, &options).await;

    let summary = handle.summary().await.unwrap();
    assert_eq!(summary.mode, "speed");
    assert_eq!(summary.expiration, state.config.max_expiration);
    assert_eq!(summary.phase, Phase::Active);
}

#[tokio::test(start_paused = true)]
async fn get_or_create_reuses_live_room() {
    let (state, _store) = test_helpers::test_app_state();
    let first = get_or_create_room(&state, "lobby", &CreateOptions { expiration: Some(30), mode: None }).await;
    let second = get_or_create_room(&state, "lobby", &CreateOptions { expiration: Some(99), mode: None }).await;

    assert_eq!(first.id(), "lobby");
    assert_eq!(second.summary().await.unwrap().expiration, 30);
    assert_eq!(state.rooms.read().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn join_room_creates_and_admits() {
    let (state, _store) = test_helpers::test_app_state();
    let (tx, mut rx) = outbox();

    let (handle, view) = join_room(&state, "r1", &CreateOptions::default(), "s1".into(), Some("Ada".into()), tx)
        .await
        .unwrap();

    assert_eq!(view.name, "Ada");
    assert_eq!(handle.summary().await.unwrap().players, 1);
    assert!(matches!(rx.recv().await, Some(ServerMessage::State(_))));
}

#[tokio::test(start_paused = true)]
async fn terminated_room_is_replaced_on_next_join() {
    let (state, store) = test_helpers::test_app_state();
    let (tx, _rx) = outbox();
    let options = CreateOptions { expiration: Some(1), mode: None };
    let (first, _) = join_room(&state, "r1", &options, "s1".into(), None, tx).await.unwrap();
    first
        .send("s1".into(), ClientMessage::Chat("hi".into()))
        .await
        .unwrap();

    // One tick to zero plus five grace ticks.
    tokio::time::sleep(std::time::Duration::from_secs(7)).await;
    assert!(first.is_closed());
    assert!(find_room(&state, "r1").await.is_none());
    assert_eq!(store.drawings().len(), 1);

    let (tx, _rx) = outbox();
    let (second, _) = join_room(&state, "r1", &options, "s2".into(), None, tx).await.unwrap();
    assert!(!second.is_closed());
    assert_eq!(second.summary().await.unwrap().countdown, 1);
}

#[tokio::test(start_paused = true)]
async fn room_summary_reports_missing_rooms() {
    let (state, _store) = test_helpers::test_app_state();
    assert!(matches!(room_summary(&state, "nope").await, Err(RoomError::NotFound(_))));

    create_room(&state, &CreateOptions::default()).await;
    let id = list_rooms(&state).await[0].id.clone();
    assert_eq!(room_summary(&state, &id).await.unwrap().id, id);
}

#[tokio::test(start_paused = true)]
async fn list_rooms_is_sorted_by_id() {
    let (state, _store) = test_helpers::test_app_state();
    for id in ["c", "a", "b"] {
        get_or_create_room(&state, id, &CreateOptions::default()).await;
    }
    let ids: Vec<String> = list_rooms(&state).await.into_iter().map(|s| s.id).collect();
    assert_eq!(ids, ["a", "b", "c"]);
}
