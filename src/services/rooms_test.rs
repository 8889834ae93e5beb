use super::*;
use crate::state::test_helpers::test_app_state;

#[tokio::test]
async fn created_room_has_default_icon_size() {
    let state = test_app_state();
    let room_id = create_room(&state, "https://http.cat/201".into()).await;

    let meta = get_room(&state, room_id).await.expect("room should exist");
    assert_eq!(meta, RoomMeta { image: "https://http.cat/201".into(), size: 128 });
}

#[tokio::test]
async fn each_room_gets_a_fresh_id() {
    let state = test_app_state();
    let first = create_room(&state, "a.png".into()).await;
    let second = create_room(&state, "b.png".into()).await;

    assert_ne!(first, second);
    assert_eq!(state.room_meta.read().await.len(), 2);
}

#[tokio::test]
async fn unknown_room_is_none() {
    let state = test_app_state();
    assert!(get_room(&state, Uuid::new_v4()).await.is_none());
}
