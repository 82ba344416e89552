//! REST client tests against the mock AMA server
//!
//! Run with: cargo test -p integration-tests --test api_tests

use ama_core::{FetchError, MessageId, ReactionApi, ReactionError, RoomId, SnapshotSource};
use ama_http::{ApiClient, ApiError, MessageResponse, RoomResponse};
use integration_tests::{
    assert_json, assert_status, closed_port_url, seed_room, unique_theme, TestServer,
    SAMPLE_QUESTIONS,
};
use reqwest::StatusCode;
use std::time::Duration;

// ============================================================================
// Rooms
// ============================================================================

#[tokio::test]
async fn test_empty_lists_are_null_on_the_wire() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/rooms").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.is_null());

    let api = server.api_client();
    assert!(api.list_rooms().await.unwrap().is_empty());

    let room_id = api.create_room(&unique_theme()).await.unwrap();
    let response = server
        .get(&format!("/api/rooms/{room_id}/messages"))
        .await
        .unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.is_null());

    assert!(api.list_messages(&room_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_and_list_rooms() {
    let server = TestServer::start().await.expect("Failed to start server");
    let api = server.api_client();
    let theme = unique_theme();

    let room_id = api.create_room(&theme).await.unwrap();
    let rooms = api.list_rooms().await.unwrap();

    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_id(), room_id);
    assert_eq!(rooms[0].theme, theme);

    let response = server.get("/api/rooms").await.unwrap();
    let raw: Vec<RoomResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(raw, rooms);
}

// ============================================================================
// Messages
// ============================================================================

#[tokio::test]
async fn test_create_and_fetch_messages() {
    let server = TestServer::start().await.expect("Failed to start server");
    let api = server.api_client();
    let (room_id, ids) = seed_room(&api).await.unwrap();

    let messages = api.list_messages(&room_id).await.unwrap();
    assert_eq!(messages.len(), SAMPLE_QUESTIONS.len());
    for ((message, id), text) in messages.iter().zip(&ids).zip(SAMPLE_QUESTIONS) {
        assert_eq!(&message.id, id);
        assert_eq!(message.text, text);
        assert_eq!(message.reaction_count, 0);
        assert!(!message.answered);
    }

    let single = api.get_message(&room_id, &ids[1]).await.unwrap();
    assert_eq!(single.text, SAMPLE_QUESTIONS[1]);
}

#[tokio::test]
async fn test_snapshot_source_matches_list_messages() {
    let server = TestServer::start().await.expect("Failed to start server");
    let api = server.api_client();
    let (room_id, _) = seed_room(&api).await.unwrap();

    let via_port = api.fetch_messages(&room_id).await.unwrap();
    let direct = api.list_messages(&room_id).await.unwrap();
    assert_eq!(via_port, direct);
}

#[tokio::test]
async fn test_mark_answered() {
    let server = TestServer::start().await.expect("Failed to start server");
    let api = server.api_client();
    let (room_id, ids) = seed_room(&api).await.unwrap();

    api.mark_answered(&room_id, &ids[0]).await.unwrap();

    let response = server
        .get(&format!("/api/rooms/{room_id}/messages/{}", ids[0]))
        .await
        .unwrap();
    let message: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(message.answered);
}

#[tokio::test]
async fn test_unknown_room_is_unexpected_status() {
    let server = TestServer::start().await.expect("Failed to start server");
    let api = server.api_client();
    let missing = RoomId::from("no-such-room");

    let response = server
        .get("/api/rooms/no-such-room/messages")
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let err = api.list_messages(&missing).await.unwrap_err();
    assert_eq!(err.status(), Some(404));

    let err = api.fetch_messages(&missing).await.unwrap_err();
    assert_eq!(err, FetchError::UnexpectedStatus(404));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let url = closed_port_url().await.unwrap();
    let api = ApiClient::new(url, Duration::from_secs(2)).unwrap();

    let err = api.list_rooms().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));

    let err = api.fetch_messages(&RoomId::from("r1")).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
    assert!(err.is_transient());
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_react_and_unreact_return_counts() {
    let server = TestServer::start().await.expect("Failed to start server");
    let api = server.api_client();
    let (room_id, ids) = seed_room(&api).await.unwrap();

    assert_eq!(api.react(&room_id, &ids[0]).await.unwrap(), Some(1));
    assert_eq!(api.react(&room_id, &ids[0]).await.unwrap(), Some(2));
    assert_eq!(api.unreact(&room_id, &ids[0]).await.unwrap(), Some(1));

    let receipt = api.add_reaction(&room_id, &ids[1]).await.unwrap();
    assert_eq!(receipt.reaction_count, Some(1));
    let receipt = api.remove_reaction(&room_id, &ids[1]).await.unwrap();
    assert_eq!(receipt.reaction_count, Some(0));

    let message = api.get_message(&room_id, &ids[0]).await.unwrap();
    assert_eq!(message.reaction_count, 1);
}

#[tokio::test]
async fn test_unreact_never_goes_negative() {
    let server = TestServer::start().await.expect("Failed to start server");
    let api = server.api_client();
    let (room_id, ids) = seed_room(&api).await.unwrap();

    assert_eq!(api.unreact(&room_id, &ids[2]).await.unwrap(), Some(0));
}

#[tokio::test]
async fn test_reaction_failure_maps_to_reaction_error() {
    let server = TestServer::start().await.expect("Failed to start server");
    let api = server.api_client();
    let (room_id, ids) = seed_room(&api).await.unwrap();

    server.state.fail_reactions(true);

    let err = api.add_reaction(&room_id, &ids[0]).await.unwrap_err();
    assert_eq!(err, ReactionError::UnexpectedStatus(500));

    let err = api
        .remove_reaction(&room_id, &MessageId::from("missing"))
        .await
        .unwrap_err();
    assert_eq!(err, ReactionError::UnexpectedStatus(500));

    server.state.fail_reactions(false);
    let err = api
        .add_reaction(&room_id, &MessageId::from("missing"))
        .await
        .unwrap_err();
    assert_eq!(err, ReactionError::UnexpectedStatus(404));
}
