//! WebSocket subscription tests against the mock AMA server
//!
//! Run with: cargo test -p integration-tests --test stream_tests

use std::sync::Arc;
use std::time::Duration;

use ama_core::{MessageId, RoomEvent, RoomId};
use ama_stream::{
    Connector, EventStream, ReconnectPolicy, RoomFrame, StreamConfig, StreamState, StreamUpdate,
    TransportError,
};
use integration_tests::{seed_room, unique_theme, wait_until, within, TestServer};

fn fast_reconnect() -> StreamConfig {
    StreamConfig {
        buffer: 32,
        reconnect: ReconnectPolicy::FixedDelay {
            delay: Duration::from_millis(50),
            max_attempts: Some(5),
        },
    }
}

/// Skip state updates until `target` is reached
async fn until_state(stream: &mut EventStream, target: StreamState) {
    loop {
        match within(stream.next_update()).await.unwrap() {
            Some(StreamUpdate::State(state)) if state == target => return,
            Some(_) => {}
            None => panic!("stream ended before reaching {target}"),
        }
    }
}

/// Next room event, skipping state updates
async fn next_event(stream: &mut EventStream) -> RoomEvent {
    loop {
        match within(stream.next_update()).await.unwrap() {
            Some(StreamUpdate::Event(event)) => return event,
            Some(StreamUpdate::State(_)) => {}
            Some(other) => panic!("unexpected update: {other:?}"),
            None => panic!("stream ended"),
        }
    }
}

#[tokio::test]
async fn test_events_arrive_in_server_order() {
    let server = TestServer::start().await.expect("Failed to start server");
    let api = server.api_client();
    let room_id = api.create_room(&unique_theme()).await.unwrap();

    let mut stream = EventStream::new(Arc::new(server.ws_connector()), fast_reconnect());
    stream.open(room_id.clone());
    until_state(&mut stream, StreamState::Connected).await;

    let first = api.create_message(&room_id, "first").await.unwrap();
    api.react(&room_id, &first).await.unwrap();
    api.mark_answered(&room_id, &first).await.unwrap();

    assert_eq!(
        next_event(&mut stream).await,
        RoomEvent::MessageCreated {
            id: first.clone(),
            text: "first".to_string(),
        }
    );
    assert_eq!(
        next_event(&mut stream).await,
        RoomEvent::MessageReactionChanged {
            id: first.clone(),
            count: 1,
        }
    );
    assert_eq!(
        next_event(&mut stream).await,
        RoomEvent::MessageAnswered { id: first }
    );

    stream.close();
    assert_eq!(stream.state(), StreamState::Disconnected);
}

#[tokio::test]
async fn test_undecodable_frames_are_dropped() {
    let server = TestServer::start().await.expect("Failed to start server");
    let api = server.api_client();
    let room_id = api.create_room(&unique_theme()).await.unwrap();

    let mut stream = EventStream::new(Arc::new(server.ws_connector()), fast_reconnect());
    stream.open(room_id.clone());
    until_state(&mut stream, StreamState::Connected).await;

    server.state.publish_raw(room_id.as_str(), "not json");
    server
        .state
        .publish_raw(room_id.as_str(), r#"{"kind":"typing","value":{"id":"m1"}}"#);
    server.state.publish_raw(
        room_id.as_str(),
        RoomFrame::message_answered("m9").to_json(),
    );

    assert_eq!(
        next_event(&mut stream).await,
        RoomEvent::MessageAnswered {
            id: MessageId::from("m9")
        }
    );
    assert_eq!(stream.state(), StreamState::Connected);
}

#[tokio::test]
async fn test_server_close_reconnects_with_gap() {
    let server = TestServer::start().await.expect("Failed to start server");
    let api = server.api_client();
    let (room_id, ids) = seed_room(&api).await.unwrap();

    let mut stream = EventStream::new(Arc::new(server.ws_connector()), fast_reconnect());
    stream.open(room_id.clone());
    until_state(&mut stream, StreamState::Connected).await;

    server.state.kick_subscribers(room_id.as_str());

    let gap = loop {
        match within(stream.next_update()).await.unwrap() {
            Some(StreamUpdate::Gap(gap)) => break gap,
            Some(_) => {}
            None => panic!("stream gave up instead of reconnecting"),
        }
    };
    assert_eq!(gap.reconnects, 1);
    assert_eq!(stream.state(), StreamState::Connected);

    // The new socket is live
    api.react(&room_id, &ids[0]).await.unwrap();
    assert_eq!(
        next_event(&mut stream).await,
        RoomEvent::MessageReactionChanged {
            id: ids[0].clone(),
            count: 1,
        }
    );
}

#[tokio::test]
async fn test_unknown_room_handshake_fails() {
    let server = TestServer::start().await.expect("Failed to start server");
    let connector = server.ws_connector();

    let err = connector
        .connect(&RoomId::from("no-such-room"))
        .await
        .err()
        .expect("handshake should be rejected");
    assert!(matches!(err, TransportError::Connect(_)));
}

#[tokio::test]
async fn test_unknown_room_stream_gives_up() {
    let server = TestServer::start().await.expect("Failed to start server");
    let config = StreamConfig {
        buffer: 32,
        reconnect: ReconnectPolicy::Immediate {
            max_attempts: Some(2),
        },
    };

    let mut stream = EventStream::new(Arc::new(server.ws_connector()), config);
    stream.open(RoomId::from("no-such-room"));

    let mut connecting = 0;
    while let Some(update) = within(stream.next_update()).await.unwrap() {
        match update {
            StreamUpdate::State(StreamState::Connecting) => connecting += 1,
            StreamUpdate::State(StreamState::Connected) => panic!("should never connect"),
            _ => {}
        }
    }
    // First attempt plus two retries
    assert_eq!(connecting, 3);
    assert_eq!(stream.state(), StreamState::Disconnected);
}

#[tokio::test]
async fn test_close_releases_server_subscription() {
    let server = TestServer::start().await.expect("Failed to start server");
    let api = server.api_client();
    let room_id = api.create_room(&unique_theme()).await.unwrap();

    let mut stream = EventStream::new(Arc::new(server.ws_connector()), fast_reconnect());
    stream.open(room_id.clone());
    until_state(&mut stream, StreamState::Connected).await;
    assert_eq!(server.state.subscriber_count(room_id.as_str()), 1);

    stream.close();
    assert!(within(stream.next_update()).await.unwrap().is_none());

    let state = server.state.clone();
    let id = room_id.clone();
    wait_until(move || {
        let state = state.clone();
        let id = id.clone();
        async move { state.subscriber_count(id.as_str()) == 0 }
    })
    .await
    .unwrap();
}
