mod common;

use stream_hub::Error;
use stream_hub::domain::{HealthStatus, NewStream, Protocol, StreamStatus};

use common::{count_rows, new_stream, open_hub};

#[tokio::test]
async fn test_created_stream_is_stopped() {
    let (_dir, hub) = open_hub().await;

    let stream = hub.create_stream(new_stream("cam-1")).await.unwrap();
    assert_eq!(stream.status, StreamStatus::Stopped);
    assert_eq!(stream.started_at, None);
    assert_eq!(stream.stopped_at, None);

    let stored = hub.get_stream(&stream.id).await.unwrap();
    assert_eq!(stored, stream);
}

#[tokio::test]
async fn test_invalid_input_persists_nothing() {
    let (_dir, hub) = open_hub().await;

    let inputs = vec![
        NewStream::new("   "),
        NewStream::new("bad \"name\""),
        NewStream::new("a,b"),
        NewStream::new("cam").with_bitrate(0),
        NewStream::new("cam").with_bitrate(-5),
        NewStream::new("cam").with_source("not a url"),
        NewStream::new("cam").with_target("/relative/path.m3u8"),
    ];
    for input in inputs {
        let err = hub.create_stream(input).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "unexpected error: {err}");
    }
    assert_eq!(count_rows(&hub, "streams").await, 0);
}

#[tokio::test]
async fn test_start_unknown_stream_is_not_found() {
    let (_dir, hub) = open_hub().await;

    let err = hub.start_stream("no-such-stream").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(count_rows(&hub, "health_checks").await, 0);
}

#[tokio::test]
async fn test_start_records_one_running_sample() {
    let (_dir, hub) = open_hub().await;
    let stream = hub.create_stream(new_stream("cam-1")).await.unwrap();

    let outcome = hub.start_stream(&stream.id).await.unwrap();
    assert_eq!(outcome.status, StreamStatus::Running);
    assert_eq!(outcome.stream_id, stream.id);

    let stored = hub.get_stream(&stream.id).await.unwrap();
    assert_eq!(stored.status, StreamStatus::Running);
    assert_eq!(stored.started_at, Some(outcome.started_at));
    assert_eq!(stored.stopped_at, None);
    assert_eq!(stored.version, stream.version + 1);

    let history = hub.health_history(&stream.id, None).await.unwrap();
    assert_eq!(history.len(), 1);
    let check = &history[0];
    assert_eq!(check.status, HealthStatus::Running);
    assert_eq!(check.metrics.bitrate_kbps, 3000);
    assert_eq!(check.metrics.dropped_frames, 0);
    assert_eq!(check.metrics.buffer_secs, 10.0);
    assert_eq!(check.metrics.latency_ms, 0);
    assert!(check.checked_at >= outcome.started_at);
}

#[tokio::test]
async fn test_second_start_is_already_running() {
    let (_dir, hub) = open_hub().await;
    let stream = hub.create_stream(new_stream("cam-1")).await.unwrap();

    hub.start_stream(&stream.id).await.unwrap();
    let err = hub.start_stream(&stream.id).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyRunning { .. }));
    assert_eq!(err.kind(), "already_running");

    assert_eq!(count_rows(&hub, "health_checks").await, 1);
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let (_dir, hub) = open_hub().await;
    let stream = hub.create_stream(new_stream("cam-1")).await.unwrap();

    let never_started = hub.stop_stream(&stream.id).await.unwrap();
    assert_eq!(never_started.status, StreamStatus::Stopped);
    assert!(!never_started.changed);
    assert_eq!(never_started.stopped_at, None);
    assert_eq!(hub.get_stream(&stream.id).await.unwrap().version, 0);

    hub.start_stream(&stream.id).await.unwrap();
    let first = hub.stop_stream(&stream.id).await.unwrap();
    assert!(first.changed);
    assert!(first.stopped_at.is_some());

    let second = hub.stop_stream(&stream.id).await.unwrap();
    assert!(!second.changed);
    assert_eq!(second.stopped_at, first.stopped_at);

    let stored = hub.get_stream(&stream.id).await.unwrap();
    assert_eq!(stored.status, StreamStatus::Stopped);
    assert_eq!(stored.stopped_at, first.stopped_at);
}

#[tokio::test]
async fn test_stop_unknown_stream_is_not_found() {
    let (_dir, hub) = open_hub().await;
    let err = hub.stop_stream("missing").await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn test_restart_clears_stopped_at() {
    let (_dir, hub) = open_hub().await;
    let stream = hub.create_stream(new_stream("cam-1")).await.unwrap();

    hub.start_stream(&stream.id).await.unwrap();
    hub.stop_stream(&stream.id).await.unwrap();
    let restarted = hub.start_stream(&stream.id).await.unwrap();

    let stored = hub.get_stream(&stream.id).await.unwrap();
    assert_eq!(stored.status, StreamStatus::Running);
    assert_eq!(stored.started_at, Some(restarted.started_at));
    assert_eq!(stored.stopped_at, None);
    assert_eq!(stored.version, 3);
}

#[tokio::test]
async fn test_list_filters_and_orders_newest_first() {
    let (_dir, hub) = open_hub().await;
    let first = hub.create_stream(new_stream("first")).await.unwrap();
    let second = hub
        .create_stream(new_stream("second").with_protocol(Protocol::Srt))
        .await
        .unwrap();
    hub.start_stream(&first.id).await.unwrap();

    let all = hub.list_streams(None).await.unwrap();
    let names: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["second", "first"]);

    let running = hub.list_streams(Some(StreamStatus::Running)).await.unwrap();
    assert_eq!(running.len(), 1);
    assert_eq!(running[0].id, first.id);

    let stopped = hub.list_streams(Some(StreamStatus::Stopped)).await.unwrap();
    assert_eq!(stopped.len(), 1);
    assert_eq!(stopped[0].id, second.id);

    assert!(hub.list_streams(Some(StreamStatus::Error)).await.unwrap().is_empty());
}
