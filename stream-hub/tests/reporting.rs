mod common;

use stream_hub::domain::{HealthSample, NewSegment, NewStream, Protocol, StreamStatus};

use common::{count_rows, new_stream, open_hub};

#[tokio::test]
async fn test_stats_after_start() {
    let (_dir, hub) = open_hub().await;
    let running = hub.create_stream(new_stream("main")).await.unwrap();
    hub.create_stream(new_stream("spare").with_protocol(Protocol::Rtmp))
        .await
        .unwrap();
    hub.start_stream(&running.id).await.unwrap();

    let stats = hub.stats().await.unwrap();
    assert_eq!(stats.total_streams, 2);
    assert_eq!(stats.by_status.get("running"), Some(&1));
    assert_eq!(stats.by_status.get("stopped"), Some(&1));
    assert_eq!(stats.by_status.get("error"), None);
    assert_eq!(stats.by_protocol.get("hls"), Some(&1));
    assert_eq!(stats.by_protocol.get("rtmp"), Some(&1));

    assert_eq!(stats.recent_health.len(), 1);
    assert_eq!(stats.recent_health[0].stream_name, "main");
    assert_eq!(stats.recent_health[0].status, "running");
}

#[tokio::test]
async fn test_stats_caps_recent_health() {
    let (_dir, hub) = open_hub().await;
    let stream = hub.create_stream(new_stream("main")).await.unwrap();
    for dropped in 0..25 {
        hub.report_health(&stream.id, HealthSample::new().with_dropped_frames(dropped))
            .await
            .unwrap();
    }

    let stats = hub.stats().await.unwrap();
    assert_eq!(stats.recent_health.len(), 20);
    assert_eq!(stats.recent_health[0].dropped_frames, 24);
}

#[tokio::test]
async fn test_hls_config_for_stream() {
    let (_dir, hub) = open_hub().await;
    let stream = hub.create_stream(new_stream("main")).await.unwrap();

    let config = hub.hls_config_for(&stream.id).await.unwrap();
    assert_eq!(config.kind, "HLS");
    let ladder: Vec<(u32, &str)> = config
        .variants
        .iter()
        .map(|v| (v.bitrate_kbps, v.suffix.as_str()))
        .collect();
    assert_eq!(ladder, vec![(3000, "high"), (1500, "med"), (750, "low")]);

    assert!(hub.hls_config_for("missing").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_master_playlist_lists_started_streams_only() {
    let (_dir, hub) = open_hub().await;
    let high = hub
        .create_stream(
            NewStream::new("High")
                .with_bitrate(4000)
                .with_target("https://cdn.example.com/high.m3u8"),
        )
        .await
        .unwrap();
    let low = hub
        .create_stream(
            NewStream::new("Low")
                .with_bitrate(800)
                .with_target("https://cdn.example.com/low.m3u8"),
        )
        .await
        .unwrap();
    hub.create_stream(NewStream::new("Idle")).await.unwrap();

    assert_eq!(
        hub.master_playlist_for_active().await.unwrap(),
        "#EXTM3U\n#EXT-X-VERSION:3"
    );

    hub.start_stream(&high.id).await.unwrap();
    hub.start_stream(&low.id).await.unwrap();

    let playlist = hub.master_playlist_for_active().await.unwrap();
    assert_eq!(playlist.lines().next(), Some("#EXTM3U"));
    assert!(playlist.contains("BANDWIDTH=4000000"));
    assert!(playlist.contains("NAME=\"High\""));
    assert!(playlist.contains("https://cdn.example.com/low.m3u8"));
    assert!(!playlist.contains("Idle"));
}

#[tokio::test]
async fn test_degraded_stream_stays_in_master_playlist() {
    let (_dir, hub) = open_hub().await;
    let high = hub
        .create_stream(
            NewStream::new("High")
                .with_bitrate(4000)
                .with_target("https://cdn.example.com/high.m3u8"),
        )
        .await
        .unwrap();
    let low = hub
        .create_stream(
            NewStream::new("Low")
                .with_bitrate(800)
                .with_target("https://cdn.example.com/low.m3u8"),
        )
        .await
        .unwrap();
    hub.start_stream(&high.id).await.unwrap();
    hub.start_stream(&low.id).await.unwrap();

    let report = hub
        .report_health(&high.id, HealthSample::new().with_dropped_frames(60))
        .await
        .unwrap();
    assert_eq!(report.stream_status, StreamStatus::Buffering);
    hub.report_health(&low.id, HealthSample::new().with_latency_ms(6000))
        .await
        .unwrap();
    assert_eq!(
        hub.get_stream(&low.id).await.unwrap().status,
        StreamStatus::Error
    );

    let playlist = hub.master_playlist_for_active().await.unwrap();
    assert!(playlist.contains("BANDWIDTH=4000000,NAME=\"High\""));
    assert!(playlist.contains("BANDWIDTH=800000,NAME=\"Low\""));

    hub.stop_stream(&low.id).await.unwrap();
    let playlist = hub.master_playlist_for_active().await.unwrap();
    assert!(playlist.contains("NAME=\"High\""));
    assert!(!playlist.contains("NAME=\"Low\""));
}

#[tokio::test]
async fn test_segments_read_back_in_sequence_order() {
    let (_dir, hub) = open_hub().await;
    let stream = hub.create_stream(new_stream("main")).await.unwrap();

    for seq in [2, 0, 1] {
        let appended = hub
            .append_segment(&stream.id, NewSegment::new(seq, format!("seg{}.ts", seq)))
            .await
            .unwrap();
        assert_eq!(appended.sequence, seq);
        assert_eq!(appended.stream_id, stream.id);
    }

    let segments = hub.list_segments(&stream.id).await.unwrap();
    let urls: Vec<&str> = segments.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(urls, vec!["seg0.ts", "seg1.ts", "seg2.ts"]);
    assert!(segments.iter().all(|s| s.duration_secs == 6.0));
}

#[tokio::test]
async fn test_segment_append_checks_input() {
    let (_dir, hub) = open_hub().await;
    let stream = hub.create_stream(new_stream("main")).await.unwrap();

    let err = hub
        .append_segment("missing", NewSegment::new(0, "seg0.ts"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = hub
        .append_segment(&stream.id, NewSegment::new(0, "seg0.ts").with_duration(-2.0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation_error");

    assert_eq!(count_rows(&hub, "segments").await, 0);
}

#[tokio::test]
async fn test_media_playlist_window() {
    let (_dir, hub) = open_hub().await;
    let stream = hub.create_stream(new_stream("main")).await.unwrap();
    hub.start_stream(&stream.id).await.unwrap();

    for seq in 0..8 {
        hub.append_segment(
            &stream.id,
            NewSegment::new(seq, format!("https://cdn.example.com/seg{}.ts", seq)).with_duration(4.0),
        )
        .await
        .unwrap();
    }

    let live = hub.media_playlist_for(&stream.id).await.unwrap();
    match m3u8_rs::parse_playlist_res(live.as_bytes()) {
        Ok(m3u8_rs::Playlist::MediaPlaylist(pl)) => {
            assert_eq!(pl.media_sequence, 3);
            assert_eq!(pl.segments.len(), 5);
            assert_eq!(pl.segments[0].uri, "https://cdn.example.com/seg3.ts");
            assert!(!pl.end_list);
        }
        other => panic!("expected media playlist, got {:?}", other),
    }

    hub.stop_stream(&stream.id).await.unwrap();
    assert_eq!(
        hub.get_stream(&stream.id).await.unwrap().status,
        StreamStatus::Stopped
    );
    let ended = hub.media_playlist_for(&stream.id).await.unwrap();
    assert!(ended.ends_with("#EXT-X-ENDLIST\n"));
}
