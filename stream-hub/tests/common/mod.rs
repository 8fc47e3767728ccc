#![allow(dead_code)]

use tempfile::TempDir;

use stream_hub::domain::NewStream;
use stream_hub::{HubConfig, StreamHub};

/// A hub backed by a fresh SQLite file. Keep the `TempDir` alive for the
/// duration of the test.
pub async fn open_hub() -> (TempDir, StreamHub) {
    open_hub_with(|_| {}).await
}

pub async fn open_hub_with(customize: impl FnOnce(&mut HubConfig)) -> (TempDir, StreamHub) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("hub.db").display());
    let mut config = HubConfig::new(url);
    config.max_connections = 4;
    customize(&mut config);
    let hub = StreamHub::connect(&config).await.unwrap();
    (dir, hub)
}

pub async fn count_rows(hub: &StreamHub, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&hub.pool)
        .await
        .unwrap();
    count
}

pub fn new_stream(name: &str) -> NewStream {
    NewStream::new(name)
        .with_source("rtmp://ingest.example.com/live/key")
        .with_bitrate(3000)
}
