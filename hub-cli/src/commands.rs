//! Dispatch of parsed subcommands onto the hub.

use tracing::debug;

use stream_hub::StreamHub;
use stream_hub::Result;
use stream_hub::domain::{HealthSample, NewSegment, NewStream, Protocol, StreamStatus};

use crate::cli::Commands;
use crate::output::CommandOutput;

pub async fn execute(hub: &StreamHub, command: Commands) -> Result<CommandOutput> {
    debug!(?command, "Executing command");

    match command {
        Commands::Create {
            name,
            source,
            target,
            protocol,
            bitrate,
        } => {
            let input = NewStream::new(name)
                .with_source(source)
                .with_target(target)
                .with_protocol(Protocol::parse(&protocol)?)
                .with_bitrate(bitrate);
            CommandOutput::envelope(&hub.create_stream(input).await?)
        }

        Commands::Start { stream_id } => {
            CommandOutput::envelope(&hub.start_stream(&stream_id).await?)
        }

        Commands::Stop { stream_id } => CommandOutput::envelope(&hub.stop_stream(&stream_id).await?),

        Commands::Health {
            stream_id,
            bitrate,
            dropped_frames,
            buffer_secs,
            latency_ms,
        } => {
            let sample = HealthSample {
                bitrate_kbps: bitrate,
                dropped_frames,
                buffer_secs,
                latency_ms,
            };
            CommandOutput::envelope(&hub.report_health(&stream_id, sample).await?)
        }

        Commands::Stats => CommandOutput::envelope(&hub.stats().await?),

        Commands::HlsConfig { stream_id } => {
            let config = hub.hls_config_for(&stream_id).await?;
            Ok(CommandOutput::Artifact(serde_json::to_value(config)?))
        }

        Commands::Playlist => Ok(CommandOutput::Text(hub.master_playlist_for_active().await?)),

        Commands::List { status } => {
            let status = status
                .as_deref()
                .map(str::parse::<StreamStatus>)
                .transpose()?;
            Ok(CommandOutput::Streams(hub.list_streams(status).await?))
        }

        Commands::HealthHistory { stream_id, limit } => {
            let checks = hub.health_history(&stream_id, limit).await?;
            Ok(CommandOutput::HealthHistory { stream_id, checks })
        }

        Commands::SegmentAdd {
            stream_id,
            sequence,
            url,
            duration,
        } => {
            let segment = NewSegment::new(sequence, url).with_duration(duration);
            CommandOutput::envelope(&hub.append_segment(&stream_id, segment).await?)
        }

        Commands::Segments { stream_id } => {
            let segments = hub.list_segments(&stream_id).await?;
            Ok(CommandOutput::Segments {
                stream_id,
                segments,
            })
        }

        Commands::MediaPlaylist { stream_id } => {
            Ok(CommandOutput::Text(hub.media_playlist_for(&stream_id).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use stream_hub::HubConfig;

    async fn open_hub(dir: &tempfile::TempDir) -> StreamHub {
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("cli.db").display());
        StreamHub::connect(&HubConfig::new(url)).await.unwrap()
    }

    fn envelope(output: CommandOutput) -> Value {
        match output {
            CommandOutput::Envelope(value) => value,
            other => panic!("expected envelope, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_start_playlist() {
        let dir = tempfile::tempdir().unwrap();
        let hub = open_hub(&dir).await;

        let created = envelope(
            execute(
                &hub,
                Commands::Create {
                    name: "High".into(),
                    source: String::new(),
                    target: "https://cdn.example.com/high.m3u8".into(),
                    protocol: "HLS".into(),
                    bitrate: 4000,
                },
            )
            .await
            .unwrap(),
        );
        assert_eq!(created["status"], "stopped");
        let id = created["id"].as_str().unwrap().to_string();

        let started = envelope(
            execute(&hub, Commands::Start { stream_id: id.clone() })
                .await
                .unwrap(),
        );
        assert_eq!(started["status"], "running");
        assert_eq!(started["stream_id"], id.as_str());

        match execute(&hub, Commands::Playlist).await.unwrap() {
            CommandOutput::Text(text) => {
                assert!(text.starts_with("#EXTM3U\n"));
                assert!(text.contains("BANDWIDTH=4000000,NAME=\"High\""));
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_edge_parsing_errors_are_validation() {
        let dir = tempfile::tempdir().unwrap();
        let hub = open_hub(&dir).await;

        let err = execute(
            &hub,
            Commands::Create {
                name: "cam".into(),
                source: String::new(),
                target: String::new(),
                protocol: "webrtc".into(),
                bitrate: 2000,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "validation_error");

        let err = execute(
            &hub,
            Commands::List {
                status: Some("paused".into()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "validation_error");

        let err = execute(
            &hub,
            Commands::Stop {
                stream_id: "missing".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
