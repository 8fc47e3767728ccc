//! Per-stream HLS configuration block.

use serde::{Deserialize, Serialize};

use crate::domain::Stream;

/// One rendition of the variant ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HlsVariant {
    pub bitrate_kbps: u32,
    pub suffix: String,
}

impl HlsVariant {
    fn new(bitrate_kbps: u32, suffix: &str) -> Self {
        Self {
            bitrate_kbps,
            suffix: suffix.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HlsConfig {
    pub stream_id: String,
    /// Always `"HLS"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub output: String,
    pub segment_duration: u32,
    pub playlist_size: u32,
    pub buffer_seconds: u32,
    pub low_latency: bool,
    pub encryption: bool,
    pub target_bitrate_kbps: u32,
    pub variants: Vec<HlsVariant>,
}

/// Build the HLS configuration for `stream`.
///
/// The variant ladder is full, half and quarter of the configured bitrate
/// (integer division).
pub fn hls_config(stream: &Stream) -> HlsConfig {
    let bitrate = stream.bitrate_kbps;
    HlsConfig {
        stream_id: stream.id.clone(),
        kind: "HLS".to_string(),
        source: stream.source_url.clone(),
        output: stream.output_url(),
        segment_duration: stream.config.segment_duration_secs,
        playlist_size: stream.config.playlist_size,
        buffer_seconds: stream.config.buffer_secs,
        low_latency: stream.config.low_latency,
        encryption: stream.config.encryption,
        target_bitrate_kbps: bitrate,
        variants: vec![
            HlsVariant::new(bitrate, "high"),
            HlsVariant::new(bitrate / 2, "med"),
            HlsVariant::new(bitrate / 4, "low"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Protocol;

    #[test]
    fn test_variant_ladder_uses_integer_division() {
        let stream = Stream::new("cam", "rtmp://in/live", "", Protocol::Rtmp, 4500);
        let config = hls_config(&stream);

        let bitrates: Vec<u32> = config.variants.iter().map(|v| v.bitrate_kbps).collect();
        assert_eq!(bitrates, vec![4500, 2250, 1125]);

        let stream = Stream::new("cam", "", "", Protocol::Hls, 1);
        let bitrates: Vec<u32> = hls_config(&stream)
            .variants
            .iter()
            .map(|v| v.bitrate_kbps)
            .collect();
        assert_eq!(bitrates, vec![1, 0, 0]);
    }

    #[test]
    fn test_output_falls_back_to_derived_path() {
        let stream = Stream::new("cam", "rtmp://in/live", "", Protocol::Rtmp, 2000);
        let config = hls_config(&stream);
        assert_eq!(config.output, format!("/streams/{}/playlist.m3u8", stream.id));
        assert_eq!(config.source, "rtmp://in/live");
    }

    #[test]
    fn test_serialized_shape() {
        let mut stream = Stream::new("cam", "", "https://cdn/out.m3u8", Protocol::Hls, 3000);
        stream.config.low_latency = true;
        let json = serde_json::to_value(hls_config(&stream)).unwrap();

        assert_eq!(json["type"], "HLS");
        assert_eq!(json["output"], "https://cdn/out.m3u8");
        assert_eq!(json["segment_duration"], 6);
        assert_eq!(json["playlist_size"], 5);
        assert_eq!(json["buffer_seconds"], 10);
        assert_eq!(json["low_latency"], true);
        assert_eq!(json["target_bitrate_kbps"], 3000);
        assert_eq!(json["variants"][1]["suffix"], "med");
        assert_eq!(json["variants"][2]["bitrate_kbps"], 750);
    }
}
