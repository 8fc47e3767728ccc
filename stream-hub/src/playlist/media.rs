//! Live media playlist built from a stream's segment references.

use crate::domain::{Segment, Stream};

/// Render the media playlist for `stream`.
///
/// Only the last `playlist_size` segments by sequence are listed. The
/// playlist is closed with `#EXT-X-ENDLIST` once the stream is stopped.
pub fn media_playlist(stream: &Stream, segments: &[Segment]) -> String {
    let mut ordered: Vec<&Segment> = segments.iter().collect();
    ordered.sort_by_key(|s| s.sequence);

    let window_len = stream.config.playlist_size as usize;
    let window = &ordered[ordered.len().saturating_sub(window_len)..];

    let target_duration = window
        .iter()
        .map(|s| s.duration_secs)
        .fold(f64::from(stream.config.segment_duration_secs), f64::max)
        .ceil() as u64;
    let media_sequence = window.first().map(|s| s.sequence).unwrap_or(0);

    let mut lines = vec![
        "#EXTM3U".to_string(),
        "#EXT-X-VERSION:3".to_string(),
        format!("#EXT-X-TARGETDURATION:{}", target_duration),
        format!("#EXT-X-MEDIA-SEQUENCE:{}", media_sequence),
    ];
    for segment in window {
        lines.push(format!("#EXTINF:{:.3},", segment.duration_secs));
        lines.push(segment.url.clone());
    }
    if !stream.status.is_active() {
        lines.push("#EXT-X-ENDLIST".to_string());
    }

    let mut playlist = lines.join("\n");
    playlist.push('\n');
    playlist
}
