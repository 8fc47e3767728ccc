//! Multi-bitrate master playlist.

use crate::domain::Stream;

/// Render a master playlist with one variant per stream, in input order.
///
/// Lines are joined by `\n` without a trailing newline. Stream names are
/// embedded literally; names containing `"` or line breaks are rejected at
/// creation.
pub fn master_playlist<'a, I>(streams: I) -> String
where
    I: IntoIterator<Item = &'a Stream>,
{
    let mut lines = vec!["#EXTM3U".to_string(), "#EXT-X-VERSION:3".to_string()];
    for stream in streams {
        let bandwidth = u64::from(stream.bitrate_kbps) * 1000;
        lines.push(format!(
            "#EXT-X-STREAM-INF:BANDWIDTH={},NAME=\"{}\"",
            bandwidth, stream.name
        ));
        lines.push(stream.playlist_url().to_string());
    }
    lines.join("\n")
}
