use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use stream_hub::logging::LogFormat;

/// Bookkeeping for live media streams: lifecycle, health, playlists.
#[derive(Parser, Debug)]
#[command(name = "hubctl", version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Database URL (`sqlite:...`) or path to the SQLite file
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Configuration file (defaults to <config dir>/stream-hub/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}

impl Args {
    /// Verbosity as understood by [`stream_hub::logging::init_logging`].
    pub fn verbosity(&self) -> i8 {
        if self.quiet {
            -1
        } else {
            self.verbose.min(i8::MAX as u8) as i8
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Declare a new stream
    Create {
        #[arg(long)]
        name: String,

        /// Ingest URL
        #[arg(long, default_value = "")]
        source: String,

        /// Output URL
        #[arg(long, default_value = "")]
        target: String,

        /// hls, rtmp, dash or srt
        #[arg(long, default_value = "hls")]
        protocol: String,

        /// Target bitrate in kbps
        #[arg(long, default_value_t = 2000, allow_negative_numbers = true)]
        bitrate: i64,
    },

    /// Start a stream
    Start { stream_id: String },

    /// Stop a stream
    Stop { stream_id: String },

    /// Record a health sample
    Health {
        stream_id: String,

        /// Observed bitrate in kbps (defaults to the stream's bitrate)
        #[arg(long)]
        bitrate: Option<u32>,

        #[arg(long, default_value_t = 0)]
        dropped_frames: u64,

        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        buffer_secs: f64,

        #[arg(long, default_value_t = 0)]
        latency_ms: u64,
    },

    /// Overall stream statistics
    Stats,

    /// Print the HLS configuration block of a stream
    HlsConfig { stream_id: String },

    /// Print the master playlist of all running streams
    Playlist,

    /// List streams, newest first
    List {
        /// stopped, running, error or buffering
        #[arg(long)]
        status: Option<String>,
    },

    /// Health samples of a stream, most recent first
    HealthHistory {
        stream_id: String,

        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },

    /// Record a media segment reference
    SegmentAdd {
        stream_id: String,

        #[arg(long, allow_negative_numbers = true)]
        sequence: i64,

        #[arg(long)]
        url: String,

        /// Segment duration in seconds
        #[arg(long, default_value_t = 6.0, allow_negative_numbers = true)]
        duration: f64,
    },

    /// List the segments of a stream by sequence
    Segments { stream_id: String },

    /// Print the live media playlist of a stream
    MediaPlaylist { stream_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    JsonCompact,
    /// Tables for list results, JSON otherwise
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
