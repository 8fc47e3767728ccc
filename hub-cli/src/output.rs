//! Rendering of command results.
//!
//! Operation results are wrapped in an envelope: `{"ok": true, ...}` on
//! success and `{"ok": false, "error": ..., "kind": ...}` on failure.
//! Generated artifacts are printed as they are.

use serde::Serialize;
use serde_json::{Map, Value, json};

use stream_hub::Error;
use stream_hub::domain::{HealthCheck, Segment, Stream};

use crate::cli::OutputFormat;
#[cfg(feature = "table-output")]
use tabled::{Table, Tabled, settings::Style};

/// What a command produced.
#[derive(Debug)]
pub enum CommandOutput {
    /// Fields merged into a success envelope.
    Envelope(Value),
    /// A JSON document printed without an envelope.
    Artifact(Value),
    /// A text document printed verbatim.
    Text(String),
    Streams(Vec<Stream>),
    HealthHistory {
        stream_id: String,
        checks: Vec<HealthCheck>,
    },
    Segments {
        stream_id: String,
        segments: Vec<Segment>,
    },
}

impl CommandOutput {
    pub fn envelope<T: Serialize>(value: &T) -> stream_hub::Result<Self> {
        Ok(Self::Envelope(serde_json::to_value(value)?))
    }
}

/// Merge `fields` into `{"ok": true}`. Non-object values land under `result`.
pub fn success(fields: Value) -> Value {
    let mut envelope = Map::new();
    envelope.insert("ok".to_string(), Value::Bool(true));
    match fields {
        Value::Object(map) => {
            for (key, value) in map {
                if key != "ok" {
                    envelope.insert(key, value);
                }
            }
        }
        Value::Null => {}
        other => {
            envelope.insert("result".to_string(), other);
        }
    }
    Value::Object(envelope)
}

pub fn failure(err: &Error) -> Value {
    json!({
        "ok": false,
        "error": err.to_string(),
        "kind": err.kind(),
    })
}

pub struct OutputManager {
    format: OutputFormat,
}

impl OutputManager {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn format_json(&self, value: &Value) -> stream_hub::Result<String> {
        let text = match self.format {
            OutputFormat::JsonCompact => serde_json::to_string(value)?,
            OutputFormat::Json | OutputFormat::Table => serde_json::to_string_pretty(value)?,
        };
        Ok(text)
    }

    pub fn render(&self, output: CommandOutput) -> stream_hub::Result<String> {
        #[cfg(feature = "table-output")]
        {
            if self.format == OutputFormat::Table {
                if let Some(table) = format_table(&output) {
                    return Ok(table);
                }
            }
        }

        match output {
            CommandOutput::Envelope(fields) => self.format_json(&success(fields)),
            CommandOutput::Artifact(value) => self.format_json(&value),
            CommandOutput::Text(text) => Ok(text),
            CommandOutput::Streams(streams) => {
                self.format_json(&success(json!({ "streams": streams })))
            }
            CommandOutput::HealthHistory { stream_id, checks } => self.format_json(&success(
                json!({ "stream_id": stream_id, "checks": checks }),
            )),
            CommandOutput::Segments {
                stream_id,
                segments,
            } => self.format_json(&success(
                json!({ "stream_id": stream_id, "segments": segments }),
            )),
        }
    }

    pub fn render_failure(&self, err: &Error) -> String {
        let value = failure(err);
        self.format_json(&value).unwrap_or_else(|_| value.to_string())
    }
}

#[cfg(feature = "table-output")]
fn format_table(output: &CommandOutput) -> Option<String> {
    let table = match output {
        CommandOutput::Streams(streams) => {
            #[derive(Tabled)]
            struct StreamRow<'a> {
                id: &'a str,
                name: &'a str,
                protocol: &'static str,
                bitrate_kbps: u32,
                status: &'static str,
                created_at: String,
            }

            let rows = streams.iter().map(|s| StreamRow {
                id: &s.id,
                name: &s.name,
                protocol: s.protocol.as_str(),
                bitrate_kbps: s.bitrate_kbps,
                status: s.status.as_str(),
                created_at: s.created_at.to_rfc3339(),
            });
            Table::new(rows).with(Style::modern()).to_string()
        }
        CommandOutput::HealthHistory { checks, .. } => {
            #[derive(Tabled)]
            struct CheckRow {
                checked_at: String,
                status: &'static str,
                bitrate_kbps: u32,
                dropped_frames: u64,
                buffer_secs: f64,
                latency_ms: u64,
            }

            let rows = checks.iter().map(|c| CheckRow {
                checked_at: c.checked_at.to_rfc3339(),
                status: c.status.as_str(),
                bitrate_kbps: c.metrics.bitrate_kbps,
                dropped_frames: c.metrics.dropped_frames,
                buffer_secs: c.metrics.buffer_secs,
                latency_ms: c.metrics.latency_ms,
            });
            Table::new(rows).with(Style::modern()).to_string()
        }
        CommandOutput::Segments { segments, .. } => {
            #[derive(Tabled)]
            struct SegmentRow<'a> {
                sequence: i64,
                duration_secs: f64,
                url: &'a str,
            }

            let rows = segments.iter().map(|s| SegmentRow {
                sequence: s.sequence,
                duration_secs: s.duration_secs,
                url: &s.url,
            });
            Table::new(rows).with(Style::modern()).to_string()
        }
        _ => return None,
    };
    Some(table)
}
