//! Delivery protocol value object.

use serde::{Deserialize, Serialize};

/// Protocol a stream is declared with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::VariantNames,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// HTTP Live Streaming.
    #[default]
    Hls,
    Rtmp,
    /// MPEG-DASH.
    Dash,
    /// Secure Reliable Transport.
    Srt,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Parse a protocol name, mapping unknown values to a validation error.
    pub fn parse(s: &str) -> crate::Result<Self> {
        s.trim().parse::<Self>().map_err(|_| {
            crate::Error::validation(format!(
                "unknown protocol '{}', expected one of: {}",
                s,
                <Self as strum::VariantNames>::VARIANTS.join(", ")
            ))
        })
    }
}
