//! Stream display name value object.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Longest accepted display name, in characters.
const MAX_NAME_CHARS: usize = 256;

/// Characters that would break the `NAME="..."` attribute of a master
/// playlist line.
const FORBIDDEN_CHARS: [char; 4] = ['"', ',', '\r', '\n'];

/// A validated stream display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamName(String);

impl StreamName {
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(Error::validation("stream name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_NAME_CHARS {
            return Err(Error::validation(format!(
                "stream name cannot exceed {} characters",
                MAX_NAME_CHARS
            )));
        }
        if let Some(c) = trimmed.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
            return Err(Error::validation(format!(
                "stream name cannot contain {:?}",
                c
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<StreamName> for String {
    fn from(name: StreamName) -> Self {
        name.0
    }
}
