//! Stream status state machine.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Lifecycle status of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatus {
    /// Declared but not running. Initial state.
    #[default]
    Stopped,
    /// Started and reporting healthy (or not yet reporting).
    Running,
    /// Started, last health sample was critical.
    Error,
    /// Started, last health sample was degraded.
    Buffering,
}

impl StreamStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Error => "error",
            Self::Buffering => "buffering",
        }
    }

    /// Parse from database string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stopped" => Some(Self::Stopped),
            "running" => Some(Self::Running),
            "error" => Some(Self::Error),
            "buffering" => Some(Self::Buffering),
            _ => None,
        }
    }

    /// Whether the stream has been started and not stopped since.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Stopped)
    }

    /// Validate a state transition.
    pub fn can_transition_to(&self, target: StreamStatus) -> bool {
        use StreamStatus::*;

        match (self, target) {
            // Stopping a stopped stream is a no-op.
            (Stopped, Stopped) => true,

            // start
            (Stopped | Error | Buffering, Running) => true,

            // stop
            (Running | Error | Buffering, Stopped) => true,

            // health-driven moves between the active states
            (Running | Error | Buffering, Running | Error | Buffering) => true,

            _ => false,
        }
    }

    /// Attempt to transition to a new state.
    pub fn transition_to(&self, target: StreamStatus) -> Result<StreamStatus, Error> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(Error::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }
}

impl std::fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StreamStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(&s.trim().to_ascii_lowercase()).ok_or_else(|| {
            Error::validation(format!(
                "unknown status '{}', expected one of: stopped, running, error, buffering",
                s
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str() {
        assert_eq!(StreamStatus::parse("running"), Some(StreamStatus::Running));
        assert_eq!(StreamStatus::parse("stopped"), Some(StreamStatus::Stopped));
        assert_eq!(StreamStatus::parse("RUNNING"), None);
        assert_eq!("RUNNING".parse::<StreamStatus>().unwrap(), StreamStatus::Running);
        assert!("paused".parse::<StreamStatus>().is_err());
    }

    #[test]
    fn test_default_is_stopped() {
        assert_eq!(StreamStatus::default(), StreamStatus::Stopped);
        assert!(!StreamStatus::Stopped.is_active());
        assert!(StreamStatus::Buffering.is_active());
    }

    #[test]
    fn test_start_transitions() {
        assert!(StreamStatus::Stopped.can_transition_to(StreamStatus::Running));
        assert!(StreamStatus::Error.can_transition_to(StreamStatus::Running));
        assert!(StreamStatus::Buffering.can_transition_to(StreamStatus::Running));
    }

    #[test]
    fn test_stop_transitions() {
        assert!(StreamStatus::Running.can_transition_to(StreamStatus::Stopped));
        assert!(StreamStatus::Error.can_transition_to(StreamStatus::Stopped));
        assert!(StreamStatus::Stopped.can_transition_to(StreamStatus::Stopped));
    }

    #[test]
    fn test_stopped_stream_cannot_degrade() {
        assert!(!StreamStatus::Stopped.can_transition_to(StreamStatus::Error));
        assert!(!StreamStatus::Stopped.can_transition_to(StreamStatus::Buffering));
    }

    #[test]
    fn test_transition_to_error() {
        let result = StreamStatus::Stopped.transition_to(StreamStatus::Buffering);
        assert!(matches!(result, Err(Error::InvalidStateTransition { .. })));
    }
}
