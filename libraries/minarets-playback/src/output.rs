//! Audio output abstraction
//!
//! The transport drives an external output (a browser audio element, a
//! platform media player, a simulated output in tests). Commands go out
//! through [`AudioOutput`]; the output reports back asynchronously with
//! [`OutputEvent`]s tagged by the [`LoadToken`] of the load they belong to.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Monotonic tag identifying one `load` request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoadToken(u64);

impl LoadToken {
    /// Token that precedes every issued load
    pub const INITIAL: LoadToken = LoadToken(0);

    /// Token following this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Callback from the output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEvent {
    /// Load this event belongs to
    pub token: LoadToken,

    /// What happened
    pub kind: OutputEventKind,
}

impl OutputEvent {
    /// Media is ready to seek and play
    pub fn ready(token: LoadToken) -> Self {
        Self {
            token,
            kind: OutputEventKind::Ready,
        }
    }

    /// Playback position changed
    pub fn time_update(token: LoadToken, position: Duration) -> Self {
        Self {
            token,
            kind: OutputEventKind::TimeUpdate(position),
        }
    }

    /// Media played to its natural end
    pub fn ended(token: LoadToken) -> Self {
        Self {
            token,
            kind: OutputEventKind::Ended,
        }
    }

    /// Loading or decoding failed
    pub fn error(token: LoadToken, message: impl Into<String>) -> Self {
        Self {
            token,
            kind: OutputEventKind::Error(message.into()),
        }
    }
}

/// Kinds of output callbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputEventKind {
    /// Media is ready
    Ready,

    /// Current media position
    TimeUpdate(Duration),

    /// Natural end of media
    Ended,

    /// Network or decode failure
    Error(String),
}

/// Audio output driven by the transport
///
/// Implementations must not block: `load` starts loading and the outcome is
/// reported later through an [`OutputEvent`] carrying the same token.
pub trait AudioOutput: Send {
    /// Start loading media; replaces whatever was loaded
    fn load(&mut self, url: &str, token: LoadToken) -> Result<()>;

    /// Start or resume playback
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self) -> Result<()>;

    /// Move to a position within the media
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Stop and unload
    fn stop(&mut self) -> Result<()>;

    /// Set output volume (0-100)
    fn set_volume(&mut self, level: u8) -> Result<()>;
}

/// Output that records commands, for unit tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub commands: Vec<OutputCommand>,
    pub fail_loads: bool,
}

/// Command received by [`RecordingOutput`]
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum OutputCommand {
    Load(String, LoadToken),
    Play,
    Pause,
    Seek(Duration),
    Stop,
    Volume(u8),
}

#[cfg(test)]
impl AudioOutput for RecordingOutput {
    fn load(&mut self, url: &str, token: LoadToken) -> Result<()> {
        if self.fail_loads {
            return Err(crate::error::PlaybackError::Output(format!("cannot open {url}")));
        }
        self.commands.push(OutputCommand::Load(url.to_string(), token));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.commands.push(OutputCommand::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.commands.push(OutputCommand::Pause);
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.commands.push(OutputCommand::Seek(position));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.commands.push(OutputCommand::Stop);
        Ok(())
    }

    fn set_volume(&mut self, level: u8) -> Result<()> {
        self.commands.push(OutputCommand::Volume(level));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase() {
        let first = LoadToken::INITIAL.next();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 2);
        assert_eq!(second.to_string(), "#2");
    }
}
