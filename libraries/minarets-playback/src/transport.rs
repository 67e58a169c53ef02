//! Transport controller
//!
//! State machine over the audio output:
//!
//! ```text
//! Idle -> Loading -> Playing <-> Paused
//!                       |
//!                       v
//!                     Ended        (any state) -> Errored
//! ```
//!
//! Every `load` is tagged with a fresh [`LoadToken`]. Output callbacks whose
//! token is not the latest one belong to a superseded load and are dropped,
//! so a slow load finishing after the user skipped ahead cannot disturb the
//! unit that replaced it.

use crate::error::{PlaybackError, Result};
use crate::output::{AudioOutput, LoadToken, OutputEvent, OutputEventKind};
use crate::types::{PlayableUnit, TransportState, TransportStatus};
use std::time::Duration;

/// What an output callback meant for the current unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportSignal {
    /// Callback belonged to a superseded load and was discarded
    Stale,

    /// State was updated; nothing for the queue to do
    Updated,

    /// The current unit finished (end offset or end of media)
    Ended,

    /// The current unit failed to load or play
    Failed(String),
}

/// Owns the audio output and the transport state
pub struct Transport<O: AudioOutput> {
    output: O,
    state: TransportState,
    token: LoadToken,
    unit: Option<PlayableUnit>,

    /// Start playing as soon as the pending load is ready
    autoplay: bool,

    volume: u8,
}

impl<O: AudioOutput> Transport<O> {
    /// Create an idle transport over an output
    pub fn new(output: O) -> Self {
        Self {
            output,
            state: TransportState::default(),
            token: LoadToken::INITIAL,
            unit: None,
            autoplay: true,
            volume: 100,
        }
    }

    /// Start loading a unit, superseding any earlier load
    ///
    /// Returns the token the output will tag its callbacks with. A load the
    /// output rejects outright leaves the transport `Errored`.
    pub fn load(&mut self, unit: PlayableUnit, autoplay: bool) -> LoadToken {
        self.token = self.token.next();
        self.autoplay = autoplay;
        self.state = TransportState {
            status: TransportStatus::Loading,
            current_time: unit.segment_start(),
            unit: Some(unit.unique_id),
            last_error: None,
        };

        tracing::debug!(
            token = %self.token,
            unique_id = %unit.unique_id,
            title = %unit.title,
            "Loading unit"
        );

        let result = if unit.source_url.is_empty() {
            Err(PlaybackError::Output(format!(
                "'{}' has no source URL",
                unit.title
            )))
        } else {
            self.output.load(&unit.source_url, self.token)
        };
        self.unit = Some(unit);

        if let Err(err) = result {
            self.fail(err.to_string());
        }
        self.token
    }

    /// Start or resume playback
    ///
    /// While loading this only arranges for playback to start once ready.
    pub fn play(&mut self) -> Result<()> {
        match self.state.status {
            TransportStatus::Loading => {
                self.autoplay = true;
                Ok(())
            }
            TransportStatus::Paused => {
                self.command(|output| output.play())?;
                self.state.status = TransportStatus::Playing;
                Ok(())
            }
            TransportStatus::Playing => Ok(()),
            status => Err(PlaybackError::InvalidOperation(format!(
                "cannot play while {status:?}"
            ))),
        }
    }

    /// Pause playback
    pub fn pause(&mut self) -> Result<()> {
        match self.state.status {
            TransportStatus::Loading => {
                self.autoplay = false;
                Ok(())
            }
            TransportStatus::Playing => {
                self.command(|output| output.pause())?;
                self.state.status = TransportStatus::Paused;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Seek within the current unit's segment
    ///
    /// The position is clamped into `[segment start, segment end]`, or only
    /// to the start when the end is unknown; the clamped position is returned.
    pub fn seek(&mut self, position: Duration) -> Result<Duration> {
        if !matches!(
            self.state.status,
            TransportStatus::Playing | TransportStatus::Paused
        ) {
            return Err(PlaybackError::InvalidOperation(format!(
                "cannot seek while {:?}",
                self.state.status
            )));
        }
        let unit = self.unit.as_ref().ok_or(PlaybackError::NoCurrentEntry)?;

        let start = unit.segment_start();
        let target = match unit.segment_end() {
            Some(end) => position.clamp(start, end.max(start)),
            None => position.max(start),
        };

        self.command(|output| output.seek(target))?;
        self.state.current_time = target;
        Ok(target)
    }

    /// Seek back to the start of the segment
    pub fn restart(&mut self) -> Result<Duration> {
        self.seek(Duration::ZERO)
    }

    /// Stop and unload; pending callbacks become stale
    pub fn stop(&mut self) -> Result<()> {
        self.token = self.token.next();
        self.unit = None;
        self.state = TransportState::default();
        self.output.stop()
    }

    /// Set output volume (clamped to 100)
    pub fn set_volume(&mut self, level: u8) -> Result<()> {
        let level = level.min(100);
        self.output.set_volume(level)?;
        self.volume = level;
        Ok(())
    }

    /// Apply an output callback
    pub fn handle_event(&mut self, event: OutputEvent) -> TransportSignal {
        if event.token != self.token || self.state.status == TransportStatus::Idle {
            tracing::trace!(
                token = %event.token,
                latest = %self.token,
                "Discarding stale output event"
            );
            return TransportSignal::Stale;
        }

        match event.kind {
            OutputEventKind::Ready => self.on_ready(),
            OutputEventKind::TimeUpdate(position) => self.on_time_update(position),
            OutputEventKind::Ended => self.on_ended(),
            OutputEventKind::Error(message) => {
                tracing::warn!(token = %event.token, error = %message, "Output reported an error");
                self.fail(message.clone());
                TransportSignal::Failed(message)
            }
        }
    }

    fn on_ready(&mut self) -> TransportSignal {
        if self.state.status != TransportStatus::Loading {
            return TransportSignal::Updated;
        }

        let start = self.unit.as_ref().and_then(|unit| unit.start_offset);
        if let Some(start) = start {
            if let Err(err) = self.command(|output| output.seek(start)) {
                return TransportSignal::Failed(err.to_string());
            }
            self.state.current_time = start;
        }

        if self.autoplay {
            if let Err(err) = self.command(|output| output.play()) {
                return TransportSignal::Failed(err.to_string());
            }
            self.state.status = TransportStatus::Playing;
        } else {
            self.state.status = TransportStatus::Paused;
        }
        TransportSignal::Updated
    }

    fn on_time_update(&mut self, position: Duration) -> TransportSignal {
        self.state.current_time = position;

        let end = self.unit.as_ref().and_then(|unit| unit.end_offset);
        match end {
            Some(end) if self.state.status == TransportStatus::Playing && position >= end => {
                if let Err(err) = self.command(|output| output.pause()) {
                    return TransportSignal::Failed(err.to_string());
                }
                self.state.status = TransportStatus::Ended;
                TransportSignal::Ended
            }
            _ => TransportSignal::Updated,
        }
    }

    fn on_ended(&mut self) -> TransportSignal {
        if matches!(
            self.state.status,
            TransportStatus::Ended | TransportStatus::Errored
        ) {
            return TransportSignal::Updated;
        }

        if let Some(end) = self.unit.as_ref().and_then(PlayableUnit::segment_end) {
            self.state.current_time = end;
        }
        self.state.status = TransportStatus::Ended;
        TransportSignal::Ended
    }

    /// Run an output command; a failure moves the transport to `Errored`
    fn command(&mut self, f: impl FnOnce(&mut O) -> Result<()>) -> Result<()> {
        let result = f(&mut self.output);
        if let Err(err) = &result {
            self.fail(err.to_string());
        }
        result
    }

    fn fail(&mut self, message: String) {
        tracing::warn!(token = %self.token, error = %message, "Transport errored");
        self.state.status = TransportStatus::Errored;
        self.state.last_error = Some(message);
    }

    /// Current transport state
    pub fn state(&self) -> &TransportState {
        &self.state
    }

    /// Current status
    pub fn status(&self) -> TransportStatus {
        self.state.status
    }

    /// Unit loaded in the output
    pub fn unit(&self) -> Option<&PlayableUnit> {
        self.unit.as_ref()
    }

    /// Token of the latest load
    pub fn token(&self) -> LoadToken {
        self.token
    }

    /// Current volume
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// The underlying output
    pub fn output(&self) -> &O {
        &self.output
    }

    /// The underlying output, mutably
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}
