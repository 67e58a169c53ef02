//! Simulated audio output
//!
//! Reports every unit as ready and then finished straight away, so a whole
//! queue can be walked without decoding anything. Callbacks travel over a
//! channel and are fed back into the session by [`run_until_idle`].

use crate::error::Result;
use minarets_playback::{
    AudioOutput, LoadToken, OutputEvent, PlaybackError, PlayerEvent, PlayerSession,
    TransportStatus,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Output that completes units instantly
#[derive(Debug)]
pub struct SimulatedOutput {
    events: mpsc::UnboundedSender<OutputEvent>,
    token: Option<LoadToken>,
    position: Duration,
    volume: u8,
}

impl SimulatedOutput {
    /// Create an output and the receiver its callbacks arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutputEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let output = Self {
            events,
            token: None,
            position: Duration::ZERO,
            volume: 0,
        };
        (output, receiver)
    }

    /// Last position sought to
    pub fn position(&self) -> Duration {
        self.position
    }

    /// Last volume set
    pub fn volume(&self) -> u8 {
        self.volume
    }

    fn send(&self, event: OutputEvent) -> minarets_playback::Result<()> {
        self.events
            .send(event)
            .map_err(|_| PlaybackError::Output("simulated output channel closed".to_string()))
    }
}

impl AudioOutput for SimulatedOutput {
    fn load(&mut self, url: &str, token: LoadToken) -> minarets_playback::Result<()> {
        debug!(url = %url, token = %token, "Simulated load");
        self.token = Some(token);
        self.position = Duration::ZERO;
        self.send(OutputEvent::ready(token))
    }

    fn play(&mut self) -> minarets_playback::Result<()> {
        match self.token {
            Some(token) => self.send(OutputEvent::ended(token)),
            None => Err(PlaybackError::Output("nothing loaded".to_string())),
        }
    }

    fn pause(&mut self) -> minarets_playback::Result<()> {
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> minarets_playback::Result<()> {
        self.position = position;
        match self.token {
            Some(token) => self.send(OutputEvent::time_update(token, position)),
            None => Ok(()),
        }
    }

    fn stop(&mut self) -> minarets_playback::Result<()> {
        self.token = None;
        Ok(())
    }

    fn set_volume(&mut self, level: u8) -> minarets_playback::Result<()> {
        self.volume = level;
        Ok(())
    }
}

/// What happened during a simulated run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Units that were loaded
    pub started: usize,
    /// Units that played to their end
    pub finished: usize,
    /// Load or playback failures
    pub errors: usize,
    /// Whether playback ran off the end of the queue
    pub queue_finished: bool,
}

/// Feed output callbacks into the session until nothing is left to play
///
/// Stops when the queue finishes, when a failure leaves the transport
/// errored, or when the session goes idle.
pub async fn run_until_idle(
    session: &PlayerSession<SimulatedOutput>,
    callbacks: &mut mpsc::UnboundedReceiver<OutputEvent>,
) -> Result<PlaybackSummary> {
    let mut summary = PlaybackSummary::default();

    loop {
        for event in session.drain_events() {
            record(session, &mut summary, &event);
        }
        if summary.queue_finished {
            break;
        }

        let status = session.snapshot().transport.status;
        if matches!(status, TransportStatus::Idle | TransportStatus::Errored) {
            debug!(status = ?status, "Simulated playback stopped");
            break;
        }

        match callbacks.recv().await {
            Some(event) => session.handle_output_event(event)?,
            None => break,
        }
    }

    Ok(summary)
}

fn record(
    session: &PlayerSession<SimulatedOutput>,
    summary: &mut PlaybackSummary,
    event: &PlayerEvent,
) {
    match event {
        PlayerEvent::TrackChanged {
            unique_id,
            track_id,
            ..
        } => {
            summary.started += 1;
            let snapshot = session.snapshot();
            let unit = snapshot
                .queue
                .entries
                .iter()
                .find(|unit| unit.unique_id == *unique_id);
            if let Some(unit) = unit {
                info!(
                    track_id = %track_id,
                    title = %unit.title,
                    segment = %crate::report::segment_label(unit),
                    "Now playing"
                );
            }
        }
        PlayerEvent::TrackFinished { unique_id } => {
            summary.finished += 1;
            debug!(unique_id = %unique_id, "Finished");
        }
        PlayerEvent::Error { unique_id, message } => {
            summary.errors += 1;
            warn!(unique_id = ?unique_id, error = %message, "Playback failed");
        }
        PlayerEvent::QueueFinished => {
            summary.queue_finished = true;
            info!("Queue finished");
        }
        other => trace!(event = ?other, "Player event"),
    }
}
