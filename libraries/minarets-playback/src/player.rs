//! Player - core orchestration
//!
//! Couples the queue with the transport: queue cursor changes become loads,
//! and units ending on the transport advance the queue. Platform code feeds
//! output callbacks in through [`Player::handle_output_event`] and drains
//! [`PlayerEvent`]s for the UI.

use crate::{
    error::{InvalidQueueOperation, PlaybackError, Result},
    events::PlayerEvent,
    output::{AudioOutput, OutputEvent, OutputEventKind},
    queue::{Insertion, Queue, QueueSnapshot},
    transport::{Transport, TransportSignal},
    types::{PlayableUnit, PlaybackConfig, TransportState, TransportStatus, UniqueId},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything a now-playing view renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Queue contents and cursor
    pub queue: QueueSnapshot,

    /// Transport status and position
    pub transport: TransportState,

    /// Output volume (0-100)
    pub volume: u8,
}

/// Queue plus transport for one playback session
pub struct Player<O: AudioOutput> {
    queue: Queue,
    transport: Transport<O>,
    config: PlaybackConfig,

    // Status last reported through StatusChanged
    reported_status: TransportStatus,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl<O: AudioOutput> Player<O> {
    /// Create a player over an output
    pub fn new(config: PlaybackConfig, output: O) -> Result<Self> {
        let mut queue = match config.shuffle_seed {
            Some(seed) => Queue::with_seed(seed),
            None => Queue::new(),
        };
        queue.set_shuffle_mode(config.shuffle);

        let mut transport = Transport::new(output);
        transport.set_volume(config.volume)?;

        Ok(Self {
            queue,
            transport,
            config,
            reported_status: TransportStatus::Idle,
            pending_events: Vec::new(),
        })
    }

    // ===== Queue entry points =====

    /// Replace the queue with `units` and start playing the first one
    pub fn play_tracks(&mut self, units: Vec<PlayableUnit>) -> Result<()> {
        let previous = self.current_id();
        self.queue.replace_and_play(units);
        self.emit_queue_changed();

        if self.queue.current().is_some() {
            self.start_current(previous, true)
        } else {
            self.transport.stop()?;
            self.sync_status();
            Ok(())
        }
    }

    /// Insert `units` to play right after the current unit
    ///
    /// Starts playback when nothing was playing. On a stopped player the
    /// batch replaces the queue, as with [`Player::play_tracks`].
    pub fn queue_priority_tracks(&mut self, units: Vec<PlayableUnit>) -> Result<Insertion> {
        if !units.is_empty()
            && self.transport.status() == TransportStatus::Idle
            && self.queue.current().is_some()
        {
            tracing::debug!("Priority batch on a stopped player replaces the queue");
            self.play_tracks(units)?;
            return Ok(Insertion::Replaced);
        }

        let previous = self.current_id();
        let insertion = self.queue.append_priority(units);

        match insertion {
            Insertion::Empty => {}
            Insertion::InsertedAt(_) => self.emit_queue_changed(),
            Insertion::Replaced => {
                self.emit_queue_changed();
                self.start_current(previous, true)?;
            }
        }
        Ok(insertion)
    }

    // ===== Output callbacks =====

    /// Apply a callback from the audio output
    ///
    /// Callbacks from superseded loads are ignored. A unit that ends moves
    /// the queue on and loads the next unit; a failure stops on the failed
    /// unit unless `skip_on_error` is set.
    pub fn handle_output_event(&mut self, event: OutputEvent) -> Result<()> {
        let position = match event.kind {
            OutputEventKind::TimeUpdate(position) => Some(position),
            _ => None,
        };

        match self.transport.handle_event(event) {
            TransportSignal::Stale => Ok(()),
            TransportSignal::Updated => {
                self.sync_status();
                if let (Some(position), Some(unit)) = (position, self.transport.unit()) {
                    let end = unit.segment_end();
                    self.emit(PlayerEvent::PositionUpdate { position, end });
                }
                Ok(())
            }
            TransportSignal::Ended => {
                self.sync_status();
                if let Some(unique_id) = self.current_id() {
                    tracing::debug!(unique_id = %unique_id, "Unit finished");
                    self.emit(PlayerEvent::TrackFinished { unique_id });
                }
                self.advance_and_start()
            }
            TransportSignal::Failed(message) => {
                self.sync_status();
                self.emit(PlayerEvent::Error {
                    unique_id: self.current_id(),
                    message,
                });
                if self.config.skip_on_error {
                    self.advance_and_start()
                } else {
                    Ok(())
                }
            }
        }
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// Retries a unit that failed, reloads after `stop`, and starts over
    /// from the top once the queue has finished.
    pub fn play(&mut self) -> Result<()> {
        match self.transport.status() {
            TransportStatus::Loading | TransportStatus::Paused | TransportStatus::Playing => {
                self.transport.play()?;
                self.sync_status();
                Ok(())
            }
            TransportStatus::Idle | TransportStatus::Ended | TransportStatus::Errored => {
                if self.queue.current().is_none() {
                    if self.queue.is_empty() {
                        return Err(PlaybackError::QueueEmpty);
                    }
                    self.queue.skip_to(0)?;
                    self.emit_queue_changed();
                }
                self.start_current(None, true)
            }
        }
    }

    /// Pause playback
    pub fn pause(&mut self) -> Result<()> {
        self.transport.pause()?;
        self.sync_status();
        Ok(())
    }

    /// Stop playback (the queue and cursor are kept)
    pub fn stop(&mut self) -> Result<()> {
        self.transport.stop()?;
        self.sync_status();
        Ok(())
    }

    /// Skip to the next unit; past the last unit playback stops
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        let previous = self.current_id();
        let has_next = self.queue.advance()?.is_some();
        self.emit_queue_changed();

        if has_next {
            self.start_current(previous, true)
        } else {
            self.transport.stop()?;
            self.sync_status();
            self.emit(PlayerEvent::QueueFinished);
            Ok(())
        }
    }

    /// Go to the previous unit
    ///
    /// Past `restart_threshold` into the current unit this restarts it
    /// instead; on the first unit it always restarts.
    pub fn previous(&mut self) -> Result<()> {
        let threshold = self.config.restart_threshold();
        let state = self.transport.state();
        let seekable = matches!(
            state.status,
            TransportStatus::Playing | TransportStatus::Paused
        );
        let past_threshold = seekable
            && self.transport.unit().is_some_and(|unit| {
                state.current_time.saturating_sub(unit.segment_start()) > threshold
            });

        if past_threshold {
            self.transport.restart()?;
            return Ok(());
        }

        let previous = self.current_id();
        match self.queue.previous() {
            Ok(_) => {
                self.emit_queue_changed();
                self.start_current(previous, true)
            }
            Err(InvalidQueueOperation::AtStart) if seekable => {
                self.transport.restart()?;
                Ok(())
            }
            Err(InvalidQueueOperation::AtStart) => self.start_current(previous, true),
            Err(err) => Err(err.into()),
        }
    }

    /// Jump to a queue index and play it
    pub fn skip_to(&mut self, index: usize) -> Result<()> {
        let previous = self.current_id();
        self.queue.skip_to(index)?;
        self.emit_queue_changed();
        self.start_current(previous, true)
    }

    /// Remove a unit from the queue
    ///
    /// Removing the current unit moves playback to the unit that followed
    /// it, or stops when there is none.
    pub fn remove(&mut self, unique_id: UniqueId) -> Result<PlayableUnit> {
        let was_active = matches!(
            self.transport.status(),
            TransportStatus::Playing | TransportStatus::Loading
        );

        let removal = self.queue.remove(unique_id)?;
        self.emit_queue_changed();

        if removal.was_current {
            if self.queue.current().is_some() {
                self.start_current(Some(unique_id), was_active)?;
            } else {
                self.transport.stop()?;
                self.sync_status();
            }
        }
        Ok(removal.removed)
    }

    /// Shuffle the units after the current one
    pub fn shuffle_remaining(&mut self) {
        self.queue.shuffle_remaining();
        self.emit_queue_changed();
    }

    /// Return the queue to sequential mode
    pub fn set_sequential(&mut self) {
        self.queue.set_sequential();
    }

    /// Empty the queue and stop
    pub fn clear(&mut self) -> Result<()> {
        self.queue.clear();
        self.emit_queue_changed();
        self.stop()
    }

    /// Seek within the current unit
    pub fn seek(&mut self, position: Duration) -> Result<Duration> {
        self.transport.seek(position)
    }

    /// Set volume (0-100)
    pub fn set_volume(&mut self, level: u8) -> Result<()> {
        self.transport.set_volume(level)
    }

    // ===== State Queries =====

    /// Snapshot for rendering
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            queue: self.queue.snapshot(),
            transport: self.transport.state().clone(),
            volume: self.transport.volume(),
        }
    }

    /// The queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// The transport
    pub fn transport(&self) -> &Transport<O> {
        &self.transport
    }

    /// The transport, mutably (for platform access to the output)
    pub fn transport_mut(&mut self) -> &mut Transport<O> {
        &mut self.transport
    }

    /// Session configuration
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Current transport status
    pub fn status(&self) -> TransportStatus {
        self.transport.status()
    }

    /// Currently queued unit
    pub fn current(&self) -> Option<&PlayableUnit> {
        self.queue.current()
    }

    /// Drain all pending events
    ///
    /// Returns all events that have been emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Load the queue's current unit
    ///
    /// With `skip_on_error`, units the output rejects outright are skipped
    /// until one loads or the queue runs out.
    fn start_current(&mut self, previous: Option<UniqueId>, autoplay: bool) -> Result<()> {
        let mut previous = previous;
        loop {
            let Some(unit) = self.queue.current().cloned() else {
                self.transport.stop()?;
                self.sync_status();
                self.emit(PlayerEvent::QueueFinished);
                return Ok(());
            };

            let unique_id = unit.unique_id;
            let track_id = unit.track_id.clone();
            self.transport.load(unit, autoplay);
            self.emit(PlayerEvent::TrackChanged {
                unique_id,
                track_id,
                previous,
            });
            self.sync_status();

            if self.transport.status() != TransportStatus::Errored {
                return Ok(());
            }

            let message = self
                .transport
                .state()
                .last_error
                .clone()
                .unwrap_or_default();
            self.emit(PlayerEvent::Error {
                unique_id: Some(unique_id),
                message,
            });
            if !self.config.skip_on_error {
                return Ok(());
            }

            previous = Some(unique_id);
            self.queue.advance()?;
            self.emit_queue_changed();
        }
    }

    /// Move past a finished or failed unit and load what follows
    fn advance_and_start(&mut self) -> Result<()> {
        let previous = self.current_id();
        match self.queue.advance() {
            Ok(next) => {
                let finished = next.is_none();
                self.emit_queue_changed();
                if finished {
                    if self.transport.status() == TransportStatus::Errored {
                        self.transport.stop()?;
                        self.sync_status();
                    }
                    tracing::info!("Queue finished");
                    self.emit(PlayerEvent::QueueFinished);
                    Ok(())
                } else {
                    self.start_current(previous, true)
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "Nothing to advance past");
                Ok(())
            }
        }
    }

    fn current_id(&self) -> Option<UniqueId> {
        self.queue.current().map(|unit| unit.unique_id)
    }

    fn sync_status(&mut self) {
        let status = self.transport.status();
        if status != self.reported_status {
            self.reported_status = status;
            self.emit(PlayerEvent::StatusChanged { status });
        }
    }

    fn emit_queue_changed(&mut self) {
        self.emit(PlayerEvent::QueueChanged {
            length: self.queue.len(),
            cursor: self.queue.cursor(),
        });
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }
}
