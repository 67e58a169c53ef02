//! Playback session
//!
//! One [`PlayerSession`] holds the queue and transport for as long as the
//! application serves a user, independent of which view is showing. Handles
//! are cheap clones of the same session; views read state through
//! [`PlayerSession::subscribe`] and mutate it through the session methods.
//!
//! Every mutation runs to completion under the session lock, so racing
//! callers apply in call order and never observe a half-applied change.
//! Catalog lookups for references happen before the lock is taken.

use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::output::{AudioOutput, OutputEvent};
use crate::player::{Player, PlayerSnapshot};
use crate::queue::Insertion;
use crate::resolver::{resolve_references, PlayableRef, ResolvedBatch};
use crate::types::{PlayableUnit, PlaybackConfig, UniqueId};
use minarets_core::Catalog;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

struct SessionInner<O: AudioOutput> {
    player: Mutex<Player<O>>,
    snapshot: watch::Sender<PlayerSnapshot>,
    closed: AtomicBool,
}

/// Shared handle to a playback session
pub struct PlayerSession<O: AudioOutput> {
    inner: Arc<SessionInner<O>>,
}

impl<O: AudioOutput> Clone for PlayerSession<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: AudioOutput> PlayerSession<O> {
    /// Start a session over an audio output
    pub fn start(config: PlaybackConfig, output: O) -> Result<Self> {
        let player = Player::new(config, output)?;
        let (snapshot, _) = watch::channel(player.snapshot());

        tracing::info!("Playback session started");
        Ok(Self {
            inner: Arc::new(SessionInner {
                player: Mutex::new(player),
                snapshot,
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// Stop playback, empty the queue, and refuse further operations
    ///
    /// Idempotent; every handle observes the shutdown.
    pub fn shutdown(&self) -> Result<()> {
        let mut player = self.lock();
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let result = player.clear();
        self.inner.snapshot.send_replace(player.snapshot());
        tracing::info!("Playback session shut down");
        result
    }

    /// Whether the session has been shut down
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Receive the latest `{ queue, transport }` snapshot on every change
    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.lock().snapshot()
    }

    /// Replace the queue and play
    pub fn play_tracks(&self, units: Vec<PlayableUnit>) -> Result<()> {
        self.mutate(|player| player.play_tracks(units))
    }

    /// Queue units to play next
    pub fn queue_priority_tracks(&self, units: Vec<PlayableUnit>) -> Result<Insertion> {
        self.mutate(|player| player.queue_priority_tracks(units))
    }

    /// Resolve references through the catalog, then replace the queue and play
    ///
    /// Returns the resolution report so callers can surface missing concerts.
    pub async fn play_references<C>(
        &self,
        catalog: &C,
        references: &[PlayableRef],
    ) -> Result<ResolvedBatch>
    where
        C: Catalog + ?Sized,
    {
        self.ensure_open()?;
        let batch = resolve_references(catalog, references).await?;
        let units = batch.units.iter().map(|r| r.unit.clone()).collect();
        self.play_tracks(units)?;
        Ok(batch)
    }

    /// Resolve references through the catalog, then queue them to play next
    pub async fn queue_priority_references<C>(
        &self,
        catalog: &C,
        references: &[PlayableRef],
    ) -> Result<ResolvedBatch>
    where
        C: Catalog + ?Sized,
    {
        self.ensure_open()?;
        let batch = resolve_references(catalog, references).await?;
        let units = batch.units.iter().map(|r| r.unit.clone()).collect();
        self.queue_priority_tracks(units)?;
        Ok(batch)
    }

    /// Feed an audio output callback into the session
    pub fn handle_output_event(&self, event: OutputEvent) -> Result<()> {
        self.mutate(|player| player.handle_output_event(event))
    }

    /// Start or resume playback
    pub fn play(&self) -> Result<()> {
        self.mutate(Player::play)
    }

    /// Pause playback
    pub fn pause(&self) -> Result<()> {
        self.mutate(Player::pause)
    }

    /// Stop playback, keeping the queue
    pub fn stop(&self) -> Result<()> {
        self.mutate(Player::stop)
    }

    /// Skip to the next unit
    pub fn next(&self) -> Result<()> {
        self.mutate(Player::next)
    }

    /// Restart or go to the previous unit
    pub fn previous(&self) -> Result<()> {
        self.mutate(Player::previous)
    }

    /// Jump to a queue index
    pub fn skip_to(&self, index: usize) -> Result<()> {
        self.mutate(|player| player.skip_to(index))
    }

    /// Remove a unit by its unique id
    pub fn remove(&self, unique_id: UniqueId) -> Result<PlayableUnit> {
        self.mutate(|player| player.remove(unique_id))
    }

    /// Shuffle the units after the current one
    pub fn shuffle_remaining(&self) -> Result<()> {
        self.mutate(|player| {
            player.shuffle_remaining();
            Ok(())
        })
    }

    /// Return the queue to sequential mode
    pub fn set_sequential(&self) -> Result<()> {
        self.mutate(|player| {
            player.set_sequential();
            Ok(())
        })
    }

    /// Empty the queue and stop
    pub fn clear(&self) -> Result<()> {
        self.mutate(Player::clear)
    }

    /// Seek within the current unit
    pub fn seek(&self, position: Duration) -> Result<Duration> {
        self.mutate(|player| player.seek(position))
    }

    /// Set volume (0-100)
    pub fn set_volume(&self, level: u8) -> Result<()> {
        self.mutate(|player| player.set_volume(level))
    }

    /// Drain events emitted since the last drain
    pub fn drain_events(&self) -> Vec<PlayerEvent> {
        self.lock().drain_events()
    }

    /// Read the player under the session lock
    pub fn with_player<R>(&self, f: impl FnOnce(&Player<O>) -> R) -> R {
        f(&*self.lock())
    }

    /// Run a mutation under the lock and publish the resulting snapshot
    ///
    /// The snapshot is published on failure too; a failed output command
    /// leaves the transport `Errored`.
    fn mutate<R>(&self, f: impl FnOnce(&mut Player<O>) -> Result<R>) -> Result<R> {
        let mut player = self.lock();
        if self.is_closed() {
            return Err(PlaybackError::SessionClosed);
        }

        let result = f(&mut *player);
        self.inner.snapshot.send_replace(player.snapshot());
        result
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(PlaybackError::SessionClosed);
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Player<O>> {
        self.inner
            .player
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
