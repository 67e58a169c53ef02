//! Core types for playback management

use minarets_core::{ArtistId, ConcertId, Track, TrackId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Client-generated identity of one queue entry
///
/// Two entries referencing the same track (a song that appears twice in a
/// playlist) carry different unique ids. Ids are random v4 UUIDs, so an id is
/// never handed out twice within a queue's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueId(Uuid);

impl UniqueId {
    /// Generate a fresh id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One queueable, independently playable track instance
///
/// Units are immutable once enqueued; a changed unit is a new unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayableUnit {
    /// Identity of this queue entry
    pub unique_id: UniqueId,

    /// Underlying catalog track
    pub track_id: TrackId,

    /// Concert the track was recorded at
    pub concert_id: ConcertId,

    /// Performing artist (unknown when the concert was not available)
    pub artist_id: Option<ArtistId>,

    /// Track title
    pub title: String,

    /// Full media duration
    pub duration: Duration,

    /// Streamable URL
    pub source_url: String,

    /// Where playback of this unit starts (None = beginning of media)
    pub start_offset: Option<Duration>,

    /// Where playback of this unit stops (None = end of media)
    pub end_offset: Option<Duration>,
}

impl PlayableUnit {
    /// Build a full-track unit with a fresh unique id
    pub fn from_track(track: &Track, artist_id: Option<ArtistId>) -> Self {
        Self {
            unique_id: UniqueId::generate(),
            track_id: track.id.clone(),
            concert_id: track.concert_id.clone(),
            artist_id,
            title: track.title.clone(),
            duration: track.duration(),
            source_url: track.source_url.clone(),
            start_offset: None,
            end_offset: None,
        }
    }

    /// Restrict playback to a segment of the media
    ///
    /// Offsets are normalized so that `start < end` and both lie within
    /// `[0, duration]`. A start past the end of the media drops the segment
    /// entirely; an end past the media (or not after the start) plays to the
    /// end of the media. A zero duration means the API did not report one and
    /// only the ordering of the offsets is enforced.
    #[must_use]
    pub fn with_segment(mut self, start: Option<Duration>, end: Option<Duration>) -> Self {
        let known_duration = (!self.duration.is_zero()).then_some(self.duration);

        let start = match (start, known_duration) {
            (Some(start), Some(duration)) if start >= duration => {
                self.start_offset = None;
                self.end_offset = None;
                return self;
            }
            (start, _) => start,
        };

        let end = end.filter(|end| {
            let within_media = match known_duration {
                Some(duration) => *end <= duration,
                None => true,
            };
            let after_start = match start {
                Some(start) => *end > start,
                None => !end.is_zero(),
            };
            within_media && after_start
        });

        self.start_offset = start;
        self.end_offset = end;
        self
    }

    /// Replace this unit's identity (used when an id collides inside a queue)
    #[must_use]
    pub fn with_fresh_id(mut self) -> Self {
        self.unique_id = UniqueId::generate();
        self
    }

    /// Effective start of playback
    pub fn segment_start(&self) -> Duration {
        self.start_offset.unwrap_or(Duration::ZERO)
    }

    /// Effective end of playback
    ///
    /// `None` when there is no end offset and the media duration is unknown.
    pub fn segment_end(&self) -> Option<Duration> {
        self.end_offset
            .or_else(|| (!self.duration.is_zero()).then_some(self.duration))
    }

    /// Whether the unit plays only part of its media
    pub fn is_segment(&self) -> bool {
        self.start_offset.is_some() || self.end_offset.is_some()
    }
}

/// Transport status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportStatus {
    /// Nothing loaded
    Idle,

    /// Waiting for the output to become ready
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Current unit reached its end
    Ended,

    /// Loading or playback failed
    Errored,
}

/// Transport state, owned by the transport controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportState {
    /// Current status
    pub status: TransportStatus,

    /// Playback position within the media
    pub current_time: Duration,

    /// Queue entry the transport is working on
    pub unit: Option<UniqueId>,

    /// Message of the last failure (set while `Errored`)
    pub last_error: Option<String>,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            status: TransportStatus::Idle,
            current_time: Duration::ZERO,
            unit: None,
            last_error: None,
        }
    }
}

/// Queue ordering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueMode {
    /// Units play in insertion order
    Sequential,

    /// Units after the cursor have been shuffled
    Shuffled,
}

/// Shuffle algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleMode {
    /// Pure random shuffle
    Random,

    /// Smart shuffle (spread artists apart)
    Smart,
}

/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0-100, default: 80)
    pub volume: u8,

    /// Shuffle algorithm (default: Random)
    pub shuffle: ShuffleMode,

    /// Seed for reproducible shuffles (default: None, seeded from entropy)
    pub shuffle_seed: Option<u64>,

    /// Advance past a unit that failed to load (default: false)
    pub skip_on_error: bool,

    /// "Previous" restarts the current unit once this far in (default: 3s)
    pub restart_threshold_secs: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 80,
            shuffle: ShuffleMode::Random,
            shuffle_seed: None,
            skip_on_error: false,
            restart_threshold_secs: 3,
        }
    }
}

impl PlaybackConfig {
    /// Restart threshold as a Duration
    pub fn restart_threshold(&self) -> Duration {
        Duration::from_secs(self.restart_threshold_secs)
    }
}
