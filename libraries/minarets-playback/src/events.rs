//! Playback Events
//!
//! Event-based communication for UI synchronization during playback.
//! Events are emitted at key points:
//! - Transport status changes (loading/playing/paused/ended/errored)
//! - Current unit changes (advance, skip, priority replace)
//! - Queue mutations
//! - Position updates reported by the audio output

use crate::types::{TransportStatus, UniqueId};
use minarets_core::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Transport status changed
    StatusChanged {
        /// The new status
        status: TransportStatus,
    },

    /// A different queue entry became current
    TrackChanged {
        /// Queue entry now current
        unique_id: UniqueId,
        /// Underlying catalog track
        track_id: TrackId,
        /// Entry that was current before (if any)
        previous: Option<UniqueId>,
    },

    /// A unit played through to its end offset or end of media
    TrackFinished {
        /// Queue entry that finished
        unique_id: UniqueId,
    },

    /// Units were added, removed, or reordered
    QueueChanged {
        /// New queue length
        length: usize,
        /// New cursor
        cursor: Option<usize>,
    },

    /// The last unit finished and nothing follows
    QueueFinished,

    /// Position reported by the output
    PositionUpdate {
        /// Position within the media
        position: Duration,
        /// Effective end of the current unit, if known
        end: Option<Duration>,
    },

    /// Loading or playback failed for the current unit
    Error {
        /// Queue entry that failed
        unique_id: Option<UniqueId>,
        /// Error message
        message: String,
    },
}
