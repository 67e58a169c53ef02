//! Error types for playback management

use crate::types::UniqueId;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// No queue entry is current
    #[error("No current queue entry")]
    NoCurrentEntry,

    /// Queue rejected the operation (queue left unchanged)
    #[error(transparent)]
    Queue(#[from] InvalidQueueOperation),

    /// Audio output rejected a command
    #[error("Audio output error: {0}")]
    Output(String),

    /// Catalog lookup failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] minarets_core::MinaretsError),

    /// The session was shut down
    #[error("Playback session is closed")]
    SessionClosed,

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// A queue operation that could not be applied
///
/// These are expected under racing user input (double clicks, stale rows)
/// and always leave the queue untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidQueueOperation {
    /// Index is not a valid queue position
    #[error("Index {index} out of range for queue of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// No entry with this id is queued
    #[error("No queue entry with id {0}")]
    UnknownEntry(UniqueId),

    /// The cursor is not on any entry (queue empty or stopped)
    #[error("Queue has no current entry")]
    NoCurrentEntry,

    /// The cursor is already on the first entry
    #[error("Already at the start of the queue")]
    AtStart,
}

/// A time marker in a concert note that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationParseError {
    /// Marker had a token but no time
    #[error("Marker '{token}' has no time value")]
    MissingTime { token: String },

    /// A time field was not a number
    #[error("Marker '{token}': '{value}' is not a time")]
    NonNumeric { token: String, value: String },

    /// Minutes or seconds field of 60 or more
    #[error("Marker '{token}': field '{field}' must be below 60")]
    FieldOutOfRange { token: String, field: String },

    /// More than `h:mm:ss`
    #[error("Marker '{token}': '{value}' has too many fields")]
    TooManyFields { token: String, value: String },
}
