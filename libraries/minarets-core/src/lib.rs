//! Minarets Core
//!
//! Catalog types, traits, and error handling shared by the Minarets player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Catalog Types**: `Track`, `Concert`, `Playlist` as returned by the media API
//! - **Identifiers**: `TrackId`, `ConcertId`, `ArtistId`, `PlaylistId`
//! - **Core Traits**: `Catalog`, the read side of the media API
//! - **Error Handling**: Unified `MinaretsError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use minarets_core::types::{Concert, ConcertId, ArtistId, Track, TrackId};
//!
//! let track = Track::new(TrackId::new("t1"), ConcertId::new("c1"), "Ants Marching", 300);
//! let concert = Concert::new(ConcertId::new("c1"), ArtistId::new("a1"))
//!     .with_note("Ants Marching: 0:00")
//!     .with_tracks(vec![track]);
//!
//! assert_eq!(concert.tracks.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{MinaretsError, Result};
pub use traits::Catalog;

pub use types::{
    ArtistId, Concert, ConcertId, ListResponse, Playlist, PlaylistId, PlaylistSummary, Track,
    TrackId,
};
