//! Minarets Player - Playback Management
//!
//! Queue and transport control for streaming concert recordings.
//!
//! This crate provides:
//! - Note annotation parsing (`Intro: 1:05` style time markers)
//! - Resolution of tracks, concerts, and playlists into playable units
//! - A single ordered queue with priority insert ("play next")
//! - Shuffle algorithms (Random + Smart), reproducible under a seed
//! - A transport state machine guarded against stale output callbacks
//! - A shared playback session with snapshot subscription
//!
//! # Architecture
//!
//! `minarets-playback` does not decode or output audio. The platform supplies
//! an [`AudioOutput`] (an audio element, a media player, a simulator) and
//! feeds its callbacks back through [`PlayerSession::handle_output_event`].
//!
//! # Example: Resolving a concert
//!
//! ```rust
//! use minarets_core::{ArtistId, Concert, ConcertId, Track, TrackId};
//! use minarets_playback::resolver::resolve_concert;
//! use std::time::Duration;
//!
//! let concert = Concert::new(ConcertId::new("c1"), ArtistId::new("a1"))
//!     .with_note("Intro: 1:05\nVerse: 2:10")
//!     .with_tracks(vec![
//!         Track::new(TrackId::new("t1"), ConcertId::new("c1"), "Intro", 300).with_position(1),
//!         Track::new(TrackId::new("t2"), ConcertId::new("c1"), "Verse", 300).with_position(2),
//!     ]);
//!
//! let batch = resolve_concert(&concert);
//! let intro = &batch.units[0].unit;
//! assert_eq!(intro.start_offset, Some(Duration::from_secs(65)));
//! assert_eq!(intro.end_offset, Some(Duration::from_secs(130)));
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use minarets_playback::{
//!     AudioOutput, LoadToken, PlaybackConfig, PlayerSession, Result,
//! };
//! use std::time::Duration;
//!
//! // Implement AudioOutput for your platform
//! struct MyOutput;
//!
//! impl AudioOutput for MyOutput {
//!     fn load(&mut self, _url: &str, _token: LoadToken) -> Result<()> {
//!         // Start loading; report OutputEvent::ready(token) later
//!         Ok(())
//!     }
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) -> Result<()> { Ok(()) }
//!     fn seek(&mut self, _position: Duration) -> Result<()> { Ok(()) }
//!     fn stop(&mut self) -> Result<()> { Ok(()) }
//!     fn set_volume(&mut self, _level: u8) -> Result<()> { Ok(()) }
//! }
//!
//! let session = PlayerSession::start(PlaybackConfig::default(), MyOutput)?;
//! let _updates = session.subscribe();
//!
//! // From the output's callbacks:
//! // session.handle_output_event(OutputEvent::ended(token))?;
//! # Ok::<(), minarets_playback::PlaybackError>(())
//! ```

pub mod annotations;
mod error;
mod events;
mod output;
mod player;
mod queue;
pub mod resolver;
mod session;
mod shuffle;
mod transport;
pub mod types;

// Public exports
pub use annotations::{Annotation, AnnotationMap};
pub use error::{AnnotationParseError, InvalidQueueOperation, PlaybackError, Result};
pub use events::PlayerEvent;
pub use output::{AudioOutput, LoadToken, OutputEvent, OutputEventKind};
pub use player::{Player, PlayerSnapshot};
pub use queue::{Insertion, Queue, QueueResult, QueueSnapshot, Removal};
pub use resolver::{FailedReference, PlayableRef, ResolveStatus, ResolvedBatch, ResolvedUnit};
pub use session::PlayerSession;
pub use transport::{Transport, TransportSignal};
pub use types::{
    PlayableUnit, PlaybackConfig, QueueMode, ShuffleMode, TransportState, TransportStatus,
    UniqueId,
};
