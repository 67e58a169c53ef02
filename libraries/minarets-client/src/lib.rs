//! Minarets Catalog Client
//!
//! HTTP client for the Minarets catalog API.
//!
//! # Features
//!
//! - **Catalog reads**: concerts (with note text and tracks) and playlists
//! - **Playlist concerts**: every concert of a playlist in one list request
//! - **Own playlists**: requires an API token
//! - Implements [`minarets_core::Catalog`], so the playback crate can resolve
//!   references straight through it
//!
//! # Example
//!
//! ```no_run
//! use minarets_client::{ClientConfig, MinaretsClient};
//! use minarets_core::PlaylistId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::with_token("https://api.minarets.io", "token");
//!     let client = MinaretsClient::new(config)?;
//!
//!     let playlist = client.get_playlist(&PlaylistId::new("77")).await?;
//!     let concerts = client.list_concerts_by_playlist(&playlist.id).await?;
//!     println!("{} tracks from {} concerts", playlist.tracks.len(), concerts.items.len());
//!
//!     Ok(())
//! }
//! ```

mod catalog;
mod client;
mod error;
mod types;

pub use client::{MinaretsClient, PLAYLIST_CONCERTS_PAGE_SIZE};
pub use error::{ClientError, Result};
pub use types::ClientConfig;
