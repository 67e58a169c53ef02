//! `Catalog` implementation backed by the HTTP API.

use crate::client::MinaretsClient;
use async_trait::async_trait;
use minarets_core::{Catalog, Concert, ConcertId, Playlist, PlaylistId, Result};

#[async_trait]
impl Catalog for MinaretsClient {
    async fn concert(&self, id: &ConcertId) -> Result<Concert> {
        Ok(self.get_concert(id).await?)
    }

    async fn playlist(&self, id: &PlaylistId) -> Result<Playlist> {
        Ok(self.get_playlist(id).await?)
    }

    /// One list request instead of a request per concert.
    async fn concerts_for_playlist(&self, playlist: &Playlist) -> Result<Vec<Concert>> {
        Ok(self.list_concerts_by_playlist(&playlist.id).await?.items)
    }
}
