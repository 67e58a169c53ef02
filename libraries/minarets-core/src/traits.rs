/// Core traits for the Minarets player
use crate::error::Result;
use crate::types::{Concert, ConcertId, Playlist, PlaylistId};
use async_trait::async_trait;

/// Read access to the remote media catalog
///
/// The playback crate resolves track, concert, and playlist references through
/// this trait; the HTTP client in `minarets-client` is the production
/// implementation and tests use in-memory fakes.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch a concert including its note text and track list
    async fn concert(&self, id: &ConcertId) -> Result<Concert>;

    /// Fetch a playlist including its tracks
    async fn playlist(&self, id: &PlaylistId) -> Result<Playlist>;

    /// Fetch every concert referenced by a playlist
    ///
    /// The default implementation loads the concerts one by one; remote
    /// implementations should override it with a single list request.
    async fn concerts_for_playlist(&self, playlist: &Playlist) -> Result<Vec<Concert>> {
        let mut concerts: Vec<Concert> = Vec::new();
        for concert_id in playlist.concert_ids() {
            concerts.push(self.concert(&concert_id).await?);
        }
        Ok(concerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MinaretsError;
    use crate::types::{ArtistId, Track, TrackId};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MapCatalog {
        concerts: HashMap<ConcertId, Concert>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Catalog for MapCatalog {
        async fn concert(&self, id: &ConcertId) -> Result<Concert> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.concerts
                .get(id)
                .cloned()
                .ok_or_else(|| MinaretsError::not_found("Concert", id.as_str()))
        }

        async fn playlist(&self, id: &PlaylistId) -> Result<Playlist> {
            Err(MinaretsError::not_found("Playlist", id.as_str()))
        }
    }

    #[tokio::test]
    async fn default_concerts_for_playlist_fetches_each_concert_once() {
        let concert = Concert::new(ConcertId::new("c1"), ArtistId::new("a1"));
        let catalog = MapCatalog {
            concerts: HashMap::from([(concert.id.clone(), concert)]),
            calls: AtomicUsize::new(0),
        };

        let playlist = Playlist::new(PlaylistId::new("p1"), "Mix").with_tracks(vec![
            Track::new(TrackId::new("t1"), ConcertId::new("c1"), "One", 10),
            Track::new(TrackId::new("t2"), ConcertId::new("c1"), "Two", 10),
        ]);

        let concerts = catalog.concerts_for_playlist(&playlist).await.unwrap();
        assert_eq!(concerts.len(), 1);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
    }
}
