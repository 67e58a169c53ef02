/// Playlist domain types
use crate::types::{ConcertId, PlaylistId, Track};
use serde::{Deserialize, Serialize};

/// A user playlist; tracks may come from many concerts and may repeat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    #[serde(default)]
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Tracks in playlist order
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(id: PlaylistId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            tracks: Vec::new(),
        }
    }

    /// Set the track list
    #[must_use]
    pub fn with_tracks(mut self, tracks: Vec<Track>) -> Self {
        self.tracks = tracks;
        self
    }

    /// Distinct concert ids referenced by the playlist, in first-use order
    pub fn concert_ids(&self) -> Vec<ConcertId> {
        let mut ids: Vec<ConcertId> = Vec::new();
        for track in &self.tracks {
            if !ids.contains(&track.concert_id) {
                ids.push(track.concert_id.clone());
            }
        }
        ids
    }
}

/// Playlist listing entry (no tracks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    #[serde(default)]
    pub name: String,

    /// Number of tracks
    #[serde(default)]
    pub track_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackId;

    #[test]
    fn concert_ids_are_distinct_and_ordered() {
        let playlist = Playlist::new(PlaylistId::new("p"), "Mix").with_tracks(vec![
            Track::new(TrackId::new("1"), ConcertId::new("b"), "One", 1),
            Track::new(TrackId::new("2"), ConcertId::new("a"), "Two", 1),
            Track::new(TrackId::new("3"), ConcertId::new("b"), "Three", 1),
        ]);

        assert_eq!(
            playlist.concert_ids(),
            vec![ConcertId::new("b"), ConcertId::new("a")]
        );
    }
}
