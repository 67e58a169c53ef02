/// Concert domain type
use crate::types::{ArtistId, ConcertId, Track};
use serde::{Deserialize, Serialize};

/// A concert recording with its set list and editorial note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concert {
    /// Unique concert identifier
    pub id: ConcertId,

    /// Display name (venue / city)
    #[serde(default)]
    pub name: String,

    /// Concert date as reported by the API (ISO-8601)
    #[serde(default)]
    pub date: Option<String>,

    /// Free-text editorial note; may carry track time markers
    #[serde(default)]
    pub note_text: Option<String>,

    /// Performing artist
    pub artist_id: ArtistId,

    /// Tracks in set-list order
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Concert {
    /// Create an empty concert for the given artist
    pub fn new(id: ConcertId, artist_id: ArtistId) -> Self {
        Self {
            id,
            name: String::new(),
            date: None,
            note_text: None,
            artist_id,
            tracks: Vec::new(),
        }
    }

    /// Set the note text
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note_text = Some(note.into());
        self
    }

    /// Set the track list
    #[must_use]
    pub fn with_tracks(mut self, tracks: Vec<Track>) -> Self {
        self.tracks = tracks;
        self
    }

    /// Tracks sorted by set-list position, keeping API order for ties
    pub fn tracks_in_order(&self) -> Vec<&Track> {
        let mut tracks: Vec<&Track> = self.tracks.iter().collect();
        tracks.sort_by_key(|track| track.position);
        tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackId;

    #[test]
    fn deserializes_without_optional_fields() {
        let json = r#"{ "id": 5, "artistId": 1 }"#;
        let concert: Concert = serde_json::from_str(json).unwrap();
        assert!(concert.note_text.is_none());
        assert!(concert.tracks.is_empty());
    }

    #[test]
    fn tracks_in_order_sorts_by_position() {
        let concert = Concert::new(ConcertId::new("c"), ArtistId::new("a")).with_tracks(vec![
            Track::new(TrackId::new("2"), ConcertId::new("c"), "Second", 1).with_position(2),
            Track::new(TrackId::new("1"), ConcertId::new("c"), "First", 1).with_position(1),
        ]);

        let titles: Vec<&str> = concert
            .tracks_in_order()
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }
}
