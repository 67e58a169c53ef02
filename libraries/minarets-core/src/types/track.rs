/// Track domain type
use crate::types::{ConcertId, TrackId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A recorded track as returned by the media API
///
/// Tracks always belong to exactly one concert; playlists reference tracks
/// from many concerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title (usually the song name)
    pub title: String,

    /// Track duration in seconds
    #[serde(default)]
    pub duration_seconds: f64,

    /// Streamable URL of the recording
    #[serde(default)]
    pub source_url: String,

    /// Concert the recording belongs to
    pub concert_id: ConcertId,

    /// 1-based position within the concert's set list
    #[serde(default)]
    pub position: u32,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(
        id: TrackId,
        concert_id: ConcertId,
        title: impl Into<String>,
        duration_seconds: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            duration_seconds: f64::from(duration_seconds),
            source_url: String::new(),
            concert_id,
            position: 0,
        }
    }

    /// Set the streamable URL
    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    /// Set the set-list position
    #[must_use]
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }

    /// Get the track duration as a Duration
    ///
    /// Negative or non-finite durations reported by the API read as zero.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_seconds).unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_api_payload() {
        let json = r#"{
            "id": 981,
            "title": "Two Step",
            "durationSeconds": 612.5,
            "sourceUrl": "https://media.example.com/981.mp3",
            "concertId": 17,
            "position": 4
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.id.as_str(), "981");
        assert_eq!(track.concert_id.as_str(), "17");
        assert_eq!(track.position, 4);
        assert_eq!(track.duration(), Duration::from_millis(612_500));
    }

    #[test]
    fn negative_duration_reads_as_zero() {
        let mut track = Track::new(TrackId::new("1"), ConcertId::new("c"), "Song", 0);
        track.duration_seconds = -4.0;
        assert_eq!(track.duration(), Duration::ZERO);
    }
}
