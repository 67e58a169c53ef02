//! Common test utilities and fixtures
#![allow(dead_code)]

use minarets_core::{ConcertId, Track, TrackId};
use minarets_playback::PlayableUnit;

/// Full-length unit with a media URL derived from its id
pub fn unit(id: &str) -> PlayableUnit {
    let track = Track::new(TrackId::new(id), ConcertId::new("c1"), id, 240)
        .with_source_url(format!("https://media.example.com/{id}.mp3"));
    PlayableUnit::from_track(&track, None)
}

/// Unit whose track has no streamable URL
pub fn broken_unit(id: &str) -> PlayableUnit {
    let track = Track::new(TrackId::new(id), ConcertId::new("c1"), id, 240);
    PlayableUnit::from_track(&track, None)
}

/// Test configuration files
pub mod fixtures {
    pub const CONFIG_TOML: &str = r#"
[api]
url = "http://localhost:9000/"
token = "file-token"

[playback]
volume = 55
shuffle = "smart"
skip_on_error = true
"#;
}
