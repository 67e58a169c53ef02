//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use minarets_core::{
    ArtistId, Catalog, Concert, ConcertId, MinaretsError, Playlist, PlaylistId, Track, TrackId,
};
use minarets_playback::{AudioOutput, LoadToken, PlayableUnit, Result};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Track with a media URL derived from its id
pub fn track(id: &str, concert: &str, title: &str, position: u32) -> Track {
    Track::new(TrackId::new(id), ConcertId::new(concert), title, 300)
        .with_position(position)
        .with_source_url(format!("https://media.example.com/{id}.mp3"))
}

/// Full-length unit for a track id
pub fn unit(id: &str) -> PlayableUnit {
    PlayableUnit::from_track(&track(id, "c", id, 0), None)
}

/// Units for several track ids
pub fn units(ids: &[&str]) -> Vec<PlayableUnit> {
    ids.iter().map(|id| unit(id)).collect()
}

/// Track ids of units, in order
pub fn track_ids(units: &[PlayableUnit]) -> Vec<String> {
    units.iter().map(|u| u.track_id.to_string()).collect()
}

/// Command received by [`RecordingOutput`]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load(String, LoadToken),
    Play,
    Pause,
    Seek(Duration),
    Stop,
    Volume(u8),
}

/// Output that records every command it receives
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub commands: Vec<Command>,
}

impl RecordingOutput {
    /// URLs passed to `load`, in order
    pub fn loaded_urls(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::Load(url, _) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl AudioOutput for RecordingOutput {
    fn load(&mut self, url: &str, token: LoadToken) -> Result<()> {
        self.commands.push(Command::Load(url.to_string(), token));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.commands.push(Command::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.commands.push(Command::Pause);
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.commands.push(Command::Seek(position));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.commands.push(Command::Stop);
        Ok(())
    }

    fn set_volume(&mut self, level: u8) -> Result<()> {
        self.commands.push(Command::Volume(level));
        Ok(())
    }
}

/// In-memory catalog
#[derive(Default)]
pub struct FakeCatalog {
    pub concerts: HashMap<ConcertId, Concert>,
    pub playlists: HashMap<PlaylistId, Playlist>,
    /// Concerts whose lookups fail with a network error
    pub unreachable: HashSet<ConcertId>,
}

impl FakeCatalog {
    pub fn with_concert(mut self, concert: Concert) -> Self {
        self.concerts.insert(concert.id.clone(), concert);
        self
    }

    pub fn with_playlist(mut self, playlist: Playlist) -> Self {
        self.playlists.insert(playlist.id.clone(), playlist);
        self
    }

    pub fn with_unreachable(mut self, concert_id: &str) -> Self {
        self.unreachable.insert(ConcertId::new(concert_id));
        self
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn concert(&self, id: &ConcertId) -> minarets_core::Result<Concert> {
        if self.unreachable.contains(id) {
            return Err(MinaretsError::network("connection reset"));
        }
        self.concerts
            .get(id)
            .cloned()
            .ok_or_else(|| MinaretsError::not_found("Concert", id.as_str()))
    }

    async fn playlist(&self, id: &PlaylistId) -> minarets_core::Result<Playlist> {
        self.playlists
            .get(id)
            .cloned()
            .ok_or_else(|| MinaretsError::not_found("Playlist", id.as_str()))
    }
}

/// Concert by a fixed artist with a note and tracks
pub fn concert(id: &str, note: &str, tracks: Vec<Track>) -> Concert {
    Concert::new(ConcertId::new(id), ArtistId::new("dmb"))
        .with_note(note)
        .with_tracks(tracks)
}
