//! Playable resolver
//!
//! Expands tracks, concerts, and playlists into [`PlayableUnit`]s with their
//! segment offsets taken from the owning concert's note annotations.
//!
//! Resolution never fails because of one bad reference: a track whose concert
//! is unavailable still becomes a full-length unit and is flagged with
//! [`ResolveStatus::MissingConcertData`], and a reference that cannot be
//! loaded at all is recorded in [`ResolvedBatch::failed_references`] while
//! the rest of the batch resolves.

use crate::annotations::{self, normalize_token, Annotation, AnnotationMap};
use crate::error::Result;
use crate::types::PlayableUnit;
use futures_util::future::join_all;
use minarets_core::{
    ArtistId, Catalog, Concert, ConcertId, MinaretsError, Playlist, PlaylistId, Track, TrackId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Annotations of one concert, computed once per resolution call
#[derive(Debug, Clone)]
pub struct ConcertAnnotations {
    /// Concert the note belongs to
    pub concert_id: ConcertId,

    /// Performing artist
    pub artist_id: ArtistId,

    /// Parsed note markers
    pub annotations: AnnotationMap,
}

impl ConcertAnnotations {
    /// Parse a concert's note
    pub fn from_concert(concert: &Concert) -> Self {
        let annotations = annotations::resolve(concert.note_text.as_deref());
        if !annotations.rejected().is_empty() {
            tracing::debug!(
                concert_id = %concert.id,
                rejected = annotations.rejected().len(),
                "Concert note has unparseable markers"
            );
        }

        Self {
            concert_id: concert.id.clone(),
            artist_id: concert.artist_id.clone(),
            annotations,
        }
    }

    /// Marker for a track: by title, then set-list position, then track id
    fn marker_for(&self, track: &Track) -> Option<&Annotation> {
        let by_title = self.annotations.get(&track.title);
        let by_position = || {
            if track.position == 0 {
                return None;
            }
            self.annotations
                .get(&track.position.to_string())
                .or_else(|| self.annotations.get(&format!("track {}", track.position)))
        };
        let by_id = || self.annotations.get(track.id.as_str());

        by_title.or_else(by_position).or_else(by_id)
    }
}

/// How a unit's timing was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveStatus {
    /// A note marker supplied the segment offsets
    Annotated,

    /// The concert was available but had no marker for this track
    Unannotated,

    /// The concert was not available; the unit plays in full
    MissingConcertData,
}

/// One resolved unit with its resolution status
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedUnit {
    /// The unit
    pub unit: PlayableUnit,

    /// How its timing was resolved
    pub status: ResolveStatus,
}

/// A reference that produced no units
#[derive(Debug, Clone, PartialEq)]
pub struct FailedReference {
    /// The reference as requested
    pub reference: PlayableRef,

    /// Why it could not be resolved
    pub reason: String,
}

/// Units resolved from one or more references
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedBatch {
    /// Units in play order
    pub units: Vec<ResolvedUnit>,

    /// Concerts that were referenced but not available, in first-use order
    pub missing_concerts: Vec<ConcertId>,

    /// References that could not be loaded at all, in request order
    pub failed_references: Vec<FailedReference>,
}

impl ResolvedBatch {
    /// Whether every reference and every referenced concert was available
    pub fn is_complete(&self) -> bool {
        self.missing_concerts.is_empty() && self.failed_references.is_empty()
    }

    /// Number of resolved units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether nothing was resolved
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Drop the resolution report and keep the units
    pub fn into_units(self) -> Vec<PlayableUnit> {
        self.units.into_iter().map(|resolved| resolved.unit).collect()
    }

    /// Append another batch
    pub fn extend(&mut self, other: ResolvedBatch) {
        self.units.extend(other.units);
        for concert_id in other.missing_concerts {
            self.note_missing(concert_id);
        }
        self.failed_references.extend(other.failed_references);
    }

    fn note_missing(&mut self, concert_id: ConcertId) {
        if !self.missing_concerts.contains(&concert_id) {
            self.missing_concerts.push(concert_id);
        }
    }
}

/// Resolve one track against its concert's annotations
///
/// The segment starts at the track's marker and ends at the next marker in
/// the note (or the end of the media when there is none).
pub fn resolve_track(track: &Track, concert: Option<&ConcertAnnotations>) -> ResolvedUnit {
    let Some(concert) = concert else {
        return ResolvedUnit {
            unit: PlayableUnit::from_track(track, None),
            status: ResolveStatus::MissingConcertData,
        };
    };

    let unit = PlayableUnit::from_track(track, Some(concert.artist_id.clone()));
    match concert.marker_for(track) {
        Some(marker) => {
            let end = concert.annotations.next_offset_after(marker.offset);
            ResolvedUnit {
                unit: unit.with_segment(Some(marker.offset), end),
                status: ResolveStatus::Annotated,
            }
        }
        None => ResolvedUnit {
            unit,
            status: ResolveStatus::Unannotated,
        },
    }
}

/// Resolve every track of a concert in set-list order
pub fn resolve_concert(concert: &Concert) -> ResolvedBatch {
    let annotations = ConcertAnnotations::from_concert(concert);
    ResolvedBatch {
        units: concert
            .tracks_in_order()
            .into_iter()
            .map(|track| resolve_track(track, Some(&annotations)))
            .collect(),
        ..Default::default()
    }
}

/// Resolve every track of a playlist in playlist order
///
/// Each referenced concert's note is parsed once; repeated tracks become
/// separate units with their own unique ids.
pub fn resolve_playlist(
    playlist: &Playlist,
    concerts_by_id: &HashMap<ConcertId, Concert>,
) -> ResolvedBatch {
    let mut cache: HashMap<&ConcertId, Option<ConcertAnnotations>> = HashMap::new();
    let mut batch = ResolvedBatch::default();

    for track in &playlist.tracks {
        let annotations = cache
            .entry(&track.concert_id)
            .or_insert_with(|| {
                concerts_by_id
                    .get(&track.concert_id)
                    .map(ConcertAnnotations::from_concert)
            })
            .as_ref();

        let resolved = resolve_track(track, annotations);
        if resolved.status == ResolveStatus::MissingConcertData {
            batch.note_missing(track.concert_id.clone());
        }
        batch.units.push(resolved);
    }

    if !batch.is_complete() {
        tracing::warn!(
            playlist_id = %playlist.id,
            missing = batch.missing_concerts.len(),
            "Playlist references concerts that were not supplied"
        );
    }
    batch
}

/// Something the user asked to play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayableRef {
    /// A track object already at hand (its concert is fetched for timing)
    Track(Track),

    /// One track of a concert
    ConcertTrack {
        /// Concert holding the track
        concert_id: ConcertId,
        /// The track
        track_id: TrackId,
    },

    /// A whole concert
    Concert(ConcertId),

    /// A whole playlist
    Playlist(PlaylistId),
}

/// Resolve a reference through the catalog
///
/// A concert or playlist that cannot be loaded is an error; concerts needed
/// only for timing degrade to [`ResolveStatus::MissingConcertData`].
pub async fn resolve_reference<C>(catalog: &C, reference: &PlayableRef) -> Result<ResolvedBatch>
where
    C: Catalog + ?Sized,
{
    match reference {
        PlayableRef::Track(track) => {
            let concert = match catalog.concert(&track.concert_id).await {
                Ok(concert) => Some(ConcertAnnotations::from_concert(&concert)),
                Err(err) => {
                    tracing::warn!(
                        concert_id = %track.concert_id,
                        error = %err,
                        "Concert unavailable, playing track in full"
                    );
                    None
                }
            };

            let mut batch = ResolvedBatch::default();
            if concert.is_none() {
                batch.note_missing(track.concert_id.clone());
            }
            batch.units.push(resolve_track(track, concert.as_ref()));
            Ok(batch)
        }

        PlayableRef::ConcertTrack {
            concert_id,
            track_id,
        } => {
            let concert = catalog.concert(concert_id).await?;
            let track = concert
                .tracks
                .iter()
                .find(|track| &track.id == track_id)
                .ok_or_else(|| MinaretsError::not_found("Track", track_id.as_str()))?;

            let annotations = ConcertAnnotations::from_concert(&concert);
            Ok(ResolvedBatch {
                units: vec![resolve_track(track, Some(&annotations))],
                ..Default::default()
            })
        }

        PlayableRef::Concert(concert_id) => {
            let concert = catalog.concert(concert_id).await?;
            Ok(resolve_concert(&concert))
        }

        PlayableRef::Playlist(playlist_id) => {
            let playlist = catalog.playlist(playlist_id).await?;
            let concerts = load_playlist_concerts(catalog, &playlist).await;
            Ok(resolve_playlist(&playlist, &concerts))
        }
    }
}

/// Resolve several references, concatenating their units in order
///
/// A reference that cannot be loaded is logged and recorded in
/// [`ResolvedBatch::failed_references`]; the call fails only when no
/// reference resolved, with the first failure.
pub async fn resolve_references<C>(catalog: &C, references: &[PlayableRef]) -> Result<ResolvedBatch>
where
    C: Catalog + ?Sized,
{
    let mut batch = ResolvedBatch::default();
    let mut first_error = None;
    let mut resolved_any = false;

    for reference in references {
        match resolve_reference(catalog, reference).await {
            Ok(resolved) => {
                resolved_any = true;
                batch.extend(resolved);
            }
            Err(err) => {
                tracing::warn!(
                    reference = ?reference,
                    error = %err,
                    "Reference could not be resolved, skipping it"
                );
                batch.failed_references.push(FailedReference {
                    reference: reference.clone(),
                    reason: err.to_string(),
                });
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        Some(err) if !resolved_any => Err(err),
        _ => Ok(batch),
    }
}

/// Load the concerts a playlist references
///
/// Tries the catalog's bulk lookup first and falls back to fetching each
/// concert concurrently; concerts that still fail are left out.
async fn load_playlist_concerts<C>(catalog: &C, playlist: &Playlist) -> HashMap<ConcertId, Concert>
where
    C: Catalog + ?Sized,
{
    match catalog.concerts_for_playlist(playlist).await {
        Ok(concerts) => {
            return concerts
                .into_iter()
                .map(|concert| (concert.id.clone(), concert))
                .collect();
        }
        Err(err) => {
            tracing::debug!(
                playlist_id = %playlist.id,
                error = %err,
                "Bulk concert lookup failed, fetching concerts individually"
            );
        }
    }

    let ids = playlist.concert_ids();
    let results = join_all(ids.iter().map(|id| catalog.concert(id))).await;

    ids.into_iter()
        .zip(results)
        .filter_map(|(id, result)| match result {
            Ok(concert) => Some((id, concert)),
            Err(err) => {
                tracing::warn!(concert_id = %id, error = %err, "Failed to load concert");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn track(id: &str, concert: &str, title: &str, position: u32) -> Track {
        Track::new(TrackId::new(id), ConcertId::new(concert), title, 300)
            .with_position(position)
            .with_source_url(format!("https://media.example.com/{id}.mp3"))
    }

    fn concert(id: &str, note: &str, tracks: Vec<Track>) -> Concert {
        Concert::new(ConcertId::new(id), ArtistId::new("dmb"))
            .with_note(note)
            .with_tracks(tracks)
    }

    #[test]
    fn intro_runs_until_next_marker() {
        let concert = concert(
            "c1",
            "Intro: 1:05\nVerse: 2:10",
            vec![track("t1", "c1", "Intro", 1), track("t2", "c1", "Verse", 2)],
        );

        let batch = resolve_concert(&concert);
        let intro = &batch.units[0];

        assert_eq!(intro.status, ResolveStatus::Annotated);
        assert_eq!(intro.unit.start_offset, Some(Duration::from_secs(65)));
        assert_eq!(intro.unit.end_offset, Some(Duration::from_secs(130)));

        let verse = &batch.units[1];
        assert_eq!(verse.unit.start_offset, Some(Duration::from_secs(130)));
        assert_eq!(verse.unit.end_offset, None);
    }

    #[test]
    fn matches_by_position_then_id() {
        let annotations = ConcertAnnotations::from_concert(&concert(
            "c1",
            "3: 0:30\nt9: 0:50",
            Vec::new(),
        ));

        let by_position = resolve_track(&track("t1", "c1", "Unknown", 3), Some(&annotations));
        assert_eq!(by_position.unit.start_offset, Some(Duration::from_secs(30)));
        assert_eq!(by_position.unit.end_offset, Some(Duration::from_secs(50)));

        let by_id = resolve_track(&track("t9", "c1", "Other", 0), Some(&annotations));
        assert_eq!(by_id.unit.start_offset, Some(Duration::from_secs(50)));
    }

    #[test]
    fn title_match_wins_over_position() {
        let annotations = ConcertAnnotations::from_concert(&concert(
            "c1",
            "2: 0:10\nCrash: 1:00",
            Vec::new(),
        ));
        let resolved = resolve_track(&track("t1", "c1", "Crash", 2), Some(&annotations));
        assert_eq!(resolved.unit.start_offset, Some(Duration::from_secs(60)));
    }

    #[test]
    fn unmarked_track_plays_in_full() {
        let annotations = ConcertAnnotations::from_concert(&concert("c1", "Great show", Vec::new()));
        let resolved = resolve_track(&track("t1", "c1", "Crash", 1), Some(&annotations));

        assert_eq!(resolved.status, ResolveStatus::Unannotated);
        assert!(!resolved.unit.is_segment());
        assert_eq!(resolved.unit.artist_id, Some(ArtistId::new("dmb")));
    }

    #[test]
    fn concert_tracks_follow_set_list_order() {
        let concert = concert(
            "c1",
            "",
            vec![track("t2", "c1", "Second", 2), track("t1", "c1", "First", 1)],
        );
        let titles: Vec<String> = resolve_concert(&concert)
            .into_units()
            .into_iter()
            .map(|u| u.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn playlist_repeats_get_distinct_ids_and_missing_concerts_degrade() {
        let c1 = concert("c1", "Intro: 0:05", vec![track("t1", "c1", "Intro", 1)]);
        let playlist = Playlist::new(PlaylistId::new("p1"), "Mix").with_tracks(vec![
            track("t1", "c1", "Intro", 1),
            track("t5", "c2", "Elsewhere", 1),
            track("t1", "c1", "Intro", 1),
        ]);
        let concerts = HashMap::from([(c1.id.clone(), c1)]);

        let batch = resolve_playlist(&playlist, &concerts);

        assert_eq!(batch.len(), 3);
        assert_ne!(batch.units[0].unit.unique_id, batch.units[2].unit.unique_id);
        assert_eq!(batch.units[0].status, ResolveStatus::Annotated);
        assert_eq!(batch.units[1].status, ResolveStatus::MissingConcertData);
        assert!(batch.units[1].unit.artist_id.is_none());
        assert_eq!(batch.missing_concerts, vec![ConcertId::new("c2")]);
        assert!(!batch.is_complete());
    }
}
