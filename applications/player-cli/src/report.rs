//! Plain-text rendering for the CLI commands

use minarets_playback::{AnnotationMap, PlayableRef, PlayableUnit, ResolveStatus, ResolvedBatch};
use std::time::Duration;

/// Format an offset as `m:ss`, or `h:mm:ss` from one hour on
pub fn format_offset(offset: Duration) -> String {
    let total = offset.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Describe which part of the media a unit plays
pub fn segment_label(unit: &PlayableUnit) -> String {
    if !unit.is_segment() {
        return "full track".to_string();
    }
    let start = format_offset(unit.segment_start());
    match unit.end_offset {
        Some(end) => format!("{start} - {}", format_offset(end)),
        None => format!("{start} - end"),
    }
}

/// One line per marker, then one per rejected marker
pub fn annotation_lines(map: &AnnotationMap) -> Vec<String> {
    let mut lines: Vec<String> = map
        .iter()
        .map(|annotation| {
            format!(
                "{:>9}  {}",
                format_offset(annotation.offset),
                annotation.token
            )
        })
        .collect();

    if map.is_empty() {
        lines.push("no markers".to_string());
    }
    for rejected in map.rejected() {
        lines.push(format!("  skipped  {rejected}"));
    }
    lines
}

/// One numbered line per resolved unit, then missing concerts and failed references
pub fn resolved_lines(batch: &ResolvedBatch) -> Vec<String> {
    let mut lines: Vec<String> = batch
        .units
        .iter()
        .enumerate()
        .map(|(index, resolved)| {
            let flag = match resolved.status {
                ResolveStatus::Annotated => "",
                ResolveStatus::Unannotated => "  (no marker)",
                ResolveStatus::MissingConcertData => "  (concert unavailable)",
            };
            format!(
                "{:>3}. {}  [{}]{}",
                index + 1,
                resolved.unit.title,
                segment_label(&resolved.unit),
                flag
            )
        })
        .collect();

    if !batch.missing_concerts.is_empty() {
        let ids: Vec<String> = batch
            .missing_concerts
            .iter()
            .map(ToString::to_string)
            .collect();
        lines.push(format!("missing concert data: {}", ids.join(", ")));
    }
    for failed in &batch.failed_references {
        lines.push(format!(
            "could not resolve {}: {}",
            describe_reference(&failed.reference),
            failed.reason
        ));
    }
    lines
}

/// Short name for a reference
pub fn describe_reference(reference: &PlayableRef) -> String {
    match reference {
        PlayableRef::Track(track) => format!("track {}", track.id),
        PlayableRef::ConcertTrack {
            concert_id,
            track_id,
        } => format!("track {track_id} of concert {concert_id}"),
        PlayableRef::Concert(concert_id) => format!("concert {concert_id}"),
        PlayableRef::Playlist(playlist_id) => format!("playlist {playlist_id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minarets_core::{ConcertId, Track, TrackId};
    use minarets_playback::{annotations, FailedReference};

    fn unit() -> PlayableUnit {
        let track = Track::new(TrackId::new("t"), ConcertId::new("c"), "Warehouse", 600);
        PlayableUnit::from_track(&track, None)
    }

    #[test]
    fn offsets_switch_to_hours() {
        assert_eq!(format_offset(Duration::from_secs(65)), "1:05");
        assert_eq!(format_offset(Duration::from_secs(3723)), "1:02:03");
        assert_eq!(format_offset(Duration::ZERO), "0:00");
    }

    #[test]
    fn segment_labels() {
        assert_eq!(segment_label(&unit()), "full track");

        let bounded = unit().with_segment(
            Some(Duration::from_secs(65)),
            Some(Duration::from_secs(130)),
        );
        assert_eq!(segment_label(&bounded), "1:05 - 2:10");

        let open = unit().with_segment(Some(Duration::from_secs(65)), None);
        assert_eq!(segment_label(&open), "1:05 - end");
    }

    #[test]
    fn annotation_lines_list_markers_and_rejects() {
        let map = annotations::resolve(Some("Intro: 1:05\nOutro: soon"));
        let lines = annotation_lines(&map);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("1:05  intro"));
        assert!(lines[1].contains("skipped"));
    }

    #[test]
    fn empty_note_says_so() {
        let lines = annotation_lines(&annotations::resolve(None));
        assert_eq!(lines, vec!["no markers".to_string()]);
    }

    #[test]
    fn failed_references_are_listed() {
        let batch = ResolvedBatch {
            failed_references: vec![FailedReference {
                reference: PlayableRef::Concert(ConcertId::new("c404")),
                reason: "Concert not found: c404".to_string(),
            }],
            ..Default::default()
        };

        assert_eq!(
            resolved_lines(&batch),
            vec!["could not resolve concert c404: Concert not found: c404".to_string()]
        );
    }
}
