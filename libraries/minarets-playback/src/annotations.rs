//! Track time markers embedded in concert notes
//!
//! Editors annotate concert notes with lines such as:
//!
//! ```text
//! Intro: 1:05
//! Verse 2 = 2:10
//! - Drums - 1:02:30
//! ```
//!
//! Markers may also run on within prose, separated by punctuation
//! (`Intro: 1:05. Verse: 2:10`), and may be followed by free text
//! (`Intro: 1:05 (acoustic)`).
//!
//! [`resolve`] turns a note into an [`AnnotationMap`] keyed by the
//! normalized marker text. Parsing is total: markers with unreadable times
//! are dropped and kept as diagnostics, everything else still resolves.

use crate::error::AnnotationParseError;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

/// `<token> <separator> <time>` where the separator is `:`, `=` or ` - `
/// and the time is numeric; any text may follow the time
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[-*•]\s*)?(?P<token>[^:=]+?)\s*(?::|=|\s-\s)\s*(?P<time>\d+(?::\d+)*)(?:$|[\s.)\]])",
    )
    .expect("marker pattern is valid")
});

/// A whole segment shaped like a marker whose time is not numeric
static LOOSE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*•]\s*)?(?P<token>[^:=]+?)\s*(?::|=|\s-\s)\s*(?P<time>\S*)$")
        .expect("marker pattern is valid")
});

/// Characters that separate markers on the same line
const SEGMENT_DELIMITERS: &[char] = &['\n', '\r', ';', ',', '|'];

/// Sentence break inside a line
const SENTENCE_DELIMITER: &str = ". ";

/// A single resolved marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Normalized marker text
    pub token: String,

    /// Offset into the track's media
    pub offset: Duration,
}

/// Markers of one concert note, in note order
#[derive(Debug, Clone, Default)]
pub struct AnnotationMap {
    entries: Vec<Annotation>,
    index: HashMap<String, usize>,
    rejected: Vec<AnnotationParseError>,
}

impl AnnotationMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a marker; the token is normalized before lookup
    pub fn get(&self, token: &str) -> Option<&Annotation> {
        self.index
            .get(&normalize_token(token))
            .map(|&i| &self.entries[i])
    }

    /// Offset of a marker
    pub fn offset_of(&self, token: &str) -> Option<Duration> {
        self.get(token).map(|annotation| annotation.offset)
    }

    /// Smallest marker offset strictly after `offset`
    ///
    /// This is where a segment starting at `offset` ends.
    pub fn next_offset_after(&self, offset: Duration) -> Option<Duration> {
        self.entries
            .iter()
            .map(|annotation| annotation.offset)
            .filter(|candidate| *candidate > offset)
            .min()
    }

    /// Markers in the order they appear in the note
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.entries.iter()
    }

    /// Number of markers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the note had no usable markers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Markers that looked like time markers but could not be parsed
    pub fn rejected(&self) -> &[AnnotationParseError] {
        &self.rejected
    }

    /// Parse one candidate marker, keeping it or its diagnostic
    fn record(&mut self, raw_token: &str, time: &str) {
        let token = normalize_token(raw_token);
        if token.is_empty() {
            return;
        }

        match parse_time(&token, time) {
            Ok(offset) => {
                if !self.insert(token.clone(), offset) {
                    tracing::trace!(token = %token, "Ignoring duplicate note marker");
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "Dropping unparseable note marker");
                self.rejected.push(err);
            }
        }
    }

    /// Insert a marker unless the token is already present (first wins)
    fn insert(&mut self, token: String, offset: Duration) -> bool {
        if self.index.contains_key(&token) {
            return false;
        }
        self.index.insert(token.clone(), self.entries.len());
        self.entries.push(Annotation { token, offset });
        true
    }
}

/// Parse a concert note into its time markers
///
/// `None`, an empty note, or a note without markers yields an empty map.
pub fn resolve(note: Option<&str>) -> AnnotationMap {
    let mut map = AnnotationMap::new();
    let Some(note) = note else {
        return map;
    };

    let segments = note
        .split(SEGMENT_DELIMITERS)
        .flat_map(|line| line.split(SENTENCE_DELIMITER))
        .map(str::trim)
        .filter(|segment| !segment.is_empty());

    for segment in segments {
        let mut matched = false;
        for captures in MARKER.captures_iter(segment) {
            matched = true;
            map.record(&captures["token"], &captures["time"]);
        }

        if !matched {
            if let Some(captures) = LOOSE_MARKER.captures(segment) {
                map.record(&captures["token"], &captures["time"]);
            }
        }
    }

    map
}

/// Trim, lowercase, and collapse internal whitespace
pub fn normalize_token(token: &str) -> String {
    token
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parse `ss`, `mm:ss`, or `h:mm:ss` into a Duration
fn parse_time(token: &str, value: &str) -> Result<Duration, AnnotationParseError> {
    let value = value.trim_end_matches('.');
    if value.is_empty() {
        return Err(AnnotationParseError::MissingTime {
            token: token.to_string(),
        });
    }

    let fields: Vec<&str> = value.split(':').collect();
    if fields.len() > 3 {
        return Err(AnnotationParseError::TooManyFields {
            token: token.to_string(),
            value: value.to_string(),
        });
    }

    let mut total: u64 = 0;
    for (i, field) in fields.iter().enumerate() {
        let number = field
            .parse::<u64>()
            .ok()
            .filter(|_| field.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| AnnotationParseError::NonNumeric {
                token: token.to_string(),
                value: value.to_string(),
            })?;

        if i > 0 && number >= 60 {
            return Err(AnnotationParseError::FieldOutOfRange {
                token: token.to_string(),
                field: (*field).to_string(),
            });
        }

        total = total.saturating_mul(60).saturating_add(number);
    }

    Ok(Duration::from_secs(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_missing_notes_resolve_empty() {
        assert!(resolve(None).is_empty());
        assert!(resolve(Some("")).is_empty());
        assert!(resolve(Some("Great show, rain delay before the encore.")).is_empty());
    }

    #[test]
    fn parses_minutes_seconds() {
        let map = resolve(Some("Intro: 1:05\nVerse: 2:10"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.offset_of("Intro"), Some(Duration::from_secs(65)));
        assert_eq!(map.offset_of("verse"), Some(Duration::from_secs(130)));
    }

    #[test]
    fn parses_hours_and_bare_seconds() {
        let map = resolve(Some("Jam: 1:02:03; Tuning: 95"));
        assert_eq!(map.offset_of("jam"), Some(Duration::from_secs(3723)));
        assert_eq!(map.offset_of("tuning"), Some(Duration::from_secs(95)));
    }

    #[test]
    fn tokens_are_normalized() {
        let map = resolve(Some("  The   Best Of   WHAT'S Around :  0:30 "));
        assert_eq!(
            map.iter().next().map(|a| a.token.as_str()),
            Some("the best of what's around")
        );
        assert!(map.get("THE BEST OF what's   around").is_some());
    }

    #[test]
    fn accepts_alternate_separators_and_bullets() {
        let map = resolve(Some("- Drums - 4:00\n* Bass = 5:00\n• Keys: 6:00"));
        assert_eq!(map.offset_of("drums"), Some(Duration::from_secs(240)));
        assert_eq!(map.offset_of("bass"), Some(Duration::from_secs(300)));
        assert_eq!(map.offset_of("keys"), Some(Duration::from_secs(360)));
    }

    #[test]
    fn hyphenated_titles_keep_their_hyphen() {
        let map = resolve(Some("Jimi Thing - Part 2: 3:00"));
        assert_eq!(map.offset_of("jimi thing - part 2"), Some(Duration::from_secs(180)));
    }

    #[test]
    fn first_duplicate_wins() {
        let map = resolve(Some("Intro: 0:10\nINTRO: 0:20"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.offset_of("intro"), Some(Duration::from_secs(10)));
    }

    #[test]
    fn unparseable_first_occurrence_does_not_block_later_one() {
        let map = resolve(Some("Intro: soon\nIntro: 0:20"));
        assert_eq!(map.offset_of("intro"), Some(Duration::from_secs(20)));
        assert_eq!(map.rejected().len(), 1);
    }

    #[test]
    fn bad_times_are_dropped_not_fatal() {
        let map = resolve(Some("A: 1:75\nB: 1:2:3:4\nC: x1\nD:\nE: 2:00"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.offset_of("e"), Some(Duration::from_secs(120)));
        assert_eq!(map.rejected().len(), 4);
        assert!(matches!(
            map.rejected()[0],
            AnnotationParseError::FieldOutOfRange { .. }
        ));
        assert!(matches!(
            map.rejected()[1],
            AnnotationParseError::TooManyFields { .. }
        ));
        assert!(matches!(
            map.rejected()[2],
            AnnotationParseError::NonNumeric { .. }
        ));
        assert!(matches!(
            map.rejected()[3],
            AnnotationParseError::MissingTime { .. }
        ));
    }

    #[test]
    fn trailing_period_is_tolerated() {
        let map = resolve(Some("Outro: 9:59."));
        assert_eq!(map.offset_of("outro"), Some(Duration::from_secs(599)));
    }

    #[test]
    fn sentence_breaks_separate_markers() {
        let map = resolve(Some("Intro: 1:05. Verse: 2:10"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.offset_of("intro"), Some(Duration::from_secs(65)));
        assert_eq!(map.offset_of("verse"), Some(Duration::from_secs(130)));
        assert!(map.rejected().is_empty());
    }

    #[test]
    fn text_after_the_time_is_ignored() {
        let map = resolve(Some("Intro: 1:05 (acoustic)\nVerse: 2:10"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.offset_of("intro"), Some(Duration::from_secs(65)));
        assert_eq!(map.offset_of("verse"), Some(Duration::from_secs(130)));
        assert!(map.rejected().is_empty());
    }

    #[test]
    fn time_glued_to_letters_is_rejected() {
        let map = resolve(Some("Intro: 1:5x"));
        assert!(map.is_empty());
        assert!(matches!(
            map.rejected(),
            [AnnotationParseError::NonNumeric { .. }]
        ));
    }

    #[test]
    fn next_offset_after_finds_following_marker() {
        let map = resolve(Some("Verse: 2:10\nIntro: 1:05\nOutro: 5:00"));
        assert_eq!(
            map.next_offset_after(Duration::from_secs(65)),
            Some(Duration::from_secs(130))
        );
        assert_eq!(map.next_offset_after(Duration::from_secs(300)), None);
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_token("  Ants \t Marching "), "ants marching");
    }
}
