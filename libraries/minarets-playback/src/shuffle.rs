//! Shuffle algorithms for queue randomization
//!
//! Implements both pure random (Fisher-Yates) and smart shuffle algorithms.
//! Both draw from a caller-supplied RNG so a seeded queue shuffles
//! reproducibly.

use crate::types::{PlayableUnit, ShuffleMode};
use minarets_core::ArtistId;
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle a slice of units in place with the given algorithm
pub fn shuffle_units<R: Rng + ?Sized>(units: &mut [PlayableUnit], mode: ShuffleMode, rng: &mut R) {
    match mode {
        ShuffleMode::Random => shuffle_random(units, rng),
        ShuffleMode::Smart => shuffle_smart(units, rng),
    }
}

/// Pure random shuffle using Fisher-Yates algorithm
///
/// Each unit has equal probability of appearing at any position.
fn shuffle_random<R: Rng + ?Sized>(units: &mut [PlayableUnit], rng: &mut R) {
    units.shuffle(rng);
}

/// Smart shuffle algorithm
///
/// Goals:
/// - Avoid the same artist playing consecutively (when possible)
/// - Distribute artists evenly throughout playback
///
/// Algorithm:
/// 1. Group units by artist (units without an artist form their own group)
/// 2. Randomize within each group and randomize the group order
/// 3. Interleave the groups round-robin
fn shuffle_smart<R: Rng + ?Sized>(units: &mut [PlayableUnit], rng: &mut R) {
    if units.len() <= 2 {
        shuffle_random(units, rng);
        return;
    }

    // Groups in first-appearance order, so a seeded rng gives a stable result
    let mut groups: Vec<(Option<ArtistId>, Vec<PlayableUnit>)> = Vec::new();
    for unit in units.iter() {
        match groups.iter_mut().find(|(artist, _)| *artist == unit.artist_id) {
            Some((_, group)) => group.push(unit.clone()),
            None => groups.push((unit.artist_id.clone(), vec![unit.clone()])),
        }
    }

    for (_, group) in groups.iter_mut() {
        group.shuffle(rng);
    }
    groups.shuffle(rng);

    let mut result = Vec::with_capacity(units.len());
    let mut round = 0;
    while result.len() < units.len() {
        for (_, group) in &groups {
            if let Some(unit) = group.get(round) {
                result.push(unit.clone());
            }
        }
        round += 1;
    }

    for (slot, unit) in units.iter_mut().zip(result) {
        *slot = unit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minarets_core::{ConcertId, Track, TrackId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn unit(id: &str, artist: &str) -> PlayableUnit {
        let track = Track::new(TrackId::new(id), ConcertId::new("c"), id, 180);
        PlayableUnit::from_track(&track, Some(ArtistId::new(artist)))
    }

    fn ids(units: &[PlayableUnit]) -> Vec<String> {
        units.iter().map(|u| u.track_id.to_string()).collect()
    }

    fn consecutive_same_artist(units: &[PlayableUnit]) -> usize {
        units
            .windows(2)
            .filter(|pair| pair[0].artist_id == pair[1].artist_id)
            .count()
    }

    #[test]
    fn random_shuffle_preserves_all_units() {
        let mut units = vec![unit("1", "A"), unit("2", "B"), unit("3", "C")];
        let mut rng = StdRng::seed_from_u64(7);

        shuffle_units(&mut units, ShuffleMode::Random, &mut rng);

        let ids: HashSet<String> = ids(&units).into_iter().collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("1") && ids.contains("2") && ids.contains("3"));
    }

    #[test]
    fn same_seed_gives_same_order() {
        let original: Vec<PlayableUnit> = (0..10).map(|i| unit(&i.to_string(), "A")).collect();

        let mut first = original.clone();
        let mut second = original;
        shuffle_units(&mut first, ShuffleMode::Random, &mut StdRng::seed_from_u64(42));
        shuffle_units(&mut second, ShuffleMode::Random, &mut StdRng::seed_from_u64(42));

        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn smart_shuffle_interleaves_two_artists() {
        let mut units = vec![
            unit("1a", "A"),
            unit("1b", "A"),
            unit("1c", "A"),
            unit("2a", "B"),
            unit("2b", "B"),
            unit("2c", "B"),
        ];

        shuffle_units(&mut units, ShuffleMode::Smart, &mut StdRng::seed_from_u64(1));

        // Equal group sizes interleave perfectly
        assert_eq!(consecutive_same_artist(&units), 0);
    }

    #[test]
    fn smart_shuffle_with_many_artists() {
        let mut units: Vec<PlayableUnit> = (0..20)
            .map(|i| unit(&format!("track{i}"), &format!("Artist {}", i % 5)))
            .collect();

        shuffle_units(&mut units, ShuffleMode::Smart, &mut StdRng::seed_from_u64(3));

        assert_eq!(units.len(), 20);
        assert_eq!(consecutive_same_artist(&units), 0);
    }

    #[test]
    fn smart_shuffle_with_single_artist() {
        let mut units = vec![unit("1", "A"), unit("2", "A"), unit("3", "A")];
        shuffle_units(&mut units, ShuffleMode::Smart, &mut StdRng::seed_from_u64(5));
        assert_eq!(units.len(), 3);
    }

    #[test]
    fn smart_shuffle_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(0);

        let mut empty: Vec<PlayableUnit> = vec![];
        shuffle_units(&mut empty, ShuffleMode::Smart, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![unit("1", "A")];
        shuffle_units(&mut single, ShuffleMode::Smart, &mut rng);
        assert_eq!(ids(&single), vec!["1"]);
    }
}
