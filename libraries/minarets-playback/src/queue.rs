//! Playback queue
//!
//! A single ordered list of units plus a cursor:
//!
//! ```text
//!   0  A
//!   1  B   <- cursor (currently playing)
//!   2  X   \ priority batch, inserted right after the cursor
//!   3  Y   /
//!   4  C
//! ```
//!
//! Every operation either applies completely or returns an
//! [`InvalidQueueOperation`] and leaves the queue untouched.

use crate::error::InvalidQueueOperation;
use crate::shuffle::shuffle_units;
use crate::types::{PlayableUnit, QueueMode, ShuffleMode, UniqueId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result type for queue operations
pub type QueueResult<T> = std::result::Result<T, InvalidQueueOperation>;

/// Outcome of [`Queue::append_priority`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// Nothing was playing; the batch replaced the queue and starts at index 0
    Replaced,

    /// The batch was inserted starting at this index
    InsertedAt(usize),

    /// The batch was empty
    Empty,
}

/// Outcome of [`Queue::remove`]
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    /// The unit that left the queue
    pub removed: PlayableUnit,

    /// Whether the removed unit was the current one
    pub was_current: bool,
}

/// Point-in-time copy of the queue for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Units in play order
    pub entries: Vec<PlayableUnit>,

    /// Index of the current unit
    pub cursor: Option<usize>,

    /// Ordering mode
    pub mode: QueueMode,
}

impl QueueSnapshot {
    /// Currently playing unit
    pub fn current(&self) -> Option<&PlayableUnit> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    /// Units still to come after the current one
    pub fn upcoming(&self) -> &[PlayableUnit] {
        match self.cursor {
            Some(i) => &self.entries[i + 1..],
            None => &[],
        }
    }
}

impl Default for QueueSnapshot {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            mode: QueueMode::Sequential,
        }
    }
}

/// Ordered, mutable sequence of playable units with a cursor
#[derive(Debug, Clone)]
pub struct Queue {
    entries: Vec<PlayableUnit>,

    /// Invariant: `None` or a valid index into `entries`
    cursor: Option<usize>,

    mode: QueueMode,

    shuffle: ShuffleMode,

    rng: StdRng,

    /// Ids taken out through `remove`; not handed out again
    retired: HashSet<UniqueId>,
}

impl Queue {
    /// Create an empty queue shuffling from OS entropy
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create an empty queue whose shuffles are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            mode: QueueMode::Sequential,
            shuffle: ShuffleMode::Random,
            rng,
            retired: HashSet::new(),
        }
    }

    /// Select the shuffle algorithm
    pub fn set_shuffle_mode(&mut self, shuffle: ShuffleMode) {
        self.shuffle = shuffle;
    }

    /// Replace the whole queue and start at the first unit
    ///
    /// In shuffled mode the first unit stays first and the rest is shuffled.
    pub fn replace_and_play(&mut self, units: Vec<PlayableUnit>) -> Option<&PlayableUnit> {
        self.clear();

        let units = self.admit(units);
        if units.is_empty() {
            return None;
        }

        self.entries = units;
        self.cursor = Some(0);
        if self.mode == QueueMode::Shuffled {
            shuffle_units(&mut self.entries[1..], self.shuffle, &mut self.rng);
        }

        self.current()
    }

    /// Insert units immediately after the cursor, keeping batch order
    ///
    /// With no current unit (empty or stopped queue) this behaves like
    /// [`Queue::replace_and_play`].
    pub fn append_priority(&mut self, units: Vec<PlayableUnit>) -> Insertion {
        if units.is_empty() {
            return Insertion::Empty;
        }

        let Some(cursor) = self.cursor else {
            self.replace_and_play(units);
            return Insertion::Replaced;
        };

        let at = cursor + 1;
        let units = self.admit(units);
        let tail = self.entries.split_off(at);
        self.entries.extend(units);
        self.entries.extend(tail);
        Insertion::InsertedAt(at)
    }

    /// Move to the next unit after natural completion
    ///
    /// Past the last unit the cursor becomes `None` and `Ok(None)` is
    /// returned; the queue does not loop.
    pub fn advance(&mut self) -> QueueResult<Option<&PlayableUnit>> {
        let cursor = self.cursor.ok_or(InvalidQueueOperation::NoCurrentEntry)?;

        if cursor + 1 < self.entries.len() {
            self.cursor = Some(cursor + 1);
        } else {
            self.cursor = None;
        }
        Ok(self.current())
    }

    /// Step back to the previous unit
    pub fn previous(&mut self) -> QueueResult<&PlayableUnit> {
        let cursor = self.cursor.ok_or(InvalidQueueOperation::NoCurrentEntry)?;
        if cursor == 0 {
            return Err(InvalidQueueOperation::AtStart);
        }

        self.cursor = Some(cursor - 1);
        Ok(&self.entries[cursor - 1])
    }

    /// Jump directly to an index
    pub fn skip_to(&mut self, index: usize) -> QueueResult<&PlayableUnit> {
        if index >= self.entries.len() {
            return Err(InvalidQueueOperation::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }

        self.cursor = Some(index);
        Ok(&self.entries[index])
    }

    /// Remove a unit by its unique id
    ///
    /// Removing the current unit moves the cursor to the unit that followed
    /// it, or to `None` when it was the last one.
    pub fn remove(&mut self, unique_id: UniqueId) -> QueueResult<Removal> {
        let index = self
            .position_of(unique_id)
            .ok_or(InvalidQueueOperation::UnknownEntry(unique_id))?;

        let removed = self.entries.remove(index);
        self.retired.insert(removed.unique_id);
        let was_current = self.cursor == Some(index);

        self.cursor = match self.cursor {
            Some(cursor) if index < cursor => Some(cursor - 1),
            Some(cursor) if index == cursor => (cursor < self.entries.len()).then_some(cursor),
            other => other,
        };

        Ok(Removal {
            removed,
            was_current,
        })
    }

    /// Shuffle every unit after the cursor
    ///
    /// The current unit and everything before it keep their positions. With
    /// no cursor the whole queue is shuffled.
    pub fn shuffle_remaining(&mut self) {
        let start = self.cursor.map_or(0, |cursor| cursor + 1);
        shuffle_units(&mut self.entries[start..], self.shuffle, &mut self.rng);
        self.mode = QueueMode::Shuffled;
    }

    /// Return to sequential mode (does not restore the original order)
    pub fn set_sequential(&mut self) {
        self.mode = QueueMode::Sequential;
    }

    /// Remove every unit
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Currently playing unit
    pub fn current(&self) -> Option<&PlayableUnit> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    /// Index of the current unit
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Ordering mode
    pub fn mode(&self) -> QueueMode {
        self.mode
    }

    /// Unit at an index
    pub fn get(&self, index: usize) -> Option<&PlayableUnit> {
        self.entries.get(index)
    }

    /// Index of the unit with this id
    pub fn position_of(&self, unique_id: UniqueId) -> Option<usize> {
        self.entries.iter().position(|u| u.unique_id == unique_id)
    }

    /// Units in play order
    pub fn entries(&self) -> &[PlayableUnit] {
        &self.entries
    }

    /// Number of units
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue holds no units
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy the queue for rendering
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            entries: self.entries.clone(),
            cursor: self.cursor,
            mode: self.mode,
        }
    }

    /// Give every incoming unit an id not held or retired by this queue
    fn admit(&mut self, units: Vec<PlayableUnit>) -> Vec<PlayableUnit> {
        let mut taken: HashSet<UniqueId> = self.entries.iter().map(|u| u.unique_id).collect();
        taken.extend(self.retired.iter().copied());

        units
            .into_iter()
            .map(|mut unit| {
                while !taken.insert(unit.unique_id) {
                    unit = unit.with_fresh_id();
                }
                unit
            })
            .collect()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}
