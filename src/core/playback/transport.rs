//! core/playback/transport.rs
//! Play order for the selected playlist: which song is current, what comes
//! next, shuffle and repeat-one.
//!
//! Pure index bookkeeping. Nothing here touches audio.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::types::SongId;

#[derive(Debug, Default, Clone)]
pub struct Transport {
    /// Sorted order of the playlist, as handed over by the model.
    sorted: Vec<SongId>,
    /// Active order: `sorted`, or a permutation of it while shuffling.
    order: Vec<SongId>,
    current: usize,
    shuffle: bool,
    repeat: bool,
}

impl Transport {
    /// New playlist: sorted order, first song, shuffle and repeat off.
    pub fn reset(&mut self, sorted: Vec<SongId>) {
        self.order = sorted.clone();
        self.sorted = sorted;
        self.current = 0;
        self.shuffle = false;
        self.repeat = false;
    }

    /// Same playlist, different contents (favorite toggled, song added...).
    /// Keeps the current song where possible and keeps the shuffle permutation
    /// for songs that survived.
    pub fn refresh(&mut self, sorted: Vec<SongId>) {
        let current_id = self.current_id().cloned();

        if self.shuffle {
            let mut order: Vec<SongId> = self
                .order
                .iter()
                .filter(|id| sorted.contains(id))
                .cloned()
                .collect();
            for id in &sorted {
                if !order.contains(id) {
                    order.push(id.clone());
                }
            }
            self.order = order;
        } else {
            self.order = sorted.clone();
        }
        self.sorted = sorted;

        self.current = match current_id.and_then(|id| self.position_of(&id)) {
            Some(i) => i,
            None => self.current.min(self.order.len().saturating_sub(1)),
        };
    }

    pub fn order(&self) -> &[SongId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_id(&self) -> Option<&SongId> {
        self.order.get(self.current)
    }

    pub fn position_of(&self, id: &SongId) -> Option<usize> {
        self.order.iter().position(|s| s == id)
    }

    pub fn is_shuffling(&self) -> bool {
        self.shuffle
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat
    }

    pub fn next_index(&self) -> Option<usize> {
        let n = self.order.len();
        (n > 0).then(|| (self.current + 1) % n)
    }

    pub fn previous_index(&self) -> Option<usize> {
        let n = self.order.len();
        (n > 0).then(|| (self.current + n - 1) % n)
    }

    /// User pressed next. Turns repeat-one off.
    pub fn advance(&mut self) -> Option<&SongId> {
        self.current = self.next_index()?;
        self.repeat = false;
        self.current_id()
    }

    /// User pressed previous. Turns repeat-one off.
    pub fn retreat(&mut self) -> Option<&SongId> {
        self.current = self.previous_index()?;
        self.repeat = false;
        self.current_id()
    }

    /// User picked a song from the list. Turns repeat-one off.
    pub fn jump(&mut self, index: usize) -> Option<&SongId> {
        if index >= self.order.len() {
            return None;
        }
        self.current = index;
        self.repeat = false;
        self.current_id()
    }

    /// The current song finished on its own.
    pub fn on_track_end(&mut self) -> Option<&SongId> {
        if !self.repeat {
            self.current = self.next_index()?;
        }
        self.current_id()
    }

    /// Flip shuffle, re-derive the order and go back to the first song.
    /// Returns the new shuffle flag, or None when there is nothing to shuffle.
    pub fn toggle_shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<bool> {
        if self.order.is_empty() {
            return None;
        }

        self.shuffle = !self.shuffle;
        self.repeat = false;

        self.order = self.sorted.clone();
        if self.shuffle {
            self.order.shuffle(rng);
        }
        self.current = 0;

        Some(self.shuffle)
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.repeat
    }
}
