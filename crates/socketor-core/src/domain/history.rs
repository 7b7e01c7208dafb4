//! Capacity-bounded message history.
//!
//! Each connection shows at most `max_entries` messages.  When a new message
//! would push the list past that bound, the oldest message is evicted first.
//! Nothing else ever removes an entry except [`MessageHistory::clear`].
//!
//! ```text
//! max_entries = 3
//!
//! append(a)  [a]
//! append(b)  [a, b]
//! append(c)  [a, b, c]
//! append(d)  [b, c, d]   ← `a` evicted
//! ```
//!
//! # Ownership
//!
//! `MessageHistory` is a plain single-owner value with `&mut self` methods.
//! When messages arrive from several tasks, route them through one owner
//! (a queue feeding a single task) rather than sharing the history behind a
//! lock; see the CLI crate's `application::session` module.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::domain::config::MessageBoxConfig;

/// Ordered, capacity-bounded list of messages (oldest first).
#[derive(Debug, Clone, PartialEq)]
pub struct MessageHistory<T> {
    entries: VecDeque<T>,
    max_entries: NonZeroUsize,
}

impl<T> MessageHistory<T> {
    /// Creates an empty history that holds at most `max_entries` items.
    pub fn new(max_entries: NonZeroUsize) -> Self {
        Self {
            // VecDeque grows lazily; avoid reserving huge bounds up front.
            entries: VecDeque::with_capacity(max_entries.get().min(1024)),
            max_entries,
        }
    }

    /// Creates an empty history bounded by the message box's `max_entries`.
    pub fn for_message_box(message_box: &MessageBoxConfig) -> Self {
        Self::new(message_box.max_entries)
    }

    /// Appends `item`, evicting the oldest entry first if the history is full.
    ///
    /// Returns the evicted entry, if any.
    pub fn append(&mut self, item: T) -> Option<T> {
        let evicted = if self.entries.len() >= self.max_entries.get() {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(item);
        evicted
    }

    /// Changes the bound.  Shrinking evicts the oldest entries immediately.
    ///
    /// Returns the evicted entries, oldest first.
    pub fn set_max_entries(&mut self, max_entries: NonZeroUsize) -> Vec<T> {
        self.max_entries = max_entries;
        let excess = self.entries.len().saturating_sub(max_entries.get());
        self.entries.drain(..excess).collect()
    }

    pub fn max_entries(&self) -> NonZeroUsize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.  The bound is unchanged.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates from the oldest to the newest entry.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The most recently appended entry.
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }
}

impl<T: Clone> MessageHistory<T> {
    /// Copies the entries into a `Vec`, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

impl<'a, T> IntoIterator for &'a MessageHistory<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
