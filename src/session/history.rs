//! History is a stack of selection snapshots taken within one session.
//! Undo and redo only move the end marker, so a new push after an undo
//! drops everything that was undone.

use crate::Selection;

pub struct History {
    initial: Selection,
    snapshots: Vec<Selection>,
    end: usize,
}

impl History {
    pub fn new(initial: Selection) -> Self {
        Self {
            initial,
            snapshots: Default::default(),
            end: Default::default(),
        }
    }

    pub fn current(&self) -> &Selection {
        self.end
            .checked_sub(1)
            .and_then(|i| self.snapshots.get(i))
            .unwrap_or(&self.initial)
    }

    pub fn initial(&self) -> &Selection {
        &self.initial
    }

    pub fn into_current(mut self) -> Selection {
        match self.end.checked_sub(1) {
            Some(i) => self.snapshots.swap_remove(i),
            None => self.initial,
        }
    }

    /// Whether the current snapshot differs from the initial state.
    pub fn is_dirty(&self) -> bool {
        self.current() != &self.initial
    }

    /// Returns false if `s` equals the current snapshot.
    pub fn push(&mut self, s: Selection) -> bool {
        if &s == self.current() {
            return false;
        }

        self.snapshots.truncate(self.end);
        self.snapshots.push(s);
        self.end = self.snapshots.len();
        true
    }

    pub fn redo(&mut self) -> Option<&Selection> {
        if self.end >= self.snapshots.len() {
            return None;
        }
        self.end += 1;
        Some(self.current())
    }

    pub fn undo(&mut self) -> Option<&Selection> {
        self.end = self.end.checked_sub(1)?;
        Some(self.current())
    }
}
