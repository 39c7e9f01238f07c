//! The rotation list shared by the control surface and the slideshow loop.
//!
//! Every operation takes the same lock, so callers observe a single total
//! order of effects. Readers that need the whole list get a copy.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::StoreError;

#[derive(Debug)]
struct Frames {
    items: Vec<String>,
    cursor: usize,
}

/// Ordered, mutable list of image identifiers with a rotating cursor.
///
/// Index 0 holds the sentinel passed to [`PictureStore::new`]. The store
/// itself does not protect it; the control surface refuses to remove it so
/// the list never becomes empty.
#[derive(Debug)]
pub struct PictureStore {
    inner: Mutex<Frames>,
}

impl PictureStore {
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Frames {
                items: vec![sentinel.into()],
                cursor: 0,
            }),
        }
    }

    // State is consistent between operations, so a panicked holder leaves
    // nothing half-written behind.
    fn lock(&self) -> MutexGuard<'_, Frames> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn count(&self) -> usize {
        self.lock().items.len()
    }

    /// Appends to the end of the rotation. Duplicates are kept.
    pub fn add(&self, identifier: impl Into<String>) {
        self.lock().items.push(identifier.into());
    }

    pub fn get_at(&self, index: usize) -> Result<String, StoreError> {
        let frames = self.lock();
        frames
            .items
            .get(index)
            .cloned()
            .ok_or(StoreError::OutOfRange {
                index,
                len: frames.items.len(),
            })
    }

    /// Returns the entry under the cursor and advances it, wrapping around.
    ///
    /// A cursor left past the end by earlier removals restarts at 0.
    /// Returns `None` only if the sentinel itself was removed and the list
    /// is empty.
    pub fn next(&self) -> Option<String> {
        let mut frames = self.lock();
        let len = frames.items.len();
        if len == 0 {
            return None;
        }
        if frames.cursor >= len {
            frames.cursor = 0;
        }
        let current = frames.items[frames.cursor].clone();
        frames.cursor = (frames.cursor + 1) % len;
        Some(current)
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lock().items.clone()
    }

    /// Removes the entry at `index`, shifting later entries left.
    pub fn remove_at(&self, index: usize) -> Result<String, StoreError> {
        let mut frames = self.lock();
        let len = frames.items.len();
        if index >= len {
            return Err(StoreError::OutOfRange { index, len });
        }
        Ok(frames.items.remove(index))
    }

    pub fn reset_cursor(&self) {
        self.lock().cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(extra: &[&str]) -> PictureStore {
        let store = PictureStore::new("flair.png");
        for id in extra {
            store.add(*id);
        }
        store
    }

    #[test]
    fn rotation_visits_entries_in_insertion_order_then_wraps() {
        let store = store_with(&["a.png", "b.png"]);
        assert_eq!(store.count(), 3);
        let seen: Vec<_> = (0..4).map(|_| store.next().unwrap()).collect();
        assert_eq!(seen, ["flair.png", "a.png", "b.png", "flair.png"]);
    }

    #[test]
    fn remove_out_of_range_leaves_list_unchanged() {
        let store = store_with(&["a.png", "b.png"]);
        assert_eq!(
            store.remove_at(5),
            Err(StoreError::OutOfRange { index: 5, len: 3 })
        );
        assert_eq!(store.snapshot(), ["flair.png", "a.png", "b.png"]);
    }

    #[test]
    fn get_at_reports_out_of_range() {
        let store = store_with(&[]);
        assert_eq!(store.get_at(0).unwrap(), "flair.png");
        assert!(matches!(
            store.get_at(1),
            Err(StoreError::OutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn unrelated_removal_keeps_cursor() {
        let store = store_with(&["x.png"]);
        store.remove_at(1).unwrap();
        assert_eq!(store.next().as_deref(), Some("flair.png"));
    }

    #[test]
    fn cursor_past_end_restarts_at_zero() {
        let store = store_with(&["a.png", "b.png"]);
        store.next();
        store.next();
        // cursor now points at index 2, which is about to vanish
        store.remove_at(2).unwrap();
        assert_eq!(store.next().as_deref(), Some("flair.png"));
        assert_eq!(store.next().as_deref(), Some("a.png"));
    }

    #[test]
    fn removal_shifts_following_entries_left() {
        let store = store_with(&["a.png", "b.png", "c.png"]);
        assert_eq!(store.remove_at(1).unwrap(), "a.png");
        assert_eq!(store.count(), 3);
        assert_eq!(store.get_at(1).unwrap(), "b.png");
        store.remove_at(2).unwrap();
        assert!(store.get_at(2).is_err());
    }

    #[test]
    fn reset_cursor_restarts_rotation() {
        let store = store_with(&["a.png"]);
        store.next();
        store.reset_cursor();
        assert_eq!(store.next().as_deref(), Some("flair.png"));
    }

    #[test]
    fn duplicates_rotate_separately() {
        let store = store_with(&["a.png", "a.png"]);
        let seen: Vec<_> = (0..3).map(|_| store.next().unwrap()).collect();
        assert_eq!(seen, ["flair.png", "a.png", "a.png"]);
    }

    #[test]
    fn snapshot_is_detached() {
        let store = store_with(&["a.png"]);
        let snap = store.snapshot();
        store.add("b.png");
        store.remove_at(1).unwrap();
        assert_eq!(snap, ["flair.png", "a.png"]);
    }
}
