// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detached, mutation-tolerant enumeration.

use core::hash::Hash;

use crate::IndexedCollection;

/// A walking position over an [`IndexedCollection`] that does not borrow it.
///
/// The cursor stores the insertion sequence of the last item it yielded. Each call to
/// [`next_item`](Self::next_item) resumes at the first active item inserted after that
/// point, so the collection may be freely mutated between steps:
///
/// - Every item that stays active for the whole walk is yielded exactly once, in
///   insertion order.
/// - Items removed or deactivated before the cursor reaches them are skipped.
/// - Items appended during the walk are yielded when the cursor reaches the end.
/// - Items reactivated behind the cursor are not revisited.
///
/// A cursor should only be used with the collection that created it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    after: Option<u64>,
}

impl Cursor {
    /// Creates a cursor positioned before the first item.
    #[must_use]
    pub const fn new() -> Self {
        Self { after: None }
    }

    /// Yields the next active item of `collection`, or `None` when the walk is done.
    pub fn next_item<T>(&mut self, collection: &IndexedCollection<T>) -> Option<T>
    where
        T: Copy + Eq + Hash,
    {
        let (seq, item) = collection.next_active_after(self.after)?;
        self.after = Some(seq);
        Some(item)
    }

    /// Moves the cursor back before the first item.
    pub fn reset(&mut self) {
        self.after = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn walk<T: Copy + Eq + Hash>(set: &IndexedCollection<T>) -> Vec<T> {
        let mut cursor = set.cursor();
        let mut out = Vec::new();
        while let Some(item) = cursor.next_item(set) {
            out.push(item);
        }
        out
    }

    #[test]
    fn walks_active_items_in_order() {
        let mut set: IndexedCollection<u32> = [3, 1, 2].into_iter().collect();
        set.deactivate(1);
        assert_eq!(walk(&set), vec![3, 2]);
    }

    #[test]
    fn removing_the_current_item_does_not_skip_the_next() {
        let mut set: IndexedCollection<u32> = (0..5).collect();
        let mut cursor = set.cursor();
        let mut seen = Vec::new();
        while let Some(item) = cursor.next_item(&set) {
            seen.push(item);
            set.remove(item);
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(set.capacity(), 0);
    }

    #[test]
    fn appended_items_are_reached() {
        let mut set: IndexedCollection<u32> = [1].into_iter().collect();
        let mut cursor = set.cursor();
        assert_eq!(cursor.next_item(&set), Some(1));
        set.add_unique(2);
        assert_eq!(cursor.next_item(&set), Some(2));
        assert_eq!(cursor.next_item(&set), None);
    }

    #[test]
    fn survives_compaction() {
        let mut set: IndexedCollection<u32> = (0..100).collect();
        let mut cursor = set.cursor();
        for expected in 0..60 {
            assert_eq!(cursor.next_item(&set), Some(expected));
        }
        // Vacate most of what is behind the cursor, forcing compaction.
        for i in 0..59 {
            set.remove(i);
        }
        assert_eq!(cursor.next_item(&set), Some(60));
        cursor.reset();
        assert_eq!(cursor.next_item(&set), Some(59));
    }

    #[test]
    fn reactivated_items_behind_the_cursor_are_not_revisited() {
        let mut set: IndexedCollection<u32> = [1, 2, 3].into_iter().collect();
        let mut cursor = set.cursor();
        assert_eq!(cursor.next_item(&set), Some(1));
        set.deactivate(1);
        assert_eq!(cursor.next_item(&set), Some(2));
        set.activate(1);
        assert_eq!(cursor.next_item(&set), Some(3));
        assert_eq!(cursor.next_item(&set), None);
    }
}
