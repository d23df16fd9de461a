// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The slot-backed collection itself.

use alloc::vec::Vec;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::slice;

use hashbrown::HashMap;

use crate::Cursor;

/// Vacated slots are only compacted away once there are at least this many.
const COMPACT_MIN_VACANT: usize = 16;

/// Lifecycle state of an item that is tracked by an [`IndexedCollection`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// The item is visible to iteration and counted by [`IndexedCollection::len`].
    Active,
    /// The item keeps its slot but is hidden from iteration until reactivated.
    Disabled,
}

/// Outcome of [`IndexedCollection::add_unique`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Insertion {
    /// The item was not tracked and has been appended.
    Appended,
    /// The item was disabled and has been reactivated at its original position.
    Reactivated,
    /// The item was already active; nothing changed.
    AlreadyActive,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    item: T,
    /// Insertion sequence; strictly increasing along `slots`.
    seq: u64,
    /// `None` once the item has been removed.
    state: Option<SlotState>,
}

/// An insertion-ordered set of handles with soft-disable slots.
///
/// See the [crate documentation](crate) for an overview.
///
/// # Type Parameters
///
/// - `T`: the item type, typically a small handle. Must be `Copy + Eq + Hash`; identity
///   is defined by equality.
///
/// # Invariants
///
/// - An item occupies at most one live (active or disabled) slot.
/// - Active items are yielded in the order they were first inserted.
/// - Deactivation and reactivation never move an item.
#[derive(Clone, Debug)]
pub struct IndexedCollection<T> {
    slots: Vec<Slot<T>>,
    positions: HashMap<T, usize>,
    active: usize,
    disabled: usize,
    next_seq: u64,
}

impl<T> Default for IndexedCollection<T>
where
    T: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IndexedCollection<T>
where
    T: Copy + Eq + Hash,
{
    /// Creates an empty collection. Does not allocate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            positions: HashMap::new(),
            active: 0,
            disabled: 0,
            next_seq: 0,
        }
    }

    /// Number of active items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active
    }

    /// Returns `true` if there are no active items.
    ///
    /// Disabled items may still be tracked; see [`capacity`](Self::capacity).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Number of tracked items, active and disabled.
    ///
    /// This is the number that decides whether an owning registry may drop the bucket.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.active + self.disabled
    }

    /// Returns `true` if `item` is tracked and active.
    #[must_use]
    pub fn contains(&self, item: T) -> bool {
        self.state(item) == Some(SlotState::Active)
    }

    /// Returns the state of `item`, or `None` if it is not tracked.
    #[must_use]
    pub fn state(&self, item: T) -> Option<SlotState> {
        let pos = *self.positions.get(&item)?;
        self.slots[pos].state
    }

    /// Appends `item` without checking for an existing entry.
    ///
    /// Only use this when the collection is known not to track `item`, for example a
    /// freshly created bucket. Debug builds assert on duplicates; release builds vacate
    /// the older slot so the collection stays consistent.
    pub fn add(&mut self, item: T) {
        let pos = self.slots.len();
        let previous = self.positions.insert(item, pos);
        debug_assert!(
            previous.is_none(),
            "IndexedCollection::add called with an item that is already tracked"
        );
        if let Some(old) = previous {
            self.vacate(old);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.push(Slot {
            item,
            seq,
            state: Some(SlotState::Active),
        });
        self.active += 1;
    }

    /// Inserts `item` unless it is already tracked.
    ///
    /// A disabled item is reactivated in place instead of being appended again.
    pub fn add_unique(&mut self, item: T) -> Insertion {
        match self.positions.get(&item) {
            None => {
                self.add(item);
                Insertion::Appended
            }
            Some(&pos) => {
                if self.reactivate_at(pos) {
                    Insertion::Reactivated
                } else {
                    Insertion::AlreadyActive
                }
            }
        }
    }

    /// Removes `item`, returning `true` if it was tracked (active or disabled).
    ///
    /// Removing an item that was never added is a no-op.
    pub fn remove(&mut self, item: T) -> bool {
        let Some(pos) = self.positions.remove(&item) else {
            return false;
        };
        self.vacate(pos);
        if self.capacity() == 0 {
            self.slots.clear();
        } else {
            let vacant = self.slots.len() - self.capacity();
            if vacant >= COMPACT_MIN_VACANT && vacant * 2 > self.slots.len() {
                self.compact();
            }
        }
        true
    }

    /// Hides an active `item` from iteration while keeping its slot.
    ///
    /// Returns `true` if the item was active. [`len`](Self::len) drops by one;
    /// [`capacity`](Self::capacity) is unchanged.
    pub fn deactivate(&mut self, item: T) -> bool {
        let Some(&pos) = self.positions.get(&item) else {
            return false;
        };
        let slot = &mut self.slots[pos];
        if slot.state != Some(SlotState::Active) {
            return false;
        }
        slot.state = Some(SlotState::Disabled);
        self.active -= 1;
        self.disabled += 1;
        true
    }

    /// Reactivates a disabled `item` at its original position.
    ///
    /// Returns `true` if the item was disabled.
    pub fn activate(&mut self, item: T) -> bool {
        match self.positions.get(&item) {
            Some(&pos) => self.reactivate_at(pos),
            None => false,
        }
    }

    /// Drops vacated slots, preserving the order of everything else.
    ///
    /// This runs automatically once removals leave more than half of the backing slots
    /// vacated. [`Cursor`]s stay valid across compaction.
    pub fn compact(&mut self) {
        if self.slots.len() == self.capacity() {
            return;
        }
        self.slots.retain(|slot| slot.state.is_some());
        for (pos, slot) in self.slots.iter().enumerate() {
            if let Some(p) = self.positions.get_mut(&slot.item) {
                *p = pos;
            }
        }
    }

    /// Removes every item, active and disabled.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.positions.clear();
        self.active = 0;
        self.disabled = 0;
    }

    /// Iterates active items in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.slots.iter(),
            state: SlotState::Active,
        }
    }

    /// Iterates disabled items in insertion order.
    pub fn iter_disabled(&self) -> Iter<'_, T> {
        Iter {
            inner: self.slots.iter(),
            state: SlotState::Disabled,
        }
    }

    /// Returns a detached cursor positioned before the first item.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        Cursor::new()
    }

    /// Finds the first active item inserted after sequence `after`.
    pub(crate) fn next_active_after(&self, after: Option<u64>) -> Option<(u64, T)> {
        let start = match after {
            Some(seq) => self.slots.partition_point(|slot| slot.seq <= seq),
            None => 0,
        };
        self.slots[start..]
            .iter()
            .find(|slot| slot.state == Some(SlotState::Active))
            .map(|slot| (slot.seq, slot.item))
    }

    fn reactivate_at(&mut self, pos: usize) -> bool {
        let slot = &mut self.slots[pos];
        if slot.state != Some(SlotState::Disabled) {
            return false;
        }
        slot.state = Some(SlotState::Active);
        self.disabled -= 1;
        self.active += 1;
        true
    }

    /// Marks the slot at `pos` vacated. Does not touch `positions`.
    fn vacate(&mut self, pos: usize) {
        let slot = &mut self.slots[pos];
        match slot.state.take() {
            Some(SlotState::Active) => self.active -= 1,
            Some(SlotState::Disabled) => self.disabled -= 1,
            None => {}
        }
    }
}

impl<T> FromIterator<T> for IndexedCollection<T>
where
    T: Copy + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::new();
        out.extend(iter);
        out
    }
}

impl<T> Extend<T> for IndexedCollection<T>
where
    T: Copy + Eq + Hash,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add_unique(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a IndexedCollection<T>
where
    T: Copy + Eq + Hash,
{
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the items of an [`IndexedCollection`] in one [`SlotState`].
///
/// Created by [`IndexedCollection::iter`] and [`IndexedCollection::iter_disabled`].
#[derive(Clone, Debug)]
pub struct Iter<'a, T> {
    inner: slice::Iter<'a, Slot<T>>,
    state: SlotState,
}

impl<T: Copy> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let state = self.state;
        self.inner
            .find(|slot| slot.state == Some(state))
            .map(|slot| slot.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<T: Copy> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<T> {
        let state = self.state;
        self.inner
            .rfind(|slot| slot.state == Some(state))
            .map(|slot| slot.item)
    }
}

impl<T: Copy> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn active(set: &IndexedCollection<u32>) -> Vec<u32> {
        set.iter().collect()
    }

    #[test]
    fn add_unique_is_idempotent() {
        let mut set = IndexedCollection::new();
        assert_eq!(set.add_unique(7), Insertion::Appended);
        assert_eq!(set.add_unique(7), Insertion::AlreadyActive);
        assert_eq!(set.len(), 1);
        assert_eq!(set.capacity(), 1);
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut set = IndexedCollection::<u32>::new();
        assert!(!set.remove(3));
        set.add(1);
        assert!(!set.remove(3));
        assert_eq!(active(&set), vec![1]);
    }

    #[test]
    fn deactivate_keeps_capacity() {
        let mut set: IndexedCollection<u32> = [1, 2, 3].into_iter().collect();
        assert!(set.deactivate(2));
        assert!(!set.deactivate(2));
        assert_eq!(set.len(), 2);
        assert_eq!(set.capacity(), 3);
        assert_eq!(set.state(2), Some(SlotState::Disabled));
        assert!(!set.contains(2));
        assert_eq!(active(&set), vec![1, 3]);
        assert_eq!(set.iter_disabled().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn reactivation_restores_original_position() {
        let mut set: IndexedCollection<u32> = [1, 2, 3].into_iter().collect();
        set.deactivate(1);
        set.add_unique(4);
        assert_eq!(set.add_unique(1), Insertion::Reactivated);
        assert_eq!(active(&set), vec![1, 2, 3, 4]);
        assert_eq!(set.capacity(), 4);
    }

    #[test]
    fn activate_only_touches_disabled_items() {
        let mut set: IndexedCollection<u32> = [1].into_iter().collect();
        assert!(!set.activate(1));
        assert!(!set.activate(9));
        set.deactivate(1);
        assert!(set.activate(1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn removing_a_disabled_item_drops_capacity() {
        let mut set: IndexedCollection<u32> = [1, 2].into_iter().collect();
        set.deactivate(1);
        assert!(set.remove(1));
        assert_eq!(set.capacity(), 1);
        assert_eq!(set.state(1), None);
        set.remove(2);
        assert_eq!(set.capacity(), 0);
        assert!(set.slots.is_empty());
    }

    #[test]
    fn compaction_preserves_order_and_lookups() {
        let mut set: IndexedCollection<u32> = (0..64).collect();
        set.deactivate(63);
        for i in 0..40 {
            set.remove(i);
        }
        // More than half the slots were vacated, so compaction has run.
        assert!(set.slots.len() < 64);
        assert_eq!(active(&set), (40..63).collect::<Vec<_>>());
        assert_eq!(set.state(63), Some(SlotState::Disabled));
        assert!(set.remove(50));
        assert!(set.activate(63));
        assert_eq!(set.iter().next_back(), Some(63));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "already tracked")]
    fn unchecked_add_of_duplicate_asserts() {
        let mut set = IndexedCollection::<u32>::new();
        set.add(1);
        set.add(1);
    }

    #[test]
    fn clear_empties_everything() {
        let mut set: IndexedCollection<u32> = [1, 2].into_iter().collect();
        set.deactivate(2);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), 0);
        assert_eq!(set.add_unique(2), Insertion::Appended);
    }
}
