// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_indexed_collection` crate.
//!
//! These exercise the interplay between removal, deactivation and the count/capacity
//! split that owning registries rely on.

use understory_indexed_collection::{IndexedCollection, Insertion, SlotState};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct Handle(u32, u32);

#[test]
fn n_distinct_items_are_yielded_in_insertion_order() {
    let mut set = IndexedCollection::new();
    let handles: Vec<_> = (0..32).map(|i| Handle(31 - i, 1)).collect();
    for &h in &handles {
        assert_eq!(set.add_unique(h), Insertion::Appended);
    }
    assert_eq!(set.len(), 32);
    assert_eq!(set.iter().collect::<Vec<_>>(), handles);
}

#[test]
fn identity_includes_every_field() {
    let mut set = IndexedCollection::new();
    set.add(Handle(1, 1));
    assert_eq!(set.add_unique(Handle(1, 2)), Insertion::Appended);
    assert_eq!(set.len(), 2);
}

#[test]
fn all_disabled_is_not_empty_capacity() {
    let mut set: IndexedCollection<u32> = [1, 2].into_iter().collect();
    set.deactivate(1);
    set.deactivate(2);
    assert!(set.is_empty());
    assert_eq!(set.capacity(), 2);
    assert_eq!(set.iter().count(), 0);

    set.remove(1);
    set.remove(2);
    assert_eq!(set.capacity(), 0);
}

#[test]
fn disable_then_readd_does_not_duplicate() {
    let mut set: IndexedCollection<u32> = [5, 6].into_iter().collect();
    set.deactivate(5);
    assert_eq!(set.add_unique(5), Insertion::Reactivated);
    assert_eq!(set.add_unique(5), Insertion::AlreadyActive);
    assert_eq!(set.capacity(), 2);
    assert_eq!(set.state(5), Some(SlotState::Active));
    assert_eq!(set.iter().collect::<Vec<_>>(), [5, 6]);
}

#[test]
fn reverse_iteration_sees_latest_first() {
    let set: IndexedCollection<u32> = [1, 2, 3].into_iter().collect();
    assert_eq!(set.iter().rev().collect::<Vec<_>>(), [3, 2, 1]);
    assert_eq!((&set).into_iter().count(), 3);
}

#[test]
fn cursor_walk_with_deactivation_ahead() {
    let mut set: IndexedCollection<u32> = (0..6).collect();
    let mut cursor = set.cursor();
    let mut seen = Vec::new();
    while let Some(item) = cursor.next_item(&set) {
        seen.push(item);
        if item == 1 {
            set.deactivate(3);
            set.remove(4);
        }
    }
    assert_eq!(seen, [0, 1, 2, 5]);
    assert_eq!(set.len(), 4);
    assert_eq!(set.capacity(), 5);
}
