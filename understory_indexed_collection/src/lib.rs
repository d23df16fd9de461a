// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Indexed Collection: an insertion-ordered handle set with soft-disable slots.
//!
//! [`IndexedCollection`] is the bucket type behind per-group registries such as
//! "all colliders registered under this canvas". It combines:
//!
//! - A backing `Vec` of tagged slots kept in insertion order.
//! - A hash index from item identity to slot position, giving O(1) average duplicate
//!   checks and removal.
//! - Two distinct lifecycle transitions on the same slot: **removal** vacates the slot,
//!   while **deactivation** keeps the slot (and its position) but hides the item from
//!   iteration until it is reactivated.
//!
//! Items are expected to be small `Copy` handles (generational ids, interned keys, and so
//! on). Equality means "same logical entity".
//!
//! ## Count vs. capacity
//!
//! - [`IndexedCollection::len`] counts **active** items only.
//! - [`IndexedCollection::capacity`] counts active **and** disabled items.
//!
//! Registries use `capacity() == 0` as the signal that a bucket may be dropped, so a bucket
//! whose items are all disabled is kept around and re-enabling reuses the original slots.
//!
//! ```rust
//! use understory_indexed_collection::{IndexedCollection, Insertion};
//!
//! let mut set = IndexedCollection::<u32>::new();
//! set.add(1);
//! assert_eq!(set.add_unique(2), Insertion::Appended);
//! assert_eq!(set.add_unique(2), Insertion::AlreadyActive);
//!
//! set.deactivate(1);
//! assert_eq!(set.len(), 1);
//! assert_eq!(set.capacity(), 2);
//!
//! // Re-adding a disabled item restores it in place.
//! assert_eq!(set.add_unique(1), Insertion::Reactivated);
//! assert_eq!(set.iter().collect::<Vec<_>>(), [1, 2]);
//! ```
//!
//! ## Mutating while walking
//!
//! Borrowing iteration through [`IndexedCollection::iter`] cannot overlap a mutation. When
//! a caller needs to walk a bucket and change it along the way, it uses a detached
//! [`Cursor`]. A cursor remembers the insertion sequence of the last item it yielded rather
//! than a slot position, so it stays valid across removals, deactivations and compaction.
//!
//! ```rust
//! use understory_indexed_collection::IndexedCollection;
//!
//! let mut set: IndexedCollection<u32> = [10, 11, 12, 13].into_iter().collect();
//!
//! let mut cursor = set.cursor();
//! let mut seen = Vec::new();
//! while let Some(item) = cursor.next_item(&set) {
//!     seen.push(item);
//!     if item % 2 == 0 {
//!         set.remove(item + 1);
//!     }
//! }
//! assert_eq!(seen, [10, 12]);
//! assert_eq!(set.iter().collect::<Vec<_>>(), [10, 12]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod collection;
mod cursor;

pub use collection::{IndexedCollection, Insertion, Iter, SlotState};
pub use cursor::Cursor;
