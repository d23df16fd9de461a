// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group-keyed registries of graphics and colliders.

use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use tracing::{debug, trace, warn};
use understory_indexed_collection::{IndexedCollection, Insertion};

use crate::ColliderId;

/// What to do when a call names a different group than the one an item is registered in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum MismatchHandling {
    /// Ignore the call, report [`Change::GroupMismatch`] and emit a warning.
    #[default]
    Reject,
    /// Apply the call to the recorded group instead.
    ///
    /// For [`GroupRegistry::register`] this moves the item to the new group.
    Redirect,
}

/// Runtime configuration for a [`GroupRegistry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct RegistryConfig {
    /// Policy for group mismatches.
    pub mismatch: MismatchHandling,
}

/// Outcome of a registry mutation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Change<G> {
    /// The group had no bucket; a new one was created holding just this item.
    CreatedGroup,
    /// The item was appended to the group's existing bucket.
    Inserted,
    /// The item was disabled and is active again, at its original position.
    Reactivated,
    /// The item was removed from its group.
    Removed {
        /// `true` if the group's bucket became empty and was dropped.
        group_evicted: bool,
    },
    /// The item was disabled; it stays tracked but is no longer returned by queries.
    Deactivated {
        /// `true` if the group's bucket was dropped.
        group_evicted: bool,
    },
    /// Nothing to do: the item was already in the requested state, or not tracked.
    Unchanged,
    /// The item is registered under `recorded`, not the group named by the call.
    GroupMismatch {
        /// The group the item is actually registered in.
        recorded: G,
    },
    /// The call was skipped because the caller's inputs were incomplete (for example a
    /// collider with no group or owner, or a stale id).
    Ignored,
}

impl<G> Change<G> {
    /// Returns `true` if registry state was modified.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        matches!(
            self,
            Self::CreatedGroup
                | Self::Inserted
                | Self::Reactivated
                | Self::Removed { .. }
                | Self::Deactivated { .. }
        )
    }
}

/// A table from group key to the [`IndexedCollection`] of items registered under it.
///
/// # Invariants
///
/// - An item is tracked by at most one group, recorded in a reverse index.
/// - A group with no tracked items (active or disabled) has no bucket.
/// - Querying an unknown group returns a shared empty collection.
#[derive(Clone, Debug)]
pub struct GroupRegistry<G, T> {
    buckets: HashMap<G, IndexedCollection<T>>,
    membership: HashMap<T, G>,
    empty: IndexedCollection<T>,
    config: RegistryConfig,
}

impl<G, T> Default for GroupRegistry<G, T>
where
    G: Copy + Eq + Hash + Debug,
    T: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G, T> GroupRegistry<G, T>
where
    G: Copy + Eq + Hash + Debug,
    T: Copy + Eq + Hash + Debug,
{
    /// Creates an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry with the given configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            buckets: HashMap::new(),
            membership: HashMap::new(),
            empty: IndexedCollection::new(),
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    /// Registers `item` under `group`.
    ///
    /// A fresh bucket is filled with an unchecked insert; an existing bucket goes through
    /// [`IndexedCollection::add_unique`], which also reactivates a disabled item in place.
    pub fn register(&mut self, group: G, item: T) -> Change<G> {
        if let Some(&recorded) = self.membership.get(&item)
            && recorded != group
        {
            match self.config.mismatch {
                MismatchHandling::Reject => {
                    warn!(
                        ?item,
                        ?group,
                        ?recorded,
                        "register: item already belongs to another group"
                    );
                    return Change::GroupMismatch { recorded };
                }
                MismatchHandling::Redirect => {
                    debug!(?item, from = ?recorded, to = ?group, "moving item between groups");
                    self.remove_from(recorded, item);
                }
            }
        }

        let change = match self.buckets.get_mut(&group) {
            Some(bucket) => match bucket.add_unique(item) {
                Insertion::Appended => Change::Inserted,
                Insertion::Reactivated => Change::Reactivated,
                Insertion::AlreadyActive => Change::Unchanged,
            },
            None => {
                let mut bucket = IndexedCollection::new();
                bucket.add(item);
                self.buckets.insert(group, bucket);
                debug!(?group, "created group bucket");
                Change::CreatedGroup
            }
        };
        self.membership.insert(item, group);
        trace!(?item, ?group, ?change, "register");
        change
    }

    /// Removes `item` from `group`, dropping the bucket once nothing is tracked in it.
    ///
    /// Unknown groups and items are no-ops.
    pub fn unregister(&mut self, group: G, item: T) -> Change<G> {
        let group = match self.resolve(group, item, "unregister") {
            Ok(group) => group,
            Err(change) => return change,
        };
        if !self.remove_from(group, item) {
            return Change::Unchanged;
        }
        let change = Change::Removed {
            group_evicted: !self.buckets.contains_key(&group),
        };
        trace!(?item, ?group, ?change, "unregister");
        change
    }

    /// Disables `item` in `group` without forgetting it.
    ///
    /// The item disappears from [`query`](Self::query) but keeps its slot, so the bucket
    /// is not dropped and a later [`register`](Self::register) restores it in place.
    pub fn disable(&mut self, group: G, item: T) -> Change<G> {
        let group = match self.resolve(group, item, "disable") {
            Ok(group) => group,
            Err(change) => return change,
        };
        let deactivated = self
            .buckets
            .get_mut(&group)
            .is_some_and(|bucket| bucket.deactivate(item));
        if !deactivated {
            return Change::Unchanged;
        }
        let change = Change::Deactivated {
            group_evicted: self.evict_if_drained(group),
        };
        trace!(?item, ?group, ?change, "disable");
        change
    }

    /// The active items of `group`, in registration order.
    ///
    /// Unknown groups yield a shared empty collection.
    #[must_use]
    pub fn query(&self, group: G) -> &IndexedCollection<T> {
        self.buckets.get(&group).unwrap_or(&self.empty)
    }

    /// The group `item` is tracked in (active or disabled), if any.
    #[must_use]
    pub fn group_of(&self, item: T) -> Option<G> {
        self.membership.get(&item).copied()
    }

    /// Returns `true` if `group` currently has a bucket.
    #[must_use]
    pub fn contains_group(&self, group: G) -> bool {
        self.buckets.contains_key(&group)
    }

    /// Number of groups with a bucket.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.buckets.len()
    }

    /// Iterates the groups that currently have a bucket, in unspecified order.
    pub fn groups(&self) -> impl Iterator<Item = G> + '_ {
        self.buckets.keys().copied()
    }

    /// Forgets every group and item.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.membership.clear();
    }

    /// Maps the group named by a call to the group the item is recorded in.
    fn resolve(&self, group: G, item: T, op: &'static str) -> Result<G, Change<G>> {
        match self.membership.get(&item) {
            None => Err(Change::Unchanged),
            Some(&recorded) if recorded == group => Ok(group),
            Some(&recorded) => match self.config.mismatch {
                MismatchHandling::Reject => {
                    warn!(
                        op,
                        ?item,
                        ?group,
                        ?recorded,
                        "item belongs to another group; ignoring"
                    );
                    Err(Change::GroupMismatch { recorded })
                }
                MismatchHandling::Redirect => Ok(recorded),
            },
        }
    }

    fn remove_from(&mut self, group: G, item: T) -> bool {
        let removed = self
            .buckets
            .get_mut(&group)
            .is_some_and(|bucket| bucket.remove(item));
        if removed {
            self.membership.remove(&item);
            self.evict_if_drained(group);
        }
        removed
    }

    fn evict_if_drained(&mut self, group: G) -> bool {
        let drained = self
            .buckets
            .get(&group)
            .is_some_and(|bucket| bucket.capacity() == 0);
        if drained {
            self.buckets.remove(&group);
            debug!(?group, "evicted empty group bucket");
        }
        drained
    }
}

/// The pair of per-canvas tables: plain graphics and their colliders.
///
/// Both sides share the semantics of [`GroupRegistry`]; colliders are keyed by
/// [`ColliderId`] while graphics use the host's own key type `V`.
///
/// The collider table is only written by [`ColliderHost`](crate::ColliderHost), which
/// checks that a collider is alive and owned before registering it.
#[derive(Clone, Debug)]
pub struct CanvasColliderRegistry<G, V> {
    graphics: GroupRegistry<G, V>,
    colliders: GroupRegistry<G, ColliderId>,
}

impl<G, V> Default for CanvasColliderRegistry<G, V>
where
    G: Copy + Eq + Hash + Debug,
    V: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G, V> CanvasColliderRegistry<G, V>
where
    G: Copy + Eq + Hash + Debug,
    V: Copy + Eq + Hash + Debug,
{
    /// Creates empty tables with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates empty tables sharing one configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            graphics: GroupRegistry::with_config(config),
            colliders: GroupRegistry::with_config(config),
        }
    }

    /// Registers a graphic under `canvas`.
    pub fn register_graphic(&mut self, canvas: G, graphic: V) -> Change<G> {
        self.graphics.register(canvas, graphic)
    }

    /// Removes a graphic from `canvas`.
    pub fn unregister_graphic(&mut self, canvas: G, graphic: V) -> Change<G> {
        self.graphics.unregister(canvas, graphic)
    }

    /// Disables a graphic in `canvas`.
    pub fn disable_graphic(&mut self, canvas: G, graphic: V) -> Change<G> {
        self.graphics.disable(canvas, graphic)
    }

    /// Active graphics of `canvas`.
    #[must_use]
    pub fn graphics_for(&self, canvas: G) -> &IndexedCollection<V> {
        self.graphics.query(canvas)
    }

    /// Registers a collider under `canvas`.
    pub(crate) fn register_collider(&mut self, canvas: G, collider: ColliderId) -> Change<G> {
        self.colliders.register(canvas, collider)
    }

    /// Removes a collider from `canvas`.
    pub(crate) fn unregister_collider(&mut self, canvas: G, collider: ColliderId) -> Change<G> {
        self.colliders.unregister(canvas, collider)
    }

    /// Disables a collider in `canvas`.
    pub(crate) fn disable_collider(&mut self, canvas: G, collider: ColliderId) -> Change<G> {
        self.colliders.disable(canvas, collider)
    }

    /// Active colliders of `canvas`.
    #[must_use]
    pub fn colliders_for(&self, canvas: G) -> &IndexedCollection<ColliderId> {
        self.colliders.query(canvas)
    }

    /// The graphic table.
    #[must_use]
    pub fn graphics(&self) -> &GroupRegistry<G, V> {
        &self.graphics
    }

    /// The collider table.
    #[must_use]
    pub fn colliders(&self) -> &GroupRegistry<G, ColliderId> {
        &self.colliders
    }
}
