// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collider records and their handles.

use kurbo::{Point, Rect};

use crate::Padding;

/// Identifier for a collider owned by a [`ColliderHost`](crate::ColliderHost).
///
/// A slot index plus a generation counter, in the same spirit as node handles elsewhere
/// in Understory:
///
/// - On attach, a fresh slot is allocated with generation `1`.
/// - On destroy, the slot is freed and any existing id for it becomes stale.
/// - On reuse of a freed slot, its generation is incremented, so stale ids never alias a
///   different live collider.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ColliderId(pub(crate) u32, pub(crate) u32);

impl ColliderId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// A hit-test region tied to one graphic.
///
/// - `G` is the group key (canvas) resolved by the host when the collider was attached.
/// - `V` is the key of the owning graphic.
///
/// The group is captured once and is not re-evaluated if the host hierarchy changes; use
/// [`ColliderHost::reparent`](crate::ColliderHost::reparent) to move it explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct Collider<G, V> {
    pub(crate) owner: Option<V>,
    pub(crate) group: Option<G>,
    pub(crate) padding: Padding,
}

impl<G: Copy, V: Copy> Collider<G, V> {
    pub(crate) const fn new(owner: V, group: Option<G>) -> Self {
        Self {
            owner: Some(owner),
            group,
            padding: Padding::ZERO,
        }
    }

    /// The owning graphic, or `None` once the host has released it.
    #[must_use]
    pub fn owner(&self) -> Option<V> {
        self.owner
    }

    /// The group captured at attach time, if one was resolved.
    #[must_use]
    pub fn group(&self) -> Option<G> {
        self.group
    }

    /// Current padding.
    #[must_use]
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Returns `true` if both an owner and a group are present.
    ///
    /// Only valid colliders are ever registered.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.owner.is_some() && self.group.is_some()
    }

    /// The padded hit region for the owner's layout rect, in the owner's local space.
    #[must_use]
    pub fn hit_rect(&self, owner_rect: Rect) -> Rect {
        self.padding.apply(owner_rect)
    }

    /// Returns `true` if the local point `pt` falls inside the padded region.
    ///
    /// Degenerate regions contain no points.
    #[must_use]
    pub fn contains_local(&self, owner_rect: Rect, pt: Point) -> bool {
        self.hit_rect(owner_rect).contains(pt)
    }
}
