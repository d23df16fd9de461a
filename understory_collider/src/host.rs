// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle context: owns collider records and drives the registry.

use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::{Affine, Point, Rect};
use tracing::{debug, warn};
use understory_indexed_collection::{IndexedCollection, SlotState};

use crate::{CanvasColliderRegistry, Change, Collider, ColliderId, Padding, RegistryConfig};

/// Error returned by [`ColliderHost::attach`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttachError<V> {
    /// The graphic already has a collider; a graphic carries at most one.
    OwnerTaken {
        /// The graphic that was named.
        owner: V,
        /// The collider it already carries.
        existing: ColliderId,
    },
}

impl<V: Debug> fmt::Display for AttachError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnerTaken { owner, existing } => {
                write!(f, "graphic {owner:?} already carries collider {existing:?}")
            }
        }
    }
}

impl<V: Debug> core::error::Error for AttachError<V> {}

/// Host-side geometry for the graphics that own colliders.
pub trait OwnerGeometry<V> {
    /// The owner's layout rect in its local coordinate space, or `None` if the owner has
    /// no layout (for example, not laid out yet).
    fn layout_rect(&self, owner: V) -> Option<Rect>;

    /// Transform from the owner's local space to world space.
    fn world_transform(&self, owner: V) -> Affine {
        let _ = owner;
        Affine::IDENTITY
    }
}

/// A padded hit region mapped into an overlay's drawing space.
///
/// Returned by [`ColliderHost::overlay_quads`] for debug visualization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayQuad {
    /// The collider this quad belongs to.
    pub id: ColliderId,
    /// Corners `(x0, y0)`, `(x1, y0)`, `(x1, y1)`, `(x0, y1)` of the padded rect, transformed.
    pub corners: [Point; 4],
}

#[derive(Clone, Debug)]
struct Entry<G, V> {
    generation: u32,
    collider: Option<Collider<G, V>>,
}

/// Owns colliders and keeps the per-canvas registry in sync with their lifecycle.
///
/// The host's component system maps its own notifications onto these calls:
///
/// - [`attach`](Self::attach) when a graphic gains a collider, with the canvas resolved
///   by walking the host hierarchy.
/// - [`enable`](Self::enable) when the collider becomes active.
/// - [`disable`](Self::disable) when it is temporarily inactive.
/// - [`destroy`](Self::destroy) when it is torn down.
///
/// A `ColliderHost` is an ordinary value: construct one per session (or per test) and
/// drop it at the end.
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use understory_collider::{ColliderHost, OwnerGeometry, Padding};
///
/// struct Layout;
/// impl OwnerGeometry<u32> for Layout {
///     fn layout_rect(&self, _owner: u32) -> Option<Rect> {
///         Some(Rect::new(0.0, 0.0, 100.0, 40.0))
///     }
/// }
///
/// let mut host = ColliderHost::<&str, u32>::new();
/// let button = host.attach(7, Some("hud")).unwrap();
/// host.set_padding(button, Padding::uniform(-10.0));
/// host.enable(button);
///
/// // The padding grows the hit region past the graphic's own rect.
/// assert_eq!(host.hit_test("hud", Point::new(-5.0, 45.0), &Layout), Some(button));
/// assert_eq!(host.hit_test("hud", Point::new(-15.0, 45.0), &Layout), None);
/// ```
#[derive(Clone, Debug)]
pub struct ColliderHost<G, V> {
    entries: Vec<Entry<G, V>>,
    free: Vec<u32>,
    by_owner: HashMap<V, ColliderId>,
    registry: CanvasColliderRegistry<G, V>,
}

impl<G, V> Default for ColliderHost<G, V>
where
    G: Copy + Eq + Hash + Debug,
    V: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G, V> ColliderHost<G, V>
where
    G: Copy + Eq + Hash + Debug,
    V: Copy + Eq + Hash + Debug,
{
    /// Creates an empty host with the default registry configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty host whose registry uses `config`.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            by_owner: HashMap::new(),
            registry: CanvasColliderRegistry::with_config(config),
        }
    }

    /// Attaches a new collider to `owner`, remembering `group` for later registration.
    ///
    /// `group` is whatever canvas the host resolved for the owner; `None` means no canvas
    /// was found, which makes [`enable`](Self::enable) a warning and a no-op.
    pub fn attach(&mut self, owner: V, group: Option<G>) -> Result<ColliderId, AttachError<V>> {
        if let Some(&existing) = self.by_owner.get(&owner) {
            return Err(AttachError::OwnerTaken { owner, existing });
        }
        let collider = Collider::new(owner, group);
        let id = if let Some(idx) = self.free.pop() {
            let entry = &mut self.entries[idx as usize];
            // Generation 0 is never issued.
            entry.generation = entry.generation.wrapping_add(1).max(1);
            entry.collider = Some(collider);
            ColliderId::new(idx, entry.generation)
        } else {
            let idx = u32::try_from(self.entries.len()).expect("too many colliders (u32)");
            self.entries.push(Entry {
                generation: 1,
                collider: Some(collider),
            });
            ColliderId::new(idx, 1)
        };
        self.by_owner.insert(owner, id);
        debug!(?id, ?owner, ?group, "attached collider");
        Ok(id)
    }

    /// Returns `true` if `id` refers to a live collider.
    #[must_use]
    pub fn is_alive(&self, id: ColliderId) -> bool {
        self.collider(id).is_some()
    }

    /// The collider behind `id`, if it is still alive.
    #[must_use]
    pub fn collider(&self, id: ColliderId) -> Option<&Collider<G, V>> {
        let entry = self.entries.get(id.idx())?;
        if entry.generation != id.generation() {
            return None;
        }
        entry.collider.as_ref()
    }

    fn collider_mut(&mut self, id: ColliderId) -> Option<&mut Collider<G, V>> {
        let entry = self.entries.get_mut(id.idx())?;
        if entry.generation != id.generation() {
            return None;
        }
        entry.collider.as_mut()
    }

    /// The collider attached to `owner`, if any.
    #[must_use]
    pub fn collider_for_owner(&self, owner: V) -> Option<ColliderId> {
        self.by_owner.get(&owner).copied()
    }

    /// Current padding of `id`.
    #[must_use]
    pub fn padding(&self, id: ColliderId) -> Option<Padding> {
        self.collider(id).map(Collider::padding)
    }

    /// Replaces the padding of `id`. Returns `false` for stale ids.
    pub fn set_padding(&mut self, id: ColliderId, padding: Padding) -> bool {
        match self.collider_mut(id) {
            Some(collider) => {
                collider.padding = padding;
                true
            }
            None => false,
        }
    }

    /// Registers `id` with its canvas.
    ///
    /// A collider without both a canvas and an owning graphic is never registered; the
    /// call logs a warning and returns [`Change::Ignored`].
    pub fn enable(&mut self, id: ColliderId) -> Change<G> {
        let Some(collider) = self.collider(id) else {
            return Change::Ignored;
        };
        let (Some(group), Some(_)) = (collider.group, collider.owner) else {
            warn!(
                ?id,
                "collider requires both a canvas and an owning graphic; not registering"
            );
            return Change::Ignored;
        };
        self.registry.register_collider(group, id)
    }

    /// Disables `id` in its canvas without forgetting it.
    pub fn disable(&mut self, id: ColliderId) -> Change<G> {
        match self.collider(id).and_then(|c| c.group) {
            Some(group) => self.registry.disable_collider(group, id),
            None => Change::Ignored,
        }
    }

    /// Unregisters `id` and frees its slot, returning the collider record.
    pub fn destroy(&mut self, id: ColliderId) -> Option<Collider<G, V>> {
        self.collider(id)?;
        self.unregister(id);
        let collider = self.entries[id.idx()].collider.take()?;
        if let Some(owner) = collider.owner {
            self.by_owner.remove(&owner);
        }
        self.free.push(id.0);
        debug!(?id, "destroyed collider");
        Some(collider)
    }

    /// Detaches `owner` from its collider, e.g. because the graphic was destroyed first.
    ///
    /// The collider is unregistered and stays invalid until destroyed.
    pub fn release_owner(&mut self, owner: V) -> Option<ColliderId> {
        let id = self.by_owner.remove(&owner)?;
        self.unregister(id);
        if let Some(collider) = self.collider_mut(id) {
            collider.owner = None;
        }
        Some(id)
    }

    /// Moves `id` to a different canvas, preserving whether it was active or disabled.
    pub fn reparent(&mut self, id: ColliderId, group: Option<G>) -> Change<G> {
        let Some(collider) = self.collider(id) else {
            return Change::Ignored;
        };
        if collider.group == group {
            return Change::Unchanged;
        }
        let state = self
            .registry
            .colliders()
            .group_of(id)
            .and_then(|old| self.registry.colliders_for(old).state(id));
        let removed = self.unregister(id);
        if let Some(collider) = self.collider_mut(id) {
            collider.group = group;
        }
        match state {
            Some(SlotState::Active) => self.enable(id),
            Some(SlotState::Disabled) => {
                self.enable(id);
                self.disable(id)
            }
            None => removed,
        }
    }

    /// Active colliders of `group`, in registration order.
    #[must_use]
    pub fn query(&self, group: G) -> &IndexedCollection<ColliderId> {
        self.registry.colliders_for(group)
    }

    /// The topmost active collider in `group` whose padded region contains `point`.
    ///
    /// `point` is in world space; later registrations are considered on top.
    pub fn hit_test<O>(&self, group: G, point: Point, geometry: &O) -> Option<ColliderId>
    where
        O: OwnerGeometry<V> + ?Sized,
    {
        self.hits(group, point, geometry).next()
    }

    /// Every active collider in `group` containing `point`, topmost first.
    pub fn hit_test_all<O>(&self, group: G, point: Point, geometry: &O) -> Vec<ColliderId>
    where
        O: OwnerGeometry<V> + ?Sized,
    {
        self.hits(group, point, geometry).collect()
    }

    /// Padded regions of the active colliders in `group`, mapped into overlay space.
    ///
    /// `overlay_from_world` maps world space into the overlay's drawing space. Colliders
    /// whose owner has no layout are skipped.
    pub fn overlay_quads<O>(
        &self,
        group: G,
        geometry: &O,
        overlay_from_world: Affine,
    ) -> Vec<OverlayQuad>
    where
        O: OwnerGeometry<V> + ?Sized,
    {
        self.query(group)
            .iter()
            .filter_map(|id| {
                let collider = self.collider(id)?;
                let owner = collider.owner?;
                let r = collider.hit_rect(geometry.layout_rect(owner)?);
                let xf = overlay_from_world * geometry.world_transform(owner);
                Some(OverlayQuad {
                    id,
                    corners: [
                        xf * Point::new(r.x0, r.y0),
                        xf * Point::new(r.x1, r.y0),
                        xf * Point::new(r.x1, r.y1),
                        xf * Point::new(r.x0, r.y1),
                    ],
                })
            })
            .collect()
    }

    /// The underlying registry, including the graphic table.
    #[must_use]
    pub fn registry(&self) -> &CanvasColliderRegistry<G, V> {
        &self.registry
    }

    /// Registers a plain graphic under `canvas`.
    pub fn register_graphic(&mut self, canvas: G, graphic: V) -> Change<G> {
        self.registry.register_graphic(canvas, graphic)
    }

    /// Removes a plain graphic from `canvas`.
    pub fn unregister_graphic(&mut self, canvas: G, graphic: V) -> Change<G> {
        self.registry.unregister_graphic(canvas, graphic)
    }

    /// Disables a plain graphic in `canvas`.
    pub fn disable_graphic(&mut self, canvas: G, graphic: V) -> Change<G> {
        self.registry.disable_graphic(canvas, graphic)
    }

    /// Active graphics of `canvas`, in registration order.
    #[must_use]
    pub fn graphics_for(&self, canvas: G) -> &IndexedCollection<V> {
        self.registry.graphics_for(canvas)
    }

    fn unregister(&mut self, id: ColliderId) -> Change<G> {
        match self.registry.colliders().group_of(id) {
            Some(group) => self.registry.unregister_collider(group, id),
            None => Change::Unchanged,
        }
    }

    fn hits<'a, O>(
        &'a self,
        group: G,
        point: Point,
        geometry: &'a O,
    ) -> impl Iterator<Item = ColliderId> + 'a
    where
        O: OwnerGeometry<V> + ?Sized,
    {
        self.query(group).iter().rev().filter(move |&id| {
            let Some(collider) = self.collider(id) else {
                return false;
            };
            let Some(owner) = collider.owner else {
                return false;
            };
            let Some(rect) = geometry.layout_rect(owner) else {
                return false;
            };
            let local_from_world = geometry.world_transform(owner).inverse();
            local_from_world.is_finite() && collider.contains_local(rect, local_from_world * point)
        })
    }
}
