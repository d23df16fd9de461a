// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Collider: padded hit-test regions for UI graphics, registered per canvas.
//!
//! A *collider* gives a graphic a hit region that is decoupled from its visual rect: the
//! owner's layout rect is inset (or outset) by four independent edge values, see
//! [`Padding`]. Colliders are gathered per *canvas* (any group key chosen by the host) so
//! that a hit-testing pass or a debug overlay can ask for "all active colliders of this
//! canvas" in one call.
//!
//! The crate is organized in three layers:
//!
//! - [`GroupRegistry`]: a table from group key to an
//!   [`IndexedCollection`](understory_indexed_collection::IndexedCollection) of items,
//!   with register, unregister and disable operations. [`CanvasColliderRegistry`] pairs a
//!   graphic table with a collider table.
//! - [`Collider`] and [`Padding`]: the per-graphic record and its geometry.
//! - [`ColliderHost`]: the lifecycle context that owns colliders, maps attach / enable /
//!   disable / destroy notifications onto the registry, and answers hit tests and overlay
//!   queries through a host-provided [`OwnerGeometry`].
//!
//! ## Register, disable, unregister
//!
//! ```rust
//! use understory_collider::{Change, GroupRegistry};
//!
//! let mut reg = GroupRegistry::<&str, u32>::new();
//! assert_eq!(reg.register("c1", 1), Change::CreatedGroup);
//! assert_eq!(reg.register("c1", 2), Change::Inserted);
//! assert_eq!(reg.register("c1", 2), Change::Unchanged);
//!
//! // Disabling hides an item but keeps the canvas bucket alive.
//! reg.disable("c1", 1);
//! assert_eq!(reg.query("c1").iter().collect::<Vec<_>>(), [2]);
//! assert_eq!(reg.register("c1", 1), Change::Reactivated);
//! assert_eq!(reg.query("c1").iter().collect::<Vec<_>>(), [1, 2]);
//!
//! // Unknown canvases answer with an empty set.
//! assert!(reg.query("elsewhere").is_empty());
//! ```
//!
//! ## Group mismatches
//!
//! Each registered item remembers the group it was registered under. A call that names
//! a different group is handled according to [`MismatchHandling`]: rejected with a
//! warning (the default) or redirected to the recorded group.
//!
//! ## Diagnostics
//!
//! The crate emits [`tracing`] events: `warn` for colliders enabled without a canvas or
//! owner and for rejected group mismatches, `debug` for bucket creation and eviction,
//! `trace` for individual transitions. No subscriber is installed.
//!
//! ## Features
//!
//! - `std` (default): forwards to Kurbo and `tracing`.
//! - `libm`: `no_std` float support for Kurbo.
//! - `serde`: `Serialize`/`Deserialize` for [`Padding`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod collider;
mod host;
mod padding;
mod registry;

pub use collider::{Collider, ColliderId};
pub use host::{AttachError, ColliderHost, OverlayQuad, OwnerGeometry};
pub use padding::Padding;
pub use registry::{
    CanvasColliderRegistry, Change, GroupRegistry, MismatchHandling, RegistryConfig,
};
