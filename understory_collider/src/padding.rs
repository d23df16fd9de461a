// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-edge padding between a graphic's layout rect and its hit region.

use kurbo::{Insets, Rect};

/// Four independent edge insets applied to an owner's layout rect.
///
/// Edges are named for a y-up layout space: `bottom` moves the `y0` edge and `top` moves
/// the `y1` edge. Positive values shrink the region inward, negative values grow it
/// outward. Values are never clamped; a padding larger than the rect produces a
/// degenerate (inverted) region, which is valid and simply contains no points.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Padding {
    /// Inset of the `x0` edge.
    pub left: f64,
    /// Inset of the `y0` edge.
    pub bottom: f64,
    /// Inset of the `x1` edge.
    pub right: f64,
    /// Inset of the `y1` edge.
    pub top: f64,
}

impl Padding {
    /// No padding: the hit region equals the layout rect.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Creates padding from the four edges, in `(left, bottom, right, top)` order.
    #[must_use]
    pub const fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// The same inset on every edge.
    #[must_use]
    pub const fn uniform(inset: f64) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    /// Creates padding from `[left, bottom, right, top]`.
    #[must_use]
    pub const fn from_array(edges: [f64; 4]) -> Self {
        Self::new(edges[0], edges[1], edges[2], edges[3])
    }

    /// Returns `[left, bottom, right, top]`.
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.left, self.bottom, self.right, self.top]
    }

    /// Returns `true` if every edge is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Derives the hit region from an owner's layout rect.
    ///
    /// The result spans `(x0 + left, y0 + bottom)` to `(x1 - right, y1 - top)`. It is not
    /// normalized.
    #[must_use]
    pub fn apply(self, rect: Rect) -> Rect {
        Rect::new(
            rect.x0 + self.left,
            rect.y0 + self.bottom,
            rect.x1 - self.right,
            rect.y1 - self.top,
        )
    }

    /// Edge-for-edge conversion to [`Insets`] (`x0 = left`, `y0 = bottom`, ...).
    ///
    /// Kurbo's `Rect - Insets` normalizes the rect first; prefer [`apply`](Self::apply)
    /// when degenerate regions must be preserved.
    #[must_use]
    pub fn to_insets(self) -> Insets {
        Insets::new(self.left, self.bottom, self.right, self.top)
    }
}

impl From<[f64; 4]> for Padding {
    fn from(edges: [f64; 4]) -> Self {
        Self::from_array(edges)
    }
}

impl From<(f64, f64, f64, f64)> for Padding {
    fn from((left, bottom, right, top): (f64, f64, f64, f64)) -> Self {
        Self::new(left, bottom, right, top)
    }
}

impl From<Padding> for (f64, f64, f64, f64) {
    fn from(p: Padding) -> Self {
        (p.left, p.bottom, p.right, p.top)
    }
}

impl From<Padding> for Insets {
    fn from(p: Padding) -> Self {
        p.to_insets()
    }
}
