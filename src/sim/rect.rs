//! Axis-aligned rectangle geometry
//!
//! Logos, the arena, and the obstacle are all plain axis-aligned boxes; every
//! collision in the simulation reduces to box overlap plus a center-to-center
//! vector. Width and height are fixed at construction, only the origin moves.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box. `x`/`y` is the top-left corner (screen coordinates,
/// y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A `size`-square box centered at `center`.
    pub fn square_at(center: Vec2, size: f32) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.center_y())
    }

    /// Overlap test, strict on both axes: boxes that merely touch along an
    /// edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Signed center-to-center delta (`other - self`) and its Euclidean norm.
    pub fn center_delta(&self, other: &Rect) -> (Vec2, f32) {
        let delta = other.center() - self.center();
        (delta, delta.length())
    }

    /// True if `other` lies entirely within this box (edges allowed).
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }
}

/// Per-axis sign pattern comparison between two velocities.
///
/// A wall or obstacle bounce shows up as a sign change on one axis, so "same
/// direction" means both components keep their signs. Zero only matches zero:
/// axis-aligned motion must not flap between "same" and "changed" as a
/// component crosses exactly 0.
pub fn same_signs(a: Vec2, b: Vec2) -> bool {
    fn sign(v: f32) -> i8 {
        if v > 0.0 {
            1
        } else if v < 0.0 {
            -1
        } else {
            0
        }
    }
    sign(a.x) == sign(b.x) && sign(a.y) == sign(b.y)
}
