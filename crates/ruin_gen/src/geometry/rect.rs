//! Integer axis-aligned rectangles.
use glam::{IVec2, Vec2};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with an integer min corner and size.
///
/// The y axis grows upward: [`Rect::max`]`.y` is the top edge.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from two opposite corners, in any order.
    pub fn from_corners(a: IVec2, b: IVec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Builds a rectangle of the given size centered on `center`.
    pub fn from_center(center: IVec2, size: IVec2) -> Self {
        Self::new(
            center.x - size.x / 2,
            center.y - size.y / 2,
            size.x,
            size.y,
        )
    }

    #[inline]
    pub fn min(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> IVec2 {
        IVec2::new(self.x + self.width, self.y + self.height)
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Exact center in world units.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 * 0.5,
            self.y as f32 + self.height as f32 * 0.5,
        )
    }

    /// Center rounded toward the min corner.
    #[inline]
    pub fn center_i(&self) -> IVec2 {
        IVec2::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// True when the interiors overlap. Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Overlapping region, if the interiors overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        Some(Rect::from_corners(min, max))
    }

    pub fn contains_point(&self, p: IVec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_corners(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Grows the rectangle by `amount` on every side.
    pub fn inflate(&self, amount: i32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2,
            self.height + amount * 2,
        )
    }

    /// True when the two rectangles do not overlap along x (touching edges count as disjoint).
    pub fn disjoint_x(&self, other: &Rect) -> bool {
        self.x + self.width <= other.x || other.x + other.width <= self.x
    }

    /// True when the two rectangles do not overlap along y (touching edges count as disjoint).
    pub fn disjoint_y(&self, other: &Rect) -> bool {
        self.y + self.height <= other.y || other.y + other.height <= self.y
    }

    /// Mirrors the rectangle horizontally across the vertical center line of `bounds`.
    pub fn mirrored_within(&self, bounds: &Rect) -> Rect {
        let span = bounds.x * 2 + bounds.width;
        Rect::new(span - self.x - self.width, self.y, self.width, self.height)
    }

    /// Sum of the absolute center offsets, in integer units.
    pub fn manhattan_distance(&self, other: &Rect) -> i32 {
        let d = self.center_i() - other.center_i();
        d.x.abs() + d.y.abs()
    }

    /// Squared euclidean distance between the centers.
    pub fn distance_squared(&self, other: &Rect) -> f32 {
        self.center().distance_squared(other.center())
    }
}
