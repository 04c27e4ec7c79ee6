//! Wall segments and rectangle clipping.
use glam::IVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// An axis-aligned wall segment.
///
/// Endpoints are kept ordered so that `a` is the lexicographically smaller corner
/// (x first, then y).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Line {
    pub a: IVec2,
    pub b: IVec2,
}

impl Line {
    pub fn new(p0: IVec2, p1: IVec2) -> Self {
        if (p0.x, p0.y) <= (p1.x, p1.y) {
            Self { a: p0, b: p1 }
        } else {
            Self { a: p1, b: p0 }
        }
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        (self.b.x - self.a.x).abs() > (self.b.y - self.a.y).abs()
    }

    /// Length along the dominant axis.
    pub fn length(&self) -> i32 {
        (self.b.x - self.a.x).abs().max((self.b.y - self.a.y).abs())
    }

    pub fn midpoint(&self) -> IVec2 {
        (self.a + self.b) / 2
    }

    /// The four boundary segments of `rect`: bottom, top, left, right.
    pub fn rect_outline(rect: &Rect) -> [Line; 4] {
        let min = rect.min();
        let max = rect.max();
        [
            Line::new(min, IVec2::new(max.x, min.y)),
            Line::new(IVec2::new(min.x, max.y), max),
            Line::new(min, IVec2::new(min.x, max.y)),
            Line::new(IVec2::new(max.x, min.y), max),
        ]
    }

    /// Mirrors the segment horizontally across the vertical center line of `bounds`.
    pub fn mirrored_within(&self, bounds: &Rect) -> Line {
        let span = bounds.x * 2 + bounds.width;
        Line::new(
            IVec2::new(span - self.a.x, self.a.y),
            IVec2::new(span - self.b.x, self.b.y),
        )
    }

    /// Removes the part of the segment covered by `rect`.
    ///
    /// The segment counts as covered when its fixed coordinate lies inside `rect`
    /// including the boundary, so walls lying on a corridor mouth are cut. Returns the
    /// remaining pieces: none when fully covered, the segment itself when `rect` misses
    /// it, otherwise one or two shorter pieces.
    pub fn clip(&self, rect: &Rect) -> Vec<Line> {
        let min = rect.min();
        let max = rect.max();
        let (fixed, start, end, lo, hi, fixed_lo, fixed_hi) = if self.is_horizontal() {
            (self.a.y, self.a.x, self.b.x, min.x, max.x, min.y, max.y)
        } else {
            (self.a.x, self.a.y, self.b.y, min.y, max.y, min.x, max.x)
        };

        if fixed < fixed_lo || fixed > fixed_hi {
            return vec![*self];
        }
        let cut_start = start.max(lo);
        let cut_end = end.min(hi);
        if cut_end <= cut_start {
            return vec![*self];
        }

        let make = |s: i32, e: i32| {
            if self.is_horizontal() {
                Line::new(IVec2::new(s, fixed), IVec2::new(e, fixed))
            } else {
                Line::new(IVec2::new(fixed, s), IVec2::new(fixed, e))
            }
        };

        let mut pieces = Vec::with_capacity(2);
        if cut_start > start {
            pieces.push(make(start, cut_start));
        }
        if end > cut_end {
            pieces.push(make(cut_end, end));
        }
        pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(x0: i32, x1: i32, y: i32) -> Line {
        Line::new(IVec2::new(x0, y), IVec2::new(x1, y))
    }

    fn v(x: i32, y0: i32, y1: i32) -> Line {
        Line::new(IVec2::new(x, y0), IVec2::new(x, y1))
    }

    #[test]
    fn endpoints_are_ordered() {
        let l = Line::new(IVec2::new(10, 0), IVec2::new(0, 0));
        assert_eq!(l.a, IVec2::new(0, 0));
        assert!(l.is_horizontal());
        let vertical = Line::new(IVec2::new(5, 9), IVec2::new(5, 1));
        assert_eq!(vertical.a, IVec2::new(5, 1));
        assert!(!vertical.is_horizontal());
    }

    #[test]
    fn fully_covered_segment_is_removed() {
        assert!(h(2, 8, 5).clip(&Rect::new(0, 0, 10, 10)).is_empty());
    }

    #[test]
    fn disjoint_segment_is_kept() {
        let line = h(0, 10, 20);
        assert_eq!(line.clip(&Rect::new(0, 0, 10, 10)), vec![line]);
        let beside = h(0, 10, 5);
        assert_eq!(beside.clip(&Rect::new(10, 0, 10, 10)), vec![beside]);
    }

    #[test]
    fn middle_cover_leaves_two_pieces() {
        let pieces = h(0, 100, 0).clip(&Rect::new(40, -5, 20, 10));
        assert_eq!(pieces, vec![h(0, 40, 0), h(60, 100, 0)]);
    }

    #[test]
    fn end_cover_leaves_one_piece() {
        let pieces = v(0, 0, 100).clip(&Rect::new(-5, 80, 10, 50));
        assert_eq!(pieces, vec![v(0, 0, 80)]);
    }

    #[test]
    fn boundary_counts_as_covered() {
        let pieces = v(100, 0, 100).clip(&Rect::new(100, 40, 50, 20));
        assert_eq!(pieces, vec![v(100, 0, 40), v(100, 60, 100)]);
    }

    #[test]
    fn mirroring_keeps_endpoint_order() {
        let bounds = Rect::new(0, 0, 100, 100);
        let m = h(10, 30, 5).mirrored_within(&bounds);
        assert_eq!(m, h(70, 90, 5));
        assert!(m.a.x < m.b.x);
    }

    #[test]
    fn outline_has_two_horizontal_and_two_vertical() {
        let outline = Line::rect_outline(&Rect::new(0, 0, 4, 2));
        assert_eq!(outline.iter().filter(|l| l.is_horizontal()).count(), 2);
        assert_eq!(outline[1], h(0, 4, 2));
    }
}
