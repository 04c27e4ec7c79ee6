//! Integer 2D geometry: rectangles and axis-aligned wall segments.
pub mod line;
pub mod rect;

pub use line::Line;
pub use rect::Rect;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of travel for a corridor, or the cut direction for a split.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Travels along x; the width is measured along y.
    Horizontal,
    /// Travels along y; the width is measured along x.
    Vertical,
}
