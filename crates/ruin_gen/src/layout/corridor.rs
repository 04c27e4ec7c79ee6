//! Corridors between sibling subtrees.
//!
//! A corridor is always drawn between two concrete leaves, one from each side. The pair
//! is found by scanning the leaves of both subtrees from a random starting point; the
//! first pair whose facing walls overlap by at least the corridor width, with no other
//! room in between, wins.
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Orientation, Rect};
use crate::layout::split::{AreaId, SplitTree};
use crate::random::{index, range_i32};

pub type CorridorId = usize;

/// An accepted corridor.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corridor {
    pub id: CorridorId,
    pub rect: Rect,
    pub orientation: Orientation,
    /// The two leaves it joins, first side first.
    pub rooms: [AreaId; 2],
}

impl Corridor {
    /// Extent perpendicular to travel.
    pub fn width(&self) -> i32 {
        match self.orientation {
            Orientation::Horizontal => self.rect.height,
            Orientation::Vertical => self.rect.width,
        }
    }

    /// Extent along travel, i.e. the gap between the two rooms.
    pub fn length(&self) -> i32 {
        match self.orientation {
            Orientation::Horizontal => self.rect.width,
            Orientation::Vertical => self.rect.height,
        }
    }
}

/// Result of one corridor attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Inserted; `superseded` lists the narrower corridors it replaced.
    Placed {
        corridor: Corridor,
        superseded: Vec<Corridor>,
    },
    /// No leaf pair had facing walls overlapping by the requested width.
    NoFacingWalls,
    /// An overlapping same-orientation corridor at least as wide already exists.
    Narrower { existing: CorridorId },
}

/// Travel direction between two areas: horizontal when they are apart along x,
/// vertical when apart along y.
pub fn orientation_between(a: AreaId, ra: &Rect, b: AreaId, rb: &Rect) -> Result<Orientation> {
    if ra.disjoint_x(rb) {
        Ok(Orientation::Horizontal)
    } else if ra.disjoint_y(rb) {
        Ok(Orientation::Vertical)
    } else {
        Err(Error::MalformedAdjacency { a, b })
    }
}

/// Corridor rect between two leaves, if their facing walls overlap by `width`.
///
/// Only the offset along the facing walls is drawn from `rng`, and only on success.
pub fn facing_corridor_rect(
    orientation: Orientation,
    a: &Rect,
    b: &Rect,
    width: i32,
    rng: &mut dyn RngCore,
) -> Option<Rect> {
    let (near, far) = match orientation {
        Orientation::Horizontal if a.x <= b.x => (a, b),
        Orientation::Vertical if a.y <= b.y => (a, b),
        _ => (b, a),
    };
    match orientation {
        Orientation::Horizontal => {
            let gap_start = near.x + near.width;
            let gap = far.x - gap_start;
            let lo = near.y.max(far.y);
            let hi = (near.y + near.height).min(far.y + far.height);
            if gap <= 0 || hi - lo < width {
                return None;
            }
            let y = range_i32(rng, lo, hi - width);
            Some(Rect::new(gap_start, y, gap, width))
        }
        Orientation::Vertical => {
            let gap_start = near.y + near.height;
            let gap = far.y - gap_start;
            let lo = near.x.max(far.x);
            let hi = (near.x + near.width).min(far.x + far.width);
            if gap <= 0 || hi - lo < width {
                return None;
            }
            let x = range_i32(rng, lo, hi - width);
            Some(Rect::new(x, gap_start, width, gap))
        }
    }
}

/// Tries to join the subtrees `a` and `b` with a corridor of `width`.
///
/// On success the corridor is pushed onto `corridors` after arbitration against the
/// corridors already there.
pub(crate) fn connect(
    tree: &SplitTree,
    a: AreaId,
    b: AreaId,
    width: i32,
    id: CorridorId,
    rng: &mut dyn RngCore,
    corridors: &mut Vec<Corridor>,
) -> Result<ConnectOutcome> {
    let orientation = orientation_between(a, &tree.get(a).rect, b, &tree.get(b).rect)?;

    let leaves_a = tree.leaves_of(a);
    let leaves_b = tree.leaves_of(b);
    let all_leaves = tree.leaves();
    let start_a = index(rng, leaves_a.len());
    let start_b = index(rng, leaves_b.len());

    for i in 0..leaves_a.len() {
        let la = leaves_a[(start_a + i) % leaves_a.len()];
        for j in 0..leaves_b.len() {
            let lb = leaves_b[(start_b + j) % leaves_b.len()];
            let rect = facing_corridor_rect(
                orientation,
                &tree.get(la).rect,
                &tree.get(lb).rect,
                width,
                rng,
            );
            let Some(rect) = rect else { continue };
            // Walls with another room between them do not face each other.
            if blocked_by_other_leaf(tree, &all_leaves, &rect, [la, lb]) {
                continue;
            }
            let corridor = Corridor {
                id,
                rect,
                orientation,
                rooms: [la, lb],
            };
            return Ok(insert_arbitrated(corridors, corridor));
        }
    }
    Ok(ConnectOutcome::NoFacingWalls)
}

fn blocked_by_other_leaf(
    tree: &SplitTree,
    leaves: &[AreaId],
    rect: &Rect,
    pair: [AreaId; 2],
) -> bool {
    leaves
        .iter()
        .any(|&leaf| !pair.contains(&leaf) && tree.get(leaf).rect.intersects(rect))
}

/// Inserts `corridor` unless an overlapping same-orientation corridor is at least as
/// wide; narrower overlapping ones are removed.
pub fn insert_arbitrated(corridors: &mut Vec<Corridor>, corridor: Corridor) -> ConnectOutcome {
    let overlapping = |c: &Corridor| {
        c.orientation == corridor.orientation && c.rect.intersects(&corridor.rect)
    };
    if let Some(existing) = corridors
        .iter()
        .find(|c| overlapping(c) && c.width() >= corridor.width())
    {
        return ConnectOutcome::Narrower {
            existing: existing.id,
        };
    }

    let mut superseded = Vec::new();
    corridors.retain(|c| {
        if overlapping(c) {
            superseded.push(*c);
            false
        } else {
            true
        }
    });
    corridors.push(corridor);
    ConnectOutcome::Placed {
        corridor,
        superseded,
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::random::tests::FixedRng;

    fn corridor(id: CorridorId, rect: Rect, orientation: Orientation) -> Corridor {
        Corridor {
            id,
            rect,
            orientation,
            rooms: [0, 0],
        }
    }

    #[test]
    fn orientation_follows_disjoint_axis() {
        let left = Rect::new(0, 0, 10, 10);
        let right = Rect::new(10, 0, 10, 10);
        let above = Rect::new(0, 10, 10, 10);
        assert_eq!(
            orientation_between(0, &left, 1, &right).unwrap(),
            Orientation::Horizontal
        );
        assert_eq!(
            orientation_between(0, &left, 1, &above).unwrap(),
            Orientation::Vertical
        );
        let overlapping = Rect::new(5, 5, 10, 10);
        assert!(matches!(
            orientation_between(2, &left, 3, &overlapping),
            Err(Error::MalformedAdjacency { a: 2, b: 3 })
        ));
    }

    #[test]
    fn corridor_spans_gap_between_facing_walls() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(150, 20, 100, 100);
        let mut rng = FixedRng { value: 0 };
        let rect = facing_corridor_rect(Orientation::Horizontal, &b, &a, 30, &mut rng).unwrap();
        assert_eq!(rect, Rect::new(100, 20, 50, 30));
    }

    #[test]
    fn corridor_offset_stays_within_overlap() {
        let a = Rect::new(0, 0, 200, 100);
        let b = Rect::new(50, 160, 200, 100);
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let rect = facing_corridor_rect(Orientation::Vertical, &a, &b, 40, &mut rng).unwrap();
            assert_eq!(rect.y, 100);
            assert_eq!(rect.height, 60);
            assert!(rect.x >= 50 && rect.x + rect.width <= 200);
        }
    }

    #[test]
    fn too_little_overlap_fails_instead_of_clamping() {
        let a = Rect::new(0, 0, 100, 500);
        let b = Rect::new(200, 300, 100, 500);
        let mut rng = FixedRng { value: 0 };
        assert!(facing_corridor_rect(Orientation::Horizontal, &a, &b, 300, &mut rng).is_none());
        assert!(facing_corridor_rect(Orientation::Horizontal, &a, &b, 200, &mut rng).is_some());
    }

    #[test]
    fn touching_rooms_have_no_gap() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(100, 0, 100, 100);
        let mut rng = FixedRng { value: 0 };
        assert!(facing_corridor_rect(Orientation::Horizontal, &a, &b, 10, &mut rng).is_none());
    }

    #[test]
    fn wider_corridor_supersedes_narrower() {
        let mut corridors = vec![corridor(0, Rect::new(0, 0, 100, 20), Orientation::Horizontal)];
        let wide = corridor(1, Rect::new(50, 0, 100, 40), Orientation::Horizontal);
        match insert_arbitrated(&mut corridors, wide) {
            ConnectOutcome::Placed { superseded, .. } => assert_eq!(superseded[0].id, 0),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(corridors, vec![wide]);
    }

    #[test]
    fn equal_or_narrower_corridor_is_dropped() {
        let existing = corridor(0, Rect::new(0, 0, 100, 40), Orientation::Horizontal);
        let mut corridors = vec![existing];
        let same = corridor(1, Rect::new(50, 10, 100, 40), Orientation::Horizontal);
        assert_eq!(
            insert_arbitrated(&mut corridors, same),
            ConnectOutcome::Narrower { existing: 0 }
        );
        assert_eq!(corridors, vec![existing]);
    }

    #[test]
    fn crossing_corridors_are_both_kept() {
        let mut corridors = vec![corridor(0, Rect::new(0, 40, 200, 20), Orientation::Horizontal)];
        let crossing = corridor(1, Rect::new(90, 0, 20, 100), Orientation::Vertical);
        assert!(matches!(
            insert_arbitrated(&mut corridors, crossing),
            ConnectOutcome::Placed { .. }
        ));
        assert_eq!(corridors.len(), 2);
    }

    #[test]
    fn connect_resolves_to_leaf_pair() {
        let mut tree = SplitTree::new(Rect::new(0, 0, 1000, 1000));
        let settings = crate::params::SplitSettings {
            min_division_ratio: 0.5,
            vertical_split_probability: 0.0,
            min_width: 0,
            min_height: 0,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let [left, right] = tree.split(SplitTree::ROOT, &settings, &mut rng).unwrap();
        tree.scale_leaves(0.8, 0.8, &mut rng);
        let mut corridors = Vec::new();
        let outcome = connect(&tree, left, right, 100, 0, &mut rng, &mut corridors).unwrap();
        let ConnectOutcome::Placed { corridor, .. } = outcome else {
            panic!("expected a corridor, got {outcome:?}");
        };
        assert_eq!(corridor.orientation, Orientation::Horizontal);
        assert_eq!(corridor.rooms, [left, right]);
        assert_eq!(corridor.width(), 100);
        assert_eq!(corridor.length(), 100);
        assert_eq!(corridors.len(), 1);
    }

    #[test]
    fn corridor_never_passes_through_a_third_room() {
        let settings = crate::params::SplitSettings {
            min_division_ratio: 0.5,
            vertical_split_probability: 0.0,
            min_width: 0,
            min_height: 0,
        };
        for seed in 0..32 {
            let mut tree = SplitTree::new(Rect::new(0, 0, 1000, 1000));
            let mut rng = StdRng::seed_from_u64(seed);
            let [left, right] = tree.split(SplitTree::ROOT, &settings, &mut rng).unwrap();
            // The right half is cut again, so its far leaf sits behind the near one.
            let [near, far] = tree.split(right, &settings, &mut rng).unwrap();
            tree.scale_leaves(0.8, 0.8, &mut rng);
            assert!(tree.get(near).rect.x < tree.get(far).rect.x);

            let mut corridors = Vec::new();
            let outcome = connect(&tree, left, right, 100, 0, &mut rng, &mut corridors).unwrap();
            let ConnectOutcome::Placed { corridor, .. } = outcome else {
                panic!("seed {seed}: expected a corridor, got {outcome:?}");
            };
            assert_eq!(corridor.rooms, [left, near], "seed {seed}");
            assert!(!corridor.rect.intersects(&tree.get(far).rect));
        }
    }
}
