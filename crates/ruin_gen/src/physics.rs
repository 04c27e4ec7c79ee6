//! Physics world handle used to register static collision blockers for wall fillers.
use mint::Vector2;

use crate::geometry::Rect;

/// Receives static, non-participating collision blockers.
///
/// Registration is fire-and-forget; the generator never queries the world back.
pub trait PhysicsWorld {
    fn register_blocker(&mut self, rect: Rect, center: Vector2<f32>);
}

/// Discards every blocker.
impl PhysicsWorld for () {
    #[inline]
    fn register_blocker(&mut self, _rect: Rect, _center: Vector2<f32>) {}
}

/// A registered blocker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blocker {
    pub rect: Rect,
    pub center: Vector2<f32>,
}

/// [`PhysicsWorld`] that keeps every blocker in a `Vec`.
#[derive(Clone, Debug, Default)]
pub struct BlockerList {
    blockers: Vec<Blocker>,
}

impl BlockerList {
    pub fn new() -> Self {
        Self {
            blockers: Vec::new(),
        }
    }

    pub fn as_slice(&self) -> &[Blocker] {
        &self.blockers
    }

    pub fn into_inner(self) -> Vec<Blocker> {
        self.blockers
    }

    pub fn len(&self) -> usize {
        self.blockers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blockers.is_empty()
    }
}

impl PhysicsWorld for BlockerList {
    fn register_blocker(&mut self, rect: Rect, center: Vector2<f32>) {
        self.blockers.push(Blocker { rect, center });
    }
}
