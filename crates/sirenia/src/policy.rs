//! Caller-supplied spacing and lock policies.
//!
//! "Horizontal" and "vertical" always refer to the caller's frame, independent of the
//! orientation the compactor currently works in.

use crate::direction::Direction;
use crate::graph::Node;

/// Minimum separation between two nodes, per axis.
///
/// The spacing along the compaction axis is always taken per pair. Across it,
/// [`SweepConstraints`](crate::SweepConstraints) only asks for a node's spacing to itself;
/// per-pair values there are honoured by [`QuadraticConstraints`](crate::QuadraticConstraints).
pub trait SpacingPolicy {
    fn horizontal_spacing(&self, a: &Node, b: &Node) -> f64;

    fn vertical_spacing(&self, a: &Node, b: &Node) -> f64;
}

/// The same spacing for every pair of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UniformSpacing {
    pub horizontal: f64,
    pub vertical: f64,
}

impl UniformSpacing {
    pub const fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub const fn both(spacing: f64) -> Self {
        Self::new(spacing, spacing)
    }
}

impl SpacingPolicy for UniformSpacing {
    fn horizontal_spacing(&self, _a: &Node, _b: &Node) -> f64 {
        self.horizontal
    }

    fn vertical_spacing(&self, _a: &Node, _b: &Node) -> f64 {
        self.vertical
    }
}

/// Decides whether a node must not move in a direction.
pub trait LockPolicy {
    fn is_locked(&self, node: &Node, dir: Direction) -> bool;
}

impl<F> LockPolicy for F
where
    F: Fn(&Node, Direction) -> bool,
{
    fn is_locked(&self, node: &Node, dir: Direction) -> bool {
        self(node, dir)
    }
}
