//! Compaction algorithms: assign positions along the canonical `x` axis given the constraints.

use crate::direction::Direction;
use crate::error::Result;
use crate::graph::{ConstraintGraph, GroupId, Node};
use crate::policy::{LockPolicy, SpacingPolicy};

pub mod longest_path;

pub use longest_path::LongestPath;

/// Everything a calculator or compaction algorithm may consult besides the graph itself.
pub struct CompactionContext<'a> {
    direction: Direction,
    spacing: &'a dyn SpacingPolicy,
    lock: Option<&'a dyn LockPolicy>,
}

impl<'a> CompactionContext<'a> {
    pub fn new(
        direction: Direction,
        spacing: &'a dyn SpacingPolicy,
        lock: Option<&'a dyn LockPolicy>,
    ) -> Self {
        Self {
            direction,
            spacing,
            lock,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Required separation along the compaction axis.
    pub fn spacing_along(&self, a: &Node, b: &Node) -> f64 {
        if self.direction.is_horizontal() {
            self.spacing.horizontal_spacing(a, b)
        } else {
            self.spacing.vertical_spacing(a, b)
        }
    }

    /// Required separation perpendicular to the compaction axis.
    pub fn spacing_across(&self, a: &Node, b: &Node) -> f64 {
        if self.direction.is_horizontal() {
            self.spacing.vertical_spacing(a, b)
        } else {
            self.spacing.horizontal_spacing(a, b)
        }
    }

    pub fn is_locked(&self, node: &Node) -> bool {
        self.lock
            .is_some_and(|lock| lock.is_locked(node, self.direction))
    }

    /// A group is immobile as soon as one of its members is locked.
    pub fn is_group_locked(&self, graph: &ConstraintGraph, group: GroupId) -> bool {
        if self.lock.is_none() {
            return false;
        }
        graph
            .group(group)
            .is_some_and(|g| g.members().any(|n| self.is_locked(&graph[n])))
    }
}

/// Assigns every node's working position and writes it into the hitbox.
///
/// Implementations must honour, for every constraint `a -> b`,
/// `pos(b) >= pos(a) + width(a) + spacing(a, b)`, keep locked groups from moving toward the
/// compaction direction, and move group members rigidly.
pub trait CompactionAlgorithm {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn compact(&self, graph: &mut ConstraintGraph, ctx: &CompactionContext<'_>) -> Result<()>;
}
