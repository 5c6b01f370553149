//! The compactor: orchestrates direction changes, constraint calculation and compaction passes
//! over a [`ConstraintGraph`] it owns.

use crate::algo::{CompactionAlgorithm, CompactionContext, LongestPath};
use crate::constraints::{self, ConstraintCalculator, ConstraintStrategy};
use crate::direction::{Action, Direction, transition};
use crate::error::{Error, Result};
use crate::graph::{ConstraintGraph, GroupId, NodeId};
use crate::policy::{LockPolicy, SpacingPolicy, UniformSpacing};

#[derive(Debug, Clone, Default)]
pub struct CompactorOptions {
    pub constraints: ConstraintStrategy,
    /// Used until [`Compactor::set_spacing_policy`] installs a custom policy.
    pub spacing: UniformSpacing,
}

pub struct Compactor {
    graph: ConstraintGraph,
    direction: Option<Direction>,
    finished: bool,
    failed: bool,
    spacing: Box<dyn SpacingPolicy>,
    lock: Option<Box<dyn LockPolicy>>,
    calculator: Box<dyn ConstraintCalculator>,
    algorithm: Box<dyn CompactionAlgorithm>,
}

impl std::fmt::Debug for Compactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compactor")
            .field("direction", &self.direction)
            .field("finished", &self.finished)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl Compactor {
    pub fn new(graph: ConstraintGraph) -> Self {
        Self::with_options(graph, CompactorOptions::default())
    }

    /// Takes ownership of `graph`, computes the offsets of predefined groups, wraps every
    /// ungrouped node into a singleton group and snapshots the pre-compaction hitboxes.
    pub fn with_options(mut graph: ConstraintGraph, options: CompactorOptions) -> Self {
        graph.calculate_group_offsets();
        graph.wrap_ungrouped_nodes();
        graph.snapshot_hitboxes();

        Self {
            graph,
            direction: None,
            finished: false,
            failed: false,
            spacing: Box::new(options.spacing),
            lock: None,
            calculator: Box::new(options.constraints),
            algorithm: Box::new(LongestPath),
        }
    }

    pub fn set_spacing_policy(&mut self, spacing: impl SpacingPolicy + 'static) -> &mut Self {
        self.spacing = Box::new(spacing);
        self
    }

    pub fn set_lock_policy(&mut self, lock: impl LockPolicy + 'static) -> &mut Self {
        self.lock = Some(Box::new(lock));
        self
    }

    pub fn clear_lock_policy(&mut self) -> &mut Self {
        self.lock = None;
        self
    }

    /// Takes effect with the next constraint recalculation.
    pub fn set_constraint_calculator(
        &mut self,
        calculator: impl ConstraintCalculator + 'static,
    ) -> &mut Self {
        self.calculator = Box::new(calculator);
        self
    }

    pub fn set_compaction_algorithm(
        &mut self,
        algorithm: impl CompactionAlgorithm + 'static,
    ) -> &mut Self {
        self.algorithm = Box::new(algorithm);
        self
    }

    pub fn graph(&self) -> &ConstraintGraph {
        &self.graph
    }

    pub fn into_graph(self) -> ConstraintGraph {
        self.graph
    }

    /// `None` until the first direction change or compaction.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether a constraint calculation or compaction pass has failed. A failed compactor
    /// rejects everything but [`Compactor::finish`] with [`Error::Aborted`].
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn is_locked(&self, node: NodeId, dir: Direction) -> bool {
        match (&self.lock, self.graph.node(node)) {
            (Some(lock), Some(n)) => lock.is_locked(n, dir),
            _ => false,
        }
    }

    /// Whether any member of `group` is locked in `dir`.
    pub fn is_group_locked(&self, group: GroupId, dir: Direction) -> bool {
        self.graph
            .group(group)
            .is_some_and(|g| g.members().any(|n| self.is_locked(n, dir)))
    }

    /// Runs one compaction pass in the current direction, defaulting to left.
    pub fn compact(&mut self) -> Result<&mut Self> {
        self.ensure_usable()?;
        let dir = match self.direction {
            Some(dir) => dir,
            None => {
                self.change_direction(Direction::Left)?;
                Direction::Left
            }
        };

        self.graph.reset_for_pass();
        tracing::trace!(
            direction = %dir,
            algorithm = self.algorithm.name(),
            groups = self.graph.group_count(),
            "compaction pass"
        );

        let ctx = CompactionContext::new(dir, &*self.spacing, self.lock.as_deref());
        if let Err(err) = self.algorithm.compact(&mut self.graph, &ctx) {
            self.failed = true;
            return Err(err);
        }
        Ok(self)
    }

    /// Transforms the geometry into the canonical orientation of `dir` and recomputes or
    /// reverses the constraints accordingly.
    pub fn change_direction(&mut self, dir: Direction) -> Result<&mut Self> {
        self.ensure_usable()?;
        if !self.graph.supports(dir) {
            return Err(Error::UnsupportedDirection { direction: dir });
        }
        if self.direction == Some(dir) {
            return Ok(self);
        }

        let actions = transition(self.direction, dir);
        tracing::debug!(from = ?self.direction, to = %dir, ?actions, "changing direction");
        self.direction = Some(dir);

        for action in actions {
            match action {
                Action::Mirror => self.graph.mirror_hitboxes(),
                Action::Transpose => self.graph.transpose_hitboxes(),
                Action::ReverseConstraints => self.graph.reverse_constraints(),
                Action::RecomputeConstraints => self.recalculate_constraints(dir)?,
            }
        }
        Ok(self)
    }

    /// Recomputes the constraints for the current direction (left if none was set yet).
    pub fn force_constraints_recalculation(&mut self) -> Result<&mut Self> {
        self.ensure_usable()?;
        match self.direction {
            Some(dir) => self.recalculate_constraints(dir)?,
            None => {
                self.change_direction(Direction::Left)?;
            }
        }
        Ok(self)
    }

    /// Recomputes group references and offsets from the current geometry.
    pub fn calculate_group_offsets(&mut self) -> &mut Self {
        self.graph.calculate_group_offsets();
        self
    }

    /// Restores the original orientation and disables further compaction.
    ///
    /// Only the geometric part of the transition back to left is applied; the constraints are
    /// discarded rather than recomputed. This also works after a failure, so the geometry
    /// can be inspected in its original orientation.
    pub fn finish(&mut self) -> Result<&mut Self> {
        self.ensure_not_finished()?;
        if let Some(current) = self.direction {
            let actions = transition(Some(current), Direction::Left);
            tracing::debug!(from = %current, ?actions, "finishing compaction");
            for action in actions {
                match action {
                    Action::Mirror => self.graph.mirror_hitboxes(),
                    Action::Transpose => self.graph.transpose_hitboxes(),
                    Action::ReverseConstraints | Action::RecomputeConstraints => {}
                }
            }
        }
        self.graph.clear_constraints();
        self.direction = Some(Direction::Left);
        self.finished = true;
        Ok(self)
    }

    fn recalculate_constraints(&mut self, dir: Direction) -> Result<()> {
        let ctx = CompactionContext::new(dir, &*self.spacing, self.lock.as_deref());
        let result = constraints::calculate(&mut self.graph, &*self.calculator, &ctx);
        if let Err(err) = &result {
            tracing::debug!(direction = %dir, error = %err, "constraint calculation failed");
            self.failed = true;
        }
        result
    }

    fn ensure_usable(&self) -> Result<()> {
        self.ensure_not_finished()?;
        if self.failed {
            return Err(Error::Aborted);
        }
        Ok(())
    }

    fn ensure_not_finished(&self) -> Result<()> {
        if self.finished {
            return Err(Error::Finished);
        }
        Ok(())
    }
}
