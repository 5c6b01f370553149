//! Constraint calculation for the current compaction axis.
//!
//! A constraint `a -> b` means `b` must end up no earlier than `a`'s far edge plus spacing.
//! Calculators only report the geometric constraints; predefined constraints, de-duplication
//! and the group-level aggregation are handled by [`calculate`] for every strategy alike.

use rustc_hash::FxHashSet;

use crate::algo::CompactionContext;
use crate::error::{Error, Result};
use crate::graph::{ConstraintGraph, NodeId};

pub mod quadratic;
pub mod sweep;

pub use quadratic::QuadraticConstraints;
pub use sweep::SweepConstraints;

pub trait ConstraintCalculator {
    fn name(&self) -> &'static str {
        "custom"
    }

    /// Reports constraints `(source, target)` for the canonical `x` axis. Pairs within one
    /// group must not be reported.
    fn calculate(
        &self,
        graph: &ConstraintGraph,
        ctx: &CompactionContext<'_>,
    ) -> Result<Vec<(NodeId, NodeId)>>;
}

/// The built-in calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstraintStrategy {
    /// Pairwise comparison of all nodes, O(n²).
    Quadratic,
    /// Sweep line over the perpendicular axis, O(n log n).
    #[default]
    Sweep,
}

impl ConstraintCalculator for ConstraintStrategy {
    fn name(&self) -> &'static str {
        match self {
            ConstraintStrategy::Quadratic => QuadraticConstraints.name(),
            ConstraintStrategy::Sweep => SweepConstraints.name(),
        }
    }

    fn calculate(
        &self,
        graph: &ConstraintGraph,
        ctx: &CompactionContext<'_>,
    ) -> Result<Vec<(NodeId, NodeId)>> {
        match self {
            ConstraintStrategy::Quadratic => QuadraticConstraints.calculate(graph, ctx),
            ConstraintStrategy::Sweep => SweepConstraints.calculate(graph, ctx),
        }
    }
}

/// Replaces all constraints of `graph` with the predefined constraints for the active
/// direction followed by the ones reported by `calculator`, then updates the groups.
///
/// On error the graph is left without any constraints.
pub fn calculate(
    graph: &mut ConstraintGraph,
    calculator: &dyn ConstraintCalculator,
    ctx: &CompactionContext<'_>,
) -> Result<()> {
    let pairs = match collect_pairs(graph, calculator, ctx) {
        Ok(pairs) => pairs,
        Err(err) => {
            graph.clear_constraints();
            return Err(err);
        }
    };

    let mut seen: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();
    let mut lists: Vec<Vec<NodeId>> = vec![Vec::new(); graph.node_count()];
    for (source, target) in pairs {
        if source != target && seen.insert((source, target)) {
            lists[source.index()].push(target);
        }
    }

    graph.clear_constraints();
    let edges = seen.len();
    for (idx, list) in lists.into_iter().enumerate() {
        let id = graph.nodes()[idx].id();
        graph.set_constraints(id, list);
    }
    graph.calculate_group_constraints();

    tracing::debug!(
        strategy = calculator.name(),
        direction = %ctx.direction(),
        nodes = graph.node_count(),
        edges,
        "calculated constraints"
    );
    Ok(())
}

fn collect_pairs(
    graph: &ConstraintGraph,
    calculator: &dyn ConstraintCalculator,
    ctx: &CompactionContext<'_>,
) -> Result<Vec<(NodeId, NodeId)>> {
    let dir = ctx.direction();
    let mut pairs: Vec<(NodeId, NodeId)> = graph
        .predefined_constraints(dir)
        .iter()
        .map(|&(a, b)| if dir.is_forward() { (a, b) } else { (b, a) })
        .collect();
    pairs.extend(calculator.calculate(graph, ctx)?);

    // Custom calculators may hand back ids of another graph.
    let count = graph.node_count();
    if let Some(&node) = pairs
        .iter()
        .flat_map(|(source, target)| [source, target])
        .find(|n| n.index() >= count)
    {
        return Err(Error::UnknownNode { node });
    }
    Ok(pairs)
}
