use crate::algo::CompactionContext;
use crate::constraints::ConstraintCalculator;
use crate::error::Result;
use crate::geom::fuzzy;
use crate::graph::{ConstraintGraph, NodeId};

/// Compares every ordered pair of nodes in different groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticConstraints;

impl ConstraintCalculator for QuadraticConstraints {
    fn name(&self) -> &'static str {
        "quadratic"
    }

    fn calculate(
        &self,
        graph: &ConstraintGraph,
        ctx: &CompactionContext<'_>,
    ) -> Result<Vec<(NodeId, NodeId)>> {
        let mut out = Vec::new();
        for a in graph.nodes() {
            for b in graph.nodes() {
                if a.id() == b.id() || (a.group().is_some() && a.group() == b.group()) {
                    continue;
                }

                // Boxes only collide along x if they overlap along y, spacing included.
                let spacing = ctx.spacing_across(a, b);
                let (ra, rb) = (a.hitbox, b.hitbox);
                let ahead = fuzzy::gt(rb.x, ra.x) || (fuzzy::eq(ra.x, rb.x) && ra.width < rb.width);
                let overlaps = fuzzy::lt(rb.y, ra.bottom() + spacing)
                    && fuzzy::lt(ra.y, rb.bottom() + spacing);

                if ahead && overlaps {
                    out.push((a.id(), b.id()));
                }
            }
        }
        Ok(out)
    }
}
