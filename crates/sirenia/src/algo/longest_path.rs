//! Longest-path compaction over the group-level constraint DAG.
//!
//! Groups are processed in topological order: a group is placed once every external constraint
//! pointing into it has been resolved. Unconstrained groups are anchored at the smallest `x` of
//! the whole drawing, so compaction never shifts the near edge of the layout.

use std::collections::VecDeque;

use crate::algo::{CompactionAlgorithm, CompactionContext};
use crate::error::{Error, Result};
use crate::graph::{ConstraintGraph, GroupId, NodeId};

#[derive(Debug, Clone, Copy, Default)]
pub struct LongestPath;

impl CompactionAlgorithm for LongestPath {
    fn name(&self) -> &'static str {
        "longest-path"
    }

    fn compact(&self, graph: &mut ConstraintGraph, ctx: &CompactionContext<'_>) -> Result<()> {
        let min_start = graph
            .nodes()
            .iter()
            .map(|n| n.hitbox.x)
            .fold(f64::INFINITY, f64::min);
        if !min_start.is_finite() {
            return Ok(());
        }

        let mut sinks: VecDeque<GroupId> = VecDeque::new();
        for group in graph.groups_mut() {
            group.start_pos = min_start;
            if group.out_degree == 0 {
                sinks.push_back(group.id());
            }
        }

        let mut resolved = 0usize;
        let mut max_movement: f64 = 0.0;
        while let Some(gid) = sinks.pop_front() {
            resolved += 1;

            let Some(reference) = graph[gid].reference() else {
                continue;
            };
            let members: Vec<NodeId> = graph[gid].members().collect();
            let original = graph[reference].hitbox.x - graph[reference].group_offset().x;

            let mut start = graph[gid].start_pos;
            if ctx.is_group_locked(graph, gid) {
                start = start.max(original);
            }

            for &m in &members {
                let node = &mut graph[m];
                node.start_pos = start + node.group_offset().x;
            }

            let moved = start - original;
            max_movement = max_movement.max(moved.abs());
            let group = &mut graph[gid];
            group.start_pos = start;
            group.delta += moved;
            group.delta_normalized = if ctx.direction().is_forward() {
                moved
            } else {
                -moved
            };

            for &m in &members {
                let far_edge = graph[m].start_pos + graph[m].hitbox.width;
                for k in 0..graph[m].constraints().len() {
                    let target = graph[m].constraints()[k];
                    let Some(target_group) = graph[target].group() else {
                        continue;
                    };
                    if target_group == gid {
                        continue;
                    }

                    let spacing = ctx.spacing_along(&graph[m], &graph[target]);
                    let offset = graph[target].group_offset().x;
                    let tg = &mut graph[target_group];
                    tg.start_pos = tg.start_pos.max(far_edge + spacing - offset);
                    tg.out_degree = tg.out_degree.saturating_sub(1);
                    if tg.out_degree == 0 {
                        sinks.push_back(target_group);
                    }
                }
            }
        }

        if resolved < graph.group_count() {
            let unresolved: Vec<NodeId> = graph
                .groups()
                .iter()
                .filter(|g| g.out_degree > 0)
                .flat_map(|g| g.members())
                .collect();
            return Err(Error::ConstraintCycle { unresolved });
        }

        for node in graph.nodes_mut() {
            node.apply_position();
        }
        tracing::debug!(
            direction = %ctx.direction(),
            groups = graph.group_count(),
            max_movement,
            "longest-path compaction finished"
        );
        Ok(())
    }
}
