//! Sweep-line constraint calculation.
//!
//! Every node contributes an insert and a remove event at the near and far edge of its `y`
//! interval (enlarged by half of its own perpendicular spacing on both sides). The sweep keeps
//! the active nodes ordered by their `x` center; only nodes that become direct neighbours in
//! that order can constrain each other, which is enough to reproduce the transitive closure of
//! the pairwise comparison.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

use crate::algo::CompactionContext;
use crate::constraints::ConstraintCalculator;
use crate::error::{Error, Result};
use crate::geom::{EPSILON, fuzzy};
use crate::graph::{ConstraintGraph, Node, NodeId};

/// The default calculator.
///
/// The perpendicular interval of a node is widened by `spacing_across(n, n)`, its spacing to
/// itself, so a [`SpacingPolicy`](crate::SpacingPolicy) that varies per pair is not honoured
/// across the axis. Use [`QuadraticConstraints`](super::QuadraticConstraints) for that.
///
/// Fails with [`Error::CoincidentCenters`] when nodes of different groups overlap across the
/// axis and share their center along it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepConstraints;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    // At equal coordinates removals go first, so touching intervals never overlap.
    Remove,
    Insert,
    // Intervals thinner than EPSILON would otherwise be removed before they are inserted.
    RemoveDegenerate,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    at: f64,
    kind: EventKind,
    node: usize,
}

#[derive(Debug, Clone, Copy)]
struct CenterKey {
    center: f64,
    node: usize,
}

impl PartialEq for CenterKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CenterKey {}

impl PartialOrd for CenterKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CenterKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.center
            .total_cmp(&other.center)
            .then(self.node.cmp(&other.node))
    }
}

struct Sweep<'g> {
    nodes: &'g [Node],
    keys: Vec<CenterKey>,
    active: BTreeSet<CenterKey>,
    // Candidate source recorded for each node when its left neighbourhood last changed.
    cand: Vec<Option<usize>>,
    out: Vec<(NodeId, NodeId)>,
}

impl<'g> Sweep<'g> {
    fn new(nodes: &'g [Node]) -> Self {
        let keys = nodes
            .iter()
            .enumerate()
            .map(|(node, n)| CenterKey {
                center: n.hitbox.center_x(),
                node,
            })
            .collect();
        Self {
            nodes,
            keys,
            active: BTreeSet::new(),
            cand: vec![None; nodes.len()],
            out: Vec::new(),
        }
    }

    fn lower(&self, node: usize) -> Option<usize> {
        self.active
            .range(..self.keys[node])
            .next_back()
            .map(|k| k.node)
    }

    fn higher(&self, node: usize) -> Option<usize> {
        self.active
            .range((Excluded(self.keys[node]), Unbounded))
            .next()
            .map(|k| k.node)
    }

    fn different_groups(&self, a: usize, b: usize) -> bool {
        let (ga, gb) = (self.nodes[a].group(), self.nodes[b].group());
        ga.is_none() || ga != gb
    }

    fn check_coincident(&self, node: usize, other: Option<usize>) -> Result<()> {
        let Some(other) = other else {
            return Ok(());
        };
        // Members of one group never constrain each other, e.g. a node and its centred label.
        if !self.different_groups(node, other) {
            return Ok(());
        }
        let (center, other_center) = (self.keys[node].center, self.keys[other].center);
        if fuzzy::eq(center, other_center) {
            let (first, second) = if other < node {
                (other, node)
            } else {
                (node, other)
            };
            return Err(Error::CoincidentCenters {
                first: self.nodes[first].id(),
                second: self.nodes[second].id(),
                center,
            });
        }
        Ok(())
    }

    fn insert(&mut self, node: usize) -> Result<()> {
        self.active.insert(self.keys[node]);
        let left = self.lower(node);
        let right = self.higher(node);
        self.check_coincident(node, left)?;
        self.check_coincident(node, right)?;

        self.cand[node] = left;
        if let Some(right) = right {
            self.cand[right] = Some(node);
        }
        Ok(())
    }

    fn remove(&mut self, node: usize) {
        if let Some(left) = self.lower(node) {
            if self.cand[node] == Some(left) && self.different_groups(left, node) {
                self.out.push((self.nodes[left].id(), self.nodes[node].id()));
            }
        }
        if let Some(right) = self.higher(node) {
            if self.cand[right] == Some(node) && self.different_groups(node, right) {
                self.out.push((self.nodes[node].id(), self.nodes[right].id()));
            }
        }
        self.active.remove(&self.keys[node]);
    }
}

impl ConstraintCalculator for SweepConstraints {
    fn name(&self) -> &'static str {
        "sweep"
    }

    fn calculate(
        &self,
        graph: &ConstraintGraph,
        ctx: &CompactionContext<'_>,
    ) -> Result<Vec<(NodeId, NodeId)>> {
        let nodes = graph.nodes();

        let mut events: Vec<Event> = Vec::with_capacity(nodes.len() * 2);
        for (idx, n) in nodes.iter().enumerate() {
            let half = ctx.spacing_across(n, n) / 2.0;
            let low = n.hitbox.y - half;
            let high = n.hitbox.bottom() + half - EPSILON;
            events.push(Event {
                at: low,
                kind: EventKind::Insert,
                node: idx,
            });
            events.push(if high > low {
                Event {
                    at: high,
                    kind: EventKind::Remove,
                    node: idx,
                }
            } else {
                Event {
                    at: low,
                    kind: EventKind::RemoveDegenerate,
                    node: idx,
                }
            });
        }
        events.sort_by(|a, b| {
            a.at.total_cmp(&b.at)
                .then(a.kind.cmp(&b.kind))
                .then(a.node.cmp(&b.node))
        });

        let mut sweep = Sweep::new(nodes);
        for event in events {
            match event.kind {
                EventKind::Insert => sweep.insert(event.node)?,
                EventKind::Remove | EventKind::RemoveDegenerate => sweep.remove(event.node),
            }
        }
        Ok(sweep.out)
    }
}
