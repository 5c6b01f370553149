//! Constraint graph: nodes, rigid groups and the directions they may be compacted in.
//!
//! Nodes and groups live in two arenas owned by [`ConstraintGraph`] and refer to each other by
//! handle. The node ↔ group back-reference is only ever changed through
//! [`ConstraintGraph::add_to_group`] and [`ConstraintGraph::remove_from_group`], which keep both
//! sides consistent.

use std::fmt;
use std::ops::{Index, IndexMut};

use indexmap::IndexSet;

use crate::direction::{Direction, DirectionSet};
use crate::error::{Error, Result};
use crate::geom::{Rect, Vector};

mod builder;

pub use builder::{GroupBuilder, NodeBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

impl GroupId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    /// Caller-assigned tag. Not interpreted by the compactor.
    pub tag: usize,
    /// Caller bookkeeping, e.g. the id of the diagram element this node stands for.
    pub origin: Option<String>,
    /// Current geometry, rewritten by every compaction pass.
    pub hitbox: Rect,
    hitbox_pre_compaction: Rect,
    group: Option<GroupId>,
    group_offset: Vector,
    constraints: Vec<NodeId>,
    /// Working position along the compaction axis; `f64::NEG_INFINITY` while unresolved.
    pub start_pos: f64,
}

impl Node {
    pub fn builder() -> NodeBuilder {
        NodeBuilder::default()
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn hitbox_pre_compaction(&self) -> Rect {
        self.hitbox_pre_compaction
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Offset from the reference node of the group, in the current orientation.
    pub fn group_offset(&self) -> Vector {
        self.group_offset
    }

    /// Nodes that have to stay behind this node's far edge along the compaction axis.
    pub fn constraints(&self) -> &[NodeId] {
        &self.constraints
    }

    pub fn is_resolved(&self) -> bool {
        self.start_pos != f64::NEG_INFINITY
    }

    /// Writes the working position into the hitbox.
    pub fn apply_position(&mut self) {
        if self.is_resolved() {
            self.hitbox.x = self.start_pos;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Group {
    id: GroupId,
    members: IndexSet<NodeId>,
    reference: Option<NodeId>,
    /// Number of external constraints still pointing into this group during a pass.
    pub out_degree: usize,
    out_degree_real: usize,
    incoming: IndexSet<NodeId>,
    /// Working position of the reference node during a pass.
    pub start_pos: f64,
    /// Accumulated movement of the reference node over all passes, canonical orientation.
    pub delta: f64,
    /// Movement of the last pass in the caller's frame; negative means toward left or up.
    pub delta_normalized: f64,
}

impl Group {
    pub fn builder() -> GroupBuilder {
        GroupBuilder::default()
    }

    fn new(id: GroupId) -> Self {
        Self {
            id,
            members: IndexSet::new(),
            reference: None,
            out_degree: 0,
            out_degree_real: 0,
            incoming: IndexSet::new(),
            start_pos: f64::NEG_INFINITY,
            delta: 0.0,
            delta_normalized: 0.0,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn members(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    /// Member with the minimal `x`; all offsets are relative to it.
    pub fn reference(&self) -> Option<NodeId> {
        self.reference
    }

    /// Number of external constraints pointing into this group after the last calculation.
    pub fn out_degree_real(&self) -> usize {
        self.out_degree_real
    }

    /// Nodes outside the group that constrain one of its members.
    pub fn incoming_constraints(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming.iter().copied()
    }
}

#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    nodes: Vec<Node>,
    groups: Vec<Group>,
    directions: DirectionSet,
    predefined_horizontal: Vec<(NodeId, NodeId)>,
    predefined_vertical: Vec<(NodeId, NodeId)>,
}

impl ConstraintGraph {
    pub fn new(directions: DirectionSet) -> Self {
        Self {
            nodes: Vec::new(),
            groups: Vec::new(),
            directions,
            predefined_horizontal: Vec::new(),
            predefined_vertical: Vec::new(),
        }
    }

    pub fn supports(&self, dir: Direction) -> bool {
        self.directions.contains(dir)
    }

    pub fn directions(&self) -> DirectionSet {
        self.directions
    }

    pub fn add_node(&mut self, hitbox: Rect) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            tag: 0,
            origin: None,
            hitbox,
            hitbox_pre_compaction: hitbox,
            group: None,
            group_offset: Vector::ZERO,
            constraints: Vec::new(),
            start_pos: f64::NEG_INFINITY,
        });
        id
    }

    pub fn add_group(&mut self) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(Group::new(id));
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(id.0)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [Group] {
        &mut self.groups
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Group of `node`. Only `None` before the graph was handed to a compactor.
    pub fn group_of(&self, node: NodeId) -> Option<GroupId> {
        self.nodes.get(node.0).and_then(|n| n.group)
    }

    /// Adds `node` to `group`. The first member becomes the provisional reference.
    ///
    /// Adding a node to the group it already belongs to is a no-op; adding it to any other
    /// group fails with [`Error::NodeAlreadyGrouped`].
    pub fn add_to_group(&mut self, group: GroupId, node: NodeId) -> Result<()> {
        self.check_group(group)?;
        let current = self.check_node(node)?.group;
        match current {
            Some(g) if g == group => return Ok(()),
            Some(g) => return Err(Error::NodeAlreadyGrouped { node, group: g }),
            None => {}
        }

        let g = &mut self.groups[group.0];
        if g.members.is_empty() {
            g.reference = Some(node);
        }
        g.members.insert(node);
        self.nodes[node.0].group = Some(group);
        Ok(())
    }

    /// Detaches `node` from `group`. Returns whether it actually was a member.
    pub fn remove_from_group(&mut self, group: GroupId, node: NodeId) -> Result<bool> {
        self.check_group(group)?;
        self.check_node(node)?;
        if self.nodes[node.0].group != Some(group) {
            return Ok(false);
        }

        let g = &mut self.groups[group.0];
        g.members.shift_remove(&node);
        if g.reference == Some(node) {
            g.reference = g.members.first().copied();
        }
        let n = &mut self.nodes[node.0];
        n.group = None;
        n.group_offset = Vector::ZERO;
        Ok(true)
    }

    /// Wraps every ungrouped node into a singleton group.
    pub(crate) fn wrap_ungrouped_nodes(&mut self) {
        for idx in 0..self.nodes.len() {
            if self.nodes[idx].group.is_some() {
                continue;
            }
            let group = self.add_group();
            let node = NodeId(idx);
            self.groups[group.0].members.insert(node);
            self.groups[group.0].reference = Some(node);
            self.nodes[idx].group = Some(group);
        }
    }

    /// Picks the left-most member of every group as its reference and recomputes all offsets
    /// relative to it, so offsets in `x` are never negative.
    pub fn calculate_group_offsets(&mut self) {
        for group in &mut self.groups {
            let mut reference: Option<NodeId> = None;
            for &n in &group.members {
                let better = match reference {
                    None => true,
                    Some(r) => self.nodes[n.0].hitbox.x < self.nodes[r.0].hitbox.x,
                };
                if better {
                    reference = Some(n);
                }
            }
            group.reference = reference;

            let Some(reference) = reference else {
                continue;
            };
            let origin = self.nodes[reference.0].hitbox;
            for &n in &group.members {
                let node = &mut self.nodes[n.0];
                node.group_offset =
                    Vector::new(node.hitbox.x - origin.x, node.hitbox.y - origin.y);
            }
        }
    }

    /// Records a constraint `first -> second` applied whenever compacting horizontally,
    /// independent of the geometry. Compacting right applies it reversed.
    pub fn add_predefined_horizontal(&mut self, first: NodeId, second: NodeId) -> Result<()> {
        self.check_node(first)?;
        self.check_node(second)?;
        self.predefined_horizontal.push((first, second));
        Ok(())
    }

    /// Vertical counterpart of [`Self::add_predefined_horizontal`]; compacting down reverses it.
    pub fn add_predefined_vertical(&mut self, first: NodeId, second: NodeId) -> Result<()> {
        self.check_node(first)?;
        self.check_node(second)?;
        self.predefined_vertical.push((first, second));
        Ok(())
    }

    pub fn predefined_constraints(&self, dir: Direction) -> &[(NodeId, NodeId)] {
        if dir.is_horizontal() {
            &self.predefined_horizontal
        } else {
            &self.predefined_vertical
        }
    }

    /// All node-level constraints currently stored, as `(source, target)` pairs.
    pub fn constraint_pairs(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes
            .iter()
            .flat_map(|n| n.constraints.iter().map(move |&t| (n.id, t)))
            .collect()
    }

    pub(crate) fn set_constraints(&mut self, node: NodeId, constraints: Vec<NodeId>) {
        self.nodes[node.0].constraints = constraints;
    }

    pub(crate) fn clear_constraints(&mut self) {
        for n in &mut self.nodes {
            n.constraints.clear();
        }
        for g in &mut self.groups {
            g.out_degree = 0;
            g.out_degree_real = 0;
            g.incoming.clear();
        }
    }

    /// Derives every group's incoming external constraints and out-degree from the node-level
    /// constraints. Constraints between members of the same group are ignored.
    pub(crate) fn calculate_group_constraints(&mut self) {
        for g in &mut self.groups {
            g.out_degree = 0;
            g.out_degree_real = 0;
            g.incoming.clear();
        }

        for idx in 0..self.nodes.len() {
            let Some(source_group) = self.nodes[idx].group else {
                continue;
            };
            for k in 0..self.nodes[idx].constraints.len() {
                let target = self.nodes[idx].constraints[k];
                let Some(target_group) = self.nodes[target.0].group else {
                    continue;
                };
                if target_group == source_group {
                    continue;
                }
                let g = &mut self.groups[target_group.0];
                g.incoming.insert(NodeId(idx));
                g.out_degree += 1;
                g.out_degree_real += 1;
            }
        }
    }

    /// Restores every group's out-degree and marks all positions unresolved.
    pub(crate) fn reset_for_pass(&mut self) {
        for g in &mut self.groups {
            g.out_degree = g.out_degree_real;
            g.start_pos = f64::NEG_INFINITY;
        }
        for n in &mut self.nodes {
            n.start_pos = f64::NEG_INFINITY;
        }
    }

    pub(crate) fn snapshot_hitboxes(&mut self) {
        for n in &mut self.nodes {
            n.hitbox_pre_compaction = n.hitbox;
        }
    }

    pub(crate) fn mirror_hitboxes(&mut self) {
        for n in &mut self.nodes {
            n.hitbox.mirror_x();
        }
        self.calculate_group_offsets();
    }

    pub(crate) fn transpose_hitboxes(&mut self) {
        for n in &mut self.nodes {
            n.hitbox.transpose();
            n.group_offset.transpose();
        }
        self.calculate_group_offsets();
    }

    /// Swaps source and target of every constraint in place.
    pub(crate) fn reverse_constraints(&mut self) {
        let mut reversed: Vec<Vec<NodeId>> = vec![Vec::new(); self.nodes.len()];
        for n in &self.nodes {
            for &t in &n.constraints {
                reversed[t.0].push(n.id);
            }
        }
        for (n, constraints) in self.nodes.iter_mut().zip(reversed) {
            n.start_pos = f64::NEG_INFINITY;
            n.constraints = constraints;
        }
        self.calculate_group_constraints();
    }

    fn check_node(&self, node: NodeId) -> Result<&Node> {
        self.nodes.get(node.0).ok_or(Error::UnknownNode { node })
    }

    fn check_group(&self, group: GroupId) -> Result<&Group> {
        self.groups.get(group.0).ok_or(Error::UnknownGroup { group })
    }
}

impl Index<NodeId> for ConstraintGraph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for ConstraintGraph {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

impl Index<GroupId> for ConstraintGraph {
    type Output = Group;

    fn index(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }
}

impl IndexMut<GroupId> for ConstraintGraph {
    fn index_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id.0]
    }
}
