use crate::error::{Error, Result};
use crate::geom::Rect;

use super::{ConstraintGraph, GroupId, NodeId};

/// Fluent construction of a node directly into a graph.
#[derive(Debug, Clone, Default)]
pub struct NodeBuilder {
    hitbox: Rect,
    tag: usize,
    origin: Option<String>,
}

impl NodeBuilder {
    pub fn hitbox(mut self, hitbox: Rect) -> Self {
        self.hitbox = hitbox;
        self
    }

    pub fn tag(mut self, tag: usize) -> Self {
        self.tag = tag;
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn create(self, graph: &mut ConstraintGraph) -> NodeId {
        let id = graph.add_node(self.hitbox);
        let node = &mut graph[id];
        node.tag = self.tag;
        node.origin = self.origin;
        id
    }
}

/// Fluent construction of a rigid group over existing nodes.
#[derive(Debug, Clone, Default)]
pub struct GroupBuilder {
    nodes: Vec<NodeId>,
}

impl GroupBuilder {
    pub fn nodes(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    /// Creates the group. Fails without touching the graph if any node is unknown or already
    /// belongs to a group.
    pub fn create(self, graph: &mut ConstraintGraph) -> Result<GroupId> {
        for &node in &self.nodes {
            let Some(n) = graph.node(node) else {
                return Err(Error::UnknownNode { node });
            };
            if let Some(group) = n.group() {
                return Err(Error::NodeAlreadyGrouped { node, group });
            }
        }

        let group = graph.add_group();
        for node in self.nodes {
            graph.add_to_group(group, node)?;
        }
        Ok(group)
    }
}
