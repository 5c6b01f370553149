use crate::direction::Direction;
use crate::graph::{GroupId, NodeId};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node {node} already belongs to group {group}")]
    NodeAlreadyGrouped { node: NodeId, group: GroupId },

    #[error("node {node} does not belong to this graph")]
    UnknownNode { node: NodeId },

    #[error("group {group} does not belong to this graph")]
    UnknownGroup { group: GroupId },

    #[error("the direction {direction} is not supported by the constraint graph")]
    UnsupportedDirection { direction: Direction },

    #[error("the compactor has been finished already")]
    Finished,

    #[error("an earlier compaction request failed; only finish is allowed")]
    Aborted,

    #[error(
        "nodes {first} and {second} overlap perpendicular to the compaction axis and share the center {center}"
    )]
    CoincidentCenters {
        first: NodeId,
        second: NodeId,
        center: f64,
    },

    #[error("constraint cycle: no topological order exists for nodes {unresolved:?}")]
    ConstraintCycle { unresolved: Vec<NodeId> },
}

pub type Result<T> = std::result::Result<T, Error>;
