#![forbid(unsafe_code)]

//! One-dimensional compaction of axis-aligned boxes.
//!
//! Boxes positioned by an upstream layout phase are packed as tightly as possible along one of
//! the four directions while keeping pairwise spacing and moving groups of boxes rigidly.
//! Typical use:
//!
//! ```
//! use sirenia::{Compactor, ConstraintGraph, Direction, DirectionSet, Node, Rect};
//!
//! let mut graph = ConstraintGraph::new(DirectionSet::all());
//! let a = Node::builder().hitbox(Rect::new(0.0, 0.0, 10.0, 10.0)).create(&mut graph);
//! let b = Node::builder().hitbox(Rect::new(50.0, 5.0, 10.0, 10.0)).create(&mut graph);
//!
//! let mut compactor = Compactor::new(graph);
//! compactor.change_direction(Direction::Left)?.compact()?.finish()?;
//!
//! assert_eq!(compactor.graph()[a].hitbox.x, 0.0);
//! assert_eq!(compactor.graph()[b].hitbox.x, 10.0);
//! # Ok::<(), sirenia::Error>(())
//! ```

pub mod algo;
pub mod compactor;
pub mod constraints;
pub mod direction;
pub mod error;
pub mod geom;
pub mod graph;
pub mod policy;

pub use algo::{CompactionAlgorithm, CompactionContext, LongestPath};
pub use compactor::{Compactor, CompactorOptions};
pub use constraints::{
    ConstraintCalculator, ConstraintStrategy, QuadraticConstraints, SweepConstraints,
};
pub use direction::{Action, Direction, DirectionSet};
pub use error::{Error, Result};
pub use geom::{EPSILON, Rect, Vector};
pub use graph::{ConstraintGraph, Group, GroupBuilder, GroupId, Node, NodeBuilder, NodeId};
pub use policy::{LockPolicy, SpacingPolicy, UniformSpacing};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
