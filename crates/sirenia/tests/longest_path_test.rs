use float_cmp::approx_eq;
use sirenia::{
    CompactionAlgorithm, CompactionContext, Compactor, CompactorOptions, ConstraintCalculator,
    ConstraintGraph, ConstraintStrategy, Direction, DirectionSet, Error, Group, Node, NodeId,
    Rect, Result,
};

const STRATEGIES: [ConstraintStrategy; 2] =
    [ConstraintStrategy::Quadratic, ConstraintStrategy::Sweep];

fn graph() -> ConstraintGraph {
    ConstraintGraph::new(DirectionSet::all())
}

fn node(g: &mut ConstraintGraph, x: f64, y: f64, w: f64, h: f64) -> NodeId {
    Node::builder().hitbox(Rect::new(x, y, w, h)).create(g)
}

fn compactor(g: ConstraintGraph, constraints: ConstraintStrategy) -> Compactor {
    Compactor::with_options(
        g,
        CompactorOptions {
            constraints,
            ..Default::default()
        },
    )
}

#[track_caller]
fn assert_close(actual: f64, expected: f64) {
    assert!(
        approx_eq!(f64, actual, expected, epsilon = 1e-6),
        "expected {expected}, got {actual}"
    );
}

#[test]
fn group_is_pushed_rigidly_by_an_external_node() {
    for strategy in STRATEGIES {
        let mut g = graph();
        let a = node(&mut g, 0.0, 0.0, 10.0, 10.0);
        let b = node(&mut g, 20.0, 20.0, 10.0, 10.0);
        let c = node(&mut g, 0.0, 0.0, 5.0, 10.0);
        Group::builder().nodes([a, b]).create(&mut g).unwrap();

        let mut cp = compactor(g, strategy);
        cp.compact().unwrap().finish().unwrap();

        let g = cp.graph();
        assert_close(g[c].hitbox.x, 0.0);
        assert_close(g[a].hitbox.x, 5.0);
        assert_close(g[b].hitbox.x, 25.0);
        assert_close(g[b].hitbox.y, 20.0);
    }
}

#[test]
fn locked_nodes_do_not_move_toward_the_compaction_direction() {
    for strategy in STRATEGIES {
        let mut g = graph();
        let a = node(&mut g, 0.0, 0.0, 10.0, 10.0);
        let b = node(&mut g, 50.0, 0.0, 10.0, 10.0);
        let c = node(&mut g, 80.0, 0.0, 10.0, 10.0);

        let mut cp = compactor(g, strategy);
        cp.set_lock_policy(move |n: &Node, d: Direction| n.id() == b && d == Direction::Left);
        cp.compact().unwrap().finish().unwrap();

        let g = cp.graph();
        assert_close(g[a].hitbox.x, 0.0);
        assert_close(g[b].hitbox.x, 50.0);
        assert_close(g[c].hitbox.x, 60.0);
    }
}

#[test]
fn locks_only_apply_to_their_direction() {
    let mut g = graph();
    let a = node(&mut g, 0.0, 0.0, 10.0, 10.0);
    let b = node(&mut g, 50.0, 0.0, 10.0, 10.0);

    let mut cp = Compactor::new(g);
    cp.set_lock_policy(move |n: &Node, d: Direction| n.id() == b && d == Direction::Right);
    cp.compact().unwrap().finish().unwrap();

    assert_close(cp.graph()[a].hitbox.x, 0.0);
    assert_close(cp.graph()[b].hitbox.x, 10.0);
}

#[test]
fn a_locked_member_holds_its_whole_group() {
    for strategy in STRATEGIES {
        let mut g = graph();
        let a = node(&mut g, 0.0, 0.0, 10.0, 10.0);
        let b = node(&mut g, 50.0, 0.0, 10.0, 10.0);
        let d = node(&mut g, 70.0, 40.0, 10.0, 10.0);
        Group::builder().nodes([b, d]).create(&mut g).unwrap();

        let mut cp = compactor(g, strategy);
        cp.set_lock_policy(move |n: &Node, _d: Direction| n.id() == d);
        cp.compact().unwrap().finish().unwrap();

        let g = cp.graph();
        assert_close(g[a].hitbox.x, 0.0);
        assert_close(g[b].hitbox.x, 50.0);
        assert_close(g[d].hitbox.x, 70.0);
    }
}

#[test]
fn a_locked_node_may_still_be_pushed_away() {
    let mut g = graph();
    node(&mut g, 0.0, 0.0, 30.0, 10.0);
    let b = node(&mut g, 20.0, 5.0, 10.0, 10.0);

    let mut cp = compactor(g, ConstraintStrategy::Quadratic);
    cp.set_lock_policy(move |n: &Node, _d: Direction| n.id() == b);
    cp.compact().unwrap().finish().unwrap();

    assert_close(cp.graph()[b].hitbox.x, 30.0);
}

#[test]
fn cyclic_group_constraints_are_reported() {
    for strategy in STRATEGIES {
        let mut g = graph();
        let a = node(&mut g, 0.0, 0.0, 10.0, 10.0);
        let b = node(&mut g, 20.0, 0.0, 10.0, 10.0);
        let c = node(&mut g, 40.0, 0.0, 10.0, 10.0);
        Group::builder().nodes([a, c]).create(&mut g).unwrap();

        let mut cp = compactor(g, strategy);
        match cp.compact() {
            Err(Error::ConstraintCycle { mut unresolved }) => {
                unresolved.sort();
                assert_eq!(unresolved, vec![a, b, c]);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("compaction of a cyclic graph succeeded"),
        }
    }
}

#[test]
fn repeated_passes_accumulate_group_delta() {
    let mut g = graph();
    let a = node(&mut g, 0.0, 0.0, 10.0, 10.0);
    let b = node(&mut g, 50.0, 0.0, 10.0, 10.0);

    let mut cp = Compactor::new(g);
    cp.compact().unwrap();
    let gb = cp.graph().group_of(b).unwrap();
    assert_close(cp.graph()[gb].delta, -40.0);

    cp.compact().unwrap();
    assert_close(cp.graph()[gb].delta, -40.0);
    assert_close(cp.graph()[gb].delta_normalized, 0.0);
    assert_close(cp.graph()[a].hitbox.x, 0.0);
}

#[test]
fn empty_graphs_compact_trivially() {
    let mut cp = Compactor::new(graph());
    cp.compact().unwrap().finish().unwrap();
    assert_eq!(cp.graph().node_count(), 0);
}

/// Leaves every node where it is.
struct Stay;

impl CompactionAlgorithm for Stay {
    fn compact(&self, graph: &mut ConstraintGraph, _ctx: &CompactionContext<'_>) -> Result<()> {
        for node in graph.nodes_mut() {
            node.start_pos = node.hitbox.x;
            node.apply_position();
        }
        Ok(())
    }
}

#[test]
fn custom_algorithms_replace_longest_path() {
    let mut g = graph();
    let a = node(&mut g, 0.0, 0.0, 10.0, 10.0);
    let b = node(&mut g, 50.0, 0.0, 10.0, 10.0);

    let mut cp = Compactor::new(g);
    cp.set_compaction_algorithm(Stay);
    cp.change_direction(Direction::Right)
        .unwrap()
        .compact()
        .unwrap()
        .finish()
        .unwrap();

    assert_close(cp.graph()[a].hitbox.x, 0.0);
    assert_close(cp.graph()[b].hitbox.x, 50.0);
}

/// Constrains every node to follow the one created before it.
struct Chain;

impl ConstraintCalculator for Chain {
    fn calculate(
        &self,
        graph: &ConstraintGraph,
        _ctx: &CompactionContext<'_>,
    ) -> Result<Vec<(NodeId, NodeId)>> {
        Ok(graph
            .nodes()
            .windows(2)
            .map(|pair| (pair[0].id(), pair[1].id()))
            .collect())
    }
}

#[test]
fn custom_calculators_feed_the_compaction() {
    let mut g = graph();
    let a = node(&mut g, 0.0, 0.0, 10.0, 10.0);
    let b = node(&mut g, 50.0, 100.0, 10.0, 10.0);
    let c = node(&mut g, 90.0, 200.0, 10.0, 10.0);

    let mut cp = Compactor::new(g);
    cp.set_constraint_calculator(Chain);
    cp.compact().unwrap().finish().unwrap();

    let g = cp.graph();
    assert_close(g[a].hitbox.x, 0.0);
    assert_close(g[b].hitbox.x, 10.0);
    assert_close(g[c].hitbox.x, 20.0);
}

/// Constrains the first node to a fixed, possibly foreign, node id.
struct Fixed(NodeId);

impl ConstraintCalculator for Fixed {
    fn calculate(
        &self,
        graph: &ConstraintGraph,
        _ctx: &CompactionContext<'_>,
    ) -> Result<Vec<(NodeId, NodeId)>> {
        Ok(vec![(graph.nodes()[0].id(), self.0)])
    }
}

#[test]
fn calculators_reporting_foreign_nodes_are_rejected() {
    let mut other = graph();
    for x in [0.0, 20.0, 40.0] {
        node(&mut other, x, 0.0, 10.0, 10.0);
    }
    let stray = other.nodes()[2].id();

    let mut g = graph();
    node(&mut g, 0.0, 0.0, 10.0, 10.0);
    node(&mut g, 50.0, 0.0, 10.0, 10.0);

    let mut cp = Compactor::new(g);
    cp.set_constraint_calculator(Fixed(stray));
    assert!(matches!(
        cp.compact(),
        Err(Error::UnknownNode { node }) if node == stray
    ));
    assert!(cp.graph().constraint_pairs().is_empty());
    assert!(cp.has_failed());
}
