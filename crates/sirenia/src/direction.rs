//! Compaction directions and the transition table between them.
//!
//! `Left` is the canonical orientation. Every other direction is reached by a short sequence of
//! mirror and transpose steps applied to all hitboxes, followed by either a recomputation of the
//! constraints or, for a 180° turn, an in-place reversal of the existing ones.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Whether predefined constraints are applied in stored order (`true`) or reversed.
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Left | Direction::Up)
    }

    fn bit(self) -> u8 {
        match self {
            Direction::Left => 0b0001,
            Direction::Right => 0b0010,
            Direction::Up => 0b0100,
            Direction::Down => 0b1000,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        };
        f.write_str(s)
    }
}

/// The set of directions a constraint graph may be compacted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(0b1111)
    }

    pub const fn horizontal() -> Self {
        Self(0b0011)
    }

    pub const fn vertical() -> Self {
        Self(0b1100)
    }

    pub fn contains(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = DirectionSet::empty();
        for d in iter {
            set.insert(d);
        }
        set
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Reflect every hitbox at the `y` axis.
    Mirror,
    /// Swap the axes of every hitbox and group offset.
    Transpose,
    /// Run the constraint calculator from scratch.
    RecomputeConstraints,
    /// Swap source and target of every existing constraint.
    ReverseConstraints,
}

impl Action {
    pub fn is_geometric(self) -> bool {
        matches!(self, Action::Mirror | Action::Transpose)
    }
}

use Action::{Mirror, RecomputeConstraints as Recompute, ReverseConstraints as Reverse, Transpose};

/// Actions that take the geometry from the `from` orientation (`None` = never compacted) into
/// the canonical orientation of `to`.
pub fn transition(from: Option<Direction>, to: Direction) -> &'static [Action] {
    use Direction::*;

    match (from, to) {
        (None, Left) => &[Recompute],
        (None, Right) => &[Mirror, Recompute],
        (None, Up) => &[Transpose, Recompute],
        (None, Down) => &[Transpose, Mirror, Recompute],

        (Some(Left), Left) => &[],
        (Some(Left), Right) => &[Mirror, Reverse],
        (Some(Left), Up) => &[Transpose, Recompute],
        (Some(Left), Down) => &[Transpose, Mirror, Recompute],

        (Some(Right), Left) => &[Mirror, Reverse],
        (Some(Right), Right) => &[],
        (Some(Right), Up) => &[Mirror, Transpose, Recompute],
        (Some(Right), Down) => &[Mirror, Transpose, Mirror, Recompute],

        (Some(Up), Left) => &[Transpose, Recompute],
        (Some(Up), Right) => &[Transpose, Mirror, Recompute],
        (Some(Up), Up) => &[],
        (Some(Up), Down) => &[Mirror, Reverse],

        (Some(Down), Left) => &[Mirror, Transpose, Recompute],
        (Some(Down), Right) => &[Mirror, Transpose, Mirror, Recompute],
        (Some(Down), Up) => &[Mirror, Reverse],
        (Some(Down), Down) => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, Direction, DirectionSet, transition};

    #[test]
    fn opposite_turns_only_mirror_and_reverse() {
        for d in Direction::ALL {
            assert_eq!(
                transition(Some(d), d.opposite()),
                &[Action::Mirror, Action::ReverseConstraints]
            );
        }
    }

    #[test]
    fn same_direction_is_a_no_op() {
        for d in Direction::ALL {
            assert!(transition(Some(d), d).is_empty());
        }
    }

    #[test]
    fn every_other_transition_recomputes_last() {
        let mut count = 0;
        for from in std::iter::once(None).chain(Direction::ALL.into_iter().map(Some)) {
            for to in Direction::ALL {
                count += 1;
                let actions = transition(from, to);
                if from == Some(to) || from == Some(to.opposite()) {
                    continue;
                }
                assert_eq!(actions.last(), Some(&Action::RecomputeConstraints));
                assert!(
                    actions[..actions.len() - 1]
                        .iter()
                        .all(|a| a.is_geometric())
                );
            }
        }
        assert_eq!(count, 20);
    }

    #[test]
    fn direction_set_membership() {
        let set: DirectionSet = [Direction::Left, Direction::Down].into_iter().collect();
        assert!(set.contains(Direction::Left));
        assert!(set.contains(Direction::Down));
        assert!(!set.contains(Direction::Up));
        assert_eq!(set.iter().count(), 2);
        assert!(DirectionSet::all().contains(Direction::Right));
        assert!(!DirectionSet::horizontal().contains(Direction::Up));
        assert!(DirectionSet::vertical().contains(Direction::Up));
    }
}
