//! Behavior node descriptions.
//!
//! A [`Node`] is the value-level recipe for one subtree: it owns its
//! children and carries the user-supplied closures, but no traversal state.
//! [`Tree::build`] consumes the recipe and flattens it into the arena that
//! actually executes. The variant set is closed on purpose: dispatch is a
//! single exhaustive `match`, and adding a variant is a compile-time event,
//! not a plugin point.
//!
//! [`Tree::build`]: crate::Tree::build

use crate::Status;

/// Predicate over the agent context, used by condition and repeater nodes.
pub type Predicate<C> = Box<dyn Fn(&C) -> bool>;

/// Handler invoked by an action leaf.
pub type Handler<C> = Box<dyn FnMut(&mut C) -> Status>;

/// Stop rule for a repeater node. The two modes are mutually exclusive by
/// construction.
pub(crate) enum RepeatBound<C> {
    /// Run the child exactly this many times, then succeed.
    Count(usize),
    /// Run the child until the predicate holds. The child's own terminal
    /// results are discarded; the predicate is the only exit.
    Until(Predicate<C>),
}

/// One node of a behavior tree description.
///
/// Build values with the functions in [`crate::builder`] and hand the root
/// to [`Tree::build`](crate::Tree::build).
pub struct Node<C> {
    pub(crate) kind: NodeKind<C>,
}

pub(crate) enum NodeKind<C> {
    /// AND composite: children run in order, first failure wins.
    Sequence { children: Vec<Node<C>> },
    /// OR composite: children run in order, first success wins.
    Selector { children: Vec<Node<C>> },
    /// Gate: predicate false fails without touching the child; predicate
    /// true delegates (or succeeds when childless).
    Condition {
        predicate: Predicate<C>,
        child: Option<Box<Node<C>>>,
    },
    /// Flips the child's terminal result.
    Inverter { child: Box<Node<C>> },
    /// Re-runs the child until its bound is met.
    Repeater {
        bound: RepeatBound<C>,
        child: Box<Node<C>>,
    },
    /// Leaf: user handler producing a status directly.
    Action { handler: Handler<C> },
    /// Leaf: succeeds once the given number of seconds has accumulated.
    Wait { duration: f32 },
}
