//! Builder functions for ergonomic tree construction.
//!
//! These helpers keep tree definitions close to how they read: a factory
//! composes `sequence(vec![condition(..), action(..), wait(..)])` and hands
//! the root to [`Tree::build`](crate::Tree::build).

use crate::Status;
use crate::node::{Node, NodeKind, RepeatBound};

/// Creates a sequence node (AND semantics).
///
/// Children run in order; the first `Failure` short-circuits. An empty
/// child list succeeds trivially.
pub fn sequence<C>(children: Vec<Node<C>>) -> Node<C> {
    Node {
        kind: NodeKind::Sequence { children },
    }
}

/// Creates a selector node (OR semantics).
///
/// Children run in order; the first `Success` short-circuits. An empty
/// child list fails trivially.
pub fn selector<C>(children: Vec<Node<C>>) -> Node<C> {
    Node {
        kind: NodeKind::Selector { children },
    }
}

/// Creates a childless condition node: `Success` when the predicate holds,
/// `Failure` otherwise.
pub fn condition<C>(predicate: impl Fn(&C) -> bool + 'static) -> Node<C> {
    Node {
        kind: NodeKind::Condition {
            predicate: Box::new(predicate),
            child: None,
        },
    }
}

/// Creates a condition node gating a child.
///
/// A false predicate fails without touching the child; a true predicate
/// delegates to the child and returns its result unchanged.
pub fn guarded<C>(predicate: impl Fn(&C) -> bool + 'static, child: Node<C>) -> Node<C> {
    Node {
        kind: NodeKind::Condition {
            predicate: Box::new(predicate),
            child: Some(Box::new(child)),
        },
    }
}

/// Creates an inverter node wrapping the given child.
pub fn inverter<C>(child: Node<C>) -> Node<C> {
    Node {
        kind: NodeKind::Inverter {
            child: Box::new(child),
        },
    }
}

/// Creates a repeater that runs the child exactly `count` times, then
/// succeeds.
pub fn repeat_n<C>(count: usize, child: Node<C>) -> Node<C> {
    Node {
        kind: NodeKind::Repeater {
            bound: RepeatBound::Count(count),
            child: Box::new(child),
        },
    }
}

/// Creates a repeater that runs the child until the predicate holds.
///
/// The child's own pass/fail results are discarded; the predicate is the
/// sole exit. A predicate that never becomes true loops forever within one
/// tick; that is the caller's responsibility, not guarded here.
pub fn repeat_until<C>(predicate: impl Fn(&C) -> bool + 'static, child: Node<C>) -> Node<C> {
    Node {
        kind: NodeKind::Repeater {
            bound: RepeatBound::Until(Box::new(predicate)),
            child: Box::new(child),
        },
    }
}

/// Creates an action leaf bound to a handler.
///
/// A handler returning [`Status::Running`] suspends the whole tree at this
/// leaf until the next tick.
pub fn action<C>(handler: impl FnMut(&mut C) -> Status + 'static) -> Node<C> {
    Node {
        kind: NodeKind::Action {
            handler: Box::new(handler),
        },
    }
}

/// Creates a wait leaf that succeeds once `duration` seconds have
/// accumulated across ticks.
pub fn wait<C>(duration: f32) -> Node<C> {
    Node {
        kind: NodeKind::Wait { duration },
    }
}
