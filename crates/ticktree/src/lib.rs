//! Resumable behavior trees for tick-driven agents.
//!
//! This library implements a cooperative, suspend/resume behavior tree
//! evaluator. The host drives the tree one tick at a time; a leaf that needs
//! more time returns [`Status::Running`] and registers itself with the tree,
//! so the next tick re-enters that leaf directly instead of re-descending
//! from the root. When the leaf eventually finishes, its result is folded
//! into the ancestors through explicit parent back-references (the "resume
//! walk") rather than an unwinding call stack.
//!
//! - **No blocking**: evaluation never blocks; the only suspension point is
//!   a leaf returning `Running`
//! - **Static shape**: tree topology is fixed at build time; only traversal
//!   state (child cursors, repeat counters, wait timers) mutates per tick
//! - **Single-threaded**: one external tick call per frame, no locks
//!
//! # Architecture
//!
//! - [`Status`]: three-valued result of one evaluation pass
//! - [`Node`] plus the [`builder`] functions: value-level tree description
//! - [`Tree`]: arena-backed evaluator owning the node graph and the single
//!   current-running reference
//! - [`Context`]: host-owned agent state, refreshed once per tick

pub mod builder;
pub mod context;
pub mod error;
pub mod node;
pub mod status;
pub mod tree;

// Re-export core types for ergonomic API
pub use builder::{
    action, condition, guarded, inverter, repeat_n, repeat_until, selector, sequence, wait,
};
pub use context::Context;
pub use error::BuildError;
pub use node::Node;
pub use status::Status;
pub use tree::{Tree, TreeConfig, UpdateSource};
