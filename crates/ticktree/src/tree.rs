//! Tree orchestration: arena storage, the tick entry point and the resume
//! walk.
//!
//! The tree flattens the [`Node`] recipe into an arena of slots indexed by
//! [`NodeId`]. Each slot keeps a non-owning `parent` back-reference (the
//! exact inverse of the ownership graph), so a leaf that suspended in a
//! previous tick can be re-entered directly and its eventual result folded
//! upward without re-descending from the root.

use crate::Status;
use crate::context::Context;
use crate::error::BuildError;
use crate::node::{Handler, Node, NodeKind, Predicate, RepeatBound};

/// Index of a node slot inside the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

/// Source of the per-tick delta consumed by wait leaves.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateSource {
    /// The host ticks the tree on a fixed step; wait leaves consume this
    /// step and ignore the delta passed to [`Tree::tick`].
    Fixed(f32),
    /// Wait leaves consume the delta passed to [`Tree::tick`] as-is.
    Variable,
}

/// Construction-time tree configuration.
#[derive(Debug, Clone, Copy)]
pub struct TreeConfig {
    /// Where wait leaves take their per-tick delta from.
    pub update: UpdateSource,
    /// Restart automatically after each completed run.
    pub looping: bool,
    /// Arm the tree immediately, without an explicit [`Tree::start`].
    pub run_on_build: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            update: UpdateSource::Variable,
            looping: false,
            run_on_build: true,
        }
    }
}

/// One arena slot: variant state plus the parent back-reference.
struct Slot<C> {
    kind: SlotKind<C>,
    parent: Option<NodeId>,
}

/// Arena-resident counterpart of [`NodeKind`], with children replaced by
/// ids and traversal state co-located with each variant.
enum SlotKind<C> {
    Sequence {
        children: Vec<NodeId>,
        cursor: usize,
    },
    Selector {
        children: Vec<NodeId>,
        cursor: usize,
    },
    Condition {
        predicate: Predicate<C>,
        child: Option<NodeId>,
    },
    Inverter {
        child: NodeId,
    },
    Repeater {
        bound: RepeatBound<C>,
        child: NodeId,
        iteration: usize,
    },
    Action {
        handler: Handler<C>,
    },
    Wait {
        duration: f32,
        elapsed: f32,
    },
}

type FinishHook<C> = Box<dyn FnMut(&mut C, Status)>;

/// A resumable behavior tree bound to a context type `C`.
///
/// The tree owns the whole node graph exclusively; the host owns the
/// context and passes it into [`Tree::tick`] each frame. Topology is fixed
/// after [`Tree::build`]; only traversal state (cursors, counters, timers
/// and the current-running reference) mutates afterwards.
pub struct Tree<C> {
    nodes: Vec<Slot<C>>,
    root: NodeId,
    /// The single suspended leaf, if any. `None` means the next tick is a
    /// cold run from the root.
    running: Option<NodeId>,
    active: bool,
    looping: bool,
    update: UpdateSource,
    on_finished: Option<FinishHook<C>>,
}

impl<C: Context> Tree<C> {
    /// Builds the tree once from a host-supplied factory.
    ///
    /// The factory receives the context (build steps commonly read agent
    /// parameters from it) and must return the root node; returning `None`
    /// is a fatal configuration error and no ticking occurs.
    pub fn build<F>(ctx: &mut C, config: TreeConfig, factory: F) -> Result<Self, BuildError>
    where
        F: FnOnce(&mut C) -> Option<Node<C>>,
    {
        let root_node = factory(ctx).ok_or(BuildError::EmptyBuild)?;
        let mut nodes = Vec::new();
        let root = flatten(root_node, &mut nodes);
        tracing::debug!(nodes = nodes.len(), "behavior tree built");
        Ok(Self {
            nodes,
            root,
            running: None,
            active: config.run_on_build,
            looping: config.looping,
            update: config.update,
            on_finished: None,
        })
    }

    /// Registers the completion callback, invoked with the context and the
    /// final status once per completed run (each loop iteration included).
    pub fn on_finished(&mut self, hook: impl FnMut(&mut C, Status) + 'static) {
        self.on_finished = Some(Box::new(hook));
    }

    /// Arms the tree. Duplicate calls are tolerated and logged only.
    pub fn start(&mut self) {
        if self.active {
            tracing::debug!("start called on a tree that is already running");
            return;
        }
        self.active = true;
    }

    /// Disarms ticking without touching traversal state, so a later
    /// [`Tree::start`] un-pauses mid-subtree.
    pub fn stop(&mut self) {
        if !self.active {
            tracing::debug!("stop called on a tree that is not running");
            return;
        }
        self.active = false;
    }

    /// Whether the tree is currently armed for ticking.
    pub fn is_running(&self) -> bool {
        self.active
    }

    /// Whether a leaf is suspended mid-run.
    pub fn is_suspended(&self) -> bool {
        self.running.is_some()
    }

    /// Toggles automatic restart after each completed run.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Discards all traversal state unconditionally: child cursors, repeat
    /// counters, wait timers and the current-running reference. The node
    /// graph itself is never reallocated.
    pub fn reset(&mut self) {
        self.running = None;
        self.reset_node(self.root);
    }

    /// Advances the tree by one host tick.
    ///
    /// Refreshes the context, then either runs the whole tree from the root
    /// (no suspension active) or re-enters the suspended leaf directly and,
    /// when it finishes, folds its result into the ancestors through the
    /// parent back-references.
    ///
    /// Returns `None` when the tree is not armed, otherwise the status of
    /// this pass: `Running` while suspended, the terminal status on the tick
    /// that completes the run.
    pub fn tick(&mut self, ctx: &mut C, delta: f32) -> Option<Status> {
        if !self.active {
            return None;
        }
        ctx.refresh();

        let status = match self.running {
            None => {
                let status = self.run_node(self.root, ctx, delta);
                if status.is_terminal() {
                    self.finish(ctx, status);
                }
                status
            }
            Some(id) => {
                let status = self.run_node(id, ctx, delta);
                if status.is_running() {
                    status
                } else {
                    self.running = None;
                    self.resume_walk(id, status, ctx, delta)
                }
            }
        };
        Some(status)
    }

    /// Walks parent links upward from a finished node, folding its result
    /// into each ancestor until one of them suspends again or the root
    /// resolves terminal.
    fn resume_walk(&mut self, from: NodeId, mut status: Status, ctx: &mut C, delta: f32) -> Status {
        let mut cursor = from;
        while let Some(parent) = self.nodes[cursor.0].parent {
            cursor = parent;
            status = self.resume_node(cursor, status, ctx, delta);
            if status.is_running() {
                // Whichever leaf re-suspended has already registered itself.
                return status;
            }
        }
        self.finish(ctx, status);
        status
    }

    /// Completes a run: disarm (unless looping), reset the whole tree and
    /// notify the host.
    fn finish(&mut self, ctx: &mut C, status: Status) {
        tracing::debug!(%status, looping = self.looping, "behavior tree finished");
        if !self.looping {
            self.active = false;
        }
        self.reset();
        if let Some(hook) = self.on_finished.as_mut() {
            hook(ctx, status);
        }
    }

    fn run_node(&mut self, id: NodeId, ctx: &mut C, delta: f32) -> Status {
        match &self.nodes[id.0].kind {
            SlotKind::Sequence { .. } => self.run_sequence(id, ctx, delta),
            SlotKind::Selector { .. } => self.run_selector(id, ctx, delta),
            SlotKind::Condition { .. } => self.run_condition(id, ctx, delta),
            SlotKind::Inverter { child } => {
                let child = *child;
                self.run_node(child, ctx, delta).invert()
            }
            SlotKind::Repeater { .. } => self.run_repeater(id, ctx, delta),
            SlotKind::Action { .. } => self.run_action(id, ctx),
            SlotKind::Wait { .. } => self.run_wait(id, delta),
        }
    }

    /// Folds a finished descendant's result into this node after a
    /// suspension ended. Only interior nodes can be resumed; a resume
    /// reaching a leaf means the parent links are inconsistent with
    /// ownership, which is a defect.
    fn resume_node(&mut self, id: NodeId, inner: Status, ctx: &mut C, delta: f32) -> Status {
        match &self.nodes[id.0].kind {
            SlotKind::Sequence { .. } => {
                if inner.is_failure() {
                    self.set_cursor(id, 0);
                    Status::Failure
                } else {
                    self.advance_cursor(id);
                    self.run_sequence(id, ctx, delta)
                }
            }
            SlotKind::Selector { .. } => {
                if inner.is_success() {
                    self.set_cursor(id, 0);
                    Status::Success
                } else {
                    self.advance_cursor(id);
                    self.run_selector(id, ctx, delta)
                }
            }
            // The predicate is not re-evaluated on resume; only the child's
            // suspension is being resolved.
            SlotKind::Condition { .. } => inner,
            SlotKind::Inverter { .. } => inner.invert(),
            SlotKind::Repeater { .. } => {
                self.complete_iteration(id);
                self.run_repeater(id, ctx, delta)
            }
            SlotKind::Action { .. } | SlotKind::Wait { .. } => {
                unreachable!("resume invoked on a leaf node (arena slot {})", id.0)
            }
        }
    }

    fn run_sequence(&mut self, id: NodeId, ctx: &mut C, delta: f32) -> Status {
        loop {
            let next = match &self.nodes[id.0].kind {
                SlotKind::Sequence { children, cursor } => children.get(*cursor).copied(),
                _ => unreachable!("arena slot {} is not a sequence", id.0),
            };
            let Some(child) = next else {
                // Every child succeeded (or there were none).
                self.set_cursor(id, 0);
                return Status::Success;
            };
            match self.run_node(child, ctx, delta) {
                Status::Success => self.advance_cursor(id),
                Status::Failure => {
                    self.set_cursor(id, 0);
                    return Status::Failure;
                }
                // Cursor stays on the suspended child.
                Status::Running => return Status::Running,
            }
        }
    }

    fn run_selector(&mut self, id: NodeId, ctx: &mut C, delta: f32) -> Status {
        loop {
            let next = match &self.nodes[id.0].kind {
                SlotKind::Selector { children, cursor } => children.get(*cursor).copied(),
                _ => unreachable!("arena slot {} is not a selector", id.0),
            };
            let Some(child) = next else {
                // Every child failed (or there were none).
                self.set_cursor(id, 0);
                return Status::Failure;
            };
            match self.run_node(child, ctx, delta) {
                Status::Success => {
                    self.set_cursor(id, 0);
                    return Status::Success;
                }
                Status::Failure => self.advance_cursor(id),
                Status::Running => return Status::Running,
            }
        }
    }

    fn run_condition(&mut self, id: NodeId, ctx: &mut C, delta: f32) -> Status {
        let child = match &self.nodes[id.0].kind {
            SlotKind::Condition { predicate, child } => {
                if !predicate(ctx) {
                    return Status::Failure;
                }
                *child
            }
            _ => unreachable!("arena slot {} is not a condition", id.0),
        };
        match child {
            Some(child) => self.run_node(child, ctx, delta),
            None => Status::Success,
        }
    }

    fn run_repeater(&mut self, id: NodeId, ctx: &mut C, delta: f32) -> Status {
        loop {
            let child = match &self.nodes[id.0].kind {
                SlotKind::Repeater {
                    bound,
                    child,
                    iteration,
                } => match bound {
                    RepeatBound::Until(predicate) => {
                        if predicate(ctx) {
                            return Status::Success;
                        }
                        *child
                    }
                    RepeatBound::Count(count) => {
                        if *iteration >= *count {
                            return Status::Success;
                        }
                        *child
                    }
                },
                _ => unreachable!("arena slot {} is not a repeater", id.0),
            };
            if self.run_node(child, ctx, delta).is_running() {
                // Count mode holds `iteration` at the suspended pass.
                return Status::Running;
            }
            // The child's terminal result is discarded in both modes; only
            // the fact that it is no longer running matters.
            self.complete_iteration(id);
        }
    }

    fn run_action(&mut self, id: NodeId, ctx: &mut C) -> Status {
        let status = match &mut self.nodes[id.0].kind {
            SlotKind::Action { handler } => handler(ctx),
            _ => unreachable!("arena slot {} is not an action", id.0),
        };
        if status.is_running() {
            self.running = Some(id);
        }
        status
    }

    fn run_wait(&mut self, id: NodeId, delta: f32) -> Status {
        let step = match self.update {
            UpdateSource::Fixed(step) => step,
            UpdateSource::Variable => delta,
        };
        let finished = match &mut self.nodes[id.0].kind {
            SlotKind::Wait { duration, elapsed } => {
                *elapsed += step;
                *elapsed >= *duration
            }
            _ => unreachable!("arena slot {} is not a wait", id.0),
        };
        if finished {
            Status::Success
        } else {
            self.running = Some(id);
            Status::Running
        }
    }

    fn set_cursor(&mut self, id: NodeId, value: usize) {
        match &mut self.nodes[id.0].kind {
            SlotKind::Sequence { cursor, .. } | SlotKind::Selector { cursor, .. } => {
                *cursor = value;
            }
            _ => unreachable!("arena slot {} has no child cursor", id.0),
        }
    }

    fn advance_cursor(&mut self, id: NodeId) {
        match &mut self.nodes[id.0].kind {
            SlotKind::Sequence { cursor, .. } | SlotKind::Selector { cursor, .. } => {
                *cursor += 1;
            }
            _ => unreachable!("arena slot {} has no child cursor", id.0),
        }
    }

    /// Advances the repeat counter after one completed child pass.
    /// Predicate-bounded repeaters keep no counter.
    fn complete_iteration(&mut self, id: NodeId) {
        match &mut self.nodes[id.0].kind {
            SlotKind::Repeater {
                bound: RepeatBound::Count(_),
                iteration,
                ..
            } => *iteration += 1,
            SlotKind::Repeater { .. } => {}
            _ => unreachable!("arena slot {} is not a repeater", id.0),
        }
    }

    fn reset_node(&mut self, id: NodeId) {
        let children: Vec<NodeId> = match &mut self.nodes[id.0].kind {
            SlotKind::Sequence { children, cursor } | SlotKind::Selector { children, cursor } => {
                *cursor = 0;
                children.clone()
            }
            SlotKind::Condition { child, .. } => child.iter().copied().collect(),
            SlotKind::Inverter { child } => vec![*child],
            SlotKind::Repeater {
                child, iteration, ..
            } => {
                *iteration = 0;
                vec![*child]
            }
            SlotKind::Action { .. } => Vec::new(),
            SlotKind::Wait { elapsed, .. } => {
                *elapsed = 0.0;
                Vec::new()
            }
        };
        for child in children {
            self.reset_node(child);
        }
    }
}

/// Moves a recipe node into the arena, depth-first, and wires the parent
/// back-references. Children land before their parent, so each child's
/// parent id is patched right after the parent slot is pushed.
fn flatten<C>(node: Node<C>, arena: &mut Vec<Slot<C>>) -> NodeId {
    let (kind, children) = match node.kind {
        NodeKind::Sequence { children } => {
            let ids: Vec<NodeId> = children.into_iter().map(|c| flatten(c, arena)).collect();
            (
                SlotKind::Sequence {
                    children: ids.clone(),
                    cursor: 0,
                },
                ids,
            )
        }
        NodeKind::Selector { children } => {
            let ids: Vec<NodeId> = children.into_iter().map(|c| flatten(c, arena)).collect();
            (
                SlotKind::Selector {
                    children: ids.clone(),
                    cursor: 0,
                },
                ids,
            )
        }
        NodeKind::Condition { predicate, child } => {
            let child_id = child.map(|c| flatten(*c, arena));
            (
                SlotKind::Condition {
                    predicate,
                    child: child_id,
                },
                child_id.into_iter().collect(),
            )
        }
        NodeKind::Inverter { child } => {
            let child_id = flatten(*child, arena);
            (SlotKind::Inverter { child: child_id }, vec![child_id])
        }
        NodeKind::Repeater { bound, child } => {
            let child_id = flatten(*child, arena);
            (
                SlotKind::Repeater {
                    bound,
                    child: child_id,
                    iteration: 0,
                },
                vec![child_id],
            )
        }
        NodeKind::Action { handler } => (SlotKind::Action { handler }, Vec::new()),
        NodeKind::Wait { duration } => (
            SlotKind::Wait {
                duration,
                elapsed: 0.0,
            },
            Vec::new(),
        ),
    };

    let id = NodeId(arena.len());
    arena.push(Slot { kind, parent: None });
    for child in children {
        arena[child.0].parent = Some(id);
    }
    id
}
