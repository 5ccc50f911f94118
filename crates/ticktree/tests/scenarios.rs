//! End-to-end scenarios driving a tree the way a host loop would.

use ticktree::{
    Context, Node, Status, Tree, TreeConfig, UpdateSource, action, guarded, selector, sequence,
    wait,
};

#[derive(Default)]
struct Agent {
    refreshes: usize,
    log: Vec<&'static str>,
    alerted: bool,
    finished: usize,
}

impl Context for Agent {
    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}

fn mark(name: &'static str) -> Node<Agent> {
    action(move |ctx: &mut Agent| {
        ctx.log.push(name);
        Status::Success
    })
}

fn fixed_tree(root: Node<Agent>, step: f32, looping: bool) -> (Tree<Agent>, Agent) {
    let mut ctx = Agent::default();
    let config = TreeConfig {
        update: UpdateSource::Fixed(step),
        looping,
        run_on_build: true,
    };
    let tree = Tree::build(&mut ctx, config, |_| Some(root)).unwrap();
    (tree, ctx)
}

/// Sequence([Action, Wait(1.0), Action]) on 0.4s ticks: Running at ticks 1
/// and 2, Success on tick 3 once 1.2s have accumulated, with the trailing
/// action executing that same tick.
#[test]
fn wait_inside_sequence_spans_ticks() {
    let root = sequence(vec![mark("enter"), wait(1.0), mark("exit")]);
    let (mut tree, mut ctx) = fixed_tree(root, 0.4, false);

    assert_eq!(tree.tick(&mut ctx, 0.4), Some(Status::Running));
    assert_eq!(ctx.log, vec!["enter"]);
    assert_eq!(tree.tick(&mut ctx, 0.4), Some(Status::Running));
    assert_eq!(tree.tick(&mut ctx, 0.4), Some(Status::Success));
    assert_eq!(ctx.log, vec!["enter", "exit"]);
    assert_eq!(ctx.refreshes, 3);
}

/// Selector([failing action, succeeding action]) completes within one tick;
/// the first failure does not short-circuit the second child.
#[test]
fn selector_recovers_within_one_tick() {
    let root = selector(vec![
        action(|ctx: &mut Agent| {
            ctx.log.push("try");
            Status::Failure
        }),
        mark("fallback"),
    ]);
    let (mut tree, mut ctx) = fixed_tree(root, 0.1, false);

    assert_eq!(tree.tick(&mut ctx, 0.1), Some(Status::Success));
    assert_eq!(ctx.log, vec!["try", "fallback"]);
}

/// A false condition gates its child: always Failure, handler never runs.
#[test]
fn false_condition_gates_child() {
    let root = guarded(|ctx: &Agent| ctx.alerted, mark("chase"));
    let (mut tree, mut ctx) = fixed_tree(root, 0.1, false);

    for _ in 0..3 {
        assert_eq!(tree.tick(&mut ctx, 0.1), Some(Status::Failure));
    }
    assert!(ctx.log.is_empty());
}

/// A looping tree that completes on tick N produces a fresh run on tick
/// N+1, with timers observably back at their initial values.
#[test]
fn looping_tree_restarts_fresh() {
    let root = sequence(vec![mark("step"), wait(0.8)]);
    let (mut tree, mut ctx) = fixed_tree(root, 0.4, true);
    tree.on_finished(|ctx: &mut Agent, status| {
        assert_eq!(status, Status::Success);
        ctx.finished += 1;
    });

    // Each iteration: one running tick, then the completing tick.
    assert_eq!(tree.tick(&mut ctx, 0.4), Some(Status::Running));
    assert_eq!(tree.tick(&mut ctx, 0.4), Some(Status::Success));
    assert_eq!(ctx.finished, 1);

    // The wait accumulator was reset: the next iteration needs two ticks
    // again, and the leading action re-runs.
    assert_eq!(tree.tick(&mut ctx, 0.4), Some(Status::Running));
    assert_eq!(ctx.log, vec!["step", "step"]);
    assert_eq!(tree.tick(&mut ctx, 0.4), Some(Status::Success));
    assert_eq!(ctx.finished, 2);
}

/// Stop freezes a suspended subtree in place; a later start resumes at the
/// suspended leaf instead of re-running earlier siblings.
#[test]
fn stop_and_start_unpause_mid_subtree() {
    let root = sequence(vec![mark("before"), wait(1.0), mark("after")]);
    let (mut tree, mut ctx) = fixed_tree(root, 0.6, false);

    assert_eq!(tree.tick(&mut ctx, 0.6), Some(Status::Running));
    tree.stop();
    assert_eq!(tree.tick(&mut ctx, 0.6), None);
    assert_eq!(ctx.refreshes, 1);

    tree.start();
    assert_eq!(tree.tick(&mut ctx, 0.6), Some(Status::Success));
    assert_eq!(ctx.log, vec!["before", "after"]);
}
