//! Patrol-guard demo: a minimal host loop driving a ticktree agent.
//!
//! A guard walks between two posts, pausing at each one. When the intruder
//! alarm goes off the selector preempts the patrol branch on the next full
//! descent and the guard chases instead. Run with
//! `RUST_LOG=debug cargo run -p ticktree-demo` to watch the suspend/resume
//! traffic inside the tree.

use anyhow::Result;
use ticktree::{
    Context, Node, Status, Tree, TreeConfig, UpdateSource, action, guarded, selector, sequence,
    wait,
};

const TICK_STEP: f32 = 0.1;
const WALK_SPEED: f32 = 1.5;

struct Guard {
    position: f32,
    alarm: bool,
    elapsed: f32,
}

impl Context for Guard {
    fn refresh(&mut self) {
        self.elapsed += TICK_STEP;
        // The alarm trips partway through the simulation and clears later.
        self.alarm = (4.0..6.0).contains(&self.elapsed);
    }
}

impl Guard {
    /// Steps toward `target`; reports whether it has been reached.
    fn walk_toward(&mut self, target: f32) -> bool {
        let step = WALK_SPEED * TICK_STEP;
        if (self.position - target).abs() <= step {
            self.position = target;
            return true;
        }
        self.position += step * (target - self.position).signum();
        false
    }
}

fn walk_to(target: f32) -> Node<Guard> {
    action(move |guard: &mut Guard| {
        if guard.walk_toward(target) {
            tracing::info!(post = target, "guard reached post");
            Status::Success
        } else {
            Status::Running
        }
    })
}

fn chase() -> Node<Guard> {
    action(|guard: &mut Guard| {
        if guard.walk_toward(10.0) {
            tracing::info!("guard caught up, alarm handled");
            Status::Success
        } else {
            Status::Running
        }
    })
}

fn patrol_tree(guard: &mut Guard) -> Option<Node<Guard>> {
    tracing::debug!(start = guard.position, "building patrol tree");
    Some(selector(vec![
        guarded(|guard: &Guard| guard.alarm, chase()),
        sequence(vec![
            walk_to(3.0),
            wait(1.0),
            walk_to(0.0),
            wait(1.0),
        ]),
    ]))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut guard = Guard {
        position: 0.0,
        alarm: false,
        elapsed: 0.0,
    };

    let config = TreeConfig {
        update: UpdateSource::Fixed(TICK_STEP),
        looping: true,
        run_on_build: true,
    };
    let mut tree = Tree::build(&mut guard, config, patrol_tree)?;
    tree.on_finished(|guard: &mut Guard, status| {
        tracing::info!(%status, position = guard.position, "patrol lap finished");
    });

    // Fixed-step host loop standing in for a frame scheduler.
    for _ in 0..200 {
        tree.tick(&mut guard, TICK_STEP);
    }

    tree.stop();
    tracing::info!(position = guard.position, "simulation over");
    Ok(())
}
