use fog_pathfinding::navigation::MAX_NAVIGATION_ITERATIONS;
use fog_pathfinding::{
    DriverState, ExpansionObserver, ExpansionView, Position, SearchVariant, Simulation,
    SimulationSettings, TieBreak,
};
use rand::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn five_by_five_open_grid_forward_search() {
    let settings = SimulationSettings {
        variant: SearchVariant::Forward,
        tie_break: TieBreak::PreferHigherCost,
        wall_probability: 0.0,
        seed: Some(0),
    };
    let mut sim = Simulation::new(Position::new(0, 0), Position::new(4, 4), 5, 5, settings).unwrap();

    let report = sim.run_search(false);
    assert!(report.reachable);
    assert_eq!(report.path.len(), 9);
    assert_eq!(report.path[0], Position::new(0, 0));
    assert_eq!(report.path[8], Position::new(4, 4));
    assert!(sim.nodes_expanded() >= 9);
}

#[test]
fn walled_in_target_terminates_unreachable() {
    for variant in SearchVariant::all() {
        let settings = SimulationSettings {
            variant,
            seed: Some(8),
            ..Default::default()
        };
        let target = Position::new(10, 10);
        let mut sim = Simulation::new(Position::new(1, 1), target, 14, 14, settings).unwrap();
        for wall in [(9, 10), (11, 10), (10, 9), (10, 11)] {
            sim.grid_mut().set_wall(Position::new(wall.0, wall.1), true);
        }

        let state = sim.drive_to_completion(false);
        assert_eq!(state, DriverState::Unreachable, "{}", variant);
        assert!(!sim.target_reachable());
        assert!(sim.path().is_empty());
    }
}

#[test]
fn target_sealed_by_discovered_walls() {
    // every roll is a wall, so the agent is boxed in as soon as it explores
    let settings = SimulationSettings {
        wall_probability: 1.0,
        seed: Some(4),
        ..Default::default()
    };
    let mut sim =
        Simulation::new(Position::new(5, 5), Position::new(0, 9), 12, 12, settings).unwrap();
    let state = sim.drive_to_completion(false);
    assert_eq!(state, DriverState::Unreachable);
    let stats = sim.report();
    assert!(stats.replans >= 1);
    assert!(stats.search.searches >= 2);
}

#[test]
fn random_fog_runs_always_terminate() {
    let mut rng = StdRng::seed_from_u64(5);
    for seed in 0..200u64 {
        let width = rng.gen_range(4..=25);
        let height = rng.gen_range(4..=25);
        let start = Position::new(rng.gen_range(0..width), rng.gen_range(0..height));
        let target = Position::new(rng.gen_range(0..width), rng.gen_range(0..height));
        let settings = SimulationSettings {
            variant: *SearchVariant::all().choose(&mut rng).unwrap(),
            tie_break: TieBreak::PreferHigherCost,
            wall_probability: rng.gen_range(0.0..0.5),
            seed: Some(seed),
        };
        let mut sim = Simulation::new(start, target, width, height, settings).unwrap();

        let stats = sim.run();
        assert!(stats.outcome.is_terminal());
        assert!(stats.total_moves + stats.replans <= MAX_NAVIGATION_ITERATIONS + 1);

        let snapshot = sim.snapshot();
        let mut previous = start;
        for &step in &snapshot.trail {
            assert_eq!(previous.manhattan_distance(&step), 1);
            assert!(!sim.grid().is_wall(step));
            previous = step;
        }

        match stats.outcome {
            DriverState::Reached => {
                assert_eq!(snapshot.agent, target);
                assert!(sim.target_reachable());
                let optimal = stats.optimal_path_length.unwrap();
                assert!(stats.total_moves >= optimal);
            }
            DriverState::Unreachable | DriverState::GuardExhausted => {
                assert!(!sim.target_reachable());
                assert_ne!(snapshot.agent, target);
            }
            other => panic!("unexpected final state {:?}", other),
        }
    }
}

#[test]
fn stepping_matches_driving_to_completion() {
    let settings = SimulationSettings {
        wall_probability: 0.25,
        seed: Some(21),
        ..Default::default()
    };
    let start = Position::new(2, 3);
    let target = Position::new(17, 12);

    let mut driven = Simulation::new(start, target, 20, 15, settings).unwrap();
    let final_state = driven.drive_to_completion(false);

    let mut stepped = Simulation::new(start, target, 20, 15, settings).unwrap();
    let mut state = DriverState::Idle;
    while !state.is_terminal() {
        state = stepped.step_agent_along_path();
    }

    assert_eq!(state, final_state);
    assert_eq!(stepped.snapshot(), driven.snapshot());
    assert_eq!(stepped.nodes_expanded(), driven.nodes_expanded());
}

#[derive(Default)]
struct CountingAnimator {
    frames: Rc<RefCell<usize>>,
}

impl ExpansionObserver for CountingAnimator {
    fn on_expansion(&mut self, view: ExpansionView<'_>) {
        assert!(!view.closed.is_empty());
        *self.frames.borrow_mut() += 1;
    }
}

#[test]
fn animation_yields_without_changing_the_run() {
    let settings = SimulationSettings {
        wall_probability: 0.3,
        seed: Some(99),
        ..Default::default()
    };
    let start = Position::new(0, 0);
    let target = Position::new(11, 9);

    let mut plain = Simulation::new(start, target, 14, 12, settings).unwrap();
    let plain_state = plain.drive_to_completion(false);

    let frames = Rc::new(RefCell::new(0));
    let mut animated = Simulation::new(start, target, 14, 12, settings).unwrap();
    animated.set_animator(Box::new(CountingAnimator {
        frames: Rc::clone(&frames),
    }));
    let animated_state = animated.drive_to_completion(true);

    assert_eq!(plain_state, animated_state);
    assert_eq!(plain.snapshot(), animated.snapshot());
    assert!(*frames.borrow() > 0);

    // not animated: the observer is left alone
    let before = *frames.borrow();
    animated.reset_to_start();
    animated.run_search(false);
    assert_eq!(*frames.borrow(), before);
}

#[test]
fn reset_to_start_reuses_discovered_terrain() {
    let settings = SimulationSettings {
        wall_probability: 0.3,
        seed: Some(12),
        ..Default::default()
    };
    let mut sim =
        Simulation::new(Position::new(1, 1), Position::new(13, 13), 15, 15, settings).unwrap();
    sim.drive_to_completion(false);
    let walls = sim.snapshot().walls;

    sim.reset_to_start();
    assert_eq!(sim.grid().agent_position(), Position::new(1, 1));
    assert_eq!(sim.nodes_expanded(), 0);
    assert!(sim.snapshot().trail.is_empty());
    assert_eq!(sim.snapshot().walls, walls);
}
