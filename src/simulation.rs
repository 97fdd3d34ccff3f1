use crate::algorithms::common::{ExpansionObserver, SearchVariant, TieBreak};
use crate::algorithms::planner::{Planner, SearchReport};
use crate::error::SimulationError;
use crate::grid::{GridSnapshot, GridWorld, Position, DEFAULT_WALL_PROBABILITY};
use crate::navigation::{DriverState, NavigationDriver};
use crate::statistics::{SearchStats, Statistics};
use pathfinding::prelude::astar;
use std::time::Duration;

/// Knobs a simulation is created with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    pub variant: SearchVariant,
    pub tie_break: TieBreak,
    pub wall_probability: f64,
    /// Seed for terrain rolls; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            variant: SearchVariant::default(),
            tie_break: TieBreak::default(),
            wall_probability: DEFAULT_WALL_PROBABILITY,
            seed: None,
        }
    }
}

/// One agent, one target, one grid: the surface a presentation layer drives.
pub struct Simulation {
    grid: GridWorld,
    planner: Planner,
    driver: NavigationDriver,
    animator: Option<Box<dyn ExpansionObserver>>,
}

impl Simulation {
    pub fn new(
        start: Position,
        target: Position,
        width: usize,
        height: usize,
        settings: SimulationSettings,
    ) -> Result<Self, SimulationError> {
        let mut grid = GridWorld::new(width, height, start, target, settings.seed)?;
        grid.set_wall_probability(settings.wall_probability)?;

        Ok(Simulation {
            grid,
            planner: Planner::new(settings.variant, settings.tie_break),
            driver: NavigationDriver::new(),
            animator: None,
        })
    }

    pub fn set_tie_break(&mut self, tie_break: TieBreak) {
        self.planner.set_tie_break(tie_break);
    }

    pub fn set_variant(&mut self, variant: SearchVariant) {
        self.planner.set_variant(variant);
    }

    /// Observer that animated searches yield to after every expansion.
    pub fn set_animator(&mut self, animator: Box<dyn ExpansionObserver>) {
        self.animator = Some(animator);
    }

    /// Runs a single search from the agent's current cell. The driver
    /// continues along the new path from its first cell.
    pub fn run_search(&mut self, animated: bool) -> SearchReport {
        let observer = animation_observer(&mut self.animator, animated);
        let report = self.planner.plan(&mut self.grid, observer);
        self.driver.restart_path();
        report
    }

    pub fn step_agent_along_path(&mut self) -> DriverState {
        self.step_with_animation(false)
    }

    /// One driver iteration; any search it triggers yields to the animator
    /// when `animated`.
    pub fn step_with_animation(&mut self, animated: bool) -> DriverState {
        let observer = animation_observer(&mut self.animator, animated);
        self.driver.step(&mut self.grid, &mut self.planner, observer)
    }

    pub fn drive_to_completion(&mut self, animated: bool) -> DriverState {
        loop {
            let state = self.step_with_animation(animated);
            if state.is_terminal() {
                return state;
            }
        }
    }

    pub fn driver_state(&self) -> DriverState {
        self.driver.state()
    }

    /// Clears search scratch and the current plan so the next search starts
    /// fresh. Discovered terrain and the agent's position are kept.
    pub fn reset_scratch_keeping_terrain(&mut self) {
        self.grid.reset_search_scratch();
        self.planner.clear_path();
        self.driver.reset();
    }

    /// Returns the agent to its starting cell and clears all counters.
    /// Discovered terrain is kept.
    pub fn reset_to_start(&mut self) {
        self.grid.reset_agent();
        self.planner.clear_path();
        self.planner.reset_statistics();
        self.driver.reset();
    }

    pub fn reset_statistics(&mut self) {
        self.planner.reset_statistics();
    }

    pub fn path(&self) -> &[Position] {
        self.planner.path()
    }

    pub fn target_reachable(&self) -> bool {
        self.planner.target_reachable()
    }

    pub fn searched(&self) -> bool {
        self.planner.searched()
    }

    pub fn nodes_expanded(&self) -> usize {
        self.planner.stats().nodes_expanded
    }

    pub fn search_duration(&self) -> Duration {
        self.planner.stats().search_duration
    }

    pub fn search_duration_ms(&self) -> f64 {
        self.planner.stats().search_duration_ms()
    }

    pub fn search_stats(&self) -> &SearchStats {
        self.planner.stats()
    }

    pub fn grid(&self) -> &GridWorld {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridWorld {
        &mut self.grid
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    pub fn render(&self) -> String {
        self.grid.render_ascii(self.planner.path())
    }

    /// Drives the agent until it arrives or gives up, then reports.
    pub fn run(&mut self) -> Statistics {
        self.drive_to_completion(false);
        self.report()
    }

    pub fn report(&self) -> Statistics {
        let mut stats = Statistics {
            variant: self.planner.variant(),
            tie_break: self.planner.tie_break(),
            outcome: self.driver.state(),
            total_moves: self.grid.agent().total_moves(),
            replans: self.driver.replans(),
            optimal_path_length: optimal_path_length(
                &self.grid,
                self.grid.initial_agent(),
                self.grid.target_position(),
            ),
            route_efficiency: 0.0,
            search: self.planner.stats().clone(),
        };
        stats.calculate_efficiency();
        stats
    }
}

fn animation_observer(
    animator: &mut Option<Box<dyn ExpansionObserver>>,
    animated: bool,
) -> Option<&mut dyn ExpansionObserver> {
    match animator {
        Some(animator) if animated => Some(animator.as_mut() as &mut dyn ExpansionObserver),
        _ => None,
    }
}

/// Length in moves of the shortest route between two cells over the terrain
/// discovered so far, treating unrevealed cells as open.
pub fn optimal_path_length(grid: &GridWorld, from: Position, to: Position) -> Option<usize> {
    let no_exclusions = Default::default();
    astar(
        &from,
        |p| {
            grid.neighbors(*p, &no_exclusions)
                .into_iter()
                .filter(|neighbor| !grid.is_wall(*neighbor))
                .map(|successor| (successor, 1))
                .collect::<Vec<_>>()
        },
        |p| grid.heuristic(*p, to),
        |p| *p == to,
    )
    .map(|(_, cost)| cost as usize)
}
