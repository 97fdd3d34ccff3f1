use crate::algorithms::common::ExpansionObserver;
use crate::algorithms::planner::Planner;
use crate::grid::GridWorld;
use log::{debug, info, warn};

/// Upper bound on driver iterations (moves plus replans) before giving up.
pub const MAX_NAVIGATION_ITERATIONS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    /// No step taken yet.
    #[default]
    Idle,
    Running,
    Reached,
    Unreachable,
    /// Ran out of iterations; counts as unreachable.
    GuardExhausted,
}

impl DriverState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DriverState::Reached | DriverState::Unreachable | DriverState::GuardExhausted
        )
    }

    pub fn is_success(&self) -> bool {
        *self == DriverState::Reached
    }
}

/// Walks the agent along the planner's path, replanning whenever the next
/// cell turns out to be a wall.
#[derive(Debug, Clone, Default)]
pub struct NavigationDriver {
    cursor: usize,
    iterations: usize,
    replans: usize,
    state: DriverState,
}

impl NavigationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn replans(&self) -> usize {
        self.replans
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Points the driver at the start of a freshly planned path.
    pub fn restart_path(&mut self) {
        self.cursor = 0;
    }

    /// Advances the navigation by one iteration. The first call only runs the
    /// initial search, or adopts the planner's path if it already has one;
    /// later calls either move the agent one cell or replan.
    pub fn step(
        &mut self,
        grid: &mut GridWorld,
        planner: &mut Planner,
        observer: Option<&mut dyn ExpansionObserver>,
    ) -> DriverState {
        if self.state.is_terminal() {
            return self.state;
        }

        if self.state == DriverState::Idle {
            if !planner.searched() {
                planner.plan(grid, observer);
            }
            self.cursor = 0;
            return self.settle(grid, planner);
        }

        if self.iterations > MAX_NAVIGATION_ITERATIONS {
            warn!(
                "giving up after {} iterations at {}",
                self.iterations,
                grid.agent_position()
            );
            planner.mark_unreachable();
            self.state = DriverState::GuardExhausted;
            return self.state;
        }

        match planner.path().get(self.cursor).copied() {
            Some(next) if !grid.is_wall(next) => {
                grid.move_agent_to(next);
                self.cursor += 1;
            }
            next => {
                self.replans += 1;
                debug!(
                    "replanning from {} ({})",
                    grid.agent_position(),
                    match next {
                        Some(blocked) => format!("{} is a wall", blocked),
                        None => "path exhausted".to_string(),
                    }
                );
                planner.plan(grid, observer);
                self.cursor = 0;
            }
        }
        self.iterations += 1;

        self.settle(grid, planner)
    }

    fn settle(&mut self, grid: &GridWorld, planner: &Planner) -> DriverState {
        self.state = if grid.agent_position() == grid.target_position() {
            info!(
                "reached {} after {} iterations",
                grid.target_position(),
                self.iterations
            );
            DriverState::Reached
        } else if planner.path().is_empty() || !planner.target_reachable() {
            DriverState::Unreachable
        } else {
            DriverState::Running
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::common::{SearchVariant, TieBreak};
    use crate::grid::Position;

    fn drive(grid: &mut GridWorld, planner: &mut Planner) -> (NavigationDriver, DriverState) {
        let mut driver = NavigationDriver::new();
        loop {
            let state = driver.step(grid, planner, None);
            if state.is_terminal() {
                return (driver, state);
            }
        }
    }

    #[test]
    fn open_terrain_walks_straight_to_target() {
        let start = Position::new(0, 0);
        let target = Position::new(4, 4);
        let mut grid = GridWorld::new(5, 5, start, target, Some(11)).unwrap();
        grid.set_wall_probability(0.0).unwrap();
        let mut planner = Planner::new(SearchVariant::Forward, TieBreak::PreferHigherCost);

        let (driver, state) = drive(&mut grid, &mut planner);
        assert_eq!(state, DriverState::Reached);
        assert_eq!(grid.agent_position(), target);
        assert_eq!(grid.agent().total_moves(), 8);
        assert_eq!(driver.replans(), 0);
    }

    #[test]
    fn walled_in_target_is_unreachable() {
        let start = Position::new(0, 0);
        let target = Position::new(5, 5);
        let mut grid = GridWorld::new(8, 8, start, target, Some(5)).unwrap();
        for pos in [(4, 5), (6, 5), (5, 4), (5, 6)] {
            grid.set_wall(Position::new(pos.0, pos.1), true);
        }
        let mut planner = Planner::new(SearchVariant::Backward, TieBreak::NoPreference);

        let (driver, state) = drive(&mut grid, &mut planner);
        assert_eq!(state, DriverState::Unreachable);
        assert!(!planner.target_reachable());
        assert!(driver.iterations() <= MAX_NAVIGATION_ITERATIONS + 1);
    }

    #[test]
    fn target_enclosed_once_discovered() {
        // terrain beyond the start is all wall, so the agent learns the
        // target is cut off only by walking into the fog
        let start = Position::new(0, 0);
        let target = Position::new(6, 0);
        let mut grid = GridWorld::new(7, 3, start, target, Some(9)).unwrap();
        grid.set_wall_probability(1.0).unwrap();
        let mut planner = Planner::new(SearchVariant::Forward, TieBreak::PreferLowerCost);

        let (driver, state) = drive(&mut grid, &mut planner);
        assert_eq!(state, DriverState::Unreachable);
        assert!(driver.replans() >= 1);
        assert!(grid.agent().total_moves() >= 1);
    }

    #[test]
    fn replans_when_next_step_is_blocked() {
        let start = Position::new(0, 1);
        let target = Position::new(4, 1);
        let mut grid = GridWorld::new(5, 3, start, target, Some(2)).unwrap();
        grid.set_wall_probability(0.0).unwrap();
        let mut planner = Planner::new(SearchVariant::Forward, TieBreak::PreferHigherCost);
        let mut driver = NavigationDriver::new();

        assert_eq!(driver.step(&mut grid, &mut planner, None), DriverState::Running);
        let planned: Vec<Position> = planner.path().to_vec();
        // block a cell on the plan the agent has not reached yet
        let blocked = planned[3];
        grid.set_wall(blocked, true);

        let mut state = DriverState::Running;
        while !state.is_terminal() {
            state = driver.step(&mut grid, &mut planner, None);
        }
        assert_eq!(state, DriverState::Reached);
        assert!(driver.replans() >= 1);
        assert!(!grid.agent().trail.contains(&blocked));
    }

    #[test]
    fn terminal_state_is_sticky() {
        let here = Position::new(1, 1);
        let mut grid = GridWorld::new(3, 3, here, here, Some(0)).unwrap();
        let mut planner = Planner::new(SearchVariant::AdaptiveForward, TieBreak::PreferHigherCost);
        let mut driver = NavigationDriver::new();
        assert_eq!(driver.step(&mut grid, &mut planner, None), DriverState::Reached);
        assert_eq!(driver.step(&mut grid, &mut planner, None), DriverState::Reached);
        assert_eq!(driver.iterations(), 0);
    }

    #[test]
    fn first_step_adopts_an_existing_plan() {
        let start = Position::new(0, 0);
        let target = Position::new(3, 2);
        let mut grid = GridWorld::new(4, 3, start, target, Some(6)).unwrap();
        grid.set_wall_probability(0.0).unwrap();
        let mut planner = Planner::new(SearchVariant::Forward, TieBreak::PreferHigherCost);
        planner.plan(&mut grid, None);
        let planned = planner.path().to_vec();

        let mut driver = NavigationDriver::new();
        assert_eq!(driver.step(&mut grid, &mut planner, None), DriverState::Running);
        assert_eq!(planner.stats().searches, 1);
        assert_eq!(planner.path(), &planned[..]);
    }

    #[test]
    fn exhausted_guard_gives_up_on_the_target() {
        let start = Position::new(0, 0);
        let target = Position::new(4, 0);
        let mut grid = GridWorld::new(5, 2, start, target, Some(3)).unwrap();
        grid.set_wall_probability(0.0).unwrap();
        let mut planner = Planner::new(SearchVariant::Forward, TieBreak::PreferHigherCost);
        planner.plan(&mut grid, None);
        assert!(!planner.path().is_empty());

        let mut driver = NavigationDriver {
            cursor: 1,
            iterations: MAX_NAVIGATION_ITERATIONS + 1,
            replans: 0,
            state: DriverState::Running,
        };
        assert_eq!(
            driver.step(&mut grid, &mut planner, None),
            DriverState::GuardExhausted
        );
        assert!(!planner.target_reachable());
        assert_eq!(grid.agent_position(), start);
        assert!(!driver.state().is_success());
        assert_eq!(
            driver.step(&mut grid, &mut planner, None),
            DriverState::GuardExhausted
        );
    }
}
