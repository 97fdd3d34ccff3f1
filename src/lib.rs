//! Agent navigation over a fog-of-war grid.
//!
//! The agent only learns whether a cell is a wall once it stands next to it.
//! Unknown cells are assumed open, so a plan can run into newly discovered
//! walls; the [`navigation::NavigationDriver`] then asks the
//! [`algorithms::planner::Planner`] for a fresh A* search from wherever the
//! agent stands.

pub mod agent;
pub mod algorithms;
pub mod batch_simulation;
pub mod config;
pub mod error;
pub mod grid;
pub mod navigation;
pub mod simulation;
pub mod statistics;

pub use algorithms::common::{ExpansionObserver, ExpansionView, SearchVariant, TieBreak};
pub use error::SimulationError;
pub use grid::{GridWorld, Position};
pub use navigation::DriverState;
pub use simulation::{Simulation, SimulationSettings};
