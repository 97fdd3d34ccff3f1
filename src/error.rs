use crate::grid::Position;
use thiserror::Error;

/// Errors raised while setting up or reporting on a simulation.
///
/// An unreachable target is not an error: it is reported through
/// `SearchReport::reachable` and `DriverState::Unreachable`.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("{what} position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        what: &'static str,
        position: Position,
        width: usize,
        height: usize,
    },

    #[error("wall probability must be within [0, 1], got {0}")]
    InvalidWallProbability(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
