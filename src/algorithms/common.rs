use crate::grid::{GridWorld, Position};
use clap::ValueEnum;
use std::fmt;

/// How the open queue chooses between cells of equal total cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TieBreak {
    /// Prefer the cell with the larger cost from start.
    #[default]
    #[value(name = "greater")]
    PreferHigherCost,
    /// Prefer the cell with the smaller cost from start.
    #[value(name = "smaller")]
    PreferLowerCost,
    /// Take whichever equal-cost cell was queued first.
    #[value(name = "none")]
    NoPreference,
}

/// Direction of the search and whether heuristic scratch survives between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SearchVariant {
    /// Agent to target.
    #[default]
    Forward,
    /// Target to agent.
    Backward,
    AdaptiveForward,
    AdaptiveBackward,
}

impl SearchVariant {
    pub fn is_adaptive(&self) -> bool {
        matches!(
            self,
            SearchVariant::AdaptiveForward | SearchVariant::AdaptiveBackward
        )
    }

    pub fn is_backward(&self) -> bool {
        matches!(
            self,
            SearchVariant::Backward | SearchVariant::AdaptiveBackward
        )
    }

    pub fn all() -> [SearchVariant; 4] {
        [
            SearchVariant::Forward,
            SearchVariant::Backward,
            SearchVariant::AdaptiveForward,
            SearchVariant::AdaptiveBackward,
        ]
    }
}

impl fmt::Display for SearchVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchVariant::Forward => "forward",
            SearchVariant::Backward => "backward",
            SearchVariant::AdaptiveForward => "adaptive-forward",
            SearchVariant::AdaptiveBackward => "adaptive-backward",
        };
        f.write_str(name)
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TieBreak::PreferHigherCost => "greater",
            TieBreak::PreferLowerCost => "smaller",
            TieBreak::NoPreference => "none",
        };
        f.write_str(name)
    }
}

/// What an observer sees after each expansion of an animated search.
pub struct ExpansionView<'a> {
    pub grid: &'a GridWorld,
    pub expanded: Position,
    pub open: Vec<Position>,
    pub closed: Vec<Position>,
}

/// Yield point for animated searches.
///
/// The search hands control to the observer after every expansion and resumes
/// when it returns, so the expansion order never depends on the observer.
pub trait ExpansionObserver {
    fn on_expansion(&mut self, view: ExpansionView<'_>);
}
