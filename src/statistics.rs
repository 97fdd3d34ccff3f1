use crate::algorithms::a_star::SearchOutcome;
use crate::algorithms::common::{SearchVariant, TieBreak};
use crate::navigation::DriverState;
use std::fmt;
use std::time::Duration;

/// Counters accumulated over every search a planner has run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub search_duration: Duration,
    pub searches: usize,
}

impl SearchStats {
    pub fn record(&mut self, outcome: &SearchOutcome) {
        self.nodes_expanded += outcome.nodes_expanded;
        self.search_duration += outcome.duration;
        self.searches += 1;
    }

    pub fn search_duration_ms(&self) -> f64 {
        self.search_duration.as_secs_f64() * 1000.0
    }

    pub fn average_search_time(&self) -> Duration {
        match u32::try_from(self.searches) {
            Ok(0) => Duration::ZERO,
            Ok(searches) => self.search_duration / searches,
            Err(_) => self.search_duration.div_f64(self.searches as f64),
        }
    }
}

/// End-of-run report for one simulation.
#[derive(Debug, Clone)]
pub struct Statistics {
    pub variant: SearchVariant,
    pub tie_break: TieBreak,
    pub outcome: DriverState,
    pub total_moves: usize,
    pub replans: usize,
    /// Shortest route from the start over the terrain known at the end of the run.
    pub optimal_path_length: Option<usize>,
    pub route_efficiency: f64,
    pub search: SearchStats,
}

impl Statistics {
    pub fn calculate_efficiency(&mut self) {
        self.route_efficiency = match self.optimal_path_length {
            Some(optimal) if self.total_moves > 0 && optimal > 0 => {
                self.total_moves as f64 / optimal as f64
            }
            _ => 0.0,
        };
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {} (tie-break: {})", self.variant, self.tie_break)?;
        writeln!(f, "Outcome: {:?}", self.outcome)?;
        writeln!(f, "Total Moves: {}", self.total_moves)?;
        writeln!(f, "Replans: {}", self.replans)?;
        match self.optimal_path_length {
            Some(optimal) => writeln!(f, "Optimal Path Length (known terrain): {}", optimal)?,
            None => writeln!(f, "Optimal Path Length (known terrain): none")?,
        }
        if self.route_efficiency > 0.0 {
            writeln!(f, "Route Efficiency: {:.3}", self.route_efficiency)?;
        }
        writeln!(f, "Searches: {}", self.search.searches)?;
        writeln!(f, "Nodes Expanded: {}", self.search.nodes_expanded)?;
        writeln!(f, "Search Duration: {:.3}ms", self.search.search_duration_ms())?;
        write!(f, "Average Search Time: {:.2?}", self.search.average_search_time())
    }
}
