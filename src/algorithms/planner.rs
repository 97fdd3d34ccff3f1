use crate::algorithms::a_star::AStarSearch;
use crate::algorithms::common::{ExpansionObserver, SearchVariant, TieBreak};
use crate::grid::{GridWorld, Position};
use crate::statistics::SearchStats;
use log::{debug, info};

/// What a presentation layer gets back from one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    /// Agent first, target last. Empty when the target is unreachable.
    pub path: Vec<Position>,
    pub reachable: bool,
}

/// Picks the search direction for the configured variant and keeps the
/// current path, the reachability verdict and the running search counters.
pub struct Planner {
    variant: SearchVariant,
    tie_break: TieBreak,
    path: Vec<Position>,
    target_reachable: bool,
    searched: bool,
    stats: SearchStats,
}

impl Planner {
    pub fn new(variant: SearchVariant, tie_break: TieBreak) -> Self {
        Planner {
            variant,
            tie_break,
            path: Vec::new(),
            target_reachable: true,
            searched: false,
            stats: SearchStats::default(),
        }
    }

    pub fn variant(&self) -> SearchVariant {
        self.variant
    }

    pub fn set_variant(&mut self, variant: SearchVariant) {
        self.variant = variant;
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    pub fn set_tie_break(&mut self, tie_break: TieBreak) {
        self.tie_break = tie_break;
    }

    /// Searches between the agent and the target and stores the resulting
    /// path, oriented agent to target whatever the search direction.
    pub fn plan(
        &mut self,
        grid: &mut GridWorld,
        observer: Option<&mut dyn ExpansionObserver>,
    ) -> SearchReport {
        let agent = grid.agent_position();
        let target = grid.target_position();
        let backward = self.variant.is_backward();
        let (source, destination) = if backward {
            (target, agent)
        } else {
            (agent, target)
        };

        debug!(
            "{} search #{} ({} tie-break) from {} to {}",
            self.variant,
            self.stats.searches + 1,
            self.tie_break,
            source,
            destination
        );
        let search = AStarSearch::new(self.tie_break, self.variant.is_adaptive());
        let outcome = search.run(grid, source, destination, observer);
        self.stats.record(&outcome);
        self.searched = true;

        if outcome.is_found() {
            let mut path = outcome.path;
            // raw paths run destination -> source
            if !backward {
                path.reverse();
            }
            self.path = path;
            self.target_reachable = true;
        } else {
            info!("target {} unreachable from {}", target, agent);
            self.path.clear();
            self.target_reachable = false;
        }

        SearchReport {
            path: self.path.clone(),
            reachable: self.target_reachable,
        }
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn target_reachable(&self) -> bool {
        self.target_reachable
    }

    pub fn mark_unreachable(&mut self) {
        self.target_reachable = false;
    }

    pub fn searched(&self) -> bool {
        self.searched
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn reset_statistics(&mut self) {
        self.stats = SearchStats::default();
    }

    /// Forgets the current path and verdict. Counters are kept.
    pub fn clear_path(&mut self) {
        self.path.clear();
        self.target_reachable = true;
        self.searched = false;
    }
}
