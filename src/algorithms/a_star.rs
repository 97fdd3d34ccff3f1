use crate::algorithms::common::{ExpansionObserver, ExpansionView, TieBreak};
use crate::algorithms::priority_queue::OpenQueue;
use crate::grid::{GridWorld, Position};
use log::{debug, trace};
use rustc_hash::FxHashSet;
use std::time::{Duration, Instant};

/// Lifecycle of a single search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Initialized,
    Expanding,
    /// The destination was expanded and a path reconstructed.
    Found,
    /// The open queue ran dry before reaching the destination.
    Exhausted,
}

impl SearchPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchPhase::Found | SearchPhase::Exhausted)
    }
}

/// Result of one finished search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Destination first, source last. Empty when the destination is unreachable.
    pub path: Vec<Position>,
    pub phase: SearchPhase,
    /// Closed cells plus whatever was still queued when the run ended.
    pub nodes_expanded: usize,
    pub duration: Duration,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        self.phase == SearchPhase::Found
    }
}

/// One A* run over a [`GridWorld`], advanced an expansion at a time.
///
/// The cost from start of a cell is its heuristic distance from the source
/// rather than an accumulated edge cost, and a cell's parent is overwritten by
/// every expansion that touches it until the cell itself is closed. Parents
/// are always closed cells, so the parent chain cannot cycle.
pub struct SearchRun<'g> {
    grid: &'g mut GridWorld,
    source: Position,
    destination: Position,
    open: OpenQueue,
    closed: FxHashSet<Position>,
    phase: SearchPhase,
    path: Vec<Position>,
    last_expanded: Option<Position>,
    started: Instant,
}

impl<'g> SearchRun<'g> {
    /// Seeds the run with `source`. Unless `adaptive`, every cell's scratch is
    /// cleared first; adaptive runs keep what earlier runs left behind.
    pub fn new(
        grid: &'g mut GridWorld,
        source: Position,
        destination: Position,
        tie_break: TieBreak,
        adaptive: bool,
    ) -> Self {
        let started = Instant::now();
        if !adaptive {
            grid.reset_search_scratch();
        }

        let h = grid.heuristic(source, destination);
        let cell = grid.cell_mut(source);
        cell.parent = None;
        cell.cost_from_start = 0;
        cell.heuristic_to_goal = h;
        cell.total_cost = h;

        let mut open = OpenQueue::new(tie_break);
        open.insert(grid.cell(source));

        SearchRun {
            grid,
            source,
            destination,
            open,
            closed: FxHashSet::default(),
            phase: SearchPhase::Initialized,
            path: Vec::new(),
            last_expanded: None,
            started,
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Expands the cheapest open cell. Does nothing once the run is finished.
    pub fn step(&mut self) -> SearchPhase {
        if self.is_finished() {
            return self.phase;
        }
        self.phase = SearchPhase::Expanding;

        let Some(current) = self.open.extract_min() else {
            debug!(
                "open queue exhausted after closing {} cells: {} unreachable from {}",
                self.closed.len(),
                self.destination,
                self.source
            );
            self.phase = SearchPhase::Exhausted;
            return self.phase;
        };
        let current_id = self.grid.cell_id(current);

        for neighbor in self.grid.neighbors(current, &self.closed) {
            if self.grid.cell(neighbor).is_wall {
                continue;
            }
            let h = self.grid.heuristic(neighbor, self.destination);
            let g = self.grid.heuristic(neighbor, self.source);
            let cell = self.grid.cell_mut(neighbor);
            cell.heuristic_to_goal = h;
            cell.cost_from_start = g;
            cell.total_cost = g.saturating_add(h);
            cell.parent = Some(current_id);
            self.open.insert(self.grid.cell(neighbor));
        }

        self.closed.insert(current);
        self.last_expanded = Some(current);
        trace!("expanded {} (open: {})", current, self.open.len());

        if current == self.destination {
            self.path = self.reconstruct_path(current);
            self.phase = SearchPhase::Found;
        }
        self.phase
    }

    /// Follows parent links from `end` back to the source.
    fn reconstruct_path(&self, end: Position) -> Vec<Position> {
        let mut path = vec![end];
        let mut parent = self.grid.cell(end).parent;
        while let Some(id) = parent {
            let cell = self.grid.cell_by_id(id);
            path.push(cell.position);
            parent = cell.parent;
        }
        path
    }

    pub fn view(&self) -> ExpansionView<'_> {
        ExpansionView {
            grid: &*self.grid,
            expanded: self.last_expanded.unwrap_or(self.source),
            open: self.open.positions(),
            closed: self.closed.iter().copied().collect(),
        }
    }

    pub fn finish(self) -> SearchOutcome {
        SearchOutcome {
            nodes_expanded: self.closed.len() + self.open.len(),
            duration: self.started.elapsed(),
            path: self.path,
            phase: self.phase,
        }
    }
}

/// Runs whole searches with a fixed tie-break policy.
#[derive(Debug, Clone, Copy)]
pub struct AStarSearch {
    tie_break: TieBreak,
    adaptive: bool,
}

impl AStarSearch {
    pub fn new(tie_break: TieBreak, adaptive: bool) -> Self {
        AStarSearch {
            tie_break,
            adaptive,
        }
    }

    /// Searches from `source` to `destination`. With an observer, control is
    /// handed to it after every expansion that does not end the run.
    pub fn run(
        &self,
        grid: &mut GridWorld,
        source: Position,
        destination: Position,
        mut observer: Option<&mut dyn ExpansionObserver>,
    ) -> SearchOutcome {
        let mut run = SearchRun::new(grid, source, destination, self.tie_break, self.adaptive);
        while !run.step().is_terminal() {
            if let Some(observer) = observer.as_mut() {
                observer.on_expansion(run.view());
            }
        }
        let outcome = run.finish();
        debug!(
            "search {} -> {}: {:?}, path length {}, {} nodes, {:.2?}",
            source,
            destination,
            outcome.phase,
            outcome.path.len(),
            outcome.nodes_expanded,
            outcome.duration
        );
        outcome
    }
}
