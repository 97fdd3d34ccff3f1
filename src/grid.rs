use crate::agent::Agent;
use crate::error::SimulationError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use std::fmt;

/// Cost value standing in for "not reached yet".
pub const INFINITE_COST: u32 = u32::MAX;

/// Chance that a freshly revealed cell turns out to be a wall.
pub const DEFAULT_WALL_PROBABILITY: f64 = 0.30;

/// Index of a cell inside the grid's cell storage.
pub type CellId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    pub fn manhattan_distance(&self, other: &Position) -> u32 {
        let distance = self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y));
        u32::try_from(distance).unwrap_or(u32::MAX)
    }
}

/// Formats as the `"x,y"` key that identifies a cell.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// One grid square.
///
/// `is_wall` and `is_revealed` persist for the lifetime of the grid. The cost
/// fields and `parent` are scratch space owned by the search currently running.
#[derive(Debug, Clone)]
pub struct Cell {
    pub position: Position,
    pub is_wall: bool,
    pub is_revealed: bool,
    /// g
    pub cost_from_start: u32,
    /// h
    pub heuristic_to_goal: u32,
    /// f = g + h
    pub total_cost: u32,
    pub parent: Option<CellId>,
}

impl Cell {
    fn new(position: Position) -> Self {
        Cell {
            position,
            is_wall: false,
            is_revealed: false,
            cost_from_start: INFINITE_COST,
            heuristic_to_goal: 0,
            total_cost: INFINITE_COST,
            parent: None,
        }
    }

    fn reset_scratch(&mut self) {
        self.heuristic_to_goal = 0;
        self.cost_from_start = INFINITE_COST;
        self.total_cost = INFINITE_COST;
        self.parent = None;
    }
}

/// Read-only view of the grid for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    pub walls: Vec<Position>,
    pub agent: Position,
    pub target: Position,
    pub trail: Vec<Position>,
}

/// The world the agent explores: a fixed `width x height` arena of cells,
/// terrain that is rolled lazily as the agent reveals it, and the
/// agent/target pair.
pub struct GridWorld {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    agent: Agent,
    target: Position,
    initial_agent: Position,
    initial_target: Position,
    wall_probability: f64,
    rng: StdRng,
}

impl GridWorld {
    /// Builds the grid and reveals the agent's immediate surroundings as open
    /// ground, so the agent never starts boxed in.
    pub fn new(
        width: usize,
        height: usize,
        start: Position,
        target: Position,
        seed: Option<u64>,
    ) -> Result<Self, SimulationError> {
        if width == 0 || height == 0 {
            return Err(SimulationError::EmptyGrid { width, height });
        }
        for (what, position) in [("start", start), ("target", target)] {
            if position.x >= width || position.y >= height {
                return Err(SimulationError::OutOfBounds {
                    what,
                    position,
                    width,
                    height,
                });
            }
        }

        let rng = if let Some(seed) = seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(Position { x, y })))
            .collect();

        let mut grid = GridWorld {
            width,
            height,
            cells,
            agent: Agent::new(start),
            target,
            initial_agent: start,
            initial_target: target,
            wall_probability: DEFAULT_WALL_PROBABILITY,
            rng,
        };

        grid.cell_mut(start).is_revealed = true;
        for neighbor in grid.adjacent(start).collect::<Vec<_>>() {
            let cell = grid.cell_mut(neighbor);
            cell.is_revealed = true;
            cell.is_wall = false;
        }

        Ok(grid)
    }

    pub fn set_wall_probability(&mut self, probability: f64) -> Result<(), SimulationError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(SimulationError::InvalidWallProbability(probability));
        }
        self.wall_probability = probability;
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn agent_position(&self) -> Position {
        self.agent.position
    }

    pub fn target_position(&self) -> Position {
        self.target
    }

    pub fn initial_agent(&self) -> Position {
        self.initial_agent
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Panics if `pos` is outside the grid.
    pub fn cell_id(&self, pos: Position) -> CellId {
        assert!(
            self.in_bounds(pos),
            "{} is outside the {}x{} grid",
            pos,
            self.width,
            self.height
        );
        pos.y * self.width + pos.x
    }

    /// Panics if `pos` is outside the grid.
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[self.cell_id(pos)]
    }

    pub fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        let id = self.cell_id(pos);
        &mut self.cells[id]
    }

    pub fn cell_by_id(&self, id: CellId) -> &Cell {
        &self.cells[id]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.cell(pos).is_wall
    }

    /// In-bounds orthogonal neighbors in the fixed order left, right, up, down.
    fn adjacent(&self, pos: Position) -> impl Iterator<Item = Position> {
        let (width, height) = (self.width, self.height);
        let left = (pos.x > 0).then(|| Position::new(pos.x - 1, pos.y));
        let right = (pos.x + 1 < width).then(|| Position::new(pos.x + 1, pos.y));
        let up = (pos.y > 0).then(|| Position::new(pos.x, pos.y - 1));
        let down = (pos.y + 1 < height).then(|| Position::new(pos.x, pos.y + 1));
        [left, right, up, down].into_iter().flatten()
    }

    /// Orthogonal neighbors of `pos` (left, right, up, down) that are not in `exclude`.
    pub fn neighbors(&self, pos: Position, exclude: &FxHashSet<Position>) -> Vec<Position> {
        self.adjacent(pos)
            .filter(|neighbor| !exclude.contains(neighbor))
            .collect()
    }

    /// Manhattan distance. Admissible and consistent on a 4-connected unit-cost grid.
    pub fn heuristic(&self, a: Position, b: Position) -> u32 {
        a.manhattan_distance(&b)
    }

    /// Reveals the unrevealed neighbors of `pos`, rolling their terrain.
    /// The agent's and target's cells are never turned into walls, and a cell
    /// is rolled at most once.
    pub fn reveal_around(&mut self, pos: Position) {
        let agent = self.agent.position;
        let target = self.target;
        for neighbor in self.adjacent(pos).collect::<Vec<_>>() {
            if self.cell(neighbor).is_revealed {
                continue;
            }
            let is_wall = neighbor != agent
                && neighbor != target
                && self.rng.gen_bool(self.wall_probability);
            let cell = self.cell_mut(neighbor);
            cell.is_revealed = true;
            cell.is_wall = is_wall;
        }
    }

    /// Clears every cell's search scratch. Terrain is left alone.
    pub fn reset_search_scratch(&mut self) {
        for cell in &mut self.cells {
            cell.reset_scratch();
        }
    }

    pub fn move_agent_to(&mut self, pos: Position) {
        self.agent.move_to(pos);
        self.reveal_around(pos);
    }

    /// Puts agent and target back on their initial cells, keeping discovered terrain.
    pub fn reset_agent(&mut self) {
        self.agent.reset(self.initial_agent);
        self.target = self.initial_target;
        self.reset_search_scratch();
    }

    /// Forces the terrain of a cell and marks it revealed.
    /// Panics if `pos` is outside the grid.
    pub fn set_wall(&mut self, pos: Position, wall: bool) {
        let cell = self.cell_mut(pos);
        cell.is_revealed = true;
        cell.is_wall = wall;
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            width: self.width,
            height: self.height,
            walls: self
                .cells
                .iter()
                .filter(|cell| cell.is_wall)
                .map(|cell| cell.position)
                .collect(),
            agent: self.agent.position,
            target: self.target,
            trail: self.agent.trail.clone(),
        }
    }

    /// Text rendering of the known world with `path` overlaid.
    pub fn render_ascii(&self, path: &[Position]) -> String {
        self.render_with(|pos| path.contains(&pos).then_some('*'))
    }

    /// Renders the grid, letting `overlay` pick a glyph for cells that are not
    /// the agent, the target or a wall.
    pub fn render_with<F>(&self, overlay: F) -> String
    where
        F: Fn(Position) -> Option<char>,
    {
        let mut out = String::new();
        out.push_str("Legend: A=Agent, T=Target, #=Wall, *=Path, .=Open, ?=Unknown\n");

        out.push_str("   ");
        for x in 0..self.width {
            out.push_str(&format!("{:2}", x % 10));
        }
        out.push('\n');

        for y in 0..self.height {
            out.push_str(&format!("{:2} ", y));
            for x in 0..self.width {
                let pos = Position { x, y };
                let cell = self.cell(pos);
                let glyph = if pos == self.agent.position {
                    'A'
                } else if pos == self.target {
                    'T'
                } else if cell.is_wall {
                    '#'
                } else if let Some(glyph) = overlay(pos) {
                    glyph
                } else if cell.is_revealed {
                    '.'
                } else {
                    '?'
                };
                out.push(' ');
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}
