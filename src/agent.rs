use crate::grid::Position;

/// The walker being navigated across the grid.
#[derive(Debug, Clone)]
pub struct Agent {
    pub position: Position,
    /// Every cell stepped into since the last reset, in order.
    pub trail: Vec<Position>,
}

impl Agent {
    pub fn new(start_pos: Position) -> Self {
        Agent {
            position: start_pos,
            trail: Vec::new(),
        }
    }

    /// Moves the agent. Stepping onto the cell it already occupies is not a move.
    pub fn move_to(&mut self, new_pos: Position) {
        if new_pos != self.position {
            self.trail.push(new_pos);
        }
        self.position = new_pos;
    }

    pub fn total_moves(&self) -> usize {
        self.trail.len()
    }

    pub fn reset(&mut self, start_pos: Position) {
        self.position = start_pos;
        self.trail.clear();
    }
}
