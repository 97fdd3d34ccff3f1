use crate::algorithms::common::{SearchVariant, TieBreak};
use crate::grid::{Position, DEFAULT_WALL_PROBABILITY};
use crate::simulation::SimulationSettings;
use clap::Parser;
use rand::Rng;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 40)]
    pub width: usize,

    #[arg(long, default_value_t = 40)]
    pub height: usize,

    /// Start cell; random when omitted
    #[arg(long, requires = "start_y")]
    pub start_x: Option<usize>,

    #[arg(long, requires = "start_x")]
    pub start_y: Option<usize>,

    /// Target cell; random when omitted
    #[arg(long, requires = "target_y")]
    pub target_x: Option<usize>,

    #[arg(long, requires = "target_x")]
    pub target_y: Option<usize>,

    #[arg(long, value_enum, default_value_t = SearchVariant::Forward)]
    pub algorithm: SearchVariant,

    #[arg(long, value_enum, default_value_t = TieBreak::PreferHigherCost)]
    pub tie_break: TieBreak,

    /// Chance that a newly revealed cell is a wall
    #[arg(long, default_value_t = DEFAULT_WALL_PROBABILITY)]
    pub wall_probability: f64,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Render every expansion of the searches
    #[arg(long, default_value_t = false)]
    pub animate: bool,

    #[arg(long, default_value_t = 5)]
    pub search_delay_ms: u64,

    /// Pause between agent steps when visualizing
    #[arg(long, default_value_t = 20)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    #[arg(long, default_value_t = false)]
    pub batch_mode: bool,

    #[arg(long, default_value_t = 50)]
    pub num_simulations: usize,

    /// Run every search variant on the same endpoints
    #[arg(long, default_value_t = false)]
    pub compare_all: bool,

    #[arg(long, default_value = "batch_results.csv")]
    pub output_file: String,
}

impl Config {
    pub fn settings(&self) -> SimulationSettings {
        SimulationSettings {
            variant: self.algorithm,
            tie_break: self.tie_break,
            wall_probability: self.wall_probability,
            seed: self.seed,
        }
    }

    /// Start and target from the command line, with omitted ones drawn from `rng`.
    pub fn endpoints<R: Rng>(&self, rng: &mut R) -> (Position, Position) {
        let start = match (self.start_x, self.start_y) {
            (Some(x), Some(y)) => Position { x, y },
            _ => self.random_position(rng),
        };
        let target = match (self.target_x, self.target_y) {
            (Some(x), Some(y)) => Position { x, y },
            _ => self.random_position(rng),
        };
        (start, target)
    }

    pub fn random_position<R: Rng>(&self, rng: &mut R) -> Position {
        Position {
            x: rng.gen_range(0..self.width.max(1)),
            y: rng.gen_range(0..self.height.max(1)),
        }
    }
}
