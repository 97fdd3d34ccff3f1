use crate::algorithms::common::SearchVariant;
use crate::config::Config;
use crate::error::SimulationError;
use crate::grid::Position;
use crate::navigation::DriverState;
use crate::simulation::Simulation;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::time::{Duration, Instant};

const CSV_HEADER: &str = "simulation_id,algorithm,tie_break,width,height,start_x,start_y,target_x,target_y,outcome,reached,total_moves,replans,searches,nodes_expanded,search_duration_ms,execution_time_ms";

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub simulation_id: usize,
    pub variant: SearchVariant,
    pub start: Position,
    pub target: Position,
    pub outcome: DriverState,
    pub total_moves: usize,
    pub replans: usize,
    pub searches: usize,
    pub nodes_expanded: usize,
    pub search_duration: Duration,
    pub execution_time: Duration,
}

/// Totals over a set of runs of one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub variant: SearchVariant,
    pub simulations: usize,
    pub reached: usize,
    pub nodes_expanded: usize,
    pub search_duration: Duration,
    pub total_moves: usize,
}

impl BatchSummary {
    pub fn success_rate(&self) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.reached as f64 / self.simulations as f64 * 100.0
        }
    }
}

/// Runs many independent grids with random endpoints and logs each run as a
/// CSV row.
pub struct BatchSimulation {
    config: Config,
    results: Vec<BatchResult>,
    pending: usize,
    batch_size: usize,
    total_results_written: usize,
    start_time: Instant,
}

impl BatchSimulation {
    pub fn new(config: Config) -> Self {
        BatchSimulation {
            config,
            results: Vec::new(),
            pending: 0,
            batch_size: 100,
            total_results_written: 0,
            start_time: Instant::now(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    fn variants(&self) -> Vec<SearchVariant> {
        if self.config.compare_all {
            SearchVariant::all().to_vec()
        } else {
            vec![self.config.algorithm]
        }
    }

    pub fn run(&mut self) -> Result<(), SimulationError> {
        self.initialize_csv_file()?;

        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        let mut endpoint_rng = StdRng::seed_from_u64(base_seed);
        let variants = self.variants();
        info!(
            "batch of {} simulations x {} variants, seed {}",
            self.config.num_simulations,
            variants.len(),
            base_seed
        );

        for simulation_id in 0..self.config.num_simulations {
            let (start, target) = self.config.endpoints(&mut endpoint_rng);
            for &variant in &variants {
                let mut settings = self.config.settings();
                settings.variant = variant;
                settings.seed = Some(base_seed.wrapping_add(simulation_id as u64));

                let run_start = Instant::now();
                let mut simulation = Simulation::new(
                    start,
                    target,
                    self.config.width,
                    self.config.height,
                    settings,
                )?;
                let stats = simulation.run();
                debug!(
                    "simulation {} ({}): {:?} after {} moves",
                    simulation_id, variant, stats.outcome, stats.total_moves
                );

                self.results.push(BatchResult {
                    simulation_id,
                    variant,
                    start,
                    target,
                    outcome: stats.outcome,
                    total_moves: stats.total_moves,
                    replans: stats.replans,
                    searches: stats.search.searches,
                    nodes_expanded: stats.search.nodes_expanded,
                    search_duration: stats.search.search_duration,
                    execution_time: run_start.elapsed(),
                });
                self.pending += 1;
            }

            if self.pending >= self.batch_size {
                self.flush_results_to_csv()?;
            }
        }

        self.flush_results_to_csv()?;
        info!(
            "batch finished: {} results in {:.2?} -> {}",
            self.results.len(),
            self.start_time.elapsed(),
            self.config.output_file
        );
        Ok(())
    }

    fn initialize_csv_file(&self) -> Result<(), SimulationError> {
        let mut file = File::create(&self.config.output_file)?;
        writeln!(file, "{}", CSV_HEADER)?;
        Ok(())
    }

    /// Appends every result not yet written to the output file.
    fn flush_results_to_csv(&mut self) -> Result<(), SimulationError> {
        if self.pending == 0 {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.output_file)?;

        let unwritten = &self.results[self.results.len() - self.pending..];
        for result in unwritten {
            writeln!(
                file,
                "{},{},{},{},{},{},{},{},{},{:?},{},{},{},{},{},{:.3},{}",
                result.simulation_id,
                result.variant,
                self.config.tie_break,
                self.config.width,
                self.config.height,
                result.start.x,
                result.start.y,
                result.target.x,
                result.target.y,
                result.outcome,
                result.outcome.is_success(),
                result.total_moves,
                result.replans,
                result.searches,
                result.nodes_expanded,
                result.search_duration.as_secs_f64() * 1000.0,
                result.execution_time.as_millis()
            )?;
        }

        self.total_results_written += self.pending;
        debug!(
            "flushed {} results to CSV (total: {})",
            self.pending, self.total_results_written
        );
        self.pending = 0;
        Ok(())
    }

    /// Per-variant totals, in the order variants were run.
    pub fn summaries(&self) -> Vec<BatchSummary> {
        self.variants()
            .into_iter()
            .map(|variant| {
                let runs = self.results.iter().filter(|r| r.variant == variant);
                runs.fold(
                    BatchSummary {
                        variant,
                        simulations: 0,
                        reached: 0,
                        nodes_expanded: 0,
                        search_duration: Duration::ZERO,
                        total_moves: 0,
                    },
                    |mut acc, r| {
                        acc.simulations += 1;
                        acc.reached += usize::from(r.outcome.is_success());
                        acc.nodes_expanded += r.nodes_expanded;
                        acc.search_duration += r.search_duration;
                        acc.total_moves += r.total_moves;
                        acc
                    },
                )
            })
            .collect()
    }

    pub fn print_summary(&self) {
        if self.results.is_empty() {
            println!("No results to summarize.");
            return;
        }

        println!("\n=== BATCH SIMULATION SUMMARY ===");
        println!(
            "{:<18} {:<10} {:<16} {:<14} {:<12}",
            "Algorithm", "Reached", "Nodes Expanded", "Search Time", "Moves"
        );
        println!("{}", "-".repeat(74));
        for summary in self.summaries() {
            println!(
                "{:<18} {:<10} {:<16} {:<14} {:<12}",
                summary.variant.to_string(),
                format!("{}/{}", summary.reached, summary.simulations),
                summary.nodes_expanded,
                format!("{:.2?}", summary.search_duration),
                summary.total_moves
            );
        }
        println!("Results saved to: {}", self.config.output_file);
    }
}
