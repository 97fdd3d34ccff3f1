use clap::Parser;

use fog_pathfinding::batch_simulation::BatchSimulation;
use fog_pathfinding::config::Config;
use fog_pathfinding::{ExpansionObserver, ExpansionView, Simulation};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::thread;
use std::time::Duration;

/// Redraws the grid after every search expansion.
struct TerminalAnimator {
    delay: Duration,
}

impl ExpansionObserver for TerminalAnimator {
    fn on_expansion(&mut self, view: ExpansionView<'_>) {
        let frame = view.grid.render_with(|pos| {
            if view.closed.contains(&pos) {
                Some('x')
            } else if view.open.contains(&pos) {
                Some('o')
            } else {
                None
            }
        });
        clear_screen();
        println!(
            "=== SEARCHING === expanded {} | open {} | closed {}",
            view.expanded,
            view.open.len(),
            view.closed.len()
        );
        print!("{}", frame);
        thread::sleep(self.delay);
    }
}

fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

fn main() {
    env_logger::init();
    let config = Config::parse();

    if !config.quiet {
        println!("Starting pathfinding simulation...");
        println!("Grid size: {}x{}", config.width, config.height);
        println!(
            "Algorithm: {} | Tie-break: {} | Wall probability: {:.2}",
            config.algorithm, config.tie_break, config.wall_probability
        );
        if config.no_visualization || config.batch_mode {
            println!("Visualization disabled - running in fast mode");
        } else {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
        }
        println!();
    }

    if config.batch_mode {
        let mut batch = BatchSimulation::new(config.clone());
        match batch.run() {
            Ok(()) => {
                if !config.quiet {
                    batch.print_summary();
                }
            }
            Err(e) => {
                eprintln!("Batch simulation failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (start, target) = config.endpoints(&mut rng);
    let mut simulation =
        match Simulation::new(start, target, config.width, config.height, config.settings()) {
            Ok(simulation) => simulation,
            Err(e) => {
                eprintln!("Failed to create simulation: {}", e);
                std::process::exit(1);
            }
        };

    let visualize = !config.no_visualization;
    let animated = visualize && config.animate;
    if animated {
        simulation.set_animator(Box::new(TerminalAnimator {
            delay: Duration::from_millis(config.search_delay_ms),
        }));
    }

    if visualize {
        let mut step = 0;
        loop {
            let state = simulation.step_with_animation(animated);
            clear_screen();
            println!("=== PATHFINDING SIMULATION ===");
            println!(
                "Step: {} | Agent: {} | Target: {} | State: {:?}",
                step,
                simulation.grid().agent_position(),
                simulation.grid().target_position(),
                state
            );
            print!("{}", simulation.render());
            if state.is_terminal() {
                break;
            }
            step += 1;
            thread::sleep(Duration::from_millis(config.delay_ms));
        }
    } else {
        simulation.drive_to_completion(animated);
    }

    let stats = simulation.report();
    println!("\n=== FINAL RESULTS ===");
    println!("Start: {} | Target: {}", start, target);
    println!("{}", stats);
}
