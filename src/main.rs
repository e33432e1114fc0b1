//! Reel Sim entry point
//!
//! Headless demo driver: builds a machine from the default (or a JSON)
//! config, runs a few seeded spins at a fixed timestep and prints the final
//! grids. Rendering and input belong to an embedding, not to this binary.

use reel_sim::SlotConfig;
use reel_sim::consts::SIM_DT;
use reel_sim::sim::{Orchestrator, SimEvent, StopCondition};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(s) => match s.parse() {
            Ok(n) => n,
            Err(_) => {
                log::error!("seed must be an unsigned integer, got {s:?}");
                std::process::exit(1);
            }
        },
        None => 0xDEC0DE,
    };

    let config = match args.next() {
        Some(path) => match load_config(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("failed to load config {path}: {e}");
                std::process::exit(1);
            }
        },
        None => SlotConfig::default(),
    };

    let mut machine = match Orchestrator::new(config, seed) {
        Ok(m) => m,
        Err(e) => {
            log::error!("invalid config: {e}");
            std::process::exit(1);
        }
    };

    log::info!("reel-sim starting, seed {seed}");

    let lucky = machine.config().symbols[0].id;
    let demo_spins = [
        ("timed spin", StopCondition::duration(1.0, 0.5)),
        (
            "forced middle-row line",
            StopCondition::middle_row(0.8, 0.3, lucky),
        ),
        (
            "target on any visible row",
            StopCondition::random_visible_row(0.8, 0.3, lucky),
        ),
    ];

    for (label, condition) in demo_spins {
        println!("\n=== {label} ===");
        run_spin(&mut machine, condition);
    }
}

fn load_config(path: &str) -> Result<SlotConfig, String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

/// Drive one full spin cycle to completion, narrating events as they land
fn run_spin(machine: &mut Orchestrator, condition: StopCondition) {
    match machine.spin_all(condition) {
        Ok(true) => {}
        Ok(false) => {
            println!("machine busy, spin ignored");
            return;
        }
        Err(e) => {
            log::error!("spin rejected: {e}");
            return;
        }
    }

    // Generous cap so a pathological config cannot hang the demo
    let max_ticks = (600.0 / SIM_DT) as usize;
    for _ in 0..max_ticks {
        machine.tick(SIM_DT);
        for event in machine.drain_events() {
            match event {
                SimEvent::ReelStopped { reel, symbols } => {
                    println!("reel {reel} stopped: {symbols:?}");
                }
                SimEvent::Evaluated { result } => {
                    println!("{}", if result.won { "WIN!" } else { "no win" });
                }
                SimEvent::ReelStarted { .. } | SimEvent::HighlightsCleared => {}
            }
        }
        if !machine.is_busy() {
            break;
        }
    }

    if let Some(grid) = machine.previous_grid() {
        print_grid(grid, machine.config().visible_rows);
    }
}

/// Print the grid the way it sits on screen: rows across reels, middle row
/// marked
fn print_grid(grid: &[Vec<u32>], visible_rows: usize) {
    for row in 0..visible_rows {
        let cells: Vec<String> = grid
            .iter()
            .map(|reel| format!("{:>3}", reel.get(row).copied().unwrap_or(0)))
            .collect();
        let marker = if row == visible_rows / 2 { " <- payline" } else { "" };
        println!("[{}]{marker}", cells.join(" |"));
    }
}
