//! Methuselah CLI - Run a search from JSON configuration or replay a board.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use methuselah::{
    compute::{
        Simulator,
        evolution::{EvolutionEngine, StatsWriter, load_board, save_result},
    },
    schema::EvolutionConfig,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--example" => print_example_config(),
        "replay" => replay(&args),
        _ => search(&args),
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <config.json> [out_dir]", program);
    eprintln!("       {} replay <result.json> [board_size]", program);
    eprintln!();
    eprintln!("Search for long-lived Game of Life patterns.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Path to search configuration file");
    eprintln!("  out_dir      Directory for stats.csv and result.json");
    eprintln!("  result.json  Saved result or JSON list of live cells");
    eprintln!("  board_size   Grid size for replay (default: 40)");
    eprintln!();
    eprintln!("Example configuration is generated with --example flag.");
}

fn search(args: &[String]) {
    let config_path = PathBuf::from(&args[1]);
    let out_dir = args.get(2).map(PathBuf::from);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: EvolutionConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    println!("Methuselah Search");
    println!("=================");
    println!("Grid: {}x{}", config.board_size, config.board_size);
    println!(
        "Seed window: {}x{} ({}-{} cells)",
        config.initial_living_board_size,
        config.initial_living_board_size,
        config.initial_living_count_min,
        config.initial_living_count_max
    );
    println!("Population: {}", config.population_size);
    println!("Mutation chance: {}", config.mutation_chance);
    println!("Max turns: {}", config.max_turns);
    println!("Generations: {}", config.generations);
    println!();

    let mut engine = EvolutionEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    });

    let mut stats = out_dir.as_ref().map(|dir| {
        fs::create_dir_all(dir)
            .and_then(|_| StatsWriter::create(dir.join("stats.csv")))
            .unwrap_or_else(|e| {
                eprintln!("Error creating stats file: {}", e);
                std::process::exit(1);
            })
    });

    let start = Instant::now();
    let result = engine
        .run_with_callback(|summary| {
            if let Some(writer) = stats.as_mut()
                && let Err(e) = writer.write(summary)
            {
                log::error!("Failed to write stats row: {}", e);
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Search failed: {}", e);
            std::process::exit(1);
        });

    if let Some(writer) = stats.as_mut()
        && let Err(e) = writer.flush()
    {
        eprintln!("Error writing stats file: {}", e);
    }

    println!("Finished: {:?}", result.stats.stop_reason);
    println!("  Generations: {}", result.stats.generations);
    println!(
        "  Evaluations: {} ({} cache hits, {} cached boards)",
        result.stats.evaluations, result.stats.cache_hits, result.stats.cache_entries
    );
    println!("  Time: {:.2}s", start.elapsed().as_secs_f32());
    println!();

    match &result.best {
        Some(best) => {
            println!("Best score: {}", best.score);
            println!("Best board: {}", best.board);
        }
        None => println!("No board scored above zero."),
    }

    if let Some(dir) = out_dir {
        match save_result(&result, &dir) {
            Ok(path) => println!("Saved result to {}", path.display()),
            Err(e) => eprintln!("Error saving result: {}", e),
        }
    }
}

fn replay(args: &[String]) {
    let Some(path) = args.get(2) else {
        print_usage(&args[0]);
        std::process::exit(1);
    };
    let defaults = EvolutionConfig::default();
    let board_size: usize = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.board_size);

    let board = load_board(path).unwrap_or_else(|e| {
        eprintln!("Error loading board: {}", e);
        std::process::exit(1);
    });

    let mut sim = Simulator::new(board, board_size);
    println!("Turn 0 ({} cells)", sim.live_cells().len());
    print!("{}", sim.render());

    while !sim.is_stable() && sim.generation() < defaults.max_turns as u64 {
        sim.step();
        println!();
        println!("Turn {} ({} cells)", sim.generation(), sim.live_cells().len());
        print!("{}", sim.render());
    }

    println!();
    let state = if sim.is_stable() { "Stable" } else { "Stopped" };
    println!(
        "{} after {} turns, peak {} cells",
        state,
        sim.generation(),
        sim.peak_size()
    );
}

fn print_example_config() {
    let config = EvolutionConfig::default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
