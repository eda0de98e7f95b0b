//! Curve Evolve CLI - Advance a population snapshot by one generation.

use std::fs;
use std::path::Path;
use std::time::Instant;

use curve_evolve::{
    compute::{
        PathRenderer, compile,
        evolution::{EvolutionEngine, GenerationStore, MemoryStore},
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
        "--best" => {
            let Some(state_path) = args.get(2) else {
                print_usage(&args[0]);
                std::process::exit(1);
            };
            let count: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(5);
            print_best(Path::new(state_path), count);
        }
        _ => {
            let Some(state_path) = args.get(2) else {
                print_usage(&args[0]);
                std::process::exit(1);
            };
            advance(Path::new(&args[1]), Path::new(state_path));
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <config.json> <state.json>", program);
    eprintln!("       {} --best <state.json> [count]", program);
    eprintln!("       {} --example", program);
    eprintln!();
    eprintln!("Score the latest generation in a population snapshot and breed the next.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Path to evolution configuration file");
    eprintln!("  state.json   Population snapshot (created and seeded if missing)");
    eprintln!("  count        Individuals listed per generation with --best (default: 5)");
}

fn load_store(path: &Path) -> MemoryStore {
    MemoryStore::open(path).unwrap_or_else(|e| {
        eprintln!("Error reading state file: {}", e);
        std::process::exit(1);
    })
}

fn advance(config_path: &Path, state_path: &Path) {
    let config_str = fs::read_to_string(config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: EvolutionConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let store = load_store(state_path);
    let renderer = PathRenderer::new(config.render.clone());
    let engine = EvolutionEngine::new(config, store, renderer).unwrap_or_else(|e| {
        eprintln!("Error creating engine: {}", e);
        std::process::exit(1);
    });

    println!("Curve Evolution");
    println!("===============");
    println!("Population: {}", engine.config().population_size);
    println!(
        "Votes: {}/{}",
        engine.votes_cast(),
        engine.config().votes_per_generation
    );
    println!();

    let start = Instant::now();
    let next = engine.next_generation().unwrap_or_else(|e| {
        eprintln!("Error advancing generation: {}", e);
        std::process::exit(1);
    });

    match next {
        Some(generation) => println!(
            "Bred generation {} ({} individuals) in {:.2}s",
            generation.number,
            generation.num_individuals(),
            start.elapsed().as_secs_f32()
        ),
        None => println!("Generation already advanced"),
    }

    engine.into_store().save(state_path).unwrap_or_else(|e| {
        eprintln!("Error writing state file: {}", e);
        std::process::exit(1);
    });
}

fn print_best(state_path: &Path, count: usize) {
    let store = load_store(state_path);
    let Some(latest) = store.latest_generation() else {
        println!("No generations stored");
        return;
    };

    for number in 0..=latest {
        let generation = match store.generation(number) {
            Ok(Some(generation)) => generation,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("Error reading generation {}: {}", number, e);
                std::process::exit(1);
            }
        };

        println!("Generation {}:", number);
        for individual in generation.ranked().into_iter().take(count) {
            let rank = individual
                .rank
                .map_or_else(|| "-".to_string(), |r| r.to_string());
            println!(
                "  #{:<3} id={:<6} score={:.4}  {}",
                rank,
                individual.id,
                individual.score,
                compile(&individual.genome)
            );
        }
        println!();
    }
}

fn print_example_config() {
    let config = EvolutionConfig::default();
    let json = serde_json::to_string_pretty(&config).unwrap_or_else(|e| {
        eprintln!("Error serializing config: {}", e);
        std::process::exit(1);
    });

    println!("Example configuration (config.json):");
    println!("{}", json);
}
