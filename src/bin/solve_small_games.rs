//! Solve Kuhn Poker, Dudo, and Liar Die and print the average strategies.
//!
//! Usage:
//!   cargo run --release --bin solve_small_games -- [OPTIONS]
//!
//! Options:
//!   --game <NAME>        kuhn, dudo, liar-die, or all (default: all)
//!   --iterations <N>     Training iterations (default: 100000)
//!   --sides <N>          Die sides for Liar Die (default: 6)
//!   --dudo-sides <N>     Die sides for Dudo (default: 4)
//!   --seed <N>           Random seed (optional)
//!   --config <FILE>      Solver configuration JSON file (optional)
//!   --output <FILE>      Also write the reports as JSON (optional)
//!
//! Set `RUST_LOG=debug` (or `trace`) for training diagnostics.

use std::env;
use std::error::Error;
use std::fs;

use indicatif::{ProgressBar, ProgressStyle};

use cfr_practice::cfr::{CFRSolver, CFRStats, GameModel, SolverConfig, StrategyReport, SweepSolver};
use cfr_practice::games::dudo::Dudo;
use cfr_practice::games::kuhn::{KuhnPoker, KUHN_GAME_VALUE};
use cfr_practice::games::liars_die::LiarDie;

const PROGRESS_INTERVAL: u64 = 1_000;

struct Options {
    game: String,
    iterations: u64,
    sides: usize,
    dudo_sides: usize,
    seed: Option<u64>,
    config_file: Option<String>,
    output_file: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match parse_args()? {
        Some(options) => options,
        None => return Ok(()),
    };

    let mut config = match &options.config_file {
        Some(path) => SolverConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => SolverConfig::default(),
    };
    if let Some(seed) = options.seed {
        config = config.with_seed(seed);
    }

    println!("=================================================");
    println!("  Small Game CFR Solver");
    println!("=================================================");
    println!("Iterations: {}", options.iterations);
    println!("Sides: {} (Dudo: {})", options.sides, options.dudo_sides);
    if let Some(seed) = config.seed {
        println!("Seed: {}", seed);
    }
    println!();

    let mut reports: Vec<(&str, StrategyReport)> = Vec::new();
    let run_all = options.game == "all";

    if run_all || options.game == "kuhn" {
        println!("--- Kuhn Poker ---");
        let report = solve_recursive(KuhnPoker::new(), config.clone(), options.iterations)?;
        println!("{}", report);
        println!("Nash equilibrium value: {:.4}", KUHN_GAME_VALUE);
        println!();
        reports.push(("kuhn", report));
    }

    if run_all || options.game == "dudo" {
        println!("--- Dudo (1 die vs 1 die) ---");
        let game = Dudo::new(options.dudo_sides)?;
        let report = solve_recursive(game, config.clone(), options.iterations)?;
        println!("{}", report);
        println!();
        reports.push(("dudo", report));
    }

    if run_all || options.game == "liar-die" {
        println!("--- Liar Die ---");
        let mut solver = SweepSolver::new(LiarDie::new(options.sides)?, config.clone())?;
        let progress = progress_bar(options.iterations);
        solver.train_with_callback(options.iterations, PROGRESS_INTERVAL, |stats| {
            tick(&progress, stats)
        })?;
        progress.finish_and_clear();

        for roll in 1..=solver.sides() {
            if let Some(policy) = solver.initial_claim_policy(roll) {
                let probs: Vec<String> = policy.iter().map(|p| format!("{:.2}", p)).collect();
                println!("Initial claim policy with roll {}: {}", roll, probs.join(" "));
            }
        }

        let responses = solver.response_table();
        let claims = solver.claim_table();
        println!("\nOld_Claim/New_Claim: [doubt, accept]");
        println!("{}", responses);
        println!("\nOld_Claim/Roll: [claim probabilities]");
        println!("{}", claims);
        println!();
        reports.push(("liar_die_responses", responses));
        reports.push(("liar_die_claims", claims));
    }

    if reports.is_empty() {
        eprintln!("Unknown game: {}", options.game);
        print_help();
        return Ok(());
    }

    if let Some(path) = &options.output_file {
        let mut json = serde_json::Map::new();
        for (name, report) in &reports {
            json.insert(name.to_string(), serde_json::to_value(report)?);
        }
        fs::write(path, serde_json::to_string_pretty(&json)?)?;
        println!("Saved JSON: {}", path);
    }

    Ok(())
}

fn solve_recursive<G: GameModel>(
    game: G,
    config: SolverConfig,
    iterations: u64,
) -> Result<StrategyReport, Box<dyn Error>> {
    let mut solver = CFRSolver::new(game, config)?;
    let progress = progress_bar(iterations);
    let stats = solver.train_with_callback(iterations, PROGRESS_INTERVAL, |stats| {
        tick(&progress, stats)
    })?;
    progress.finish_and_clear();

    println!(
        "Trained {} info sets in {:.2}s ({:.0} it/s)",
        stats.info_sets, stats.elapsed_seconds, stats.iterations_per_second
    );
    Ok(solver.report())
}

fn progress_bar(iterations: u64) -> ProgressBar {
    let progress = ProgressBar::new(iterations);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({per_sec}) {msg}",
    ) {
        progress.set_style(style);
    }
    progress
}

fn tick(progress: &ProgressBar, stats: &CFRStats) {
    progress.set_position(stats.iterations);
    progress.set_message(format!("value {:.4}", stats.average_game_value()));
}

fn parse_args() -> Result<Option<Options>, Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();

    let mut options = Options {
        game: "all".to_string(),
        iterations: 100_000,
        sides: 6,
        dudo_sides: 4,
        seed: None,
        config_file: None,
        output_file: None,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1).cloned();
        match (flag, value) {
            ("--game" | "-g", Some(v)) => options.game = v,
            ("--iterations" | "-i", Some(v)) => options.iterations = v.parse()?,
            ("--sides", Some(v)) => options.sides = v.parse()?,
            ("--dudo-sides", Some(v)) => options.dudo_sides = v.parse()?,
            ("--seed" | "-s", Some(v)) => options.seed = Some(v.parse()?),
            ("--config" | "-c", Some(v)) => options.config_file = Some(v),
            ("--output" | "-o", Some(v)) => options.output_file = Some(v),
            ("--help" | "-h", _) => {
                print_help();
                return Ok(None);
            }
            _ => {
                eprintln!("Unknown or incomplete argument: {}", flag);
                print_help();
                return Ok(None);
            }
        }
        i += 2;
    }

    Ok(Some(options))
}

fn print_help() {
    println!("Usage: solve_small_games [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -g, --game <NAME>        kuhn, dudo, liar-die, or all (default: all)");
    println!("  -i, --iterations <N>     Training iterations (default: 100000)");
    println!("      --sides <N>          Die sides for Liar Die (default: 6)");
    println!("      --dudo-sides <N>     Die sides for Dudo (default: 4)");
    println!("  -s, --seed <N>           Random seed");
    println!("  -c, --config <FILE>      Solver configuration JSON file");
    println!("  -o, --output <FILE>      Write reports as JSON");
    println!("  -h, --help               Print help");
}
