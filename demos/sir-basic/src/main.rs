//! sir-basic — a Markov-chain SIR epidemic.
//!
//! Every step each susceptible person is infected with probability
//! `1 - exp(-β·I/N·Δt)` and each infectious person recovers with probability
//! `1 - exp(-γ·Δt)`.  Both processes read the same snapshot; the updates are
//! committed together at the end of the step.
//!
//! ```text
//! cargo run -p sir-basic -- [config.json] [output-dir]
//! ```
//!
//! The optional JSON file overrides any `SimConfig` field, e.g.
//! `{ "population": 10000, "seed": 7 }`.  Output defaults to `output/sir-basic`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use ibm_core::{IbmResult, SimConfig};
use ibm_output::{CsvWriter, SimOutputObserver};
use ibm_sampling::bernoulli_select_rate;
use ibm_sim::{ModelBuilder, StepContext};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── Constants ─────────────────────────────────────────────────────────────────

const POPULATION: usize = 1_000;
const INITIAL_INFECTED: usize = 5;
const DT: f64 = 0.1;
const TMAX: f64 = 100.0;
const SEED: u64 = 42;

/// Recovery rate γ (mean infectious period 1/γ = 10).
const GAMMA: f64 = 0.1;
/// Basic reproduction number.
const R0: f64 = 2.5;
/// Transmission rate β = R0·γ.
const BETA: f64 = R0 * GAMMA;

const STATES: [&str; 3] = ["S", "I", "R"];

// ── Processes ─────────────────────────────────────────────────────────────────

fn infection(ctx: &mut StepContext<'_>) -> IbmResult<()> {
    let n = ctx.state.count() as f64;
    let infectious = ctx.state.count_by_state(&["I"])? as f64;
    let susceptible = ctx.state.query_by_state(&["S"])?;
    let infected = bernoulli_select_rate(&susceptible, BETA * infectious / n, ctx.dt, ctx.rng)?;
    ctx.state.queue_update(&infected, "I")
}

fn recovery(ctx: &mut StepContext<'_>) -> IbmResult<()> {
    let infectious = ctx.state.query_by_state(&["I"])?;
    let recovered = bernoulli_select_rate(&infectious, GAMMA, ctx.dt, ctx.rng)?;
    ctx.state.queue_update(&recovered, "R")
}

// ── Setup helpers ─────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let defaults = SimConfig::from_horizon(POPULATION, TMAX, DT, SEED)?;
    let Some(path) = path else {
        return Ok(defaults);
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let mut value = serde_json::to_value(&defaults)?;
    if let (Some(base), serde_json::Value::Object(overrides)) =
        (value.as_object_mut(), serde_json::from_str(&text)?)
    {
        base.extend(overrides);
    }
    let config: SimConfig = serde_json::from_value(value)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn initial_states(population: usize) -> Vec<&'static str> {
    (0..population)
        .map(|i| if i < INITIAL_INFECTED { "I" } else { "S" })
        .collect()
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args_os().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| "output/sir-basic".into());

    let config = load_config(config_path.as_deref())?;

    println!("=== sir-basic — Markov SIR ===");
    println!(
        "N: {}  |  steps: {} (dt = {})  |  seed: {}",
        config.population, config.steps, config.dt, config.seed
    );
    println!("beta = {BETA}  gamma = {GAMMA}  R0 = {R0}");
    println!();

    let mut model = ModelBuilder::new(config.clone())
        .states(STATES)
        .initial_states(&initial_states(config.population))
        .process(infection)
        .process(recovery)
        .build()?;

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let writer = CsvWriter::new(&out_dir, &STATES)?;
    let mut obs = SimOutputObserver::new(writer, &config);

    let t0 = Instant::now();
    model.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    let counts = model.state().counts();
    info!(?counts, elapsed_ms = elapsed.as_millis() as u64, "run finished");

    println!(
        "Simulation complete in {:.3} s (model time t = {})",
        elapsed.as_secs_f64(),
        model.clock().time()
    );
    println!("Output written to {}", out_dir.display());
    println!();
    println!("{:<6} {:>8}", "State", "Count");
    println!("{}", "-".repeat(15));
    for (label, count) in STATES.iter().zip(&counts) {
        println!("{label:<6} {count:>8}");
    }

    Ok(())
}
