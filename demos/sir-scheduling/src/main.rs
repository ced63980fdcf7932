//! sir-scheduling — SIR with recovery driven by the event scheduler.
//!
//! Infection is the same Markov process as in `sir-basic`.  Recovery is not
//! sampled per step: every newly infectious person gets one `Recovery` event
//! with a geometric delay of mean `1 / (1 - exp(-γ·Δt))` steps, and the
//! event's listener queues the change to `R`.
//!
//! ```text
//! cargo run -p sir-scheduling -- [config.json] [output-dir]
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use ibm_core::{IbmResult, PersonId, SimConfig, Tick};
use ibm_events::EventContext;
use ibm_output::{CsvWriter, SimOutputObserver};
use ibm_sampling::{bernoulli_select_rate, delay_sample};
use ibm_sim::{ModelBuilder, StepContext};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ── Constants ─────────────────────────────────────────────────────────────────

const POPULATION: usize = 1_000;
const INITIAL_INFECTED: usize = 5;
const DT: f64 = 0.1;
const TMAX: f64 = 100.0;
const SEED: u64 = 42;

const GAMMA: f64 = 0.1;
const R0: f64 = 2.5;
const BETA: f64 = R0 * GAMMA;

const STATES: [&str; 3] = ["S", "I", "R"];
const RECOVERY: &str = "Recovery";

// ── Processes and listeners ───────────────────────────────────────────────────

fn infection(ctx: &mut StepContext<'_>) -> IbmResult<()> {
    let n = ctx.state.count() as f64;
    let infectious = ctx.state.count_by_state(&["I"])? as f64;
    let susceptible = ctx.state.query_by_state(&["S"])?;
    let infected = bernoulli_select_rate(&susceptible, BETA * infectious / n, ctx.dt, ctx.rng)?;
    ctx.state.queue_update(&infected, "I")
}

/// Give every infectious person without a pending recovery exactly one.
fn schedule_recovery(ctx: &mut StepContext<'_>) -> IbmResult<()> {
    let infectious = ctx.state.query_by_state(&["I"])?;
    let scheduled = ctx.scheduler.get_scheduled(RECOVERY)?;
    let unscheduled: Vec<PersonId> = infectious
        .into_iter()
        .filter(|p| scheduled.binary_search(p).is_err())
        .collect();
    if unscheduled.is_empty() {
        return Ok(());
    }
    let delays = delay_sample(unscheduled.len(), GAMMA, ctx.dt, ctx.rng)?;
    debug!(tick = %ctx.tick, persons = unscheduled.len(), "scheduling recoveries");
    ctx.scheduler.schedule(&unscheduled, &delays, RECOVERY)
}

fn recover(targets: &[PersonId], _now: Tick, ctx: &mut EventContext<'_>) -> IbmResult<()> {
    ctx.queue_update(targets, "R")
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

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args_os().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| "output/sir-scheduling".into());

    let config = load_config(config_path.as_deref())?;

    println!("=== sir-scheduling — SIR with scheduled recovery ===");
    println!(
        "N: {}  |  steps: {} (dt = {})  |  seed: {}",
        config.population, config.steps, config.dt, config.seed
    );
    println!();

    let initial: Vec<&str> = (0..config.population)
        .map(|i| if i < INITIAL_INFECTED { "I" } else { "S" })
        .collect();

    let mut model = ModelBuilder::new(config.clone())
        .states(STATES)
        .initial_states(&initial)
        .events([RECOVERY])
        .listener(RECOVERY, recover)
        .process(infection)
        .process(schedule_recovery)
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
    let pending = model.scheduler().pending_len();
    info!(?counts, pending, elapsed_ms = elapsed.as_millis() as u64, "run finished");

    println!(
        "Simulation complete in {:.3} s (model time t = {})",
        elapsed.as_secs_f64(),
        model.clock().time()
    );
    println!("Output written to {}", out_dir.display());
    println!("Recoveries still pending: {pending}");
    println!();
    println!("{:<6} {:>8}", "State", "Count");
    println!("{}", "-".repeat(15));
    for (label, count) in STATES.iter().zip(&counts) {
        println!("{label:<6} {count:>8}");
    }

    Ok(())
}
