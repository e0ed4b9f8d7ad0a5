use physim::{bench_step, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under scenarios/
    #[arg(short, long, default_value = "grid.yaml")]
    file_name: String,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 1000)]
    steps: u64,

    /// Wall-clock length of one simulated frame, in milliseconds
    #[arg(long, default_value_t = 10)]
    frame_ms: u64,

    /// Run the step timing harness instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("opening scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg = ScenarioConfig::from_reader(reader)
        .with_context(|| format!("parsing scenario {}", config_path.display()))?;
    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        bench_step();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let Scenario { bounds, mut simulation } = Scenario::build_scenario(scenario_cfg)?;

    info!(
        bodies = simulation.len(),
        edges = simulation.edge_count(),
        paused = simulation.params().paused,
        "scenario loaded"
    );

    // fixed frame time stands in for the measured one of an interactive loop
    let frame = Duration::from_millis(args.frame_ms);
    let mut impacts = 0;
    for _ in 0..args.steps {
        let delta = simulation.params().frame_delta(frame);
        if let Some(report) = simulation.step(delta, &bounds) {
            impacts += report.impacts;
        }
    }

    let (min, max) = simulation.bodies().iter().fold(
        ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]),
        |(lo, hi), b| {
            (
                [lo[0].min(b.x.x), lo[1].min(b.x.y)],
                [hi[0].max(b.x.x), hi[1].max(b.x.y)],
            )
        },
    );

    info!(
        time = simulation.time(),
        edges = simulation.edge_count(),
        impacts,
        kinetic_energy = simulation.kinetic_energy(),
        "finished"
    );
    info!("bounding box: ({:.2}, {:.2}) .. ({:.2}, {:.2})", min[0], min[1], max[0], max[1]);

    Ok(())
}
