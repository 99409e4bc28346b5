use clap::Parser;
use graph_fire_core::{
    load_edge_list, run_ensemble, FrameSink, History, Layout, NullSink, RunReport, Simulation,
    SimulationConfig, SkillRange, StrandedPolicy, Topology, TopologyGenerator, TriangulatedGrid,
    UpdatePolicy, VisualFrame,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Graph wildfire simulation with firefighters
#[derive(Parser, Debug)]
#[command(name = "graph-fire-demo")]
#[command(about = "Headless wildfire simulation on a planar graph", long_about = None)]
struct Args {
    /// Base configuration (JSON); flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Edge list to load instead of generating a graph
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Approximate node count of the generated graph (4-300)
    #[arg(short, long)]
    nodes: Option<usize>,

    /// Chance that a node starts as a tree (0-1)
    #[arg(long)]
    tree_probability: Option<f64>,

    /// Chance that a starting tree is already burning (0-1)
    #[arg(long)]
    ignition_probability: Option<f64>,

    /// Number of firefighters (1-50)
    #[arg(short, long)]
    firefighters: Option<usize>,

    /// Lowest firefighter skill (0-1, exclusive)
    #[arg(long)]
    skill_min: Option<f64>,

    /// Highest firefighter skill (0-1, exclusive)
    #[arg(long)]
    skill_max: Option<f64>,

    /// Number of ticks to run (2-1000)
    #[arg(short, long)]
    ticks: Option<u32>,

    /// Seed for graph generation and the simulation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Apply spread at the end of each sweep (one hop per tick)
    #[arg(long)]
    synchronous: bool,

    /// Let firefighters on isolated nodes stay put instead of failing
    #[arg(long)]
    allow_stranded: bool,

    /// Run this many seeds in parallel and report mean counts
    #[arg(short, long, default_value_t = 1)]
    ensemble: u64,

    /// Print a table row every N ticks
    #[arg(short, long, default_value_t = 10)]
    report_interval: u32,

    /// Write the tick history as CSV
    #[arg(long)]
    history_out: Option<PathBuf>,

    /// Write the configuration and history as JSON
    #[arg(long)]
    report_out: Option<PathBuf>,

    /// Stream every frame as JSON lines
    #[arg(long)]
    frames_out: Option<PathBuf>,

    /// Write node positions as JSON
    #[arg(long)]
    layout_out: Option<PathBuf>,
}

/// Writes one JSON object per frame.
struct JsonLinesSink {
    writer: BufWriter<File>,
    error: Option<std::io::Error>,
}

impl JsonLinesSink {
    fn create(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
            error: None,
        })
    }

    fn finish(mut self) -> std::io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()
    }
}

impl FrameSink for JsonLinesSink {
    fn deliver(&mut self, frame: &VisualFrame) {
        if self.error.is_some() {
            return;
        }
        let written = serde_json::to_writer(&mut self.writer, frame)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = written {
            self.error = Some(err);
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = build_config(args)?;
    config.validate()?;

    let (topology, layout) = build_topology(args, &config)?;
    if let Some(path) = &args.layout_out {
        fs::write(path, serde_json::to_string_pretty(&layout)?)?;
        info!(path = %path.display(), nodes = layout.len(), "Wrote layout");
    }
    println!("=== Graph Wildfire Simulation ===\n");
    println!(
        "Graph: {} nodes, {} edges, connected: {}",
        topology.node_count(),
        topology.edge_count(),
        topology.is_connected()
    );
    println!(
        "Forest: tree {:.2}, ignition {:.2} | Firefighters: {} (skill {:.2}-{:.2})",
        config.tree_probability.value(),
        config.ignition_probability.value(),
        config.firefighter_count,
        config.skill_range.lower.value(),
        config.skill_range.upper.value(),
    );
    println!("Ticks: {}, seed: {}\n", config.ticks, config.seed);

    if args.ensemble > 1 {
        return run_many(args, &topology, &config);
    }

    let mut sim = Simulation::new(topology, &config)?;
    let interval = args.report_interval.max(1);

    println!("Tick | Trees | Rocks | Burning");
    println!("-----|-------|-------|--------");
    print_row(sim.history(), 0);

    let mut frames = match &args.frames_out {
        Some(path) => Some(JsonLinesSink::create(path)?),
        None => None,
    };
    for _ in 0..config.ticks {
        let summary = match frames.as_mut() {
            Some(sink) => sim.step(sink)?,
            None => sim.step(&mut NullSink)?,
        };
        if summary.record.tick % interval == 0 || summary.record.tick == config.ticks {
            print_row(sim.history(), summary.record.tick as usize);
        }
    }
    if let Some(sink) = frames {
        sink.finish()?;
    }

    let history = sim.history();
    println!("\n=== Simulation Complete ===");
    if let (Some(first), Some(last)) = (history.records().first(), history.latest()) {
        println!("Trees: {} -> {}", first.trees, last.trees);
        println!("Rocks: {} -> {}", first.rocks, last.rocks);
    }
    if let Some(peak) = history.peak_burning() {
        println!("Peak burning: {} at tick {}", peak.burning, peak.tick);
    }

    if let Some(path) = &args.history_out {
        fs::write(path, history.to_csv())?;
        info!(path = %path.display(), "Wrote history");
    }
    if let Some(path) = &args.report_out {
        RunReport::new(config, history.clone()).save_json(path)?;
        info!(path = %path.display(), "Wrote run report");
    }
    Ok(())
}

fn run_many(
    args: &Args,
    topology: &Topology,
    config: &SimulationConfig,
) -> Result<(), Box<dyn Error>> {
    let seeds: Vec<u64> = (0..args.ensemble).map(|i| config.seed.wrapping_add(i)).collect();
    let summary = run_ensemble(topology, config, &seeds, config.ticks)?;
    let interval = args.report_interval.max(1);

    println!("Mean over {} runs", summary.len());
    println!("Tick |   Trees |   Rocks | Burning");
    println!("-----|---------|---------|--------");
    for mean in summary.mean_series() {
        if mean.tick % interval == 0 || mean.tick == config.ticks {
            println!(
                "{:4} | {:7.2} | {:7.2} | {:7.2}",
                mean.tick, mean.trees, mean.rocks, mean.burning
            );
        }
    }
    if let Some(peak) = summary.peak_mean_burning() {
        println!("\nPeak mean burning: {:.2} at tick {}", peak.burning, peak.tick);
    }
    if args.history_out.is_some() || args.report_out.is_some() || args.frames_out.is_some() {
        warn!("Output files are only written for single runs");
    }
    Ok(())
}

fn print_row(history: &History, tick: usize) {
    if let Some(r) = history.records().get(tick) {
        println!("{:4} | {:5} | {:5} | {:7}", r.tick, r.trees, r.rocks, r.burning);
    }
}

fn build_config(args: &Args) -> Result<SimulationConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_json(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(nodes) = args.nodes {
        config.node_count = nodes;
    }
    if let Some(p) = args.tree_probability {
        config.tree_probability = p.try_into()?;
    }
    if let Some(p) = args.ignition_probability {
        config.ignition_probability = p.try_into()?;
    }
    if let Some(count) = args.firefighters {
        config.firefighter_count = count;
    }
    if args.skill_min.is_some() || args.skill_max.is_some() {
        let lower = args.skill_min.unwrap_or(config.skill_range.lower.value());
        let upper = args.skill_max.unwrap_or(config.skill_range.upper.value());
        config.skill_range = SkillRange::new(lower, upper)?;
    }
    if let Some(ticks) = args.ticks {
        config.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.synchronous {
        config.update_policy = UpdatePolicy::Synchronous;
    }
    if args.allow_stranded {
        config.stranded_policy = StrandedPolicy::StayInPlace;
    }
    Ok(config)
}

fn build_topology(
    args: &Args,
    config: &SimulationConfig,
) -> Result<(Topology, Layout), Box<dyn Error>> {
    if let Some(path) = &args.graph {
        let list = load_edge_list(path)?;
        if !list.warnings.is_empty() {
            warn!(skipped = list.warnings.len(), "Some edge list lines were skipped");
        }
        let topology = Topology::build(list.edges)?;
        if topology.node_count() < 4 {
            return Err(format!(
                "graph {} has {} nodes, at least 4 are required",
                path.display(),
                topology.node_count()
            )
            .into());
        }
        if !topology.is_connected() {
            warn!("Loaded graph is not connected; fire cannot cross components");
        }
        if !topology.satisfies_planar_edge_bound() {
            warn!("Loaded graph has more edges than any planar graph of its size");
        }
        let layout = Layout::circle(&topology);
        return Ok((topology, layout));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let generated = TriangulatedGrid::default().generate(config.node_count, &mut rng)?;
    Ok((generated.to_topology()?, generated.layout))
}
