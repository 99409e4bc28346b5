//! Full seeded runs: setup, history invariants, reproducibility, persistence

mod common;

use graph_fire_core::{
    load_edge_list, parse_edge_list, run_ensemble, FrameRecorder, RunReport, Simulation,
    SimulationConfig, Topology, TopologyError, TopologyGenerator, TriangulatedGrid,
    UpdatePolicy,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::env;
use std::fs;

fn generated(target: usize, seed: u64) -> Topology {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    TriangulatedGrid::default()
        .generate(target, &mut rng)
        .unwrap()
        .to_topology()
        .unwrap()
}

#[test]
fn test_history_invariants_hold_every_tick() {
    let topology = generated(100, 7);
    let nodes = topology.node_count();
    for policy in [UpdatePolicy::InPlace, UpdatePolicy::Synchronous] {
        let config = SimulationConfig {
            ticks: 200,
            seed: 11,
            update_policy: policy,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(topology.clone(), &config).unwrap();
        let history = sim.run(config.ticks).unwrap();

        assert_eq!(history.len(), 201);
        for (i, record) in history.records().iter().enumerate() {
            assert_eq!(record.tick as usize, i);
            assert_eq!(record.trees + record.rocks, nodes);
            assert!(record.burning <= record.trees);
        }
    }
}

#[test]
fn test_same_seed_same_run() {
    let topology = generated(64, 1);
    let config = SimulationConfig {
        seed: 2024,
        firefighter_count: 8,
        ..SimulationConfig::default()
    };

    let mut first_frames = FrameRecorder::new();
    let mut a = Simulation::new(topology.clone(), &config).unwrap();
    a.run_with_sink(50, &mut first_frames).unwrap();

    let mut second_frames = FrameRecorder::new();
    let mut b = Simulation::new(topology, &config).unwrap();
    b.run_with_sink(50, &mut second_frames).unwrap();

    assert_eq!(a.history(), b.history());
    assert_eq!(first_frames.frames(), second_frames.frames());
    assert_eq!(a.firefighter_positions(), b.firefighter_positions());
}

#[test]
fn test_initial_draw_follows_probabilities() {
    let topology = generated(300, 3);
    let nodes = topology.node_count();

    let all_rock = SimulationConfig {
        tree_probability: graph_fire_core::Probability::ZERO,
        ..SimulationConfig::default()
    };
    let sim = Simulation::new(topology.clone(), &all_rock).unwrap();
    assert_eq!(sim.census().rocks, nodes);

    let all_burning = SimulationConfig {
        tree_probability: graph_fire_core::Probability::ONE,
        ignition_probability: graph_fire_core::Probability::ONE,
        ..SimulationConfig::default()
    };
    let sim = Simulation::new(topology, &all_burning).unwrap();
    let census = sim.census();
    assert_eq!(census.trees, nodes);
    assert_eq!(census.burning, nodes);
}

#[test]
fn test_ensemble_matches_individual_runs() {
    let topology = generated(49, 5);
    let config = SimulationConfig::default();
    let seeds = [10, 20, 30];

    let summary = run_ensemble(&topology, &config, &seeds, 25).unwrap();
    for (seed, history) in seeds.iter().zip(&summary.histories) {
        let mut sim = Simulation::new(
            topology.clone(),
            &SimulationConfig {
                seed: *seed,
                ..config.clone()
            },
        )
        .unwrap();
        sim.run(25).unwrap();
        assert_eq!(sim.history(), history);
    }
    assert_eq!(summary.mean_series().len(), 26);
}

#[test]
fn test_report_round_trip_through_file() {
    let topology = generated(30, 9);
    let config = SimulationConfig {
        ticks: 20,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(topology, &config).unwrap();
    sim.run(config.ticks).unwrap();

    let report = RunReport::new(config, sim.history().clone());
    let path = env::temp_dir().join(format!("graph-fire-run-{}.json", std::process::id()));
    report.save_json(&path).unwrap();
    let loaded = RunReport::load_json(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(loaded, report);
}

#[test]
fn test_config_file_drives_run() {
    let path = env::temp_dir().join(format!("graph-fire-config-{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{ "firefighter_count": 3, "ticks": 12, "seed": 5, "stranded_policy": "stay_in_place" }"#,
    )
    .unwrap();
    let config = SimulationConfig::load_json(&path).unwrap();
    let _ = fs::remove_file(&path);
    config.validate().unwrap();

    let mut sim = Simulation::new(generated(25, 0), &config).unwrap();
    assert_eq!(sim.firefighters().len(), 3);
    assert_eq!(sim.run(config.ticks).unwrap().len(), 13);
}

#[test]
fn test_loaded_edge_list_with_bad_lines() {
    let path = env::temp_dir().join(format!("graph-fire-edges-{}.txt", std::process::id()));
    fs::write(
        &path,
        "# ring with a tail\n(0, 1)\n(1, 2)\n\n2,3\n(3,0)\nbanana\n(4,4)\n(3, x)\n(3,4)\n(1,0)\n",
    )
    .unwrap();
    let list = load_edge_list(&path).unwrap();
    let _ = fs::remove_file(&path);

    let lines: Vec<usize> = list.warnings.iter().map(|w| w.line).collect();
    assert_eq!(lines, vec![7, 8, 9]);
    assert_eq!(list.node_count(), 5);

    let topology = Topology::build(list.edges).unwrap();
    assert_eq!(topology.node_count(), 5);
    assert_eq!(topology.edge_count(), 5);
    assert!(topology.is_connected());

    let config = SimulationConfig {
        firefighter_count: 2,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(topology, &config).unwrap();
    assert_eq!(sim.run(10).unwrap().len(), 11);
}

#[test]
fn test_missing_edge_list_is_io_error() {
    let path = env::temp_dir().join("graph-fire-no-such-edge-list.txt");
    assert!(matches!(
        load_edge_list(&path),
        Err(TopologyError::Io { .. })
    ));
}

#[test]
fn test_path_connectivity_and_split() {
    let joined = parse_edge_list("0,1\n1,2\n2,3\n3,4\n");
    assert!(Topology::build(joined.edges).unwrap().is_connected());

    let split = parse_edge_list("0,1\n1,2\n3,4\n");
    assert!(!Topology::build(split.edges).unwrap().is_connected());
}
