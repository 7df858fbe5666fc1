use std::collections::{HashMap, HashSet};

use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};
use verses_core::config::{Config, LayoutConfig, MotionConfig};
use verses_core::content::{Catalog, Description};
use verses_core::layout::{self, Layout};
use verses_core::motion::Simulation;
use verses_core::types::{Node, NodeId};

/// Seeds used for the randomized checks.
const SEEDS: std::ops::Range<u64> = 0..25;

fn layout_for(cfg: &LayoutConfig, seed: u64) -> Layout {
    layout::generate(cfg, &mut StdRng::seed_from_u64(seed))
}

fn single(nodes: Vec<Node>, cfg: MotionConfig) -> Simulation {
    Simulation::new(
        Layout {
            nodes,
            connections: Vec::new(),
        },
        cfg,
    )
}

// ==================================================================================
// Layout
// ==================================================================================

#[test]
fn layout_has_exactly_n_unique_ids() {
    for n in [0, 1, 2, 8, 15, 40] {
        let cfg = LayoutConfig {
            node_count: n,
            ..LayoutConfig::default()
        };
        let layout = layout_for(&cfg, 1);
        let ids: Vec<NodeId> = layout.nodes.iter().map(|node| node.id).collect();
        assert_eq!(ids, (1..=n).collect::<Vec<_>>());
    }
}

#[test]
fn connections_are_simple() {
    let cfg = LayoutConfig::default();
    for seed in SEEDS {
        let layout = layout_for(&cfg, seed);
        let mut seen = HashSet::new();
        for c in &layout.connections {
            assert_ne!(c.from, c.to, "self-loop on {}", c.from);
            assert!(seen.insert(c.key()), "duplicate edge {:?}", c.key());
        }
    }
}

#[test]
fn top_section_holds_the_pinned_nodes() {
    let cfg = LayoutConfig::default();
    for seed in SEEDS {
        let layout = layout_for(&cfg, seed);
        let in_top = layout
            .nodes
            .iter()
            .filter(|n| n.pos.y <= cfg.top_section_height)
            .count();
        assert!(
            in_top >= cfg.min_nodes_in_top_section as usize,
            "seed {seed}: only {in_top} nodes in top section"
        );
    }
}

#[test]
fn dense_configuration_still_terminates() {
    let cfg = LayoutConfig {
        node_count: 15,
        min_distance: 50.0,
        width: 100.0,
        height: 600.0,
        ..LayoutConfig::default()
    };
    assert_eq!(layout_for(&cfg, 7).nodes.len(), 15);

    // Impossible spacing forces every node after the first through the grid.
    let cfg = LayoutConfig {
        node_count: 60,
        min_distance: 1_000.0,
        max_attempts: 50,
        ..LayoutConfig::default()
    };
    assert_eq!(layout_for(&cfg, 7).nodes.len(), 60);
}

#[test]
fn every_node_is_connected() {
    let cfg = LayoutConfig::default();
    for seed in SEEDS {
        let layout = layout_for(&cfg, seed);
        let mut degree: HashMap<NodeId, usize> = HashMap::new();
        for c in &layout.connections {
            *degree.entry(c.from).or_default() += 1;
            *degree.entry(c.to).or_default() += 1;
        }
        assert!(layout.nodes.iter().all(|n| degree.contains_key(&n.id)));
    }
}

#[test]
fn seeded_layouts_are_reproducible() {
    let cfg = LayoutConfig::default();
    let a = layout_for(&cfg, 42);
    let b = layout_for(&cfg, 42);
    let c = layout_for(&cfg, 43);
    assert_eq!(a.nodes, b.nodes);
    assert_eq!(a.connections, b.connections);
    assert_ne!(a.nodes, c.nodes);
}

// ==================================================================================
// Motion
// ==================================================================================

#[test]
fn nodes_never_leave_the_bounds() {
    let cfg = MotionConfig::default();
    for seed in 0..5 {
        let mut sim = Simulation::new(layout_for(&LayoutConfig::default(), seed), cfg);
        for _ in 0..1_000 {
            sim.tick();
        }
        for n in sim.current_state().nodes {
            assert!((5.0..=95.0).contains(&n.pos.x));
            assert!((5.0..=cfg.height - 5.0).contains(&n.pos.y));
        }
    }
}

#[test]
fn any_accepted_config_keeps_nodes_in_bounds() {
    // Placement area stretched to the motion bounds, the largest accepted.
    let cfg = Config::from_json(
        r#"{ "layout": { "margin": 5.0, "height": 650.0, "top_section_height": 650.0 } }"#,
    )
    .unwrap();
    let (lo, hi) = (
        Vec2::splat(cfg.motion.margin),
        Vec2::new(
            cfg.motion.width - cfg.motion.margin,
            cfg.motion.height - cfg.motion.margin,
        ),
    );

    for seed in 0..5 {
        let mut sim = Simulation::new(layout_for(&cfg.layout, seed), cfg.motion);
        for _ in 0..2_000 {
            sim.tick();
        }
        for n in sim.current_state().nodes {
            assert_eq!(n.pos.clamp(lo, hi), n.pos, "node {} left the bounds", n.id);
        }
    }
}

#[test]
fn wall_reflection_rejects_the_move() {
    let mut sim = single(
        vec![Node {
            id: 1,
            pos: Vec2::new(96.0, 300.0),
            vel: Vec2::new(0.1, 0.0),
        }],
        MotionConfig::default(),
    );
    let n = sim.tick().nodes[0];
    assert_eq!(n.pos.x, 96.0);
    assert_eq!(n.vel.x, -0.1);
}

#[test]
fn close_pair_is_separated_to_min_distance() {
    let cfg = MotionConfig {
        min_vertical_distance: 0.0,
        ..MotionConfig::default()
    };
    let a = Vec2::new(40.0, 300.0);
    let b = Vec2::new(50.0, 300.0);
    let mut sim = single(vec![Node::at_rest(1, a), Node::at_rest(2, b)], cfg);

    let state = sim.tick();
    let moved = state.nodes[0];
    assert!((moved.pos.distance(b) - 15.0).abs() < 1e-4);
    assert_eq!(moved.pos, Vec2::new(35.0, 300.0));
    assert!((moved.vel - Vec2::new(-0.15, 0.0)).length() < 1e-6);
}

#[test]
fn empty_simulation_is_a_no_op() {
    let mut sim = single(Vec::new(), MotionConfig::default());
    for _ in 0..10 {
        assert!(sim.tick().nodes.is_empty());
    }
}

// ==================================================================================
// Content
// ==================================================================================

#[test]
fn missing_content_falls_back() {
    let catalog = Catalog::default();
    let layout = layout_for(&LayoutConfig::default(), 3);
    for n in &layout.nodes {
        match catalog.describe(n.id, n.pos) {
            Description::Fallback { heading, .. } => assert_eq!(heading, format!("Node {}", n.id)),
            Description::Curated(_) => panic!("empty catalog returned an entry"),
        }
    }
}
