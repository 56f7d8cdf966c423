use glam::{Vec2, Vec3};
use rand::{SeedableRng, rngs::StdRng};
use sca3d_core::{
    AttractionField, BodyBuilder, Envelope, GrowthConfig, GrowthController, GrowthError,
    GrowthPhase, Tree, Tropism,
};

fn grown(seed: u64, cfg: GrowthConfig) -> GrowthController {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ctl = GrowthController::new(cfg, &mut rng).unwrap();
    ctl.run_to_completion();
    ctl
}

fn assert_single_rooted(tree: &Tree) {
    let segments = tree.segments();
    assert_eq!(segments.len(), tree.len() - 1);

    let mut incoming = vec![0usize; tree.len()];
    for (id, node) in tree.nodes().iter().enumerate() {
        for &c in &node.children {
            assert!(c > id, "cycle or back edge at {id} -> {c}");
            incoming[c] += 1;
        }
    }
    assert_eq!(incoming.iter().filter(|&&n| n == 0).count(), 1);
    assert_eq!(incoming[Tree::ROOT], 0);
    assert!(incoming.iter().all(|&n| n <= 1));
}

#[test]
fn single_point_envelope_is_rejected() {
    assert!(matches!(
        Envelope::from_curve(vec![Vec2::new(0.0, 8.0)]),
        Err(GrowthError::InvalidEnvelope { .. })
    ));
}

#[test]
fn symmetric_points_grow_a_vertical_chain() {
    // Every point sits about 1.8 from the root, inside ri.
    let cfg = GrowthConfig {
        internode_length: 0.2,
        influence_radius: 2.0,
        kill_distance: 0.1,
        tropism: Tropism::None,
        root_position: Vec3::new(0.0, 3.5, 0.0),
        ..GrowthConfig::default()
    };
    let field = AttractionField::from_positions(vec![
        Vec3::new(1.0, 5.0, 0.0),
        Vec3::new(-1.0, 5.0, 0.0),
        Vec3::new(0.0, 5.0, 1.0),
        Vec3::new(0.0, 5.0, -1.0),
    ]);
    let mut ctl = GrowthController::with_field(cfg, field).unwrap();

    let first = ctl.tick();
    assert_eq!(first.grown, vec![1]);
    assert_eq!(first.extension, None);
    assert_eq!(first.killed, 0);
    let child = ctl.tree().node(1);
    assert_eq!(child.parent, Some(Tree::ROOT));
    assert_eq!((child.pos.x, child.pos.z), (0.0, 0.0));
    assert!((child.pos.y - 3.7).abs() < 1e-5);

    // The tip keeps climbing toward the ring while it stays below it.
    for tip in 1..7 {
        let report = ctl.tick();
        assert_eq!(report.grown, vec![tip + 1], "tick {}", tip + 1);
        assert_eq!(report.extension, None);
        assert_eq!(ctl.tree().node(tip + 1).parent, Some(tip));
    }

    let tree = ctl.tree();
    assert_eq!(tree.len(), 8);
    assert_eq!(ctl.field().len(), 4);
    assert_eq!(ctl.state(), GrowthPhase::Growing);
    for pair in tree.nodes().windows(2) {
        assert!(pair[1].pos.y > pair[0].pos.y);
    }
    for node in tree.nodes() {
        assert_eq!((node.pos.x, node.pos.z), (0.0, 0.0));
        assert!(node.children.len() <= 1);
    }
    assert!((tree.node(7).pos.y - 4.9).abs() < 1e-4);
}

#[test]
fn run_to_completion_terminates_across_parameters() {
    let params = [
        (0.2, 3.0, 0.4, Tropism::None),
        (0.1, 3.0, 0.05, Tropism::Gravity),
        (0.3, 4.0, 0.5, Tropism::RadialAttract),
        (0.25, 3.5, 3.0, Tropism::Spin),
    ];

    for (seed, (dp, ri, dk, tropism)) in params.into_iter().enumerate() {
        let cfg = GrowthConfig {
            internode_length: dp,
            influence_radius: ri,
            kill_distance: dk,
            tropism,
            attraction_points: 150,
            ..GrowthConfig::default()
        };
        let max = cfg.max_iterations;
        let mut rng = StdRng::seed_from_u64(seed as u64);
        let mut ctl = GrowthController::new(cfg, &mut rng).unwrap();

        let ticks = ctl.run_to_completion();

        assert!(ticks <= max);
        assert_eq!(ctl.state(), GrowthPhase::Finished);
        assert_single_rooted(ctl.tree());
    }
}

#[test]
fn reduce_keeps_root_and_branch_points() {
    let mut ctl = grown(17, GrowthConfig::default());
    let tree = ctl.tree();

    let before = tree.len();
    let root = tree.root().pos;
    let branch_points: Vec<Vec3> = tree
        .nodes()
        .iter()
        .filter(|n| n.children.len() >= 2)
        .map(|n| n.pos)
        .collect();

    let removed = ctl.reduce();
    let tree = ctl.tree();

    assert_eq!(tree.len(), before - removed);
    assert_eq!(tree.root().pos, root);
    for p in branch_points {
        assert!(tree.nodes().iter().any(|n| n.pos == p), "lost branch point {p}");
    }
    assert_single_rooted(tree);

    // A second pass finds nothing left to collapse.
    assert_eq!(ctl.reduce(), 0);
}

#[test]
fn body_thickens_toward_root() {
    let ctl = grown(23, GrowthConfig::default());
    let tree = ctl.tree();
    let builder = BodyBuilder::from_config(ctl.config());
    let radii = builder.radii(tree);

    for (id, node) in tree.nodes().iter().enumerate() {
        let thickest_child = node.children.iter().map(|&c| radii[c]).fold(0.0, f32::max);
        assert!(radii[id] >= thickest_child);
    }

    let body = builder.build(tree);
    assert_eq!(body.len(), tree.len() - 1);
    assert!(body.iter().all(|s| s.radius >= ctl.config().leaf_radius));
}

#[test]
fn gravity_bends_vertical_growth_down() {
    let up = Vec3::Y;
    let at = Vec3::new(0.5, 3.0, 0.5);
    let none = Tropism::None.bias(up, at, 0.2);
    let gravity = Tropism::Gravity.bias(up, at, 0.2);
    assert!(gravity.y < none.y);
}

#[test]
fn sampled_points_respect_envelope_for_any_seed() {
    let env = Envelope::default_crown();
    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let field = AttractionField::populate(&env, 200, 1000, &mut rng).unwrap();
        assert!(field.points().all(|p| env.contains(p)));
    }
}
