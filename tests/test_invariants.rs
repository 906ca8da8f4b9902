//! Cross-cutting invariants from spec §8, checked against the full
//! `build_asg_states` + `decide_all` pipeline rather than any single unit.

mod helpers;

use node_group_autoscaler::autoscaler::{decide_all, ReasonCode};
use node_group_autoscaler::config::Config;

const GI: u64 = 1 << 30;

fn base_state(config: &Config, current: i64) -> std::collections::BTreeMap<String, node_group_autoscaler::cluster::ASGState> {
    let nodes = vec![
        helpers::node("node-a-1", "asg-a", "eu-west-1a", 4000, 8 * GI, 110),
        helpers::node("node-b-1", "asg-b", "eu-west-1a", 4000, 8 * GI, 110),
    ];
    let pods = vec![
        helpers::pod("web-1", Some("node-a-1"), 1000, 2 * GI),
        helpers::pod("web-2", Some("node-b-1"), 1000, 2 * GI),
    ];
    let asgs = vec![
        helpers::asg("asg-a", 0, 20, current, &["eu-west-1a"]),
        helpers::asg("asg-b", 0, 20, current, &["eu-west-1a"]),
    ];
    helpers::states(nodes, pods, asgs, config)
}

/// Decisions are produced in ascending ASG-id order, independent of input
/// iteration order, because `decide_all` walks a `BTreeMap`.
#[test]
fn decisions_are_in_deterministic_asg_id_order() {
    let config = Config::for_tests();
    let states = base_state(&config, 5);
    let decisions = decide_all(&states, &config);
    let ids: Vec<&str> = decisions.iter().map(|d| d.asg_id.as_str()).collect();
    assert_eq!(ids, vec!["asg-a", "asg-b"]);
}

/// Running the same input twice yields exactly the same decisions (no
/// hidden mutable state, no reliance on wall-clock or randomness).
#[test]
fn repeated_runs_on_same_input_are_identical() {
    let config = Config::for_tests();
    let states = base_state(&config, 5);
    let first = decide_all(&states, &config);
    let second = decide_all(&states, &config);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.asg_id, b.asg_id);
        assert_eq!(a.target, b.target);
        assert_eq!(a.reason, b.reason);
    }
}

/// When an ASG's decision is `unchanged`, re-running it again produces the
/// same target (a fixed point, not just a one-off convergence).
#[test]
fn unchanged_is_a_fixed_point() {
    let config = Config::for_tests();
    let states = base_state(&config, 5);
    let decisions = decide_all(&states, &config);
    let target = decisions[0].target;

    let nodes = vec![helpers::node("node-a-1", "asg-a", "eu-west-1a", 4000, 8 * GI, 110)];
    let pods = vec![helpers::pod("web-1", Some("node-a-1"), 1000, 2 * GI)];
    let asgs = vec![helpers::asg("asg-a", 0, 20, target, &["eu-west-1a"])];
    let next_states = helpers::states(nodes, pods, asgs, &config);
    let next_decisions = decide_all(&next_states, &config);

    assert_eq!(next_decisions[0].target, target);
    assert_eq!(next_decisions[0].reason, ReasonCode::Unchanged);
}

/// The required node count never decreases when demand increases, all else
/// held equal (monotonicity in demand, spec §4.5).
#[test]
fn required_nodes_is_monotonic_in_demand() {
    let config = Config::for_tests();

    let light_nodes = vec![helpers::node("node-a-1", "asg-a", "eu-west-1a", 4000, 8 * GI, 110)];
    let light_pods = vec![helpers::pod("web-1", Some("node-a-1"), 500, GI)];
    let light_asgs = vec![helpers::asg("asg-a", 0, 20, 5, &["eu-west-1a"])];
    let light_states = helpers::states(light_nodes, light_pods, light_asgs, &config);
    let light_required = decide_all(&light_states, &config)[0].required.unwrap();

    let heavy_nodes = vec![helpers::node("node-a-1", "asg-a", "eu-west-1a", 4000, 8 * GI, 110)];
    let heavy_pods = vec![helpers::pod("web-1", Some("node-a-1"), 3000, 6 * GI)];
    let heavy_asgs = vec![helpers::asg("asg-a", 0, 20, 5, &["eu-west-1a"])];
    let heavy_states = helpers::states(heavy_nodes, heavy_pods, heavy_asgs, &config);
    let heavy_required = decide_all(&heavy_states, &config)[0].required.unwrap();

    assert!(heavy_required >= light_required);
}

/// The decision target always sits within [min, max], regardless of what
/// required/current demand would otherwise compute to.
#[test]
fn target_is_always_clamped_into_min_max() {
    let config = Config::for_tests();
    let nodes = vec![helpers::node("node-a-1", "asg-a", "eu-west-1a", 4000, 8 * GI, 110)];
    let pods = vec![helpers::pod("web-1", Some("node-a-1"), 3900, 7 * GI)];
    let asgs = vec![helpers::asg("asg-a", 2, 4, 3, &["eu-west-1a"])];
    let states = helpers::states(nodes, pods, asgs, &config);
    let decision = &decide_all(&states, &config)[0];
    assert!(decision.target >= 2 && decision.target <= 4);
}

/// A one-ASG failure (here: a zero-dimension weakest node, surfaced as an
/// `InvariantError`) does not prevent other ASGs' decisions from running.
#[test]
fn one_asg_invariant_error_does_not_block_others() {
    let config = Config::for_tests();
    let mut bad_node = helpers::node("node-a-1", "asg-a", "eu-west-1a", 0, 8 * GI, 110);
    bad_node.allocatable.cpu = node_group_autoscaler::resources::Quantity::zero(
        node_group_autoscaler::resources::Dimension::Cpu,
    );
    let good_node = helpers::node("node-b-1", "asg-b", "eu-west-1a", 4000, 8 * GI, 110);

    let pods = vec![
        helpers::pod("web-a", Some("node-a-1"), 100, GI),
        helpers::pod("web-b", Some("node-b-1"), 100, GI),
    ];
    let asgs = vec![
        helpers::asg("asg-a", 0, 10, 1, &["eu-west-1a"]),
        helpers::asg("asg-b", 0, 10, 1, &["eu-west-1a"]),
    ];
    let states = helpers::states(vec![bad_node, good_node], pods, asgs, &config);
    let decisions = decide_all(&states, &config);

    let a = decisions.iter().find(|d| d.asg_id == "asg-a").unwrap();
    let b = decisions.iter().find(|d| d.asg_id == "asg-b").unwrap();
    assert_eq!(a.reason, ReasonCode::Error);
    assert_ne!(b.reason, ReasonCode::Error);
}
