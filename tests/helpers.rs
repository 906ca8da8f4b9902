use std::collections::HashMap;

use node_group_autoscaler::cluster::node::RawNode;
use node_group_autoscaler::cluster::pod::{Pod, PodPhase};
use node_group_autoscaler::cluster::{build_asg_states, ASGState};
use node_group_autoscaler::config::Config;
use node_group_autoscaler::providers::orchestrator::ClusterSnapshot;
use node_group_autoscaler::providers::ASGInfo;
use node_group_autoscaler::resources::ResourceVector;

pub fn node(name: &str, asg: &str, az: &str, cpu_millis: u64, memory_bytes: u64, pods: u64) -> RawNode {
    let mut labels = HashMap::new();
    labels.insert("kubernetes.io/asg-name".to_string(), asg.to_string());
    labels.insert("topology.kubernetes.io/zone".to_string(), az.to_string());
    RawNode {
        name: name.to_string(),
        labels,
        allocatable: ResourceVector::new(cpu_millis, memory_bytes, pods),
        instance_type: "m5.large".to_string(),
        ready: true,
        unschedulable: false,
    }
}

pub fn pod(name: &str, assigned_node: Option<&str>, cpu_millis: u64, memory_bytes: u64) -> Pod {
    Pod::new(
        "default",
        name,
        PodPhase::Running,
        assigned_node.map(|n| n.to_string()),
        cpu_millis,
        memory_bytes,
    )
}

pub fn asg(name: &str, min: i64, max: i64, desired: i64, azs: &[&str]) -> ASGInfo {
    ASGInfo {
        name: name.to_string(),
        min,
        max,
        desired,
        azs: azs.iter().map(|s| s.to_string()).collect(),
    }
}

/// Builds classified ASG state straight from raw nodes/pods/asg metadata,
/// the same plumbing `driver::Driver::run_once` uses internally.
pub fn states(
    nodes: Vec<RawNode>,
    pods: Vec<Pod>,
    asgs: Vec<ASGInfo>,
    config: &Config,
) -> std::collections::BTreeMap<String, ASGState> {
    let snapshot = ClusterSnapshot { nodes, pods };
    build_asg_states(&snapshot, &asgs, config).unwrap()
}
