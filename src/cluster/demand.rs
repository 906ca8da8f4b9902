//! Demand aggregation (spec §4.3): sum pod requests into partition usage or
//! the pending bucket, then spread pending demand across usable partitions.

use std::collections::{BTreeMap, HashMap};

use crate::cluster::node::Node;
use crate::cluster::partition::{ASGState, PendingBucket};
use crate::cluster::pod::Pod;
use crate::config::Config;
use crate::resources::ResourceVector;

/// Looks up which (asg_id, az) a pod's assigned node belongs to, among
/// *usable* nodes only. Pods on unknown or unusable nodes are treated as
/// unassigned (spec §4.3: "Pods assigned to excluded nodes... contribute to
/// neither" for masters; for nodes absent from the snapshot entirely,
/// spec §3's invariant reclassifies them pending).
fn usable_node_partition<'a>(
    assigned_node: &str,
    node_index: &'a HashMap<String, (String, String, bool)>,
) -> Option<&'a (String, String, bool)> {
    node_index.get(assigned_node)
}

/// Aggregates non-terminal pod demand into each node's partition usage, or
/// into the global `PendingBucket` when unassigned, unknown, or assigned to
/// an excluded node whose ASG membership can't be determined.
///
/// Pods assigned to a *usable* node of a *known, excluded* ASG (e.g. a
/// master node when masters are excluded) are dropped entirely, matching
/// spec §4.3: "the decision for those ASGs is skipped entirely" — such a
/// pod's demand cannot be attributed to a partition this function is asked
/// to size.
pub fn aggregate_demand(
    nodes: &[Node],
    pods: &[Pod],
    config: &Config,
) -> (HashMap<(String, String), ResourceVector>, PendingBucket) {
    let mut node_index: HashMap<String, (String, String, bool)> = HashMap::new();
    for node in nodes {
        node_index.insert(
            node.name.clone(),
            (node.asg_id.clone(), node.az.clone(), node.is_usable(config)),
        );
    }

    let mut usage: HashMap<(String, String), ResourceVector> = HashMap::new();
    let mut pending = PendingBucket::zero();

    for pod in pods {
        if pod.phase.is_terminal() {
            continue;
        }

        match pod.assigned_node.as_deref() {
            Some(node_name) => match usable_node_partition(node_name, &node_index) {
                Some((asg_id, az, true)) => {
                    let entry = usage
                        .entry((asg_id.clone(), az.clone()))
                        .or_insert_with(ResourceVector::zero);
                    *entry = entry.add(&pod.requests);
                }
                Some((_, _, false)) => {
                    // Assigned to a known-but-excluded node: neither pending
                    // nor partitioned (spec §4.3).
                }
                None => pending.add(&pod.requests),
            },
            None => pending.add(&pod.requests),
        }
    }

    (usage, pending)
}

/// Spreads `pending.total` evenly over every partition that has at least one
/// usable node, rounding each partition's share *up* so the sum distributed
/// is never less than the total pending (spec §4.3).
///
/// If no partition has a usable node but ASGs are known, pending is split
/// evenly over every known (asg, az) pair instead. If there are no
/// partitions at all, returns an empty map — the caller surfaces this as an
/// unsatisfiable-pending warning and takes no scaling action.
pub fn distribute_pending(
    asg_states: &BTreeMap<String, ASGState>,
    pending: &PendingBucket,
    config: &Config,
) -> HashMap<(String, String), ResourceVector> {
    let mut usable_keys: Vec<(String, String)> = Vec::new();
    let mut all_keys: Vec<(String, String)> = Vec::new();

    for (asg_id, state) in asg_states {
        for (az, partition) in &state.partitions {
            all_keys.push((asg_id.clone(), az.clone()));
            if partition.has_usable_node(config) {
                usable_keys.push((asg_id.clone(), az.clone()));
            }
        }
    }

    let keys = if !usable_keys.is_empty() {
        usable_keys
    } else {
        all_keys
    };

    let mut shares = HashMap::new();
    if keys.is_empty() {
        return shares;
    }

    let count = keys.len() as u64;
    let share_cpu = pending.total.cpu.scale_ceil(1, count);
    let share_memory = pending.total.memory.scale_ceil(1, count);
    let share_pods = pending.total.pods.scale_ceil(1, count);
    let share = ResourceVector {
        cpu: share_cpu,
        memory: share_memory,
        pods: share_pods,
    };

    for key in keys {
        shares.insert(key, share);
    }
    shares
}
