//! Cluster state: node classification, pod demand aggregation, and the
//! weakest-node model (spec §4.2–§4.4).

pub mod demand;
pub mod node;
pub mod partition;
pub mod pod;
pub mod weakest;

use std::collections::BTreeMap;

use crate::config::Config;
use crate::providers::orchestrator::ClusterSnapshot;
use crate::providers::{ASGInfo, AutoscalerError};

pub use node::{classify_node, group_by_asg_az, Node, RawNode};
pub use partition::{ASGState, PendingBucket, Partition};
pub use pod::{Pod, PodPhase};

/// Builds the full (asg -> partitions) state from an orchestrator snapshot
/// and the cloud's ASG metadata, ready for the autoscaler decision core.
///
/// Every known ASG from `asg_infos` gets an entry, even if it currently has
/// zero usable (or zero total) nodes, so that its existing `DesiredCapacity`
/// is respected (spec §4.2).
pub fn build_asg_states(
    snapshot: &ClusterSnapshot,
    asg_infos: &[ASGInfo],
    config: &Config,
) -> Result<BTreeMap<String, ASGState>, AutoscalerError> {
    let mut classified: Vec<Node> = Vec::new();
    for raw in &snapshot.nodes {
        if let Some(node) = classify_node(raw, config) {
            classified.push(node);
        }
    }

    let grouped = group_by_asg_az(classified);

    let mut asg_states: BTreeMap<String, ASGState> = BTreeMap::new();
    for info in asg_infos {
        let mut partitions: BTreeMap<String, Partition> = BTreeMap::new();
        let azs_with_nodes = grouped.get(&info.name);

        let mut seen_azs: Vec<String> = info.azs.clone();
        if let Some(by_az) = azs_with_nodes {
            for az in by_az.keys() {
                if !seen_azs.contains(az) {
                    seen_azs.push(az.clone());
                }
            }
        }

        for az in seen_azs {
            let nodes = azs_with_nodes
                .and_then(|m| m.get(&az))
                .cloned()
                .unwrap_or_default();
            partitions.insert(az.clone(), Partition::new(info.name.clone(), az, nodes));
        }

        asg_states.insert(
            info.name.clone(),
            ASGState {
                asg_id: info.name.clone(),
                partitions,
                current_desired: info.desired,
                min: info.min,
                max: info.max,
            },
        );
    }

    let (usage, pending) = demand::aggregate_demand(
        &grouped
            .values()
            .flat_map(|by_az| by_az.values().flatten().cloned())
            .collect::<Vec<_>>(),
        &snapshot.pods,
        config,
    );

    for state in asg_states.values_mut() {
        for (az, partition) in state.partitions.iter_mut() {
            if let Some(u) = usage.get(&(state.asg_id.clone(), az.clone())) {
                partition.usage = *u;
            }
        }
    }

    let shares = demand::distribute_pending(&asg_states, &pending, config);
    if shares.is_empty() && !pending.total.cpu.is_zero() {
        log::warn!(
            "pending demand of {} cannot be distributed: no known asg/az partitions exist",
            pending.total
        );
    }

    for state in asg_states.values_mut() {
        for (az, partition) in state.partitions.iter_mut() {
            if let Some(share) = shares.get(&(state.asg_id.clone(), az.clone())) {
                partition.pending_share = *share;
            }
        }
    }

    weakest::resolve_weakest_nodes(&mut asg_states, config);

    Ok(asg_states)
}
