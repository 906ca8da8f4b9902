//! Weakest-node selection (spec §4.4).

use std::collections::BTreeMap;

use crate::cluster::partition::ASGState;
use crate::config::Config;
use crate::resources::ResourceVector;

/// Selects the weakest usable node's allocatable in a single partition, if
/// any usable node exists there.
pub fn select_weakest(partition: &crate::cluster::partition::Partition, config: &Config) -> Option<ResourceVector> {
    partition
        .nodes
        .iter()
        .filter(|n| n.is_usable(config))
        .map(|n| n.allocatable)
        .min_by(|a, b| a.lexicographic_cmp(b))
}

/// Fills in `partition.weakest` for every partition of every ASG.
///
/// A partition with no usable node of its own falls back to the weakest
/// usable node of any other partition in the same ASG (spec §4.4). A
/// partition whose ASG has no usable node anywhere is left with
/// `weakest = None` and must be skipped by the caller, preserving its
/// current `DesiredCapacity`.
pub fn resolve_weakest_nodes(asg_states: &mut BTreeMap<String, ASGState>, config: &Config) {
    for state in asg_states.values_mut() {
        let mut per_partition: BTreeMap<String, ResourceVector> = BTreeMap::new();
        for (az, partition) in state.partitions.iter() {
            if let Some(weakest) = select_weakest(partition, config) {
                per_partition.insert(az.clone(), weakest);
            }
        }

        let asg_fallback = per_partition
            .values()
            .copied()
            .min_by(|a, b| a.lexicographic_cmp(b));

        for (az, partition) in state.partitions.iter_mut() {
            partition.weakest = per_partition.get(az).copied().or(asg_fallback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::node::Node;
    use crate::cluster::partition::Partition;

    fn node(name: &str, cpu: u64, mem: u64, pods: u64, usable: bool) -> Node {
        Node {
            name: name.to_string(),
            asg_id: "a".to_string(),
            az: "z".to_string(),
            allocatable: ResourceVector::new(cpu, mem, pods),
            ready: usable,
            unschedulable: false,
            is_master: false,
            instance_type: "m5.large".to_string(),
        }
    }

    #[test]
    fn picks_smallest_allocatable_node() {
        let partition = Partition::new(
            "a".to_string(),
            "z".to_string(),
            vec![
                node("big", 8000, 16 << 30, 220, true),
                node("small", 2000, 4 << 30, 50, true),
            ],
        );
        let weakest = select_weakest(&partition, &Config::for_tests()).unwrap();
        assert_eq!(weakest.cpu.units(), 2000);
    }

    #[test]
    fn ignores_unusable_nodes() {
        let partition = Partition::new(
            "a".to_string(),
            "z".to_string(),
            vec![node("dead", 1, 1, 1, false), node("ok", 2000, 4 << 30, 50, true)],
        );
        let weakest = select_weakest(&partition, &Config::for_tests()).unwrap();
        assert_eq!(weakest.cpu.units(), 2000);
    }

    #[test]
    fn empty_partition_falls_back_to_sibling_az_in_same_asg() {
        let mut partitions = BTreeMap::new();
        partitions.insert(
            "z1".to_string(),
            Partition::new("a".to_string(), "z1".to_string(), vec![]),
        );
        partitions.insert(
            "z2".to_string(),
            Partition::new(
                "a".to_string(),
                "z2".to_string(),
                vec![node("ok", 2000, 4 << 30, 50, true)],
            ),
        );
        let mut states = BTreeMap::new();
        states.insert(
            "a".to_string(),
            ASGState {
                asg_id: "a".to_string(),
                partitions,
                current_desired: 1,
                min: 0,
                max: 10,
            },
        );
        resolve_weakest_nodes(&mut states, &Config::for_tests());
        assert!(states["a"].partitions["z1"].weakest.is_some());
        assert_eq!(states["a"].partitions["z1"].weakest.unwrap().cpu.units(), 2000);
    }
}
