//! Required-nodes calculator (spec §4.5) — the decision core.

use crate::cluster::partition::Partition;
use crate::config::Config;
use crate::error::CoreError;
use crate::resources::ResourceVector;

/// Step 1: `demand = (usage + pending_share) * (1 + buffer_pct) + buffer_fixed`,
/// applied independently per dimension.
pub fn buffered_demand(partition: &Partition, config: &Config) -> ResourceVector {
    let raw = partition.usage.add(&partition.pending_share);

    let cpu = raw
        .cpu
        .scale_ceil(100 + config.buffer_cpu_pct, 100)
        .add(&config.buffer_cpu_fixed);
    let memory = raw
        .memory
        .scale_ceil(100 + config.buffer_memory_pct, 100)
        .add(&config.buffer_memory_fixed);
    let pods = raw
        .pods
        .scale_ceil(100 + config.buffer_pods_pct, 100)
        .add(&config.buffer_pods_fixed);

    ResourceVector { cpu, memory, pods }
}

/// Steps 2–3: the smallest `n` such that `n * weakest >= demand`
/// component-wise, then floored up to `buffer_spare_nodes`.
///
/// Returns `InvariantError` if any dimension of `weakest` is zero — spec
/// §4.5 requires treating that as a fatal input error for the partition.
pub fn nodes_for_partition(
    asg_id: &str,
    weakest: &ResourceVector,
    demand: &ResourceVector,
    config: &Config,
) -> Result<u64, CoreError> {
    let raw = weakest.node_units_to_cover(demand).ok_or_else(|| CoreError::Invariant {
        asg: asg_id.to_string(),
        reason: format!("weakest node {weakest} has a zero dimension, cannot size against demand {demand}"),
    })?;
    Ok(raw.max(config.buffer_spare_nodes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition_with(usage: ResourceVector, pending_share: ResourceVector) -> Partition {
        let mut p = Partition::new("a".to_string(), "z".to_string(), vec![]);
        p.usage = usage;
        p.pending_share = pending_share;
        p
    }

    #[test]
    fn buffered_demand_applies_pct_then_fixed() {
        let config = Config::for_tests();
        let partition = partition_with(ResourceVector::new(1000, 1 << 30, 1), ResourceVector::zero());
        let demand = buffered_demand(&partition, &config);
        // 1000m * 1.10 = 1100m, + 200m fixed = 1300m
        assert_eq!(demand.cpu.units(), 1300);
    }

    #[test]
    fn nodes_for_partition_rejects_zero_weakest_dimension() {
        let config = Config::for_tests();
        let weakest = ResourceVector::new(0, 8 << 30, 110);
        let demand = ResourceVector::new(100, 1, 1);
        let result = nodes_for_partition("asg-a", &weakest, &demand, &config);
        assert!(matches!(result, Err(CoreError::Invariant { .. })));
    }

    #[test]
    fn nodes_for_partition_applies_spare_floor() {
        let mut config = Config::for_tests();
        config.buffer_spare_nodes = 3;
        let weakest = ResourceVector::new(4000, 8 << 30, 110);
        let demand = ResourceVector::new(100, 1, 1);
        assert_eq!(nodes_for_partition("a", &weakest, &demand, &config).unwrap(), 3);
    }
}
