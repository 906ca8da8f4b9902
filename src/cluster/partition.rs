//! `Partition`, `ASGState` and `PendingBucket` (spec §3).

use std::collections::BTreeMap;

use crate::cluster::node::Node;
use crate::resources::ResourceVector;

/// Key (asg_id, az) — the unit at which demand and capacity are reconciled.
#[derive(Debug, Clone)]
pub struct Partition {
    pub asg_id: String,
    pub az: String,
    pub nodes: Vec<Node>,
    /// Sum over assigned non-terminal pods whose node is in this partition.
    pub usage: ResourceVector,
    /// This partition's share of the global `PendingBucket` (spec §4.3).
    pub pending_share: ResourceVector,
    /// Allocatable of the selected weakest usable node, or a fallback
    /// (spec §4.4) when this partition itself has no usable node.
    pub weakest: Option<ResourceVector>,
}

impl Partition {
    pub fn new(asg_id: String, az: String, nodes: Vec<Node>) -> Self {
        Self {
            asg_id,
            az,
            nodes,
            usage: ResourceVector::zero(),
            pending_share: ResourceVector::zero(),
            weakest: None,
        }
    }

    pub fn has_usable_node(&self, config: &crate::config::Config) -> bool {
        self.nodes.iter().any(|n| n.is_usable(config))
    }
}

/// Per-ASG state: its partitions keyed by AZ, and the cloud-reported bounds
/// (spec §3 "ASGState").
#[derive(Debug, Clone)]
pub struct ASGState {
    pub asg_id: String,
    pub partitions: BTreeMap<String, Partition>,
    pub current_desired: i64,
    pub min: i64,
    pub max: i64,
}

impl ASGState {
    pub fn has_any_usable_node(&self, config: &crate::config::Config) -> bool {
        self.partitions.values().any(|p| p.has_usable_node(config))
    }
}

/// Sum of `requests` over pods with no `assigned_node`. Global, not
/// partitioned (spec §3 "PendingBucket").
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingBucket {
    pub total: ResourceVector,
}

impl PendingBucket {
    pub fn zero() -> Self {
        Self {
            total: ResourceVector::zero(),
        }
    }

    pub fn add(&mut self, requests: &ResourceVector) {
        self.total = self.total.add(requests);
    }
}
