//! Node classification (spec §4.2).

use std::collections::HashMap;

use crate::config::Config;
use crate::resources::ResourceVector;

/// Wire-format node as read from the orchestrator (spec §6 `list_nodes`).
/// Labels/conditions are read once per iteration and discarded.
#[derive(Debug, Clone)]
pub struct RawNode {
    pub name: String,
    pub labels: HashMap<String, String>,
    pub allocatable: ResourceVector,
    pub instance_type: String,
    /// `true` iff the orchestrator reports condition `Ready=True`.
    pub ready: bool,
    pub unschedulable: bool,
}

/// A node after classification: immutable for the remainder of the
/// iteration (spec §3 "Node").
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub asg_id: String,
    pub az: String,
    pub allocatable: ResourceVector,
    pub ready: bool,
    pub unschedulable: bool,
    pub is_master: bool,
    pub instance_type: String,
}

impl Node {
    /// A node is usable iff ready, schedulable, and (masters included or
    /// this node isn't one). Unusable nodes still belong to their
    /// partition — they are excluded from capacity and weakest-node
    /// selection, not from the grid itself.
    pub fn is_usable(&self, config: &Config) -> bool {
        self.ready && !self.unschedulable && (config.include_master_nodes || !self.is_master)
    }
}

/// Classifies a raw orchestrator node into a `Node`, or `None` if it lacks
/// the ASG label (spec §4.2: "absence means the node is ignored").
pub fn classify_node(raw: &RawNode, config: &Config) -> Option<Node> {
    let asg_id = raw.labels.get(&config.asg_label)?.clone();
    let az = raw
        .labels
        .get(&config.az_label)
        .cloned()
        .unwrap_or_default();
    let is_master = raw.labels.get(&config.master_label).is_some();

    Some(Node {
        name: raw.name.clone(),
        asg_id,
        az,
        allocatable: raw.allocatable,
        ready: raw.ready,
        unschedulable: raw.unschedulable,
        is_master,
        instance_type: raw.instance_type.clone(),
    })
}

/// Groups classified nodes into `ASG -> AZ -> nodes`, matching spec §2's
/// "grouped index" from node classification.
pub fn group_by_asg_az(nodes: Vec<Node>) -> HashMap<String, HashMap<String, Vec<Node>>> {
    let mut grouped: HashMap<String, HashMap<String, Vec<Node>>> = HashMap::new();
    for node in nodes {
        grouped
            .entry(node.asg_id.clone())
            .or_default()
            .entry(node.az.clone())
            .or_default()
            .push(node);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::for_tests()
    }

    fn raw_node(name: &str, asg: Option<&str>, master: bool) -> RawNode {
        let mut labels = HashMap::new();
        if let Some(asg) = asg {
            labels.insert("kubernetes.io/asg-name".to_string(), asg.to_string());
        }
        labels.insert(
            "topology.kubernetes.io/zone".to_string(),
            "eu-west-1a".to_string(),
        );
        if master {
            labels.insert("node-role.kubernetes.io/master".to_string(), "".to_string());
        }
        RawNode {
            name: name.to_string(),
            labels,
            allocatable: ResourceVector::new(4000, 8 << 30, 110),
            instance_type: "m5.large".to_string(),
            ready: true,
            unschedulable: false,
        }
    }

    #[test]
    fn node_without_asg_label_is_ignored() {
        let raw = raw_node("n1", None, false);
        assert!(classify_node(&raw, &config()).is_none());
    }

    #[test]
    fn node_with_asg_label_classifies() {
        let raw = raw_node("n1", Some("asg-a"), false);
        let node = classify_node(&raw, &config()).unwrap();
        assert_eq!(node.asg_id, "asg-a");
        assert_eq!(node.az, "eu-west-1a");
        assert!(!node.is_master);
    }

    #[test]
    fn master_excluded_unless_configured_in() {
        let raw = raw_node("n1", Some("asg-a"), true);
        let mut cfg = config();
        cfg.include_master_nodes = false;
        let node = classify_node(&raw, &cfg).unwrap();
        assert!(node.is_master);
        assert!(!node.is_usable(&cfg));

        cfg.include_master_nodes = true;
        assert!(node.is_usable(&cfg));
    }

    #[test]
    fn not_ready_or_unschedulable_is_unusable() {
        let mut raw = raw_node("n1", Some("asg-a"), false);
        raw.ready = false;
        let node = classify_node(&raw, &config()).unwrap();
        assert!(!node.is_usable(&config()));
    }
}
