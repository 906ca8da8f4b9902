//! Pod demand representation (spec §3 "Pod").

use crate::resources::ResourceVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl PodPhase {
    /// Terminal phases contribute nothing to demand (spec §3, §4.3).
    pub fn is_terminal(&self) -> bool {
        matches!(self, PodPhase::Succeeded | PodPhase::Failed)
    }
}

#[derive(Debug, Clone)]
pub struct Pod {
    pub namespace: String,
    pub name: String,
    pub phase: PodPhase,
    pub assigned_node: Option<String>,
    /// `requests.pods` is always 1 for a live pod (spec §3).
    pub requests: ResourceVector,
}

impl Pod {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        phase: PodPhase,
        assigned_node: Option<String>,
        cpu_millis: u64,
        memory_bytes: u64,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            phase,
            assigned_node,
            requests: ResourceVector::new(cpu_millis, memory_bytes, 1),
        }
    }
}
