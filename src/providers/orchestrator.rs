//! Orchestrator read interface (spec §6): `list_nodes`/`list_pods`.

use crate::cluster::node::RawNode;
use crate::cluster::pod::Pod;
use crate::error::CoreError;

/// Everything the decision core needs from one orchestrator poll.
#[derive(Debug, Clone, Default)]
pub struct ClusterSnapshot {
    pub nodes: Vec<RawNode>,
    pub pods: Vec<Pod>,
}

/// Capability set {`list_nodes`, `list_pods`} (spec §6, §9 "Provider
/// polymorphism"). Implementations talk to the real orchestrator API; tests
/// use `InMemoryOrchestrator` (see `providers::fake`).
pub trait OrchestratorClient {
    fn list_nodes(&self) -> Result<Vec<RawNode>, CoreError>;
    fn list_pods(&self) -> Result<Vec<Pod>, CoreError>;

    /// Convenience wrapper fetching both; the driver collects both before
    /// computing (spec §5).
    fn snapshot(&self) -> Result<ClusterSnapshot, CoreError> {
        Ok(ClusterSnapshot {
            nodes: self.list_nodes()?,
            pods: self.list_pods()?,
        })
    }
}
