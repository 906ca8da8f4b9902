//! File-backed `OrchestratorClient`/`CloudAsgClient`, re-read from disk on
//! every call so a long-running `--interval-seconds` loop observes updates.
//!
//! This is a minimal, file-based stand-in for the real orchestrator/cloud
//! API clients (spec §1 lists both as out of scope, specified only by
//! interface in §6) — useful for demos, `--once` dry runs against a captured
//! snapshot, and the examples under `demos/`. Grounded on the teacher's
//! trace-loading pattern (`trace/generic.rs`): a plain `serde`-deserialized
//! file schema, converted into the crate's internal types.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cluster::node::RawNode;
use crate::cluster::pod::{Pod, PodPhase};
use crate::error::CoreError;
use crate::providers::cloud::{ASGInfo, CloudAsgClient};
use crate::providers::orchestrator::OrchestratorClient;

#[derive(Debug, Deserialize)]
struct NodeFile {
    name: String,
    #[serde(default)]
    labels: std::collections::HashMap<String, String>,
    allocatable_cpu: String,
    allocatable_memory: String,
    allocatable_pods: String,
    #[serde(default)]
    instance_type: String,
    #[serde(default = "default_true")]
    ready: bool,
    #[serde(default)]
    unschedulable: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct PodFile {
    #[serde(default = "default_namespace")]
    namespace: String,
    name: String,
    #[serde(default)]
    phase: PodPhaseFile,
    #[serde(default)]
    assigned_node: Option<String>,
    request_cpu: String,
    request_memory: String,
}

fn default_namespace() -> String {
    "default".to_string()
}

#[derive(Debug, Default, Deserialize)]
enum PodPhaseFile {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl From<PodPhaseFile> for PodPhase {
    fn from(value: PodPhaseFile) -> Self {
        match value {
            PodPhaseFile::Pending => PodPhase::Pending,
            PodPhaseFile::Running => PodPhase::Running,
            PodPhaseFile::Succeeded => PodPhase::Succeeded,
            PodPhaseFile::Failed => PodPhase::Failed,
            PodPhaseFile::Unknown => PodPhase::Unknown,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AsgFile {
    name: String,
    min: i64,
    max: i64,
    desired: i64,
    #[serde(default)]
    azs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ClusterSnapshotFile {
    #[serde(default)]
    nodes: Vec<NodeFile>,
    #[serde(default)]
    pods: Vec<PodFile>,
    #[serde(default)]
    asgs: Vec<AsgFile>,
}

fn load(path: &Path) -> Result<ClusterSnapshotFile, CoreError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CoreError::Snapshot(format!("cannot read snapshot file {path:?}: {e}")))?;
    serde_yaml::from_str(&contents)
        .map_err(|e| CoreError::Snapshot(format!("invalid snapshot file {path:?}: {e}")))
}

fn to_raw_node(file: NodeFile) -> Result<RawNode, CoreError> {
    use crate::resources::{Quantity, ResourceVector};

    let cpu = Quantity::parse_cpu(&file.allocatable_cpu)?;
    let memory = Quantity::parse_memory(&file.allocatable_memory)?;
    let pods = Quantity::parse_pods(&file.allocatable_pods)?;

    Ok(RawNode {
        name: file.name,
        labels: file.labels,
        allocatable: ResourceVector {
            cpu,
            memory,
            pods,
        },
        instance_type: file.instance_type,
        ready: file.ready,
        unschedulable: file.unschedulable,
    })
}

fn to_pod(file: PodFile) -> Result<Pod, CoreError> {
    let cpu = crate::resources::Quantity::parse_cpu(&file.request_cpu)?.units();
    let memory = crate::resources::Quantity::parse_memory(&file.request_memory)?.units();
    Ok(Pod::new(
        file.namespace,
        file.name,
        file.phase.into(),
        file.assigned_node,
        cpu,
        memory,
    ))
}

/// Reads node/pod snapshots from a YAML file, re-reading on every call.
pub struct FileOrchestrator {
    pub snapshot_path: PathBuf,
}

impl OrchestratorClient for FileOrchestrator {
    fn list_nodes(&self) -> Result<Vec<RawNode>, CoreError> {
        load(&self.snapshot_path)?
            .nodes
            .into_iter()
            .map(to_raw_node)
            .collect()
    }

    fn list_pods(&self) -> Result<Vec<Pod>, CoreError> {
        load(&self.snapshot_path)?.pods.into_iter().map(to_pod).collect()
    }
}

/// Reads ASG metadata from the same YAML file. `set_desired_capacity` only
/// logs — there is no real cloud to mutate in file-backed mode.
pub struct FileCloud {
    pub snapshot_path: PathBuf,
}

impl CloudAsgClient for FileCloud {
    fn describe_asgs(&self, names: Option<&[String]>) -> Result<Vec<ASGInfo>, CoreError> {
        let asgs = load(&self.snapshot_path)?
            .asgs
            .into_iter()
            .map(|a| ASGInfo {
                name: a.name,
                min: a.min,
                max: a.max,
                desired: a.desired,
                azs: a.azs,
            })
            .filter(|a| names.map(|n| n.contains(&a.name)).unwrap_or(true))
            .collect();
        Ok(asgs)
    }

    fn set_desired_capacity(&self, name: &str, value: i64) -> Result<(), CoreError> {
        log::info!("(file-backed cloud) would set asg {name} desired capacity to {value}");
        Ok(())
    }
}
