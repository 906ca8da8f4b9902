//! In-memory fakes for `OrchestratorClient`/`CloudAsgClient` — the zero-I/O
//! test doubles spec §9 calls for ("implementations should abstract them so
//! the decision function can be tested against an in-memory fake").
//!
//! Mirrors the teacher's always-compiled `test_util::helpers` module: these
//! are ordinary public types, not `#[cfg(test)]`, so both unit tests inside
//! this crate and the integration tests under `tests/` can use them.

use std::cell::RefCell;

use crate::cluster::node::RawNode;
use crate::cluster::pod::Pod;
use crate::error::CoreError;
use crate::providers::cloud::{ASGInfo, CloudAsgClient};
use crate::providers::orchestrator::OrchestratorClient;

#[derive(Debug, Default)]
pub struct InMemoryOrchestrator {
    pub nodes: Vec<RawNode>,
    pub pods: Vec<Pod>,
}

impl InMemoryOrchestrator {
    pub fn new(nodes: Vec<RawNode>, pods: Vec<Pod>) -> Self {
        Self { nodes, pods }
    }
}

impl OrchestratorClient for InMemoryOrchestrator {
    fn list_nodes(&self) -> Result<Vec<RawNode>, CoreError> {
        Ok(self.nodes.clone())
    }

    fn list_pods(&self) -> Result<Vec<Pod>, CoreError> {
        Ok(self.pods.clone())
    }
}

/// Records every `set_desired_capacity` call so tests can assert on the
/// effector's observed side effects.
#[derive(Debug, Default)]
pub struct InMemoryCloud {
    pub asgs: RefCell<Vec<ASGInfo>>,
    pub calls: RefCell<Vec<(String, i64)>>,
    /// If set, `set_desired_capacity` for this ASG name fails once (spec §7
    /// `EffectorError` scenarios).
    pub fail_for: RefCell<Option<String>>,
}

impl InMemoryCloud {
    pub fn new(asgs: Vec<ASGInfo>) -> Self {
        Self {
            asgs: RefCell::new(asgs),
            calls: RefCell::new(Vec::new()),
            fail_for: RefCell::new(None),
        }
    }
}

impl CloudAsgClient for InMemoryCloud {
    fn describe_asgs(&self, names: Option<&[String]>) -> Result<Vec<ASGInfo>, CoreError> {
        let all = self.asgs.borrow();
        Ok(match names {
            Some(names) => all
                .iter()
                .filter(|a| names.contains(&a.name))
                .cloned()
                .collect(),
            None => all.clone(),
        })
    }

    fn set_desired_capacity(&self, name: &str, value: i64) -> Result<(), CoreError> {
        if self.fail_for.borrow().as_deref() == Some(name) {
            *self.fail_for.borrow_mut() = None;
            return Err(CoreError::Effector {
                asg: name.to_string(),
                reason: "simulated provider rejection".to_string(),
            });
        }
        self.calls.borrow_mut().push((name.to_string(), value));
        let mut asgs = self.asgs.borrow_mut();
        if let Some(asg) = asgs.iter_mut().find(|a| a.name == name) {
            asg.desired = value;
        }
        Ok(())
    }
}
