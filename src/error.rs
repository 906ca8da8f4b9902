//! Error kinds for the autoscaler (spec §7).
//!
//! `ConfigError` is fatal at startup. `SnapshotError` means the current
//! iteration is skipped and the next interval retries. `DataError` marks a
//! single node or pod as unusable/pending without aborting the iteration.
//! `EffectorError` is logged per-ASG and does not stop other ASGs from being
//! processed. `InvariantError` is fatal for a single ASG's decision only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to fetch snapshot: {0}")]
    Snapshot(String),

    #[error("data error for {item}: {reason}")]
    Data { item: String, reason: String },

    #[error("effector error for asg {asg}: {reason}")]
    Effector { asg: String, reason: String },

    #[error("invariant violated for asg {asg}: {reason}")]
    Invariant { asg: String, reason: String },
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
