//! ASG aggregation & scale-down damping (spec §4.6), and the top-level
//! per-iteration decision loop (spec §8: reason codes `unchanged`,
//! `scale_up`, `scale_down_clamped`, `skipped_no_nodes`, `error`).

use std::collections::BTreeMap;

use crate::autoscaler::required::{buffered_demand, nodes_for_partition};
use crate::cluster::partition::ASGState;
use crate::config::Config;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    Unchanged,
    ScaleUp,
    ScaleDownClamped,
    SkippedNoNodes,
    Error,
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReasonCode::Unchanged => "unchanged",
            ReasonCode::ScaleUp => "scale_up",
            ReasonCode::ScaleDownClamped => "scale_down_clamped",
            ReasonCode::SkippedNoNodes => "skipped_no_nodes",
            ReasonCode::Error => "error",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone)]
pub struct AutoscaleDecision {
    pub asg_id: String,
    pub current: i64,
    /// `None` when the ASG's decision was skipped (no usable nodes, or a
    /// fatal `InvariantError`).
    pub required: Option<i64>,
    pub target: i64,
    pub reason: ReasonCode,
}

/// Required node count for one ASG: the sum over its partitions' required
/// node counts (spec §4.5 step 4). A partition with no `weakest` model
/// (neither itself nor any sibling AZ has a usable node) contributes zero
/// and is implicitly covered by the ASG-level "no usable nodes" check below.
fn required_for_asg(asg_id: &str, state: &ASGState, config: &Config) -> Result<i64, CoreError> {
    let mut total: i64 = 0;
    for partition in state.partitions.values() {
        let Some(weakest) = partition.weakest else {
            continue;
        };
        let demand = buffered_demand(partition, config);
        let n = nodes_for_partition(asg_id, &weakest, &demand, config)?;
        total += n as i64;
    }
    Ok(total)
}

/// `min_allowed = current - max(scale_down_step_fixed, ceil(scale_down_step_pct * current))`.
/// Final target = `max(required, min_allowed)`, clamped into `[min, max]`.
/// Scale-ups are never damped (spec §4.6).
fn clamp_scale_down(current: i64, required: i64, state: &ASGState, config: &Config) -> i64 {
    let pct_step = ((config.scale_down_step_pct as i64 * current) + 99) / 100;
    let max_decrease = config.scale_down_step_fixed as i64;
    let max_decrease = max_decrease.max(pct_step);

    let min_allowed = current - max_decrease;
    let target = required.max(min_allowed);
    target.clamp(state.min, state.max)
}

/// Runs the full per-ASG decision for every ASG in `asg_states`, in
/// ascending ASG-id order (spec §5 "effector calls are issued in a
/// deterministic order").
pub fn decide_all(asg_states: &BTreeMap<String, ASGState>, config: &Config) -> Vec<AutoscaleDecision> {
    asg_states
        .iter()
        .map(|(asg_id, state)| decide_one(asg_id, state, config))
        .collect()
}

fn decide_one(asg_id: &str, state: &ASGState, config: &Config) -> AutoscaleDecision {
    if !state.has_any_usable_node(config) {
        if state.current_desired > 0 {
            return AutoscaleDecision {
                asg_id: asg_id.to_string(),
                current: state.current_desired,
                required: None,
                target: state.current_desired,
                reason: ReasonCode::SkippedNoNodes,
            };
        }
    }

    match required_for_asg(asg_id, state, config) {
        Ok(required) => {
            let target = clamp_scale_down(state.current_desired, required, state, config);
            let reason = if target == state.current_desired {
                ReasonCode::Unchanged
            } else if target > state.current_desired {
                ReasonCode::ScaleUp
            } else {
                ReasonCode::ScaleDownClamped
            };
            AutoscaleDecision {
                asg_id: asg_id.to_string(),
                current: state.current_desired,
                required: Some(required),
                target,
                reason,
            }
        }
        Err(err) => {
            log::warn!("invariant error deciding for asg {asg_id}: {err}");
            AutoscaleDecision {
                asg_id: asg_id.to_string(),
                current: state.current_desired,
                required: None,
                target: state.current_desired,
                reason: ReasonCode::Error,
            }
        }
    }
}
