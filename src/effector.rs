//! Effector (spec §4.7): issues `set_desired_capacity` only where the target
//! differs from the current value, serially, in ASG-id ascending order. A
//! failure on one ASG never stops the others from being processed.

use crate::autoscaler::AutoscaleDecision;
use crate::providers::CloudAsgClient;

#[derive(Debug, Clone)]
pub struct EffectorOutcome {
    pub asg_id: String,
    pub applied: bool,
    pub error: Option<String>,
}

/// `decisions` must already be in ASG-id ascending order (the order
/// `autoscaler::decide_all` produces from its `BTreeMap` iteration).
pub fn apply_decisions(
    decisions: &[AutoscaleDecision],
    cloud: &dyn CloudAsgClient,
) -> Vec<EffectorOutcome> {
    decisions
        .iter()
        .map(|decision| apply_one(decision, cloud))
        .collect()
}

fn apply_one(decision: &AutoscaleDecision, cloud: &dyn CloudAsgClient) -> EffectorOutcome {
    if decision.target == decision.current {
        return EffectorOutcome {
            asg_id: decision.asg_id.clone(),
            applied: false,
            error: None,
        };
    }

    match cloud.set_desired_capacity(&decision.asg_id, decision.target) {
        Ok(()) => {
            log::info!(
                "asg={} current={} required={:?} target={} reason={} effector=applied",
                decision.asg_id,
                decision.current,
                decision.required,
                decision.target,
                decision.reason
            );
            EffectorOutcome {
                asg_id: decision.asg_id.clone(),
                applied: true,
                error: None,
            }
        }
        Err(err) => {
            log::warn!(
                "asg={} current={} target={} effector=failed error={}",
                decision.asg_id,
                decision.current,
                decision.target,
                err
            );
            EffectorOutcome {
                asg_id: decision.asg_id.clone(),
                applied: false,
                error: Some(err.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autoscaler::ReasonCode;
    use crate::providers::fake::InMemoryCloud;
    use crate::providers::ASGInfo;

    fn decision(asg_id: &str, current: i64, target: i64, reason: ReasonCode) -> AutoscaleDecision {
        AutoscaleDecision {
            asg_id: asg_id.to_string(),
            current,
            required: Some(target),
            target,
            reason,
        }
    }

    #[test]
    fn no_op_when_target_equals_current() {
        let cloud = InMemoryCloud::new(vec![ASGInfo {
            name: "a".to_string(),
            min: 0,
            max: 10,
            desired: 3,
            azs: vec![],
        }]);
        let outcomes = apply_decisions(&[decision("a", 3, 3, ReasonCode::Unchanged)], &cloud);
        assert!(!outcomes[0].applied);
        assert!(cloud.calls.borrow().is_empty());
    }

    #[test]
    fn calls_set_desired_capacity_when_target_differs() {
        let cloud = InMemoryCloud::new(vec![ASGInfo {
            name: "a".to_string(),
            min: 0,
            max: 10,
            desired: 3,
            azs: vec![],
        }]);
        let outcomes = apply_decisions(&[decision("a", 3, 5, ReasonCode::ScaleUp)], &cloud);
        assert!(outcomes[0].applied);
        assert_eq!(cloud.calls.borrow()[0], ("a".to_string(), 5));
    }

    #[test]
    fn one_asg_failure_does_not_block_others() {
        let cloud = InMemoryCloud::new(vec![
            ASGInfo {
                name: "a".to_string(),
                min: 0,
                max: 10,
                desired: 3,
                azs: vec![],
            },
            ASGInfo {
                name: "b".to_string(),
                min: 0,
                max: 10,
                desired: 3,
                azs: vec![],
            },
        ]);
        *cloud.fail_for.borrow_mut() = Some("a".to_string());
        let decisions = vec![
            decision("a", 3, 5, ReasonCode::ScaleUp),
            decision("b", 3, 5, ReasonCode::ScaleUp),
        ];
        let outcomes = apply_decisions(&decisions, &cloud);
        assert!(!outcomes[0].applied);
        assert!(outcomes[0].error.is_some());
        assert!(outcomes[1].applied);
    }
}
