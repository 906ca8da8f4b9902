//! Run-level counters, printed at shutdown. Trimmed descendant of the
//! teacher's `metrics::collector`/`metrics::printer` pair: this crate has no
//! simulated time series to estimate, only counts of what happened across
//! iterations, so `average`'s running-statistics estimators are dropped.

use prettytable::{row, Table};

use crate::autoscaler::ReasonCode;
use crate::effector::EffectorOutcome;

#[derive(Debug, Default)]
pub struct MetricsCollector {
    pub iterations: u64,
    pub scale_up_decisions: u64,
    pub scale_down_decisions: u64,
    pub unchanged_decisions: u64,
    pub skipped_no_nodes_decisions: u64,
    pub error_decisions: u64,
    pub effector_applied: u64,
    pub effector_failed: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_iteration(&mut self, reasons: &[ReasonCode], outcomes: &[EffectorOutcome]) {
        self.iterations += 1;
        for reason in reasons {
            match reason {
                ReasonCode::ScaleUp => self.scale_up_decisions += 1,
                ReasonCode::ScaleDownClamped => self.scale_down_decisions += 1,
                ReasonCode::Unchanged => self.unchanged_decisions += 1,
                ReasonCode::SkippedNoNodes => self.skipped_no_nodes_decisions += 1,
                ReasonCode::Error => self.error_decisions += 1,
            }
        }
        for outcome in outcomes {
            if outcome.applied {
                self.effector_applied += 1;
            } else if outcome.error.is_some() {
                self.effector_failed += 1;
            }
        }
    }

    pub fn print_summary(&self) {
        let mut table = Table::new();
        table.add_row(row!["Metric", "Count"]);
        table.add_row(row!["Iterations run", self.iterations]);
        table.add_row(row!["Scale-up decisions", self.scale_up_decisions]);
        table.add_row(row!["Scale-down decisions", self.scale_down_decisions]);
        table.add_row(row!["Unchanged decisions", self.unchanged_decisions]);
        table.add_row(row!["Skipped (no usable nodes)", self.skipped_no_nodes_decisions]);
        table.add_row(row!["Invariant errors", self.error_decisions]);
        table.add_row(row!["Effector calls applied", self.effector_applied]);
        table.add_row(row!["Effector calls failed", self.effector_failed]);
        table.printstd();
    }
}
