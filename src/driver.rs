//! The periodic driver loop. Out of scope for the autoscale decision
//! function itself (spec §1), but still part of the crate: sleeps for
//! `interval_seconds`, fetches both snapshots, runs the pure decision core,
//! then applies the effector calls serially (spec §5, §6).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::autoscaler::decide_all;
use crate::cluster::build_asg_states;
use crate::config::Config;
use crate::effector::apply_decisions;
use crate::error::CoreError;
use crate::metrics::MetricsCollector;
use crate::providers::{ASGInfo, CloudAsgClient, OrchestratorClient};

pub struct Driver<'a> {
    orchestrator: &'a dyn OrchestratorClient,
    cloud: &'a dyn CloudAsgClient,
    config: Config,
    metrics: MetricsCollector,
}

impl<'a> Driver<'a> {
    pub fn new(orchestrator: &'a dyn OrchestratorClient, cloud: &'a dyn CloudAsgClient, config: Config) -> Self {
        Self {
            orchestrator,
            cloud,
            config,
            metrics: MetricsCollector::new(),
        }
    }

    /// Runs exactly one iteration. A `SnapshotError` is propagated for the
    /// caller to treat as "skip and continue" (or, for `--once`, as an
    /// unrecoverable failure — spec §6 "CLI surface").
    pub fn run_once(&mut self) -> Result<(), CoreError> {
        let snapshot = self
            .orchestrator
            .snapshot()
            .map_err(|e| CoreError::Snapshot(e.to_string()))?;
        let asg_infos: Vec<ASGInfo> = self
            .cloud
            .describe_asgs(None)
            .map_err(|e| CoreError::Snapshot(e.to_string()))?;

        let asg_states = build_asg_states(&snapshot, &asg_infos, &self.config)?;
        let decisions = decide_all(&asg_states, &self.config);
        let outcomes = apply_decisions(&decisions, self.cloud);

        for decision in &decisions {
            log::info!(
                "asg={} current={} required={:?} target={} reason={}",
                decision.asg_id,
                decision.current,
                decision.required,
                decision.target,
                decision.reason
            );
        }

        let reasons: Vec<_> = decisions.iter().map(|d| d.reason).collect();
        self.metrics.record_iteration(&reasons, &outcomes);

        Ok(())
    }

    /// Runs iterations every `interval_seconds` until a termination signal
    /// arrives. A `SnapshotError` skips the rest of this iteration; the next
    /// interval retries (spec §7).
    pub fn run_forever(&mut self) -> Result<(), CoreError> {
        let terminated = Arc::new(AtomicBool::new(false));
        let handler_flag = terminated.clone();
        ctrlc::set_handler(move || {
            handler_flag.store(true, Ordering::SeqCst);
        })
        .map_err(|e| CoreError::Config(format!("failed to install signal handler: {e}")))?;

        loop {
            if terminated.load(Ordering::SeqCst) {
                break;
            }

            if let Err(err) = self.run_once() {
                log::warn!("iteration skipped: {err}");
            }

            if self.config.once {
                break;
            }

            sleep_respecting_signal(Duration::from_secs(self.config.interval_seconds), &terminated);
        }

        self.metrics.print_summary();
        Ok(())
    }
}

fn sleep_respecting_signal(total: Duration, terminated: &AtomicBool) {
    const TICK: Duration = Duration::from_millis(200);
    let mut remaining = total;
    while remaining > Duration::ZERO {
        if terminated.load(Ordering::SeqCst) {
            return;
        }
        let step = remaining.min(TICK);
        std::thread::sleep(step);
        remaining -= step;
    }
}
