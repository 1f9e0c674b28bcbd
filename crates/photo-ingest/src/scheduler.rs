//! Group-by-group batch scheduling
//!
//! Records are split into consecutive groups of at most `group_size`. Each
//! record of a group runs as its own tokio task and the scheduler waits for
//! every task of the group to settle before starting the next group. A failed
//! or panicking task only affects its own record.
//!
//! Outcomes come back in record order: within a group they are collected in
//! spawn order, and groups are appended one after another by the driving task.

use crate::record::Record;
use crate::transfer::{Fetcher, TransferOutcome, TransferUnit};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressDrawTarget};
use std::sync::Arc;
use tracing::{error, info};

/// Runs transfer units group by group with a hard barrier between groups
pub struct BatchScheduler<F> {
    unit: Arc<TransferUnit<F>>,
    group_size: usize,
    progress: ProgressBar,
}

impl<F: Fetcher + 'static> BatchScheduler<F> {
    /// A `group_size` of 0 is treated as 1
    pub fn new(unit: TransferUnit<F>, group_size: usize) -> Self {
        Self {
            unit: Arc::new(unit),
            group_size: group_size.max(1),
            progress: ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden()),
        }
    }

    /// Report each settled record on `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Transfer every record and return one outcome per record, in order
    pub async fn run_all(&self, records: &[Record]) -> Vec<TransferOutcome> {
        let group_count = records.len().div_ceil(self.group_size);
        let mut outcomes = Vec::with_capacity(records.len());

        for (index, group) in records.chunks(self.group_size).enumerate() {
            info!(
                group = index + 1,
                groups = group_count,
                size = group.len(),
                "Starting group"
            );

            let settled = self.run_group(group).await;
            let succeeded = settled.iter().filter(|o| o.is_success()).count();

            info!(
                group = index + 1,
                groups = group_count,
                succeeded,
                failed = settled.len() - succeeded,
                "Group settled"
            );

            outcomes.extend(settled);
        }

        self.progress.finish();
        outcomes
    }

    /// Spawn one task per record and wait for all of them
    async fn run_group(&self, group: &[Record]) -> Vec<TransferOutcome> {
        let handles: Vec<_> = group
            .iter()
            .cloned()
            .map(|record| {
                let unit = Arc::clone(&self.unit);
                let progress = self.progress.clone();
                tokio::spawn(async move {
                    let outcome = unit.transfer(&record).await;
                    progress.inc(1);
                    outcome
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(group)
            .map(|(joined, record)| {
                joined.unwrap_or_else(|err| {
                    error!(error = %err, "Transfer task did not complete");
                    self.progress.inc(1);
                    TransferOutcome::failed(record, format!("transfer task failed: {err}"))
                })
            })
            .collect()
    }
}
