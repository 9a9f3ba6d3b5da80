use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use showroom::desk::inventory::VehicleCatalog;
use showroom::desk::pipeline::{DeskService, LeadRepository, ProposalRepository};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Handle to the background expiry task. Dropping it leaves the task
/// running; [`ExpiryScheduler::stop`] shuts it down and waits for the
/// current pass to finish.
pub(crate) struct ExpiryScheduler {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ExpiryScheduler {
    pub(crate) async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}

/// Spawns the recurring proposal-expiry pass. The first pass runs
/// immediately so a restart never leaves overdue proposals sitting in a
/// live state for a full interval.
pub(crate) fn spawn_expiry_scheduler<L, P, C>(
    service: Arc<DeskService<L, P, C>>,
    every: Duration,
) -> ExpiryScheduler
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    let (stop, mut stopped) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);

        loop {
            tokio::select! {
                _ = ticker.tick() => run_pass(&service),
                _ = stopped.changed() => break,
            }
        }
    });

    ExpiryScheduler { stop, task }
}

fn run_pass<L, P, C>(service: &DeskService<L, P, C>)
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    match service.run_expiry_sweep(Utc::now()) {
        Ok(report) => {
            info!(
                scanned = report.scanned,
                expired = report.expired,
                "expiry sweep finished"
            );
            for failure in &report.failures {
                warn!(
                    proposal_id = %failure.proposal_id,
                    reason = %failure.reason,
                    "proposal left unswept"
                );
            }
        }
        Err(error) => warn!(%error, "expiry sweep could not run"),
    }
}
