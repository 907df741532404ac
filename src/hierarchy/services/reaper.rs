//! Scheduled reaper: background enforcement of deletion deadlines.

use super::{LifecycleService, PurgeOutcome};
use crate::hierarchy::ports::{
    OrganizationRepository, ProjectRepository, PurgeExecutor, TaskRepository, WorkspaceRepository,
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Default time between sweeps.
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Reaper loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaperConfig {
    /// Time between sweeps.
    pub interval: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

/// Counters reported by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entities permanently deleted.
    pub purged: usize,
    /// Entities selected by the query but skipped at execution time
    /// (recovered, not yet due, or already gone).
    pub skipped: usize,
    /// Entities whose purge failed; the sweep continued past them.
    pub failed: usize,
}

/// Background process enforcing expiry of soft-deleted entities.
///
/// Runs on a fixed interval, independent of request traffic. Each sweep
/// queries for entities past their deadline and hands them to the
/// lifecycle manager's purge path one by one; a failure on one entity
/// never aborts the rest of the sweep.
#[derive(Clone)]
pub struct Reaper<O, W, P, T, X, C>
where
    O: OrganizationRepository,
    W: WorkspaceRepository,
    P: ProjectRepository,
    T: TaskRepository,
    X: PurgeExecutor,
    C: Clock + Send + Sync,
{
    lifecycle: LifecycleService<O, W, P, T, X, C>,
    organizations: Arc<O>,
    workspaces: Arc<W>,
    clock: Arc<C>,
    config: ReaperConfig,
}

impl<O, W, P, T, X, C> Reaper<O, W, P, T, X, C>
where
    O: OrganizationRepository,
    W: WorkspaceRepository,
    P: ProjectRepository,
    T: TaskRepository,
    X: PurgeExecutor,
    C: Clock + Send + Sync,
{
    /// Creates a new reaper.
    #[must_use]
    pub const fn new(
        lifecycle: LifecycleService<O, W, P, T, X, C>,
        organizations: Arc<O>,
        workspaces: Arc<W>,
        clock: Arc<C>,
        config: ReaperConfig,
    ) -> Self {
        Self {
            lifecycle,
            organizations,
            workspaces,
            clock,
            config,
        }
    }

    /// Runs one sweep over every entity whose deadline has passed.
    ///
    /// Organizations are swept before workspaces so a workspace already
    /// removed by its organization's cascade resolves to a cheap skip.
    /// The sweep is idempotent and re-entrant: running it twice, or
    /// concurrently with user-initiated recovery, never deletes a live
    /// entity because the purge path re-checks the deadline on the loaded
    /// record.
    pub async fn sweep(&self) -> SweepReport {
        let now = self.clock.utc();
        let mut report = SweepReport::default();

        match self.organizations.due_for_deletion(now).await {
            Ok(due) => {
                for id in due {
                    match self.lifecycle.purge_organization(id, now).await {
                        Ok(outcome) => Self::record(&mut report, outcome),
                        Err(err) => {
                            report.failed += 1;
                            error!(organization = %id, error = %err, "organization purge failed");
                        }
                    }
                }
            }
            Err(err) => error!(error = %err, "organization deadline query failed"),
        }

        match self.workspaces.due_for_deletion(now).await {
            Ok(due) => {
                for id in due {
                    match self.lifecycle.purge_workspace(id, now).await {
                        Ok(outcome) => Self::record(&mut report, outcome),
                        Err(err) => {
                            report.failed += 1;
                            error!(workspace = %id, error = %err, "workspace purge failed");
                        }
                    }
                }
            }
            Err(err) => error!(error = %err, "workspace deadline query failed"),
        }

        info!(
            purged = report.purged,
            skipped = report.skipped,
            failed = report.failed,
            "reaper sweep complete"
        );
        report
    }

    /// Runs the sweep loop until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = self.config.interval.as_secs(), "reaper started");

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    info!("reaper stopping");
                    break;
                }
                _ = interval.tick() => {
                    self.sweep().await;
                }
            }
        }
    }

    const fn record(report: &mut SweepReport, outcome: PurgeOutcome) {
        match outcome {
            PurgeOutcome::Purged { .. } => report.purged += 1,
            PurgeOutcome::SkippedActive | PurgeOutcome::SkippedNotDue | PurgeOutcome::Missing => {
                report.skipped += 1;
            }
        }
    }
}
