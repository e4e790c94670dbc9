use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::core::error::Result;
use crate::features::victims::dtos::VictimResponseDto;
use crate::features::victims::models::VictimPatch;
use crate::features::victims::services::{DeathRuleTable, VictimService};
use crate::features::victims::store::VictimStore;

/// Counters for one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub examined: usize,
    pub transitioned: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    Completed(SweepReport),
    /// Another sweep was still running
    Skipped,
}

/// Clears the in-progress flag when the sweep ends, including on early return
struct SweepGuard<'a>(&'a AtomicBool);

impl<'a> SweepGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SweepGuard(flag))
    }
}

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Background worker that marks living victims dead once their death rule fires
///
/// Each sweep reads the whole alive set first, then issues one independent
/// write per victim that should die. A failed write is logged and the victim
/// stays alive until a later sweep succeeds.
pub struct DeathSweeper {
    victim_service: Arc<VictimService>,
    store: Arc<dyn VictimStore>,
    rules: DeathRuleTable,
    interval: Duration,
    batch_size: i64,
    in_progress: AtomicBool,
}

impl DeathSweeper {
    pub fn new(
        victim_service: Arc<VictimService>,
        store: Arc<dyn VictimStore>,
        rules: DeathRuleTable,
        interval: Duration,
        batch_size: i64,
    ) -> Self {
        Self {
            victim_service,
            store,
            rules,
            interval,
            batch_size: batch_size.max(1),
            in_progress: AtomicBool::new(false),
        }
    }

    /// Run the sweeper in a background loop until `cancel` fires
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs_f64(),
            batch_size = self.batch_size,
            "Starting death sweeper worker"
        );

        let mut interval = interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Death sweeper stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.sweep().await {
                        tracing::error!("Error running death sweep: {:?}", e);
                    }
                }
            }
        }
    }

    pub async fn sweep(&self) -> Result<SweepOutcome> {
        self.sweep_at(Utc::now()).await
    }

    /// Evaluate every living victim against the rules as of `now`
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> Result<SweepOutcome> {
        let Some(_guard) = SweepGuard::acquire(&self.in_progress) else {
            tracing::debug!("Death sweep already in progress, skipping tick");
            return Ok(SweepOutcome::Skipped);
        };

        let alive = self.fetch_alive().await?;
        let mut report = SweepReport {
            examined: alive.len(),
            ..Default::default()
        };

        for victim in alive.iter().filter(|v| self.should_die(v, now)) {
            match self.store.bulk_update(victim.id, VictimPatch::mark_dead()).await {
                Ok(()) => {
                    report.transitioned += 1;
                    tracing::info!(
                        category = victim
                            .death_type
                            .as_deref()
                            .and_then(|dt| self.rules.category_of(dt))
                            .unwrap_or("unknown"),
                        "Victim {} {} (id={}) is now dead",
                        victim.name,
                        victim.last_name,
                        victim.id
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        "Failed to mark victim {} as dead, will retry next sweep: {:?}",
                        victim.id,
                        e
                    );
                }
            }
        }

        if report.transitioned > 0 || report.failed > 0 {
            tracing::info!(
                examined = report.examined,
                transitioned = report.transitioned,
                failed = report.failed,
                "Death sweep finished"
            );
        } else {
            tracing::debug!(examined = report.examined, "Death sweep found nothing to do");
        }

        Ok(SweepOutcome::Completed(report))
    }

    fn should_die(&self, victim: &VictimResponseDto, now: DateTime<Utc>) -> bool {
        victim.is_alive
            && self.rules.should_die(
                now,
                victim.created_at,
                victim.death_type.as_deref(),
                !victim.images.is_empty(),
            )
    }

    /// Read all living victims before any write so paging is not disturbed by updates
    async fn fetch_alive(&self) -> Result<Vec<VictimResponseDto>> {
        let mut alive = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .victim_service
                .find_alive_batch(self.batch_size, offset)
                .await?;
            let fetched = page.len() as i64;
            alive.extend(page);

            if fetched < self.batch_size {
                break;
            }
            offset += fetched;
        }

        Ok(alive)
    }
}
