//! Commit gateway: where finished drags are persisted.
//!
//! Commits run in order on one worker thread and report back over a channel
//! the UI drains once per frame. The interaction never waits on them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;

use uuid::Uuid;

use crate::error::{Result, TimelineError};
use crate::io::file::{load_items, save_items};
use crate::model::{DatePatch, ScheduledItem};

/// Persists partial date updates for one item at a time.
pub trait CommitGateway: Send + Sync {
    /// Apply `patch` to the item. Fields absent from the patch must be left
    /// untouched.
    fn update_partial_dates(&self, item_id: Uuid, patch: &DatePatch) -> Result<()>;
}

/// Gateway backed by the local JSON item store.
pub struct JsonFileGateway {
    path: PathBuf,
    // Serializes read-modify-write cycles from concurrent commits.
    lock: Mutex<()>,
}

impl JsonFileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommitGateway for JsonFileGateway {
    fn update_partial_dates(&self, item_id: Uuid, patch: &DatePatch) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut items = load_items(&self.path)?;
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(TimelineError::UnknownItem(item_id))?;
        item.apply_patch(patch);
        save_items(&items, &self.path)
    }
}

/// Gateway holding items in memory; used when no data file is configured.
#[derive(Default)]
pub struct InMemoryGateway {
    items: RwLock<HashMap<Uuid, ScheduledItem>>,
}

impl InMemoryGateway {
    pub fn new(items: &[ScheduledItem]) -> Self {
        Self {
            items: RwLock::new(items.iter().map(|i| (i.id, i.clone())).collect()),
        }
    }

    pub fn get(&self, item_id: Uuid) -> Option<ScheduledItem> {
        self.items
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&item_id)
            .cloned()
    }
}

impl CommitGateway for InMemoryGateway {
    fn update_partial_dates(&self, item_id: Uuid, patch: &DatePatch) -> Result<()> {
        let mut items = self
            .items
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let item = items
            .get_mut(&item_id)
            .ok_or(TimelineError::UnknownItem(item_id))?;
        item.apply_patch(patch);
        Ok(())
    }
}

/// Result of one background commit.
#[derive(Debug)]
pub struct CommitOutcome {
    pub item_id: Uuid,
    pub patch: DatePatch,
    pub result: Result<()>,
}

/// One queued commit. The gateway travels with the job so a gateway swap
/// only affects later submissions.
struct CommitJob {
    gateway: Arc<dyn CommitGateway>,
    item_id: Uuid,
    patch: DatePatch,
    repaint: Option<egui::Context>,
}

/// Runs commits on a single background worker and collects their outcomes.
///
/// Jobs are handled strictly in submission order, so outcomes come back in
/// that order too and a later drag always lands after an earlier one.
pub struct CommitDispatcher {
    gateway: Arc<dyn CommitGateway>,
    job_tx: Sender<CommitJob>,
    outcome_rx: Receiver<CommitOutcome>,
    repaint: Option<egui::Context>,
    in_flight: usize,
}

impl CommitDispatcher {
    pub fn new(gateway: Arc<dyn CommitGateway>) -> Self {
        let (job_tx, job_rx) = channel::<CommitJob>();
        let (outcome_tx, outcome_rx) = channel();
        // Exits once the dispatcher (and with it `job_tx`) is dropped.
        thread::spawn(move || {
            for job in job_rx {
                let result = job.gateway.update_partial_dates(job.item_id, &job.patch);
                let sent = outcome_tx.send(CommitOutcome {
                    item_id: job.item_id,
                    patch: job.patch,
                    result,
                });
                if sent.is_err() {
                    break;
                }
                if let Some(ctx) = job.repaint {
                    ctx.request_repaint();
                }
            }
        });
        Self {
            gateway,
            job_tx,
            outcome_rx,
            repaint: None,
            in_flight: 0,
        }
    }

    /// Wake the UI when an outcome arrives.
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    /// Swap the gateway for subsequent commits (e.g. after opening another
    /// data file). Commits already queued keep their gateway.
    pub fn set_gateway(&mut self, gateway: Arc<dyn CommitGateway>) {
        self.gateway = gateway;
    }

    /// Number of commits submitted but not yet collected.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Fire and forget: queue `patch` for `item_id` on the worker.
    pub fn submit(&mut self, item_id: Uuid, patch: DatePatch) {
        tracing::info!(item = %item_id, ?patch, "committing date change");
        let job = CommitJob {
            gateway: Arc::clone(&self.gateway),
            item_id,
            patch,
            repaint: self.repaint.clone(),
        };
        match self.job_tx.send(job) {
            Ok(()) => self.in_flight += 1,
            Err(_) => tracing::error!(item = %item_id, "commit worker is gone, change dropped"),
        }
    }

    /// Drain finished commits without blocking.
    pub fn poll(&mut self) -> Vec<CommitOutcome> {
        let outcomes: Vec<CommitOutcome> = self.outcome_rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(outcomes.len());
        for outcome in &outcomes {
            match &outcome.result {
                Ok(()) => tracing::debug!(item = %outcome.item_id, "commit succeeded"),
                Err(e) => tracing::warn!(item = %outcome.item_id, error = %e, "commit failed"),
            }
        }
        outcomes
    }
}
