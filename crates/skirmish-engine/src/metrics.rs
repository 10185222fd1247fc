//! Run counters shared by the worker loops.
//!
//! [`SimMetrics`] is updated lock-free from every worker thread;
//! [`MetricsSnapshot`] is the plain copy handed to callers and reports.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for one run.
#[derive(Debug, Default)]
pub struct SimMetrics {
    movement_ticks: AtomicU64,
    tasks_enqueued: AtomicU64,
    fights_resolved: AtomicU64,
    kills: AtomicU64,
    failed_attacks: AtomicU64,
    stale_tasks: AtomicU64,
    frames_rendered: AtomicU64,
}

/// Point-in-time copy of [`SimMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Completed passes of the movement loop.
    pub movement_ticks: u64,
    /// Fights proposed by the movement loop. Pairs that stay in range are
    /// proposed again every tick.
    pub tasks_enqueued: u64,
    /// Fights in which dice were rolled.
    pub fights_resolved: u64,
    /// Fights that killed the defender.
    pub kills: u64,
    /// Fights the defender survived.
    pub failed_attacks: u64,
    /// Tasks discarded because a participant was already dead.
    pub stale_tasks: u64,
    /// Frames handed to the presentation sink.
    pub frames_rendered: u64,
}

impl SimMetrics {
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn movement_tick(&self) {
        self.movement_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn task_enqueued(&self) {
        self.tasks_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn fight(&self, killed: bool) {
        self.fights_resolved.fetch_add(1, Ordering::Relaxed);
        if killed {
            self.kills.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_attacks.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn stale_task(&self) {
        self.stale_tasks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn frame_rendered(&self) {
        self.frames_rendered.fetch_add(1, Ordering::Relaxed);
    }

    /// Read every counter.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            movement_ticks: self.movement_ticks.load(Ordering::Relaxed),
            tasks_enqueued: self.tasks_enqueued.load(Ordering::Relaxed),
            fights_resolved: self.fights_resolved.load(Ordering::Relaxed),
            kills: self.kills.load(Ordering::Relaxed),
            failed_attacks: self.failed_attacks.load(Ordering::Relaxed),
            stale_tasks: self.stale_tasks.load(Ordering::Relaxed),
            frames_rendered: self.frames_rendered.load(Ordering::Relaxed),
        }
    }
}
