//! Test utilities for Skirmish development.
//!
//! Recording and misbehaving [`FightObserver`]s plus population fixtures
//! shared by the integration tests of every crate.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use skirmish_core::{Actor, ActorKind, FightObserver};

/// One observed fight, copied out of the callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FightRecord {
    pub attacker: String,
    pub attacker_kind: ActorKind,
    pub defender: String,
    pub defender_kind: ActorKind,
    pub won: bool,
}

/// Observer that remembers every notification it receives.
#[derive(Default)]
pub struct RecordingObserver {
    records: Mutex<Vec<FightRecord>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FightRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl FightObserver for RecordingObserver {
    fn on_fight(&self, attacker: &Actor, defender: &Actor, won: bool) {
        self.records.lock().push(FightRecord {
            attacker: attacker.name().to_string(),
            attacker_kind: attacker.kind(),
            defender: defender.name().to_string(),
            defender_kind: defender.kind(),
            won,
        });
    }
}

/// Observer that panics on its `n`th notification (1-based).
pub struct PanickingObserver {
    after: usize,
    seen: AtomicUsize,
}

impl PanickingObserver {
    pub fn on_call(n: usize) -> Self {
        Self {
            after: n.max(1),
            seen: AtomicUsize::new(0),
        }
    }
}

impl FightObserver for PanickingObserver {
    fn on_fight(&self, _attacker: &Actor, _defender: &Actor, _won: bool) {
        if self.seen.fetch_add(1, Ordering::SeqCst) + 1 == self.after {
            panic!("observer failure injected by test");
        }
    }
}
