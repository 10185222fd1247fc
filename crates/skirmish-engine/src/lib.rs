//! Runtime for Skirmish: the battle queue, the three worker loops, and
//! the [`Game`] orchestrator that owns them.
//!
//! A run moves actors on one thread, resolves fights on a second and
//! renders frames on a third. All three share one
//! [`Population`](skirmish_core::Population) behind an `Arc`; every actor
//! guards its own state, so no lock spans more than one actor.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod game;
pub mod metrics;
pub mod queue;
pub mod render;
pub mod workers;

pub use config::{ConfigError, GameConfig};
pub use game::{Game, GameError, GameState, RunReport, StopHandle};
pub use metrics::{MetricsSnapshot, SimMetrics};
pub use queue::{BattleQueue, BattleTask};
pub use render::{FrameSink, MapRenderer, NullSink, StdoutSink, WriterSink};
pub use workers::{movement_tick, propose_fights, resolve_task, FightOutcome};
