//! Core types for the Skirmish simulation.
//!
//! This is the leaf crate of the workspace. It defines actor identity and
//! kinds, the combat rule matrix, map positions, the thread-safe [`Actor`]
//! itself, the fight-observer capability, and the [`Population`] arena the
//! engine's worker threads share.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod actor;
pub mod error;
pub mod id;
pub mod kind;
pub mod observer;
pub mod population;
pub mod position;
pub mod rules;

pub use actor::{Actor, ActorSnapshot};
pub use error::KindError;
pub use id::ActorId;
pub use kind::{ActorKind, KindProfile};
pub use observer::{ConsoleObserver, FightObserver, LogObserver};
pub use population::Population;
pub use position::{Position, MAP_MAX, MAP_SIZE};
pub use rules::can_kill;
