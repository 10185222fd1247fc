//! Skirmish: a real-time, multi-threaded actor skirmish simulation.
//!
//! Dragons, Knights and Pegasi wander a 500×500 map. A movement thread
//! steps every actor and proposes fights between actors in range, a
//! combat thread settles them with dice, and a presentation thread draws
//! a coarse map. This is the facade crate that re-exports the public API
//! of the Skirmish sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use skirmish::prelude::*;
//!
//! let config = GameConfig {
//!     run_duration: Duration::from_millis(50),
//!     movement_interval: Duration::from_millis(10),
//!     console_reports: false,
//!     seed: Some(7),
//!     ..GameConfig::default()
//! };
//! let mut game = Game::new(config).unwrap();
//! game.set_sink(Arc::new(NullSink)).unwrap();
//! game.initialize(20).unwrap();
//!
//! let report = game.start().unwrap();
//! assert_eq!(report.threads_joined, 3);
//! assert!(game.survivors().all(|a| a.is_alive()));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`actors`] | `skirmish-core` | Actors, kinds, combat rules, observers, population |
//! | [`roster`] | `skirmish-roster` | Factory, random spawner, roster files |
//! | [`engine`] | `skirmish-engine` | Battle queue, worker loops, `Game` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Actors, kinds, combat rules and observers (`skirmish-core`).
pub use skirmish_core as actors;

/// Actor construction and roster persistence (`skirmish-roster`).
///
/// Build single actors with [`roster::create_actor`], random populations
/// with [`roster::Spawner`], and save or load rosters with
/// [`roster::save_to_path`] and [`roster::load_from_path`].
pub use skirmish_roster as roster;

/// The runtime (`skirmish-engine`).
///
/// [`engine::Game`] owns the threads of a run; the single-step functions
/// in [`engine::workers`] drive a population by hand.
pub use skirmish_engine as engine;

/// Common imports for typical Skirmish usage.
///
/// ```rust
/// use skirmish::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use skirmish_core::{
        can_kill, Actor, ActorId, ActorKind, ActorSnapshot, ConsoleObserver, FightObserver,
        LogObserver, Population, Position, MAP_MAX, MAP_SIZE,
    };

    // Roster
    pub use skirmish_roster::{create_actor, load_from_path, save_to_path, Spawner};

    // Engine
    pub use skirmish_engine::{
        FrameSink, Game, GameConfig, GameError, GameState, MapRenderer, NullSink, RunReport,
        StdoutSink, StopHandle,
    };
}
