//! Roster collaborators for Skirmish: building actors before a run and
//! moving actor lists to and from text.
//!
//! Nothing here runs concurrently with the simulation. Actors produced by
//! the [`factory`] or [`persist`] modules are fully constructed before
//! they are handed to the engine.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod factory;
pub mod persist;

pub use factory::{create_actor, kind_from_str, kind_to_str, Spawner};
pub use persist::{load, load_from_path, save, save_to_path, PersistError};
