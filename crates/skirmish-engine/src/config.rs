//! Game configuration, validation, and error types.
//!
//! [`GameConfig`] is the input to [`Game::new`](crate::Game::new).
//! [`validate()`](GameConfig::validate) checks structural invariants up
//! front so worker loops never see a zero interval or an empty grid.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`GameConfig::validate()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A worker interval is zero.
    ZeroInterval {
        /// Which interval was zero.
        name: &'static str,
    },
    /// The presentation grid has no cells.
    ZeroGrid,
    /// A run of zero actors was requested, in the config or at
    /// initialization.
    NoActors,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInterval { name } => write!(f, "{name} must be greater than zero"),
            Self::ZeroGrid => write!(f, "grid_size must be at least 1"),
            Self::NoActors => write!(f, "a run needs at least one actor"),
        }
    }
}

impl Error for ConfigError {}

// ── GameConfig ─────────────────────────────────────────────────────

/// Configuration for a [`Game`](crate::Game).
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Actors spawned by [`Game::initialize_default`](crate::Game::initialize_default).
    /// Default: 50.
    pub actor_count: usize,
    /// How long a blocking [`Game::start`](crate::Game::start) runs. Default: 30 s.
    pub run_duration: Duration,
    /// Pause between movement ticks. Default: 100 ms.
    pub movement_interval: Duration,
    /// Longest the combat loop blocks on an empty queue before re-checking
    /// the running flag. Default: 100 ms.
    pub combat_poll: Duration,
    /// Pause between rendered frames. Default: 1 s.
    pub render_interval: Duration,
    /// Rows and columns of the rendered map. Default: 10.
    pub grid_size: usize,
    /// Seed for spawning and for every worker's generator. `None` draws
    /// from entropy.
    pub seed: Option<u64>,
    /// Subscribe a stdout [`ConsoleObserver`](skirmish_core::ConsoleObserver)
    /// on initialize. Default: true.
    pub console_reports: bool,
    /// Append kills to this battle log on initialize. Default: none.
    pub log_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            actor_count: 50,
            run_duration: Duration::from_secs(30),
            movement_interval: Duration::from_millis(100),
            combat_poll: Duration::from_millis(100),
            render_interval: Duration::from_secs(1),
            grid_size: 10,
            seed: None,
            console_reports: true,
            log_path: None,
        }
    }
}

impl GameConfig {
    /// Check structural invariants.
    ///
    /// `run_duration` may be zero: a zero-length run launches and
    /// immediately stops.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, interval) in [
            ("movement_interval", self.movement_interval),
            ("combat_poll", self.combat_poll),
            ("render_interval", self.render_interval),
        ] {
            if interval.is_zero() {
                return Err(ConfigError::ZeroInterval { name });
            }
        }
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGrid);
        }
        if self.actor_count == 0 {
            return Err(ConfigError::NoActors);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = GameConfig::default();
        assert_eq!(c.actor_count, 50);
        assert_eq!(c.run_duration, Duration::from_secs(30));
        assert_eq!(c.movement_interval, Duration::from_millis(100));
        assert_eq!(c.render_interval, Duration::from_secs(1));
        assert_eq!(c.grid_size, 10);
        assert!(c.console_reports);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_intervals_rejected() {
        let c = GameConfig {
            combat_poll: Duration::ZERO,
            ..GameConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::ZeroInterval {
                name: "combat_poll"
            })
        );
    }

    #[test]
    fn zero_grid_and_actors_rejected() {
        let c = GameConfig {
            grid_size: 0,
            ..GameConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::ZeroGrid));

        let c = GameConfig {
            actor_count: 0,
            ..GameConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::NoActors));
    }

    #[test]
    fn zero_run_duration_allowed() {
        let c = GameConfig {
            run_duration: Duration::ZERO,
            ..GameConfig::default()
        };
        assert!(c.validate().is_ok());
    }
}
