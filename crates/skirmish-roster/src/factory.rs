//! Actor construction: single actors by kind, and random populations.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use skirmish_core::{Actor, ActorKind, KindError, MAP_MAX};

/// Build a live actor of `kind` at `(x, y)`.
///
/// Coordinates are clamped into the map. The name is trimmed, and a blank
/// `name` falls back to the kind label.
pub fn create_actor(kind: ActorKind, x: i32, y: i32, name: &str) -> Actor {
    let name = match name.trim() {
        "" => kind.label(),
        trimmed => trimmed,
    };
    Actor::new(kind, x, y, name)
}

/// Resolve a kind from its label (any case) or numeric code.
pub fn kind_from_str(s: &str) -> Result<ActorKind, KindError> {
    s.parse()
}

/// The label of a kind.
pub fn kind_to_str(kind: ActorKind) -> &'static str {
    kind.label()
}

/// Random population generator.
///
/// Kinds and coordinates are drawn uniformly. A seeded spawner always
/// produces the same population.
pub struct Spawner {
    rng: ChaCha8Rng,
}

impl Spawner {
    /// Deterministic spawner.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Spawner seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }

    /// Spawn `count` live actors named `<Kind>_<n>` (1-based).
    pub fn spawn(&mut self, count: usize) -> Vec<Actor> {
        (1..=count).map(|n| self.spawn_one(n)).collect()
    }

    fn spawn_one(&mut self, n: usize) -> Actor {
        let kind = ActorKind::ALL[self.rng.random_range(0..ActorKind::ALL.len())];
        let x = self.rng.random_range(0..=MAP_MAX);
        let y = self.rng.random_range(0..=MAP_MAX);
        create_actor(kind, x, y, &format!("{kind}_{n}"))
    }
}
