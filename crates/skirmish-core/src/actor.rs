//! The thread-safe simulated entity.
//!
//! An [`Actor`] is shared by reference between the movement, combat and
//! presentation threads. Identity (id, kind, name) is immutable and read
//! without locking; position and aliveness live behind one per-actor
//! reader-writer lock; the observer list has its own lock.
//!
//! Two rules keep the population deadlock-free:
//!
//! - No method ever holds two actors' locks at once. [`Actor::is_close_to`]
//!   copies each position out under its own lock before comparing.
//! - Observer callbacks never run under a lock. [`Actor::notify_fight`]
//!   copies the subscriber list, releases the lock, then calls out.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use rand::Rng;
use smallvec::SmallVec;

use crate::id::ActorId;
use crate::kind::ActorKind;
use crate::observer::FightObserver;
use crate::position::Position;

/// Faces on the combat die.
pub const DIE_FACES: u8 = 6;

type ObserverList = SmallVec<[Weak<dyn FightObserver>; 2]>;

#[derive(Clone, Copy, Debug)]
struct ActorState {
    position: Position,
    alive: bool,
}

/// A simulated entity with a kind, a position and a life.
pub struct Actor {
    pub(crate) id: ActorId,
    kind: ActorKind,
    name: Arc<str>,
    state: RwLock<ActorState>,
    observers: RwLock<ObserverList>,
}

/// Immutable copy of an actor's observable state, taken under one lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorSnapshot {
    /// Handle of the actor in its population.
    pub id: ActorId,
    /// Kind of the actor.
    pub kind: ActorKind,
    /// Display name.
    pub name: Arc<str>,
    /// Position at snapshot time.
    pub position: Position,
    /// Aliveness at snapshot time.
    pub alive: bool,
}

// Compile-time assertion: Actor must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Actor>();
};

impl Actor {
    /// Create a live actor. Coordinates are clamped into the map.
    ///
    /// The id is provisional until the actor is placed in a
    /// [`Population`](crate::Population).
    pub fn new(kind: ActorKind, x: i32, y: i32, name: impl Into<String>) -> Self {
        Self::with_state(kind, Position::clamped(x, y), name, true)
    }

    /// Create an actor with explicit aliveness, as restored from a roster.
    pub fn with_state(
        kind: ActorKind,
        position: Position,
        name: impl Into<String>,
        alive: bool,
    ) -> Self {
        let name: String = name.into();
        Self {
            id: ActorId(0),
            kind,
            name: Arc::from(name),
            state: RwLock::new(ActorState {
                position: Position::clamped(position.x, position.y),
                alive,
            }),
            observers: RwLock::new(SmallVec::new()),
        }
    }

    /// Handle of this actor in its population.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Kind of this actor.
    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-step movement distance for this actor's kind.
    pub fn move_range(&self) -> i32 {
        self.kind.profile().move_range
    }

    /// Attack reach for this actor's kind.
    pub fn kill_range(&self) -> i32 {
        self.kind.profile().kill_range
    }

    /// Current position.
    pub fn position(&self) -> Position {
        self.state.read().position
    }

    /// Whether the actor is still alive.
    pub fn is_alive(&self) -> bool {
        self.state.read().alive
    }

    /// Consistent copy of position and aliveness.
    pub fn snapshot(&self) -> ActorSnapshot {
        let state = *self.state.read();
        ActorSnapshot {
            id: self.id,
            kind: self.kind,
            name: Arc::clone(&self.name),
            position: state.position,
            alive: state.alive,
        }
    }

    /// Move to `(x, y)`, clamping each axis independently into the map.
    pub fn set_position(&self, x: i32, y: i32) {
        self.state.write().position = Position::clamped(x, y);
    }

    /// Move by `(dx, dy)` in one exclusive section; returns the new position.
    pub fn translate(&self, dx: i32, dy: i32) -> Position {
        let mut state = self.state.write();
        state.position = state.position.offset(dx, dy);
        state.position
    }

    /// Mark the actor dead.
    ///
    /// Returns `true` only for the call that performed the transition, so
    /// concurrent killers can tell which of them landed the blow.
    pub fn kill(&self) -> bool {
        let mut state = self.state.write();
        std::mem::replace(&mut state.alive, false)
    }

    /// Whether `other` is within `distance` (inclusive, Euclidean).
    pub fn is_close_to(&self, other: &Actor, distance: i32) -> bool {
        let mine = self.position();
        let theirs = other.position();
        mine.within(theirs, distance)
    }

    /// Roll the attack die with the calling thread's generator.
    pub fn roll_attack(&self) -> u8 {
        roll_die(&mut rand::rng())
    }

    /// Roll the defense die with the calling thread's generator.
    pub fn roll_defense(&self) -> u8 {
        roll_die(&mut rand::rng())
    }

    /// Roll the attack die with an injected generator.
    pub fn roll_attack_with<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        roll_die(rng)
    }

    /// Roll the defense die with an injected generator.
    pub fn roll_defense_with<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        roll_die(rng)
    }

    /// Register an observer for fights this actor initiates.
    ///
    /// Only a weak reference is kept: the caller owns the observer, and
    /// observers dropped by their owner are skipped silently.
    pub fn subscribe(&self, observer: &Arc<dyn FightObserver>) {
        self.observers.write().push(Arc::downgrade(observer));
    }

    /// Number of registered observers that are still alive.
    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Report a fight against `defender` to every live observer.
    pub fn notify_fight(&self, defender: &Actor, won: bool) {
        let observers: ObserverList = self.observers.read().clone();
        for observer in observers.iter().filter_map(Weak::upgrade) {
            observer.on_fight(self, defender, won);
        }
    }
}

fn roll_die<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.random_range(1..=DIE_FACES)
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' at {}", self.kind, self.name, self.position())
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = *self.state.read();
        f.debug_struct("Actor")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("position", &state.position)
            .field("alive", &state.alive)
            .finish()
    }
}
