//! Arena owning every actor of a run.
//!
//! Workers never hold references from one actor to another. They pass
//! [`ActorId`] handles around (inside battle tasks, snapshots) and resolve
//! them against the shared population.

use std::sync::Arc;

use crate::actor::{Actor, ActorSnapshot};
use crate::id::ActorId;
use crate::observer::FightObserver;

/// Fixed-size set of actors addressed by [`ActorId`].
///
/// The set never grows or shrinks while workers share it. Dead actors stay
/// in place until [`into_survivors`](Population::into_survivors) rebuilds
/// the arena at shutdown.
#[derive(Debug, Default)]
pub struct Population {
    actors: Vec<Actor>,
}

impl Population {
    /// Take ownership of `actors`, assigning ids in order.
    pub fn new(mut actors: Vec<Actor>) -> Self {
        for (i, actor) in actors.iter_mut().enumerate() {
            actor.id = ActorId(i as u32);
        }
        Self { actors }
    }

    /// Resolve a handle.
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.index())
    }

    /// Number of actors, dead or alive.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether the population holds no actors.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Iterate over all actors in id order.
    pub fn iter(&self) -> std::slice::Iter<'_, Actor> {
        self.actors.iter()
    }

    /// All actors as a slice.
    pub fn as_slice(&self) -> &[Actor] {
        &self.actors
    }

    /// Number of actors currently alive.
    pub fn alive_count(&self) -> usize {
        self.actors.iter().filter(|a| a.is_alive()).count()
    }

    /// Per-actor snapshots, each taken under that actor's shared lock.
    pub fn snapshot(&self) -> Vec<ActorSnapshot> {
        self.actors.iter().map(Actor::snapshot).collect()
    }

    /// Register `observer` on every actor.
    pub fn subscribe_all(&self, observer: &Arc<dyn FightObserver>) {
        for actor in &self.actors {
            actor.subscribe(observer);
        }
    }

    /// Drop dead actors and renumber the rest.
    pub fn into_survivors(self) -> Population {
        let alive: Vec<Actor> = self.actors.into_iter().filter(Actor::is_alive).collect();
        Population::new(alive)
    }

    /// Give back the owned actors.
    pub fn into_actors(self) -> Vec<Actor> {
        self.actors
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Actor;
    type IntoIter = std::slice::Iter<'a, Actor>;

    fn into_iter(self) -> Self::IntoIter {
        self.actors.iter()
    }
}

impl FromIterator<Actor> for Population {
    fn from_iter<I: IntoIterator<Item = Actor>>(iter: I) -> Self {
        Population::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ActorKind;

    fn trio() -> Population {
        Population::new(vec![
            Actor::new(ActorKind::Dragon, 0, 0, "d"),
            Actor::new(ActorKind::Knight, 10, 10, "k"),
            Actor::new(ActorKind::Pegasus, 20, 20, "p"),
        ])
    }

    #[test]
    fn ids_follow_insertion_order() {
        let pop = trio();
        for (i, actor) in pop.iter().enumerate() {
            assert_eq!(actor.id(), ActorId(i as u32));
            assert_eq!(pop.get(ActorId(i as u32)).unwrap().name(), actor.name());
        }
        assert!(pop.get(ActorId(3)).is_none());
    }

    #[test]
    fn survivors_are_renumbered() {
        let pop = trio();
        pop.get(ActorId(0)).unwrap().kill();
        assert_eq!(pop.alive_count(), 2);

        let survivors = pop.into_survivors();
        assert_eq!(survivors.len(), 2);
        assert_eq!(survivors.get(ActorId(0)).unwrap().name(), "k");
        assert_eq!(survivors.get(ActorId(1)).unwrap().name(), "p");
        assert!(survivors.iter().all(Actor::is_alive));
    }

    #[test]
    fn snapshot_reflects_state() {
        let pop = trio();
        pop.get(ActorId(2)).unwrap().kill();
        let snap = pop.snapshot();
        assert_eq!(snap.len(), 3);
        assert!(snap[0].alive);
        assert!(!snap[2].alive);
        assert_eq!(snap[1].kind, ActorKind::Knight);
    }
}
