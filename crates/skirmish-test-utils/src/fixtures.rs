//! Canned populations for tests.

use skirmish_core::{Actor, ActorKind, Population};

/// A Dragon at (0, 0) and a Pegasus at (3, 4): distance 5, inside the
/// Dragon's kill range.
pub fn duel() -> Vec<Actor> {
    vec![
        Actor::new(ActorKind::Dragon, 0, 0, "Smaug"),
        Actor::new(ActorKind::Pegasus, 3, 4, "Wing"),
    ]
}

/// Up to 25 actors of every kind on a 100-unit lattice, out of each
/// other's reach until they move.
pub fn scattered(count: usize) -> Vec<Actor> {
    (0..count.min(25))
        .map(|i| {
            let kind = ActorKind::ALL[i % ActorKind::ALL.len()];
            let x = (i % 5) as i32 * 100;
            let y = (i / 5) as i32 * 100;
            Actor::new(kind, x, y, format!("{kind}_{}", i + 1))
        })
        .collect()
}

/// `prey` Pegasi followed by `hunters` Dragons, all at the centre of the
/// map. Pegasi come first so they move before the Dragons scan for them.
pub fn hunting_ground(prey: usize, hunters: usize) -> Vec<Actor> {
    let pegasi =
        (1..=prey).map(|i| Actor::new(ActorKind::Pegasus, 250, 250, format!("Pegasus_{i}")));
    let dragons =
        (1..=hunters).map(|i| Actor::new(ActorKind::Dragon, 250, 250, format!("Dragon_{i}")));
    pegasi.chain(dragons).collect()
}

/// [`duel`] as a population.
pub fn duel_population() -> Population {
    Population::new(duel())
}
