//! The three worker loops and the single steps they repeat.
//!
//! Each loop runs on its own named thread spawned by
//! [`Game::launch`](crate::Game::launch). The single-step functions
//! ([`movement_tick`], [`propose_fights`], [`resolve_task`]) are public
//! so a caller can drive a population by hand, without threads.
//!
//! ```text
//!  movement thread              combat thread              render thread
//!       |                            |                          |
//!  translate each actor         wait_and_pop(poll)        snapshot()
//!  scan kill range  --push-->   BattleQueue               sink.present()
//!  recv_timeout(interval)       roll, kill, notify        recv_timeout(interval)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use rand::Rng;

use skirmish_core::{can_kill, Actor, Population};

use crate::metrics::SimMetrics;
use crate::queue::{BattleQueue, BattleTask};
use crate::render::FrameSink;

// ── Single steps ───────────────────────────────────────────────────

/// How a [`BattleTask`] was settled by [`resolve_task`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FightOutcome {
    /// A participant was dead, or a handle did not resolve.
    Stale,
    /// The kinds cannot fight in this direction.
    Refused,
    /// The defender survived.
    Failed {
        /// Attacker's roll.
        attack: u8,
        /// Defender's roll.
        defense: u8,
    },
    /// The defender died by this fight.
    Killed {
        /// Attacker's roll.
        attack: u8,
        /// Defender's roll.
        defense: u8,
    },
}

/// Push a task for every other live actor `attacker` can kill within its
/// kill range. Returns the number of tasks pushed.
pub fn propose_fights(
    population: &Population,
    attacker: &Actor,
    queue: &BattleQueue,
    metrics: &SimMetrics,
) -> usize {
    let mut pushed = 0;
    let range = attacker.kill_range();
    for other in population {
        if !can_kill(attacker.kind(), other.kind()) || !other.is_alive() {
            continue;
        }
        if !attacker.is_close_to(other, range) {
            continue;
        }
        if let Some(task) = BattleTask::new(attacker.id(), other.id()) {
            queue.push(task);
            metrics.task_enqueued();
            pushed += 1;
        }
    }
    pushed
}

/// One movement pass: every live actor steps in a random direction, then
/// proposes fights from its new position. Returns the number of tasks
/// pushed.
pub fn movement_tick<R: Rng + ?Sized>(
    population: &Population,
    queue: &BattleQueue,
    rng: &mut R,
    metrics: &SimMetrics,
) -> usize {
    let mut pushed = 0;
    for actor in population {
        if !actor.is_alive() {
            continue;
        }
        let step = actor.move_range();
        let dx = rng.random_range(-1..=1) * step;
        let dy = rng.random_range(-1..=1) * step;
        actor.translate(dx, dy);
        pushed += propose_fights(population, actor, queue, metrics);
    }
    metrics.movement_tick();
    pushed
}

/// Settle one fight.
///
/// Both participants must still be alive and the rules must allow the
/// attack. The attacker wins when its roll beats the defender's. Only the
/// caller whose kill actually transitions the defender notifies the
/// attacker's observers.
pub fn resolve_task<R: Rng + ?Sized>(
    population: &Population,
    task: BattleTask,
    rng: &mut R,
    metrics: &SimMetrics,
) -> FightOutcome {
    let (Some(attacker), Some(defender)) =
        (population.get(task.attacker()), population.get(task.defender()))
    else {
        metrics.stale_task();
        return FightOutcome::Stale;
    };
    if !attacker.is_alive() || !defender.is_alive() {
        metrics.stale_task();
        tracing::trace!(?task, "discarding stale battle task");
        return FightOutcome::Stale;
    }
    if !can_kill(attacker.kind(), defender.kind()) {
        return FightOutcome::Refused;
    }

    let attack = attacker.roll_attack_with(rng);
    let defense = defender.roll_defense_with(rng);
    if attack <= defense {
        metrics.fight(false);
        tracing::debug!(
            attacker = attacker.name(),
            defender = defender.name(),
            attack,
            defense,
            "attack failed"
        );
        return FightOutcome::Failed { attack, defense };
    }

    if !defender.kill() {
        // Another fight got there first.
        metrics.stale_task();
        return FightOutcome::Stale;
    }
    metrics.fight(true);
    tracing::debug!(
        attacker = attacker.name(),
        defender = defender.name(),
        attack,
        defense,
        "defender killed"
    );
    attacker.notify_fight(defender, true);
    FightOutcome::Killed { attack, defense }
}

// ── Loops ──────────────────────────────────────────────────────────

/// State every worker loop shares.
#[derive(Clone)]
pub(crate) struct WorkerShared {
    pub(crate) population: Arc<Population>,
    pub(crate) queue: Arc<BattleQueue>,
    pub(crate) metrics: Arc<SimMetrics>,
    pub(crate) running: Arc<AtomicBool>,
}

impl WorkerShared {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Sleep for `interval` unless the shutdown channel disconnects first.
/// Returns `false` when the loop should exit.
fn pause(wake: &Receiver<()>, interval: Duration) -> bool {
    matches!(wake.recv_timeout(interval), Err(RecvTimeoutError::Timeout))
}

pub(crate) fn movement_loop<R: Rng>(
    shared: &WorkerShared,
    mut rng: R,
    interval: Duration,
    wake: Receiver<()>,
) {
    while shared.is_running() {
        movement_tick(&shared.population, &shared.queue, &mut rng, &shared.metrics);
        if !pause(&wake, interval) {
            break;
        }
    }
    tracing::debug!("movement loop exited");
}

pub(crate) fn combat_loop<R: Rng>(shared: &WorkerShared, mut rng: R, poll: Duration) {
    while shared.is_running() {
        if let Some(task) = shared.queue.wait_and_pop(poll) {
            resolve_task(&shared.population, task, &mut rng, &shared.metrics);
        } else if shared.queue.is_stopped() {
            break;
        }
    }
    let mut drained = 0usize;
    while let Some(task) = shared.queue.try_pop() {
        resolve_task(&shared.population, task, &mut rng, &shared.metrics);
        drained += 1;
    }
    tracing::debug!(drained, "combat loop exited");
}

pub(crate) fn render_loop(
    shared: &WorkerShared,
    sink: &dyn FrameSink,
    interval: Duration,
    wake: Receiver<()>,
) {
    while shared.is_running() {
        sink.present(&shared.population.snapshot());
        shared.metrics.frame_rendered();
        if !pause(&wake, interval) {
            break;
        }
    }
    tracing::debug!("render loop exited");
}

// ── Panic guard ────────────────────────────────────────────────────

/// Winds the whole run down if the owning worker unwinds.
///
/// Held for the lifetime of a worker closure. On a panicking drop it
/// clears the running flag, stops the queue and signals the halt channel,
/// so the other loops and a blocked `start()` return promptly.
pub(crate) struct PanicGuard {
    pub(crate) worker: &'static str,
    pub(crate) running: Arc<AtomicBool>,
    pub(crate) queue: Arc<BattleQueue>,
    pub(crate) halt: Sender<()>,
}

impl Drop for PanicGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            tracing::error!(worker = self.worker, "worker panicked, halting run");
            self.running.store(false, Ordering::Release);
            self.queue.stop();
            let _ = self.halt.try_send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use skirmish_core::{ActorId, ActorKind};

    fn duel() -> Population {
        Population::new(vec![
            Actor::new(ActorKind::Dragon, 0, 0, "Smaug"),
            Actor::new(ActorKind::Pegasus, 3, 4, "Wing"),
        ])
    }

    #[test]
    fn dragon_proposes_fight_with_nearby_pegasus() {
        let pop = duel();
        let q = BattleQueue::new();
        let m = SimMetrics::new();

        let dragon = pop.get(ActorId(0)).unwrap();
        let pegasus = pop.get(ActorId(1)).unwrap();
        assert_eq!(propose_fights(&pop, dragon, &q, &m), 1);
        assert_eq!(propose_fights(&pop, pegasus, &q, &m), 0);
        assert_eq!(
            q.try_pop(),
            BattleTask::new(ActorId(0), ActorId(1))
        );
        assert_eq!(m.snapshot().tasks_enqueued, 1);
    }

    #[test]
    fn distant_actors_never_propose() {
        let pop = Population::new(vec![
            Actor::new(ActorKind::Dragon, 0, 0, "d"),
            Actor::new(ActorKind::Pegasus, 400, 400, "p"),
            Actor::new(ActorKind::Knight, 200, 0, "k"),
        ]);
        let q = BattleQueue::new();
        let m = SimMetrics::new();
        for actor in &pop {
            assert_eq!(propose_fights(&pop, actor, &q, &m), 0);
        }
        assert!(q.is_empty());
    }

    #[test]
    fn dead_defenders_are_not_proposed() {
        let pop = duel();
        pop.get(ActorId(1)).unwrap().kill();
        let q = BattleQueue::new();
        let dragon = pop.get(ActorId(0)).unwrap();
        assert_eq!(propose_fights(&pop, dragon, &q, &SimMetrics::new()), 0);
    }

    #[test]
    fn resolve_follows_the_dice() {
        let m = SimMetrics::new();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut kills = 0;
        let mut failures = 0;
        for _ in 0..200 {
            let pop = duel();
            let task = BattleTask::new(ActorId(0), ActorId(1)).unwrap();
            match resolve_task(&pop, task, &mut rng, &m) {
                FightOutcome::Killed { attack, defense } => {
                    assert!(attack > defense);
                    assert!(!pop.get(ActorId(1)).unwrap().is_alive());
                    kills += 1;
                }
                FightOutcome::Failed { attack, defense } => {
                    assert!(attack <= defense);
                    assert!(pop.get(ActorId(1)).unwrap().is_alive());
                    failures += 1;
                }
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert!(kills > 0 && failures > 0);
        let s = m.snapshot();
        assert_eq!(s.kills, kills);
        assert_eq!(s.failed_attacks, failures);
        assert_eq!(s.fights_resolved, 200);
    }

    #[test]
    fn stale_and_refused_tasks() {
        let pop = duel();
        let m = SimMetrics::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let backwards = BattleTask::new(ActorId(1), ActorId(0)).unwrap();
        assert_eq!(resolve_task(&pop, backwards, &mut rng, &m), FightOutcome::Refused);

        let dangling = BattleTask::new(ActorId(0), ActorId(9)).unwrap();
        assert_eq!(resolve_task(&pop, dangling, &mut rng, &m), FightOutcome::Stale);

        pop.get(ActorId(1)).unwrap().kill();
        let task = BattleTask::new(ActorId(0), ActorId(1)).unwrap();
        assert_eq!(resolve_task(&pop, task, &mut rng, &m), FightOutcome::Stale);
        assert_eq!(m.snapshot().stale_tasks, 2);
        assert_eq!(m.snapshot().fights_resolved, 0);
    }

    #[test]
    fn movement_tick_keeps_actors_on_the_map() {
        let pop: Population = (0..30)
            .map(|i| Actor::new(ActorKind::ALL[i % 3], 0, 499, format!("a{i}")))
            .collect();
        let q = BattleQueue::new();
        let m = SimMetrics::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..50 {
            movement_tick(&pop, &q, &mut rng, &m);
        }
        for actor in &pop {
            let p = actor.position();
            assert!((0..=skirmish_core::MAP_MAX).contains(&p.x));
            assert!((0..=skirmish_core::MAP_MAX).contains(&p.y));
        }
        assert_eq!(m.snapshot().movement_ticks, 50);
        assert_eq!(m.snapshot().tasks_enqueued as usize, q.len());
    }

    #[test]
    fn dead_actors_do_not_move() {
        let pop = duel();
        pop.get(ActorId(0)).unwrap().kill();
        let before = pop.get(ActorId(0)).unwrap().position();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            movement_tick(&pop, &BattleQueue::new(), &mut rng, &SimMetrics::new());
        }
        assert_eq!(pop.get(ActorId(0)).unwrap().position(), before);
    }
}
