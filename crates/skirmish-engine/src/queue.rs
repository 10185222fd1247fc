//! Blocking FIFO of pending fights between the movement and combat loops.
//!
//! The movement loop pushes [`BattleTask`]s; the combat loop blocks in
//! [`BattleQueue::wait_and_pop`] until a task arrives, the timeout elapses,
//! or the queue is stopped.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use skirmish_core::ActorId;

/// A proposed fight: `attacker` against `defender`.
///
/// Participants are handles into the shared population. They are never
/// the same actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BattleTask {
    attacker: ActorId,
    defender: ActorId,
}

impl BattleTask {
    /// Propose a fight. Returns `None` when both handles name one actor.
    pub fn new(attacker: ActorId, defender: ActorId) -> Option<Self> {
        (attacker != defender).then_some(Self { attacker, defender })
    }

    /// The attacking actor.
    pub fn attacker(&self) -> ActorId {
        self.attacker
    }

    /// The defending actor.
    pub fn defender(&self) -> ActorId {
        self.defender
    }
}

#[derive(Default)]
struct Inner {
    tasks: VecDeque<BattleTask>,
    stopped: bool,
}

/// Unbounded multi-producer, multi-consumer FIFO of [`BattleTask`]s.
///
/// Each pushed task is delivered to exactly one consumer. Stopping the
/// queue wakes every waiter; tasks still pending after a stop can be
/// drained with [`try_pop`](Self::try_pop) or `wait_and_pop`.
#[derive(Default)]
pub struct BattleQueue {
    inner: Mutex<Inner>,
    available: Condvar,
}

// Compile-time assertion: BattleQueue is shared across worker threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<BattleQueue>();
};

impl BattleQueue {
    /// An empty, running queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `task` and wake one waiter.
    ///
    /// Pushing after [`stop`](Self::stop) is accepted; the task stays
    /// available to non-blocking drains.
    pub fn push(&self, task: BattleTask) {
        self.inner.lock().tasks.push_back(task);
        self.available.notify_one();
    }

    /// Pop the oldest task, blocking for at most `timeout`.
    ///
    /// Returns `None` on timeout, or at once when the queue is stopped and
    /// empty. A timeout too large to express as a deadline waits until a
    /// push or a stop.
    pub fn wait_and_pop(&self, timeout: Duration) -> Option<BattleTask> {
        let deadline = Instant::now().checked_add(timeout);
        let mut inner = self.inner.lock();
        loop {
            if let Some(task) = inner.tasks.pop_front() {
                return Some(task);
            }
            if inner.stopped {
                return None;
            }
            match deadline {
                Some(deadline) => {
                    if self.available.wait_until(&mut inner, deadline).timed_out() {
                        return inner.tasks.pop_front();
                    }
                }
                None => self.available.wait(&mut inner),
            }
        }
    }

    /// Pop the oldest task without blocking.
    pub fn try_pop(&self) -> Option<BattleTask> {
        self.inner.lock().tasks.pop_front()
    }

    /// Mark the queue stopped and wake every waiter.
    pub fn stop(&self) {
        self.inner.lock().stopped = true;
        self.available.notify_all();
    }

    /// Whether [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.inner.lock().stopped
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.inner.lock().tasks.len()
    }

    /// Whether no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().tasks.is_empty()
    }
}

impl std::fmt::Debug for BattleQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("BattleQueue")
            .field("pending", &inner.tasks.len())
            .field("stopped", &inner.stopped)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn task(a: u32, d: u32) -> BattleTask {
        BattleTask::new(ActorId(a), ActorId(d)).unwrap()
    }

    #[test]
    fn self_fight_is_rejected() {
        assert!(BattleTask::new(ActorId(4), ActorId(4)).is_none());
        let t = task(1, 2);
        assert_eq!((t.attacker(), t.defender()), (ActorId(1), ActorId(2)));
    }

    #[test]
    fn delivers_in_fifo_order() {
        let q = BattleQueue::new();
        for i in 0..5 {
            q.push(task(i, i + 1));
        }
        assert_eq!(q.len(), 5);
        for i in 0..5 {
            assert_eq!(q.wait_and_pop(Duration::ZERO), Some(task(i, i + 1)));
        }
        assert!(q.is_empty());
    }

    #[test]
    fn empty_queue_times_out() {
        let q = BattleQueue::new();
        let start = Instant::now();
        assert_eq!(q.wait_and_pop(Duration::from_millis(30)), None);
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(q.try_pop(), None);
    }

    #[test]
    fn push_wakes_blocked_waiter() {
        let q = Arc::new(BattleQueue::new());
        let waiter = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.wait_and_pop(Duration::from_secs(10)))
        };
        thread::sleep(Duration::from_millis(20));
        q.push(task(7, 8));
        assert_eq!(waiter.join().unwrap(), Some(task(7, 8)));
    }

    #[test]
    fn stop_wakes_blocked_waiter() {
        let q = Arc::new(BattleQueue::new());
        let waiter = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                let start = Instant::now();
                (q.wait_and_pop(Duration::from_secs(10)), start.elapsed())
            })
        };
        thread::sleep(Duration::from_millis(20));
        q.stop();
        let (popped, waited) = waiter.join().unwrap();
        assert_eq!(popped, None);
        assert!(waited < Duration::from_secs(5));
        assert!(q.is_stopped());
    }

    #[test]
    fn stopped_queue_still_yields_pending() {
        let q = BattleQueue::new();
        q.push(task(0, 1));
        q.push(task(1, 2));
        q.stop();
        assert_eq!(q.wait_and_pop(Duration::from_secs(10)), Some(task(0, 1)));
        assert_eq!(q.try_pop(), Some(task(1, 2)));

        let start = Instant::now();
        assert_eq!(q.wait_and_pop(Duration::from_secs(10)), None);
        assert!(start.elapsed() < Duration::from_secs(1));

        q.push(task(3, 4));
        assert_eq!(q.try_pop(), Some(task(3, 4)));
    }

    #[test]
    fn unbounded_timeout_on_stopped_queue_returns_at_once() {
        let q = BattleQueue::new();
        q.stop();
        assert_eq!(q.wait_and_pop(Duration::MAX), None);
    }

    #[test]
    fn unbounded_timeout_waits_for_push_or_stop() {
        let q = Arc::new(BattleQueue::new());
        let waiter = {
            let q = Arc::clone(&q);
            thread::spawn(move || (q.wait_and_pop(Duration::MAX), q.wait_and_pop(Duration::MAX)))
        };
        thread::sleep(Duration::from_millis(20));
        q.push(task(5, 6));
        thread::sleep(Duration::from_millis(20));
        q.stop();
        assert_eq!(waiter.join().unwrap(), (Some(task(5, 6)), None));
    }

    #[test]
    fn each_task_delivered_once_across_consumers() {
        let q = Arc::new(BattleQueue::new());
        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    let mut got = Vec::new();
                    while let Some(t) = q.wait_and_pop(Duration::from_millis(200)) {
                        got.push(t);
                    }
                    got
                })
            })
            .collect();

        for i in 0..1000 {
            q.push(task(i, i + 1));
        }

        let mut seen = HashSet::new();
        let mut total = 0;
        for c in consumers {
            for t in c.join().unwrap() {
                total += 1;
                assert!(seen.insert(t), "{t:?} delivered twice");
            }
        }
        assert_eq!(total, 1000);
    }
}
