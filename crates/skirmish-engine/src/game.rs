//! The [`Game`] orchestrator and its run lifecycle.
//!
//! ```text
//!  Uninitialized --initialize/with_actors--> Ready --launch--> Running
//!                                              ^                  |
//!                                              |                stop
//!                                              |                  v
//!                                              +-- initialize -- Stopped
//! ```
//!
//! Shutdown ordering: running flag, queue stop, wake sleeping loops (by
//! dropping the shutdown sender), join movement, combat and render, then
//! drop dead actors from the population.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::{Actor, ConsoleObserver, FightObserver, LogObserver, Population};
use skirmish_roster::Spawner;

use crate::config::{ConfigError, GameConfig};
use crate::metrics::{MetricsSnapshot, SimMetrics};
use crate::queue::BattleQueue;
use crate::render::{FrameSink, StdoutSink};
use crate::workers::{self, PanicGuard, WorkerShared};

// ── Error types ──────────────────────────────────────────────────

/// Errors from [`Game`] operations.
#[derive(Debug)]
pub enum GameError {
    /// The operation is not allowed in the current state.
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// The state the game was in.
        state: GameState,
    },
    /// The configuration failed validation.
    Config(ConfigError),
    /// A worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed and why.
        reason: String,
    },
    /// A worker thread panicked. Every other thread was still joined.
    WorkerPanicked {
        /// Name of the worker that panicked.
        worker: &'static str,
        /// The panic message, if it carried one.
        reason: String,
    },
    /// The battle log could not be opened.
    Io(io::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState { operation, state } => {
                write!(f, "cannot {operation} while {state}")
            }
            Self::Config(e) => write!(f, "invalid config: {e}"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
            Self::WorkerPanicked { worker, reason } => {
                write!(f, "{worker} worker panicked: {reason}")
            }
            Self::Io(e) => write!(f, "battle log i/o error: {e}"),
        }
    }
}

impl Error for GameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for GameError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<io::Error> for GameError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

// ── GameState ────────────────────────────────────────────────────

/// Lifecycle state of a [`Game`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Constructed, no population yet.
    Uninitialized,
    /// Population installed, threads not running.
    Ready,
    /// Worker threads are running.
    Running,
    /// Threads joined, dead actors removed.
    Stopped,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Stopped => "stopped",
        })
    }
}

// ── RunReport ────────────────────────────────────────────────────

/// Summary returned by [`Game::stop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Wall-clock time from launch to the end of shutdown.
    pub elapsed_ms: u64,
    /// Actors in the population at launch.
    pub initial_count: usize,
    /// Live actors left after shutdown.
    pub survivors: usize,
    /// Worker threads joined cleanly.
    pub threads_joined: usize,
    /// Counters at the end of the run.
    pub metrics: MetricsSnapshot,
}

// ── StopHandle ───────────────────────────────────────────────────

/// Asks a blocking [`Game::start`] to end early.
///
/// Cloneable and `Send`; obtain it before calling `start()`. A request made
/// while nothing is blocked is discarded at the next launch.
#[derive(Clone, Debug)]
pub struct StopHandle {
    halt: Sender<()>,
}

impl StopHandle {
    /// Request the run to end.
    pub fn request_stop(&self) {
        let _ = self.halt.try_send(());
    }
}

// ── Game ─────────────────────────────────────────────────────────

const MOVEMENT: &str = "movement";
const COMBAT: &str = "combat";
const RENDER: &str = "render";

/// Orchestrates one population through movement, combat and
/// presentation threads.
pub struct Game {
    config: GameConfig,
    state: GameState,
    population: Arc<Population>,
    queue: Arc<BattleQueue>,
    metrics: Arc<SimMetrics>,
    running: Arc<AtomicBool>,
    /// Owns every observer registered on the population; actors only hold
    /// weak references.
    observers: Vec<Arc<dyn FightObserver>>,
    sink: Arc<dyn FrameSink>,
    halt_tx: Sender<()>,
    halt_rx: Receiver<()>,
    shutdown_tx: Option<Sender<()>>,
    threads: Vec<(&'static str, JoinHandle<()>)>,
    launched_at: Option<Instant>,
    initial_count: usize,
}

// Compile-time assertion: Game can be moved to another thread.
const _: fn() = || {
    fn assert<T: Send>() {}
    assert::<Game>();
};

impl Game {
    /// Validate `config` and create an empty game.
    ///
    /// Frames go to standard output until [`set_sink`](Self::set_sink)
    /// replaces the sink.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let (halt_tx, halt_rx) = crossbeam_channel::bounded(1);
        let sink: Arc<dyn FrameSink> = Arc::new(StdoutSink::new(config.grid_size));
        Ok(Self {
            config,
            state: GameState::Uninitialized,
            population: Arc::new(Population::default()),
            queue: Arc::new(BattleQueue::new()),
            metrics: Arc::new(SimMetrics::new()),
            running: Arc::new(AtomicBool::new(false)),
            observers: Vec::new(),
            sink,
            halt_tx,
            halt_rx,
            shutdown_tx: None,
            threads: Vec::new(),
            launched_at: None,
            initial_count: 0,
        })
    }

    /// Replace the presentation sink.
    pub fn set_sink(&mut self, sink: Arc<dyn FrameSink>) -> Result<(), GameError> {
        self.require_idle("set the sink")?;
        self.sink = sink;
        Ok(())
    }

    /// Spawn `actor_count` random actors and subscribe the game's own
    /// observers. A count of zero is rejected like a zero `actor_count` in
    /// the config.
    pub fn initialize(&mut self, actor_count: usize) -> Result<(), GameError> {
        self.require_idle("initialize")?;
        let mut spawner = match self.config.seed {
            Some(seed) => Spawner::seeded(seed),
            None => Spawner::from_entropy(),
        };
        self.install(spawner.spawn(actor_count))?;
        tracing::info!(actors = actor_count, "game initialized");
        Ok(())
    }

    /// [`initialize`](Self::initialize) with the configured actor count.
    pub fn initialize_default(&mut self) -> Result<(), GameError> {
        self.initialize(self.config.actor_count)
    }

    /// Install a pre-built population, e.g. a loaded roster. An empty
    /// population is rejected.
    pub fn with_actors(&mut self, actors: Vec<Actor>) -> Result<(), GameError> {
        self.require_idle("install actors")?;
        let count = actors.len();
        self.install(actors)?;
        tracing::info!(actors = count, "population installed");
        Ok(())
    }

    fn install(&mut self, actors: Vec<Actor>) -> Result<(), GameError> {
        if actors.is_empty() {
            return Err(ConfigError::NoActors.into());
        }
        let mut observers: Vec<Arc<dyn FightObserver>> = Vec::new();
        if self.config.console_reports {
            observers.push(Arc::new(ConsoleObserver::new()));
        }
        if let Some(path) = &self.config.log_path {
            observers.push(Arc::new(LogObserver::open(path)?));
        }

        let population = Population::new(actors);
        for observer in &observers {
            population.subscribe_all(observer);
        }
        self.population = Arc::new(population);
        self.observers = observers;
        self.state = GameState::Ready;
        Ok(())
    }

    /// Register `observer` on every actor. The game keeps it alive for as
    /// long as the population exists.
    pub fn subscribe_all(&mut self, observer: Arc<dyn FightObserver>) -> Result<(), GameError> {
        if self.state == GameState::Uninitialized {
            return Err(self.invalid("subscribe observers"));
        }
        self.population.subscribe_all(&observer);
        self.observers.push(observer);
        Ok(())
    }

    /// Spawn the movement, combat and render threads and return.
    pub fn launch(&mut self) -> Result<(), GameError> {
        if self.state != GameState::Ready {
            return Err(self.invalid("launch"));
        }

        while self.halt_rx.try_recv().is_ok() {}
        self.queue = Arc::new(BattleQueue::new());
        self.metrics = Arc::new(SimMetrics::new());
        self.running.store(true, Ordering::Release);
        self.initial_count = self.population.len();
        self.launched_at = Some(Instant::now());
        self.state = GameState::Running;

        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(0);
        self.shutdown_tx = Some(shutdown_tx);

        if let Err(e) = self.spawn_workers(shutdown_rx) {
            // Unwind whatever did start.
            let _ = self.stop();
            return Err(e);
        }
        tracing::info!(
            actors = self.initial_count,
            seed = ?self.config.seed,
            "game launched"
        );
        Ok(())
    }

    fn spawn_workers(&mut self, wake: Receiver<()>) -> Result<(), GameError> {
        let movement_interval = self.config.movement_interval;
        let combat_poll = self.config.combat_poll;
        let render_interval = self.config.render_interval;

        let shared = self.shared();
        let guard = self.guard(MOVEMENT);
        let rng = self.worker_rng(1);
        let movement_wake = wake.clone();
        self.spawn(MOVEMENT, move || {
            let _guard = guard;
            workers::movement_loop(&shared, rng, movement_interval, movement_wake);
        })?;

        let shared = self.shared();
        let guard = self.guard(COMBAT);
        let rng = self.worker_rng(2);
        self.spawn(COMBAT, move || {
            let _guard = guard;
            workers::combat_loop(&shared, rng, combat_poll);
        })?;

        let shared = self.shared();
        let guard = self.guard(RENDER);
        let sink = Arc::clone(&self.sink);
        self.spawn(RENDER, move || {
            let _guard = guard;
            workers::render_loop(&shared, sink.as_ref(), render_interval, wake);
        })?;
        Ok(())
    }

    fn spawn<F>(&mut self, worker: &'static str, f: F) -> Result<(), GameError>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(format!("skirmish-{worker}"))
            .spawn(f)
            .map_err(|e| GameError::ThreadSpawnFailed {
                reason: format!("{worker} thread: {e}"),
            })?;
        self.threads.push((worker, handle));
        Ok(())
    }

    fn shared(&self) -> WorkerShared {
        WorkerShared {
            population: Arc::clone(&self.population),
            queue: Arc::clone(&self.queue),
            metrics: Arc::clone(&self.metrics),
            running: Arc::clone(&self.running),
        }
    }

    fn guard(&self, worker: &'static str) -> PanicGuard {
        PanicGuard {
            worker,
            running: Arc::clone(&self.running),
            queue: Arc::clone(&self.queue),
            halt: self.halt_tx.clone(),
        }
    }

    /// Each worker draws from its own ChaCha stream of the configured seed.
    fn worker_rng(&self, stream: u64) -> ChaCha8Rng {
        match self.config.seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(stream);
                rng
            }
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }

    /// Launch, block for the configured run duration, then stop.
    ///
    /// Returns early when a [`StopHandle`] asks it to or a worker dies.
    pub fn start(&mut self) -> Result<RunReport, GameError> {
        self.launch()?;
        // The game holds a sender, so this only ends by message or timeout.
        let _ = self.halt_rx.recv_timeout(self.config.run_duration);
        self.stop()
    }

    /// Stop the worker threads, join them, and drop dead actors.
    ///
    /// If a worker panicked, every thread is still joined and dead actors
    /// are still removed before the panic is returned.
    pub fn stop(&mut self) -> Result<RunReport, GameError> {
        if self.state != GameState::Running {
            return Err(self.invalid("stop"));
        }

        self.running.store(false, Ordering::Release);
        self.queue.stop();
        self.shutdown_tx.take();

        let mut threads_joined = 0;
        let mut panicked = None;
        for (worker, handle) in self.threads.drain(..) {
            match handle.join() {
                Ok(()) => threads_joined += 1,
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    tracing::error!(worker, %reason, "worker thread panicked");
                    if panicked.is_none() {
                        panicked = Some(GameError::WorkerPanicked { worker, reason });
                    }
                }
            }
        }

        let population = std::mem::take(&mut self.population);
        self.population = match Arc::try_unwrap(population) {
            Ok(population) => Arc::new(population.into_survivors()),
            Err(shared) => {
                tracing::warn!("population still shared after join, keeping dead actors");
                shared
            }
        };
        self.state = GameState::Stopped;

        let report = RunReport {
            elapsed_ms: self
                .launched_at
                .take()
                .map_or(0, |t| t.elapsed().as_millis() as u64),
            initial_count: self.initial_count,
            survivors: self.population.alive_count(),
            threads_joined,
            metrics: self.metrics.snapshot(),
        };
        tracing::info!(
            elapsed_ms = report.elapsed_ms,
            initial = report.initial_count,
            survivors = report.survivors,
            kills = report.metrics.kills,
            "game stopped"
        );

        match panicked {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Handle that ends a blocking [`start`](Self::start) early.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            halt: self.halt_tx.clone(),
        }
    }

    /// Live actors. After a stop this is the whole population.
    pub fn survivors(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.population.iter().filter(|a| a.is_alive())
    }

    /// Every actor in the current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Counters for the current (or last) run.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// The validated configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn require_idle(&self, operation: &'static str) -> Result<(), GameError> {
        if self.state == GameState::Running {
            return Err(self.invalid(operation));
        }
        Ok(())
    }

    fn invalid(&self, operation: &'static str) -> GameError {
        GameError::InvalidState {
            operation,
            state: self.state,
        }
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        if self.state == GameState::Running {
            let _ = self.stop();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
