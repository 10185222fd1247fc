//! Fight observers: the capability to hear about combat outcomes.
//!
//! Observers are registered per attacking actor and invoked by
//! [`Actor::notify_fight`] from the combat thread, never under an actor
//! lock. Both standard observers serialize their own output, so several
//! actors may report through the same observer concurrently.

use std::fs::{File, OpenOptions};
use std::io::{self, Stdout, Write};
use std::path::Path;

use parking_lot::Mutex;

use crate::actor::Actor;

/// Header line written when a log sink is opened.
pub const LOG_HEADER: &str = "Battle Log";

/// Receives combat outcomes.
pub trait FightObserver: Send + Sync {
    /// Called after `attacker` fought `defender`. `won` is `true` when the
    /// defender was killed.
    fn on_fight(&self, attacker: &Actor, defender: &Actor, won: bool);
}

/// Reports successful kills as a human-readable block.
pub struct ConsoleObserver<W: Write + Send = Stdout> {
    out: Mutex<W>,
}

impl ConsoleObserver<Stdout> {
    /// Observer writing to standard output.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleObserver<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> ConsoleObserver<W> {
    /// Observer writing to an arbitrary sink.
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> FightObserver for ConsoleObserver<W> {
    fn on_fight(&self, attacker: &Actor, defender: &Actor, won: bool) {
        if !won {
            return;
        }
        let block = format!(
            "\nBATTLE RESULT\nAttacker: {attacker}\nDefender: {defender} was killed!\n\n\n"
        );
        let mut out = self.out.lock();
        if let Err(e) = out.write_all(block.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "console observer write failed");
        }
    }
}

/// Appends one line per successful kill to a durable sink.
pub struct LogObserver<W: Write + Send = File> {
    sink: Mutex<W>,
}

impl LogObserver<File> {
    /// Open (or create) `path` in append mode and write the log header.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Self::from_writer(file)
    }
}

impl<W: Write + Send> LogObserver<W> {
    /// Wrap an existing sink and write the log header to it.
    pub fn from_writer(mut sink: W) -> io::Result<Self> {
        writeln!(sink, "{LOG_HEADER}")?;
        sink.flush()?;
        Ok(Self {
            sink: Mutex::new(sink),
        })
    }

    /// Recover the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }
}

impl<W: Write + Send> FightObserver for LogObserver<W> {
    fn on_fight(&self, attacker: &Actor, defender: &Actor, won: bool) {
        if !won {
            return;
        }
        let line = format!("Battle: {attacker} killed {defender}\n");
        let mut sink = self.sink.lock();
        if let Err(e) = sink.write_all(line.as_bytes()).and_then(|()| sink.flush()) {
            tracing::warn!(error = %e, "battle log write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ActorKind;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn console_reports_only_kills() {
        let observer = ConsoleObserver::with_writer(Vec::new());
        let dragon = Actor::new(ActorKind::Dragon, 0, 0, "Smaug");
        let pegasus = Actor::new(ActorKind::Pegasus, 3, 4, "Wing");

        observer.on_fight(&dragon, &pegasus, false);
        observer.on_fight(&dragon, &pegasus, true);

        let text = String::from_utf8(observer.into_inner()).unwrap();
        assert_eq!(
            text,
            "\nBATTLE RESULT\n\
             Attacker: Dragon 'Smaug' at (0, 0)\n\
             Defender: Pegasus 'Wing' at (3, 4) was killed!\n\n\n"
        );
    }

    #[test]
    fn log_writes_header_and_kill_lines() {
        let observer = LogObserver::from_writer(Vec::new()).unwrap();
        let knight = Actor::new(ActorKind::Knight, 10, 10, "Lancelot");
        let dragon = Actor::new(ActorKind::Dragon, 12, 10, "Smaug");

        observer.on_fight(&knight, &dragon, true);
        observer.on_fight(&knight, &dragon, false);

        let text = String::from_utf8(observer.into_inner()).unwrap();
        assert_eq!(
            text,
            "Battle Log\nBattle: Knight 'Lancelot' at (10, 10) killed Dragon 'Smaug' at (12, 10)\n"
        );
    }

    #[test]
    fn log_file_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("battle.log");
        let dragon = Actor::new(ActorKind::Dragon, 0, 0, "d");
        let pegasus = Actor::new(ActorKind::Pegasus, 0, 0, "p");

        LogObserver::open(&path).unwrap().on_fight(&dragon, &pegasus, true);
        LogObserver::open(&path).unwrap().on_fight(&dragon, &pegasus, true);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], LOG_HEADER);
        assert_eq!(lines[2], LOG_HEADER);
        assert!(lines[1].starts_with("Battle: Dragon 'd'"));
    }

    #[test]
    fn concurrent_log_lines_stay_whole() {
        let observer = Arc::new(LogObserver::from_writer(Vec::new()).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let observer = Arc::clone(&observer);
                thread::spawn(move || {
                    let attacker = Actor::new(ActorKind::Dragon, t, t, format!("d{t}"));
                    let defender = Actor::new(ActorKind::Pegasus, t, t, format!("p{t}"));
                    for _ in 0..50 {
                        observer.on_fight(&attacker, &defender, true);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let observer = Arc::try_unwrap(observer).ok().unwrap();
        let text = String::from_utf8(observer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(lines.len(), 8 * 50);
        assert!(lines
            .iter()
            .all(|l| l.starts_with("Battle: Dragon 'd") && l.contains(" killed Pegasus 'p")));
    }
}
