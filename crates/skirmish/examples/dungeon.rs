//! Skirmish Dungeon: the classic fifty-NPC run.
//!
//! Spawns 50 random actors, prints every kill and a map each second, and
//! stops after 30 seconds (or earlier with a first argument in seconds).
//! Survivors are listed at the end and saved to `survivors.txt`.
//!
//! Run with:
//!   cargo run --example dungeon
//!   RUST_LOG=skirmish_engine=debug cargo run --example dungeon -- 5

use std::error::Error;
use std::time::Duration;

use skirmish::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let seconds = std::env::args()
        .nth(1)
        .map(|s| s.parse::<u64>())
        .transpose()?
        .unwrap_or(30);

    let config = GameConfig {
        run_duration: Duration::from_secs(seconds),
        log_path: Some("game_log.txt".into()),
        ..GameConfig::default()
    };
    let mut game = Game::new(config)?;
    game.initialize_default()?;
    println!("Game initialized with {} NPCs", game.population().len());
    println!("Game started! Duration: {seconds} seconds");

    let report = game.start()?;

    println!("\n=== GAME OVER ===");
    println!("Survivors ({}):", report.survivors);
    for actor in game.survivors() {
        println!("  {actor}");
    }
    println!(
        "Kills: {}  Failed attacks: {}  Stale tasks: {}",
        report.metrics.kills, report.metrics.failed_attacks, report.metrics.stale_tasks
    );

    save_to_path(game.population().as_slice(), "survivors.txt")?;
    Ok(())
}
