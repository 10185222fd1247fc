//! Roster files on disk: spawn, save, reload.

use skirmish_core::{Actor, ActorKind, Population};
use skirmish_roster::{create_actor, load_from_path, save_to_path, PersistError, Spawner};

fn key(actors: &[Actor]) -> Vec<(ActorKind, i32, i32, String, bool)> {
    actors
        .iter()
        .map(|a| {
            let p = a.position();
            (a.kind(), p.x, p.y, a.name().to_string(), a.is_alive())
        })
        .collect()
}

#[test]
fn spawned_roster_survives_a_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.txt");

    let actors = Spawner::seeded(7).spawn(50);
    actors[3].kill();
    actors[11].kill();
    save_to_path(&actors, &path).unwrap();

    let loaded = load_from_path(&path).unwrap();
    assert_eq!(key(&actors), key(&loaded));
    assert_eq!(loaded.iter().filter(|a| a.is_alive()).count(), 48);
}

#[test]
fn saving_twice_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.txt");

    save_to_path(&Spawner::seeded(1).spawn(10), &path).unwrap();
    let second = vec![create_actor(ActorKind::Knight, 1, 2, "Kay")];
    save_to_path(&second, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "2\n1\n2\nKay\n1\n\n");
}

#[test]
fn loaded_roster_feeds_a_population() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.txt");
    save_to_path(&Spawner::seeded(3).spawn(12), &path).unwrap();

    let pop: Population = load_from_path(&path).unwrap().into_iter().collect();
    assert_eq!(pop.len(), 12);
    for (i, actor) in pop.iter().enumerate() {
        assert_eq!(actor.id().index(), i);
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_from_path(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, PersistError::Io(_)));
}
