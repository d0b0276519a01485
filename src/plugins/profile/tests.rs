use bevy::prelude::*;

use super::*;

#[test]
fn cycling_wraps_both_ways() {
    let mut p = PlayerProfile {
        characters: vec!["a".into(), "b".into(), "c".into()],
        ..default()
    };

    p.cycle_character(1);
    assert_eq!(p.used_character, 1);
    p.cycle_character(2);
    assert_eq!(p.used_character, 0);
    p.cycle_character(-1);
    assert_eq!(p.used_character, 2);

    // Single theme: any step stays on it.
    p.cycle_theme(-1);
    assert_eq!(p.used_theme, 0);
    p.cycle_theme(1);
    assert_eq!(p.used_theme, 0);
}

#[test]
fn in_memory_store_never_touches_disk() {
    let store = ProfileStore::default();
    assert!(store.path().is_none());
    store.save(&PlayerProfile::default()).expect("noop save");
    assert_eq!(store.load().expect("load"), PlayerProfile::default());
}

#[test]
fn save_then_load_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ProfileStore::at(dir.path().join("nested/profile.ron"));

    let profile = PlayerProfile {
        tutorial_done: true,
        premium: 7,
        ftue_level: 2,
        ..default()
    };
    store.save(&profile).expect("save");

    assert_eq!(store.load().expect("load"), profile);
}

#[test]
fn missing_or_corrupt_file_loads_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("profile.ron");
    let store = ProfileStore::at(&path);

    assert_eq!(store.load_or_default(), PlayerProfile::default());

    std::fs::write(&path, "(premium: ").expect("write");
    assert!(matches!(store.load(), Err(ProfileError::Decode(_))));
    assert_eq!(store.load_or_default(), PlayerProfile::default());
}

#[test]
fn plugin_keeps_preinserted_profile() {
    let mut app = App::new();
    app.insert_resource(PlayerProfile {
        premium: 42,
        ..default()
    });
    super::plugin(&mut app);

    assert!(app.world().get_resource::<ProfileStore>().is_some());
    assert_eq!(app.world().resource::<PlayerProfile>().premium, 42);
}

#[test]
fn plugin_loads_from_preinserted_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("profile.ron");
    let store = ProfileStore::at(&path);
    store
        .save(&PlayerProfile {
            coins: 9,
            ..default()
        })
        .expect("save");

    let mut app = App::new();
    app.insert_resource(store);
    super::plugin(&mut app);

    let world = app.world();
    assert_eq!(world.resource::<ProfileStore>().path(), Some(path.as_path()));
    assert_eq!(world.resource::<PlayerProfile>().coins, 9);
}
