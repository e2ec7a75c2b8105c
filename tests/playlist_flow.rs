use serde_json::json;
use tunehub::model::Track;
use tunehub::playlist::{FileSlot, MemorySlot, PlaylistError, PlaylistStore};

fn track(id: u64, title: &str) -> Track {
    Track::from_value(&json!({ "id": id, "title": title, "artist": { "name": "Band", "id": 9 }, "duration": 200 }))
}

#[test]
fn create_with_songs_is_one_playlist_holding_the_track() {
    let slot = MemorySlot::new();
    let mut store = PlaylistStore::open(Box::new(slot.clone()));
    let a = track(1, "Highway");

    let id = store.create_playlist_with_songs("Road Trip", vec![a.clone()]).expect("create");

    assert_eq!(store.playlists().len(), 1);
    let playlist = store.get(&id).expect("playlist");
    assert_eq!(playlist.name, "Road Trip");
    assert_eq!(playlist.songs, vec![a]);

    // Exactly one write happened and it already carried the track.
    let written: serde_json::Value = serde_json::from_str(&slot.contents().expect("written")).expect("json");
    assert_eq!(written[0]["songs"].as_array().map(Vec::len), Some(1));
}

#[test]
fn duplicate_names_are_rejected_in_every_create_path() {
    let mut store = PlaylistStore::open(Box::new(MemorySlot::new()));
    store.create_playlist("Road Trip").expect("create");

    assert_eq!(
        store.create_playlist_with_songs("road trip", vec![track(1, "a")]),
        Err(PlaylistError::DuplicateName("road trip".into()))
    );
    assert_eq!(store.create_playlist("ROAD TRIP "), Err(PlaylistError::DuplicateName("ROAD TRIP".into())));
    assert_eq!(store.create_playlist("   "), Err(PlaylistError::EmptyName));
    assert_eq!(store.playlists().len(), 1);
}

#[test]
fn emptied_playlist_is_kept_until_deletion_is_confirmed() {
    let mut store = PlaylistStore::open(Box::new(MemorySlot::new()));
    let keep = store.create_playlist_with_songs("Keep", vec![track(1, "a"), track(2, "b")]).expect("create");
    let drop = store.create_playlist_with_songs("Drop", vec![track(3, "c")]).expect("create");

    // Declined: the empty playlist stays.
    let emptied = store.remove_songs(&keep, vec!["1".into(), "2".into()]).expect("exists");
    assert!(emptied.songs.is_empty());
    assert!(store.get(&keep).is_some());

    // Confirmed: the playlist is gone.
    let emptied = store.remove_songs(&drop, vec!["3".into()]).expect("exists");
    assert!(emptied.songs.is_empty());
    assert!(store.remove_playlist(&drop));
    assert!(store.get(&drop).is_none());
    assert_eq!(store.playlists().len(), 1);
}

#[test]
fn mutations_on_missing_playlists_are_silent() {
    let mut store = PlaylistStore::open(Box::new(MemorySlot::new()));
    assert!(store.add_songs("ghost", vec![track(1, "a")]).is_none());
    assert!(store.remove_songs("ghost", vec!["1".into()]).is_none());
    assert!(!store.remove_playlist("ghost"));
    assert!(store.playlists().is_empty());
}

#[test]
fn file_slot_round_trips_the_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("playlists_v1.json");

    let original = {
        let mut store = PlaylistStore::open(Box::new(FileSlot::new(&path)));
        let mix = store.create_playlist("Mix").expect("create");
        store.add_songs(&mix, vec![track(1, "a"), track(2, "b"), track(1, "a")]);
        store.create_playlist_with_songs("Chill", vec![track(3, "c")]).expect("create");
        let focus = store.create_playlist("Focus").expect("create");
        store.rename_playlist(&focus, "Deep Focus").expect("rename");
        store.playlists().to_vec()
    };

    let reloaded = PlaylistStore::open(Box::new(FileSlot::new(&path)));
    assert_eq!(reloaded.playlists(), original.as_slice());
    assert_eq!(reloaded.playlists()[0].songs.len(), 2);
}

#[test]
fn corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("playlists_v1.json");
    std::fs::write(&path, "[{\"id\": 1").expect("write");

    let store = PlaylistStore::open(Box::new(FileSlot::new(&path)));
    assert!(store.playlists().is_empty());
}
