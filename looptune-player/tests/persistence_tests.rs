//! Save/load through real files, single playlists and slot sets

use looptune_player::playlist::{Playlist, PlaylistSlots, Track};
use looptune_player::Error;
use std::fs;
use tempfile::TempDir;

fn sample_playlist() -> Playlist {
    let mut list = Playlist::with_name("Road Trip");
    list.insert_back(Track::new("songs/Blue_Sky.mp3", "The Clouds"));
    list.insert_back(Track::new("songs/night drive.wav", "Synth Club"));
    list.insert_back(Track::new("songs/Échappée.flac", "Élodie"));
    list
}

fn sources(list: &Playlist) -> Vec<(String, String)> {
    list.iter()
        .map(|t| (t.source.clone(), t.artist.clone()))
        .collect()
}

#[test]
fn test_save_then_load_into_fresh_playlist() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("playlist1.json");
    let original = sample_playlist();

    original.save(&path).unwrap();

    let mut restored = Playlist::new();
    assert!(restored.load(&path).unwrap());
    assert_eq!(restored.name(), "Road Trip");
    assert_eq!(restored.len(), 3);
    assert_eq!(restored.cycle_len(), 3);
    assert!(restored.is_active());
    assert_eq!(sources(&restored), sources(&original));
}

#[test]
fn test_saved_file_uses_wire_field_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.json");

    sample_playlist().save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["listName"], "Road Trip");
    assert_eq!(value["length"], 3);
    assert_eq!(value["songs"][0]["song"], "songs/Blue_Sky.mp3");
    assert_eq!(value["songs"][2]["artist"], "Élodie");
}

#[test]
fn test_length_mismatch_still_loads_entries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("odd.json");
    fs::write(
        &path,
        r#"{"listName":"Odd","length":7,"songs":[{"song":"a.mp3","artist":"A"},{"song":"b.mp3","artist":"B"}]}"#,
    )
    .unwrap();

    let mut list = Playlist::new();
    assert!(list.load(&path).unwrap());
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(2).unwrap().source, "b.mp3");
}

#[test]
fn test_malformed_entries_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.json");
    fs::write(
        &path,
        r#"{"listName":"P","length":3,"songs":[{"song":"a.mp3","artist":"A"},{"song":5},{"song":"c.mp3","artist":"C"}]}"#,
    )
    .unwrap();

    let mut list = Playlist::new();
    list.load(&path).unwrap();

    let names: Vec<&str> = list.iter().map(|t| t.source.as_str()).collect();
    assert_eq!(names, vec!["a.mp3", "c.mp3"]);
}

#[test]
fn test_unparseable_file_keeps_existing_contents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let mut list = sample_playlist();
    let before = sources(&list);

    let err = list.load(&path).unwrap_err();
    assert!(matches!(err, Error::Persistence(_)));
    assert_eq!(sources(&list), before);
    assert_eq!(list.name(), "Road Trip");
}

#[test]
fn test_empty_playlist_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");

    Playlist::with_name("Nothing Yet").save(&path).unwrap();

    let mut list = sample_playlist();
    assert!(list.load(&path).unwrap());
    assert!(list.is_empty());
    assert!(list.head().is_none());
    assert_eq!(list.name(), "Nothing Yet");
}

#[test]
fn test_slots_save_and_restore() {
    let dir = TempDir::new().unwrap();

    let mut slots = PlaylistSlots::new(3);
    let first = slots.claim_free("Morning").unwrap();
    slots
        .get_mut(first)
        .unwrap()
        .insert_back(Track::new("m1.mp3", "M"));
    let second = slots.claim_free("Evening").unwrap();
    for i in 1..=2 {
        slots
            .get_mut(second)
            .unwrap()
            .insert_back(Track::new(format!("e{}.wav", i), "E"));
    }

    assert_eq!(slots.save_all(dir.path()), 2);
    assert!(dir.path().join("playlist1.json").exists());
    assert!(dir.path().join("playlist2.json").exists());
    assert!(!dir.path().join("playlist3.json").exists());

    let mut restored = PlaylistSlots::new(3);
    assert_eq!(restored.load_all(dir.path()), 2);
    assert_eq!(restored.display_name(0), "Morning");
    assert_eq!(restored.display_name(1), "Evening");
    assert_eq!(restored.display_name(2), "Playlist 3");
    assert_eq!(restored.get(1).unwrap().len(), 2);
    assert_eq!(restored.active().count(), 2);
}
