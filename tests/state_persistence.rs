use std::fs;

use zenmark::export::{ExportKind, write_export};
use zenmark::state::{DocumentState, FileStore, StorageKey, Theme};

fn open(path: &std::path::Path) -> DocumentState {
    DocumentState::load(Box::new(FileStore::open(path).unwrap()))
}

#[test]
fn test_fields_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut state = open(&path);
    state.set_text("# Draft\n\nbody");
    state.set_title("Draft");
    state.toggle_theme();
    state.set_split_ratio(64.0);
    drop(state);

    let state = open(&path);
    assert_eq!(state.text(), "# Draft\n\nbody");
    assert_eq!(state.title(), "Draft");
    assert_eq!(state.theme(), Theme::Light);
    assert_eq!(state.split_percent(), 64);
}

#[test]
fn test_malformed_split_ratio_loads_as_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let json = format!(
        r#"{{"{}": "abc", "{}": "kept"}}"#,
        StorageKey::SplitRatio.as_str(),
        StorageKey::Title.as_str()
    );
    fs::write(&path, json).unwrap();

    let state = open(&path);
    assert_eq!(state.split_percent(), 50);
    assert_eq!(state.title(), "kept");
}

#[test]
fn test_corrupt_state_file_is_set_aside_and_session_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "{ not json").unwrap();

    let mut state = open(&path);
    assert_eq!(state.split_percent(), 50);
    state.set_text("fresh start");
    assert!(dir.path().join("state.json.corrupt").exists());

    let state = open(&path);
    assert_eq!(state.text(), "fresh start");
}

#[test]
fn test_non_string_value_only_resets_its_own_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let json = format!(
        r#"{{"{}": "my work", "{}": 62}}"#,
        StorageKey::Text.as_str(),
        StorageKey::SplitRatio.as_str()
    );
    fs::write(&path, json).unwrap();

    let state = open(&path);
    assert_eq!(state.text(), "my work");
    assert_eq!(state.split_percent(), 50);
}

#[test]
fn test_two_instances_writing_different_fields_keep_both() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut first = open(&path);
    let mut second = open(&path);
    second.set_theme(Theme::Light);
    first.set_text("typed in first");

    let reopened = open(&path);
    assert_eq!(reopened.theme(), Theme::Light);
    assert_eq!(reopened.text(), "typed in first");

    let changed = first.reload_from_store();
    assert_eq!(changed, vec![StorageKey::Theme]);
    assert_eq!(first.theme(), Theme::Light);
}

#[test]
fn test_second_instance_sees_writes_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut first = open(&path);
    first.set_text("from first");
    let mut second = open(&path);
    assert_eq!(second.text(), "from first");

    first.set_text("edited again");
    first.set_title("Shared");
    let changed = second.reload_from_store();
    assert!(changed.contains(&StorageKey::Text));
    assert!(changed.contains(&StorageKey::Title));
    assert_eq!(second.text(), "edited again");
    assert_eq!(second.title(), "Shared");

    assert!(second.reload_from_store().is_empty());
}

#[test]
fn test_export_then_import_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = DocumentState::in_memory();
    state.set_text("# Notes\n\n- [ ] todo\n");
    state.set_title("Weekly notes");

    let path = write_export(
        dir.path(),
        state.title(),
        ExportKind::Markdown,
        &state.export_markdown(),
    )
    .unwrap();
    assert_eq!(path.file_name().unwrap(), "Weekly notes.md");

    let mut imported = DocumentState::in_memory();
    imported.import_path(&path).unwrap();
    assert_eq!(imported.text(), state.text());
    assert_eq!(imported.title(), "Weekly notes");
}

#[test]
fn test_unsupported_import_leaves_state_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, "a,b").unwrap();

    let mut state = DocumentState::in_memory();
    state.set_text("original");
    let err = state.import_path(&path).unwrap_err();
    assert!(err.to_string().contains("data.csv"));
    assert_eq!(state.text(), "original");
}
