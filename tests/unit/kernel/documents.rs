use super::*;
use crate::kernel::language::LanguageId;
use std::path::PathBuf;

fn open(state: &mut DocumentState, path: &str, content: &str) -> DocumentId {
    state.insert_loaded(PathBuf::from(path), content.to_string());
    state.active_id().unwrap()
}

#[test]
fn insert_loaded_sets_name_language_and_activates() {
    let mut state = DocumentState::default();
    let id = open(&mut state, "/work/src/main.rs", "fn main() {}");

    let doc = state.get(id).unwrap();
    assert_eq!(doc.display_name, "main.rs");
    assert_eq!(doc.language, LanguageId::Rust);
    assert_eq!(doc.content(), "fn main() {}");
    assert!(!doc.is_dirty());
    assert_eq!(state.active_id(), Some(id));
}

#[test]
fn second_load_of_same_path_never_duplicates() {
    let mut state = DocumentState::default();
    let first = open(&mut state, "/work/a.txt", "one");
    open(&mut state, "/work/b.txt", "two");

    state.insert_loaded(PathBuf::from("/work/a.txt"), "racing".to_string());
    assert_eq!(state.documents().len(), 2);
    // The existing document wins and becomes active; its content is kept.
    assert_eq!(state.active_id(), Some(first));
    assert_eq!(state.get(first).unwrap().content(), "one");
}

#[test]
fn activate_path_only_hits_open_documents() {
    let mut state = DocumentState::default();
    let a = open(&mut state, "/work/a.txt", "");
    open(&mut state, "/work/b.txt", "");

    assert!(state.activate_path(std::path::Path::new("/work/a.txt")));
    assert_eq!(state.active_id(), Some(a));
    assert!(!state.activate_path(std::path::Path::new("/work/missing.txt")));
}

#[test]
fn dirty_is_derived_from_saved_baseline() {
    let mut state = DocumentState::default();
    let id = open(&mut state, "/work/a.txt", "original");

    assert!(state.update_content(id, "edited".to_string()));
    assert!(state.get(id).unwrap().is_dirty());

    // Typing back the original makes the document clean again.
    assert!(state.update_content(id, "original".to_string()));
    assert!(!state.get(id).unwrap().is_dirty());

    // Unchanged content reports no change.
    assert!(!state.update_content(id, "original".to_string()));
}

#[test]
fn save_target_snapshots_only_dirty_documents() {
    let mut state = DocumentState::default();
    let id = open(&mut state, "/work/a.txt", "original");

    assert!(state.save_target(id).is_none());
    state.update_content(id, "edited".to_string());

    let (path, content) = state.save_target(id).unwrap();
    assert_eq!(path, PathBuf::from("/work/a.txt"));
    assert_eq!(content, "edited");

    assert!(state.save_target(999).is_none());
}

#[test]
fn edits_racing_a_save_keep_the_document_dirty() {
    let mut state = DocumentState::default();
    let id = open(&mut state, "/work/a.txt", "v1");

    state.update_content(id, "v2".to_string());
    let (_, written) = state.save_target(id).unwrap();

    // More typing while the write is in flight.
    state.update_content(id, "v3".to_string());

    assert!(state.apply_saved(id, written));
    // Baseline is the written snapshot, not the current buffer.
    assert!(state.get(id).unwrap().is_dirty());

    let (_, written) = state.save_target(id).unwrap();
    state.apply_saved(id, written);
    assert!(!state.get(id).unwrap().is_dirty());
}

#[test]
fn dirty_ids_lists_only_modified_documents() {
    let mut state = DocumentState::default();
    let a = open(&mut state, "/work/a.txt", "");
    let b = open(&mut state, "/work/b.txt", "");
    open(&mut state, "/work/c.txt", "");

    state.update_content(a, "x".to_string());
    state.update_content(b, "y".to_string());

    assert_eq!(state.dirty_ids(), vec![a, b]);
}

#[test]
fn closing_the_active_tab_falls_back_to_the_clamped_neighbor() {
    let mut state = DocumentState::default();
    let a = open(&mut state, "/work/a.txt", "");
    let b = open(&mut state, "/work/b.txt", "");
    let c = open(&mut state, "/work/c.txt", "");

    // Close the middle while it is active: the tab now at that index wins.
    state.set_active(b);
    assert!(state.close(b));
    assert_eq!(state.active_id(), Some(c));

    // Close the last while active: clamp to the new last.
    assert!(state.close(c));
    assert_eq!(state.active_id(), Some(a));

    assert!(state.close(a));
    assert_eq!(state.active_id(), None);
}

#[test]
fn closing_an_inactive_tab_keeps_the_active_one() {
    let mut state = DocumentState::default();
    let a = open(&mut state, "/work/a.txt", "");
    let b = open(&mut state, "/work/b.txt", "");

    state.set_active(b);
    state.close(a);
    assert_eq!(state.active_id(), Some(b));
}

#[test]
fn close_unknown_and_close_all() {
    let mut state = DocumentState::default();
    assert!(!state.close(1));
    assert!(!state.close_all());

    open(&mut state, "/work/a.txt", "");
    open(&mut state, "/work/b.txt", "");
    assert!(state.close_all());
    assert!(state.documents().is_empty());
    assert_eq!(state.active_id(), None);
}

#[test]
fn tab_cycling_wraps_both_directions() {
    let mut state = DocumentState::default();
    let a = open(&mut state, "/work/a.txt", "");
    let b = open(&mut state, "/work/b.txt", "");
    let c = open(&mut state, "/work/c.txt", "");

    state.set_active(c);
    assert!(state.next_tab());
    assert_eq!(state.active_id(), Some(a));

    assert!(state.previous_tab());
    assert_eq!(state.active_id(), Some(c));
    assert!(state.previous_tab());
    assert_eq!(state.active_id(), Some(b));
}

#[test]
fn cycling_is_a_noop_with_one_or_zero_tabs() {
    let mut state = DocumentState::default();
    assert!(!state.next_tab());

    let id = open(&mut state, "/work/a.txt", "");
    assert!(!state.next_tab());
    assert!(!state.previous_tab());
    assert_eq!(state.active_id(), Some(id));
}

#[test]
fn set_active_rejects_unknown_and_reports_noops() {
    let mut state = DocumentState::default();
    let a = open(&mut state, "/work/a.txt", "");

    assert!(!state.set_active(999));
    assert!(!state.set_active(a));
    let b = open(&mut state, "/work/b.txt", "");
    assert_eq!(state.active_id(), Some(b));
    assert!(state.set_active(a));
}
