use super::*;

#[test]
fn create_numbers_titles_and_shows_the_panel() {
    let mut state = TerminalState::default();
    assert!(!state.panel_visible);

    let first = state.create(SessionKind::Local);
    let second = state.create(SessionKind::Local);

    assert_eq!(state.session(first).unwrap().title, "Terminal 1");
    assert_eq!(state.session(second).unwrap().title, "Terminal 2");
    assert_eq!(state.foreground, Some(second));
    assert!(state.panel_visible);
    assert!(second > first);
}

#[test]
fn session_ids_are_never_reused() {
    let mut state = TerminalState::default();
    let first = state.create(SessionKind::Local);
    state.remove(first);
    let second = state.create(SessionKind::Local);
    assert!(second > first);
    // The title numbers by position, not by id.
    assert_eq!(state.session(second).unwrap().title, "Terminal 1");
}

#[test]
fn sessions_start_spawning_and_unbound() {
    let mut state = TerminalState::default();
    let id = state.create(SessionKind::Remote(7));

    let session = state.session(id).unwrap();
    assert_eq!(session.liveness, Liveness::Spawning);
    assert_eq!(session.kind, SessionKind::Remote(7));
    assert!(!session.bound);
}

#[test]
fn bind_reports_true_exactly_once() {
    let mut state = TerminalState::default();
    let id = state.create(SessionKind::Local);

    assert!(state.bind(id));
    assert!(!state.bind(id));
    assert!(!state.bind(999));
}

#[test]
fn remove_clamps_the_foreground_and_hides_an_empty_panel() {
    let mut state = TerminalState::default();
    let a = state.create(SessionKind::Local);
    let b = state.create(SessionKind::Local);
    let c = state.create(SessionKind::Local);

    state.set_foreground(b);
    assert!(state.remove(b));
    assert_eq!(state.foreground, Some(c));

    assert!(state.remove(c));
    assert_eq!(state.foreground, Some(a));
    assert!(state.panel_visible);

    assert!(state.remove(a));
    assert_eq!(state.foreground, None);
    assert!(!state.panel_visible);

    assert!(!state.remove(a));
}

#[test]
fn removing_a_background_session_keeps_the_foreground() {
    let mut state = TerminalState::default();
    let a = state.create(SessionKind::Local);
    let b = state.create(SessionKind::Local);

    state.remove(a);
    assert_eq!(state.foreground, Some(b));
}

#[test]
fn mark_running_only_moves_spawning_sessions() {
    let mut state = TerminalState::default();
    let id = state.create(SessionKind::Local);

    assert!(state.mark_running(id));
    assert_eq!(state.session(id).unwrap().liveness, Liveness::Running);
    // A late duplicate confirmation is ignored.
    assert!(!state.mark_running(id));
    assert!(!state.mark_running(999));
}

#[test]
fn spawn_failure_renders_inline_and_exits_the_session() {
    let mut state = TerminalState::default();
    let id = state.create(SessionKind::Local);

    assert!(state.mark_spawn_failed(id, "No such file or directory"));
    let session = state.session(id).unwrap();
    assert_eq!(session.liveness, Liveness::Exited);
    assert!(session
        .screen()
        .contents()
        .contains("Failed to spawn shell: No such file or directory"));
    // The session stays listed for the user to read the message.
    assert_eq!(state.sessions.len(), 1);
}

#[test]
fn output_feeds_the_parser_and_stale_output_is_discarded() {
    let mut state = TerminalState::default();
    let id = state.create(SessionKind::Local);

    assert!(state.apply_output(id, b"hello"));
    assert!(state.session(id).unwrap().screen().contents().contains("hello"));

    assert!(!state.apply_output(id, b""));
    assert!(!state.apply_output(999, b"late"));
}

#[test]
fn resize_clamps_to_one_and_reports_real_changes() {
    let mut state = TerminalState::default();
    let id = state.create(SessionKind::Local);
    let session = state.session_mut(id).unwrap();

    assert!(session.resize(40, 120));
    assert_eq!((session.rows, session.cols), (40, 120));
    assert!(!session.resize(40, 120));

    assert!(session.resize(0, 0));
    assert_eq!((session.rows, session.cols), (1, 1));
}

#[test]
fn rename_is_equality_gated() {
    let mut state = TerminalState::default();
    let id = state.create(SessionKind::Local);

    assert!(state.rename(id, "build".to_string()));
    assert!(!state.rename(id, "build".to_string()));
    assert!(!state.rename(999, "x".to_string()));
    assert_eq!(state.session(id).unwrap().title, "build");
}

#[test]
fn set_foreground_rejects_unknown_sessions() {
    let mut state = TerminalState::default();
    let a = state.create(SessionKind::Local);
    let b = state.create(SessionKind::Local);

    assert!(state.set_foreground(a));
    assert!(!state.set_foreground(a));
    assert!(!state.set_foreground(999));
    assert_eq!(state.foreground_session().unwrap().id, a);
    let _ = b;
}

#[test]
fn search_counts_matches_case_insensitively_and_wraps() {
    let mut state = TerminalState::default();
    let id = state.create(SessionKind::Local);
    state.apply_output(id, b"Error: one\r\nwarning\r\nerror: two\r\n");

    let session = state.session_mut(id).unwrap();
    assert!(session.set_search("error".to_string()));
    assert_eq!(session.search_match_count(), 2);

    assert!(session.search_next());
    assert_eq!(session.search.as_ref().unwrap().active_match, 1);
    assert!(session.search_next());
    assert_eq!(session.search.as_ref().unwrap().active_match, 0);

    // The overlay never alters the buffer.
    assert!(session.screen().contents().contains("warning"));
}

#[test]
fn empty_query_clears_the_overlay() {
    let mut state = TerminalState::default();
    let id = state.create(SessionKind::Local);
    state.apply_output(id, b"abc");

    let session = state.session_mut(id).unwrap();
    session.set_search("abc".to_string());
    assert!(session.set_search(String::new()));
    assert!(session.search.is_none());
    assert!(!session.clear_search());
    assert!(!session.search_next());
}
