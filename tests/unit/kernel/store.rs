use super::*;
use crate::kernel::services::ports::file::DirEntry;
use crate::kernel::services::ports::vcs::{MutationKind, RepoMutation, RepoStatus};
use crate::kernel::terminal::Liveness;
use std::path::Path;

fn store() -> Store {
    Store::new(WorkspaceState::new())
}

fn store_with_root(root: &str) -> Store {
    let mut store = store();
    store.dispatch(Action::SetRoot(Some(PathBuf::from(root))));
    store
}

fn open_document(store: &mut Store, path: &str, content: &str) -> crate::kernel::DocumentId {
    store.dispatch(Action::FileLoaded {
        path: PathBuf::from(path),
        content: content.to_string(),
    });
    store.state().documents.active_id().unwrap()
}

fn bound_terminal(store: &mut Store) -> SessionId {
    store.dispatch(Action::CreateTerminal(SessionKind::Local));
    let id = store.state().terminal.foreground.unwrap();
    store.dispatch(Action::BindTerminal(id));
    id
}

#[test]
fn set_root_loads_the_tree_and_kicks_off_repo_work() {
    let mut store = store();
    let result = store.dispatch(Action::SetRoot(Some(PathBuf::from("/work"))));

    assert!(result.state_changed);
    assert!(result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::LoadDir(p) if p == Path::new("/work"))));
    assert!(result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::StartRepoPolling { root } if root == Path::new("/work"))));
    let refreshes = result
        .effects
        .iter()
        .filter(|e| matches!(e, Effect::RefreshRepo { .. }))
        .count();
    assert_eq!(refreshes, 4);
    assert!(result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::PersistSettings)));

    assert_eq!(store.state().root.as_deref(), Some(Path::new("/work")));
    assert!(store.state().explorer.is_expanded(Path::new("/work")));
}

#[test]
fn clearing_the_root_stops_polling_and_drops_repo_state() {
    let mut store = store_with_root("/work");
    store.dispatch(Action::RepoHeadLoaded(Some("main".to_string())));

    let result = store.dispatch(Action::SetRoot(None));
    assert!(result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::StopRepoPolling)));
    assert!(!result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::RefreshRepo { .. })));
    assert!(store.state().repository.head.is_none());
    assert!(store.state().locator_files.is_empty());
}

#[test]
fn open_file_fetches_once_then_activates_the_existing_tab() {
    let mut store = store_with_root("/work");

    let result = store.dispatch(Action::OpenFile(PathBuf::from("/work/a.rs")));
    assert!(matches!(
        &result.effects[..],
        [Effect::LoadFile(p)] if p == Path::new("/work/a.rs")
    ));

    let a = open_document(&mut store, "/work/a.rs", "fn a() {}");
    open_document(&mut store, "/work/b.rs", "fn b() {}");

    // Re-opening never re-reads the file.
    let result = store.dispatch(Action::OpenFile(PathBuf::from("/work/a.rs")));
    assert!(result.effects.is_empty());
    assert!(result.state_changed);
    assert_eq!(store.state().documents.active_id(), Some(a));
}

#[test]
fn save_flow_keeps_racing_edits_dirty() {
    let mut store = store_with_root("/work");
    let id = open_document(&mut store, "/work/a.rs", "v1");

    store.dispatch(Action::UpdateContent {
        id,
        content: "v2".to_string(),
    });
    let result = store.dispatch(Action::SaveFile(id));
    let (path, content) = match &result.effects[..] {
        [Effect::SaveDocument { path, content, .. }] => (path.clone(), content.clone()),
        other => panic!("expected one save effect, got {other:?}"),
    };
    assert_eq!(content, "v2");

    // The user keeps typing before the write lands.
    store.dispatch(Action::UpdateContent {
        id,
        content: "v3".to_string(),
    });
    store.dispatch(Action::DocumentSaved {
        id,
        path,
        content,
        success: true,
    });

    let doc = store.state().documents.get(id).unwrap();
    assert!(doc.is_dirty());
}

#[test]
fn failed_save_changes_nothing() {
    let mut store = store_with_root("/work");
    let id = open_document(&mut store, "/work/a.rs", "v1");
    store.dispatch(Action::UpdateContent {
        id,
        content: "v2".to_string(),
    });

    let result = store.dispatch(Action::DocumentSaved {
        id,
        path: PathBuf::from("/work/a.rs"),
        content: "v2".to_string(),
        success: false,
    });
    assert!(!result.state_changed);
    assert!(store.state().documents.get(id).unwrap().is_dirty());
}

#[test]
fn save_all_targets_only_dirty_documents() {
    let mut store = store_with_root("/work");
    let a = open_document(&mut store, "/work/a.rs", "a");
    open_document(&mut store, "/work/b.rs", "b");

    store.dispatch(Action::UpdateContent {
        id: a,
        content: "a2".to_string(),
    });

    let result = store.dispatch(Action::SaveAllFiles);
    assert_eq!(result.effects.len(), 1);
    assert!(matches!(
        &result.effects[0],
        Effect::SaveDocument { id, .. } if *id == a
    ));
}

#[test]
fn clean_save_requests_produce_no_effects() {
    let mut store = store_with_root("/work");
    let id = open_document(&mut store, "/work/a.rs", "a");

    assert!(store.dispatch(Action::SaveFile(id)).effects.is_empty());
    assert!(store.dispatch(Action::SaveAllFiles).effects.is_empty());
}

#[test]
fn first_bind_spawns_the_shell_exactly_once() {
    let mut store = store();
    store.dispatch(Action::CreateTerminal(SessionKind::Local));
    let id = store.state().terminal.foreground.unwrap();

    let result = store.dispatch(Action::BindTerminal(id));
    assert!(matches!(
        &result.effects[..],
        [Effect::SpawnShell { id: spawn_id, kind: SessionKind::Local, rows: 24, cols: 80 }]
            if *spawn_id == id
    ));

    // A re-mounted view binds again; nothing spawns.
    let result = store.dispatch(Action::BindTerminal(id));
    assert!(result.effects.is_empty());
    assert!(!result.state_changed);
}

#[test]
fn create_itself_spawns_nothing() {
    let mut store = store();
    let result = store.dispatch(Action::CreateTerminal(SessionKind::Remote(3)));
    assert!(result.effects.is_empty());
    assert!(store.state().terminal.panel_visible);
}

#[test]
fn spawn_confirmation_marks_running_and_pushes_geometry() {
    let mut store = store();
    let id = bound_terminal(&mut store);

    let result = store.dispatch(Action::ShellSpawned { id });
    assert_eq!(
        store.state().terminal.session(id).unwrap().liveness,
        Liveness::Running
    );
    assert!(matches!(
        &result.effects[..],
        [Effect::ResizeShell { rows: 24, cols: 80, .. }]
    ));

    // A duplicate confirmation is swallowed.
    let result = store.dispatch(Action::ShellSpawned { id });
    assert!(result.effects.is_empty());
}

#[test]
fn spawn_failure_is_rendered_inside_the_session() {
    let mut store = store();
    let id = bound_terminal(&mut store);

    store.dispatch(Action::ShellSpawnFailed {
        id,
        error: "boom".to_string(),
    });
    let session = store.state().terminal.session(id).unwrap();
    assert_eq!(session.liveness, Liveness::Exited);
    assert!(session
        .screen()
        .contents()
        .contains("Failed to spawn shell: boom"));
}

#[test]
fn close_and_exit_converge_on_the_same_removal() {
    let mut store = store();
    let a = bound_terminal(&mut store);
    let b = bound_terminal(&mut store);

    let result = store.dispatch(Action::CloseTerminal(a));
    assert!(matches!(
        &result.effects[..],
        [Effect::KillShell { id, .. }] if *id == a
    ));
    assert!(store.state().terminal.session(a).is_none());

    // The backend exiting on its own takes the same path.
    let result = store.dispatch(Action::ShellExited { id: b });
    assert!(matches!(
        &result.effects[..],
        [Effect::KillShell { id, .. }] if *id == b
    ));
    assert!(store.state().terminal.sessions.is_empty());
    assert!(!store.state().terminal.panel_visible);

    // An exit for a session closed moments ago is stale; nothing fires.
    let result = store.dispatch(Action::ShellExited { id: a });
    assert!(result.effects.is_empty());
    assert!(!result.state_changed);
}

#[test]
fn terminal_input_routes_to_the_session_kind() {
    let mut store = store();
    store.dispatch(Action::CreateTerminal(SessionKind::Remote(5)));
    let id = store.state().terminal.foreground.unwrap();

    let result = store.dispatch(Action::TerminalInput {
        id,
        data: b"ls\n".to_vec(),
    });
    assert!(matches!(
        &result.effects[..],
        [Effect::WriteShell { kind: SessionKind::Remote(5), data, .. }] if data == b"ls\n"
    ));

    let result = store.dispatch(Action::TerminalInput {
        id: 999,
        data: b"x".to_vec(),
    });
    assert!(result.effects.is_empty());
}

#[test]
fn resize_forwards_only_real_changes() {
    let mut store = store();
    let id = bound_terminal(&mut store);

    let result = store.dispatch(Action::ResizeTerminal {
        id,
        rows: 40,
        cols: 120,
    });
    assert!(matches!(
        &result.effects[..],
        [Effect::ResizeShell { rows: 40, cols: 120, .. }]
    ));

    let result = store.dispatch(Action::ResizeTerminal {
        id,
        rows: 40,
        cols: 120,
    });
    assert!(result.effects.is_empty());
}

#[test]
fn shell_output_feeds_the_session_and_stale_output_is_dropped() {
    let mut store = store();
    let id = bound_terminal(&mut store);

    let result = store.dispatch(Action::ShellOutput {
        id,
        bytes: b"prompt$".to_vec(),
    });
    assert!(result.state_changed);
    assert!(store
        .state()
        .terminal
        .session(id)
        .unwrap()
        .screen()
        .contents()
        .contains("prompt$"));

    let result = store.dispatch(Action::ShellOutput {
        id: 999,
        bytes: b"late".to_vec(),
    });
    assert!(!result.state_changed);
}

#[test]
fn process_errors_render_inline_in_the_session() {
    let mut store = store();
    let id = bound_terminal(&mut store);
    store.dispatch(Action::ShellSpawned { id });

    // A write against a dead backend surfaces in the session itself.
    let result = store.dispatch(Action::TerminalProcessError {
        id,
        error: "Shell process error: broken pipe".to_string(),
    });
    assert!(result.state_changed);
    assert!(store
        .state()
        .terminal
        .session(id)
        .unwrap()
        .screen()
        .contents()
        .contains("Shell process error: broken pipe"));

    let result = store.dispatch(Action::TerminalProcessError {
        id: 999,
        error: "late".to_string(),
    });
    assert!(!result.state_changed);
}

#[test]
fn repo_refreshes_are_gated_on_a_root() {
    let mut store = store();
    assert!(store.dispatch(Action::RefreshRepoStatus).effects.is_empty());
    assert!(store.dispatch(Action::RefreshRepoAll).effects.is_empty());
    assert!(store.dispatch(Action::RepoPollTick).effects.is_empty());

    let mut store = store_with_root("/work");
    let result = store.dispatch(Action::RefreshRepoStatus);
    assert!(matches!(
        &result.effects[..],
        [Effect::RefreshRepo { slice: RepoSlice::Status, .. }]
    ));

    let result = store.dispatch(Action::RepoPollTick);
    assert!(matches!(
        &result.effects[..],
        [Effect::RefreshRepo { slice: RepoSlice::Status, .. }]
    ));
}

#[test]
fn mutations_run_and_successful_ones_trigger_refreshes() {
    let mut store = store_with_root("/work");

    let result = store.dispatch(Action::RepoMutate(RepoMutation::StageAll));
    assert!(matches!(
        &result.effects[..],
        [Effect::RunRepoMutation { mutation: RepoMutation::StageAll, .. }]
    ));

    let result = store.dispatch(Action::RepoMutationFinished {
        kind: MutationKind::Stage,
        success: true,
        error: None,
    });
    assert!(matches!(
        &result.effects[..],
        [Effect::RefreshRepo { slice: RepoSlice::Status, .. }]
    ));

    let result = store.dispatch(Action::RepoMutationFinished {
        kind: MutationKind::Commit,
        success: true,
        error: None,
    });
    assert_eq!(result.effects.len(), 4);

    let result = store.dispatch(Action::RepoMutationFinished {
        kind: MutationKind::Commit,
        success: false,
        error: Some("nothing to commit".to_string()),
    });
    assert!(result.effects.is_empty());
}

#[test]
fn repo_snapshots_apply_wholesale() {
    let mut store = store_with_root("/work");

    let result = store.dispatch(Action::RepoStatusLoaded(Some(RepoStatus::default())));
    assert!(result.state_changed);
    assert!(store.state().repository.is_repo());

    let result = store.dispatch(Action::RepoStatusLoaded(Some(RepoStatus::default())));
    assert!(!result.state_changed);

    store.dispatch(Action::RepoHeadLoaded(Some("main".to_string())));
    assert_eq!(store.state().repository.head.as_deref(), Some("main"));
}

#[test]
fn directory_listings_land_in_the_cache() {
    let mut store = store_with_root("/work");
    let entries = vec![DirEntry {
        name: "src".to_string(),
        path: PathBuf::from("/work/src"),
        is_dir: true,
        is_symlink: false,
        size: 0,
    }];

    store.dispatch(Action::DirLoaded {
        path: PathBuf::from("/work"),
        entries: entries.clone(),
    });
    assert_eq!(
        store.state().explorer.children(Path::new("/work")),
        Some(&entries[..])
    );
}

#[test]
fn path_mutations_refresh_cached_parents_only() {
    let mut store = store_with_root("/work");
    store.dispatch(Action::DirLoaded {
        path: PathBuf::from("/work"),
        entries: Vec::new(),
    });

    let result = store.dispatch(Action::PathCreated {
        path: PathBuf::from("/work/new.rs"),
        is_dir: false,
    });
    assert!(matches!(
        &result.effects[..],
        [Effect::LoadDir(p)] if p == Path::new("/work")
    ));

    // Parent not cached: nothing to refresh.
    let result = store.dispatch(Action::PathDeleted {
        path: PathBuf::from("/elsewhere/file.rs"),
    });
    assert!(result.effects.is_empty());
}

#[test]
fn rename_refreshes_both_parents_when_they_differ() {
    let mut store = store_with_root("/work");
    store.dispatch(Action::DirLoaded {
        path: PathBuf::from("/work/a"),
        entries: Vec::new(),
    });
    store.dispatch(Action::DirLoaded {
        path: PathBuf::from("/work/b"),
        entries: Vec::new(),
    });

    let result = store.dispatch(Action::PathRenamed {
        from: PathBuf::from("/work/a/file.rs"),
        to: PathBuf::from("/work/b/file.rs"),
    });
    assert_eq!(result.effects.len(), 2);

    let result = store.dispatch(Action::PathRenamed {
        from: PathBuf::from("/work/a/x.rs"),
        to: PathBuf::from("/work/a/y.rs"),
    });
    assert_eq!(result.effects.len(), 1);
}

#[test]
fn layout_toggles_persist_settings() {
    let mut store = store();

    let result = store.dispatch(Action::ToggleSidebar);
    assert!(!store.state().ui.sidebar_visible);
    assert!(matches!(&result.effects[..], [Effect::PersistSettings]));

    let result = store.dispatch(Action::ToggleWordWrap);
    assert!(!store.state().ui.word_wrap);
    assert!(matches!(&result.effects[..], [Effect::PersistSettings]));

    let result = store.dispatch(Action::SetSidebarWidth(30));
    assert_eq!(store.state().ui.sidebar_width, 30);
    assert!(matches!(&result.effects[..], [Effect::PersistSettings]));
    assert!(store.dispatch(Action::SetSidebarWidth(30)).effects.is_empty());

    let result = store.dispatch(Action::SetTerminalHeight(45));
    assert_eq!(store.state().ui.terminal_height, 45);
    assert!(matches!(&result.effects[..], [Effect::PersistSettings]));
}

#[test]
fn opening_the_panel_with_no_sessions_creates_one() {
    let mut store = store();
    store.dispatch(Action::ToggleTerminalPanel);

    assert!(store.state().terminal.panel_visible);
    assert_eq!(store.state().terminal.sessions.len(), 1);

    // With sessions around, the toggle only flips visibility.
    store.dispatch(Action::ToggleTerminalPanel);
    assert!(!store.state().terminal.panel_visible);
    assert_eq!(store.state().terminal.sessions.len(), 1);

    store.dispatch(Action::ToggleTerminalPanel);
    assert!(store.state().terminal.panel_visible);
    assert_eq!(store.state().terminal.sessions.len(), 1);
}

#[test]
fn quick_open_indexes_the_workspace_when_it_opens() {
    let mut store = store_with_root("/work");

    let result = store.dispatch(Action::ToggleQuickOpen);
    assert!(store.state().ui.quick_open_visible);
    assert!(matches!(
        &result.effects[..],
        [Effect::IndexWorkspace(p)] if p == Path::new("/work")
    ));

    let result = store.dispatch(Action::ToggleQuickOpen);
    assert!(!store.state().ui.quick_open_visible);
    assert!(result.effects.is_empty());

    store.dispatch(Action::WorkspaceIndexed {
        files: vec!["src/main.rs".to_string()],
    });
    assert_eq!(store.state().locator_files, vec!["src/main.rs".to_string()]);
}

#[test]
fn quick_open_without_a_root_indexes_nothing() {
    let mut store = store();
    let result = store.dispatch(Action::ToggleQuickOpen);
    assert!(store.state().ui.quick_open_visible);
    assert!(result.effects.is_empty());
}

#[test]
fn remote_connect_round_trip_updates_the_status_line() {
    let mut store = store();

    let result = store.dispatch(Action::ConnectRemote {
        id: 2,
        secret: None,
    });
    assert!(matches!(
        &result.effects[..],
        [Effect::ConnectRemote { id: 2, secret: None }]
    ));

    store.dispatch(Action::RemoteConnected { id: 2 });
    assert!(store
        .state()
        .ui
        .status_message
        .as_deref()
        .unwrap()
        .contains("Connected"));

    store.dispatch(Action::RemoteConnectFailed {
        id: 2,
        error: "connection refused".to_string(),
    });
    assert_eq!(
        store.state().ui.status_message.as_deref(),
        Some("connection refused")
    );

    let result = store.dispatch(Action::DisconnectRemote { id: 2 });
    assert!(matches!(
        &result.effects[..],
        [Effect::DisconnectRemote { id: 2 }]
    ));
}

#[test]
fn quit_raises_the_flag() {
    let mut store = store();
    assert!(!store.state().ui.should_quit);
    store.dispatch(Action::Quit);
    assert!(store.state().ui.should_quit);
}

#[test]
fn tab_actions_drive_the_document_registry() {
    let mut store = store_with_root("/work");
    let a = open_document(&mut store, "/work/a.rs", "");
    let b = open_document(&mut store, "/work/b.rs", "");

    store.dispatch(Action::SetActiveTab(a));
    assert_eq!(store.state().documents.active_id(), Some(a));

    store.dispatch(Action::NextTab);
    assert_eq!(store.state().documents.active_id(), Some(b));
    store.dispatch(Action::PreviousTab);
    assert_eq!(store.state().documents.active_id(), Some(a));

    store.dispatch(Action::CloseTab(a));
    assert_eq!(store.state().documents.active_id(), Some(b));

    store.dispatch(Action::CloseAllTabs);
    assert!(store.state().documents.documents().is_empty());
}
