use std::path::PathBuf;

use super::{Action, Effect, WorkspaceState};
use crate::kernel::repository::{RepoSlice, RepositoryState};
use crate::kernel::services::ports::shell::SessionId;
use crate::kernel::terminal::SessionKind;

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn none() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn changed(state_changed: bool) -> Self {
        Self {
            effects: Vec::new(),
            state_changed,
        }
    }

    fn with(state_changed: bool, effects: Vec<Effect>) -> Self {
        Self {
            effects,
            state_changed,
        }
    }
}

pub struct Store {
    state: WorkspaceState,
}

impl Store {
    pub fn new(state: WorkspaceState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    /// Apply one action atomically. Every state mutation completes before
    /// the caller sees the returned effects, so observers never read a
    /// half-applied transition.
    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            // ---- workspace root & tree -------------------------------
            Action::SetRoot(root) => self.set_root(root),
            Action::ToggleFolder(path) => {
                let (changed, effect) = self.state.explorer.toggle(path);
                DispatchResult::with(changed, effect.into_iter().collect())
            }
            Action::RefreshFolder(path) => {
                DispatchResult::with(false, vec![Effect::LoadDir(path)])
            }
            Action::SelectPath(path) => {
                DispatchResult::changed(self.state.explorer.select(path))
            }
            Action::CreatePath { path, is_dir } => {
                DispatchResult::with(false, vec![Effect::CreatePath { path, is_dir }])
            }
            Action::RenamePath { from, to } => {
                DispatchResult::with(false, vec![Effect::RenamePath { from, to }])
            }
            Action::DeletePath { path, is_dir } => {
                DispatchResult::with(false, vec![Effect::DeletePath { path, is_dir }])
            }
            Action::DirLoaded { path, entries } => {
                DispatchResult::changed(self.state.explorer.apply_loaded(path, entries))
            }
            Action::DirLoadError { path, error } => {
                self.state.explorer.apply_load_error(&path, &error);
                DispatchResult::none()
            }
            Action::PathCreated { path, .. } => {
                DispatchResult::with(false, self.refresh_parent(&path))
            }
            Action::PathRenamed { from, to } => {
                let mut effects = self.refresh_parent(&from);
                if from.parent() != to.parent() {
                    effects.extend(self.refresh_parent(&to));
                }
                DispatchResult::with(false, effects)
            }
            Action::PathDeleted { path } => {
                DispatchResult::with(false, self.refresh_parent(&path))
            }
            Action::FsOpFailed { op, path, error } => {
                tracing::warn!(op, path = %path.display(), error, "filesystem operation failed");
                DispatchResult::none()
            }

            // ---- documents -------------------------------------------
            Action::OpenFile(path) => {
                if self.state.documents.find_by_path(&path).is_some() {
                    DispatchResult::changed(self.state.documents.activate_path(&path))
                } else {
                    DispatchResult::with(false, vec![Effect::LoadFile(path)])
                }
            }
            Action::FileLoaded { path, content } => {
                DispatchResult::changed(self.state.documents.insert_loaded(path, content))
            }
            Action::FileOpenFailed { path, error } => {
                tracing::warn!(path = %path.display(), error, "failed to open file");
                DispatchResult::none()
            }
            Action::CloseTab(id) => DispatchResult::changed(self.state.documents.close(id)),
            Action::CloseAllTabs => DispatchResult::changed(self.state.documents.close_all()),
            Action::SetActiveTab(id) => {
                DispatchResult::changed(self.state.documents.set_active(id))
            }
            Action::UpdateContent { id, content } => {
                DispatchResult::changed(self.state.documents.update_content(id, content))
            }
            Action::SaveFile(id) => DispatchResult::with(false, self.save_effects(&[id])),
            Action::SaveAllFiles => {
                let dirty = self.state.documents.dirty_ids();
                DispatchResult::with(false, self.save_effects(&dirty))
            }
            Action::DocumentSaved {
                id,
                path,
                content,
                success,
            } => {
                if success {
                    DispatchResult::changed(self.state.documents.apply_saved(id, content))
                } else {
                    tracing::warn!(path = %path.display(), "save failed; document stays dirty");
                    DispatchResult::none()
                }
            }
            Action::NextTab => DispatchResult::changed(self.state.documents.next_tab()),
            Action::PreviousTab => DispatchResult::changed(self.state.documents.previous_tab()),

            // ---- terminal sessions -----------------------------------
            Action::CreateTerminal(kind) => {
                self.state.terminal.create(kind);
                DispatchResult::changed(true)
            }
            Action::BindTerminal(id) => {
                if !self.state.terminal.bind(id) {
                    return DispatchResult::none();
                }
                let effects = match self.state.terminal.session(id) {
                    Some(session) => vec![Effect::SpawnShell {
                        id,
                        kind: session.kind,
                        rows: session.rows,
                        cols: session.cols,
                    }],
                    None => Vec::new(),
                };
                DispatchResult::with(true, effects)
            }
            Action::CloseTerminal(id) => self.close_terminal(id),
            Action::ShellExited { id } => {
                // Converges with user-initiated close: same removal path,
                // and the kill against a dead process is a harmless no-op.
                if self.state.terminal.session(id).is_some() {
                    self.close_terminal(id)
                } else {
                    DispatchResult::none()
                }
            }
            Action::SetActiveTerminal(id) => {
                DispatchResult::changed(self.state.terminal.set_foreground(id))
            }
            Action::RenameTerminal { id, title } => {
                DispatchResult::changed(self.state.terminal.rename(id, title))
            }
            Action::TerminalInput { id, data } => {
                match self.state.terminal.session(id) {
                    Some(session) => DispatchResult::with(
                        false,
                        vec![Effect::WriteShell {
                            id,
                            kind: session.kind,
                            data,
                        }],
                    ),
                    None => DispatchResult::none(),
                }
            }
            Action::ResizeTerminal { id, rows, cols } => {
                let Some(session) = self.state.terminal.session_mut(id) else {
                    return DispatchResult::none();
                };
                if !session.resize(rows, cols) {
                    return DispatchResult::none();
                }
                let effect = Effect::ResizeShell {
                    id,
                    kind: session.kind,
                    rows: session.rows,
                    cols: session.cols,
                };
                DispatchResult::with(true, vec![effect])
            }
            Action::TerminalSearch { id, query } => {
                match self.state.terminal.session_mut(id) {
                    Some(session) => DispatchResult::changed(session.set_search(query)),
                    None => DispatchResult::none(),
                }
            }
            Action::TerminalSearchNext { id } => match self.state.terminal.session_mut(id) {
                Some(session) => DispatchResult::changed(session.search_next()),
                None => DispatchResult::none(),
            },
            Action::TerminalSearchClear { id } => match self.state.terminal.session_mut(id) {
                Some(session) => DispatchResult::changed(session.clear_search()),
                None => DispatchResult::none(),
            },
            Action::ShellSpawned { id } => {
                if !self.state.terminal.mark_running(id) {
                    return DispatchResult::none();
                }
                // Push the session geometry to the fresh process so the
                // first prompt lays out correctly.
                let effects = match self.state.terminal.session(id) {
                    Some(session) => vec![Effect::ResizeShell {
                        id,
                        kind: session.kind,
                        rows: session.rows,
                        cols: session.cols,
                    }],
                    None => Vec::new(),
                };
                DispatchResult::with(true, effects)
            }
            Action::ShellSpawnFailed { id, error } => {
                tracing::warn!(session = id, error, "shell spawn failed");
                DispatchResult::changed(self.state.terminal.mark_spawn_failed(id, &error))
            }
            Action::ShellOutput { id, bytes } => {
                DispatchResult::changed(self.state.terminal.apply_output(id, &bytes))
            }
            Action::TerminalProcessError { id, error } => {
                match self.state.terminal.session_mut(id) {
                    Some(session) => {
                        session.write_inline(&error);
                        DispatchResult::changed(true)
                    }
                    None => DispatchResult::none(),
                }
            }

            // ---- repository ------------------------------------------
            Action::RefreshRepoStatus => self.repo_refresh(&[RepoSlice::Status]),
            Action::RefreshRepoBranches => self.repo_refresh(&[RepoSlice::Branches]),
            Action::RefreshRepoCommits => self.repo_refresh(&[RepoSlice::Commits]),
            Action::RefreshRepoAll => match self.state.root.clone() {
                Some(root) => DispatchResult::with(false, RepositoryState::refresh_all(root)),
                None => DispatchResult::none(),
            },
            Action::RepoMutate(mutation) => match self.state.root.clone() {
                Some(root) => DispatchResult::with(
                    false,
                    vec![Effect::RunRepoMutation { root, mutation }],
                ),
                None => DispatchResult::none(),
            },
            Action::RepoStatusLoaded(status) => {
                DispatchResult::changed(self.state.repository.apply_status(status))
            }
            Action::RepoBranchesLoaded(branches) => {
                DispatchResult::changed(self.state.repository.apply_branches(branches))
            }
            Action::RepoCommitsLoaded(commits) => {
                DispatchResult::changed(self.state.repository.apply_commits(commits))
            }
            Action::RepoHeadLoaded(head) => {
                DispatchResult::changed(self.state.repository.apply_head(head))
            }
            Action::RepoMutationFinished {
                kind,
                success,
                error,
            } => {
                if !success {
                    tracing::warn!(?kind, error = error.as_deref().unwrap_or(""), "repository mutation failed");
                    return DispatchResult::none();
                }
                match self.state.root.clone() {
                    Some(root) => {
                        DispatchResult::with(false, RepositoryState::refresh_after(root, kind))
                    }
                    None => DispatchResult::none(),
                }
            }
            Action::RepoPollTick => self.repo_refresh(&[RepoSlice::Status]),

            // ---- remote connections ----------------------------------
            Action::ConnectRemote { id, secret } => {
                DispatchResult::with(false, vec![Effect::ConnectRemote { id, secret }])
            }
            Action::DisconnectRemote { id } => {
                DispatchResult::with(false, vec![Effect::DisconnectRemote { id }])
            }
            Action::RemoteConnected { id } => {
                self.state.ui.status_message = Some(format!("Connected to remote {id}"));
                DispatchResult::changed(true)
            }
            Action::RemoteConnectFailed { id, error } => {
                tracing::warn!(connection = id, error, "remote connect failed");
                self.state.ui.status_message = Some(error);
                DispatchResult::changed(true)
            }

            // ---- ui ---------------------------------------------------
            Action::ToggleSidebar => {
                self.state.ui.sidebar_visible = !self.state.ui.sidebar_visible;
                DispatchResult::with(true, vec![Effect::PersistSettings])
            }
            Action::ToggleTerminalPanel => {
                // Opening the panel with no sessions creates the first one.
                if !self.state.terminal.panel_visible && self.state.terminal.sessions.is_empty() {
                    self.state.terminal.create(SessionKind::Local);
                } else {
                    self.state.terminal.panel_visible = !self.state.terminal.panel_visible;
                }
                DispatchResult::changed(true)
            }
            Action::ToggleQuickOpen => {
                self.state.ui.quick_open_visible = !self.state.ui.quick_open_visible;
                let effects = match (&self.state.root, self.state.ui.quick_open_visible) {
                    (Some(root), true) => vec![Effect::IndexWorkspace(root.clone())],
                    _ => Vec::new(),
                };
                DispatchResult::with(true, effects)
            }
            Action::ToggleWordWrap => {
                self.state.ui.word_wrap = !self.state.ui.word_wrap;
                DispatchResult::with(true, vec![Effect::PersistSettings])
            }
            Action::SetSidebarWidth(width) => {
                if self.state.ui.sidebar_width == width {
                    return DispatchResult::none();
                }
                self.state.ui.sidebar_width = width;
                DispatchResult::with(true, vec![Effect::PersistSettings])
            }
            Action::SetTerminalHeight(height) => {
                if self.state.ui.terminal_height == height {
                    return DispatchResult::none();
                }
                self.state.ui.terminal_height = height;
                DispatchResult::with(true, vec![Effect::PersistSettings])
            }
            Action::Quit => {
                self.state.ui.should_quit = true;
                DispatchResult::changed(true)
            }
            Action::WorkspaceIndexed { files } => {
                let changed = self.state.locator_files != files;
                self.state.locator_files = files;
                DispatchResult::changed(changed)
            }
        }
    }

    fn set_root(&mut self, root: Option<PathBuf>) -> DispatchResult {
        self.state.root = root.clone();
        let (_, mut effects) = self.state.explorer.set_root(root.clone());
        self.state.repository.clear();
        self.state.locator_files.clear();

        match root {
            Some(root) => {
                effects.push(Effect::StartRepoPolling { root: root.clone() });
                effects.extend(RepositoryState::refresh_all(root));
            }
            None => effects.push(Effect::StopRepoPolling),
        }
        effects.push(Effect::PersistSettings);
        DispatchResult::with(true, effects)
    }

    fn save_effects(&self, ids: &[super::documents::DocumentId]) -> Vec<Effect> {
        ids.iter()
            .filter_map(|&id| {
                self.state
                    .documents
                    .save_target(id)
                    .map(|(path, content)| Effect::SaveDocument { id, path, content })
            })
            .collect()
    }

    fn close_terminal(&mut self, id: SessionId) -> DispatchResult {
        let Some(kind) = self.state.terminal.session(id).map(|s| s.kind) else {
            return DispatchResult::none();
        };
        let changed = self.state.terminal.remove(id);
        DispatchResult::with(changed, vec![Effect::KillShell { id, kind }])
    }

    fn repo_refresh(&self, slices: &[RepoSlice]) -> DispatchResult {
        match self.state.root.clone() {
            Some(root) => DispatchResult::with(
                false,
                slices
                    .iter()
                    .map(|&slice| Effect::RefreshRepo {
                        root: root.clone(),
                        slice,
                    })
                    .collect(),
            ),
            None => DispatchResult::none(),
        }
    }

    fn refresh_parent(&self, path: &std::path::Path) -> Vec<Effect> {
        self.state.explorer.parent_refresh(path).into_iter().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
