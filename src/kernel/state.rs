use std::path::PathBuf;

use crate::kernel::documents::DocumentState;
use crate::kernel::explorer::ExplorerState;
use crate::kernel::repository::RepositoryState;
use crate::kernel::services::adapters::settings::PersistedState;
use crate::kernel::services::ports::remote::RemoteConnection;
use crate::kernel::terminal::TerminalState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub sidebar_visible: bool,
    pub quick_open_visible: bool,
    pub word_wrap: bool,
    /// Panel sizes as percentages of the window.
    pub sidebar_width: u16,
    pub terminal_height: u16,
    pub font_size: u8,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_visible: true,
            quick_open_visible: false,
            word_wrap: true,
            sidebar_width: 20,
            terminal_height: 30,
            font_size: 14,
            status_message: None,
            should_quit: false,
        }
    }
}

/// The whole workspace session: one root, the document tabs, the tree cache,
/// the terminal multiplexer and the repository snapshot.
#[derive(Debug, Default)]
pub struct WorkspaceState {
    pub root: Option<PathBuf>,
    pub documents: DocumentState,
    pub explorer: ExplorerState,
    pub terminal: TerminalState,
    pub repository: RepositoryState,
    /// Workspace-relative file paths feeding the fuzzy locator.
    pub locator_files: Vec<String>,
    pub ui: UiState,
}

impl WorkspaceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the UI slice from persisted settings. The persisted root is not
    /// applied here; the host dispatches `SetRoot` so the usual load effects
    /// fire.
    pub fn from_persisted(persisted: &PersistedState) -> Self {
        let mut state = Self::default();
        state.ui.sidebar_visible = persisted.sidebar_visible;
        state.ui.sidebar_width = persisted.sidebar_width;
        state.ui.terminal_height = persisted.terminal_height;
        state.ui.word_wrap = persisted.word_wrap;
        state.ui.font_size = persisted.font_size;
        state
    }

    /// The persisted subset: layout preferences and the root, never open
    /// tabs, terminal sessions or unsaved edits.
    pub fn persisted(&self, connections: Vec<RemoteConnection>) -> PersistedState {
        PersistedState {
            root_path: self.root.clone(),
            sidebar_visible: self.ui.sidebar_visible,
            sidebar_width: self.ui.sidebar_width,
            terminal_height: self.ui.terminal_height,
            word_wrap: self.ui.word_wrap,
            font_size: self.ui.font_size,
            connections,
        }
    }
}
