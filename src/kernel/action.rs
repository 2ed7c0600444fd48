use std::path::PathBuf;

use crate::kernel::documents::DocumentId;
use crate::kernel::services::ports::file::DirEntry;
use crate::kernel::services::ports::remote::ConnectionId;
use crate::kernel::services::ports::shell::SessionId;
use crate::kernel::services::ports::vcs::{
    MutationKind, RepoBranches, RepoCommit, RepoMutation, RepoStatus,
};
use crate::kernel::terminal::SessionKind;

/// Everything that can change the workspace state: user intents plus the
/// completion notifications that asynchronous effects report back.
#[derive(Debug, Clone)]
pub enum Action {
    // Workspace root & tree
    SetRoot(Option<PathBuf>),
    ToggleFolder(PathBuf),
    RefreshFolder(PathBuf),
    SelectPath(Option<PathBuf>),
    CreatePath { path: PathBuf, is_dir: bool },
    RenamePath { from: PathBuf, to: PathBuf },
    DeletePath { path: PathBuf, is_dir: bool },

    // Documents
    OpenFile(PathBuf),
    CloseTab(DocumentId),
    CloseAllTabs,
    SetActiveTab(DocumentId),
    UpdateContent { id: DocumentId, content: String },
    SaveFile(DocumentId),
    SaveAllFiles,
    NextTab,
    PreviousTab,

    // Terminal sessions
    CreateTerminal(SessionKind),
    BindTerminal(SessionId),
    CloseTerminal(SessionId),
    SetActiveTerminal(SessionId),
    RenameTerminal { id: SessionId, title: String },
    TerminalInput { id: SessionId, data: Vec<u8> },
    ResizeTerminal { id: SessionId, rows: u16, cols: u16 },
    TerminalSearch { id: SessionId, query: String },
    TerminalSearchNext { id: SessionId },
    TerminalSearchClear { id: SessionId },

    // Repository
    RefreshRepoStatus,
    RefreshRepoBranches,
    RefreshRepoCommits,
    RefreshRepoAll,
    RepoMutate(RepoMutation),

    // Remote connections
    ConnectRemote { id: ConnectionId, secret: Option<String> },
    DisconnectRemote { id: ConnectionId },

    // UI
    ToggleSidebar,
    ToggleTerminalPanel,
    ToggleQuickOpen,
    ToggleWordWrap,
    SetSidebarWidth(u16),
    SetTerminalHeight(u16),
    Quit,

    // Async completions
    DirLoaded { path: PathBuf, entries: Vec<DirEntry> },
    DirLoadError { path: PathBuf, error: String },
    FileLoaded { path: PathBuf, content: String },
    FileOpenFailed { path: PathBuf, error: String },
    DocumentSaved { id: DocumentId, path: PathBuf, content: String, success: bool },
    PathCreated { path: PathBuf, is_dir: bool },
    PathRenamed { from: PathBuf, to: PathBuf },
    PathDeleted { path: PathBuf },
    FsOpFailed { op: &'static str, path: PathBuf, error: String },
    ShellSpawned { id: SessionId },
    ShellSpawnFailed { id: SessionId, error: String },
    ShellOutput { id: SessionId, bytes: Vec<u8> },
    ShellExited { id: SessionId },
    TerminalProcessError { id: SessionId, error: String },
    RepoStatusLoaded(Option<RepoStatus>),
    RepoBranchesLoaded(Option<RepoBranches>),
    RepoCommitsLoaded(Vec<RepoCommit>),
    RepoHeadLoaded(Option<String>),
    RepoMutationFinished { kind: MutationKind, success: bool, error: Option<String> },
    RepoPollTick,
    WorkspaceIndexed { files: Vec<String> },
    RemoteConnected { id: ConnectionId },
    RemoteConnectFailed { id: ConnectionId, error: String },
}
