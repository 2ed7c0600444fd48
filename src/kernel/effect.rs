use std::path::PathBuf;

use crate::kernel::documents::DocumentId;
use crate::kernel::repository::RepoSlice;
use crate::kernel::services::ports::remote::ConnectionId;
use crate::kernel::services::ports::shell::SessionId;
use crate::kernel::services::ports::vcs::RepoMutation;
use crate::kernel::terminal::SessionKind;

/// Work the reducer requests from the outside world. Effects are executed by
/// the app layer after the state mutation that produced them has completed.
#[derive(Debug, Clone)]
pub enum Effect {
    LoadDir(PathBuf),
    LoadFile(PathBuf),
    SaveDocument {
        id: DocumentId,
        path: PathBuf,
        content: String,
    },
    CreatePath {
        path: PathBuf,
        is_dir: bool,
    },
    RenamePath {
        from: PathBuf,
        to: PathBuf,
    },
    DeletePath {
        path: PathBuf,
        is_dir: bool,
    },

    SpawnShell {
        id: SessionId,
        kind: SessionKind,
        rows: u16,
        cols: u16,
    },
    WriteShell {
        id: SessionId,
        kind: SessionKind,
        data: Vec<u8>,
    },
    ResizeShell {
        id: SessionId,
        kind: SessionKind,
        rows: u16,
        cols: u16,
    },
    KillShell {
        id: SessionId,
        kind: SessionKind,
    },

    RefreshRepo {
        root: PathBuf,
        slice: RepoSlice,
    },
    RunRepoMutation {
        root: PathBuf,
        mutation: RepoMutation,
    },
    StartRepoPolling {
        root: PathBuf,
    },
    StopRepoPolling,

    IndexWorkspace(PathBuf),

    ConnectRemote {
        id: ConnectionId,
        secret: Option<String>,
    },
    DisconnectRemote {
        id: ConnectionId,
    },

    PersistSettings,
}
