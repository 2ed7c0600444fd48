use std::path::PathBuf;

use crate::kernel::documents::DocumentId;
use crate::kernel::services::ports::file::DirEntry;
use crate::kernel::services::ports::shell::{SessionId, ShellEvent};
use crate::kernel::services::ports::vcs::{
    MutationKind, RepoBranches, RepoCommit, RepoStatus,
};

/// Completion notifications crossing from the async runtime (and transport
/// threads) back to the app loop.
pub enum AppMessage {
    DirLoaded {
        path: PathBuf,
        entries: Vec<DirEntry>,
    },
    DirLoadError {
        path: PathBuf,
        error: String,
    },
    FileLoaded {
        path: PathBuf,
        content: String,
    },
    FileOpenFailed {
        path: PathBuf,
        error: String,
    },
    DocumentSaved {
        id: DocumentId,
        path: PathBuf,
        content: String,
        success: bool,
    },
    PathCreated {
        path: PathBuf,
        is_dir: bool,
    },
    PathRenamed {
        from: PathBuf,
        to: PathBuf,
    },
    PathDeleted {
        path: PathBuf,
    },
    FsOpFailed {
        op: &'static str,
        path: PathBuf,
        error: String,
    },
    ShellSpawned {
        id: SessionId,
    },
    ShellSpawnFailed {
        id: SessionId,
        error: String,
    },
    Shell(ShellEvent),
    RepoStatus(Option<RepoStatus>),
    RepoBranches(Option<RepoBranches>),
    RepoCommits(Vec<RepoCommit>),
    RepoHead(Option<String>),
    RepoMutationFinished {
        kind: MutationKind,
        success: bool,
        error: Option<String>,
    },
    RepoPollTick,
    WorkspaceIndexed {
        files: Vec<String>,
    },
}
