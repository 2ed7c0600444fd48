//! Trait seams and data contracts between the kernel and its backends.

pub mod file;
pub mod remote;
pub mod shell;
pub mod vcs;

pub use file::{DirEntry, FileError, FileProvider};
pub use remote::{ConnectionId, RemoteAuth, RemoteConnection, RemoteError, RemoteTransport};
pub use shell::{SessionId, ShellError, ShellEvent, ShellEventSink, ShellSize, SpawnSpec};
pub use vcs::{
    FileStatus, MutationKind, RepoBranch, RepoBranches, RepoCommit, RepoMutation, RepoStatus,
    VcsError,
};
