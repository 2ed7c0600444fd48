//! Version control port: the data contracts the repository panel renders.

#[derive(Debug)]
pub enum VcsError {
    /// The `git` binary could not be launched at all.
    Launch(std::io::Error),
    /// The command ran and exited non-zero; carries trimmed stderr.
    Command(String),
}

impl std::fmt::Display for VcsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VcsError::Launch(e) => write!(f, "Failed to execute git: {}", e),
            VcsError::Command(msg) => write!(f, "Git command failed: {}", msg),
        }
    }
}

impl std::error::Error for VcsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VcsError::Launch(e) => Some(e),
            VcsError::Command(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub path: String,
    pub status: char,
    pub staged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepoStatus {
    pub staged: Vec<FileStatus>,
    pub unstaged: Vec<FileStatus>,
    pub untracked: Vec<FileStatus>,
    pub has_conflicts: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoBranch {
    pub name: String,
    pub is_current: bool,
    pub is_remote: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepoBranches {
    pub current: String,
    pub local: Vec<RepoBranch>,
    pub remote: Vec<RepoBranch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCommit {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub date: String,
}

/// A state-changing repository operation requested by the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoMutation {
    Stage(Vec<String>),
    StageAll,
    Unstage(Vec<String>),
    UnstageAll,
    Discard(Vec<String>),
    Commit(String),
    Checkout(String),
    CreateBranch { name: String, checkout: bool },
}

/// Mutation class, used to decide which snapshot slices to refresh after a
/// confirmed success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Stage,
    Unstage,
    Discard,
    Commit,
    Checkout,
    CreateBranch,
}

impl RepoMutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            RepoMutation::Stage(_) | RepoMutation::StageAll => MutationKind::Stage,
            RepoMutation::Unstage(_) | RepoMutation::UnstageAll => MutationKind::Unstage,
            RepoMutation::Discard(_) => MutationKind::Discard,
            RepoMutation::Commit(_) => MutationKind::Commit,
            RepoMutation::Checkout(_) => MutationKind::Checkout,
            // Creating with checkout moves HEAD, so it refreshes like one.
            RepoMutation::CreateBranch { checkout: true, .. } => MutationKind::Checkout,
            RepoMutation::CreateBranch { .. } => MutationKind::CreateBranch,
        }
    }
}
