//! Repository snapshot: whatever the version-control panel currently shows.
//! Every slice is replaced wholesale by a refresh; a `None` status or branch
//! set means "not a repository", which is a normal state, not an error.

use std::path::PathBuf;

use crate::kernel::effect::Effect;
use crate::kernel::services::ports::vcs::{MutationKind, RepoBranches, RepoCommit, RepoStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSlice {
    Status,
    Branches,
    Commits,
    Head,
}

#[derive(Debug, Default)]
pub struct RepositoryState {
    pub status: Option<RepoStatus>,
    pub branches: Option<RepoBranches>,
    pub commits: Vec<RepoCommit>,
    pub head: Option<String>,
}

impl RepositoryState {
    pub fn is_repo(&self) -> bool {
        self.status.is_some()
    }

    pub fn clear(&mut self) -> bool {
        let had_data = self.status.is_some()
            || self.branches.is_some()
            || !self.commits.is_empty()
            || self.head.is_some();
        *self = Self::default();
        had_data
    }

    pub fn refresh_all(root: PathBuf) -> Vec<Effect> {
        [
            RepoSlice::Status,
            RepoSlice::Branches,
            RepoSlice::Commits,
            RepoSlice::Head,
        ]
        .into_iter()
        .map(|slice| Effect::RefreshRepo {
            root: root.clone(),
            slice,
        })
        .collect()
    }

    /// Slices to re-fetch after a mutation confirmed success. Stage-class
    /// operations touch only the status; commit and checkout invalidate
    /// everything; creating a branch only moves the branch list.
    pub fn refresh_after(root: PathBuf, kind: MutationKind) -> Vec<Effect> {
        let slices: &[RepoSlice] = match kind {
            MutationKind::Stage | MutationKind::Unstage | MutationKind::Discard => {
                &[RepoSlice::Status]
            }
            MutationKind::Commit | MutationKind::Checkout => &[
                RepoSlice::Status,
                RepoSlice::Branches,
                RepoSlice::Commits,
                RepoSlice::Head,
            ],
            MutationKind::CreateBranch => &[RepoSlice::Branches],
        };

        slices
            .iter()
            .map(|&slice| Effect::RefreshRepo {
                root: root.clone(),
                slice,
            })
            .collect()
    }

    pub fn apply_status(&mut self, status: Option<RepoStatus>) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        true
    }

    pub fn apply_branches(&mut self, branches: Option<RepoBranches>) -> bool {
        if self.branches == branches {
            return false;
        }
        self.branches = branches;
        true
    }

    pub fn apply_commits(&mut self, commits: Vec<RepoCommit>) -> bool {
        if self.commits == commits {
            return false;
        }
        self.commits = commits;
        true
    }

    pub fn apply_head(&mut self, head: Option<String>) -> bool {
        if self.head == head {
            return false;
        }
        self.head = head;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/repository.rs"]
mod tests;
