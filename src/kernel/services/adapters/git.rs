//! Git adapter: shells out to the `git` binary and parses its plumbing
//! output into the snapshot types. A workspace without a `.git` directory is
//! reported as "not a repository" (`None`/empty), never as an error.

use std::path::Path;
use tokio::process::Command;

use crate::kernel::services::ports::vcs::{
    FileStatus, RepoBranch, RepoBranches, RepoCommit, RepoMutation, RepoStatus, VcsError,
};

pub type Result<T> = std::result::Result<T, VcsError>;

const LOG_LIMIT: u32 = 50;

async fn is_repo(root: &Path) -> bool {
    tokio::fs::try_exists(root.join(".git")).await.unwrap_or(false)
}

async fn run(root: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .await
        .map_err(VcsError::Launch)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(VcsError::Command(stderr));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

pub async fn status(root: &Path) -> Result<Option<RepoStatus>> {
    if !is_repo(root).await {
        return Ok(None);
    }
    let raw = run(root, &["status", "--porcelain=v1"]).await?;
    Ok(Some(parse_status(&raw)))
}

pub async fn branches(root: &Path) -> Result<Option<RepoBranches>> {
    if !is_repo(root).await {
        return Ok(None);
    }
    let raw = run(root, &["branch", "-a", "--no-color"]).await?;
    Ok(Some(parse_branches(&raw)))
}

pub async fn commits(root: &Path) -> Result<Vec<RepoCommit>> {
    if !is_repo(root).await {
        return Ok(Vec::new());
    }
    let limit = LOG_LIMIT.to_string();
    match run(root, &["log", "--format=%h|%s|%an|%ar", "-n", &limit]).await {
        Ok(raw) => Ok(parse_log(&raw)),
        // An unborn branch has no log yet.
        Err(VcsError::Command(_)) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Current branch name, or a short hash when detached. Read straight from
/// `.git/HEAD` so polling does not spawn a process.
pub async fn head(root: &Path) -> Result<Option<String>> {
    let head_file = root.join(".git").join("HEAD");
    match tokio::fs::read_to_string(&head_file).await {
        Ok(raw) => Ok(Some(parse_head(&raw))),
        Err(_) => Ok(None),
    }
}

pub async fn apply(root: &Path, mutation: &RepoMutation) -> Result<()> {
    match mutation {
        RepoMutation::Stage(paths) => {
            let mut args = vec!["add", "--"];
            args.extend(paths.iter().map(String::as_str));
            run(root, &args).await?;
        }
        RepoMutation::StageAll => {
            run(root, &["add", "-A"]).await?;
        }
        RepoMutation::Unstage(paths) => {
            let mut args = vec!["restore", "--staged", "--"];
            args.extend(paths.iter().map(String::as_str));
            run(root, &args).await?;
        }
        RepoMutation::UnstageAll => {
            run(root, &["restore", "--staged", "."]).await?;
        }
        RepoMutation::Discard(paths) => {
            let mut args = vec!["restore", "--"];
            args.extend(paths.iter().map(String::as_str));
            run(root, &args).await?;
        }
        RepoMutation::Commit(message) => {
            run(root, &["commit", "-m", message]).await?;
        }
        RepoMutation::Checkout(branch) => {
            // Checking out a remote-tracking name means its local branch.
            let name = branch.strip_prefix("origin/").unwrap_or(branch);
            run(root, &["checkout", name]).await?;
        }
        RepoMutation::CreateBranch { name, checkout } => {
            if *checkout {
                run(root, &["checkout", "-b", name]).await?;
            } else {
                run(root, &["branch", name]).await?;
            }
        }
    }
    Ok(())
}

pub fn parse_status(raw: &str) -> RepoStatus {
    let mut result = RepoStatus::default();

    for line in raw.lines() {
        if line.len() < 4 {
            continue;
        }
        let mut chars = line.chars();
        let index = chars.next().unwrap_or(' ');
        let worktree = chars.next().unwrap_or(' ');
        let path = line[3..].to_string();

        if index == '?' && worktree == '?' {
            result.untracked.push(FileStatus {
                path,
                status: '?',
                staged: false,
            });
            continue;
        }

        if index == 'U' || worktree == 'U' {
            result.has_conflicts = true;
            result.unstaged.push(FileStatus {
                path,
                status: 'U',
                staged: false,
            });
            continue;
        }

        if index != ' ' {
            result.staged.push(FileStatus {
                path: path.clone(),
                status: index,
                staged: true,
            });
        }
        if worktree != ' ' {
            result.unstaged.push(FileStatus {
                path,
                status: worktree,
                staged: false,
            });
        }
    }

    result
}

pub fn parse_branches(raw: &str) -> RepoBranches {
    let mut result = RepoBranches::default();

    for line in raw.lines() {
        let is_current = line.starts_with("* ");
        let name = line.trim_start_matches("* ").trim();
        if name.is_empty() || name.contains("HEAD") {
            continue;
        }

        if let Some(remote_name) = name.strip_prefix("remotes/") {
            result.remote.push(RepoBranch {
                name: remote_name.to_string(),
                is_current: false,
                is_remote: true,
            });
        } else {
            if is_current {
                result.current = name.to_string();
            }
            result.local.push(RepoBranch {
                name: name.to_string(),
                is_current,
                is_remote: false,
            });
        }
    }

    result
}

pub fn parse_log(raw: &str) -> Vec<RepoCommit> {
    raw.lines()
        .filter_map(|line| {
            let mut parts = line.splitn(4, '|');
            Some(RepoCommit {
                hash: parts.next()?.to_string(),
                message: parts.next()?.to_string(),
                author: parts.next()?.to_string(),
                date: parts.next()?.to_string(),
            })
        })
        .collect()
}

pub fn parse_head(raw: &str) -> String {
    let raw = raw.trim();
    match raw.strip_prefix("ref: refs/heads/") {
        Some(branch) => branch.to_string(),
        None => raw.chars().take(7).collect(),
    }
}
