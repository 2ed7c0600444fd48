use super::message::AppMessage;
use crate::kernel::documents::DocumentId;
use crate::kernel::locator::should_skip;
use crate::kernel::repository::RepoSlice;
use crate::kernel::services::adapters::file::FileService;
use crate::kernel::services::adapters::git;
use crate::kernel::services::ports::shell::{ShellEventSink, ShellTransport, SpawnSpec};
use crate::kernel::services::ports::vcs::RepoMutation;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const REPO_POLL_INTERVAL: Duration = Duration::from_millis(3000);
const INDEX_FILE_CAP: usize = 10_000;

pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
    files: Arc<FileService>,
    poll: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl AsyncRuntime {
    pub fn new(tx: Sender<AppMessage>, files: Arc<FileService>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            tx,
            files,
            poll: Mutex::new(None),
        })
    }

    pub fn load_dir(&self, path: PathBuf) {
        let tx = self.tx.clone();
        let files = Arc::clone(&self.files);
        self.runtime.spawn(async move {
            let path_for_read = path.clone();
            let result =
                tokio::task::spawn_blocking(move || files.read_dir(&path_for_read)).await;
            let message = match result {
                Ok(Ok(entries)) => AppMessage::DirLoaded { path, entries },
                Ok(Err(e)) => AppMessage::DirLoadError {
                    path,
                    error: e.to_string(),
                },
                Err(e) => AppMessage::DirLoadError {
                    path,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(message);
        });
    }

    pub fn load_file(&self, path: PathBuf) {
        let tx = self.tx.clone();
        let files = Arc::clone(&self.files);
        self.runtime.spawn(async move {
            let path_for_read = path.clone();
            let result =
                tokio::task::spawn_blocking(move || files.read_file(&path_for_read)).await;
            let message = match result {
                Ok(Ok(content)) => AppMessage::FileLoaded { path, content },
                Ok(Err(e)) => AppMessage::FileOpenFailed {
                    path,
                    error: e.to_string(),
                },
                Err(e) => AppMessage::FileOpenFailed {
                    path,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(message);
        });
    }

    /// Write a document snapshot to disk. The reported message carries the
    /// exact content that was written so the caller can fix its baseline
    /// even if the buffer has moved on since.
    pub fn save_document(&self, id: DocumentId, path: PathBuf, content: String) {
        let tx = self.tx.clone();
        let files = Arc::clone(&self.files);
        self.runtime.spawn(async move {
            let path_for_write = path.clone();
            let content_for_write = content.clone();
            let result = tokio::task::spawn_blocking(move || {
                files.write_file(&path_for_write, &content_for_write)
            })
            .await;

            let success = match result {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    let _ = tx.send(AppMessage::FsOpFailed {
                        op: "save_document",
                        path: path.clone(),
                        error: e.to_string(),
                    });
                    false
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::FsOpFailed {
                        op: "save_document",
                        path: path.clone(),
                        error: e.to_string(),
                    });
                    false
                }
            };

            let _ = tx.send(AppMessage::DocumentSaved {
                id,
                path,
                content,
                success,
            });
        });
    }

    pub fn create_path(&self, path: PathBuf, is_dir: bool) {
        let tx = self.tx.clone();
        let files = Arc::clone(&self.files);
        self.runtime.spawn(async move {
            let path_for_op = path.clone();
            let result = tokio::task::spawn_blocking(move || {
                if is_dir {
                    files.create_dir(&path_for_op)
                } else {
                    files.create_file(&path_for_op)
                }
            })
            .await;

            let message = match flatten(result) {
                Ok(()) => AppMessage::PathCreated { path, is_dir },
                Err(error) => AppMessage::FsOpFailed {
                    op: "create_path",
                    path,
                    error,
                },
            };
            let _ = tx.send(message);
        });
    }

    pub fn rename_path(&self, from: PathBuf, to: PathBuf) {
        let tx = self.tx.clone();
        let files = Arc::clone(&self.files);
        self.runtime.spawn(async move {
            let from_for_op = from.clone();
            let to_for_op = to.clone();
            let result =
                tokio::task::spawn_blocking(move || files.rename(&from_for_op, &to_for_op)).await;

            let message = match flatten(result) {
                Ok(()) => AppMessage::PathRenamed { from, to },
                Err(error) => AppMessage::FsOpFailed {
                    op: "rename_path",
                    path: from,
                    error,
                },
            };
            let _ = tx.send(message);
        });
    }

    pub fn delete_path(&self, path: PathBuf, is_dir: bool) {
        let tx = self.tx.clone();
        let files = Arc::clone(&self.files);
        self.runtime.spawn(async move {
            let path_for_op = path.clone();
            let result = tokio::task::spawn_blocking(move || {
                if is_dir {
                    files.delete_dir(&path_for_op)
                } else {
                    files.delete_file(&path_for_op)
                }
            })
            .await;

            let message = match flatten(result) {
                Ok(()) => AppMessage::PathDeleted { path },
                Err(error) => AppMessage::FsOpFailed {
                    op: "delete_path",
                    path,
                    error,
                },
            };
            let _ = tx.send(message);
        });
    }

    /// Re-fetch one repository slice. A failed fetch clears the slice, the
    /// same as a missing repository, so the panel never keeps rendering a
    /// stale snapshot.
    pub fn refresh_repo(&self, root: PathBuf, slice: RepoSlice) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let message = match slice {
                RepoSlice::Status => match git::status(&root).await {
                    Ok(status) => AppMessage::RepoStatus(status),
                    Err(e) => {
                        tracing::warn!(error = %e, "repo status refresh failed");
                        AppMessage::RepoStatus(None)
                    }
                },
                RepoSlice::Branches => match git::branches(&root).await {
                    Ok(branches) => AppMessage::RepoBranches(branches),
                    Err(e) => {
                        tracing::warn!(error = %e, "repo branches refresh failed");
                        AppMessage::RepoBranches(None)
                    }
                },
                RepoSlice::Commits => match git::commits(&root).await {
                    Ok(commits) => AppMessage::RepoCommits(commits),
                    Err(e) => {
                        tracing::warn!(error = %e, "repo commits refresh failed");
                        AppMessage::RepoCommits(Vec::new())
                    }
                },
                RepoSlice::Head => match git::head(&root).await {
                    Ok(head) => AppMessage::RepoHead(head),
                    Err(e) => {
                        tracing::warn!(error = %e, "repo head refresh failed");
                        AppMessage::RepoHead(None)
                    }
                },
            };
            let _ = tx.send(message);
        });
    }

    pub fn run_repo_mutation(&self, root: PathBuf, mutation: RepoMutation) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let kind = mutation.kind();
            let message = match git::apply(&root, &mutation).await {
                Ok(()) => AppMessage::RepoMutationFinished {
                    kind,
                    success: true,
                    error: None,
                },
                Err(e) => AppMessage::RepoMutationFinished {
                    kind,
                    success: false,
                    error: Some(e.to_string()),
                },
            };
            let _ = tx.send(message);
        });
    }

    /// Start the periodic status poll. A previous poll task, if any, is
    /// aborted first so switching roots never leaves two tickers running.
    pub fn start_repo_polling(&self, root: PathBuf) {
        let tx = self.tx.clone();
        let handle = self.runtime.spawn(async move {
            tracing::debug!(root = %root.display(), "repository poll started");
            let mut interval = tokio::time::interval(REPO_POLL_INTERVAL);
            // The first tick fires immediately; the initial refresh already
            // covered it.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(AppMessage::RepoPollTick).is_err() {
                    break;
                }
            }
        });

        let mut poll = self.poll.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(old) = poll.replace(handle) {
            old.abort();
        }
    }

    pub fn stop_repo_polling(&self) {
        let mut poll = self.poll.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(handle) = poll.take() {
            handle.abort();
        }
    }

    /// Spawn the backend process for a terminal session off the UI thread;
    /// the result comes back as a message either way.
    pub fn spawn_shell(
        &self,
        transport: Arc<dyn ShellTransport>,
        spec: SpawnSpec,
        sink: ShellEventSink,
    ) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let id = spec.id;
            let result =
                tokio::task::spawn_blocking(move || transport.spawn(spec, sink)).await;
            let message = match result {
                Ok(Ok(())) => AppMessage::ShellSpawned { id },
                Ok(Err(e)) => AppMessage::ShellSpawnFailed {
                    id,
                    error: e.to_string(),
                },
                Err(e) => AppMessage::ShellSpawnFailed {
                    id,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(message);
        });
    }

    /// Walk the workspace and collect relative file paths for the locator.
    /// Heavy directories are skipped and the list is capped, so the walk
    /// stays bounded on large trees.
    pub fn index_workspace(&self, root: PathBuf) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let root_for_walk = root.clone();
            let result =
                tokio::task::spawn_blocking(move || walk_workspace(&root_for_walk)).await;
            match result {
                Ok(files) => {
                    let _ = tx.send(AppMessage::WorkspaceIndexed { files });
                }
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "workspace index failed");
                }
            }
        });
    }

    pub fn shutdown(self) {
        self.stop_repo_polling();
        // Drop the runtime on a detached thread so teardown never blocks on
        // in-flight IO.
        let runtime = self.runtime;
        std::thread::spawn(move || drop(runtime));
    }
}

fn flatten<E1: ToString, E2: ToString>(
    result: std::result::Result<std::result::Result<(), E1>, E2>,
) -> std::result::Result<(), String> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn walk_workspace(root: &std::path::Path) -> Vec<String> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        if files.len() >= INDEX_FILE_CAP {
            break;
        }
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(_) => continue,
            };
            if file_type.is_dir() {
                if !should_skip(&name) {
                    stack.push(entry.path());
                }
            } else if file_type.is_file() {
                if let Ok(relative) = entry.path().strip_prefix(root) {
                    files.push(relative.to_string_lossy().replace('\\', "/"));
                    if files.len() >= INDEX_FILE_CAP {
                        break;
                    }
                }
            }
        }
    }

    files.sort();
    files
}
