//! Application host: wires the store to the service adapters, executes the
//! effects the reducer requests, and pumps completion messages back into it.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use crate::core::ServiceRegistry;
use crate::kernel::services::adapters::settings::{self, home_dir, PersistedState};
use crate::kernel::services::adapters::{
    AppMessage, AsyncRuntime, ConnectionService, FileService, PtyShell, RemoteShell,
    SshProcessTransport,
};
use crate::kernel::services::ports::shell::{
    ShellEvent, ShellEventSink, ShellSize, ShellTransport, SpawnSpec,
};
use crate::kernel::terminal::SessionKind;
use crate::kernel::{Action, Effect, Store, WorkspaceState};

const MESSAGE_POLL: Duration = Duration::from_millis(50);

pub struct WorkspaceApp {
    store: Store,
    services: ServiceRegistry,
    runtime: AsyncRuntime,
    local_shell: Arc<PtyShell>,
    remote_shell: Arc<RemoteShell>,
    rx: Receiver<AppMessage>,
    sink: ShellEventSink,
    initial_root: Option<PathBuf>,
}

impl WorkspaceApp {
    pub fn new() -> std::io::Result<Self> {
        if let Err(e) = settings::ensure_settings_file() {
            tracing::warn!(error = %e, "could not create settings file");
        }
        let persisted = settings::load_settings().unwrap_or_default();

        let (tx, rx) = std::sync::mpsc::channel();
        let files = Arc::new(FileService::new());
        let runtime = AsyncRuntime::new(tx.clone(), Arc::clone(&files))?;

        let connections = ConnectionService::new(
            Arc::new(SshProcessTransport::new()),
            persisted.connections.clone(),
        );
        let remote_shell = Arc::new(RemoteShell::new(connections.links_handle()));
        let local_shell = Arc::new(PtyShell::new());

        let mut services = ServiceRegistry::new();
        if let Err(e) = services.register(connections) {
            tracing::warn!(error = %e, "service registration failed");
        }

        let sink: ShellEventSink = Arc::new(move |event| {
            let _ = tx.send(AppMessage::Shell(event));
        });

        Ok(Self {
            store: Store::new(WorkspaceState::from_persisted(&persisted)),
            services,
            runtime,
            local_shell,
            remote_shell,
            rx,
            sink,
            initial_root: persisted.root_path,
        })
    }

    pub fn state(&self) -> &WorkspaceState {
        self.store.state()
    }

    pub fn connections(&self) -> Option<&ConnectionService> {
        self.services.get::<ConnectionService>()
    }

    pub fn connections_mut(&mut self) -> Option<&mut ConnectionService> {
        self.services.get_mut::<ConnectionService>()
    }

    /// Open the startup workspace: an explicit root wins over the persisted
    /// one. Dispatching `SetRoot` fires the usual load and polling effects.
    pub fn bootstrap(&mut self, root_override: Option<PathBuf>) {
        let root = root_override.or_else(|| self.initial_root.take());
        self.dispatch(Action::SetRoot(root));
    }

    pub fn dispatch(&mut self, action: Action) {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.execute(effect);
        }
    }

    /// Drain whatever completions arrived without blocking.
    pub fn pump_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            let action = message_to_action(message);
            self.dispatch(action);
        }
    }

    /// Process completions until a quit is requested or every sender is
    /// gone.
    pub fn run(&mut self) {
        loop {
            if self.store.state().ui.should_quit {
                break;
            }
            match self.rx.recv_timeout(MESSAGE_POLL) {
                Ok(message) => {
                    let action = message_to_action(message);
                    self.dispatch(action);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    pub fn shutdown(self) {
        self.persist();
        self.local_shell.shutdown();
        self.remote_shell.shutdown();
        self.runtime.shutdown();
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::LoadDir(path) => self.runtime.load_dir(path),
            Effect::LoadFile(path) => self.runtime.load_file(path),
            Effect::SaveDocument { id, path, content } => {
                self.runtime.save_document(id, path, content)
            }
            Effect::CreatePath { path, is_dir } => self.runtime.create_path(path, is_dir),
            Effect::RenamePath { from, to } => self.runtime.rename_path(from, to),
            Effect::DeletePath { path, is_dir } => self.runtime.delete_path(path, is_dir),

            Effect::SpawnShell {
                id,
                kind,
                rows,
                cols,
            } => {
                let cwd = self
                    .store
                    .state()
                    .root
                    .clone()
                    .or_else(home_dir)
                    .unwrap_or_else(std::env::temp_dir);
                let spec = SpawnSpec {
                    id,
                    cwd,
                    size: ShellSize { rows, cols },
                    connection: match kind {
                        SessionKind::Local => None,
                        SessionKind::Remote(connection) => Some(connection),
                    },
                };
                self.runtime
                    .spawn_shell(self.transport_for(kind), spec, Arc::clone(&self.sink));
            }
            Effect::WriteShell { id, kind, data } => {
                if let Err(e) = self.transport_for(kind).write(id, &data) {
                    tracing::warn!(session = id, error = %e, "shell write failed");
                    self.dispatch(Action::TerminalProcessError {
                        id,
                        error: e.to_string(),
                    });
                }
            }
            Effect::ResizeShell {
                id,
                kind,
                rows,
                cols,
            } => {
                if let Err(e) = self
                    .transport_for(kind)
                    .resize(id, ShellSize { rows, cols })
                {
                    tracing::debug!(session = id, error = %e, "shell resize failed");
                    self.dispatch(Action::TerminalProcessError {
                        id,
                        error: e.to_string(),
                    });
                }
            }
            Effect::KillShell { id, kind } => self.transport_for(kind).kill(id),

            Effect::RefreshRepo { root, slice } => self.runtime.refresh_repo(root, slice),
            Effect::RunRepoMutation { root, mutation } => {
                self.runtime.run_repo_mutation(root, mutation)
            }
            Effect::StartRepoPolling { root } => self.runtime.start_repo_polling(root),
            Effect::StopRepoPolling => self.runtime.stop_repo_polling(),

            Effect::IndexWorkspace(root) => self.runtime.index_workspace(root),

            Effect::ConnectRemote { id, secret } => {
                let result = match self.services.get_mut::<ConnectionService>() {
                    Some(service) => service.connect(id, secret.as_deref()),
                    None => return,
                };
                let action = match result {
                    Ok(()) => Action::RemoteConnected { id },
                    Err(e) => Action::RemoteConnectFailed {
                        id,
                        error: e.to_string(),
                    },
                };
                self.dispatch(action);
            }
            Effect::DisconnectRemote { id } => {
                if let Some(service) = self.services.get_mut::<ConnectionService>() {
                    service.disconnect(id);
                }
            }

            Effect::PersistSettings => self.persist(),
        }
    }

    fn transport_for(&self, kind: SessionKind) -> Arc<dyn ShellTransport> {
        match kind {
            SessionKind::Local => Arc::clone(&self.local_shell) as Arc<dyn ShellTransport>,
            SessionKind::Remote(_) => Arc::clone(&self.remote_shell) as Arc<dyn ShellTransport>,
        }
    }

    fn persist(&self) {
        let connections = self
            .services
            .get::<ConnectionService>()
            .map(|s| s.records().to_vec())
            .unwrap_or_default();
        let persisted: PersistedState = self.store.state().persisted(connections);
        if let Err(e) = settings::save_settings(&persisted) {
            tracing::warn!(error = %e, "failed to persist settings");
        }
    }
}

fn message_to_action(message: AppMessage) -> Action {
    match message {
        AppMessage::DirLoaded { path, entries } => Action::DirLoaded { path, entries },
        AppMessage::DirLoadError { path, error } => Action::DirLoadError { path, error },
        AppMessage::FileLoaded { path, content } => Action::FileLoaded { path, content },
        AppMessage::FileOpenFailed { path, error } => Action::FileOpenFailed { path, error },
        AppMessage::DocumentSaved {
            id,
            path,
            content,
            success,
        } => Action::DocumentSaved {
            id,
            path,
            content,
            success,
        },
        AppMessage::PathCreated { path, is_dir } => Action::PathCreated { path, is_dir },
        AppMessage::PathRenamed { from, to } => Action::PathRenamed { from, to },
        AppMessage::PathDeleted { path } => Action::PathDeleted { path },
        AppMessage::FsOpFailed { op, path, error } => Action::FsOpFailed { op, path, error },
        AppMessage::ShellSpawned { id } => Action::ShellSpawned { id },
        AppMessage::ShellSpawnFailed { id, error } => Action::ShellSpawnFailed { id, error },
        AppMessage::Shell(ShellEvent::Output { id, bytes }) => Action::ShellOutput { id, bytes },
        AppMessage::Shell(ShellEvent::Exited { id }) => Action::ShellExited { id },
        AppMessage::RepoStatus(status) => Action::RepoStatusLoaded(status),
        AppMessage::RepoBranches(branches) => Action::RepoBranchesLoaded(branches),
        AppMessage::RepoCommits(commits) => Action::RepoCommitsLoaded(commits),
        AppMessage::RepoHead(head) => Action::RepoHeadLoaded(head),
        AppMessage::RepoMutationFinished {
            kind,
            success,
            error,
        } => Action::RepoMutationFinished {
            kind,
            success,
            error,
        },
        AppMessage::RepoPollTick => Action::RepoPollTick,
        AppMessage::WorkspaceIndexed { files } => Action::WorkspaceIndexed { files },
    }
}
