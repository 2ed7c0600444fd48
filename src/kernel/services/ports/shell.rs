//! Shell transport port: the seam between terminal session state and the
//! process backend that feeds it.

use std::path::PathBuf;
use std::sync::Arc;

use super::remote::ConnectionId;

pub type SessionId = u64;

pub type Result<T> = std::result::Result<T, ShellError>;

#[derive(Debug)]
pub enum ShellError {
    SessionNotFound(SessionId),
    Spawn(String),
    Process(String),
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::SessionNotFound(id) => write!(f, "Shell session not found: {}", id),
            ShellError::Spawn(msg) => write!(f, "Failed to spawn shell: {}", msg),
            ShellError::Process(msg) => write!(f, "Shell process error: {}", msg),
        }
    }
}

impl std::error::Error for ShellError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellSize {
    pub rows: u16,
    pub cols: u16,
}

impl Default for ShellSize {
    fn default() -> Self {
        Self { rows: 24, cols: 80 }
    }
}

#[derive(Debug, Clone)]
pub struct SpawnSpec {
    pub id: SessionId,
    pub cwd: PathBuf,
    pub size: ShellSize,
    /// Set for sessions that run over a remote link; `None` means local.
    pub connection: Option<ConnectionId>,
}

/// Asynchronous notifications a transport emits after a successful spawn.
#[derive(Debug, Clone)]
pub enum ShellEvent {
    Output { id: SessionId, bytes: Vec<u8> },
    Exited { id: SessionId },
}

pub type ShellEventSink = Arc<dyn Fn(ShellEvent) + Send + Sync>;

/// A backend capable of running shell processes keyed by session id.
///
/// Each session owns at most one process handle and one output subscription,
/// and the transport releases both together on kill or exit. Killing a
/// session that is already gone is not an error.
pub trait ShellTransport: Send + Sync {
    /// Spawn the backend process for `spec.id`. A second spawn for an id
    /// that is already live must be a no-op returning `Ok(())`.
    fn spawn(&self, spec: SpawnSpec, sink: ShellEventSink) -> Result<()>;

    fn write(&self, id: SessionId, data: &[u8]) -> Result<()>;
    fn resize(&self, id: SessionId, size: ShellSize) -> Result<()>;
    fn kill(&self, id: SessionId);

    /// Kill every live session. Called on application teardown.
    fn shutdown(&self);
}
