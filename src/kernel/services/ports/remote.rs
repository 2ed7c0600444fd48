//! Remote host port: persisted connection records plus the transport traits
//! a remote shell rides on.

use std::io::{Read, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::shell::ShellSize;

pub type ConnectionId = u64;

pub type Result<T> = std::result::Result<T, RemoteError>;

#[derive(Debug)]
pub enum RemoteError {
    NotFound(ConnectionId),
    NotConnected(ConnectionId),
    Connect(String),
    Channel(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::NotFound(id) => write!(f, "Remote connection not found: {}", id),
            RemoteError::NotConnected(id) => {
                write!(f, "Remote connection not established: {}", id)
            }
            RemoteError::Connect(msg) => write!(f, "Failed to connect: {}", msg),
            RemoteError::Channel(msg) => write!(f, "Remote channel error: {}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "auth_type")]
pub enum RemoteAuth {
    Password,
    Key { key_path: PathBuf },
}

/// A saved connection record. Records are persisted with the workspace
/// settings and live independently of any session that uses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConnection {
    pub id: ConnectionId,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub auth: RemoteAuth,
}

/// A raw byte channel carrying one interactive shell.
pub trait RemoteChannel: Send {
    /// Take the output stream. May be called once per channel.
    fn reader(&mut self) -> Result<Box<dyn Read + Send>>;
    /// Take the input stream. May be called once per channel.
    fn writer(&mut self) -> Result<Box<dyn Write + Send>>;
    fn resize(&mut self, size: ShellSize) -> Result<()>;
    fn kill(&mut self);
}

/// An established link to one remote host; shells are opened on demand.
pub trait RemoteLink: Send {
    fn open_shell(&mut self, size: ShellSize) -> Result<Box<dyn RemoteChannel>>;
}

pub trait RemoteTransport: Send + Sync {
    /// Establish a link for `record`. Network and authentication failures
    /// surface here; the record itself is never modified.
    fn connect(
        &self,
        record: &RemoteConnection,
        secret: Option<&str>,
    ) -> Result<Box<dyn RemoteLink>>;
}
