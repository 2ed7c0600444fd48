//! Remote host adapters: the connection registry, the shell transport that
//! rides established links, and an ssh-process transport.

use portable_pty::{native_pty_system, CommandBuilder, PtySize};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::pty::{spawn_reader_loop, spawn_writer_loop};
use crate::core::Service;
use crate::kernel::services::ports::remote::{
    ConnectionId, RemoteAuth, RemoteChannel, RemoteConnection, RemoteError, RemoteLink,
    RemoteTransport,
};
use crate::kernel::services::ports::shell::{
    SessionId, ShellError, ShellEventSink, ShellSize, ShellTransport, SpawnSpec,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type LinkMap = Arc<Mutex<FxHashMap<ConnectionId, Box<dyn RemoteLink>>>>;

/// Saved connection records plus the links currently established for them.
/// Records survive restarts; links never do.
pub struct ConnectionService {
    records: Vec<RemoteConnection>,
    next_id: ConnectionId,
    transport: Arc<dyn RemoteTransport>,
    links: LinkMap,
}

impl ConnectionService {
    pub fn new(transport: Arc<dyn RemoteTransport>, records: Vec<RemoteConnection>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            records,
            next_id,
            transport,
            links: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    pub fn records(&self) -> &[RemoteConnection] {
        &self.records
    }

    pub fn get(&self, id: ConnectionId) -> Option<&RemoteConnection> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn add(
        &mut self,
        name: String,
        host: String,
        port: u16,
        username: String,
        auth: RemoteAuth,
    ) -> ConnectionId {
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(RemoteConnection {
            id,
            name,
            host,
            port,
            username,
            auth,
        });
        id
    }

    pub fn update(&mut self, record: RemoteConnection) -> bool {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Remove a record and drop any live link with it.
    pub fn remove(&mut self, id: ConnectionId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        lock_links(&self.links).remove(&id);
        self.records.len() != before
    }

    /// Establish the link for `id`. Connecting while already connected is a
    /// no-op, so retry storms cannot stack links.
    pub fn connect(
        &mut self,
        id: ConnectionId,
        secret: Option<&str>,
    ) -> std::result::Result<(), RemoteError> {
        if lock_links(&self.links).contains_key(&id) {
            return Ok(());
        }
        let record = self.get(id).ok_or(RemoteError::NotFound(id))?;
        let link = self.transport.connect(record, secret)?;
        lock_links(&self.links).insert(id, link);
        Ok(())
    }

    pub fn disconnect(&mut self, id: ConnectionId) {
        lock_links(&self.links).remove(&id);
    }

    pub fn is_connected(&self, id: ConnectionId) -> bool {
        lock_links(&self.links).contains_key(&id)
    }

    /// Shared handle for the shell transport that opens channels on links.
    pub fn links_handle(&self) -> LinkMap {
        Arc::clone(&self.links)
    }
}

impl Service for ConnectionService {
    fn name(&self) -> &'static str {
        "ConnectionService"
    }
}

fn lock_links(
    links: &Mutex<FxHashMap<ConnectionId, Box<dyn RemoteLink>>>,
) -> MutexGuard<'_, FxHashMap<ConnectionId, Box<dyn RemoteLink>>> {
    links.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct ChannelHandle {
    channel: Arc<Mutex<Box<dyn RemoteChannel>>>,
    writer_tx: Sender<Vec<u8>>,
}

/// Shell transport for remote sessions. Spawning opens a fresh channel on
/// the already-established link; the byte pump is the same reader/writer
/// loop the local pty uses.
pub struct RemoteShell {
    links: LinkMap,
    channels: Arc<Mutex<FxHashMap<SessionId, ChannelHandle>>>,
}

impl RemoteShell {
    pub fn new(links: LinkMap) -> Self {
        Self {
            links,
            channels: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    fn lock_channels(&self) -> MutexGuard<'_, FxHashMap<SessionId, ChannelHandle>> {
        lock_channel_map(&self.channels)
    }
}

fn lock_channel_map(
    channels: &Mutex<FxHashMap<SessionId, ChannelHandle>>,
) -> MutexGuard<'_, FxHashMap<SessionId, ChannelHandle>> {
    channels
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ShellTransport for RemoteShell {
    fn spawn(&self, spec: SpawnSpec, sink: ShellEventSink) -> crate::kernel::services::ports::shell::Result<()> {
        let connection = spec
            .connection
            .ok_or_else(|| ShellError::Spawn("session has no remote connection".to_string()))?;

        let mut channels = self.lock_channels();
        let slot = match channels.entry(spec.id) {
            Entry::Occupied(_) => return Ok(()),
            Entry::Vacant(slot) => slot,
        };

        let mut channel = {
            let mut links = lock_links(&self.links);
            let link = links
                .get_mut(&connection)
                .ok_or_else(|| ShellError::Spawn(format!("not connected: {connection}")))?;
            link.open_shell(spec.size)
                .map_err(|e| ShellError::Spawn(e.to_string()))?
        };

        let reader = channel
            .reader()
            .map_err(|e| ShellError::Spawn(e.to_string()))?;
        let writer = channel
            .writer()
            .map_err(|e| ShellError::Spawn(e.to_string()))?;

        let (writer_tx, writer_rx) = std::sync::mpsc::channel();
        slot.insert(ChannelHandle {
            channel: Arc::new(Mutex::new(channel)),
            writer_tx,
        });

        let id = spec.id;
        let channels_for_eof = Arc::clone(&self.channels);
        spawn_reader_loop(id, reader, sink, move || {
            lock_channel_map(&channels_for_eof).remove(&id);
        });
        spawn_writer_loop(writer, writer_rx);

        Ok(())
    }

    fn write(&self, id: SessionId, data: &[u8]) -> crate::kernel::services::ports::shell::Result<()> {
        let channels = self.lock_channels();
        let handle = channels.get(&id).ok_or(ShellError::SessionNotFound(id))?;
        handle
            .writer_tx
            .send(data.to_vec())
            .map_err(|_| ShellError::Process("writer thread is gone".to_string()))
    }

    fn resize(&self, id: SessionId, size: ShellSize) -> crate::kernel::services::ports::shell::Result<()> {
        let channel = {
            let channels = self.lock_channels();
            let handle = channels.get(&id).ok_or(ShellError::SessionNotFound(id))?;
            Arc::clone(&handle.channel)
        };
        let mut channel = channel.lock().unwrap_or_else(|p| p.into_inner());
        channel
            .resize(size)
            .map_err(|e| ShellError::Process(e.to_string()))
    }

    fn kill(&self, id: SessionId) {
        let handle = self.lock_channels().remove(&id);
        if let Some(handle) = handle {
            let mut channel = handle.channel.lock().unwrap_or_else(|p| p.into_inner());
            channel.kill();
        }
    }

    fn shutdown(&self) {
        let drained: Vec<_> = self.lock_channels().drain().collect();
        for (_, handle) in drained {
            let mut channel = handle.channel.lock().unwrap_or_else(|p| p.into_inner());
            channel.kill();
        }
    }
}

/// Transport that drives the system `ssh` client under a local pty. The
/// connect step only validates reachability; authentication happens
/// interactively inside the channel, so password prompts land in the
/// terminal like any other output.
pub struct SshProcessTransport;

impl SshProcessTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SshProcessTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteTransport for SshProcessTransport {
    fn connect(
        &self,
        record: &RemoteConnection,
        _secret: Option<&str>,
    ) -> crate::kernel::services::ports::remote::Result<Box<dyn RemoteLink>> {
        let addr = (record.host.as_str(), record.port)
            .to_socket_addrs()
            .map_err(|e| RemoteError::Connect(e.to_string()))?
            .next()
            .ok_or_else(|| {
                RemoteError::Connect(format!("no address for {}:{}", record.host, record.port))
            })?;
        TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)
            .map_err(|e| RemoteError::Connect(e.to_string()))?;

        Ok(Box::new(SshLink {
            record: record.clone(),
        }))
    }
}

struct SshLink {
    record: RemoteConnection,
}

impl RemoteLink for SshLink {
    fn open_shell(
        &mut self,
        size: ShellSize,
    ) -> crate::kernel::services::ports::remote::Result<Box<dyn RemoteChannel>> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: size.rows,
                cols: size.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| RemoteError::Channel(e.to_string()))?;

        let mut cmd = CommandBuilder::new("ssh");
        cmd.arg("-p");
        cmd.arg(self.record.port.to_string());
        if let RemoteAuth::Key { key_path } = &self.record.auth {
            cmd.arg("-i");
            cmd.arg(key_path);
        }
        cmd.arg(format!("{}@{}", self.record.username, self.record.host));
        cmd.env("TERM", "xterm-256color");

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| RemoteError::Channel(e.to_string()))?;
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| RemoteError::Channel(e.to_string()))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| RemoteError::Channel(e.to_string()))?;

        Ok(Box::new(SshChannel {
            master: pair.master,
            child,
            reader: Some(reader),
            writer: Some(writer),
        }))
    }
}

struct SshChannel {
    master: Box<dyn portable_pty::MasterPty + Send>,
    child: Box<dyn portable_pty::Child + Send + Sync>,
    reader: Option<Box<dyn Read + Send>>,
    writer: Option<Box<dyn Write + Send>>,
}

impl RemoteChannel for SshChannel {
    fn reader(&mut self) -> crate::kernel::services::ports::remote::Result<Box<dyn Read + Send>> {
        self.reader
            .take()
            .ok_or_else(|| RemoteError::Channel("reader already taken".to_string()))
    }

    fn writer(&mut self) -> crate::kernel::services::ports::remote::Result<Box<dyn Write + Send>> {
        self.writer
            .take()
            .ok_or_else(|| RemoteError::Channel("writer already taken".to_string()))
    }

    fn resize(&mut self, size: ShellSize) -> crate::kernel::services::ports::remote::Result<()> {
        self.master
            .resize(PtySize {
                rows: size.rows,
                cols: size.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| RemoteError::Channel(e.to_string()))
    }

    fn kill(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
