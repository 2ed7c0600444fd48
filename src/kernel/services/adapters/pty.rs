//! Local shell transport backed by portable-pty. Each session owns a pty
//! pair, a writer thread fed over a channel, and a reader thread that pumps
//! output into the event sink until the process exits.

use portable_pty::{native_pty_system, CommandBuilder, PtySize};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::io::{Read, Write};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::kernel::services::ports::shell::{
    Result, SessionId, ShellError, ShellEvent, ShellEventSink, ShellSize, ShellTransport,
    SpawnSpec,
};

const READ_BUF_LEN: usize = 4096;

struct PtyInstance {
    master: Box<dyn portable_pty::MasterPty + Send>,
    writer_tx: Sender<Vec<u8>>,
    child: Box<dyn portable_pty::Child + Send + Sync>,
}

type SessionMap = Arc<Mutex<FxHashMap<SessionId, PtyInstance>>>;

pub struct PtyShell {
    sessions: SessionMap,
}

impl PtyShell {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FxHashMap<SessionId, PtyInstance>> {
        lock_sessions(&self.sessions)
    }
}

impl Default for PtyShell {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellTransport for PtyShell {
    fn spawn(&self, spec: SpawnSpec, sink: ShellEventSink) -> Result<()> {
        let mut sessions = self.lock();
        // A second spawn for a live session is a no-op, not an error.
        let slot = match sessions.entry(spec.id) {
            Entry::Occupied(_) => return Ok(()),
            Entry::Vacant(slot) => slot,
        };

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: spec.size.rows,
                cols: spec.size.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| ShellError::Spawn(e.to_string()))?;

        let mut cmd = CommandBuilder::new(default_shell());
        cmd.cwd(&spec.cwd);
        cmd.env("TERM", "xterm-256color");

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| ShellError::Spawn(e.to_string()))?;
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| ShellError::Spawn(e.to_string()))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| ShellError::Spawn(e.to_string()))?;

        let (writer_tx, writer_rx) = std::sync::mpsc::channel();
        slot.insert(PtyInstance {
            master: pair.master,
            writer_tx,
            child,
        });

        let id = spec.id;
        let sessions = Arc::clone(&self.sessions);
        spawn_reader_loop(id, reader, sink, move || {
            lock_sessions(&sessions).remove(&id);
        });
        spawn_writer_loop(writer, writer_rx);

        Ok(())
    }

    fn write(&self, id: SessionId, data: &[u8]) -> Result<()> {
        let sessions = self.lock();
        let instance = sessions.get(&id).ok_or(ShellError::SessionNotFound(id))?;
        instance
            .writer_tx
            .send(data.to_vec())
            .map_err(|_| ShellError::Process("writer thread is gone".to_string()))
    }

    fn resize(&self, id: SessionId, size: ShellSize) -> Result<()> {
        let sessions = self.lock();
        let instance = sessions.get(&id).ok_or(ShellError::SessionNotFound(id))?;
        instance
            .master
            .resize(PtySize {
                rows: size.rows,
                cols: size.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| ShellError::Process(e.to_string()))
    }

    fn kill(&self, id: SessionId) {
        let instance = self.lock().remove(&id);
        if let Some(mut instance) = instance {
            if let Err(e) = instance.child.kill() {
                tracing::debug!(session = id, error = %e, "kill after exit");
            }
            let _ = instance.child.wait();
        }
    }

    fn shutdown(&self) {
        let drained: Vec<_> = self.lock().drain().collect();
        for (_, mut instance) in drained {
            let _ = instance.child.kill();
            let _ = instance.child.wait();
        }
    }
}

fn lock_sessions(
    sessions: &Mutex<FxHashMap<SessionId, PtyInstance>>,
) -> MutexGuard<'_, FxHashMap<SessionId, PtyInstance>> {
    sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Pump process output into the sink until EOF, then run the cleanup and
/// report the exit. Shared with the remote transport, whose channels expose
/// the same reader/writer shape.
pub(crate) fn spawn_reader_loop(
    id: SessionId,
    mut reader: Box<dyn Read + Send>,
    sink: ShellEventSink,
    on_eof: impl FnOnce() + Send + 'static,
) {
    std::thread::spawn(move || {
        let mut buf = [0u8; READ_BUF_LEN];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => sink(ShellEvent::Output {
                    id,
                    bytes: buf[..n].to_vec(),
                }),
                Err(e) => {
                    tracing::debug!(session = id, error = %e, "shell read ended");
                    break;
                }
            }
        }
        on_eof();
        sink(ShellEvent::Exited { id });
    });
}

/// Drain the channel into the process stdin. Ends when every sender is
/// dropped, which happens when the session is removed.
pub(crate) fn spawn_writer_loop(mut writer: Box<dyn Write + Send>, rx: Receiver<Vec<u8>>) {
    std::thread::spawn(move || {
        while let Ok(data) = rx.recv() {
            if writer.write_all(&data).is_err() {
                break;
            }
            let _ = writer.flush();
        }
    });
}

fn default_shell() -> String {
    if cfg!(windows) {
        "powershell.exe".to_string()
    } else {
        std::env::var("SHELL").unwrap_or_else(|_| "/bin/bash".to_string())
    }
}
