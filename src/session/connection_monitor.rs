//! Heartbeat tracking for every open connection.
//!
//! Each sweep pings connections that answered since the previous sweep and
//! terminates the ones that did not. The caller feeds the returned ids to
//! `SessionCoordinator::disconnect`.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::session::connection::{ConnectionHandle, ConnectionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    AwaitingPong,
    Terminated,
}

struct Tracked {
    handle: ConnectionHandle,
    liveness: Liveness,
}

#[derive(Default)]
pub struct ConnectionMonitor {
    connections: Mutex<HashMap<ConnectionId, Tracked>>,
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handle: ConnectionHandle) {
        self.connections.lock().insert(
            handle.id(),
            Tracked {
                handle,
                liveness: Liveness::Alive,
            },
        );
    }

    pub fn unregister(&self, id: ConnectionId) {
        self.connections.lock().remove(&id);
    }

    pub fn record_pong(&self, id: ConnectionId) {
        if let Some(tracked) = self.connections.lock().get_mut(&id) {
            if tracked.liveness == Liveness::AwaitingPong {
                tracked.liveness = Liveness::Alive;
            }
        }
    }

    pub fn liveness(&self, id: ConnectionId) -> Option<Liveness> {
        self.connections.lock().get(&id).map(|tracked| tracked.liveness)
    }

    /// One heartbeat tick. Returns the connections terminated by this sweep.
    pub fn sweep(&self) -> Vec<ConnectionId> {
        let mut terminated = Vec::new();
        let mut connections = self.connections.lock();

        for (id, tracked) in connections.iter_mut() {
            match tracked.liveness {
                Liveness::Alive => {
                    tracked.liveness = Liveness::AwaitingPong;
                    if !tracked.handle.ping() {
                        debug!(connection = %id, "ping to closed writer");
                    }
                }
                Liveness::AwaitingPong => {
                    warn!(connection = %id, "heartbeat timed out");
                    tracked.liveness = Liveness::Terminated;
                    tracked.handle.close();
                    terminated.push(*id);
                }
                Liveness::Terminated => {}
            }
        }

        terminated.sort();
        terminated
    }

    /// Force-closes `id`. Returns `false` if it was already closed or unknown.
    pub fn terminate(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock();
        match connections.get_mut(&id) {
            Some(tracked) if tracked.liveness != Liveness::Terminated => {
                tracked.liveness = Liveness::Terminated;
                tracked.handle.close();
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.lock().is_empty()
    }
}
