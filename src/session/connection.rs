//! Outbound side of one client connection.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

use crate::protocol::messages::ServerMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl ConnectionId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ConnectionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Frames queued for a connection's writer task.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Message(ServerMessage),
    Ping,
    Close,
}

#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: mpsc::UnboundedSender<Outbound>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, sender: mpsc::UnboundedSender<Outbound>) -> Self {
        Self { id, sender }
    }

    /// A handle plus the receiving end its writer drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(ConnectionId::next(), sender), receiver)
    }

    #[inline]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queues `message`. Returns `false` once the writer has gone away.
    pub fn send(&self, message: ServerMessage) -> bool {
        self.sender.send(Outbound::Message(message)).is_ok()
    }

    pub fn ping(&self) -> bool {
        self.sender.send(Outbound::Ping).is_ok()
    }

    pub fn close(&self) -> bool {
        self.sender.send(Outbound::Close).is_ok()
    }
}
