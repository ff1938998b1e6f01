//! Message types passed between worker loops

use std::fmt;

use tokio::sync::mpsc;
use tracing::debug;

/// Which side of the exchange a worker loop plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Ping,
    Pong,
}

impl Role {
    /// Label printed in front of the round counter
    pub fn label(&self) -> &'static str {
        match self {
            Role::Ping => "PING",
            Role::Pong => "PONG",
        }
    }

    /// The role on the other end of the exchange
    pub fn peer(&self) -> Role {
        match self {
            Role::Ping => Role::Pong,
            Role::Pong => Role::Ping,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of handing a message to a mailbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The message is queued for the destination loop
    Delivered,
    /// The destination loop has stopped and dropped its queue
    PeerGone,
}

/// Sending half of a worker loop's inbound queue
///
/// Cloning a mailbox gives another handle to the same queue. The owning loop
/// keeps only the receiving half, so the queue stays open exactly as long as
/// some message (or the kickoff) still carries a handle to it.
#[derive(Clone)]
pub struct Mailbox {
    role: Role,
    tx: mpsc::Sender<Message>,
}

/// Create the inbound queue for one worker loop
pub fn mailbox(role: Role, capacity: usize) -> (Mailbox, mpsc::Receiver<Message>) {
    debug!(%role, %capacity, "mailbox: called");
    let (tx, rx) = mpsc::channel(capacity);
    (Mailbox { role, tx }, rx)
}

impl Mailbox {
    /// Role of the loop that owns this queue
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the owning loop has dropped its queue
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Enqueue a message for the owning loop
    pub async fn deliver(&self, msg: Message) -> Delivery {
        debug!(role = %self.role, "Mailbox::deliver: called");
        match self.tx.send(msg).await {
            Ok(()) => Delivery::Delivered,
            Err(_) => {
                debug!(role = %self.role, "Mailbox::deliver: receiver dropped");
                Delivery::PeerGone
            }
        }
    }
}

impl fmt::Debug for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox")
            .field("role", &self.role)
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// One handoff between the loops
///
/// `reply_to` names the queue the receiver should bounce the next message to.
/// `None` is the stop signal from a peer that has used up its budget.
#[derive(Debug)]
pub struct Message {
    pub destination: Mailbox,
    pub reply_to: Option<Mailbox>,
}

impl Message {
    pub fn new(destination: Mailbox, reply_to: Option<Mailbox>) -> Self {
        Self { destination, reply_to }
    }

    /// True when the sender asked for no further replies
    pub fn is_stop(&self) -> bool {
        self.reply_to.is_none()
    }

    /// Enqueue this message on its own destination
    pub async fn send(self) -> Delivery {
        let destination = self.destination.clone();
        destination.deliver(self).await
    }
}
