//! WorkerLoop - one side of the ping/pong exchange

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::sink::OutputSink;

use super::barrier::BarrierParty;
use super::error::PlayError;
use super::messages::{Delivery, Mailbox, Message, Role};

/// Lifecycle of a worker loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Init,
    BarrierWait,
    Kickoff,
    Running,
    Terminated,
}

/// What a worker loop did before it stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub role: Role,
    /// Messages handled (one printed line each)
    pub rounds: u32,
    /// Replies dropped because the peer had already stopped
    pub undelivered: u32,
}

/// Mailboxes PING uses to send the first message
struct Kickoff {
    own: Mailbox,
    peer: Mailbox,
}

/// Sequential execution unit that owns one inbound queue and one counter
///
/// The counter starts at 1 and is only touched from `run`, so it needs no
/// synchronization. The loop stops dequeuing once the counter passes
/// `max_iterations`. It is wider than the budget so the last round cannot wrap.
///
/// Lifecycle transitions are published on a watch channel; grab a receiver
/// with [`WorkerLoop::watch_state`] before calling `run`.
pub struct WorkerLoop {
    role: Role,
    iterations_completed: u64,
    max_iterations: u32,
    inbox: mpsc::Receiver<Message>,
    barrier: Option<BarrierParty>,
    kickoff: Option<Kickoff>,
    sink: Arc<dyn OutputSink>,
    state: watch::Sender<WorkerState>,
    undelivered: u32,
}

impl WorkerLoop {
    /// Build the loop that sends the first message
    pub fn ping(
        max_iterations: u32,
        inbox: mpsc::Receiver<Message>,
        own: Mailbox,
        peer: Mailbox,
        barrier: BarrierParty,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        debug!(%max_iterations, "WorkerLoop::ping: called");
        let mut worker = Self::new(Role::Ping, max_iterations, inbox, barrier, sink);
        worker.kickoff = Some(Kickoff { own, peer });
        worker
    }

    /// Build the loop that waits to be served
    pub fn pong(
        max_iterations: u32,
        inbox: mpsc::Receiver<Message>,
        barrier: BarrierParty,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        debug!(%max_iterations, "WorkerLoop::pong: called");
        Self::new(Role::Pong, max_iterations, inbox, barrier, sink)
    }

    fn new(
        role: Role,
        max_iterations: u32,
        inbox: mpsc::Receiver<Message>,
        barrier: BarrierParty,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        let (state, _) = watch::channel(WorkerState::Init);
        Self {
            role,
            iterations_completed: 1,
            max_iterations,
            inbox,
            barrier: Some(barrier),
            kickoff: None,
            sink,
            state,
            undelivered: 0,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    /// Subscribe to lifecycle transitions, including the final `Terminated`
    pub fn watch_state(&self) -> watch::Receiver<WorkerState> {
        self.state.subscribe()
    }

    fn set_state(&self, state: WorkerState) {
        debug!(role = %self.role, ?state, "WorkerLoop::set_state: called");
        self.state.send_replace(state);
    }

    fn is_exhausted(&self) -> bool {
        self.iterations_completed > u64::from(self.max_iterations)
    }

    /// Messages handled so far; never exceeds `max_iterations`
    fn rounds(&self) -> u32 {
        u32::try_from(self.iterations_completed - 1).unwrap_or(u32::MAX)
    }

    fn report(&self) -> WorkerReport {
        WorkerReport {
            role: self.role,
            rounds: self.rounds(),
            undelivered: self.undelivered,
        }
    }

    /// Run the loop until its budget is used up
    pub async fn run(mut self) -> Result<WorkerReport, PlayError> {
        info!(role = %self.role, max_iterations = self.max_iterations, "Worker loop starting");

        self.set_state(WorkerState::BarrierWait);
        if let Some(barrier) = self.barrier.take() {
            barrier.wait().await?;
        }
        debug!(role = %self.role, "WorkerLoop::run: passed barrier");

        if let Some(kickoff) = self.kickoff.take() {
            self.set_state(WorkerState::Kickoff);
            debug!(role = %self.role, peer = %kickoff.peer.role(), "WorkerLoop::run: sending first message");
            // Our own receiver is alive, so delivery to ourselves cannot fail
            let _ = Message::new(kickoff.own, Some(kickoff.peer)).send().await;
        }

        self.set_state(WorkerState::Running);
        while !self.is_exhausted() {
            match self.inbox.recv().await {
                Some(msg) => self.handle(msg).await,
                None => {
                    self.set_state(WorkerState::Terminated);
                    return Err(PlayError::ChainBroken {
                        role: self.role,
                        handled: self.rounds(),
                    });
                }
            }
        }

        self.set_state(WorkerState::Terminated);
        let report = self.report();
        info!(
            role = %report.role,
            rounds = report.rounds,
            undelivered = report.undelivered,
            "Worker loop finished"
        );
        Ok(report)
    }

    /// Print, advance the counter, and bounce to the sender's reply target
    async fn handle(&mut self, msg: Message) {
        debug!(role = %self.role, iteration = self.iterations_completed, "WorkerLoop::handle: called");
        debug_assert_eq!(msg.destination.role(), self.role);

        self.sink.print(&format!("{}({})", self.role, self.iterations_completed));
        self.iterations_completed += 1;
        let done = self.is_exhausted();

        let Message { destination, reply_to } = msg;
        let Some(target) = reply_to else {
            debug!(role = %self.role, %done, "WorkerLoop::handle: stop signal, not replying");
            return;
        };

        // Past the budget we hand back no reply target, which ends the chain on the peer's side
        let reply = Message::new(target, if done { None } else { Some(destination) });
        match reply.send().await {
            Delivery::Delivered => {
                debug!(role = %self.role, %done, "WorkerLoop::handle: reply delivered");
            }
            Delivery::PeerGone => {
                debug!(role = %self.role, "WorkerLoop::handle: peer already stopped, reply dropped");
                self.undelivered += 1;
            }
        }
    }
}
