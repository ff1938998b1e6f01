//! Coordinator - builds, starts and joins the two worker loops

use std::sync::Arc;

use eyre::{Context, Result};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info};

use crate::sink::OutputSink;

use super::barrier::StartupBarrier;
use super::config::PlayConfig;
use super::error::PlayError;
use super::messages::{Role, mailbox};
use super::worker::{WorkerLoop, WorkerReport};

/// Line printed before the workers start
pub const READY_BANNER: &str = "Ready...Set...Go!";

/// Line printed after both workers have stopped
pub const DONE_BANNER: &str = "Done!";

/// Spawned worker that is aborted if the coordinator stops waiting for it
struct WorkerTask {
    role: Role,
    handle: JoinHandle<Result<WorkerReport, PlayError>>,
}

impl WorkerTask {
    fn spawn(worker: WorkerLoop) -> Self {
        let role = worker.role();
        Self {
            role,
            handle: tokio::spawn(worker.run()),
        }
    }
}

impl Drop for WorkerTask {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!(role = %self.role, "WorkerTask::drop: aborting worker");
            self.handle.abort();
        }
    }
}

/// Runs one ping/pong exchange
///
/// The Coordinator owns the wiring: it creates both inbound queues and the
/// startup barrier and hands each worker exactly the handles it needs. Output
/// goes through the supplied sink, bracketed by [`READY_BANNER`] and
/// [`DONE_BANNER`]. A failed run returns an error and never prints the done
/// banner.
pub struct Coordinator {
    config: PlayConfig,
}

impl Coordinator {
    /// Create a new Coordinator with the given configuration
    pub fn new(config: PlayConfig) -> Self {
        debug!(?config, "Coordinator::new: called");
        Self { config }
    }

    pub fn config(&self) -> &PlayConfig {
        &self.config
    }

    /// Play `max_iterations` rounds on each side and wait for both loops to stop
    ///
    /// Dropping the returned future aborts both worker loops, so nothing more
    /// reaches the sink once the caller stops waiting.
    pub async fn run(&self, sink: Arc<dyn OutputSink>) -> Result<()> {
        debug!(max_iterations = self.config.max_iterations, "Coordinator::run: called");
        self.config.validate()?;
        let budget = self.config.max_iterations;
        self.play(sink, budget, budget).await
    }

    /// Blocking wrapper around [`Coordinator::run`] for callers without a runtime
    ///
    /// Fails without printing anything when called from inside a tokio runtime.
    pub fn run_blocking(&self, sink: Arc<dyn OutputSink>) -> Result<()> {
        debug!("Coordinator::run_blocking: called");
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(eyre::eyre!(
                "run_blocking called from inside a tokio runtime; await Coordinator::run instead"
            ));
        }
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .context("Failed to build tokio runtime")?;
        runtime.block_on(self.run(sink))
    }

    async fn play(&self, sink: Arc<dyn OutputSink>, ping_budget: u32, pong_budget: u32) -> Result<()> {
        sink.print(READY_BANNER);

        let capacity = self.config.mailbox_capacity;
        let (ping_mailbox, ping_inbox) = mailbox(Role::Ping, capacity);
        let (pong_mailbox, pong_inbox) = mailbox(Role::Pong, capacity);
        let barrier = StartupBarrier::new(2);

        let ping = WorkerLoop::ping(
            ping_budget,
            ping_inbox,
            ping_mailbox,
            pong_mailbox,
            barrier.party(Role::Ping),
            sink.clone(),
        );
        let pong = WorkerLoop::pong(pong_budget, pong_inbox, barrier.party(Role::Pong), sink.clone());

        info!(ping_budget, pong_budget, "Starting worker loops");
        let mut ping_task = WorkerTask::spawn(ping);
        let mut pong_task = WorkerTask::spawn(pong);

        let (ping_result, pong_result) = tokio::join!(&mut ping_task.handle, &mut pong_task.handle);
        let ping_report = joined(Role::Ping, ping_result).context("PING worker failed")?;
        let pong_report = joined(Role::Pong, pong_result).context("PONG worker failed")?;

        info!(
            ping_rounds = ping_report.rounds,
            pong_rounds = pong_report.rounds,
            undelivered = ping_report.undelivered + pong_report.undelivered,
            "Both worker loops stopped"
        );
        sink.print(DONE_BANNER);
        Ok(())
    }
}

/// Flatten a worker's join result into its report
fn joined(role: Role, result: Result<Result<WorkerReport, PlayError>, JoinError>) -> Result<WorkerReport, PlayError> {
    match result {
        Ok(report) => report,
        Err(e) if e.is_panic() => Err(PlayError::WorkerPanicked { role }),
        Err(_) => Err(PlayError::WorkerCancelled { role }),
    }
}
