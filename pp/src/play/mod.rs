//! Ping/pong play between two worker loops
//!
//! Two worker loops (PING and PONG) take turns printing a round counter.
//! Control passes back and forth through one message at a time:
//! - **Barrier:** both loops arrive before PING sends the first message
//! - **Handoff:** each handled message is bounced to the sender's reply target
//! - **Stop:** a loop past its budget replies without a reply target, ending the chain

mod barrier;
mod config;
mod core;
mod error;
mod messages;
mod worker;

pub use barrier::{BarrierParty, StartupBarrier};
pub use config::PlayConfig;
pub use core::{Coordinator, DONE_BANNER, READY_BANNER};
pub use error::PlayError;
pub use messages::{Delivery, Mailbox, Message, Role, mailbox};
pub use worker::{WorkerLoop, WorkerReport, WorkerState};
