//! pingpong - two worker loops taking turns over async channels
//!
//! A PING loop and a PONG loop alternately print a round counter, passing
//! control back and forth through a single in-flight message. Both loops
//! rendezvous at a startup barrier, run for a shared round budget, and stop
//! on their own without any broadcast.
//!
//! # Modules
//!
//! - [`play`] - Worker loops, messages, startup barrier and the Coordinator
//! - [`sink`] - Output sinks the play writes lines to
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pingpong::{Coordinator, MemorySink, PlayConfig};
//!
//! let sink = MemorySink::new();
//! Coordinator::new(PlayConfig::with_max_iterations(3)).run_blocking(Arc::new(sink.clone()))?;
//! assert_eq!(sink.lines()[1], "PING(1)");
//! # Ok::<(), eyre::Report>(())
//! ```

pub mod cli;
pub mod config;
pub mod play;
pub mod sink;

// Re-export commonly used types
pub use config::{Config, OutputConfig};
pub use play::{Coordinator, DONE_BANNER, PlayConfig, PlayError, READY_BANNER, Role, WorkerLoop, WorkerReport};
pub use sink::{ConsoleSink, MemorySink, OutputSink, SinkKind, TracingSink};
