//! # CLI Layer
//!
//! The only place that knows about stdout, exit codes and the real cluster binaries.
//!
//! ## Pass Sequence
//!
//! `run`, `reconcile` and `sweep` share one preamble:
//!
//! 1. Load and validate the configuration (exit 1 on failure)
//! 2. Install the tracing subscriber
//! 3. Build the volume set, adding per-user volumes when enabled
//! 4. Take the PID lock (exit 1 if another pass holds it)
//! 5. Ask the CLDB whether this node is the master (exit 0 if not)
//!
//! Once a pass starts it always completes: per-instance failures are reported in the
//! summary, not through the exit code.
//!
//! `plan` and `check-config` stop after step 3 and never contact the cluster.
//!
//! ## Structure
//!
//! - `setup`: clap definitions
//! - `commands`: dispatch and handlers
//! - `render`: colored output

mod commands;
mod render;
pub mod setup;

pub use commands::run;
