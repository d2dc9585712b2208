//! Update pipeline: command routing, channel ingest and reply dispatch.
//!
//! The gateway parses each webhook body and calls [`process_update`] once per
//! update; everything below that call is channel-agnostic apart from the
//! [`Transport`](reelbot_telegram::Transport) it sends through.

pub mod context;
pub mod dispatch;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod process;
pub mod router;

pub use context::PipelineContext;
pub use dispatch::Reply;
pub use error::PipelineError;
pub use metrics::{MetricsSnapshot, PipelineMetrics};
pub use process::{process_update, UpdateOutcome};
pub use router::Command;
