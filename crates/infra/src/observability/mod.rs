//! Observability infrastructure
//!
//! Process-wide `tracing` subscriber setup. Recovery spans and events are
//! emitted by `recipebox_common::recovery`; this module only decides where
//! they go and in which format.

pub mod logging;

pub use logging::{build_filter, init_logging};
