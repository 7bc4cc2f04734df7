//! Small shared helpers that do not belong to a specific subsystem.

pub mod serde;
