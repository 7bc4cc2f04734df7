//! # RecipeBox Domain
//!
//! Domain types shared by every RecipeBox crate.
//!
//! This crate contains:
//! - The application error type and its `Result` alias
//! - Configuration structures (recovery settings, logging)
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other RecipeBox crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
