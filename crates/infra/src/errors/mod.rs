//! Error conversions between collaborators and the domain error type.

pub mod conversions;

pub use conversions::InfraError;
