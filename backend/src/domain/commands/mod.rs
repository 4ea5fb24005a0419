//! Command and result types for the domain services.

pub mod child;
pub mod entry;
pub mod settings;
