//! Storage layer: one JSON document holding every kid and the settings.
//!
//! The domain services never touch files directly; they go through a
//! [`DatasetHandle`] wrapping a [`DatasetStorage`] implementation, so the
//! whole persistence story can be swapped out in tests.

pub mod handle;
pub mod json;
pub mod traits;

pub use handle::DatasetHandle;
pub use json::JsonStore;
pub use traits::DatasetStorage;
