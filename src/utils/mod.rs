//! Utilities
pub mod save;

pub use save::{SaveLoad, SerdeSaveLoadError};
