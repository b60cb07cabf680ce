//! Document loading: file and stream input, size limits and text decoding

mod error;
mod loader;

pub use error::DocumentError;
pub use loader::{DocumentLoader, LoadedDocument};
