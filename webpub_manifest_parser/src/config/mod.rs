//! Configuration for the manifest parser
//!
//! Security limits are compile-time constants; everything a caller may tune
//! lives in [`runtime::RuntimeConfig`], loadable from environment variables or TOML.

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
pub use runtime::{ConfigError, RuntimeConfig};
