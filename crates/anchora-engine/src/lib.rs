//! Anchora engine crate.
//!
//! Procedural vertex generation, shader compile/link checks and validated GPU
//! upload, plus the window and frame loop that draws the result.

pub mod error;
pub mod geometry;
pub mod shader;

pub mod device;
pub mod window;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;

pub use error::{Error, ErrorKind, Result};
