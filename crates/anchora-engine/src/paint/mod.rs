//! Color model shared by the generator and the frame driver.
//!
//! Colors are straight-alpha RGBA with every channel in `[0, 1]`. Out-of-range
//! values are rejected, never clamped.

pub mod color;

pub use color::{validate_color, Color};
