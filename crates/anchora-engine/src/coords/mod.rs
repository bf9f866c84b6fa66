//! Coordinate types shared by the geometry generator and the renderer.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin bottom-left
//! - +X right, +Y up
//!
//! The bundled vertex shader maps this space to NDC through a viewport uniform.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
