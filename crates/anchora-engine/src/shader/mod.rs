//! Shader compilation and program linking.
//!
//! Both steps run on the CPU through naga, so failures surface synchronously
//! with the full diagnostic log before any GPU object exists. The GPU-side
//! counterparts live in `render`.

mod interface;
pub mod loader;
pub mod program;
pub mod stage;

pub use interface::{IoType, ResourceUse, StageInterface};
pub use loader::{load_stage, load_stage_as};
pub use program::{
    link, link_with_layout, LinkedProgram, VIEWPORT_BINDING, VIEWPORT_GROUP, VIEWPORT_UNIFORM_SIZE,
};
pub use stage::{compile, compile_with, ShaderLanguage, ShaderStage, StageKind};

/// Bundled vertex stage: logical pixels to clip space, color passed through.
pub const VERTEX_WGSL: &str = include_str!("shaders/vertex.wgsl");

/// Bundled fragment stage: writes the interpolated vertex color.
pub const FRAGMENT_WGSL: &str = include_str!("shaders/fragment.wgsl");
