//! GPU side of the preparation pipeline.
//!
//! Turns validated shader stages into a render pipeline and validated vertex
//! data into device buffers, then records draws into a frame.
//!
//! Convention:
//! - CPU geometry is in logical pixels (bottom-left origin, +Y up).
//! - The vertex shader converts to NDC using the program's viewport uniform.

mod compiler;
mod ctx;
mod program;
mod scope;
pub mod upload;

pub use compiler::{GpuStage, ShaderCompiler};
pub use ctx::{RenderCtx, RenderTarget};
pub use program::{Program, ProgramLinker, ViewportUniform};
pub use upload::{check_buffer_size, GpuMesh, GpuUploader};
