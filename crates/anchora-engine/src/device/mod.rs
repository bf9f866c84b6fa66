//! GPU device + surface management.
//!
//! Creates the wgpu device for a window, keeps the surface configured across
//! resizes and hands out one frame (surface texture + encoder) at a time.

mod frame;
mod gpu;
mod init;
mod surface;

pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
