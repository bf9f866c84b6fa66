/// One acquired surface texture plus the encoder recording into it.
///
/// Submit it promptly through [`Gpu::submit`](super::Gpu::submit); the next
/// texture cannot be acquired while this one is held.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
