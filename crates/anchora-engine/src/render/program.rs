use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;
use crate::error::{Error, Result};
use crate::geometry::VERTEX_LAYOUT;
use crate::shader::{self, LinkedProgram, VIEWPORT_BINDING, VIEWPORT_GROUP, VIEWPORT_UNIFORM_SIZE};

use super::compiler::GpuStage;
use super::scope::ErrorCapture;
use super::upload::GpuMesh;
use super::{RenderCtx, RenderTarget};

/// Contents of the viewport uniform, matching `Viewport` in `vertex.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ViewportUniform {
    pub size: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

const _: () = assert!(std::mem::size_of::<ViewportUniform>() == VIEWPORT_UNIFORM_SIZE as usize);

impl ViewportUniform {
    pub const SIZE: u64 = VIEWPORT_UNIFORM_SIZE as u64;

    pub fn new(viewport: Viewport) -> Self {
        Self {
            size: viewport.clamped_size(),
            _pad: [0.0; 2],
        }
    }
}

/// Links compiled stages into render pipelines targeting one surface format.
pub struct ProgramLinker<'d> {
    device: &'d wgpu::Device,
    surface_format: wgpu::TextureFormat,
}

impl<'d> ProgramLinker<'d> {
    pub fn new(device: &'d wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            surface_format,
        }
    }

    /// Checks the stage interfaces, then builds the pipeline.
    ///
    /// Interface problems fail with `Link` before any device object is made.
    /// Anything the device rejects afterwards also fails with `Link`, and an
    /// out-of-memory device with `ResourceExhausted`.
    pub fn link(&self, vertex: GpuStage, fragment: GpuStage, name: &str) -> Result<Program> {
        let (vs, vs_module) = vertex.into_parts();
        let (fs, fs_module) = fragment.into_parts();
        let linked = shader::link(vs, fs, name)?;

        let capture = ErrorCapture::begin(self.device);

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("anchora viewport bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: VIEWPORT_BINDING,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(ViewportUniform::SIZE),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(name),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(name),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &vs_module,
                    entry_point: Some(linked.vertex().entry_point()),
                    compilation_options: Default::default(),
                    buffers: &[VERTEX_LAYOUT.buffer_layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &fs_module,
                    entry_point: Some(linked.fragment().entry_point()),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.surface_format,
                        // Vertex colors are straight alpha.
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Generators emit both windings.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        let viewport_ubo = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("anchora viewport ubo"),
            size: ViewportUniform::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("anchora viewport bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: VIEWPORT_BINDING,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        capture.finish(name, |log| Error::Link {
            name: name.to_owned(),
            log,
        })?;

        log::debug!("created pipeline for program `{name}` ({:?})", self.surface_format);

        Ok(Program {
            linked,
            surface_format: self.surface_format,
            pipeline,
            bind_group,
            viewport_ubo,
        })
    }
}

/// A linked program ready to draw: pipeline plus its viewport uniform.
pub struct Program {
    linked: LinkedProgram,
    surface_format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
}

impl Program {
    #[inline]
    pub fn name(&self) -> &str {
        self.linked.name()
    }

    #[inline]
    pub fn linked(&self) -> &LinkedProgram {
        &self.linked
    }

    #[inline]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    #[inline]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn set_viewport(&self, queue: &wgpu::Queue, viewport: Viewport) {
        let u = ViewportUniform::new(viewport);
        queue.write_buffer(&self.viewport_ubo, 0, bytemuck::bytes_of(&u));
    }

    /// Binds the pipeline and viewport uniform on an open pass.
    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(VIEWPORT_GROUP, &self.bind_group, &[]);
    }

    /// Draws `meshes` in order over the current frame contents.
    ///
    /// Fails with `InvalidArgument`, drawing nothing, when the frame's surface
    /// format is not the one the pipeline was built for.
    pub fn render<'m>(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        meshes: impl IntoIterator<Item = &'m GpuMesh>,
    ) -> Result<()> {
        check_target_format(self.name(), self.surface_format, ctx.surface_format)?;

        self.set_viewport(ctx.queue, ctx.viewport);

        let mut rpass = target.begin_pass(self.name());
        self.bind(&mut rpass);
        for mesh in meshes {
            mesh.draw(&mut rpass);
        }
        Ok(())
    }
}

fn check_target_format(
    name: &str,
    program: wgpu::TextureFormat,
    surface: wgpu::TextureFormat,
) -> Result<()> {
    if program != surface {
        return Err(Error::invalid(format!(
            "program `{name}` targets {program:?} but the surface is {surface:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_format_renders() {
        let f = wgpu::TextureFormat::Bgra8UnormSrgb;
        assert!(check_target_format("p", f, f).is_ok());
    }

    #[test]
    fn format_mismatch_is_reported() {
        let err = check_target_format(
            "p",
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8Unorm,
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("Rgba8Unorm"));
    }

    #[test]
    fn uniform_is_sixteen_bytes() {
        assert_eq!(ViewportUniform::SIZE, 16);
    }

    #[test]
    fn uniform_never_divides_by_zero() {
        let u = ViewportUniform::new(Viewport::new(0.0, 600.0));
        assert_eq!(u.size, [1.0, 600.0]);
    }

    #[test]
    fn uniform_matches_shader_declaration() {
        let vs = shader::compile(shader::StageKind::Vertex, shader::VERTEX_WGSL, "vertex").unwrap();
        let module = vs.module();
        let (_, var) = module
            .global_variables
            .iter()
            .find(|(_, v)| v.binding.is_some())
            .unwrap();
        let mut layouter = naga::proc::Layouter::default();
        layouter.update(module.to_ctx()).unwrap();
        assert_eq!(layouter[var.ty].size as u64, ViewportUniform::SIZE);
    }
}
