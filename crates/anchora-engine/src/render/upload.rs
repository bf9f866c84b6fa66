//! Validated upload of vertex/index data into device buffers.

use wgpu::util::DeviceExt;

use crate::error::{require_text, Error, Result};
use crate::geometry::{IndexBuffer, Mesh, VertexBuffer};

use super::scope::ErrorCapture;

/// Checks a buffer of `bytes` against the device's `max_buffer_size`.
///
/// Returns the size as the `u64` wgpu expects.
pub fn check_buffer_size(name: &str, bytes: usize, max_buffer_size: u64) -> Result<u64> {
    let size = u64::try_from(bytes).map_err(|_| Error::ResourceExhausted {
        name: name.to_owned(),
        detail: format!("{bytes} bytes do not fit a device buffer size"),
    })?;
    if size > max_buffer_size {
        return Err(Error::ResourceExhausted {
            name: name.to_owned(),
            detail: format!("{size} bytes exceed the device buffer limit of {max_buffer_size}"),
        });
    }
    Ok(size)
}

fn draw_count(name: &str, what: &str, count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| Error::ResourceExhausted {
        name: name.to_owned(),
        detail: format!("{count} {what} exceed a single draw"),
    })
}

/// Every check an upload makes before touching the device: the vertex gate,
/// index bounds, buffer sizes against `max_buffer_size` and draw counts.
///
/// Returns the vertex count and, when indexed, the index count.
pub fn prepare(
    label: &str,
    vertices: &VertexBuffer,
    indices: Option<&IndexBuffer>,
    max_buffer_size: u64,
) -> Result<(u32, Option<u32>)> {
    vertices.validate()?;
    if let Some(indices) = indices {
        indices.validate_against(vertices.len())?;
    }

    check_buffer_size(label, vertices.as_bytes().len(), max_buffer_size)?;
    let vertex_count = draw_count(label, "vertices", vertices.len())?;

    let index_count = match indices {
        Some(ib) => {
            check_buffer_size(label, ib.as_bytes().len(), max_buffer_size)?;
            Some(draw_count(label, "indices", ib.len())?)
        }
        None => None,
    };

    Ok((vertex_count, index_count))
}

/// Creates vertex and index buffers from data that passes the validation gate.
pub struct GpuUploader<'d> {
    device: &'d wgpu::Device,
    max_buffer_size: u64,
}

impl<'d> GpuUploader<'d> {
    pub fn new(device: &'d wgpu::Device) -> Self {
        Self {
            device,
            max_buffer_size: device.limits().max_buffer_size,
        }
    }

    /// Uploads `vertices` (and `indices`, drawn as a triangle list).
    ///
    /// The gate runs on the exact bytes handed to the device. Nothing is
    /// created unless every check passes.
    pub fn upload(
        &self,
        label: &str,
        vertices: &VertexBuffer,
        indices: Option<&IndexBuffer>,
    ) -> Result<GpuMesh> {
        require_text("buffer label", label)?;
        let (vertex_count, index_count) = prepare(label, vertices, indices, self.max_buffer_size)?;

        let capture = ErrorCapture::begin(self.device);

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: vertices.as_bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = match (indices, index_count) {
            (Some(ib), Some(count)) => Some((
                self.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(label),
                        contents: ib.as_bytes(),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                count,
            )),
            _ => None,
        };

        capture.finish(label, |detail| Error::ResourceExhausted {
            name: label.to_owned(),
            detail,
        })?;

        log::debug!(
            "uploaded `{label}`: {vertex_count} vertices ({} bytes), {} indices",
            vertices.as_bytes().len(),
            index_count.unwrap_or(0)
        );

        Ok(GpuMesh {
            label: label.to_owned(),
            vertex_buffer,
            vertex_count,
            index_buffer,
        })
    }

    pub fn upload_mesh(&self, label: &str, mesh: &Mesh) -> Result<GpuMesh> {
        self.upload(label, mesh.vertices(), mesh.indices())
    }
}

/// Device-resident geometry ready to draw with a [`Program`](super::Program).
pub struct GpuMesh {
    label: String,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    index_buffer: Option<(wgpu::Buffer, u32)>,
}

impl GpuMesh {
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub fn index_count(&self) -> Option<u32> {
        self.index_buffer.as_ref().map(|(_, n)| *n)
    }

    /// Records the draw on a pass whose pipeline is already bound.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some((ibo, count)) => {
                rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..*count, 0, 0..1);
            }
            None => rpass.draw(0..self.vertex_count, 0..1),
        }
    }
}
