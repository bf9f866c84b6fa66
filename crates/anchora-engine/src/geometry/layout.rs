//! Canonical per-vertex layout.
//!
//! `VERTEX_LAYOUT` is the single description of the interleaved record. The
//! [`Vertex`] struct, the validation gate, the shader linker and the wgpu
//! `VertexBufferLayout` all read from it.

use bytemuck::{Pod, Zeroable};

const FLOAT_BYTES: usize = std::mem::size_of::<f32>();

/// One attribute of the interleaved record, measured in floats.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Attribute {
    /// Shader input location.
    pub slot: u32,
    /// Number of `f32` components.
    pub components: usize,
    /// Offset from the start of the record, in floats.
    pub offset: usize,
}

impl Attribute {
    #[inline]
    pub const fn byte_offset(self) -> u64 {
        (self.offset * FLOAT_BYTES) as u64
    }

    /// Float range of this attribute inside one record.
    #[inline]
    pub const fn range(self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.components
    }

    pub const fn format(self) -> wgpu::VertexFormat {
        match self.components {
            1 => wgpu::VertexFormat::Float32,
            2 => wgpu::VertexFormat::Float32x2,
            3 => wgpu::VertexFormat::Float32x3,
            _ => wgpu::VertexFormat::Float32x4,
        }
    }

    pub const fn to_wgpu(self) -> wgpu::VertexAttribute {
        wgpu::VertexAttribute {
            format: self.format(),
            offset: self.byte_offset(),
            shader_location: self.slot,
        }
    }
}

/// Position + color record description.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexLayout {
    pub position: Attribute,
    pub color: Attribute,
    /// Record length in floats.
    pub stride: usize,
}

impl VertexLayout {
    #[inline]
    pub const fn attributes(&self) -> [Attribute; 2] {
        [self.position, self.color]
    }

    #[inline]
    pub const fn stride_bytes(&self) -> u64 {
        (self.stride * FLOAT_BYTES) as u64
    }

    /// Attribute bound at shader location `slot`, if any.
    pub fn attribute(&self, slot: u32) -> Option<Attribute> {
        self.attributes().into_iter().find(|a| a.slot == slot)
    }

    /// wgpu description of a vertex buffer holding these records.
    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride_bytes(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &WGPU_ATTRIBUTES,
        }
    }
}

/// slot 0 = position (3 floats, offset 0), slot 1 = color (4 floats, offset 3).
pub const VERTEX_LAYOUT: VertexLayout = VertexLayout {
    position: Attribute { slot: 0, components: 3, offset: 0 },
    color: Attribute { slot: 1, components: 4, offset: 3 },
    stride: 7,
};

pub const FLOATS_PER_VERTEX: usize = VERTEX_LAYOUT.stride;

static WGPU_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    [VERTEX_LAYOUT.position.to_wgpu(), VERTEX_LAYOUT.color.to_wgpu()];

/// One interleaved record: position then color.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    #[inline]
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}
