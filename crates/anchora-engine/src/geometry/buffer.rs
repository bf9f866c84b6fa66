//! Vertex/index storage and the upload validation gate.

use crate::error::{Error, Result};
use crate::paint::color::channel_in_range;

use super::layout::{Vertex, FLOATS_PER_VERTEX, VERTEX_LAYOUT};

/// Checks a flat interleaved array before it may cross into GPU memory.
///
/// - length must be non-zero and a multiple of the record stride
/// - every color channel must lie in `[0, 1]`
pub fn validate_vertex_array(floats: &[f32]) -> Result<()> {
    if floats.is_empty() {
        return Err(Error::malformed("vertex array is empty"));
    }
    if floats.len() % FLOATS_PER_VERTEX != 0 {
        return Err(Error::malformed(format!(
            "length {} is not a multiple of {FLOATS_PER_VERTEX}",
            floats.len()
        )));
    }

    let color = VERTEX_LAYOUT.color.range();
    for (vertex, record) in floats.chunks_exact(FLOATS_PER_VERTEX).enumerate() {
        for (channel, &value) in record[color.clone()].iter().enumerate() {
            if !channel_in_range(value) {
                return Err(Error::VertexColorRange { vertex, channel, value });
            }
        }
    }

    Ok(())
}

/// Ordered vertex records produced by one generator call.
///
/// The flat float view and the byte view are casts of the same storage, so
/// what the generator wrote is exactly what gets uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    vertices: Vec<Vertex>,
}

impl VertexBuffer {
    /// Wraps vertices whose colors the caller has already validated.
    pub(crate) fn from_validated(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    /// Builds a buffer from records, running the validation gate.
    pub fn new(vertices: Vec<Vertex>) -> Result<Self> {
        let buffer = Self { vertices };
        buffer.validate()?;
        Ok(buffer)
    }

    /// Builds a buffer from a flat `N * 7` float array, running the validation gate.
    pub fn from_floats(floats: &[f32]) -> Result<Self> {
        validate_vertex_array(floats)?;
        let vertices: &[Vertex] = bytemuck::try_cast_slice(floats)
            .map_err(|e| Error::malformed(format!("cannot view floats as vertices: {e}")))?;
        Ok(Self { vertices: vertices.to_vec() })
    }

    pub fn validate(&self) -> Result<()> {
        validate_vertex_array(self.as_floats())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.vertices.iter().map(|v| v.position)
    }
}

/// Indices into a [`VertexBuffer`], drawn as a triangle list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBuffer {
    indices: Vec<u32>,
}

/// Two triangles covering a four-corner outline.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

impl IndexBuffer {
    pub fn new(indices: Vec<u32>) -> Self {
        Self { indices }
    }

    /// Indices for a rectangle or line quad.
    pub fn quad() -> Self {
        Self::new(QUAD_INDICES.to_vec())
    }

    /// Triangle fan over a convex outline of `vertex_count` points,
    /// `(0, i, i + 1)` for each inner edge.
    pub fn triangle_fan(vertex_count: usize) -> Result<Self> {
        if vertex_count < 3 {
            return Err(Error::invalid(format!(
                "a fan needs at least 3 vertices, got {vertex_count}"
            )));
        }
        let last = u32::try_from(vertex_count - 1)
            .map_err(|_| Error::invalid(format!("{vertex_count} vertices exceed u32 indexing")))?;

        let indices = (1..last).flat_map(|i| [0, i, i + 1]).collect();
        Ok(Self::new(indices))
    }

    /// Every index must address an existing vertex.
    pub fn validate_against(&self, vertex_count: usize) -> Result<()> {
        if self.indices.is_empty() {
            return Err(Error::malformed("index array is empty"));
        }
        if self.indices.len() % 3 != 0 {
            return Err(Error::malformed(format!(
                "index count {} is not a whole number of triangles",
                self.indices.len()
            )));
        }
        if let Some((at, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= vertex_count)
        {
            return Err(Error::malformed(format!(
                "index {index} at position {at} is out of bounds for {vertex_count} vertices"
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Vertices plus optional indices, checked against each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: VertexBuffer,
    indices: Option<IndexBuffer>,
}

impl Mesh {
    pub fn new(vertices: VertexBuffer, indices: Option<IndexBuffer>) -> Result<Self> {
        vertices.validate()?;
        if let Some(indices) = &indices {
            indices.validate_against(vertices.len())?;
        }
        Ok(Self { vertices, indices })
    }

    /// Non-indexed triangle list.
    pub fn triangles(vertices: VertexBuffer) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(Error::malformed(format!(
                "{} vertices are not a whole number of triangles",
                vertices.len()
            )));
        }
        Self::new(vertices, None)
    }

    /// Four-corner outline (rectangle, line) drawn as two triangles.
    pub fn quad(vertices: VertexBuffer) -> Result<Self> {
        Self::new(vertices, Some(IndexBuffer::quad()))
    }

    /// Convex outline (polygon, circle, hexagon) drawn as a fan.
    pub fn fan(vertices: VertexBuffer) -> Result<Self> {
        let indices = IndexBuffer::triangle_fan(vertices.len())?;
        Self::new(vertices, Some(indices))
    }

    #[inline]
    pub fn vertices(&self) -> &VertexBuffer {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> Option<&IndexBuffer> {
        self.indices.as_ref()
    }
}
