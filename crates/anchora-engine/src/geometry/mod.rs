//! Procedural vertex data under the canonical position + color layout.

pub mod buffer;
pub mod layout;
pub mod shapes;

pub use buffer::{validate_vertex_array, IndexBuffer, Mesh, VertexBuffer, QUAD_INDICES};
pub use layout::{Attribute, Vertex, VertexLayout, FLOATS_PER_VERTEX, VERTEX_LAYOUT};
pub use shapes::{Generator, PositionRounding, CIRCLE_SEGMENTS, HEXAGON_SIDES, MAX_VERTICES};
