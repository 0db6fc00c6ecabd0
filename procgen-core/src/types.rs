use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Identifier for a node in a [`crate::tree::TreeSkeleton`].
///
/// This is an index into `TreeSkeleton::nodes`, and is only meaningful within
/// the lifetime of a given skeleton instance.
pub type NodeId = usize;

/// Index type shared by every index buffer this crate produces.
pub type Index = u16;

/// Byte offset of [`Vertex::position`] inside the vertex record.
pub const VERTEX_POSITION_OFFSET: usize = 0;
/// Byte offset of [`Vertex::normal`] inside the vertex record.
pub const VERTEX_NORMAL_OFFSET: usize = 12;
/// Byte offset of [`Vertex::uv`] inside the vertex record.
pub const VERTEX_UV_OFFSET: usize = 24;
/// Size in bytes of one [`Vertex`].
pub const VERTEX_STRIDE: usize = 32;

/// A terrain vertex as handed to the rendering layer.
///
/// The layout is a contract with whatever uploads the buffer: three `f32`
/// position components, three `f32` normal components, then two `f32`
/// texture coordinates, tightly packed with a stride of [`VERTEX_STRIDE`]
/// bytes. Use [`bytemuck::cast_slice`] to view a `&[Vertex]` as raw bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// A vertex buffer plus the `u16` index buffer that draws it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<Index>,
}

impl<V> MeshBuffers<V> {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }
}
