//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format emitted by the chunk mesher and the
//! matching `wgpu` buffer layout.

use cgmath::Point3;

/// A vertex in the voxel rendering pipeline.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Color: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 32 bytes
///
/// Two vertices are equal when all three attribute arrays are exactly equal.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in chunk-local space
    pub position: [f32; 3],
    /// RGB color
    pub color: [f32; 3],
    /// UV texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Flat white, the color every chunk vertex is emitted with.
    pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

    /// Creates a white vertex with a zero texture coordinate.
    pub fn new(position: Point3<f32>) -> Self {
        Vertex {
            position: position.into(),
            color: Self::WHITE,
            tex_coord: [0.0, 0.0],
        }
    }

    /// Bit patterns of every attribute, used as an exact-equality hash key.
    pub(crate) fn bit_key(&self) -> [u32; 8] {
        let [px, py, pz] = self.position;
        let [r, g, b] = self.color;
        let [u, v] = self.tex_coord;
        [px, py, pz, r, g, b, u, v].map(f32::to_bits)
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: color (vec3<f32>)
    /// - `location = 2`: tex_coord (vec2<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}
