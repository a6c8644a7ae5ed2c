//! GPU upload of chunk meshes.
//!
//! [`WgpuMeshBuilder`] generates a chunk's [`Mesh`] and uploads it into a pair
//! of immutable vertex and index buffers. Buffer creation runs inside `wgpu`
//! error scopes so an out-of-memory or validation failure comes back as an
//! [`EngineError::BufferCreation`] instead of an uncaptured device error.

use wgpu::util::DeviceExt;

use crate::engine_state::{error::EngineError, voxels::chunk::Chunk};

use super::{Mesh, MeshBuilder};

/// Label of every chunk vertex buffer
pub const CHUNK_VERTEX_BUFFER: &str = "Chunk Vertex Buffer";
/// Label of every chunk index buffer
pub const CHUNK_INDEX_BUFFER: &str = "Chunk Index Buffer";

/// A chunk mesh resident in GPU memory.
///
/// An empty mesh holds no buffers and draws nothing.
#[derive(Debug)]
pub struct GpuMesh {
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
    index_count: u32,
}

impl GpuMesh {
    /// Number of uploaded vertices.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of uploaded indices.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.vertex_buffer.is_none()
    }

    /// Binds the buffers and records the draw call.
    ///
    /// Indexed when an index buffer exists, otherwise a plain vertex draw.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        let Some(vertex_buffer) = &self.vertex_buffer else {
            return;
        };
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));

        match &self.index_buffer {
            Some(index_buffer) => {
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
            None => render_pass.draw(0..self.vertex_count, 0..1),
        }
    }
}

/// Builds chunk meshes straight into GPU buffers.
#[derive(Debug, Clone)]
pub struct WgpuMeshBuilder {
    device: wgpu::Device,
}

impl WgpuMeshBuilder {
    /// Creates a builder allocating on `device`.
    pub fn new(device: wgpu::Device) -> Self {
        WgpuMeshBuilder { device }
    }

    /// Uploads an already generated mesh.
    ///
    /// # Errors
    /// Returns [`EngineError::BufferCreation`] if the device rejects either buffer.
    pub fn upload(&self, mesh: &Mesh) -> Result<GpuMesh, EngineError> {
        if mesh.is_empty() {
            return Ok(GpuMesh {
                vertex_buffer: None,
                index_buffer: None,
                vertex_count: 0,
                index_count: 0,
            });
        }

        let vertex_buffer = self.create_buffer_init(
            CHUNK_VERTEX_BUFFER,
            bytemuck::cast_slice(&mesh.vertices),
            wgpu::BufferUsages::VERTEX,
        )?;
        let index_buffer = if mesh.indices.is_empty() {
            None
        } else {
            Some(self.create_buffer_init(
                CHUNK_INDEX_BUFFER,
                bytemuck::cast_slice(&mesh.indices),
                wgpu::BufferUsages::INDEX,
            )?)
        };

        Ok(GpuMesh {
            vertex_buffer: Some(vertex_buffer),
            index_buffer,
            vertex_count: mesh.vertex_count() as u32,
            index_count: mesh.index_count() as u32,
        })
    }

    fn create_buffer_init(
        &self,
        label: &str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> Result<wgpu::Buffer, EngineError> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            });

        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());

        match out_of_memory.or(validation) {
            Some(error) => {
                log::error!("Failed to create {label} ({} bytes): {error}", contents.len());
                Err(EngineError::BufferCreation {
                    label: label.to_string(),
                    reason: error.to_string(),
                })
            }
            None => Ok(buffer),
        }
    }
}

impl MeshBuilder for WgpuMeshBuilder {
    type Mesh = GpuMesh;

    fn build_mesh(&mut self, chunk: &Chunk) -> Result<GpuMesh, EngineError> {
        self.upload(&Mesh::generate(chunk))
    }
}
