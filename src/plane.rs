//! The single textured plane the slider draws, and the orthographic camera
//! that frames it.
//!
//! The plane spans the full surface in logical pixels, centered on the
//! origin. The camera sits one unit in front of it looking down -Z, so the
//! plane always fills the viewport exactly.
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | uv        | Float32x2 | 12     | 1               |

use glam::{Mat4, Vec3};

use crate::gpu::GpuContext;

/// A vertex of the slider plane: position and texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaneVertex {
    pub position: [f32; 3],
    /// Texture coordinates, (0, 0) at the top-left corner.
    pub uv: [f32; 2],
}

impl PlaneVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PlaneVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }
}

/// Vertices and indices of a `width`×`height` plane in the XY plane.
pub fn plane_geometry(width: f32, height: f32) -> ([PlaneVertex; 4], [u16; 6]) {
    let hw = width * 0.5;
    let hh = height * 0.5;
    let vertices = [
        PlaneVertex::new([-hw, hh, 0.0], [0.0, 0.0]),
        PlaneVertex::new([hw, hh, 0.0], [1.0, 0.0]),
        PlaneVertex::new([hw, -hh, 0.0], [1.0, 1.0]),
        PlaneVertex::new([-hw, -hh, 0.0], [0.0, 1.0]),
    ];
    // Counter-clockwise when viewed from +Z.
    let indices = [0, 2, 1, 0, 3, 2];
    (vertices, indices)
}

/// Orthographic view-projection for a surface of `width`×`height` logical
/// pixels, camera at z = 1. The near plane sits in front of the plane so it
/// never clips at depth 0.
pub fn view_projection(width: f32, height: f32) -> Mat4 {
    let hw = width * 0.5;
    let hh = height * 0.5;
    let projection = Mat4::orthographic_rh(-hw, hw, -hh, hh, 0.1, 1000.0);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, Vec3::Y);
    projection * view
}

/// GPU buffers for the plane.
pub struct PlaneMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl PlaneMesh {
    pub fn new(gpu: &GpuContext, width: f32, height: f32) -> Self {
        use wgpu::util::DeviceExt;

        let (vertices, indices) = plane_geometry(width, height);

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Plane Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Plane Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Rewrite the vertices for a new surface size.
    pub fn resize(&self, gpu: &GpuContext, width: f32, height: f32) {
        let (vertices, _) = plane_geometry(width, height);
        gpu.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<PlaneVertex>(), 20);
        assert_eq!(PlaneVertex::LAYOUT.array_stride, 20);
    }

    #[test]
    fn plane_corners_land_on_clip_space_corners() {
        let (vertices, _) = plane_geometry(800.0, 600.0);
        let vp = view_projection(800.0, 600.0);

        let expected = [(-1.0, 1.0), (1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)];
        for (vertex, (x, y)) in vertices.iter().zip(expected) {
            let clip = vp * Vec4::new(vertex.position[0], vertex.position[1], 0.0, 1.0);
            assert!((clip.x / clip.w - x).abs() < 1e-5, "{vertex:?} -> {clip:?}");
            assert!((clip.y / clip.w - y).abs() < 1e-5, "{vertex:?} -> {clip:?}");
            let depth = clip.z / clip.w;
            assert!((0.0..=1.0).contains(&depth), "depth {depth}");
        }
    }

    #[test]
    fn top_left_corner_samples_texture_origin() {
        let (vertices, _) = plane_geometry(2.0, 2.0);
        assert_eq!(vertices[0].position, [-1.0, 1.0, 0.0]);
        assert_eq!(vertices[0].uv, [0.0, 0.0]);
    }
}
