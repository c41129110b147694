//! GPU vertex and instance data for sprite drawing.
//!
//! All types derive `bytemuck::Pod` + `Zeroable` for zero-copy upload
//! to GPU buffers.

use bytemuck::{Pod, Zeroable};
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

// ───────────────────────────────────────────────────────────────────
// Vertex (unit quad)
// ───────────────────────────────────────────────────────────────────

/// A corner of the unit quad (0,0)→(1,1), shared by every sprite draw.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    pub const VERTICES: [QuadVertex; 4] = [
        QuadVertex { position: [0.0, 0.0] }, // top-left
        QuadVertex { position: [1.0, 0.0] }, // top-right
        QuadVertex { position: [0.0, 1.0] }, // bottom-left
        QuadVertex { position: [1.0, 1.0] }, // bottom-right
    ];

    /// Two counter-clockwise triangles.
    pub const INDICES: [u16; 6] = [0, 2, 1, 1, 2, 3];

    pub fn layout() -> VertexBufferLayout<'static> {
        static ATTRS: &[VertexAttribute] = &[
            // location(0) = position
            VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: VertexFormat::Float32x2,
            },
        ];
        VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: ATTRS,
        }
    }
}

// ───────────────────────────────────────────────────────────────────
// Instance data
// ───────────────────────────────────────────────────────────────────

/// One textured rectangle: where it lands on the target, which part of
/// the source texture it samples, and a tint multiplied into the texels.
///
/// 48 bytes per instance.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left corner on the target, in pixels.
    pub origin: [f32; 2],
    /// Width and height on the target, in pixels.
    pub size: [f32; 2],
    /// Source UV top-left.
    pub uv_min: [f32; 2],
    /// Source UV bottom-right.
    pub uv_max: [f32; 2],
    /// RGBA tint, each channel in [0.0, 1.0].
    pub color: [f32; 4],
}

impl SpriteInstance {
    /// An untinted sprite covering the whole source.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: [x, y],
            size: [w, h],
            uv_min: [0.0, 0.0],
            uv_max: [1.0, 1.0],
            color: [1.0; 4],
        }
    }

    pub fn with_uv(mut self, uv_min: [f32; 2], uv_max: [f32; 2]) -> Self {
        self.uv_min = uv_min;
        self.uv_max = uv_max;
        self
    }

    pub fn layout() -> VertexBufferLayout<'static> {
        static ATTRS: &[VertexAttribute] = &[
            // location(1) = origin
            VertexAttribute {
                offset: 0,
                shader_location: 1,
                format: VertexFormat::Float32x2,
            },
            // location(2) = size
            VertexAttribute {
                offset: 8,
                shader_location: 2,
                format: VertexFormat::Float32x2,
            },
            // location(3) = uv_min
            VertexAttribute {
                offset: 16,
                shader_location: 3,
                format: VertexFormat::Float32x2,
            },
            // location(4) = uv_max
            VertexAttribute {
                offset: 24,
                shader_location: 4,
                format: VertexFormat::Float32x2,
            },
            // location(5) = color
            VertexAttribute {
                offset: 32,
                shader_location: 5,
                format: VertexFormat::Float32x4,
            },
        ];
        VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: ATTRS,
        }
    }
}

// ───────────────────────────────────────────────────────────────────
// Camera uniform
// ───────────────────────────────────────────────────────────────────

/// Pixel-space projection of a render target.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// 4×4 orthographic projection matrix (column-major).
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Maps target pixel (0,0) to the top-left of clip space and
    /// (width, height) to the bottom-right, Y growing downward.
    pub fn target(width: u32, height: u32) -> Self {
        let sx = 2.0 / width.max(1) as f32;
        let sy = -2.0 / height.max(1) as f32;
        Self {
            view_proj: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [-1.0, 1.0, 0.0, 1.0],
            ],
        }
    }

    /// Clip-space position of target pixel `(x, y)`.
    pub fn project(&self, x: f32, y: f32) -> [f32; 2] {
        let m = &self.view_proj;
        [
            x * m[0][0] + y * m[1][0] + m[3][0],
            x * m[0][1] + y * m[1][1] + m[3][1],
        ]
    }
}

// ===================================================================
// Tests
// ===================================================================
