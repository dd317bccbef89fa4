//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Convert a packed `0xRRGGBB` color into RGBA floats
pub fn rgb_hex(hex: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha]
}

/// Scale a color's alpha (for fading entities)
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const GRID: [f32; 4] = [1.0, 1.0, 1.0, 0.03];
    pub const WEB: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SPLAT: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
    pub const TARGET_MARKER: [f32; 4] = [1.0, 1.0, 1.0, 0.15];

    pub const FLY_BODY: [f32; 4] = [0.04, 0.04, 0.04, 1.0];
    pub const FLY_OUTLINE: [f32; 4] = [0.0, 0.95, 1.0, 1.0];
    pub const FLY_WINGS: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    pub const FLY_EYES: [f32; 4] = [1.0, 0.0, 0.33, 1.0];
    pub const BUG_BODY: [f32; 4] = [1.0, 0.8, 0.0, 1.0];
    pub const BUG_WINGS: [f32; 4] = [1.0, 0.97, 0.0, 1.0];
    pub const BUG_EYES: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub const WARNING_RING: [f32; 4] = [1.0, 0.39, 0.0, 1.0];
    pub const WARNING_FILL: [f32; 4] = [1.0, 0.2, 0.0, 1.0];
    pub const ROCK_BODY: [f32; 4] = [0.33, 0.33, 0.33, 1.0];
    pub const ROCK_OUTLINE: [f32; 4] = [0.13, 0.13, 0.13, 1.0];
    pub const ROCK_SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.4];

    pub const PORTAL_SURVIVAL: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    pub const PORTAL_FINALE: [f32; 4] = [0.0, 1.0, 1.0, 1.0];

    pub const SPIDER_SHELL: [f32; 4] = [0.12, 0.12, 0.14, 1.0];
    pub const SPIDER_EYES: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const HEALTH_BACK: [f32; 4] = [1.0, 0.0, 0.0, 0.2];
    pub const HEALTH_FILL: [f32; 4] = [1.0, 0.2, 0.0, 1.0];
    pub const AMMO_BACK: [f32; 4] = [1.0, 1.0, 1.0, 0.1];
    pub const FINALE_BACKDROP: [f32; 4] = [0.07, 0.07, 0.07, 1.0];
}
