#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

impl SpriteVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }

    /// Four corners of an axis-aligned quad in view space (y-down), wound
    /// top-left, top-right, bottom-right, bottom-left. `uv` is `[u0, v0, u1, v1]`;
    /// passing `u0 > u1` mirrors the sprite horizontally.
    pub fn quad(x: f32, y: f32, w: f32, h: f32, uv: [f32; 4], color: [f32; 4]) -> [SpriteVertex; 4] {
        let [u0, v0, u1, v1] = uv;
        [
            SpriteVertex {
                position: [x, y],
                tex_coords: [u0, v0],
                color,
            },
            SpriteVertex {
                position: [x + w, y],
                tex_coords: [u1, v0],
                color,
            },
            SpriteVertex {
                position: [x + w, y + h],
                tex_coords: [u1, v1],
                color,
            },
            SpriteVertex {
                position: [x, y + h],
                tex_coords: [u0, v1],
                color,
            },
        ]
    }
}

/// Index pattern for one quad starting at vertex `base`.
pub fn quad_indices(base: u32) -> [u32; 6] {
    [base, base + 1, base + 2, base, base + 2, base + 3]
}
