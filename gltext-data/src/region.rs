/// Normalized UV rectangle of a sub-image within a texture.
///
/// `(u1, v1)` is the top-left and `(u2, v2)` the bottom-right corner, with `v`
/// growing downwards in the same direction as the rows of the uploaded bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRegion {
    /// Left U coordinate
    pub u1: f32,
    /// Top V coordinate
    pub v1: f32,
    /// Right U coordinate
    pub u2: f32,
    /// Bottom V coordinate
    pub v2: f32,
}

impl TextureRegion {
    /// Calculates the UV bounds of the pixel rectangle `(x, y, width, height)` on
    /// a texture of `tex_width` x `tex_height` pixels.
    ///
    /// No bounds checking is performed; the caller guarantees the rectangle lies
    /// within the texture.
    pub fn new(tex_width: f32, tex_height: f32, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            u1: x / tex_width,
            v1: y / tex_height,
            u2: (x + width) / tex_width,
            v2: (y + height) / tex_height,
        }
    }

    /// Region covering the whole texture.
    pub const fn full() -> Self {
        Self { u1: 0.0, v1: 0.0, u2: 1.0, v2: 1.0 }
    }

    pub fn is_degenerate(&self) -> bool {
        self.u1 >= self.u2 || self.v1 >= self.v2
    }

    /// Returns true if this region lies within `other`, edges included.
    pub fn is_within(&self, other: &TextureRegion) -> bool {
        self.u1 >= other.u1 && self.v1 >= other.v1 && self.u2 <= other.u2 && self.v2 <= other.v2
    }

    /// Returns true if the interiors of the two regions intersect.
    pub fn overlaps(&self, other: &TextureRegion) -> bool {
        self.u1 < other.u2 && other.u1 < self.u2 && self.v1 < other.v2 && other.v1 < self.v2
    }
}
