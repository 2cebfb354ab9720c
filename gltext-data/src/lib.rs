mod atlas;
mod glyph;
mod layout;
mod region;
mod serialization;

pub use atlas::FontAtlasData;
pub use glyph::{
    glyph_slot, rasterized_char, GlyphMetrics, LineMetrics, CHAR_COUNT, CHAR_END, CHAR_NONE,
    CHAR_START, CHAR_UNKNOWN,
};
pub use layout::{AtlasLayout, LayoutError, Padding};
pub use region::TextureRegion;
use serialization::*;

/// Upper bound of sprites per batch. The batched-text vertex shader declares its
/// transform array with this length, so the two must never diverge.
pub const MAX_BATCH_SPRITES: usize = 24;

/// Vertex record layout shared by the sprite batch writer and the GPU attribute setup.
pub mod vertex {
    /// `x, y`
    pub const POSITION_COMPONENTS: usize = 2;
    /// `u, v`
    pub const TEX_COORD_COMPONENTS: usize = 2;
    /// index into the batch's transform array
    pub const TRANSFORM_INDEX_COMPONENTS: usize = 1;

    /// Floats per vertex.
    pub const VERTEX_SIZE: usize =
        POSITION_COMPONENTS + TEX_COORD_COMPONENTS + TRANSFORM_INDEX_COMPONENTS;
    /// Bytes per vertex.
    pub const VERTEX_STRIDE: usize = VERTEX_SIZE * size_of::<f32>();

    pub const VERTICES_PER_SPRITE: usize = 4;
    pub const INDICES_PER_SPRITE: usize = 6;
}

#[derive(Debug)]
pub struct FontAtlasDeserializationError {
    pub message: String,
}

impl std::fmt::Display for FontAtlasDeserializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FontAtlasDeserializationError {}
