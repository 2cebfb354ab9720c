use std::fmt::Debug;

use compact_str::CompactString;

use crate::{
    glyph_slot, AtlasLayout, Deserializer, FontAtlasDeserializationError, GlyphMetrics,
    LineMetrics, Serializable, TextureRegion, CHAR_COUNT,
};

/// CPU-side result of building a bitmap font atlas.
///
/// Holds everything needed to create the atlas texture and to lay out text:
/// the cell grid, one [`GlyphMetrics`] per slot (printable ASCII followed by the
/// missing glyph) and the single-channel alpha bitmap, `texture_size²` bytes,
/// stored top row first.
#[derive(PartialEq)]
pub struct FontAtlasData {
    /// The name of the font
    pub font_name: CompactString,
    /// The requested pixel size of the font
    pub font_size: f32,
    /// Vertical metrics of the font at `font_size`
    pub line_metrics: LineMetrics,
    /// Cell grid of the atlas texture
    pub layout: AtlasLayout,
    /// Glyph metrics, indexed by glyph slot
    pub glyphs: Vec<GlyphMetrics>,
    /// 8-bit alpha bitmap of the atlas
    pub texture_data: Vec<u8>,
}

impl Debug for FontAtlasData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontAtlasData")
            .field("font_name", &self.font_name)
            .field("font_size", &self.font_size)
            .field("line_metrics", &self.line_metrics)
            .field("layout", &self.layout)
            .field("glyphs_count", &self.glyphs.len())
            .field("texture_data_kb", &(self.texture_data.len() / 1024))
            .finish()
    }
}

impl FontAtlasData {
    pub fn from_binary(serialized: &[u8]) -> Result<Self, FontAtlasDeserializationError> {
        let mut deserializer = Deserializer::new(serialized);
        let atlas = FontAtlasData::deserialize(&mut deserializer).map_err(|e| {
            FontAtlasDeserializationError {
                message: format!("Failed to deserialize font atlas: {}", e.message),
            }
        })?;

        atlas.validate().map_err(|message| FontAtlasDeserializationError {
            message: format!("Invalid font atlas: {message}"),
        })?;

        Ok(atlas)
    }

    pub fn to_binary(&self) -> Vec<u8> {
        self.serialize()
    }

    /// Checks that the glyph table and bitmap agree with the layout.
    ///
    /// The grid must be the one [`AtlasLayout::compute`] would produce for the
    /// texture and cell sizes, and every glyph region must lie within the cell of
    /// its slot.
    pub fn validate(&self) -> Result<(), String> {
        let layout = &self.layout;
        layout.check_grid()?;

        if self.glyphs.len() != CHAR_COUNT {
            return Err(format!("expected {CHAR_COUNT} glyphs, found {}", self.glyphs.len()));
        }

        let cells = (layout.columns * layout.rows) as usize;
        if cells < self.glyphs.len() {
            return Err(format!("{cells} cells cannot hold {} glyphs", self.glyphs.len()));
        }

        if self.texture_data.len() != layout.bitmap_len() {
            let size = layout.texture_size;
            return Err(format!(
                "bitmap holds {} bytes, a {size}x{size} atlas requires {}",
                self.texture_data.len(),
                layout.bitmap_len()
            ));
        }

        let full = TextureRegion::full();
        for (slot, glyph) in self.glyphs.iter().enumerate() {
            let region = &glyph.region;
            if region.is_degenerate()
                || !region.is_within(&full)
                || !region.is_within(&layout.cell_region(slot))
            {
                return Err(format!("glyph {slot} has region {region:?} outside its cell"));
            }
        }

        Ok(())
    }

    /// Metrics for `ch`, or the missing glyph if `ch` has no slot.
    pub fn glyph(&self, ch: char) -> &GlyphMetrics {
        &self.glyphs[glyph_slot(ch)]
    }

    pub fn texture_size(&self) -> i32 {
        self.layout.texture_size
    }

    /// Cell dimensions in pixels, padding included.
    pub fn cell_size(&self) -> (i32, i32) {
        (self.layout.cell_width, self.layout.cell_height)
    }

    /// Widest advance in the glyph table.
    pub fn max_advance(&self) -> f32 {
        self.glyphs.iter().map(|g| g.advance).fold(0.0, f32::max)
    }

    /// Region covering the whole atlas, for debug rendering of the texture.
    pub fn full_region(&self) -> TextureRegion {
        TextureRegion::full()
    }

    /// Alpha value at pixel `(x, y)`; out of bounds reads yield 0.
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        let size = self.layout.texture_size;
        if x < 0 || y < 0 || x >= size || y >= size {
            return 0;
        }

        self.texture_data[(y * size + x) as usize]
    }
}
