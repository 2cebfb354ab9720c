use gltext_data::{
    rasterized_char, AtlasLayout, FontAtlasData, GlyphMetrics, Padding, CHAR_COUNT,
};
use tracing::debug;

use crate::{AlphaCanvas, AtlasError, GlyphRasterizer};

/// Rasterizes the printable ASCII range plus the missing glyph into one square
/// alpha atlas.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtlasBuilder {
    padding: Padding,
}

impl AtlasBuilder {
    pub fn new(padding: Padding) -> Self {
        Self { padding }
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Measures every glyph, lays out the cell grid and draws each glyph into
    /// its cell.
    ///
    /// Fails before any rasterization when the cell size is outside the supported
    /// range or no atlas size fits all cells.
    pub fn build(
        &self,
        rasterizer: &mut impl GlyphRasterizer,
    ) -> Result<FontAtlasData, AtlasError> {
        let line_metrics = rasterizer.line_metrics();

        // advances are rounded up to whole pixels
        let advances: Vec<f32> = (0..CHAR_COUNT)
            .map(|slot| rasterizer.advance_width(rasterized_char(slot)).ceil())
            .collect();
        let max_advance = advances.iter().copied().fold(0.0, f32::max);

        let layout =
            AtlasLayout::compute(max_advance, line_metrics.height, self.padding, CHAR_COUNT)?;

        debug!(
            font = rasterizer.font_name(),
            max_advance,
            cell_width = layout.cell_width,
            cell_height = layout.cell_height,
            texture_size = layout.texture_size,
            columns = layout.columns,
            rows = layout.rows,
            "computed atlas layout"
        );

        let mut canvas = AlphaCanvas::new(layout.texture_size, layout.texture_size);
        let glyphs: Vec<GlyphMetrics> = advances
            .into_iter()
            .enumerate()
            .map(|(slot, advance)| {
                let (x, y) = layout.cell_origin(slot);
                let mut cell = canvas.cell(x, y, layout.cell_width, layout.cell_height);
                let pen = (self.padding.x, self.padding.y);
                rasterizer.rasterize(rasterized_char(slot), &mut cell, pen);

                GlyphMetrics::new(slot, advance, layout.cell_region(slot))
            })
            .collect();

        let atlas = FontAtlasData {
            font_name: rasterizer.font_name().into(),
            font_size: rasterizer.font_size(),
            line_metrics,
            layout,
            glyphs,
            texture_data: canvas.into_bytes(),
        };

        atlas.validate().map_err(AtlasError::Validation)?;
        Ok(atlas)
    }
}
