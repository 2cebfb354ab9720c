use std::sync::Arc;

use cosmic_text::{
    fontdb, Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, Stretch, Style,
    SwashCache, Weight,
};
use gltext_data::{glyph_slot, rasterized_char, LineMetrics, CHAR_COUNT};
use tracing::{debug, warn};

use crate::{canvas::CellCanvas, AtlasError, FontDiscovery};

const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

/// Font backend used by the atlas builder.
///
/// Implementations report metrics in pixels at a fixed font size and draw single
/// characters into a cell of the atlas bitmap.
pub trait GlyphRasterizer {
    /// Name of the resolved font.
    fn font_name(&self) -> &str;

    /// Pixel size the font was resolved at.
    fn font_size(&self) -> f32;

    fn line_metrics(&self) -> LineMetrics;

    /// Unrounded horizontal advance of `ch`, in pixels.
    fn advance_width(&mut self, ch: char) -> f32;

    /// Draws `ch` into `cell` with the top-left of its line box at `pen`.
    fn rasterize(&mut self, ch: char, cell: &mut CellCanvas<'_>, pen: (i32, i32));
}

/// [`GlyphRasterizer`] backed by cosmic-text and its swash glyph cache.
pub struct CosmicRasterizer {
    font_system: FontSystem,
    cache: SwashCache,
    family: String,
    weight: Weight,
    style: Style,
    stretch: Stretch,
    font_size: f32,
    line_metrics: LineMetrics,
    metrics: Metrics,
    advances: Vec<f32>,
}

impl CosmicRasterizer {
    /// Resolves an installed font by family or PostScript name.
    pub fn from_system(name: &str, font_size: f32) -> Result<Self, AtlasError> {
        let discovery = FontDiscovery::new();
        let id = discovery
            .resolve(name)
            .ok_or_else(|| AtlasError::FontNotFound(name.to_string()))?;

        Self::from_face(discovery.into_font_system(), id, font_size)
    }

    /// Loads a font from its TTF/OTF bytes, without touching system fonts.
    pub fn from_font_data(data: Vec<u8>, font_size: f32) -> Result<Self, AtlasError> {
        let mut font_system =
            FontSystem::new_with_locale_and_db("en-US".to_string(), fontdb::Database::new());

        let ids = font_system
            .db_mut()
            .load_font_source(fontdb::Source::Binary(Arc::new(data)));

        let id = ids
            .first()
            .copied()
            .ok_or_else(|| AtlasError::FontData("no font face found in data".to_string()))?;

        Self::from_face(font_system, id, font_size)
    }

    /// Uses the face `id` of an already populated font system.
    pub fn from_face(
        font_system: FontSystem,
        id: fontdb::ID,
        font_size: f32,
    ) -> Result<Self, AtlasError> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(AtlasError::InvalidFontSize(font_size));
        }

        let db = font_system.db();
        let face = db
            .face(id)
            .ok_or_else(|| AtlasError::FontData(format!("font face {id} not in database")))?;

        let family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| face.post_script_name.clone());
        let (weight, style, stretch) = (face.weight, face.style, face.stretch);

        let (line_metrics, advances) = db
            .with_face_data(id, |data, index| measure_face(data, index, font_size))
            .ok_or_else(|| AtlasError::FontData(format!("unable to load data of {family}")))??;

        debug!(
            font = %family,
            size = font_size,
            height = line_metrics.height,
            ascent = line_metrics.ascent,
            descent = line_metrics.descent,
            "resolved font"
        );

        Ok(Self {
            font_system,
            cache: SwashCache::new(),
            family,
            weight,
            style,
            stretch,
            font_size,
            line_metrics,
            metrics: Metrics::new(font_size, line_metrics.height),
            advances,
        })
    }
}

impl GlyphRasterizer for CosmicRasterizer {
    fn font_name(&self) -> &str {
        &self.family
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }

    fn line_metrics(&self) -> LineMetrics {
        self.line_metrics
    }

    fn advance_width(&mut self, ch: char) -> f32 {
        self.advances[glyph_slot(ch)]
    }

    fn rasterize(&mut self, ch: char, cell: &mut CellCanvas<'_>, pen: (i32, i32)) {
        let attrs = Attrs::new()
            .family(Family::Name(&self.family))
            .weight(self.weight)
            .style(self.style)
            .stretch(self.stretch);

        let f = &mut self.font_system;

        let mut buffer = Buffer::new(f, self.metrics);
        buffer.set_size(f, Some(2.0 * cell.width() as f32), Some(2.0 * cell.height() as f32));
        buffer.set_text(f, ch.encode_utf8(&mut [0; 4]), &attrs, Shaping::Advanced);
        buffer.shape_until_scroll(f, true);

        let mut buffer = buffer.borrow_with(f);
        let (pen_x, pen_y) = pen;
        buffer.draw(&mut self.cache, WHITE, |x, y, w, h, color| {
            if color.a() == 0 || w != 1 || h != 1 {
                return;
            }

            cell.blend(pen_x + x, pen_y + y, color.a());
        });
    }
}

/// Reads vertical metrics and the advance of every glyph slot from the raw font.
fn measure_face(
    data: &[u8],
    index: u32,
    font_size: f32,
) -> Result<(LineMetrics, Vec<f32>), AtlasError> {
    let face = rustybuzz::Face::from_slice(data, index)
        .ok_or_else(|| AtlasError::FontData("unsupported font format".to_string()))?;

    let scale = font_size / face.units_per_em() as f32;
    let ascent = face.ascender() as f32 * scale;
    let descent = face.descender() as f32 * scale;
    let line_gap = face.line_gap() as f32 * scale;

    let line_metrics = LineMetrics { height: ascent - descent + line_gap, ascent, descent };

    let advances = (0..CHAR_COUNT)
        .map(|slot| {
            let ch = rasterized_char(slot);
            let glyph_id = face.glyph_index(ch).unwrap_or_else(|| {
                warn!(?ch, "font has no glyph, using .notdef");
                rustybuzz::ttf_parser::GlyphId(0)
            });

            face.glyph_hor_advance(glyph_id).unwrap_or(0) as f32 * scale
        })
        .collect();

    Ok((line_metrics, advances))
}
