use gltext_data::{
    glyph_slot, FontAtlasData, GlyphMetrics, LineMetrics, Padding, TextureRegion, CHAR_UNKNOWN,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    mat4::Mat4,
    sprite_batch::{BatchTarget, SpriteBatch},
};

/// RGBA tint applied to every glyph of a batch, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from `0xRRGGBB`.
    pub fn from_rgb(rgb: u32) -> Self {
        let r = ((rgb >> 16) & 0xFF) as f32 / 255.0;
        let g = ((rgb >> 8) & 0xFF) as f32 / 255.0;
        let b = (rgb & 0xFF) as f32 / 255.0;
        Self::new(r, g, b, 1.0)
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Rotation of a whole string around its anchor, in degrees per axis.
///
/// Applied as Z, then X, then Y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Rotation {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// In-plane rotation only.
    pub const fn z(degrees: f32) -> Self {
        Self::new(0.0, 0.0, degrees)
    }
}

/// Measures strings and turns them into sprites, one per character.
///
/// A character is an extended grapheme cluster; clusters that are not a single
/// printable ASCII character use the missing glyph, both when measuring and when
/// drawing. Metrics are reported scaled by the current scale.
#[derive(Debug, Clone)]
pub struct TextLayout {
    glyphs: Vec<GlyphMetrics>,
    line_metrics: LineMetrics,
    cell_size: (i32, i32),
    padding: Padding,
    texture_size: i32,
    char_width_max: f32,
    scale_x: f32,
    scale_y: f32,
    space_x: f32,
}

impl TextLayout {
    pub fn new(atlas: &FontAtlasData) -> Self {
        Self {
            glyphs: atlas.glyphs.clone(),
            line_metrics: atlas.line_metrics,
            cell_size: atlas.cell_size(),
            padding: atlas.layout.padding,
            texture_size: atlas.texture_size(),
            char_width_max: atlas.max_advance(),
            scale_x: 1.0,
            scale_y: 1.0,
            space_x: 0.0,
        }
    }

    /// Sets a uniform scale for both axes.
    pub fn set_scale(&mut self, scale: f32) {
        self.set_scale_xy(scale, scale);
    }

    pub fn set_scale_xy(&mut self, sx: f32, sy: f32) {
        self.scale_x = sx;
        self.scale_y = sy;
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    /// Sets the unscaled extra spacing between consecutive characters, in pixels.
    pub fn set_space(&mut self, space: f32) {
        self.space_x = space;
    }

    pub fn space(&self) -> f32 {
        self.space_x
    }

    /// Rendered width of `text`: the scaled advances plus the scaled spacing
    /// between characters.
    pub fn length(&self, text: &str) -> f32 {
        let (count, advance) = self
            .glyphs_of(text)
            .fold((0usize, 0.0f32), |(n, len), g| (n + 1, len + g.advance * self.scale_x));

        let spacing = if count > 1 { (count - 1) as f32 * self.space_x * self.scale_x } else { 0.0 };

        advance + spacing
    }

    /// Scaled advance of `ch`, excluding spacing.
    pub fn char_width(&self, ch: char) -> f32 {
        self.glyphs[glyph_slot(ch)].advance * self.scale_x
    }

    /// Scaled advance of the widest glyph.
    pub fn char_width_max(&self) -> f32 {
        self.char_width_max * self.scale_x
    }

    /// All glyphs share the line height.
    pub fn char_height(&self) -> f32 {
        self.line_metrics.height * self.scale_y
    }

    pub fn ascent(&self) -> f32 {
        self.line_metrics.ascent * self.scale_y
    }

    /// Negative; below the baseline.
    pub fn descent(&self) -> f32 {
        self.line_metrics.descent * self.scale_y
    }

    pub fn height(&self) -> f32 {
        self.line_metrics.height * self.scale_y
    }

    /// Anchor that centres the measured box of `text` on `(x, y)`.
    pub fn centered_origin(&self, text: &str, x: f32, y: f32) -> (f32, f32) {
        (x - self.length(text) / 2.0, y - self.char_height() / 2.0)
    }

    /// Model matrix shared by all glyphs of a string whose line box starts at
    /// `(x, y, z)`.
    pub fn model_matrix(&self, x: f32, y: f32, z: f32, rotation: Rotation) -> Mat4 {
        let (cell_w, cell_h) = self.scaled_cell();
        let x1 = x + cell_w / 2.0 - self.padding.x as f32 * self.scale_x;
        let y1 = y + cell_h / 2.0 - self.padding.y as f32 * self.scale_y;

        Mat4::translation(x1, y1, z)
            .mul(&Mat4::rotation_z(rotation.z))
            .mul(&Mat4::rotation_x(rotation.x))
            .mul(&Mat4::rotation_y(rotation.y))
    }

    /// Submits one sprite per character of `text`, anchored at the bottom-left
    /// of its line box (descent included).
    ///
    /// The string is rotated as a rigid body around its anchor.
    pub fn submit<T: BatchTarget>(
        &self,
        batch: &mut SpriteBatch<T>,
        text: &str,
        (x, y, z): (f32, f32, f32),
        rotation: Rotation,
    ) {
        let (cell_w, cell_h) = self.scaled_cell();
        let model = self.model_matrix(x, y, z, rotation);

        let mut letter_x = 0.0;
        for glyph in self.glyphs_of(text) {
            batch.draw_sprite(letter_x, 0.0, cell_w, cell_h, &glyph.region, &model);
            letter_x += (glyph.advance + self.space_x) * self.scale_x;
        }
    }

    /// Submits the whole atlas texture as one sprite with its top-right corner at
    /// `(width, height)`.
    pub fn submit_atlas<T: BatchTarget>(
        &self,
        batch: &mut SpriteBatch<T>,
        width: f32,
        height: f32,
    ) {
        let size = self.texture_size as f32;
        batch.draw_sprite(
            width - size / 2.0,
            height - size / 2.0,
            size,
            size,
            &TextureRegion::full(),
            &Mat4::new_identity(),
        );
    }

    fn scaled_cell(&self) -> (f32, f32) {
        let (w, h) = self.cell_size;
        (w as f32 * self.scale_x, h as f32 * self.scale_y)
    }

    fn glyphs_of<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a GlyphMetrics> + 'a {
        text.graphemes(true).map(|cluster| &self.glyphs[cluster_slot(cluster)])
    }
}

/// Glyph slot of a grapheme cluster; multi-codepoint clusters have no glyph.
fn cluster_slot(cluster: &str) -> usize {
    let mut chars = cluster.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => glyph_slot(ch),
        _ => CHAR_UNKNOWN,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use gltext_data::{AtlasLayout, CHAR_COUNT};

    use super::*;
    use crate::sprite_batch::tests::RecordingTarget;

    fn advance_of(slot: usize) -> f32 {
        match slot {
            s if s == glyph_slot('A') => 10.0,
            s if s == glyph_slot('B') => 12.0,
            s if s == glyph_slot('i') => 4.0,
            CHAR_UNKNOWN => 9.0,
            _ => 8.0,
        }
    }

    /// Atlas with a 16x24 cell grid and hand-picked advances; no bitmap content.
    pub(crate) fn test_atlas() -> FontAtlasData {
        let layout = AtlasLayout::compute(12.0, 20.0, Padding::new(2, 2), CHAR_COUNT).unwrap();
        FontAtlasData {
            font_name: "Test".into(),
            font_size: 16.0,
            line_metrics: LineMetrics { height: 20.0, ascent: 15.0, descent: -5.0 },
            layout,
            glyphs: (0..CHAR_COUNT)
                .map(|slot| GlyphMetrics::new(slot, advance_of(slot), layout.cell_region(slot)))
                .collect(),
            texture_data: vec![0; layout.bitmap_len()],
        }
    }

    fn batch() -> SpriteBatch<RecordingTarget> {
        let mut batch = SpriteBatch::new(24, RecordingTarget::default());
        batch.begin_batch(&Mat4::new_identity());
        batch
    }

    #[test]
    fn test_single_char_length_is_scaled_advance() {
        let mut text = TextLayout::new(&test_atlas());
        assert_eq!(text.length("A"), 10.0);

        text.set_scale(2.0);
        text.set_space(3.0);
        assert_eq!(text.length("B"), 24.0);
        assert_eq!(text.length("B"), text.char_width('B'));
    }

    #[test]
    fn test_length_sums_advances_and_spacing() {
        let mut text = TextLayout::new(&test_atlas());
        text.set_scale_xy(1.5, 3.0);
        text.set_space(2.0);

        // (10 + 12 + 4) * 1.5 + 2 gaps * 2 * 1.5
        assert_eq!(text.length("ABi"), 45.0);
        assert_eq!(text.length(""), 0.0);
    }

    #[test]
    fn test_missing_glyph_substitution_in_measurement() {
        let text = TextLayout::new(&test_atlas());

        assert_eq!(text.char_width('é'), 9.0);
        assert_eq!(text.length("é"), 9.0);
        assert_eq!(text.length("\t"), 9.0);
        // one cluster, two codepoints
        assert_eq!(text.length("e\u{301}"), 9.0);
        assert_eq!(text.length("A🚀B"), 10.0 + 9.0 + 12.0);
    }

    #[test]
    fn test_draw_ab_submits_two_sprites() {
        let atlas = test_atlas();
        let text = TextLayout::new(&atlas);

        let mut batch = batch();
        text.submit(&mut batch, "AB", (0.0, 0.0, 0.0), Rotation::default());
        batch.end_batch();

        let recorded = &batch.target().batches;
        assert_eq!(recorded.len(), 1);
        let sprites = &recorded[0];
        assert_eq!(sprites.sprite_count, 2);

        // transform slots 0 and 1
        assert_eq!(sprites.vertex(0, 0)[4], 0.0);
        assert_eq!(sprites.vertex(1, 0)[4], 1.0);

        // cells are 16x24; the second sprite starts one advance of 'A' later
        let a_left = sprites.vertex(0, 0)[0];
        let b_left = sprites.vertex(1, 0)[0];
        assert_eq!(a_left, -8.0);
        assert_eq!(b_left - a_left, 10.0);

        // uv from the glyph regions
        let a = atlas.glyph('A').region;
        assert_eq!(&sprites.vertex(0, 0)[2..4], &[a.u1, a.v2]);
        let b = atlas.glyph('B').region;
        assert_eq!(&sprites.vertex(1, 2)[2..4], &[b.u2, b.v1]);
    }

    #[test]
    fn test_line_box_starts_at_anchor() {
        let text = TextLayout::new(&test_atlas());
        let model = text.model_matrix(100.0, 50.0, 0.0, Rotation::default());

        // bottom-left corner of the first quad is the cell corner, one padding
        // outside the line box
        let corner = model.transform_point(-8.0, -12.0, 0.0);
        assert_eq!(&corner[..2], &[98.0, 48.0]);
    }

    #[test]
    fn test_spacing_and_scale_advance_the_pen() {
        let mut text = TextLayout::new(&test_atlas());
        text.set_scale(2.0);
        text.set_space(1.0);

        let mut batch = batch();
        text.submit(&mut batch, "AAB", (0.0, 0.0, 0.0), Rotation::default());
        batch.end_batch();

        let sprites = &batch.target().batches[0];
        let lefts: Vec<f32> = (0..3).map(|i| sprites.vertex(i, 0)[0]).collect();
        assert_eq!(lefts, vec![-16.0, -16.0 + 22.0, -16.0 + 44.0]);
        // quads are the scaled cell
        assert_eq!(sprites.vertex(0, 1)[0] - sprites.vertex(0, 0)[0], 32.0);
        assert_eq!(sprites.vertex(0, 3)[1] - sprites.vertex(0, 0)[1], 48.0);
    }

    #[test]
    fn test_whole_string_shares_one_transform() {
        let text = TextLayout::new(&test_atlas());

        let mut batch = batch();
        text.submit(&mut batch, "rigid", (5.0, 5.0, 1.0), Rotation::new(10.0, 20.0, 30.0));
        batch.end_batch();

        let sprites = &batch.target().batches[0];
        for i in 1..sprites.sprite_count {
            assert_eq!(sprites.transform(i), sprites.transform(0));
        }
    }

    #[test]
    fn test_rotation_order_is_z_x_y() {
        let text = TextLayout::new(&test_atlas());
        let rotation = Rotation::new(30.0, 45.0, 60.0);
        let model = text.model_matrix(0.0, 0.0, 0.0, rotation);

        let expected = Mat4::translation(6.0, 10.0, 0.0)
            .mul(&Mat4::rotation_z(60.0))
            .mul(&Mat4::rotation_x(30.0))
            .mul(&Mat4::rotation_y(45.0));
        assert_eq!(model, expected);
    }

    #[test]
    fn test_centered_origin() {
        let mut text = TextLayout::new(&test_atlas());
        text.set_scale(0.5);

        let (x, y) = text.centered_origin("AB", 100.0, 100.0);
        let len = text.length("AB");
        assert_eq!(len, 11.0);

        assert_eq!(x + len / 2.0, 100.0);
        assert_eq!(y + text.char_height() / 2.0, 100.0);
        assert_eq!((x, y), (94.5, 95.0));
    }

    #[test]
    fn test_scaled_metrics() {
        let mut text = TextLayout::new(&test_atlas());
        text.set_scale_xy(2.0, 0.5);

        assert_eq!(text.char_height(), 10.0);
        assert_eq!(text.height(), 10.0);
        assert_eq!(text.ascent(), 7.5);
        assert_eq!(text.descent(), -2.5);
        assert_eq!(text.char_width_max(), 24.0);
        assert_eq!((text.scale_x(), text.scale_y()), (2.0, 0.5));
    }

    #[test]
    fn test_long_strings_are_split_across_batches() {
        let text = TextLayout::new(&test_atlas());
        let line = "x".repeat(30);

        let mut batch = batch();
        text.submit(&mut batch, &line, (0.0, 0.0, 0.0), Rotation::default());
        batch.end_batch();

        let counts: Vec<usize> = batch.target().batches.iter().map(|b| b.sprite_count).collect();
        assert_eq!(counts, vec![24, 6]);
        // the pen keeps advancing across the flush
        assert_eq!(batch.target().batches[1].vertex(0, 0)[0], -8.0 + 24.0 * 8.0);
    }

    #[test]
    fn test_atlas_sprite_is_anchored_at_top_right() {
        let text = TextLayout::new(&test_atlas());

        let mut batch = batch();
        text.submit_atlas(&mut batch, 800.0, 600.0);
        batch.end_batch();

        let sprite = &batch.target().batches[0];
        assert_eq!(sprite.vertex(0, 2), &[800.0, 600.0, 1.0, 0.0, 0.0]);
        assert_eq!(sprite.vertex(0, 0), &[544.0, 344.0, 0.0, 1.0, 0.0]);
    }
}
