use crate::TextureRegion;

/// First codepoint with a dedicated atlas slot.
pub const CHAR_START: u32 = 32;
/// Last codepoint with a dedicated atlas slot.
pub const CHAR_END: u32 = 126;
/// Number of atlas slots: the printable ASCII range plus one missing-glyph slot.
pub const CHAR_COUNT: usize = (CHAR_END - CHAR_START + 1) as usize + 1;
/// Slot substituted for any character outside `CHAR_START..=CHAR_END`.
pub const CHAR_UNKNOWN: usize = CHAR_COUNT - 1;
/// Character rasterized into the missing-glyph slot.
pub const CHAR_NONE: char = ' ';

/// Returns the glyph table slot for `ch`; characters without a dedicated slot
/// map to [`CHAR_UNKNOWN`].
pub fn glyph_slot(ch: char) -> usize {
    let cp = ch as u32;
    if (CHAR_START..=CHAR_END).contains(&cp) {
        (cp - CHAR_START) as usize
    } else {
        CHAR_UNKNOWN
    }
}

/// Returns the character rasterized into `slot`.
pub fn rasterized_char(slot: usize) -> char {
    if slot >= CHAR_UNKNOWN {
        return CHAR_NONE;
    }

    char::from_u32(CHAR_START + slot as u32).unwrap_or(CHAR_NONE)
}

/// Placement and advance of a single glyph in the atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// The character this slot represents; the missing-glyph slot uses
    /// `char::REPLACEMENT_CHARACTER`.
    pub codepoint: char,
    /// Horizontal advance in pixels, rounded up to whole pixels.
    pub advance: f32,
    /// Region of the glyph's cell in the atlas texture.
    pub region: TextureRegion,
}

impl GlyphMetrics {
    pub fn new(slot: usize, advance: f32, region: TextureRegion) -> Self {
        let codepoint = if slot >= CHAR_UNKNOWN {
            char::REPLACEMENT_CHARACTER
        } else {
            rasterized_char(slot)
        };

        Self { codepoint, advance, region }
    }

    pub fn is_missing_glyph(&self) -> bool {
        self.codepoint == char::REPLACEMENT_CHARACTER
    }
}

/// Vertical font metrics in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineMetrics {
    /// Distance between consecutive baselines
    pub height: f32,
    /// Distance from the baseline to the top of the line box
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line box; negative
    pub descent: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_range_constants() {
        assert_eq!(CHAR_COUNT, 96);
        assert_eq!(CHAR_UNKNOWN, 95);
    }

    #[test]
    fn test_glyph_slot() {
        assert_eq!(glyph_slot(' '), 0);
        assert_eq!(glyph_slot('A'), 33);
        assert_eq!(glyph_slot('~'), 94);

        assert_eq!(glyph_slot('\n'), CHAR_UNKNOWN);
        assert_eq!(glyph_slot('\u{7f}'), CHAR_UNKNOWN);
        assert_eq!(glyph_slot('é'), CHAR_UNKNOWN);
        assert_eq!(glyph_slot('🚀'), CHAR_UNKNOWN);
    }

    #[test]
    fn test_rasterized_char_inverts_glyph_slot() {
        for slot in 0..CHAR_UNKNOWN {
            assert_eq!(glyph_slot(rasterized_char(slot)), slot);
        }

        assert_eq!(rasterized_char(CHAR_UNKNOWN), CHAR_NONE);
    }

    #[test]
    fn test_missing_glyph_metrics() {
        let glyph = GlyphMetrics::new(CHAR_UNKNOWN, 6.0, TextureRegion::full());
        assert!(glyph.is_missing_glyph());

        let glyph = GlyphMetrics::new(glyph_slot('x'), 6.0, TextureRegion::full());
        assert_eq!(glyph.codepoint, 'x');
        assert!(!glyph.is_missing_glyph());
    }
}
