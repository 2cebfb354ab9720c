/// Single-channel 8-bit bitmap that glyphs are rasterized into.
///
/// Rows are stored top to bottom, matching the upload order of the atlas texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaCanvas {
    width: i32,
    height: i32,
    pixels: Vec<u8>,
}

impl AlphaCanvas {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self { width, height, pixels: vec![0; (width * height) as usize] }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Alpha at `(x, y)`; 0 outside the canvas.
    pub fn get(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map(|idx| self.pixels[idx]).unwrap_or(0)
    }

    /// Writes `alpha` at `(x, y)`, keeping the stronger of the old and new coverage.
    /// Writes outside the canvas are ignored.
    pub fn blend(&mut self, x: i32, y: i32, alpha: u8) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = self.pixels[idx].max(alpha);
        }
    }

    /// A clipped view of the `width` x `height` rectangle at `(x, y)`.
    pub fn cell(&mut self, x: i32, y: i32, width: i32, height: i32) -> CellCanvas<'_> {
        CellCanvas { canvas: self, x, y, width, height }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }

        Some((y * self.width + x) as usize)
    }
}

/// Rectangular window into an [`AlphaCanvas`] with its own origin.
///
/// Coordinates are relative to the window; pixels falling outside it are
/// discarded, so a glyph can never bleed into a neighbouring cell.
pub struct CellCanvas<'a> {
    canvas: &'a mut AlphaCanvas,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl CellCanvas<'_> {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn blend(&mut self, x: i32, y: i32, alpha: u8) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }

        self.canvas.blend(self.x + x, self.y + y, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_keeps_max_coverage() {
        let mut canvas = AlphaCanvas::new(4, 4);
        canvas.blend(1, 2, 0x80);
        canvas.blend(1, 2, 0x40);
        assert_eq!(canvas.get(1, 2), 0x80);

        canvas.blend(1, 2, 0xff);
        assert_eq!(canvas.get(1, 2), 0xff);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut canvas = AlphaCanvas::new(2, 2);
        canvas.blend(-1, 0, 0xff);
        canvas.blend(2, 0, 0xff);
        canvas.blend(0, 2, 0xff);

        assert_eq!(canvas.get(5, 5), 0);
        assert!(canvas.into_bytes().iter().all(|&a| a == 0));
    }

    #[test]
    fn test_cell_clips_to_its_bounds() {
        let mut canvas = AlphaCanvas::new(8, 8);

        let mut cell = canvas.cell(2, 3, 3, 2);
        for y in -1..4 {
            for x in -1..5 {
                cell.blend(x, y, 0xff);
            }
        }

        let covered: Vec<(i32, i32)> = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.get(x, y) > 0)
            .collect();

        assert_eq!(covered, vec![(2, 3), (3, 3), (4, 3), (2, 4), (3, 4), (4, 4)]);
    }

    #[test]
    fn test_rows_are_stored_top_to_bottom() {
        let mut canvas = AlphaCanvas::new(3, 2);
        canvas.blend(2, 0, 1);
        canvas.blend(0, 1, 2);

        assert_eq!(canvas.into_bytes(), vec![0, 0, 1, 2, 0, 0]);
    }
}
