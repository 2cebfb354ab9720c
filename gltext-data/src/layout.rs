use std::fmt;

use crate::TextureRegion;

/// Extra space around each glyph inside its cell, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub x: i32,
    pub y: i32,
}

impl Padding {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Grid of equally sized cells on a square, power-of-two atlas texture.
///
/// Cells are assigned in row-major order: slot `i` occupies column
/// `i % columns` and row `i / columns`. Each cell is `cell_width` x `cell_height`
/// pixels and holds one glyph, inset by the padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    /// Width and height of the atlas texture in pixels
    pub texture_size: i32,
    pub cell_width: i32,
    pub cell_height: i32,
    /// Cells per row
    pub columns: i32,
    /// Rows required for all glyphs
    pub rows: i32,
    pub padding: Padding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    NegativePadding(Padding),
    CellSizeOutOfRange { cell_width: i32, cell_height: i32 },
    NoAtlasSizeFits { cell_width: i32, cell_height: i32, glyph_count: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::NegativePadding(p) => {
                write!(f, "padding must not be negative: ({}, {})", p.x, p.y)
            },
            LayoutError::CellSizeOutOfRange { cell_width, cell_height } => write!(
                f,
                "cell size {cell_width}x{cell_height} outside of the supported range {}..={} px",
                AtlasLayout::CELL_SIZE_MIN,
                AtlasLayout::CELL_SIZE_MAX
            ),
            LayoutError::NoAtlasSizeFits { cell_width, cell_height, glyph_count } => write!(
                f,
                "{glyph_count} cells of {cell_width}x{cell_height} px do not fit any supported atlas size"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

impl AtlasLayout {
    /// Supported atlas texture sizes, smallest first.
    pub const SIZES: [i32; 4] = [256, 512, 1024, 2048];
    /// Smallest cell dimension that still rasterizes legibly.
    pub const CELL_SIZE_MIN: i32 = 6;
    /// Largest cell dimension accepted.
    pub const CELL_SIZE_MAX: i32 = 180;

    /// Computes the cell size and picks the smallest atlas that fits `glyph_count`
    /// cells.
    ///
    /// `max_advance` is the widest glyph advance; fractional values are rounded up.
    /// `line_height` is truncated to whole pixels.
    pub fn compute(
        max_advance: f32,
        line_height: f32,
        padding: Padding,
        glyph_count: usize,
    ) -> Result<Self, LayoutError> {
        if padding.x < 0 || padding.y < 0 {
            return Err(LayoutError::NegativePadding(padding));
        }

        let cell_width = max_advance.ceil() as i32 + 2 * padding.x;
        let cell_height = line_height as i32 + 2 * padding.y;

        if !Self::is_supported_cell_size(cell_width, cell_height) {
            return Err(LayoutError::CellSizeOutOfRange { cell_width, cell_height });
        }

        Self::SIZES
            .into_iter()
            .find_map(|size| Self::fit(size, cell_width, cell_height, padding, glyph_count))
            .ok_or(LayoutError::NoAtlasSizeFits { cell_width, cell_height, glyph_count })
    }

    /// Both dimensions must be positive and the larger one within
    /// [`CELL_SIZE_MIN`](Self::CELL_SIZE_MIN)..=[`CELL_SIZE_MAX`](Self::CELL_SIZE_MAX).
    pub fn is_supported_cell_size(cell_width: i32, cell_height: i32) -> bool {
        let max_size = cell_width.max(cell_height);
        cell_width > 0
            && cell_height > 0
            && (Self::CELL_SIZE_MIN..=Self::CELL_SIZE_MAX).contains(&max_size)
    }

    /// Checks a layout read from outside, e.g. an atlas file, against the grid
    /// [`compute`](Self::compute) would produce for its texture and cell sizes.
    pub fn check_grid(&self) -> Result<(), String> {
        if !Self::SIZES.contains(&self.texture_size) {
            return Err(format!("unsupported atlas size {}", self.texture_size));
        }

        if !Self::is_supported_cell_size(self.cell_width, self.cell_height) {
            return Err(format!(
                "cell size {}x{} out of range",
                self.cell_width, self.cell_height
            ));
        }

        if self.padding.x < 0 || self.padding.y < 0 {
            return Err(format!("negative padding {:?}", self.padding));
        }

        if self.columns != self.texture_size / self.cell_width {
            return Err(format!(
                "{} columns of {}px cells in a {}px atlas",
                self.columns, self.cell_width, self.texture_size
            ));
        }

        if self.rows <= 0 || self.rows > self.texture_size / self.cell_height {
            return Err(format!(
                "{} rows of {}px cells in a {}px atlas",
                self.rows, self.cell_height, self.texture_size
            ));
        }

        Ok(())
    }

    fn fit(
        texture_size: i32,
        cell_width: i32,
        cell_height: i32,
        padding: Padding,
        glyph_count: usize,
    ) -> Option<Self> {
        let columns = texture_size / cell_width;
        if columns == 0 {
            return None;
        }

        let rows = (glyph_count as i32 + columns - 1) / columns;
        if rows * cell_height > texture_size {
            return None;
        }

        Some(Self { texture_size, cell_width, cell_height, columns, rows, padding })
    }

    /// Top-left pixel of the cell assigned to `slot`.
    pub fn cell_origin(&self, slot: usize) -> (i32, i32) {
        let slot = slot as i32;
        let col = slot % self.columns;
        let row = slot / self.columns;
        (col * self.cell_width, row * self.cell_height)
    }

    /// Top-left pixel of the glyph's line box within its cell.
    pub fn glyph_origin(&self, slot: usize) -> (i32, i32) {
        let (x, y) = self.cell_origin(slot);
        (x + self.padding.x, y + self.padding.y)
    }

    /// Texture region covering the cell assigned to `slot`.
    pub fn cell_region(&self, slot: usize) -> TextureRegion {
        let (x, y) = self.cell_origin(slot);
        let size = self.texture_size as f32;
        TextureRegion::new(
            size,
            size,
            x as f32,
            y as f32,
            self.cell_width as f32,
            self.cell_height as f32,
        )
    }

    /// Number of cells the grid can hold.
    pub fn capacity(&self) -> usize {
        (self.columns * (self.texture_size / self.cell_height)) as usize
    }

    /// Size of the single-channel bitmap backing the atlas, in bytes.
    pub fn bitmap_len(&self) -> usize {
        let size = self.texture_size.max(0) as usize;
        size * size
    }
}
