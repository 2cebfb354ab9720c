//! Builds bitmap font atlases: a single square alpha texture holding one cell per
//! printable ASCII character plus a missing-glyph cell, together with the glyph
//! metrics needed to lay out text with it.

mod builder;
mod canvas;
mod error;
mod font_discovery;
mod rasterizer;

pub use builder::AtlasBuilder;
pub use canvas::{AlphaCanvas, CellCanvas};
pub use error::AtlasError;
pub use font_discovery::{FontDiscovery, FontFamily};
pub use rasterizer::{CosmicRasterizer, GlyphRasterizer};
