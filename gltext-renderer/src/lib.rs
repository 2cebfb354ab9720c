//! WebGL2 text rendering from bitmap font atlases.
//!
//! Strings are turned into one textured quad per character and drawn through a
//! [`SpriteBatch`], which packs up to [`MAX_BATCH_SPRITES`] independently
//! transformed quads into a single draw call. [`FontRenderer`] is the entry
//! point; [`DemoApp`] is the browser demo built on it.

mod background;
mod demo;
mod error;
mod font_renderer;
mod mat4;
mod sprite_batch;
mod text;

pub(crate) mod js;

pub mod gl;

pub use gltext_data::{FontAtlasData, Padding, TextureRegion, MAX_BATCH_SPRITES};

pub use crate::{
    background::{gray_gradient, BackgroundImage},
    demo::{advance_rotation, DemoApp, Projections},
    error::Error,
    font_renderer::FontRenderer,
    gl::{Drawable, Renderer},
    mat4::Mat4,
    sprite_batch::{quad_indices, BatchData, BatchTarget, SpriteBatch},
    text::{Color, Rotation, TextLayout},
};
