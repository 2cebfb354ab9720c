mod batch_target;
mod buffer;
mod context;
mod program;
mod renderer;
mod texture;

use gltext_data::MAX_BATCH_SPRITES;

pub use batch_target::GlBatchTarget;
pub use buffer::*;
pub use context::{GlState, ALPHA_BLEND};
pub use program::{with_defines, AttribBinding, ShaderProgram};
pub use renderer::*;
pub use texture::Texture;

pub(crate) type GL = web_sys::WebGl2RenderingContext;

const BATCH_TEXT_VERTEX_GLSL: &str = include_str!("../shaders/batch_text.vert");
pub(crate) const BATCH_TEXT_FRAGMENT_GLSL: &str = include_str!("../shaders/batch_text.frag");
pub(crate) const BACKGROUND_VERTEX_GLSL: &str = include_str!("../shaders/background.vert");
pub(crate) const BACKGROUND_FRAGMENT_GLSL: &str = include_str!("../shaders/background.frag");

/// Attribute bindings shared by every program that reads sprite vertices.
pub(crate) const SPRITE_ATTRIBUTES: &[AttribBinding] = &[
    AttribBinding::new(POSITION_LOCATION, "a_Position"),
    AttribBinding::new(TEX_COORD_LOCATION, "a_TexCoordinate"),
    AttribBinding::new(TRANSFORM_INDEX_LOCATION, "a_MVPMatrixIndex"),
];

/// Batched-text vertex shader with its transform array sized to the batch capacity.
pub(crate) fn batch_vertex_shader() -> String {
    with_defines(BATCH_TEXT_VERTEX_GLSL, &[("MAX_SPRITES", MAX_BATCH_SPRITES.to_string())])
}
