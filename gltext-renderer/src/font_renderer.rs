use gltext_atlas::{AtlasBuilder, GlyphRasterizer};
use gltext_data::{FontAtlasData, Padding, MAX_BATCH_SPRITES};
use web_sys::{console, WebGlUniformLocation};

use crate::{
    error::Error,
    gl::{
        batch_vertex_shader, GlBatchTarget, ShaderProgram, Texture, BATCH_TEXT_FRAGMENT_GLSL,
        GL, SPRITE_ATTRIBUTES,
    },
    mat4::Mat4,
    sprite_batch::SpriteBatch,
    text::{Color, Rotation, TextLayout},
};

/// Draws strings from one bitmap font atlas.
///
/// Every string between [`begin`](Self::begin) and [`end`](Self::end) shares
/// the tint, the atlas texture and the view-projection matrix, and is batched
/// into as few draw calls as the batch capacity allows. Positions are the
/// bottom-left corner of the string's line box, descent included.
///
/// GPU resources are freed by [`clean_up`](Self::clean_up), never on drop.
#[derive(Debug)]
pub struct FontRenderer {
    font_name: String,
    layout: TextLayout,
    texture: Texture,
    program: ShaderProgram,
    color_location: WebGlUniformLocation,
    texture_location: WebGlUniformLocation,
    batch: SpriteBatch<GlBatchTarget>,
}

impl FontRenderer {
    /// Builds the atlas for the rasterizer's font and uploads it.
    ///
    /// Fails without creating any GPU resource when the font cannot be laid
    /// out in a supported atlas.
    pub fn load(
        gl: &GL,
        rasterizer: &mut impl GlyphRasterizer,
        padding: Padding,
    ) -> Result<Self, Error> {
        let atlas = AtlasBuilder::new(padding).build(rasterizer)?;
        Self::from_atlas(gl, atlas)
    }

    /// Uploads a prebuilt atlas, e.g. one read with [`FontAtlasData::from_binary`].
    pub fn from_atlas(gl: &GL, atlas: FontAtlasData) -> Result<Self, Error> {
        atlas.validate().map_err(Error::Data)?;

        let mut program = ShaderProgram::create(
            gl,
            &batch_vertex_shader(),
            BATCH_TEXT_FRAGMENT_GLSL,
            SPRITE_ATTRIBUTES,
        )?;

        match Self::upload(gl, &atlas, &program) {
            Ok((texture, color_location, texture_location, batch)) => {
                let size = atlas.texture_size();
                let (cell_w, cell_h) = atlas.cell_size();
                console::log_1(
                    &format!(
                        "font atlas: {} @ {}px, {size}x{size} texture, {cell_w}x{cell_h} cells",
                        atlas.font_name, atlas.font_size
                    )
                    .into(),
                );

                Ok(Self {
                    font_name: atlas.font_name.to_string(),
                    layout: TextLayout::new(&atlas),
                    texture,
                    program,
                    color_location,
                    texture_location,
                    batch,
                })
            },
            Err(e) => {
                program.release(gl);
                Err(e)
            },
        }
    }

    #[allow(clippy::type_complexity)]
    fn upload(
        gl: &GL,
        atlas: &FontAtlasData,
        program: &ShaderProgram,
    ) -> Result<
        (Texture, WebGlUniformLocation, WebGlUniformLocation, SpriteBatch<GlBatchTarget>),
        Error,
    > {
        let mvp_location = program.uniform_location(gl, "u_MVPMatrix")?;
        let color_location = program.uniform_location(gl, "u_Color")?;
        let texture_location = program.uniform_location(gl, "u_Texture")?;

        let size = atlas.texture_size();
        let mut texture = Texture::from_alpha_bitmap(gl, size, size, &atlas.texture_data)?;

        let target = match GlBatchTarget::new(gl, MAX_BATCH_SPRITES, mvp_location) {
            Ok(target) => target,
            Err(e) => {
                texture.release(gl);
                return Err(e);
            },
        };

        // the index pattern is queued here and uploaded with the first batch
        let batch = SpriteBatch::new(MAX_BATCH_SPRITES, target);

        Ok((texture, color_location, texture_location, batch))
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn layout(&self) -> &TextLayout {
        &self.layout
    }

    /// Starts a batch tinted with `color`. Color and texture are bound once here,
    /// not per glyph.
    pub fn begin(&mut self, gl: &GL, color: Color, view_projection: &Mat4) {
        self.program.use_program(gl);
        gl.uniform4f(Some(&self.color_location), color.r, color.g, color.b, color.a);

        self.texture.bind(gl, 0);
        gl.uniform1i(Some(&self.texture_location), 0);

        self.batch.begin_batch(view_projection);
    }

    /// Draws whatever is still pending.
    pub fn end(&mut self) {
        self.batch.end_batch();
    }

    pub fn draw(&mut self, text: &str, x: f32, y: f32) {
        self.draw_transformed(text, (x, y, 0.0), Rotation::default());
    }

    /// Draws `text` rotated by `angle_z` degrees around its anchor.
    pub fn draw_rotated(&mut self, text: &str, x: f32, y: f32, angle_z: f32) {
        self.draw_transformed(text, (x, y, 0.0), Rotation::z(angle_z));
    }

    pub fn draw_transformed(&mut self, text: &str, position: (f32, f32, f32), rotation: Rotation) {
        self.layout.submit(&mut self.batch, text, position, rotation);
    }

    /// Draws `text` centred on `(x, y)`, returning its length.
    pub fn draw_centered(&mut self, text: &str, x: f32, y: f32) -> f32 {
        self.draw_centered_transformed(text, (x, y, 0.0), Rotation::default())
    }

    pub fn draw_centered_rotated(&mut self, text: &str, x: f32, y: f32, angle_z: f32) -> f32 {
        self.draw_centered_transformed(text, (x, y, 0.0), Rotation::z(angle_z))
    }

    pub fn draw_centered_transformed(
        &mut self,
        text: &str,
        (x, y, z): (f32, f32, f32),
        rotation: Rotation,
    ) -> f32 {
        let (origin_x, origin_y) = self.layout.centered_origin(text, x, y);
        self.layout.submit(&mut self.batch, text, (origin_x, origin_y, z), rotation);

        self.layout.length(text)
    }

    /// Centres `text` horizontally on `x`, returning its length.
    pub fn draw_centered_x(&mut self, text: &str, x: f32, y: f32) -> f32 {
        let length = self.layout.length(text);
        self.draw(text, x - length / 2.0, y);

        length
    }

    /// Centres `text` vertically on `y`.
    pub fn draw_centered_y(&mut self, text: &str, x: f32, y: f32) {
        let char_height = self.layout.char_height();
        self.draw(text, x, y - char_height / 2.0);
    }

    /// Draws the whole atlas texture with its top-right corner at
    /// `(width, height)`, as a debug view.
    pub fn draw_texture(&mut self, gl: &GL, width: f32, height: f32, view_projection: &Mat4) {
        self.begin(gl, Color::WHITE, view_projection);
        self.layout.submit_atlas(&mut self.batch, width, height);
        self.end();
    }

    pub fn length(&self, text: &str) -> f32 {
        self.layout.length(text)
    }

    pub fn char_width(&self, ch: char) -> f32 {
        self.layout.char_width(ch)
    }

    pub fn char_width_max(&self) -> f32 {
        self.layout.char_width_max()
    }

    pub fn char_height(&self) -> f32 {
        self.layout.char_height()
    }

    pub fn ascent(&self) -> f32 {
        self.layout.ascent()
    }

    pub fn descent(&self) -> f32 {
        self.layout.descent()
    }

    pub fn height(&self) -> f32 {
        self.layout.height()
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.layout.set_scale(scale);
    }

    pub fn set_scale_xy(&mut self, sx: f32, sy: f32) {
        self.layout.set_scale_xy(sx, sy);
    }

    pub fn scale_x(&self) -> f32 {
        self.layout.scale_x()
    }

    pub fn scale_y(&self) -> f32 {
        self.layout.scale_y()
    }

    pub fn set_space(&mut self, space: f32) {
        self.layout.set_space(space);
    }

    pub fn space(&self) -> f32 {
        self.layout.space()
    }

    /// Releases the texture, the shader program and the batch buffers.
    /// Calling it again does nothing.
    pub fn clean_up(&mut self, gl: &GL) {
        self.texture.release(gl);
        self.program.release(gl);
        self.batch.target_mut().release();
    }
}
