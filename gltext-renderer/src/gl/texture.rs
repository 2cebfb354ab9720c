use web_sys::WebGlTexture;

use crate::{error::Error, gl::GL};

/// A 2D texture with linear filtering and clamped edges.
#[derive(Debug)]
pub struct Texture {
    gl_texture: Option<WebGlTexture>,
}

impl Texture {
    /// Uploads a tightly packed single-channel bitmap; samplers read it as
    /// `(0, 0, 0, alpha)`.
    pub fn from_alpha_bitmap(gl: &GL, width: i32, height: i32, pixels: &[u8]) -> Result<Self, Error> {
        Self::upload(gl, width, height, GL::ALPHA, 1, pixels)
    }

    pub fn from_rgba(gl: &GL, width: i32, height: i32, pixels: &[u8]) -> Result<Self, Error> {
        Self::upload(gl, width, height, GL::RGBA, 4, pixels)
    }

    fn upload(
        gl: &GL,
        width: i32,
        height: i32,
        format: u32,
        bytes_per_pixel: usize,
        pixels: &[u8],
    ) -> Result<Self, Error> {
        let expected = width.max(0) as usize * height.max(0) as usize * bytes_per_pixel;
        if width <= 0 || height <= 0 || pixels.len() != expected {
            return Err(Error::Resource(format!(
                "texture data of {} bytes does not match {width}x{height}",
                pixels.len()
            )));
        }

        let gl_texture = gl.create_texture().ok_or(Error::texture_creation_failed())?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&gl_texture));

        // single-channel rows are not 4-byte aligned
        gl.pixel_storei(GL::UNPACK_ALIGNMENT, 1);

        #[rustfmt::skip]
        let uploaded = gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0, // level
            format as i32,
            width, height,
            0, // border
            format,
            GL::UNSIGNED_BYTE,
            Some(pixels),
        );
        if uploaded.is_err() {
            gl.delete_texture(Some(&gl_texture));
            return Err(Error::texture_creation_failed());
        }

        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
        gl.bind_texture(GL::TEXTURE_2D, None);

        Ok(Self { gl_texture: Some(gl_texture) })
    }

    pub fn bind(&self, gl: &GL, texture_unit: u32) {
        gl.active_texture(GL::TEXTURE0 + texture_unit);
        gl.bind_texture(GL::TEXTURE_2D, self.gl_texture.as_ref());
    }

    /// Deletes the GPU texture. Calling it again does nothing.
    pub fn release(&mut self, gl: &GL) {
        if let Some(texture) = self.gl_texture.take() {
            gl.delete_texture(Some(&texture));
        }
    }
}
