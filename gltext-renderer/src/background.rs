use image::{ImageFormat, Rgba, RgbaImage};
use web_sys::{console, WebGlUniformLocation};

use crate::{
    error::Error,
    gl::{
        Drawable, PrimitiveKind, RenderContext, ShaderProgram, Texture, VertexBuffers,
        BACKGROUND_FRAGMENT_GLSL, BACKGROUND_VERTEX_GLSL, GL, SPRITE_ATTRIBUTES,
        TEXTURED_LAYOUT,
    },
};

/// Unit quad spanning `-1..1` on both axes, `(x, y, u, v)` per vertex, with
/// the image's top row at `y = 1`.
#[rustfmt::skip]
const QUAD_VERTICES: [f32; 16] = [
    -1.0,  1.0,   0.0, 0.0,
    -1.0, -1.0,   0.0, 1.0,
     1.0, -1.0,   1.0, 1.0,
     1.0,  1.0,   1.0, 0.0,
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// A textured quad drawn behind the text.
#[derive(Debug)]
pub struct BackgroundImage {
    quad: QuadProgram,
    texture: Texture,
}

/// The quad's program, uniforms and uploaded geometry.
#[derive(Debug)]
struct QuadProgram {
    program: ShaderProgram,
    buffers: VertexBuffers,
    mvp_location: WebGlUniformLocation,
    sampler_location: WebGlUniformLocation,
}

impl BackgroundImage {
    /// Decodes a PNG and uses it as the background.
    pub fn from_encoded(gl: &GL, bytes: &[u8]) -> Result<Self, Error> {
        let image = decode_png(bytes).inspect_err(|e| console::error_1(&e.to_string().into()))?;
        Self::from_image(gl, &image)
    }

    pub fn from_image(gl: &GL, image: &RgbaImage) -> Result<Self, Error> {
        let (width, height) = image.dimensions();
        let mut texture = Texture::from_rgba(gl, width as i32, height as i32, image.as_raw())?;

        match QuadProgram::create(gl) {
            Ok(quad) => Ok(Self { quad, texture }),
            Err(e) => {
                texture.release(gl);
                Err(e)
            },
        }
    }

    /// Frees the texture, the buffers and the program. Calling it again does nothing.
    pub fn clean_up(&mut self, gl: &GL) {
        self.texture.release(gl);
        self.quad.buffers.release(gl);
        self.quad.program.release(gl);
    }
}

impl QuadProgram {
    fn create(gl: &GL) -> Result<Self, Error> {
        // position and texture coordinate only
        let mut program = ShaderProgram::create(
            gl,
            BACKGROUND_VERTEX_GLSL,
            BACKGROUND_FRAGMENT_GLSL,
            &SPRITE_ATTRIBUTES[..2],
        )?;

        match Self::upload_quad(gl, &program) {
            Ok((buffers, mvp_location, sampler_location)) => {
                Ok(Self { program, buffers, mvp_location, sampler_location })
            },
            Err(e) => {
                program.release(gl);
                Err(e)
            },
        }
    }

    fn upload_quad(
        gl: &GL,
        program: &ShaderProgram,
    ) -> Result<(VertexBuffers, WebGlUniformLocation, WebGlUniformLocation), Error> {
        let mvp_location = program.uniform_location(gl, "u_MVPMatrix")?;
        let sampler_location = program.uniform_location(gl, "u_Texture")?;

        let mut buffers = VertexBuffers::configure_with_layout(
            gl,
            QUAD_VERTICES.len() / 4,
            QUAD_INDICES.len(),
            TEXTURED_LAYOUT,
        )?;
        buffers.set_vertices(&QUAD_VERTICES);
        buffers.set_indices(&QUAD_INDICES);
        buffers.bind(gl);
        buffers.unbind(gl);

        Ok((buffers, mvp_location, sampler_location))
    }
}

impl Drawable for BackgroundImage {
    fn prepare(&self, context: &mut RenderContext) {
        let (gl, quad) = (context.gl, &self.quad);

        quad.program.use_program(gl);
        quad.buffers.activate(gl);

        self.texture.bind(gl, 0);
        gl.uniform1i(Some(&quad.sampler_location), 0);
        gl.uniform_matrix4fv_with_f32_array(
            Some(&quad.mvp_location),
            false,
            context.view_projection.as_slice(),
        );
    }

    fn draw(&self, context: &mut RenderContext) {
        self.quad.buffers.draw(context.gl, PrimitiveKind::Triangles, 0, QUAD_INDICES.len());
    }

    fn cleanup(&self, context: &mut RenderContext) {
        self.quad.buffers.unbind(context.gl);
    }
}

fn decode_png(bytes: &[u8]) -> Result<RgbaImage, Error> {
    image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map(image::DynamicImage::into_rgba8)
        .map_err(|e| Error::image_load_failed(&e.to_string()))
}

/// Vertical gray gradient, light at the top and darker towards the bottom.
pub fn gray_gradient(width: u32, height: u32) -> RgbaImage {
    const TOP: f32 = 0xe0 as f32;
    const BOTTOM: f32 = 0x90 as f32;

    RgbaImage::from_fn(width, height, |_, y| {
        let t = if height > 1 { y as f32 / (height - 1) as f32 } else { 0.0 };
        let level = (TOP + (BOTTOM - TOP) * t).round() as u8;
        Rgba([level, level, level, 0xff])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_runs_top_to_bottom() {
        let image = gray_gradient(4, 64);

        assert_eq!(image.dimensions(), (4, 64));
        assert_eq!(image.get_pixel(0, 0), &Rgba([0xe0, 0xe0, 0xe0, 0xff]));
        assert_eq!(image.get_pixel(3, 63), &Rgba([0x90, 0x90, 0x90, 0xff]));

        let levels: Vec<u8> = (0..64).map(|y| image.get_pixel(0, y).0[0]).collect();
        assert!(levels.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_single_row_gradient() {
        assert_eq!(gray_gradient(2, 1).get_pixel(1, 0), &Rgba([0xe0, 0xe0, 0xe0, 0xff]));
    }

    #[test]
    fn test_png_decodes_to_rgba() {
        let mut png = std::io::Cursor::new(Vec::new());
        gray_gradient(3, 5).write_to(&mut png, ImageFormat::Png).unwrap();

        let decoded = decode_png(png.get_ref()).unwrap();
        assert_eq!(decoded, gray_gradient(3, 5));
    }

    #[test]
    fn test_undecodable_image_is_a_data_error() {
        let result = decode_png(b"not a png");
        assert!(matches!(result, Err(Error::Data(msg)) if msg.starts_with("Failed to load image")));
    }

    #[test]
    fn test_quad_texture_is_upright() {
        // vertex 0 is the top-left corner and samples the image's first row
        assert_eq!(&QUAD_VERTICES[..4], &[-1.0, 1.0, 0.0, 0.0]);
        assert_eq!(&QUAD_VERTICES[4..8], &[-1.0, -1.0, 0.0, 1.0]);
    }
}
