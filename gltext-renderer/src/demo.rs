use gltext_atlas::CosmicRasterizer;
use gltext_data::Padding;
use wasm_bindgen::prelude::*;
use web_sys::console;
use web_time::Instant;

use crate::{
    background::{gray_gradient, BackgroundImage},
    error::Error,
    font_renderer::FontRenderer,
    gl::{Renderer, GL},
    mat4::Mat4,
    text::{Color, Rotation},
};

const FONT_A_SIZE: f32 = 24.0;
const FONT_B_SIZE: f32 = 40.0;
const FONT_PADDING: Padding = Padding::new(2, 2);

/// Degrees per second of the rotating string.
const ROTATION_SPEED: f32 = 30.0;

const BACKGROUND_SIZE: (u32, u32) = (256, 256);

/// The two view-projection matrices of the demo scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projections {
    /// Maps the `-1..1` background quad, viewed from `z = 3`.
    pub background: Mat4,
    /// Pixel-scaled space with the origin at the centre of the canvas.
    pub text: Mat4,
}

impl Projections {
    pub fn new(width: f32, height: f32) -> Self {
        let aspect = width / height;

        let background = Mat4::new_orthographic(-aspect, aspect, -1.0, 1.0, 3.0, 7.0)
            .mul(&Mat4::look_at([0.0, 0.0, 3.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]));

        let projection = if width > height {
            Mat4::new_frustum(-aspect, aspect, -1.0, 1.0, 1.0, 10.0)
        } else {
            Mat4::new_frustum(-1.0, 1.0, -1.0 / aspect, 1.0 / aspect, 1.0, 10.0)
        };
        let ext = width.min(height) / 2.0;
        let view = Mat4::new_orthographic(-ext, ext, -ext, ext, 0.1, 100.0);

        Self { background, text: projection.mul(&view) }
    }
}

/// Advances the rotating string's angle by `elapsed` seconds, wrapped to `0..360`.
pub fn advance_rotation(rotation: f32, elapsed: f32) -> f32 {
    (rotation + elapsed * ROTATION_SPEED).rem_euclid(360.0)
}

/// The text demo: a background image, the atlas debug view and a few static,
/// 3D and rotating strings in two font sizes.
#[wasm_bindgen]
#[derive(Debug)]
pub struct DemoApp {
    renderer: Renderer,
    background: BackgroundImage,
    font_a: FontRenderer,
    font_b: FontRenderer,
    projections: Projections,
    rotation: f32,
    last_frame: Instant,
}

#[wasm_bindgen]
impl DemoApp {
    /// Creates the demo on the canvas matching `canvas_id`. `font_a` is used at
    /// 24px; `font_b`, at 40px, defaults to `font_a`. `background` is a PNG drawn
    /// behind the text, a gray gradient when absent.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        font_a: Vec<u8>,
        font_b: Option<Vec<u8>>,
        background: Option<Vec<u8>>,
    ) -> Result<DemoApp, JsValue> {
        console_error_panic_hook::set_once();

        let font_b = font_b.unwrap_or_else(|| font_a.clone());
        Ok(Self::create(canvas_id, font_a, font_b, background.as_deref())?)
    }

    /// Draws one frame; call from `requestAnimationFrame`.
    #[wasm_bindgen(js_name = renderFrame)]
    pub fn render_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.rotation = advance_rotation(self.rotation, elapsed);

        self.renderer.begin_frame();
        self.renderer.render(&self.background, &self.projections.background);

        let gl = self.renderer.gl();
        let (width, height) = self.renderer.canvas_size();
        let vp = self.projections.text;

        let font_a = &mut self.font_a;
        font_a.draw_texture(gl, (width / 2) as f32, (height / 2) as f32, &vp);

        font_a.begin(gl, Color::WHITE, &vp);
        font_a.draw_rotated("Diagonal 1", -40.0, 40.0, 40.0);
        font_a.draw_rotated("Column 1", -100.0, 100.0, 90.0);
        font_a.end();

        font_a.begin(gl, Color::BLUE, &vp);
        font_a.draw("More Lines...", 100.0, 200.0);
        font_a.draw_rotated("The End.", 50.0, 200.0 + font_a.char_height(), 180.0);
        font_a.end();

        let font_b = &mut self.font_b;
        font_b.begin(gl, Color::GREEN, &vp);
        font_b.draw_centered_transformed(
            "Test String 3D!",
            (0.0, 0.0, 10.0),
            Rotation::new(0.0, -30.0, 0.0),
        );
        font_b.draw("More Lines...", -100.0, -200.0);
        font_b.draw_rotated("The End.", -150.0, -200.0 + font_b.char_height(), 180.0);
        font_b.end();

        font_b.begin(gl, Color::RED, &vp);
        font_b.draw_centered_rotated("Rotating Text", -50.0, -250.0, self.rotation);
        font_b.end();

        self.renderer.end_frame();
    }

    /// Resizes the canvas and rebuilds the projections.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.renderer.resize(width, height);
        self.projections = Projections::new(width as f32, height as f32);
    }

    /// Releases every GPU resource. The demo draws nothing afterwards.
    #[wasm_bindgen(js_name = cleanUp)]
    pub fn clean_up(&mut self) {
        let gl = self.renderer.gl();
        self.font_a.clean_up(gl);
        self.font_b.clean_up(gl);
        self.background.clean_up(gl);
    }
}

impl DemoApp {
    fn create(
        canvas_id: &str,
        font_a: Vec<u8>,
        font_b: Vec<u8>,
        background: Option<&[u8]>,
    ) -> Result<Self, Error> {
        let renderer = Renderer::create(canvas_id)?.clear_color(Color::WHITE);
        let gl = renderer.gl();

        let mut font_a = load_font(gl, font_a, FONT_A_SIZE)?;
        let mut font_b = match load_font(gl, font_b, FONT_B_SIZE) {
            Ok(font) => font,
            Err(e) => {
                font_a.clean_up(gl);
                return Err(e);
            },
        };

        let background = match load_background(gl, background) {
            Ok(background) => background,
            Err(e) => {
                font_a.clean_up(gl);
                font_b.clean_up(gl);
                return Err(e);
            },
        };

        let (width, height) = renderer.canvas_size();
        console::log_1(
            &format!(
                "demo ready: {width}x{height} canvas, fonts '{}' and '{}'",
                font_a.font_name(),
                font_b.font_name()
            )
            .into(),
        );

        Ok(Self {
            renderer,
            background,
            font_a,
            font_b,
            projections: Projections::new(width as f32, height as f32),
            rotation: 0.0,
            last_frame: Instant::now(),
        })
    }
}

fn load_background(gl: &GL, png: Option<&[u8]>) -> Result<BackgroundImage, Error> {
    match png {
        Some(bytes) => BackgroundImage::from_encoded(gl, bytes),
        None => {
            let (width, height) = BACKGROUND_SIZE;
            BackgroundImage::from_image(gl, &gray_gradient(width, height))
        },
    }
}

fn load_font(gl: &GL, data: Vec<u8>, size: f32) -> Result<FontRenderer, Error> {
    let mut rasterizer = CosmicRasterizer::from_font_data(data, size)?;
    FontRenderer::load(gl, &mut rasterizer, FONT_PADDING)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ndc(m: &Mat4, x: f32, y: f32, z: f32) -> (f32, f32) {
        let p = m.transform_point(x, y, z);
        (p[0] / p[3], p[1] / p[3])
    }

    #[test]
    fn test_text_origin_is_screen_centre() {
        let projections = Projections::new(800.0, 600.0);

        let (x, y) = ndc(&projections.text, 0.0, 0.0, 0.0);
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6, "({x}, {y})");
    }

    #[test]
    fn test_shorter_axis_has_the_same_scale_in_both_orientations() {
        let landscape = Projections::new(800.0, 600.0);
        let portrait = Projections::new(600.0, 800.0);

        let (_, y) = ndc(&landscape.text, 0.0, 300.0, 0.0);
        let (x, _) = ndc(&portrait.text, 300.0, 0.0, 0.0);

        assert!((x - y).abs() < 1e-5, "{x} != {y}");
        // the edge of the shorter axis lands just inside the viewport
        assert!(x > 0.99 && x <= 1.0, "{x}");
    }

    #[test]
    fn test_background_quad_fills_the_height() {
        let projections = Projections::new(800.0, 600.0);
        let aspect = 800.0 / 600.0;

        let (x, y) = ndc(&projections.background, aspect, 1.0, 0.0);
        assert!((x - 1.0).abs() < 1e-5 && (y - 1.0).abs() < 1e-5, "({x}, {y})");
    }

    #[test]
    fn test_rotation_advances_thirty_degrees_per_second() {
        assert_eq!(advance_rotation(0.0, 1.0), 30.0);
        assert_eq!(advance_rotation(10.0, 0.5), 25.0);
        assert!((advance_rotation(350.0, 1.0) - 20.0).abs() < 1e-4);
    }
}
