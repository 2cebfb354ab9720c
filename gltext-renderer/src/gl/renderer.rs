use web_sys::HtmlCanvasElement;

use crate::{
    error::Error,
    gl::{context::GlState, ALPHA_BLEND, GL},
    js,
    mat4::Mat4,
    text::Color,
};

/// Rendering context handed to a [`Drawable`] for one render call.
pub struct RenderContext<'a> {
    pub gl: &'a GL,
    pub state: &'a mut GlState,
    pub view_projection: &'a Mat4,
}

/// Owns the canvas and its WebGL2 context.
///
/// Alpha blending (`SRC_ALPHA`, `ONE_MINUS_SRC_ALPHA`) is enabled for the
/// lifetime of the renderer, so glyph coverage composites over earlier draws.
#[derive(Debug)]
pub struct Renderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    state: GlState,
    clear_color: Color,
}

impl Renderer {
    /// Creates a new renderer by querying for a canvas element with the given ID.
    ///
    /// # Parameters
    /// * `canvas_id` - CSS selector for the canvas element (e.g., "canvas" or "#my-canvas")
    ///
    /// # Errors
    /// * `Error::Initialization` - Canvas element not found, or WebGL2 unavailable
    pub fn create(canvas_id: &str) -> Result<Self, Error> {
        let canvas = js::get_canvas_by_id(canvas_id)?;
        Self::create_with_canvas(canvas)
    }

    /// Creates a new renderer from an existing HTML canvas element.
    pub fn create_with_canvas(canvas: HtmlCanvasElement) -> Result<Self, Error> {
        let (width, height) = (canvas.width(), canvas.height());

        // initialize WebGL context
        let gl = js::get_webgl2_context(&canvas)?;
        let mut state = GlState::new();
        state.blend(&gl, Some(ALPHA_BLEND));

        let mut renderer = Self { gl, canvas, state, clear_color: Color::WHITE };
        renderer.resize(width as _, height as _);
        Ok(renderer)
    }

    /// Sets the color each frame starts from.
    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Resizes the canvas and updates the viewport to match.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        self.state.viewport(&self.gl, 0, 0, width, height);
    }

    /// Clears the color and depth buffers.
    pub fn clear(&mut self, color: Color) {
        self.state.clear_color(&self.gl, color.r, color.g, color.b, color.a);
        self.gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
    }

    /// Begins a new rendering frame.
    pub fn begin_frame(&mut self) {
        self.clear(self.clear_color);
    }

    /// Renders a drawable object under `view_projection`.
    ///
    /// Calls the drawable's prepare, draw, and cleanup methods in sequence.
    pub fn render(&mut self, drawable: &impl Drawable, view_projection: &Mat4) {
        let mut context =
            RenderContext { gl: &self.gl, state: &mut self.state, view_projection };

        drawable.prepare(&mut context);
        drawable.draw(&mut context);
        drawable.cleanup(&mut context);
    }

    /// Ends the current rendering frame.
    ///
    /// The browser presents the canvas once the animation frame callback
    /// returns, so there is nothing to swap.
    pub fn end_frame(&mut self) {
        self.gl.flush();
    }

    pub fn gl(&self) -> &GL {
        &self.gl
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Returns the current canvas dimensions as (width, height) in pixels
    pub fn canvas_size(&self) -> (i32, i32) {
        (self.canvas.width() as i32, self.canvas.height() as i32)
    }
}

/// Something the renderer can draw with a single view-projection matrix.
pub trait Drawable {
    /// Binds programs, textures and vertex data, and uploads uniforms.
    fn prepare(&self, context: &mut RenderContext);

    /// Issues the draw calls.
    fn draw(&self, context: &mut RenderContext);

    /// Unbinds whatever `prepare` bound.
    fn cleanup(&self, context: &mut RenderContext);
}
