use crate::gl::GL;

/// Blend factors used for straight-alpha text and images.
pub const ALPHA_BLEND: (u32, u32) = (GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

/// Caches WebGL state to skip redundant state changes
#[derive(Debug)]
pub struct GlState {
    // [x, y, width, height]
    viewport: [i32; 4],
    clear_color: [f32; 4],
    blend_enabled: bool,
    // (src_factor, dst_factor)
    blend_func: (u32, u32),
}

impl Default for GlState {
    fn default() -> Self {
        Self {
            viewport: [0, 0, 0, 0],
            clear_color: [0.0, 0.0, 0.0, 0.0],
            blend_enabled: false,
            blend_func: (GL::ONE, GL::ZERO),
        }
    }
}

impl GlState {
    /// State matching a freshly created WebGL context
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&mut self, gl: &GL, x: i32, y: i32, width: i32, height: i32) -> &mut Self {
        let new_viewport = [x, y, width, height];
        if self.viewport != new_viewport {
            gl.viewport(x, y, width, height);
            self.viewport = new_viewport;
        }
        self
    }

    pub fn clear_color(&mut self, gl: &GL, r: f32, g: f32, b: f32, a: f32) -> &mut Self {
        let new_color = [r, g, b, a];
        if self.clear_color != new_color {
            gl.clear_color(r, g, b, a);
            self.clear_color = new_color;
        }
        self
    }

    /// Enables blending with the given factors, or disables it when `func` is `None`.
    pub fn blend(&mut self, gl: &GL, func: Option<(u32, u32)>) -> &mut Self {
        match func {
            Some((src, dst)) => {
                self.set_blend_enabled(gl, true);
                if self.blend_func != (src, dst) {
                    gl.blend_func(src, dst);
                    self.blend_func = (src, dst);
                }
            },
            None => self.set_blend_enabled(gl, false),
        }
        self
    }

    fn set_blend_enabled(&mut self, gl: &GL, enable: bool) {
        if self.blend_enabled == enable {
            return;
        }

        if enable {
            gl.enable(GL::BLEND);
        } else {
            gl.disable(GL::BLEND);
        }
        self.blend_enabled = enable;
    }
}
