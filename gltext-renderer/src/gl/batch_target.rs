use gltext_data::vertex::VERTICES_PER_SPRITE;
use web_sys::WebGlUniformLocation;

use crate::{
    error::Error,
    gl::{PrimitiveKind, VertexBuffers, GL},
    sprite_batch::{quad_indices, BatchData, BatchTarget},
};

/// Draws flushed sprite batches with one indexed call each, uploading the
/// batch's transforms into the `u_MVPMatrix` array uniform.
///
/// The batched-text program must be current while the batch flushes.
#[derive(Debug)]
pub struct GlBatchTarget {
    gl: GL,
    buffers: VertexBuffers,
    mvp_location: WebGlUniformLocation,
}

impl GlBatchTarget {
    pub fn new(
        gl: &GL,
        max_sprites: usize,
        mvp_location: WebGlUniformLocation,
    ) -> Result<Self, Error> {
        let max_indices = quad_indices(max_sprites).len();
        let buffers =
            VertexBuffers::configure(gl, max_sprites * VERTICES_PER_SPRITE, max_indices)?;

        Ok(Self { gl: gl.clone(), buffers, mvp_location })
    }

    pub fn release(&mut self) {
        self.buffers.release(&self.gl);
    }
}

impl BatchTarget for GlBatchTarget {
    fn upload_indices(&mut self, indices: &[u16]) {
        self.buffers.set_indices(indices);
    }

    fn draw_batch(&mut self, batch: &BatchData<'_>) {
        let gl = &self.gl;

        // array length sets the uniform count
        gl.uniform_matrix4fv_with_f32_array(Some(&self.mvp_location), false, batch.transforms);

        self.buffers.set_vertices(batch.vertices);
        self.buffers.bind(gl);
        self.buffers.draw(gl, PrimitiveKind::Triangles, 0, batch.index_count());
        self.buffers.unbind(gl);
    }
}
