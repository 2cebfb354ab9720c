use gltext_data::{
    vertex::{INDICES_PER_SPRITE, VERTEX_SIZE, VERTICES_PER_SPRITE},
    TextureRegion, MAX_BATCH_SPRITES,
};

use crate::mat4::Mat4;

/// Receives the output of a [`SpriteBatch`].
///
/// The GPU implementation uploads and draws; tests record.
pub trait BatchTarget {
    /// Called once, when the batch is created, with the index pattern of every
    /// sprite slot.
    fn upload_indices(&mut self, indices: &[u16]);

    /// Draws one full or partial batch.
    fn draw_batch(&mut self, batch: &BatchData<'_>);
}

/// The accumulated contents of a batch at flush time.
#[derive(Debug)]
pub struct BatchData<'a> {
    /// `sprite_count * VERTICES_PER_SPRITE` vertex records
    pub vertices: &'a [f32],
    /// One model-view-projection matrix per sprite, column-major
    pub transforms: &'a [f32],
    pub sprite_count: usize,
}

impl BatchData<'_> {
    pub fn index_count(&self) -> usize {
        self.sprite_count * INDICES_PER_SPRITE
    }
}

/// Accumulates independently transformed textured quads and submits them to
/// its target in as few draws as possible.
///
/// Each vertex carries the slot of its sprite, which the vertex shader uses to
/// pick the sprite's matrix out of the transform array uploaded with the batch.
/// When the batch is full the next sprite flushes it first, so submission
/// order is preserved across flushes.
#[derive(Debug)]
pub struct SpriteBatch<T: BatchTarget> {
    target: T,
    vertices: Vec<f32>,
    transforms: Vec<f32>,
    max_sprites: usize,
    num_sprites: usize,
    view_projection: Mat4,
    in_batch: bool,
}

impl<T: BatchTarget> SpriteBatch<T> {
    /// Creates a batch of up to `max_sprites` sprites, clamped to
    /// `1..=MAX_BATCH_SPRITES`.
    pub fn new(max_sprites: usize, mut target: T) -> Self {
        let max_sprites = max_sprites.clamp(1, MAX_BATCH_SPRITES);

        target.upload_indices(&quad_indices(max_sprites));

        Self {
            target,
            vertices: vec![0.0; max_sprites * VERTICES_PER_SPRITE * VERTEX_SIZE],
            transforms: vec![0.0; max_sprites * 16],
            max_sprites,
            num_sprites: 0,
            view_projection: Mat4::new_identity(),
            in_batch: false,
        }
    }

    pub fn max_sprites(&self) -> usize {
        self.max_sprites
    }

    /// Sprites waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.num_sprites
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Starts a new batch; every sprite's model matrix is premultiplied by
    /// `view_projection`.
    pub fn begin_batch(&mut self, view_projection: &Mat4) {
        self.num_sprites = 0;
        self.view_projection = *view_projection;
        self.in_batch = true;
    }

    /// Flushes the pending sprites, if any.
    pub fn end_batch(&mut self) {
        self.flush();
        self.in_batch = false;
    }

    /// Adds a `width` x `height` quad centred at `(x, y)` in model space.
    pub fn draw_sprite(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        region: &TextureRegion,
        model: &Mat4,
    ) {
        debug_assert!(self.in_batch, "draw_sprite called outside begin_batch/end_batch");

        if self.num_sprites == self.max_sprites {
            self.flush();
        }

        let slot = self.num_sprites;
        let index = slot as f32;

        let (half_w, half_h) = (width / 2.0, height / 2.0);
        let (x1, y1, x2, y2) = (x - half_w, y - half_h, x + half_w, y + half_h);

        #[rustfmt::skip]
        let quad = [
            x1, y1, region.u1, region.v2, index, // bottom-left
            x2, y1, region.u2, region.v2, index, // bottom-right
            x2, y2, region.u2, region.v1, index, // top-right
            x1, y2, region.u1, region.v1, index, // top-left
        ];

        let stride = VERTICES_PER_SPRITE * VERTEX_SIZE;
        self.vertices[slot * stride..(slot + 1) * stride].copy_from_slice(&quad);

        let mvp = self.view_projection.mul(model);
        self.transforms[slot * 16..(slot + 1) * 16].copy_from_slice(&mvp.data);

        self.num_sprites += 1;
    }

    fn flush(&mut self) {
        if self.num_sprites == 0 {
            return;
        }

        let count = self.num_sprites;
        let batch = BatchData {
            vertices: &self.vertices[..count * VERTICES_PER_SPRITE * VERTEX_SIZE],
            transforms: &self.transforms[..count * 16],
            sprite_count: count,
        };
        self.target.draw_batch(&batch);

        self.num_sprites = 0;
    }
}

/// Index pattern for `max_sprites` quads: `0, 1, 2, 2, 3, 0`, offset by four
/// vertices per sprite.
pub fn quad_indices(max_sprites: usize) -> Vec<u16> {
    (0..max_sprites)
        .flat_map(|sprite| {
            let j = (sprite * VERTICES_PER_SPRITE) as u16;
            [j, j + 1, j + 2, j + 2, j + 3, j]
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A flushed batch, copied out of the sprite batch.
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct RecordedBatch {
        pub vertices: Vec<f32>,
        pub transforms: Vec<f32>,
        pub sprite_count: usize,
    }

    impl RecordedBatch {
        /// Vertex record `vertex` of sprite `sprite`.
        pub fn vertex(&self, sprite: usize, vertex: usize) -> &[f32] {
            let start = (sprite * VERTICES_PER_SPRITE + vertex) * VERTEX_SIZE;
            &self.vertices[start..start + VERTEX_SIZE]
        }

        pub fn transform(&self, sprite: usize) -> &[f32] {
            &self.transforms[sprite * 16..(sprite + 1) * 16]
        }
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingTarget {
        pub index_uploads: Vec<Vec<u16>>,
        pub batches: Vec<RecordedBatch>,
    }

    impl BatchTarget for RecordingTarget {
        fn upload_indices(&mut self, indices: &[u16]) {
            self.index_uploads.push(indices.to_vec());
        }

        fn draw_batch(&mut self, batch: &BatchData<'_>) {
            self.batches.push(RecordedBatch {
                vertices: batch.vertices.to_vec(),
                transforms: batch.transforms.to_vec(),
                sprite_count: batch.sprite_count,
            });
        }
    }

    fn submit(batch: &mut SpriteBatch<RecordingTarget>, count: usize) {
        let region = TextureRegion::full();
        for i in 0..count {
            // the x translation marks each sprite's submission order
            let model = Mat4::translation(i as f32, 0.0, 0.0);
            batch.draw_sprite(0.0, 0.0, 1.0, 1.0, &region, &model);
        }
    }

    #[test]
    fn test_index_pattern() {
        assert_eq!(quad_indices(2), vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);

        let indices = quad_indices(MAX_BATCH_SPRITES);
        assert_eq!(indices.len(), MAX_BATCH_SPRITES * INDICES_PER_SPRITE);
        assert_eq!(*indices.iter().max().unwrap() as usize, MAX_BATCH_SPRITES * 4 - 1);
    }

    #[test]
    fn test_full_batch_is_a_single_draw() {
        let mut batch = SpriteBatch::new(24, RecordingTarget::default());
        batch.begin_batch(&Mat4::new_identity());
        submit(&mut batch, 24);
        assert!(batch.target().batches.is_empty());

        batch.end_batch();

        let batches = &batch.target().batches;
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].sprite_count, 24);
    }

    #[test]
    fn test_one_over_capacity_flushes_exactly_once() {
        let mut batch = SpriteBatch::new(24, RecordingTarget::default());
        batch.begin_batch(&Mat4::new_identity());
        submit(&mut batch, 25);
        assert_eq!(batch.target().batches.len(), 1);
        assert_eq!(batch.pending(), 1);

        batch.end_batch();

        let counts: Vec<usize> = batch.target().batches.iter().map(|b| b.sprite_count).collect();
        assert_eq!(counts, vec![24, 1]);
    }

    #[test]
    fn test_overflow_preserves_submission_order() {
        let mut batch = SpriteBatch::new(24, RecordingTarget::default());
        batch.begin_batch(&Mat4::new_identity());
        submit(&mut batch, 30);
        batch.end_batch();

        let target = batch.target();
        assert_eq!(target.batches.len(), 2);
        assert_eq!(target.batches[0].sprite_count, 24);
        assert_eq!(target.batches[1].sprite_count, 6);

        // x translation of each transform is the submission index
        let order: Vec<f32> = target
            .batches
            .iter()
            .flat_map(|b| (0..b.sprite_count).map(move |i| b.transform(i)[12]))
            .collect();
        let expected: Vec<f32> = (0..30).map(|i| i as f32).collect();
        assert_eq!(order, expected);

        // both draws reuse the pattern uploaded at construction
        assert_eq!(target.index_uploads.len(), 1);
        assert_eq!(target.index_uploads[0], quad_indices(24));
    }

    #[test]
    fn test_empty_batch_draws_nothing() {
        let mut batch = SpriteBatch::new(24, RecordingTarget::default());
        batch.begin_batch(&Mat4::new_identity());
        batch.end_batch();
        batch.end_batch();

        assert!(batch.target().batches.is_empty());
    }

    #[test]
    fn test_transform_index_is_sprite_slot() {
        let mut batch = SpriteBatch::new(24, RecordingTarget::default());
        batch.begin_batch(&Mat4::new_identity());
        submit(&mut batch, 26);
        batch.end_batch();

        let batches = &batch.target().batches;
        for (sprite, expected) in [(0, 0.0), (5, 5.0), (23, 23.0)] {
            for v in 0..VERTICES_PER_SPRITE {
                assert_eq!(batches[0].vertex(sprite, v)[4], expected);
            }
        }

        // slots restart after the implicit flush
        assert_eq!(batches[1].vertex(0, 0)[4], 0.0);
        assert_eq!(batches[1].vertex(1, 3)[4], 1.0);
    }

    #[test]
    fn test_quad_corners_and_uvs() {
        let mut batch = SpriteBatch::new(4, RecordingTarget::default());
        let region = TextureRegion { u1: 0.25, v1: 0.5, u2: 0.75, v2: 1.0 };

        batch.begin_batch(&Mat4::new_identity());
        batch.draw_sprite(10.0, 20.0, 4.0, 6.0, &region, &Mat4::new_identity());
        batch.end_batch();

        let recorded = &batch.target().batches[0];
        assert_eq!(recorded.vertex(0, 0), &[8.0, 17.0, 0.25, 1.0, 0.0]);
        assert_eq!(recorded.vertex(0, 1), &[12.0, 17.0, 0.75, 1.0, 0.0]);
        assert_eq!(recorded.vertex(0, 2), &[12.0, 23.0, 0.75, 0.5, 0.0]);
        assert_eq!(recorded.vertex(0, 3), &[8.0, 23.0, 0.25, 0.5, 0.0]);
    }

    #[test]
    fn test_transforms_are_premultiplied_by_view_projection() {
        let view_projection = Mat4::new_orthographic(0.0, 100.0, 0.0, 50.0, -1.0, 1.0);
        let model = Mat4::translation(3.0, 4.0, 0.0).mul(&Mat4::rotation_z(45.0));

        let mut batch = SpriteBatch::new(4, RecordingTarget::default());
        batch.begin_batch(&view_projection);
        batch.draw_sprite(0.0, 0.0, 1.0, 1.0, &TextureRegion::full(), &model);
        batch.end_batch();

        let expected = view_projection.mul(&model);
        assert_eq!(batch.target().batches[0].transform(0), expected.as_slice());
    }

    #[test]
    fn test_capacity_is_clamped() {
        let batch = SpriteBatch::new(100, RecordingTarget::default());
        assert_eq!(batch.max_sprites(), MAX_BATCH_SPRITES);
        assert_eq!(batch.target().index_uploads[0].len(), MAX_BATCH_SPRITES * 6);

        let batch = SpriteBatch::new(0, RecordingTarget::default());
        assert_eq!(batch.max_sprites(), 1);
    }

    #[test]
    fn test_small_capacity_flushes_every_n() {
        let mut batch = SpriteBatch::new(3, RecordingTarget::default());
        batch.begin_batch(&Mat4::new_identity());
        submit(&mut batch, 7);
        batch.end_batch();

        let counts: Vec<usize> = batch.target().batches.iter().map(|b| b.sprite_count).collect();
        assert_eq!(counts, vec![3, 3, 1]);
    }
}
