use std::slice;

use gltext_data::vertex::{POSITION_COMPONENTS, TEX_COORD_COMPONENTS, TRANSFORM_INDEX_COMPONENTS};
use web_sys::{console, WebGlBuffer, WebGlVertexArrayObject};

use crate::{error::Error, gl::GL};

/// Attribute slot of the vertex position.
pub const POSITION_LOCATION: u32 = 1;
/// Attribute slot of the texture coordinate.
pub const TEX_COORD_LOCATION: u32 = 2;
/// Attribute slot of the per-vertex transform index.
pub const TRANSFORM_INDEX_LOCATION: u32 = 3;

/// One float attribute inside an interleaved vertex record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: usize,
    /// Offset from the start of the record, in floats.
    pub offset: usize,
}

/// `(x, y, u, v, transform index)`, as written by the sprite batch.
pub const SPRITE_LAYOUT: &[VertexAttribute] = &[
    VertexAttribute { location: POSITION_LOCATION, components: POSITION_COMPONENTS, offset: 0 },
    VertexAttribute {
        location: TEX_COORD_LOCATION,
        components: TEX_COORD_COMPONENTS,
        offset: POSITION_COMPONENTS,
    },
    VertexAttribute {
        location: TRANSFORM_INDEX_LOCATION,
        components: TRANSFORM_INDEX_COMPONENTS,
        offset: POSITION_COMPONENTS + TEX_COORD_COMPONENTS,
    },
];

/// `(x, y, u, v)`, for single textured quads.
pub const TEXTURED_LAYOUT: &[VertexAttribute] = &[
    VertexAttribute { location: POSITION_LOCATION, components: POSITION_COMPONENTS, offset: 0 },
    VertexAttribute {
        location: TEX_COORD_LOCATION,
        components: TEX_COORD_COMPONENTS,
        offset: POSITION_COMPONENTS,
    },
];

/// Floats per vertex of `layout`.
pub fn layout_size(layout: &[VertexAttribute]) -> usize {
    layout.iter().map(|a| a.offset + a.components).max().unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Triangles,
    TriangleStrip,
    TriangleFan,
    Lines,
    Points,
}

impl From<PrimitiveKind> for u32 {
    fn from(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Triangles => GL::TRIANGLES,
            PrimitiveKind::TriangleStrip => GL::TRIANGLE_STRIP,
            PrimitiveKind::TriangleFan => GL::TRIANGLE_FAN,
            PrimitiveKind::Lines => GL::LINES,
            PrimitiveKind::Points => GL::POINTS,
        }
    }
}

/// A dynamic vertex buffer and a static index buffer behind one vertex array
/// object.
///
/// GPU storage is allocated once by `configure`; later uploads overwrite it in
/// place. Queued contents are clamped to the configured capacity.
#[derive(Debug)]
pub struct VertexBuffers {
    handles: BufferHandles<WebGlVertexArrayObject, WebGlBuffer>,
    vertices: Vec<f32>,
    indices: Vec<u16>,
    vertex_capacity: usize,
    index_capacity: usize,
    indices_dirty: bool,
}

impl VertexBuffers {
    /// Buffers laid out for sprite batch vertices.
    pub fn configure(gl: &GL, max_vertices: usize, max_indices: usize) -> Result<Self, Error> {
        Self::configure_with_layout(gl, max_vertices, max_indices, SPRITE_LAYOUT)
    }

    pub fn configure_with_layout(
        gl: &GL,
        max_vertices: usize,
        max_indices: usize,
        layout: &[VertexAttribute],
    ) -> Result<Self, Error> {
        if max_vertices == 0 || max_indices == 0 {
            return Err(Error::buffer_capacity_invalid(max_vertices, max_indices));
        }

        let floats_per_vertex = layout_size(layout);
        let stride = (floats_per_vertex * size_of::<f32>()) as i32;

        let handles = BufferHandles::create(
            || gl.create_vertex_array(),
            || gl.create_buffer(),
            |vao| gl.delete_vertex_array(Some(&vao)),
            |buffer| gl.delete_buffer(Some(&buffer)),
        )?;
        gl.bind_vertex_array(handles.vao.as_ref());

        // vertex buffer, rewritten every batch
        gl.bind_buffer(GL::ARRAY_BUFFER, handles.vertex_buffer.as_ref());
        gl.buffer_data_with_i32(
            GL::ARRAY_BUFFER,
            (max_vertices * floats_per_vertex * size_of::<f32>()) as i32,
            GL::DYNAMIC_DRAW,
        );

        for attribute in layout {
            gl.enable_vertex_attrib_array(attribute.location);
            gl.vertex_attrib_pointer_with_i32(
                attribute.location,
                attribute.components as i32,
                GL::FLOAT,
                false,
                stride,
                (attribute.offset * size_of::<f32>()) as i32,
            );
        }

        // index buffer, uploaded once
        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, handles.index_buffer.as_ref());
        gl.buffer_data_with_i32(
            GL::ELEMENT_ARRAY_BUFFER,
            (max_indices * size_of::<u16>()) as i32,
            GL::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);
        gl.bind_buffer(GL::ARRAY_BUFFER, None);

        Ok(Self {
            handles,
            vertices: Vec::with_capacity(max_vertices * floats_per_vertex),
            indices: Vec::with_capacity(max_indices),
            vertex_capacity: max_vertices * floats_per_vertex,
            index_capacity: max_indices,
            indices_dirty: false,
        })
    }

    /// Queues the index data uploaded by the next `bind`.
    pub fn set_indices(&mut self, indices: &[u16]) {
        let len = clamped_len("index", indices.len(), self.index_capacity);
        self.indices.clear();
        self.indices.extend_from_slice(&indices[..len]);
        self.indices_dirty = true;
    }

    /// Queues the vertex data uploaded by the next `bind`.
    pub fn set_vertices(&mut self, vertices: &[f32]) {
        let len = clamped_len("vertex", vertices.len(), self.vertex_capacity);
        self.vertices.clear();
        self.vertices.extend_from_slice(&vertices[..len]);
    }

    /// Activates the attribute layout and uploads the queued contents.
    pub fn bind(&mut self, gl: &GL) {
        if self.handles.vao.is_none() {
            return;
        }

        self.activate(gl);
        buffer_upload_sub_array(gl, GL::ARRAY_BUFFER, &self.vertices);

        if self.indices_dirty {
            gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, self.handles.index_buffer.as_ref());
            buffer_upload_sub_array(gl, GL::ELEMENT_ARRAY_BUFFER, &self.indices);
            self.indices_dirty = false;
        }
    }

    /// Activates the attribute layout and the contents uploaded by the last
    /// `bind`, without uploading again.
    pub fn activate(&self, gl: &GL) {
        gl.bind_vertex_array(self.handles.vao.as_ref());
        gl.bind_buffer(GL::ARRAY_BUFFER, self.handles.vertex_buffer.as_ref());
    }

    /// Issues an indexed draw when indices were set, otherwise draws `count`
    /// vertices starting at `offset`.
    pub fn draw(&self, gl: &GL, kind: PrimitiveKind, offset: usize, count: usize) {
        if self.indices.is_empty() {
            gl.draw_arrays(kind.into(), offset as i32, count as i32);
        } else {
            gl.draw_elements_with_i32(
                kind.into(),
                count as i32,
                GL::UNSIGNED_SHORT,
                (offset * size_of::<u16>()) as i32,
            );
        }
    }

    pub fn unbind(&self, gl: &GL) {
        gl.bind_vertex_array(None);
        gl.bind_buffer(GL::ARRAY_BUFFER, None);
    }

    /// Frees the GPU storage. Calling it again does nothing.
    pub fn release(&mut self, gl: &GL) {
        self.handles.release(
            |vao| gl.delete_vertex_array(Some(&vao)),
            |buffer| gl.delete_buffer(Some(&buffer)),
        );
    }
}

/// GL objects behind a [`VertexBuffers`]; each is `None` once deleted.
#[derive(Debug)]
struct BufferHandles<A, B> {
    vao: Option<A>,
    vertex_buffer: Option<B>,
    index_buffer: Option<B>,
}

impl<A, B> BufferHandles<A, B> {
    /// Creates the vertex array and both buffers. When any creation fails, the
    /// objects created before it are deleted again.
    fn create(
        create_vao: impl FnOnce() -> Option<A>,
        create_buffer: impl FnMut() -> Option<B>,
        delete_vao: impl FnOnce(A),
        delete_buffer: impl FnMut(B),
    ) -> Result<Self, Error> {
        let mut handles = Self { vao: None, vertex_buffer: None, index_buffer: None };

        match handles.fill(create_vao, create_buffer) {
            Ok(()) => Ok(handles),
            Err(e) => {
                handles.release(delete_vao, delete_buffer);
                Err(e)
            },
        }
    }

    fn fill(
        &mut self,
        create_vao: impl FnOnce() -> Option<A>,
        mut create_buffer: impl FnMut() -> Option<B>,
    ) -> Result<(), Error> {
        self.vao = Some(create_vao().ok_or(Error::vertex_array_creation_failed())?);
        self.vertex_buffer = Some(create_buffer().ok_or(Error::buffer_creation_failed("vertex"))?);
        self.index_buffer = Some(create_buffer().ok_or(Error::buffer_creation_failed("index"))?);
        Ok(())
    }

    fn release(&mut self, delete_vao: impl FnOnce(A), delete_buffer: impl FnMut(B)) {
        if let Some(vao) = self.vao.take() {
            delete_vao(vao);
        }
        self.vertex_buffer
            .take()
            .into_iter()
            .chain(self.index_buffer.take())
            .for_each(delete_buffer);
    }
}

fn clamped_len(kind: &str, len: usize, capacity: usize) -> usize {
    if len > capacity {
        console::warn_1(
            &format!("{kind} data truncated to capacity: {len} > {capacity}").into(),
        );
    }
    len.min(capacity)
}

/// Overwrites the start of the buffer bound to `target` with `data`.
///
/// # Safety
/// Views the slice's memory directly; nothing may allocate on the wasm heap
/// between creating the view and the upload.
fn buffer_upload_sub_array<T>(gl: &GL, target: u32, data: &[T]) {
    if data.is_empty() {
        return;
    }

    unsafe {
        let data_ptr = data.as_ptr() as *const u8;
        let size = std::mem::size_of_val(data);
        let view = js_sys::Uint8Array::view(slice::from_raw_parts(data_ptr, size));
        gl.buffer_sub_data_with_i32_and_array_buffer_view(target, 0, &view);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use gltext_data::vertex::VERTEX_SIZE;

    use super::*;

    #[test]
    fn test_sprite_layout_matches_vertex_record() {
        assert_eq!(layout_size(SPRITE_LAYOUT), VERTEX_SIZE);

        let locations: Vec<_> = SPRITE_LAYOUT.iter().map(|a| a.location).collect();
        assert_eq!(locations, [1, 2, 3]);
        assert_eq!(SPRITE_LAYOUT[2].offset, 4);
    }

    #[test]
    fn test_textured_layout_has_four_floats() {
        assert_eq!(layout_size(TEXTURED_LAYOUT), 4);
    }

    /// Hands out numbered handles, failing from the `fail_at`-th buffer on.
    fn create_handles(
        fail_at: usize,
        deleted: &RefCell<Vec<String>>,
    ) -> Result<BufferHandles<&'static str, usize>, Error> {
        let mut created = 0;
        BufferHandles::create(
            || Some("vao"),
            || {
                created += 1;
                (created < fail_at).then_some(created)
            },
            |vao| deleted.borrow_mut().push(vao.to_string()),
            |buffer| deleted.borrow_mut().push(format!("buffer {buffer}")),
        )
    }

    #[test]
    fn test_failed_index_buffer_deletes_earlier_objects() {
        let deleted = RefCell::new(Vec::new());

        let result = create_handles(2, &deleted);

        assert!(matches!(result, Err(Error::Resource(msg)) if msg.contains("index")));
        assert_eq!(*deleted.borrow(), ["vao", "buffer 1"]);
    }

    #[test]
    fn test_failed_vertex_buffer_deletes_vertex_array() {
        let deleted = RefCell::new(Vec::new());

        let result = create_handles(1, &deleted);

        assert!(matches!(result, Err(Error::Resource(msg)) if msg.contains("vertex buffer")));
        assert_eq!(*deleted.borrow(), ["vao"]);
    }

    #[test]
    fn test_handles_are_deleted_once() {
        let deleted = RefCell::new(Vec::new());
        let mut handles = create_handles(usize::MAX, &deleted).unwrap();
        assert!(deleted.borrow().is_empty());

        let release = |handles: &mut BufferHandles<&'static str, usize>| {
            handles.release(
                |vao| deleted.borrow_mut().push(vao.to_string()),
                |buffer| deleted.borrow_mut().push(format!("buffer {buffer}")),
            )
        };
        release(&mut handles);
        release(&mut handles);

        assert_eq!(*deleted.borrow(), ["vao", "buffer 1", "buffer 2"]);
    }

    #[test]
    fn test_data_within_capacity_is_kept() {
        assert_eq!(clamped_len("vertex", 10, 10), 10);
        assert_eq!(clamped_len("vertex", 0, 10), 0);
    }
}
