use compact_str::{format_compact, CompactString};

use crate::{AtlasLayout, FontAtlasData, GlyphMetrics, LineMetrics, Padding, TextureRegion};

const ATLAS_HEADER: [u8; 4] = [0x67, 0x6C, 0x74, 0x78];
const ATLAS_VERSION: u8 = 0x01; // dictates the format of the serialized data

#[derive(Debug)]
pub struct SerializationError {
    pub message: CompactString,
}

pub(crate) trait Serializable {
    fn serialize(&self) -> Vec<u8>;

    fn deserialize(deser: &mut Deserializer) -> Result<Self, SerializationError>
    where
        Self: Sized;
}

pub(crate) struct Deserializer<'a> {
    data: &'a [u8],
    position: usize,
}

struct Serializer {
    data: Vec<u8>,
}

impl Serializer {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.data.extend(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.data.extend(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.data.extend(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.data.extend(&value.to_le_bytes());
    }

    pub fn write_u8_slice(&mut self, value: &[u8]) {
        self.write_u32(value.len() as u32);
        self.data.extend_from_slice(value);
    }

    pub fn write_string(&mut self, value: &str) {
        let length = value.len() as u8;
        self.write_u8(length);
        self.data.extend(&value.as_bytes()[..length as usize]);
    }
}

impl<'a> Deserializer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn read_u8(&mut self) -> Result<u8, SerializationError> {
        self.verify_offset_in_bounds(1)?;

        let byte = self.data[self.position];
        self.position += 1;

        Ok(byte)
    }

    pub fn read_u16(&mut self) -> Result<u16, SerializationError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, SerializationError> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, SerializationError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, SerializationError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u8_slice(&mut self) -> Result<Vec<u8>, SerializationError> {
        let length = self.read_u32()? as usize;
        self.verify_offset_in_bounds(length)?;

        let values = self.data[self.position..self.position + length].to_vec();
        self.position += length;

        Ok(values)
    }

    pub fn read_string(&mut self) -> Result<CompactString, SerializationError> {
        let length = self.read_u8()? as usize;
        self.verify_offset_in_bounds(length)?;

        let bytes = &self.data[self.position..self.position + length];
        self.position += length;

        Ok(CompactString::from_utf8_lossy(bytes))
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerializationError> {
        self.verify_offset_in_bounds(N)?;

        let mut bytes = [0; N];
        bytes.copy_from_slice(&self.data[self.position..self.position + N]);
        self.position += N;

        Ok(bytes)
    }

    fn verify_offset_in_bounds(&self, length: usize) -> Result<(), SerializationError> {
        if (self.position + length) > self.data.len() {
            return Err(SerializationError {
                message: CompactString::from("Out of bounds read"),
            });
        }
        Ok(())
    }
}

impl Serializable for CompactString {
    fn serialize(&self) -> Vec<u8> {
        let mut ser = Serializer::new();
        ser.write_string(self);
        ser.data
    }

    fn deserialize(serialized: &mut Deserializer) -> Result<Self, SerializationError> {
        serialized.read_string()
    }
}

impl Serializable for GlyphMetrics {
    fn serialize(&self) -> Vec<u8> {
        let mut ser = Serializer::new();
        ser.write_u32(self.codepoint as u32);
        ser.write_f32(self.advance);
        ser.write_f32(self.region.u1);
        ser.write_f32(self.region.v1);
        ser.write_f32(self.region.u2);
        ser.write_f32(self.region.v2);
        ser.data
    }

    fn deserialize(serialized: &mut Deserializer) -> Result<Self, SerializationError> {
        let codepoint = serialized.read_u32()?;
        let codepoint = char::from_u32(codepoint).ok_or_else(|| SerializationError {
            message: format_compact!("Invalid codepoint 0x{:x}", codepoint),
        })?;

        let advance = serialized.read_f32()?;
        let region = TextureRegion {
            u1: serialized.read_f32()?,
            v1: serialized.read_f32()?,
            u2: serialized.read_f32()?,
            v2: serialized.read_f32()?,
        };

        Ok(GlyphMetrics { codepoint, advance, region })
    }
}

impl Serializable for FontAtlasData {
    fn serialize(&self) -> Vec<u8> {
        let mut ser = Serializer::new();
        ATLAS_HEADER.iter().for_each(|&b| ser.write_u8(b));
        ser.write_u8(ATLAS_VERSION);

        ser.write_string(&self.font_name);
        ser.write_f32(self.font_size);

        let layout = &self.layout;
        ser.write_i32(layout.padding.x);
        ser.write_i32(layout.padding.y);

        ser.write_f32(self.line_metrics.height);
        ser.write_f32(self.line_metrics.ascent);
        ser.write_f32(self.line_metrics.descent);

        ser.write_i32(layout.texture_size);
        ser.write_i32(layout.cell_width);
        ser.write_i32(layout.cell_height);
        ser.write_i32(layout.columns);
        ser.write_i32(layout.rows);

        // serialize the glyph table
        ser.write_u16(self.glyphs.len() as u16);
        ser.data.extend(self.glyphs.iter().flat_map(GlyphMetrics::serialize));

        // alpha bitmap is mostly empty space; deflate shrinks it considerably
        let packed_texture_data = miniz_oxide::deflate::compress_to_vec(&self.texture_data, 9);
        ser.write_u8_slice(&packed_texture_data);

        ser.data
    }

    fn deserialize(deser: &mut Deserializer) -> Result<Self, SerializationError> {
        let header = [deser.read_u8()?, deser.read_u8()?, deser.read_u8()?, deser.read_u8()?];
        if header != ATLAS_HEADER {
            return Err(SerializationError {
                message: CompactString::const_new("Invalid font atlas header (wrong file format?)"),
            });
        }

        let version = deser.read_u8()?;
        if version != ATLAS_VERSION {
            return Err(SerializationError {
                message: format_compact!("Unsupported font atlas version 0x{:02x}", version),
            });
        }

        let font_name = deser.read_string()?;
        let font_size = deser.read_f32()?;

        let padding = Padding::new(deser.read_i32()?, deser.read_i32()?);

        let line_metrics = LineMetrics {
            height: deser.read_f32()?,
            ascent: deser.read_f32()?,
            descent: deser.read_f32()?,
        };

        let layout = AtlasLayout {
            texture_size: deser.read_i32()?,
            cell_width: deser.read_i32()?,
            cell_height: deser.read_i32()?,
            columns: deser.read_i32()?,
            rows: deser.read_i32()?,
            padding,
        };

        // bounds the bitmap size before anything is allocated for it
        layout.check_grid().map_err(|e| SerializationError {
            message: format_compact!("Invalid atlas layout: {e}"),
        })?;

        // deserialize the glyph table
        let glyph_count = deser.read_u16()? as usize;
        let mut glyphs = Vec::with_capacity(glyph_count);
        for _ in 0..glyph_count {
            glyphs.push(GlyphMetrics::deserialize(deser)?);
        }

        // deserialize texture data
        let packed_texture_data = deser.read_u8_slice()?;
        let texture_data = miniz_oxide::inflate::decompress_to_vec_with_limit(
            &packed_texture_data,
            layout.bitmap_len(),
        )
        .map_err(|_| SerializationError {
            message: CompactString::const_new("Failed to decompress texture data"),
        })?;

        Ok(FontAtlasData { font_name, font_size, line_metrics, layout, glyphs, texture_data })
    }
}
