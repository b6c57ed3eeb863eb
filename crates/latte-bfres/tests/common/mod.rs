//! Synthetic BFRES fixtures for the integration tests.
//!
//! Real BFRES files are large and game-derived, so the tests assemble a
//! minimal big-endian container from scratch: one model with one shape and
//! one material, one texture, and optionally an embedded file. Every offset
//! in the format is self-relative, so the builder writes placeholder fields
//! and fixes them up against named labels once the layout is final.

use std::collections::HashMap;

/// Big-endian byte writer with label-based offset fixups.
pub struct Writer {
    data: Vec<u8>,
    labels: HashMap<String, usize>,
    fixups: Vec<(usize, String)>,
}

impl Writer {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            labels: HashMap::new(),
            fixups: Vec::new(),
        }
    }

    pub fn u8(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn u16(&mut self, value: u16) {
        self.data.extend_from_slice(&value.to_be_bytes());
    }

    pub fn u32(&mut self, value: u32) {
        self.data.extend_from_slice(&value.to_be_bytes());
    }

    pub fn f32(&mut self, value: f32) {
        self.data.extend_from_slice(&value.to_bits().to_be_bytes());
    }

    pub fn bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Mark the current position with a name other fields can point at.
    pub fn label(&mut self, name: &str) {
        self.labels.insert(name.to_string(), self.data.len());
    }

    /// Write a self-relative offset field targeting a label.
    pub fn offset(&mut self, label: &str) {
        self.fixups.push((self.data.len(), label.to_string()));
        self.u32(0);
    }

    /// Write an absent (zero) offset field.
    pub fn null_offset(&mut self) {
        self.u32(0);
    }

    /// Write a labeled, null-terminated string.
    pub fn cstring(&mut self, label: &str, text: &str) {
        self.label(label);
        self.bytes(text.as_bytes());
        self.u8(0);
    }

    /// Resolve all offset fixups and return the finished buffer.
    pub fn finish(mut self) -> Vec<u8> {
        for (field, label) in &self.fixups {
            let target = *self
                .labels
                .get(label)
                .unwrap_or_else(|| panic!("fixture label '{label}' never placed"));
            let relative = target as i64 - *field as i64;
            self.data[*field..*field + 4].copy_from_slice(&(relative as i32).to_be_bytes());
        }
        self.data
    }
}

/// Write an index group mapping name labels to data labels, in order.
pub fn index_group(w: &mut Writer, label: &str, entries: &[(&str, &str)]) {
    w.label(label);
    w.u32((8 + 16 * (entries.len() + 1)) as u32);
    w.u32(entries.len() as u32);

    // Root node, no name or data.
    w.u32(0xFFFF_FFFF);
    w.u16(0);
    w.u16(0);
    w.null_offset();
    w.null_offset();

    for (i, (name, data)) in entries.iter().enumerate() {
        w.u32(i as u32);
        w.u16(0);
        w.u16(0);
        w.offset(name);
        w.offset(data);
    }
}

/// Options for the synthetic container.
pub struct Fixture {
    /// Raw index format tag of the shape's single LOD.
    pub index_format: u32,
    /// Index values of the LOD.
    pub indices: Vec<u32>,
    /// Raw primitive topology tag of the LOD.
    pub primitive_type: u32,
    /// Store the LOD's visibility group array offset as absent (zero).
    pub null_visibility_offset: bool,
    /// Texture name the material's sampler references.
    pub sampler_texture: &'static str,
    /// Raw GX2 format register of the texture.
    pub pixel_format: u32,
    /// Duplicate the texture's index group entry.
    pub duplicate_texture: bool,
    /// Contents of an embedded file, if one should be present.
    pub embedded: Option<&'static [u8]>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            index_format: 4, // 16-bit big-endian
            indices: vec![0, 1, 2],
            primitive_type: 0x04, // triangles
            null_visibility_offset: false,
            sampler_texture: "tex_albedo",
            pixel_format: 0x01A, // RGBA8 unorm
            duplicate_texture: false,
            embedded: None,
        }
    }
}

impl Fixture {
    /// Assemble the container.
    pub fn build(&self) -> Vec<u8> {
        let mut w = Writer::new();

        // File header.
        w.bytes(b"FRES");
        w.bytes(&[3, 4, 0, 4]); // version
        w.bytes(&[0xFE, 0xFF]); // byte order mark, big-endian
        w.u16(0x0010); // header size
        w.u32(0); // file length, patched below
        w.u32(0x2000); // alignment
        w.offset("str:file");
        w.u32(0); // string table length
        w.null_offset(); // string table offset

        // Twelve root group offsets: models, textures, nine undecoded
        // animation groups, embedded files.
        w.offset("grp:models");
        w.offset("grp:textures");
        for _ in 2..11 {
            w.null_offset();
        }
        if self.embedded.is_some() {
            w.offset("grp:embedded");
        } else {
            w.null_offset();
        }
        // Twelve entry counts.
        w.u16(1);
        w.u16(if self.duplicate_texture { 2 } else { 1 });
        for _ in 2..11 {
            w.u16(0);
        }
        w.u16(u16::from(self.embedded.is_some()));

        index_group(&mut w, "grp:models", &[("str:model", "fmdl:0")]);
        if self.duplicate_texture {
            index_group(
                &mut w,
                "grp:textures",
                &[("str:tex", "ftex:0"), ("str:tex", "ftex:0")],
            );
        } else {
            index_group(&mut w, "grp:textures", &[("str:tex", "ftex:0")]);
        }
        if let Some(blob) = self.embedded {
            index_group(&mut w, "grp:embedded", &[("str:emb", "emb:0")]);
            w.label("emb:0");
            w.offset("emb:data");
            w.u32(blob.len() as u32);
            w.label("emb:data");
            w.bytes(blob);
        }

        self.write_model(&mut w);
        self.write_texture(&mut w);

        // Groups several material offsets point at without holding entries.
        index_group(&mut w, "grp:empty", &[]);

        // String pool.
        w.cstring("str:file", "course");
        w.cstring("str:model", "course_model");
        w.cstring("str:shape", "shape_body");
        w.cstring("str:mat", "mat_body");
        w.cstring("str:tex", "tex_albedo");
        w.cstring("str:texref", self.sampler_texture);
        w.cstring("str:_p0", "_p0");
        w.cstring("str:_a0", "_a0");
        w.cstring("str:archive", "shader_archive");
        w.cstring("str:shading", "shading_model");
        if self.embedded.is_some() {
            w.cstring("str:emb", "collision.bin");
        }

        let mut data = w.finish();
        let length = data.len() as u32;
        data[0x0C..0x10].copy_from_slice(&length.to_be_bytes());
        data
    }

    fn write_model(&self, w: &mut Writer) {
        // FMDL header.
        w.label("fmdl:0");
        w.bytes(b"FMDL");
        w.offset("str:model");
        w.null_offset(); // data
        w.null_offset(); // skeleton
        w.offset("fvtx:array");
        w.offset("grp:shapes");
        w.offset("grp:materials");
        w.null_offset(); // model parameters
        w.u16(1); // vertex buffer count
        w.u16(1); // shape count
        w.u16(1); // material count
        w.u16(0); // parameter count
        w.u32(0);

        // FVTX array with one section: a single interleaved buffer carrying
        // three Float32x3 positions.
        w.label("fvtx:array");
        w.bytes(b"FVTX");
        w.u8(1); // attribute count
        w.u8(1); // buffer count
        w.u16(0); // section index
        w.u32(3); // vertex count
        w.u32(0);
        w.null_offset(); // attribute array
        w.offset("grp:attributes");
        w.offset("buf:array");
        w.u32(0);

        index_group(w, "grp:attributes", &[("str:_p0", "attr:0")]);
        w.label("attr:0");
        w.offset("str:_p0");
        w.u32(0); // buffer 0, element offset 0
        w.u32(0x811); // Float32x3

        w.label("buf:array");
        w.u32(0);
        w.u32(36); // byte size
        w.u32(0);
        w.u16(12); // stride
        w.u16(0);
        w.u32(0);
        w.offset("vtx:data");

        w.label("vtx:data");
        for position in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            for component in position {
                w.f32(component);
            }
        }

        index_group(w, "grp:shapes", &[("str:shape", "fshp:0")]);
        self.write_shape(w);

        index_group(w, "grp:materials", &[("str:mat", "fmat:0")]);
        self.write_material(w);
    }

    fn write_shape(&self, w: &mut Writer) {
        // FSHP header.
        w.label("fshp:0");
        w.bytes(b"FSHP");
        w.offset("str:shape");
        w.u32(0);
        w.u16(0); // section index
        w.u16(0); // material index
        w.u16(0); // bone index
        w.u16(0); // vertex buffer index
        w.u16(0); // skinning index count
        w.u8(0);
        w.u8(1); // LOD count
        w.u32(0); // visibility tree node count
        w.f32(1.0); // bounding radius
        w.null_offset(); // vertex buffer
        w.offset("lod:array");
        w.null_offset(); // skinning index array
        w.null_offset();
        w.null_offset(); // visibility tree nodes
        w.null_offset(); // visibility tree ranges
        w.null_offset(); // visibility tree indices
        w.u32(0);

        // Single LOD with no visibility groups. Real files still tend to
        // carry an array offset, so one pointing just past the LOD header is
        // the default.
        w.label("lod:array");
        w.u32(self.primitive_type);
        w.u32(self.index_format);
        w.u32(self.indices.len() as u32);
        w.u16(0); // visibility group count
        w.u16(0);
        if self.null_visibility_offset {
            w.null_offset();
        } else {
            w.offset("lod:vis");
        }
        w.offset("idx:header");
        w.u32(0); // skip vertices
        w.label("lod:vis");

        let payload = encode_indices(self.index_format, &self.indices);
        w.label("idx:header");
        w.u32(0);
        w.u32(payload.len() as u32);
        w.u32(0);
        w.u16(0);
        w.u16(0);
        w.u32(0);
        w.offset("idx:data");
        w.label("idx:data");
        w.bytes(&payload);
    }

    fn write_material(&self, w: &mut Writer) {
        // FMAT header.
        w.label("fmat:0");
        w.bytes(b"FMAT");
        w.offset("str:mat");
        w.u32(0);
        w.u16(0); // section index
        w.u16(0); // render parameter count
        w.u8(1); // texture selector count
        w.u8(1); // attribute selector count
        w.u16(0); // material parameter count
        w.u32(0); // parameter data size
        w.u32(0);
        w.offset("grp:empty"); // render parameter group
        w.null_offset(); // material structure
        w.offset("shader:0");
        w.offset("texsel:0");
        w.null_offset(); // attribute selector array
        w.offset("grp:samplers");
        w.null_offset(); // material parameter array
        w.offset("grp:empty"); // material parameter group
        w.null_offset(); // material parameter data
        w.null_offset(); // shadow parameter group
        w.null_offset();

        w.label("shader:0");
        w.offset("str:archive");
        w.offset("str:shading");
        w.u32(0);
        w.u8(0); // vertex input count
        w.u8(0); // pixel input count
        w.u16(0); // parameter count
        w.offset("grp:empty");
        w.offset("grp:empty");
        w.offset("grp:empty");

        w.label("texsel:0");
        w.offset("str:texref");
        w.null_offset(); // runtime FTEX pointer

        index_group(w, "grp:samplers", &[("str:_a0", "samp:0")]);
        w.label("samp:0");
        w.bytes(&[0u8; 16]); // sampler state
        w.offset("str:_a0");
        w.u32(0);
    }

    fn write_texture(&self, w: &mut Writer) {
        // FTEX header: the GX2 surface registers, then name and payload
        // references.
        w.label("ftex:0");
        w.bytes(b"FTEX");
        w.u32(1); // dim, 2D
        w.u32(4); // width
        w.u32(4); // height
        w.u32(1); // depth
        w.u32(1); // mip count
        w.u32(self.pixel_format);
        w.u32(0); // aa mode
        w.u32(1); // usage
        w.u32(64); // image size
        w.u32(0); // image pointer
        w.u32(0); // mip size
        w.u32(0); // mip pointer
        w.u32(4); // tile mode
        w.u32(0); // swizzle
        w.u32(0x1000); // alignment
        w.u32(4); // pitch
        for _ in 0..13 {
            w.u32(0); // mip offsets
        }
        for _ in 0..10 {
            w.u32(0); // view and component-select registers
        }
        w.u32(0);
        w.u32(0);
        w.offset("str:tex");
        w.u32(0);
        w.offset("tex:data");
        w.null_offset(); // mipmap data
        w.u32(0);
        w.u32(0);

        w.label("tex:data");
        w.bytes(&[0x5A; 64]);
    }
}

/// Encode index values in the width and byte order a raw format tag selects.
fn encode_indices(format: u32, indices: &[u32]) -> Vec<u8> {
    let mut out = Vec::new();
    for &index in indices {
        match format {
            2 => out.push(index as u8),
            0 => out.extend_from_slice(&(index as u16).to_le_bytes()),
            4 => out.extend_from_slice(&(index as u16).to_be_bytes()),
            1 => out.extend_from_slice(&index.to_le_bytes()),
            9 => out.extend_from_slice(&index.to_be_bytes()),
            _ => panic!("fixture cannot encode index format {format:#x}"),
        }
    }
    out
}

/// Wrap a buffer in a literal-only Yaz0 stream.
pub fn yaz0_wrap(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + data.len() + data.len() / 8 + 1);
    out.extend_from_slice(b"Yaz0");
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(&[0u8; 8]);
    for chunk in data.chunks(8) {
        out.push(0xFF);
        out.extend_from_slice(chunk);
    }
    out
}
