//! Error types for BFRES parsing.

use thiserror::Error;

/// Errors that can occur when working with BFRES files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] latte_common::Error),

    /// Yaz0 decompression error.
    #[error("Yaz0 decompression failed: {0}")]
    Yaz0(#[from] latte_yaz0::Error),

    /// GTX container error.
    #[error("GTX encoding failed: {0}")]
    Gtx(#[from] latte_gtx::Error),

    /// Error while decoding a named section, wrapping the underlying cause.
    #[error("{section} at {offset:#x}: {source}")]
    Section {
        section: &'static str,
        offset: u64,
        #[source]
        source: Box<Error>,
    },

    /// The byte order mark is neither big- nor little-endian.
    #[error("invalid byte order mark {bom:?}")]
    InvalidByteOrder { bom: [u8; 2] },

    /// A string reference that cannot be resolved to text.
    #[error("malformed string at {offset:#x}: {source}")]
    MalformedString {
        offset: u64,
        #[source]
        source: latte_common::Error,
    },

    /// A required offset field is zero or points outside the addressable file.
    #[error("missing or unresolvable {what} offset at {at:#x}")]
    MissingOffset { what: &'static str, at: u64 },

    /// Primitive topology tag this parser does not understand.
    #[error("shape '{shape}': unsupported primitive type {value:#x}")]
    UnsupportedPrimitiveType { shape: String, value: u32 },

    /// Index element encoding this parser does not understand.
    #[error("shape '{shape}': unsupported index format {value:#x}")]
    UnsupportedIndexFormat { shape: String, value: u32 },

    /// Vertex attribute encoding this parser does not understand.
    #[error("attribute '{attribute}': unsupported format {value:#x}")]
    UnsupportedAttribFormat { attribute: String, value: u32 },

    /// GX2 surface format this parser does not understand.
    #[error("texture '{texture}': unsupported pixel format {value:#x}")]
    UnsupportedPixelFormat { texture: String, value: u32 },

    /// Parameter type tag this parser does not understand.
    #[error("parameter '{name}': unsupported type {value:#x}")]
    UnsupportedParamType { name: String, value: u8 },

    /// Index buffer byte length disagrees with the declared index count.
    #[error(
        "shape '{shape}': index buffer of {size} bytes does not hold {declared} {width}-byte indices"
    )]
    IndexBufferSize {
        shape: String,
        size: u32,
        declared: u32,
        width: usize,
    },

    /// Texture selector and sampler tables of a material differ in length.
    #[error("material '{material}': {selectors} texture selectors but {samplers} sampler entries")]
    SamplerCountMismatch {
        material: String,
        selectors: usize,
        samplers: usize,
    },

    /// A cross-reference by index that points outside its target collection.
    #[error("'{name}': {what} index {index} out of range ({count} available)")]
    IndexOutOfRange {
        what: &'static str,
        name: String,
        index: usize,
        count: usize,
    },

    /// A material referencing a texture name absent from the document.
    #[error("material '{material}' sampler '{sampler}' references missing texture '{texture}'")]
    DanglingTextureReference {
        material: String,
        sampler: String,
        texture: String,
    },

    /// A buffer too small for the vertices it is declared to hold.
    #[error(
        "vertex buffer {buffer}: {size} bytes cannot hold {vertex_count} vertices of stride {stride}"
    )]
    VertexBufferSize {
        buffer: usize,
        size: usize,
        vertex_count: u32,
        stride: u16,
    },

    /// An attribute whose element does not fit within its buffer's stride.
    #[error(
        "attribute '{attribute}': {size}-byte element at offset {offset} exceeds stride {stride}"
    )]
    AttributeOverflow {
        attribute: String,
        offset: u32,
        size: usize,
        stride: u16,
    },
}

impl Error {
    /// Wrap an error with the section name and absolute offset it occurred in.
    pub(crate) fn in_section(
        section: &'static str,
        offset: u64,
        source: impl Into<Error>,
    ) -> Self {
        Error::Section {
            section,
            offset,
            source: Box::new(source.into()),
        }
    }
}

/// Result type for BFRES operations.
pub type Result<T> = std::result::Result<T, Error>;
