//! Error types for `wangantools`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `wangantools` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Descriptor Errors ====================
    /// The descriptor is malformed or missing a required top-level structure.
    #[error("descriptor error: {message}")]
    Descriptor {
        /// Description of what is missing or malformed.
        message: String,
    },

    /// A category's address array does not pair up with its name array.
    #[error(
        "malformed index in section {section_id}, category {tag}: \
         {addresses} addresses for {names} names (want addresses == 2 * names)"
    )]
    IndexMalformed {
        /// The section the mismatch was found in.
        section_id: u32,
        /// The category tag (e.g. `LONG`).
        tag: &'static str,
        /// Number of elements in the `{TAG}_ADDR` array.
        addresses: usize,
        /// Number of elements in the `{TAG}_NAME` array.
        names: usize,
    },

    // ==================== Container Errors ====================
    /// Neither candidate path for a section's BIN container exists.
    #[error("container not found: tried {primary} and {fallback}")]
    ContainerNotFound {
        /// The path as configured in the descriptor.
        primary: PathBuf,
        /// The derived `bin/` sibling path.
        fallback: PathBuf,
    },

    /// The BIN container could not be read or decompressed.
    #[error("failed to load container {path}: {message}")]
    ContainerLoad {
        /// The container path.
        path: PathBuf,
        /// The underlying read or decompression error.
        message: String,
    },

    // ==================== Byte-Range Errors ====================
    /// The requested byte range is malformed.
    #[error("invalid range: offset {offset}, length {length}")]
    InvalidRange {
        /// The requested start offset.
        offset: i64,
        /// The requested length.
        length: i64,
    },

    /// The requested byte range extends past the end of the container.
    #[error("range out of bounds: offset {offset} + length {length} exceeds container size {size}")]
    OutOfRange {
        /// The requested start offset.
        offset: i64,
        /// The requested length.
        length: i64,
        /// The size of the loaded container.
        size: usize,
    },

    // ==================== NUD Format Errors ====================
    /// The file is not a valid NUD container (missing NDP3 magic).
    #[error("invalid NUD magic: expected NDP3, found {0:?}")]
    InvalidNudMagic([u8; 4]),

    /// The NUD container is structurally invalid.
    #[error("invalid NUD file: {message}")]
    InvalidNud {
        /// Description of what is invalid.
        message: String,
    },

    /// Unexpected end of file while parsing a binary structure.
    #[error("unexpected end of file")]
    UnexpectedEof,

    // ==================== Conversion Errors ====================
    /// A load/merge/write step in the conversion chain failed.
    #[error("conversion error: {0}")]
    Conversion(String),

    // ==================== Parsing Errors ====================
    /// XML writing error.
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

// Lua evaluation problems are descriptor problems from the caller's view.
impl From<mlua::Error> for Error {
    fn from(err: mlua::Error) -> Self {
        Error::Descriptor {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for `wangantools` operations.
pub type Result<T> = std::result::Result<T, Error>;
