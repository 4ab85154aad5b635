//! Error types for typeset
//!
//! Typesetting itself never fails: clipped writes, empty glyphs and missing
//! bitmaps simply contribute nothing. Errors live at the edges, where a model
//! is accepted, a font is loaded, an image is encoded or a CLI is configured.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TypesetError>;

/// Main error type for typeset
#[derive(Debug, Error)]
pub enum TypesetError {
    #[error("Invalid view model: {0}")]
    InvalidModel(#[from] ModelError),

    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Export failed: {0}")]
    ExportFailed(#[from] ExportError),

    #[error("Markup error: {0}")]
    Markup(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Structural problems in a [`crate::ViewModel`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("{glyphs} glyphs but {positions} positions")]
    PositionCountMismatch { glyphs: usize, positions: usize },

    #[error("{kind} runs overlap or are unsorted at run {index}")]
    UnorderedRuns { kind: &'static str, index: usize },

    #[error("line {line} overlaps the previous line")]
    OverlappingLines { line: usize },

    #[error("{hyphens} hyphen glyphs but {indices} hyphen indices")]
    HyphenMismatch { hyphens: usize, indices: usize },

    #[error("{kind} index buffer has {len} entries for {glyphs} glyphs")]
    IndexBufferMismatch {
        kind: &'static str,
        len: usize,
        glyphs: usize,
    },
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("Face {index} not present in a collection of {count}")]
    FaceIndexOutOfRange { index: u32, count: u32 },

    #[error("Unknown font id: {0}")]
    UnknownFont(u32),
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Format not supported: {0}")]
    FormatNotSupported(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),
}
