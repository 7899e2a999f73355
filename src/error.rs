use std::fmt;

use thiserror::Error;

/// Fatal errors: any of these aborts the conversion of the current document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid S Note container: {0}")]
    InvalidContainer(String),

    #[error("missing container part: snote/{0}")]
    MissingContainerPart(String),

    #[error("malformed style catalog: {0}")]
    MalformedStyleCatalog(String),

    #[error("malformed relationship map: {0}")]
    MalformedRelationshipMap(String),

    #[error("unresolved relationship id: {0:?}")]
    UnresolvedRelationship(String),

    #[error("snote/{part} nests elements deeper than {limit} levels")]
    NestingTooDeep { part: String, limit: usize },

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors scoped to a single `.zdib` image. The image is skipped and the
/// conversion carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitmapError {
    #[error("corrupt bitmap stream: {0}")]
    CorruptStream(String),

    #[error("truncated bitmap data: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("bitmap has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Non-fatal problems collected while emitting a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    SkippedImage { name: String, reason: BitmapError },
    UnknownStyle { style_id: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SkippedImage { name, reason } => write!(f, "skipped image {name}: {reason}"),
            Warning::UnknownStyle { style_id } => write!(f, "unknown character style {style_id}"),
        }
    }
}
