use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for map loading and scene setup.
#[derive(Debug, Error)]
pub enum MapError {
    /// File I/O error
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// JSON parse error
    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The binary map ended before `section` was fully read
    #[error("binary map truncated while reading {section} at byte {offset}")]
    Truncated { section: &'static str, offset: usize },
    #[error("invalid map: {0}")]
    InvalidMap(String),
    /// A layer's data length does not match width * height
    #[error("invalid layer size for layer '{layer}': expected {expected} tiles, found {actual}")]
    InvalidLayerSize {
        layer: String,
        expected: usize,
        actual: usize,
    },
    #[error("layer '{layer}' references gid {gid}, but the highest known gid is {max_gid}")]
    InvalidTileGid { layer: String, gid: u32, max_gid: u32 },
    /// Unsupported file format (neither `.bin` nor `.json`)
    #[error("unsupported map format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("layer {index} out of range, map has {count} layers")]
    LayerOutOfRange { index: usize, count: usize },
}
