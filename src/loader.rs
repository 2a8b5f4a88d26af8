pub mod binary_loader;
pub mod json_loader;

use crate::error::MapError;
use crate::map::Tilemap;
use std::path::Path;

/// Loads a map, picking the decoder from the file extension.
pub fn load_map(path: impl AsRef<Path>) -> Result<Tilemap, MapError> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("bin") => binary_loader::decode_map_file(path),
        Some("json") => json_loader::decode_json_map_file(path),
        _ => Err(MapError::UnsupportedFormat(path.to_path_buf())),
    }
}
