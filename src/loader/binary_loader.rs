// Binary tilemap decoder. All integers are little-endian i32 except layer gids (u32).
use crate::error::MapError;
use crate::map::{TileLayer, TileType, Tilemap, Tileset};
use macroquad::math::ivec2;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

struct Reader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    fn take(&mut self, len: usize, section: &'static str) -> Result<&'a [u8], MapError> {
        let end = self
            .cursor
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(MapError::Truncated {
                section,
                offset: self.cursor,
            })?;
        let out = &self.bytes[self.cursor..end];
        self.cursor = end;
        Ok(out)
    }

    fn i32(&mut self, section: &'static str) -> Result<i32, MapError> {
        let raw = self.take(4, section)?;
        Ok(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    fn count(&mut self, section: &'static str) -> Result<usize, MapError> {
        let v = self.i32(section)?;
        usize::try_from(v)
            .map_err(|_| MapError::InvalidMap(format!("negative {section}: {v}")))
    }

    fn string(&mut self, section: &'static str) -> Result<String, MapError> {
        let len = self.count(section)?;
        let raw = self.take(len, section)?;
        String::from_utf8(raw.to_vec())
            .map_err(|_| MapError::InvalidMap(format!("{section} is not valid UTF-8")))
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }
}

/// Decodes a binary tilemap from memory.
pub fn decode_map_bytes(bytes: &[u8]) -> Result<Tilemap, MapError> {
    let mut r = Reader::new(bytes);

    let width = r.count("map width")?;
    let height = r.count("map height")?;
    let tile_w = r.count("tile width")?;
    let tile_h = r.count("tile height")?;
    let tileset_count = r.count("tileset count")?;
    let layer_count = r.count("layer count")?;
    let map_id = r.i32("map id")?;
    let spawn_x = r.i32("spawn x")?;
    let spawn_y = r.i32("spawn y")?;

    if tile_w == 0 || tile_h == 0 {
        return Err(MapError::InvalidMap(format!(
            "tile size must be non-zero, got {tile_w}x{tile_h}"
        )));
    }

    let mut tilesets = Vec::with_capacity(tileset_count.min(r.remaining() / 12));
    for _ in 0..tileset_count {
        let first_gid = r.count("tileset first gid")?;
        let property_count = r.count("tileset property count")?;
        let image = r.string("tileset path")?;

        let mut tile_types = HashMap::with_capacity(property_count.min(r.remaining() / 8));
        for _ in 0..property_count {
            let id = r.count("tile property id")?;
            let raw_type = r.i32("tile property type")?;
            let ty = TileType::from_raw(raw_type);
            if ty == TileType::None && raw_type != 0 {
                debug!(tileset = %image, id, raw_type, "unknown tile type, treating as none");
            }
            tile_types.insert(id as u32, ty);
        }

        tilesets.push(Tileset {
            first_gid: first_gid as u32,
            image,
            tile_types,
            columns: None,
        });
    }

    let mut layers = Vec::with_capacity(layer_count.min(r.remaining() / 8));
    for i in 0..layer_count {
        let lw = r.count("layer width")?;
        let lh = r.count("layer height")?;
        let len = lw
            .checked_mul(lh)
            .ok_or_else(|| MapError::InvalidMap(format!("layer {i} is too large")))?;
        let raw = r.take(
            len.checked_mul(4)
                .ok_or_else(|| MapError::InvalidMap(format!("layer {i} is too large")))?,
            "layer data",
        )?;
        let data = raw
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        layers.push(TileLayer {
            name: format!("layer{i}"),
            width: lw,
            height: lh,
            visible: true,
            data,
        });
    }

    if r.remaining() > 0 {
        debug!(bytes = r.remaining(), "ignoring trailing bytes after last layer");
    }

    let map = Tilemap::new(
        width as u32,
        height as u32,
        tile_w as u32,
        tile_h as u32,
        tilesets,
        layers,
    )
    .with_map_id(map_id)
    .with_spawn(ivec2(spawn_x, spawn_y));

    info!(
        map_id,
        width,
        height,
        tilesets = map.tilesets().len(),
        layers = map.layer_count(),
        "decoded binary tilemap"
    );
    Ok(map)
}

pub fn decode_map_file(path: &Path) -> Result<Tilemap, MapError> {
    let bytes = std::fs::read(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_map_bytes(&bytes)
}
