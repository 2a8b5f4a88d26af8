use std::collections::HashMap;

use macroquad::math::{vec2, IVec2, Vec2};
use serde::Deserialize;

pub const FLIP_H: u32 = 0x8000_0000; // bit 31
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
pub const GID_MASK: u32 = !(FLIP_H | FLIP_V | FLIP_D);

/// Global tile identifier as stored in a layer. 0 means empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub u32);

impl TileId {
    #[inline] pub fn clean(self) -> u32 { self.0 & GID_MASK }
    #[inline] pub fn flip_h(self) -> bool { (self.0 & FLIP_H) != 0 }
    #[inline] pub fn flip_v(self) -> bool { (self.0 & FLIP_V) != 0 }
    #[inline] pub fn is_empty(self) -> bool { self.clean() == 0 }
}

/// Gameplay classification of a tile, read from its tileset's property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    #[default]
    None,
    Ground,
    Wall,
    Border,
    Collision,
    Carpet,
    Table,
}

impl TileType {
    /// Decodes the integer used by the binary map format. Unknown values are `None`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => TileType::Ground,
            2 => TileType::Wall,
            3 => TileType::Border,
            4 => TileType::Collision,
            5 => TileType::Carpet,
            6 => TileType::Table,
            _ => TileType::None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "none" | "" => TileType::None,
            "ground" => TileType::Ground,
            "wall" => TileType::Wall,
            "border" => TileType::Border,
            "collision" => TileType::Collision,
            "carpet" => TileType::Carpet,
            "table" => TileType::Table,
            _ => return None,
        };
        Some(ty)
    }
}

#[derive(Debug, Clone)]
pub struct Tileset {
    pub first_gid: u32,
    /// Atlas image path, relative to the map file.
    pub image: String,
    /// Local tile id -> type.
    pub tile_types: HashMap<u32, TileType>,
    /// Atlas columns. Unknown until the texture is loaded for binary maps.
    pub columns: Option<u32>,
}

impl Tileset {
    pub fn tile_type(&self, local: u32) -> TileType {
        self.tile_types.get(&local).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct TileLayer {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub visible: bool,
    /// Row-major gids, `width * height` long.
    pub data: Vec<u32>,
}

impl TileLayer {
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<TileId> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(TileId(self.data[y as usize * self.width + x as usize]))
    }
}

/// Format-agnostic, immutable tilemap.
#[derive(Debug, Clone)]
pub struct Tilemap {
    pub width: u32,
    pub height: u32,
    pub tile_w: u32,
    pub tile_h: u32,
    pub map_id: i32,
    /// Spawn position in tile coordinates.
    pub spawn: IVec2,
    tilesets: Vec<Tileset>, // sorted by first_gid
    layers: Vec<TileLayer>, // draw order
}

impl Tilemap {
    pub fn new(
        width: u32,
        height: u32,
        tile_w: u32,
        tile_h: u32,
        mut tilesets: Vec<Tileset>,
        layers: Vec<TileLayer>,
    ) -> Self {
        tilesets.sort_by_key(|t| t.first_gid);
        Self {
            width,
            height,
            tile_w,
            tile_h,
            map_id: 0,
            spawn: IVec2::ZERO,
            tilesets,
            layers,
        }
    }

    pub fn with_spawn(mut self, spawn: IVec2) -> Self {
        self.spawn = spawn;
        self
    }

    pub fn with_map_id(mut self, map_id: i32) -> Self {
        self.map_id = map_id;
        self
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&TileLayer> {
        self.layers.get(index)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    /// Records the atlas column count once the tileset texture is known.
    pub fn set_tileset_columns(&mut self, index: usize, columns: u32) {
        if let Some(ts) = self.tilesets.get_mut(index) {
            ts.columns = Some(columns);
        }
    }

    /// Owning tileset of `gid`: the one with the largest `first_gid <= gid`.
    /// Returns the tileset index, the tileset and the local id.
    pub fn tileset_for_gid(&self, gid: TileId) -> Option<(usize, &Tileset, u32)> {
        let clean = gid.clean();
        if clean == 0 {
            return None;
        }
        let idx = self.tilesets.partition_point(|t| t.first_gid <= clean);
        if idx == 0 {
            return None;
        }
        let ts = &self.tilesets[idx - 1];
        Some((idx - 1, ts, clean - ts.first_gid))
    }

    /// Resolves the type of the tile at `(x, y)` in `layer`, `TileType::None` on any miss.
    pub fn tile_type(&self, layer: usize, x: i32, y: i32) -> TileType {
        let Some(gid) = self.layers.get(layer).and_then(|l| l.get(x, y)) else {
            return TileType::None;
        };
        match self.tileset_for_gid(gid) {
            Some((_, ts, local)) => ts.tile_type(local),
            None => TileType::None,
        }
    }

    /// Map extent in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        // In f32: the u32 product can overflow on hostile headers.
        vec2(
            self.width as f32 * self.tile_w as f32,
            self.height as f32 * self.tile_h as f32,
        )
    }
}
