use crate::map::Tilemap;
use macroquad::math::Rect;

/// Extra tiles kept on every side of the view so partially visible sprites
/// at the edge are not popped in late.
pub const CULL_MARGIN_TILES: i32 = 1;

/// Half-open block of tile coordinates, always inside the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileRegion {
    pub start_x: u32,
    pub start_y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRegion {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.start_x
            && y >= self.start_y
            && x < self.start_x + self.width
            && y < self.start_y + self.height
    }

    /// Row-major tile coordinates.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32)> {
        let (x0, w) = (self.start_x, self.width);
        (self.start_y..self.start_y + self.height)
            .flat_map(move |y| (x0..x0 + w).map(move |x| (x, y)))
    }
}

fn axis_span(min: f32, max: f32, tile: u32, count: u32) -> (u32, u32) {
    if tile == 0 || count == 0 {
        return (0, 0);
    }
    let tile = tile as f32;
    let lo = (min / tile).floor() as i32 - CULL_MARGIN_TILES;
    let hi = (max / tile).floor() as i32 + 1 + CULL_MARGIN_TILES;
    let lo = lo.clamp(0, count as i32);
    let hi = hi.clamp(0, count as i32);
    (lo as u32, (hi - lo).max(0) as u32)
}

/// Tiles overlapping `view`, padded by `CULL_MARGIN_TILES` and clamped to the map.
pub fn visible_tile_region(view: Rect, map: &Tilemap) -> TileRegion {
    let (start_x, width) = axis_span(view.x, view.x + view.w, map.tile_w, map.width);
    let (start_y, height) = axis_span(view.y, view.y + view.h, map.tile_h, map.height);
    TileRegion {
        start_x,
        start_y,
        width,
        height,
    }
}
