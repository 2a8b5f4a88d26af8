//! Edge and corner overlay that rounds off the border of a filled tile area.
//!
//! Pieces come from a fixed block in an atlas laid out in tile cells `T` and
//! half cells `S`:
//!
//! ```text
//! (0,0)        inner corners TL TR / BL BR      S x S each
//! (T,0)        outer corners BR BL / TR TL      S x S each
//! (S,T)        bottom edge                      T x S
//! (0,T+S)      right edge                       S x T
//! (T+S,T+S)    left edge                        S x T
//! (S,2T+S)     top edge                         T x S
//! ```

use super::TileRegion;
use crate::map::TileLayer;
use macroquad::math::{vec2, Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

/// Where the overlay pieces sit in their atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoTileAtlas {
    pub origin: Vec2,
    /// Size of one full cell; pieces are built from this and its half.
    pub tile: Vec2,
}

impl AutoTileAtlas {
    pub fn new(origin: Vec2, tile: Vec2) -> Self {
        Self { origin, tile }
    }

    fn piece(&self, x: f32, y: f32, size: Vec2) -> Rect {
        Rect::new(self.origin.x + x, self.origin.y + y, size.x, size.y)
    }

    pub fn edge(&self, side: Side) -> Rect {
        let (t, s) = (self.tile, self.tile * 0.5);
        match side {
            Side::Bottom => self.piece(s.x, t.y, vec2(t.x, s.y)),
            Side::Top => self.piece(s.x, 2.0 * t.y + s.y, vec2(t.x, s.y)),
            Side::Left => self.piece(t.x + s.x, t.y + s.y, vec2(s.x, t.y)),
            Side::Right => self.piece(0.0, t.y + s.y, vec2(s.x, t.y)),
        }
    }

    /// Convex corner, drawn where both adjacent sides are open.
    pub fn outer_corner(&self, corner: Corner) -> Rect {
        let (t, s) = (self.tile, self.tile * 0.5);
        match corner {
            Corner::BottomRight => self.piece(t.x, 0.0, s),
            Corner::BottomLeft => self.piece(t.x + s.x, 0.0, s),
            Corner::TopLeft => self.piece(t.x + s.x, s.y, s),
            Corner::TopRight => self.piece(t.x, s.y, s),
        }
    }

    /// Concave corner, drawn where both sides are filled but the diagonal is open.
    pub fn inner_corner(&self, corner: Corner) -> Rect {
        let s = self.tile * 0.5;
        match corner {
            Corner::TopLeft => self.piece(0.0, 0.0, s),
            Corner::TopRight => self.piece(s.x, 0.0, s),
            Corner::BottomRight => self.piece(s.x, s.y, s),
            Corner::BottomLeft => self.piece(0.0, s.y, s),
        }
    }
}

/// One overlay blit from the autotile atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoTileCommand {
    pub src: Rect,
    pub dest: Vec2,
}

fn filled(layer: &TileLayer, x: i32, y: i32) -> bool {
    layer.get(x, y).is_some_and(|gid| !gid.is_empty())
}

/// Overlay for the filled tiles of `layer` inside `region`: every edge first,
/// then every corner, so corners sit on top. Cells outside the layer count as open.
pub fn autotile_commands(
    layer: &TileLayer,
    region: TileRegion,
    tile_size: Vec2,
    atlas: &AutoTileAtlas,
) -> Vec<AutoTileCommand> {
    let (tw, th) = (tile_size.x, tile_size.y);
    let half = tile_size * 0.5;
    let cells: Vec<(i32, i32)> = region
        .tiles()
        .map(|(x, y)| (x as i32, y as i32))
        .filter(|&(x, y)| filled(layer, x, y))
        .collect();
    let mut out = Vec::new();

    for &(x, y) in &cells {
        let p = vec2(x as f32 * tw, y as f32 * th);
        let mut push = |side, dest| out.push(AutoTileCommand { src: atlas.edge(side), dest });
        if !filled(layer, x - 1, y) {
            push(Side::Left, vec2(p.x - half.x, p.y));
        }
        if !filled(layer, x + 1, y) {
            push(Side::Right, vec2(p.x + tw, p.y));
        }
        if !filled(layer, x, y - 1) {
            push(Side::Top, vec2(p.x, p.y - half.y));
        }
        if !filled(layer, x, y + 1) {
            push(Side::Bottom, vec2(p.x, p.y + th));
        }
    }

    for &(x, y) in &cells {
        let p = vec2(x as f32 * tw, y as f32 * th);
        let n = filled(layer, x, y - 1);
        let s = filled(layer, x, y + 1);
        let w = filled(layer, x - 1, y);
        let e = filled(layer, x + 1, y);
        let (left, right) = (p.x - half.x, p.x + tw);
        let (top, bottom) = (p.y - half.y, p.y + th);

        let corners = [
            (Corner::TopLeft, n, w, (-1, -1), vec2(left, top)),
            (Corner::TopRight, n, e, (1, -1), vec2(right, top)),
            (Corner::BottomLeft, s, w, (-1, 1), vec2(left, bottom)),
            (Corner::BottomRight, s, e, (1, 1), vec2(right, bottom)),
        ];
        for (corner, vertical, horizontal, (dx, dy), dest) in corners {
            if !vertical && !horizontal {
                out.push(AutoTileCommand { src: atlas.outer_corner(corner), dest });
            } else if vertical && horizontal && !filled(layer, x + dx, y + dy) {
                // The piece faces away from the open diagonal.
                out.push(AutoTileCommand { src: atlas.inner_corner(opposite(corner)), dest });
            }
        }
    }
    out
}

fn opposite(corner: Corner) -> Corner {
    match corner {
        Corner::TopLeft => Corner::BottomRight,
        Corner::TopRight => Corner::BottomLeft,
        Corner::BottomRight => Corner::TopLeft,
        Corner::BottomLeft => Corner::TopRight,
    }
}
