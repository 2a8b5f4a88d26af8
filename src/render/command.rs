use super::TileRegion;
use crate::map::Tilemap;
use macroquad::math::{vec2, Rect, Vec2};

/// One tile blit: a source cell in a tileset atlas and its world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileDrawCommand {
    pub layer_index: usize,
    pub tileset_index: usize,
    pub src: Rect,
    pub dest: Vec2,
    pub flip_x: bool,
    pub flip_y: bool,
}

/// Draw list for `region`, layers in map order, tiles row-major within a layer.
///
/// Empty cells, hidden layers, gids with no owning tileset and tilesets whose
/// atlas width is still unknown are skipped.
pub fn tile_draw_commands(map: &Tilemap, region: TileRegion) -> Vec<TileDrawCommand> {
    let (tw, th) = (map.tile_w as f32, map.tile_h as f32);
    let mut out = Vec::with_capacity(region.width as usize * region.height as usize);

    for (layer_index, layer) in map.layers().iter().enumerate() {
        if !layer.visible {
            continue;
        }
        for (x, y) in region.tiles() {
            let Some(gid) = layer.get(x as i32, y as i32) else {
                continue;
            };
            if gid.is_empty() {
                continue;
            }
            let Some((tileset_index, ts, local)) = map.tileset_for_gid(gid) else {
                continue;
            };
            let Some(cols) = ts.columns.filter(|&c| c > 0) else {
                continue;
            };

            let col = local % cols;
            let row = local / cols;
            out.push(TileDrawCommand {
                layer_index,
                tileset_index,
                src: Rect::new(col as f32 * tw, row as f32 * th, tw, th),
                dest: vec2(x as f32 * tw, y as f32 * th),
                flip_x: gid.flip_h(),
                flip_y: gid.flip_v(),
            });
        }
    }
    out
}
