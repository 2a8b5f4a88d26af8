//! Renderer-facing draw data. Nothing here touches the GPU.

mod autotile;
mod command;
mod cull;

pub use autotile::{autotile_commands, AutoTileAtlas, AutoTileCommand, Corner, Side};
pub use command::{tile_draw_commands, TileDrawCommand};
pub use cull::{visible_tile_region, TileRegion, CULL_MARGIN_TILES};
