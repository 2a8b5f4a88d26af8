//! Macroquad glue: polls input, owns GPU textures and draws a [`Scene`].
//!
//! Everything above this module is plain data and runs without a window.

use crate::config::GameConfig;
use crate::input::{Direction, InputSnapshot};
use crate::player::{Item, TextureHandle};
use crate::render::AutoTileAtlas;
use crate::scene::{FrameInput, Scene};
use anyhow::{anyhow, bail, Context};
use macroquad::prelude::*;
use std::path::Path;
use tracing::{debug, info};

const KEYS: [(Direction, [KeyCode; 2]); 4] = [
    (Direction::Back, [KeyCode::W, KeyCode::Up]),
    (Direction::Front, [KeyCode::S, KeyCode::Down]),
    (Direction::Left, [KeyCode::A, KeyCode::Left]),
    (Direction::Right, [KeyCode::D, KeyCode::Right]),
];

pub fn poll_input() -> InputSnapshot {
    let mut input = InputSnapshot::default();
    for (dir, keys) in KEYS {
        input.set_down(dir, keys.iter().any(|&k| is_key_down(k)));
        input.set_pressed(dir, keys.iter().any(|&k| is_key_pressed(k)));
    }
    input.run = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);

    // Wheel deltas differ wildly between platforms; one notch is one step.
    let (_, wheel) = mouse_wheel();
    input.scroll = if wheel == 0.0 { 0.0 } else { wheel.signum() };
    input
}

pub fn frame_input() -> FrameInput {
    FrameInput {
        input: poll_input(),
        dt: get_frame_time(),
        screen: vec2(screen_width(), screen_height()),
    }
}

/// Strips the 4-byte little-endian length prefix of a packed texture.
pub fn unpack_texture(bytes: &[u8]) -> anyhow::Result<&[u8]> {
    let Some((prefix, rest)) = bytes.split_first_chunk::<4>() else {
        bail!("packed texture shorter than its size prefix");
    };
    let size = u32::from_le_bytes(*prefix) as usize;
    rest.get(..size)
        .ok_or_else(|| anyhow!("packed texture claims {size} bytes, only {} present", rest.len()))
}

fn decode_texture(bytes: &[u8], path: &Path) -> anyhow::Result<Texture2D> {
    let image = Image::from_file_with_format(bytes, None)
        .map_err(|e| anyhow!("decoding image {}: {e:?}", path.display()))?;
    let texture = Texture2D::from_image(&image);
    texture.set_filter(FilterMode::Nearest);
    Ok(texture)
}

/// Loads a texture from disk. `.bin` files are size-prefixed PNG, anything else
/// is handed to the image decoder as is.
pub fn load_texture_file(path: &Path) -> anyhow::Result<Texture2D> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Reading texture {}", path.display()))?;
    let texture = if path.extension().is_some_and(|e| e == "bin") {
        let png = unpack_texture(&bytes).with_context(|| format!("Unpacking {}", path.display()))?;
        decode_texture(png, path)?
    } else {
        decode_texture(&bytes, path)?
    };
    debug!(path = %path.display(), w = texture.width(), h = texture.height(), "texture loaded");
    Ok(texture)
}

/// Owns every texture; the core only ever sees [`TextureHandle`]s.
#[derive(Default)]
pub struct TextureRegistry {
    textures: Vec<Texture2D>,
}

impl TextureRegistry {
    pub fn insert(&mut self, texture: Texture2D) -> TextureHandle {
        self.textures.push(texture);
        TextureHandle(self.textures.len() as u32 - 1)
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&Texture2D> {
        self.textures.get(handle.0 as usize)
    }

    pub fn load(&mut self, path: &Path) -> anyhow::Result<TextureHandle> {
        Ok(self.insert(load_texture_file(path)?))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Atlas and target layer of the edge overlay.
pub struct AutoTileAssets {
    pub texture: TextureHandle,
    pub atlas: AutoTileAtlas,
    pub layer: usize,
}

pub struct Assets {
    pub textures: TextureRegistry,
    /// Texture per tileset, same order as `Tilemap::tilesets`.
    pub tilesets: Vec<TextureHandle>,
    pub autotile: Option<AutoTileAssets>,
}

impl Assets {
    /// Loads tileset atlases and player layers, and dresses the player.
    /// Fills in atlas columns the map format could not provide.
    pub fn load(scene: &mut Scene, map_dir: &Path, config: &GameConfig) -> anyhow::Result<Self> {
        let mut textures = TextureRegistry::default();

        let mut tilesets = Vec::with_capacity(scene.map.tilesets().len());
        let mut columns = Vec::new();
        for (i, ts) in scene.map.tilesets().iter().enumerate() {
            let path = map_dir.join(&ts.image);
            let handle = textures
                .load(&path)
                .with_context(|| format!("Loading tileset {i} atlas"))?;
            if ts.columns.is_none() {
                if let Some(tex) = textures.get(handle) {
                    columns.push((i, tex.width() as u32 / scene.map.tile_w.max(1)));
                }
            }
            tilesets.push(handle);
        }
        for (i, cols) in columns {
            scene.map.set_tileset_columns(i, cols);
        }

        let autotile = match &config.autotile {
            Some(auto) => {
                let texture = textures
                    .load(&auto.texture)
                    .context("Loading autotile atlas")?;
                let [x, y] = auto.origin;
                debug!(layer = auto.layer, x, y, "autotile overlay enabled");
                Some(AutoTileAssets {
                    texture,
                    atlas: AutoTileAtlas::new(vec2(x, y), scene.tile_size()),
                    layer: auto.layer,
                })
            }
            None => None,
        };

        let player = &config.player;
        if let Some(body) = &player.body {
            scene.player.graphics.body = Some(textures.load(body).context("Loading body sprite")?);
        }
        if let Some(head) = &player.head {
            scene.player.graphics.head = Some(textures.load(head).context("Loading head sprite")?);
        }
        for item in &player.items {
            let texture = textures
                .load(&item.path)
                .with_context(|| format!("Loading item {:?}", item.slot))?;
            let item = Item {
                texture,
                slot: item.slot,
                label: item.label.clone(),
            };
            scene.player.equip(&item);
            info!(slot = ?item.slot, label = %item.label, "equipped");
        }

        info!(textures = textures.len(), "assets loaded");
        Ok(Self {
            textures,
            tilesets,
            autotile,
        })
    }
}

pub fn draw_scene(scene: &Scene, assets: &Assets, screen: Vec2, debug_collision: bool) {
    clear_background(BLACK);
    set_camera(&scene.view().to_camera2d(screen));

    for cmd in scene.visible_tiles(screen) {
        let Some(tex) = assets
            .tilesets
            .get(cmd.tileset_index)
            .and_then(|&h| assets.textures.get(h))
        else {
            continue;
        };
        draw_texture_ex(
            tex,
            cmd.dest.x,
            cmd.dest.y,
            WHITE,
            DrawTextureParams {
                source: Some(cmd.src),
                flip_x: cmd.flip_x,
                flip_y: cmd.flip_y,
                ..Default::default()
            },
        );
    }

    if let Some(auto) = &assets.autotile {
        if let Some(tex) = assets.textures.get(auto.texture) {
            for cmd in scene.visible_autotiles(screen, auto.layer, &auto.atlas) {
                draw_texture_ex(
                    tex,
                    cmd.dest.x,
                    cmd.dest.y,
                    WHITE,
                    DrawTextureParams {
                        source: Some(cmd.src),
                        ..Default::default()
                    },
                );
            }
        }
    }

    let pose = scene.player.pose();
    for tex in pose.layers.iter().filter_map(|&h| assets.textures.get(h)) {
        draw_texture_ex(
            tex,
            pose.dest.x,
            pose.dest.y,
            WHITE,
            DrawTextureParams {
                source: Some(pose.src),
                dest_size: Some(vec2(pose.dest.w, pose.dest.h)),
                ..Default::default()
            },
        );
    }

    if debug_collision {
        for r in scene.collision_rects() {
            draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, RED);
        }
    }

    set_default_camera();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed(payload: &[u8], claimed: u32) -> Vec<u8> {
        let mut bytes = claimed.to_le_bytes().to_vec();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn unpack_returns_claimed_payload() {
        let bytes = packed(b"\x89PNGdata-and-trailer", 8);
        assert_eq!(unpack_texture(&bytes).unwrap(), b"\x89PNGdata");
    }

    #[test]
    fn unpack_rejects_short_payload() {
        let err = unpack_texture(&packed(b"abc", 10)).unwrap_err();
        assert!(err.to_string().contains("claims 10 bytes"));
        assert!(unpack_texture(&[1, 0]).is_err());
    }

    #[test]
    fn empty_registry_has_no_handles() {
        let registry = TextureRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.get(TextureHandle(0)).is_none());
    }
}
