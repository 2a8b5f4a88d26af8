use crate::camera::{GameCamera, ViewTransform};
use crate::collision::CollisionSet;
use crate::config::GameConfig;
use crate::error::MapError;
use crate::input::InputSnapshot;
use crate::map::Tilemap;
use crate::player::Player;
use crate::render::{
    autotile_commands, tile_draw_commands, visible_tile_region, AutoTileAtlas, AutoTileCommand,
    TileDrawCommand,
};
use macroquad::math::{vec2, Rect, Vec2};
use tracing::{debug, info, warn};

/// Everything one frame of simulation reads from the platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub input: InputSnapshot,
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Current viewport size in pixels.
    pub screen: Vec2,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub map: Tilemap,
    pub collisions: Vec<CollisionSet>,
    pub player: Player,
    pub camera: GameCamera,
}

impl Scene {
    pub fn new(map: Tilemap, config: &GameConfig) -> Result<Self, MapError> {
        let mut collisions = Vec::with_capacity(config.collision_layers.len());
        for entry in &config.collision_layers {
            if entry.layer >= map.layer_count() {
                warn!(
                    layer = entry.layer,
                    layers = map.layer_count(),
                    "collision layer not in map, skipping"
                );
                continue;
            }
            collisions.push(CollisionSet::from_layer(&map, entry.layer, &entry.solid)?);
        }

        let tile_size = vec2(map.tile_w as f32, map.tile_h as f32);
        let frame_size = vec2(config.player.frame_width, config.player.frame_height);
        let player = Player::new(map.spawn, tile_size, &config.movement).with_frame_size(frame_size);

        let screen = vec2(config.window.width as f32, config.window.height as f32);
        let mut camera = GameCamera::new(screen, config.camera);
        camera.snap_to(player.movement.focus_point(tile_size), map.pixel_size(), screen);

        info!(
            map_id = map.map_id,
            spawn = ?map.spawn,
            collision_sets = collisions.len(),
            rects = collisions.iter().map(|c| c.rects.len()).sum::<usize>(),
            "scene ready"
        );

        Ok(Self {
            map,
            collisions,
            player,
            camera,
        })
    }

    pub fn tile_size(&self) -> Vec2 {
        vec2(self.map.tile_w as f32, self.map.tile_h as f32)
    }

    /// Movement, then animation, then camera.
    pub fn update(&mut self, frame: &FrameInput) {
        let tile_size = self.tile_size();
        self.player
            .update(&frame.input, frame.dt, &self.collisions, tile_size);

        let focus = self.player.movement.focus_point(tile_size);
        self.camera.update(
            focus,
            self.map.pixel_size(),
            frame.screen,
            frame.input.scroll,
            frame.dt,
        );
    }

    pub fn view(&self) -> ViewTransform {
        self.camera.view()
    }

    /// Tile blits for everything the camera can currently see.
    pub fn visible_tiles(&self, screen: Vec2) -> Vec<TileDrawCommand> {
        let region = visible_tile_region(self.view().visible_world_rect(screen), &self.map);
        let cmds = tile_draw_commands(&self.map, region);
        debug!(?region, tiles = cmds.len(), "culled");
        cmds
    }

    /// Autotile overlay for the visible part of `layer`; empty if the map lacks it.
    pub fn visible_autotiles(
        &self,
        screen: Vec2,
        layer: usize,
        atlas: &AutoTileAtlas,
    ) -> Vec<AutoTileCommand> {
        let Some(tiles) = self.map.layers().get(layer) else {
            return Vec::new();
        };
        let region = visible_tile_region(self.view().visible_world_rect(screen), &self.map);
        autotile_commands(tiles, region, self.tile_size(), atlas)
    }

    pub fn collision_rects(&self) -> impl Iterator<Item = &Rect> + '_ {
        self.collisions.iter().flat_map(|set| set.rects.iter())
    }
}
