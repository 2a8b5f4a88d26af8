mod animation;
mod equipment;
mod movement;

pub use animation::{sprite_row, Animation};
pub use equipment::{EquipSlot, Equipment, Item};
pub use movement::Movement;

use crate::collision::CollisionSet;
use crate::config::MovementTiming;
use crate::input::{Direction, InputSnapshot};
use macroquad::math::{vec2, IVec2, Rect, Vec2};

/// Index into the renderer's texture registry. The player never owns textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    #[default]
    Idle,
    Walk,
    Run,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Graphics {
    pub direction: Direction,
    pub action: Action,
    /// Size of one sprite-sheet cell in pixels.
    pub frame_size: Vec2,
    pub body: Option<TextureHandle>,
    pub head: Option<TextureHandle>,
}

impl Default for Graphics {
    fn default() -> Self {
        Self {
            direction: Direction::Front,
            action: Action::Idle,
            frame_size: vec2(64.0, 64.0),
            body: None,
            head: None,
        }
    }
}

/// What the renderer needs to draw the player: one source cell, one destination,
/// and the texture layers to stamp it with, bottom first.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPose {
    pub src: Rect,
    pub dest: Rect,
    pub layers: Vec<TextureHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub graphics: Graphics,
    pub equipment: Equipment,
    pub animation: Animation,
    pub movement: Movement,
}

impl Player {
    pub fn new(spawn: IVec2, tile_size: Vec2, timing: &MovementTiming) -> Self {
        Self {
            graphics: Graphics::default(),
            equipment: Equipment::default(),
            animation: Animation::default(),
            movement: Movement::new(spawn, tile_size, timing),
        }
    }

    pub fn with_frame_size(mut self, frame_size: Vec2) -> Self {
        self.graphics.frame_size = frame_size;
        self
    }

    /// Advances movement, then the walk cycle.
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        collision: &[CollisionSet],
        tile_size: Vec2,
    ) {
        self.movement
            .update(&mut self.graphics, input, dt, collision, tile_size);
        self.animation
            .update(self.graphics.action, self.movement.move_duration, dt);
    }

    pub fn sprite_row(&self) -> u32 {
        sprite_row(self.graphics.action, self.graphics.direction)
    }

    pub fn equip(&mut self, item: &Item) {
        self.equipment.equip(item);
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<TextureHandle> {
        self.equipment.unequip(slot)
    }

    pub fn is_equipped(&self, slot: EquipSlot) -> bool {
        self.equipment.is_equipped(slot)
    }

    pub fn pose(&self) -> PlayerPose {
        let size = self.graphics.frame_size;
        let src = Rect::new(
            self.animation.frame as f32 * size.x,
            self.sprite_row() as f32 * size.y,
            size.x,
            size.y,
        );
        // Sprite cells are wider and taller than a tile; feet sit on the tile.
        let pos = self.movement.position;
        let dest = Rect::new(pos.x - size.x / 4.0, pos.y - size.y / 2.0, size.x, size.y);

        let layers = self
            .graphics
            .body
            .into_iter()
            .chain(self.graphics.head)
            .chain(self.equipment.equipped().map(|(_, tex)| tex))
            .collect();

        PlayerPose { src, dest, layers }
    }
}
