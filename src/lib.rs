//! Tile-locked 2D game core on Macroquad: map loading, collision compaction,
//! grid movement, a follow camera and sprite animation.

pub mod camera;
pub mod collision;
pub mod config;
mod error;
pub mod input;
pub mod loader;
pub mod map;
pub mod platform;
pub mod player;
pub mod render;
pub mod scene;

pub use camera::{GameCamera, ViewTransform};
pub use collision::{CollisionSet, SolidRule};
pub use config::GameConfig;
pub use error::MapError;
pub use input::{Direction, InputSnapshot};
pub use loader::load_map;
pub use map::{TileId, TileLayer, TileType, Tilemap, Tileset};
pub use player::{Action, Player, PlayerPose};
pub use scene::{FrameInput, Scene};
