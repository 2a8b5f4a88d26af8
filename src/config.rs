use crate::collision::SolidRule;
use crate::player::EquipSlot;
use anyhow::{ensure, Context};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Tunables for a game session. Every field has a default, unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub movement: MovementTiming,
    pub camera: CameraSettings,
    pub player: PlayerConfig,
    pub collision_layers: Vec<CollisionLayerConfig>,
    /// Edge and corner overlay drawn around the tiles of one layer.
    pub autotile: Option<AutoTileConfig>,
    /// Outline collision rectangles when drawing.
    pub debug_collision: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            movement: MovementTiming::default(),
            camera: CameraSettings::default(),
            player: PlayerConfig::default(),
            collision_layers: vec![
                CollisionLayerConfig {
                    layer: 0,
                    solid: SolidRule::default(),
                },
                CollisionLayerConfig {
                    layer: 1,
                    solid: SolidRule::default(),
                },
            ],
            autotile: None,
            debug_collision: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "tilestep".into(),
            width: 800,
            height: 600,
        }
    }
}

/// Seconds per tile step and key-hold timing.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovementTiming {
    pub walk_duration: f32,
    pub run_duration: f32,
    /// Duration before the first step; drives the animation period while idle.
    pub initial_duration: f32,
    /// How long a freshly turned direction must be held before stepping.
    pub hold_delay: f32,
}

impl Default for MovementTiming {
    fn default() -> Self {
        Self {
            walk_duration: 0.42,
            run_duration: 0.25,
            initial_duration: 0.15,
            hold_delay: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Target zoom change per scroll step.
    pub zoom_step: f32,
    pub zoom_rate: f32,
    pub follow_speed: f32,
    pub smooth_follow: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            zoom: 2.0,
            min_zoom: 0.5,
            max_zoom: 3.0,
            zoom_step: 0.25,
            zoom_rate: 8.0,
            follow_speed: 5.0,
            smooth_follow: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub frame_width: f32,
    pub frame_height: f32,
    /// Packed texture paths (size-prefixed PNG).
    pub body: Option<PathBuf>,
    pub head: Option<PathBuf>,
    pub items: Vec<ItemConfig>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            frame_width: 64.0,
            frame_height: 64.0,
            body: None,
            head: None,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemConfig {
    pub path: PathBuf,
    pub slot: EquipSlot,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollisionLayerConfig {
    pub layer: usize,
    #[serde(default)]
    pub solid: SolidRule,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutoTileConfig {
    /// Atlas holding the edge and corner pieces.
    pub texture: PathBuf,
    /// Pixel origin of the piece block inside the atlas.
    #[serde(default)]
    pub origin: [f32; 2],
    #[serde(default)]
    pub layer: usize,
}

fn finite_positive(value: f32, name: &str) -> anyhow::Result<()> {
    ensure!(value.is_finite() && value > 0.0, "{name} must be a positive number, got {value}");
    Ok(())
}

fn finite_non_negative(value: f32, name: &str) -> anyhow::Result<()> {
    ensure!(value.is_finite() && value >= 0.0, "{name} must be zero or more, got {value}");
    Ok(())
}

impl MovementTiming {
    pub fn validate(&self) -> anyhow::Result<()> {
        finite_positive(self.walk_duration, "movement.walk_duration")?;
        finite_positive(self.run_duration, "movement.run_duration")?;
        finite_positive(self.initial_duration, "movement.initial_duration")?;
        finite_non_negative(self.hold_delay, "movement.hold_delay")
    }
}

impl CameraSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        finite_positive(self.min_zoom, "camera.min_zoom")?;
        finite_positive(self.max_zoom, "camera.max_zoom")?;
        ensure!(
            self.min_zoom <= self.max_zoom,
            "camera.min_zoom ({}) is above camera.max_zoom ({})",
            self.min_zoom,
            self.max_zoom
        );
        finite_positive(self.zoom, "camera.zoom")?;
        finite_non_negative(self.zoom_step, "camera.zoom_step")?;
        finite_non_negative(self.zoom_rate, "camera.zoom_rate")?;
        finite_non_negative(self.follow_speed, "camera.follow_speed")
    }
}

impl GameConfig {
    /// Rejects values that would stall movement or break the camera clamp.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.window.width > 0 && self.window.height > 0,
            "window size must be positive, got {}x{}",
            self.window.width,
            self.window.height
        );
        self.movement.validate()?;
        self.camera.validate()?;
        finite_positive(self.player.frame_width, "player.frame_width")?;
        finite_positive(self.player.frame_height, "player.frame_height")
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("Parsing game config")?;
        config.validate().context("Invalid game config")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        Self::from_json_str(&txt).with_context(|| format!("Loading config {}", path.display()))
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
