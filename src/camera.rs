//! Follow camera with smoothed zoom, clamped so the viewport never leaves the map.

use crate::config::CameraSettings;
use macroquad::camera::Camera2D;
use macroquad::math::{vec2, Rect, Vec2};

/// Fraction of the remaining distance covered in `dt` by an exponential approach.
fn damp(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Renderer-facing camera state. `offset` is the screen-space pixel the target maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub target: Vec2,
    pub offset: Vec2,
    pub zoom: f32,
    /// Degrees.
    pub rotation: f32,
}

impl ViewTransform {
    /// World rectangle covered by a `screen`-sized viewport.
    pub fn visible_world_rect(&self, screen: Vec2) -> Rect {
        let half = half_extent(screen, self.zoom);
        Rect::new(
            self.target.x - half.x,
            self.target.y - half.y,
            half.x * 2.0,
            half.y * 2.0,
        )
    }

    /// Macroquad camera with world y pointing down the screen.
    pub fn to_camera2d(&self, screen: Vec2) -> Camera2D {
        Camera2D {
            target: self.target,
            zoom: vec2(
                2.0 * self.zoom / screen.x.max(1.0),
                2.0 * self.zoom / screen.y.max(1.0),
            ),
            rotation: self.rotation,
            ..Default::default()
        }
    }
}

fn half_extent(screen: Vec2, zoom: f32) -> Vec2 {
    screen / zoom.max(f32::EPSILON) / 2.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameCamera {
    pub zoom: f32,
    pub target_zoom: f32,
    pub target: Vec2,
    pub offset: Vec2,
    pub rotation: f32,
    settings: CameraSettings,
}

impl GameCamera {
    pub fn new(screen: Vec2, settings: CameraSettings) -> Self {
        let zoom = clamp_zoom(settings.zoom, &settings);
        Self {
            zoom,
            target_zoom: zoom,
            target: Vec2::ZERO,
            offset: screen / 2.0,
            rotation: 0.0,
            settings,
        }
    }

    /// Sets both the current and target zoom, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f32) {
        let zoom = clamp_zoom(zoom, &self.settings);
        self.zoom = zoom;
        self.target_zoom = zoom;
    }

    /// Jumps straight to `focus`, no smoothing.
    pub fn snap_to(&mut self, focus: Vec2, map_size: Vec2, screen: Vec2) {
        self.offset = screen / 2.0;
        self.target = focus;
        self.clamp_to_map(map_size, screen);
    }

    /// One frame of zoom and follow. `scroll` is in wheel steps.
    pub fn update(&mut self, focus: Vec2, map_size: Vec2, screen: Vec2, scroll: f32, dt: f32) {
        let s = &self.settings;
        self.offset = screen / 2.0;

        if scroll != 0.0 {
            self.target_zoom = clamp_zoom(self.target_zoom + scroll * s.zoom_step, s);
        }
        self.zoom += (self.target_zoom - self.zoom) * damp(s.zoom_rate, dt);

        if s.smooth_follow {
            self.target += (focus - self.target) * damp(s.follow_speed, dt);
        } else {
            self.target = focus;
        }

        self.clamp_to_map(map_size, screen);
    }

    // Recomputed every frame: the viewport size follows the zoom.
    fn clamp_to_map(&mut self, map_size: Vec2, screen: Vec2) {
        let half = half_extent(screen, self.zoom);
        self.target.x = clamp_axis(self.target.x, half.x, map_size.x);
        self.target.y = clamp_axis(self.target.y, half.y, map_size.y);
    }

    pub fn view(&self) -> ViewTransform {
        ViewTransform {
            target: self.target,
            offset: self.offset,
            zoom: self.zoom,
            rotation: self.rotation,
        }
    }
}

// Unlike `f32::clamp`, never panics on an inverted range; max_zoom wins.
fn clamp_zoom(zoom: f32, s: &CameraSettings) -> f32 {
    zoom.max(s.min_zoom).min(s.max_zoom)
}

fn clamp_axis(value: f32, half: f32, extent: f32) -> f32 {
    if half * 2.0 >= extent {
        extent / 2.0
    } else {
        value.clamp(half, extent - half)
    }
}
