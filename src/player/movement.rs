//! Tile-locked movement.
//!
//! The player is always either standing exactly on a tile or sliding linearly
//! from `tile` to the adjacent `target_tile`. A tap on a new direction only turns
//! the player; the key has to stay down for `hold_delay` before the first step.
//! Holding a direction through the end of a step chains straight into the next
//! one, carrying the leftover time so the walk does not stutter.

use super::{Action, Graphics};
use crate::collision::{is_tile_blocked, CollisionSet};
use crate::config::MovementTiming;
use crate::input::{Direction, InputSnapshot};
use macroquad::math::{IVec2, Vec2};
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub tile: IVec2,
    /// Tile being moved into. Equal to `tile` when standing still.
    pub target_tile: IVec2,
    /// Interpolated render position in pixels.
    pub position: Vec2,
    pub move_timer: f32,
    pub move_duration: f32,
    pub hold_timer: f32,
    pub hold_delay: f32,
    pub is_moving: bool,
    pub is_holding_key: bool,
    pub just_turned: bool,
    progress: f32,
    walk_duration: f32,
    run_duration: f32,
}

impl Movement {
    pub fn new(spawn: IVec2, tile_size: Vec2, timing: &MovementTiming) -> Self {
        Self {
            tile: spawn,
            target_tile: spawn,
            position: spawn.as_vec2() * tile_size,
            move_timer: 0.0,
            move_duration: timing.initial_duration,
            hold_timer: 0.0,
            hold_delay: timing.hold_delay,
            is_moving: false,
            is_holding_key: false,
            just_turned: false,
            progress: 0.0,
            walk_duration: timing.walk_duration,
            run_duration: timing.run_duration,
        }
    }

    /// Interpolation factor of the current step, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Centre of the tile-sized box at the render position.
    pub fn focus_point(&self, tile_size: Vec2) -> Vec2 {
        self.position + tile_size * 0.5
    }

    fn step_style(&self, run: bool) -> (f32, Action) {
        if run {
            (self.run_duration, Action::Run)
        } else {
            (self.walk_duration, Action::Walk)
        }
    }

    fn start_move(&mut self, graphics: &mut Graphics, dir: Direction, run: bool) {
        let (duration, action) = self.step_style(run);
        graphics.direction = dir;
        graphics.action = action;
        self.move_duration = duration;
        self.target_tile = self.tile + dir.offset();
        self.is_moving = true;
        self.move_timer = 0.0;
        trace!(from = ?self.tile, to = ?self.target_tile, ?action, "step started");
    }

    fn stop(&mut self, graphics: &mut Graphics) {
        self.is_moving = false;
        self.move_timer = 0.0;
        graphics.action = Action::Idle;
        trace!(tile = ?self.tile, "stopped");
    }

    pub fn update(
        &mut self,
        graphics: &mut Graphics,
        input: &InputSnapshot,
        dt: f32,
        collision: &[CollisionSet],
        tile_size: Vec2,
    ) {
        let held = input.held_direction();
        self.is_holding_key = held.is_some();

        if !self.is_moving {
            match held {
                None => {
                    self.hold_timer = 0.0;
                    self.just_turned = false;
                    graphics.action = Action::Idle;
                }
                Some(dir) if dir != graphics.direction && input.is_pressed(dir) => {
                    graphics.direction = dir;
                    graphics.action = Action::Idle;
                    self.hold_timer = 0.0;
                    self.just_turned = true;
                    trace!(?dir, "turned");
                }
                Some(dir) => {
                    self.hold_timer += dt;
                    if !self.just_turned || self.hold_timer >= self.hold_delay {
                        if is_tile_blocked(collision, self.tile + dir.offset(), tile_size) {
                            graphics.direction = dir;
                            graphics.action = Action::Idle;
                        } else {
                            self.hold_timer = 0.0;
                            self.just_turned = false;
                            self.start_move(graphics, dir, input.run);
                        }
                    }
                }
            }
        }

        if self.is_moving {
            self.move_timer += dt;
            let mut t = step_fraction(self.move_timer, self.move_duration);

            if t >= 1.0 {
                self.tile = self.target_tile;

                let chained = input
                    .held_direction()
                    .map(|dir| (dir, self.tile + dir.offset()))
                    .filter(|(_, next)| !is_tile_blocked(collision, *next, tile_size));

                match chained {
                    Some((dir, next)) => {
                        let (duration, action) = self.step_style(input.run);
                        self.target_tile = next;
                        self.move_timer -= self.move_duration;
                        self.move_duration = duration;
                        graphics.action = action;
                        graphics.direction = dir;
                        t = step_fraction(self.move_timer, self.move_duration);
                        trace!(from = ?self.tile, to = ?next, "step chained");
                    }
                    None => {
                        self.stop(graphics);
                        t = 1.0;
                    }
                }
            }

            self.progress = t.clamp(0.0, 1.0);
            let start = self.tile.as_vec2() * tile_size;
            let end = self.target_tile.as_vec2() * tile_size;
            self.position = start + (end - start) * self.progress;
        }

        if !self.is_moving {
            self.target_tile = self.tile;
            self.position = self.tile.as_vec2() * tile_size;
        }
    }
}

// A zero-length step completes at once instead of producing NaN.
fn step_fraction(timer: f32, duration: f32) -> f32 {
    if duration > 0.0 {
        timer / duration
    } else {
        1.0
    }
}
