use super::Action;
use crate::input::Direction;

/// First sprite-sheet row of an action's four-row block.
fn base_row(action: Action) -> u32 {
    match action {
        Action::Idle | Action::Walk => 0,
        Action::Run => 4,
    }
}

fn direction_row(direction: Direction) -> u32 {
    match direction {
        Direction::Front => 0,
        Direction::Left => 1,
        Direction::Right => 2,
        Direction::Back => 3,
    }
}

pub fn sprite_row(action: Action, direction: Direction) -> u32 {
    base_row(action) + direction_row(direction)
}

/// Ping-pong walk cycle over frames 0..=2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub frame: i32,
    pub frame_timer: f32,
    pub frame_direction: i32,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            frame: 0,
            frame_timer: 0.0,
            frame_direction: 1,
        }
    }
}

impl Animation {
    pub const LAST_FRAME: i32 = 2;
    /// Resting pose shown while idle.
    pub const IDLE_FRAME: i32 = 1;

    pub fn update(&mut self, action: Action, move_duration: f32, dt: f32) {
        if action == Action::Idle {
            self.frame = Self::IDLE_FRAME;
            self.frame_timer = 0.0;
            return;
        }

        self.frame_timer += dt;
        if self.frame_timer >= move_duration / 3.0 {
            self.frame += self.frame_direction;
            if self.frame >= Self::LAST_FRAME {
                self.frame = Self::LAST_FRAME;
                self.frame_direction = -1;
            } else if self.frame <= 0 {
                self.frame = 0;
                self.frame_direction = 1;
            }
            self.frame_timer = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_combine_action_block_and_direction() {
        assert_eq!(sprite_row(Action::Idle, Direction::Front), 0);
        assert_eq!(sprite_row(Action::Walk, Direction::Left), 1);
        assert_eq!(sprite_row(Action::Walk, Direction::Right), 2);
        assert_eq!(sprite_row(Action::Walk, Direction::Back), 3);
        assert_eq!(sprite_row(Action::Run, Direction::Front), 4);
        assert_eq!(sprite_row(Action::Run, Direction::Back), 7);
    }

    #[test]
    fn walking_frames_ping_pong() {
        let mut anim = Animation::default();
        let period = 0.3 / 3.0;
        let mut frames = Vec::new();
        for _ in 0..6 {
            // one full period per step
            anim.update(Action::Walk, 0.3, period + 0.001);
            frames.push(anim.frame);
        }
        assert_eq!(frames, vec![1, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn frame_holds_until_period_elapses() {
        let mut anim = Animation::default();
        anim.update(Action::Run, 0.3, 0.05);
        assert_eq!(anim.frame, 0);
        assert!((anim.frame_timer - 0.05).abs() < 1e-6);
        anim.update(Action::Run, 0.3, 0.06);
        assert_eq!(anim.frame, 1);
        assert_eq!(anim.frame_timer, 0.0);
    }

    #[test]
    fn idle_forces_resting_frame() {
        let mut anim = Animation {
            frame: 2,
            frame_timer: 0.07,
            frame_direction: -1,
        };
        anim.update(Action::Idle, 0.42, 0.5);
        assert_eq!(anim.frame, Animation::IDLE_FRAME);
        assert_eq!(anim.frame_timer, 0.0);
    }
}
