use macroquad::math::{ivec2, IVec2};

/// Facing / movement direction. `Front` faces the viewer (down the screen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Front,
    Back,
    Left,
    Right,
}

const DIRECTION_COUNT: usize = 4;

impl Direction {
    /// Polling order when several direction keys are held: up, down, left, right.
    pub const PRIORITY: [Direction; DIRECTION_COUNT] = [
        Direction::Back,
        Direction::Front,
        Direction::Left,
        Direction::Right,
    ];

    /// Tile step for one move in this direction.
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::Front => ivec2(0, 1),
            Direction::Back => ivec2(0, -1),
            Direction::Left => ivec2(-1, 0),
            Direction::Right => ivec2(1, 0),
        }
    }

    const fn index(self) -> usize {
        match self {
            Direction::Front => 0,
            Direction::Back => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Input state for one frame. Key pairs (WASD / arrows) are folded into one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    down: [bool; DIRECTION_COUNT],
    pressed: [bool; DIRECTION_COUNT],
    /// Run modifier held.
    pub run: bool,
    /// Scroll wheel steps this frame, positive zooms in.
    pub scroll: f32,
}

impl InputSnapshot {
    pub fn set_down(&mut self, dir: Direction, is_down: bool) {
        self.down[dir.index()] = is_down;
    }

    pub fn set_pressed(&mut self, dir: Direction, is_pressed: bool) {
        self.pressed[dir.index()] = is_pressed;
    }

    /// Level-triggered: key is held this frame.
    pub fn is_down(&self, dir: Direction) -> bool {
        self.down[dir.index()]
    }

    /// Edge-triggered: key went down this frame.
    pub fn is_pressed(&self, dir: Direction) -> bool {
        self.pressed[dir.index()]
    }

    /// The single direction acted on this frame, by [`Direction::PRIORITY`].
    pub fn held_direction(&self) -> Option<Direction> {
        Direction::PRIORITY.into_iter().find(|d| self.is_down(*d))
    }

    /// Snapshot with `dir` held since an earlier frame.
    pub fn holding(dir: Direction) -> Self {
        let mut input = Self::default();
        input.set_down(dir, true);
        input
    }

    /// Snapshot with `dir` pressed this frame.
    pub fn pressing(dir: Direction) -> Self {
        let mut input = Self::holding(dir);
        input.set_pressed(dir, true);
        input
    }

    pub fn with_run(mut self, run: bool) -> Self {
        self.run = run;
        self
    }

    pub fn with_scroll(mut self, scroll: f32) -> Self {
        self.scroll = scroll;
        self
    }
}
