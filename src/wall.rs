use ratatui::layout::Rect;

/// Physics space the wall simulation runs in. Terminal cells come into play
/// only at draw time, where this court is scaled onto the board area.
pub const COURT_WIDTH: f32 = 60.0;
pub const COURT_HEIGHT: f32 = 40.0;

pub const STARTING_BALLS: u8 = 3;
pub const LEVEL_COUNT: usize = 4;

const BRICK_ROWS: usize = 3;
const BRICKS_PER_ROW: usize = 10;
const BRICK_TOP: f32 = 3.0;
const BRICK_HEIGHT: f32 = 1.6;

const PADDLE_WIDTH: f32 = 9.0;
const PADDLE_SPEED: f32 = 34.0; // court units per second
pub const PADDLE_Y: f32 = COURT_HEIGHT - 2.0;

const BALL_SPEED: f32 = 26.0; // court units per second
const PADDLE_ENGLISH: f32 = 8.0;
const MAX_BALL_VX: f32 = 20.0;

/// Steel shrugs off most hits; only this fraction registers.
const STEEL_HIT_CHANCE: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickKind {
    Clay,
    Cement,
    Steel,
}

impl BrickKind {
    fn hits(self) -> u8 {
        match self {
            BrickKind::Clay | BrickKind::Steel => 1,
            BrickKind::Cement => 2,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            BrickKind::Clay => 10,
            BrickKind::Cement => 25,
            BrickKind::Steel => 40,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Brick {
    pub kind: BrickKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    hp: u8,
}

impl Brick {
    fn new(kind: BrickKind, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            kind,
            x,
            y,
            w,
            h,
            hp: kind.hits(),
        }
    }

    pub fn is_broken(&self) -> bool {
        self.hp == 0
    }

    /// Cement survives its first registered hit.
    pub fn is_damaged(&self) -> bool {
        self.hp > 0 && self.hp < self.kind.hits()
    }

    /// Apply one ball impact. Returns whether the hit registered at all
    /// (steel ignores most of them).
    fn take_hit(&mut self) -> bool {
        if self.kind == BrickKind::Steel && rand::random::<f32>() >= STEEL_HIT_CHANCE {
            return false;
        }
        self.hp = self.hp.saturating_sub(1);
        true
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

#[derive(Debug, Clone)]
pub struct Paddle {
    /// Center X in court units.
    pub x: f32,
    pub width: f32,
    speed: f32, // signed; set by the move commands, applied each tick
}

impl Paddle {
    pub fn move_left(&mut self) {
        self.speed = -PADDLE_SPEED;
    }

    pub fn move_right(&mut self) {
        self.speed = PADDLE_SPEED;
    }

    pub fn stop(&mut self) {
        self.speed = 0.0;
    }
}

/// What one impact-resolution pass produced.
#[derive(Debug, Default, Clone, Copy)]
pub struct Impacts {
    pub points: u32,
    pub bricks_broken: u32,
}

/// The wall model: ball, bricks and paddle, plus level progression and the
/// ball budget. The board controller drives it through the operations below
/// and owns the running score itself; impacts report their points back by
/// value.
#[derive(Debug)]
pub struct Wall {
    pub bricks: Vec<Brick>,
    pub ball: Ball,
    pub paddle: Paddle,
    level: usize,
    balls_left: u8,
    ball_lost: bool,
    speed_scale: f32,
}

impl Wall {
    /// Build the wall with level 1 in place and a ball ready to serve.
    pub fn new(speed_scale: f32) -> Self {
        let mut wall = Self {
            bricks: build_bricks(1),
            ball: Ball {
                x: COURT_WIDTH / 2.0,
                y: PADDLE_Y - 1.0,
                vx: 0.0,
                vy: 0.0,
            },
            paddle: Paddle {
                x: COURT_WIDTH / 2.0,
                width: PADDLE_WIDTH,
                speed: 0.0,
            },
            level: 1,
            balls_left: STARTING_BALLS,
            ball_lost: false,
            speed_scale: speed_scale.clamp(0.5, 2.0),
        };
        wall.ball_reset();
        wall
    }

    /// Advance paddle and ball by one fixed timestep.
    pub fn move_entities(&mut self, dt: f32) {
        let half = self.paddle.width / 2.0;
        self.paddle.x =
            (self.paddle.x + self.paddle.speed * dt).clamp(half, COURT_WIDTH - half);

        self.ball.x += self.ball.vx * dt;
        self.ball.y += self.ball.vy * dt;
    }

    /// Resolve collisions for the current ball position: paddle, court
    /// borders, at most one brick, then the floor. Points for bricks broken
    /// this pass come back in the returned `Impacts`.
    pub fn find_impacts(&mut self) -> Impacts {
        let mut impacts = Impacts::default();
        let ball = &mut self.ball;

        // paddle, only while the ball is dropping onto it
        let half = self.paddle.width / 2.0;
        if ball.vy > 0.0
            && (ball.y - PADDLE_Y).abs() <= 0.5
            && (ball.x - self.paddle.x).abs() <= half
        {
            let offset = (ball.x - self.paddle.x) / half; // -1 .. 1
            ball.vy = -ball.vy.abs();
            ball.vx = (ball.vx + offset * PADDLE_ENGLISH).clamp(-MAX_BALL_VX, MAX_BALL_VX);
        }

        // court borders
        if ball.x <= 0.0 {
            ball.vx = ball.vx.abs();
        } else if ball.x >= COURT_WIDTH {
            ball.vx = -ball.vx.abs();
        }
        if ball.y <= 0.0 {
            ball.vy = ball.vy.abs();
        }

        // bricks; one impact per pass
        for brick in self.bricks.iter_mut().filter(|b| !b.is_broken()) {
            let inside = ball.x >= brick.x
                && ball.x <= brick.x + brick.w
                && ball.y >= brick.y
                && ball.y <= brick.y + brick.h;
            if !inside {
                continue;
            }

            // reflect on the shallower penetration axis and snap the ball
            // out of the brick, so one contact registers exactly one hit
            let pen_left = ball.x - brick.x;
            let pen_right = brick.x + brick.w - ball.x;
            let pen_top = ball.y - brick.y;
            let pen_bottom = brick.y + brick.h - ball.y;
            if pen_top.min(pen_bottom) <= pen_left.min(pen_right) {
                if pen_top < pen_bottom {
                    ball.vy = -ball.vy.abs();
                    ball.y = brick.y - 0.01;
                } else {
                    ball.vy = ball.vy.abs();
                    ball.y = brick.y + brick.h + 0.01;
                }
            } else if pen_left < pen_right {
                ball.vx = -ball.vx.abs();
                ball.x = brick.x - 0.01;
            } else {
                ball.vx = ball.vx.abs();
                ball.x = brick.x + brick.w + 0.01;
            }

            if brick.take_hit() && brick.is_broken() {
                impacts.points += brick.kind.points();
                impacts.bricks_broken += 1;
            }
            break;
        }

        // floor
        if !self.ball_lost && ball.y >= COURT_HEIGHT {
            self.ball_lost = true;
            self.balls_left = self.balls_left.saturating_sub(1);
        }

        impacts
    }

    pub fn is_ball_lost(&self) -> bool {
        self.ball_lost
    }

    /// The ball budget ran out.
    pub fn ball_ended(&self) -> bool {
        self.balls_left == 0
    }

    /// Current level fully cleared.
    pub fn is_done(&self) -> bool {
        self.brick_count() == 0
    }

    pub fn has_next_level(&self) -> bool {
        self.level < LEVEL_COUNT
    }

    pub fn next_level(&mut self) {
        if self.level < LEVEL_COUNT {
            self.level += 1;
            self.bricks = build_bricks(self.level);
        }
    }

    /// Rebuild the current level's bricks and restore the ball budget.
    pub fn wall_reset(&mut self) {
        self.bricks = build_bricks(self.level);
        self.balls_left = STARTING_BALLS;
    }

    /// Recenter paddle and ball and roll a fresh serve direction.
    pub fn ball_reset(&mut self) {
        self.paddle.x = COURT_WIDTH / 2.0;
        self.paddle.speed = 0.0;
        self.ball.x = COURT_WIDTH / 2.0;
        self.ball.y = PADDLE_Y - 1.0;

        let speed = BALL_SPEED * self.speed_scale;
        let lean = rand::random_range(0.3f32..0.7);
        let dir = if rand::random_range(0..=1) == 0 {
            1.0
        } else {
            -1.0
        };
        self.ball.vx = dir * lean * speed;
        self.ball.vy = -(speed * speed - self.ball.vx * self.ball.vx).sqrt();

        self.ball_lost = false;
    }

    pub fn brick_count(&self) -> u32 {
        self.bricks.iter().filter(|b| !b.is_broken()).count() as u32
    }

    pub fn ball_count(&self) -> u8 {
        self.balls_left
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Scale a court-space rectangle onto terminal cells inside `inner`.
    /// The result is clamped so it never spills past the board area.
    pub fn court_rect_to_cells(inner: Rect, x: f32, y: f32, w: f32, h: f32) -> Rect {
        let sx = inner.width as f32 / COURT_WIDTH;
        let sy = inner.height as f32 / COURT_HEIGHT;
        let left = ((x * sx) as u16).min(inner.width.saturating_sub(1));
        let top = ((y * sy) as u16).min(inner.height.saturating_sub(1));
        let right = (((x + w) * sx).ceil() as u16).clamp(left + 1, inner.width.max(left + 1));
        let bottom = (((y + h) * sy).ceil() as u16).clamp(top + 1, inner.height.max(top + 1));
        Rect::new(inner.x + left, inner.y + top, right - left, bottom - top)
    }
}

/// Level layouts: all clay, then chessboard mixes that get meaner.
fn brick_kind_at(level: usize, row: usize, col: usize) -> BrickKind {
    let alternate = (row + col) % 2 == 0;
    match level {
        1 => BrickKind::Clay,
        2 => {
            if alternate {
                BrickKind::Clay
            } else {
                BrickKind::Cement
            }
        }
        3 => {
            if alternate {
                BrickKind::Clay
            } else {
                BrickKind::Steel
            }
        }
        _ => {
            if alternate {
                BrickKind::Steel
            } else {
                BrickKind::Cement
            }
        }
    }
}

fn build_bricks(level: usize) -> Vec<Brick> {
    let brick_w = COURT_WIDTH / BRICKS_PER_ROW as f32;
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICKS_PER_ROW);
    for row in 0..BRICK_ROWS {
        for col in 0..BRICKS_PER_ROW {
            bricks.push(Brick::new(
                brick_kind_at(level, row, col),
                col as f32 * brick_w,
                BRICK_TOP + row as f32 * BRICK_HEIGHT,
                brick_w,
                BRICK_HEIGHT,
            ));
        }
    }
    bricks
}

#[cfg(test)]
impl Wall {
    pub(crate) fn smash_all_bricks(&mut self) {
        for brick in &mut self.bricks {
            brick.hp = 0;
        }
    }

    pub(crate) fn drain_balls_to(&mut self, balls: u8) {
        self.balls_left = balls;
    }
}
