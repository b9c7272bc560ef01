use arcade_core::sim::breakout::{FIELD_WIDTH, PADDLE_Y};
use arcade_core::{GameKind, Scene};

use super::{Bot, Controls};

/// Follows the ball, aiming for where it will cross the paddle line.
#[derive(Debug, Default)]
pub struct PaddleTracker;

/// Folds a straight-line x position back into `[min, max]` as if it had
/// bounced off both walls.
fn reflect_into(x: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span <= 0.0 {
        return min;
    }
    let p = (x - min).rem_euclid(2.0 * span);
    if p > span {
        min + 2.0 * span - p
    } else {
        min + p
    }
}

impl Bot for PaddleTracker {
    fn id(&self) -> &'static str {
        "breakout-tracker"
    }

    fn game(&self) -> GameKind {
        GameKind::Breakout
    }

    fn decide(&mut self, scene: Scene<'_>) -> Controls {
        let Scene::Breakout(world) = scene else {
            return Controls::default();
        };
        let ball = world.ball();
        let target = if ball.vy > 0.0 {
            let frames = (PADDLE_Y - ball.y) / ball.vy;
            reflect_into(ball.x + ball.vx * frames, ball.r, FIELD_WIDTH - ball.r)
        } else {
            ball.x
        };
        Controls {
            pointer_x: Some(target),
            ..Controls::default()
        }
    }
}
