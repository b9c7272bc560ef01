use std::f32::consts::{PI, TAU};

use arcade_core::sim::asteroids::{WORLD_HEIGHT, WORLD_WIDTH};
use arcade_core::{GameKind, Key, Scene};

use super::{Bot, Controls};

const TURN_DEADBAND: f32 = 0.05;
const FIRE_CONE: f32 = 0.12;
const FIRE_COOLDOWN_FRAMES: u32 = 8;

/// Stationary gunner: rotate toward the closest threat and shoot once lined
/// up.
#[derive(Debug, Default)]
pub struct Turret {
    cooldown: u32,
}

/// Shortest signed offset between two coordinates on a wrapping axis.
fn wrapped_delta(from: f32, to: f32, span: f32) -> f32 {
    let mut d = to - from;
    if d > span / 2.0 {
        d -= span;
    } else if d < -span / 2.0 {
        d += span;
    }
    d
}

fn normalize_angle(angle: f32) -> f32 {
    let a = (angle + PI).rem_euclid(TAU);
    a - PI
}

impl Bot for Turret {
    fn id(&self) -> &'static str {
        "asteroids-turret"
    }

    fn game(&self) -> GameKind {
        GameKind::Asteroids
    }

    fn decide(&mut self, scene: Scene<'_>) -> Controls {
        let Scene::Asteroids(world) = scene else {
            return Controls::default();
        };
        self.cooldown = self.cooldown.saturating_sub(1);

        let ship = world.ship();
        let targets = world
            .asteroids()
            .iter()
            .map(|a| (a.x, a.y))
            .chain(world.alien().map(|alien| (alien.x, alien.y)));
        let nearest = targets
            .map(|(x, y)| {
                let dx = wrapped_delta(ship.x, x, WORLD_WIDTH);
                let dy = wrapped_delta(ship.y, y, WORLD_HEIGHT);
                (dx, dy, dx * dx + dy * dy)
            })
            .min_by(|a, b| a.2.total_cmp(&b.2));
        let Some((dx, dy, _)) = nearest else {
            return Controls::default();
        };

        // Screen y grows downward while the ship's heading is measured
        // counter-clockwise.
        let desired = (-dy).atan2(dx);
        let error = normalize_angle(desired - ship.angle);

        let mut controls = Controls {
            left: error > TURN_DEADBAND,
            right: error < -TURN_DEADBAND,
            ..Controls::default()
        };
        if error.abs() < FIRE_CONE && self.cooldown == 0 {
            controls.tap = Some(Key::Fire);
            self.cooldown = FIRE_COOLDOWN_FRAMES;
        }
        controls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::session::NullRenderer;
    use arcade_core::GameSession;

    #[test]
    fn wrapped_delta_takes_the_short_way() {
        assert_eq!(wrapped_delta(10.0, 950.0, 960.0), -20.0);
        assert_eq!(wrapped_delta(950.0, 10.0, 960.0), 20.0);
        assert_eq!(wrapped_delta(100.0, 300.0, 960.0), 200.0);
    }

    #[test]
    fn normalized_angles_stay_in_half_turn() {
        for raw in [-7.0f32, -PI, 0.0, 3.0, 9.5] {
            let a = normalize_angle(raw);
            assert!((-PI..PI).contains(&a), "{raw} -> {a}");
        }
    }

    #[test]
    fn turret_fires_during_a_run() {
        let mut bot = Turret::default();
        let mut session = GameSession::new(GameKind::Asteroids, 0xA57E_0001, true);
        for _ in 0..600 {
            if session.is_terminal() {
                break;
            }
            let controls = bot.decide(session.simulation().scene());
            controls.apply(session.input_mut());
            session.frame(&mut NullRenderer);
        }
        assert!(session.simulation().run_stats().shots > 0);
    }
}
