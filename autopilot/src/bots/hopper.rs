use arcade_core::sim::hopper::pads::{Pads, PAD_COLS};
use arcade_core::sim::hopper::{row_kind, HopperWorld, RowKind, HOME_ROW, START_ROW};
use arcade_core::{GameKind, Key, Scene};

use super::{Bot, Controls};

const HOP_COOLDOWN_FRAMES: u32 = 6;

/// Moves one tile at a time and only onto tiles that look safe right now.
#[derive(Debug, Default)]
pub struct CautiousHopper {
    cooldown: u32,
}

fn tile_safe(world: &HopperWorld, row: u32, col: i32) -> bool {
    if col < 0 || col >= world.board().cols as i32 {
        return false;
    }
    match row_kind(row) {
        RowKind::Road => (col - 1..=col + 1).all(|c| !world.traffic().overlaps(row, c)),
        RowKind::Water => {
            world.water().carry_speed(row, col).is_some() && !world.water().hazard_at(row, col)
        }
        RowKind::Home => Pads::is_pad(col) && world.pads().is_free(col),
        RowKind::Median | RowKind::Start => true,
    }
}

fn nearest_free_pad(world: &HopperWorld, col: i32) -> Option<i32> {
    PAD_COLS
        .iter()
        .copied()
        .filter(|&pad| world.pads().is_free(pad))
        .min_by_key(|&pad| (pad - col).abs())
}

impl CautiousHopper {
    fn choose(&self, world: &HopperWorld) -> Option<Key> {
        let player = world.player();
        let row = player.row;
        let col = player.col(world.board());

        if row > HOME_ROW && tile_safe(world, row - 1, col) {
            return Some(Key::Up);
        }

        if let Some(pad) = nearest_free_pad(world, col) {
            let step = (pad - col).signum();
            if step != 0 && tile_safe(world, row, col + step) {
                return Some(if step < 0 { Key::Left } else { Key::Right });
            }
        }

        let threatened = row_kind(row) == RowKind::Road && !tile_safe(world, row, col);
        if threatened && row < START_ROW && tile_safe(world, row + 1, col) {
            return Some(Key::Down);
        }
        None
    }
}

impl Bot for CautiousHopper {
    fn id(&self) -> &'static str {
        "hopper-cautious"
    }

    fn game(&self) -> GameKind {
        GameKind::HighwayHopper
    }

    fn decide(&mut self, scene: Scene<'_>) -> Controls {
        let Scene::Hopper(world) = scene else {
            return Controls::default();
        };
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return Controls::default();
        }
        match self.choose(world) {
            Some(key) => {
                self.cooldown = HOP_COOLDOWN_FRAMES;
                Controls::tap(key)
            }
            None => Controls::default(),
        }
    }
}
