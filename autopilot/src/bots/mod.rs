//! Scripted players. A bot looks at the current scene once per frame and
//! answers with the controls to hold or tap before the next update.

mod hopper;
mod paddle;
mod roster;
mod turret;

use arcade_core::{GameKind, InputState, Key, Scene};

pub use roster::{bot_ids, bots_for, create_bot, describe_bots, BotEntry};

pub trait Bot: Send {
    fn id(&self) -> &'static str;
    fn game(&self) -> GameKind;
    fn decide(&mut self, scene: Scene<'_>) -> Controls;
}

/// One frame of controls. Held directions persist until a later frame lets
/// them go; `tap` is a single edge press.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub tap: Option<Key>,
    pub pointer_x: Option<f32>,
}

impl Controls {
    pub fn tap(key: Key) -> Self {
        Self {
            tap: Some(key),
            ..Self::default()
        }
    }

    pub fn apply(&self, input: &mut InputState) {
        for (key, down) in [(Key::Left, self.left), (Key::Right, self.right), (Key::Up, self.up)] {
            if down {
                input.press(key);
            } else {
                input.release(key);
            }
        }
        if let Some(key) = self.tap {
            input.tap(key);
        }
        match self.pointer_x {
            Some(x) => input.set_pointer(x),
            None => input.clear_pointer(),
        }
    }
}

/// Never touches the controls.
#[derive(Clone, Copy, Debug)]
pub struct IdleBot {
    id: &'static str,
    game: GameKind,
}

impl IdleBot {
    pub fn new(id: &'static str, game: GameKind) -> Self {
        Self { id, game }
    }
}

impl Bot for IdleBot {
    fn id(&self) -> &'static str {
        self.id
    }

    fn game(&self) -> GameKind {
        self.game
    }

    fn decide(&mut self, _scene: Scene<'_>) -> Controls {
        Controls::default()
    }
}
