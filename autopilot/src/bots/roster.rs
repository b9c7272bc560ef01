use arcade_core::GameKind;

use super::hopper::CautiousHopper;
use super::paddle::PaddleTracker;
use super::turret::Turret;
use super::{Bot, IdleBot};

pub struct BotEntry {
    pub id: &'static str,
    pub game: GameKind,
    pub description: &'static str,
    build: fn() -> Box<dyn Bot>,
}

static ROSTER: [BotEntry; 6] = [
    BotEntry {
        id: "asteroids-turret",
        game: GameKind::Asteroids,
        description: "Holds position, turns toward the nearest target and fires on alignment.",
        build: turret,
    },
    BotEntry {
        id: "asteroids-idle",
        game: GameKind::Asteroids,
        description: "Never moves or fires.",
        build: asteroids_idle,
    },
    BotEntry {
        id: "breakout-tracker",
        game: GameKind::Breakout,
        description: "Steers the paddle to the predicted landing point of the ball.",
        build: paddle_tracker,
    },
    BotEntry {
        id: "breakout-idle",
        game: GameKind::Breakout,
        description: "Leaves the paddle where it starts.",
        build: breakout_idle,
    },
    BotEntry {
        id: "hopper-cautious",
        game: GameKind::HighwayHopper,
        description: "Hops forward only onto clear tiles and heads for the nearest free pad.",
        build: cautious_hopper,
    },
    BotEntry {
        id: "hopper-idle",
        game: GameKind::HighwayHopper,
        description: "Waits on the start row until the timer runs out.",
        build: hopper_idle,
    },
];

fn turret() -> Box<dyn Bot> {
    Box::new(Turret::default())
}

fn paddle_tracker() -> Box<dyn Bot> {
    Box::new(PaddleTracker::default())
}

fn cautious_hopper() -> Box<dyn Bot> {
    Box::new(CautiousHopper::default())
}

fn asteroids_idle() -> Box<dyn Bot> {
    Box::new(IdleBot::new("asteroids-idle", GameKind::Asteroids))
}

fn breakout_idle() -> Box<dyn Bot> {
    Box::new(IdleBot::new("breakout-idle", GameKind::Breakout))
}

fn hopper_idle() -> Box<dyn Bot> {
    Box::new(IdleBot::new("hopper-idle", GameKind::HighwayHopper))
}

fn roster() -> &'static [BotEntry] {
    &ROSTER
}

pub fn bot_ids() -> Vec<&'static str> {
    roster().iter().map(|entry| entry.id).collect()
}

pub fn bots_for(game: GameKind) -> Vec<&'static str> {
    roster()
        .iter()
        .filter(|entry| entry.game == game)
        .map(|entry| entry.id)
        .collect()
}

pub fn describe_bots() -> Vec<(&'static str, GameKind, &'static str)> {
    roster()
        .iter()
        .map(|entry| (entry.id, entry.game, entry.description))
        .collect()
}

pub fn create_bot(id: &str) -> Option<Box<dyn Bot>> {
    let id = id.trim();
    roster()
        .iter()
        .find(|entry| entry.id == id)
        .map(|entry| (entry.build)())
}
