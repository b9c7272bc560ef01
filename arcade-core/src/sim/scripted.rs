//! A stand-in simulation that ends after a fixed number of ticks with a fixed
//! score, for exercising session and driver plumbing.

use crate::error::RuleCode;
use crate::input::InputState;

use super::{BreakoutWorld, GameEvent, GameKind, Hud, RunStats, Scene, Simulation};

pub(crate) struct ScriptedSim {
    kind: GameKind,
    backdrop: BreakoutWorld,
    length: u32,
    remaining: u32,
    score: u64,
    over: bool,
    stats: RunStats,
}

impl ScriptedSim {
    pub(crate) fn new(kind: GameKind, length: u32, score: u64) -> Self {
        Self {
            kind,
            backdrop: BreakoutWorld::new(1),
            length,
            remaining: length,
            score,
            over: false,
            stats: RunStats::default(),
        }
    }
}

impl Simulation for ScriptedSim {
    fn kind(&self) -> GameKind {
        self.kind
    }

    fn step(&mut self, _input: &InputState, events: &mut Vec<GameEvent>) {
        if self.over {
            return;
        }
        self.stats.ticks += 1;
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.over = true;
            self.stats.lives_lost = 3;
            events.push(GameEvent::RunEnded { score: self.score });
        }
    }

    fn reset(&mut self, _seed: u32) {
        self.remaining = self.length;
        self.over = false;
        self.stats = RunStats::default();
    }

    fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            lives: if self.over { 0 } else { 3 },
            level: 1,
            timer: None,
            countdown: None,
        }
    }

    fn is_over(&self) -> bool {
        self.over
    }

    fn run_stats(&self) -> RunStats {
        self.stats
    }

    fn scene(&self) -> Scene<'_> {
        Scene::Breakout(&self.backdrop)
    }

    fn validate(&self) -> Result<(), RuleCode> {
        Ok(())
    }
}
