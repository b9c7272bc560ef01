//! One game session: the simulation plus pause, mute, restart and the
//! end-of-run name entry. Created when a game starts, reset on restart and
//! dropped when the player leaves.

use crate::highscores::normalize_entry_name;
use crate::input::{InputState, Key};
use crate::rng::SeededRng;
use crate::sim::{new_simulation, GameEvent, GameKind, Hud, NameStyle, RunStats, Scene, Simulation};

/// Characters accepted while typing a full name.
const FULL_NAME_MAX: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    EnteringName,
    Over,
}

/// Everything a renderer may look at for one frame.
pub struct FrameView<'a> {
    pub kind: GameKind,
    pub scene: Scene<'a>,
    pub hud: Hud,
    pub phase: Phase,
    pub muted: bool,
    /// Text typed so far while entering a name.
    pub entry: Option<&'a str>,
    pub events: &'a [GameEvent],
}

/// Draws a frame. Called every frame, paused or not, and never mutates the
/// session.
pub trait Renderer {
    fn render(&mut self, frame: &FrameView<'_>);
}

/// Renderer for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &FrameView<'_>) {}
}

/// Reported to the driver after each frame.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    RunEnded { score: u64, stats: RunStats },
    NameEntered { name: String, score: u64 },
    MuteToggled(bool),
    Restarted { seed: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct NameEntry {
    style: NameStyle,
    buffer: String,
    score: u64,
}

impl NameEntry {
    fn capacity(&self) -> usize {
        match self.style {
            NameStyle::Initials => crate::highscores::INITIALS_LEN,
            NameStyle::FullName => FULL_NAME_MAX,
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self.style {
            NameStyle::Initials => c.is_ascii_alphabetic(),
            NameStyle::FullName => !c.is_control(),
        }
    }

    fn push(&mut self, c: char) {
        if self.accepts(c) && self.buffer.chars().count() < self.capacity() {
            match self.style {
                NameStyle::Initials => self.buffer.push(c.to_ascii_uppercase()),
                NameStyle::FullName => self.buffer.push(c),
            }
        }
    }
}

pub struct GameSession {
    kind: GameKind,
    seed: u32,
    sim: Box<dyn Simulation + Send>,
    input: InputState,
    paused: bool,
    muted: bool,
    /// Set on the tick the run ends; cleared only by a restart.
    terminal: bool,
    entry: Option<NameEntry>,
    events: Vec<GameEvent>,
    frames: u64,
}

impl GameSession {
    pub fn new(kind: GameKind, seed: u32, muted: bool) -> Self {
        Self::with_simulation(new_simulation(kind, seed), seed, muted)
    }

    /// Wraps an already-built simulation; `seed` must be the one it was built
    /// with.
    pub fn with_simulation(sim: Box<dyn Simulation + Send>, seed: u32, muted: bool) -> Self {
        Self {
            kind: sim.kind(),
            seed,
            sim,
            input: InputState::new(),
            paused: false,
            muted,
            terminal: false,
            entry: None,
            events: Vec::new(),
            frames: 0,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn simulation(&self) -> &dyn Simulation {
        self.sim.as_ref()
    }

    pub fn hud(&self) -> Hud {
        self.sim.hud()
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Events raised by the last update, empty after a paused frame.
    pub fn last_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn phase(&self) -> Phase {
        if self.entry.is_some() {
            Phase::EnteringName
        } else if self.terminal {
            Phase::Over
        } else if self.paused {
            Phase::Paused
        } else {
            Phase::Running
        }
    }

    pub fn entry_text(&self) -> Option<&str> {
        self.entry.as_ref().map(|entry| entry.buffer.as_str())
    }

    pub fn set_paused(&mut self, paused: bool) {
        if !self.terminal {
            self.paused = paused;
        }
    }

    /// Opens name entry for a finished run. Ignored while a run is live.
    pub fn begin_name_entry(&mut self, score: u64) {
        if self.terminal {
            self.entry = Some(NameEntry {
                style: self.kind.name_style(),
                buffer: String::new(),
                score,
            });
        }
    }

    /// Starts a fresh run with the next seed in the session's sequence.
    pub fn restart(&mut self) -> u32 {
        self.seed = SeededRng::new(self.seed).next();
        self.sim.reset(self.seed);
        self.paused = false;
        self.terminal = false;
        self.entry = None;
        self.events.clear();
        self.input.clear();
        tracing::debug!(game = %self.kind, seed = self.seed, "session restarted");
        self.seed
    }

    /// Runs one frame: commands, then the update step unless paused or
    /// finished, then the render step.
    pub fn frame(&mut self, renderer: &mut dyn Renderer) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        self.events.clear();

        if self.entry.is_some() {
            self.handle_entry_keys(&mut out);
        } else {
            self.handle_commands(&mut out);
        }

        if !self.paused && !self.terminal {
            self.sim.step(&self.input, &mut self.events);
            if cfg!(debug_assertions) {
                if let Err(rule) = self.sim.validate() {
                    tracing::error!(game = %self.kind, frame = self.frames, %rule, "invariant violated");
                }
            }
            if let Some(score) = self.events.iter().find_map(|event| match event {
                GameEvent::RunEnded { score } => Some(*score),
                _ => None,
            }) {
                self.terminal = true;
                out.push(SessionEvent::RunEnded {
                    score,
                    stats: self.sim.run_stats(),
                });
            }
        }

        renderer.render(&FrameView {
            kind: self.kind,
            scene: self.sim.scene(),
            hud: self.sim.hud(),
            phase: self.phase(),
            muted: self.muted,
            entry: self.entry_text(),
            events: &self.events,
        });

        self.input.end_frame();
        self.frames += 1;
        out
    }

    fn handle_commands(&mut self, out: &mut Vec<SessionEvent>) {
        if self.input.was_pressed(Key::Mute) {
            self.muted = !self.muted;
            out.push(SessionEvent::MuteToggled(self.muted));
        }
        if self.input.was_pressed(Key::Restart) {
            let seed = self.restart();
            out.push(SessionEvent::Restarted { seed });
            return;
        }
        if self.input.was_pressed(Key::Pause) && !self.terminal {
            self.paused = !self.paused;
        }
    }

    fn handle_entry_keys(&mut self, out: &mut Vec<SessionEvent>) {
        let Some(mut entry) = self.entry.take() else {
            return;
        };
        for &key in self.input.pressed() {
            match key {
                Key::Letter(c) => entry.push(c),
                Key::Backspace => {
                    entry.buffer.pop();
                }
                Key::Confirm | Key::Cancel => {
                    if key == Key::Cancel {
                        entry.buffer.clear();
                    }
                    out.push(SessionEvent::NameEntered {
                        name: normalize_entry_name(entry.style, &entry.buffer),
                        score: entry.score,
                    });
                    return;
                }
                _ => {}
            }
        }
        self.entry = Some(entry);
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("kind", &self.kind)
            .field("seed", &self.seed)
            .field("phase", &self.phase())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}
