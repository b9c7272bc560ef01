//! One-shot score submission to the leaderboard service.

use crate::error::SubmitError;
use crate::highscores::{sanitize_name, DEFAULT_PLAYER_NAME};
use crate::leaderboard::{LeaderboardTransport, ScoreSubmission};
use crate::sim::GameKind;
use crate::storage::Profile;

/// Largest score the client will send.
pub const MAX_SCORE: u64 = 1_000_000_000;
pub const NAME_PROMPT: &str = "Enter a name for the leaderboard (max 24 chars):";

/// Asks the player for a leaderboard name. `None` means the prompt was
/// dismissed.
pub trait NamePrompt {
    fn ask(&mut self, message: &str, default: &str) -> Option<String>;
}

/// Answers every prompt with the same name.
#[derive(Clone, Debug)]
pub struct FixedName(pub String);

impl NamePrompt for FixedName {
    fn ask(&mut self, _message: &str, _default: &str) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Dismisses every prompt.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPrompt;

impl NamePrompt for NoPrompt {
    fn ask(&mut self, _message: &str, _default: &str) -> Option<String> {
        None
    }
}

/// What listeners receive after the service accepted a score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScorePosted {
    pub game: GameKind,
    pub player: String,
    pub score: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Queued { game: GameKind, score: u64 },
    InFlight,
    Sent,
}

pub type ScoreListener = Box<dyn FnMut(&ScorePosted) + Send>;

pub struct ScoreSubmitter {
    state: SubmitState,
    prompt: Box<dyn NamePrompt + Send>,
    listeners: Vec<ScoreListener>,
}

impl ScoreSubmitter {
    pub fn new(prompt: impl NamePrompt + Send + 'static) -> Self {
        Self {
            state: SubmitState::Idle,
            prompt: Box::new(prompt),
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn has_pending(&self) -> bool {
        matches!(self.state, SubmitState::Queued { .. })
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&ScorePosted) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Re-arms the guard for a new run.
    pub fn reset(&mut self) {
        self.state = SubmitState::Idle;
    }

    /// Admits at most one submission until the guard is cleared. Returns
    /// whether this call was admitted.
    pub fn queue(&mut self, game: GameKind, score: u64) -> bool {
        if self.state != SubmitState::Idle {
            tracing::debug!(game = %game, score, "score already submitted for this run");
            return false;
        }
        self.state = SubmitState::Queued { game, score };
        true
    }

    /// Sends a queued submission, if any. A failed attempt re-opens the guard.
    pub fn pump(
        &mut self,
        profile: &mut Profile,
        transport: &mut dyn LeaderboardTransport,
    ) -> Option<Result<ScorePosted, SubmitError>> {
        let SubmitState::Queued { game, score } = self.state else {
            return None;
        };
        self.state = SubmitState::InFlight;

        let result = self.send(game, score, profile, transport);
        match &result {
            Ok(posted) => {
                tracing::info!(game = %posted.game, player = %posted.player, score, "score posted");
                self.state = SubmitState::Sent;
            }
            Err(e) => {
                tracing::warn!(game = %game, score, "score submit failed: {e}");
                self.state = SubmitState::Idle;
            }
        }
        Some(result)
    }

    /// Queues and immediately sends. `Ok(None)` when the guard was closed.
    pub fn submit(
        &mut self,
        game: GameKind,
        score: u64,
        profile: &mut Profile,
        transport: &mut dyn LeaderboardTransport,
    ) -> Result<Option<ScorePosted>, SubmitError> {
        if !self.queue(game, score) {
            return Ok(None);
        }
        self.pump(profile, transport).transpose()
    }

    /// Stored name if there is one, otherwise asks once and stores the answer.
    pub fn player_name(&mut self, profile: &mut Profile) -> String {
        if let Some(stored) = profile.player_name() {
            return sanitize_name(&stored);
        }
        let answer = self
            .prompt
            .ask(NAME_PROMPT, DEFAULT_PLAYER_NAME)
            .unwrap_or_default();
        let name = sanitize_name(&answer);
        if let Err(e) = profile.set_player_name(&name) {
            tracing::warn!("failed to store player name: {e}");
        }
        name
    }

    fn send(
        &mut self,
        game: GameKind,
        score: u64,
        profile: &mut Profile,
        transport: &mut dyn LeaderboardTransport,
    ) -> Result<ScorePosted, SubmitError> {
        if score > MAX_SCORE {
            return Err(SubmitError::ScoreOutOfRange { score });
        }

        let player = self.player_name(profile);
        transport.post_score(&ScoreSubmission {
            game: game.id().to_string(),
            player: player.clone(),
            score,
        })?;

        if let Err(e) = profile.record_best(game, score) {
            tracing::warn!(game = %game, "failed to store best score: {e}");
        }

        let posted = ScorePosted {
            game,
            player,
            score,
        };
        for listener in &mut self.listeners {
            listener(&posted);
        }
        Ok(posted)
    }
}

impl std::fmt::Debug for ScoreSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreSubmitter")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
