//! Wire types shared with the leaderboard service and the read-only panel
//! that lists the top scores for one game.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::sim::GameKind;

/// Rows shown by the panel.
pub const PANEL_LIMIT: u32 = 25;
pub const EMPTY_MESSAGE: &str = "No scores yet — be the first!";
pub const ERROR_MESSAGE: &str = "Could not load scores.";
pub const LOADING_MESSAGE: &str = "Loading…";

/// Body of `POST /api/scores`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub game: String,
    pub player: String,
    pub score: u64,
}

/// One element of the `GET /api/scores` array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub player: String,
    pub score: u64,
    pub created_at: String,
}

/// How the client reaches the leaderboard. Calls block; the driver only makes
/// them from its post-frame pump.
pub trait LeaderboardTransport {
    fn post_score(&mut self, submission: &ScoreSubmission) -> Result<(), TransportError>;

    fn fetch_top(&mut self, game: &str, limit: u32) -> Result<Vec<LeaderboardRow>, TransportError>;
}

/// `1234567` -> `1,234,567`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelState {
    Idle,
    Loading,
    Loaded(Vec<LeaderboardRow>),
    Failed,
}

#[derive(Clone, Debug)]
pub struct LeaderboardPanel {
    game: GameKind,
    state: PanelState,
}

impl LeaderboardPanel {
    pub fn new(game: GameKind) -> Self {
        Self {
            game,
            state: PanelState::Idle,
        }
    }

    pub fn game(&self) -> GameKind {
        self.game
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Marks the panel for a fetch on the next pump.
    pub fn request_refresh(&mut self) {
        self.state = PanelState::Loading;
    }

    pub fn refresh_pending(&self) -> bool {
        self.state == PanelState::Loading
    }

    /// Runs a pending fetch. Any transport failure leaves the panel showing the
    /// error line.
    pub fn pump(&mut self, transport: &mut dyn LeaderboardTransport) {
        if !self.refresh_pending() {
            return;
        }
        self.refresh(transport);
    }

    pub fn refresh(&mut self, transport: &mut dyn LeaderboardTransport) {
        self.state = match transport.fetch_top(self.game.id(), PANEL_LIMIT) {
            Ok(mut rows) => {
                rows.truncate(PANEL_LIMIT as usize);
                PanelState::Loaded(rows)
            }
            Err(e) => {
                tracing::warn!(game = %self.game, "leaderboard fetch failed: {e}");
                PanelState::Failed
            }
        };
    }

    pub fn lines(&self) -> Vec<String> {
        match &self.state {
            PanelState::Idle => Vec::new(),
            PanelState::Loading => vec![LOADING_MESSAGE.to_string()],
            PanelState::Failed => vec![ERROR_MESSAGE.to_string()],
            PanelState::Loaded(rows) if rows.is_empty() => vec![EMPTY_MESSAGE.to_string()],
            PanelState::Loaded(rows) => rows
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    format!(
                        "#{} — {} — {}",
                        i + 1,
                        row.player,
                        format_thousands(row.score)
                    )
                })
                .collect(),
        }
    }
}
