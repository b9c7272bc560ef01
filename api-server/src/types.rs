use serde::Deserialize;
use serde_json::Value;

pub use arcade_core::leaderboard::LeaderboardRow;

use crate::config::{DEFAULT_GAME, MAX_SCORE_LIMIT, MIN_SCORE_LIMIT};
use crate::response::{BAD_PAYLOAD, SCORE_OUT_OF_RANGE};

pub const MAX_PLAYER_CHARS: usize = 24;
pub const DEFAULT_PLAYER: &str = "player";
pub const MAX_SCORE: f64 = 1e9;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScoresQuery {
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl ScoresQuery {
    /// Lower-cased game id, `breakout` when absent or empty. Surrounding
    /// whitespace is kept.
    pub fn game(&self) -> String {
        match self.game.as_deref() {
            Some(game) if !game.is_empty() => game.to_lowercase(),
            _ => DEFAULT_GAME.to_string(),
        }
    }

    /// Requested row count. Non-numeric or non-finite falls back to
    /// `default`; anything else is floored and clamped to `[1, 100]`.
    pub fn limit(&self, default: u32) -> u32 {
        let requested = self
            .limit
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|value| value.is_finite());
        let value = match requested {
            Some(value) => value.floor(),
            None => f64::from(default),
        };
        value.clamp(f64::from(MIN_SCORE_LIMIT), f64::from(MAX_SCORE_LIMIT)) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    BadPayload,
    OutOfRange,
}

impl PayloadError {
    pub fn message(self) -> &'static str {
        match self {
            Self::BadPayload => BAD_PAYLOAD,
            Self::OutOfRange => SCORE_OUT_OF_RANGE,
        }
    }
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// A validated `POST /api/scores` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScore {
    pub game: String,
    pub player: String,
    pub score: u64,
}

impl NewScore {
    /// Applies the submission rules to an already-parsed JSON body. Numbers
    /// and numeric strings are both accepted as scores.
    pub fn from_json(body: &Value) -> Result<Self, PayloadError> {
        let game = loose_string(body.get("game")).to_lowercase();
        let player: String = loose_string(body.get("player"))
            .trim()
            .chars()
            .take(MAX_PLAYER_CHARS)
            .collect();
        let player = if player.is_empty() {
            DEFAULT_PLAYER.to_string()
        } else {
            player
        };

        let score = loose_number(body.get("score")).ok_or(PayloadError::BadPayload)?;
        if game.is_empty() || !score.is_finite() {
            return Err(PayloadError::BadPayload);
        }
        if !(0.0..=MAX_SCORE).contains(&score) {
            return Err(PayloadError::OutOfRange);
        }

        Ok(Self {
            game,
            player,
            score: score.floor() as u64,
        })
    }
}

/// Strings pass through, numbers and `true` are stringified, anything else
/// is empty.
fn loose_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}

fn loose_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
