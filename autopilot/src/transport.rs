//! Leaderboard transports for headless play: an HTTP client for a running
//! leaderboard service, a local SQLite board that applies the same submission
//! rules in-process, and an offline stand-in.

use std::future::Future;
use std::path::Path;

use anyhow::{anyhow, Result};
use api_server::config::{MAX_SCORE_LIMIT, MIN_SCORE_LIMIT};
use api_server::store::ScoreStore;
use api_server::types::NewScore;
use arcade_core::leaderboard::{LeaderboardRow, LeaderboardTransport, ScoreSubmission};
use arcade_core::TransportError;

pub struct LocalBoard {
    store: ScoreStore,
}

impl LocalBoard {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let store = ScoreStore::open(data_dir).map_err(|e| anyhow!(e))?;
        Ok(Self { store })
    }

    pub fn in_memory() -> Result<Self> {
        let store = ScoreStore::open_in_memory().map_err(|e| anyhow!(e))?;
        Ok(Self { store })
    }

    pub fn store(&self) -> &ScoreStore {
        &self.store
    }
}

impl LeaderboardTransport for LocalBoard {
    fn post_score(&mut self, submission: &ScoreSubmission) -> Result<(), TransportError> {
        let body = serde_json::to_value(submission)
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        let score = NewScore::from_json(&body).map_err(|e| TransportError::Rejected {
            status: 400,
            message: e.message().to_string(),
        })?;
        self.store.insert(&score).map_err(TransportError::Unavailable)
    }

    fn fetch_top(&mut self, game: &str, limit: u32) -> Result<Vec<LeaderboardRow>, TransportError> {
        let game = game.to_lowercase();
        let limit = limit.clamp(MIN_SCORE_LIMIT, MAX_SCORE_LIMIT);
        self.store.top(&game, limit).map_err(TransportError::Unavailable)
    }
}

/// Talks to a leaderboard service over HTTP. Each call runs on its own
/// short-lived actix system, so it must not be made from inside one.
#[derive(Clone, Debug)]
pub struct HttpBoard {
    base_url: String,
}

impl HttpBoard {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn scores_url(&self) -> String {
        format!("{}/api/scores", self.base_url)
    }
}

impl LeaderboardTransport for HttpBoard {
    fn post_score(&mut self, submission: &ScoreSubmission) -> Result<(), TransportError> {
        let url = self.scores_url();
        block_on(async move {
            let mut resp = awc::Client::default()
                .post(&url)
                .send_json(submission)
                .await
                .map_err(|e| TransportError::Unavailable(e.to_string()))?;
            if resp.status().is_success() {
                return Ok(());
            }
            let body = resp.body().await.unwrap_or_default();
            Err(rejection(resp.status().as_u16(), &body))
        })
    }

    fn fetch_top(&mut self, game: &str, limit: u32) -> Result<Vec<LeaderboardRow>, TransportError> {
        let url = self.scores_url();
        let limit = limit.to_string();
        block_on(async move {
            let request = awc::Client::default()
                .get(&url)
                .query(&[("game", game), ("limit", limit.as_str())])
                .map_err(|e| TransportError::Decode(e.to_string()))?;
            let mut resp = request
                .send()
                .await
                .map_err(|e| TransportError::Unavailable(e.to_string()))?;
            if !resp.status().is_success() {
                let body = resp.body().await.unwrap_or_default();
                return Err(rejection(resp.status().as_u16(), &body));
            }
            resp.json::<Vec<LeaderboardRow>>()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))
        })
    }
}

fn block_on<F: Future>(fut: F) -> F::Output {
    actix_web::rt::System::new().block_on(fut)
}

/// Non-2xx answer; the message is the body's `error` field when present.
fn rejection(status: u16, body: &[u8]) -> TransportError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());
    TransportError::Rejected { status, message }
}

/// Every call fails as if the service were unreachable.
#[derive(Clone, Copy, Debug, Default)]
pub struct Offline;

impl LeaderboardTransport for Offline {
    fn post_score(&mut self, _submission: &ScoreSubmission) -> Result<(), TransportError> {
        Err(TransportError::Unavailable("offline".to_string()))
    }

    fn fetch_top(&mut self, _game: &str, _limit: u32) -> Result<Vec<LeaderboardRow>, TransportError> {
        Err(TransportError::Unavailable("offline".to_string()))
    }
}
