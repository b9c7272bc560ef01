//! Frame driver tying a session to the local profile and the leaderboard.
//!
//! Each call to [`GameDriver::frame`] runs one update/render pass, applies
//! what the session reported to the profile, then pumps the network: the
//! queued score submission first, then any pending leaderboard refresh.

use crate::error::SubmitError;
use crate::highscores::HighScoreTable;
use crate::input::InputState;
use crate::leaderboard::{LeaderboardPanel, LeaderboardTransport};
use crate::session::{GameSession, Renderer, SessionEvent};
use crate::sim::{GameKind, NameStyle};
use crate::storage::{LifetimeStats, Profile};
use crate::submit::{ScorePosted, ScoreSubmitter};

pub struct GameDriver<T: LeaderboardTransport> {
    session: GameSession,
    profile: Profile,
    submitter: ScoreSubmitter,
    panel: LeaderboardPanel,
    transport: T,
    best: u64,
    last_submission: Option<Result<ScorePosted, SubmitError>>,
}

impl<T: LeaderboardTransport> GameDriver<T> {
    pub fn new(
        kind: GameKind,
        seed: u32,
        profile: Profile,
        submitter: ScoreSubmitter,
        transport: T,
    ) -> Self {
        let session = GameSession::new(kind, seed, profile.muted(kind));
        Self::with_session(session, profile, submitter, transport)
    }

    pub fn with_session(
        session: GameSession,
        profile: Profile,
        submitter: ScoreSubmitter,
        transport: T,
    ) -> Self {
        let kind = session.kind();
        let best = profile.best(kind);
        let mut panel = LeaderboardPanel::new(kind);
        panel.request_refresh();
        tracing::info!(game = %kind, seed = session.seed(), best, "session started");
        Self {
            session,
            profile,
            submitter,
            panel,
            transport,
            best,
            last_submission: None,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.session.kind()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        self.session.input_mut()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn panel(&self) -> &LeaderboardPanel {
        &self.panel
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn high_scores(&self) -> HighScoreTable {
        self.profile.high_scores(self.kind())
    }

    pub fn lifetime_stats(&self) -> LifetimeStats {
        self.profile.lifetime_stats(self.kind())
    }

    /// Outcome of the most recent submission attempt.
    pub fn last_submission(&self) -> Option<&Result<ScorePosted, SubmitError>> {
        self.last_submission.as_ref()
    }

    /// Queues a retry after a failed submission. Returns false when the run is
    /// still live or the score was already accepted.
    pub fn retry_submission(&mut self) -> bool {
        if !self.session.is_terminal() {
            return false;
        }
        let score = self.session.hud().score;
        self.submitter.queue(self.kind(), score)
    }

    pub fn frame(&mut self, renderer: &mut dyn Renderer) -> Vec<SessionEvent> {
        let events = self.session.frame(renderer);
        for event in &events {
            self.apply(event);
        }
        self.pump_network();
        events
    }

    fn apply(&mut self, event: &SessionEvent) {
        let kind = self.kind();
        match event {
            SessionEvent::RunEnded { score, stats } => {
                let score = *score;
                tracing::info!(game = %kind, score, ticks = stats.ticks, "run ended");

                match self.profile.record_best(kind, score) {
                    Ok(best) => self.best = best,
                    Err(e) => {
                        tracing::warn!(game = %kind, "failed to store best score: {e}");
                        self.best = self.best.max(score);
                    }
                }

                let mut lifetime = self.profile.lifetime_stats(kind);
                lifetime.fold(score, stats);
                if let Err(e) = self.profile.save_lifetime_stats(kind, &lifetime) {
                    tracing::warn!(game = %kind, "failed to store lifetime stats: {e}");
                }

                self.submitter.queue(kind, score);

                if self.profile.high_scores(kind).qualifies(score) {
                    self.session.begin_name_entry(score);
                } else {
                    self.panel.request_refresh();
                }
            }
            SessionEvent::NameEntered { name, score } => {
                let mut table = self.profile.high_scores(kind);
                let rank = table.insert(name.clone(), *score);
                if let Err(e) = self.profile.save_high_scores(kind, &table) {
                    tracing::warn!(game = %kind, "failed to store high scores: {e}");
                }
                tracing::info!(game = %kind, name = %name, score, ?rank, "local high score");

                if kind.name_style() == NameStyle::FullName && self.profile.player_name().is_none() {
                    if let Err(e) = self.profile.set_player_name(name) {
                        tracing::warn!("failed to store player name: {e}");
                    }
                }
                self.panel.request_refresh();
            }
            SessionEvent::MuteToggled(muted) => {
                if let Err(e) = self.profile.set_muted(kind, *muted) {
                    tracing::warn!(game = %kind, "failed to store mute flag: {e}");
                }
            }
            SessionEvent::Restarted { .. } => {
                self.submitter.reset();
            }
        }
    }

    fn pump_network(&mut self) {
        if let Some(result) = self.submitter.pump(&mut self.profile, &mut self.transport) {
            if let Ok(posted) = &result {
                self.best = self.best.max(posted.score);
                self.panel.request_refresh();
            }
            self.last_submission = Some(result);
        }
        self.panel.pump(&mut self.transport);
    }
}

impl<T: LeaderboardTransport> std::fmt::Debug for GameDriver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameDriver")
            .field("session", &self.session)
            .field("best", &self.best)
            .finish_non_exhaustive()
    }
}
