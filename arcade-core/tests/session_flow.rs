use arcade_core::error::TransportError;
use arcade_core::leaderboard::{LeaderboardRow, LeaderboardTransport, PanelState, ScoreSubmission};
use arcade_core::session::{FrameView, Phase, Renderer};
use arcade_core::storage::{JsonFileStore, Profile};
use arcade_core::submit::{NoPrompt, ScoreSubmitter};
use arcade_core::{GameDriver, GameKind, Key, Scene};
use tempfile::TempDir;

#[derive(Default)]
struct InMemoryBoard {
    posted: Vec<ScoreSubmission>,
}

impl LeaderboardTransport for InMemoryBoard {
    fn post_score(&mut self, submission: &ScoreSubmission) -> Result<(), TransportError> {
        self.posted.push(submission.clone());
        Ok(())
    }

    fn fetch_top(&mut self, game: &str, limit: u32) -> Result<Vec<LeaderboardRow>, TransportError> {
        Ok(self
            .posted
            .iter()
            .filter(|row| row.game == game)
            .take(limit as usize)
            .map(|row| LeaderboardRow {
                player: row.player.clone(),
                score: row.score,
                created_at: "2024-05-01 12:00:00".to_string(),
            })
            .collect())
    }
}

#[derive(Default)]
struct TallyRenderer {
    frames: u64,
    paused_frames: u64,
    hopper_scenes: u64,
}

impl Renderer for TallyRenderer {
    fn render(&mut self, frame: &FrameView<'_>) {
        self.frames += 1;
        if frame.phase == Phase::Paused {
            self.paused_frames += 1;
        }
        if matches!(frame.scene, Scene::Hopper(_)) {
            self.hopper_scenes += 1;
        }
    }
}

#[test]
fn idle_hopper_run_ends_submits_and_persists() {
    let dir = TempDir::new().expect("tempdir");
    let profile_path = dir.path().join("profile.json");
    let profile = Profile::new(JsonFileStore::open(&profile_path).expect("open profile"));

    let mut driver = GameDriver::new(
        GameKind::HighwayHopper,
        0x5EED,
        profile,
        ScoreSubmitter::new(NoPrompt),
        InMemoryBoard::default(),
    );
    let mut renderer = TallyRenderer::default();

    driver.input_mut().tap(Key::Pause);
    driver.frame(&mut renderer);
    for _ in 0..9 {
        driver.frame(&mut renderer);
    }
    driver.input_mut().tap(Key::Pause);

    for _ in 0..60 * 120 {
        driver.frame(&mut renderer);
        if driver.session().is_terminal() {
            break;
        }
    }
    assert!(driver.session().is_terminal());
    assert_eq!(renderer.paused_frames, 10);
    assert_eq!(renderer.frames, renderer.hopper_scenes);

    assert_eq!(driver.transport().posted.len(), 1);
    assert_eq!(driver.transport().posted[0].game, "highway-hopper");
    assert_eq!(driver.transport().posted[0].player, "Player");
    assert!(matches!(driver.panel().state(), PanelState::Loaded(rows) if rows.len() == 1));

    assert_eq!(driver.session().phase(), Phase::EnteringName);
    for c in "Sam Q".chars() {
        driver.input_mut().tap(Key::Letter(c));
    }
    driver.input_mut().tap(Key::Confirm);
    driver.frame(&mut renderer);
    assert_eq!(driver.session().phase(), Phase::Over);

    let reopened = Profile::new(JsonFileStore::open(&profile_path).expect("reopen profile"));
    let table = reopened.high_scores(GameKind::HighwayHopper);
    assert_eq!(table.entries().len(), 1);
    assert_eq!(table.entries()[0].name, "Sam Q");
    assert_eq!(reopened.lifetime_stats(GameKind::HighwayHopper).runs, 1);
    assert_eq!(reopened.lifetime_stats(GameKind::HighwayHopper).lives_lost, 3);
    assert_eq!(reopened.player_name().as_deref(), Some("Player"));
}
