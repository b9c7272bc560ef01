use std::sync::mpsc;
use std::thread;

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};
use api_server::config::AppState;
use api_server::routes;
use api_server::store::ScoreStore;
use arcade_autopilot::runner::{bot_for_play, play_bot};
use arcade_autopilot::transport::HttpBoard;
use arcade_core::leaderboard::{LeaderboardPanel, LeaderboardTransport, PanelState, ScoreSubmission};
use arcade_core::storage::Profile;
use arcade_core::submit::{FixedName, ScoreSubmitter};
use arcade_core::{GameDriver, GameKind, TransportError};

struct TestServer {
    base_url: String,
    handle: ServerHandle,
    thread: Option<thread::JoinHandle<std::io::Result<()>>>,
}

impl TestServer {
    fn start() -> Self {
        let (tx, rx) = mpsc::channel();
        let thread = thread::spawn(move || {
            actix_web::rt::System::new().block_on(async move {
                let store = ScoreStore::open_in_memory().expect("in-memory store");
                let state = AppState::new(store, 20);
                let server = HttpServer::new(move || {
                    App::new()
                        .app_data(web::Data::new(state.clone()))
                        .configure(routes)
                })
                .workers(1)
                .bind(("127.0.0.1", 0))?;
                let addr = server.addrs()[0];
                let server = server.run();
                tx.send((addr, server.handle())).expect("report address");
                server.await
            })
        });
        let (addr, handle) = rx.recv().expect("server started");
        Self {
            base_url: format!("http://{addr}"),
            handle,
            thread: Some(thread),
        }
    }

    fn board(&self) -> HttpBoard {
        HttpBoard::new(&self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        actix_web::rt::System::new().block_on(self.handle.stop(true));
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[test]
fn submitter_posts_through_the_service() {
    let server = TestServer::start();
    let mut board = server.board();
    let mut profile = Profile::in_memory();
    let mut submitter = ScoreSubmitter::new(FixedName("  Ada   Lovelace ".to_string()));

    let posted = submitter
        .submit(GameKind::Breakout, 4_200, &mut profile, &mut board)
        .expect("submit")
        .expect("admitted");
    assert_eq!(posted.player, "Ada Lovelace");
    assert_eq!(profile.best(GameKind::Breakout), 4_200);

    assert_eq!(
        submitter
            .submit(GameKind::Breakout, 9_999, &mut profile, &mut board)
            .expect("guarded"),
        None
    );

    let rows = board.fetch_top("BREAKOUT", 10).expect("fetch");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].player, "Ada Lovelace");
    assert_eq!(rows[0].score, 4_200);

    let mut panel = LeaderboardPanel::new(GameKind::Breakout);
    panel.refresh(&mut board);
    assert_eq!(panel.lines(), vec!["#1 — Ada Lovelace — 4,200"]);

    let mut empty = LeaderboardPanel::new(GameKind::Asteroids);
    empty.refresh(&mut board);
    assert_eq!(empty.state(), &PanelState::Loaded(Vec::new()));
}

#[test]
fn service_rejections_carry_the_error_message() {
    let server = TestServer::start();
    let mut board = server.board();

    let err = board
        .post_score(&ScoreSubmission {
            game: String::new(),
            player: "x".to_string(),
            score: 10,
        })
        .expect_err("empty game");
    assert_eq!(
        err,
        TransportError::Rejected {
            status: 400,
            message: "bad payload".to_string(),
        }
    );

    let err = board
        .post_score(&ScoreSubmission {
            game: "breakout".to_string(),
            player: "x".to_string(),
            score: 2_000_000_000,
        })
        .expect_err("out of range");
    assert_eq!(
        err,
        TransportError::Rejected {
            status: 400,
            message: "score out of range".to_string(),
        }
    );

    assert!(board.fetch_top("breakout", 5).expect("fetch").is_empty());
}

#[test]
fn played_run_reaches_the_service() {
    let server = TestServer::start();
    let mut driver = GameDriver::new(
        GameKind::HighwayHopper,
        0xC0FFEE,
        Profile::in_memory(),
        ScoreSubmitter::new(FixedName("Robo Hopper".to_string())),
        server.board(),
    );
    let mut bot = bot_for_play("hopper-idle").expect("bot");
    let metrics = play_bot(&mut driver, bot.as_mut(), 60 * 200, "Robo");

    assert!(metrics.game_over);
    assert!(matches!(driver.last_submission(), Some(Ok(posted)) if posted.player == "Robo Hopper"));
    assert!(matches!(driver.panel().state(), PanelState::Loaded(rows) if rows.len() == 1));

    let rows = server.board().fetch_top("highway-hopper", 5).expect("fetch");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].score, metrics.final_score);
}
