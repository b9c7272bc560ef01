use anyhow::{anyhow, Context, Result};
use arcade_core::leaderboard::{LeaderboardPanel, LeaderboardTransport};
use arcade_core::storage::{JsonFileStore, Profile};
use arcade_core::submit::{FixedName, ScoreSubmitter};
use arcade_core::{GameDriver, GameKind};
use arcade_autopilot::benchmark::{resolve_bots, run_benchmark, BenchmarkConfig};
use arcade_autopilot::bots::describe_bots;
use arcade_autopilot::runner::{bot_for_play, play_bot, run_bot};
use arcade_autopilot::transport::{HttpBoard, LocalBoard, Offline};
use arcade_autopilot::util::{parse_seed, resolve_seeds, format_seed};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "arcade-autopilot")]
#[command(about = "Headless bot runner, benchmark and local leaderboard tools for the arcade cabinets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available bots
    ListBots,
    /// Play one headless run and print the outcome
    Run {
        #[arg(long)]
        bot: String,
        #[arg(long, default_value = "0x5eed")]
        seed: String,
        #[arg(long, default_value_t = 36_000)]
        max_frames: u64,
    },
    /// Play one run through the full driver: local profile, high-score table
    /// and leaderboard submission
    Play {
        #[arg(long)]
        bot: String,
        #[arg(long, default_value = "0x5eed")]
        seed: String,
        #[arg(long, default_value_t = 36_000)]
        max_frames: u64,
        /// JSON file holding the local profile
        #[arg(long, default_value = "arcade-profile.json")]
        profile: PathBuf,
        /// Leaderboard data directory; without it or --api-url the leaderboard
        /// is offline
        #[arg(long)]
        db: Option<PathBuf>,
        /// Base URL of a running leaderboard service
        #[arg(long, conflicts_with = "db")]
        api_url: Option<String>,
        /// Name submitted to the leaderboard and typed into the local table
        #[arg(long, default_value = "BOT")]
        name: String,
    },
    /// Run multi-seed benchmark across one or more bots
    Benchmark {
        #[arg(long)]
        bots: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long, default_value_t = 36_000)]
        max_frames: u64,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Print the leaderboard panel for a game from a local data directory or
    /// a running service
    Scores {
        #[arg(long, required_unless_present = "api_url")]
        db: Option<PathBuf>,
        #[arg(long, conflicts_with = "db")]
        api_url: Option<String>,
        #[arg(long, default_value = "breakout")]
        game: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match Cli::parse().command {
        Commands::ListBots => {
            for (id, game, description) in describe_bots() {
                println!("{id:20} {:15} {description}", game.id());
            }
        }
        Commands::Run {
            bot,
            seed,
            max_frames,
        } => {
            let seed = parse_seed(&seed)?;
            let metrics = run_bot(&bot, seed, max_frames)?;
            println!("bot={}", metrics.bot_id);
            println!("game={}", metrics.game);
            println!("seed={}", metrics.seed_hex);
            println!("frames={}", metrics.frame_count);
            println!("score={}", metrics.final_score);
            println!("lives={}", metrics.final_lives);
            println!("level={}", metrics.final_level);
            println!("game_over={}", metrics.game_over);
            println!("accuracy={:.1}", metrics.stats.accuracy());
        }
        Commands::Play {
            bot,
            seed,
            max_frames,
            profile,
            db,
            api_url,
            name,
        } => {
            let seed = parse_seed(&seed)?;
            let store = JsonFileStore::open(&profile)
                .with_context(|| format!("failed opening profile {}", profile.display()))?;
            let profile = Profile::new(store);
            match (db, api_url) {
                (Some(dir), _) => play(&bot, seed, max_frames, profile, LocalBoard::open(&dir)?, &name)?,
                (None, Some(url)) => play(&bot, seed, max_frames, profile, HttpBoard::new(&url), &name)?,
                (None, None) => play(&bot, seed, max_frames, profile, Offline, &name)?,
            }
        }
        Commands::Benchmark {
            bots,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            max_frames,
            out_dir,
            jobs,
        } => {
            let bots = resolve_bots(bots.as_deref())?;
            let seeds = resolve_seeds(
                seeds.as_deref(),
                seed_file.as_deref(),
                seed_start.as_deref(),
                seed_count,
            )?;

            let report = run_benchmark(BenchmarkConfig {
                bots,
                seeds,
                max_frames,
                out_dir: out_dir.clone(),
                jobs,
            })?;

            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            if let Some(out_dir) = out_dir {
                println!("out_dir={}", out_dir.display());
            }
            println!("bots:");
            for (idx, bot) in report.bot_rankings.iter().enumerate() {
                println!(
                    "  {}. {} [{}] avg_score={:.1} max_score={} avg_frames={:.1} avg_level={:.2} game_over={:.0}% accuracy={:.1}",
                    idx + 1,
                    bot.bot_id,
                    bot.game,
                    bot.avg_score,
                    bot.max_score,
                    bot.avg_frames,
                    bot.avg_level,
                    bot.game_over_rate * 100.0,
                    bot.accuracy,
                );
            }
        }
        Commands::Scores { db, api_url, game } => {
            let kind = GameKind::from_id(&game).ok_or_else(|| anyhow!("unknown game '{game}'"))?;
            let mut panel = LeaderboardPanel::new(kind);
            match (db, api_url) {
                (Some(dir), _) => panel.refresh(&mut LocalBoard::open(&dir)?),
                (None, Some(url)) => panel.refresh(&mut HttpBoard::new(&url)),
                (None, None) => return Err(anyhow!("pass --db or --api-url")),
            }
            println!("{}", kind.title());
            for line in panel.lines() {
                println!("  {line}");
            }
        }
    }

    Ok(())
}

fn play<T: LeaderboardTransport>(
    bot_id: &str,
    seed: u32,
    max_frames: u64,
    profile: Profile,
    transport: T,
    name: &str,
) -> Result<()> {
    let mut bot = bot_for_play(bot_id)?;
    let submitter = ScoreSubmitter::new(FixedName(name.to_string()));
    let mut driver = GameDriver::new(bot.game(), seed, profile, submitter, transport);
    let metrics = play_bot(&mut driver, bot.as_mut(), max_frames, name);

    println!("bot={}", metrics.bot_id);
    println!("game={}", metrics.game);
    println!("seed={}", format_seed(seed));
    println!("frames={}", metrics.frame_count);
    println!("score={}", metrics.final_score);
    println!("best={}", driver.best());
    match driver.last_submission() {
        Some(Ok(posted)) => println!("submitted={} as {}", posted.score, posted.player),
        Some(Err(e)) => println!("submission_failed={e}"),
        None => println!("submitted=none"),
    }

    let lifetime = driver.lifetime_stats();
    println!("lifetime_runs={}", lifetime.runs);
    println!("lifetime_score={}", lifetime.total_score);

    println!("local high scores:");
    for line in driver.high_scores().lines() {
        println!("  {line}");
    }
    println!("leaderboard:");
    for line in driver.panel().lines() {
        println!("  {line}");
    }
    Ok(())
}
