use crate::bots::{bot_ids, create_bot};
use crate::runner::{run_bot, RunMetrics};
use anyhow::{anyhow, Context, Result};
use arcade_core::GameKind;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_frames: u64,
    pub out_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotAggregate {
    pub bot_id: String,
    pub game: GameKind,
    pub runs: usize,
    pub avg_score: f64,
    pub max_score: u64,
    pub avg_frames: f64,
    pub avg_level: f64,
    pub game_over_rate: f64,
    pub accuracy: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub max_frames: u64,
    pub jobs: Option<usize>,
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub bot_rankings: Vec<BotAggregate>,
    pub runs: Vec<RunMetrics>,
}

pub fn resolve_bots(input: Option<&str>) -> Result<Vec<String>> {
    let bots: Vec<String> = match input {
        None => bot_ids().iter().map(|id| (*id).to_string()).collect(),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
    };
    if bots.is_empty() {
        return Err(anyhow!("--bots resolved to empty list"));
    }
    if let Some(unknown) = bots.iter().find(|id| create_bot(id).is_none()) {
        let available = bot_ids().join(", ");
        return Err(anyhow!("unknown bot '{unknown}'. available: {available}"));
    }
    Ok(bots)
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.bots.is_empty() {
        return Err(anyhow!("benchmark requires at least one bot"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
    }

    let run_jobs: Vec<(String, u32)> = config
        .bots
        .iter()
        .flat_map(|bot| config.seeds.iter().map(move |seed| (bot.clone(), *seed)))
        .collect();

    let run_one = |(bot_id, seed): &(String, u32)| -> Result<RunMetrics> {
        run_bot(bot_id, *seed, config.max_frames)
            .with_context(|| format!("benchmark run failed for bot={bot_id} seed={seed:#x}"))
    };

    let run_results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(run_results.len());
    for result in run_results {
        runs.push(result?);
    }
    tracing::info!(runs = runs.len(), "benchmark runs complete");

    let mut rankings = aggregate(&runs);
    rankings.sort_by(|a, b| {
        b.avg_score
            .total_cmp(&a.avg_score)
            .then_with(|| b.avg_frames.total_cmp(&a.avg_frames))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
    });

    runs.sort_by(|a, b| {
        b.final_score
            .cmp(&a.final_score)
            .then_with(|| b.frame_count.cmp(&a.frame_count))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
            .then_with(|| a.seed.cmp(&b.seed))
    });

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        max_frames: config.max_frames,
        jobs: config.jobs,
        bots: config.bots,
        seeds: config.seeds,
        run_count: runs.len(),
        bot_rankings: rankings,
        runs,
    };

    if let Some(out_dir) = &config.out_dir {
        write_report(out_dir, &report)?;
    }
    Ok(report)
}

fn aggregate(runs: &[RunMetrics]) -> Vec<BotAggregate> {
    let mut grouped: HashMap<&str, Vec<&RunMetrics>> = HashMap::new();
    for run in runs {
        grouped.entry(run.bot_id.as_str()).or_default().push(run);
    }

    grouped
        .into_iter()
        .filter_map(|(bot_id, bot_runs)| {
            let first = bot_runs.first()?;
            let count = bot_runs.len() as f64;
            let shots: u64 = bot_runs.iter().map(|r| u64::from(r.stats.shots)).sum();
            let hits: u64 = bot_runs.iter().map(|r| u64::from(r.stats.hits)).sum();
            Some(BotAggregate {
                bot_id: bot_id.to_string(),
                game: first.game,
                runs: bot_runs.len(),
                avg_score: bot_runs.iter().map(|r| r.final_score as f64).sum::<f64>() / count,
                max_score: bot_runs.iter().map(|r| r.final_score).max().unwrap_or_default(),
                avg_frames: bot_runs.iter().map(|r| r.frame_count as f64).sum::<f64>() / count,
                avg_level: bot_runs.iter().map(|r| f64::from(r.final_level)).sum::<f64>() / count,
                game_over_rate: bot_runs.iter().filter(|r| r.game_over).count() as f64 / count,
                accuracy: if shots == 0 {
                    0.0
                } else {
                    100.0 * hits as f64 / shots as f64
                },
            })
        })
        .collect()
}

pub fn write_report(out_dir: &Path, report: &BenchmarkReport) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed creating {}", out_dir.display()))?;
    write_runs_csv(&out_dir.join("runs.csv"), &report.runs)?;

    let report_path = out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))
}

fn write_runs_csv(path: &Path, rows: &[RunMetrics]) -> Result<()> {
    let mut csv =
        String::from("bot_id,game,seed_hex,seed,frame_count,final_score,final_lives,final_level,game_over\n");
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            row.bot_id,
            row.game,
            row.seed_hex,
            row.seed,
            row.frame_count,
            row.final_score,
            row.final_lives,
            row.final_level,
            row.game_over
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolve_bots_validates_ids() {
        assert_eq!(resolve_bots(None).unwrap().len(), bot_ids().len());
        assert_eq!(
            resolve_bots(Some(" hopper-idle, ,breakout-idle")).unwrap(),
            vec!["hopper-idle".to_string(), "breakout-idle".to_string()]
        );
        assert!(resolve_bots(Some(" , ")).is_err());
        assert!(resolve_bots(Some("hopper-idle,ghost")).is_err());
    }

    #[test]
    fn benchmark_aggregates_and_writes_report() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("bench");
        let report = run_benchmark(BenchmarkConfig {
            bots: vec!["hopper-idle".to_string(), "breakout-tracker".to_string()],
            seeds: vec![1, 2],
            max_frames: 600,
            out_dir: Some(out_dir.clone()),
            jobs: Some(2),
        })
        .unwrap();

        assert_eq!(report.run_count, 4);
        assert_eq!(report.bot_rankings.len(), 2);
        let idle = report
            .bot_rankings
            .iter()
            .find(|agg| agg.bot_id == "hopper-idle")
            .unwrap();
        assert_eq!(idle.runs, 2);
        assert_eq!(idle.avg_score, 0.0);
        assert_eq!(idle.game, GameKind::HighwayHopper);

        let summary: BenchmarkReport =
            serde_json::from_slice(&fs::read(out_dir.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary.run_count, 4);
        let csv = fs::read_to_string(out_dir.join("runs.csv")).unwrap();
        assert_eq!(csv.lines().count(), 5);
    }

    #[test]
    fn zero_jobs_is_rejected() {
        let err = run_benchmark(BenchmarkConfig {
            bots: vec!["hopper-idle".to_string()],
            seeds: vec![1],
            max_frames: 10,
            out_dir: None,
            jobs: Some(0),
        })
        .unwrap_err();
        assert!(err.to_string().contains("--jobs"));
    }
}
