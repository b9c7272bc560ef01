//! Local persistence: a string key-value seam plus typed per-game accessors.
//!
//! Reads never fail outward. A missing or unreadable value degrades to its
//! default and is logged; writes report their error so the caller can log it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::highscores::{HighScoreEntry, HighScoreTable};
use crate::sim::{GameKind, RunStats};

pub const PLAYER_NAME_KEY: &str = "player_name";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Whole-file JSON object of string values. Every write rewrites the file
/// through a temporary sibling and a rename.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens `path`, treating a missing file as empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StorageError::Parse {
                key: path.display().to_string(),
                message: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StorageError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let io_err = |e: std::io::Error| StorageError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let encoded = serde_json::to_vec_pretty(&self.values).map_err(|e| StorageError::Encode {
            key: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, encoded).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Totals across every finished run of one game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LifetimeStats {
    pub runs: u32,
    pub total_score: u64,
    pub ticks: u64,
    pub shots: u64,
    pub hits: u64,
    #[serde(alias = "asteroidsDestroyed")]
    pub obstacles_destroyed: u64,
    pub aliens_killed: u64,
    pub lives_lost: u64,
    pub levels_cleared: u64,
    pub hops: u64,
    pub pads_filled: u64,
    pub passengers: u64,
}

impl LifetimeStats {
    pub fn fold(&mut self, score: u64, run: &RunStats) {
        self.runs += 1;
        self.total_score += score;
        self.ticks += run.ticks;
        self.shots += u64::from(run.shots);
        self.hits += u64::from(run.hits);
        self.obstacles_destroyed += u64::from(run.obstacles_destroyed);
        self.aliens_killed += u64::from(run.aliens_killed);
        self.lives_lost += u64::from(run.lives_lost);
        self.levels_cleared += u64::from(run.levels_cleared);
        self.hops += u64::from(run.hops);
        self.pads_filled += u64::from(run.pads_filled);
        self.passengers += u64::from(run.passengers);
    }

    pub fn accuracy(&self) -> f32 {
        if self.shots == 0 {
            0.0
        } else {
            100.0 * self.hits as f32 / self.shots as f32
        }
    }
}

fn key(kind: GameKind, suffix: &str) -> String {
    format!("{}_{suffix}", kind.storage_prefix())
}

pub fn muted_key(kind: GameKind) -> String {
    key(kind, "muted")
}

pub fn best_key(kind: GameKind) -> String {
    key(kind, "best")
}

pub fn highscores_key(kind: GameKind) -> String {
    key(kind, "highscores_v2")
}

pub fn stats_key(kind: GameKind) -> String {
    key(kind, "stats_v1")
}

/// Typed view over a [`KeyValueStore`].
pub struct Profile {
    store: Box<dyn KeyValueStore + Send>,
}

impl Profile {
    pub fn new(store: impl KeyValueStore + Send + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Raw read that logs and swallows backend failures.
    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "profile read failed: {e}");
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, "ignoring unreadable profile value: {e}");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(|e| StorageError::Encode {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(key, &encoded)
    }

    pub fn muted(&self, kind: GameKind) -> bool {
        matches!(self.read(&muted_key(kind)).as_deref(), Some("1" | "true"))
    }

    pub fn set_muted(&mut self, kind: GameKind, muted: bool) -> Result<(), StorageError> {
        self.store
            .set(&muted_key(kind), if muted { "1" } else { "0" })
    }

    pub fn best(&self, kind: GameKind) -> u64 {
        let Some(raw) = self.read(&best_key(kind)) else {
            return 0;
        };
        // Older profiles may hold a float.
        raw.trim()
            .parse::<u64>()
            .ok()
            .or_else(|| {
                raw.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .map(|v| v.floor() as u64)
            })
            .unwrap_or_else(|| {
                tracing::warn!(game = %kind, value = %raw, "ignoring unreadable best score");
                0
            })
    }

    /// Stores `score` when it beats the current best. Returns the best after
    /// the update.
    pub fn record_best(&mut self, kind: GameKind, score: u64) -> Result<u64, StorageError> {
        let best = self.best(kind);
        if score <= best {
            return Ok(best);
        }
        self.store.set(&best_key(kind), &score.to_string())?;
        Ok(score)
    }

    pub fn high_scores(&self, kind: GameKind) -> HighScoreTable {
        let entries: Vec<HighScoreEntry> =
            self.read_json(&highscores_key(kind)).unwrap_or_default();
        HighScoreTable::from_entries(entries)
    }

    pub fn save_high_scores(
        &mut self,
        kind: GameKind,
        table: &HighScoreTable,
    ) -> Result<(), StorageError> {
        self.write_json(&highscores_key(kind), &table.entries())
    }

    pub fn lifetime_stats(&self, kind: GameKind) -> LifetimeStats {
        self.read_json(&stats_key(kind)).unwrap_or_default()
    }

    pub fn save_lifetime_stats(
        &mut self,
        kind: GameKind,
        stats: &LifetimeStats,
    ) -> Result<(), StorageError> {
        self.write_json(&stats_key(kind), stats)
    }

    /// The shared leaderboard name, if one was ever stored and is not blank.
    pub fn player_name(&self) -> Option<String> {
        self.read(PLAYER_NAME_KEY)
            .filter(|name| !name.trim().is_empty())
    }

    pub fn set_player_name(&mut self, name: &str) -> Result<(), StorageError> {
        self.store.set(PLAYER_NAME_KEY, name)
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io {
                path: key.to_string(),
                message: "disk on fire".to_string(),
            })
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            self.get(key).map(|_| ())
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.get(key).map(|_| ())
        }
    }

    #[test]
    fn keys_are_namespaced_per_game() {
        assert_eq!(muted_key(GameKind::Breakout), "breakout_muted");
        assert_eq!(best_key(GameKind::Asteroids), "asteroids_best");
        assert_eq!(
            highscores_key(GameKind::HighwayHopper),
            "highway_hopper_highscores_v2"
        );
        assert_eq!(stats_key(GameKind::Asteroids), "asteroids_stats_v1");
    }

    #[test]
    fn best_only_moves_up() {
        let mut profile = Profile::in_memory();
        assert_eq!(profile.best(GameKind::Breakout), 0);
        assert_eq!(profile.record_best(GameKind::Breakout, 300).ok(), Some(300));
        assert_eq!(profile.record_best(GameKind::Breakout, 120).ok(), Some(300));
        assert_eq!(profile.best(GameKind::Breakout), 300);
        assert_eq!(profile.best(GameKind::Asteroids), 0);
    }

    #[test]
    fn unreadable_values_fall_back_to_defaults() {
        let profile = Profile::new(MemoryStore::with_values([
            ("breakout_best", "lots"),
            ("asteroids_best", "1250.7"),
            ("breakout_highscores_v2", "{not json"),
            ("breakout_stats_v1", "[]"),
            ("player_name", "   "),
        ]));
        assert_eq!(profile.best(GameKind::Breakout), 0);
        assert_eq!(profile.best(GameKind::Asteroids), 1250);
        assert!(profile.high_scores(GameKind::Breakout).is_empty());
        assert_eq!(
            profile.lifetime_stats(GameKind::Breakout),
            LifetimeStats::default()
        );
        assert_eq!(profile.player_name(), None);
    }

    #[test]
    fn failing_backend_degrades_instead_of_panicking() {
        let mut profile = Profile::new(BrokenStore);
        assert!(!profile.muted(GameKind::Asteroids));
        assert_eq!(profile.best(GameKind::Asteroids), 0);
        assert!(profile.set_muted(GameKind::Asteroids, true).is_err());
    }

    #[test]
    fn muted_flag_round_trips_per_game() {
        let mut profile = Profile::in_memory();
        profile
            .set_muted(GameKind::Breakout, true)
            .expect("memory store write");
        assert!(profile.muted(GameKind::Breakout));
        assert!(!profile.muted(GameKind::HighwayHopper));
        assert_eq!(
            profile.store().get("breakout_muted").ok().flatten().as_deref(),
            Some("1")
        );
    }

    #[test]
    fn legacy_stats_keys_are_accepted() {
        let profile = Profile::new(MemoryStore::with_values([(
            "asteroids_stats_v1",
            r#"{"shots":10,"hits":4,"asteroidsDestroyed":3,"aliensKilled":1}"#,
        )]));
        let stats = profile.lifetime_stats(GameKind::Asteroids);
        assert_eq!(stats.shots, 10);
        assert_eq!(stats.obstacles_destroyed, 3);
        assert_eq!(stats.aliens_killed, 1);
        assert_eq!(stats.accuracy(), 40.0);
    }

    #[test]
    fn lifetime_stats_fold_runs() {
        let mut stats = LifetimeStats::default();
        let run = RunStats {
            ticks: 600,
            shots: 8,
            hits: 2,
            ..RunStats::default()
        };
        stats.fold(150, &run);
        stats.fold(50, &run);
        assert_eq!(stats.runs, 2);
        assert_eq!(stats.total_score, 200);
        assert_eq!(stats.ticks, 1200);
        assert_eq!(stats.shots, 16);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("profile.json");

        let mut profile = Profile::new(JsonFileStore::open(&path).expect("open new"));
        profile.set_player_name("Ada").expect("write name");
        profile
            .record_best(GameKind::HighwayHopper, 910)
            .expect("write best");

        let reopened = Profile::new(JsonFileStore::open(&path).expect("reopen"));
        assert_eq!(reopened.player_name().as_deref(), Some("Ada"));
        assert_eq!(reopened.best(GameKind::HighwayHopper), 910);
    }

    #[test]
    fn corrupt_profile_file_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("profile.json");
        fs::write(&path, b"not json").expect("seed file");
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StorageError::Parse { .. })
        ));
    }
}
