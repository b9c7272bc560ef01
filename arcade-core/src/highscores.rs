//! Local top-10 table kept in the profile under `<prefix>_highscores_v2`.

use serde::{Deserialize, Serialize};

use crate::sim::NameStyle;

pub const TABLE_SIZE: usize = 10;
pub const INITIALS_LEN: usize = 3;
pub const PLACEHOLDER_INITIALS: &str = "???";
pub const MAX_NAME_LEN: usize = 24;
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// One row as stored on disk: `{"n": name, "s": score}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "s")]
    pub score: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighScoreTable {
    entries: Vec<HighScoreEntry>,
}

impl HighScoreTable {
    /// Builds a table from stored rows, re-sorting and truncating whatever was
    /// on disk.
    pub fn from_entries(mut entries: Vec<HighScoreEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(TABLE_SIZE);
        Self { entries }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<HighScoreEntry> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|entry| entry.score)
    }

    /// A score makes the table while it has room, otherwise only by beating
    /// the lowest row outright.
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < TABLE_SIZE {
            return true;
        }
        self.entries.last().is_some_and(|lowest| score > lowest.score)
    }

    /// Inserts below any equal scores and returns the zero-based rank, or
    /// `None` when the score fell off the bottom.
    pub fn insert(&mut self, name: impl Into<String>, score: u64) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|entry| entry.score < score)
            .unwrap_or(self.entries.len());
        if rank >= TABLE_SIZE {
            return None;
        }
        self.entries.insert(
            rank,
            HighScoreEntry {
                name: name.into(),
                score,
            },
        );
        self.entries.truncate(TABLE_SIZE);
        Some(rank)
    }

    /// `#rank — name — score` lines; a single placeholder line when empty.
    pub fn lines(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec!["No scores yet".to_string()];
        }
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("#{} — {} — {}", i + 1, entry.name, entry.score))
            .collect()
    }
}

/// Letters only, upper-cased, at most three. Blank input becomes `???`.
pub fn normalize_initials(raw: &str) -> String {
    let initials: String = raw
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(INITIALS_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if initials.is_empty() {
        PLACEHOLDER_INITIALS.to_string()
    } else {
        initials
    }
}

/// Collapses whitespace runs, trims and caps at 24 characters. Blank input
/// becomes `Player`.
pub fn sanitize_name(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let name: String = collapsed.chars().take(MAX_NAME_LEN).collect();
    let name = name.trim_end();
    if name.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        name.to_string()
    }
}

pub fn normalize_entry_name(style: NameStyle, raw: &str) -> String {
    match style {
        NameStyle::Initials => normalize_initials(raw),
        NameStyle::FullName => sanitize_name(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_table() -> HighScoreTable {
        let mut table = HighScoreTable::default();
        for i in 1..=TABLE_SIZE as u64 {
            table.insert("AAA", i * 100);
        }
        table
    }

    #[test]
    fn stored_rows_are_resorted_and_truncated() {
        let rows = (0..14)
            .map(|i| HighScoreEntry {
                name: format!("P{i}"),
                score: (i * 37 % 11) as u64,
            })
            .collect();
        let table = HighScoreTable::from_entries(rows);
        assert_eq!(table.entries().len(), TABLE_SIZE);
        assert!(table
            .entries()
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn qualifies_with_room_or_by_beating_the_lowest() {
        let mut table = HighScoreTable::default();
        assert!(table.qualifies(0));
        table.insert("ABC", 10);
        assert!(table.qualifies(0));

        let table = full_table();
        assert!(!table.qualifies(100));
        assert!(table.qualifies(101));
    }

    #[test]
    fn insert_ranks_below_ties_and_drops_the_tail() {
        let mut table = full_table();
        assert_eq!(table.insert("NEW", 500), Some(6));
        assert_eq!(table.entries()[5].name, "AAA");
        assert_eq!(table.entries()[6].name, "NEW");
        assert_eq!(table.entries().len(), TABLE_SIZE);
        assert_eq!(table.entries().last().map(|e| e.score), Some(200));

        assert_eq!(table.insert("LOW", 1), None);
    }

    #[test]
    fn wire_format_uses_short_keys() {
        let table = HighScoreTable::from_entries(vec![HighScoreEntry {
            name: "ZED".to_string(),
            score: 4200,
        }]);
        let encoded = serde_json::to_string(table.entries()).expect("encode");
        assert_eq!(encoded, r#"[{"n":"ZED","s":4200}]"#);
    }

    #[test]
    fn lines_number_from_one() {
        let mut table = HighScoreTable::default();
        assert_eq!(table.lines(), vec!["No scores yet".to_string()]);
        table.insert("BOB", 50);
        table.insert("AMY", 90);
        assert_eq!(table.lines(), vec!["#1 — AMY — 90", "#2 — BOB — 50"]);
    }

    #[test]
    fn initials_are_letters_only() {
        assert_eq!(normalize_initials("ab"), "AB");
        assert_eq!(normalize_initials("j.r.r. tolkien"), "JRR");
        assert_eq!(normalize_initials("  42 "), "???");
        assert_eq!(normalize_initials(""), "???");
    }

    #[test]
    fn names_collapse_whitespace_and_truncate() {
        assert_eq!(sanitize_name("  Ada   \t Lovelace \n"), "Ada Lovelace");
        assert_eq!(sanitize_name("   "), "Player");
        let long = "x".repeat(40);
        assert_eq!(sanitize_name(&long).chars().count(), MAX_NAME_LEN);
        assert_eq!(
            normalize_entry_name(NameStyle::FullName, "Grace Hopper"),
            "Grace Hopper"
        );
        assert_eq!(normalize_entry_name(NameStyle::Initials, "gh"), "GH");
    }
}
