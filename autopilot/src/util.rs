use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// First seed of a generated sequence when none is given.
pub const DEFAULT_SEED_START: u32 = 0xA5CA_DE01;

/// `0x`-prefixed hex or plain decimal.
pub fn parse_seed(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => raw.parse::<u32>(),
    };
    parsed.with_context(|| format!("bad seed {raw:?}"))
}

pub fn format_seed(seed: u32) -> String {
    format!("0x{seed:08x}")
}

/// Where a benchmark takes its seeds from. A file wins over a list, which
/// wins over a generated run.
#[derive(Debug, Clone, Copy)]
pub enum SeedSource<'a> {
    File(&'a Path),
    List(&'a str),
    Sequence { start: Option<&'a str>, count: u32 },
}

impl<'a> SeedSource<'a> {
    pub fn pick(list: Option<&'a str>, file: Option<&'a Path>, start: Option<&'a str>, count: u32) -> Self {
        match (file, list) {
            (Some(path), _) => Self::File(path),
            (None, Some(list)) => Self::List(list),
            (None, None) => Self::Sequence { start, count },
        }
    }

    pub fn seeds(self) -> Result<Vec<u32>> {
        match self {
            Self::File(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading seed file {}", path.display()))?;
                collect_seeds(text.lines(), &path.display().to_string())
            }
            Self::List(list) => collect_seeds(list.split(','), "--seeds"),
            Self::Sequence { start, count } => {
                let first = start.map(parse_seed).transpose()?.unwrap_or(DEFAULT_SEED_START);
                Ok(lcg_sequence(first, count))
            }
        }
    }
}

pub fn resolve_seeds(
    list: Option<&str>,
    file: Option<&Path>,
    start: Option<&str>,
    count: u32,
) -> Result<Vec<u32>> {
    SeedSource::pick(list, file, start, count).seeds()
}

/// Blank tokens and `#` comments are skipped.
fn collect_seeds<'a>(tokens: impl Iterator<Item = &'a str>, origin: &str) -> Result<Vec<u32>> {
    let seeds = tokens
        .map(str::trim)
        .filter(|token| !token.is_empty() && !token.starts_with('#'))
        .map(parse_seed)
        .collect::<Result<Vec<_>>>()?;
    if seeds.is_empty() {
        bail!("no seeds in {origin}");
    }
    Ok(seeds)
}

fn lcg_sequence(first: u32, count: u32) -> Vec<u32> {
    std::iter::successors(Some(first), |cur| {
        Some(cur.wrapping_mul(1_664_525).wrapping_add(1_013_904_223))
    })
    .take(count as usize)
    .collect()
}
