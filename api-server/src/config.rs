use std::{env, path::PathBuf, sync::Arc};

use actix_cors::Cors;
use actix_web::http::header;

use crate::store::ScoreStore;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_JSON_LIMIT_BYTES: usize = 16 * 1024;
pub const DEFAULT_SCORE_LIMIT: u32 = 20;
pub const MIN_SCORE_LIMIT: u32 = 1;
pub const MAX_SCORE_LIMIT: u32 = 100;
pub const DEFAULT_GAME: &str = "breakout";
pub const CORS_MAX_AGE_SECS: usize = 3600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl AllowedOrigins {
    /// `*` (or nothing usable) means any origin; otherwise a comma list.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            Self::Any
        } else {
            Self::List(origins)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub allowed_origins: AllowedOrigins,
    pub json_limit: usize,
    pub http_workers: Option<usize>,
    pub default_limit: u32,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let default_limit = read_env_u32("DEFAULT_SCORE_LIMIT", DEFAULT_SCORE_LIMIT);
        let clamped = default_limit.clamp(MIN_SCORE_LIMIT, MAX_SCORE_LIMIT);
        if clamped != default_limit {
            tracing::warn!(
                "DEFAULT_SCORE_LIMIT ({}) outside [{}..={}]. Using {}.",
                default_limit,
                MIN_SCORE_LIMIT,
                MAX_SCORE_LIMIT,
                clamped
            );
        }

        Self {
            bind_addr: read_env_string("API_BIND_ADDR", DEFAULT_BIND_ADDR),
            data_dir: PathBuf::from(read_env_string("DATA_DIR", DEFAULT_DATA_DIR)),
            allowed_origins: AllowedOrigins::parse(&read_env_string("ALLOWED_ORIGINS", "*")),
            json_limit: read_env_usize("JSON_LIMIT_BYTES", DEFAULT_JSON_LIMIT_BYTES),
            http_workers: read_env_optional_usize("HTTP_WORKERS"),
            default_limit: clamped,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ScoreStore>,
    pub default_limit: u32,
}

impl AppState {
    pub fn new(store: ScoreStore, default_limit: u32) -> Self {
        Self {
            store: Arc::new(store),
            default_limit,
        }
    }
}

pub fn build_cors(origins: &AllowedOrigins) -> Cors {
    let cors = Cors::default()
        .allowed_methods(["GET", "POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(CORS_MAX_AGE_SECS);

    match origins {
        AllowedOrigins::Any => cors.allow_any_origin().send_wildcard(),
        AllowedOrigins::List(list) => list
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
    }
}

pub(crate) fn read_env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn read_env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub(crate) fn read_env_optional_usize(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
}

pub(crate) fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
