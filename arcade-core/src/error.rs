use std::fmt;

/// State invariants checked by each simulation's `validate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    GlobalModeLivesConsistency,
    GlobalLevelNonZero,
    ShipBounds,
    PlayerBulletLimit,
    PlayerBulletState,
    AsteroidState,
    AlienState,
    PaddleBounds,
    BallState,
    BrickState,
    HopperPlayerBounds,
    LaneOccupancy,
    PadState,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalModeLivesConsistency => write!(f, "GLOBAL_MODE_LIVES_CONSISTENCY"),
            Self::GlobalLevelNonZero => write!(f, "GLOBAL_LEVEL_NONZERO"),
            Self::ShipBounds => write!(f, "SHIP_BOUNDS"),
            Self::PlayerBulletLimit => write!(f, "PLAYER_BULLET_LIMIT"),
            Self::PlayerBulletState => write!(f, "PLAYER_BULLET_STATE"),
            Self::AsteroidState => write!(f, "ASTEROID_STATE"),
            Self::AlienState => write!(f, "ALIEN_STATE"),
            Self::PaddleBounds => write!(f, "PADDLE_BOUNDS"),
            Self::BallState => write!(f, "BALL_STATE"),
            Self::BrickState => write!(f, "BRICK_STATE"),
            Self::HopperPlayerBounds => write!(f, "HOPPER_PLAYER_BOUNDS"),
            Self::LaneOccupancy => write!(f, "LANE_OCCUPANCY"),
            Self::PadState => write!(f, "PAD_STATE"),
        }
    }
}

/// Failure reading or writing the local key-value profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    Io { path: String, message: String },
    Parse { key: String, message: String },
    Encode { key: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "storage io error at {path}: {message}"),
            Self::Parse { key, message } => {
                write!(f, "stored value for '{key}' is unreadable: {message}")
            }
            Self::Encode { key, message } => {
                write!(f, "failed to encode value for '{key}': {message}")
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Failure talking to the leaderboard service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    Unavailable(String),
    Rejected { status: u16, message: String },
    Decode(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "leaderboard unavailable: {message}"),
            Self::Rejected { status, message } => {
                write!(f, "leaderboard rejected request ({status}): {message}")
            }
            Self::Decode(message) => write!(f, "leaderboard response unreadable: {message}"),
        }
    }
}

impl std::error::Error for TransportError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitError {
    ScoreOutOfRange { score: u64 },
    Transport(TransportError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScoreOutOfRange { score } => {
                write!(f, "score {score} is outside the accepted range")
            }
            Self::Transport(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<TransportError> for SubmitError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}
