use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("base score must be between 0 and 3, given {0}")]
    InvalidScore(u8),

    #[error("unknown grade '{0}', expected again, hard, good, easy or 0-3")]
    UnknownGrade(String),

    #[error("intrinsic weight must be a finite, non-negative number, given {0}")]
    InvalidWeight(f64),

    #[error("topic state must be finite, given stability {stability} and difficulty {difficulty}")]
    InvalidTopicState { stability: f64, difficulty: f64 },

    #[error("intrinsic weight must be between {min} and {max}, given {0}", min = crate::card::MIN_WEIGHT, max = crate::card::MAX_WEIGHT)]
    WeightOutOfRange(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
