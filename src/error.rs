use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// A formula was asked to run without one of the columns it declares.
    #[error("missing field {field} required by {stat}")]
    MissingField { stat: &'static str, field: String },

    #[error("column {field} has {found} rows, expected {expected}")]
    RowCountMismatch {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid catalogue entry {stat}: {reason}")]
    InvalidCatalogue { stat: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{makes} ({made}) exceeds {attempts} ({attempted})")]
    MakesExceedAttempts {
        makes: &'static str,
        attempts: &'static str,
        made: f64,
        attempted: f64,
    },

    #[error("free throws made ({0}) with zero free throw attempts")]
    FreeThrowsWithoutAttempts(f64),

    #[error("minutes played must be positive, got {0}")]
    NonPositiveMinutes(f64),

    #[error("negative or non-finite value for {field}: {value}")]
    InvalidCount { field: &'static str, value: f64 },

    #[error("rebounds ({reb}) != offensive ({oreb}) + defensive ({dreb})")]
    ReboundMismatch { reb: f64, oreb: f64, dreb: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CleaningError {
    #[error("matchup {0:?} is neither \"X vs. Y\" nor \"X @ Y\"")]
    BadMatchup(String),

    #[error("unparseable game date {0:?}")]
    BadDate(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
