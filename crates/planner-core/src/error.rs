use thiserror::Error;

/// Reasons a recurrence directive or a wire-format date is rejected.
///
/// Every variant is recoverable: callers abort the current operation and
/// report the message, nothing is persisted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Recurrence directive is empty")]
    EmptyDirective,

    #[error("Unknown recurrence kind '{0}', expected 'y' or 'd'")]
    UnknownRuleKind(String),

    #[error("Yearly rule takes no parameters, expected exactly 'y'")]
    MalformedYearlyRule,

    #[error("Daily rule must have the form 'd <days>'")]
    MalformedDailyRule,

    #[error("Day interval '{0}' must be a whole number between 1 and 366")]
    IntervalOutOfRange(String),

    #[error("Invalid date '{0}', expected YYYYMMDD")]
    InvalidDateFormat(String),
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ambiguous short ID. Did you mean one of these?")]
    AmbiguousId(Vec<(String, String)>), // Vec of (ID, Title)

    #[error("Task {0} was changed concurrently, retry the operation")]
    Conflict(String),

    #[error("Next occurrence after {0} is outside the supported calendar range")]
    DateOutOfRange(String),
}
