use thiserror::Error;

/// Syntax and range failures of the recurrence rule grammar.
///
/// Every variant is a caller input error; the offending text is carried along
/// so it can be reported back verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed repeat rule: '{0}'")]
    MalformedRule(String),

    #[error("Unknown repeat rule kind: '{0}'")]
    UnknownRuleKind(String),

    #[error("Invalid repeat argument: '{0}'")]
    InvalidArgument(String),

    #[error("Day interval {0} exceeds the maximum of 400 days")]
    IntervalTooLarge(i64),

    #[error("Invalid weekday: '{0}' (expected 1-7, 1 = Monday)")]
    InvalidWeekday(String),

    #[error("Invalid day of month: '{0}' (expected 1-31, -1 or -2)")]
    InvalidMonthDay(String),

    #[error("Invalid month: '{0}' (expected 1-12)")]
    InvalidMonth(String),
}

/// Failures while computing the next occurrence of a parsed rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Invalid anchor date: '{0}' (expected YYYYMMDD)")]
    InvalidAnchorDate(String),

    #[error("No matching date found within {0} months")]
    NoCandidateFound(u32),

    #[error("Task has no repeat rule")]
    NotRecurring,

    #[error("Repeat rule violates its own constraints: '{0}'")]
    InvalidRule(String),

    #[error("Next occurrence falls outside the supported calendar range")]
    DateOutOfRange,
}

/// Error of the textual "compute next date" entry point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NextDateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ambiguous ID, matches: {0:?}")]
    AmbiguousId(Vec<(String, String)>),

    #[error("Invalid date: '{0}' (expected YYYYMMDD)")]
    InvalidDate(String),

    #[error(transparent)]
    Rule(#[from] ParseError),

    #[error(transparent)]
    Evaluation(#[from] EvalError),
}

impl CoreError {
    /// True for errors caused by the caller's input rather than by storage.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidInput(_)
                | CoreError::AmbiguousId(_)
                | CoreError::InvalidDate(_)
                | CoreError::Rule(_)
                | CoreError::Evaluation(_)
        )
    }
}
