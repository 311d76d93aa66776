//! Terminal error taxonomy for a report run.
//!
//! None of these are retried. The one recoverable condition, a failed live
//! download, never surfaces here: the bar source absorbs it by falling back to
//! the bundled sample (see [`crate::data::load_bars`]).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no data: {0}")]
    NoData(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no bars found for week {week}")]
    EmptyWeek { week: String },

    #[error("averaging window contains no weeks")]
    EmptyWindow,
}

impl AnalysisError {
    /// Process exit code for this error. Argument errors share clap's usage code.
    pub fn exit_code(&self) -> i32 {
        match self {
            AnalysisError::InvalidArgument(_) => 2,
            _ => 1,
        }
    }
}
