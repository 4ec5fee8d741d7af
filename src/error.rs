use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// Identity columns no record carries; the table cannot be partitioned.
    #[error("missing identity columns: {}", .missing.join(", "))]
    MissingIdentityColumns { missing: Vec<String> },
}
