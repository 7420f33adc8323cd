use thiserror::Error;

/// Reasons a submitted job description can be refused before anything is
/// dispatched on its behalf.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The submission was not a JSON document in the expected job shape
    #[error("Malformed job submission: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The submission did not carry an invocation identifier
    #[error("Job submission is missing an invocation ID")]
    MissingInvocationId,

    /// The invocation identifier would not address a single invocation once
    /// used as a word of a topic routing key
    #[error("Invocation ID {0:?} may not contain '.', '*' or '#'")]
    InvalidInvocationId(String),

    /// The submission did not contain any steps to execute
    #[error("Job {0} has no steps")]
    MissingSteps(String),
}
