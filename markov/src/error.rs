//! Error statuses surfaced by the engine.
//!
//! `NO_MATCH` from the original design is not a member here: it is a
//! transient outcome of a single rule attempt, never something returned to
//! a caller of [`crate::Engine::run`] - see [`crate::matcher::MatchOutcome`].

use thiserror::Error;

/// A fatal outcome of a transformation run.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The rule scan wrapped around with no rule having matched in the
    /// whole pass: the program can never make progress from here.
    #[error("no matching transform was found in the program")]
    NoMatchingTransforms,

    /// The start rule (program index 0) did not match the initial string.
    /// This check only fires while the program counter is still at 0; once
    /// it has advanced even once, a later non-match is ordinary rule-scan
    /// failure, not this error.
    #[error("the start rule did not match the initial string")]
    StartStepNoMatch,

    /// A replacement referenced a wildcard kind that never occurred in its
    /// rule's pattern, so no capture exists to emit.
    #[error("replacement string uses a wildcard kind not present in its pattern")]
    ReplaceStrBadWildcard,

    /// The matcher's backtracking stack ran empty before reporting success
    /// or failure. Indicates an internal invariant was violated; the
    /// matcher never panics on malformed input, it reports this instead.
    #[error("pattern matcher's backtracking stack emptied unexpectedly")]
    StackEmpty,

    /// Unit-test mode only: produced output did not equal the expected
    /// output recorded on the following line of the input file.
    #[error("output did not match the expected string")]
    DoesntMatchExpected,
}

/// Convenience alias for results that fail with a [`Status`].
pub type Result<T> = std::result::Result<T, Status>;
