//! Structured, non-throwing failure reporting (`spec.md §7`).
//!
//! Ordinary "no result" situations (nothing at the cursor, no mutations for
//! a seed, a stale cache index) are `Option::None` or an empty slice, never
//! an error. `SliceError` exists only for the handful of cases `spec.md §7`
//! calls out as worth reporting distinctly: cancellation, an unresolvable
//! seed, missing collaborator input, and an internal invariant violation
//! that is the core's own fault rather than the caller's.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SliceError {
    /// The caller's `CancellationToken` was observed cancelled mid-analysis.
    /// No partial cache entry is stored when this fires.
    Cancelled,
    /// The cursor position did not resolve to a place the core can slice on.
    UnresolvableSeed,
    /// The collaborator's CFG is missing something the engine needs to
    /// proceed (e.g. no blocks at all).
    MissingCfgInput { detail: String },
    /// A cached entry no longer matches the member it was built for.
    StaleCacheEntry { detail: String },
    /// An invariant the core itself is responsible for was violated. Never
    /// expected in practice; kept distinct from the collaborator-facing
    /// variants above so it is never mistaken for bad input.
    AnalysisBug { detail: String },
}

impl fmt::Display for SliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceError::Cancelled => write!(f, "slice computation was cancelled"),
            SliceError::UnresolvableSeed => write!(f, "cursor position did not resolve to a place"),
            SliceError::MissingCfgInput { detail } => write!(f, "missing CFG input: {detail}"),
            SliceError::StaleCacheEntry { detail } => write!(f, "stale cache entry: {detail}"),
            SliceError::AnalysisBug { detail } => write!(f, "internal analysis bug: {detail}"),
        }
    }
}

impl std::error::Error for SliceError {}
