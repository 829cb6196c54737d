//! Error kinds shared by every container in this crate.

/// Failure modes for arena-backed mutations.
///
/// Every public mutation entry point in this crate (`insert`/`delete`/
/// `remove`/`consolidate`/the lower-bound set's `add`/`remove`) runs its
/// body through [`crate::arena::Arena::try_mutate`], which captures the
/// arena cursor on entry and rewinds to it before returning one of these —
/// the caller's root offset is always left unchanged on error, and any
/// nodes the failed attempt had already allocated are discarded along with
/// it (spec.md §7).
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum PatchError {
    /// The arena could not grow to satisfy an alignment/size request.
    #[error("arena allocation failed: need {requested} bytes, region exhausted")]
    AllocationFailure {
        /// Bytes requested by the allocation that failed.
        requested: usize,
    },
    /// `delete`/`lookup` on an absent key.
    #[error("key not found")]
    NotFound,
    /// An operation was called with arguments it cannot satisfy.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// An internal invariant was violated. Only reachable through a
    /// `debug_assert!`-guarded path; impossible if invariants hold.
    #[error("internal invariant violated: {0}")]
    ImplementationError(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PatchError>;
