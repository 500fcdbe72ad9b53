use std::convert::Infallible;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::BaggingConfigError;

/// Errors surfaced by session construction and stepping.
#[derive(Debug, Error)]
pub enum BaggingError {
    /// The stream is exhausted. Recoverable: the session is left untouched.
    #[error("all items processed: there are no more items to bag ({placed} of {total} bagged)")]
    NoMoreItems { placed: usize, total: usize },
    #[error("cannot build an item stream from an empty catalog")]
    EmptyCatalog,
    #[error("{bag} holds {len} items, more than the {limit} a bag allows")]
    OverfullBag {
        bag: String,
        len: usize,
        limit: usize,
    },
    #[error("{bag} holds {count} of {name}, more than the {limit} allowed per bag")]
    DuplicateCapExceeded {
        bag: String,
        name: String,
        count: usize,
        limit: usize,
    },
    #[error("session cursor {index} is past the end of its {total}-item stream")]
    CursorOutOfRange { index: usize, total: usize },
    #[error("session claims {claimed} items but its stream holds {actual}")]
    StreamLengthMismatch { claimed: usize, actual: usize },
    #[error(transparent)]
    Config(#[from] BaggingConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl BaggingError {
    /// True for the terminal "nothing left to scan" condition.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::NoMoreItems { .. })
    }
}

impl From<Infallible> for BaggingError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
