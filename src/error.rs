// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use thiserror::Error;

use crate::interner::NameId;

/// Crate-level error type.
///
/// Parsing itself is tolerant and never fails structurally; errors
/// surface only from file I/O and from interner lookups of ids that
/// were never issued.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("name id {0:?} was never issued")]
    NameNotFound(NameId),
}

pub type Result<T> = std::result::Result<T, Error>;
