use thiserror::Error;

/// Runtime failures of a property store.
///
/// These are data-dependent conditions a correct caller can hit -- a missing
/// tag, a full backing region, a buffer some other component corrupted --
/// and are always reported as values. Caller bugs (duplicate tags, invalid
/// derivation parameters) panic instead and have no variant here.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No record carries the requested tag.
    #[error("no record with tag {tag}")]
    NotFound {
        /// The tag that was looked up.
        tag: u8,
    },

    /// Writing the record plus a fresh terminator would pass the region end.
    #[error("out of space: record needs {needed} bytes, {remaining} remaining")]
    OutOfSpace {
        /// Header + payload + terminator bytes the write requires.
        needed: usize,
        /// Bytes left between the current terminator and the region end.
        remaining: usize,
    },

    /// The byte sequence in the backing region is not a well-formed store.
    #[error("malformed sequence at offset {offset}: {reason}")]
    Malformed {
        /// Byte offset of the offending record within the backing region.
        offset: usize,
        /// What the walk found there.
        reason: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
