use thiserror::Error;

use memseq_store::StoreError;

/// Failures of a settings transaction.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A peer panicked while holding the block lock.
    #[error("shared settings lock poisoned by a panicked peer")]
    Poisoned,

    /// The store operation inside the transaction failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type SettingsResult<T> = Result<T, SettingsError>;
