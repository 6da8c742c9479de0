//! Lock-protected settings exchange over a shared property store.
//!
//! The region and store crates deliberately carry no synchronization: a
//! `set` interrupted mid-write leaves a torn terminator, and a concurrent
//! reader could observe a payload window between its zero-fill and its
//! copy. This crate supplies the required external discipline as a
//! single-critical-section transaction:
//!
//! 1. take the block lock,
//! 2. copy the whole shared block into a private scratch buffer,
//! 3. attach a validated [`memseq_store::PropertyStore`] over the scratch
//!    and run the caller's closure against it,
//! 4. on success copy the scratch back over the shared block, on failure
//!    discard it,
//! 5. release the lock.
//!
//! Readers of the shared block therefore never see a partially written
//! record, and a failed transaction leaves the block byte-identical.
//!
//! # Key Types
//!
//! - [`SharedBlock`] -- the shared fixed-size byte block plus its lock
//! - [`Settings`] -- a peer endpoint running transactions on a block
//! - [`SettingsError`] -- transaction failures (lock poisoned, store error)

pub mod error;
pub mod settings;

pub use error::{SettingsError, SettingsResult};
pub use settings::{Settings, SharedBlock};
