//! Tagged-length-value property store for shared-memory exchange.
//!
//! A [`PropertyStore`] encodes a set of uniquely-tagged, variable-length
//! values directly into one caller-owned byte region, so two isolated
//! components can exchange settings through a single shared block without
//! an allocator or any out-of-band metadata.
//!
//! Records are packed back to back with no padding and the sequence ends
//! in a terminator record:
//!
//! ```text
//! [tag: u8][length: usize, native endian][payload: length bytes] ...
//! [0x00   ][0                           ]                          <- terminator
//! ```
//!
//! The layout uses the host's native `usize` width and endianness: it is a
//! same-host format for components compiled with identical layout
//! assumptions, not a portable network format.
//!
//! # Key Types
//!
//! - [`PropertyStore`] -- typed get/set over one backing region
//! - [`Tag`] -- non-zero record tag (`0` is the terminator, unrepresentable)
//! - [`FixedValue`] -- fixed-size payload codec for the integer primitives
//! - [`Record`] / [`Records`] -- borrowed record view and forward iterator
//! - [`StoreError`] -- the runtime failure taxonomy
//!
//! # Design Rules
//!
//! 1. The store never allocates and never owns its backing region.
//! 2. Every walk re-checks record bounds against the region before reading;
//!    a corrupt buffer yields [`StoreError::Malformed`], never an
//!    out-of-bounds access.
//! 3. Missing tags and exhausted capacity are typed errors; duplicate tags
//!    are caller bugs and panic before anything is written.
//! 4. The store holds no lock. Callers that share the region must
//!    serialize all access (see `memseq-settings`).

pub mod error;
pub mod record;
pub mod store;
pub mod tag;
pub mod value;

pub use error::{StoreError, StoreResult};
pub use record::{Record, HEADER_SIZE};
pub use store::{PropertyStore, Records};
pub use tag::{ReservedTag, Tag};
pub use value::FixedValue;
