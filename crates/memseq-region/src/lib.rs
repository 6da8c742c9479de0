//! Byte-range descriptors for shared-memory exchange.
//!
//! A [`Region`] is a non-owning view of a contiguous byte range: an address,
//! a length, and nothing else. The crate provides a small algebra of pure
//! derivations over regions -- slicing from either end, carving sub-ranges,
//! spanning between two inner regions -- plus containment and adjacency
//! predicates. [`RegionMut`] is the writable counterpart and adds the bulk
//! byte operations (zero-fill, copy).
//!
//! # Key Types
//!
//! - [`Region`] -- read-only view, `Copy`, with the full derivation algebra
//! - [`RegionMut`] -- writable view with consuming derivations and bulk ops
//! - [`compare`] -- lexicographic prefix comparison of two regions
//!
//! # Design Rules
//!
//! 1. Derivations are pure: they produce new descriptors, never touch bytes.
//! 2. No operation can read or write outside the parent range; every
//!    derivation re-slices the parent, so the bounds are machine-checked.
//! 3. Out-of-range parameters are caller bugs and panic. Nothing in this
//!    crate returns a truncated or clamped result.
//! 4. Regions never own memory. A region's lifetime is tied to the borrow
//!    of its backing buffer.

pub mod mutable;
pub mod region;

pub use mutable::RegionMut;
pub use region::{compare, Region};
