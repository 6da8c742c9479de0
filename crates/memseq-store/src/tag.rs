use std::fmt;
use std::num::NonZeroU8;

/// Identifies one property within a store.
///
/// Tag `0` marks the terminator record and is unrepresentable here, which
/// removes a whole class of "stored the sentinel" bugs at compile time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(NonZeroU8);

impl Tag {
    /// Create a tag from its wire byte. Returns `None` for the reserved
    /// terminator byte `0`.
    pub const fn new(raw: u8) -> Option<Self> {
        match NonZeroU8::new(raw) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// The wire byte of this tag.
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Tag {
    type Error = ReservedTag;

    fn try_from(raw: u8) -> Result<Self, ReservedTag> {
        Self::new(raw).ok_or(ReservedTag)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error for `Tag::try_from(0)`: byte 0 is the terminator, not a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReservedTag;

impl fmt::Display for ReservedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("tag byte 0 is reserved for the terminator")
    }
}

impl std::error::Error for ReservedTag {}
