use std::fmt;

use crate::region::Region;

/// Non-owning, writable view of a contiguous byte range.
///
/// The writable twin of [`Region`]. Because it holds a unique borrow it is
/// not `Copy`; derivations either consume the view (`advance`, `reduce`,
/// `split_at`) or reborrow it for a shorter lifetime ([`RegionMut::reborrow`],
/// [`RegionMut::as_region`]). Bulk operations ([`RegionMut::zero_fill`],
/// [`RegionMut::copy_from`]) are the only methods that touch the bytes.
pub struct RegionMut<'a> {
    bytes: &'a mut [u8],
}

impl<'a> RegionMut<'a> {
    /// View the given buffer as a writable region.
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }

    /// Start address of the viewed range.
    pub fn addr(&self) -> usize {
        self.bytes.as_ptr() as usize
    }

    /// One past the last addressable byte of the viewed range.
    pub fn end_addr(&self) -> usize {
        self.addr() + self.bytes.len()
    }

    /// Length of the viewed range in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the region spans zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The viewed bytes.
    pub fn as_slice(&self) -> &[u8] {
        self.bytes
    }

    /// The viewed bytes, writable.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.bytes
    }

    /// Read-only view over the same range, borrowed from this one.
    pub fn as_region(&self) -> Region<'_> {
        Region::new(self.bytes)
    }

    /// Convert into a read-only view for the full original lifetime.
    pub fn into_region(self) -> Region<'a> {
        Region::new(self.bytes)
    }

    /// Writable view over the same range with a shorter lifetime, so the
    /// original can be used again after the reborrow ends.
    pub fn reborrow(&mut self) -> RegionMut<'_> {
        RegionMut::new(self.bytes)
    }

    /// Returns `true` iff `other`'s byte range is a sub-range of this one.
    pub fn contains(&self, other: Region<'_>) -> bool {
        self.as_region().contains(other)
    }

    /// Drop the first `n` bytes, consuming the view.
    ///
    /// # Panics
    ///
    /// Panics if `n > size()`.
    pub fn advance(self, n: usize) -> RegionMut<'a> {
        assert!(
            n <= self.bytes.len(),
            "cannot advance {n} bytes into {self:?}"
        );
        RegionMut::new(&mut self.bytes[n..])
    }

    /// Keep only the first `n` bytes, consuming the view.
    ///
    /// # Panics
    ///
    /// Panics if `n > size()`.
    pub fn reduce(self, n: usize) -> RegionMut<'a> {
        assert!(n <= self.bytes.len(), "cannot reduce {self:?} to {n} bytes");
        RegionMut::new(&mut self.bytes[..n])
    }

    /// Drop the last `n` bytes, consuming the view.
    ///
    /// # Panics
    ///
    /// Panics if `n > size()`.
    pub fn subtract(self, n: usize) -> RegionMut<'a> {
        let len = self.bytes.len();
        assert!(n <= len, "cannot subtract {n} bytes from {self:?}");
        RegionMut::new(&mut self.bytes[..len - n])
    }

    /// Split into two writable views at byte `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n > size()`.
    pub fn split_at(self, n: usize) -> (RegionMut<'a>, RegionMut<'a>) {
        assert!(n <= self.bytes.len(), "cannot split {self:?} at byte {n}");
        let (head, rest) = self.bytes.split_at_mut(n);
        (RegionMut::new(head), RegionMut::new(rest))
    }

    /// Overwrite every viewed byte with zero.
    pub fn zero_fill(&mut self) -> &mut Self {
        self.bytes.fill(0);
        self
    }

    /// Copy `src`'s bytes to the start of this region.
    ///
    /// # Panics
    ///
    /// Panics if `src` is larger than this region.
    pub fn copy_from(&mut self, src: Region<'_>) {
        assert!(
            self.bytes.len() >= src.size(),
            "cannot copy {src:?} into smaller {self:?}"
        );
        self.bytes[..src.size()].copy_from_slice(src.as_slice());
    }

    /// Hex-encoded string of the viewed bytes.
    pub fn hex(&self) -> String {
        hex::encode(self.as_slice())
    }
}

impl<'a> From<&'a mut [u8]> for RegionMut<'a> {
    fn from(bytes: &'a mut [u8]) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for RegionMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionMut({:#x}, {} bytes)", self.addr(), self.size())
    }
}
