use std::cmp::Ordering;
use std::fmt;

/// Non-owning, read-only view of a contiguous byte range.
///
/// A `Region` is an address plus a length. Identity is the address range,
/// not the bytes behind it: two regions are equal iff they describe the
/// same range of the same buffer. All derivation methods are pure -- they
/// return a new descriptor over a sub-range of `self` and never touch the
/// referenced bytes.
///
/// Derivation parameters that fall outside `self` are caller bugs and
/// panic; there is no silent truncation.
#[derive(Clone, Copy)]
pub struct Region<'a> {
    bytes: &'a [u8],
}

impl<'a> Region<'a> {
    /// View the given buffer as a region.
    pub fn new(bytes: &'a [u8]) -> Self {
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
    pub fn as_slice(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns `true` iff `other`'s byte range is a sub-range of this one
    /// (closed start, exclusive end). A region contains itself and any
    /// empty region whose address lies within or at the end of it.
    pub fn contains(&self, other: Region<'_>) -> bool {
        self.addr() <= other.addr() && other.end_addr() <= self.end_addr()
    }

    /// Returns `true` iff this region ends exactly where `other` begins.
    pub fn right_adjacent_to(&self, other: Region<'_>) -> bool {
        self.end_addr() == other.addr()
    }

    /// Byte offset of `other`'s start within this region.
    ///
    /// # Panics
    ///
    /// Panics if `other` is not contained in this region.
    pub fn offset_of(&self, other: Region<'_>) -> usize {
        assert!(
            self.contains(other),
            "region {other:?} is not contained in {self:?}"
        );
        other.addr() - self.addr()
    }

    /// Drop the first `n` bytes.
    ///
    /// ```text
    /// self:   [ <-- size       --> ]
    /// result:        { <-- n   --> }
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `n > size()`.
    pub fn advance(&self, n: usize) -> Region<'a> {
        assert!(n <= self.size(), "cannot advance {n} bytes into {self:?}");
        Region::new(&self.bytes[n..])
    }

    /// Drop the last `n` bytes.
    ///
    /// ```text
    /// self:   [ <-- size       --> ]
    /// result: [        ]{ <- n  -> }
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `n > size()`.
    pub fn subtract(&self, n: usize) -> Region<'a> {
        assert!(n <= self.size(), "cannot subtract {n} bytes from {self:?}");
        Region::new(&self.bytes[..self.size() - n])
    }

    /// Keep only the first `n` bytes.
    ///
    /// ```text
    /// self:   [ <-- size       --> ]
    /// result: [ <-- n --> ]
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `n > size()`.
    pub fn reduce(&self, n: usize) -> Region<'a> {
        assert!(n <= self.size(), "cannot reduce {self:?} to {n} bytes");
        Region::new(&self.bytes[..n])
    }

    /// The `len`-byte range starting immediately after `offset`'s end.
    ///
    /// ```text
    /// self:   [   [offset..]          ]
    /// result:              [ len ]
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `offset` is not contained in this region, or if the
    /// result would extend past this region's end.
    pub fn subrange(&self, offset: Region<'_>, len: usize) -> Region<'a> {
        let start = self.offset_of(offset) + offset.size();
        assert!(
            len <= self.size() - start,
            "subrange of {len} bytes after {offset:?} exceeds {self:?}"
        );
        Region::new(&self.bytes[start..start + len])
    }

    /// The smallest range starting at `left`'s start and ending at
    /// `right`'s end.
    ///
    /// ```text
    /// self:   [   [left..]   [right....]   ]
    /// result:     [                    ]
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if either argument is not contained in this region, or if
    /// `right` ends before `left` starts.
    pub fn span(&self, left: Region<'_>, right: Region<'_>) -> Region<'a> {
        let start = self.offset_of(left);
        let end = self.offset_of(right) + right.size();
        assert!(start <= end, "span end {right:?} precedes start {left:?}");
        Region::new(&self.bytes[start..end])
    }

    /// Shrink this region to end where `inner` ends.
    ///
    /// ```text
    /// self:   [   [inner]   rest ]
    /// result: [         ]
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `inner` is not contained in this region.
    pub fn truncate(&self, inner: Region<'_>) -> Region<'a> {
        let end = self.offset_of(inner) + inner.size();
        Region::new(&self.bytes[..end])
    }

    /// Everything before `marker`'s start.
    ///
    /// ```text
    /// self:   [   [marker]   ]
    /// result: [  ]
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `marker` is not contained in this region.
    pub fn strip(&self, marker: Region<'_>) -> Region<'a> {
        let end = self.offset_of(marker);
        Region::new(&self.bytes[..end])
    }

    /// Everything after `marker`'s end.
    ///
    /// ```text
    /// self:   [   [marker]   ]
    /// result:            [   ]
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `marker` is not contained in this region.
    pub fn tail(&self, marker: Region<'_>) -> Region<'a> {
        let start = self.offset_of(marker) + marker.size();
        Region::new(&self.bytes[start..])
    }

    /// Hex-encoded string of the viewed bytes.
    pub fn hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl<'a> From<&'a [u8]> for Region<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

/// Descriptor identity: same address, same length. Byte contents are not
/// consulted; use [`compare`] for that.
impl PartialEq for Region<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr() && self.size() == other.size()
    }
}

impl Eq for Region<'_> {}

impl fmt::Debug for Region<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Region({:#x}, {} bytes)", self.addr(), self.size())
    }
}

/// Lexicographically compare the first `b.size()` bytes of each region.
///
/// This is a *prefix* comparison: when `a` is longer than `b`, bytes of
/// `a` past `b`'s length are ignored, so `a` can compare `Equal` to a
/// strict prefix of itself. Callers that need full equality must also
/// check the lengths.
///
/// # Panics
///
/// Panics if `a` is shorter than `b`.
pub fn compare(a: Region<'_>, b: Region<'_>) -> Ordering {
    assert!(
        a.size() >= b.size(),
        "cannot compare {a:?} against longer {b:?}"
    );
    a.as_slice()[..b.size()].cmp(b.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn size_and_addr_describe_the_buffer() {
        let buf = [0u8; 16];
        let r = Region::new(&buf);
        assert_eq!(r.size(), 16);
        assert_eq!(r.addr(), buf.as_ptr() as usize);
        assert_eq!(r.end_addr(), r.addr() + 16);
        assert!(!r.is_empty());
    }

    #[test]
    fn contains_is_reflexive_and_rejects_disjoint_buffers() {
        let buf = [0u8; 32];
        let other = [0u8; 32];
        let r = Region::new(&buf);
        assert!(r.contains(r));
        assert!(r.contains(r.advance(10)));
        assert!(r.contains(r.reduce(0)));
        // A separate allocation of the same size can only be contained if
        // it had the same address, which two live arrays never do.
        assert!(!r.contains(Region::new(&other)));
    }

    #[test]
    fn advance_subtract_reduce_shrink_from_the_right_ends() {
        let buf: Vec<u8> = (0..10).collect();
        let r = Region::new(&buf);

        let adv = r.advance(3);
        assert_eq!(adv.size(), 7);
        assert_eq!(adv.as_slice()[0], 3);

        let sub = r.subtract(4);
        assert_eq!(sub.size(), 6);
        assert_eq!(sub.addr(), r.addr());

        let red = r.reduce(2);
        assert_eq!(red.as_slice(), &[0, 1]);
    }

    #[test]
    fn advance_to_end_yields_empty_tail() {
        let buf = [0u8; 8];
        let r = Region::new(&buf);
        let tail = r.advance(8);
        assert!(tail.is_empty());
        assert_eq!(tail.addr(), r.end_addr());
        assert!(r.contains(tail));
    }

    #[test]
    #[should_panic(expected = "cannot advance")]
    fn advance_past_end_panics() {
        let buf = [0u8; 4];
        Region::new(&buf).advance(5);
    }

    #[test]
    #[should_panic(expected = "cannot subtract")]
    fn subtract_past_start_panics() {
        let buf = [0u8; 4];
        Region::new(&buf).subtract(5);
    }

    #[test]
    #[should_panic(expected = "cannot reduce")]
    fn reduce_beyond_length_panics() {
        let buf = [0u8; 4];
        Region::new(&buf).reduce(5);
    }

    #[test]
    fn subrange_starts_after_offset_end() {
        let buf: Vec<u8> = (0..20).collect();
        let r = Region::new(&buf);
        let offset = r.advance(2).reduce(3); // [2, 5)
        let s = r.subrange(offset, 4); // [5, 9)
        assert_eq!(s.as_slice(), &[5, 6, 7, 8]);
        assert!(offset.right_adjacent_to(s));
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn subrange_past_parent_end_panics() {
        let buf = [0u8; 10];
        let r = Region::new(&buf);
        let offset = r.advance(8); // [8, 10)
        r.subrange(offset, 1);
    }

    #[test]
    fn span_covers_left_start_to_right_end() {
        // R = [0, 100), L = [10, 20), T = [30, 50) => span = [10, 50).
        let buf = [0u8; 100];
        let r = Region::new(&buf);
        let l = r.advance(10).reduce(10);
        let t = r.advance(30).reduce(20);
        let s = r.span(l, t);
        assert_eq!(s.addr(), r.addr() + 10);
        assert_eq!(s.size(), 40);
        assert_eq!(s, r.advance(10).reduce(40));
    }

    #[test]
    #[should_panic(expected = "not contained")]
    fn span_with_foreign_region_panics() {
        let buf = [0u8; 16];
        let other = [0u8; 16];
        let r = Region::new(&buf);
        r.span(Region::new(&other), r);
    }

    #[test]
    fn truncate_strip_tail_partition_the_parent() {
        let buf: Vec<u8> = (0..50).collect();
        let a = Region::new(&buf);
        let b = a.advance(12).reduce(9);

        let head = a.strip(b);
        let rest = a.tail(b);
        assert_eq!(head.addr(), a.addr());
        assert!(head.right_adjacent_to(b));
        assert!(b.right_adjacent_to(rest));
        assert_eq!(rest.end_addr(), a.end_addr());
        assert_eq!(head.size() + b.size() + rest.size(), a.size());

        let trunc = a.truncate(b);
        assert_eq!(trunc.addr(), a.addr());
        assert!(trunc.right_adjacent_to(rest));
        assert_eq!(trunc.size() + rest.size(), a.size());
    }

    #[test]
    fn adjacency_is_directional() {
        let buf = [0u8; 10];
        let r = Region::new(&buf);
        let left = r.reduce(4);
        let right = r.advance(4);
        assert!(left.right_adjacent_to(right));
        assert!(!right.right_adjacent_to(left));
    }

    #[test]
    fn compare_is_prefix_ordering() {
        let a_buf = [1u8, 2, 3, 4];
        let b_buf = [1u8, 2, 9];
        let a = Region::new(&a_buf);
        let b = Region::new(&b_buf);
        assert_eq!(compare(a, b), Ordering::Less);
        // Equal against a strict prefix of itself.
        assert_eq!(compare(a, a.reduce(2)), Ordering::Equal);
        assert_eq!(compare(a, a), Ordering::Equal);
    }

    #[test]
    #[should_panic(expected = "cannot compare")]
    fn compare_against_longer_operand_panics() {
        let a_buf = [1u8, 2];
        let b_buf = [1u8, 2, 3];
        compare(Region::new(&a_buf), Region::new(&b_buf));
    }

    #[test]
    fn hex_dumps_the_viewed_bytes() {
        let buf = [0xdeu8, 0xad, 0xbe, 0xef];
        assert_eq!(Region::new(&buf).hex(), "deadbeef");
        assert_eq!(Region::new(&buf).reduce(2).hex(), "dead");
    }

    proptest! {
        #[test]
        fn strip_marker_tail_reconstruct_the_parent(
            len in 1usize..256,
            start_frac in 0.0f64..1.0,
            len_frac in 0.0f64..1.0,
        ) {
            let buf = vec![0u8; len];
            let a = Region::new(&buf);
            let start = (start_frac * len as f64) as usize;
            let sub_len = (len_frac * (len - start) as f64) as usize;
            let b = a.advance(start).reduce(sub_len);

            let head = a.strip(b);
            let rest = a.tail(b);
            prop_assert_eq!(head.addr(), a.addr());
            prop_assert!(head.right_adjacent_to(b));
            prop_assert!(b.right_adjacent_to(rest));
            prop_assert_eq!(rest.end_addr(), a.end_addr());
            prop_assert_eq!(head.size() + b.size() + rest.size(), a.size());

            let trunc = a.truncate(b);
            prop_assert_eq!(trunc.addr(), a.addr());
            prop_assert!(trunc.right_adjacent_to(rest));
            prop_assert_eq!(trunc.size() + rest.size(), a.size());
        }

        #[test]
        fn derivations_stay_inside_the_parent(
            len in 0usize..256,
            n_frac in 0.0f64..=1.0,
        ) {
            let buf = vec![0u8; len];
            let r = Region::new(&buf);
            let n = (n_frac * len as f64) as usize;
            prop_assert!(r.contains(r.advance(n)));
            prop_assert!(r.contains(r.subtract(n)));
            prop_assert!(r.contains(r.reduce(n)));
        }
    }
}
