use memseq_region::{Region, RegionMut};

use crate::error::{StoreError, StoreResult};
use crate::tag::Tag;

/// Wire byte that marks the terminator record.
pub(crate) const TERMINATOR: u8 = 0;

/// Width of the record length field: the host's native `usize`.
pub(crate) const LEN_SIZE: usize = std::mem::size_of::<usize>();

/// Bytes occupied by a record header (tag byte plus length field).
pub const HEADER_SIZE: usize = 1 + LEN_SIZE;

/// Borrowed view of one stored record.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    /// The record's tag.
    pub tag: Tag,
    /// View of the payload bytes inside the backing region.
    pub payload: Region<'a>,
}

/// Decoded raw header plus the derived payload view. Unlike [`Record`]
/// this can still describe the terminator (`tag == 0`).
#[derive(Debug)]
pub(crate) struct RawRecord<'a> {
    pub tag: u8,
    pub payload: Region<'a>,
    /// Offset of the next header within the walked region.
    pub next: usize,
}

/// Decode the record starting at `offset` within `mem`.
///
/// Every boundary -- header end, payload end -- is checked against the
/// region before any byte is interpreted, so a walk over a corrupted or
/// foreign buffer stops at the region edge instead of running past it.
pub(crate) fn record_at(mem: Region<'_>, offset: usize) -> StoreResult<RawRecord<'_>> {
    let header_end = offset
        .checked_add(HEADER_SIZE)
        .ok_or_else(|| StoreError::Malformed {
            offset,
            reason: "header offset overflows".into(),
        })?;
    if header_end > mem.size() {
        return Err(StoreError::Malformed {
            offset,
            reason: "record header extends past the region end".into(),
        });
    }

    let header = mem.advance(offset).reduce(HEADER_SIZE);
    let tag = header.as_slice()[0];
    let len = usize::from_ne_bytes(header.as_slice()[1..].try_into().unwrap());

    let next = header_end
        .checked_add(len)
        .ok_or_else(|| StoreError::Malformed {
            offset,
            reason: format!("record length {len} overflows"),
        })?;
    if next > mem.size() {
        return Err(StoreError::Malformed {
            offset,
            reason: format!("record payload of {len} bytes extends past the region end"),
        });
    }

    Ok(RawRecord {
        tag,
        payload: mem.advance(header_end).reduce(len),
        next,
    })
}

/// Encode a record header into `head`, which must be exactly
/// [`HEADER_SIZE`] bytes.
pub(crate) fn write_header(head: &mut RegionMut<'_>, tag: u8, len: usize) {
    assert_eq!(head.size(), HEADER_SIZE, "header slot has the wrong size");
    let buf = head.as_mut_slice();
    buf[0] = tag;
    buf[1..].copy_from_slice(&len.to_ne_bytes());
}
