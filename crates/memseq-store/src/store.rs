use std::fmt;

use memseq_region::{Region, RegionMut};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::record::{record_at, write_header, Record, HEADER_SIZE, TERMINATOR};
use crate::tag::Tag;
use crate::value::FixedValue;

/// Tagged-length-value property store over one caller-owned byte region.
///
/// Records are packed back to back and the sequence ends in a single
/// terminator record, so the whole store lives in the backing region with
/// no allocation and no out-of-band state. At most one record exists per
/// tag; the store is append-only -- changing a value means rebuilding the
/// sequence from a fresh [`PropertyStore::reset`].
///
/// Lookups and insertions are linear scans over the stored bytes. This is
/// meant for occasional exchange of settings-sized data, not for per-packet
/// traffic.
///
/// The store never synchronizes: when the backing region is visible to
/// other threads or processes, the caller must serialize every access (see
/// the `memseq-settings` crate for the intended transaction pattern).
pub struct PropertyStore<'a> {
    mem: RegionMut<'a>,
}

impl<'a> PropertyStore<'a> {
    /// Create a fresh store: zero-fill the region and write a lone
    /// terminator at its start. Any previous contents are lost.
    ///
    /// # Panics
    ///
    /// Panics if the region cannot hold even a terminator record.
    pub fn new(mem: RegionMut<'a>) -> Self {
        assert!(
            mem.size() >= HEADER_SIZE,
            "backing region of {} bytes cannot hold a terminator",
            mem.size()
        );
        let mut store = Self { mem };
        store.reset();
        store
    }

    /// Bind to a region that already holds a sequence, after one bounded
    /// walk verifying that every record lies inside the region, the
    /// sequence is terminated, and no tag repeats.
    pub fn attach(mem: RegionMut<'a>) -> StoreResult<Self> {
        validate(mem.as_region())?;
        Ok(Self { mem })
    }

    /// Bind to a region the caller asserts holds a well-formed sequence,
    /// without validation. Scans over a buffer that turns out to be
    /// corrupt fail with [`StoreError::Malformed`] rather than reading
    /// outside the region.
    pub fn attach_unchecked(mem: RegionMut<'a>) -> Self {
        Self { mem }
    }

    /// Re-initialize as an empty store. Never call this on an attached
    /// region whose contents should be kept.
    pub fn reset(&mut self) {
        self.mem.zero_fill();
        // All-zero bytes already spell a terminator; write it explicitly
        // so initialization does not lean on that coincidence.
        let mut head = self.mem.reborrow().reduce(HEADER_SIZE);
        write_header(&mut head, TERMINATOR, 0);
    }

    /// Size of the backing region in bytes.
    pub fn capacity(&self) -> usize {
        self.mem.size()
    }

    /// Bytes occupied by the stored records plus the terminator.
    pub fn used(&self) -> StoreResult<usize> {
        Ok(self.terminator_offset()? + HEADER_SIZE)
    }

    /// Bytes still available for new records.
    pub fn remaining(&self) -> StoreResult<usize> {
        Ok(self.capacity() - self.used()?)
    }

    /// Number of stored records. Walks the sequence.
    pub fn len(&self) -> usize {
        self.records().count()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forward iterator over the stored records.
    ///
    /// Iteration ends at whatever terminator the buffer holds, or at the
    /// first record that does not fit the backing region.
    pub fn records(&self) -> Records<'_> {
        Records {
            mem: self.mem.as_region(),
            offset: 0,
            done: false,
        }
    }

    /// Copy the payload of the record carrying `tag` out as a fixed-size
    /// value. The payload must be at least `T::SIZE` bytes.
    pub fn get<T: FixedValue>(&self, tag: Tag) -> StoreResult<T> {
        let (offset, payload) = self.find(tag)?;
        if payload.size() < T::SIZE {
            return Err(StoreError::Malformed {
                offset,
                reason: format!(
                    "payload of {} bytes is too short for a {}-byte value",
                    payload.size(),
                    T::SIZE
                ),
            });
        }
        Ok(T::take(&payload.as_slice()[..T::SIZE]))
    }

    /// Borrow the payload of the record carrying `tag`.
    ///
    /// The returned slice aliases the backing region, so the borrow ends
    /// at the next mutating call (`set*`, `reset`).
    pub fn get_bytes(&self, tag: Tag) -> StoreResult<&[u8]> {
        Ok(self.find(tag)?.1.as_slice())
    }

    /// Borrow the payload of the record carrying `tag` as text.
    pub fn get_str(&self, tag: Tag) -> StoreResult<&str> {
        let (offset, payload) = self.find(tag)?;
        std::str::from_utf8(payload.as_slice()).map_err(|_| StoreError::Malformed {
            offset,
            reason: "payload is not valid UTF-8".into(),
        })
    }

    /// Borrow the payload of the record carrying `tag` as a region.
    pub fn get_region(&self, tag: Tag) -> StoreResult<Region<'_>> {
        Ok(self.find(tag)?.1)
    }

    /// Store a fixed-size value under `tag`.
    ///
    /// # Panics
    ///
    /// Panics if a record with `tag` already exists; storing the same tag
    /// twice is a caller bug, and the scan that detects it runs before any
    /// byte is written.
    pub fn set<T: FixedValue>(&mut self, tag: Tag, value: T) -> StoreResult<()> {
        self.insert_with(tag, T::SIZE, |payload| value.put(payload.as_mut_slice()))
    }

    /// Store raw bytes under `tag`. Panics on a duplicate tag, like
    /// [`PropertyStore::set`].
    pub fn set_bytes(&mut self, tag: Tag, bytes: &[u8]) -> StoreResult<()> {
        self.insert_with(tag, bytes.len(), |payload| {
            payload.copy_from(Region::new(bytes))
        })
    }

    /// Store text under `tag`. Panics on a duplicate tag, like
    /// [`PropertyStore::set`].
    pub fn set_str(&mut self, tag: Tag, text: &str) -> StoreResult<()> {
        self.set_bytes(tag, text.as_bytes())
    }

    /// Store the bytes viewed by `src` under `tag`. Panics on a duplicate
    /// tag, like [`PropertyStore::set`].
    pub fn set_region(&mut self, tag: Tag, src: Region<'_>) -> StoreResult<()> {
        self.set_bytes(tag, src.as_slice())
    }

    /// Scan for `tag`; returns the payload offset and view.
    fn find(&self, tag: Tag) -> StoreResult<(usize, Region<'_>)> {
        let mem = self.mem.as_region();
        let mut offset = 0;
        loop {
            let rec = record_at(mem, offset)?;
            if rec.tag == TERMINATOR {
                debug!(tag = tag.get(), "property not found");
                return Err(StoreError::NotFound { tag: tag.get() });
            }
            if rec.tag == tag.get() {
                return Ok((offset + HEADER_SIZE, rec.payload));
            }
            offset = rec.next;
        }
    }

    fn terminator_offset(&self) -> StoreResult<usize> {
        let mem = self.mem.as_region();
        let mut offset = 0;
        loop {
            let rec = record_at(mem, offset)?;
            if rec.tag == TERMINATOR {
                return Ok(offset);
            }
            offset = rec.next;
        }
    }

    /// Shared insertion path: duplicate scan, capacity check, then the
    /// header / payload / fresh-terminator writes.
    fn insert_with<F>(&mut self, tag: Tag, len: usize, write: F) -> StoreResult<()>
    where
        F: FnOnce(&mut RegionMut<'_>),
    {
        // The duplicate scan doubles as the search for the terminator slot.
        let end = {
            let mem = self.mem.as_region();
            let mut offset = 0;
            loop {
                let rec = record_at(mem, offset)?;
                if rec.tag == TERMINATOR {
                    break offset;
                }
                assert!(rec.tag != tag.get(), "duplicate property tag {tag}");
                offset = rec.next;
            }
        };

        let needed = HEADER_SIZE + len + HEADER_SIZE;
        let remaining = self.capacity() - end;
        if needed > remaining {
            return Err(StoreError::OutOfSpace { needed, remaining });
        }

        // Nothing has been written up to here; a rejected set leaves the
        // sequence byte-identical.
        let slot = self.mem.reborrow().advance(end).reduce(needed);
        let (mut head, rest) = slot.split_at(HEADER_SIZE);
        write_header(&mut head, tag.get(), len);
        let (mut payload, mut term) = rest.split_at(len);
        payload.zero_fill();
        write(&mut payload);
        // A fresh terminator is all zeroes.
        term.zero_fill();
        Ok(())
    }
}

impl fmt::Debug for PropertyStore<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyStore")
            .field("capacity", &self.capacity())
            .field("records", &self.len())
            .finish()
    }
}

impl<'s> IntoIterator for &'s PropertyStore<'_> {
    type Item = Record<'s>;
    type IntoIter = Records<'s>;

    fn into_iter(self) -> Records<'s> {
        self.records()
    }
}

/// Forward iterator over the records of a [`PropertyStore`].
///
/// "At end" means the current record's tag is the terminator tag, never an
/// address comparison, so the walk stops at whatever terminator the buffer
/// contains. Each step re-checks the record's bounds against the backing
/// region before reading it; a record that does not fit ends the walk.
pub struct Records<'a> {
    mem: Region<'a>,
    offset: usize,
    done: bool,
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Record<'a>> {
        if self.done {
            return None;
        }
        match record_at(self.mem, self.offset) {
            Ok(rec) if rec.tag == TERMINATOR => {
                self.done = true;
                None
            }
            Ok(rec) => {
                self.offset = rec.next;
                let tag = Tag::new(rec.tag).expect("non-terminator tag is nonzero");
                Some(Record {
                    tag,
                    payload: rec.payload,
                })
            }
            Err(err) => {
                warn!(%err, "stopping walk over malformed sequence");
                self.done = true;
                None
            }
        }
    }
}

/// One bounded walk over `mem` checking record bounds, termination, and
/// tag uniqueness.
fn validate(mem: Region<'_>) -> StoreResult<()> {
    let mut seen = [false; 256];
    let mut offset = 0;
    loop {
        let rec = record_at(mem, offset)?;
        if rec.tag == TERMINATOR {
            return Ok(());
        }
        if seen[rec.tag as usize] {
            return Err(StoreError::Malformed {
                offset,
                reason: format!("duplicate tag {}", rec.tag),
            });
        }
        seen[rec.tag as usize] = true;
        offset = rec.next;
    }
}
