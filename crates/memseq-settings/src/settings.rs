use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::debug;

use memseq_region::RegionMut;
use memseq_store::{PropertyStore, StoreResult, HEADER_SIZE};

use crate::error::{SettingsError, SettingsResult};

/// One fixed-size byte block shared between settings peers.
///
/// Stands in for a shared-memory mapping: every clone of a `SharedBlock`
/// refers to the same bytes, guarded by the single lock that serializes
/// all settings traffic.
#[derive(Clone)]
pub struct SharedBlock {
    size: usize,
    bytes: Arc<Mutex<Box<[u8]>>>,
}

impl SharedBlock {
    /// Allocate a block of `size` bytes, initialized as an empty store.
    ///
    /// # Panics
    ///
    /// Panics if `size` cannot hold even a terminator record.
    pub fn new(size: usize) -> Self {
        assert!(
            size >= HEADER_SIZE,
            "block of {size} bytes cannot hold a store"
        );
        let mut bytes = vec![0u8; size].into_boxed_slice();
        PropertyStore::new(RegionMut::new(&mut bytes));
        Self {
            size,
            bytes: Arc::new(Mutex::new(bytes)),
        }
    }

    /// Size of the block in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl fmt::Debug for SharedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBlock").field("size", &self.size).finish()
    }
}

/// Settings endpoint over a shared block.
///
/// The providing side creates the block with [`Settings::provide`]; any
/// number of peers join the same block through the handle from
/// [`Settings::block`]. All access runs through the clone/mutate/commit
/// cycle of [`Settings::transaction`], so a peer reading the shared bytes
/// can never observe a half-written record.
#[derive(Clone)]
pub struct Settings {
    block: SharedBlock,
}

impl Settings {
    /// Create the shared block and the first endpoint on it.
    pub fn provide(size: usize) -> Self {
        Self {
            block: SharedBlock::new(size),
        }
    }

    /// Join an existing shared block.
    pub fn join(block: SharedBlock) -> Self {
        Self { block }
    }

    /// Handle to the underlying block, for sharing with another peer.
    pub fn block(&self) -> SharedBlock {
        self.block.clone()
    }

    /// Run one settings transaction.
    ///
    /// Under the block lock: copy the shared bytes into a private scratch
    /// buffer, attach a validated store over the scratch, and run `f` on
    /// it. If `f` succeeds the scratch is copied back over the shared
    /// block before the lock is released; if it fails the scratch is
    /// discarded and the shared bytes are left exactly as they were.
    pub fn transaction<R, F>(&self, f: F) -> SettingsResult<R>
    where
        F: FnOnce(&mut PropertyStore<'_>) -> StoreResult<R>,
    {
        let mut shared = self
            .block
            .bytes
            .lock()
            .map_err(|_| SettingsError::Poisoned)?;
        let mut scratch = shared.to_vec();
        let mut store = PropertyStore::attach(RegionMut::new(&mut scratch))?;
        let out = f(&mut store)?;
        shared.copy_from_slice(&scratch);
        debug!(bytes = scratch.len(), "settings transaction committed");
        Ok(out)
    }

    /// Run a read-only pass over a private copy of the shared bytes.
    ///
    /// Same cycle as [`Settings::transaction`] but without the write-back.
    pub fn read<R, F>(&self, f: F) -> SettingsResult<R>
    where
        F: FnOnce(&PropertyStore<'_>) -> StoreResult<R>,
    {
        let shared = self
            .block
            .bytes
            .lock()
            .map_err(|_| SettingsError::Poisoned)?;
        let mut scratch = shared.to_vec();
        let store = PropertyStore::attach(RegionMut::new(&mut scratch))?;
        Ok(f(&store)?)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings").field("block", &self.block).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memseq_store::{StoreError, Tag};

    fn tag(raw: u8) -> Tag {
        Tag::new(raw).unwrap()
    }

    #[test]
    fn committed_values_are_visible_to_other_peers() {
        let provider = Settings::provide(128);
        let consumer = Settings::join(provider.block());

        provider
            .transaction(|store| store.set(tag(1), 0xdead_beefu32))
            .unwrap();

        let value = consumer
            .read(|store| store.get::<u32>(tag(1)))
            .unwrap();
        assert_eq!(value, 0xdead_beef);
    }

    #[test]
    fn transaction_returns_the_closure_value() {
        let settings = Settings::provide(128);
        let n = settings
            .transaction(|store| {
                store.set_str(tag(1), "abc")?;
                Ok(store.len())
            })
            .unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let settings = Settings::provide(128);
        let err = settings
            .transaction(|store| {
                store.set(tag(1), 7u8)?;
                // Failing lookup aborts the transaction after the write.
                store.get::<u8>(tag(9))
            })
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Store(StoreError::NotFound { tag: 9 })
        ));

        // The aborted write never reached the shared block.
        let absent = settings.read(|store| Ok(store.get::<u8>(tag(1)).is_err()));
        assert!(absent.unwrap());
    }

    #[test]
    fn out_of_space_surfaces_and_preserves_the_block() {
        let settings = Settings::provide(HEADER_SIZE * 2 + 4);
        settings
            .transaction(|store| store.set(tag(1), 1u32))
            .unwrap();
        let err = settings
            .transaction(|store| store.set(tag(2), 2u32))
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Store(StoreError::OutOfSpace { .. })
        ));
        let v = settings.read(|store| store.get::<u32>(tag(1))).unwrap();
        assert_eq!(v, 1);
    }

    #[test]
    fn concurrent_transactions_serialize_without_torn_records() {
        let settings = Settings::provide(1024);
        let block = settings.block();

        let handles: Vec<_> = (1..=8u8)
            .map(|raw| {
                let peer = Settings::join(block.clone());
                std::thread::spawn(move || {
                    peer.transaction(|store| store.set(tag(raw), raw as u64 * 10))
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // Every record landed and the sequence still validates on attach.
        settings
            .read(|store| {
                assert_eq!(store.len(), 8);
                for raw in 1..=8u8 {
                    assert_eq!(store.get::<u64>(tag(raw))?, raw as u64 * 10);
                }
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn a_panicked_peer_poisons_later_transactions() {
        let settings = Settings::provide(128);
        let peer = settings.clone();
        let worker = std::thread::spawn(move || {
            let _ = peer.transaction(|_store| -> StoreResult<()> {
                panic!("peer died mid-transaction");
            });
        });
        assert!(worker.join().is_err());

        let err = settings
            .transaction(|store| store.set(tag(1), 1u8))
            .unwrap_err();
        assert!(matches!(err, SettingsError::Poisoned));
    }

    #[test]
    fn block_reports_its_size() {
        let settings = Settings::provide(256);
        assert_eq!(settings.block().size(), 256);
    }
}
