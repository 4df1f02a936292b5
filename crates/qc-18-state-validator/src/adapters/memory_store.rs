//! # In-Memory State Store
//!
//! Copy-on-write `StateStore` backed by a [`SparseMerkleTree`].
//!
//! Snapshots hold an `Arc` to an immutable version; a commit clones the
//! tree only while older snapshots are still alive. Writers are serialized
//! by the store lock.

use crate::domain::keys::{
    account_count_key, account_id_value, account_storage_key, data_hash_key, data_marker,
    nonce_key, script_code_hash_key, script_hash_to_id_key, u32_value, value_to_u32,
};
use crate::domain::{blake2b, AccountId, ChangeSet, StoreError, H256};
use crate::ports::{StateReader, StateStore, StateView};
use crate::smt::SparseMerkleTree;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// One immutable version of the state.
#[derive(Clone, Debug, Default)]
struct VersionedState {
    tree: SparseMerkleTree,
    cells: HashMap<H256, Vec<u8>>,
    root: H256,
}

impl StateReader for VersionedState {
    fn get(&self, key: &H256) -> Result<H256, StoreError> {
        Ok(self.tree.get(key))
    }

    fn get_data(&self, hash: &H256) -> Result<Option<Vec<u8>>, StoreError> {
        if self.tree.get(&data_hash_key(hash)).is_zero() {
            return Ok(None);
        }
        match self.cells.get(hash) {
            Some(bytes) => Ok(Some(bytes.clone())),
            None => Err(StoreError::Corrupted(format!(
                "data marker without bytes for {hash}"
            ))),
        }
    }
}

struct StoreInner {
    current: Arc<VersionedState>,
    /// Root of every version, indexed by version number.
    roots: Vec<H256>,
}

/// In-memory implementation of `StateStore`.
pub struct InMemoryStateStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                current: Arc::new(VersionedState::default()),
                roots: vec![H256::zero()],
            }),
        }
    }

    /// Register a new account bound to `script_code_hash`, outside any
    /// validated transition. Used to seed genesis state.
    pub fn register_account(&self, script_code_hash: H256) -> Result<AccountId, StoreError> {
        let assigned = self.try_apply(|state| {
            let count = value_to_u32(&state.tree.get(&account_count_key()));
            let next = count
                .checked_add(1)
                .ok_or_else(|| StoreError::Exhausted("account ids".into()))?;
            let id = AccountId(count);
            state.tree.update(script_code_hash_key(id), script_code_hash);
            state.tree.update(account_count_key(), u32_value(next));
            let index = script_hash_to_id_key(&script_code_hash);
            if state.tree.get(&index).is_zero() {
                state.tree.update(index, account_id_value(id));
            }
            Ok(id)
        })?;
        debug!(account = %assigned, code_hash = %script_code_hash, "Account registered");
        Ok(assigned)
    }

    /// Store a data cell and return its hash.
    pub fn insert_data(&self, data: Vec<u8>) -> H256 {
        let hash = blake2b(&data);
        self.apply(|state| {
            state.tree.update(data_hash_key(&hash), data_marker());
            state.cells.insert(hash, data);
        });
        hash
    }

    /// Set one storage slot of `id`.
    pub fn set_storage(&self, id: AccountId, user_key: H256, value: H256) {
        self.apply(|state| state.tree.update(account_storage_key(id, &user_key), value));
    }

    /// Set the nonce of `id`.
    pub fn set_nonce(&self, id: AccountId, nonce: u32) {
        self.apply(|state| state.tree.update(nonce_key(id), u32_value(nonce)));
    }

    /// Latest root.
    pub fn root(&self) -> H256 {
        self.inner.read().current.root
    }

    /// Compiled proof for `keys` against the latest version.
    pub fn merkle_proof(&self, keys: &[H256]) -> Vec<u8> {
        self.inner.read().current.tree.merkle_proof(keys).encode()
    }

    /// Mutate a private copy of the latest version and publish it.
    fn apply<F: FnOnce(&mut VersionedState)>(&self, mutate: F) {
        let mut inner = self.inner.write();
        mutate(Arc::make_mut(&mut inner.current));
        Self::publish(&mut inner);
    }

    /// Like `apply`, but nothing is published when `mutate` fails. `mutate`
    /// must fail before it changes anything.
    fn try_apply<T, F>(&self, mutate: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut VersionedState) -> Result<T, StoreError>,
    {
        let mut inner = self.inner.write();
        let out = mutate(Arc::make_mut(&mut inner.current))?;
        Self::publish(&mut inner);
        Ok(out)
    }

    fn publish(inner: &mut StoreInner) {
        let state = Arc::make_mut(&mut inner.current);
        state.root = state.tree.root();
        let root = state.root;
        inner.roots.push(root);
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStateStore {
    fn snapshot(&self) -> StateView {
        let inner = self.inner.read();
        let version = (inner.roots.len() - 1) as u64;
        let current = Arc::clone(&inner.current);
        let root = current.root;
        StateView::new(version, root, current)
    }

    fn version(&self) -> u64 {
        (self.inner.read().roots.len() - 1) as u64
    }

    fn root_at(&self, version: u64) -> Result<H256, StoreError> {
        self.inner
            .read()
            .roots
            .get(version as usize)
            .copied()
            .ok_or(StoreError::UnknownVersion(version))
    }

    fn load(&self, key: &H256) -> Result<H256, StoreError> {
        self.inner.read().current.get(key)
    }

    fn load_data(&self, hash: &H256) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.read().current.get_data(hash)
    }

    fn commit(&self, change_set: &ChangeSet) -> Result<H256, StoreError> {
        let mut inner = self.inner.write();
        for entry in change_set.iter() {
            let found = inner.current.tree.get(&entry.key);
            if found != entry.old_value {
                return Err(StoreError::Conflict {
                    key: entry.key,
                    expected: entry.old_value,
                    found,
                });
            }
        }

        let state = Arc::make_mut(&mut inner.current);
        for entry in change_set.iter() {
            state.tree.update(entry.key, entry.new_value);
        }
        state.root = state.tree.root();
        let root = state.root;
        inner.roots.push(root);
        debug!(
            version = inner.roots.len() - 1,
            entries = change_set.len(),
            root = %root,
            "Change set committed"
        );
        Ok(root)
    }
}
