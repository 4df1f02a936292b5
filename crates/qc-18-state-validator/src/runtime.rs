//! # Script Runtime
//!
//! State accessors a script sees while running. Reads are served from the
//! call's state view; writes are buffered and turned into a change-set when
//! the call finishes.
//!
//! Accounts and data cells created during the call are visible to the rest
//! of the call. Their state keys land in the change-set like any other
//! write; the bytes of a stored cell travel with the transaction and are
//! handed to the store by the host.

use crate::context::ExecutionContext;
use crate::domain::keys::{
    account_count_key, account_id_value, account_storage_key, data_hash_key, data_marker,
    nonce_key, script_code_hash_key, script_hash_to_id_key, u32_value, value_to_account_id,
    value_to_u32,
};
use crate::domain::{
    blake2b, AccountId, CallResult, ChangeEntry, ChangeSet, ResolutionError, ValidationError,
    ValidatorError, H256,
};
use crate::smt::KvState;
use crate::store::AccountStore;
use std::collections::HashMap;

/// Largest data cell a script may store.
pub const MAX_DATA_CELL_SIZE: usize = 25 * 1024;

/// Per-call script environment.
pub struct ScriptContext<'a> {
    context: &'a ExecutionContext,
    accounts: AccountStore,
    /// Value of every touched key before the call.
    prior: KvState,
    /// Latest value of every touched key.
    current: KvState,
    /// Cells stored during the call, by hash.
    stored_data: HashMap<H256, Vec<u8>>,
    return_data: Vec<u8>,
}

impl<'a> ScriptContext<'a> {
    pub fn new(context: &'a ExecutionContext, max_kv_pairs: usize) -> Self {
        Self {
            context,
            accounts: AccountStore::new(context.state_view().clone()),
            prior: KvState::with_capacity(max_kv_pairs),
            current: KvState::with_capacity(max_kv_pairs),
            stored_data: HashMap::new(),
            return_data: Vec::new(),
        }
    }

    pub fn caller_id(&self) -> AccountId {
        self.context.caller().id
    }

    pub fn callee_id(&self) -> AccountId {
        self.context.callee().id
    }

    pub fn args(&self) -> &[u8] {
        self.context.args()
    }

    /// Read a storage slot of `account`.
    pub fn load(&mut self, account: AccountId, user_key: &H256) -> Result<H256, ValidatorError> {
        self.ensure_account(account)?;
        self.load_raw(&account_storage_key(account, user_key))
    }

    /// Write a storage slot of `account`.
    pub fn store(
        &mut self,
        account: AccountId,
        user_key: &H256,
        value: H256,
    ) -> Result<(), ValidatorError> {
        self.ensure_account(account)?;
        self.store_raw(account_storage_key(account, user_key), value)
    }

    pub fn load_nonce(&mut self, account: AccountId) -> Result<u32, ValidatorError> {
        self.ensure_account(account)?;
        Ok(value_to_u32(&self.load_raw(&nonce_key(account))?))
    }

    pub fn get_script_code_hash(&self, account: AccountId) -> Result<H256, ValidatorError> {
        match self.current.fetch(&script_code_hash_key(account)) {
            Some(hash) if !hash.is_zero() => Ok(hash),
            _ => Ok(self.accounts.get_account(account)?.script_code_hash),
        }
    }

    /// First account bound to `code_hash`.
    pub fn get_account_id_by_code_hash(&mut self, code_hash: &H256) -> Result<AccountId, ValidatorError> {
        let value = self.load_raw(&script_hash_to_id_key(code_hash))?;
        value_to_account_id(&value).ok_or_else(|| {
            ResolutionError::NotFound(format!("account for code hash {code_hash}")).into()
        })
    }

    /// Create an account bound to `code_hash` with the next free id.
    pub fn create_account(&mut self, code_hash: H256) -> Result<AccountId, ValidatorError> {
        if code_hash.is_zero() {
            return Err(ValidationError::InvalidData("zero script code hash".into()).into());
        }
        let count = value_to_u32(&self.load_raw(&account_count_key())?);
        let next = count.checked_add(1).ok_or(ValidationError::InsufficientCapacity {
            what: "account ids",
            actual: count as usize + 1,
            limit: u32::MAX as usize,
        })?;
        let id = AccountId(count);
        if !self.load_raw(&script_code_hash_key(id))?.is_zero() {
            return Err(ValidationError::InvalidData(format!("account {id} already exists")).into());
        }

        self.store_raw(script_code_hash_key(id), code_hash)?;
        self.store_raw(account_count_key(), u32_value(next))?;
        let index = script_hash_to_id_key(&code_hash);
        if self.load_raw(&index)?.is_zero() {
            self.store_raw(index, account_id_value(id))?;
        }
        Ok(id)
    }

    /// Bytes of a data cell.
    pub fn load_data(&self, hash: &H256) -> Result<Vec<u8>, ValidatorError> {
        if let Some(data) = self.stored_data.get(hash) {
            return Ok(data.clone());
        }
        Ok(self.accounts.get_cell(hash)?.data)
    }

    /// Store a data cell and return its hash.
    pub fn store_data(&mut self, data: Vec<u8>) -> Result<H256, ValidatorError> {
        if data.len() > MAX_DATA_CELL_SIZE {
            return Err(ValidationError::InsufficientCapacity {
                what: "data cell bytes",
                actual: data.len(),
                limit: MAX_DATA_CELL_SIZE,
            }
            .into());
        }
        let hash = blake2b(&data);
        self.store_raw(data_hash_key(&hash), data_marker())?;
        self.stored_data.insert(hash, data);
        Ok(hash)
    }

    /// Cells stored during the call.
    pub fn stored_data(&self) -> impl Iterator<Item = (&H256, &[u8])> {
        self.stored_data.iter().map(|(hash, data)| (hash, data.as_slice()))
    }

    pub fn set_return_data(&mut self, data: Vec<u8>) {
        self.return_data = data;
    }

    /// Advance the nonce of `account` by one.
    pub fn increase_nonce(&mut self, account: AccountId) -> Result<u32, ValidatorError> {
        let nonce = self.load_nonce(account)?;
        let next = nonce.checked_add(1).ok_or_else(|| {
            ValidationError::InvalidData(format!("nonce overflow for {account}"))
        })?;
        self.store_raw(nonce_key(account), u32_value(next))?;
        Ok(next)
    }

    /// Finish the call: every touched key whose value changed becomes one
    /// change entry, ordered by key path.
    pub fn into_call_result(mut self) -> Result<CallResult, ValidatorError> {
        self.current.normalize();
        let mut entries = Vec::new();
        for (key, new_value) in self.current.pairs() {
            let old_value = self.prior.fetch(key).unwrap_or_default();
            if old_value != *new_value {
                entries.push(ChangeEntry::new(*key, old_value, *new_value));
            }
        }
        Ok(CallResult::new(self.return_data, ChangeSet::new(entries)?))
    }

    fn ensure_account(&self, account: AccountId) -> Result<(), ValidatorError> {
        if account == self.context.caller().id || account == self.context.callee().id {
            return Ok(());
        }
        self.get_script_code_hash(account)?;
        Ok(())
    }

    fn load_raw(&mut self, key: &H256) -> Result<H256, ValidatorError> {
        if let Some(value) = self.current.fetch(key) {
            return Ok(value);
        }
        let value = self.context.state_view().get(key)?;
        self.prior.insert(*key, value)?;
        self.current.insert(*key, value)?;
        Ok(value)
    }

    fn store_raw(&mut self, key: H256, value: H256) -> Result<(), ValidatorError> {
        if !self.prior.contains(&key) {
            let original = self.context.state_view().get(&key)?;
            self.prior.insert(key, original)?;
        }
        self.current.insert(key, value)?;
        Ok(())
    }
}
