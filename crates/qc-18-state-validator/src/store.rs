//! # Account Store
//!
//! Read-only resolution of accounts and data cells from one state view.

use crate::domain::keys::{
    account_count_key, account_storage_key, nonce_key, script_code_hash_key, value_to_u32,
};
use crate::domain::{Account, AccountId, DataCell, ResolutionError, H256};
use crate::ports::StateView;

/// Resolves account ids and data hashes against a [`StateView`].
#[derive(Clone, Debug)]
pub struct AccountStore {
    view: StateView,
}

impl AccountStore {
    pub fn new(view: StateView) -> Self {
        Self { view }
    }

    pub fn view(&self) -> &StateView {
        &self.view
    }

    /// Resolve an account.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` when no script code hash is bound to `id`.
    pub fn get_account(&self, id: AccountId) -> Result<Account, ResolutionError> {
        let script_code_hash = self.view.get(&script_code_hash_key(id))?;
        if script_code_hash.is_zero() {
            return Err(ResolutionError::AccountNotFound(id));
        }
        let nonce = value_to_u32(&self.view.get(&nonce_key(id))?);
        Ok(Account {
            id,
            script_code_hash,
            nonce,
        })
    }

    /// Resolve a data cell.
    ///
    /// # Errors
    ///
    /// `DataCellNotFound` when absent; `InvalidData` when the stored bytes
    /// do not hash to `hash`.
    pub fn get_cell(&self, hash: &H256) -> Result<DataCell, ResolutionError> {
        let data = self
            .view
            .get_data(hash)?
            .ok_or(ResolutionError::DataCellNotFound(*hash))?;
        let cell = DataCell { hash: *hash, data };
        if !cell.is_consistent() {
            return Err(ResolutionError::InvalidData(format!(
                "cell {hash} does not match its content"
            )));
        }
        Ok(cell)
    }

    /// One storage slot of an account.
    pub fn get_storage(&self, id: AccountId, user_key: &H256) -> Result<H256, ResolutionError> {
        Ok(self.view.get(&account_storage_key(id, user_key))?)
    }

    /// Number of registered accounts.
    pub fn account_count(&self) -> Result<u32, ResolutionError> {
        Ok(value_to_u32(&self.view.get(&account_count_key())?))
    }
}
