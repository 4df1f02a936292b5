//! Simple token script. Balances live in the token (callee) account's
//! storage, one slot per holder.
//!
//! ```text
//! args := 0x00 account:u32                  query balance -> u128 LE
//!       | 0x01 to:u32 amount:u128           transfer from caller
//! ```

use crate::domain::keys::{u128_value, u32_value, value_to_u128};
use crate::domain::{AccountId, ArgsShape, ValidationError, ValidatorError, H256};
use crate::ports::Script;
use crate::runtime::ScriptContext;

pub const MSG_QUERY: u8 = 0;
pub const MSG_TRANSFER: u8 = 1;

const QUERY_LEN: usize = 1 + 4;
const TRANSFER_LEN: usize = 1 + 4 + 16;

pub struct SudtScript;

impl SudtScript {
    /// Storage slot of `holder`'s balance.
    pub fn balance_key(holder: AccountId) -> H256 {
        u32_value(holder.0)
    }

    pub fn query_args(holder: AccountId) -> Vec<u8> {
        let mut args = vec![MSG_QUERY];
        args.extend_from_slice(&holder.to_le_bytes());
        args
    }

    pub fn transfer_args(to: AccountId, amount: u128) -> Vec<u8> {
        let mut args = vec![MSG_TRANSFER];
        args.extend_from_slice(&to.to_le_bytes());
        args.extend_from_slice(&amount.to_le_bytes());
        args
    }
}

fn read_account(bytes: &[u8]) -> AccountId {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    AccountId(u32::from_le_bytes(buf))
}

impl Script for SudtScript {
    fn name(&self) -> &str {
        "sudt"
    }

    fn args_shape(&self) -> ArgsShape {
        ArgsShape {
            min_len: QUERY_LEN,
            max_len: Some(TRANSFER_LEN),
            selectors: None,
        }
        .with_selectors(&[MSG_QUERY, MSG_TRANSFER])
    }

    fn run(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ValidatorError> {
        let args = ctx.args().to_vec();
        let token = ctx.callee_id();
        match (args.first().copied(), args.len()) {
            (Some(MSG_QUERY), QUERY_LEN) => {
                let holder = read_account(&args[1..]);
                let balance = value_to_u128(&ctx.load(token, &Self::balance_key(holder))?);
                ctx.set_return_data(balance.to_le_bytes().to_vec());
                Ok(())
            }
            (Some(MSG_TRANSFER), TRANSFER_LEN) => {
                let to = read_account(&args[1..]);
                let mut amount = [0u8; 16];
                amount.copy_from_slice(&args[5..21]);
                let amount = u128::from_le_bytes(amount);
                let from = ctx.caller_id();
                // Recipient must exist.
                ctx.get_script_code_hash(to)?;

                let from_key = Self::balance_key(from);
                let from_balance = value_to_u128(&ctx.load(token, &from_key)?);
                let remaining = from_balance.checked_sub(amount).ok_or_else(|| {
                    ValidationError::InvalidData(format!(
                        "insufficient balance: {from_balance} < {amount}"
                    ))
                })?;
                ctx.store(token, &from_key, u128_value(remaining))?;

                let to_key = Self::balance_key(to);
                let to_balance = value_to_u128(&ctx.load(token, &to_key)?);
                let credited = to_balance
                    .checked_add(amount)
                    .ok_or_else(|| ValidationError::InvalidData("balance overflow".into()))?;
                ctx.store(token, &to_key, u128_value(credited))
            }
            (selector, len) => Err(ValidationError::UnknownArgs(format!(
                "message {selector:?} with {len} bytes"
            ))
            .into()),
        }
    }
}
