//! Meta contract: creates accounts as a validated state transition.
//!
//! ```text
//! args := 0x00 code_hash:[32]               create account -> id:u32 LE
//! ```
//!
//! The new account takes the next free id and is bound to `code_hash`.

use crate::domain::{ArgsShape, ValidationError, ValidatorError, H256, HASH_BYTES};
use crate::ports::Script;
use crate::runtime::ScriptContext;

pub const MSG_CREATE_ACCOUNT: u8 = 0;

const CREATE_LEN: usize = 1 + HASH_BYTES;

pub struct MetaContractScript;

impl MetaContractScript {
    pub fn create_account_args(code_hash: &H256) -> Vec<u8> {
        let mut args = vec![MSG_CREATE_ACCOUNT];
        args.extend_from_slice(code_hash.as_bytes());
        args
    }
}

impl Script for MetaContractScript {
    fn name(&self) -> &str {
        "meta"
    }

    fn args_shape(&self) -> ArgsShape {
        ArgsShape::exact(CREATE_LEN).with_selectors(&[MSG_CREATE_ACCOUNT])
    }

    fn run(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ValidatorError> {
        let args = ctx.args();
        let code_hash: [u8; HASH_BYTES] = match args.split_first() {
            Some((&MSG_CREATE_ACCOUNT, rest)) => rest
                .try_into()
                .map_err(|_| ValidationError::InvalidData("create account expects a code hash".into()))?,
            _ => return Err(ValidationError::UnknownArgs("unknown meta message".into()).into()),
        };

        let id = ctx.create_account(H256::new(code_hash))?;
        ctx.set_return_data(id.to_le_bytes().to_vec());
        Ok(())
    }
}
