//! Counter script: adds a u64 to the callee's `counter` slot.
//!
//! Args: exactly 8 bytes, u64 little-endian. Returns the new counter value
//! as 8 bytes little-endian. The addition saturates.

use crate::domain::keys::{u64_value, value_to_u64};
use crate::domain::{blake2b, ArgsShape, ValidationError, ValidatorError, H256};
use crate::ports::Script;
use crate::runtime::ScriptContext;

pub struct SumScript;

impl SumScript {
    /// Storage slot holding the counter.
    pub fn counter_key() -> H256 {
        blake2b(b"counter")
    }
}

impl Script for SumScript {
    fn name(&self) -> &str {
        "sum"
    }

    fn args_shape(&self) -> ArgsShape {
        ArgsShape::exact(8)
    }

    fn run(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ValidatorError> {
        let args: [u8; 8] = ctx
            .args()
            .try_into()
            .map_err(|_| ValidationError::InvalidData("sum expects 8 bytes".into()))?;
        let delta = u64::from_le_bytes(args);

        let callee = ctx.callee_id();
        let key = Self::counter_key();
        let counter = value_to_u64(&ctx.load(callee, &key)?).saturating_add(delta);

        ctx.set_return_data(counter.to_le_bytes().to_vec());
        ctx.store(callee, &key, u64_value(counter))
    }
}
