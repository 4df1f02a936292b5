//! # Shared Fixtures
//!
//! A small world of accounts and scripts over an in-memory store, plus
//! helpers that build honest requests the way a layer-2 block producer
//! would: execute once, record the effects, attach a proof.

use qc_18_state_validator::prelude::*;
use qc_18_state_validator::domain::keys::u128_value;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// STORE WRAPPER
// =============================================================================

/// `StateStore` that counts commits reaching the wrapped store.
pub struct CountingStore {
    inner: InMemoryStateStore,
    commits: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: InMemoryStateStore) -> Self {
        Self {
            inner,
            commits: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &InMemoryStateStore {
        &self.inner
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

impl StateStore for CountingStore {
    fn snapshot(&self) -> StateView {
        self.inner.snapshot()
    }

    fn version(&self) -> u64 {
        self.inner.version()
    }

    fn root_at(&self, version: u64) -> Result<H256, StoreError> {
        self.inner.root_at(version)
    }

    fn load(&self, key: &H256) -> Result<H256, StoreError> {
        self.inner.load(key)
    }

    fn load_data(&self, hash: &H256) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.load_data(hash)
    }

    fn commit(&self, change_set: &ChangeSet) -> Result<H256, StoreError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.inner.commit(change_set)
    }
}

// =============================================================================
// TEST SCRIPTS
// =============================================================================

/// Returns fixed bytes and touches nothing.
pub struct EchoScript(pub &'static [u8]);

impl Script for EchoScript {
    fn name(&self) -> &str {
        "echo"
    }

    fn args_shape(&self) -> ArgsShape {
        ArgsShape::any()
    }

    fn run(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ValidatorError> {
        ctx.set_return_data(self.0.to_vec());
        Ok(())
    }
}

/// Writes `slots` distinct storage slots of the callee.
pub struct FillScript {
    pub slots: u32,
}

impl Script for FillScript {
    fn name(&self) -> &str {
        "fill"
    }

    fn args_shape(&self) -> ArgsShape {
        ArgsShape::any()
    }

    fn run(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ValidatorError> {
        let callee = ctx.callee_id();
        for i in 0..self.slots {
            ctx.store(callee, &blake2b(&i.to_le_bytes()), blake2b(b"filled"))?;
        }
        Ok(())
    }
}

// =============================================================================
// WORLD
// =============================================================================

pub fn lock_hash() -> H256 {
    blake2b(b"lock")
}

pub fn sum_hash() -> H256 {
    blake2b(b"sum")
}

pub fn sudt_hash() -> H256 {
    blake2b(b"sudt")
}

pub fn echo_hash() -> H256 {
    blake2b(b"echo")
}

pub fn fill_hash() -> H256 {
    blake2b(b"fill")
}

pub fn meta_hash() -> H256 {
    blake2b(b"meta")
}

/// Accounts registered by [`World::new`].
pub struct World {
    pub service: StateValidatorService<CountingStore>,
    pub alice: AccountId,
    pub bob: AccountId,
    pub counter: AccountId,
    pub token: AccountId,
    pub echo: AccountId,
    pub fill: AccountId,
    pub meta: AccountId,
}

/// Starting sUDT balance of `alice`.
pub const ALICE_BALANCE: u128 = 1_000;

impl World {
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::for_testing())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        let store = InMemoryStateStore::new();
        let register = |code_hash: H256| store.register_account(code_hash).expect("fresh store has ids");
        let alice = register(lock_hash());
        let bob = register(lock_hash());
        let counter = register(sum_hash());
        let token = register(sudt_hash());
        let echo = register(echo_hash());
        let fill = register(fill_hash());
        let meta = register(meta_hash());
        store.set_storage(token, SudtScript::balance_key(alice), u128_value(ALICE_BALANCE));

        let mut registry = ScriptRegistry::new();
        registry.register(sum_hash(), config.abi_version, Arc::new(SumScript));
        registry.register(sudt_hash(), config.abi_version, Arc::new(SudtScript));
        registry.register(echo_hash(), config.abi_version, Arc::new(EchoScript(b"ok")));
        registry.register(fill_hash(), config.abi_version, Arc::new(FillScript { slots: 1000 }));
        registry.register(meta_hash(), config.abi_version, Arc::new(MetaContractScript));

        let store = Arc::new(CountingStore::new(store));
        Self {
            service: StateValidatorService::new(store, registry, config),
            alice,
            bob,
            counter,
            token,
            echo,
            fill,
            meta,
        }
    }

    pub fn store(&self) -> &CountingStore {
        self.service.store()
    }

    /// Request with an empty claim and no proof.
    pub fn bare_request(&self, caller: AccountId, callee: AccountId, args: Vec<u8>) -> ValidationRequest {
        ValidationRequest {
            caller_id: caller,
            callee_id: callee,
            args,
            state_root: self.store().inner().root(),
            claimed: CallResult::new(vec![], ChangeSet::empty()),
            proof: vec![],
        }
    }

    /// Execute outside the service and claim exactly what happened.
    pub fn honest_request(
        &self,
        caller: AccountId,
        callee: AccountId,
        args: Vec<u8>,
    ) -> Result<ValidationRequest, ValidatorError> {
        let store = self.store();
        let config = self.service.config();
        let view = store.snapshot();
        let accounts = AccountStore::new(view.clone());
        let code_hash = accounts.get_account(callee)?.script_code_hash;
        let handle = self.service.resolver().resolve(&code_hash, &accounts)?;
        let context = ContextBuilder::new(store, config).build(caller, callee, args.clone(), view, &handle)?;
        let claimed = NativeExecutor::new(config).execute(&handle, &context)?;

        let keys: Vec<H256> = claimed.change_set.iter().map(|e| e.key).collect();
        let mut request = self.bare_request(caller, callee, args);
        request.proof = store.inner().merkle_proof(&keys);
        request.claimed = claimed;
        Ok(request)
    }

    /// Validate then commit, as the host would.
    pub fn apply(&self, request: &ValidationRequest) -> Result<ValidatedTransition, ValidatorError> {
        let transition = self.service.validate(request)?;
        self.store().commit(&transition.call_result.change_set)?;
        Ok(transition)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted `(key, value)` pairs drawn from a deterministic RNG.
pub fn random_leaves(seed: u64, count: usize) -> Vec<(H256, H256)> {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut leaves: Vec<(H256, H256)> = (0..count)
        .map(|_| (H256::new(rng.gen()), H256::new(rng.gen())))
        .collect();
    leaves.sort();
    leaves.dedup_by_key(|(k, _)| *k);
    leaves
}
