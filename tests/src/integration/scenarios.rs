//! # Rejection Scenarios
//!
//! End-to-end requests that must be refused, each with the exact error kind
//! a host maps onto its wire codes.
//!
//! | Scenario | Setup | Expected |
//! |----------|-------|----------|
//! | A | account 7 bound to a code hash nothing registers | `UnknownScriptCodeHash` |
//! | B | args shorter than the script minimum | `UnknownArgs` |
//! | C | script returns "ok", claim says "fail" | `MismatchReturnData`, no commit |
//! | D | 1000-entry change-set against capacity 500 | `InsufficientCapacity` |

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use qc_18_state_validator::prelude::*;
    use qc_18_state_validator::scripts::sudt::MSG_QUERY;

    // =========================================================================
    // SCENARIO A: UNKNOWN SCRIPT
    // =========================================================================

    #[test]
    fn test_scenario_a_unregistered_code_hash() {
        let world = World::new();
        let inner = world.store().inner();
        let orphan_hash = blake2b(b"never registered");
        let mut orphan = AccountId(0);
        while orphan.0 < 7 {
            orphan = inner.register_account(orphan_hash).unwrap();
        }
        assert_eq!(orphan, AccountId(7));

        let request = world.bare_request(world.alice, orphan, vec![]);
        let err = world.service.validate(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownScriptCodeHash);
        assert_eq!(err.kind().code(), 50);
    }

    // =========================================================================
    // SCENARIO B: MALFORMED ARGS
    // =========================================================================

    #[test]
    fn test_scenario_b_args_below_minimum() {
        let world = World::new();
        let request = world.bare_request(world.alice, world.counter, vec![1, 2, 3]);
        let err = world.service.validate(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgs);

        let request = world.bare_request(world.alice, world.token, vec![MSG_QUERY]);
        let err = world.service.validate(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgs);
    }

    // =========================================================================
    // SCENARIO C: RETURN DATA MISMATCH
    // =========================================================================

    #[test]
    fn test_scenario_c_return_data_mismatch_never_commits() {
        let world = World::new();
        let root = world.store().inner().root();

        let mut request = world.honest_request(world.alice, world.echo, vec![]).unwrap();
        assert_eq!(request.claimed.return_data, b"ok".to_vec());
        request.claimed.return_data = b"fail".to_vec();

        let err = world.service.validate(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MismatchReturnData);
        assert!(matches!(
            err,
            ValidatorError::Validation(ValidationError::MismatchReturnData { actual: 2, claimed: 4 })
        ));
        assert_eq!(world.store().commits(), 0);
        assert_eq!(world.store().inner().root(), root);
    }

    // =========================================================================
    // SCENARIO D: CAPACITY
    // =========================================================================

    #[test]
    fn test_scenario_d_change_set_over_capacity() {
        let world = World::with_config(ValidatorConfig {
            max_change_set_entries: 500,
            ..ValidatorConfig::for_testing()
        });
        let request = world.bare_request(world.alice, world.fill, vec![]);
        let err = world.service.validate(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientCapacity);
        assert_eq!(world.store().commits(), 0);
    }

    #[test]
    fn test_scenario_d_fits_with_default_capacity() {
        let world = World::new();
        let request = world.honest_request(world.alice, world.fill, vec![]).unwrap();
        // 1000 slots plus the caller nonce.
        assert_eq!(request.claimed.change_set.len(), 1001);
        let transition = world.service.validate(&request).unwrap();
        assert_ne!(transition.post_root, transition.prev_root);
    }

    // =========================================================================
    // OTHER REJECTIONS
    // =========================================================================

    #[test]
    fn test_missing_caller() {
        let world = World::new();
        let request = world.bare_request(AccountId(500), world.echo, vec![]);
        let err = world.service.validate(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccountNotFound);
    }

    fn linked_service(code_hash: H256, cell: Option<Vec<u8>>) -> (StateValidatorService<CountingStore>, ValidationRequest) {
        let store = InMemoryStateStore::new();
        let caller = store.register_account(lock_hash()).unwrap();
        let callee = store.register_account(code_hash).unwrap();
        if let Some(code) = cell {
            store.insert_data(code);
        }

        let mut registry = ScriptRegistry::new();
        registry.register_with_code_cell(code_hash, 1, Arc::new(EchoScript(b"ok")));
        let service = StateValidatorService::new(
            Arc::new(CountingStore::new(store)),
            registry,
            ValidatorConfig::for_testing(),
        );
        let request = ValidationRequest {
            caller_id: caller,
            callee_id: callee,
            args: vec![],
            state_root: service.store().inner().root(),
            claimed: CallResult::new(b"ok".to_vec(), ChangeSet::empty()),
            proof: vec![],
        };
        (service, request)
    }

    #[test]
    fn test_missing_code_cell_is_dynamic_linking() {
        let (service, request) = linked_service(blake2b(b"echo code"), None);
        let err = service.validate(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DynamicLinking);
    }

    #[test]
    fn test_present_code_cell_links() {
        let code = b"echo code".to_vec();
        let (service, request) = linked_service(blake2b(&code), Some(code));
        // Linking succeeds; the claim omits the caller nonce bump.
        let err = service.validate(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MismatchChangeSet);
    }

    #[test]
    fn test_abi_mismatch_is_dynamic_linking() {
        let store = InMemoryStateStore::new();
        let caller = store.register_account(lock_hash()).unwrap();
        let callee = store.register_account(echo_hash()).unwrap();
        let mut registry = ScriptRegistry::new();
        registry.register(echo_hash(), 2, Arc::new(EchoScript(b"ok")));
        let service = StateValidatorService::new(
            Arc::new(CountingStore::new(store)),
            registry,
            ValidatorConfig::for_testing(),
        );

        let request = ValidationRequest {
            caller_id: caller,
            callee_id: callee,
            args: vec![],
            state_root: service.store().inner().root(),
            claimed: CallResult::new(b"ok".to_vec(), ChangeSet::empty()),
            proof: vec![],
        };
        assert_eq!(
            service.validate(&request).unwrap_err().kind(),
            ErrorKind::DynamicLinking
        );
    }

    #[test]
    fn test_request_against_outdated_root() {
        let world = World::new();
        let first = world.honest_request(world.alice, world.counter, 1u64.to_le_bytes().to_vec()).unwrap();
        let second = world.honest_request(world.alice, world.counter, 2u64.to_le_bytes().to_vec()).unwrap();
        world.apply(&first).unwrap();

        let err = world.service.validate(&second).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContext);
    }
}
