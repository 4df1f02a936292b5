//! # Validation Flows
//!
//! Honest requests through the whole pipeline: validate, commit, and check
//! that the post-state root the validator predicted is the one the store
//! ends up with.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use qc_18_state_validator::domain::keys::value_to_u128;
    use qc_18_state_validator::prelude::*;

    fn setup() -> World {
        quantum_telemetry::init_test_logging();
        World::new()
    }

    #[test]
    fn test_post_root_equals_committed_root() {
        let world = setup();
        let request = world
            .honest_request(world.alice, world.counter, 42u64.to_le_bytes().to_vec())
            .unwrap();
        let transition = world.apply(&request).unwrap();

        assert_eq!(world.store().inner().root(), transition.post_root);
        assert_eq!(world.store().commits(), 1);
    }

    #[test]
    fn test_counter_accumulates_over_blocks() {
        let world = setup();
        let mut expected = 0u64;
        for delta in [3u64, 5, 11] {
            expected += delta;
            let request = world
                .honest_request(world.alice, world.counter, delta.to_le_bytes().to_vec())
                .unwrap();
            let transition = world.apply(&request).unwrap();
            assert_eq!(transition.call_result.return_data, expected.to_le_bytes().to_vec());
        }
        assert_eq!(world.store().commits(), 3);
    }

    #[test]
    fn test_sudt_transfer_then_query() {
        let world = setup();
        let transfer = world
            .honest_request(world.alice, world.token, SudtScript::transfer_args(world.bob, 250))
            .unwrap();
        world.apply(&transfer).unwrap();

        let query = world
            .honest_request(world.bob, world.token, SudtScript::query_args(world.alice))
            .unwrap();
        let transition = world.apply(&query).unwrap();
        let balance: [u8; 16] = transition.call_result.return_data.as_slice().try_into().unwrap();
        assert_eq!(u128::from_le_bytes(balance), ALICE_BALANCE - 250);

        let accounts = AccountStore::new(world.store().snapshot());
        let bob_balance = accounts
            .get_storage(world.token, &SudtScript::balance_key(world.bob))
            .unwrap();
        assert_eq!(value_to_u128(&bob_balance), 250);
    }

    #[test]
    fn test_account_created_through_meta_contract() {
        let world = setup();
        let create = world
            .honest_request(world.bob, world.meta, MetaContractScript::create_account_args(&sum_hash()))
            .unwrap();
        let transition = world.apply(&create).unwrap();
        let id: [u8; 4] = transition.call_result.return_data.as_slice().try_into().unwrap();
        let created = AccountId(u32::from_le_bytes(id));
        assert_eq!(created, AccountId(world.meta.0 + 1));
        assert_eq!(world.store().inner().root(), transition.post_root);

        let accounts = AccountStore::new(world.store().snapshot());
        assert_eq!(accounts.get_account(created).unwrap().script_code_hash, sum_hash());
        assert_eq!(accounts.account_count().unwrap(), created.0 + 1);

        let call = world
            .honest_request(world.alice, created, 4u64.to_le_bytes().to_vec())
            .unwrap();
        let transition = world.apply(&call).unwrap();
        assert_eq!(transition.call_result.return_data, 4u64.to_le_bytes().to_vec());
    }

    #[test]
    fn test_meta_claim_with_wrong_id_is_rejected() {
        let world = setup();
        let mut create = world
            .honest_request(world.bob, world.meta, MetaContractScript::create_account_args(&sum_hash()))
            .unwrap();
        create.claimed.return_data = 99u32.to_le_bytes().to_vec();
        let err = world.service.validate(&create).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MismatchReturnData);
        assert_eq!(world.store().commits(), 0);
    }

    #[test]
    fn test_overdraft_is_rejected_for_claim_and_execution() {
        let world = setup();
        let err = world
            .honest_request(world.bob, world.token, SudtScript::transfer_args(world.alice, 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);

        let request = world.bare_request(world.bob, world.token, SudtScript::transfer_args(world.alice, 1));
        let err = world.service.validate(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_nonce_bump_requires_proof() {
        let world = setup();
        let mut request = world
            .honest_request(world.alice, world.token, SudtScript::query_args(world.alice))
            .unwrap();
        // The caller nonce still moves, so a proof is required.
        assert_eq!(request.claimed.change_set.len(), 1);
        request.proof.clear();
        assert_eq!(
            world.service.validate(&request).unwrap_err().kind(),
            ErrorKind::InvalidProofLength
        );
    }

    #[test]
    fn test_encoded_round_trip_through_service() {
        let world = setup();
        let request = world
            .honest_request(world.alice, world.counter, 8u64.to_le_bytes().to_vec())
            .unwrap();
        let bytes = request.encode().unwrap();
        let transition = world.service.validate_encoded(&bytes).unwrap();
        assert_eq!(transition.call_result, request.claimed);
        assert_eq!(format!("{}", transition.prev_root), format!("0x{}", hex::encode(request.state_root.as_bytes())));
    }

    #[test]
    fn test_concurrent_validation_shares_service() {
        let world = setup();
        let requests: Vec<ValidationRequest> = (1u64..=8)
            .map(|delta| {
                world
                    .honest_request(world.alice, world.counter, delta.to_le_bytes().to_vec())
                    .unwrap()
            })
            .collect();

        std::thread::scope(|scope| {
            for request in &requests {
                let service = &world.service;
                scope.spawn(move || {
                    service.validate(request).unwrap();
                });
            }
        });

        let stats = world.service.stats();
        assert_eq!(stats.validated, 8);
        assert_eq!(stats.rejected, 0);
        assert_eq!(world.store().commits(), 0);
    }

    #[test]
    fn test_stats_track_rejections_by_kind() {
        let world = setup();
        let bad = world.bare_request(world.alice, world.counter, vec![0; 2]);
        for _ in 0..3 {
            let _ = world.service.validate(&bad);
        }
        let stats = world.service.stats();
        assert_eq!(stats.rejected, 3);
        assert_eq!(stats.rejected_with(ErrorKind::UnknownArgs), 3);
    }
}
