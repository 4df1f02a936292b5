//! # Proof Properties
//!
//! Randomised checks of the compiled proof format and replay rules against
//! trees built by `SparseMerkleTree`.

#[cfg(test)]
mod tests {
    use crate::fixtures::random_leaves;
    use proptest::prelude::*;
    use qc_18_state_validator::prelude::*;
    use qc_18_state_validator::smt::ProofOp;

    fn verifier() -> MerkleProofVerifier {
        MerkleProofVerifier::new(&ValidatorConfig::for_testing())
    }

    /// A tree and a subset of keys to prove, some of them absent.
    fn tree_and_claims() -> impl Strategy<Value = (SparseMerkleTree, Vec<(H256, H256)>)> {
        (any::<u64>(), 1usize..64, 1usize..16, 0usize..4).prop_map(
            |(seed, size, proven, absent)| {
                let leaves = random_leaves(seed, size);
                let tree = SparseMerkleTree::from_leaves(leaves.clone());
                let mut claims: Vec<(H256, H256)> =
                    leaves.iter().take(proven).copied().collect();
                claims.extend(
                    random_leaves(seed.wrapping_add(1), absent)
                        .into_iter()
                        .map(|(k, _)| (k, H256::zero())),
                );
                (tree, claims)
            },
        )
    }

    fn proof_for(tree: &SparseMerkleTree, claims: &[(H256, H256)]) -> CompiledProof {
        let keys: Vec<H256> = claims.iter().map(|(k, _)| *k).collect();
        tree.merkle_proof(&keys)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_generated_proofs_verify((tree, claims) in tree_and_claims()) {
            let proof = proof_for(&tree, &claims).encode();
            prop_assert!(verifier().verify(&tree.root(), &claims, &proof).is_ok());
        }

        #[test]
        fn prop_claim_order_is_irrelevant((tree, claims) in tree_and_claims()) {
            let proof = proof_for(&tree, &claims).encode();
            let mut reversed = claims.clone();
            reversed.reverse();
            prop_assert_eq!(
                verifier().compute_root(&claims, &proof),
                verifier().compute_root(&reversed, &proof)
            );
        }

        #[test]
        fn prop_sibling_bit_flip_is_invalid_proof(
            (tree, claims) in tree_and_claims(),
            bit in 0u8..=255,
        ) {
            let proof = proof_for(&tree, &claims);
            let position = proof.ops().iter().position(|op| matches!(op, ProofOp::Proof { .. }));
            prop_assume!(position.is_some());

            let mut ops = proof.ops().to_vec();
            if let Some(ProofOp::Proof { sibling, .. }) = position.and_then(|i| ops.get_mut(i)) {
                let mut bytes = sibling.to_bytes();
                bytes[usize::from(bit / 8)] ^= 1 << (bit % 8);
                *sibling = H256::new(bytes);
            }
            let tampered = CompiledProof::new(ops).encode();
            prop_assert!(matches!(
                verifier().verify(&tree.root(), &claims, &tampered),
                Err(ProofError::InvalidProof(_))
            ));
        }

        #[test]
        fn prop_short_declared_length_is_rejected((tree, claims) in tree_and_claims()) {
            let proof = proof_for(&tree, &claims);
            let declared = proof.len() as u32 - 1;
            let bytes = proof.encode_with_declared_len(declared);
            let rejected = matches!(
                verifier().verify(&tree.root(), &claims, &bytes),
                Err(ProofError::InvalidProofLength { .. })
            );
            prop_assert!(rejected);
        }

        #[test]
        fn prop_verification_is_idempotent((tree, claims) in tree_and_claims()) {
            let proof = proof_for(&tree, &claims).encode();
            let v = verifier();
            let first = v.compute_root(&claims, &proof);
            prop_assert_eq!(first.clone(), v.compute_root(&claims, &proof));
            prop_assert_eq!(first, Ok(tree.root()));
        }

        #[test]
        fn prop_post_root_matches_updated_tree(
            (tree, claims) in tree_and_claims(),
            salt in any::<u8>(),
        ) {
            let proof = proof_for(&tree, &claims).encode();
            let updated_claims: Vec<(H256, H256)> = claims
                .iter()
                .map(|(k, v)| {
                    let mut data = v.to_bytes().to_vec();
                    data.push(salt);
                    (*k, blake2b(&data))
                })
                .collect();
            let mut updated = tree.clone();
            for (k, v) in &updated_claims {
                updated.update(*k, *v);
            }
            prop_assert_eq!(verifier().compute_root(&updated_claims, &proof), Ok(updated.root()));
        }
    }

    #[test]
    fn test_duplicate_change_set_keys_rejected() {
        let key = blake2b(b"slot");
        let result = ChangeSet::new(vec![
            ChangeEntry::new(key, H256::zero(), blake2b(b"a")),
            ChangeEntry::new(key, H256::zero(), blake2b(b"b")),
        ]);
        assert!(matches!(result, Err(ValidationError::InvalidData(_))));
    }
}
