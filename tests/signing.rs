//! S2, S3, S6: signature correctness, tamper detection, and non-determinism across disjoint
//! signer subsets.

mod common;

use std::collections::BTreeMap;

use ice_frost_core::sign::precomputation::{generate_commitment_share_lists, CommitmentShare};
use ice_frost_core::sign::{sign_single, Aggregator, CommitmentSet, SigningCommitment};
use ice_frost_core::Error;
use rand::rngs::OsRng;

fn commit_and_sign(
    message: &[u8],
    signer_ids: &[u32],
    dkg: &common::DkgResult,
) -> (
    CommitmentSet<common::Suite>,
    Vec<ice_frost_core::sign::PartialThresholdSignature<common::Suite>>,
) {
    let mut entries = Vec::new();
    let mut nonces: BTreeMap<u32, CommitmentShare<common::Suite>> = BTreeMap::new();
    for &id in signer_ids {
        let (public, mut secret) =
            generate_commitment_share_lists::<common::Suite>(&mut OsRng, id, 1);
        entries.push(SigningCommitment {
            participant_index: id,
            hiding: public.commitments[0].0,
            binding: public.commitments[0].1,
        });
        nonces.insert(id, secret.commitments.remove(0));
    }
    let commitments = CommitmentSet::new(entries).unwrap();

    let partials = signer_ids
        .iter()
        .map(|id| {
            let signing_key = &dkg.signing_keys[id];
            let verifying_key = signing_key.to_public();
            let nonce = nonces.remove(id).unwrap();
            sign_single(
                message,
                &commitments,
                nonce,
                signing_key,
                &verifying_key,
                &dkg.group_key,
            )
            .unwrap()
        })
        .collect();

    (commitments, partials)
}

#[test]
fn aggregated_signature_verifies_and_rejects_tampered_message() {
    let ids = [1u32, 2, 3];
    let dkg = common::run_dkg(2, &ids, None);

    let message = b"hello".to_vec();
    let (commitments, partials) = commit_and_sign(&message, &[1, 2], &dkg);

    let aggregator = Aggregator::new(message.clone(), commitments, dkg.group_key);
    let signature = aggregator.aggregate(&partials).unwrap();

    assert!(signature.verify(&message, &dkg.group_key).is_ok());
    assert!(signature.verify(b"hellO", &dkg.group_key).is_err());
}

#[test]
fn tampered_partial_is_attributed_to_its_signer() {
    let ids = [1u32, 2, 3];
    let dkg = common::run_dkg(2, &ids, None);

    let message = b"hello".to_vec();
    let (commitments, mut partials) = commit_and_sign(&message, &[1, 2], &dkg);

    partials[1].z += <ark_secp256k1::Fr as ark_ff::One>::one();

    let aggregator = Aggregator::new(message, commitments, dkg.group_key);
    match aggregator.aggregate(&partials) {
        Err(Error::PartialInvalid(id)) => assert_eq!(id, 2),
        other => panic!("expected PartialInvalid(2), got {other:?}"),
    }
}

#[test]
fn disjoint_signer_subsets_both_produce_valid_but_distinct_signatures() {
    let ids: Vec<u32> = (1..=10).collect();
    let dkg = common::run_dkg(7, &ids, None);

    let message = b"threshold quorum message".to_vec();

    let subset_a: Vec<u32> = (1..=7).collect();
    let subset_b: Vec<u32> = (4..=10).collect();

    let (commitments_a, partials_a) = commit_and_sign(&message, &subset_a, &dkg);
    let (commitments_b, partials_b) = commit_and_sign(&message, &subset_b, &dkg);

    let signature_a = Aggregator::new(message.clone(), commitments_a, dkg.group_key)
        .aggregate(&partials_a)
        .unwrap();
    let signature_b = Aggregator::new(message.clone(), commitments_b, dkg.group_key)
        .aggregate(&partials_b)
        .unwrap();

    assert!(signature_a.verify(&message, &dkg.group_key).is_ok());
    assert!(signature_b.verify(&message, &dkg.group_key).is_ok());
    assert_ne!(signature_a, signature_b);
}
