//! S5: nonces are single-use — consuming the same hiding commitment twice must fail.

mod common;

use ark_ec::CurveGroup;
use ark_serialize::CanonicalSerialize;
use ice_frost_core::external::{DataManager, InMemoryDataManager};
use ice_frost_core::sign::precomputation::generate_commitment_share_lists;
use ice_frost_core::Error;
use rand::rngs::OsRng;

fn handle_of(point: &ark_secp256k1::Projective) -> Vec<u8> {
    let mut bytes = Vec::new();
    point.into_affine().serialize_compressed(&mut bytes).unwrap();
    bytes
}

#[test]
fn two_sequential_signings_succeed_a_third_reusing_d_fails() {
    let store = InMemoryDataManager::<common::Suite>::default();

    let (public, secret) = generate_commitment_share_lists::<common::Suite>(&mut OsRng, 1, 10);
    store.store_nonces(1, secret.commitments).unwrap();

    let handle_0 = handle_of(&public.commitments[0].0);
    let handle_1 = handle_of(&public.commitments[1].0);

    assert!(store.take_nonce(1, &handle_0).is_ok());
    assert!(store.take_nonce(1, &handle_1).is_ok());

    assert!(matches!(
        store.take_nonce(1, &handle_0),
        Err(Error::NonceMissing)
    ));
}
