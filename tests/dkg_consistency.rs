//! S1: DKG consistency — any threshold-size subset of verification shares reconstructs the group
//! key in the exponent, without the core ever exposing a secret share.

mod common;

use ark_ec::{CurveGroup, Group};
use ark_ff::Zero;
use ice_frost_core::keys::lagrange_coefficient;

#[test]
fn pinned_constant_term_yields_generator_group_key() {
    let ids = [1u32, 2, 3];
    let constants = [
        Some(ark_secp256k1::Fr::from(1u64)),
        Some(ark_secp256k1::Fr::from(0u64)),
        Some(ark_secp256k1::Fr::from(0u64)),
    ];
    let dkg = common::run_dkg_with_constants(2, &ids, &constants);

    assert_eq!(
        dkg.group_key.into_affine(),
        ark_secp256k1::Projective::generator().into_affine()
    );
}

#[test]
fn any_threshold_subset_reconstructs_the_group_key() {
    let ids = [1u32, 2, 3];
    let dkg = common::run_dkg(2, &ids, None);

    for subset in [[1u32, 2], [1, 3], [2, 3]] {
        let reconstructed = subset.iter().fold(
            ark_secp256k1::Projective::zero(),
            |acc, id| {
                let lambda = lagrange_coefficient::<common::Suite>(*id, &subset).unwrap();
                acc + dkg.verifying_keys[id].share * lambda
            },
        );

        assert_eq!(
            reconstructed.into_affine(),
            dkg.group_key.into_affine(),
            "subset {subset:?} failed to reconstruct the group key"
        );
    }
}

#[test]
fn each_share_is_consistent_with_its_own_verifying_key() {
    let ids = [1u32, 2, 3, 4, 5];
    let dkg = common::run_dkg(3, &ids, None);

    for &id in &ids {
        let expected = dkg.signing_keys[&id].to_public();
        assert_eq!(expected, dkg.verifying_keys[&id]);
    }
}
