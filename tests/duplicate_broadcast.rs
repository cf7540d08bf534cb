//! A replayed or duplicated round-1 broadcast from a single sender must not halt the session for
//! everyone: the first broadcast received wins and the replay is rejected on its own.

use ice_frost_core::ciphersuite::Secp256k1Sha256;
use ice_frost_core::dkg::{DistributedKeyGeneration, Participant};
use ice_frost_core::parameters::ThresholdParameters;
use rand::rngs::OsRng;

#[test]
fn duplicate_round1_broadcast_from_one_sender_does_not_abort_the_session() {
    let params = ThresholdParameters::new(3, 2).unwrap();
    let dkg_id = b"duplicate-broadcast-test-session";
    let ids = [1u32, 2, 3];

    let mut broadcasts = Vec::new();
    let mut coefficients = Vec::new();
    let mut dh_keys = Vec::new();
    for &id in &ids {
        let (p, c, dh) =
            Participant::<Secp256k1Sha256>::new(&params, dkg_id, id, None, &mut OsRng).unwrap();
        broadcasts.push(p);
        coefficients.push(c);
        dh_keys.push(dh);
    }

    // Participant 2's broadcast is replayed (appended a second time), as a network replay might
    // deliver it twice.
    let mut delivered = broadcasts.clone();
    delivered.push(broadcasts[1].clone());

    let result = DistributedKeyGeneration::bootstrap(
        params,
        dkg_id,
        ids[0],
        dh_keys[0].clone(),
        coefficients[0].clone(),
        &delivered,
    );

    assert!(
        result.is_ok(),
        "a duplicated round-1 broadcast from one sender must not abort the whole session"
    );
}
