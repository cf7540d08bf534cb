//! Shared scaffolding for the threshold-property scenarios in `tests/`.
#![allow(dead_code)]

use std::collections::BTreeMap;

use ice_frost_core::ciphersuite::Secp256k1Sha256;
use ice_frost_core::dkg::{DistributedKeyGeneration, DkgOutput, Participant};
use ice_frost_core::dkg::secret_share::EncryptedSecretShare;
use ice_frost_core::keys::{GroupKey, IndividualSigningKey, IndividualVerifyingKey};
use ice_frost_core::parameters::ThresholdParameters;
use rand::rngs::OsRng;

pub type Suite = Secp256k1Sha256;

#[allow(dead_code)]
pub struct DkgResult {
    pub group_key: GroupKey<Suite>,
    pub signing_keys: BTreeMap<u32, IndividualSigningKey<Suite>>,
    pub verifying_keys: BTreeMap<u32, IndividualVerifyingKey<Suite>>,
}

/// Run a complete, honest three-round DKG for `ids` with threshold `t`.
pub fn run_dkg(t: u32, ids: &[u32], a_0: Option<ark_secp256k1::Fr>) -> DkgResult {
    run_dkg_with_constants(t, ids, &vec![a_0; ids.len()])
}

/// Run a complete, honest three-round DKG for `ids` with threshold `t`, fixing each
/// participant's own constant term `a_{i,0}` per `constants[i]` (the group secret is the sum of
/// all `a_{i,0}`, so pinning a single participant's term and zeroing the rest is the way to pin
/// the overall group secret to a known value).
pub fn run_dkg_with_constants(
    t: u32,
    ids: &[u32],
    constants: &[Option<ark_secp256k1::Fr>],
) -> DkgResult {
    let params = ThresholdParameters::new(ids.len() as u32, t).unwrap();
    let dkg_id = b"integration-test-session";

    let mut broadcasts = Vec::new();
    let mut coefficients = Vec::new();
    let mut dh_keys = Vec::new();
    for (&id, &a_0) in ids.iter().zip(constants) {
        let (p, c, dh) =
            Participant::<Suite>::new(&params, dkg_id, id, a_0, &mut OsRng).unwrap();
        broadcasts.push(p);
        coefficients.push(c);
        dh_keys.push(dh);
    }

    let mut outgoing: Vec<Vec<EncryptedSecretShare<Suite>>> = Vec::new();
    let mut states = Vec::new();
    for i in 0..ids.len() {
        let (dkg, shares) = DistributedKeyGeneration::bootstrap(
            params,
            dkg_id,
            ids[i],
            dh_keys[i].clone(),
            coefficients[i].clone(),
            &broadcasts,
        )
        .unwrap();
        states.push(dkg);
        outgoing.push(shares);
    }

    let mut group_key = None;
    let mut signing_keys = BTreeMap::new();
    let mut verifying_keys = BTreeMap::new();
    for (i, dkg) in states.into_iter().enumerate() {
        let my_index = ids[i];
        let incoming: Vec<_> = outgoing
            .iter()
            .flat_map(|batch| batch.iter().filter(|s| s.receiver_index == my_index).cloned())
            .collect();
        match dkg.finish(&incoming, &mut OsRng).unwrap() {
            DkgOutput::Success {
                signing_key,
                group_key: gk,
                verifying_key,
                ..
            } => {
                group_key = Some(gk);
                verifying_keys.insert(my_index, verifying_key);
                signing_keys.insert(my_index, signing_key);
            }
            DkgOutput::Complaint(complaints) => {
                panic!("unexpected complaint(s) in an honest DKG run: {complaints:?}")
            }
        }
    }

    DkgResult {
        group_key: group_key.unwrap(),
        signing_keys,
        verifying_keys,
    }
}
