//! S4: a participant who sends a round-2 share inconsistent with their round-1 commitments is
//! identified by round 3, with evidence any third party can independently re-verify.

use ark_ff::UniformRand;
use ice_frost_core::ciphersuite::Secp256k1Sha256;
use ice_frost_core::dkg::secret_share::EncryptedSecretShare;
use ice_frost_core::dkg::{ComplaintReason, DistributedKeyGeneration, DkgOutput, Participant};
use ice_frost_core::parameters::ThresholdParameters;
use rand::rngs::OsRng;

#[test]
fn cheating_sender_is_identified_with_reverifiable_evidence() {
    let params = ThresholdParameters::new(5, 3).unwrap();
    let dkg_id = b"cheater-test-session";
    let ids = [1u32, 2, 3, 4, 5];

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

    let mut outgoing: Vec<Vec<EncryptedSecretShare<Secp256k1Sha256>>> = Vec::new();
    let mut states = Vec::new();
    for i in 0..ids.len() {
        let (dkg, mut shares) = DistributedKeyGeneration::bootstrap(
            params,
            dkg_id,
            ids[i],
            dh_keys[i].clone(),
            coefficients[i].clone(),
            &broadcasts,
        )
        .unwrap();

        // Participant 3 (index 2 in these vectors) corrupts the share addressed to participant 1
        // with a random scalar rather than f_3(1).
        if ids[i] == 3 {
            let bogus = ark_secp256k1::Fr::rand(&mut OsRng);
            for share in shares.iter_mut() {
                if share.receiver_index == 1 {
                    *share = EncryptedSecretShare::encrypt(
                        dkg_id,
                        3,
                        1,
                        &bogus,
                        &dh_keys[i],
                        &broadcasts
                            .iter()
                            .find(|p| p.index == 1)
                            .unwrap()
                            .dh_public_key,
                    )
                    .unwrap();
                }
            }
        }

        states.push(dkg);
        outgoing.push(shares);
    }

    let accused_commitments = broadcasts
        .iter()
        .find(|p| p.index == 3)
        .unwrap()
        .commitments
        .clone();

    for (i, dkg) in states.into_iter().enumerate() {
        let my_index = ids[i];
        let incoming: Vec<_> = outgoing
            .iter()
            .flat_map(|batch| batch.iter().filter(|s| s.receiver_index == my_index).cloned())
            .collect();

        let outcome = dkg.finish(&incoming, &mut OsRng).unwrap();

        if my_index == 1 {
            match outcome {
                DkgOutput::Complaint(complaints) => {
                    assert_eq!(complaints.len(), 1);
                    let complaint = &complaints[0];
                    assert_eq!(complaint.accuser, 1);
                    assert_eq!(complaint.accused, 3);
                    assert_eq!(complaint.reason, ComplaintReason::Share);

                    // Any third party can independently re-verify the complaint from public
                    // information plus the accuser's revealed ephemeral DH secret.
                    assert!(complaint.verify(dkg_id, &accused_commitments).is_ok());
                }
                DkgOutput::Success { .. } => panic!("expected participant 1 to raise a complaint"),
            }
        }
    }
}
