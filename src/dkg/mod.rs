//! The three-round distributed key generation protocol with verifiable secret sharing,
//! encrypted pairwise share delivery, and identifiable-abort cheater detection.
//!
//! Round ordering is enforced by the type system: a [`Participant`] produces a round-1
//! broadcast, [`DistributedKeyGeneration::bootstrap`] consumes every peer's round-1 broadcast and
//! produces the round-2 ciphertexts to send out, and [`DistributedKeyGeneration::finish`]
//! consumes every ciphertext addressed to us and produces either the final key share or a set of
//! complaints with independently re-verifiable evidence.

pub mod secret_share;
pub mod zkp;

use std::collections::BTreeMap;

use ark_ec::Group;
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};
use tracing::{debug, warn};
use zeroize::Zeroize;

pub use zkp::NizkPokOfSecretKey;

use secret_share::{Coefficients, EncryptedSecretShare, VerifiableSecretSharingCommitment};

use crate::ciphersuite::CipherSuite;
use crate::keys::{
    DiffieHellmanPrivateKey, DiffieHellmanPublicKey, GroupKey, IndividualSigningKey,
    IndividualVerifyingKey,
};
use crate::parameters::ThresholdParameters;
use crate::{Error, FrostResult};

/// A participant's round-1 broadcast: their coefficient commitments, their ephemeral
/// Diffie-Hellman public key, and proofs of knowledge of both secrets.
#[derive(Clone, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct Participant<C: CipherSuite> {
    /// This participant's index, the evaluation point for their polynomial shares.
    pub index: u32,
    /// The public half of this participant's session Diffie-Hellman keypair.
    pub dh_public_key: DiffieHellmanPublicKey<C>,
    /// Pedersen commitments to the coefficients of this participant's secret polynomial.
    pub commitments: VerifiableSecretSharingCommitment<C>,
    /// Proof of knowledge of `a_{i,0}`, the constant term of the polynomial, under
    /// `commitments.public_key()`.
    pub proof_of_secret_key: NizkPokOfSecretKey<C>,
    /// Proof of knowledge of the Diffie-Hellman private key under `dh_public_key`.
    pub proof_of_dh_private_key: NizkPokOfSecretKey<C>,
}

fn coef0_context(dkg_id: &[u8], index: u32) -> Vec<u8> {
    let mut ctx = Vec::from(b"coef0".as_slice());
    ctx.extend_from_slice(dkg_id);
    ctx.extend_from_slice(&index.to_be_bytes());
    ctx
}

fn epk_context(dkg_id: &[u8], index: u32) -> Vec<u8> {
    let mut ctx = Vec::from(b"epk".as_slice());
    ctx.extend_from_slice(dkg_id);
    ctx.extend_from_slice(&index.to_be_bytes());
    ctx
}

impl<C: CipherSuite> Participant<C> {
    /// Run round 1: sample this participant's secret polynomial (fixing the constant term to
    /// `a_0` if supplied, to derive deterministic key material), generate a fresh per-session
    /// Diffie-Hellman keypair, and produce both proofs of knowledge.
    ///
    /// Returns the broadcastable [`Participant`] record, the secret [`Coefficients`] (which the
    /// caller must retain for round 2), and the session's Diffie-Hellman private key (which the
    /// caller must retain through round 3).
    pub fn new(
        parameters: &ThresholdParameters,
        dkg_id: &[u8],
        index: u32,
        a_0: Option<<C::G as Group>::ScalarField>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> FrostResult<(Self, Coefficients<C>, DiffieHellmanPrivateKey<C>)> {
        if index == 0 {
            return Err(Error::InputInvalid(
                "participant id 0 is reserved for the shared secret".into(),
            ));
        }

        let (dh_private_key, dh_public_key) = DiffieHellmanPrivateKey::generate(rng);
        let proof_of_dh_private_key =
            NizkPokOfSecretKey::prove(&dh_private_key.0, &dh_public_key.key, &epk_context(dkg_id, index), rng)?;

        let coefficients = Coefficients::sample(parameters.t() as usize, a_0, rng);
        let commitments = coefficients.commit(index);

        let proof_of_secret_key = NizkPokOfSecretKey::prove(
            &coefficients.0[0],
            commitments.public_key().expect("just committed at least one coefficient"),
            &coef0_context(dkg_id, index),
            rng,
        )?;

        debug!(participant = index, "completed DKG round 1");

        Ok((
            Participant {
                index,
                dh_public_key,
                commitments,
                proof_of_secret_key,
                proof_of_dh_private_key,
            },
            coefficients,
            dh_private_key,
        ))
    }

    /// Serialize this round-1 broadcast to bytes.
    pub fn to_bytes(&self) -> FrostResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        Ok(bytes)
    }

    /// Deserialize a round-1 broadcast from bytes.
    pub fn from_bytes(bytes: &[u8]) -> FrostResult<Self> {
        Self::deserialize_compressed(bytes).map_err(|_| Error::DeserializationError)
    }
}

/// The reason a complaint was raised against a participant in round 3.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ComplaintReason {
    /// The accused's round-2 ciphertext failed to decrypt (or never arrived).
    Decrypt,
    /// The accused's round-2 ciphertext decrypted, but the recovered share is inconsistent with
    /// their round-1 commitments.
    Share,
}

/// Publicly re-verifiable evidence that `accused` cheated in round 2, raised by `accuser`.
///
/// Per the identifiable-abort construction, the accuser reveals only their *ephemeral*
/// Diffie-Hellman secret for this session — never their long-term key or DKG share — which is
/// enough for any third party to re-derive the pairwise key, decrypt the disputed ciphertext, and
/// confirm the fault independently.
#[derive(Clone, Debug)]
pub struct Complaint<C: CipherSuite> {
    /// The participant raising the complaint.
    pub accuser: u32,
    /// The participant being accused.
    pub accused: u32,
    /// Why the complaint was raised.
    pub reason: ComplaintReason,
    /// The accuser's revealed ephemeral Diffie-Hellman private key for this session.
    pub revealed_dh_private_key: DiffieHellmanPrivateKey<C>,
    /// The accused's (public) Diffie-Hellman public key, repeated here for the verifier's
    /// convenience.
    pub accused_dh_public_key: DiffieHellmanPublicKey<C>,
    /// The disputed ciphertext.
    pub ciphertext: EncryptedSecretShare<C>,
}

impl<C: CipherSuite> Complaint<C> {
    /// Independently re-verify this complaint: re-derive the pairwise key from the revealed
    /// ephemeral secret, attempt to decrypt the disputed ciphertext, and confirm the fault the
    /// complaint claims. Returns `Ok(())` if the complaint is substantiated.
    pub fn verify(
        &self,
        dkg_id: &[u8],
        accused_commitments: &VerifiableSecretSharingCommitment<C>,
    ) -> FrostResult<()> {
        match self
            .ciphertext
            .decrypt(dkg_id, &self.revealed_dh_private_key, &self.accused_dh_public_key)
        {
            Err(_) => match self.reason {
                ComplaintReason::Decrypt => Ok(()),
                ComplaintReason::Share => {
                    Err(Error::Custom("complaint claims a share mismatch but decryption itself failed".into()))
                }
            },
            Ok(share) => match self.reason {
                ComplaintReason::Decrypt => Err(Error::Custom(
                    "complaint claims decryption failure but decryption succeeded".into(),
                )),
                ComplaintReason::Share => {
                    match accused_commitments.verify_share(self.accuser, &share) {
                        Ok(()) => Err(Error::Custom(
                            "complaint claims a share mismatch but the share is in fact valid".into(),
                        )),
                        Err(_) => Ok(()),
                    }
                }
            },
        }
    }
}

/// The terminal outcome of a DKG session.
pub enum DkgOutput<C: CipherSuite> {
    /// The session completed successfully for this participant.
    Success {
        /// This participant's long-lived secret share.
        signing_key: IndividualSigningKey<C>,
        /// The group's public key.
        group_key: GroupKey<C>,
        /// This participant's public verification share.
        verifying_key: IndividualVerifyingKey<C>,
        /// A Schnorr proof of knowledge of `signing_key` under `verifying_key`, the artifact
        /// reported to any external registry of participant key shares.
        share_proof: NizkPokOfSecretKey<C>,
    },
    /// The session halted with one or more complaints.
    Complaint(Vec<Complaint<C>>),
}

/// State retained between round 1 and round 3 of the DKG.
pub struct DistributedKeyGeneration<C: CipherSuite> {
    parameters: ThresholdParameters,
    dkg_id: Vec<u8>,
    my_index: u32,
    dh_private_key: DiffieHellmanPrivateKey<C>,
    my_coefficients: Coefficients<C>,
    their_commitments: BTreeMap<u32, VerifiableSecretSharingCommitment<C>>,
    their_dh_public_keys: BTreeMap<u32, DiffieHellmanPublicKey<C>>,
}

impl<C: CipherSuite> Drop for DistributedKeyGeneration<C> {
    fn drop(&mut self) {
        self.my_coefficients.zeroize();
    }
}

impl<C: CipherSuite> DistributedKeyGeneration<C> {
    /// The threshold parameters this session was bootstrapped with.
    pub fn parameters(&self) -> ThresholdParameters {
        self.parameters
    }

    /// Process round-1 broadcasts from every participant (this participant's own broadcast may
    /// be included or omitted; if present it is not re-verified). Verifies every peer's proofs
    /// of knowledge — since round-1 broadcasts are public, a failure here is globally
    /// attributable and aborts the whole session rather than producing a complaint.
    ///
    /// Returns the retained session state together with the round-2 ciphertexts to send, one per
    /// peer.
    pub fn bootstrap(
        parameters: ThresholdParameters,
        dkg_id: &[u8],
        my_index: u32,
        dh_private_key: DiffieHellmanPrivateKey<C>,
        my_coefficients: Coefficients<C>,
        broadcasts: &[Participant<C>],
    ) -> FrostResult<(Self, Vec<EncryptedSecretShare<C>>)> {
        let mut their_commitments = BTreeMap::new();
        let mut their_dh_public_keys = BTreeMap::new();

        for broadcast in broadcasts {
            if broadcast.index == 0 {
                return Err(Error::InputInvalid("participant id 0 is reserved".into()));
            }
            if their_commitments.contains_key(&broadcast.index) {
                // First broadcast from a sender wins; a replayed or duplicated broadcast from the
                // same sender is rejected on its own, not treated as a session-wide fault.
                warn!(
                    participant = broadcast.index,
                    "duplicate round-1 broadcast, keeping the first and rejecting the replay"
                );
                continue;
            }
            their_commitments.insert(broadcast.index, broadcast.commitments.clone());
            their_dh_public_keys.insert(broadcast.index, broadcast.dh_public_key.clone());

            if broadcast.index == my_index {
                continue;
            }

            broadcast
                .proof_of_secret_key
                .verify(
                    broadcast.commitments.public_key().ok_or(Error::InputInvalid(
                        "participant broadcast is missing its coefficient commitments".into(),
                    ))?,
                    &coef0_context(dkg_id, broadcast.index),
                )
                .map_err(|_| Error::ProofInvalid(broadcast.index))?;

            broadcast
                .proof_of_dh_private_key
                .verify(&broadcast.dh_public_key.key, &epk_context(dkg_id, broadcast.index))
                .map_err(|_| Error::ProofInvalid(broadcast.index))?;
        }

        if their_commitments.len() != parameters.n() as usize {
            return Err(Error::InputInvalid(format!(
                "expected {} round-1 broadcasts, got {}",
                parameters.n(),
                their_commitments.len()
            )));
        }
        if !their_commitments.contains_key(&my_index) {
            return Err(Error::InputInvalid(
                "this participant's own round-1 broadcast is required".into(),
            ));
        }

        let mut shares_to_send = Vec::with_capacity(parameters.n() as usize - 1);
        for (&peer_index, peer_dh_public_key) in their_dh_public_keys.iter() {
            if peer_index == my_index {
                continue;
            }
            let share = my_coefficients.evaluate(peer_index);
            shares_to_send.push(EncryptedSecretShare::encrypt(
                dkg_id,
                my_index,
                peer_index,
                &share,
                &dh_private_key,
                peer_dh_public_key,
            )?);
        }

        debug!(participant = my_index, "completed DKG round 2");

        Ok((
            DistributedKeyGeneration {
                parameters,
                dkg_id: dkg_id.to_vec(),
                my_index,
                dh_private_key,
                my_coefficients,
                their_commitments,
                their_dh_public_keys,
            },
            shares_to_send,
        ))
    }

    /// Process every round-2 ciphertext addressed to us (one per peer; our own share is computed
    /// locally rather than received). A peer whose ciphertext is missing from `received_shares`
    /// is treated identically to one whose ciphertext failed to decrypt.
    ///
    /// On success, returns this participant's long-lived key share, the group public key, this
    /// participant's verification share, and a proof of knowledge of the share — binding evidence
    /// any external registry can check. On any inconsistency, returns the full set of complaints
    /// instead, each independently re-verifiable by a third party.
    pub fn finish(
        self,
        received_shares: &[EncryptedSecretShare<C>],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> FrostResult<DkgOutput<C>> {
        let mut by_sender: BTreeMap<u32, &EncryptedSecretShare<C>> = BTreeMap::new();
        for share in received_shares {
            if share.receiver_index != self.my_index {
                continue;
            }
            by_sender.insert(share.sender_index, share);
        }

        let mut complaints = Vec::new();
        let mut total = my_own_share::<C>(&self.my_coefficients, self.my_index);

        for (&peer_index, peer_commitments) in self.their_commitments.iter() {
            if peer_index == self.my_index {
                continue;
            }

            let peer_dh_public_key = &self.their_dh_public_keys[&peer_index];

            let Some(ciphertext) = by_sender.get(&peer_index) else {
                warn!(accused = peer_index, "no round-2 share received, raising complaint");
                complaints.push(self.raise_complaint(
                    peer_index,
                    ComplaintReason::Decrypt,
                    missing_ciphertext::<C>(self.my_index, peer_index),
                ));
                continue;
            };

            match ciphertext.decrypt(&self.dkg_id, &self.dh_private_key, peer_dh_public_key) {
                Err(_) => {
                    warn!(accused = peer_index, "round-2 share failed to decrypt");
                    complaints.push(self.raise_complaint(
                        peer_index,
                        ComplaintReason::Decrypt,
                        (*ciphertext).clone(),
                    ));
                }
                Ok(share) => match peer_commitments.verify_share(self.my_index, &share) {
                    Err(_) => {
                        warn!(accused = peer_index, "round-2 share inconsistent with commitments");
                        complaints.push(self.raise_complaint(
                            peer_index,
                            ComplaintReason::Share,
                            (*ciphertext).clone(),
                        ));
                    }
                    Ok(()) => total += share,
                },
            }
        }

        if !complaints.is_empty() {
            return Ok(DkgOutput::Complaint(complaints));
        }

        let group_key = self
            .their_commitments
            .values()
            .map(|c| *c.public_key().expect("validated non-empty in bootstrap"))
            .fold(C::G::zero(), |acc, p| acc + p);

        let signing_key = IndividualSigningKey {
            index: self.my_index,
            key: total,
        };
        let verifying_key = signing_key.to_public();

        let share_proof = NizkPokOfSecretKey::prove(
            &signing_key.key,
            &verifying_key.share,
            &share_context(&self.dkg_id, self.my_index),
            rng,
        )?;

        debug!(participant = self.my_index, "completed DKG successfully");

        Ok(DkgOutput::Success {
            signing_key,
            group_key: GroupKey::new(group_key),
            verifying_key,
            share_proof,
        })
    }

    fn raise_complaint(
        &self,
        accused: u32,
        reason: ComplaintReason,
        ciphertext: EncryptedSecretShare<C>,
    ) -> Complaint<C> {
        Complaint {
            accuser: self.my_index,
            accused,
            reason,
            revealed_dh_private_key: self.dh_private_key.clone(),
            accused_dh_public_key: self.their_dh_public_keys[&accused].clone(),
            ciphertext,
        }
    }
}

fn my_own_share<C: CipherSuite>(
    my_coefficients: &Coefficients<C>,
    my_index: u32,
) -> <C::G as Group>::ScalarField {
    my_coefficients.evaluate(my_index)
}

fn missing_ciphertext<C: CipherSuite>(receiver: u32, sender: u32) -> EncryptedSecretShare<C> {
    EncryptedSecretShare {
        sender_index: sender,
        receiver_index: receiver,
        data: Vec::new(),
        _phantom: core::marker::PhantomData,
    }
}

/// The context string binding a round-3 share proof of knowledge to its DKG session and
/// participant.
pub(crate) fn share_context(dkg_id: &[u8], index: u32) -> Vec<u8> {
    let mut ctx = Vec::from(b"share".as_slice());
    ctx.extend_from_slice(dkg_id);
    ctx.extend_from_slice(&index.to_be_bytes());
    ctx
}
