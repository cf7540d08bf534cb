//! Single-signer partial signature generation and verification, and aggregation of the final
//! group Schnorr signature.

pub mod precomputation;

use std::collections::BTreeMap;

use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use tracing::{debug, warn};

use crate::ciphersuite::CipherSuite;
use crate::keys::{lagrange_coefficient, GroupKey, IndividualSigningKey, IndividualVerifyingKey};
use crate::utils::{encode_point, encode_scalar, hash_to_scalar};
use crate::{Error, FrostResult};

use precomputation::CommitmentShare;

/// One signer's published nonce commitments `(id_j, D_j, E_j)`, an entry of the commitment set
/// `B`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SigningCommitment<C: CipherSuite> {
    /// The signer's participant index.
    pub participant_index: u32,
    /// The signer's hiding commitment `D_j`.
    pub hiding: C::G,
    /// The signer's binding commitment `E_j`.
    pub binding: C::G,
}

/// The ordered commitment set `B` for one signing event: every participating signer's published
/// nonce commitments, sorted by participant index ascending. This ordering is canonical and MUST
/// be reproduced identically by every signer and by the aggregator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommitmentSet<C: CipherSuite>(Vec<SigningCommitment<C>>);

impl<C: CipherSuite> CommitmentSet<C> {
    /// Build the canonical commitment set from an arbitrary-order list of entries, rejecting
    /// duplicate participant ids.
    pub fn new(mut entries: Vec<SigningCommitment<C>>) -> FrostResult<Self> {
        entries.sort_by_key(|e| e.participant_index);
        for window in entries.windows(2) {
            if window[0].participant_index == window[1].participant_index {
                return Err(Error::BadCommitments);
            }
        }
        Ok(CommitmentSet(entries))
    }

    /// The signer ids in this commitment set, in canonical order.
    pub fn signer_ids(&self) -> Vec<u32> {
        self.0.iter().map(|e| e.participant_index).collect()
    }

    fn entry(&self, participant_index: u32) -> Option<&SigningCommitment<C>> {
        self.0.iter().find(|e| e.participant_index == participant_index)
    }

    /// Canonically encode this commitment set: ids ascending, each entry serialized as
    /// `id || compress(D) || compress(E)`. All signers and the aggregator must reproduce this
    /// encoding bit-for-bit.
    pub fn canonical_encode(&self) -> FrostResult<Vec<u8>> {
        let mut bytes = Vec::new();
        for entry in &self.0 {
            bytes.extend_from_slice(&entry.participant_index.to_be_bytes());
            bytes.extend_from_slice(&encode_point::<C>(&entry.hiding)?);
            bytes.extend_from_slice(&encode_point::<C>(&entry.binding)?);
        }
        Ok(bytes)
    }
}

/// `rho_k = H_s("rho", id_k, m, canonical_encode(B))`, binding signer `k`'s binding commitment to
/// this signing event.
fn binding_factor<C: CipherSuite>(
    participant_index: u32,
    message: &[u8],
    encoded_b: &[u8],
) -> <C::G as Group>::ScalarField {
    hash_to_scalar::<C>(
        b"rho",
        &[&participant_index.to_be_bytes(), message, encoded_b],
    )
}

/// `c = H_s("challenge", R, Y, m)`, the Schnorr challenge shared by every signer and the group
/// verifier.
fn challenge<C: CipherSuite>(
    group_commitment: &C::G,
    group_key: &GroupKey<C>,
    message: &[u8],
) -> FrostResult<<C::G as Group>::ScalarField> {
    let r_bytes = encode_point::<C>(group_commitment)?;
    let y_bytes = encode_point::<C>(&group_key.key)?;
    Ok(hash_to_scalar::<C>(
        b"challenge",
        &[&r_bytes, &y_bytes, message],
    ))
}

/// `R = sum_{k in S} (D_k + rho_k * E_k)`, the aggregate nonce commitment for this signing event.
fn aggregate_nonce<C: CipherSuite>(
    commitments: &CommitmentSet<C>,
    message: &[u8],
) -> FrostResult<C::G> {
    let encoded_b = commitments.canonical_encode()?;
    let mut r = C::G::zero();
    for entry in &commitments.0 {
        let rho = binding_factor::<C>(entry.participant_index, message, &encoded_b);
        r += entry.hiding + entry.binding * rho;
    }
    Ok(r)
}

/// One signer's contribution to the aggregated signature.
#[derive(Clone, Copy, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct PartialThresholdSignature<C: CipherSuite> {
    /// The signing participant's index.
    pub participant_index: u32,
    /// `z_j = d_j + e_j * rho_j + lambda_j * share_j * c`.
    pub z: <C::G as Group>::ScalarField,
    /// This signer's public verification share `Y_j`, carried alongside `z_j` so that
    /// verification is self-contained given only `(B, m, Y)`.
    pub verifying_share: C::G,
    /// The aggregate nonce commitment `R` this partial signature was computed against.
    pub group_commitment: C::G,
}

/// Produce a partial signature over `message`, given the published commitment set `B`
/// (including this signer's own published commitment), this signer's still-private nonce pair,
/// their long-lived key share, and the group public key.
///
/// Consumes `my_nonce`: the caller MUST ensure both halves of the nonce pair are deleted from
/// storage after this call, regardless of whether it succeeds (nonces are single-use on
/// *attempt*, not only on success).
pub fn sign_single<C: CipherSuite>(
    message: &[u8],
    commitments: &CommitmentSet<C>,
    my_nonce: CommitmentShare<C>,
    signing_key: &IndividualSigningKey<C>,
    verifying_key: &IndividualVerifyingKey<C>,
    group_key: &GroupKey<C>,
) -> FrostResult<PartialThresholdSignature<C>> {
    let my_index = signing_key.index;

    if commitments.entry(my_index).is_none() {
        return Err(Error::UnknownCommitment);
    }

    let signer_ids = commitments.signer_ids();
    let r = aggregate_nonce(commitments, message)?;
    if r.is_zero() {
        return Err(Error::BadCommitments);
    }

    let c = challenge::<C>(&r, group_key, message)?;
    let lambda = lagrange_coefficient::<C>(my_index, &signer_ids)?;

    let encoded_b = commitments.canonical_encode()?;
    let rho_self = binding_factor::<C>(my_index, message, &encoded_b);

    let z = my_nonce.hiding.secret + my_nonce.binding.secret * rho_self + lambda * signing_key.key * c;

    debug!(participant = my_index, "produced partial signature");

    Ok(PartialThresholdSignature {
        participant_index: my_index,
        z,
        verifying_share: verifying_key.share,
        group_commitment: r,
    })
}

/// Verify a partial signature in isolation: `z_j * G == (D_j + rho_j * E_j) + lambda_j * c * Y_j`.
pub fn verify_partial<C: CipherSuite>(
    partial: &PartialThresholdSignature<C>,
    commitments: &CommitmentSet<C>,
    message: &[u8],
    group_key: &GroupKey<C>,
) -> FrostResult<()> {
    let entry = commitments
        .entry(partial.participant_index)
        .ok_or(Error::UnknownCommitment)?;

    let signer_ids = commitments.signer_ids();
    let encoded_b = commitments.canonical_encode()?;
    let rho = binding_factor::<C>(partial.participant_index, message, &encoded_b);
    let c = challenge::<C>(&partial.group_commitment, group_key, message)?;
    let lambda = lagrange_coefficient::<C>(partial.participant_index, &signer_ids)?;

    let lhs = C::G::generator() * partial.z;
    let rhs = entry.hiding + entry.binding * rho + partial.verifying_share * (lambda * c);

    if lhs.into_affine() == rhs.into_affine() {
        Ok(())
    } else {
        Err(Error::PartialInvalid(partial.participant_index))
    }
}

/// The final aggregated Schnorr signature `(R, z)`, verifiable under the group public key alone.
#[derive(Clone, Copy, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct ThresholdSignature<C: CipherSuite> {
    /// The aggregate nonce commitment.
    pub group_commitment: C::G,
    /// The aggregate response scalar.
    pub z: <C::G as Group>::ScalarField,
}

impl<C: CipherSuite> ThresholdSignature<C> {
    /// Stateless verification of the final aggregated signature: `z*G == R + H_s(R,Y,m)*Y`. No
    /// DKG-session context is required beyond the group public key.
    pub fn verify(&self, message: &[u8], group_key: &GroupKey<C>) -> FrostResult<()> {
        let c = challenge::<C>(&self.group_commitment, group_key, message)?;
        let lhs = C::G::generator() * self.z;
        let rhs = self.group_commitment + group_key.key * c;

        if lhs.into_affine() == rhs.into_affine() {
            Ok(())
        } else {
            Err(Error::Custom("aggregated signature failed to verify".into()))
        }
    }

    /// Serialize this signature to bytes.
    pub fn to_bytes(&self) -> FrostResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        Ok(bytes)
    }

    /// Deserialize a signature from bytes.
    pub fn from_bytes(bytes: &[u8]) -> FrostResult<Self> {
        Self::deserialize_compressed(bytes).map_err(|_| Error::DeserializationError)
    }

    /// Produce the EVM-style verifier artifact named in the wire contract: this crate has no
    /// opinion on that encoding's consumer, but must be able to produce it. `public_key` is the
    /// group public key `Y`'s affine coordinates; `nonce` is the address form of the aggregate
    /// nonce commitment `R` (the low 20 bytes of its hashed encoding), matching the
    /// `signingPubKeyX + pubKeyYParity + R-address` shape an EVM SchnorrSECP256K1 verifier needs.
    pub fn to_verifier_artifact(
        &self,
        message: &[u8],
        group_key: &GroupKey<C>,
    ) -> FrostResult<SignatureArtifact> {
        let (pub_x, pub_y) = affine_xy_bytes::<C>(&group_key.key)?;
        let public_key_y_parity = pub_y.first().map(|b| b & 1 == 1).unwrap_or(false);

        let r_bytes = encode_point::<C>(&self.group_commitment)?;
        let mut hasher = <C::Hasher as digest::Digest>::new();
        digest::Digest::update(&mut hasher, &r_bytes);
        let r_hash = digest::Digest::finalize(hasher);
        let nonce = r_hash[r_hash.len().saturating_sub(20)..].to_vec();

        let mut hasher = <C::Hasher as digest::Digest>::new();
        digest::Digest::update(&mut hasher, message);
        let message_hash = digest::Digest::finalize(hasher).to_vec();

        Ok(SignatureArtifact {
            nonce,
            public_key_x: pub_x,
            public_key_y_parity,
            signature: encode_scalar::<C>(&self.z)?,
            message_hash,
        })
    }
}

/// The affine `(x, y)` coordinate byte encodings of a curve point.
fn affine_xy_bytes<C: CipherSuite>(point: &C::G) -> FrostResult<(Vec<u8>, Vec<u8>)> {
    let affine = point.into_affine();
    let (x, y) = affine.xy().ok_or(Error::BadCommitments)?;

    let mut x_bytes = Vec::new();
    x.serialize_compressed(&mut x_bytes)
        .map_err(|_| Error::SerializationError)?;

    let mut y_bytes = Vec::new();
    y.serialize_compressed(&mut y_bytes)
        .map_err(|_| Error::SerializationError)?;

    Ok((x_bytes, y_bytes))
}

/// The public signature artifact named in the wire contract (§6), suitable for an EVM-style
/// verifier. The core never depends on this encoding internally.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureArtifact {
    /// The address form of the aggregate nonce commitment `R`.
    pub nonce: Vec<u8>,
    /// The group public key `Y`'s x-coordinate.
    pub public_key_x: Vec<u8>,
    /// The group public key `Y`'s y-coordinate parity.
    pub public_key_y_parity: bool,
    /// The aggregate response scalar, canonically encoded.
    pub signature: Vec<u8>,
    /// The signed message's digest.
    pub message_hash: Vec<u8>,
}

/// Combines partial signatures collected from a signer subset into a final group signature.
pub struct Aggregator<C: CipherSuite> {
    message: Vec<u8>,
    commitments: CommitmentSet<C>,
    group_key: GroupKey<C>,
}

impl<C: CipherSuite> Aggregator<C> {
    /// Construct an aggregator for one signing event: the message, the commitment set `B` used
    /// by every signer, and the group public key.
    pub fn new(message: Vec<u8>, commitments: CommitmentSet<C>, group_key: GroupKey<C>) -> Self {
        Aggregator {
            message,
            commitments,
            group_key,
        }
    }

    /// Aggregate partial signatures, failing fast on the first inconsistency: partials must all
    /// agree on `R` ([`Error::InconsistentAggregate`]), and each must verify individually
    /// ([`Error::PartialInvalid`]).
    pub fn aggregate(&self, partials: &[PartialThresholdSignature<C>]) -> FrostResult<ThresholdSignature<C>> {
        let r = partials
            .first()
            .map(|p| p.group_commitment)
            .ok_or(Error::BadCommitments)?;

        for partial in partials {
            if partial.group_commitment.into_affine() != r.into_affine() {
                warn!("partial signatures disagree on the aggregate nonce R");
                return Err(Error::InconsistentAggregate);
            }
            verify_partial(partial, &self.commitments, &self.message, &self.group_key)?;
        }

        let z = partials
            .iter()
            .fold(<C::G as Group>::ScalarField::zero(), |acc, p| acc + p.z);

        debug!(signers = partials.len(), "aggregated threshold signature");

        Ok(ThresholdSignature {
            group_commitment: r,
            z,
        })
    }

    /// Verify every partial without short-circuiting on the first failure, returning the full
    /// set of misbehaving signer ids. Additive to [`Aggregator::aggregate`]'s fail-fast contract;
    /// useful to an out-of-scope punishment/slashing layer that wants the complete picture in one
    /// pass.
    pub fn diagnose(&self, partials: &[PartialThresholdSignature<C>]) -> Vec<u32> {
        let mut offenders = BTreeMap::new();

        let r = partials.first().map(|p| p.group_commitment);
        for partial in partials {
            if r.map(|r| partial.group_commitment.into_affine() != r.into_affine()).unwrap_or(false) {
                offenders.insert(partial.participant_index, ());
                continue;
            }
            if verify_partial(partial, &self.commitments, &self.message, &self.group_key).is_err() {
                offenders.insert(partial.participant_index, ());
            }
        }

        offenders.into_keys().collect()
    }
}
