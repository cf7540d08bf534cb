//! Long-term and ephemeral key material produced by the DKG.

use core::marker::PhantomData;
use core::ops::Deref;

use ark_ec::{CurveGroup, Group};
use ark_ff::{UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::ciphersuite::CipherSuite;
use crate::dkg::secret_share::VerifiableSecretSharingCommitment;
use crate::utils::calculate_lagrange_coefficient;
use crate::{Error, FrostResult};

/// A participant's per-session Diffie-Hellman private key, used only to derive the pairwise
/// symmetric keys that encrypt round-2 shares.
#[derive(Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize, Zeroize)]
pub struct DiffieHellmanPrivateKey<C: CipherSuite>(pub(crate) <C::G as Group>::ScalarField);

impl<C: CipherSuite> DiffieHellmanPrivateKey<C> {
    /// Sample a fresh ephemeral Diffie-Hellman keypair for a new DKG session.
    pub fn generate(rng: &mut (impl RngCore + CryptoRng)) -> (Self, DiffieHellmanPublicKey<C>) {
        let sk = <C::G as Group>::ScalarField::rand(rng);
        let pk = DiffieHellmanPublicKey::new(C::G::generator() * sk);
        (DiffieHellmanPrivateKey(sk), pk)
    }

    /// Derive the shared point `ECDH(self, their_public_key)`.
    pub(crate) fn diffie_hellman(&self, their_public_key: &DiffieHellmanPublicKey<C>) -> C::G {
        their_public_key.key * self.0
    }

    /// Serialize this key to bytes.
    pub fn to_bytes(&self) -> FrostResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        Ok(bytes)
    }

    /// Deserialize this key from bytes.
    pub fn from_bytes(bytes: &[u8]) -> FrostResult<Self> {
        Self::deserialize_compressed(bytes).map_err(|_| Error::DeserializationError)
    }
}

impl<C: CipherSuite> Drop for DiffieHellmanPrivateKey<C> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// The public half of a [`DiffieHellmanPrivateKey`].
#[derive(Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct DiffieHellmanPublicKey<C: CipherSuite> {
    pub(crate) key: C::G,
    _phantom: PhantomData<C>,
}

impl<C: CipherSuite> DiffieHellmanPublicKey<C> {
    /// Wrap a raw group element as a `DiffieHellmanPublicKey`.
    pub fn new(key: C::G) -> Self {
        Self {
            key,
            _phantom: PhantomData,
        }
    }

    /// Serialize this key to bytes.
    pub fn to_bytes(&self) -> FrostResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        Ok(bytes)
    }

    /// Deserialize this key from bytes.
    pub fn from_bytes(bytes: &[u8]) -> FrostResult<Self> {
        Self::deserialize_compressed(bytes).map_err(|_| Error::DeserializationError)
    }
}

impl<C: CipherSuite> Deref for DiffieHellmanPublicKey<C> {
    type Target = C::G;

    fn deref(&self) -> &Self::Target {
        &self.key
    }
}

/// A participant's long-lived share of the group signing key, produced once the DKG completes
/// successfully. Zeroized on drop.
#[derive(Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize, Zeroize)]
pub struct IndividualSigningKey<C: CipherSuite> {
    /// The participant index this share belongs to.
    pub index: u32,
    /// The secret share itself: `share_i = sum_j f_j(id_i) mod q`.
    pub(crate) key: <C::G as Group>::ScalarField,
}

impl<C: CipherSuite> Drop for IndividualSigningKey<C> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<C: CipherSuite> IndividualSigningKey<C> {
    /// Derive the public verification share `Y_i = share_i * G` corresponding to this key.
    pub fn to_public(&self) -> IndividualVerifyingKey<C> {
        IndividualVerifyingKey {
            index: self.index,
            share: C::G::generator() * self.key,
        }
    }

    /// Serialize this key to bytes.
    pub fn to_bytes(&self) -> FrostResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        Ok(bytes)
    }

    /// Deserialize this key from bytes.
    pub fn from_bytes(bytes: &[u8]) -> FrostResult<Self> {
        Self::deserialize_compressed(bytes).map_err(|_| Error::DeserializationError)
    }
}

impl<C: CipherSuite> From<&IndividualSigningKey<C>> for IndividualVerifyingKey<C> {
    fn from(source: &IndividualSigningKey<C>) -> Self {
        source.to_public()
    }
}

/// A participant's public verification share `Y_i`. Any peer can recompute this value from the
/// public round-1 commitments alone, without trusting the participant to publish it honestly.
#[derive(Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct IndividualVerifyingKey<C: CipherSuite> {
    /// The participant index this share belongs to.
    pub index: u32,
    /// The verification share `Y_i = share_i * G`.
    pub share: C::G,
}

impl<C: CipherSuite> IndividualVerifyingKey<C> {
    /// Recompute `Y_i` for `participant_index` from the full set of round-1 commitments:
    /// `Y_i = sum_j sum_k id_i^k * C_{j,k}`.
    pub fn from_commitments(
        participant_index: u32,
        commitments: &[VerifiableSecretSharingCommitment<C>],
    ) -> Self {
        let share = commitments
            .iter()
            .map(|c| c.evaluate_hiding(participant_index))
            .fold(C::G::zero(), |acc, term| acc + term);

        IndividualVerifyingKey {
            index: participant_index,
            share,
        }
    }

    /// Verify that `self.share` matches the value independently recomputable from
    /// `commitments` (any participant can audit any other's verification share).
    pub fn verify_against_commitments(
        &self,
        commitments: &[VerifiableSecretSharingCommitment<C>],
    ) -> FrostResult<()> {
        let recomputed = Self::from_commitments(self.index, commitments);
        if recomputed.share.into_affine() == self.share.into_affine() {
            Ok(())
        } else {
            Err(Error::ShareInvalid(self.index))
        }
    }

    /// Serialize this key to bytes.
    pub fn to_bytes(&self) -> FrostResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        Ok(bytes)
    }

    /// Deserialize this key from bytes.
    pub fn from_bytes(bytes: &[u8]) -> FrostResult<Self> {
        Self::deserialize_compressed(bytes).map_err(|_| Error::DeserializationError)
    }
}

/// The group public key `Y = sum_i C_{i,0}`, under which the aggregated threshold signature
/// verifies.
#[derive(Copy, Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct GroupKey<C: CipherSuite> {
    pub(crate) key: C::G,
    _phantom: PhantomData<C>,
}

impl<C: CipherSuite> GroupKey<C> {
    /// Wrap a raw group element as a `GroupKey`.
    pub fn new(key: C::G) -> Self {
        Self {
            key,
            _phantom: PhantomData,
        }
    }

    /// Serialize this key to bytes.
    pub fn to_bytes(&self) -> FrostResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        Ok(bytes)
    }

    /// Deserialize this key from bytes.
    pub fn from_bytes(bytes: &[u8]) -> FrostResult<Self> {
        Self::deserialize_compressed(bytes).map_err(|_| Error::DeserializationError)
    }
}

impl<C: CipherSuite> Deref for GroupKey<C> {
    type Target = C::G;

    fn deref(&self) -> &Self::Target {
        &self.key
    }
}

/// The Lagrange coefficient `lambda_j(S)` of participant `j` over signer set `S`, evaluated at
/// `x = 0`. Exposed publicly so a third party can audit the DKG-consistency invariant
/// `sum_{i in S} lambda_i(S) * Y_i == Y` for any threshold-size subset `S`, without the core ever
/// exposing a secret share.
pub fn lagrange_coefficient<C: CipherSuite>(
    index: u32,
    signer_set: &[u32],
) -> FrostResult<<C::G as Group>::ScalarField> {
    calculate_lagrange_coefficient::<C>(index, signer_set)
}
