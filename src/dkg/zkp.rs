//! Schnorr proofs of knowledge of a discrete log, bound to a context label.

use ark_ec::{CurveGroup, Group};
use ark_ff::UniformRand;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};

use crate::ciphersuite::CipherSuite;
use crate::utils::{encode_point, hash_to_scalar};
use crate::{Error, FrostResult};

/// A non-interactive Schnorr zero-knowledge proof of knowledge of the discrete log `sk` of a
/// public point `pk = sk * G`.
///
/// Binds a `context` (the DKG session id and participant index) so that a proof cannot be
/// replayed across sessions or attributed to the wrong participant.
#[derive(Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct NizkPokOfSecretKey<C: CipherSuite> {
    /// The proof's commitment `R = k * G`.
    pub(crate) commitment: C::G,
    /// The proof's response `s = k + c * sk`.
    pub(crate) response: <C::G as Group>::ScalarField,
}

impl<C: CipherSuite> NizkPokOfSecretKey<C> {
    /// Prove knowledge of `secret_key` under `public_key`, binding `context`.
    pub fn prove(
        secret_key: &<C::G as Group>::ScalarField,
        public_key: &C::G,
        context: &[u8],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> FrostResult<Self> {
        let k = <C::G as Group>::ScalarField::rand(rng);
        let commitment = C::G::generator() * k;

        let challenge = Self::challenge(context, public_key, &commitment)?;
        let response = k + challenge * secret_key;

        Ok(NizkPokOfSecretKey {
            commitment,
            response,
        })
    }

    /// Verify this proof against `public_key`, binding the same `context` used to produce it.
    pub fn verify(&self, public_key: &C::G, context: &[u8]) -> FrostResult<()> {
        let challenge = Self::challenge(context, public_key, &self.commitment)?;
        let lhs = C::G::generator() * self.response;
        let rhs = self.commitment + *public_key * challenge;

        if lhs.into_affine() == rhs.into_affine() {
            Ok(())
        } else {
            Err(Error::Custom("proof of knowledge failed to verify".into()))
        }
    }

    fn challenge(
        context: &[u8],
        public_key: &C::G,
        commitment: &C::G,
    ) -> FrostResult<<C::G as Group>::ScalarField> {
        let pk_bytes = encode_point::<C>(public_key)?;
        let r_bytes = encode_point::<C>(commitment)?;
        Ok(hash_to_scalar::<C>(b"pop", &[context, &pk_bytes, &r_bytes]))
    }

    /// Serialize this proof to bytes.
    pub fn to_bytes(&self) -> FrostResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        Ok(bytes)
    }

    /// Deserialize this proof from bytes.
    pub fn from_bytes(bytes: &[u8]) -> FrostResult<Self> {
        Self::deserialize_compressed(bytes).map_err(|_| Error::DeserializationError)
    }
}
