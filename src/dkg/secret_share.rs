//! Verifiable secret sharing: polynomials, their public commitments, and the AEAD-encrypted
//! pairwise shares exchanged in round 2.

use ark_ec::{CurveGroup, Group};
use ark_ff::{UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use digest::Digest;
use hkdf::Hkdf;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};

use crate::ciphersuite::CipherSuite;
use crate::keys::DiffieHellmanPrivateKey;
use crate::utils::encode_point;
use crate::{Error, FrostResult};

/// A participant's secret polynomial `f_i(x) = a_{i,0} + a_{i,1} x + ... + a_{i,t-1} x^{t-1}`.
///
/// Zeroized on drop: every coefficient is a secret that, combined with a threshold of others,
/// reconstructs the participant's contribution to the group secret.
#[derive(Clone, Debug, Zeroize)]
pub struct Coefficients<C: CipherSuite>(pub(crate) Vec<<C::G as Group>::ScalarField>);

impl<C: CipherSuite> Drop for Coefficients<C> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<C: CipherSuite> Coefficients<C> {
    /// Sample a degree-`t-1` polynomial, optionally fixing the constant term to `a_0` (to derive
    /// deterministic key material instead of a fresh random secret).
    pub fn sample(
        t: usize,
        a_0: Option<<C::G as Group>::ScalarField>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Self {
        let mut coefficients = Vec::with_capacity(t);
        coefficients.push(a_0.unwrap_or_else(|| <C::G as Group>::ScalarField::rand(rng)));
        for _ in 1..t {
            coefficients.push(<C::G as Group>::ScalarField::rand(rng));
        }
        Coefficients(coefficients)
    }

    /// Evaluate this polynomial at `x` via Horner's method.
    pub fn evaluate(&self, x: u32) -> <C::G as Group>::ScalarField {
        let x = <C::G as Group>::ScalarField::from(x);
        let mut result = <C::G as Group>::ScalarField::zero();
        for coefficient in self.0.iter().rev() {
            result = result * x + coefficient;
        }
        result
    }

    /// Compute the public Pedersen commitments `C_{i,j} = a_{i,j} * G` to every coefficient.
    pub fn commit(&self, index: u32) -> VerifiableSecretSharingCommitment<C> {
        let points = self
            .0
            .iter()
            .map(|a| C::G::generator() * a)
            .collect::<Vec<_>>();
        VerifiableSecretSharingCommitment { index, points }
    }
}

/// The public commitments `[a_{i,0} * G, ..., a_{i,t-1} * G]` to a participant's secret
/// polynomial, broadcast in round 1.
#[derive(Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct VerifiableSecretSharingCommitment<C: CipherSuite> {
    /// The index of the participant who published this commitment.
    pub index: u32,
    /// The coefficient commitments, lowest degree first.
    pub points: Vec<C::G>,
}

impl<C: CipherSuite> VerifiableSecretSharingCommitment<C> {
    /// The commitment to this participant's constant term, `a_{i,0} * G`.
    pub fn public_key(&self) -> Option<&C::G> {
        self.points.first()
    }

    /// Evaluate this commitment at `x` in the exponent: `sum_k x^k * C_{i,k}`.
    ///
    /// This is the public analogue of [`Coefficients::evaluate`], used to verify a received
    /// share without learning the polynomial, and to recompute any participant's verification
    /// share `Y_i`.
    pub fn evaluate_hiding(&self, x: u32) -> C::G {
        let x = <C::G as Group>::ScalarField::from(x);
        let mut result = C::G::zero();
        for point in self.points.iter().rev() {
            result = result * x + point;
        }
        result
    }

    /// Verify that `share * G == self.evaluate_hiding(receiver_index)`, i.e. that a received
    /// share is consistent with this sender's public commitments.
    pub fn verify_share(
        &self,
        receiver_index: u32,
        share: &<C::G as Group>::ScalarField,
    ) -> FrostResult<()> {
        let expected = self.evaluate_hiding(receiver_index);
        if (C::G::generator() * share).into_affine() == expected.into_affine() {
            Ok(())
        } else {
            Err(Error::ShareInvalid(self.index))
        }
    }
}

/// Derive the AEAD key shared between `esk_i` (ours) and `epk_j` (theirs) for a given DKG
/// session, per the crate's fixed KDF construction: HKDF-SHA256 over the ECDH shared point's
/// compressed encoding, salted by the session id, with info label `"frost-pair"`.
fn derive_pairwise_key<C: CipherSuite>(
    dh_private_key: &DiffieHellmanPrivateKey<C>,
    their_dh_public_key: &crate::keys::DiffieHellmanPublicKey<C>,
    dkg_id: &[u8],
) -> FrostResult<[u8; 32]> {
    let shared_point = dh_private_key.diffie_hellman(their_dh_public_key);
    let ikm = encode_point::<C>(&shared_point)?;

    let hk = Hkdf::<sha2::Sha256>::new(Some(dkg_id), &ikm);
    let mut okm = [0u8; 32];
    hk.expand(b"frost-pair", &mut okm)
        .map_err(|_| Error::Custom("HKDF expand failed".into()))?;
    Ok(okm)
}

/// Derive this pairwise channel's AEAD nonce. The key above is used exactly once (a single
/// scalar, for a single recipient, in a single DKG session), so a nonce derived from the
/// session/sender/receiver triple — rather than a random or incrementing counter — is sufficient
/// to avoid ever reusing a (key, nonce) pair.
fn derive_nonce(dkg_id: &[u8], sender_id: u32, receiver_id: u32) -> [u8; 12] {
    let mut hasher = sha2::Sha256::new();
    hasher.update(dkg_id);
    hasher.update(sender_id.to_be_bytes());
    hasher.update(receiver_id.to_be_bytes());
    let digest = hasher.finalize();
    let mut nonce = [0u8; 12];
    nonce.copy_from_slice(&digest[..12]);
    nonce
}

/// An AEAD-encrypted pairwise secret share, sent from `sender_index` to `receiver_index` in
/// round 2.
#[derive(Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct EncryptedSecretShare<C: CipherSuite> {
    /// The sending participant's index.
    pub sender_index: u32,
    /// The receiving participant's index.
    pub receiver_index: u32,
    /// The AEAD ciphertext (including authentication tag).
    pub data: Vec<u8>,
    #[doc(hidden)]
    pub(crate) _phantom: core::marker::PhantomData<C>,
}

impl<C: CipherSuite> EncryptedSecretShare<C> {
    /// Encrypt `share = f_sender(receiver_index)` under the pairwise key derived from
    /// `dh_private_key` (ours) and `their_dh_public_key` (theirs), with associated data
    /// `(dkg_id, sender_index, receiver_index)` as the wire contract requires.
    pub fn encrypt(
        dkg_id: &[u8],
        sender_index: u32,
        receiver_index: u32,
        share: &<C::G as Group>::ScalarField,
        dh_private_key: &DiffieHellmanPrivateKey<C>,
        their_dh_public_key: &crate::keys::DiffieHellmanPublicKey<C>,
    ) -> FrostResult<Self> {
        let key_bytes = derive_pairwise_key(dh_private_key, their_dh_public_key, dkg_id)?;
        let key = Key::<Aes256Gcm>::from_slice(&key_bytes);
        let cipher = Aes256Gcm::new(key);
        let nonce_bytes = derive_nonce(dkg_id, sender_index, receiver_index);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let mut plaintext = Vec::new();
        share
            .serialize_compressed(&mut plaintext)
            .map_err(|_| Error::SerializationError)?;

        let mut aad = Vec::new();
        aad.extend_from_slice(dkg_id);
        aad.extend_from_slice(&sender_index.to_be_bytes());
        aad.extend_from_slice(&receiver_index.to_be_bytes());

        let data = cipher
            .encrypt(
                nonce,
                Payload {
                    msg: &plaintext,
                    aad: &aad,
                },
            )
            .map_err(|_| Error::Custom("share encryption failed".into()))?;

        Ok(EncryptedSecretShare {
            sender_index,
            receiver_index,
            data,
            _phantom: core::marker::PhantomData,
        })
    }

    /// Decrypt this share, keyed by `dh_private_key` (ours, the receiver) and
    /// `sender_dh_public_key` (theirs, the sender). A decryption failure is a protocol fault
    /// attributable to the sender ([`Error::DecryptFailed`]).
    pub fn decrypt(
        &self,
        dkg_id: &[u8],
        dh_private_key: &DiffieHellmanPrivateKey<C>,
        sender_dh_public_key: &crate::keys::DiffieHellmanPublicKey<C>,
    ) -> FrostResult<<C::G as Group>::ScalarField> {
        let key_bytes = derive_pairwise_key(dh_private_key, sender_dh_public_key, dkg_id)?;
        let key = Key::<Aes256Gcm>::from_slice(&key_bytes);
        let cipher = Aes256Gcm::new(key);
        let nonce_bytes = derive_nonce(dkg_id, self.sender_index, self.receiver_index);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let mut aad = Vec::new();
        aad.extend_from_slice(dkg_id);
        aad.extend_from_slice(&self.sender_index.to_be_bytes());
        aad.extend_from_slice(&self.receiver_index.to_be_bytes());

        let plaintext = cipher
            .decrypt(
                nonce,
                Payload {
                    msg: &self.data,
                    aad: &aad,
                },
            )
            .map_err(|_| Error::DecryptFailed(self.sender_index))?;

        <C::G as Group>::ScalarField::deserialize_compressed(&plaintext[..])
            .map_err(|_| Error::DecryptFailed(self.sender_index))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::Secp256k1Sha256;
    use rand::rngs::OsRng;

    #[test]
    fn commit_and_evaluate_agree() {
        let coefficients = Coefficients::<Secp256k1Sha256>::sample(3, None, &mut OsRng);
        let commitment = coefficients.commit(1);

        for x in [1u32, 2, 3, 42] {
            let share = coefficients.evaluate(x);
            assert!(commitment.verify_share(x, &share).is_ok());
        }
    }

    #[test]
    fn tampered_share_fails_verification() {
        let coefficients = Coefficients::<Secp256k1Sha256>::sample(2, None, &mut OsRng);
        let commitment = coefficients.commit(1);
        let mut share = coefficients.evaluate(5);
        share += ark_secp256k1::Fr::from(1u64);
        assert!(commitment.verify_share(5, &share).is_err());
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let (sk_a, pk_a) = DiffieHellmanPrivateKey::<Secp256k1Sha256>::generate(&mut OsRng);
        let (sk_b, pk_b) = DiffieHellmanPrivateKey::<Secp256k1Sha256>::generate(&mut OsRng);

        let share = ark_secp256k1::Fr::rand(&mut OsRng);
        let encrypted =
            EncryptedSecretShare::<Secp256k1Sha256>::encrypt(b"dkg-1", 1, 2, &share, &sk_a, &pk_b)
                .unwrap();

        let decrypted = encrypted.decrypt(b"dkg-1", &sk_b, &pk_a).unwrap();
        assert_eq!(share, decrypted);
    }

    #[test]
    fn decrypt_fails_under_wrong_key() {
        let (sk_a, pk_a) = DiffieHellmanPrivateKey::<Secp256k1Sha256>::generate(&mut OsRng);
        let (_sk_b, pk_b) = DiffieHellmanPrivateKey::<Secp256k1Sha256>::generate(&mut OsRng);
        let (sk_eve, _pk_eve) = DiffieHellmanPrivateKey::<Secp256k1Sha256>::generate(&mut OsRng);

        let share = ark_secp256k1::Fr::rand(&mut OsRng);
        let encrypted =
            EncryptedSecretShare::<Secp256k1Sha256>::encrypt(b"dkg-1", 1, 2, &share, &sk_a, &pk_b)
                .unwrap();

        assert!(encrypted.decrypt(b"dkg-1", &sk_eve, &pk_a).is_err());
    }
}
