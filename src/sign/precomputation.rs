//! Per-signer nonce commitment generation: batch-produced `(d, e)` nonce pairs, whose public
//! halves are published before a signing event and whose private halves are consumed exactly
//! once when this participant signs.

use ark_ec::{CurveGroup, Group};
use ark_ff::{PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, Rng};
use zeroize::Zeroize;

use crate::ciphersuite::CipherSuite;
use crate::utils::encode_point;
use crate::{Error, FrostResult};

#[derive(Debug, Zeroize)]
struct NoncePair<F: PrimeField>(F, F);

impl<F: PrimeField> Drop for NoncePair<F> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<F: PrimeField> NoncePair<F> {
    fn new(csprng: &mut (impl CryptoRng + Rng)) -> Self {
        NoncePair(F::rand(csprng), F::rand(csprng))
    }
}

impl<C: CipherSuite> From<NoncePair<<C::G as Group>::ScalarField>> for CommitmentShare<C> {
    fn from(other: NoncePair<<C::G as Group>::ScalarField>) -> Self {
        let hiding_commit = C::G::generator() * other.0;
        let binding_commit = C::G::generator() * other.1;

        Self {
            hiding: Commitment {
                secret: other.0,
                commit: hiding_commit,
            },
            binding: Commitment {
                secret: other.1,
                commit: binding_commit,
            },
        }
    }
}

/// A secret scalar and the point it commits to.
#[derive(Clone, Debug, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub(crate) struct Commitment<C: CipherSuite> {
    pub(crate) secret: <C::G as Group>::ScalarField,
    pub(crate) commit: C::G,
}

impl<C: CipherSuite> Zeroize for Commitment<C> {
    fn zeroize(&mut self) {
        self.secret.zeroize();
        // `Group` does not implement `Zeroize`; the secret scalar is what actually matters.
        self.commit = C::G::zero();
    }
}

impl<C: CipherSuite> Drop for Commitment<C> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<C: CipherSuite> PartialEq for Commitment<C> {
    fn eq(&self, other: &Self) -> bool {
        self.secret.eq(&other.secret) && self.commit.into_affine().eq(&other.commit.into_affine())
    }
}

/// A precomputed nonce pair, consisting of a hiding commitment `(d, D)` and a binding commitment
/// `(e, E)`.
#[derive(Clone, Debug, Eq, CanonicalSerialize, CanonicalDeserialize, Zeroize)]
pub struct CommitmentShare<C: CipherSuite> {
    pub(crate) hiding: Commitment<C>,
    pub(crate) binding: Commitment<C>,
}

impl<C: CipherSuite> Drop for CommitmentShare<C> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<C: CipherSuite> PartialEq for CommitmentShare<C> {
    fn eq(&self, other: &Self) -> bool {
        self.hiding.eq(&other.hiding) && self.binding.eq(&other.binding)
    }
}

impl<C: CipherSuite> CommitmentShare<C> {
    /// The published public pair `(D, E)`.
    pub fn publish(&self) -> (C::G, C::G) {
        (self.hiding.commit, self.binding.commit)
    }

    /// The canonical byte encoding of this share's hiding commitment `D`, used as the storage
    /// handle nonces are indexed under (§4.6: "Stored indexed by D").
    pub fn hiding_commitment_bytes(&self) -> FrostResult<Vec<u8>> {
        encode_point::<C>(&self.hiding.commit)
    }

    /// Serialize this share to bytes.
    pub fn to_bytes(&self) -> FrostResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        Ok(bytes)
    }

    /// Deserialize a share from bytes.
    pub fn from_bytes(bytes: &[u8]) -> FrostResult<Self> {
        Self::deserialize_compressed(bytes).map_err(|_| Error::DeserializationError)
    }
}

/// The private half of a batch of nonce pairs generated by [`generate_commitment_share_lists`],
/// retained by this participant and consumed one at a time on signing.
#[derive(Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct SecretCommitmentShareList<C: CipherSuite> {
    /// The secret commitment shares, in generation order.
    pub commitments: Vec<CommitmentShare<C>>,
}

impl<C: CipherSuite> SecretCommitmentShareList<C> {
    /// Drop a used [`CommitmentShare`] from this list and ensure it is wiped from memory. This is
    /// the local bookkeeping counterpart of [`crate::external::DataManager::take_nonce`]: the
    /// data manager enforces single-use across the network, this enforces it in the caller's own
    /// retained state.
    pub fn drop_share(&mut self, share: CommitmentShare<C>) {
        if let Some(index) = self.commitments.iter().position(|s| s.eq(&share)) {
            drop(self.commitments.remove(index));
        }
        drop(share);
    }
}

/// The public half of a batch of nonce pairs: only the hiding and binding commitments, never the
/// secrets they commit to. Published before a signing event for other signers to obtain.
#[derive(Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PublicCommitmentShareList<C: CipherSuite> {
    /// The publishing participant's index.
    pub participant_index: u32,
    /// The published `(D, E)` pairs, in generation order.
    pub commitments: Vec<(C::G, C::G)>,
}

/// Batch-produce `number_of_shares` nonce pairs for `participant_index`: `[1, q)`-uniform
/// scalars `(d, e)` with public commitments `(D, E) = (d*G, e*G)`.
pub fn generate_commitment_share_lists<C: CipherSuite>(
    csprng: &mut (impl CryptoRng + Rng),
    participant_index: u32,
    number_of_shares: usize,
) -> (PublicCommitmentShareList<C>, SecretCommitmentShareList<C>) {
    let commitments: Vec<CommitmentShare<C>> = (0..number_of_shares)
        .map(|_| CommitmentShare::from(NoncePair::new(csprng)))
        .collect();

    let published = commitments.iter().map(CommitmentShare::publish).collect();

    (
        PublicCommitmentShareList {
            participant_index,
            commitments: published,
        },
        SecretCommitmentShareList { commitments },
    )
}
