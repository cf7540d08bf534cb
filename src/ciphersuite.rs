//! The algebraic group and hash function this crate's FROST instantiation is built over.
//!
//! The core is generic over a [`CipherSuite`] the way the rest of the FROST literature is, but
//! only one instantiation is shipped: signing over curves other than the one fixed here is
//! explicitly out of scope (see the crate's design notes).

use core::fmt::Debug;

use ark_ec::CurveGroup;
use digest::Digest;

/// The group and hash function a FROST/ICE-FROST instance is parameterised by.
///
/// A `CipherSuite` binds together the elliptic curve group used for key material and nonce
/// commitments, and the hash function used both for challenge derivation and as the `H` in the
/// `KDF`/AEAD construction used to encrypt pairwise DKG shares.
pub trait CipherSuite: Copy + Clone + Eq + PartialEq + Debug + Send + Sync + 'static {
    /// The curve group this instance signs over.
    type G: CurveGroup;

    /// The hash function used for challenge derivation, share encryption key derivation, and
    /// binding-factor computation.
    type Hasher: Digest + Clone;

    /// A fixed ASCII domain tag unique to this ciphersuite instantiation, mixed into every
    /// hash-to-scalar call alongside the per-use-site label (see [`crate::utils::hash_to_scalar`]).
    const CONTEXT_STRING: &'static [u8];
}

/// The only [`CipherSuite`] this crate instantiates: secp256k1 with SHA-256.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Secp256k1Sha256;

impl CipherSuite for Secp256k1Sha256 {
    type G = ark_secp256k1::Projective;
    type Hasher = sha2::Sha256;

    const CONTEXT_STRING: &'static [u8] = b"ICE-FROST-secp256k1-SHA256-v1";
}
