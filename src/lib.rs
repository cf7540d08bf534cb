//! Threshold Schnorr (FROST) signing core, with an identifiable-abort distributed key generation.
//!
//! This crate implements the cryptographic core of a FROST threshold signature system: the
//! three-round DKG with verifiable secret sharing and cheater identification, per-signer nonce
//! commitment generation, partial signature generation and verification, and aggregation of the
//! final group signature. It deliberately has no opinion on networking, persistence, peer
//! discovery, or authorization; those are expressed as the collaborator traits in
//! [`external`] and are expected to be supplied by the embedding application.

pub mod ciphersuite;
pub mod dkg;
pub mod external;
pub mod keys;
pub mod parameters;
pub mod sign;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub(crate) mod utils;

/// Every error the core can surface, each carrying enough context (an offending participant id,
/// where the protocol defines attribution) for the caller to act on it without inspecting a
/// string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A structurally invalid argument: duplicate id, wrong-length input, non-canonical point.
    /// Indicates a caller bug; never raised by a correct peer's messages.
    #[error("invalid input: {0}")]
    InputInvalid(String),

    /// A round-1 Schnorr proof of knowledge failed to verify. Round-1 broadcasts are public, so
    /// this fault is globally attributable to the named participant and aborts the whole session.
    #[error("participant {0} submitted an invalid round-1 proof of knowledge")]
    ProofInvalid(u32),

    /// A round-3 share failed its verifiable-secret-sharing check against the sender's published
    /// commitments. Recorded as complaint evidence rather than raised directly.
    #[error("participant {0} sent a share inconsistent with its public commitments")]
    ShareInvalid(u32),

    /// AEAD decryption of a round-2 ciphertext failed. Recorded as complaint evidence.
    #[error("failed to decrypt the round-2 share from participant {0}")]
    DecryptFailed(u32),

    /// A round-1 broadcast or round-2 ciphertext from this participant never arrived before the
    /// session's timeout. Treated identically to [`Error::DecryptFailed`].
    #[error("participant {0} never delivered their round message")]
    ParticipantTimedOut(u32),

    /// The signer could not find its own entry in the published commitment set `B`.
    #[error("signer's own nonce commitment is missing from the commitment set")]
    UnknownCommitment,

    /// The signer has no stored private nonce pair for the public commitment it published.
    #[error("no private nonce pair found for commitment handle")]
    NonceMissing,

    /// The aggregated nonce `R` is the identity point, or the commitment set `B` contains a
    /// duplicate participant id.
    #[error("aggregated commitment set is degenerate (identity R, or duplicate id)")]
    BadCommitments,

    /// Partial signatures being aggregated do not all commit to the same group nonce `R`.
    #[error("partial signatures disagree on the aggregate nonce R")]
    InconsistentAggregate,

    /// A specific partial signature failed verification during aggregation.
    #[error("partial signature from participant {0} failed verification")]
    PartialInvalid(u32),

    /// Canonical serialization of a crate type failed.
    #[error("serialization failed")]
    SerializationError,

    /// Canonical deserialization of a crate type failed.
    #[error("deserialization failed")]
    DeserializationError,

    /// A requested resource (nonce handle, stored key share) was not present in a collaborator
    /// store.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other failure that does not warrant its own variant, carrying a human-readable cause
    /// (used by Lagrange interpolation over a degenerate index set, for instance).
    #[error("{0}")]
    Custom(String),
}

/// This crate's uniform `Result` alias.
pub type FrostResult<T> = Result<T, Error>;
