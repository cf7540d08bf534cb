//! Collaborator traits the embedding application supplies: persistence, peer discovery, and
//! authorization. The core treats all three as opaque services and never assumes a particular
//! transport or storage engine.

#[cfg(any(test, feature = "test-support"))]
use std::collections::HashMap;
#[cfg(any(test, feature = "test-support"))]
use std::sync::Mutex;

use crate::ciphersuite::CipherSuite;
use crate::keys::GroupKey;
use crate::sign::precomputation::CommitmentShare;
use crate::FrostResult;
#[cfg(any(test, feature = "test-support"))]
use crate::Error;

/// A long-lived key share, as stored by a [`DataManager`] implementation.
#[derive(Clone)]
pub struct StoredKeyShare<C: CipherSuite> {
    /// This participant's secret share.
    pub signing_key: crate::keys::IndividualSigningKey<C>,
    /// The group public key.
    pub group_key: GroupKey<C>,
    /// This participant's verification share.
    pub verifying_key: crate::keys::IndividualVerifyingKey<C>,
}

/// Persists private nonces and long-lived key shares on behalf of the core.
///
/// `take_nonce` MUST be atomic: it is the mechanism that prevents a nonce pair from ever being
/// consumed by two concurrent signing attempts.
pub trait DataManager<C: CipherSuite> {
    /// Persist a freshly generated batch of private nonce pairs for `participant_index`.
    fn store_nonces(&self, participant_index: u32, nonces: Vec<CommitmentShare<C>>) -> FrostResult<()>;

    /// Atomically retrieve and remove the private nonce pair published as `handle` (the hiding
    /// commitment `D`). Returns [`Error::NonceMissing`] if no such pair is stored (already
    /// consumed, or never generated).
    fn take_nonce(&self, participant_index: u32, handle: &[u8]) -> FrostResult<CommitmentShare<C>>;

    /// Persist a completed DKG session's key material.
    fn store_key(&self, dkg_id: &str, key: StoredKeyShare<C>) -> FrostResult<()>;

    /// Load a previously stored key share.
    fn load_key(&self, dkg_id: &str) -> FrostResult<StoredKeyShare<C>>;
}

/// A long-term participant identity, as exposed by a [`NodeInfo`] implementation.
#[derive(Clone, Debug)]
pub struct PeerInfo {
    /// The peer's long-term signing public key, as raw bytes (encoding is transport-defined).
    pub long_term_public_key: Vec<u8>,
    /// An opaque network address, meaningful only to the out-of-scope transport layer.
    pub network_address: String,
}

/// Enumerates peers and exposes their long-term identities. Out of scope: how peers are
/// discovered or how `network_address` is dialed.
pub trait NodeInfo {
    /// Look up a participant's long-term identity by id.
    fn lookup(&self, participant_index: u32) -> FrostResult<PeerInfo>;

    /// The full set of participant ids enrolled in a given DKG session.
    fn peers_of(&self, dkg_id: &str) -> FrostResult<Vec<u32>>;
}

/// Authorizes who may initiate a DKG session or act as a signing aggregator. The core calls
/// into this only at the boundary (before starting a session or before accepting an aggregator's
/// request); it never re-checks authorization mid-protocol.
pub trait Validator {
    /// Whether `public_key` is authorized to aggregate partial signatures into a group
    /// signature.
    fn is_authorized_aggregator(&self, public_key: &[u8]) -> bool;

    /// Whether `public_key` is authorized to initiate a new DKG session.
    fn is_authorized_dkg_initiator(&self, public_key: &[u8]) -> bool;
}

/// An in-memory reference [`DataManager`], provided for tests and examples only. Production
/// deployments are expected to back this contract with durable, replicated storage; that is out
/// of this crate's scope.
#[cfg(any(test, feature = "test-support"))]
type NonceHandle = (u32, Vec<u8>);

#[cfg(any(test, feature = "test-support"))]
pub struct InMemoryDataManager<C: CipherSuite> {
    nonces: Mutex<HashMap<NonceHandle, CommitmentShare<C>>>,
    keys: Mutex<HashMap<String, StoredKeyShare<C>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl<C: CipherSuite> Default for InMemoryDataManager<C> {
    fn default() -> Self {
        InMemoryDataManager {
            nonces: Mutex::new(HashMap::new()),
            keys: Mutex::new(HashMap::new()),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl<C: CipherSuite> DataManager<C> for InMemoryDataManager<C> {
    fn store_nonces(&self, participant_index: u32, nonces: Vec<CommitmentShare<C>>) -> FrostResult<()> {
        let mut guard = self.nonces.lock().expect("nonce store lock poisoned");
        for nonce in nonces {
            let handle = nonce.hiding_commitment_bytes()?;
            guard.insert((participant_index, handle), nonce);
        }
        Ok(())
    }

    fn take_nonce(&self, participant_index: u32, handle: &[u8]) -> FrostResult<CommitmentShare<C>> {
        let mut guard = self.nonces.lock().expect("nonce store lock poisoned");
        guard
            .remove(&(participant_index, handle.to_vec()))
            .ok_or(Error::NonceMissing)
    }

    fn store_key(&self, dkg_id: &str, key: StoredKeyShare<C>) -> FrostResult<()> {
        let mut guard = self.keys.lock().expect("key store lock poisoned");
        guard.insert(dkg_id.to_string(), key);
        Ok(())
    }

    fn load_key(&self, dkg_id: &str) -> FrostResult<StoredKeyShare<C>> {
        let guard = self.keys.lock().expect("key store lock poisoned");
        guard
            .get(dkg_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no stored key for dkg_id {dkg_id}")))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sign::precomputation::generate_commitment_share_lists;
    use crate::testing::Secp256k1Sha256;
    use rand::rngs::OsRng;

    #[test]
    fn nonce_store_round_trip_and_single_use() {
        let store = InMemoryDataManager::<Secp256k1Sha256>::default();
        let (public, secret) = generate_commitment_share_lists::<Secp256k1Sha256>(&mut OsRng, 1, 2);
        store.store_nonces(1, secret.commitments).unwrap();

        let handle = public.commitments[0].0;
        let handle_bytes = crate::utils::encode_point::<Secp256k1Sha256>(&handle).unwrap();

        assert!(store.take_nonce(1, &handle_bytes).is_ok());
        assert!(matches!(
            store.take_nonce(1, &handle_bytes),
            Err(Error::NonceMissing)
        ));
    }
}
