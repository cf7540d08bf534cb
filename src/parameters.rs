//! Threshold parameters for a DKG / signing instance.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::{Error, FrostResult};

/// The `(n, t)` parameters of a threshold scheme: `n` participants, of whom at least `t` must
/// cooperate to produce a valid group signature.
#[derive(Copy, Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct ThresholdParameters {
    /// The number of participants in the scheme.
    n: u32,
    /// The threshold required for signing or reconstructing the group secret.
    t: u32,
}

impl ThresholdParameters {
    /// Construct a new set of threshold parameters, rejecting the invariant violations named in
    /// the DKG session's definition: `1 <= t <= n`.
    pub fn new(n: u32, t: u32) -> FrostResult<Self> {
        if t == 0 || t > n {
            return Err(Error::InputInvalid(format!(
                "threshold parameters must satisfy 1 <= t <= n, got n={n}, t={t}"
            )));
        }

        Ok(ThresholdParameters { n, t })
    }

    /// The total number of participants.
    pub fn n(&self) -> u32 {
        self.n
    }

    /// The signing/reconstruction threshold.
    pub fn t(&self) -> u32 {
        self.t
    }
}
