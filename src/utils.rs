//! Scalar/point encoding and domain-separated hashing helpers shared across the crate.

use ark_ec::{CurveGroup, Group};
use ark_ff::{Field, PrimeField, Zero};
use ark_serialize::CanonicalSerialize;
use digest::Digest;

use crate::ciphersuite::CipherSuite;
use crate::{Error, FrostResult};

/// Interpolate the Lagrange coefficient of `my_index` at `x = 0` over the index set
/// `all_indices`.
///
/// Fails if `all_indices` contains a duplicate of `my_index` relative to itself, i.e. if two
/// distinct participants were assigned the same evaluation point.
pub(crate) fn calculate_lagrange_coefficient<C: CipherSuite>(
    my_index: u32,
    all_indices: &[u32],
) -> FrostResult<<C::G as Group>::ScalarField> {
    for (pos, &j) in all_indices.iter().enumerate() {
        if all_indices[..pos].contains(&j) {
            return Err(Error::Custom(
                "duplicate participant id in Lagrange interpolation set".into(),
            ));
        }
    }

    let mut numerator = <C::G as Group>::ScalarField::ONE;
    let mut denominator = <C::G as Group>::ScalarField::ONE;

    let my_index_field = <C::G as Group>::ScalarField::from(my_index);

    for &j in all_indices.iter() {
        if j == my_index {
            continue;
        }
        let j_field = <C::G as Group>::ScalarField::from(j);

        numerator *= j_field;
        denominator *= j_field - my_index_field;
    }

    if denominator.is_zero() {
        return Err(Error::Custom(
            "duplicate participant id in Lagrange interpolation set".into(),
        ));
    }

    Ok(numerator * denominator.inverse().expect("checked non-zero above"))
}

/// Hash a domain-separated, labeled sequence of byte strings to a uniform scalar in the
/// ciphersuite's scalar field.
///
/// `label` is the fixed ASCII tag identifying the use site (e.g. `"rho"`, `"challenge"`,
/// `"pop"`) and MUST differ across use sites, per the crate's hashing contract. The ciphersuite's
/// own [`CipherSuite::CONTEXT_STRING`] is always mixed in first so that two ciphersuites sharing
/// the same underlying hash function never collide.
///
/// Oversamples the hash output (two independent digests of the same input under distinct
/// counters) before reducing modulo the field order, so the reduction bias introduced by
/// `from_be_bytes_mod_order` is negligible for any field of cryptographic size.
pub(crate) fn hash_to_scalar<C: CipherSuite>(
    label: &[u8],
    items: &[&[u8]],
) -> <C::G as Group>::ScalarField {
    let mut wide = Vec::new();
    for counter in 0u8..2 {
        let mut hasher = C::Hasher::new();
        hasher.update(C::CONTEXT_STRING);
        hasher.update(label);
        hasher.update([counter]);
        for item in items {
            hasher.update((item.len() as u64).to_be_bytes());
            hasher.update(item);
        }
        wide.extend_from_slice(&hasher.finalize());
    }

    <C::G as Group>::ScalarField::from_be_bytes_mod_order(&wide)
}

/// Canonically encode a curve point as its compressed byte representation.
pub(crate) fn encode_point<C: CipherSuite>(point: &C::G) -> FrostResult<Vec<u8>> {
    let mut bytes = Vec::new();
    point
        .into_affine()
        .serialize_compressed(&mut bytes)
        .map_err(|_| Error::SerializationError)?;
    Ok(bytes)
}

/// Canonically encode a scalar as its fixed-width compressed representation.
pub(crate) fn encode_scalar<C: CipherSuite>(
    scalar: &<C::G as Group>::ScalarField,
) -> FrostResult<Vec<u8>> {
    let mut bytes = Vec::new();
    scalar
        .serialize_compressed(&mut bytes)
        .map_err(|_| Error::SerializationError)?;
    Ok(bytes)
}
