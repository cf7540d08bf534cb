//! Test-only re-exports, kept at a stable path so unit tests across modules can share one import.

pub use crate::ciphersuite::Secp256k1Sha256;
