//! Key generation, expansion and conversion between Ed25519 and X25519 public keys.

use log::debug;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::edwards::{EdwardsPoint, G};
use crate::error::Result;
use crate::montgomery::MontgomeryPoint;
use crate::scalar::{self, Scalar};

/// The result of hashing a 32-byte seed with SHA-512: a clamped signing scalar and a nonce
/// prefix. Both halves are wiped when the value is dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ExpandedKey {
    scalar: [u8; 32],
    prefix: [u8; 32],
}

impl ExpandedKey {
    /// Expands `seed` as `clamp(H(seed)[..32]) || H(seed)[32..]`.
    #[must_use]
    pub fn from_seed(seed: &[u8; 32]) -> ExpandedKey {
        let mut h = sha512(&[seed]);
        let mut key = ExpandedKey { scalar: [0u8; 32], prefix: [0u8; 32] };
        key.scalar.copy_from_slice(&h[..32]);
        key.prefix.copy_from_slice(&h[32..]);
        key.scalar = scalar::clamp(&key.scalar);
        h.zeroize();
        key
    }

    /// The clamped, unreduced signing scalar.
    pub fn scalar(&self) -> &[u8; 32] {
        &self.scalar
    }

    /// The nonce-derivation prefix.
    pub fn prefix(&self) -> &[u8; 32] {
        &self.prefix
    }

    /// Returns the encoded public key `[s]G`.
    #[must_use]
    pub fn public_key(&self) -> [u8; 32] {
        public_key_from_scalar(&self.scalar)
    }
}

/// Returns a fresh 32-byte seed drawn from `rng`.
#[must_use]
pub fn private_key_generate(mut rng: impl RngCore + CryptoRng) -> [u8; 32] {
    let mut seed = [0u8; 32];
    rng.fill_bytes(&mut seed);
    seed
}

/// Returns the clamped signing scalar derived from `seed`. The scalar is not reduced mod `L`.
#[must_use]
pub fn private_key_convert(seed: &[u8; 32]) -> [u8; 32] {
    *ExpandedKey::from_seed(seed).scalar()
}

/// Returns the Ed25519 public key of `seed`.
#[must_use]
pub fn public_key_create(seed: &[u8; 32]) -> [u8; 32] {
    ExpandedKey::from_seed(seed).public_key()
}

/// Returns the encoded public key `[s mod L]G` for an arbitrary 32-byte scalar.
#[must_use]
pub fn public_key_from_scalar(scalar: &[u8; 32]) -> [u8; 32] {
    let mut s = Scalar::from_bytes(scalar);
    let q = &G * &s;
    s.zeroize();
    q.as_bytes()
}

/// Converts an Ed25519 public key into the X25519 u-coordinate of the same point.
///
/// Fails if `pk` is not a valid point encoding.
pub fn public_key_convert(pk: &[u8; 32]) -> Result<[u8; 32]> {
    Ok(EdwardsPoint::from_bytes(pk)?.to_montgomery().to_bytes())
}

/// Converts an X25519 u-coordinate back into an Ed25519 public key, taking the sign of `x` from
/// `sign`. Bit 255 of `u` is ignored, as is `sign` when `x = 0`.
///
/// Fails with [crate::Error::InvalidEncoding] if `u` is not the image of a curve point.
pub fn public_key_deconvert(u: &[u8; 32], sign: bool) -> Result<[u8; 32]> {
    let q = MontgomeryPoint(*u).to_edwards(sign).map_err(|e| {
        debug!("rejecting u-coordinate without an Edwards image: {}", e);
        e
    })?;
    Ok(q.as_bytes())
}

/// Returns `true` if `pk` is the canonical encoding of a curve point.
#[must_use]
pub fn public_key_verify(pk: &[u8; 32]) -> bool {
    EdwardsPoint::from_bytes(pk).is_ok()
}

/// Returns a fresh clamped scalar drawn from `rng`.
#[must_use]
pub fn scalar_generate(rng: impl RngCore + CryptoRng) -> [u8; 32] {
    let mut k = private_key_generate(rng);
    let s = scalar::clamp(&k);
    k.zeroize();
    s
}

/// Returns `true` if `scalar` is clamped.
#[must_use]
pub fn scalar_verify(scalar: &[u8; 32]) -> bool {
    scalar::is_clamped(scalar).into()
}

/// Clamps `scalar`: clears bits 0, 1, 2 and 255, and sets bit 254.
#[must_use]
pub fn scalar_clamp(scalar: &[u8; 32]) -> [u8; 32] {
    scalar::clamp(scalar)
}

/// SHA-512 over the concatenation of `parts`.
pub(crate) fn sha512(parts: &[&[u8]]) -> [u8; 64] {
    let mut h = Sha512::new();
    for data in parts {
        h.update(data);
    }
    h.finalize().into()
}
