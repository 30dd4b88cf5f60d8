//! Diffie-Hellman key agreement with Ed25519 keys.
//!
//! [derive] multiplies the peer's Edwards point directly and returns an encoded Edwards point.
//! [exchange] maps the peer's key to Curve25519 and runs the X25519 ladder, returning a
//! u-coordinate. In both cases peer keys of small order are refused before any secret is used,
//! and an all-zero or identity result is refused after.

use log::debug;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::edwards::EdwardsPoint;
use crate::error::{Error, Result};
use crate::keys::private_key_convert;
use crate::montgomery::MontgomeryPoint;
use crate::scalar::Scalar;

/// Returns `[s]pk` as an encoded Edwards point, where `s` is the signing scalar of `seed`.
pub fn derive(seed: &[u8; 32], pk: &[u8; 32]) -> Result<[u8; 32]> {
    let mut scalar = private_key_convert(seed);
    let ss = derive_with_scalar(&scalar, pk);
    scalar.zeroize();
    ss
}

/// Returns `[scalar mod L]pk` as an encoded Edwards point.
pub fn derive_with_scalar(scalar: &[u8; 32], pk: &[u8; 32]) -> Result<[u8; 32]> {
    let q = peer_point(pk)?;

    let mut s = Scalar::from_bytes(scalar);
    let r = &q * &s;
    s.zeroize();

    if r.is_identity().into() {
        debug!("refusing identity shared point");
        return Err(Error::DegenerateResult);
    }
    Ok(r.as_bytes())
}

/// Returns the X25519 shared secret between the signing scalar of `seed` and the Curve25519 image
/// of `pk`.
pub fn exchange(seed: &[u8; 32], pk: &[u8; 32]) -> Result<[u8; 32]> {
    let mut scalar = private_key_convert(seed);
    let ss = exchange_with_scalar(&scalar, pk);
    scalar.zeroize();
    ss
}

/// Returns the X25519 shared secret between `clamp(scalar)` and the Curve25519 image of `pk`.
pub fn exchange_with_scalar(scalar: &[u8; 32], pk: &[u8; 32]) -> Result<[u8; 32]> {
    let u = peer_point(pk)?.to_montgomery();
    non_zero(u.mul_clamped(scalar))
}

/// The X25519 function of RFC 7748: `clamp(scalar)·u`, refusing an all-zero output.
///
/// Bit 255 of `u` is ignored. Unlike [exchange], `u` may be any 32-byte string, including points
/// on the twist.
pub fn x25519(scalar: &[u8; 32], u: &[u8; 32]) -> Result<[u8; 32]> {
    non_zero(MontgomeryPoint(*u).mul_clamped(scalar))
}

/// Returns the X25519 public key `clamp(scalar)·9`.
#[must_use]
pub fn x25519_base(scalar: &[u8; 32]) -> [u8; 32] {
    MontgomeryPoint::BASEPOINT.mul_clamped(scalar).to_bytes()
}

fn peer_point(pk: &[u8; 32]) -> Result<EdwardsPoint> {
    let q = EdwardsPoint::from_bytes(pk)?;
    if q.is_small_order().into() {
        debug!("refusing small-order peer key");
        return Err(Error::InvalidEncoding);
    }
    Ok(q)
}

fn non_zero(ss: MontgomeryPoint) -> Result<[u8; 32]> {
    if ss.0.ct_eq(&[0u8; 32]).into() {
        debug!("refusing all-zero shared secret");
        return Err(Error::DegenerateResult);
    }
    Ok(ss.to_bytes())
}
