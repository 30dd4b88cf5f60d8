//! Additive and multiplicative key tweaking.
//!
//! A tweak `t` moves a private scalar `s` to `s + t` or `s·t`, and the matching public key `[s]G`
//! to `[s]G + [t]G` or `[t]([s]G)`, so that either side can derive the tweaked key on its own:
//!
//! ```text
//! public_key_from_scalar(scalar_tweak_add(s, t)) == public_key_tweak_add(public_key_from_scalar(s), t)
//! ```
//!
//! Scalars and tweaks are reduced mod `L` but never clamped. A result of zero or of the identity
//! point is reported as [Error::DegenerateResult].

use log::debug;
use zeroize::Zeroize;

use crate::edwards::{EdwardsPoint, G};
use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// Returns `scalar + tweak (mod L)`.
pub fn scalar_tweak_add(scalar: &[u8; 32], tweak: &[u8; 32]) -> Result<[u8; 32]> {
    tweak_scalar(scalar, tweak, add)
}

/// Returns `scalar · tweak (mod L)`.
pub fn scalar_tweak_mul(scalar: &[u8; 32], tweak: &[u8; 32]) -> Result<[u8; 32]> {
    tweak_scalar(scalar, tweak, mul)
}

/// Returns `pk + [tweak]G`.
pub fn public_key_tweak_add(pk: &[u8; 32], tweak: &[u8; 32]) -> Result<[u8; 32]> {
    let q = EdwardsPoint::from_bytes(pk)?;
    let t = Scalar::from_bytes(tweak);
    non_identity(&q + &(&G * &t))
}

/// Returns `[tweak]pk`.
pub fn public_key_tweak_mul(pk: &[u8; 32], tweak: &[u8; 32]) -> Result<[u8; 32]> {
    let q = EdwardsPoint::from_bytes(pk)?;
    let t = Scalar::from_bytes(tweak);
    non_identity(&q * &t)
}

/// Returns `s + t`, refusing a zero sum.
pub(crate) fn add(s: &Scalar, t: &Scalar) -> Result<Scalar> {
    non_zero(s + t)
}

/// Returns `s · t`, refusing a zero product.
pub(crate) fn mul(s: &Scalar, t: &Scalar) -> Result<Scalar> {
    non_zero(s * t)
}

fn tweak_scalar(
    scalar: &[u8; 32],
    tweak: &[u8; 32],
    op: impl FnOnce(&Scalar, &Scalar) -> Result<Scalar>,
) -> Result<[u8; 32]> {
    let mut s = Scalar::from_bytes(scalar);
    let mut t = Scalar::from_bytes(tweak);
    let r = op(&s, &t);
    s.zeroize();
    t.zeroize();

    let mut r = r?;
    let b = r.as_bytes();
    r.zeroize();
    Ok(b)
}

fn non_zero(mut s: Scalar) -> Result<Scalar> {
    if s.is_zero().into() {
        debug!("tweak produced the zero scalar");
        s.zeroize();
        return Err(Error::DegenerateResult);
    }
    Ok(s)
}

fn non_identity(q: EdwardsPoint) -> Result<[u8; 32]> {
    if q.is_identity().into() {
        debug!("tweak produced the identity point");
        return Err(Error::DegenerateResult);
    }
    Ok(q.as_bytes())
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};

    use super::*;
    use crate::keys::public_key_from_scalar;
    use crate::scalar;

    #[test]
    fn additive_homomorphism() {
        for _ in 0..100 {
            let s: [u8; 32] = thread_rng().gen();
            let t: [u8; 32] = thread_rng().gen();

            let pk = public_key_from_scalar(&s);
            let st = scalar_tweak_add(&s, &t).expect("non-zero sum");

            assert_eq!(public_key_from_scalar(&st), public_key_tweak_add(&pk, &t).unwrap());
        }
    }

    #[test]
    fn multiplicative_homomorphism() {
        for _ in 0..100 {
            let s: [u8; 32] = thread_rng().gen();
            let t: [u8; 32] = thread_rng().gen();

            let pk = public_key_from_scalar(&s);
            let st = scalar_tweak_mul(&s, &t).expect("non-zero product");

            assert_eq!(public_key_from_scalar(&st), public_key_tweak_mul(&pk, &t).unwrap());
        }
    }

    #[test]
    fn tweaks_commute() {
        let s: [u8; 32] = thread_rng().gen();
        let a: [u8; 32] = thread_rng().gen();
        let b: [u8; 32] = thread_rng().gen();

        let ab = scalar_tweak_add(&scalar_tweak_add(&s, &a).unwrap(), &b).unwrap();
        let ba = scalar_tweak_add(&scalar_tweak_add(&s, &b).unwrap(), &a).unwrap();
        assert_eq!(ab, ba);

        let ab = scalar_tweak_mul(&scalar_tweak_mul(&s, &a).unwrap(), &b).unwrap();
        let ba = scalar_tweak_mul(&scalar_tweak_mul(&s, &b).unwrap(), &a).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn results_are_reduced() {
        let st = scalar_tweak_add(&[0xff; 32], &[0u8; 32]).unwrap();
        assert!(bool::from(scalar::is_canonical(&st)));
    }

    #[test]
    fn zero_sum_is_degenerate() {
        let s = Scalar::from_bytes_wide(&thread_rng().gen());
        let t = (-&s).as_bytes();

        assert_eq!(scalar_tweak_add(&s.as_bytes(), &t), Err(Error::DegenerateResult));
        assert_eq!(
            public_key_tweak_add(&public_key_from_scalar(&s.as_bytes()), &t),
            Err(Error::DegenerateResult)
        );
    }

    #[test]
    fn zero_product_is_degenerate() {
        let s: [u8; 32] = thread_rng().gen();
        let pk = public_key_from_scalar(&s);

        assert_eq!(scalar_tweak_mul(&s, &[0u8; 32]), Err(Error::DegenerateResult));
        assert_eq!(public_key_tweak_mul(&pk, &scalar::L), Err(Error::DegenerateResult));
    }

    #[test]
    fn invalid_public_key() {
        let mut pk = [0u8; 32];
        pk[0] = 2;
        assert_eq!(public_key_tweak_add(&pk, &[1u8; 32]), Err(Error::InvalidEncoding));
        assert_eq!(public_key_tweak_mul(&pk, &[1u8; 32]), Err(Error::InvalidEncoding));
    }
}
