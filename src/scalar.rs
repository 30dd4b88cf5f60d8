//! Arithmetic modulo the prime order `L = 2^252 + 27742317777372353535851937790883648493` of the
//! Ed25519 base point, backed by fiat-crypto's Montgomery-domain routines.

use core::ops::{Add, Mul, Neg, Sub};

use fiat_crypto::curve25519_scalar_64::*;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// The group order `L`, little-endian.
pub(crate) const L: [u8; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
];

/// `2^248 * 2^256 mod L`, i.e. `2^248` in the Montgomery domain.
const R248: [u64; 4] = [
    0xe2edf685ab128969,
    0x680392762298a31d,
    0x3dceec73d217f5be,
    0x01b399411b7c309a,
];

/// An integer modulo `L`, stored in the Montgomery domain.
#[derive(Debug, Copy, Clone, Default)]
pub struct Scalar([u64; 4]);

impl Scalar {
    /// The additive identity.
    pub const ZERO: Scalar = Scalar([0, 0, 0, 0]);

    /// The multiplicative identity, `2^256 mod L` in the Montgomery domain.
    pub const ONE: Scalar = Scalar([
        0xd6ec31748d98951d,
        0xc6ef5bf4737dcf70,
        0xfffffffffffffffe,
        0x0fffffffffffffff,
    ]);

    /// Reduces a 256-bit little-endian integer mod `L`.
    pub fn from_bytes(b: &[u8; 32]) -> Scalar {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(b);
        let s = Scalar::from_bytes_wide(&wide);
        wide.zeroize();
        s
    }

    /// Reduces a 512-bit little-endian integer (e.g. a SHA-512 digest) mod `L`.
    ///
    /// The input is split into `c0 + c1·2^248 + c2·2^496` with every chunk below `L`, so each
    /// chunk can enter the Montgomery domain directly.
    pub fn from_bytes_wide(b: &[u8; 64]) -> Scalar {
        let c0 = chunk(&b[..31]);
        let c1 = chunk(&b[31..62]);
        let c2 = chunk(&b[62..]);

        let r248 = Scalar(R248);
        let r496 = &r248 * &r248;

        &(&c0 + &(&c1 * &r248)) + &(&c2 * &r496)
    }

    /// Decodes a canonical scalar, returning `None` if the value is not strictly less than `L`.
    pub fn from_canonical_bytes(b: &[u8; 32]) -> Option<Scalar> {
        if is_canonical(b).into() {
            Some(Scalar::from_bytes(b))
        } else {
            None
        }
    }

    /// Returns the canonical little-endian encoding.
    pub fn as_bytes(&self) -> [u8; 32] {
        let mut n = [0u64; 4];
        fiat_25519_scalar_from_montgomery(&mut n, &self.0);

        let mut ret = [0u8; 32];
        fiat_25519_scalar_to_bytes(&mut ret, &n);
        n.zeroize();
        ret
    }

    /// Returns 1 if the scalar is zero mod `L`.
    pub fn is_zero(&self) -> Choice {
        let mut nz = 0u64;
        fiat_25519_scalar_nonzero(&mut nz, &self.0);
        nz.ct_eq(&0)
    }
}

/// Lifts a chunk of at most 31 bytes into the Montgomery domain.
fn chunk(b: &[u8]) -> Scalar {
    let mut buf = [0u8; 32];
    buf[..b.len()].copy_from_slice(b);

    let mut n = [0u64; 4];
    fiat_25519_scalar_from_bytes(&mut n, &buf);

    let mut ret = Scalar::ZERO;
    fiat_25519_scalar_to_montgomery(&mut ret.0, &n);

    buf.zeroize();
    n.zeroize();
    ret
}

/// Returns 1 if the little-endian integer `b` is strictly less than `L`.
pub(crate) fn is_canonical(b: &[u8; 32]) -> Choice {
    // Borrow out of b - L is set iff b < L.
    let mut borrow = 0i16;
    for (&x, &l) in b.iter().zip(L.iter()) {
        let diff = x as i16 - l as i16 - borrow;
        borrow = (diff >> 8) & 1;
    }
    (borrow as u8).into()
}

/// Clamps a 32-byte secret into an X25519/Ed25519 scalar: clears the low three bits and bit
/// 255, and sets bit 254.
pub fn clamp(b: &[u8; 32]) -> [u8; 32] {
    let mut k = *b;
    k[0] &= 248;
    k[31] &= 127;
    k[31] |= 64;
    k
}

/// Returns 1 if `b` is already clamped.
pub fn is_clamped(b: &[u8; 32]) -> Choice {
    (b[0] & 7).ct_eq(&0) & (b[31] & 0xc0).ct_eq(&0x40)
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        // Montgomery form is unique for reduced values.
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut ret = Scalar::ZERO;
        fiat_25519_scalar_selectznz(&mut ret.0, choice.unwrap_u8(), &a.0, &b.0);
        ret
    }
}

impl<'a, 'b> Add<&'b Scalar> for &'a Scalar {
    type Output = Scalar;

    fn add(self, rhs: &'b Scalar) -> Scalar {
        let mut ret = Scalar::ZERO;
        fiat_25519_scalar_add(&mut ret.0, &self.0, &rhs.0);
        ret
    }
}

impl<'a, 'b> Sub<&'b Scalar> for &'a Scalar {
    type Output = Scalar;

    fn sub(self, rhs: &'b Scalar) -> Scalar {
        let mut ret = Scalar::ZERO;
        fiat_25519_scalar_sub(&mut ret.0, &self.0, &rhs.0);
        ret
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a Scalar {
    type Output = Scalar;

    fn mul(self, rhs: &'b Scalar) -> Scalar {
        let mut ret = Scalar::ZERO;
        fiat_25519_scalar_mul(&mut ret.0, &self.0, &rhs.0);
        ret
    }
}

impl<'a> Neg for &'a Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        let mut ret = Scalar::ZERO;
        fiat_25519_scalar_opp(&mut ret.0, &self.0);
        ret
    }
}
