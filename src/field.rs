//! Arithmetic in GF(2^255 - 19), backed by fiat-crypto's verified 64-bit routines.

use core::ops::{Add, Mul, Neg, Sub};

use fiat_crypto::curve25519_64::*;
use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// An element of the field GF(2^255 - 19), held as five 51-bit limbs in fiat-crypto's tight
/// representation. Limbs are not necessarily reduced; [FieldElement::to_bytes] is canonical.
#[derive(Debug, Copy, Clone)]
pub struct FieldElement(pub(crate) [u64; 5]);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: FieldElement = FieldElement([0, 0, 0, 0, 0]);

    /// The multiplicative identity.
    pub const ONE: FieldElement = FieldElement([1, 0, 0, 0, 0]);

    /// Edwards curve constant `d = -121665/121666`.
    pub(crate) const D: FieldElement = FieldElement([
        0x34dca135978a3,
        0x1a8283b156ebd,
        0x5e7a26001c029,
        0x739c663a03cbb,
        0x52036cee2b6ff,
    ]);

    /// `2d`, used by the extended-coordinate addition law.
    pub(crate) const D2: FieldElement = FieldElement([
        0x69b9426b2f159,
        0x35050762add7a,
        0x3cf44c0038052,
        0x6738cc7407977,
        0x2406d9dc56dff,
    ]);

    /// `sqrt(-1) = 2^((p-1)/4)`.
    pub(crate) const SQRT_M1: FieldElement = FieldElement([
        0x61b274a0ea0b0,
        0x0d5a5fc8f189d,
        0x7ef5e9cbd0c60,
        0x78595a6804c9e,
        0x2b8324804fc1d,
    ]);

    /// Decodes a little-endian field element. Bit 255 is ignored; values in `[p, 2^255)` are
    /// accepted and reduced, so callers which need canonical input must check
    /// `to_bytes(from_bytes(b)) == b` themselves.
    #[inline]
    pub fn from_bytes(b: &[u8; 32]) -> FieldElement {
        let mut b = *b;
        b[31] &= 127;

        let mut ret = FieldElement::ZERO;
        fiat_25519_from_bytes(&mut ret.0, &b);
        ret
    }

    /// Returns the canonical little-endian encoding, fully reduced mod p.
    #[inline]
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut ret = [0u8; 32];
        fiat_25519_to_bytes(&mut ret, &self.0);
        ret
    }

    /// Returns `self^2`.
    #[inline]
    pub fn square(&self) -> FieldElement {
        let mut ret = FieldElement::ZERO;
        fiat_25519_carry_square(&mut ret.0, &self.0);
        ret
    }

    /// Returns `self^(2^k)` for `k > 0`.
    pub fn pow2k(&self, k: u32) -> FieldElement {
        debug_assert!(k > 0);
        let mut ret = self.square();
        for _ in 1..k {
            ret = ret.square();
        }
        ret
    }

    /// Returns `121666 * self`, the ladder constant `(A + 2) / 4` for Curve25519.
    #[inline]
    pub(crate) fn mul121666(&self) -> FieldElement {
        let mut ret = FieldElement::ZERO;
        fiat_25519_carry_scmul_121666(&mut ret.0, &self.0);
        ret
    }

    /// Returns `(self^(2^250 - 1), self^11)`, the shared prefix of the inversion and square root
    /// addition chains.
    fn pow22501(&self) -> (FieldElement, FieldElement) {
        let z2 = self.square(); // 2
        let z9 = &z2.pow2k(2) * self; // 9
        let z11 = &z9 * &z2; // 11
        let z2_5_0 = &z11.square() * &z9; // 2^5 - 2^0 = 31
        let z2_10_0 = &z2_5_0.pow2k(5) * &z2_5_0; // 2^10 - 2^0
        let z2_20_0 = &z2_10_0.pow2k(10) * &z2_10_0; // 2^20 - 2^0
        let z2_40_0 = &z2_20_0.pow2k(20) * &z2_20_0; // 2^40 - 2^0
        let z2_50_0 = &z2_40_0.pow2k(10) * &z2_10_0; // 2^50 - 2^0
        let z2_100_0 = &z2_50_0.pow2k(50) * &z2_50_0; // 2^100 - 2^0
        let z2_200_0 = &z2_100_0.pow2k(100) * &z2_100_0; // 2^200 - 2^0
        let z2_250_0 = &z2_200_0.pow2k(50) * &z2_50_0; // 2^250 - 2^0

        (z2_250_0, z11)
    }

    /// Returns `self^(p-2)`, the multiplicative inverse by Fermat's little theorem. The inverse of
    /// zero is zero.
    pub fn invert(&self) -> FieldElement {
        let (t, z11) = self.pow22501();
        // 2^255 - 2^5 + 11 = 2^255 - 21
        &t.pow2k(5) * &z11
    }

    /// Returns `self^((p-5)/8) = self^(2^252 - 3)`.
    fn pow_p58(&self) -> FieldElement {
        let (t, _) = self.pow22501();
        &t.pow2k(2) * self
    }

    /// Computes the non-negative square root of `u/v` using the `p = 5 (mod 8)` method.
    ///
    /// Returns `(1, sqrt(u/v))` if `u/v` is a square (including `u = 0`), and `(0, garbage)`
    /// otherwise, including when `v = 0` and `u != 0`. Runs in constant time.
    pub fn sqrt_ratio(u: &FieldElement, v: &FieldElement) -> (Choice, FieldElement) {
        let v3 = &v.square() * v;
        let v7 = &v3.square() * v;
        let mut r = &(u * &v3) * &(u * &v7).pow_p58();
        let check = v * &r.square();

        let neg_u = -u;
        let correct_sign = check.ct_eq(u);
        let flipped_sign = check.ct_eq(&neg_u);
        let flipped_sign_i = check.ct_eq(&(&neg_u * &FieldElement::SQRT_M1));

        let r_prime = &r * &FieldElement::SQRT_M1;
        r.conditional_assign(&r_prime, flipped_sign | flipped_sign_i);

        let r_is_negative = r.is_negative();
        r.conditional_negate(r_is_negative);

        (correct_sign | flipped_sign, r)
    }

    /// Returns 1 if the canonical encoding is odd (the Ed25519 "negative" convention).
    #[inline]
    pub fn is_negative(&self) -> Choice {
        (self.to_bytes()[0] & 1).into()
    }

    /// Returns 1 if the element is zero mod p.
    #[inline]
    pub fn is_zero(&self) -> Choice {
        self.to_bytes().ct_eq(&[0u8; 32])
    }
}

impl Default for FieldElement {
    fn default() -> Self {
        FieldElement::ZERO
    }
}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl ConditionallySelectable for FieldElement {
    #[inline]
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut ret = FieldElement::ZERO;
        fiat_25519_selectznz(&mut ret.0, choice.unwrap_u8(), &a.0, &b.0);
        ret
    }
}

impl<'a, 'b> Add<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    #[inline]
    fn add(self, rhs: &'b FieldElement) -> FieldElement {
        let mut loose = [0u64; 5];
        fiat_25519_add(&mut loose, &self.0, &rhs.0);
        let mut ret = FieldElement::ZERO;
        fiat_25519_carry(&mut ret.0, &loose);
        ret
    }
}

impl<'a, 'b> Sub<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    #[inline]
    fn sub(self, rhs: &'b FieldElement) -> FieldElement {
        let mut loose = [0u64; 5];
        fiat_25519_sub(&mut loose, &self.0, &rhs.0);
        let mut ret = FieldElement::ZERO;
        fiat_25519_carry(&mut ret.0, &loose);
        ret
    }
}

impl<'a, 'b> Mul<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    #[inline]
    fn mul(self, rhs: &'b FieldElement) -> FieldElement {
        let mut ret = FieldElement::ZERO;
        fiat_25519_carry_mul(&mut ret.0, &self.0, &rhs.0);
        ret
    }
}

impl<'a> Neg for &'a FieldElement {
    type Output = FieldElement;

    #[inline]
    fn neg(self) -> FieldElement {
        let mut loose = [0u64; 5];
        fiat_25519_opp(&mut loose, &self.0);
        let mut ret = FieldElement::ZERO;
        fiat_25519_carry(&mut ret.0, &loose);
        ret
    }
}
