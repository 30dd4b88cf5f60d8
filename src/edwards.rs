//! The twisted Edwards curve `-x^2 + y^2 = 1 + d·x^2·y^2` (Edwards25519).
//!
//! Points are held in extended coordinates `(X:Y:Z:T)` with `x = X/Z`, `y = Y/Z` and `xy = T/Z`,
//! so group operations need no inversions; encoding performs exactly one.

use core::ops::{Add, Mul, Neg, Sub};

use log::trace;
use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::montgomery::MontgomeryPoint;
use crate::scalar::{self, Scalar};

/// The Ed25519 base point, `(x, 4/5)` with `x` positive.
pub const G: EdwardsPoint = EdwardsPoint {
    x: FieldElement([
        0x62d608f25d51a,
        0x412a4b4f6592a,
        0x75b7171a4b31d,
        0x1ff60527118fe,
        0x216936d3cd6e5,
    ]),
    y: FieldElement([
        0x6666666666658,
        0x4cccccccccccc,
        0x1999999999999,
        0x3333333333333,
        0x6666666666666,
    ]),
    z: FieldElement::ONE,
    t: FieldElement([
        0x68ab3a5b7dda3,
        0x00eea2a5eadbb,
        0x2af8df483c27e,
        0x332b375274732,
        0x67875f0fd78b7,
    ]),
};

/// A point on Edwards25519.
#[derive(Debug, Copy, Clone)]
pub struct EdwardsPoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    t: FieldElement,
}

impl EdwardsPoint {
    /// The neutral element `(0, 1)`.
    pub const IDENTITY: EdwardsPoint = EdwardsPoint {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
        t: FieldElement::ZERO,
    };

    /// Decodes a point from its 32-byte encoding (255-bit `y` plus the sign of `x` in bit 255).
    ///
    /// Fails with [Error::InvalidEncoding] if no `x` satisfies the curve equation and with
    /// [Error::NonCanonicalEncoding] if `y >= p` or if `x = 0` is encoded with the sign bit set.
    /// Every check is evaluated before either error is chosen.
    pub fn from_bytes(b: &[u8; 32]) -> Result<EdwardsPoint> {
        let sign = Choice::from(b[31] >> 7);
        let mut y_bytes = *b;
        y_bytes[31] &= 127;

        let y = FieldElement::from_bytes(&y_bytes);
        let y_canonical = y.to_bytes().ct_eq(&y_bytes);

        // x^2 = (y^2 - 1) / (d·y^2 + 1)
        let yy = y.square();
        let u = &yy - &FieldElement::ONE;
        let v = &(&yy * &FieldElement::D) + &FieldElement::ONE;
        let (is_square, mut x) = FieldElement::sqrt_ratio(&u, &v);

        let negative_zero = x.is_zero() & sign;
        x.conditional_negate(sign);

        if !bool::from(is_square) {
            trace!("rejecting point encoding with no valid x-coordinate");
            return Err(Error::InvalidEncoding);
        }

        if !bool::from(y_canonical & !negative_zero) {
            trace!("rejecting non-canonical point encoding");
            return Err(Error::NonCanonicalEncoding);
        }

        Ok(EdwardsPoint { x, y, z: FieldElement::ONE, t: &x * &y })
    }

    /// Returns the canonical 32-byte encoding of the point.
    pub fn as_bytes(&self) -> [u8; 32] {
        let z_inv = self.z.invert();
        let x = &self.x * &z_inv;
        let y = &self.y * &z_inv;

        let mut b = y.to_bytes();
        b[31] ^= x.is_negative().unwrap_u8() << 7;
        b
    }

    /// Returns `2·self`.
    pub fn double(&self) -> EdwardsPoint {
        // dbl-2008-hwcd with a = -1
        let a = self.x.square();
        let b = self.y.square();
        let c = self.z.square();
        let c = &c + &c;
        let d = -&a;
        let e = &(&(&self.x + &self.y).square() - &a) - &b;
        let g = &d + &b;
        let f = &g - &c;
        let h = &d - &b;

        EdwardsPoint { x: &e * &f, y: &g * &h, z: &f * &g, t: &e * &h }
    }

    /// Returns `[8]self`, clearing any torsion component.
    pub fn mul_by_cofactor(&self) -> EdwardsPoint {
        self.double().double().double()
    }

    /// Returns 1 if the coordinates satisfy the curve equation `-X^2 + Y^2 = Z^2 + d·T^2` and
    /// `XY = ZT` with `Z != 0`.
    pub fn is_on_curve(&self) -> Choice {
        let xx = self.x.square();
        let yy = self.y.square();
        let zz = self.z.square();
        let dtt = &FieldElement::D * &self.t.square();

        (&yy - &xx).ct_eq(&(&zz + &dtt))
            & (&self.x * &self.y).ct_eq(&(&self.z * &self.t))
            & !self.z.is_zero()
    }

    /// Returns 1 if the point is the neutral element.
    pub fn is_identity(&self) -> Choice {
        self.ct_eq(&EdwardsPoint::IDENTITY)
    }

    /// Returns 1 if the point lies in the torsion subgroup of order dividing 8. Exchange paths
    /// reject such peer keys.
    pub fn is_small_order(&self) -> Choice {
        self.mul_by_cofactor().is_identity()
    }

    /// Returns 1 if the point lies in the prime-order subgroup generated by [G].
    pub fn is_torsion_free(&self) -> Choice {
        self.mul_bits(&scalar::L).is_identity()
    }

    /// Maps the point to the u-coordinate of the birationally equivalent Curve25519 point,
    /// `u = (1 + y) / (1 - y)`. The identity maps to `u = 0`.
    pub fn to_montgomery(&self) -> MontgomeryPoint {
        let u = &(&self.z + &self.y) * &(&self.z - &self.y).invert();
        MontgomeryPoint(u.to_bytes())
    }

    /// Multiplies by the 256-bit little-endian integer `k`. Every bit costs one doubling, one
    /// addition and one constant-time select, whatever its value.
    pub(crate) fn mul_bits(&self, k: &[u8; 32]) -> EdwardsPoint {
        let mut acc = EdwardsPoint::IDENTITY;
        for idx in (0..256).rev() {
            let bit = Choice::from((k[idx >> 3] >> (idx & 7)) & 1);
            acc = acc.double();
            let sum = &acc + self;
            acc.conditional_assign(&sum, bit);
        }
        acc
    }
}

impl Default for EdwardsPoint {
    fn default() -> Self {
        EdwardsPoint::IDENTITY
    }
}

impl ConstantTimeEq for EdwardsPoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // Compare affine coordinates without inverting: X1/Z1 = X2/Z2 and Y1/Z1 = Y2/Z2.
        (&self.x * &other.z).ct_eq(&(&other.x * &self.z))
            & (&self.y * &other.z).ct_eq(&(&other.y * &self.z))
    }
}

impl PartialEq for EdwardsPoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for EdwardsPoint {}

impl ConditionallySelectable for EdwardsPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        EdwardsPoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
            t: FieldElement::conditional_select(&a.t, &b.t, choice),
        }
    }
}

impl<'a, 'b> Add<&'b EdwardsPoint> for &'a EdwardsPoint {
    type Output = EdwardsPoint;

    /// Unified addition (add-2008-hwcd-3), complete on Edwards25519.
    fn add(self, rhs: &'b EdwardsPoint) -> EdwardsPoint {
        let a = &(&self.y - &self.x) * &(&rhs.y - &rhs.x);
        let b = &(&self.y + &self.x) * &(&rhs.y + &rhs.x);
        let c = &(&self.t * &FieldElement::D2) * &rhs.t;
        let d = &self.z * &rhs.z;
        let d = &d + &d;
        let e = &b - &a;
        let f = &d - &c;
        let g = &d + &c;
        let h = &b + &a;

        EdwardsPoint { x: &e * &f, y: &g * &h, z: &f * &g, t: &e * &h }
    }
}

impl<'a, 'b> Sub<&'b EdwardsPoint> for &'a EdwardsPoint {
    type Output = EdwardsPoint;

    fn sub(self, rhs: &'b EdwardsPoint) -> EdwardsPoint {
        self + &(-rhs)
    }
}

impl<'a> Neg for &'a EdwardsPoint {
    type Output = EdwardsPoint;

    fn neg(self) -> EdwardsPoint {
        EdwardsPoint { x: -&self.x, y: self.y, z: self.z, t: -&self.t }
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a EdwardsPoint {
    type Output = EdwardsPoint;

    /// Constant-time scalar multiplication.
    fn mul(self, rhs: &'b Scalar) -> EdwardsPoint {
        self.mul_bits(&rhs.as_bytes())
    }
}
