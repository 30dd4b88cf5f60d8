//! The Montgomery form of Curve25519, `v^2 = u^3 + 486662·u^2 + u`, in u-coordinates only.

use log::trace;
use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroize;

use crate::edwards::EdwardsPoint;
use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::scalar;

/// The little-endian u-coordinate of a point on Curve25519 or its twist.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MontgomeryPoint(pub [u8; 32]);

impl MontgomeryPoint {
    /// The X25519 base point, `u = 9`.
    pub const BASEPOINT: MontgomeryPoint = MontgomeryPoint([
        9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0,
    ]);

    /// Returns the encoded u-coordinate.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Clamps `k` and returns `[k]self`. Bit 255 of the u-coordinate is ignored.
    #[must_use]
    pub fn mul_clamped(&self, k: &[u8; 32]) -> MontgomeryPoint {
        let mut k = scalar::clamp(k);
        let u = ladder(&FieldElement::from_bytes(&self.0), &k);
        k.zeroize();
        MontgomeryPoint(u.to_bytes())
    }

    /// Maps the u-coordinate back to Edwards25519 via `y = (u - 1) / (u + 1)`, choosing the `x`
    /// whose sign matches `sign`. For `u = 0` the image `(0, -1)` has `x = 0` and `sign` is
    /// ignored.
    ///
    /// Fails with [Error::InvalidEncoding] if `u = -1` or if `u` lies on the quadratic twist.
    pub fn to_edwards(&self, sign: bool) -> Result<EdwardsPoint> {
        let u = FieldElement::from_bytes(&self.0);
        let u_plus_one = &u + &FieldElement::ONE;
        if bool::from(u_plus_one.is_zero()) {
            trace!("rejecting u = -1, which has no Edwards image");
            return Err(Error::InvalidEncoding);
        }

        // y = -1 is the only image with x = 0.
        let sign = Choice::from(sign as u8) & !u.is_zero();
        let y = &(&u - &FieldElement::ONE) * &u_plus_one.invert();
        let mut b = y.to_bytes();
        b[31] |= sign.unwrap_u8() << 7;

        EdwardsPoint::from_bytes(&b)
    }
}

// Montgomery ladder computing [n]xp via repeated differential additions and constant-time
// conditional swaps. Bit 255 of n is never read, so n must be clamped.
fn ladder(xp: &FieldElement, n: &[u8; 32]) -> FieldElement {
    let mut x2 = FieldElement::ONE;
    let mut z2 = FieldElement::ZERO;
    let mut x3 = *xp;
    let mut z3 = FieldElement::ONE;
    let mut swap = Choice::from(0);

    for idx in (0..=254).rev() {
        let bit = Choice::from((n[idx >> 3] >> (idx & 7)) & 1);
        swap ^= bit;
        FieldElement::conditional_swap(&mut x2, &mut x3, swap);
        FieldElement::conditional_swap(&mut z2, &mut z3, swap);
        swap = bit;

        let d = &x3 - &z3;
        let b = &x2 - &z2;
        let a = &x2 + &z2;
        let c = &x3 + &z3;
        let da = &d * &a;
        let cb = &c * &b;
        let bb = b.square();
        let aa = a.square();
        let e = &aa - &bb;

        x2 = &aa * &bb;
        z2 = &e * &(&bb + &e.mul121666());
        x3 = (&da + &cb).square();
        z3 = xp * &(&da - &cb).square();
    }

    FieldElement::conditional_swap(&mut x2, &mut x3, swap);
    FieldElement::conditional_swap(&mut z2, &mut z3, swap);

    &x2 * &z2.invert()
}
