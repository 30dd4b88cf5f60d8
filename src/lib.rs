//! edx25519 provides a small, portable implementation of
//! [Ed25519](https://www.rfc-editor.org/rfc/rfc8032) signatures, additive and multiplicative key
//! tweaking, and Diffie-Hellman key agreement over Edwards25519 and
//! [X25519](https://www.rfc-editor.org/rfc/rfc7748), all on one constant-time Curve25519 core.
//!
//! Every operation takes and returns fixed-size little-endian byte arrays:
//!
//! ```
//! let seed = [7u8; 32];
//! let pk = edx25519::public_key_create(&seed);
//! let sig = edx25519::sign(b"hello", &seed);
//! assert!(edx25519::verify(b"hello", &sig, &pk));
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use crate::eddsa::{sign, sign_tweak_add, sign_tweak_mul, sign_with_scalar, verify, Domain};
pub use crate::error::{Error, Result};
pub use crate::exchange::{
    derive, derive_with_scalar, exchange, exchange_with_scalar, x25519, x25519_base,
};
pub use crate::keys::{
    private_key_convert, private_key_generate, public_key_convert, public_key_create,
    public_key_deconvert, public_key_from_scalar, public_key_verify, scalar_clamp,
    scalar_generate, scalar_verify, ExpandedKey,
};
pub use crate::tweak::{
    public_key_tweak_add, public_key_tweak_mul, scalar_tweak_add, scalar_tweak_mul,
};

mod eddsa;
mod edwards;
mod error;
mod exchange;
mod field;
mod keys;
mod montgomery;
mod scalar;
mod tweak;

/// Cryptographic functionality which will let you do stupid things to yourself.
pub mod hazmat {
    pub use crate::edwards::{EdwardsPoint, G};
    pub use crate::field::FieldElement;
    pub use crate::montgomery::MontgomeryPoint;
    pub use crate::scalar::{clamp, is_clamped, Scalar};
}
