//! Ed25519 signatures per [RFC 8032](https://www.rfc-editor.org/rfc/rfc8032), including the
//! Ed25519ctx and Ed25519ph variants and signatures under tweaked keys.
//!
//! A signature over `m` by the scalar `s` with nonce prefix `h` is `R || S` where:
//!
//! ```text
//! r = H(h || m)
//! R = [r]G
//! k = H(R || A || m)
//! S = r + k·s
//! ```
//!
//! For the prefixed variants each hash is preceded by `dom2(f, ctx)`.

use log::debug;
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use crate::edwards::{EdwardsPoint, G};
use crate::error::{Error, Result};
use crate::keys::{sha512, ExpandedKey};
use crate::scalar::Scalar;
use crate::tweak;

const DOM2_PREFIX: &[u8] = b"SigEd25519 no Ed25519 collisions";

/// The RFC 8032 variant under which messages are signed and verified.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Domain<'a> {
    dom2: Option<(u8, &'a [u8])>,
}

impl Domain<'static> {
    /// Plain Ed25519, with no domain separation.
    pub const PURE: Domain<'static> = Domain { dom2: None };
}

impl<'a> Domain<'a> {
    /// Ed25519ctx with the given context string of at most 255 bytes.
    pub fn context(ctx: &'a [u8]) -> Result<Domain<'a>> {
        Domain::with_flag(0, ctx)
    }

    /// Ed25519ph with the given context string of at most 255 bytes. Messages passed to
    /// [Domain::sign] and [Domain::verify] must be SHA-512 digests.
    pub fn prehashed(ctx: &'a [u8]) -> Result<Domain<'a>> {
        Domain::with_flag(1, ctx)
    }

    fn with_flag(flag: u8, ctx: &'a [u8]) -> Result<Domain<'a>> {
        if ctx.len() > 255 {
            return Err(Error::InvalidLength { what: "context", max: 255, actual: ctx.len() });
        }
        Ok(Domain { dom2: Some((flag, ctx)) })
    }

    /// Signs `m` with the key expanded from `seed`.
    #[must_use]
    pub fn sign(&self, m: &[u8], seed: &[u8; 32]) -> [u8; 64] {
        let key = ExpandedKey::from_seed(seed);
        let mut s = Scalar::from_bytes(key.scalar());
        let sig = self.sign_expanded(m, &s, key.prefix());
        s.zeroize();
        sig
    }

    /// Signs `m` with an externally managed scalar and nonce prefix.
    ///
    /// * `m`: the message to be signed
    /// * `scalar`: the signing scalar, reduced mod `L` before use
    /// * `prefix`: a secret value used to derive nonces, which must never be shared between
    ///   different scalars
    #[must_use]
    pub fn sign_with_scalar(&self, m: &[u8], scalar: &[u8; 32], prefix: &[u8; 32]) -> [u8; 64] {
        let mut s = Scalar::from_bytes(scalar);
        let sig = self.sign_expanded(m, &s, prefix);
        s.zeroize();
        sig
    }

    /// Signs `m` under the key `public_key_tweak_add(public_key_create(seed), tweak)`.
    pub fn sign_tweak_add(&self, m: &[u8], seed: &[u8; 32], tweak: &[u8; 32]) -> Result<[u8; 64]> {
        self.sign_tweaked(m, seed, tweak, tweak::add)
    }

    /// Signs `m` under the key `public_key_tweak_mul(public_key_create(seed), tweak)`.
    pub fn sign_tweak_mul(&self, m: &[u8], seed: &[u8; 32], tweak: &[u8; 32]) -> Result<[u8; 64]> {
        self.sign_tweaked(m, seed, tweak, tweak::mul)
    }

    /// Verifies `sig` over `m` by `pk`.
    ///
    /// Returns `false` if `pk` or `R` are not canonical point encodings, if `S` is not reduced mod
    /// `L`, or if `[S]G != R + [k]A`.
    #[must_use]
    pub fn verify(&self, m: &[u8], sig: &[u8; 64], pk: &[u8; 32]) -> bool {
        let (r_bytes, s_bytes) = split(sig);

        let a = match EdwardsPoint::from_bytes(pk) {
            Ok(a) => a,
            Err(e) => {
                debug!("rejecting signature with invalid public key: {}", e);
                return false;
            }
        };

        let r = match EdwardsPoint::from_bytes(&r_bytes) {
            Ok(r) => r,
            Err(e) => {
                debug!("rejecting signature with invalid R: {}", e);
                return false;
            }
        };

        let s = match Scalar::from_canonical_bytes(&s_bytes) {
            Some(s) => s,
            None => {
                debug!("rejecting signature with non-canonical S");
                return false;
            }
        };

        let k = Scalar::from_bytes_wide(&self.hash(&[&r_bytes, pk, m]));

        (&G * &s).as_bytes() == (&r + &(&a * &k)).as_bytes()
    }

    fn sign_tweaked(
        &self,
        m: &[u8],
        seed: &[u8; 32],
        tweak: &[u8; 32],
        op: impl FnOnce(&Scalar, &Scalar) -> Result<Scalar>,
    ) -> Result<[u8; 64]> {
        let key = ExpandedKey::from_seed(seed);
        let mut s = Scalar::from_bytes(key.scalar());
        let t = Scalar::from_bytes(tweak);
        let st = op(&s, &t);
        s.zeroize();
        let mut st = st?;

        // Tweaked keys get their own nonces.
        let mut h = sha512(&[key.prefix(), tweak]);
        let mut prefix = [0u8; 32];
        prefix.copy_from_slice(&h[..32]);

        let sig = self.sign_expanded(m, &st, &prefix);
        st.zeroize();
        h.zeroize();
        prefix.zeroize();
        Ok(sig)
    }

    fn sign_expanded(&self, m: &[u8], s: &Scalar, prefix: &[u8; 32]) -> [u8; 64] {
        let pk = (&G * s).as_bytes();

        let mut r = Scalar::from_bytes_wide(&self.hash(&[prefix, m]));
        let r_bytes = (&G * &r).as_bytes();
        let k = Scalar::from_bytes_wide(&self.hash(&[&r_bytes, &pk, m]));
        let s = &r + &(&k * s);
        r.zeroize();

        let mut sig = [0u8; 64];
        sig[..32].copy_from_slice(&r_bytes);
        sig[32..].copy_from_slice(&s.as_bytes());
        sig
    }

    /// SHA-512 over `dom2(f, ctx)` (if any) followed by `parts`.
    fn hash(&self, parts: &[&[u8]]) -> [u8; 64] {
        let mut h = Sha512::new();
        if let Some((flag, ctx)) = self.dom2 {
            h.update(DOM2_PREFIX);
            h.update([flag, ctx.len() as u8]);
            h.update(ctx);
        }
        for data in parts {
            h.update(data);
        }
        h.finalize().into()
    }
}

impl Default for Domain<'static> {
    fn default() -> Self {
        Domain::PURE
    }
}

/// Signs `m` with the Ed25519 key expanded from `seed`.
#[must_use]
pub fn sign(m: &[u8], seed: &[u8; 32]) -> [u8; 64] {
    Domain::PURE.sign(m, seed)
}

/// Signs `m` with an externally managed scalar and nonce prefix. See [Domain::sign_with_scalar].
#[must_use]
pub fn sign_with_scalar(m: &[u8], scalar: &[u8; 32], prefix: &[u8; 32]) -> [u8; 64] {
    Domain::PURE.sign_with_scalar(m, scalar, prefix)
}

/// Signs `m` under the additively tweaked key of `seed`.
pub fn sign_tweak_add(m: &[u8], seed: &[u8; 32], tweak: &[u8; 32]) -> Result<[u8; 64]> {
    Domain::PURE.sign_tweak_add(m, seed, tweak)
}

/// Signs `m` under the multiplicatively tweaked key of `seed`.
pub fn sign_tweak_mul(m: &[u8], seed: &[u8; 32], tweak: &[u8; 32]) -> Result<[u8; 64]> {
    Domain::PURE.sign_tweak_mul(m, seed, tweak)
}

/// Verifies an Ed25519 signature. See [Domain::verify].
#[must_use]
pub fn verify(m: &[u8], sig: &[u8; 64], pk: &[u8; 32]) -> bool {
    Domain::PURE.verify(m, sig, pk)
}

fn split(sig: &[u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig[..32]);
    s.copy_from_slice(&sig[32..]);
    (r, s)
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use rand::{thread_rng, Rng};

    use super::*;
    use crate::keys::{public_key_create, public_key_from_scalar};
    use crate::scalar::L;
    use crate::tweak::{public_key_tweak_add, public_key_tweak_mul};

    #[test]
    fn rfc8032_ed25519() {
        let vectors: [([u8; 32], [u8; 32], &[u8], [u8; 64]); 3] = [
            (
                hex!("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60"),
                hex!("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"),
                &[],
                hex!(
                    "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
                ),
            ),
            (
                hex!("4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb"),
                hex!("3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c"),
                &hex!("72"),
                hex!(
                    "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00"
                ),
            ),
            (
                hex!("c5aa8df43f9f837bedb7442f31dcb7b166d38535076f094b85ce3a2e0b4458f7"),
                hex!("fc51cd8e6218a1a38da47ed00230f0580816ed13ba3303ac5deb911548908025"),
                &hex!("af82"),
                hex!(
                    "6291d657deec24024827e69c3abe01a30ce548a284743a445e3680d7db5ac3ac18ff9b538d16f290ae67f760984dc6594a7c15e9716ed28dc027beceea1ec40a"
                ),
            ),
        ];

        for (seed, pk, m, sig) in vectors {
            assert_eq!(sign(m, &seed), sig);
            assert!(verify(m, &sig, &pk));
        }
    }

    #[test]
    fn rfc8032_ed25519ctx() {
        let seed = hex!("0305334e381af78f141cb666f6199f57bc3495335a256a95bd2a55bf546663f6");
        let pk = hex!("dfc9425e4f968f7f0c29f0259cf5f9aed6851c2bb4ad8bfb860cfee0ab248292");
        let m = hex!("f726936d19c800494e3fdaff20b276a8");
        let sig = hex!(
            "55a4cc2f70a54e04288c5f4cd1e45a7bb520b36292911876cada7323198dd87a8b36950b95130022907a7fb7c4e9b2d5f6cca685a587b4b21f4b888e4e7edb0d"
        );

        let domain = Domain::context(b"foo").expect("short context");
        assert_eq!(public_key_create(&seed), pk);
        assert_eq!(domain.sign(&m, &seed), sig);
        assert!(domain.verify(&m, &sig, &pk));

        assert!(!verify(&m, &sig, &pk));
        assert!(!Domain::context(b"bar").unwrap().verify(&m, &sig, &pk));
        assert!(!Domain::prehashed(b"foo").unwrap().verify(&m, &sig, &pk));
    }

    #[test]
    fn rfc8032_ed25519ph() {
        let seed = hex!("833fe62409237b9d62ec77587520911e9a759cec1d19755b7da901b96dca3d42");
        let pk = hex!("ec172b93ad5e563bf4932c70e1245034c35467ef2efd4d64ebf819683467e2bf");
        let sig = hex!(
            "98a70222f0b8121aa9d30f813d683f809e462b469c7ff87639499bb94e6dae4131f85042463c2a355a2003d062adf5aaa10b8c61e636062aaad11c2a26083406"
        );
        let digest = sha512(&[b"abc"]);

        let domain = Domain::prehashed(&[]).expect("empty context");
        assert_eq!(public_key_create(&seed), pk);
        assert_eq!(domain.sign(&digest, &seed), sig);
        assert!(domain.verify(&digest, &sig, &pk));
        assert!(!domain.verify(b"abc", &sig, &pk));
    }

    #[test]
    fn context_too_long() {
        assert!(Domain::context(&[0u8; 255]).is_ok());
        assert_eq!(
            Domain::context(&[0u8; 256]),
            Err(Error::InvalidLength { what: "context", max: 255, actual: 256 })
        );
        assert!(Domain::prehashed(&[0u8; 300]).is_err());
    }

    #[test]
    fn zero_seed() {
        let seed = [0u8; 32];
        let sig = sign(b"", &seed);

        assert_eq!(
            sig,
            hex!(
                "8f895b3cafe2c9506039d0e2a66382568004674fe8d237785092e40d6aaf483e4fc60168705f31f101596138ce21aa357c0d32a064f423dc3ee4aa3abf53f803"
            )
        );
        assert!(verify(b"", &sig, &public_key_create(&seed)));
    }

    #[test]
    fn sign_round_trip() {
        for _ in 0..100 {
            let seed_a = thread_rng().gen();
            let seed_b = thread_rng().gen();
            let pk_a = public_key_create(&seed_a);
            let pk_b = public_key_create(&seed_b);

            let message = b"this is a message";
            let sig = sign(message, &seed_a);

            assert!(verify(message, &sig, &pk_a));
            assert!(!verify(message, &sig, &pk_b));
            assert!(!verify(b"this is a different message", &sig, &pk_a));
        }
    }

    #[test]
    fn bit_flips_are_rejected() {
        let seed = thread_rng().gen();
        let pk = public_key_create(&seed);
        let message: [u8; 16] = thread_rng().gen();
        let sig = sign(&message, &seed);

        for i in 0..sig.len() * 8 {
            let mut sig_p = sig;
            sig_p[i >> 3] ^= 1 << (i & 7);
            assert!(!verify(&message, &sig_p, &pk), "flipped signature bit {}", i);
        }

        for i in 0..message.len() * 8 {
            let mut message_p = message;
            message_p[i >> 3] ^= 1 << (i & 7);
            assert!(!verify(&message_p, &sig, &pk), "flipped message bit {}", i);
        }
    }

    #[test]
    fn deterministic() {
        let seed = thread_rng().gen();

        assert_eq!(sign(b"one", &seed), sign(b"one", &seed));
        assert_ne!(sign(b"one", &seed), sign(b"two", &seed));
    }

    #[test]
    fn non_canonical_s_is_rejected() {
        let seed = thread_rng().gen();
        let pk = public_key_create(&seed);
        let sig = sign(b"malleable", &seed);

        // S + L satisfies the verification equation but is not reduced.
        let mut sig_p = sig;
        let mut carry = 0u16;
        for (b, l) in sig_p[32..].iter_mut().zip(L.iter()) {
            let sum = *b as u16 + *l as u16 + carry;
            *b = sum as u8;
            carry = sum >> 8;
        }

        assert!(verify(b"malleable", &sig, &pk));
        assert!(!verify(b"malleable", &sig_p, &pk));
    }

    #[test]
    fn invalid_encodings_are_rejected() {
        let seed = thread_rng().gen();
        let pk = public_key_create(&seed);
        let sig = sign(b"message", &seed);

        let mut off_curve = [0u8; 32];
        off_curve[0] = 2;
        assert!(!verify(b"message", &sig, &off_curve));

        let mut sig_p = sig;
        sig_p[..32].copy_from_slice(&off_curve);
        assert!(!verify(b"message", &sig_p, &pk));
    }

    #[test]
    fn sign_with_scalar_round_trip() {
        for _ in 0..20 {
            let scalar = thread_rng().gen();
            let prefix = thread_rng().gen();
            let pk = public_key_from_scalar(&scalar);

            let sig = sign_with_scalar(b"message", &scalar, &prefix);
            assert!(verify(b"message", &sig, &pk));
            assert_eq!(sig, sign_with_scalar(b"message", &scalar, &prefix));
        }
    }

    #[test]
    fn sign_with_expanded_key_matches_sign() {
        let seed = thread_rng().gen();
        let key = ExpandedKey::from_seed(&seed);

        assert_eq!(sign_with_scalar(b"message", key.scalar(), key.prefix()), sign(b"message", &seed));
    }

    #[test]
    fn tweaked_signatures() {
        for _ in 0..20 {
            let seed = thread_rng().gen();
            let tweak = thread_rng().gen();
            let pk = public_key_create(&seed);

            let pk_add = public_key_tweak_add(&pk, &tweak).unwrap();
            let sig = sign_tweak_add(b"message", &seed, &tweak).unwrap();
            assert!(verify(b"message", &sig, &pk_add));
            assert!(!verify(b"message", &sig, &pk));

            let pk_mul = public_key_tweak_mul(&pk, &tweak).unwrap();
            let sig = sign_tweak_mul(b"message", &seed, &tweak).unwrap();
            assert!(verify(b"message", &sig, &pk_mul));
            assert!(!verify(b"message", &sig, &pk));
        }
    }

    #[test]
    fn tweaked_signatures_use_fresh_nonces() {
        let seed = thread_rng().gen();
        let sig = sign(b"message", &seed);
        let sig_t = sign_tweak_mul(b"message", &seed, &Scalar::ONE.as_bytes()).unwrap();

        // Same key, same message, different nonce.
        assert_ne!(sig[..32], sig_t[..32]);
        assert!(verify(b"message", &sig_t, &public_key_create(&seed)));
    }

    #[test]
    fn degenerate_tweak() {
        let seed = thread_rng().gen();
        assert_eq!(sign_tweak_mul(b"message", &seed, &[0u8; 32]), Err(Error::DegenerateResult));
    }

    #[test]
    fn tweaked_context_signatures() {
        let seed = thread_rng().gen();
        let tweak = thread_rng().gen();
        let domain = Domain::context(b"tweaked").unwrap();

        let pk = public_key_tweak_add(&public_key_create(&seed), &tweak).unwrap();
        let sig = domain.sign_tweak_add(b"message", &seed, &tweak).unwrap();

        assert!(domain.verify(b"message", &sig, &pk));
        assert!(!verify(b"message", &sig, &pk));
    }
}
