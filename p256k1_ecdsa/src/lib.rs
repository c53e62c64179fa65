//! Bitcoin-compatible ECDSA signatures over secp256k1.
//!
//! Signing uses RFC6979 nonces by default and always produces low-S
//! signatures. Verification accepts high-S signatures unless
//! [`Ecdsa::enforce_low_s`] is used.
//!
//! ```
//! use p256k1::{Context, SecretKey, PublicKey};
//! use p256k1_ecdsa::Ecdsa;
//! let ctx = Context::new();
//! let ecdsa = Ecdsa::rfc6979();
//! let secret_key = SecretKey::random(&mut rand::thread_rng());
//! let public_key = PublicKey::from_secret_key(&ctx, &secret_key);
//! let message = [42u8; 32];
//! let signature = ecdsa.sign(&ctx, &message, &secret_key).unwrap();
//! assert!(ecdsa.verify(&ctx, &message, &signature, &public_key));
//! ```
#![no_std]
#![allow(non_snake_case)]
#![warn(missing_docs)]

#[cfg_attr(test, macro_use)]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub use p256k1;
use p256k1::{
    Context, Error, Point, PublicKey, Scalar, SecretKey,
    group::{Ge, Gej},
    nonce::{NonceFn, Rfc6979},
};

mod signature;
pub use signature::{MAX_DER_LEN, SerializedDer, Signature};

/// How many nonces [`Ecdsa::sign`] tries before giving up.
///
/// With [`Rfc6979`] a retry happens with probability around `2^-128`, so
/// reaching this limit means the nonce function is broken.
pub const MAX_NONCE_ATTEMPTS: u32 = 64;

/// An instance of the ECDSA signature scheme.
#[derive(Clone, Debug, Default)]
pub struct Ecdsa<NF = Rfc6979> {
    /// Produces the signing nonces.
    pub nonce_fn: NF,
    /// Whether the verify algorithm should reject signatures whose `s` is
    /// high (see [BIP-146]).
    ///
    /// [BIP-146]: https://github.com/bitcoin/bips/blob/master/bip-0146.mediawiki#low_s
    pub enforce_low_s: bool,
}

impl<NF> Ecdsa<NF> {
    /// Creates an instance with a custom nonce function.
    pub fn new(nonce_fn: NF) -> Self {
        Ecdsa {
            nonce_fn,
            enforce_low_s: false,
        }
    }

    /// Transforms the ECDSA instance into one which enforces the [BIP-146] low s constraint.
    ///
    /// [BIP-146]: https://github.com/bitcoin/bips/blob/master/bip-0146.mediawiki#low_s
    pub fn enforce_low_s(self) -> Self {
        Ecdsa {
            nonce_fn: self.nonce_fn,
            enforce_low_s: true,
        }
    }

    /// Verify an ECDSA signature on a 32-byte message hash.
    ///
    /// Rejects signatures with a zero component and, when
    /// [`enforce_low_s`](Ecdsa::enforce_low_s) is set, those with a high `s`.
    pub fn verify(
        &self,
        ctx: &Context,
        message: &[u8; 32],
        signature: &Signature,
        public_key: &PublicKey,
    ) -> bool {
        let (R_x, s) = signature.as_tuple();
        if bool::from(R_x.is_zero() | s.is_zero()) {
            tracing::trace!("rejecting ECDSA signature with zero component");
            return false;
        }
        // This ensures that there is only one valid s value per R_x for any given message.
        if self.enforce_low_s && bool::from(s.is_high()) {
            tracing::trace!("rejecting ECDSA signature with high s");
            return false;
        }

        let m = Scalar::from_bytes_mod_order(*message);
        let s_inv = s.invert();
        let u1 = &m * &s_inv;
        let u2 = R_x * &s_inv;

        let implied_R = Point::from(ctx.ecmult().ecmult(
            &Gej::from_ge(public_key.as_ge()),
            &u2,
            &u1,
        ));
        if implied_R.is_identity() {
            tracing::trace!("rejecting ECDSA signature with implied nonce at infinity");
            return false;
        }
        let valid = implied_R.x_eq_scalar(R_x);
        if !valid {
            tracing::trace!("ECDSA signature does not match");
        }
        valid
    }
}

impl Ecdsa<Rfc6979> {
    /// An instance with [`Rfc6979`] nonces that doesn't enforce low s on
    /// verification.
    pub fn rfc6979() -> Self {
        Self::new(Rfc6979)
    }
}

impl<NF: NonceFn> Ecdsa<NF> {
    /// Deterministically produce a low-S ECDSA signature on a message hash.
    ///
    /// # Examples
    ///
    /// ```
    /// use p256k1::{Context, SecretKey};
    /// use p256k1_ecdsa::Ecdsa;
    /// use sha2::Digest;
    ///
    /// let ctx = Context::new();
    /// let secret_key = SecretKey::random(&mut rand::thread_rng());
    /// let ecdsa = Ecdsa::rfc6979();
    /// let message_hash: [u8; 32] = sha2::Sha256::digest(b"Attack at dawn").into();
    /// let signature = ecdsa.sign(&ctx, &message_hash, &secret_key).unwrap();
    /// assert!(signature.is_low_s());
    /// ```
    pub fn sign(
        &self,
        ctx: &Context,
        message: &[u8; 32],
        secret_key: &SecretKey,
    ) -> Result<Signature, Error> {
        self.sign_inner(ctx, message, secret_key, None)
    }

    /// Like [`sign`](Ecdsa::sign) with extra data mixed into nonce
    /// generation, for example fresh randomness.
    pub fn sign_with_extra_data(
        &self,
        ctx: &Context,
        message: &[u8; 32],
        secret_key: &SecretKey,
        extra_data: &[u8; 32],
    ) -> Result<Signature, Error> {
        self.sign_inner(ctx, message, secret_key, Some(extra_data))
    }

    fn sign_inner(
        &self,
        ctx: &Context,
        message: &[u8; 32],
        secret_key: &SecretKey,
        extra_data: Option<&[u8; 32]>,
    ) -> Result<Signature, Error> {
        let x = secret_key.as_scalar();
        let key32 = secret_key.to_bytes();
        let m = Scalar::from_bytes_mod_order(*message);

        for attempt in 0..MAX_NONCE_ATTEMPTS {
            if attempt > 0 {
                tracing::debug!(attempt, "retrying ECDSA nonce");
            }
            let nonce = self
                .nonce_fn
                .nonce(message, &key32, None, extra_data, attempt)
                .ok_or(Error::NonceExhausted)?;
            let r = match Scalar::from_bytes_nonzero(nonce) {
                Some(r) => r,
                None => continue,
            };

            let R = Ge::set_gej(&ctx.ecmult_gen(&r)).normalize();
            // This converts R to its x-coordinate mod n. The lack of any
            // known algebraic relationship between r and R_x is what makes
            // ECDSA signatures difficult to forge.
            let R_x = Scalar::from_bytes_mod_order(R.x.to_bytes());
            let mut s = &r.invert() * &(&m + &(&R_x * x));

            // s values must be low (less than half group order), otherwise
            // signatures would be malleable i.e. (R,s) and (R,-s) would both
            // be valid signatures.
            s.conditional_negate(s.is_high());

            if bool::from(R_x.is_zero() | s.is_zero()) {
                continue;
            }
            return Ok(Signature { R_x, s });
        }

        Err(Error::NonceExhausted)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lazy_static::lazy_static;
    use proptest::prelude::*;

    lazy_static! {
        static ref CTX: Context = Context::new();
    }

    /// Returns zero, which is never a valid nonce, for the first `zeros` attempts.
    struct Stubborn {
        zeros: u32,
    }

    impl NonceFn for Stubborn {
        fn nonce(
            &self,
            msg32: &[u8; 32],
            key32: &[u8; 32],
            algo16: Option<&[u8; 16]>,
            data: Option<&[u8; 32]>,
            attempt: u32,
        ) -> Option<[u8; 32]> {
            if attempt < self.zeros {
                return Some([0u8; 32]);
            }
            Rfc6979.nonce(msg32, key32, algo16, data, attempt)
        }
    }

    struct Broken;

    impl NonceFn for Broken {
        fn nonce(
            &self,
            _: &[u8; 32],
            _: &[u8; 32],
            _: Option<&[u8; 16]>,
            _: Option<&[u8; 32]>,
            _: u32,
        ) -> Option<[u8; 32]> {
            None
        }
    }

    #[test]
    fn retries_invalid_nonces() {
        let ecdsa = Ecdsa::new(Stubborn { zeros: 3 });
        let sk = SecretKey::random(&mut rand::thread_rng());
        let pk = PublicKey::from_secret_key(&CTX, &sk);
        let sig = ecdsa.sign(&CTX, &[7u8; 32], &sk).unwrap();
        assert!(ecdsa.verify(&CTX, &[7u8; 32], &sig, &pk));
        // the fourth RFC6979 output was used, not the first
        assert_ne!(sig, Ecdsa::rfc6979().sign(&CTX, &[7u8; 32], &sk).unwrap());
    }

    #[test]
    fn nonce_exhaustion() {
        let sk = SecretKey::random(&mut rand::thread_rng());
        let never = Ecdsa::new(Stubborn {
            zeros: MAX_NONCE_ATTEMPTS,
        });
        assert_eq!(never.sign(&CTX, &[1u8; 32], &sk), Err(Error::NonceExhausted));
        assert_eq!(
            Ecdsa::new(Broken).sign(&CTX, &[1u8; 32], &sk),
            Err(Error::NonceExhausted)
        );
    }

    #[test]
    fn zero_components_fail() {
        let sk = SecretKey::random(&mut rand::thread_rng());
        let pk = PublicKey::from_secret_key(&CTX, &sk);
        let ecdsa = Ecdsa::rfc6979();
        let sig = ecdsa.sign(&CTX, &[3u8; 32], &sk).unwrap();
        let no_r = Signature {
            R_x: Scalar::ZERO,
            s: sig.s,
        };
        let no_s = Signature {
            R_x: sig.R_x,
            s: Scalar::ZERO,
        };
        assert!(!ecdsa.verify(&CTX, &[3u8; 32], &no_r, &pk));
        assert!(!ecdsa.verify(&CTX, &[3u8; 32], &no_s, &pk));
    }

    proptest! {
        #[test]
        fn sign_and_verify(sk in any::<SecretKey>(), message in any::<[u8; 32]>(), other in any::<[u8; 32]>()) {
            let ecdsa = Ecdsa::rfc6979();
            let pk = PublicKey::from_secret_key(&CTX, &sk);
            let sig = ecdsa.sign(&CTX, &message, &sk).unwrap();
            prop_assert!(sig.is_low_s());
            prop_assert!(ecdsa.verify(&CTX, &message, &sig, &pk));
            prop_assert!(ecdsa.verify(&CTX, &message, &Signature::from_der(&sig.to_der()).unwrap(), &pk));
            if other != message {
                prop_assert!(!ecdsa.verify(&CTX, &other, &sig, &pk));
            }
            prop_assert!(!ecdsa.verify(&CTX, &message, &sig, &pk.negate()));
        }

        #[test]
        fn low_s(sk in any::<SecretKey>(), message in any::<[u8; 32]>()) {
            let ecdsa = Ecdsa::rfc6979();
            let ecdsa_enforce_low_s = Ecdsa::rfc6979().enforce_low_s();
            let pk = PublicKey::from_secret_key(&CTX, &sk);
            let mut sig = ecdsa.sign(&CTX, &message, &sk).unwrap();
            prop_assert!(ecdsa_enforce_low_s.verify(&CTX, &message, &sig, &pk));
            sig.s = -sig.s;
            prop_assert!(!sig.is_low_s());
            prop_assert!(!ecdsa_enforce_low_s.verify(&CTX, &message, &sig, &pk));
            prop_assert!(ecdsa.verify(&CTX, &message, &sig, &pk));
        }

        #[test]
        fn extra_data_changes_nonce(sk in any::<SecretKey>(), message in any::<[u8; 32]>(), extra in any::<[u8; 32]>()) {
            let ecdsa = Ecdsa::rfc6979();
            let pk = PublicKey::from_secret_key(&CTX, &sk);
            let plain = ecdsa.sign(&CTX, &message, &sk).unwrap();
            let with_extra = ecdsa.sign_with_extra_data(&CTX, &message, &sk, &extra).unwrap();
            prop_assert_ne!(plain.R_x, with_extra.R_x);
            prop_assert!(ecdsa.verify(&CTX, &message, &with_extra, &pk));
        }
    }
}
