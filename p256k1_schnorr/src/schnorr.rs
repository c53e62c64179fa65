use crate::Signature;
use p256k1::{
    Context, Error, Point, Scalar, XOnlyPublicKey,
    digest::Digest,
    group::Ge,
    hash::{HashAdd, Tagged},
    keys::KeyPair,
    rand_core::{CryptoRng, RngCore},
    subtle::Choice,
};
use sha2::Sha256;

/// An instance of the [BIP-340] Schnorr signature scheme.
///
/// Holds the three tagged hashes BIP-340 uses with their tag prefixes
/// already absorbed so each signature only pays for hashing its own inputs.
///
/// [BIP-340]: https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki
#[derive(Clone, Debug)]
pub struct Schnorr {
    aux_hash: Sha256,
    nonce_hash: Sha256,
    challenge_hash: Sha256,
}

impl Default for Schnorr {
    fn default() -> Self {
        Self::new()
    }
}

impl Schnorr {
    /// Creates an instance with the BIP-340 tags.
    pub fn new() -> Self {
        Self {
            aux_hash: Sha256::tagged(b"BIP0340/aux"),
            nonce_hash: Sha256::tagged(b"BIP0340/nonce"),
            challenge_hash: Sha256::tagged(b"BIP0340/challenge"),
        }
    }

    /// Sign a 32-byte message with auxiliary randomness `aux_rand`.
    ///
    /// The secret key is negated first if the key pair's public key has an
    /// odd y-coordinate. Fails with [`Error::NonceExhausted`] in the
    /// negligible case that the derived nonce is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use p256k1::{Context, KeyPair, SecretKey};
    /// use p256k1_schnorr::Schnorr;
    /// let ctx = Context::new();
    /// let schnorr = Schnorr::new();
    /// let keypair = KeyPair::new(&ctx, SecretKey::random(&mut rand::thread_rng()));
    /// let message = b"Chancellor on brink of second bailout for banks!!";
    /// let message: [u8; 32] = message[..32].try_into().unwrap();
    /// let signature = schnorr.sign(&ctx, &keypair, &message, &[0u8; 32]).unwrap();
    /// let (public_key, _) = keypair.x_only_public_key();
    /// assert!(schnorr.verify(&ctx, &public_key, &message, &signature));
    /// ```
    pub fn sign(
        &self,
        ctx: &Context,
        keypair: &KeyPair,
        message: &[u8; 32],
        aux_rand: &[u8; 32],
    ) -> Result<Signature, Error> {
        let x = keypair.x_only_secret_key();
        let (X, _) = keypair.x_only_public_key();
        let X = X.to_bytes();

        let mut t = x.to_bytes();
        let aux: [u8; 32] = self.aux_hash.clone().add(aux_rand).finalize().into();
        for (byte, mask) in t.iter_mut().zip(aux.iter()) {
            *byte ^= mask;
        }

        let mut r = Scalar::from_hash(self.nonce_hash.clone().add(&t).add(&X).add(message));
        if bool::from(r.is_zero()) {
            return Err(Error::NonceExhausted);
        }

        let R = Ge::set_gej(&ctx.ecmult_gen(&r)).normalize();
        r.conditional_negate(Choice::from(R.y.is_odd() as u8));

        let c = self.challenge(&R.x.to_bytes(), &X, message);
        let s = &r + &(&c * x.as_scalar());
        Ok(Signature { R_x: R.x, s })
    }

    /// Like [`sign`](Schnorr::sign) with `aux_rand` drawn from `rng`.
    pub fn sign_with_rng(
        &self,
        ctx: &Context,
        keypair: &KeyPair,
        message: &[u8; 32],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Signature, Error> {
        let mut aux_rand = [0u8; 32];
        rng.fill_bytes(&mut aux_rand);
        self.sign(ctx, keypair, message, &aux_rand)
    }

    /// Produces the Fiat-Shamir challenge for a Schnorr signature in the form specified by BIP-340.
    ///
    /// Concretely computes the hash `H(R || X || m)` reduced modulo the curve order.
    ///
    /// # Example
    ///
    /// Here's how you could use this to roll your own signatures.
    ///
    /// ```
    /// use p256k1::{Context, KeyPair, Point, Scalar, SecretKey};
    /// use p256k1_schnorr::{Schnorr, Signature};
    /// let ctx = Context::new();
    /// let schnorr = Schnorr::new();
    /// let message = [7u8; 32];
    /// let keypair = KeyPair::new(&ctx, SecretKey::random(&mut rand::thread_rng()));
    /// let (X, _) = keypair.x_only_public_key();
    /// let x = keypair.x_only_secret_key();
    /// let mut r = Scalar::random(&mut rand::thread_rng());
    /// let mut R = Point::generator() * r;
    /// if !R.has_even_y() {
    ///     r = -r;
    ///     R = -R;
    /// }
    /// let challenge = schnorr.challenge(&R.x().to_bytes(), &X.to_bytes(), &message);
    /// let s = r + challenge * x.as_scalar();
    /// let signature = Signature { R_x: R.x(), s };
    /// assert!(schnorr.verify(&ctx, &X, &message, &signature));
    /// ```
    pub fn challenge(&self, R_x: &[u8; 32], X: &[u8; 32], message: &[u8; 32]) -> Scalar {
        Scalar::from_hash(self.challenge_hash.clone().add(R_x).add(X).add(message))
    }

    /// Verifies a signature on a message under a given public key.
    ///
    /// Computes `R = s * G - c * X` and accepts if `R` is not the point at
    /// infinity, has an even y-coordinate and its x-coordinate is `R_x`.
    #[must_use]
    pub fn verify(
        &self,
        ctx: &Context,
        public_key: &XOnlyPublicKey,
        message: &[u8; 32],
        signature: &Signature,
    ) -> bool {
        let (R_x, s) = signature.as_tuple();
        let X = public_key.to_point();
        let c = self.challenge(&R_x.to_bytes(), &public_key.to_bytes(), message);
        let R = ctx.ecmult().ecmult(&X.to_gej(), &-c, s);
        if R.is_infinity() {
            tracing::trace!("rejecting Schnorr signature with nonce at infinity");
            return false;
        }
        let R = Ge::set_gej_var(&R);
        if R.y.is_odd() {
            tracing::trace!("rejecting Schnorr signature with odd nonce");
            return false;
        }
        R.x.eq_var(R_x)
    }

    /// _Anticipates_ a Schnorr signature given the nonce `R` that will be used
    /// ahead of time. Returns the group element that corresponds to the
    /// scalar value of the signature, i.e `R + c * X`.
    pub fn anticipate_signature(
        &self,
        ctx: &Context,
        public_key: &XOnlyPublicKey,
        R: &XOnlyPublicKey,
        message: &[u8; 32],
    ) -> Point {
        let c = self.challenge(&R.to_bytes(), &public_key.to_bytes(), message);
        let X = public_key.to_point().to_gej();
        let cX = ctx.ecmult().ecmult(&X, &c, &Scalar::ZERO);
        Point::from(cX.add_ge_var(&R.to_point().to_ge()))
    }
}
