//! Validated key types and single-party tweaking.
//!
//! These wrap [`Scalar`] and the group types with the invariants keys need:
//! a [`SecretKey`] is never zero, a [`PublicKey`] is never the point at
//! infinity and an [`XOnlyPublicKey`] always has an even y-coordinate.
use crate::{
    Context, Error, Point, Scalar,
    field::Fe,
    group::{Ge, Gej},
};
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable};

/// The parity of a point's y-coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    /// The y-coordinate is even.
    Even,
    /// The y-coordinate is odd.
    Odd,
}

impl Parity {
    /// Whether this is [`Parity::Odd`].
    pub fn is_odd(self) -> bool {
        self == Parity::Odd
    }

    /// `0` for even, `1` for odd.
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl From<bool> for Parity {
    fn from(odd: bool) -> Self {
        if odd { Parity::Odd } else { Parity::Even }
    }
}

/// A secret key: a scalar in `[1, n - 1]`.
///
/// ```
/// use p256k1::keys::SecretKey;
/// let secret_key = SecretKey::random(&mut rand::thread_rng());
/// assert_eq!(SecretKey::from_bytes(secret_key.to_bytes()).unwrap(), secret_key);
/// assert!(SecretKey::from_bytes([0u8; 32]).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SecretKey(Scalar);

impl SecretKey {
    /// Parses a 32-byte big-endian secret key.
    ///
    /// Fails with [`Error::InvalidSecretKey`] for zero or values not less than `n`.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, Error> {
        Scalar::from_bytes_nonzero(bytes)
            .map(SecretKey)
            .ok_or(Error::InvalidSecretKey)
    }

    /// [`from_bytes`](SecretKey::from_bytes) for a slice. Fails with
    /// [`Error::InvalidInput`] if the slice is not 32 bytes long.
    pub fn from_slice(slice: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| Error::InvalidInput)?;
        Self::from_bytes(bytes)
    }

    /// Wraps a scalar. Fails with [`Error::InvalidSecretKey`] if it is zero.
    pub fn from_scalar(scalar: Scalar) -> Result<Self, Error> {
        if bool::from(scalar.is_zero()) {
            return Err(Error::InvalidSecretKey);
        }
        Ok(SecretKey(scalar))
    }

    /// Samples a secret key uniformly.
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        loop {
            let scalar = Scalar::random(rng);
            if !bool::from(scalar.is_zero()) {
                return SecretKey(scalar);
            }
        }
    }

    /// The 32-byte big-endian encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// The secret scalar.
    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }

    /// Returns `n - self`.
    #[must_use]
    pub fn negate(&self) -> Self {
        SecretKey(-self.0)
    }

    /// Returns `self + tweak`.
    ///
    /// Fails with [`Error::InvalidSecretKey`] if the sum is zero.
    pub fn tweak_add(&self, tweak: &Scalar) -> Result<Self, Error> {
        Self::from_scalar(&self.0 + tweak)
    }

    /// Returns `self * tweak`. Fails with [`Error::InvalidInput`] if `tweak` is zero.
    pub fn tweak_mul(&self, tweak: &Scalar) -> Result<Self, Error> {
        if bool::from(tweak.is_zero()) {
            return Err(Error::InvalidInput);
        }
        Ok(SecretKey(&self.0 * tweak))
    }
}

impl core::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "SecretKey(..)")
    }
}

crate::impl_display_serialize! {
    fn to_bytes(secret_key: &SecretKey) -> [u8;32] {
        secret_key.to_bytes()
    }
}

crate::impl_fromstr_deserialize! {
    name => "secp256k1 secret key",
    fn from_bytes(bytes: [u8;32]) -> Option<SecretKey> {
        SecretKey::from_bytes(bytes).ok()
    }
}

/// A public key: any point except the point at infinity.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(Ge);

impl PublicKey {
    /// Computes `secret_key * G` in constant time.
    pub fn from_secret_key(ctx: &Context, secret_key: &SecretKey) -> Self {
        PublicKey(Ge::set_gej(&ctx.ecmult_gen(secret_key.as_scalar())).normalize())
    }

    /// Parses a 33-byte compressed or 65-byte uncompressed encoding.
    ///
    /// ```
    /// use p256k1::keys::PublicKey;
    /// let g = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    /// let pk = PublicKey::from_slice(&p256k1::hex::decode(g).unwrap()).unwrap();
    /// assert_eq!(pk.to_string(), g);
    /// ```
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        Ge::from_bytes(bytes).map(PublicKey)
    }

    /// Parses the 33-byte compressed encoding.
    pub fn from_bytes(bytes: [u8; 33]) -> Result<Self, Error> {
        Self::from_slice(&bytes[..])
    }

    /// Wraps a point. Fails with [`Error::InvalidInput`] for the identity.
    pub fn from_point(point: &Point) -> Result<Self, Error> {
        if point.is_identity() {
            return Err(Error::InvalidInput);
        }
        Ok(PublicKey(point.to_ge()))
    }

    fn from_gej(gej: &Gej) -> Result<Self, Error> {
        if gej.is_infinity() {
            return Err(Error::InvalidInput);
        }
        Ok(PublicKey(Ge::set_gej_var(gej)))
    }

    /// The 33-byte compressed encoding.
    pub fn to_bytes(&self) -> [u8; 33] {
        self.0.to_bytes_compressed()
    }

    /// The 65-byte uncompressed encoding.
    pub fn to_bytes_uncompressed(&self) -> [u8; 65] {
        self.0.to_bytes_uncompressed()
    }

    /// The key as a group element.
    pub fn to_point(&self) -> Point {
        Point::from(self.0)
    }

    /// The affine point.
    pub fn as_ge(&self) -> &Ge {
        &self.0
    }

    /// Returns `-self`.
    #[must_use]
    pub fn negate(&self) -> Self {
        PublicKey(self.0.neg().normalize())
    }

    /// Adds up `keys`.
    ///
    /// Fails with [`Error::InvalidInput`] if `keys` is empty or the sum is the
    /// point at infinity.
    ///
    /// ```
    /// use p256k1::{Context, keys::{PublicKey, SecretKey}};
    /// let ctx = Context::new();
    /// let a = SecretKey::random(&mut rand::thread_rng());
    /// let b = SecretKey::random(&mut rand::thread_rng());
    /// let sum = PublicKey::combine(&[
    ///     PublicKey::from_secret_key(&ctx, &a),
    ///     PublicKey::from_secret_key(&ctx, &b),
    /// ]).unwrap();
    /// let ab = a.tweak_add(b.as_scalar()).unwrap();
    /// assert_eq!(sum, PublicKey::from_secret_key(&ctx, &ab));
    /// ```
    pub fn combine(keys: &[PublicKey]) -> Result<Self, Error> {
        if keys.is_empty() {
            return Err(Error::InvalidInput);
        }
        let sum = keys
            .iter()
            .fold(Gej::INFINITY, |acc, key| acc.add_ge_var(&key.0));
        Self::from_gej(&sum)
    }

    /// Returns `self + tweak * G`.
    ///
    /// Fails with [`Error::InvalidInput`] if the result is the point at infinity.
    pub fn tweak_add(&self, ctx: &Context, tweak: &Scalar) -> Result<Self, Error> {
        let tweaked = ctx
            .ecmult()
            .ecmult(&Gej::from_ge(&self.0), &Scalar::ONE, tweak);
        Self::from_gej(&tweaked)
    }

    /// Returns `tweak * self`. Fails with [`Error::InvalidInput`] if `tweak` is zero.
    pub fn tweak_mul(&self, ctx: &Context, tweak: &Scalar) -> Result<Self, Error> {
        if bool::from(tweak.is_zero()) {
            return Err(Error::InvalidInput);
        }
        let tweaked = ctx
            .ecmult()
            .ecmult(&Gej::from_ge(&self.0), tweak, &Scalar::ZERO);
        Self::from_gej(&tweaked)
    }

    /// Drops the y-coordinate, returning the x-only key and the parity of the
    /// y-coordinate that was dropped.
    pub fn x_only(&self) -> (XOnlyPublicKey, Parity) {
        let parity = Parity::from(self.0.y.is_odd());
        let even = match parity {
            Parity::Even => self.0,
            Parity::Odd => self.0.neg().normalize(),
        };
        (XOnlyPublicKey(even), parity)
    }
}

impl From<PublicKey> for Point {
    fn from(pk: PublicKey) -> Self {
        pk.to_point()
    }
}

impl core::hash::Hash for PublicKey {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state)
    }
}

crate::impl_display_debug_serialize! {
    fn to_bytes(public_key: &PublicKey) -> [u8;33] {
        public_key.to_bytes()
    }
}

crate::impl_fromstr_deserialize! {
    name => "secp256k1 public key",
    fn from_bytes(bytes: [u8;33]) -> Option<PublicKey> {
        PublicKey::from_bytes(bytes).ok()
    }
}

/// A public key serialized as only its x-coordinate. The y-coordinate is
/// implicitly the even one.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct XOnlyPublicKey(Ge);

impl XOnlyPublicKey {
    /// Converts a 32-byte big-endian x-coordinate into an `XOnlyPublicKey`.
    ///
    /// Fails with [`Error::OutOfRange`] if the value is not less than `p`
    /// and with [`Error::PointNotOnCurve`] if there is no point with this
    /// x-coordinate.
    ///
    /// # Example
    /// ```
    /// use p256k1::{Error, keys::XOnlyPublicKey};
    /// // x = 1 is on the curve, x = 5 isn't
    /// let mut one = [0u8; 32];
    /// one[31] = 1;
    /// assert!(XOnlyPublicKey::from_bytes(one).is_ok());
    /// let mut five = [0u8; 32];
    /// five[31] = 5;
    /// assert_eq!(XOnlyPublicKey::from_bytes(five), Err(Error::PointNotOnCurve));
    /// ```
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, Error> {
        let x = Fe::from_bytes(bytes).ok_or(Error::OutOfRange)?;
        Self::from_x(&x)
    }

    /// Lifts a field element to the point with even y.
    pub fn from_x(x: &Fe) -> Result<Self, Error> {
        Ge::set_xo_var(x, false)
            .map(XOnlyPublicKey)
            .ok_or(Error::PointNotOnCurve)
    }

    /// Convenience method for calling [`from_bytes`](XOnlyPublicKey::from_bytes)
    /// on a slice. Fails with [`Error::InvalidInput`] if it is not 32 bytes long.
    pub fn from_slice(slice: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| Error::InvalidInput)?;
        Self::from_bytes(bytes)
    }

    /// The 32-byte x-coordinate.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.x.to_bytes()
    }

    /// The x-coordinate.
    pub fn x(&self) -> &Fe {
        &self.0.x
    }

    /// The point with even y.
    pub fn to_point(&self) -> Point {
        Point::from(self.0)
    }

    /// The point with even y as a full public key.
    pub fn to_public_key(&self) -> PublicKey {
        PublicKey(self.0)
    }

    /// Computes `P' = P + tweak * G` where `P` is this key's even-y point.
    ///
    /// Returns the full tweaked key together with the parity of its
    /// y-coordinate, which is what [`tweak_add_check`] needs to verify the
    /// tweak against the x-only form of `P'`.
    ///
    /// Fails with [`Error::InvalidInput`] if `P'` is the point at infinity.
    ///
    /// [`tweak_add_check`]: XOnlyPublicKey::tweak_add_check
    pub fn tweak_add(&self, ctx: &Context, tweak: &Scalar) -> Result<(PublicKey, Parity), Error> {
        let tweaked = self.to_public_key().tweak_add(ctx, tweak)?;
        let parity = Parity::from(tweaked.0.y.is_odd());
        Ok((tweaked, parity))
    }

    /// Checks that `tweaked_x` with y-parity `parity` is `self + tweak * G`.
    ///
    /// ```
    /// use p256k1::{Context, Scalar, keys::{KeyPair, SecretKey}};
    /// let ctx = Context::new();
    /// let keypair = KeyPair::new(&ctx, SecretKey::random(&mut rand::thread_rng()));
    /// let (internal_key, _) = keypair.x_only_public_key();
    /// let tweak = Scalar::from(42);
    /// let (tweaked, parity) = internal_key.tweak_add(&ctx, &tweak).unwrap();
    /// let (tweaked_x, _) = tweaked.x_only();
    /// assert!(internal_key.tweak_add_check(&ctx, &tweaked_x.to_bytes(), parity, &tweak));
    /// ```
    pub fn tweak_add_check(
        &self,
        ctx: &Context,
        tweaked_x: &[u8; 32],
        parity: Parity,
        tweak: &Scalar,
    ) -> bool {
        let expected = match self.tweak_add(ctx, tweak) {
            Ok((pk, _)) => pk,
            Err(_) => return false,
        };
        let x_matches = match Fe::from_bytes(*tweaked_x) {
            Some(x) => expected.0.x.eq_var(&x),
            None => false,
        };
        x_matches && expected.0.y.is_odd() == parity.is_odd()
    }
}

impl core::hash::Hash for XOnlyPublicKey {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state)
    }
}

crate::impl_display_debug_serialize! {
    fn to_bytes(xonly: &XOnlyPublicKey) -> [u8;32] {
        xonly.to_bytes()
    }
}

crate::impl_fromstr_deserialize! {
    name => "secp256k1 x-only public key",
    fn from_bytes(bytes: [u8;32]) -> Option<XOnlyPublicKey> {
        XOnlyPublicKey::from_bytes(bytes).ok()
    }
}

/// A secret and public key pair.
///
/// The secret key is a [`SecretKey`] and the public key is the point resulting
/// from multiplying it by `G`, computed once on construction.
///
/// ```
/// use p256k1::{Context, keys::{KeyPair, SecretKey}};
/// let ctx = Context::new();
/// let my_secret_key = SecretKey::random(&mut rand::thread_rng());
/// let my_keypair = KeyPair::new(&ctx, my_secret_key);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPair {
    sk: SecretKey,
    pk: PublicKey,
}

impl KeyPair {
    /// Creates a new `KeyPair` from a `secret_key`.
    pub fn new(ctx: &Context, secret_key: SecretKey) -> Self {
        Self {
            pk: PublicKey::from_secret_key(ctx, &secret_key),
            sk: secret_key,
        }
    }

    /// Parses the secret key and computes its public key.
    pub fn from_bytes(ctx: &Context, bytes: [u8; 32]) -> Result<Self, Error> {
        Ok(Self::new(ctx, SecretKey::from_bytes(bytes)?))
    }

    /// Returns a reference to the secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.sk
    }

    /// The public key.
    pub fn public_key(&self) -> PublicKey {
        self.pk
    }

    /// The x-only public key and the parity of the full public key's y-coordinate.
    pub fn x_only_public_key(&self) -> (XOnlyPublicKey, Parity) {
        self.pk.x_only()
    }

    /// The secret key that corresponds to the even-y version of the public key:
    /// the secret key itself or its negation.
    pub fn x_only_secret_key(&self) -> SecretKey {
        let odd = Choice::from(self.pk.0.y.is_odd() as u8);
        let negated = -self.sk.0;
        SecretKey(Scalar::conditional_select(&self.sk.0, &negated, odd))
    }

    /// Applies an x-only tweak to both halves of the key pair.
    ///
    /// The secret key is negated first if the public key has an odd
    /// y-coordinate, so the resulting secret key matches
    /// [`XOnlyPublicKey::tweak_add`] applied to the x-only public key.
    ///
    /// Fails with [`Error::InvalidSecretKey`] if the tweaked secret key is zero.
    pub fn xonly_tweak_add(&self, ctx: &Context, tweak: &Scalar) -> Result<Self, Error> {
        let sk = self.x_only_secret_key().tweak_add(tweak)?;
        let (xonly, _) = self.x_only_public_key();
        let (pk, _) = xonly.tweak_add(ctx, tweak)?;
        Ok(Self { sk, pk })
    }

    /// Gets a reference to the keypair as a tuple.
    pub fn as_tuple(&self) -> (&SecretKey, PublicKey) {
        (&self.sk, self.pk)
    }
}

impl From<KeyPair> for (SecretKey, PublicKey) {
    fn from(kp: KeyPair) -> Self {
        (kp.sk, kp.pk)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{context::TEST_CONTEXT, hex};
    use alloc::string::ToString;
    use core::str::FromStr;
    use proptest::prelude::*;

    #[test]
    fn secret_key_range() {
        assert_eq!(SecretKey::from_bytes([0u8; 32]), Err(Error::InvalidSecretKey));
        assert_eq!(SecretKey::from_bytes([0xff; 32]), Err(Error::InvalidSecretKey));
        let n: [u8; 32] =
            hex::decode_array("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
                .unwrap();
        assert_eq!(SecretKey::from_bytes(n), Err(Error::InvalidSecretKey));
        let mut n_minus_one = n;
        n_minus_one[31] -= 1;
        assert!(SecretKey::from_bytes(n_minus_one).is_ok());
        assert_eq!(SecretKey::from_slice(&[1u8; 31]), Err(Error::InvalidInput));
    }

    #[test]
    fn secret_key_tweaks() {
        let sk = SecretKey::from_scalar(Scalar::from(5)).unwrap();
        assert_eq!(
            sk.tweak_add(&-Scalar::from(5)),
            Err(Error::InvalidSecretKey)
        );
        assert_eq!(sk.tweak_mul(&Scalar::ZERO), Err(Error::InvalidInput));
        assert_eq!(
            sk.tweak_mul(&Scalar::from(3)).unwrap().as_scalar(),
            &Scalar::from(15)
        );
        assert_eq!(sk.negate().negate(), sk);
    }

    #[test]
    fn public_key_parse_errors() {
        assert_eq!(PublicKey::from_slice(&[2u8; 20]), Err(Error::InvalidInput));
        let mut hybrid = [0u8; 65];
        hybrid[0] = 0x06;
        assert_eq!(PublicKey::from_slice(&hybrid), Err(Error::PointNotOnCurve));
        hybrid[0] = 0x07;
        assert_eq!(PublicKey::from_slice(&hybrid), Err(Error::InvalidInput));
        assert_eq!(PublicKey::combine(&[]), Err(Error::InvalidInput));
    }

    #[test]
    fn xonly_parse_errors() {
        assert_eq!(XOnlyPublicKey::from_bytes([0xff; 32]), Err(Error::OutOfRange));
        let mut five = [0u8; 32];
        five[31] = 5;
        assert_eq!(XOnlyPublicKey::from_bytes(five), Err(Error::PointNotOnCurve));
        assert_eq!(XOnlyPublicKey::from_slice(&[1u8; 33]), Err(Error::InvalidInput));
    }

    #[test]
    fn combine_to_infinity_fails() {
        let ctx = &*TEST_CONTEXT;
        let sk = SecretKey::from_scalar(Scalar::from(9)).unwrap();
        let pk = PublicKey::from_secret_key(ctx, &sk);
        assert_eq!(PublicKey::combine(&[pk, pk.negate()]), Err(Error::InvalidInput));
        assert_eq!(pk.tweak_add(ctx, &-Scalar::from(9)), Err(Error::InvalidInput));
    }

    #[test]
    fn display_roundtrip() {
        let ctx = &*TEST_CONTEXT;
        let sk = SecretKey::from_scalar(Scalar::from(2)).unwrap();
        let pk = PublicKey::from_secret_key(ctx, &sk);
        assert_eq!(
            pk.to_string(),
            "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5"
        );
        assert_eq!(PublicKey::from_str(&pk.to_string()).unwrap(), pk);
        let (xonly, parity) = pk.x_only();
        assert_eq!(parity, Parity::Even);
        assert_eq!(XOnlyPublicKey::from_str(&xonly.to_string()).unwrap(), xonly);
        assert_eq!(SecretKey::from_str(&sk.to_string()).unwrap(), sk);
        assert_eq!(format!("{:?}", sk), "SecretKey(..)");
    }

    proptest! {
        #[test]
        fn public_key_encodings(sk in any::<SecretKey>()) {
            let pk = PublicKey::from_secret_key(&TEST_CONTEXT, &sk);
            prop_assert_eq!(PublicKey::from_bytes(pk.to_bytes()).unwrap(), pk);
            prop_assert_eq!(PublicKey::from_slice(&pk.to_bytes_uncompressed()).unwrap(), pk);
            let (xonly, parity) = pk.x_only();
            prop_assert_eq!(XOnlyPublicKey::from_bytes(xonly.to_bytes()).unwrap(), xonly);
            prop_assert_eq!(parity.is_odd(), pk.negate().x_only().1 == Parity::Even);
            prop_assert_eq!(pk.to_point(), Point::generator() * *sk.as_scalar());
        }

        #[test]
        fn tweaks_commute_with_g(sk in any::<SecretKey>(), tweak in any::<Scalar>()) {
            let ctx = &*TEST_CONTEXT;
            let pk = PublicKey::from_secret_key(ctx, &sk);
            if let Ok(tweaked_sk) = sk.tweak_add(&tweak) {
                prop_assert_eq!(pk.tweak_add(ctx, &tweak).unwrap(), PublicKey::from_secret_key(ctx, &tweaked_sk));
            }
            if let Ok(tweaked_sk) = sk.tweak_mul(&tweak) {
                prop_assert_eq!(pk.tweak_mul(ctx, &tweak).unwrap(), PublicKey::from_secret_key(ctx, &tweaked_sk));
            }
        }

        #[test]
        fn xonly_tweak_consistency(sk in any::<SecretKey>(), tweak in any::<Scalar>(), other in any::<Scalar>()) {
            let ctx = &*TEST_CONTEXT;
            let keypair = KeyPair::new(ctx, sk);
            let (internal, _) = keypair.x_only_public_key();
            let (tweaked, parity) = match internal.tweak_add(ctx, &tweak) {
                Ok(tweaked) => tweaked,
                Err(_) => {
                    // the tweak cancelled the key
                    prop_assert!(keypair.xonly_tweak_add(ctx, &tweak).is_err());
                    return Ok(());
                }
            };
            let (tweaked_x, tweaked_parity) = tweaked.x_only();
            prop_assert_eq!(parity, tweaked_parity);
            prop_assert!(internal.tweak_add_check(ctx, &tweaked_x.to_bytes(), parity, &tweak));
            let flipped = Parity::from(!parity.is_odd());
            prop_assert!(!internal.tweak_add_check(ctx, &tweaked_x.to_bytes(), flipped, &tweak));
            if other != tweak {
                prop_assert!(!internal.tweak_add_check(ctx, &tweaked_x.to_bytes(), parity, &other));
            }

            let tweaked_keypair = keypair.xonly_tweak_add(ctx, &tweak).unwrap();
            prop_assert_eq!(tweaked_keypair.public_key(), tweaked);
            prop_assert_eq!(
                PublicKey::from_secret_key(ctx, tweaked_keypair.secret_key()),
                tweaked
            );
        }
    }
}
