//! A group element with operator overloads for everyday use.
use crate::{
    Context, Error, Scalar,
    ecmult::{MultiMult, Scratch, ecmult_const},
    field::Fe,
    group::{GENERATOR, Ge, Gej},
    hash::HashInto,
};
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use rand_core::RngCore;
use subtle::ConstantTimeEq;

/// A point on the secp256k1 elliptic curve, or the point at infinity.
///
/// Any two integers modulo `p` `(x, y)` that satisfy:
///
/// `y^2 = x^3 + 7 mod p`
///
/// where `p = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F`
/// form a point. Together with the point at infinity ([`Point::identity`]) they
/// form a group of prime order under addition.
///
/// Points are held in Jacobian coordinates so that chains of additions don't
/// pay for a field inversion each time; [`x`](Point::x), [`to_bytes`](Point::to_bytes)
/// and friends convert to affine coordinates on demand.
///
/// The arithmetic operators run in constant time. Use
/// [`multimult`](Point::multimult) for fast variable time sums of products
/// on public data.
///
/// # Serialization
///
/// Points serialize to and from the 33-byte compressed encoding specified in
/// [_Standards for Efficient Cryptography_]. The identity serializes to `[0u8; 33]`.
///
/// [_Standards for Efficient Cryptography_]: https://www.secg.org/sec1-v2.pdf
#[derive(Clone, Copy, Default)]
pub struct Point(pub(crate) Gej);

/// `p - n` for checking whether an x-coordinate was reduced modulo `n`.
const P_MINUS_ORDER: Fe = Fe::new(0, 0, 0, 1, 0x45512319, 0x50B75FC4, 0x402DA172, 0x2FC9BAEE);
const ORDER_AS_FE: Fe = Fe::new(
    0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFE, 0xBAAEDCE6, 0xAF48A03B, 0xBFD25E8C, 0xD0364141,
);

impl Point {
    /// Returns the [_identity element_] of the group A.K.A. the point at infinity.
    ///
    /// # Example
    /// ```
    /// use p256k1::Point;
    /// let zero = Point::identity();
    /// assert!(zero.is_identity());
    /// assert_eq!(zero + Point::generator(), Point::generator());
    /// ```
    ///
    /// [_identity element_]: https://en.wikipedia.org/wiki/Identity_element
    pub const fn identity() -> Self {
        Point(Gej::INFINITY)
    }

    /// The standard generator point `G`.
    pub const fn generator() -> Self {
        Point(Gej::from_ge(&GENERATOR))
    }

    /// Whether this is the point at infinity.
    pub fn is_identity(&self) -> bool {
        self.0.is_infinity()
    }

    /// Samples a point uniformly from the group (excluding the identity).
    ///
    /// # Examples
    /// ```
    /// use p256k1::Point;
    /// let random_point = Point::random(&mut rand::thread_rng());
    /// assert!(!random_point.is_identity());
    /// ```
    pub fn random(rng: &mut impl RngCore) -> Self {
        loop {
            let mut bytes = [0u8; 33];
            rng.fill_bytes(&mut bytes[..]);
            bytes[0] = 0x02 | (bytes[0] & 0x01);
            if let Ok(point) = Self::from_bytes(bytes) {
                return point;
            }
        }
    }

    /// Converts the point to affine coordinates.
    pub fn to_ge(&self) -> Ge {
        Ge::set_gej_var(&self.0)
    }

    /// The underlying Jacobian representation.
    pub fn to_gej(&self) -> Gej {
        self.0
    }

    /// Creates a Point from the compressed encoding specified in [_Standards
    /// for Efficient Cryptography_]. The first byte must be `0x02` or `0x03`
    /// to indicate that the y-coordinate is even or odd respectively. The
    /// remaining 32 bytes must encode an x-coordinate on the curve.
    /// `[0u8; 33]` decodes to the identity.
    ///
    /// # Examples
    /// ```
    /// use p256k1::Point;
    /// let bytes = [
    ///     2, 121, 190, 102, 126, 249, 220, 187, 172, 85, 160, 98, 149, 206, 135, 11, 7, 2, 155, 252,
    ///     219, 45, 206, 40, 217, 89, 242, 129, 91, 22, 248, 23, 152,
    /// ];
    /// let point = Point::from_bytes(bytes).unwrap();
    /// assert_eq!(point, Point::generator());
    /// ```
    ///
    /// [_Standards for Efficient Cryptography_]: https://www.secg.org/sec1-v2.pdf
    pub fn from_bytes(bytes: [u8; 33]) -> Result<Self, Error> {
        if bytes == [0u8; 33] {
            return Ok(Self::identity());
        }
        Ge::from_bytes(&bytes[..]).map(Self::from)
    }

    /// Parses a 33-byte compressed or 65-byte uncompressed encoding.
    pub fn from_slice(slice: &[u8]) -> Result<Self, Error> {
        match slice.len() {
            33 => {
                let mut bytes = [0u8; 33];
                bytes.copy_from_slice(slice);
                Self::from_bytes(bytes)
            }
            _ => Ge::from_bytes(slice).map(Self::from),
        }
    }

    /// Converts the point to its compressed encoding. The identity encodes as `[0u8; 33]`.
    ///
    /// # Example
    /// Round trip serialization with [`from_bytes`]
    /// ```
    /// use p256k1::Point;
    /// let point = Point::random(&mut rand::thread_rng());
    /// let bytes = point.to_bytes();
    /// assert!(bytes[0] == 0x02 || bytes[0] == 0x03);
    /// assert_eq!(Point::from_bytes(bytes).unwrap(), point);
    /// ```
    ///
    /// [`from_bytes`]: Point::from_bytes
    pub fn to_bytes(&self) -> [u8; 33] {
        if self.is_identity() {
            return [0u8; 33];
        }
        self.to_ge().to_bytes_compressed()
    }

    /// Encodes a non-identity point as 65 uncompressed bytes. The identity encodes as `[0u8; 65]`.
    pub fn to_bytes_uncompressed(&self) -> [u8; 65] {
        if self.is_identity() {
            return [0u8; 65];
        }
        self.to_ge().to_bytes_uncompressed()
    }

    /// The normalized affine x-coordinate. Zero for the identity.
    pub fn x(&self) -> Fe {
        if self.is_identity() {
            return Fe::ZERO;
        }
        self.to_ge().x
    }

    /// The normalized affine y-coordinate. Zero for the identity.
    pub fn y(&self) -> Fe {
        if self.is_identity() {
            return Fe::ZERO;
        }
        self.to_ge().y
    }

    /// Whether the y-coordinate is even. False for the identity.
    pub fn has_even_y(&self) -> bool {
        !self.is_identity() && !self.to_ge().y.is_odd()
    }

    /// Returns the point with x-coordinate `x` and an even y-coordinate.
    ///
    /// Fails with [`Error::PointNotOnCurve`] if there is no such point.
    ///
    /// ```
    /// use p256k1::Point;
    /// let g = Point::generator();
    /// let lifted = Point::lift_x(&g.x()).unwrap();
    /// assert!(lifted.has_even_y());
    /// assert_eq!(lifted, g);
    /// ```
    pub fn lift_x(x: &Fe) -> Result<Self, Error> {
        Ge::set_xo_var(x, false)
            .map(Self::from)
            .ok_or(Error::PointNotOnCurve)
    }

    /// Checks if this point's x-coordinate is equal to `scalar` modulo the
    /// curve order in variable time. This is only useful for ECDSA verification.
    pub fn x_eq_scalar(&self, scalar: &Scalar) -> bool {
        if self.is_identity() {
            return false;
        }
        let mut x = Fe::from_bytes_mod_order(scalar.to_bytes());
        // by far the most likely outcome
        if self.0.eq_x_var(&x) {
            return true;
        }

        // x mod n can only differ from x if x >= n, which leaves room for x - n < p - n
        if x >= P_MINUS_ORDER {
            return false;
        }

        x += &ORDER_AS_FE;
        self.0.eq_x_var(&x)
    }

    /// Computes `Σ scalars[i] * points[i]` in variable time.
    ///
    /// Fails with [`Error::InvalidInput`] when the slices have different lengths.
    ///
    /// ```
    /// use p256k1::{Context, Point, Scalar};
    /// let ctx = Context::new();
    /// let g = Point::generator();
    /// let sum = Point::multimult(&ctx, &[Scalar::from(2), Scalar::from(3)], &[g, g]).unwrap();
    /// assert_eq!(sum, g * Scalar::from(5));
    /// ```
    pub fn multimult(ctx: &Context, scalars: &[Scalar], points: &[Point]) -> Result<Point, Error> {
        if scalars.len() != points.len() {
            return Err(Error::InvalidInput);
        }
        let terms = ScalarsPoints { scalars, points };
        Ok(Self::multimult_trait(ctx, &terms))
    }

    /// Computes the sum of products of anything implementing [`MultiMult`] in variable time.
    pub fn multimult_trait<M: MultiMult + ?Sized>(ctx: &Context, mm: &M) -> Point {
        let mut scratch = Scratch::with_capacity(mm.get_size());
        Point(ctx.ecmult().ecmult_multi_var(&mut scratch, None, mm))
    }
}

struct ScalarsPoints<'a> {
    scalars: &'a [Scalar],
    points: &'a [Point],
}

impl MultiMult for ScalarsPoints<'_> {
    fn get_scalar(&self, i: usize) -> &Scalar {
        &self.scalars[i]
    }

    fn get_point(&self, i: usize) -> &Point {
        &self.points[i]
    }

    fn get_size(&self) -> usize {
        self.scalars.len()
    }
}

impl From<Gej> for Point {
    fn from(gej: Gej) -> Self {
        Point(gej)
    }
}

impl From<Ge> for Point {
    fn from(ge: Ge) -> Self {
        Point(Gej::from_ge(&ge))
    }
}

/// `scalar * G` in constant time.
impl From<Scalar> for Point {
    fn from(scalar: Scalar) -> Self {
        Point(ecmult_const(&GENERATOR, &scalar))
    }
}

impl From<&Scalar> for Point {
    fn from(scalar: &Scalar) -> Self {
        Point::from(*scalar)
    }
}

impl PartialEq for Point {
    fn eq(&self, rhs: &Point) -> bool {
        self.0.ct_eq(&rhs.0).into()
    }
}

impl Eq for Point {}

impl core::hash::Hash for Point {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state)
    }
}

impl HashInto for Point {
    fn hash_into(&self, hash: &mut impl digest::Update) {
        hash.update(&self.to_bytes())
    }
}

impl Add<&Point> for &Point {
    type Output = Point;

    fn add(self, rhs: &Point) -> Point {
        Point(self.0.add(&rhs.0))
    }
}

impl Neg for &Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point(self.0.neg())
    }
}

impl Sub<&Point> for &Point {
    type Output = Point;

    fn sub(self, rhs: &Point) -> Point {
        self + &(-rhs)
    }
}

impl Mul<&Scalar> for &Point {
    type Output = Point;

    fn mul(self, rhs: &Scalar) -> Point {
        if self.is_identity() {
            return Point::identity();
        }
        Point(ecmult_const(&self.to_ge(), rhs))
    }
}

impl Mul<&Point> for &Scalar {
    type Output = Point;

    fn mul(self, rhs: &Point) -> Point {
        rhs * self
    }
}

macro_rules! forward_point_binop {
    ($trait:ident, $method:ident, $rhs:ty) => {
        impl $trait<$rhs> for Point {
            type Output = Point;

            fn $method(self, rhs: $rhs) -> Point {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&$rhs> for Point {
            type Output = Point;

            fn $method(self, rhs: &$rhs) -> Point {
                (&self).$method(rhs)
            }
        }

        impl $trait<$rhs> for &Point {
            type Output = Point;

            fn $method(self, rhs: $rhs) -> Point {
                self.$method(&rhs)
            }
        }
    };
}

forward_point_binop!(Add, add, Point);
forward_point_binop!(Sub, sub, Point);
forward_point_binop!(Mul, mul, Scalar);

impl Mul<Point> for Scalar {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        &rhs * &self
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        -&self
    }
}

impl AddAssign<&Point> for Point {
    fn add_assign(&mut self, rhs: &Point) {
        *self = &*self + rhs;
    }
}

impl AddAssign<Point> for Point {
    fn add_assign(&mut self, rhs: Point) {
        *self += &rhs;
    }
}

impl SubAssign<&Point> for Point {
    fn sub_assign(&mut self, rhs: &Point) {
        *self = &*self - rhs;
    }
}

impl SubAssign<Point> for Point {
    fn sub_assign(&mut self, rhs: Point) {
        *self -= &rhs;
    }
}

impl core::iter::Sum for Point {
    fn sum<I: Iterator<Item = Point>>(iter: I) -> Point {
        iter.fold(Point::identity(), |acc, p| acc + p)
    }
}

impl<'a> core::iter::Sum<&'a Point> for Point {
    fn sum<I: Iterator<Item = &'a Point>>(iter: I) -> Point {
        iter.fold(Point::identity(), |acc, p| acc + p)
    }
}

crate::impl_display_debug_serialize! {
    fn to_bytes(point: &Point) -> [u8;33] {
        point.to_bytes()
    }
}

crate::impl_fromstr_deserialize! {
    name => "secp256k1 point",
    fn from_bytes(bytes: [u8;33]) -> Option<Point> {
        Point::from_bytes(bytes).ok()
    }
}
