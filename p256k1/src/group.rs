//! Group operations on y² = x³ + 7 in affine ([`Ge`]) and Jacobian ([`Gej`])
//! coordinates.
//!
//! Jacobian `(X, Y, Z)` represents the affine point `(X/Z², Y/Z³)`. Functions
//! ending in `_var` branch on their inputs and must only see public data.
use crate::{
    Error,
    field::{Fe, FeStorage},
};
use alloc::vec::Vec;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// The curve constant b in y² = x³ + b.
pub const CURVE_B: u32 = 7;

/// A non-trivial cube root of unity in the field: `beta * x` is the x-coordinate
/// of `lambda * (x, y)`.
pub const BETA: Fe = Fe::new(
    0x7ae96a2b, 0x657c0710, 0x6e64479e, 0xac3434e9, 0x9cf04975, 0x12f58995, 0xc1396c28, 0x719501ee,
);

/// The standard generator.
pub const GENERATOR: Ge = Ge::new_xy(
    Fe::new(
        0x79BE667E, 0xF9DCBBAC, 0x55A06295, 0xCE870B07, 0x029BFCDB, 0x2DCE28D9, 0x59F2815B,
        0x16F81798,
    ),
    Fe::new(
        0x483ADA77, 0x26A3C465, 0x5DA4FBFC, 0x0E1108A8, 0xFD17B448, 0xA6855419, 0x9C47D08F,
        0xFB10D4B8,
    ),
);

/// A point in affine coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Ge {
    /// The x-coordinate.
    pub x: Fe,
    /// The y-coordinate.
    pub y: Fe,
    /// Whether this is the point at infinity. The coordinates are meaningless when set.
    pub infinity: bool,
}

/// A point in Jacobian coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Gej {
    /// The X coordinate.
    pub x: Fe,
    /// The Y coordinate.
    pub y: Fe,
    /// The Z coordinate.
    pub z: Fe,
    /// Whether this is the point at infinity. The coordinates are meaningless when set.
    pub infinity: bool,
}

/// A compact affine point with normalized coordinates, used in precomputed tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeStorage {
    /// The packed x-coordinate.
    pub x: FeStorage,
    /// The packed y-coordinate.
    pub y: FeStorage,
}

impl Ge {
    /// The point at infinity.
    pub const INFINITY: Self = Self {
        x: Fe::ZERO,
        y: Fe::ZERO,
        infinity: true,
    };

    /// Creates a point from coordinates without checking they are on the curve.
    pub const fn new_xy(x: Fe, y: Fe) -> Self {
        Self {
            x,
            y,
            infinity: false,
        }
    }

    /// Creates a point from coordinates if they satisfy the curve equation.
    pub fn from_xy(x: Fe, y: Fe) -> Option<Self> {
        let ge = Self::new_xy(x, y);
        if ge.is_valid_var() { Some(ge) } else { None }
    }

    /// Whether `x` is the x-coordinate of some point on the curve.
    pub fn x_on_curve_var(x: &Fe) -> bool {
        bool::from(Self::y_squared(x).sqrt().is_some())
    }

    fn y_squared(x: &Fe) -> Fe {
        let x3 = x.sqr().mul(x);
        x3 + Fe::from(CURVE_B)
    }

    /// Recovers a point from its x-coordinate and the parity of its
    /// y-coordinate in constant time.
    ///
    /// Fails if `x³ + 7` has no square root.
    pub fn set_xo(x: &Fe, odd: Choice) -> CtOption<Self> {
        let root = Self::y_squared(x).sqrt();
        let y = root.unwrap_or(Fe::ZERO).normalize();
        let neg_y = (-y).normalize();
        let mut y = y;
        let flip = Choice::from(y.is_odd() as u8) ^ odd;
        y.cmov(&neg_y, flip);
        CtOption::new(Self::new_xy(x.normalize(), y), root.is_some())
    }

    /// Variable time version of [`Ge::set_xo`].
    pub fn set_xo_var(x: &Fe, odd: bool) -> Option<Self> {
        let y: Option<Fe> = Self::y_squared(x).sqrt().into();
        let mut y = y?.normalize_var();
        if y.is_odd() != odd {
            y = -y;
        }
        Some(Self::new_xy(x.normalize_var(), y.normalize_var()))
    }

    /// Parses a 33-byte compressed or 65-byte uncompressed SEC1 encoding.
    ///
    /// Hybrid encodings (`0x06`/`0x07`) are accepted when the tag matches the
    /// parity of y, otherwise they fail with [`Error::InvalidInput`]. The
    /// point at infinity is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match (bytes.len(), bytes.first()) {
            (33, Some(&tag)) if tag == 0x02 || tag == 0x03 => {
                let x = Self::parse_coordinate(&bytes[1..33])?;
                Self::set_xo_var(&x, tag == 0x03).ok_or(Error::PointNotOnCurve)
            }
            (65, Some(&tag)) if tag == 0x04 || tag == 0x06 || tag == 0x07 => {
                let x = Self::parse_coordinate(&bytes[1..33])?;
                let y = Self::parse_coordinate(&bytes[33..65])?;
                if tag != 0x04 && y.is_odd() != (tag == 0x07) {
                    return Err(Error::InvalidInput);
                }
                Self::from_xy(x, y).ok_or(Error::PointNotOnCurve)
            }
            _ => Err(Error::InvalidInput),
        }
    }

    fn parse_coordinate(slice: &[u8]) -> Result<Fe, Error> {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Fe::from_bytes(bytes).ok_or(Error::OutOfRange)
    }

    /// Serializes a non-infinity point in the 33-byte compressed form.
    pub fn to_bytes_compressed(&self) -> [u8; 33] {
        debug_assert!(!self.infinity);
        let mut bytes = [0u8; 33];
        bytes[0] = if self.y.is_odd() { 0x03 } else { 0x02 };
        bytes[1..].copy_from_slice(&self.x.to_bytes());
        bytes
    }

    /// Serializes a non-infinity point in the 65-byte uncompressed form.
    pub fn to_bytes_uncompressed(&self) -> [u8; 65] {
        debug_assert!(!self.infinity);
        let mut bytes = [0u8; 65];
        bytes[0] = 0x04;
        bytes[1..33].copy_from_slice(&self.x.to_bytes());
        bytes[33..].copy_from_slice(&self.y.to_bytes());
        bytes
    }

    /// Whether this is the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.infinity
    }

    /// Checks the curve equation. The point at infinity is not valid.
    pub fn is_valid_var(&self) -> bool {
        if self.infinity {
            return false;
        }
        let y2 = self.y.sqr();
        y2.eq_var(&Self::y_squared(&self.x))
    }

    /// Returns `-self`.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
            infinity: self.infinity,
        }
    }

    /// Fully normalizes both coordinates in constant time.
    #[must_use]
    pub fn normalize(&self) -> Self {
        Self {
            x: self.x.normalize(),
            y: self.y.normalize(),
            infinity: self.infinity,
        }
    }

    /// Returns `lambda * self` using the endomorphism `(x, y) -> (beta * x, y)`.
    #[must_use]
    pub fn mul_lambda(&self) -> Self {
        Self {
            x: self.x.mul(&BETA),
            y: self.y,
            infinity: self.infinity,
        }
    }

    /// Converts from Jacobian coordinates in constant time.
    pub fn set_gej(a: &Gej) -> Self {
        let zinv = a.z.inv();
        let z2 = zinv.sqr();
        let z3 = zinv.mul(&z2);
        Self {
            x: a.x.mul(&z2),
            y: a.y.mul(&z3),
            infinity: a.infinity,
        }
    }

    /// Converts from Jacobian coordinates in variable time. The coordinates are normalized.
    pub fn set_gej_var(a: &Gej) -> Self {
        if a.infinity {
            return Self::INFINITY;
        }
        let ge = Self::set_gej(a);
        Self::new_xy(ge.x.normalize_var(), ge.y.normalize_var())
    }

    /// Converts many Jacobian points at once with a single field inversion.
    pub fn set_all_gej_var(points: &[Gej]) -> Vec<Ge> {
        let zs: Vec<Fe> = points
            .iter()
            .filter(|p| !p.infinity)
            .map(|p| p.z)
            .collect();
        let mut zinvs = Fe::inv_all(&zs).into_iter();
        points
            .iter()
            .map(|p| match p.infinity {
                true => Ge::INFINITY,
                false => match zinvs.next() {
                    Some(zinv) => {
                        let z2 = zinv.sqr();
                        let z3 = zinv.mul(&z2);
                        Ge::new_xy(p.x.mul(&z2).normalize_var(), p.y.mul(&z3).normalize_var())
                    }
                    None => Ge::INFINITY,
                },
            })
            .collect()
    }

    /// Packs a non-infinity point into its storage form.
    pub fn to_storage(&self) -> GeStorage {
        debug_assert!(!self.infinity);
        GeStorage {
            x: self.x.to_storage(),
            y: self.y.to_storage(),
        }
    }

    /// Unpacks a storage point.
    pub fn from_storage(storage: &GeStorage) -> Self {
        Self::new_xy(Fe::from_storage(&storage.x), Fe::from_storage(&storage.y))
    }

    /// Conditionally replaces `self` with `other` in constant time.
    pub fn cmov(&mut self, other: &Ge, flag: Choice) {
        self.x.cmov(&other.x, flag);
        self.y.cmov(&other.y, flag);
        let mut inf = self.infinity as u8;
        inf.conditional_assign(&(other.infinity as u8), flag);
        self.infinity = inf == 1;
    }
}

impl PartialEq for Ge {
    fn eq(&self, other: &Self) -> bool {
        match (self.infinity, other.infinity) {
            (true, true) => true,
            (false, false) => self.x == other.x && self.y == other.y,
            _ => false,
        }
    }
}

impl Eq for Ge {}

impl GeStorage {
    /// Conditionally replaces `self` with `other` in constant time.
    pub fn cmov(&mut self, other: &GeStorage, flag: Choice) {
        self.x.cmov(&other.x, flag);
        self.y.cmov(&other.y, flag);
    }
}

impl Default for Gej {
    fn default() -> Self {
        Self::INFINITY
    }
}

impl Gej {
    /// The point at infinity.
    pub const INFINITY: Self = Self {
        x: Fe::ZERO,
        y: Fe::ZERO,
        z: Fe::ZERO,
        infinity: true,
    };

    /// Converts an affine point into Jacobian coordinates with `Z = 1`.
    pub const fn from_ge(a: &Ge) -> Self {
        Self {
            x: a.x,
            y: a.y,
            z: Fe::ONE,
            infinity: a.infinity,
        }
    }

    /// Whether this is the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.infinity
    }

    /// Returns `-self`.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
            z: self.z,
            infinity: self.infinity,
        }
    }

    /// Multiplies the coordinates by the non-zero `s` without changing the point.
    pub fn rescale(&mut self, s: &Fe) {
        let zz = s.sqr();
        self.x = self.x.mul(&zz);
        self.y = self.y.mul(&zz.mul(s));
        self.z = self.z.mul(s);
    }

    /// Doubles the point in constant time.
    #[must_use]
    pub fn double(&self) -> Self {
        // Formula used:
        // L = (3/2) * X1^2
        // S = Y1^2
        // T = -X1*S
        // X3 = L^2 + 2*T
        // Y3 = -(L*(X3 + T) + S^2)
        // Z3 = Y1*Z1
        let z = self.z.mul(&self.y);
        let mut s = self.y.sqr();
        let l = self.x.sqr().mul_int(3).half();
        let mut t = s.negate(1).mul(&self.x);
        let mut x = l.sqr();
        x += &t;
        x += &t;
        s = s.sqr();
        t += &x;
        let mut y = t.mul(&l);
        y += &s;
        Self {
            x,
            y: y.negate(2),
            z,
            infinity: self.infinity,
        }
    }

    /// Doubles the point, returning infinity for infinity.
    #[must_use]
    pub fn double_var(&self) -> Self {
        if self.infinity {
            return Self::INFINITY;
        }
        self.double()
    }

    /// Adds two Jacobian points in variable time.
    #[must_use]
    pub fn add_var(&self, b: &Gej) -> Self {
        if self.infinity {
            return *b;
        }
        if b.infinity {
            return *self;
        }
        let z22 = b.z.sqr();
        let z12 = self.z.sqr();
        let u1 = self.x.mul(&z22);
        let u2 = b.x.mul(&z12);
        let s1 = self.y.mul(&z22).mul(&b.z);
        let s2 = b.y.mul(&z12).mul(&self.z);
        let mut h = u1.negate(1);
        h += &u2;
        let mut i = s2.negate(1);
        i += &s1;
        if h.normalizes_to_zero_var() {
            if i.normalizes_to_zero_var() {
                return self.double_var();
            }
            return Self::INFINITY;
        }

        let z = self.z.mul(&h.mul(&b.z));
        self.finish_add(z, &h, &i, &u1, &s1)
    }

    /// Adds an affine point in variable time.
    #[must_use]
    pub fn add_ge_var(&self, b: &Ge) -> Self {
        if self.infinity {
            return Self::from_ge(b);
        }
        if b.infinity {
            return *self;
        }
        let z12 = self.z.sqr();
        let u1 = self.x.normalize_weak();
        let u2 = b.x.mul(&z12);
        let s1 = self.y.normalize_weak();
        let s2 = b.y.mul(&z12).mul(&self.z);
        let mut h = u1.negate(1);
        h += &u2;
        let mut i = s2.negate(1);
        i += &s1;
        if h.normalizes_to_zero_var() {
            if i.normalizes_to_zero_var() {
                return self.double_var();
            }
            return Self::INFINITY;
        }

        let z = self.z.mul(&h);
        self.finish_add(z, &h, &i, &u1, &s1)
    }

    /// Shared tail of the variable time additions given `h = u2 - u1` and `i = s1 - s2`.
    fn finish_add(&self, z: Fe, h: &Fe, i: &Fe, u1: &Fe, s1: &Fe) -> Self {
        let h2 = h.sqr().negate(1);
        let h3 = h2.mul(h);
        let mut t = u1.mul(&h2);
        let mut x = i.sqr();
        x += &h3;
        x += &t;
        x += &t;
        t += &x;
        let mut y = t.mul(i);
        y += &h3.mul(s1);
        Self {
            x,
            y,
            z,
            infinity: false,
        }
    }

    /// Adds an affine point in constant time.
    ///
    /// `b` must not be infinity. All other cases, including `self == b`,
    /// `self == -b` and `self` being infinity, are handled without branching.
    #[must_use]
    pub fn add_ge(&self, b: &Ge) -> Self {
        debug_assert!(!b.infinity);
        let a = self;
        let zz = a.z.sqr();
        let u1 = a.x;
        let u2 = b.x.mul(&zz);
        let s1 = a.y;
        let s2 = b.y.mul(&zz).mul(&a.z);
        let mut t = u1;
        t += &u2;
        let mut m = s1;
        m += &s2;
        let mut rr = t.sqr();
        let mut m_alt = u2.negate(1);
        let tt = u1.mul(&m_alt);
        rr += &tt;
        // If lambda = R/M = R/0 we use the alternative expression (y1 - y2)/(x1 - x2).
        // M is zero when y1 = -y2 and x1³ = x2³ which happens for a = -b or
        // when the x-coordinates differ by a factor of beta.
        let degenerate = m.normalizes_to_zero();
        let mut rr_alt = s1.mul_int(2);
        m_alt += &u1;

        rr_alt.cmov(&rr, !degenerate);
        m_alt.cmov(&m, !degenerate);

        let mut n = m_alt.sqr();
        let q = t.negate(5).mul(&n);
        // Either M == Malt or M == 0 so M³·Malt is Malt⁴ or zero.
        n = n.sqr();
        n.cmov(&m, degenerate);
        let mut t = rr_alt.sqr();
        let mut z = a.z.mul(&m_alt);
        t += &q;
        let mut x = t;
        t = t.mul_int(2);
        t += &q;
        t = t.mul(&rr_alt);
        t += &n;
        let mut y = t.negate(6).half();

        let infinity = Choice::from(a.infinity as u8);
        x.cmov(&b.x, infinity);
        y.cmov(&b.y, infinity);
        z.cmov(&Fe::ONE, infinity);

        Self {
            x,
            y,
            z,
            infinity: z.normalizes_to_zero().into(),
        }
    }

    /// Adds two Jacobian points in constant time.
    ///
    /// The right hand side is converted to affine coordinates first, so this
    /// costs a field inversion.
    #[must_use]
    pub fn add(&self, b: &Gej) -> Self {
        let b_infinity = Choice::from(b.infinity as u8);
        let mut b_ge = Ge::set_gej(b);
        // keep the addition well defined; the result is discarded below
        b_ge.cmov(&GENERATOR, b_infinity);
        let mut sum = self.add_ge(&b_ge);
        sum.cmov(self, b_infinity);
        sum
    }

    /// Checks whether the affine x-coordinate of the point equals `x`.
    pub fn eq_x_var(&self, x: &Fe) -> bool {
        debug_assert!(!self.infinity);
        let r = self.z.sqr().mul(x);
        r.eq_var(&self.x)
    }

    /// Compares two points in variable time.
    pub fn eq_var(&self, other: &Gej) -> bool {
        match (self.infinity, other.infinity) {
            (true, true) => return true,
            (false, false) => {}
            _ => return false,
        }
        let lhs_z2 = self.z.sqr();
        let rhs_z2 = other.z.sqr();
        if !self.x.mul(&rhs_z2).eq_var(&other.x.mul(&lhs_z2)) {
            return false;
        }
        let lhs_y = self.y.mul(&rhs_z2.mul(&other.z));
        let rhs_y = other.y.mul(&lhs_z2.mul(&self.z));
        lhs_y.eq_var(&rhs_y)
    }

    /// Conditionally replaces `self` with `other` in constant time.
    pub fn cmov(&mut self, other: &Gej, flag: Choice) {
        self.x.cmov(&other.x, flag);
        self.y.cmov(&other.y, flag);
        self.z.cmov(&other.z, flag);
        let mut inf = self.infinity as u8;
        inf.conditional_assign(&(other.infinity as u8), flag);
        self.infinity = inf == 1;
    }
}

impl ConstantTimeEq for Gej {
    fn ct_eq(&self, other: &Self) -> Choice {
        let lhs_inf = Choice::from(self.infinity as u8);
        let rhs_inf = Choice::from(other.infinity as u8);
        let both_infinity = lhs_inf & rhs_inf;
        let only_one_is_infinity = lhs_inf ^ rhs_inf;
        // lhs: (x₁z₁², y₁z₁³, z₁), rhs: (x₂z₂², y₂z₂³, z₂)
        // compare (x₁z₁²z₂², y₁z₁³z₂³) with (x₂z₁²z₂², y₂z₁³z₂³)
        let lhs_z2 = self.z.sqr();
        let rhs_z2 = other.z.sqr();
        let x_eq = self.x.mul(&rhs_z2).ct_eq(&other.x.mul(&lhs_z2));
        let lhs_y = self.y.mul(&rhs_z2.mul(&other.z));
        let rhs_y = other.y.mul(&lhs_z2.mul(&self.z));
        let y_eq = lhs_y.ct_eq(&rhs_y);
        both_infinity | (!only_one_is_infinity & !lhs_inf & x_eq & y_eq)
    }
}

impl PartialEq for Gej {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Gej {}

impl From<Ge> for Gej {
    fn from(ge: Ge) -> Self {
        Gej::from_ge(&ge)
    }
}

impl From<&Gej> for Ge {
    fn from(gej: &Gej) -> Self {
        Ge::set_gej_var(gej)
    }
}
