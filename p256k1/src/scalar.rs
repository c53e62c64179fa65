//! Arithmetic modulo the group order n.
//!
//! A [`Scalar`] is always fully reduced: every constructor and operation
//! returns a value in `[0, n)`. Operations are constant time unless their
//! name ends in `_var`.
use core::{
    iter::Sum,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use digest::{FixedOutput, generic_array::typenum::U32};
use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// The order of the group as little-endian 64-bit limbs.
const N: [u64; 4] = [
    0xBFD25E8CD0364141,
    0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE,
    0xFFFFFFFFFFFFFFFF,
];

/// 2^256 - n
const N_C: [u64; 3] = [0x402DA1732FC9BEBF, 0x4551231950B75FC4, 1];

/// n / 2
const N_H: [u64; 4] = [
    0xDFE92F46681B20A0,
    0x5D576E7357A4501D,
    0xFFFFFFFFFFFFFFFF,
    0x7FFFFFFFFFFFFFFF,
];

/// An integer modulo the order of secp256k1.
#[derive(Clone, Copy, Default)]
pub struct Scalar {
    d: [u64; 4],
}

impl Scalar {
    /// The scalar `0`.
    pub const ZERO: Self = Self { d: [0; 4] };
    /// The scalar `1`.
    pub const ONE: Self = Self { d: [1, 0, 0, 0] };

    /// Creates a scalar from eight 32-bit words, most significant first. The
    /// value must be less than n.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(d7: u32, d6: u32, d5: u32, d4: u32, d3: u32, d2: u32, d1: u32, d0: u32) -> Self {
        Self {
            d: [
                ((d1 as u64) << 32) | d0 as u64,
                ((d3 as u64) << 32) | d2 as u64,
                ((d5 as u64) << 32) | d4 as u64,
                ((d7 as u64) << 32) | d6 as u64,
            ],
        }
    }

    /// Creates a scalar from a small integer.
    pub const fn from_u32(int: u32) -> Self {
        Self {
            d: [int as u64, 0, 0, 0],
        }
    }

    /// Returns `n - 1`.
    pub fn minus_one() -> Self {
        -Self::ONE
    }

    fn check_overflow(d: &[u64; 4]) -> Choice {
        !ct_less_than(d, &N)
    }

    /// Adds `overflow * (2^256 - n)` discarding the carry out of the top limb.
    fn reduce(d: &[u64; 4], overflow: u64) -> [u64; 4] {
        let mut out = [0u64; 4];
        let mut t = 0u128;
        for i in 0..4 {
            let c = if i < 3 { N_C[i] } else { 0 };
            t += u128::from(d[i]) + u128::from(overflow * c);
            out[i] = t as u64;
            t >>= 64;
        }
        out
    }

    /// Parses 32 big-endian bytes, reducing modulo n.
    ///
    /// Also returns whether the value was `>= n` before reduction.
    pub fn from_bytes_overflow(bytes: [u8; 32]) -> (Self, Choice) {
        let mut d = [0u64; 4];
        for (i, limb) in d.iter_mut().enumerate() {
            let mut word = [0u8; 8];
            word.copy_from_slice(&bytes[24 - i * 8..32 - i * 8]);
            *limb = u64::from_be_bytes(word);
        }
        let overflow = Self::check_overflow(&d);
        (
            Self {
                d: Self::reduce(&d, u64::from(overflow.unwrap_u8())),
            },
            overflow,
        )
    }

    /// Parses 32 big-endian bytes as a scalar, returning `None` if the value is `>= n`.
    ///
    /// # Example
    /// ```
    /// use p256k1::Scalar;
    /// assert!(Scalar::from_bytes([0xff; 32]).is_none());
    /// assert_eq!(Scalar::from_bytes([0u8; 32]), Some(Scalar::ZERO));
    /// ```
    pub fn from_bytes(bytes: [u8; 32]) -> Option<Self> {
        let (scalar, overflow) = Self::from_bytes_overflow(bytes);
        if bool::from(overflow) {
            None
        } else {
            Some(scalar)
        }
    }

    /// Parses 32 big-endian bytes and reduces the value modulo n.
    ///
    /// # Example
    /// ```
    /// use p256k1::{hex, Scalar};
    /// let scalar_overflowed = Scalar::from_bytes_mod_order(
    ///     hex::decode_array("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364142")
    ///         .unwrap(),
    /// );
    /// assert_eq!(scalar_overflowed, Scalar::ONE);
    /// ```
    pub fn from_bytes_mod_order(bytes: [u8; 32]) -> Self {
        Self::from_bytes_overflow(bytes).0
    }

    /// Like [`Scalar::from_bytes`] but takes a slice. Returns `None` if the
    /// slice is not 32 bytes long or the value is `>= n`.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; 32] = slice.try_into().ok()?;
        Self::from_bytes(bytes)
    }

    /// Parses a 32-byte secret key: the value must be in `[1, n)`.
    pub fn from_bytes_nonzero(bytes: [u8; 32]) -> Option<Self> {
        Self::from_bytes(bytes).filter(|scalar| !bool::from(scalar.is_zero()))
    }

    /// Serializes the scalar as 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (i, limb) in self.d.iter().enumerate() {
            bytes[24 - i * 8..32 - i * 8].copy_from_slice(&limb.to_be_bytes());
        }
        bytes
    }

    /// Converts the output of a 32-byte hash into a scalar by reducing it modulo n.
    ///
    /// # Example
    /// ```
    /// use digest::Digest;
    /// use p256k1::Scalar;
    /// let mut hash = sha2::Sha256::default();
    /// hash.update(b"Chancellor on brink of second bailout for banks".as_ref());
    /// let scalar = Scalar::from_hash(hash);
    /// # assert_eq!(
    /// #     scalar.to_bytes(),
    /// #     p256k1::hex::decode_array("8131e6f4b45754f2c90bd06688ceeabc0c45055460729928b4eecf11026a9e2d").unwrap()
    /// # );
    /// ```
    pub fn from_hash(hash: impl FixedOutput<OutputSize = U32>) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(hash.finalize_fixed().as_slice());
        Self::from_bytes_mod_order(bytes)
    }

    /// Generates a uniformly random non-zero scalar by rejection sampling.
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        loop {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            if let Some(scalar) = Self::from_bytes_nonzero(bytes) {
                return scalar;
            }
        }
    }

    /// Whether the scalar is zero.
    pub fn is_zero(&self) -> Choice {
        (self.d[0] | self.d[1] | self.d[2] | self.d[3]).ct_eq(&0)
    }

    /// Whether the scalar is one.
    pub fn is_one(&self) -> Choice {
        self.ct_eq(&Self::ONE)
    }

    /// Whether the scalar is odd.
    pub fn is_odd(&self) -> Choice {
        Choice::from((self.d[0] & 1) as u8)
    }

    /// Whether the scalar is greater than `n / 2`.
    pub fn is_high(&self) -> Choice {
        ct_less_than(&N_H, &self.d)
    }

    /// Negates the scalar if `flag` is set.
    pub fn conditional_negate(&mut self, flag: Choice) {
        let negated = -*self;
        self.conditional_assign(&negated, flag);
    }

    /// Returns `count` bits starting at bit `offset`. The bits must lie within a single limb.
    pub fn get_bits(&self, offset: usize, count: usize) -> u32 {
        debug_assert!(count <= 32 && (offset + count - 1) >> 6 == offset >> 6);
        ((self.d[offset >> 6] >> (offset & 0x3F)) & ((1u64 << count) - 1)) as u32
    }

    /// Returns `count` bits starting at bit `offset`, possibly spanning two limbs.
    pub fn get_bits_var(&self, offset: usize, count: usize) -> u32 {
        debug_assert!(count < 32 && offset + count <= 256);
        if (offset + count - 1) >> 6 == offset >> 6 {
            self.get_bits(offset, count)
        } else {
            (((self.d[offset >> 6] >> (offset & 0x3F))
                | (self.d[(offset >> 6) + 1] << (64 - (offset & 0x3F))))
                & ((1u64 << count) - 1)) as u32
        }
    }

    /// Adds `2^bit` if `flag` is set. The result must not overflow.
    fn cadd_bit(&mut self, bit: usize, flag: bool) {
        let bit = bit + (usize::from(!flag) << 8);
        let mut t = 0u128;
        for i in 0..4 {
            let add = if bit >> 6 == i && bit < 256 {
                1u64 << (bit & 0x3F)
            } else {
                0
            };
            t += u128::from(self.d[i]) + u128::from(add);
            self.d[i] = t as u64;
            t >>= 64;
        }
    }

    /// Returns `round(self * b / 2^shift)` for `shift >= 256`, in variable time.
    pub fn mul_shift_var(&self, b: &Scalar, shift: usize) -> Scalar {
        debug_assert!(shift >= 256);
        let l = mul_wide(&self.d, &b.d);
        let shiftlimbs = shift >> 6;
        let shiftlow = shift & 0x3F;
        let shifthigh = 64 - shiftlow;
        let mut r = Scalar::ZERO;
        for i in 0..4 {
            if shift + 64 * i < 512 {
                let mut limb = l[i + shiftlimbs] >> shiftlow;
                if shift + 64 * i < 448 && shiftlow != 0 {
                    limb |= l[1 + i + shiftlimbs] << shifthigh;
                }
                r.d[i] = limb;
            }
        }
        let round = (l[(shift - 1) >> 6] >> ((shift - 1) & 0x3F)) & 1;
        r.cadd_bit(0, round == 1);
        r
    }

    /// Splits `self` into `(r1, r2)` with `self = r1 + r2 * 2^128` and both halves below 2^128.
    pub fn split_128(&self) -> (Scalar, Scalar) {
        (
            Scalar {
                d: [self.d[0], self.d[1], 0, 0],
            },
            Scalar {
                d: [self.d[2], self.d[3], 0, 0],
            },
        )
    }

    /// Splits `self` into `(r1, r2)` with `self = r1 + r2 * lambda` where
    /// lambda is the cube root of unity used by the curve endomorphism.
    ///
    /// Both halves are at most 128 bits long in absolute value (i.e. either
    /// `r` or `-r` fits in 128 bits).
    pub fn split_lambda(&self) -> (Scalar, Scalar) {
        let c1 = self.mul_shift_var(&G1, 384);
        let c2 = self.mul_shift_var(&G2, 384);
        let r2 = &(&c1 * &MINUS_B1) + &(&c2 * &MINUS_B2);
        let r1 = &(&r2 * &MINUS_LAMBDA) + self;
        (r1, r2)
    }

    fn pow2k(&self, k: usize) -> Self {
        let mut x = *self;
        for _ in 0..k {
            x = x.square();
        }
        x
    }

    /// Returns `self * self`.
    pub fn square(&self) -> Self {
        self * self
    }

    /// Returns the multiplicative inverse by raising to `n - 2`. Zero maps to zero.
    ///
    /// # Example
    /// ```
    /// use p256k1::Scalar;
    /// let a = Scalar::random(&mut rand::thread_rng());
    /// assert_eq!(a * a.invert(), Scalar::ONE);
    /// ```
    #[must_use]
    pub fn invert(&self) -> Self {
        // Uses the addition chain from
        // https://briansmith.org/ecc-inversion-addition-chains-01#secp256k1_scalar_inversion
        let x_1 = *self;
        let x_10 = self.pow2k(1);
        let x_11 = x_10.mul(&x_1);
        let x_101 = x_10.mul(&x_11);
        let x_111 = x_10.mul(&x_101);
        let x_1001 = x_10.mul(&x_111);
        let x_1011 = x_10.mul(&x_1001);
        let x_1101 = x_10.mul(&x_1011);

        let x6 = x_1101.pow2k(2).mul(&x_1011);
        let x8 = x6.pow2k(2).mul(&x_11);
        let x14 = x8.pow2k(6).mul(&x6);
        let x28 = x14.pow2k(14).mul(&x14);
        let x56 = x28.pow2k(28).mul(&x28);

        #[rustfmt::skip]
        let res = x56
            .pow2k(56).mul(&x56)
            .pow2k(14).mul(&x14)
            .pow2k(3).mul(&x_101)
            .pow2k(4).mul(&x_111)
            .pow2k(4).mul(&x_101)
            .pow2k(5).mul(&x_1011)
            .pow2k(4).mul(&x_1011)
            .pow2k(4).mul(&x_111)
            .pow2k(5).mul(&x_111)
            .pow2k(6).mul(&x_1101)
            .pow2k(4).mul(&x_101)
            .pow2k(3).mul(&x_111)
            .pow2k(5).mul(&x_1001)
            .pow2k(6).mul(&x_101)
            .pow2k(10).mul(&x_111)
            .pow2k(4).mul(&x_111)
            .pow2k(9).mul(&x8)
            .pow2k(5).mul(&x_1001)
            .pow2k(6).mul(&x_1011)
            .pow2k(4).mul(&x_1101)
            .pow2k(5).mul(&x_11)
            .pow2k(6).mul(&x_1101)
            .pow2k(10).mul(&x_1101)
            .pow2k(4).mul(&x_1001)
            .pow2k(6).mul(&x_1)
            .pow2k(8).mul(&x6);
        res
    }

    /// Raises `self` to the power of the 256-bit big-endian `exponent` in constant time.
    #[must_use]
    pub fn pow(&self, exponent: &[u8; 32]) -> Self {
        let mut acc = Scalar::ONE;
        for byte in exponent {
            for i in (0..8).rev() {
                acc = acc.square();
                let with_mul = acc.mul(self);
                acc.conditional_assign(&with_mul, Choice::from((byte >> i) & 1));
            }
        }
        acc
    }

    fn mul(&self, rhs: &Scalar) -> Scalar {
        reduce_512(&mul_wide(&self.d, &rhs.d))
    }
}

// Constants for the GLV decomposition of the endomorphism lambda * (x, y) = (beta * x, y).
const MINUS_LAMBDA: Scalar = Scalar::new(
    0xAC9C52B3, 0x3FA3CF1F, 0x5AD9E3FD, 0x77ED9BA4, 0xA880B9FC, 0x8EC739C2, 0xE0CFC810, 0xB51283CF,
);
const MINUS_B1: Scalar = Scalar::new(
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0xE4437ED6, 0x010E8828, 0x6F547FA9, 0x0ABFE4C3,
);
const MINUS_B2: Scalar = Scalar::new(
    0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFE, 0x8A280AC5, 0x0774346D, 0xD765CDA8, 0x3DB1562C,
);
const G1: Scalar = Scalar::new(
    0x3086D221, 0xA7D46BCD, 0xE86C90E4, 0x9284EB15, 0x3DAA8A14, 0x71E8CA7F, 0xE893209A, 0x45DBB031,
);
const G2: Scalar = Scalar::new(
    0xE4437ED6, 0x010E8828, 0x6F547FA9, 0x0ABFE4C4, 0x221208AC, 0x9DF506C6, 0x1571B4AE, 0x8AC47F71,
);

/// The endomorphism eigenvalue: `lambda * (x, y) = (beta * x, y)`.
pub const LAMBDA: Scalar = Scalar::new(
    0x5363AD4C, 0xC05C30E0, 0xA5261C02, 0x8812645A, 0x122E22EA, 0x20816678, 0xDF02967C, 0x1B23BD72,
);

/// Constant-time `a < b` on little-endian limbs.
fn ct_less_than(a: &[u64; 4], b: &[u64; 4]) -> Choice {
    let mut lt = 0u8;
    let mut gt = 0u8;
    for i in (0..4).rev() {
        let decided = lt | gt;
        lt |= (a[i] < b[i]) as u8 & !decided & 1;
        gt |= (a[i] > b[i]) as u8 & !decided & 1;
    }
    Choice::from(lt)
}

fn mul_wide(a: &[u64; 4], b: &[u64; 4]) -> [u64; 8] {
    let mut l = [0u64; 8];
    for i in 0..4 {
        let mut carry = 0u128;
        for j in 0..4 {
            let t = u128::from(l[i + j]) + u128::from(a[i]) * u128::from(b[j]) + carry;
            l[i + j] = t as u64;
            carry = t >> 64;
        }
        l[i + 4] = carry as u64;
    }
    l
}

/// Computes `lo + hi * (2^256 - n)`.
fn fold(lo: &[u64], hi: &[u64]) -> [u64; 8] {
    let mut out = [0u64; 8];
    out[..4].copy_from_slice(&lo[..4]);
    for (i, &h) in hi.iter().enumerate() {
        let mut carry = 0u128;
        for (j, &c) in N_C.iter().enumerate() {
            let t = u128::from(out[i + j]) + u128::from(h) * u128::from(c) + carry;
            out[i + j] = t as u64;
            carry = t >> 64;
        }
        for limb in out.iter_mut().skip(i + 3) {
            let t = u128::from(*limb) + carry;
            *limb = t as u64;
            carry = t >> 64;
        }
    }
    out
}

fn reduce_512(l: &[u64; 8]) -> Scalar {
    // 512 -> 385 bits
    let m = fold(&l[..4], &l[4..8]);
    // 385 -> 258 bits
    let p = fold(&m[..4], &m[4..7]);
    // 258 -> 256 bits plus a carry bit
    let r = fold(&p[..4], &p[4..5]);
    let d = [r[0], r[1], r[2], r[3]];
    let overflow = r[4] | u64::from(Scalar::check_overflow(&d).unwrap_u8());
    Scalar {
        d: Scalar::reduce(&d, overflow),
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut d = [0u64; 4];
        for (i, limb) in d.iter_mut().enumerate() {
            *limb = u64::conditional_select(&a.d[i], &b.d[i], choice);
        }
        Scalar { d }
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.d[0].ct_eq(&other.d[0])
            & self.d[1].ct_eq(&other.d[1])
            & self.d[2].ct_eq(&other.d[2])
            & self.d[3].ct_eq(&other.d[3])
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl core::hash::Hash for Scalar {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state)
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordering by integer value. Not constant time.
impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.to_bytes().cmp(&other.to_bytes())
    }
}

impl From<u32> for Scalar {
    fn from(int: u32) -> Self {
        Scalar::from_u32(int)
    }
}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;

    fn add(self, rhs: &Scalar) -> Scalar {
        let mut d = [0u64; 4];
        let mut t = 0u128;
        for (i, limb) in d.iter_mut().enumerate() {
            t += u128::from(self.d[i]) + u128::from(rhs.d[i]);
            *limb = t as u64;
            t >>= 64;
        }
        let overflow = (t as u64) | u64::from(Scalar::check_overflow(&d).unwrap_u8());
        Scalar {
            d: Scalar::reduce(&d, overflow),
        }
    }
}

impl Neg for &Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        let nonzero = u64::from((!self.is_zero()).unwrap_u8()).wrapping_neg();
        let mut d = [0u64; 4];
        let mut t = 1u128;
        for (i, limb) in d.iter_mut().enumerate() {
            t += u128::from(!self.d[i]) + u128::from(N[i]);
            *limb = (t as u64) & nonzero;
            t >>= 64;
        }
        Scalar { d }
    }
}

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;

    fn mul(self, rhs: &Scalar) -> Scalar {
        Scalar::mul(self, rhs)
    }
}

impl Sub<&Scalar> for &Scalar {
    type Output = Scalar;

    fn sub(self, rhs: &Scalar) -> Scalar {
        self + &(-rhs)
    }
}

macro_rules! forward_binop {
    ($trait:ident, $fn:ident, $assign_trait:ident, $assign_fn:ident) => {
        impl $trait<Scalar> for Scalar {
            type Output = Scalar;
            fn $fn(self, rhs: Scalar) -> Scalar {
                $trait::$fn(&self, &rhs)
            }
        }

        impl $trait<&Scalar> for Scalar {
            type Output = Scalar;
            fn $fn(self, rhs: &Scalar) -> Scalar {
                $trait::$fn(&self, rhs)
            }
        }

        impl $trait<Scalar> for &Scalar {
            type Output = Scalar;
            fn $fn(self, rhs: Scalar) -> Scalar {
                $trait::$fn(self, &rhs)
            }
        }

        impl $assign_trait<&Scalar> for Scalar {
            fn $assign_fn(&mut self, rhs: &Scalar) {
                *self = $trait::$fn(&*self, rhs);
            }
        }

        impl $assign_trait<Scalar> for Scalar {
            fn $assign_fn(&mut self, rhs: Scalar) {
                *self = $trait::$fn(&*self, &rhs);
            }
        }
    };
}

/// `self * rhs⁻¹`. The divisor must be nonzero: dividing by zero gives zero.
impl Div<&Scalar> for &Scalar {
    type Output = Scalar;

    fn div(self, rhs: &Scalar) -> Scalar {
        self * &rhs.invert()
    }
}

forward_binop!(Add, add, AddAssign, add_assign);
forward_binop!(Sub, sub, SubAssign, sub_assign);
forward_binop!(Mul, mul, MulAssign, mul_assign);
forward_binop!(Div, div, DivAssign, div_assign);

impl Sum for Scalar {
    fn sum<I: Iterator<Item = Scalar>>(iter: I) -> Scalar {
        iter.fold(Scalar::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Scalar> for Scalar {
    fn sum<I: Iterator<Item = &'a Scalar>>(iter: I) -> Scalar {
        iter.fold(Scalar::ZERO, |acc, x| acc + x)
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        -&self
    }
}

crate::impl_display_debug_serialize! {
    fn to_bytes(scalar: &Scalar) -> [u8;32] {
        scalar.to_bytes()
    }
}

crate::impl_fromstr_deserialize! {
    name => "secp256k1 scalar",
    fn from_bytes(bytes: [u8;32]) -> Option<Scalar> {
        Scalar::from_bytes(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hex;
    use alloc::string::ToString;
    use proptest::prelude::*;

    #[test]
    fn minus_one_is_n_minus_one() {
        assert_eq!(
            hex::encode(&Scalar::minus_one().to_bytes()),
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140"
        );
        assert_eq!(Scalar::minus_one() + Scalar::ONE, Scalar::ZERO);
        assert_eq!(-Scalar::ZERO, Scalar::ZERO);
    }

    #[test]
    fn overflow_detection() {
        let n: [u8; 32] =
            hex::decode_array("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141")
                .unwrap();
        let (reduced, overflow) = Scalar::from_bytes_overflow(n);
        assert!(bool::from(overflow));
        assert_eq!(reduced, Scalar::ZERO);
        let mut n_minus_one = n;
        n_minus_one[31] = 0x40;
        let (_, overflow) = Scalar::from_bytes_overflow(n_minus_one);
        assert!(!bool::from(overflow));
        assert!(Scalar::from_bytes_nonzero([0u8; 32]).is_none());
    }

    #[test]
    fn is_high_boundary() {
        let half: [u8; 32] =
            hex::decode_array("7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0")
                .unwrap();
        let half = Scalar::from_bytes(half).unwrap();
        assert!(!bool::from(half.is_high()));
        assert!(bool::from((half + Scalar::ONE).is_high()));
        assert!(bool::from(Scalar::minus_one().is_high()));
    }

    #[test]
    fn lambda_is_cube_root_of_unity() {
        assert_eq!(LAMBDA * LAMBDA * LAMBDA, Scalar::ONE);
        assert_eq!(-LAMBDA, MINUS_LAMBDA);
    }

    #[test]
    fn invert_zero_is_zero() {
        assert_eq!(Scalar::ZERO.invert(), Scalar::ZERO);
    }

    #[test]
    fn get_bits_across_limbs() {
        let scalar = Scalar {
            d: [0xF000_0000_0000_0000, 0x5, 0, 0],
        };
        assert_eq!(scalar.get_bits(60, 4), 0xF);
        assert_eq!(scalar.get_bits_var(60, 8), 0x5F);
        assert_eq!(scalar.get_bits_var(62, 5), 0b10111);
    }

    fn scalar_strategy() -> impl Strategy<Value = Scalar> {
        prop_oneof![
            any::<[u8; 32]>().prop_map(Scalar::from_bytes_mod_order),
            Just(Scalar::ZERO),
            Just(Scalar::ONE),
            Just(Scalar::minus_one()),
        ]
    }

    #[test]
    fn sum_of_scalars() {
        let scalars = [Scalar::from(3), Scalar::from(4), Scalar::minus_one()];
        assert_eq!(scalars.iter().sum::<Scalar>(), Scalar::from(6));
        assert_eq!(scalars.into_iter().sum::<Scalar>(), Scalar::from(6));
        assert_eq!(core::iter::empty::<Scalar>().sum::<Scalar>(), Scalar::ZERO);
        assert_eq!(Scalar::from(12) / Scalar::from(4), Scalar::from(3));
    }

    fn is_short(scalar: &Scalar) -> bool {
        let neg = -scalar;
        (scalar.d[2] == 0 && scalar.d[3] == 0) || (neg.d[2] == 0 && neg.d[3] == 0)
    }

    proptest! {
        #[test]
        fn ring_laws(a in scalar_strategy(), b in scalar_strategy(), c in scalar_strategy()) {
            prop_assert_eq!(a + b, b + a);
            prop_assert_eq!(a * b, b * a);
            prop_assert_eq!(a * (b + c), a * b + a * c);
            prop_assert_eq!((a - b) + b, a);
            prop_assert_eq!(a + (-a), Scalar::ZERO);
        }

        #[test]
        fn invert(a in scalar_strategy()) {
            prop_assume!(!bool::from(a.is_zero()));
            prop_assert_eq!(a * a.invert(), Scalar::ONE);
        }

        #[test]
        fn division_undoes_multiplication(a in scalar_strategy(), b in scalar_strategy()) {
            prop_assume!(!bool::from(b.is_zero()));
            prop_assert_eq!((a / b) * b, a);
            let mut c = a * b;
            c /= &b;
            prop_assert_eq!(c, a);
        }

        #[test]
        fn pow_n_minus_two_matches_invert(a in scalar_strategy()) {
            let n_minus_two = Scalar::minus_one() - Scalar::ONE;
            prop_assert_eq!(a.pow(&n_minus_two.to_bytes()), a.invert());
        }

        #[test]
        fn bytes_roundtrip(a in scalar_strategy()) {
            prop_assert_eq!(Scalar::from_bytes(a.to_bytes()), Some(a));
            prop_assert_eq!(a.to_string().parse::<Scalar>().unwrap(), a);
        }

        #[test]
        fn split_lambda_recombines(a in scalar_strategy()) {
            let (r1, r2) = a.split_lambda();
            prop_assert_eq!(r1 + r2 * LAMBDA, a);
            prop_assert!(is_short(&r1));
            prop_assert!(is_short(&r2));
        }

        #[test]
        fn split_128_recombines(a in scalar_strategy()) {
            let (r1, r2) = a.split_128();
            let two_128 = Scalar::new(0, 0, 0, 1, 0, 0, 0, 0);
            prop_assert_eq!(r1 + r2 * two_128, a);
        }

        #[test]
        fn conditional_negate(a in scalar_strategy(), flag in any::<bool>()) {
            let mut b = a;
            b.conditional_negate(Choice::from(flag as u8));
            prop_assert_eq!(b, if flag { -a } else { a });
        }

        #[test]
        fn get_bits_var_matches_bytes(a in scalar_strategy(), offset in 0usize..250) {
            let bytes = a.to_bytes();
            let bit = |i: usize| (bytes[31 - i / 8] >> (i % 8)) & 1;
            let expected = (0..6).fold(0u32, |acc, i| acc | (u32::from(bit(offset + i)) << i));
            prop_assert_eq!(a.get_bits_var(offset, 6), expected);
        }
    }
}
