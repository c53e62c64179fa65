//! Field arithmetic modulo p = 2^256 - 2^32 - 2^9 - 2^8 - 2^7 - 2^6 - 2^4 - 1
//!
//! Elements are represented as five 52-bit limbs held in `u64`s. The unused
//! top bits of each limb let us delay carry propagation: a sum of field
//! elements is just the limb-wise sum. To keep track of how far a value is
//! from being reduced we use the notion of a *magnitude*. An element has
//! magnitude `m` when each of its lower four limbs is at most `2 * m *
//! (2^52 - 1)` and the top limb is at most `2 * m * (2^48 - 1)`. Freshly parsed
//! elements and the outputs of [`Fe::mul`], [`Fe::sqr`] and
//! [`Fe::normalize_weak`] have magnitude 1. Adding two elements adds their
//! magnitudes. Multiplication requires inputs with magnitude at most 8.
//!
//! An element is *normalized* when it has magnitude 1 and its value is the
//! canonical residue in `[0, p)`. Only normalized elements may be compared
//! limb-wise or serialized; the functions here that need it normalize a copy
//! themselves.
use core::{
    cmp::Ordering,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

const M52: u64 = 0xF_FFFF_FFFF_FFFF;
const M48: u64 = 0xFFFF_FFFF_FFFF;
/// 2^256 mod p
const P_LOW: u64 = 0x1000003D1;
/// 2^260 mod p: the reduction constant for the fifth limb position.
const R: u64 = 0x1000003D10;
const P0: u64 = 0xF_FFFE_FFFF_FC2F;

/// An element of the secp256k1 base field.
#[derive(Clone, Copy)]
pub struct Fe {
    n: [u64; 5],
}

/// A normalized field element packed into four 64-bit words.
///
/// This is the form stored in precomputed tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeStorage(pub(crate) [u64; 4]);

impl Fe {
    /// The zero element.
    pub const ZERO: Self = Self { n: [0; 5] };
    /// The multiplicative identity.
    pub const ONE: Self = Self {
        n: [1, 0, 0, 0, 0],
    };

    /// Creates a field element from eight 32-bit words, most significant
    /// first. The value must be less than p.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(d7: u32, d6: u32, d5: u32, d4: u32, d3: u32, d2: u32, d1: u32, d0: u32) -> Self {
        let (d0, d1, d2, d3, d4, d5, d6, d7) = (
            d0 as u64, d1 as u64, d2 as u64, d3 as u64, d4 as u64, d5 as u64, d6 as u64,
            d7 as u64,
        );
        Self {
            n: [
                d0 | ((d1 & 0xFFFFF) << 32),
                (d1 >> 20) | (d2 << 12) | ((d3 & 0xFF) << 44),
                (d3 >> 8) | ((d4 & 0xFFFFFFF) << 24),
                (d4 >> 28) | (d5 << 4) | ((d6 & 0xFFFF) << 36),
                (d6 >> 16) | (d7 << 16),
            ],
        }
    }

    /// Creates a field element from a small integer.
    pub const fn from_u32(int: u32) -> Self {
        Self {
            n: [int as u64, 0, 0, 0, 0],
        }
    }

    /// Loads 32 big-endian bytes without checking or reducing the value.
    fn from_bytes_unchecked(bytes: [u8; 32]) -> Self {
        let mut w = [0u64; 4];
        for (i, word) in w.iter_mut().enumerate() {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
            *word = u64::from_be_bytes(buf);
        }
        Self {
            n: [
                w[3] & M52,
                (w[3] >> 52) | ((w[2] << 12) & M52),
                (w[2] >> 40) | ((w[1] << 24) & M52),
                (w[1] >> 28) | ((w[0] << 36) & M52),
                w[0] >> 16,
            ],
        }
    }

    fn overflows(&self) -> Choice {
        let n = &self.n;
        n[4].ct_eq(&M48)
            & (n[3] & n[2] & n[1]).ct_eq(&M52)
            & Choice::from((n[0] >= P0) as u8)
    }

    /// Parses a big-endian 32-byte encoding, rejecting values `>= p`.
    pub fn from_bytes(bytes: [u8; 32]) -> Option<Self> {
        let fe = Self::from_bytes_unchecked(bytes);
        if bool::from(fe.overflows()) {
            None
        } else {
            Some(fe)
        }
    }

    /// Parses a big-endian 32-byte encoding, reducing it modulo p.
    pub fn from_bytes_mod_order(bytes: [u8; 32]) -> Self {
        Self::from_bytes_unchecked(bytes).normalize()
    }

    /// Serializes the canonical value as 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let storage = self.to_storage();
        let mut bytes = [0u8; 32];
        for (i, word) in storage.0.iter().rev().enumerate() {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&word.to_be_bytes());
        }
        bytes
    }

    /// Reduces the element to its canonical representation in constant time.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let [mut t0, mut t1, mut t2, mut t3, mut t4] = self.n;

        // Reduce t4 at the start so there will be at most a single carry from the first pass
        let mut x = t4 >> 48;
        t4 &= M48;

        // The first pass ensures the magnitude is 1
        t0 += x * P_LOW;
        t1 += t0 >> 52;
        t0 &= M52;
        t2 += t1 >> 52;
        t1 &= M52;
        let mut m = t1;
        t3 += t2 >> 52;
        t2 &= M52;
        m &= t2;
        t4 += t3 >> 52;
        t3 &= M52;
        m &= t3;

        // At most a single final reduction is needed; check if the value is >= the field characteristic
        x = (t4 >> 48)
            | (u64::from(t4 == M48) & u64::from(m == M52) & u64::from(t0 >= P0));

        // Apply the final reduction (for constant-time behaviour, we do it always)
        t0 += x * P_LOW;
        t1 += t0 >> 52;
        t0 &= M52;
        t2 += t1 >> 52;
        t1 &= M52;
        t3 += t2 >> 52;
        t2 &= M52;
        t4 += t3 >> 52;
        t3 &= M52;

        // Mask off the possible multiple of 2^256 from the final reduction
        t4 &= M48;

        Self {
            n: [t0, t1, t2, t3, t4],
        }
    }

    /// Brings the magnitude down to 1 without fully reducing the value.
    #[must_use]
    pub fn normalize_weak(&self) -> Self {
        let [mut t0, mut t1, mut t2, mut t3, mut t4] = self.n;
        let x = t4 >> 48;
        t4 &= M48;
        t0 += x * P_LOW;
        t1 += t0 >> 52;
        t0 &= M52;
        t2 += t1 >> 52;
        t1 &= M52;
        t3 += t2 >> 52;
        t2 &= M52;
        t4 += t3 >> 52;
        t3 &= M52;
        Self {
            n: [t0, t1, t2, t3, t4],
        }
    }

    /// Variable time version of [`Fe::normalize`]. Only use on public data.
    #[must_use]
    pub fn normalize_var(&self) -> Self {
        let [mut t0, mut t1, mut t2, mut t3, mut t4] = self.n;
        let mut x = t4 >> 48;
        t4 &= M48;

        t0 += x * P_LOW;
        t1 += t0 >> 52;
        t0 &= M52;
        t2 += t1 >> 52;
        t1 &= M52;
        let mut m = t1;
        t3 += t2 >> 52;
        t2 &= M52;
        m &= t2;
        t4 += t3 >> 52;
        t3 &= M52;
        m &= t3;

        x = (t4 >> 48) | u64::from(t4 == M48 && m == M52 && t0 >= P0);

        if x != 0 {
            t0 += P_LOW;
            t1 += t0 >> 52;
            t0 &= M52;
            t2 += t1 >> 52;
            t1 &= M52;
            t3 += t2 >> 52;
            t2 &= M52;
            t4 += t3 >> 52;
            t3 &= M52;
            t4 &= M48;
        }

        Self {
            n: [t0, t1, t2, t3, t4],
        }
    }

    /// Checks whether the element is congruent to zero without normalizing it.
    pub fn normalizes_to_zero(&self) -> Choice {
        let [mut t0, mut t1, mut t2, mut t3, mut t4] = self.n;

        // z0 tracks a possible raw value of 0, z1 tracks a possible raw value of P
        let x = t4 >> 48;
        t4 &= M48;

        t0 += x * P_LOW;
        t1 += t0 >> 52;
        t0 &= M52;
        let mut z0 = t0;
        let mut z1 = t0 ^ 0x1000003D0;
        t2 += t1 >> 52;
        t1 &= M52;
        z0 |= t1;
        z1 &= t1;
        t3 += t2 >> 52;
        t2 &= M52;
        z0 |= t2;
        z1 &= t2;
        t4 += t3 >> 52;
        t3 &= M52;
        z0 |= t3;
        z1 &= t3;
        z0 |= t4;
        z1 &= t4 ^ 0xF000000000000;

        z0.ct_eq(&0) | z1.ct_eq(&M52)
    }

    /// Variable time version of [`Fe::normalizes_to_zero`].
    pub fn normalizes_to_zero_var(&self) -> bool {
        let [mut t0, mut t1, mut t2, mut t3, mut t4] = self.n;
        let x = t4 >> 48;

        t0 += x * P_LOW;

        // z0 tracks a possible raw value of 0, z1 tracks a possible raw value of P
        let mut z0 = t0 & M52;
        let mut z1 = z0 ^ 0x1000003D0;

        // Fast return path should catch the majority of cases
        if z0 != 0 && z1 != M52 {
            return false;
        }

        t4 &= M48;

        t1 += t0 >> 52;
        t2 += t1 >> 52;
        t1 &= M52;
        z0 |= t1;
        z1 &= t1;
        t3 += t2 >> 52;
        t2 &= M52;
        z0 |= t2;
        z1 &= t2;
        t4 += t3 >> 52;
        t3 &= M52;
        z0 |= t3;
        z1 &= t3;
        z0 |= t4;
        z1 &= t4 ^ 0xF000000000000;

        z0 == 0 || z1 == M52
    }

    /// Whether the element is zero.
    pub fn is_zero(&self) -> Choice {
        let t = self.normalize().n;
        (t[0] | t[1] | t[2] | t[3] | t[4]).ct_eq(&0)
    }

    /// Whether the canonical value of the element is odd.
    pub fn is_odd(&self) -> bool {
        self.normalize().n[0] & 1 == 1
    }

    /// Compares two elements in variable time.
    pub fn eq_var(&self, other: &Fe) -> bool {
        let mut na = self.normalize_weak().negate(1);
        na += other;
        na.normalizes_to_zero_var()
    }

    /// Compares the canonical values of two elements in variable time.
    pub fn cmp_var(&self, other: &Fe) -> Ordering {
        let a = self.normalize_var();
        let b = other.normalize_var();
        a.n.iter().rev().cmp(b.n.iter().rev())
    }

    /// Returns `-self` where `magnitude` is an upper bound on the magnitude of
    /// `self`. The result has magnitude `magnitude + 1`.
    #[must_use]
    pub fn negate(&self, magnitude: u32) -> Self {
        let m = (magnitude as u64 + 1) * 2;
        Self {
            n: [
                P0 * m - self.n[0],
                M52 * m - self.n[1],
                M52 * m - self.n[2],
                M52 * m - self.n[3],
                M48 * m - self.n[4],
            ],
        }
    }

    /// Multiplies by a small integer. Multiplies the magnitude by the same value.
    #[must_use]
    pub fn mul_int(&self, a: u32) -> Self {
        let a = a as u64;
        Self {
            n: self.n.map(|limb| limb * a),
        }
    }

    /// Returns `self / 2`. The magnitude `m` becomes `m / 2 + 1`.
    #[must_use]
    pub fn half(&self) -> Self {
        let [mut t0, mut t1, mut t2, mut t3, mut t4] = self.n;
        let one = 1u64;
        // add p when odd so the value becomes even, then shift everything down
        let mask = (t0 & one).wrapping_neg() >> 12;

        t0 += P0 & mask;
        t1 += mask;
        t2 += mask;
        t3 += mask;
        t4 += mask >> 4;

        Self {
            n: [
                (t0 >> 1) + ((t1 & one) << 51),
                (t1 >> 1) + ((t2 & one) << 51),
                (t2 >> 1) + ((t3 & one) << 51),
                (t3 >> 1) + ((t4 & one) << 51),
                t4 >> 1,
            ],
        }
    }

    /// Returns `self * rhs`. Inputs must have magnitude at most 8. The result has magnitude 1.
    #[must_use]
    pub fn mul(&self, rhs: &Fe) -> Self {
        Self {
            n: mul_inner(&self.n, &rhs.n),
        }
    }

    /// Returns `self * self`. The input must have magnitude at most 8. The result has magnitude 1.
    #[must_use]
    pub fn sqr(&self) -> Self {
        Self {
            n: sqr_inner(&self.n),
        }
    }

    fn pow2k(&self, k: usize) -> Self {
        let mut x = *self;
        for _ in 0..k {
            x = x.sqr();
        }
        x
    }

    /// Returns the multiplicative inverse by raising to p - 2. Zero maps to zero.
    ///
    /// The result has magnitude 1 but is not normalized.
    #[must_use]
    pub fn inv(&self) -> Self {
        // The binary representation of (p - 2) has 5 blocks of 1s, with lengths in
        // { 1, 2, 22, 223 }. Use an addition chain to calculate 2^n - 1 for each block:
        // [1], [2], 3, 6, 9, 11, [22], 44, 88, 176, 220, [223]
        let (x2, x22, x223) = self.chain_blocks();

        x223.pow2k(23)
            .mul(&x22)
            .pow2k(5)
            .mul(self)
            .pow2k(3)
            .mul(&x2)
            .pow2k(2)
            .mul(self)
    }

    /// Computes `x^(2^2 - 1)`, `x^(2^22 - 1)` and `x^(2^223 - 1)`, the blocks
    /// shared between inversion and square root.
    fn chain_blocks(&self) -> (Self, Self, Self) {
        let x2 = self.pow2k(1).mul(self);
        let x3 = x2.pow2k(1).mul(self);
        let x6 = x3.pow2k(3).mul(&x3);
        let x9 = x6.pow2k(3).mul(&x3);
        let x11 = x9.pow2k(2).mul(&x2);
        let x22 = x11.pow2k(11).mul(&x11);
        let x44 = x22.pow2k(22).mul(&x22);
        let x88 = x44.pow2k(44).mul(&x44);
        let x176 = x88.pow2k(88).mul(&x88);
        let x220 = x176.pow2k(44).mul(&x44);
        let x223 = x220.pow2k(3).mul(&x3);
        (x2, x22, x223)
    }

    /// Returns a square root of `self` if one exists.
    ///
    /// Since p ≡ 3 mod 4 the candidate root is `self^((p+1)/4)`; it is checked
    /// by squaring it again. The result has magnitude 1 but is not normalized.
    pub fn sqrt(&self) -> CtOption<Self> {
        // The binary representation of (p + 1)/4 has 3 blocks of 1s, with lengths in
        // { 2, 22, 223 }.
        let (x2, x22, x223) = self.chain_blocks();
        let res = x223.pow2k(23).mul(&x22).pow2k(6).mul(&x2).pow2k(2);

        let mut diff = res.sqr().negate(1);
        diff += &self.normalize_weak();
        CtOption::new(res, diff.normalizes_to_zero())
    }

    /// Raises `self` to the power of the 256-bit big-endian `exponent` in constant time.
    #[must_use]
    pub fn pow(&self, exponent: &[u8; 32]) -> Self {
        let mut acc = Fe::ONE;
        for byte in exponent {
            for i in (0..8).rev() {
                acc = acc.sqr();
                let with_mul = acc.mul(self);
                acc.cmov(&with_mul, Choice::from((byte >> i) & 1));
            }
        }
        acc
    }

    /// Inverts every element of `elements` with a single field inversion
    /// (Montgomery's trick). Runs in time depending only on the number of elements.
    ///
    /// All inputs must be non-zero.
    pub fn inv_all(elements: &[Fe]) -> alloc::vec::Vec<Fe> {
        let mut out = alloc::vec::Vec::with_capacity(elements.len());
        if elements.is_empty() {
            return out;
        }
        out.push(elements[0]);
        for i in 1..elements.len() {
            let prev = out[i - 1];
            out.push(prev.mul(&elements[i]));
        }

        let mut u = out[elements.len() - 1].inv();

        for i in (1..elements.len()).rev() {
            out[i] = out[i - 1].mul(&u);
            u = u.mul(&elements[i]);
        }
        out[0] = u;
        out
    }

    /// Conditionally replaces `self` with `other` in constant time.
    pub fn cmov(&mut self, other: &Fe, flag: Choice) {
        for (a, b) in self.n.iter_mut().zip(other.n.iter()) {
            a.conditional_assign(b, flag);
        }
    }

    /// Packs the canonical value into a [`FeStorage`].
    pub fn to_storage(&self) -> FeStorage {
        let n = self.normalize().n;
        FeStorage([
            n[0] | (n[1] << 52),
            (n[1] >> 12) | (n[2] << 40),
            (n[2] >> 24) | (n[3] << 28),
            (n[3] >> 36) | (n[4] << 16),
        ])
    }

    /// Unpacks a [`FeStorage`]. The result is normalized.
    pub fn from_storage(storage: &FeStorage) -> Self {
        let s = &storage.0;
        Self {
            n: [
                s[0] & M52,
                (s[0] >> 52) | ((s[1] << 12) & M52),
                (s[1] >> 40) | ((s[2] << 24) & M52),
                (s[2] >> 28) | ((s[3] << 36) & M52),
                s[3] >> 16,
            ],
        }
    }
}

impl FeStorage {
    /// Conditionally replaces `self` with `other` in constant time.
    pub fn cmov(&mut self, other: &FeStorage, flag: Choice) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            a.conditional_assign(b, flag);
        }
    }
}

#[inline(always)]
fn mul_inner(a: &[u64; 5], b: &[u64; 5]) -> [u64; 5] {
    let [a0, a1, a2, a3, a4] = a.map(u128::from);
    let [b0, b1, b2, b3, b4] = b.map(u128::from);
    let m = M52 as u128;
    let r = R as u128;

    // [... a b c] is a shorthand for ... + a<<104 + b<<52 + c<<0 mod p.
    // px is a shorthand for sum(a[i]*b[x-i], i=0..x).
    let mut d = a0 * b3 + a1 * b2 + a2 * b1 + a3 * b0;
    // [d 0 0 0] = [p3 0 0 0]
    let mut c = a4 * b4;
    // [c 0 0 0 0 d 0 0 0] = [p8 0 0 0 0 p3 0 0 0]
    d += (c & m) * r;
    c >>= 52;
    // [c 0 0 0 0 0 d 0 0 0] = [p8 0 0 0 0 p3 0 0 0]
    let t3 = (d & m) as u64;
    d >>= 52;
    // [c 0 0 0 0 d t3 0 0 0] = [p8 0 0 0 0 p3 0 0 0]

    d += a0 * b4 + a1 * b3 + a2 * b2 + a3 * b1 + a4 * b0;
    // [c 0 0 0 0 d t3 0 0 0] = [p8 0 0 0 p4 p3 0 0 0]
    d += c * r;
    // [d t3 0 0 0] = [p8 0 0 0 p4 p3 0 0 0]
    let mut t4 = (d & m) as u64;
    d >>= 52;
    // [d t4 t3 0 0 0] = [p8 0 0 0 p4 p3 0 0 0]
    let tx = t4 >> 48;
    t4 &= M52 >> 4;
    // [d t4+(tx<<48) t3 0 0 0] = [p8 0 0 0 p4 p3 0 0 0]

    c = a0 * b0;
    // [d t4+(tx<<48) t3 0 0 c] = [p8 0 0 0 p4 p3 0 0 p0]
    d += a1 * b4 + a2 * b3 + a3 * b2 + a4 * b1;
    // [d t4+(tx<<48) t3 0 0 c] = [p8 0 0 p5 p4 p3 0 0 p0]
    let mut u0 = (d & m) as u64;
    d >>= 52;
    // [d u0 t4+(tx<<48) t3 0 0 c] = [p8 0 0 p5 p4 p3 0 0 p0]
    u0 = (u0 << 4) | tx;
    // [d 0 t4+(u0<<48) t3 0 0 c] = [p8 0 0 p5 p4 p3 0 0 p0]
    c += u128::from(u0) * u128::from(R >> 4);
    // [d 0 t4 t3 0 0 c] = [p8 0 0 p5 p4 p3 0 0 p0]
    let r0 = (c & m) as u64;
    c >>= 52;
    // [d 0 t4 t3 0 c r0] = [p8 0 0 p5 p4 p3 0 0 p0]

    c += a0 * b1 + a1 * b0;
    // [d 0 t4 t3 0 c r0] = [p8 0 0 p5 p4 p3 0 p1 p0]
    d += a2 * b4 + a3 * b3 + a4 * b2;
    // [d 0 t4 t3 0 c r0] = [p8 0 p6 p5 p4 p3 0 p1 p0]
    c += (d & m) * r;
    d >>= 52;
    // [d 0 0 t4 t3 0 c r0] = [p8 0 p6 p5 p4 p3 0 p1 p0]
    let r1 = (c & m) as u64;
    c >>= 52;
    // [d 0 0 t4 t3 c r1 r0] = [p8 0 p6 p5 p4 p3 0 p1 p0]

    c += a0 * b2 + a1 * b1 + a2 * b0;
    // [d 0 0 t4 t3 c r1 r0] = [p8 0 p6 p5 p4 p3 p2 p1 p0]
    d += a3 * b4 + a4 * b3;
    // [d 0 0 t4 t3 c t1 r0] = [p8 p7 p6 p5 p4 p3 p2 p1 p0]
    c += (d & m) * r;
    d >>= 52;
    // [d 0 0 0 t4 t3 c r1 r0] = [p8 p7 p6 p5 p4 p3 p2 p1 p0]

    let r2 = (c & m) as u64;
    c >>= 52;
    // [d 0 0 0 t4 t3+c r2 r1 r0] = [p8 p7 p6 p5 p4 p3 p2 p1 p0]
    c += d * r + u128::from(t3);
    // [t4 c r2 r1 r0] = [p8 p7 p6 p5 p4 p3 p2 p1 p0]
    let r3 = (c & m) as u64;
    c >>= 52;
    // [t4+c r3 r2 r1 r0] = [p8 p7 p6 p5 p4 p3 p2 p1 p0]
    c += u128::from(t4);
    let r4 = c as u64;
    // [r4 r3 r2 r1 r0] = [p8 p7 p6 p5 p4 p3 p2 p1 p0]
    [r0, r1, r2, r3, r4]
}

#[inline(always)]
fn sqr_inner(a: &[u64; 5]) -> [u64; 5] {
    let [mut a0, a1, a2, a3, mut a4] = a.map(u128::from);
    let m = M52 as u128;
    let r = R as u128;

    let mut d = (a0 * 2) * a3 + (a1 * 2) * a2;
    // [d 0 0 0] = [p3 0 0 0]
    let mut c = a4 * a4;
    // [c 0 0 0 0 d 0 0 0] = [p8 0 0 0 0 p3 0 0 0]
    d += (c & m) * r;
    c >>= 52;
    let t3 = (d & m) as u64;
    d >>= 52;
    // [c 0 0 0 0 d t3 0 0 0] = [p8 0 0 0 0 p3 0 0 0]

    a4 *= 2;
    d += a0 * a4 + (a1 * 2) * a3 + a2 * a2;
    // [c 0 0 0 0 d t3 0 0 0] = [p8 0 0 0 p4 p3 0 0 0]
    d += c * r;
    let mut t4 = (d & m) as u64;
    d >>= 52;
    let tx = t4 >> 48;
    t4 &= M52 >> 4;
    // [d t4+(tx<<48) t3 0 0 0] = [p8 0 0 0 p4 p3 0 0 0]

    c = a0 * a0;
    // [d t4+(tx<<48) t3 0 0 c] = [p8 0 0 0 p4 p3 0 0 p0]
    d += a1 * a4 + (a2 * 2) * a3;
    // [d t4+(tx<<48) t3 0 0 c] = [p8 0 0 p5 p4 p3 0 0 p0]
    let mut u0 = (d & m) as u64;
    d >>= 52;
    u0 = (u0 << 4) | tx;
    c += u128::from(u0) * u128::from(R >> 4);
    // [d 0 t4 t3 0 0 c] = [p8 0 0 p5 p4 p3 0 0 p0]
    let r0 = (c & m) as u64;
    c >>= 52;
    // [d 0 t4 t3 0 c r0] = [p8 0 0 p5 p4 p3 0 0 p0]

    a0 *= 2;
    c += a0 * a1;
    // [d 0 t4 t3 0 c r0] = [p8 0 0 p5 p4 p3 0 p1 p0]
    d += a2 * a4 + a3 * a3;
    // [d 0 t4 t3 0 c r0] = [p8 0 p6 p5 p4 p3 0 p1 p0]
    c += (d & m) * r;
    d >>= 52;
    let r1 = (c & m) as u64;
    c >>= 52;
    // [d 0 0 t4 t3 c r1 r0] = [p8 0 p6 p5 p4 p3 0 p1 p0]

    c += a0 * a2 + a1 * a1;
    // [d 0 0 t4 t3 c r1 r0] = [p8 0 p6 p5 p4 p3 p2 p1 p0]
    d += a3 * a4;
    // [d 0 0 t4 t3 c r1 r0] = [p8 p7 p6 p5 p4 p3 p2 p1 p0]
    c += (d & m) * r;
    d >>= 52;
    let r2 = (c & m) as u64;
    c >>= 52;
    // [d 0 0 0 t4 t3+c r2 r1 r0] = [p8 p7 p6 p5 p4 p3 p2 p1 p0]

    c += d * r + u128::from(t3);
    let r3 = (c & m) as u64;
    c >>= 52;
    // [t4+c r3 r2 r1 r0] = [p8 p7 p6 p5 p4 p3 p2 p1 p0]
    c += u128::from(t4);
    let r4 = c as u64;
    [r0, r1, r2, r3, r4]
}

impl Default for Fe {
    fn default() -> Self {
        Self::ZERO
    }
}

impl ConditionallySelectable for Fe {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = *a;
        out.cmov(b, choice);
        out
    }
}

impl ConstantTimeEq for Fe {
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut na = self.normalize_weak().negate(1);
        na += &other.normalize_weak();
        na.normalizes_to_zero()
    }
}

impl PartialEq for Fe {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Fe {}

impl PartialOrd for Fe {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fe {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_var(other)
    }
}

impl core::hash::Hash for Fe {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state)
    }
}

impl From<u32> for Fe {
    fn from(int: u32) -> Self {
        Fe::from_u32(int)
    }
}

/// Raw limb-wise addition. The magnitudes add up.
impl AddAssign<&Fe> for Fe {
    fn add_assign(&mut self, rhs: &Fe) {
        for (a, b) in self.n.iter_mut().zip(rhs.n.iter()) {
            *a += b;
        }
    }
}

impl AddAssign<Fe> for Fe {
    fn add_assign(&mut self, rhs: Fe) {
        *self += &rhs;
    }
}

impl Add<&Fe> for &Fe {
    type Output = Fe;

    fn add(self, rhs: &Fe) -> Fe {
        let mut out = self.normalize_weak();
        out += &rhs.normalize_weak();
        out.normalize_weak()
    }
}

impl Add<Fe> for Fe {
    type Output = Fe;

    fn add(self, rhs: Fe) -> Fe {
        &self + &rhs
    }
}

impl Add<&Fe> for Fe {
    type Output = Fe;

    fn add(self, rhs: &Fe) -> Fe {
        &self + rhs
    }
}

impl Neg for &Fe {
    type Output = Fe;

    fn neg(self) -> Fe {
        self.normalize_weak().negate(1).normalize_weak()
    }
}

impl Neg for Fe {
    type Output = Fe;

    fn neg(self) -> Fe {
        -&self
    }
}

impl Sub<&Fe> for &Fe {
    type Output = Fe;

    fn sub(self, rhs: &Fe) -> Fe {
        let mut out = rhs.normalize_weak().negate(1);
        out += &self.normalize_weak();
        out.normalize_weak()
    }
}

impl Sub<Fe> for Fe {
    type Output = Fe;

    fn sub(self, rhs: Fe) -> Fe {
        &self - &rhs
    }
}

impl Sub<&Fe> for Fe {
    type Output = Fe;

    fn sub(self, rhs: &Fe) -> Fe {
        &self - rhs
    }
}

impl SubAssign<&Fe> for Fe {
    fn sub_assign(&mut self, rhs: &Fe) {
        *self = &*self - rhs;
    }
}

impl Mul<&Fe> for &Fe {
    type Output = Fe;

    fn mul(self, rhs: &Fe) -> Fe {
        Fe::mul(&self.normalize_weak(), &rhs.normalize_weak())
    }
}

impl MulAssign<&Fe> for Fe {
    fn mul_assign(&mut self, rhs: &Fe) {
        *self = &*self * rhs;
    }
}

crate::impl_display_debug_serialize! {
    fn to_bytes(fe: &Fe) -> [u8;32] {
        fe.to_bytes()
    }
}

crate::impl_fromstr_deserialize! {
    name => "secp256k1 field element",
    fn from_bytes(bytes: [u8;32]) -> Option<Fe> {
        Fe::from_bytes(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hex;
    use proptest::prelude::*;

    const P_MINUS_ONE: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF,
        0xFC, 0x2E,
    ];

    fn fe_strategy() -> impl Strategy<Value = Fe> {
        any::<[u8; 32]>().prop_map(|bytes| Fe::from_bytes_mod_order(bytes))
    }

    #[test]
    fn from_bytes_rejects_p_and_above() {
        let mut p = P_MINUS_ONE;
        assert!(Fe::from_bytes(p).is_some());
        p[31] = 0x2F;
        assert!(Fe::from_bytes(p).is_none());
        assert!(Fe::from_bytes([0xFF; 32]).is_none());
        // p reduces to zero and p + 1 to one
        assert_eq!(Fe::from_bytes_mod_order(p), Fe::ZERO);
        p[31] = 0x30;
        assert_eq!(Fe::from_bytes_mod_order(p), Fe::ONE);
    }

    #[test]
    fn new_matches_bytes() {
        let gx = Fe::new(
            0x79BE667E, 0xF9DCBBAC, 0x55A06295, 0xCE870B07, 0x029BFCDB, 0x2DCE28D9, 0x59F2815B,
            0x16F81798,
        );
        assert_eq!(
            hex::encode(&gx.to_bytes()),
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn minus_one_plus_one_is_zero() {
        let minus_one = Fe::from_bytes(P_MINUS_ONE).unwrap();
        let mut sum = minus_one;
        sum += &Fe::ONE;
        assert!(bool::from(sum.normalizes_to_zero()));
        assert!(sum.normalizes_to_zero_var());
        assert_eq!(sum.normalize(), Fe::ZERO);
        assert_eq!(-Fe::ONE, minus_one);
    }

    #[test]
    fn inverse_of_zero_is_zero() {
        assert_eq!(Fe::ZERO.inv(), Fe::ZERO);
    }

    #[test]
    fn sqrt_of_non_residue() {
        // -1 is not a square since p = 3 mod 4
        let minus_one = Fe::from_bytes(P_MINUS_ONE).unwrap();
        assert!(bool::from(minus_one.sqrt().is_none()));
        let four = Fe::from(4);
        let two = four.sqrt().unwrap();
        assert!(two == Fe::from(2) || two == -Fe::from(2));
    }

    #[test]
    fn half_of_odd() {
        let three = Fe::from(3);
        let half = three.half();
        assert_eq!(half.mul_int(2).normalize(), three);
    }

    proptest! {
        #[test]
        fn mul_inverse_is_one(a in fe_strategy()) {
            prop_assume!(a != Fe::ZERO);
            prop_assert_eq!(&a * &a.inv(), Fe::ONE);
        }

        #[test]
        fn sqr_matches_mul(a in fe_strategy()) {
            prop_assert_eq!(a.sqr(), a.mul(&a));
        }

        #[test]
        fn sqrt_of_square(a in fe_strategy()) {
            let root = a.sqr().sqrt().unwrap();
            prop_assert!(root == a || root == -a);
        }

        #[test]
        fn add_sub_roundtrip(a in fe_strategy(), b in fe_strategy()) {
            prop_assert_eq!((a + b) - b, a);
            prop_assert_eq!(a - a, Fe::ZERO);
        }

        #[test]
        fn distributive(a in fe_strategy(), b in fe_strategy(), c in fe_strategy()) {
            prop_assert_eq!(&a * &(b + c), &a * &b + &a * &c);
        }

        #[test]
        fn normalize_is_idempotent(a in fe_strategy(), b in fe_strategy()) {
            let mut big = a;
            for _ in 0..7 {
                big += &b;
            }
            let norm = big.normalize();
            prop_assert_eq!(norm.n, norm.normalize().n);
            prop_assert_eq!(norm.n, big.normalize_var().n);
            prop_assert_eq!(norm.to_bytes(), Fe::from_bytes(norm.to_bytes()).unwrap().to_bytes());
        }

        #[test]
        fn storage_roundtrip(a in fe_strategy()) {
            prop_assert_eq!(Fe::from_storage(&a.to_storage()).n, a.normalize().n);
        }

        #[test]
        fn batch_inverse(a in fe_strategy(), b in fe_strategy(), c in fe_strategy()) {
            prop_assume!(a != Fe::ZERO && b != Fe::ZERO && c != Fe::ZERO);
            let inverted = Fe::inv_all(&[a, b, c]);
            prop_assert_eq!(inverted, [a.inv(), b.inv(), c.inv()].to_vec());
        }

        #[test]
        fn pow_matches_inverse(a in fe_strategy()) {
            let mut p_minus_two = P_MINUS_ONE;
            p_minus_two[31] -= 1;
            prop_assert_eq!(a.pow(&p_minus_two), a.inv());
        }

        #[test]
        fn cmp_is_consistent_with_bytes(a in fe_strategy(), b in fe_strategy()) {
            prop_assert_eq!(a.cmp(&b), a.to_bytes().cmp(&b.to_bytes()));
        }
    }
}
