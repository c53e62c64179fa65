//! Scalar multiplication.
//!
//! Three algorithms live here:
//!
//! - [`ECMultGenContext::ecmult_gen`]: constant-time `k * G` with a
//!   precomputed 4-bit comb table and blinding.
//! - [`ECMultContext::ecmult`] and [`ECMultContext::ecmult_multi_var`]:
//!   variable time `na * A + ng * G` (and sums of many such terms) using
//!   Strauss' algorithm over wNAF digits. Input scalars are split with the
//!   endomorphism so that only 129 doublings are needed.
//! - [`ecmult_const`]: constant-time `k * A` for an arbitrary point.
//!
//! Only use the `_var` functions with public inputs (e.g. signature verification).
mod constant;
mod fixed_base;

pub use constant::ecmult_const;
pub use fixed_base::ECMultGenContext;

use crate::{
    Point, Scalar,
    group::{GENERATOR, Ge, GeStorage, Gej},
};
use alloc::vec::Vec;

/// The wNAF window for arbitrary points.
pub const WINDOW_A: usize = 5;
/// The default wNAF window for the generator.
pub const WINDOW_G: usize = 15;
/// Valid range of the generator window.
pub const WINDOW_G_RANGE: core::ops::RangeInclusive<usize> = 2..=15;
/// Number of wNAF digits needed for a 128-bit scalar half (one extra for the final carry).
pub const WNAF_BITS: usize = 129;

const fn table_size(window: usize) -> usize {
    1 << (window - 2)
}

const TABLE_SIZE_A: usize = table_size(WINDOW_A);

/// A trait which allows wrapping up types to be used in a multi-scalar
/// multiplication without copying them into an intermediate buffer.
pub trait MultiMult {
    /// The scalar at index `i`.
    fn get_scalar(&self, i: usize) -> &Scalar;

    /// The point at index `i`.
    fn get_point(&self, i: usize) -> &Point;

    /// The number of (scalar, point) terms.
    fn get_size(&self) -> usize;
}

impl MultiMult for [(Scalar, Point)] {
    fn get_scalar(&self, i: usize) -> &Scalar {
        &self[i].0
    }

    fn get_point(&self, i: usize) -> &Point {
        &self[i].1
    }

    fn get_size(&self) -> usize {
        self.len()
    }
}

impl<const N: usize> MultiMult for [(Scalar, Point); N] {
    fn get_scalar(&self, i: usize) -> &Scalar {
        &self[i].0
    }

    fn get_point(&self, i: usize) -> &Point {
        &self[i].1
    }

    fn get_size(&self) -> usize {
        N
    }
}

/// Precomputed odd multiples of `G` and `2^128 * G` for variable time multiplication.
#[derive(Clone)]
pub struct ECMultContext {
    window_g: usize,
    /// `[G, 3G, 5G, ...]`
    pre_g: Vec<GeStorage>,
    /// `[2^128 G, 3 * 2^128 G, ...]`
    pre_g_128: Vec<GeStorage>,
}

impl ECMultContext {
    /// Builds the tables for a generator window of `window_g` bits.
    ///
    /// Each of the two tables has `2^(window_g - 2)` entries. The caller
    /// checks that `window_g` is within [`WINDOW_G_RANGE`].
    pub fn new(window_g: usize) -> Self {
        debug_assert!(WINDOW_G_RANGE.contains(&window_g));
        let size = table_size(window_g);
        let g = Gej::from_ge(&GENERATOR);
        let mut g_128 = g;
        for _ in 0..128 {
            g_128 = g_128.double_var();
        }

        Self {
            window_g,
            pre_g: odd_multiples(&g, size)
                .iter()
                .map(Ge::to_storage)
                .collect(),
            pre_g_128: odd_multiples(&g_128, size)
                .iter()
                .map(Ge::to_storage)
                .collect(),
        }
    }

    /// The window size used for the generator tables.
    pub fn window_g(&self) -> usize {
        self.window_g
    }

    /// Computes `na * a + ng * G` in variable time.
    pub fn ecmult(&self, a: &Gej, na: &Scalar, ng: &Scalar) -> Gej {
        let mut scratch = Scratch::with_capacity(1);
        self.strauss(&mut scratch, core::iter::once((*a, *na)), Some(ng))
    }

    /// Computes `ng * G + Σ scalar_i * point_i` in variable time.
    ///
    /// Identity points and zero scalars contribute nothing. `scratch` is
    /// reused between calls to avoid reallocating the per-point tables.
    pub fn ecmult_multi_var<M: MultiMult + ?Sized>(
        &self,
        scratch: &mut Scratch,
        ng: Option<&Scalar>,
        items: &M,
    ) -> Gej {
        let terms = (0..items.get_size()).map(|i| (items.get_point(i).0, *items.get_scalar(i)));
        self.strauss(scratch, terms, ng)
    }

    fn strauss(
        &self,
        scratch: &mut Scratch,
        terms: impl Iterator<Item = (Gej, Scalar)>,
        ng: Option<&Scalar>,
    ) -> Gej {
        scratch.clear();

        for (a, na) in terms {
            if a.is_infinity() || bool::from(na.is_zero()) {
                continue;
            }
            let (na_1, na_lam) = na.split_lambda();
            let mut state = StraussState::new();
            state.bits_1 = wnaf(&mut state.wnaf_1, &na_1, WINDOW_A);
            state.bits_lam = wnaf(&mut state.wnaf_lam, &na_lam, WINDOW_A);
            scratch.states.push(state);
            scratch.multiples.extend(odd_multiples_jacobian(&a, TABLE_SIZE_A));
        }

        scratch.pre_a = Ge::set_all_gej_var(&scratch.multiples);
        scratch.pre_a_lam = scratch.pre_a.iter().map(Ge::mul_lambda).collect();

        let mut wnaf_ng_1 = [0i32; WNAF_BITS];
        let mut wnaf_ng_128 = [0i32; WNAF_BITS];
        let mut bits_ng_1 = 0;
        let mut bits_ng_128 = 0;
        if let Some(ng) = ng {
            if !bool::from(ng.is_zero()) {
                let (ng_1, ng_128) = ng.split_128();
                bits_ng_1 = wnaf(&mut wnaf_ng_1, &ng_1, self.window_g);
                bits_ng_128 = wnaf(&mut wnaf_ng_128, &ng_128, self.window_g);
            }
        }

        let bits = scratch
            .states
            .iter()
            .flat_map(|state| [state.bits_1, state.bits_lam])
            .chain([bits_ng_1, bits_ng_128])
            .max()
            .unwrap_or(0);

        let mut r = Gej::INFINITY;
        for i in (0..bits).rev() {
            r = r.double_var();

            for (np, state) in scratch.states.iter().enumerate() {
                let range = np * TABLE_SIZE_A..(np + 1) * TABLE_SIZE_A;
                if i < state.bits_1 && state.wnaf_1[i] != 0 {
                    r = r.add_ge_var(&table_get(&scratch.pre_a[range.clone()], state.wnaf_1[i]));
                }
                if i < state.bits_lam && state.wnaf_lam[i] != 0 {
                    r = r.add_ge_var(&table_get(&scratch.pre_a_lam[range], state.wnaf_lam[i]));
                }
            }

            if i < bits_ng_1 && wnaf_ng_1[i] != 0 {
                r = r.add_ge_var(&table_get_storage(&self.pre_g, wnaf_ng_1[i]));
            }
            if i < bits_ng_128 && wnaf_ng_128[i] != 0 {
                r = r.add_ge_var(&table_get_storage(&self.pre_g_128, wnaf_ng_128[i]));
            }
        }

        r
    }
}

impl core::fmt::Debug for ECMultContext {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("ECMultContext")
            .field("window_g", &self.window_g)
            .finish()
    }
}

struct StraussState {
    wnaf_1: [i32; WNAF_BITS],
    wnaf_lam: [i32; WNAF_BITS],
    bits_1: usize,
    bits_lam: usize,
}

impl StraussState {
    fn new() -> Self {
        Self {
            wnaf_1: [0; WNAF_BITS],
            wnaf_lam: [0; WNAF_BITS],
            bits_1: 0,
            bits_lam: 0,
        }
    }
}

/// Reusable buffers for [`ECMultContext::ecmult_multi_var`].
///
/// Holds the wNAF digits and the odd-multiple tables of every input point.
#[derive(Default)]
pub struct Scratch {
    states: Vec<StraussState>,
    multiples: Vec<Gej>,
    pre_a: Vec<Ge>,
    pre_a_lam: Vec<Ge>,
}

impl Scratch {
    /// Creates scratch space sized for `n` points.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            states: Vec::with_capacity(n),
            multiples: Vec::with_capacity(n * TABLE_SIZE_A),
            pre_a: Vec::new(),
            pre_a_lam: Vec::new(),
        }
    }

    fn clear(&mut self) {
        self.states.clear();
        self.multiples.clear();
    }
}

impl core::fmt::Debug for Scratch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Scratch")
            .field("capacity", &self.states.capacity())
            .finish()
    }
}

/// `[a, 3a, 5a, ...]` in Jacobian coordinates.
fn odd_multiples_jacobian(a: &Gej, n: usize) -> impl Iterator<Item = Gej> {
    let d = a.double_var();
    core::iter::successors(Some(*a), move |prev| Some(prev.add_var(&d))).take(n)
}

fn odd_multiples(a: &Gej, n: usize) -> Vec<Ge> {
    let gejs: Vec<Gej> = odd_multiples_jacobian(a, n).collect();
    Ge::set_all_gej_var(&gejs)
}

/// Fetches `n * a` from a table of odd multiples of `a`. `n` must be odd.
fn table_get(table: &[Ge], n: i32) -> Ge {
    debug_assert!(n & 1 == 1);
    if n > 0 {
        table[((n - 1) / 2) as usize]
    } else {
        table[((-n - 1) / 2) as usize].neg()
    }
}

fn table_get_storage(table: &[GeStorage], n: i32) -> Ge {
    debug_assert!(n & 1 == 1);
    if n > 0 {
        Ge::from_storage(&table[((n - 1) / 2) as usize])
    } else {
        Ge::from_storage(&table[((-n - 1) / 2) as usize]).neg()
    }
}

/// Converts `a` into windowed non-adjacent form with window `w`, writing one
/// digit per bit position into `wnaf`.
///
/// Every non-zero digit is odd, less than `2^(w-1)` in absolute value and
/// followed by at least `w - 1` zeros. Returns the number of digits up to
/// and including the last non-zero one.
///
/// Scalars with the top bit set are treated as negative numbers so that
/// halves from [`Scalar::split_lambda`] fit in [`WNAF_BITS`] digits.
pub fn wnaf(wnaf: &mut [i32], a: &Scalar, w: usize) -> usize {
    debug_assert!((2..=31).contains(&w));
    let len = wnaf.len();
    wnaf.fill(0);

    let mut s = *a;
    let mut sign = 1i32;
    if s.get_bits(255, 1) == 1 {
        s = -s;
        sign = -1;
    }

    let mut last_set_bit: Option<usize> = None;
    let mut carry = 0i32;
    let mut bit = 0;
    while bit < len {
        if s.get_bits(bit, 1) as i32 == carry {
            bit += 1;
            continue;
        }

        let now = w.min(len - bit);
        let mut word = s.get_bits_var(bit, now) as i32 + carry;
        carry = (word >> (w - 1)) & 1;
        word -= carry << w;

        wnaf[bit] = sign * word;
        last_set_bit = Some(bit);
        bit += now;
    }
    debug_assert_eq!(carry, 0);

    last_set_bit.map(|bit| bit + 1).unwrap_or(0)
}
