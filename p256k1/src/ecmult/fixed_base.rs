use crate::{
    Scalar,
    field::Fe,
    group::{GENERATOR, Ge, GeStorage, Gej},
    nonce::HmacDrbg,
};
use alloc::vec::Vec;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// A point with an unknown discrete logarithm: the x-coordinate is the ASCII
/// string "The scalar for this x is unknown".
const NUMS: Ge = Ge::new_xy(
    Fe::new(
        0x54686520, 0x7363616c, 0x61722066, 0x6f722074, 0x68697320, 0x78206973, 0x20756e6b,
        0x6e6f776e,
    ),
    Fe::new(
        0x28ebb7e4, 0xe1f6a12e, 0x1c0faaf4, 0x7e09c333, 0x05d50890, 0x856930e6, 0x7e529934,
        0x8ff7f20e,
    ),
);

/// Number of 4-bit windows in a scalar.
const WINDOWS: usize = 64;
/// Entries per window.
const TEETH: usize = 16;

/// Precomputed comb table for constant-time multiplication of the generator.
///
/// Entry `[j][i]` holds `(i * 16^j) * G + offset_j` where the offsets are
/// multiples of a point nobody knows the discrete log of and sum to zero.
/// None of the entries is the point at infinity so every window can be added
/// with the same constant-time formula.
#[derive(Clone)]
pub struct ECMultGenContext {
    prec: Vec<[GeStorage; TEETH]>,
    /// The blinding value subtracted from every input scalar.
    blind: Scalar,
    /// `-blind * G` with randomized projective coordinates.
    initial: Gej,
}

impl ECMultGenContext {
    /// Builds the comb table with blinding in its deterministic initial state.
    pub fn new() -> Self {
        let nums_gej = Gej::from_ge(&NUMS).add_ge_var(&GENERATOR);
        let mut gbase = Gej::from_ge(&GENERATOR);
        let mut numsbase = nums_gej;
        let mut points = Vec::with_capacity(WINDOWS * TEETH);

        for j in 0..WINDOWS {
            let mut entry = numsbase;
            points.push(entry);
            for _ in 1..TEETH {
                entry = entry.add_var(&gbase);
                points.push(entry);
            }
            for _ in 0..4 {
                gbase = gbase.double_var();
            }
            numsbase = numsbase.double_var();
            if j == WINDOWS - 2 {
                // the last window's offset cancels the sum of the others
                numsbase = numsbase.neg().add_var(&nums_gej);
            }
        }

        let prec = Ge::set_all_gej_var(&points)
            .chunks(TEETH)
            .map(|row| {
                let mut storage = [GeStorage::default(); TEETH];
                for (slot, ge) in storage.iter_mut().zip(row) {
                    *slot = ge.to_storage();
                }
                storage
            })
            .collect();

        let mut ctx = Self {
            prec,
            blind: Scalar::ZERO,
            initial: Gej::INFINITY,
        };
        ctx.blind(None);
        ctx
    }

    /// Computes `gn * G` in constant time.
    ///
    /// The table lookups scan every entry of a window and the additions use
    /// the complete constant-time formula, so neither timing nor memory access
    /// depends on `gn`.
    pub fn ecmult_gen(&self, gn: &Scalar) -> Gej {
        let mut r = self.initial;
        // blind the scalar so the bits scanned below are unrelated to gn
        let gnb = gn + &self.blind;

        for (j, window) in self.prec.iter().enumerate() {
            let bits = gnb.get_bits(j * 4, 4);
            let mut adds = GeStorage::default();
            for (i, entry) in window.iter().enumerate() {
                adds.cmov(entry, (i as u32).ct_eq(&bits));
            }
            r = r.add_ge(&Ge::from_storage(&adds));
        }

        r
    }

    /// Refreshes the blinding value and the projective coordinates of the
    /// initial point from `seed`, or resets both to their initial state when
    /// `seed` is `None`.
    ///
    /// The new values are derived with an HMAC-DRBG keyed by the current
    /// blinding value and the seed, so repeated calls accumulate entropy.
    pub fn blind(&mut self, seed: Option<&[u8; 32]>) {
        let seed = match seed {
            Some(seed) => seed,
            None => {
                self.initial = Gej::from_ge(&GENERATOR);
                self.blind = -Scalar::ONE;
                return;
            }
        };

        let mut keydata = [0u8; 64];
        keydata[..32].copy_from_slice(&self.blind.to_bytes());
        keydata[32..].copy_from_slice(seed);
        let mut rng = HmacDrbg::new(&keydata);

        let mut nonce32 = [0u8; 32];
        rng.generate(&mut nonce32);
        // retrying on failure would leak timing so fall back to one
        let overflow = Choice::from(Fe::from_bytes(nonce32).is_none() as u8);
        let mut s = Fe::from_bytes_mod_order(nonce32);
        let s_bad = overflow | s.is_zero();
        s.cmov(&Fe::ONE, s_bad);
        self.initial.rescale(&s);

        rng.generate(&mut nonce32);
        let (mut b, overflow) = Scalar::from_bytes_overflow(nonce32);
        let b_bad = overflow | b.is_zero();
        b.conditional_assign(&Scalar::ONE, b_bad);
        rng.finalize();

        let gb = self.ecmult_gen(&b);
        self.blind = -b;
        self.initial = gb;
    }
}

impl Default for ECMultGenContext {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ECMultGenContext {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        // never print the blinding
        f.debug_struct("ECMultGenContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context::TEST_CONTEXT;
    use proptest::prelude::*;

    #[test]
    fn nums_point_is_on_curve() {
        assert!(NUMS.is_valid_var());
        assert!(!NUMS.y.is_odd());
    }

    #[test]
    fn one_times_g() {
        let ctx = ECMultGenContext::new();
        let r = ctx.ecmult_gen(&Scalar::ONE);
        assert!(r.eq_var(&Gej::from_ge(&GENERATOR)));
    }

    #[test]
    fn zero_times_g_is_infinity() {
        let mut ctx = ECMultGenContext::new();
        assert!(ctx.ecmult_gen(&Scalar::ZERO).is_infinity());
        ctx.blind(Some(&[42u8; 32]));
        assert!(ctx.ecmult_gen(&Scalar::ZERO).is_infinity());
    }

    #[test]
    fn minus_one_times_g() {
        let ctx = ECMultGenContext::new();
        let r = ctx.ecmult_gen(&Scalar::minus_one());
        assert!(r.eq_var(&Gej::from_ge(&GENERATOR).neg()));
    }

    #[test]
    fn blinding_resets_to_initial_state() {
        let mut ctx = ECMultGenContext::new();
        let fresh = ECMultGenContext::new();
        ctx.blind(Some(&[1u8; 32]));
        assert_ne!(ctx.blind, fresh.blind);
        ctx.blind(None);
        assert_eq!(ctx.blind, fresh.blind);
        assert!(ctx.initial.eq_var(&fresh.initial));
    }

    proptest! {
        #[test]
        fn blinded_matches_strauss(bytes in any::<[u8; 32]>(), seed in any::<[u8; 32]>()) {
            let k = Scalar::from_bytes_mod_order(bytes);
            let mut ctx = ECMultGenContext::new();
            let unblinded = ctx.ecmult_gen(&k);
            ctx.blind(Some(&seed));
            let blinded = ctx.ecmult_gen(&k);
            let expected = TEST_CONTEXT.ecmult().ecmult(&Gej::INFINITY, &Scalar::ZERO, &k);
            prop_assert!(unblinded.eq_var(&expected));
            prop_assert!(blinded.eq_var(&expected));
        }
    }
}
