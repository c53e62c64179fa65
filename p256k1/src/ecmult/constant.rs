use crate::{
    Scalar,
    field::Fe,
    group::{Ge, GeStorage, Gej},
};
use subtle::ConstantTimeEq;

const WINDOW: usize = 4;
const TABLE_SIZE: usize = 1 << WINDOW;

/// Computes `k * a` in constant time.
///
/// Uses a fixed 4-bit window over all 256 bits of `k`. Each window's table
/// entry is found by scanning the whole table and the running sum is only
/// replaced (by a conditional move) when the window is non-zero, so the
/// sequence of operations is the same for every `k`. Only whether `a` is the
/// point at infinity is allowed to leak.
pub fn ecmult_const(a: &Ge, k: &Scalar) -> Gej {
    if a.is_infinity() {
        return Gej::INFINITY;
    }

    let table = odd_and_even_multiples(a);

    let mut r = Gej::INFINITY;
    for j in (0..256 / WINDOW).rev() {
        for _ in 0..WINDOW {
            r = r.double();
        }
        let bits = k.get_bits(j * WINDOW, WINDOW);
        let mut entry = table[0];
        for (i, candidate) in table.iter().enumerate() {
            entry.cmov(candidate, (i as u32).ct_eq(&bits));
        }
        let sum = r.add_ge(&Ge::from_storage(&entry));
        r.cmov(&sum, !bits.ct_eq(&0));
    }

    r
}

/// `table[i] = i * a` for `i` in `1..16`. `table[0]` holds `a` so that every
/// entry is a valid point; it is never added.
fn odd_and_even_multiples(a: &Ge) -> [GeStorage; TABLE_SIZE] {
    let mut jacobian = [Gej::from_ge(a); TABLE_SIZE];
    for i in 2..TABLE_SIZE {
        jacobian[i] = jacobian[i - 1].add_ge(a);
    }

    let zs = jacobian.map(|p| p.z);
    let zinvs = Fe::inv_all(&zs);

    let mut table = [GeStorage::default(); TABLE_SIZE];
    for ((slot, p), zinv) in table.iter_mut().zip(jacobian.iter()).zip(zinvs.iter()) {
        let z2 = zinv.sqr();
        let z3 = zinv.mul(&z2);
        *slot = Ge::new_xy(p.x.mul(&z2), p.y.mul(&z3)).to_storage();
    }
    table
}
