//! Modular reduction helpers for q = 8380417.

use crate::params::Q;

/// q^(-1) mod 2^32
pub const QINV: i32 = 58728449;

/// 2^32 mod q, the Montgomery form of one.
pub const MONT: i32 = -4186625;

/// For finite field element a with -2^{31}Q <= a <= Q*2^31,
/// compute r \equiv a*2^{-32} (mod Q) such that -Q < r < Q.
#[inline]
pub fn montgomery_reduce(a: i64) -> i32 {
	let t = (a as i32).wrapping_mul(QINV);
	((a - (t as i64) * (Q as i64)) >> 32) as i32
}

/// For finite field element a with a <= 2^{31} - 2^{22} - 1,
/// compute r \equiv a (mod Q) such that -6283008 <= r <= 6283008.
#[inline]
pub fn reduce32(a: i32) -> i32 {
	let t = (a + (1 << 22)) >> 23;
	a - t * Q
}

/// Add Q if input coefficient is negative.
#[inline]
pub fn caddq(a: i32) -> i32 {
	a + ((a >> 31) & Q)
}

/// Standard representative r = a mod^+ Q.
#[cfg(test)]
pub(crate) fn freeze(a: i32) -> i32 {
	caddq(reduce32(a))
}
