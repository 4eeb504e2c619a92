//! Splitting of field elements into high and low bits, and the hints that reconcile them.
//!
//! Everything here runs on secret-dependent values during signing, so the comparisons are done
//! on sign bits and masks rather than with branches.

use crate::params::{D, GAMMA2, Q};

/// For finite field element a, compute a0, a1 such that a mod^+ Q = a1*2^D + a0 with
/// -2^{D-1} < a0 <= 2^{D-1}. Assumes a to be standard representative.
///
/// Returns (a1, a0).
#[inline]
pub fn power2round(a: i32) -> (i32, i32) {
	let a1 = (a + (1 << (D - 1)) - 1) >> D;
	(a1, a - (a1 << D))
}

/// For finite field element a, compute high and low bits a0, a1 such that
/// a mod^+ Q = a1*2*GAMMA2 + a0 with -GAMMA2 < a0 <= GAMMA2, except if a1 = (Q-1)/(2*GAMMA2)
/// where we set a1 = 0 and -GAMMA2 <= a0 = a mod^+ Q - Q < 0.
/// Assumes a to be standard representative.
///
/// Returns (a1, a0).
#[inline]
pub fn decompose(a: i32) -> (i32, i32) {
	let mut a1 = (a + 127) >> 7;
	a1 = (a1 * 1025 + (1 << 21)) >> 22;
	a1 &= 15;

	let mut a0 = a - a1 * 2 * GAMMA2;
	a0 -= (((Q - 1) / 2 - a0) >> 31) & Q;
	(a1, a0)
}

/// Compute hint bit indicating whether the low bits of the input element overflow into the
/// high bits: 1 iff a0 > GAMMA2, a0 < -GAMMA2, or a0 = -GAMMA2 with a1 != 0.
#[inline]
pub fn make_hint(a0: i32, a1: i32) -> i32 {
	let above = ((GAMMA2 - a0) as u32) >> 31;
	let below = ((a0 + GAMMA2) as u32) >> 31;

	let diff = a0 + GAMMA2;
	let at_lower_edge = 1 ^ (((diff | diff.wrapping_neg()) as u32) >> 31);
	let a1_nonzero = ((a1 | a1.wrapping_neg()) as u32) >> 31;

	((above | below | (at_lower_edge & a1_nonzero)) & 1) as i32
}

/// Correct high bits according to hint.
///
/// # Arguments
///
/// * 'a' - input element
/// * 'hint' - hint bit
///
/// Returns corrected high bits.
#[inline]
pub fn use_hint(a: i32, hint: i32) -> i32 {
	let (a1, a0) = decompose(a);

	let up = (a1 + 1) & 15;
	let down = (a1 - 1) & 15;

	// all ones when set
	let hint_mask = -((((hint | hint.wrapping_neg()) as u32) >> 31) as i32);
	let positive_mask = -(((a0.wrapping_neg() as u32) >> 31) as i32);

	let keep = !hint_mask;
	let inc = hint_mask & positive_mask;
	let dec = hint_mask & !positive_mask;

	(a1 & keep) | (up & inc) | (down & dec)
}
