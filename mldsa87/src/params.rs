//! ML-DSA-87 parameter set and the byte sizes derived from it.

pub const N: usize = 256;
pub const Q: i32 = 8380417;
pub const D: usize = 13;
/// Primitive 512-th root of unity modulo Q.
pub const R: i32 = 1753;

pub const K: usize = 8;
pub const L: usize = 7;
pub const ETA: i32 = 2;
pub const TAU: usize = 60;
pub const BETA: i32 = 120;
pub const GAMMA1: i32 = 1 << 19;
pub const GAMMA2: i32 = (Q - 1) / 32;
pub const OMEGA: usize = 75;

pub const SEEDBYTES: usize = 32;
pub const CRHBYTES: usize = 64;
pub const TR_BYTES: usize = 64;
pub const RND_BYTES: usize = 32;
pub const C_DASH_BYTES: usize = 64;
/// Longest context string accepted by sign and verify.
pub const MAX_CONTEXT_BYTES: usize = 255;

pub const POLYT1_PACKEDBYTES: usize = 320;
pub const POLYT0_PACKEDBYTES: usize = 416;
pub const POLYETA_PACKEDBYTES: usize = 96;
pub const POLYZ_PACKEDBYTES: usize = 640;
pub const POLYW1_PACKEDBYTES: usize = 128;

pub const POLYVECH_PACKEDBYTES: usize = OMEGA + K;

pub const PUBLICKEYBYTES: usize = SEEDBYTES + K * POLYT1_PACKEDBYTES;
pub const SECRETKEYBYTES: usize = 2 * SEEDBYTES +
	TR_BYTES +
	L * POLYETA_PACKEDBYTES +
	K * POLYETA_PACKEDBYTES +
	K * POLYT0_PACKEDBYTES;
pub const SIGNBYTES: usize = C_DASH_BYTES + L * POLYZ_PACKEDBYTES + POLYVECH_PACKEDBYTES;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn derived_sizes() {
		assert_eq!(PUBLICKEYBYTES, 2592);
		assert_eq!(SECRETKEYBYTES, 4896);
		assert_eq!(SIGNBYTES, 4627);
		assert_eq!(POLYVECH_PACKEDBYTES, 83);
	}

	#[test]
	fn packed_widths_match_bit_sizes() {
		assert_eq!(POLYT1_PACKEDBYTES, N * 10 / 8);
		assert_eq!(POLYT0_PACKEDBYTES, N * D / 8);
		assert_eq!(POLYETA_PACKEDBYTES, N * 3 / 8);
		assert_eq!(POLYZ_PACKEDBYTES, N * 20 / 8);
		assert_eq!(POLYW1_PACKEDBYTES, N * 4 / 8);
	}
}
