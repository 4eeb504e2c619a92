//! Rejection samplers turning SHAKE output into ring elements.
//!
//! Every sampler keeps squeezing further blocks until the polynomial is complete, so none of them
//! can hand back a partially filled result.

use super::{z_unpack, Coeff, Ntt, Poly};
use crate::{
	params::{self, N, Q, TAU},
	xof::{self, SHAKE128_RATE, SHAKE256_RATE},
};
use sha3::{
	digest::{ExtendableOutput, Update, XofReader},
	Shake256,
};
use subtle::{Choice, ConditionallySelectable};

const UNIFORM_NBLOCKS: usize = (768 + SHAKE128_RATE - 1) / SHAKE128_RATE;
const UNIFORM_ETA_NBLOCKS: usize = (136 + SHAKE256_RATE - 1) / SHAKE256_RATE;
const UNIFORM_GAMMA1_NBLOCKS: usize = params::POLYZ_PACKEDBYTES.div_ceil(SHAKE256_RATE);

/// Sample uniformly random coefficients in [0, Q-1] by performing rejection sampling on array of
/// random bytes, three bytes per candidate.
///
/// Returns number of sampled coefficients. Can be smaller than `a.len()` if not enough random
/// bytes were given.
pub fn rej_uniform(a: &mut [i32], buf: &[u8]) -> usize {
	let mut ctr = 0usize;
	for chunk in buf.chunks_exact(3) {
		if ctr == a.len() {
			break;
		}
		let t = (chunk[0] as u32 | (chunk[1] as u32) << 8 | (chunk[2] as u32) << 16) & 0x7FFFFF;
		if (t as i32) < Q {
			a[ctr] = t as i32;
			ctr += 1;
		}
	}
	ctr
}

/// Sample polynomial with uniformly random coefficients in [0, Q-1] by performing rejection
/// sampling on the output stream of SHAKE128(seed|nonce).
///
/// The result is taken to be in NTT representation, which is how the matrix A is defined.
pub fn uniform(seed: &[u8; params::SEEDBYTES], nonce: u16) -> Poly<Ntt> {
	let mut a = Poly::default();
	let mut reader = xof::shake128_stream(seed, nonce);

	let mut buf = [0u8; UNIFORM_NBLOCKS * SHAKE128_RATE + 2];
	xof::squeeze_blocks(&mut reader, &mut buf, UNIFORM_NBLOCKS, SHAKE128_RATE);

	let mut buflen = UNIFORM_NBLOCKS * SHAKE128_RATE;
	let mut ctr = rej_uniform(&mut a.coeffs, &buf[..buflen]);

	while ctr < N {
		// carry an incomplete candidate over into the next block
		let off = buflen % 3;
		buf.copy_within(buflen - off..buflen, 0);
		xof::squeeze_blocks(&mut reader, &mut buf[off..], 1, SHAKE128_RATE);
		buflen = SHAKE128_RATE + off;
		ctr += rej_uniform(&mut a.coeffs[ctr..], &buf[..buflen]);
	}
	a
}

/// Sample uniformly random coefficients in [-ETA, ETA] by performing rejection sampling on array
/// of random bytes, two 4-bit candidates per byte. Acceptance is folded in with `subtle`
/// selections rather than branches.
///
/// Returns number of sampled coefficients.
pub fn rej_eta(a: &mut [i32], buf: &[u8]) -> usize {
	if a.is_empty() {
		return 0;
	}
	let last = a.len() - 1;
	let mut ctr = 0usize;
	for &byte in buf {
		for t in [(byte & 0x0F) as u32, (byte >> 4) as u32] {
			// t mod 5 for t < 16
			let coeff = 2 - (t - ((205 * t) >> 10) * 5) as i32;
			let take = Choice::from((t < 15) as u8) & Choice::from((ctr <= last) as u8);
			let slot = ctr.min(last);
			a[slot] = i32::conditional_select(&a[slot], &coeff, take);
			ctr += take.unwrap_u8() as usize;
		}
	}
	ctr
}

/// Sample polynomial with uniformly random coefficients in [-ETA,ETA] by performing rejection
/// sampling using the output stream from SHAKE256(seed|nonce).
pub fn uniform_eta(seed: &[u8; params::CRHBYTES], nonce: u16) -> Poly<Coeff> {
	let mut a = Poly::default();
	let mut reader = xof::shake256_stream(seed, nonce);

	let mut buf = [0u8; UNIFORM_ETA_NBLOCKS * SHAKE256_RATE];
	xof::squeeze_blocks(&mut reader, &mut buf, UNIFORM_ETA_NBLOCKS, SHAKE256_RATE);
	let mut ctr = rej_eta(&mut a.coeffs, &buf);

	while ctr < N {
		xof::squeeze_blocks(&mut reader, &mut buf, 1, SHAKE256_RATE);
		ctr += rej_eta(&mut a.coeffs[ctr..], &buf[..SHAKE256_RATE]);
	}
	a
}

/// Sample polynomial with uniformly random coefficients in [-(GAMMA1 - 1), GAMMA1] by unpacking
/// the output stream of SHAKE256(seed|nonce) as a packed z.
pub fn uniform_gamma1(seed: &[u8; params::CRHBYTES], nonce: u16) -> Poly<Coeff> {
	let mut reader = xof::shake256_stream(seed, nonce);
	let mut buf = [0u8; UNIFORM_GAMMA1_NBLOCKS * SHAKE256_RATE];
	xof::squeeze_blocks(&mut reader, &mut buf, UNIFORM_GAMMA1_NBLOCKS, SHAKE256_RATE);
	z_unpack(&buf)
}

/// Implementation of H. Samples polynomial with TAU nonzero coefficients in {-1,1} using the output
/// stream of SHAKE256(c~). The whole of c~ is absorbed, 64 bytes for ML-DSA-87 and 32 for legacy
/// Dilithium.
pub fn challenge<const C: usize>(c_tilde: &[u8; C]) -> Poly<Coeff> {
	let mut state = Shake256::default();
	state.update(c_tilde);
	let mut reader = state.finalize_xof();

	let mut buf = [0u8; SHAKE256_RATE];
	reader.read(&mut buf);

	let mut signs = u64::from_le_bytes([
		buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
	]);
	let mut pos = 8usize;

	let mut c = Poly::default();
	for i in (N - TAU)..N {
		let b = loop {
			if pos >= SHAKE256_RATE {
				reader.read(&mut buf);
				pos = 0;
			}
			let b = buf[pos] as usize;
			pos += 1;
			if b <= i {
				break b;
			}
		};
		c.coeffs[i] = c.coeffs[b];
		c.coeffs[b] = 1 - 2 * (signs & 1) as i32;
		signs >>= 1;
	}
	c
}
