//! SHAKE plumbing: seeded streams for the samplers and a reusable SHAKE256 scratch hasher for the
//! protocol hashes (tr, mu, rho'', c~).

use sha3::{
	digest::{ExtendableOutput, Update, XofReader},
	Shake128, Shake128Reader, Shake256, Shake256Reader,
};

pub const SHAKE128_RATE: usize = 168;
pub const SHAKE256_RATE: usize = 136;

/// SHAKE128(seed | nonce), nonce absorbed as two little-endian bytes.
pub fn shake128_stream(seed: &[u8], nonce: u16) -> Shake128Reader {
	let mut state = Shake128::default();
	state.update(seed);
	state.update(&nonce.to_le_bytes());
	state.finalize_xof()
}

/// SHAKE256(seed | nonce), nonce absorbed as two little-endian bytes.
pub fn shake256_stream(seed: &[u8], nonce: u16) -> Shake256Reader {
	let mut state = Shake256::default();
	state.update(seed);
	state.update(&nonce.to_le_bytes());
	state.finalize_xof()
}

/// Read `nblocks` full rate blocks from a squeezing XOF into the front of `out`.
#[inline]
pub fn squeeze_blocks<R: XofReader>(reader: &mut R, out: &mut [u8], nblocks: usize, rate: usize) {
	reader.read(&mut out[..nblocks * rate]);
}

/// A caller-owned SHAKE256 state.
///
/// Absorb with [`ShakeScratch::absorb`], then [`ShakeScratch::squeeze`] once: squeezing hands the
/// absorbed state to a reader and leaves a fresh state behind, so one scratch can serve every
/// hash of a signing or verification pass without carrying data from one to the next.
#[derive(Clone, Default)]
pub struct ShakeScratch {
	state: Shake256,
}

impl ShakeScratch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn absorb(&mut self, data: &[u8]) -> &mut Self {
		self.state.update(data);
		self
	}

	pub fn squeeze(&mut self, out: &mut [u8]) {
		let mut reader = core::mem::take(&mut self.state).finalize_xof();
		reader.read(out);
	}

	/// Drop anything absorbed so far.
	pub fn reset(&mut self) {
		self.state = Shake256::default();
	}
}

#[cfg(feature = "std")]
pub use pool::{HasherPool, PooledScratch};

#[cfg(feature = "std")]
mod pool {
	use super::ShakeScratch;
	use core::ops::{Deref, DerefMut};
	use std::{sync::Mutex, vec::Vec};

	const DEFAULT_CAPACITY: usize = 16;

	/// A bounded stash of [`ShakeScratch`] states shared between threads.
	///
	/// [`HasherPool::checkout`] hands out a guard that owns one scratch for the duration of an
	/// operation. The scratch is reset when it is handed out and again when the guard drops, at
	/// which point it goes back to the pool (or is discarded if the pool is full).
	pub struct HasherPool {
		idle: Mutex<Vec<ShakeScratch>>,
		capacity: usize,
	}

	impl Default for HasherPool {
		fn default() -> Self {
			Self::with_capacity(DEFAULT_CAPACITY)
		}
	}

	impl HasherPool {
		pub fn new() -> Self {
			Self::default()
		}

		pub fn with_capacity(capacity: usize) -> Self {
			HasherPool { idle: Mutex::new(Vec::with_capacity(capacity)), capacity }
		}

		pub fn checkout(&self) -> PooledScratch<'_> {
			let mut scratch = self.lock().pop().unwrap_or_default();
			scratch.reset();
			PooledScratch { pool: self, scratch }
		}

		/// Number of scratch states currently parked in the pool.
		pub fn idle(&self) -> usize {
			self.lock().len()
		}

		fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ShakeScratch>> {
			self.idle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
		}

		fn give_back(&self, mut scratch: ShakeScratch) {
			scratch.reset();
			let mut idle = self.lock();
			if idle.len() < self.capacity {
				idle.push(scratch);
			}
		}
	}

	/// RAII checkout from a [`HasherPool`].
	pub struct PooledScratch<'a> {
		pool: &'a HasherPool,
		scratch: ShakeScratch,
	}

	impl Deref for PooledScratch<'_> {
		type Target = ShakeScratch;

		fn deref(&self) -> &ShakeScratch {
			&self.scratch
		}
	}

	impl DerefMut for PooledScratch<'_> {
		fn deref_mut(&mut self) -> &mut ShakeScratch {
			&mut self.scratch
		}
	}

	impl Drop for PooledScratch<'_> {
		fn drop(&mut self) {
			self.pool.give_back(core::mem::take(&mut self.scratch));
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn one_shot(parts: &[&[u8]], out: &mut [u8]) {
		let mut state = Shake256::default();
		for part in parts {
			state.update(part);
		}
		state.finalize_xof().read(out);
	}

	#[test]
	fn scratch_matches_one_shot() {
		let mut scratch = ShakeScratch::new();
		let mut a = [0u8; 64];
		let mut b = [0u8; 64];
		scratch.absorb(b"hello ").absorb(b"world").squeeze(&mut a);
		one_shot(&[b"hello world".as_slice()], &mut b);
		assert_eq!(a, b);
	}

	#[test]
	fn squeeze_leaves_fresh_state() {
		let mut scratch = ShakeScratch::new();
		let mut first = [0u8; 32];
		let mut second = [0u8; 32];
		scratch.absorb(b"secret").squeeze(&mut first);
		scratch.absorb(b"public").squeeze(&mut second);

		let mut expected = [0u8; 32];
		one_shot(&[b"public".as_slice()], &mut expected);
		assert_eq!(second, expected);
	}

	#[test]
	fn reset_discards_absorbed_input() {
		let mut scratch = ShakeScratch::new();
		scratch.absorb(b"leftover");
		scratch.reset();
		let mut out = [0u8; 32];
		scratch.absorb(b"x").squeeze(&mut out);

		let mut expected = [0u8; 32];
		one_shot(&[b"x".as_slice()], &mut expected);
		assert_eq!(out, expected);
	}

	#[test]
	fn streams_absorb_nonce_little_endian() {
		let mut a = [0u8; SHAKE256_RATE];
		let mut b = [0u8; SHAKE256_RATE];
		squeeze_blocks(&mut shake256_stream(b"seed", 0x0102), &mut a, 1, SHAKE256_RATE);
		one_shot(&[b"seed".as_slice(), &[0x02, 0x01]], &mut b);
		assert_eq!(a, b);
	}

	#[cfg(feature = "std")]
	#[test]
	fn pool_resets_on_checkout_and_return() {
		let pool = HasherPool::with_capacity(2);
		{
			let mut guard = pool.checkout();
			guard.absorb(b"left behind");
		}
		assert_eq!(pool.idle(), 1);

		let mut guard = pool.checkout();
		assert_eq!(pool.idle(), 0);
		let mut out = [0u8; 32];
		guard.absorb(b"x").squeeze(&mut out);

		let mut expected = [0u8; 32];
		one_shot(&[b"x".as_slice()], &mut expected);
		assert_eq!(out, expected);
	}

	#[cfg(feature = "std")]
	#[test]
	fn pool_never_grows_past_capacity() {
		let pool = HasherPool::with_capacity(1);
		let a = pool.checkout();
		let b = pool.checkout();
		drop(a);
		drop(b);
		assert_eq!(pool.idle(), 1);
	}
}
