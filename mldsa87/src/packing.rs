//! Byte layouts of public keys, secret keys and signatures.
//!
//! Each layout is a struct with named fields and one `encode`/`decode` pair; all offset
//! bookkeeping happens through [`Writer`] and [`Reader`] inside those impls.

use crate::{
	params::{self, K, L, OMEGA},
	poly,
	polyvec::{Polyveck, Polyvecl},
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Sequential writer over a fixed-size output buffer.
struct Writer<'a> {
	buf: &'a mut [u8],
	pos: usize,
}

impl<'a> Writer<'a> {
	fn new(buf: &'a mut [u8]) -> Self {
		Writer { buf, pos: 0 }
	}

	fn next(&mut self, len: usize) -> &mut [u8] {
		let start = self.pos;
		self.pos += len;
		&mut self.buf[start..self.pos]
	}

	fn bytes(&mut self, data: &[u8]) {
		self.next(data.len()).copy_from_slice(data);
	}
}

/// Sequential reader over a fixed-size input buffer.
struct Reader<'a> {
	buf: &'a [u8],
	pos: usize,
}

impl<'a> Reader<'a> {
	fn new(buf: &'a [u8]) -> Self {
		Reader { buf, pos: 0 }
	}

	fn next(&mut self, len: usize) -> &'a [u8] {
		let start = self.pos;
		self.pos += len;
		&self.buf[start..self.pos]
	}

	fn array<const M: usize>(&mut self) -> [u8; M] {
		let mut out = [0u8; M];
		out.copy_from_slice(self.next(M));
		out
	}
}

/// Public key pk = (rho, t1).
#[derive(Clone, Debug, PartialEq)]
pub struct PublicKeyParts {
	pub rho: [u8; params::SEEDBYTES],
	pub t1: Polyveck,
}

impl PublicKeyParts {
	pub fn encode(&self, pk: &mut [u8; params::PUBLICKEYBYTES]) {
		let mut w = Writer::new(pk);
		w.bytes(&self.rho);
		for p in self.t1.vec.iter() {
			poly::t1_pack(w.next(params::POLYT1_PACKEDBYTES), p);
		}
	}

	pub fn decode(pk: &[u8; params::PUBLICKEYBYTES]) -> Self {
		let mut r = Reader::new(pk);
		let rho = r.array();
		let mut t1 = Polyveck::default();
		for p in t1.vec.iter_mut() {
			*p = poly::t1_unpack(r.next(params::POLYT1_PACKEDBYTES));
		}
		PublicKeyParts { rho, t1 }
	}
}

/// Secret key sk = (rho, key, tr, s1, s2, t0). `TR` is the length of tr: 64 bytes for ML-DSA-87,
/// 32 for legacy Dilithium.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKeyParts<const TR: usize = { params::TR_BYTES }> {
	pub rho: [u8; params::SEEDBYTES],
	pub key: [u8; params::SEEDBYTES],
	pub tr: [u8; TR],
	pub s1: Polyvecl,
	pub s2: Polyveck,
	pub t0: Polyveck,
}

impl<const TR: usize> SecretKeyParts<TR> {
	pub const BYTES: usize = 2 * params::SEEDBYTES +
		TR + L * params::POLYETA_PACKEDBYTES +
		K * params::POLYETA_PACKEDBYTES +
		K * params::POLYT0_PACKEDBYTES;

	/// Write the key into `sk`, which must be [`Self::BYTES`] long.
	pub fn pack(&self, sk: &mut [u8]) {
		debug_assert_eq!(sk.len(), Self::BYTES);
		let mut w = Writer::new(sk);
		w.bytes(&self.rho);
		w.bytes(&self.key);
		w.bytes(&self.tr);
		for p in self.s1.vec.iter() {
			poly::eta_pack(w.next(params::POLYETA_PACKEDBYTES), p);
		}
		for p in self.s2.vec.iter() {
			poly::eta_pack(w.next(params::POLYETA_PACKEDBYTES), p);
		}
		for p in self.t0.vec.iter() {
			poly::t0_pack(w.next(params::POLYT0_PACKEDBYTES), p);
		}
	}

	/// Read a key from `sk`, which must be at least [`Self::BYTES`] long.
	pub fn unpack(sk: &[u8]) -> Self {
		let mut r = Reader::new(sk);
		let mut parts = SecretKeyParts {
			rho: r.array(),
			key: r.array(),
			tr: r.array(),
			s1: Polyvecl::default(),
			s2: Polyveck::default(),
			t0: Polyveck::default(),
		};
		for p in parts.s1.vec.iter_mut() {
			*p = poly::eta_unpack(r.next(params::POLYETA_PACKEDBYTES));
		}
		for p in parts.s2.vec.iter_mut() {
			*p = poly::eta_unpack(r.next(params::POLYETA_PACKEDBYTES));
		}
		for p in parts.t0.vec.iter_mut() {
			*p = poly::t0_unpack(r.next(params::POLYT0_PACKEDBYTES));
		}
		parts
	}
}

impl SecretKeyParts {
	pub fn encode(&self, sk: &mut [u8; params::SECRETKEYBYTES]) {
		self.pack(sk)
	}

	pub fn decode(sk: &[u8; params::SECRETKEYBYTES]) -> Self {
		Self::unpack(sk)
	}
}

/// Signature sig = (c~, z, h). `C` is the length of c~: 64 bytes for ML-DSA-87, 32 for legacy
/// Dilithium.
#[derive(Clone, Debug, PartialEq)]
pub struct SignatureParts<const C: usize = { params::C_DASH_BYTES }> {
	pub c_tilde: [u8; C],
	pub z: Polyvecl,
	pub h: Polyveck,
}

impl<const C: usize> SignatureParts<C> {
	pub const BYTES: usize = C + L * params::POLYZ_PACKEDBYTES + params::POLYVECH_PACKEDBYTES;

	/// Write the signature into `sig`, which must be [`Self::BYTES`] long. Assumes h holds at
	/// most OMEGA ones, which signing guarantees.
	pub fn pack(&self, sig: &mut [u8]) {
		debug_assert_eq!(sig.len(), Self::BYTES);
		let mut w = Writer::new(sig);
		w.bytes(&self.c_tilde);
		for p in self.z.vec.iter() {
			poly::z_pack(w.next(params::POLYZ_PACKEDBYTES), p);
		}
		encode_hint(w.next(params::POLYVECH_PACKEDBYTES), &self.h);
	}

	/// Returns `None` if `sig` is not [`Self::BYTES`] long or the hint section is not in
	/// canonical form.
	pub fn unpack(sig: &[u8]) -> Option<Self> {
		if sig.len() != Self::BYTES {
			return None;
		}
		let mut r = Reader::new(sig);
		let c_tilde = r.array();
		let mut z = Polyvecl::default();
		for p in z.vec.iter_mut() {
			*p = poly::z_unpack(r.next(params::POLYZ_PACKEDBYTES));
		}
		let h = decode_hint(r.next(params::POLYVECH_PACKEDBYTES))?;
		Some(SignatureParts { c_tilde, z, h })
	}
}

impl SignatureParts {
	pub fn encode(&self, sig: &mut [u8; params::SIGNBYTES]) {
		self.pack(sig)
	}

	/// Returns `None` if the hint section is not in canonical form.
	pub fn decode(sig: &[u8; params::SIGNBYTES]) -> Option<Self> {
		Self::unpack(sig)
	}
}

/// Encode the hint vector into OMEGA + K bytes: the positions of all ones, row after row, followed
/// by the running count of ones at the end of each row. Unused position bytes stay zero.
///
/// The loop touches every coefficient and writes a byte for each one, so the memory access
/// pattern does not depend on where the ones are.
pub fn encode_hint(out: &mut [u8], h: &Polyveck) {
	let out = &mut out[..params::POLYVECH_PACKEDBYTES];
	out.fill(0);

	let mut k = 0usize;
	for (i, p) in h.vec.iter().enumerate() {
		for (j, &coeff) in p.coeffs.iter().enumerate() {
			let set = (coeff != 0) as usize;
			let slot = k.min(OMEGA - 1);
			let mask = ((set & (k < OMEGA) as usize) as u8).wrapping_neg();
			out[slot] = (j as u8 & mask) | (out[slot] & !mask);
			k += set;
		}
		out[OMEGA + i] = k as u8;
	}
}

/// Decode and validate the hint section. Rejects (returns `None`) when
/// - a running count is smaller than the previous one,
/// - a running count is larger than OMEGA,
/// - positions inside a row are not strictly increasing,
/// - any position byte past the final count is nonzero.
pub fn decode_hint(bytes: &[u8]) -> Option<Polyveck> {
	if bytes.len() != params::POLYVECH_PACKEDBYTES {
		return None;
	}
	let (positions, counts) = bytes.split_at(OMEGA);

	let mut h = Polyveck::default();
	let mut k = 0usize;
	for (i, &count) in counts.iter().enumerate() {
		let end = count as usize;
		if end < k || end > OMEGA {
			return None;
		}
		for j in k..end {
			if j > k && positions[j] <= positions[j - 1] {
				return None;
			}
			h.vec[i].coeffs[positions[j] as usize] = 1;
		}
		k = end;
	}

	if positions[k..].iter().any(|&b| b != 0) {
		return None;
	}
	Some(h)
}

/// Number of ones in a decoded hint vector.
pub fn hint_weight(h: &Polyveck) -> usize {
	h.vec.iter().map(|p| p.coeffs.iter().filter(|&&c| c != 0).count()).sum()
}
