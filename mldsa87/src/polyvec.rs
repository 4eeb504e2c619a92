use crate::{
	params::{self, K, L},
	poly::{self, Coeff, Ntt, Poly},
};
use alloc::boxed::Box;
use core::array;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Vector of L polynomials (s1, y, z).
pub struct Polyvecl<D = Coeff> {
	pub vec: [Poly<D>; L],
}

/// Vector of K polynomials (s2, t, w, h).
pub struct Polyveck<D = Coeff> {
	pub vec: [Poly<D>; K],
}

macro_rules! impl_polyvec {
	($name:ident) => {
		impl<D> Default for $name<D> {
			fn default() -> Self {
				$name { vec: array::from_fn(|_| Poly::default()) }
			}
		}

		impl<D> Clone for $name<D> {
			fn clone(&self) -> Self {
				$name { vec: self.vec }
			}
		}

		impl<D> PartialEq for $name<D> {
			fn eq(&self, other: &Self) -> bool {
				self.vec == other.vec
			}
		}

		impl<D> core::fmt::Debug for $name<D> {
			fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
				f.debug_list().entries(self.vec.iter()).finish()
			}
		}

		impl<D> Zeroize for $name<D> {
			fn zeroize(&mut self) {
				for p in self.vec.iter_mut() {
					p.zeroize();
				}
			}
		}

		impl<D> Drop for $name<D> {
			fn drop(&mut self) {
				self.zeroize();
			}
		}

		impl<D> ZeroizeOnDrop for $name<D> {}
	};
}

impl_polyvec!(Polyvecl);
impl_polyvec!(Polyveck);

/// The K x L public matrix A, held in NTT representation.
#[derive(Default)]
pub struct Matrix {
	pub rows: [Polyvecl<Ntt>; K],
}

/// Implementation of ExpandA. Generates matrix A with uniformly random coefficients a_{i,j} by
/// performing rejection sampling on the output stream of SHAKE128(rho|j|i).
impl Matrix {
	pub fn expand(rho: &[u8; params::SEEDBYTES]) -> Box<Self> {
		let mut mat = Box::<Matrix>::default();
		for (i, row) in mat.rows.iter_mut().enumerate() {
			for (j, entry) in row.vec.iter_mut().enumerate() {
				*entry = poly::uniform(rho, ((i << 8) + j) as u16);
			}
		}
		mat
	}

	/// A * v, one row dot product per output entry.
	pub fn mul(&self, v: &Polyvecl<Ntt>) -> Polyveck<Ntt> {
		Polyveck { vec: array::from_fn(|i| self.rows[i].pointwise_acc_montgomery(v)) }
	}
}

impl Polyvecl<Ntt> {
	/// Pointwise multiply vectors of polynomials of length L, multiply resulting vector by 2^{-32}
	/// and add (accumulate) polynomials in it. Everything stays in NTT domain. Input coefficients
	/// are assumed to be less than 22*Q. Output coefficients are less than 2*L*Q.
	pub fn pointwise_acc_montgomery(&self, v: &Polyvecl<Ntt>) -> Poly<Ntt> {
		let mut w = poly::pointwise_montgomery(&self.vec[0], &v.vec[0]);
		for i in 1..L {
			poly::add_ip(&mut w, &poly::pointwise_montgomery(&self.vec[i], &v.vec[i]));
		}
		w
	}
}

pub fn l_uniform_eta(seed: &[u8; params::CRHBYTES], nonce: u16) -> Polyvecl {
	Polyvecl { vec: array::from_fn(|i| poly::uniform_eta(seed, nonce + i as u16)) }
}

pub fn k_uniform_eta(seed: &[u8; params::CRHBYTES], nonce: u16) -> Polyveck {
	Polyveck { vec: array::from_fn(|i| poly::uniform_eta(seed, nonce + i as u16)) }
}

/// Sample the masking vector y for signing attempt `nonce`.
pub fn l_uniform_gamma1(seed: &[u8; params::CRHBYTES], nonce: u16) -> Polyvecl {
	Polyvecl {
		vec: array::from_fn(|i| {
			poly::uniform_gamma1(seed, (L as u16).wrapping_mul(nonce).wrapping_add(i as u16))
		}),
	}
}

pub fn l_ntt(v: &Polyvecl) -> Polyvecl<Ntt> {
	Polyvecl { vec: array::from_fn(|i| poly::ntt(v.vec[i])) }
}

pub fn k_ntt(v: &Polyveck) -> Polyveck<Ntt> {
	Polyveck { vec: array::from_fn(|i| poly::ntt(v.vec[i])) }
}

pub fn l_invntt_tomont(v: &Polyvecl<Ntt>) -> Polyvecl {
	Polyvecl { vec: array::from_fn(|i| poly::invntt_tomont(v.vec[i])) }
}

/// Inverse NTT and multiplication by 2^{32} of every entry. Input coefficients need to be less
/// than Q in absolute value.
pub fn k_invntt_tomont(v: &Polyveck<Ntt>) -> Polyveck {
	Polyveck { vec: array::from_fn(|i| poly::invntt_tomont(v.vec[i])) }
}

/// Multiply every entry of v by the single polynomial a.
pub fn l_pointwise_poly_montgomery(a: &Poly<Ntt>, v: &Polyvecl<Ntt>) -> Polyvecl<Ntt> {
	Polyvecl { vec: array::from_fn(|i| poly::pointwise_montgomery(a, &v.vec[i])) }
}

pub fn k_pointwise_poly_montgomery(a: &Poly<Ntt>, v: &Polyveck<Ntt>) -> Polyveck<Ntt> {
	Polyveck { vec: array::from_fn(|i| poly::pointwise_montgomery(a, &v.vec[i])) }
}

/// Reduce coefficients to representatives in [-6283008, 6283008].
pub fn l_reduce<D>(v: &mut Polyvecl<D>) {
	v.vec.iter_mut().for_each(poly::reduce);
}

pub fn k_reduce<D>(v: &mut Polyveck<D>) {
	v.vec.iter_mut().for_each(poly::reduce);
}

/// For all coefficients add Q if coefficient is negative.
pub fn k_caddq<D>(v: &mut Polyveck<D>) {
	v.vec.iter_mut().for_each(poly::caddq);
}

/// Add vectors of polynomials of length L. No modular reduction is performed.
pub fn l_add_ip<D>(w: &mut Polyvecl<D>, v: &Polyvecl<D>) {
	for (a, b) in w.vec.iter_mut().zip(v.vec.iter()) {
		poly::add_ip(a, b);
	}
}

/// Add vectors of polynomials of length K. No modular reduction is performed.
pub fn k_add_ip<D>(w: &mut Polyveck<D>, v: &Polyveck<D>) {
	for (a, b) in w.vec.iter_mut().zip(v.vec.iter()) {
		poly::add_ip(a, b);
	}
}

/// Subtract vectors of polynomials of length K. No modular reduction is performed.
pub fn k_sub_ip<D>(w: &mut Polyveck<D>, v: &Polyveck<D>) {
	for (a, b) in w.vec.iter_mut().zip(v.vec.iter()) {
		poly::sub_ip(a, b);
	}
}

/// Multiply every entry by 2^D without modular reduction.
pub fn k_shiftl<D>(v: &mut Polyveck<D>) {
	v.vec.iter_mut().for_each(poly::shiftl);
}

/// Returns true if every polynomial in the vector has infinity norm < bound. All entries are
/// checked whatever the outcome of earlier ones.
pub fn polyvecl_is_norm_within_bound<D>(v: &Polyvecl<D>, bound: i32) -> bool {
	v.vec.iter().fold(true, |ok, p| ok & poly::check_norm(p, bound))
}

pub fn polyveck_is_norm_within_bound<D>(v: &Polyveck<D>, bound: i32) -> bool {
	v.vec.iter().fold(true, |ok, p| ok & poly::check_norm(p, bound))
}

/// Split every coefficient of t into t1*2^D + t0. Returns (t1, t0).
pub fn k_power2round(v: &Polyveck) -> (Polyveck, Polyveck) {
	let mut v1 = Polyveck::default();
	let mut v0 = Polyveck::default();
	for i in 0..K {
		(v1.vec[i], v0.vec[i]) = poly::power2round(&v.vec[i]);
	}
	(v1, v0)
}

/// High and low bits of every coefficient. Returns (v1, v0).
pub fn k_decompose(v: &Polyveck) -> (Polyveck, Polyveck) {
	let mut v1 = Polyveck::default();
	let mut v0 = Polyveck::default();
	for i in 0..K {
		(v1.vec[i], v0.vec[i]) = poly::decompose(&v.vec[i]);
	}
	(v1, v0)
}

/// Compute the hint vector for (v0, v1) into h. Returns the total number of 1s.
pub fn k_make_hint(h: &mut Polyveck, v0: &Polyveck, v1: &Polyveck) -> usize {
	let mut s = 0;
	for i in 0..K {
		s += poly::make_hint(&mut h.vec[i], &v0.vec[i], &v1.vec[i]);
	}
	s
}

/// Replace every coefficient of w with its hint-corrected high bits.
pub fn k_use_hint(w: &mut Polyveck, h: &Polyveck) {
	for i in 0..K {
		poly::use_hint(&mut w.vec[i], &h.vec[i]);
	}
}

pub fn k_pack_w1(r: &mut [u8], w1: &Polyveck) {
	for (chunk, p) in r.chunks_exact_mut(params::POLYW1_PACKEDBYTES).zip(w1.vec.iter()) {
		poly::w1_pack(chunk, p);
	}
}
