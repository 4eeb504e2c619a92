use crate::{
	ntt,
	params::{self, ETA, GAMMA1, N},
	reduce, rounding,
};
use core::{fmt, marker::PhantomData};
use zeroize::Zeroize;

mod sample;
pub use sample::{challenge, rej_eta, rej_uniform, uniform, uniform_eta, uniform_gamma1};

const T0_OFFSET: i32 = 1 << (params::D - 1);

mod sealed {
	pub trait Sealed {}
}

/// Representation a [`Poly`] is currently in.
pub trait Domain: sealed::Sealed {}

/// Plain coefficient representation.
pub enum Coeff {}
/// Number-theoretic transform representation.
pub enum Ntt {}

impl sealed::Sealed for Coeff {}
impl sealed::Sealed for Ntt {}
impl Domain for Coeff {}
impl Domain for Ntt {}

/// Element of Z_q[X]/(X^256 + 1), tagged with the representation its coefficients are in.
///
/// Moving between representations goes through [`ntt`] and [`invntt_tomont`] only, so a
/// coefficient-domain polynomial can never be fed to [`pointwise_montgomery`] by mistake.
pub struct Poly<D = Coeff> {
	pub coeffs: [i32; N],
	domain: PhantomData<D>,
}

impl<D> Poly<D> {
	pub const fn from_coeffs(coeffs: [i32; N]) -> Self {
		Poly { coeffs, domain: PhantomData }
	}
}

impl<D> Default for Poly<D> {
	fn default() -> Self {
		Self::from_coeffs([0; N])
	}
}

impl<D> Clone for Poly<D> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<D> Copy for Poly<D> {}

impl<D> PartialEq for Poly<D> {
	fn eq(&self, other: &Self) -> bool {
		self.coeffs == other.coeffs
	}
}

impl<D> Eq for Poly<D> {}

impl<D> fmt::Debug for Poly<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Poly").field("coeffs", &&self.coeffs[..]).finish()
	}
}

impl<D> Zeroize for Poly<D> {
	fn zeroize(&mut self) {
		self.coeffs.zeroize();
	}
}

/// Inplace reduction of all coefficients of polynomial to representative in [-6283008,6283008].
pub fn reduce<D>(a: &mut Poly<D>) {
	for coeff in a.coeffs.iter_mut() {
		*coeff = reduce::reduce32(*coeff);
	}
}

/// For all coefficients of in/out polynomial add Q if coefficient is negative.
pub fn caddq<D>(a: &mut Poly<D>) {
	for coeff in a.coeffs.iter_mut() {
		*coeff = reduce::caddq(*coeff);
	}
}

/// Add polynomials. No modular reduction is performed.
pub fn add<D>(a: &Poly<D>, b: &Poly<D>) -> Poly<D> {
	let mut c = *a;
	add_ip(&mut c, b);
	c
}

pub fn add_ip<D>(a: &mut Poly<D>, b: &Poly<D>) {
	for (x, y) in a.coeffs.iter_mut().zip(b.coeffs.iter()) {
		*x += *y;
	}
}

/// Subtract polynomials. No modular reduction is performed.
pub fn sub<D>(a: &Poly<D>, b: &Poly<D>) -> Poly<D> {
	let mut c = *a;
	sub_ip(&mut c, b);
	c
}

pub fn sub_ip<D>(a: &mut Poly<D>, b: &Poly<D>) {
	for (x, y) in a.coeffs.iter_mut().zip(b.coeffs.iter()) {
		*x -= *y;
	}
}

/// Multiply polynomial by 2^D without modular reduction. Assumes input coefficients to be less
/// than 2^{31-D} in absolute value.
pub fn shiftl<D>(a: &mut Poly<D>) {
	for coeff in a.coeffs.iter_mut() {
		*coeff <<= params::D;
	}
}

/// Forward NTT. Output coefficients can be up to 16*Q larger than input coefficients.
pub fn ntt(a: Poly<Coeff>) -> Poly<Ntt> {
	let mut coeffs = a.coeffs;
	ntt::ntt(&mut coeffs);
	Poly::from_coeffs(coeffs)
}

/// Inverse NTT and multiplication by 2^{32}. Input coefficients need to be less than Q in absolute
/// value and output coefficients are again bounded by Q.
pub fn invntt_tomont(a: Poly<Ntt>) -> Poly<Coeff> {
	let mut coeffs = a.coeffs;
	ntt::invntt_tomont(&mut coeffs);
	Poly::from_coeffs(coeffs)
}

/// Pointwise multiplication of polynomials in NTT domain representation and multiplication of
/// resulting polynomial by 2^{-32}.
pub fn pointwise_montgomery(a: &Poly<Ntt>, b: &Poly<Ntt>) -> Poly<Ntt> {
	Poly::from_coeffs(core::array::from_fn(|i| {
		reduce::montgomery_reduce(a.coeffs[i] as i64 * b.coeffs[i] as i64)
	}))
}

/// For all coefficients c of the input polynomial, compute c0, c1 such that c mod Q = c1*2^D + c0
/// with -2^{D-1} < c0 <= 2^{D-1}. Assumes coefficients to be standard representatives.
///
/// Returns (a1, a0).
pub fn power2round(a: &Poly) -> (Poly, Poly) {
	let mut a1 = Poly::default();
	let mut a0 = Poly::default();
	for i in 0..N {
		(a1.coeffs[i], a0.coeffs[i]) = rounding::power2round(a.coeffs[i]);
	}
	(a1, a0)
}

/// High and low bits of every coefficient, see [`rounding::decompose`].
///
/// Returns (a1, a0).
pub fn decompose(a: &Poly) -> (Poly, Poly) {
	let mut a1 = Poly::default();
	let mut a0 = Poly::default();
	for i in 0..N {
		(a1.coeffs[i], a0.coeffs[i]) = rounding::decompose(a.coeffs[i]);
	}
	(a1, a0)
}

/// Compute hint polynomial, the coefficients of which indicate whether the low bits of the
/// corresponding coefficient of the input polynomial overflow into the high bits.
///
/// # Arguments
///
/// * 'h' - output hint polynomial
/// * 'a0' - low part of input polynomial
/// * 'a1' - high part of input polynomial
///
/// Returns the number of 1s in h.
pub fn make_hint(h: &mut Poly, a0: &Poly, a1: &Poly) -> usize {
	let mut s = 0usize;
	for i in 0..N {
		h.coeffs[i] = rounding::make_hint(a0.coeffs[i], a1.coeffs[i]);
		s += h.coeffs[i] as usize;
	}
	s
}

/// Use hint polynomial to correct the high bits of a polynomial in place.
pub fn use_hint(a: &mut Poly, hint: &Poly) {
	for i in 0..N {
		a.coeffs[i] = rounding::use_hint(a.coeffs[i], hint.coeffs[i]);
	}
}

/// Check infinity norm of polynomial against given bound. Assumes input coefficients were reduced
/// by [`reduce`]. Every coefficient is inspected regardless of earlier results.
///
/// Returns true if the norm is strictly smaller than `bound`.
pub fn check_norm<D>(a: &Poly<D>, bound: i32) -> bool {
	if bound > (params::Q - 1) / 8 {
		return false;
	}

	let mut exceeded = 0u32;
	for &c in a.coeffs.iter() {
		// absolute value
		let t = c - ((c >> 31) & (2 * c));
		exceeded |= ((bound - 1 - t) as u32) >> 31;
	}
	exceeded == 0
}

/// Write the low `BITS` bits of every coefficient into `out` as a little-endian bit stream.
#[inline]
fn pack_bits<const BITS: u32>(out: &mut [u8], mut value: impl FnMut(usize) -> u32) {
	let mut acc = 0u64;
	let mut filled = 0u32;
	let mut pos = 0usize;
	for i in 0..N {
		acc |= ((value(i) as u64) & ((1 << BITS) - 1)) << filled;
		filled += BITS;
		while filled >= 8 {
			out[pos] = acc as u8;
			acc >>= 8;
			filled -= 8;
			pos += 1;
		}
	}
}

/// Read N little-endian `BITS`-bit values from `bytes`.
#[inline]
fn unpack_bits<const BITS: u32>(bytes: &[u8], mut store: impl FnMut(usize, i32)) {
	let mask = (1u64 << BITS) - 1;
	let mut acc = 0u64;
	let mut filled = 0u32;
	let mut pos = 0usize;
	for i in 0..N {
		while filled < BITS {
			acc |= (bytes[pos] as u64) << filled;
			filled += 8;
			pos += 1;
		}
		store(i, (acc & mask) as i32);
		acc >>= BITS;
		filled -= BITS;
	}
}

/// Bit-pack polynomial t1 with coefficients fitting in 10 bits.
/// Input coefficients are assumed to be standard representatives.
pub fn t1_pack(r: &mut [u8], a: &Poly) {
	pack_bits::<10>(&mut r[..params::POLYT1_PACKEDBYTES], |i| a.coeffs[i] as u32);
}

/// Unpack polynomial t1 with 10-bit coefficients.
pub fn t1_unpack(a: &[u8]) -> Poly {
	let mut r = Poly::default();
	unpack_bits::<10>(&a[..params::POLYT1_PACKEDBYTES], |i, v| r.coeffs[i] = v);
	r
}

/// Bit-pack polynomial t0 with coefficients in ]-2^{D-1}, 2^{D-1}].
pub fn t0_pack(r: &mut [u8], a: &Poly) {
	pack_bits::<13>(&mut r[..params::POLYT0_PACKEDBYTES], |i| (T0_OFFSET - a.coeffs[i]) as u32);
}

/// Unpack polynomial t0 with coefficients in ]-2^{D-1}, 2^{D-1}].
pub fn t0_unpack(a: &[u8]) -> Poly {
	let mut r = Poly::default();
	unpack_bits::<13>(&a[..params::POLYT0_PACKEDBYTES], |i, v| r.coeffs[i] = T0_OFFSET - v);
	r
}

/// Bit-pack polynomial with coefficients in [-ETA,ETA].
pub fn eta_pack(r: &mut [u8], a: &Poly) {
	pack_bits::<3>(&mut r[..params::POLYETA_PACKEDBYTES], |i| (ETA - a.coeffs[i]) as u32);
}

/// Unpack polynomial with coefficients in [-ETA,ETA].
pub fn eta_unpack(a: &[u8]) -> Poly {
	let mut r = Poly::default();
	unpack_bits::<3>(&a[..params::POLYETA_PACKEDBYTES], |i, v| r.coeffs[i] = ETA - v);
	r
}

/// Bit-pack polynomial z with coefficients in [-(GAMMA1 - 1), GAMMA1].
pub fn z_pack(r: &mut [u8], a: &Poly) {
	pack_bits::<20>(&mut r[..params::POLYZ_PACKEDBYTES], |i| (GAMMA1 - a.coeffs[i]) as u32);
}

/// Unpack polynomial z with coefficients in [-(GAMMA1 - 1), GAMMA1].
pub fn z_unpack(a: &[u8]) -> Poly {
	let mut r = Poly::default();
	unpack_bits::<20>(&a[..params::POLYZ_PACKEDBYTES], |i, v| r.coeffs[i] = GAMMA1 - v);
	r
}

/// Bit-pack polynomial w1 with coefficients in [0, 15].
pub fn w1_pack(r: &mut [u8], a: &Poly) {
	pack_bits::<4>(&mut r[..params::POLYW1_PACKEDBYTES], |i| a.coeffs[i] as u32);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::params::Q;
	use rand::{rngs::StdRng, Rng, SeedableRng};

	fn random_poly(rng: &mut StdRng, lo: i32, hi: i32) -> Poly {
		Poly::from_coeffs(core::array::from_fn(|_| rng.random_range(lo..=hi)))
	}

	#[test]
	fn test_add_sub() {
		let a = Poly::<Coeff>::from_coeffs(core::array::from_fn(|i| i as i32));
		let b = Poly::from_coeffs(core::array::from_fn(|i| 3 * i as i32));
		let c = add(&a, &b);
		let d = sub(&c, &b);
		assert_eq!(c.coeffs[10], 40);
		assert_eq!(d, a);
	}

	#[test]
	fn test_shiftl() {
		let mut a = Poly::<Coeff>::default();
		a.coeffs[0] = 3;
		shiftl(&mut a);
		assert_eq!(a.coeffs[0], 3 << params::D);
	}

	#[test]
	fn test_ntt_multiplies_by_x() {
		// (1 + X) * X^255 = X^255 - 1 in the negacyclic ring
		let mut a = Poly::<Coeff>::default();
		a.coeffs[0] = 1;
		a.coeffs[1] = 1;
		let mut b = Poly::<Coeff>::default();
		b.coeffs[255] = 1;

		let mut c = invntt_tomont(pointwise_montgomery(&ntt(a), &ntt(b)));
		reduce(&mut c);
		caddq(&mut c);

		let mut expected = [0i32; N];
		expected[0] = Q - 1;
		expected[255] = 1;
		assert_eq!(c.coeffs, expected);
	}

	#[test]
	fn test_check_norm() {
		let mut a = Poly::<Coeff>::default();
		a.coeffs[17] = -99;
		assert!(check_norm(&a, 100));
		assert!(!check_norm(&a, 99));
		a.coeffs[17] = 99;
		assert!(!check_norm(&a, 99));
		assert!(!check_norm(&a, Q));
	}

	#[test]
	fn test_power2round_poly() {
		let mut rng = StdRng::seed_from_u64(3);
		let a = random_poly(&mut rng, 0, Q - 1);
		let (a1, a0) = power2round(&a);
		for i in 0..N {
			assert_eq!((a1.coeffs[i] << params::D) + a0.coeffs[i], a.coeffs[i]);
		}
	}

	#[test]
	fn test_make_and_use_hint() {
		let mut rng = StdRng::seed_from_u64(4);
		let w = random_poly(&mut rng, 0, Q - 1);
		let (w1, w0) = decompose(&w);
		let mut h = Poly::default();
		assert_eq!(make_hint(&mut h, &w0, &w1), 0);

		let mut corrected = w;
		use_hint(&mut corrected, &h);
		assert_eq!(corrected, w1);
	}

	#[test]
	fn test_t1_roundtrip() {
		let mut rng = StdRng::seed_from_u64(5);
		let a = random_poly(&mut rng, 0, (1 << 10) - 1);
		let mut buf = [0u8; params::POLYT1_PACKEDBYTES];
		t1_pack(&mut buf, &a);
		assert_eq!(t1_unpack(&buf), a);
	}

	#[test]
	fn test_t0_roundtrip() {
		let mut rng = StdRng::seed_from_u64(6);
		let a = random_poly(&mut rng, -(1 << 12) + 1, 1 << 12);
		let mut buf = [0u8; params::POLYT0_PACKEDBYTES];
		t0_pack(&mut buf, &a);
		assert_eq!(t0_unpack(&buf), a);
	}

	#[test]
	fn test_eta_roundtrip() {
		let mut rng = StdRng::seed_from_u64(7);
		let a = random_poly(&mut rng, -ETA, ETA);
		let mut buf = [0u8; params::POLYETA_PACKEDBYTES];
		eta_pack(&mut buf, &a);
		assert_eq!(eta_unpack(&buf), a);
	}

	#[test]
	fn test_z_roundtrip() {
		let mut rng = StdRng::seed_from_u64(8);
		let a = random_poly(&mut rng, -(GAMMA1 - 1), GAMMA1);
		let mut buf = [0u8; params::POLYZ_PACKEDBYTES];
		z_pack(&mut buf, &a);
		assert_eq!(z_unpack(&buf), a);
	}

	#[test]
	fn test_t1_known_layout() {
		let mut a = Poly::default();
		a.coeffs[0] = 0x3FF;
		a.coeffs[1] = 0x001;
		let mut buf = [0u8; params::POLYT1_PACKEDBYTES];
		t1_pack(&mut buf, &a);
		assert_eq!(&buf[..3], &[0xFF, 0x07, 0x00]);
	}

	#[test]
	fn test_w1_pack_nibbles() {
		let a = Poly::from_coeffs(core::array::from_fn(|i| (i % 16) as i32));
		let mut buf = [0u8; params::POLYW1_PACKEDBYTES];
		w1_pack(&mut buf, &a);
		assert_eq!(buf[0], 0x10);
		assert_eq!(buf[7], 0xFE);
	}
}
