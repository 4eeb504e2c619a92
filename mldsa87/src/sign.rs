use crate::{
	errors::{Error, Result},
	packing::{self, PublicKeyParts, SecretKeyParts, SignatureParts},
	params::{self, BETA, GAMMA1, GAMMA2, K, L, OMEGA},
	poly,
	polyvec::{self, Matrix, Polyveck},
	xof::ShakeScratch,
};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

const W1_PACKEDBYTES: usize = K * params::POLYW1_PACKEDBYTES;

/// rho | rho' | key, as squeezed from the key generation seed.
pub(crate) const SEEDBUF_BYTES: usize = 2 * params::SEEDBYTES + params::CRHBYTES;

/// Generate public and private key.
///
/// # Arguments
///
/// * 'pk' - output public key
/// * 'sk' - output private key
/// * 'seed' - 32 bytes the whole key pair is derived from
pub fn keypair(
	pk: &mut [u8; params::PUBLICKEYBYTES],
	sk: &mut [u8; params::SECRETKEYBYTES],
	seed: &[u8; params::SEEDBYTES],
) {
	keypair_with(&mut ShakeScratch::new(), pk, sk, seed)
}

/// [`keypair`] hashing through a caller-owned scratch state.
pub fn keypair_with(
	scratch: &mut ShakeScratch,
	pk: &mut [u8; params::PUBLICKEYBYTES],
	sk: &mut [u8; params::SECRETKEYBYTES],
	seed: &[u8; params::SEEDBYTES],
) {
	let mut seedbuf = [0u8; SEEDBUF_BYTES];
	scratch.absorb(seed).absorb(&[K as u8, L as u8]).squeeze(&mut seedbuf);
	expand_keypair::<{ params::TR_BYTES }>(scratch, &mut seedbuf, pk, sk);
}

/// Key generation from an already expanded seed. `seedbuf` is wiped, and tr = H(pk) is cut to
/// `TR` bytes.
pub(crate) fn expand_keypair<const TR: usize>(
	scratch: &mut ShakeScratch,
	seedbuf: &mut [u8; SEEDBUF_BYTES],
	pk: &mut [u8; params::PUBLICKEYBYTES],
	sk: &mut [u8],
) {
	let mut rho = [0u8; params::SEEDBYTES];
	let mut rhoprime = [0u8; params::CRHBYTES];
	let mut key = [0u8; params::SEEDBYTES];
	rho.copy_from_slice(&seedbuf[..params::SEEDBYTES]);
	rhoprime.copy_from_slice(&seedbuf[params::SEEDBYTES..params::SEEDBYTES + params::CRHBYTES]);
	key.copy_from_slice(&seedbuf[params::SEEDBYTES + params::CRHBYTES..]);
	seedbuf.zeroize();

	let mat = Matrix::expand(&rho);
	let s1 = polyvec::l_uniform_eta(&rhoprime, 0);
	let s2 = polyvec::k_uniform_eta(&rhoprime, L as u16);
	rhoprime.zeroize();

	// t = A*s1 + s2
	let mut that = mat.mul(&polyvec::l_ntt(&s1));
	polyvec::k_reduce(&mut that);
	let mut t = polyvec::k_invntt_tomont(&that);
	polyvec::k_add_ip(&mut t, &s2);
	polyvec::k_caddq(&mut t);
	let (t1, t0) = polyvec::k_power2round(&t);

	PublicKeyParts { rho, t1 }.encode(pk);

	let mut tr = [0u8; TR];
	scratch.absorb(&pk[..]).squeeze(&mut tr);

	SecretKeyParts { rho, key, tr, s1, s2, t0 }.pack(sk);
	key.zeroize();
	tracing::trace!("generated key pair");
}

/// Absorb the message representative input tr | 0 | len(ctx) | ctx | msg.
fn message_hash(
	scratch: &mut ShakeScratch,
	tr: &[u8; params::TR_BYTES],
	ctx: &[u8],
	msg: &[u8],
) -> [u8; params::CRHBYTES] {
	let mut mu = [0u8; params::CRHBYTES];
	scratch.absorb(tr).absorb(&[0, ctx.len() as u8]).absorb(ctx).absorb(msg).squeeze(&mut mu);
	mu
}

/// Compute a signature over `msg` under context `ctx`.
///
/// # Arguments
///
/// * 'sig' - output signature
/// * 'msg' - message to sign
/// * 'ctx' - context string, at most 255 bytes
/// * 'sk' - private key
/// * 'rnd' - signing randomness, all zeros for deterministic signatures
pub fn signature(
	sig: &mut [u8; params::SIGNBYTES],
	msg: &[u8],
	ctx: &[u8],
	sk: &[u8; params::SECRETKEYBYTES],
	rnd: [u8; params::RND_BYTES],
) -> Result<()> {
	signature_with(&mut ShakeScratch::new(), sig, msg, ctx, sk, rnd)
}

/// [`signature`] hashing through a caller-owned scratch state.
pub fn signature_with(
	scratch: &mut ShakeScratch,
	sig: &mut [u8; params::SIGNBYTES],
	msg: &[u8],
	ctx: &[u8],
	sk: &[u8; params::SECRETKEYBYTES],
	mut rnd: [u8; params::RND_BYTES],
) -> Result<()> {
	if ctx.len() > params::MAX_CONTEXT_BYTES {
		rnd.zeroize();
		return Err(Error::ContextTooLong(ctx.len()));
	}

	let sk = SecretKeyParts::decode(sk);
	let mu = message_hash(scratch, &sk.tr, ctx, msg);
	let mut rhoprime = [0u8; params::CRHBYTES];
	scratch.absorb(&sk.key).absorb(&rnd).absorb(&mu).squeeze(&mut rhoprime);
	rnd.zeroize();

	sign_mu::<{ params::C_DASH_BYTES }, { params::TR_BYTES }>(scratch, sig, &sk, &mu, &mut rhoprime);
	Ok(())
}

/// Rejection loop over a message representative `mu`, masking with y drawn from `rhoprime`.
/// Writes a `C` byte c~ signature into `sig` and wipes `rhoprime`.
pub(crate) fn sign_mu<const C: usize, const TR: usize>(
	scratch: &mut ShakeScratch,
	sig: &mut [u8],
	sk: &SecretKeyParts<TR>,
	mu: &[u8; params::CRHBYTES],
	rhoprime: &mut [u8; params::CRHBYTES],
) {
	let mat = Matrix::expand(&sk.rho);
	let s1hat = polyvec::l_ntt(&sk.s1);
	let s2hat = polyvec::k_ntt(&sk.s2);
	let t0hat = polyvec::k_ntt(&sk.t0);

	let mut w1_packed = [0u8; W1_PACKEDBYTES];
	let mut nonce: u16 = 0;
	let mut attempts = 0u32;
	let parts = loop {
		attempts += 1;
		let y = polyvec::l_uniform_gamma1(rhoprime, nonce);
		nonce = nonce.wrapping_add(1);

		// w = A*y, split into high and low bits
		let mut what = mat.mul(&polyvec::l_ntt(&y));
		polyvec::k_reduce(&mut what);
		let mut w = polyvec::k_invntt_tomont(&what);
		polyvec::k_caddq(&mut w);
		let (w1, mut w0) = polyvec::k_decompose(&w);

		polyvec::k_pack_w1(&mut w1_packed, &w1);
		let mut c_tilde = [0u8; C];
		scratch.absorb(mu).absorb(&w1_packed).squeeze(&mut c_tilde);
		let chat = poly::ntt(poly::challenge(&c_tilde));

		// z = y + c*s1
		let mut z = polyvec::l_invntt_tomont(&polyvec::l_pointwise_poly_montgomery(&chat, &s1hat));
		polyvec::l_add_ip(&mut z, &y);
		polyvec::l_reduce(&mut z);
		let mut accept = polyvec::polyvecl_is_norm_within_bound(&z, GAMMA1 - BETA);

		// w0 - c*s2
		let cs2 = polyvec::k_invntt_tomont(&polyvec::k_pointwise_poly_montgomery(&chat, &s2hat));
		polyvec::k_sub_ip(&mut w0, &cs2);
		polyvec::k_reduce(&mut w0);
		accept &= polyvec::polyveck_is_norm_within_bound(&w0, GAMMA2 - BETA);

		let mut ct0 = polyvec::k_invntt_tomont(&polyvec::k_pointwise_poly_montgomery(&chat, &t0hat));
		polyvec::k_reduce(&mut ct0);
		accept &= polyvec::polyveck_is_norm_within_bound(&ct0, GAMMA2);

		polyvec::k_add_ip(&mut w0, &ct0);
		let mut h = Polyveck::default();
		accept &= polyvec::k_make_hint(&mut h, &w0, &w1) <= OMEGA;

		if accept {
			break SignatureParts { c_tilde, z, h };
		}
	};
	rhoprime.zeroize();
	tracing::trace!(attempts, "signature accepted");

	parts.pack(sig);
}

/// Verify a signature for a given message with a public key.
///
/// # Arguments
///
/// * 'sig' - signature to verify
/// * 'msg' - message that is claimed to be signed
/// * 'ctx' - context string the signature was made under
/// * 'pk' - public key
///
/// Returns 'true' if the verification process was successful, 'false' otherwise
pub fn verify(sig: &[u8], msg: &[u8], ctx: &[u8], pk: &[u8]) -> bool {
	verify_with(&mut ShakeScratch::new(), sig, msg, ctx, pk)
}

/// [`verify`] hashing through a caller-owned scratch state.
pub fn verify_with(
	scratch: &mut ShakeScratch,
	sig: &[u8],
	msg: &[u8],
	ctx: &[u8],
	pk: &[u8],
) -> bool {
	if ctx.len() > params::MAX_CONTEXT_BYTES {
		tracing::debug!(len = ctx.len(), "rejecting signature: context too long");
		return false;
	}
	let Some((parts, pk)) = parse_signed::<{ params::C_DASH_BYTES }>(sig, pk) else {
		return false;
	};

	let mut tr = [0u8; params::TR_BYTES];
	scratch.absorb(pk).squeeze(&mut tr);
	let mu = message_hash(scratch, &tr, ctx, msg);
	verify_mu(scratch, &parts, pk, &mu)
}

/// Length-check the public key and decode the signature, logging why either is refused.
pub(crate) fn parse_signed<'a, const C: usize>(
	sig: &[u8],
	pk: &'a [u8],
) -> Option<(SignatureParts<C>, &'a [u8; params::PUBLICKEYBYTES])> {
	if sig.len() != SignatureParts::<C>::BYTES {
		tracing::debug!(len = sig.len(), "rejecting signature: wrong signature length");
		return None;
	}
	let Ok(pk) = <&[u8; params::PUBLICKEYBYTES]>::try_from(pk) else {
		tracing::debug!(len = pk.len(), "rejecting signature: wrong public key length");
		return None;
	};
	let Some(parts) = SignatureParts::<C>::unpack(sig) else {
		tracing::debug!("rejecting signature: malformed hint");
		return None;
	};
	Some((parts, pk))
}

/// Check a decoded signature against the message representative `mu`.
pub(crate) fn verify_mu<const C: usize>(
	scratch: &mut ShakeScratch,
	parts: &SignatureParts<C>,
	pk: &[u8; params::PUBLICKEYBYTES],
	mu: &[u8; params::CRHBYTES],
) -> bool {
	if !polyvec::polyvecl_is_norm_within_bound(&parts.z, GAMMA1 - BETA) {
		tracing::debug!("rejecting signature: z out of range");
		return false;
	}
	tracing::trace!(hints = packing::hint_weight(&parts.h), "signature decoded");

	// w1' = UseHint(A*z - c*t1*2^D, h)
	let mut public = PublicKeyParts::decode(pk);
	let mat = Matrix::expand(&public.rho);
	let chat = poly::ntt(poly::challenge(&parts.c_tilde));
	let mut az = mat.mul(&polyvec::l_ntt(&parts.z));

	polyvec::k_shiftl(&mut public.t1);
	let ct1 = polyvec::k_pointwise_poly_montgomery(&chat, &polyvec::k_ntt(&public.t1));
	polyvec::k_sub_ip(&mut az, &ct1);
	polyvec::k_reduce(&mut az);
	let mut w1 = polyvec::k_invntt_tomont(&az);
	polyvec::k_caddq(&mut w1);
	polyvec::k_use_hint(&mut w1, &parts.h);

	let mut w1_packed = [0u8; W1_PACKEDBYTES];
	polyvec::k_pack_w1(&mut w1_packed, &w1);
	let mut c_tilde = [0u8; C];
	scratch.absorb(mu).absorb(&w1_packed).squeeze(&mut c_tilde);

	let matches: bool = c_tilde[..].ct_eq(&parts.c_tilde[..]).into();
	if !matches {
		tracing::debug!("rejecting signature: challenge mismatch");
	}
	matches
}
