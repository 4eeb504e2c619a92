//! Legacy (round 3) Dilithium5 over the same lattice parameters as ML-DSA-87.
//!
//! Keys and signatures differ from ML-DSA-87 in a few places: tr and c~ are 32 bytes, the key
//! generation seed is absorbed without the K, L suffix, and the message representative is
//! H(tr | msg) with no context prefix. Signing is deterministic, rho' = H(key | mu).

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
	errors::{Error, Result},
	ml_dsa_87::{concat_sealed, parse_hex_seed},
	packing::{SecretKeyParts, SignatureParts},
	params,
	sign::{self, SEEDBUF_BYTES},
	xof::ShakeScratch,
	SensitiveBytes32,
};
use alloc::{string::String, vec::Vec};
use core::fmt;

pub const TR_BYTES: usize = 32;
pub const C_TILDE_BYTES: usize = 32;

pub const PUBLICKEYBYTES: usize = params::PUBLICKEYBYTES;
pub const SECRETKEYBYTES: usize = SecretKeyParts::<TR_BYTES>::BYTES;
pub const SIGNBYTES: usize = SignatureParts::<C_TILDE_BYTES>::BYTES;

pub type Signature = [u8; SIGNBYTES];

/// Generate public and private key.
///
/// # Arguments
///
/// * 'pk' - output public key
/// * 'sk' - output private key
/// * 'seed' - 32 bytes the whole key pair is derived from
pub fn keypair(
	pk: &mut [u8; PUBLICKEYBYTES],
	sk: &mut [u8; SECRETKEYBYTES],
	seed: &[u8; params::SEEDBYTES],
) {
	keypair_with(&mut ShakeScratch::new(), pk, sk, seed)
}

/// [`keypair`] hashing through a caller-owned scratch state.
pub fn keypair_with(
	scratch: &mut ShakeScratch,
	pk: &mut [u8; PUBLICKEYBYTES],
	sk: &mut [u8; SECRETKEYBYTES],
	seed: &[u8; params::SEEDBYTES],
) {
	let mut seedbuf = [0u8; SEEDBUF_BYTES];
	scratch.absorb(seed).squeeze(&mut seedbuf);
	sign::expand_keypair::<TR_BYTES>(scratch, &mut seedbuf, pk, sk);
}

fn message_hash(
	scratch: &mut ShakeScratch,
	tr: &[u8; TR_BYTES],
	msg: &[u8],
) -> [u8; params::CRHBYTES] {
	let mut mu = [0u8; params::CRHBYTES];
	scratch.absorb(tr).absorb(msg).squeeze(&mut mu);
	mu
}

/// Compute a deterministic signature over `msg`.
///
/// # Arguments
///
/// * 'sig' - output signature
/// * 'msg' - message to sign
/// * 'sk' - private key
pub fn signature(sig: &mut [u8; SIGNBYTES], msg: &[u8], sk: &[u8; SECRETKEYBYTES]) {
	signature_with(&mut ShakeScratch::new(), sig, msg, sk)
}

/// [`signature`] hashing through a caller-owned scratch state.
pub fn signature_with(
	scratch: &mut ShakeScratch,
	sig: &mut [u8; SIGNBYTES],
	msg: &[u8],
	sk: &[u8; SECRETKEYBYTES],
) {
	let sk = SecretKeyParts::<TR_BYTES>::unpack(sk);
	let mu = message_hash(scratch, &sk.tr, msg);
	let mut rhoprime = [0u8; params::CRHBYTES];
	scratch.absorb(&sk.key).absorb(&mu).squeeze(&mut rhoprime);
	sign::sign_mu::<C_TILDE_BYTES, TR_BYTES>(scratch, sig, &sk, &mu, &mut rhoprime);
}

/// Verify a signature for a given message with a public key.
///
/// Returns 'true' if the verification process was successful, 'false' otherwise
pub fn verify(sig: &[u8], msg: &[u8], pk: &[u8]) -> bool {
	verify_with(&mut ShakeScratch::new(), sig, msg, pk)
}

/// [`verify`] hashing through a caller-owned scratch state.
pub fn verify_with(scratch: &mut ShakeScratch, sig: &[u8], msg: &[u8], pk: &[u8]) -> bool {
	let Some((parts, pk)) = sign::parse_signed::<C_TILDE_BYTES>(sig, pk) else {
		return false;
	};
	let mut tr = [0u8; TR_BYTES];
	scratch.absorb(pk).squeeze(&mut tr);
	let mu = message_hash(scratch, &tr, msg);
	sign::verify_mu(scratch, &parts, pk, &mu)
}

/// Sign with a raw secret key. An all-zero key, as left behind by [`Dilithium::zeroize`], is
/// refused.
pub fn sign_with_secret_key(msg: &[u8], sk: &[u8; SECRETKEYBYTES]) -> Result<Signature> {
	if sk.iter().all(|&b| b == 0) {
		return Err(Error::ZeroSecretKey);
	}
	let mut sig = [0u8; SIGNBYTES];
	signature(&mut sig, msg, sk);
	Ok(sig)
}

/// Check a signature | message blob and return the message if the signature holds.
pub fn open(sealed: &[u8], pk: &[u8; PUBLICKEYBYTES]) -> Option<Vec<u8>> {
	let sig = extract_signature(sealed)?;
	let msg = extract_message(sealed)?;
	verify(sig, msg, pk).then(|| msg.to_vec())
}

/// Message part of a signature | message blob, `None` if the blob is too short to hold a
/// signature.
pub fn extract_message(sealed: &[u8]) -> Option<&[u8]> {
	sealed.get(SIGNBYTES..)
}

/// Signature part of a signature | message blob, `None` if the blob is too short.
pub fn extract_signature(sealed: &[u8]) -> Option<&[u8]> {
	sealed.get(..SIGNBYTES)
}

/// A legacy signing handle holding the seed and the key pair derived from it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Dilithium {
	seed: SensitiveBytes32,
	#[zeroize(skip)]
	pk: [u8; PUBLICKEYBYTES],
	sk: [u8; SECRETKEYBYTES],
}

impl Dilithium {
	pub fn new(seed: SensitiveBytes32) -> Self {
		let mut pk = [0u8; PUBLICKEYBYTES];
		let mut sk = [0u8; SECRETKEYBYTES];
		keypair(&mut pk, &mut sk, seed.as_bytes());
		let handle = Dilithium { seed, pk, sk };
		sk.zeroize();
		handle
	}

	#[cfg(feature = "std")]
	pub fn random() -> Result<Self> {
		Ok(Dilithium::new(crate::ml_dsa_87::random_seed()?))
	}

	pub fn from_hex_seed(hex_seed: &str) -> Result<Self> {
		Ok(Dilithium::new(parse_hex_seed(hex_seed)?))
	}

	pub fn seed(&self) -> &[u8; params::SEEDBYTES] {
		self.seed.as_bytes()
	}

	pub fn hex_seed(&self) -> String {
		let mut out = String::from("0x");
		out.push_str(&hex::encode(self.seed.as_bytes()));
		out
	}

	pub fn public_key(&self) -> &[u8; PUBLICKEYBYTES] {
		&self.pk
	}

	pub fn secret_key(&self) -> &[u8; SECRETKEYBYTES] {
		&self.sk
	}

	pub fn sign(&self, msg: &[u8]) -> Signature {
		let mut sig = [0u8; SIGNBYTES];
		signature(&mut sig, msg, &self.sk);
		sig
	}

	pub fn seal(&self, msg: &[u8]) -> Vec<u8> {
		concat_sealed(&self.sign(msg), msg)
	}

	pub fn verify(&self, msg: &[u8], sig: &[u8]) -> bool {
		verify(sig, msg, &self.pk)
	}

	pub fn open(&self, sealed: &[u8]) -> Option<Vec<u8>> {
		open(sealed, &self.pk)
	}
}

impl fmt::Debug for Dilithium {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dilithium").field("public", &hex::encode(&self.pk[..8])).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn handle() -> Dilithium {
		Dilithium::new(SensitiveBytes32([0x31u8; 32]))
	}

	#[test]
	fn legacy_sizes() {
		assert_eq!(PUBLICKEYBYTES, 2592);
		assert_eq!(SECRETKEYBYTES, 4864);
		assert_eq!(SIGNBYTES, 4595);
	}

	#[test]
	fn sign_verify_roundtrip() {
		let d = handle();
		let sig = d.sign(b"legacy message");
		assert!(d.verify(b"legacy message", &sig));
		assert!(!d.verify(b"legacy messagf", &sig));
		assert_eq!(sig, d.sign(b"legacy message"));
	}

	#[test]
	fn secret_key_carries_short_tr() {
		let d = handle();
		let mut tr = [0u8; TR_BYTES];
		ShakeScratch::new().absorb(d.public_key()).squeeze(&mut tr);
		assert_eq!(d.secret_key()[..params::SEEDBYTES], d.public_key()[..params::SEEDBYTES]);
		assert_eq!(d.secret_key()[2 * params::SEEDBYTES..2 * params::SEEDBYTES + TR_BYTES], tr);
	}

	#[test]
	fn keys_differ_from_ml_dsa() {
		let seed = [0x31u8; 32];
		let mut pk = [0u8; params::PUBLICKEYBYTES];
		let mut sk = [0u8; params::SECRETKEYBYTES];
		sign::keypair(&mut pk, &mut sk, &seed);
		assert_ne!(&pk[..], &handle().public_key()[..]);
	}

	#[test]
	fn ml_dsa_signature_not_accepted() {
		let d = handle();
		let mut sig = [0u8; params::SIGNBYTES];
		let mut pk = [0u8; params::PUBLICKEYBYTES];
		let mut sk = [0u8; params::SECRETKEYBYTES];
		sign::keypair(&mut pk, &mut sk, &[0x31u8; 32]);
		sign::signature(&mut sig, b"m", b"", &sk, [0u8; 32]).unwrap();
		assert!(!verify(&sig, b"m", d.public_key()));
		assert!(!verify(&sig[..SIGNBYTES], b"m", d.public_key()));
	}

	#[test]
	fn scratch_reuse_matches_fresh_state() {
		let d = handle();
		let mut scratch = ShakeScratch::new();
		let mut sig = [0u8; SIGNBYTES];
		signature_with(&mut scratch, &mut sig, b"m", d.secret_key());
		assert_eq!(sig, d.sign(b"m"));
		assert!(verify_with(&mut scratch, &sig, b"m", d.public_key()));
		assert!(!verify_with(&mut scratch, &sig, b"n", d.public_key()));
		assert!(verify_with(&mut scratch, &sig, b"m", d.public_key()));
	}

	#[test]
	fn seal_open() {
		let d = handle();
		let sealed = d.seal(b"payload");
		assert_eq!(sealed.len(), SIGNBYTES + 7);
		assert_eq!(extract_message(&sealed), Some(b"payload".as_slice()));
		assert_eq!(d.open(&sealed), Some(b"payload".to_vec()));
		assert_eq!(open(&sealed[..SIGNBYTES - 1], d.public_key()), None);

		let other = Dilithium::new(SensitiveBytes32([0x32u8; 32]));
		assert_eq!(open(&sealed, other.public_key()), None);
	}

	#[test]
	fn sign_with_secret_key_matches_handle() {
		let d = handle();
		assert_eq!(sign_with_secret_key(b"m", d.secret_key()).unwrap(), d.sign(b"m"));
		assert_eq!(sign_with_secret_key(b"m", &[0u8; SECRETKEYBYTES]), Err(Error::ZeroSecretKey));
	}

	#[test]
	fn zeroize_wipes_seed_and_secret() {
		let mut d = handle();
		let pk = *d.public_key();
		d.zeroize();
		assert_eq!(d.seed(), &[0u8; 32]);
		assert!(d.secret_key().iter().all(|&b| b == 0));
		assert_eq!(d.public_key(), &pk);
		assert_eq!(sign_with_secret_key(b"m", d.secret_key()), Err(Error::ZeroSecretKey));
	}

	#[test]
	fn hex_seed_roundtrip() {
		let d = handle();
		assert_eq!(d.hex_seed(), alloc::format!("0x{}", "31".repeat(32)));
		let again = Dilithium::from_hex_seed(&d.hex_seed()).unwrap();
		assert_eq!(again.public_key(), d.public_key());
		assert_eq!(Dilithium::from_hex_seed("0x31").unwrap_err(), Error::SeedLength(1));
	}

	#[test]
	fn debug_is_redacted() {
		let text = alloc::format!("{:?}", handle());
		assert!(text.starts_with("Dilithium"));
		assert!(!text.contains(&hex::encode(handle().seed())));
	}
}
