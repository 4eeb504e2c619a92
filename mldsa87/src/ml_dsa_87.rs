use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
	config::SignerConfig,
	errors::{Error, Result},
	params, SensitiveBytes32,
};
use alloc::{string::String, vec::Vec};
use core::fmt;

pub const SECRETKEYBYTES: usize = crate::params::SECRETKEYBYTES;
pub const PUBLICKEYBYTES: usize = crate::params::PUBLICKEYBYTES;
pub const SIGNBYTES: usize = crate::params::SIGNBYTES;
pub const KEYPAIRBYTES: usize = SECRETKEYBYTES + PUBLICKEYBYTES;

pub type Signature = [u8; SIGNBYTES];

/// A pair of private and public keys.
#[derive(Clone)]
pub struct Keypair {
	pub secret: SecretKey,
	pub public: PublicKey,
}

impl Keypair {
	/// Generate a Keypair instance.
	///
	/// # Arguments
	///
	/// * 'seed' - 32 bytes determining the whole key pair
	///
	/// Note: The seed is moved here and zeroized when it drops.
	pub fn generate(seed: SensitiveBytes32) -> Keypair {
		let mut pk = [0u8; PUBLICKEYBYTES];
		let mut sk = [0u8; SECRETKEYBYTES];
		crate::sign::keypair(&mut pk, &mut sk, seed.as_bytes());
		let keypair = Keypair { secret: SecretKey { bytes: sk }, public: PublicKey { bytes: pk } };
		sk.zeroize();
		keypair
	}

	/// Generate a Keypair from a seed drawn from the operating system.
	#[cfg(feature = "std")]
	pub fn random() -> Result<Keypair> {
		Ok(Keypair::generate(random_seed()?))
	}

	/// Generate a Keypair from a hex encoded 32 byte seed, with or without a `0x` prefix.
	pub fn from_hex_seed(hex_seed: &str) -> Result<Keypair> {
		Ok(Keypair::generate(parse_hex_seed(hex_seed)?))
	}

	/// Secret key bytes followed by public key bytes.
	pub fn to_bytes(&self) -> [u8; KEYPAIRBYTES] {
		let mut result = [0u8; KEYPAIRBYTES];
		result[..SECRETKEYBYTES].copy_from_slice(&self.secret.bytes);
		result[SECRETKEYBYTES..].copy_from_slice(&self.public.bytes);
		result
	}

	/// Create a Keypair from bytes.
	///
	/// # Arguments
	///
	/// * 'bytes' - private and public keys bytes
	///
	/// Returns a Keypair
	pub fn from_bytes(bytes: &[u8]) -> Result<Keypair> {
		let bad = Error::BadKeypair { expected: KEYPAIRBYTES, actual: bytes.len() };
		if bytes.len() != KEYPAIRBYTES {
			return Err(bad);
		}
		let (secret_bytes, public_bytes) = bytes.split_at(SECRETKEYBYTES);
		let secret = SecretKey::from_bytes(secret_bytes).map_err(|_| bad)?;
		let public = PublicKey::from_bytes(public_bytes).map_err(|_| bad)?;
		Ok(Keypair { secret, public })
	}

	/// Compute a signature for a given message.
	///
	/// # Arguments
	///
	/// * 'msg' - message to sign
	/// * 'ctx' - context string, empty if `None`
	/// * 'hedge' - signing randomness, deterministic signature if `None`
	///
	/// Returns Result<Signature>
	pub fn sign(
		&self,
		msg: &[u8],
		ctx: Option<&[u8]>,
		hedge: Option<[u8; params::RND_BYTES]>,
	) -> Result<Signature> {
		self.secret.sign(msg, ctx, hedge)
	}

	/// Verify a signature for a given message with the public half of the pair.
	pub fn verify(&self, msg: &[u8], sig: &[u8], ctx: Option<&[u8]>) -> bool {
		self.public.verify(msg, sig, ctx)
	}

	/// Sign `msg` and return signature | message.
	pub fn seal(
		&self,
		msg: &[u8],
		ctx: Option<&[u8]>,
		hedge: Option<[u8; params::RND_BYTES]>,
	) -> Result<Vec<u8>> {
		let sig = self.sign(msg, ctx, hedge)?;
		Ok(concat_sealed(&sig, msg))
	}
}

impl fmt::Debug for Keypair {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Keypair").field("public", &self.public).finish()
	}
}

/// Private key.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SecretKey {
	pub bytes: [u8; SECRETKEYBYTES],
}

impl SecretKey {
	/// Returns a copy of underlying bytes.
	pub fn to_bytes(&self) -> [u8; SECRETKEYBYTES] {
		self.bytes
	}

	/// Create a SecretKey from bytes.
	///
	/// # Arguments
	///
	/// * 'bytes' - private key bytes
	///
	/// Returns a SecretKey
	pub fn from_bytes(bytes: &[u8]) -> Result<SecretKey> {
		match bytes.try_into() {
			Ok(bytes) => Ok(SecretKey { bytes }),
			Err(_) => Err(Error::BadSecretKey { expected: SECRETKEYBYTES, actual: bytes.len() }),
		}
	}

	/// Compute a signature for a given message.
	///
	/// # Arguments
	///
	/// * 'msg' - message to sign
	/// * 'ctx' - context string, empty if `None`
	/// * 'hedge' - signing randomness, deterministic signature if `None`
	///
	/// Returns Result<Signature>
	pub fn sign(
		&self,
		msg: &[u8],
		ctx: Option<&[u8]>,
		hedge: Option<[u8; params::RND_BYTES]>,
	) -> Result<Signature> {
		let mut sig: Signature = [0u8; SIGNBYTES];
		let rnd = hedge.unwrap_or([0u8; params::RND_BYTES]);
		crate::sign::signature(&mut sig, msg, ctx.unwrap_or_default(), &self.bytes, rnd)?;
		Ok(sig)
	}
}

impl fmt::Debug for SecretKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("SecretKey(..)")
	}
}

#[derive(Eq, Clone, PartialEq, Debug, Hash, PartialOrd, Ord)]
pub struct PublicKey {
	pub bytes: [u8; PUBLICKEYBYTES],
}

impl PublicKey {
	/// Returns a copy of underlying bytes.
	pub fn to_bytes(&self) -> [u8; PUBLICKEYBYTES] {
		self.bytes
	}

	/// Create a PublicKey from bytes.
	///
	/// # Arguments
	///
	/// * 'bytes' - public key bytes
	///
	/// Returns a PublicKey
	pub fn from_bytes(bytes: &[u8]) -> Result<PublicKey> {
		match bytes.try_into() {
			Ok(bytes) => Ok(PublicKey { bytes }),
			Err(_) => Err(Error::BadPublicKey { expected: PUBLICKEYBYTES, actual: bytes.len() }),
		}
	}

	/// Verify a signature for a given message with a public key.
	///
	/// # Arguments
	///
	/// * 'msg' - message that is claimed to be signed
	/// * 'sig' - signature to verify
	/// * 'ctx' - context string, empty if `None`
	///
	/// Returns 'true' if the verification process was successful, 'false' otherwise
	pub fn verify(&self, msg: &[u8], sig: &[u8], ctx: Option<&[u8]>) -> bool {
		crate::sign::verify(sig, msg, ctx.unwrap_or_default(), &self.bytes)
	}

	/// Check a signature | message blob and return the message if the signature holds.
	pub fn open(&self, sealed: &[u8], ctx: Option<&[u8]>) -> Option<Vec<u8>> {
		let sig = extract_signature(sealed)?;
		let msg = extract_message(sealed)?;
		self.verify(msg, sig, ctx).then(|| msg.to_vec())
	}
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

pub(crate) fn concat_sealed(sig: &[u8], msg: &[u8]) -> Vec<u8> {
	let mut sealed = Vec::with_capacity(sig.len() + msg.len());
	sealed.extend_from_slice(sig);
	sealed.extend_from_slice(msg);
	sealed
}

pub(crate) fn parse_hex_seed(hex_seed: &str) -> Result<SensitiveBytes32> {
	let digits = hex_seed
		.strip_prefix("0x")
		.or_else(|| hex_seed.strip_prefix("0X"))
		.unwrap_or(hex_seed);
	let mut decoded = hex::decode(digits).map_err(|_| Error::HexSeed)?;
	let parsed = <[u8; 32]>::try_from(decoded.as_slice()).map(|mut seed| (&mut seed).into());
	let len = decoded.len();
	decoded.zeroize();
	parsed.map_err(|_| Error::SeedLength(len))
}

#[cfg(feature = "std")]
pub(crate) fn random_seed() -> Result<SensitiveBytes32> {
	use rand_core::{OsRng, TryRngCore};

	let mut seed = [0u8; 32];
	OsRng.try_fill_bytes(&mut seed).map_err(|_| Error::Entropy)?;
	Ok((&mut seed).into())
}

#[cfg(feature = "std")]
fn random_hedge() -> Result<[u8; params::RND_BYTES]> {
	Ok(random_seed()?.into_bytes())
}

#[cfg(not(feature = "std"))]
fn random_hedge() -> Result<[u8; params::RND_BYTES]> {
	Err(Error::Entropy)
}

/// A signing handle that keeps the seed it was derived from next to the key pair, and signs
/// under a fixed [`SignerConfig`].
pub struct MlDsa87 {
	seed: SensitiveBytes32,
	keypair: Keypair,
	config: SignerConfig,
}

impl MlDsa87 {
	pub fn new(seed: SensitiveBytes32, config: SignerConfig) -> Self {
		let keypair = Keypair::generate(seed.clone());
		MlDsa87 { seed, keypair, config }
	}

	#[cfg(feature = "std")]
	pub fn random(config: SignerConfig) -> Result<Self> {
		Ok(MlDsa87::new(random_seed()?, config))
	}

	pub fn from_hex_seed(hex_seed: &str, config: SignerConfig) -> Result<Self> {
		Ok(MlDsa87::new(parse_hex_seed(hex_seed)?, config))
	}

	pub fn seed(&self) -> &[u8; 32] {
		self.seed.as_bytes()
	}

	/// The seed as `0x` followed by 64 lowercase hex digits.
	pub fn hex_seed(&self) -> String {
		let mut out = String::from("0x");
		out.push_str(&hex::encode(self.seed.as_bytes()));
		out
	}

	pub fn public_key(&self) -> &PublicKey {
		&self.keypair.public
	}

	pub fn config(&self) -> &SignerConfig {
		&self.config
	}

	/// Sign `msg` under the configured context. With randomized signing enabled each call draws
	/// fresh randomness, which fails with [`Error::Entropy`] when no OS source is available.
	pub fn sign(&self, msg: &[u8]) -> Result<Signature> {
		let hedge = if self.config.randomized_signing() { Some(random_hedge()?) } else { None };
		self.keypair.sign(msg, Some(self.config.context()), hedge)
	}

	pub fn seal(&self, msg: &[u8]) -> Result<Vec<u8>> {
		let sig = self.sign(msg)?;
		Ok(concat_sealed(&sig, msg))
	}

	pub fn verify(&self, msg: &[u8], sig: &[u8]) -> bool {
		self.keypair.verify(msg, sig, Some(self.config.context()))
	}

	pub fn open(&self, sealed: &[u8]) -> Option<Vec<u8>> {
		self.keypair.public.open(sealed, Some(self.config.context()))
	}

	/// Wipe the seed and secret key. Signatures made afterwards will not verify.
	pub fn zeroize(&mut self) {
		self.seed.zeroize();
		self.keypair.secret.bytes.zeroize();
	}
}

impl fmt::Debug for MlDsa87 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MlDsa87")
			.field("public", &self.keypair.public)
			.field("config", &self.config)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::Rng;

	fn get_random_bytes() -> SensitiveBytes32 {
		let mut rng = rand::rng();
		let mut bytes = [0u8; 32];
		rng.fill(&mut bytes);
		(&mut bytes).into()
	}

	fn get_random_msg() -> [u8; 128] {
		let mut rng = rand::rng();
		let mut bytes = [0u8; 128];
		rng.fill(&mut bytes);
		bytes
	}

	#[test]
	fn self_verify_hedged() {
		let msg = get_random_msg();
		let keys = Keypair::generate(get_random_bytes());
		let hedge = get_random_bytes();
		let sig = keys.sign(&msg, None, Some(hedge.0)).unwrap();
		assert!(keys.verify(&msg, &sig, None));
	}

	#[test]
	fn self_verify() {
		let msg = get_random_msg();
		let keys = Keypair::generate(get_random_bytes());
		let sig = keys.sign(&msg, None, None).unwrap();
		assert!(keys.verify(&msg, &sig, None));
		assert!(keys.verify(&msg, &sig, Some(b"")));
	}

	#[test]
	fn verify_fails_with_different_context() {
		let msg = get_random_msg();
		let keys = Keypair::generate(get_random_bytes());
		let hedge = get_random_bytes();

		let ctx1 = b"test1";
		let sig = keys.sign(&msg, Some(ctx1), Some(hedge.0)).unwrap();

		let ctx2 = b"test2";
		assert!(!keys.verify(&msg, &sig, Some(ctx2)));
		assert!(keys.verify(&msg, &sig, Some(ctx1)));
	}

	#[test]
	fn key_bytes_roundtrip() {
		let keys = Keypair::generate(get_random_bytes());
		let public = PublicKey::from_bytes(&keys.public.to_bytes()).unwrap();
		let secret = SecretKey::from_bytes(&keys.secret.to_bytes()).unwrap();
		assert_eq!(public, keys.public);
		assert_eq!(secret.bytes, keys.secret.bytes);

		assert_eq!(
			PublicKey::from_bytes(&[0u8; 12]),
			Err(Error::BadPublicKey { expected: PUBLICKEYBYTES, actual: 12 })
		);
		assert!(matches!(
			SecretKey::from_bytes(&[0u8; SECRETKEYBYTES + 1]),
			Err(Error::BadSecretKey { actual, .. }) if actual == SECRETKEYBYTES + 1
		));
	}

	#[test]
	fn keypair_bytes_roundtrip() {
		let keys = Keypair::generate(get_random_bytes());
		let bytes = keys.to_bytes();
		assert_eq!(bytes[..SECRETKEYBYTES], keys.secret.bytes);
		assert_eq!(bytes[SECRETKEYBYTES..], keys.public.bytes);

		let restored = Keypair::from_bytes(&bytes).unwrap();
		assert_eq!(restored.public, keys.public);
		assert_eq!(restored.secret.bytes, keys.secret.bytes);

		let sig = restored.sign(b"msg", None, None).unwrap();
		assert!(keys.verify(b"msg", &sig, None));

		assert!(matches!(
			Keypair::from_bytes(&bytes[..KEYPAIRBYTES - 1]),
			Err(Error::BadKeypair { expected: KEYPAIRBYTES, actual }) if actual == KEYPAIRBYTES - 1
		));
		assert!(Keypair::from_bytes(&keys.secret.bytes).is_err());
	}

	#[test]
	fn seal_then_open() {
		let keys = Keypair::generate(get_random_bytes());
		let sealed = keys.seal(b"payload", Some(b"ctx"), None).unwrap();
		assert_eq!(sealed.len(), SIGNBYTES + 7);
		assert_eq!(extract_message(&sealed), Some(b"payload".as_slice()));
		assert_eq!(keys.public.open(&sealed, Some(b"ctx")), Some(b"payload".to_vec()));
		assert_eq!(keys.public.open(&sealed, None), None);
		assert_eq!(keys.public.open(&sealed[..SIGNBYTES - 1], Some(b"ctx")), None);
	}

	#[test]
	fn hex_seed_parsing() {
		let hex = "0x000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
		let seed: [u8; 32] = core::array::from_fn(|i| i as u8);
		let from_hex = Keypair::from_hex_seed(hex).unwrap();
		assert_eq!(from_hex.public, Keypair::generate(SensitiveBytes32(seed)).public);
		assert_eq!(Keypair::from_hex_seed(&hex[2..]).unwrap().public, from_hex.public);
		assert_eq!(Keypair::from_hex_seed(&hex.to_uppercase()).unwrap().public, from_hex.public);

		assert_eq!(Keypair::from_hex_seed("0xzz").unwrap_err(), Error::HexSeed);
		assert_eq!(Keypair::from_hex_seed("0x0102").unwrap_err(), Error::SeedLength(2));
	}

	#[test]
	fn handle_exposes_seed_and_signs_under_config() {
		let config = SignerConfig::new(b"app").unwrap();
		let handle = MlDsa87::new(SensitiveBytes32([0xABu8; 32]), config);
		assert_eq!(handle.seed(), &[0xABu8; 32]);
		assert_eq!(handle.hex_seed(), alloc::format!("0x{}", "ab".repeat(32)));

		let sig = handle.sign(b"msg").unwrap();
		assert_eq!(sig, handle.sign(b"msg").unwrap());
		assert!(handle.verify(b"msg", &sig));
		assert!(handle.public_key().verify(b"msg", &sig, Some(b"app")));
		assert!(!handle.public_key().verify(b"msg", &sig, None));

		let sealed = handle.seal(b"msg").unwrap();
		assert_eq!(handle.open(&sealed), Some(b"msg".to_vec()));
	}

	#[test]
	fn handle_roundtrips_through_hex_seed() {
		let handle = MlDsa87::new(get_random_bytes(), SignerConfig::default());
		let again = MlDsa87::from_hex_seed(&handle.hex_seed(), SignerConfig::default()).unwrap();
		assert_eq!(again.public_key(), handle.public_key());
	}

	#[test]
	fn randomized_handle_signatures_differ() {
		let config = SignerConfig::default().with_randomized_signing(true);
		let handle = MlDsa87::new(get_random_bytes(), config);
		let a = handle.sign(b"msg").unwrap();
		let b = handle.sign(b"msg").unwrap();
		assert_ne!(a, b);
		assert!(handle.verify(b"msg", &a));
		assert!(handle.verify(b"msg", &b));
	}

	#[test]
	fn zeroize_wipes_seed_and_secret() {
		let mut handle = MlDsa87::random(SignerConfig::default()).unwrap();
		let public = handle.public_key().clone();
		handle.zeroize();
		assert_eq!(handle.seed(), &[0u8; 32]);
		assert_eq!(handle.hex_seed(), alloc::format!("0x{}", "0".repeat(64)));
		let sig = handle.sign(b"msg").unwrap();
		assert!(!public.verify(b"msg", &sig, None));
	}
}
