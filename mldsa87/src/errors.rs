/// Result type for fallible ML-DSA-87 operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by key handling and signing. Verification never errors, it returns `false`.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum Error {
	#[error("context string is {0} bytes, at most 255 allowed")]
	ContextTooLong(usize),
	#[error("public key must be {expected} bytes, got {actual}")]
	BadPublicKey { expected: usize, actual: usize },
	#[error("secret key must be {expected} bytes, got {actual}")]
	BadSecretKey { expected: usize, actual: usize },
	#[error("key pair must be {expected} bytes, got {actual}")]
	BadKeypair { expected: usize, actual: usize },
	#[error("secret key is all zeros")]
	ZeroSecretKey,
	#[error("entropy source failed")]
	Entropy,
	#[error("seed is not valid hex")]
	HexSeed,
	#[error("seed must be 32 bytes, got {0}")]
	SeedLength(usize),
}

#[cfg(test)]
mod tests {
	use super::Error;
	use alloc::string::ToString;

	#[test]
	fn messages_carry_lengths() {
		assert_eq!(
			Error::ContextTooLong(300).to_string(),
			"context string is 300 bytes, at most 255 allowed"
		);
		assert_eq!(
			Error::BadPublicKey { expected: 2592, actual: 10 }.to_string(),
			"public key must be 2592 bytes, got 10"
		);
		assert_eq!(Error::SeedLength(31).to_string(), "seed must be 32 bytes, got 31");
		assert_eq!(
			Error::BadKeypair { expected: 7488, actual: 0 }.to_string(),
			"key pair must be 7488 bytes, got 0"
		);
	}
}
