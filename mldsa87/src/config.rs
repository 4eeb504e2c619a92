//! Signing configuration for [`MlDsa87`](crate::ml_dsa_87::MlDsa87).

use crate::{
	errors::{Error, Result},
	params,
};
use alloc::vec::Vec;

/// Domain separation context and hedging policy applied to every signature a handle produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignerConfig {
	context: Vec<u8>,
	randomized_signing: bool,
}

impl SignerConfig {
	/// Deterministic signing under `context`.
	///
	/// Fails with [`Error::ContextTooLong`] if `context` exceeds 255 bytes.
	pub fn new(context: &[u8]) -> Result<Self> {
		if context.len() > params::MAX_CONTEXT_BYTES {
			return Err(Error::ContextTooLong(context.len()));
		}
		Ok(SignerConfig { context: context.to_vec(), randomized_signing: false })
	}

	/// Draw fresh randomness from the OS for every signature instead of signing
	/// deterministically.
	pub fn with_randomized_signing(mut self, enabled: bool) -> Self {
		self.randomized_signing = enabled;
		self
	}

	pub fn context(&self) -> &[u8] {
		&self.context
	}

	pub fn randomized_signing(&self) -> bool {
		self.randomized_signing
	}
}
