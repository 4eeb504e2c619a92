#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::identity_op)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::precedence)]
#![allow(clippy::unnecessary_cast)]

extern crate alloc;

use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub mod config;
pub mod dilithium;
mod errors;
pub mod ml_dsa_87;
pub mod ntt;
pub mod packing;
pub mod params;
pub mod poly;
pub mod polyvec;
pub mod reduce;
pub mod rounding;
pub mod sign;
pub mod xof;

pub use config::SignerConfig;
pub use dilithium::Dilithium;
pub use errors::{Error, Result};
pub use ml_dsa_87::{Keypair, MlDsa87, PublicKey, SecretKey, Signature};

/// 32 bytes of secret material (key generation seeds, signing randomness), wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SensitiveBytes32(pub [u8; 32]);

impl SensitiveBytes32 {
	pub fn as_bytes(&self) -> &[u8; 32] {
		&self.0
	}

	/// Copy the bytes out. The copy is not wiped automatically.
	pub fn into_bytes(self) -> [u8; 32] {
		self.0
	}
}

/// Takes a copy and wipes the source.
impl From<&mut [u8; 32]> for SensitiveBytes32 {
	fn from(bytes: &mut [u8; 32]) -> Self {
		let out = SensitiveBytes32(*bytes);
		bytes.zeroize();
		out
	}
}

impl fmt::Debug for SensitiveBytes32 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("SensitiveBytes32(..)")
	}
}
