use rusty_mldsa87::{
	packing::{hint_weight, SignatureParts},
	params::{self, K, L, OMEGA},
	Keypair, SensitiveBytes32,
};

const HINT: usize = params::C_DASH_BYTES + L * params::POLYZ_PACKEDBYTES;
const COUNTS: usize = HINT + OMEGA;

fn fixture() -> (Keypair, [u8; params::SIGNBYTES]) {
	let keys = Keypair::generate(SensitiveBytes32([3u8; 32]));
	let sig = keys.sign(b"canonical", None, None).unwrap();
	(keys, sig)
}

fn decodes(sig: &[u8; params::SIGNBYTES]) -> bool {
	SignatureParts::decode(sig).is_some()
}

fn clear_hint(sig: &mut [u8; params::SIGNBYTES]) {
	sig[HINT..].fill(0);
}

#[test]
fn genuine_signature_is_canonical() {
	let (keys, sig) = fixture();
	assert!(decodes(&sig));
	assert!(keys.verify(b"canonical", &sig, None));
	let total = sig[COUNTS + K - 1] as usize;
	assert!(total <= OMEGA);
	assert!(sig[HINT + total..COUNTS].iter().all(|&b| b == 0));

	let parts = SignatureParts::decode(&sig).unwrap();
	assert_eq!(hint_weight(&parts.h), total);
}

#[test]
fn truncated_or_extended_signature_rejected() {
	let (keys, sig) = fixture();
	assert!(!keys.verify(b"canonical", &sig[..params::SIGNBYTES - 1], None));
	assert!(!keys.verify(b"canonical", &[], None));
	let mut long = sig.to_vec();
	long.push(0);
	assert!(!keys.verify(b"canonical", &long, None));
}

#[test]
fn decreasing_count_rejected() {
	let (keys, mut sig) = fixture();
	clear_hint(&mut sig);
	sig[HINT] = 1;
	sig[COUNTS] = 1;
	// row 1 count drops back to zero
	assert!(!decodes(&sig));
	assert!(!keys.verify(b"canonical", &sig, None));

	sig[COUNTS + 1..COUNTS + K].fill(1);
	assert!(decodes(&sig));
}

#[test]
fn count_above_omega_rejected() {
	let (keys, mut sig) = fixture();
	clear_hint(&mut sig);
	sig[COUNTS + K - 1] = OMEGA as u8 + 1;
	assert!(!decodes(&sig));
	assert!(!keys.verify(b"canonical", &sig, None));

	sig[COUNTS + K - 1] = 0xFF;
	assert!(!decodes(&sig));
}

#[test]
fn unordered_indices_rejected() {
	let (keys, mut sig) = fixture();
	clear_hint(&mut sig);
	sig[HINT] = 9;
	sig[HINT + 1] = 4;
	sig[COUNTS..COUNTS + K].fill(2);
	assert!(!decodes(&sig));
	assert!(!keys.verify(b"canonical", &sig, None));

	sig[HINT] = 4;
	sig[HINT + 1] = 9;
	assert!(decodes(&sig));

	// repeated index within one row
	sig[HINT + 1] = 4;
	assert!(!decodes(&sig));
}

#[test]
fn nonzero_padding_rejected() {
	let keys = Keypair::generate(SensitiveBytes32([3u8; 32]));
	// the padding tail only exists when fewer than OMEGA hints are set
	let (msg, mut sig) = (0u8..)
		.map(|i| (i, keys.sign(&[i], None, None).unwrap()))
		.find(|(_, sig)| (sig[COUNTS + K - 1] as usize) < OMEGA)
		.unwrap();
	assert!(decodes(&sig));
	assert!(keys.verify(&[msg], &sig, None));

	sig[COUNTS - 1] = 1;
	assert!(!decodes(&sig));
	assert!(!keys.verify(&[msg], &sig, None));
}

#[test]
fn all_zero_signature_rejected() {
	let (keys, _) = fixture();
	let sig = [0u8; params::SIGNBYTES];
	assert!(decodes(&sig));
	assert!(!keys.verify(b"canonical", &sig, None));
	assert!(!keys.verify(b"", &sig, None));
}

#[test]
fn out_of_range_z_rejected() {
	let (keys, mut sig) = fixture();
	// a packed z coefficient of 0 stands for GAMMA1, just past the norm bound
	sig[params::C_DASH_BYTES..params::C_DASH_BYTES + 2].fill(0);
	sig[params::C_DASH_BYTES + 2] &= 0xF0;
	assert!(decodes(&sig));
	assert!(!keys.verify(b"canonical", &sig, None));
}
