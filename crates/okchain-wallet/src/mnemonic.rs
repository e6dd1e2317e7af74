//! BIP-39 mnemonic generation and parsing.

use bip39::{Language, Mnemonic};
use okchain_core::error::{CryptoError, OkchainError};
use rand::RngCore;
use zeroize::Zeroizing;

/// Generate a fresh 24-word English mnemonic from 256 bits of OS entropy.
///
/// Panics if the operating system RNG is unavailable.
pub fn generate_mnemonic() -> String {
    let mut entropy = Zeroizing::new([0u8; 32]);
    rand::rngs::OsRng.fill_bytes(&mut entropy[..]);
    let m = Mnemonic::from_entropy_in(Language::English, &entropy[..])
        .expect("32 bytes always produces valid mnemonic");
    m.to_string()
}

/// Parse a mnemonic phrase.
///
/// Normalizes whitespace and converts to lowercase before parsing. Any
/// standard word count (12 to 24) is accepted.
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic, OkchainError> {
    let normalized = Zeroizing::new(
        phrase
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase(),
    );
    if normalized.is_empty() {
        return Err(OkchainError::missing("mnemonic"));
    }
    Mnemonic::parse_in(Language::English, normalized.as_str())
        .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()).into())
}

/// The 64-byte BIP-39 seed of `phrase`, with an empty passphrase.
pub fn mnemonic_to_seed(phrase: &str) -> Result<Zeroizing<[u8; 64]>, OkchainError> {
    let m = parse_mnemonic(phrase)?;
    Ok(Zeroizing::new(m.to_seed("")))
}
