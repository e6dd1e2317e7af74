//! Bech32 address encoding for OKChain.
//!
//! Addresses use classic Bech32 ([BIP-173]) with a chain-specific
//! human-readable prefix:
//! - accounts: `okchain1...`
//! - validator operators: `okchainvaloper1...`
//!
//! The payload is the 20-byte `RIPEMD-160(SHA-256(pubkey))` hash.
//!
//! [BIP-173]: https://github.com/bitcoin/bips/blob/master/bip-0173.mediawiki

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::ADDRESS_LEN;
use crate::crypto::PublicKey;
use crate::error::AddressError;

/// Longest HRP for which a 20-byte payload still fits the 90-char Bech32 limit.
const MAX_HRP_LEN: usize = 50;

/// A bech32 address: human-readable prefix plus 20-byte payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    hrp: String,
    bytes: [u8; ADDRESS_LEN],
    encoded: String,
}

impl Address {
    /// Create an address from a raw payload and prefix.
    pub fn new(hrp: &str, bytes: [u8; ADDRESS_LEN]) -> Result<Self, AddressError> {
        if hrp.len() > MAX_HRP_LEN {
            return Err(AddressError::InvalidHrp(hrp.to_string()));
        }
        let parsed = Hrp::parse(hrp).map_err(|e| AddressError::InvalidHrp(e.to_string()))?;
        let encoded = bech32::encode::<Bech32>(parsed, &bytes)
            .map_err(|e| AddressError::Bech32(e.to_string()))?;
        Ok(Self {
            hrp: hrp.to_ascii_lowercase(),
            bytes,
            encoded,
        })
    }

    /// Derive the address of a public key under `hrp`.
    pub fn from_public_key(public_key: &PublicKey, hrp: &str) -> Result<Self, AddressError> {
        Self::new(hrp, public_key.address_hash())
    }

    /// Decode any bech32 address with a 20-byte payload.
    pub fn decode(s: &str) -> Result<Self, AddressError> {
        let checked = CheckedHrpstring::new::<Bech32>(s)
            .map_err(|e| AddressError::Bech32(e.to_string()))?;
        let hrp = checked.hrp().to_string().to_ascii_lowercase();
        let data: Vec<u8> = checked.byte_iter().collect();
        let bytes: [u8; ADDRESS_LEN] = data
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidLength(data.len()))?;
        Self::new(&hrp, bytes)
    }

    /// Decode and require a specific prefix.
    pub fn decode_with_hrp(s: &str, expected: &str) -> Result<Self, AddressError> {
        let address = Self::decode(s)?;
        if address.hrp != expected.to_ascii_lowercase() {
            return Err(AddressError::UnexpectedHrp {
                expected: expected.to_string(),
                got: address.hrp,
            });
        }
        Ok(address)
    }

    /// Re-encode the same payload under another prefix.
    pub fn with_hrp(&self, hrp: &str) -> Result<Self, AddressError> {
        Self::new(hrp, self.bytes)
    }

    pub fn hrp(&self) -> &str {
        &self.hrp
    }

    /// The 20-byte payload.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.bytes
    }

    /// The bech32 string form.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}
