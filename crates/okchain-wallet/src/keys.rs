//! Hierarchical key derivation and address material.
//!
//! Keys are derived from a BIP-39 seed along the BIP-44 path
//! `m/44'/{coin_type}'/{account}'/0/{index}`. OKChain registers coin type
//! 996; Cosmos wallets use 118.

use std::fmt;

use bip32::{DerivationPath, XPrv};
use okchain_core::constants::{ACCOUNT_HRP, OKCHAIN_COIN_TYPE};
use okchain_core::error::{CryptoError, OkchainError};
use okchain_core::{Address, PrivateKey, PublicKey};
use zeroize::Zeroizing;

use crate::mnemonic::mnemonic_to_seed;

/// A BIP-44 derivation path with a fixed purpose of 44 and external chain 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HdPath {
    pub coin_type: u32,
    pub account: u32,
    pub index: u32,
}

impl HdPath {
    pub fn new(coin_type: u32, account: u32, index: u32) -> Self {
        Self {
            coin_type,
            account,
            index,
        }
    }

    fn to_derivation_path(self) -> Result<DerivationPath, CryptoError> {
        self.to_string()
            .parse()
            .map_err(|e: bip32::Error| CryptoError::KeyDerivation(e.to_string()))
    }
}

impl Default for HdPath {
    fn default() -> Self {
        Self::new(OKCHAIN_COIN_TYPE, 0, 0)
    }
}

impl fmt::Display for HdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m/44'/{}'/{}'/0/{}",
            self.coin_type, self.account, self.index
        )
    }
}

/// Derive the first OKChain key (`m/44'/996'/0'/0/0`) of a mnemonic.
pub fn derive_private_key(mnemonic: &str) -> Result<PrivateKey, OkchainError> {
    derive_private_key_at(mnemonic, HdPath::default())
}

/// Derive the key at `path` from a mnemonic, using an empty passphrase.
pub fn derive_private_key_at(mnemonic: &str, path: HdPath) -> Result<PrivateKey, OkchainError> {
    let seed = mnemonic_to_seed(mnemonic)?;
    let path = path.to_derivation_path()?;
    let xprv = XPrv::derive_from_path(&seed[..], &path)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    let scalar: Zeroizing<[u8; 32]> = Zeroizing::new(xprv.private_key().to_bytes().into());
    Ok(PrivateKey::from_bytes(&scalar)?)
}

pub fn derive_public_key(private_key: &PrivateKey) -> PublicKey {
    private_key.public_key()
}

/// Bech32 address of `public_key` under `hrp`.
pub fn derive_address(public_key: &PublicKey, hrp: &str) -> Result<Address, OkchainError> {
    Ok(Address::from_public_key(public_key, hrp)?)
}

/// A key pair together with its derived address.
#[derive(Clone)]
pub struct AddressInfo {
    private_key: PrivateKey,
    public_key: PublicKey,
    address: Address,
}

impl AddressInfo {
    /// Bind a private key to its public key and the address under `hrp`.
    pub fn from_private_key(private_key: PrivateKey, hrp: &str) -> Result<Self, OkchainError> {
        let public_key = derive_public_key(&private_key);
        let address = derive_address(&public_key, hrp)?;
        Ok(Self {
            private_key,
            public_key,
            address,
        })
    }

    pub fn from_private_key_hex(hex_key: &str, hrp: &str) -> Result<Self, OkchainError> {
        Self::from_private_key(PrivateKey::from_hex(hex_key)?, hrp)
    }

    pub fn from_mnemonic(mnemonic: &str, path: HdPath, hrp: &str) -> Result<Self, OkchainError> {
        Self::from_private_key(derive_private_key_at(mnemonic, path)?, hrp)
    }

    /// A freshly generated random key under `hrp`.
    pub fn generate(hrp: &str) -> Result<Self, OkchainError> {
        Self::from_private_key(PrivateKey::generate(), hrp)
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

impl fmt::Debug for AddressInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressInfo")
            .field("address", &self.address.as_str())
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// A random OKChain account key with its `okchain1...` address.
pub fn create_address_info() -> AddressInfo {
    AddressInfo::generate(ACCOUNT_HRP).expect("account prefix is a valid bech32 hrp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use okchain_core::constants::COSMOS_COIN_TYPE;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn default_path_string() {
        assert_eq!(HdPath::default().to_string(), "m/44'/996'/0'/0/0");
        assert_eq!(HdPath::new(118, 2, 7).to_string(), "m/44'/118'/2'/0/7");
    }

    #[test]
    fn okchain_mnemonic_vector() {
        let key = derive_private_key(ABANDON).unwrap();
        assert_eq!(
            key.to_hex().as_str(),
            "1ef5bd97de9d601b67076717763694a13d4ffc2b56c3b1b3da58881f63fefc9a"
        );
        let pubkey = derive_public_key(&key);
        assert_eq!(
            pubkey.to_hex(),
            "039a74659b91075c454df46e6dc7b385f943e4d10c491790398baf2380b843f780"
        );
        assert_eq!(
            derive_address(&pubkey, ACCOUNT_HRP).unwrap().as_str(),
            "okchain1p9emjz06eq2r5r89hap80m4yymccuwxpnwmmkh"
        );
    }

    /// Coin type 118 reproduces the well-known Cosmos address of this phrase.
    #[test]
    fn cosmos_mnemonic_vector() {
        let path = HdPath::new(COSMOS_COIN_TYPE, 0, 0);
        let info = AddressInfo::from_mnemonic(ABANDON, path, "cosmos").unwrap();
        assert_eq!(
            info.address().as_str(),
            "cosmos19rl4cm2hmr8afy4kldpxz3fka4jguq0auqdal4"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_private_key(ABANDON).unwrap();
        let b = derive_private_key(&ABANDON.to_uppercase()).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        let other = derive_private_key_at(ABANDON, HdPath::new(OKCHAIN_COIN_TYPE, 0, 1)).unwrap();
        assert_ne!(a.public_key(), other.public_key());
    }

    #[test]
    fn empty_mnemonic_is_invalid_input() {
        assert_eq!(derive_private_key("").unwrap_err().field(), Some("mnemonic"));
    }

    #[test]
    fn address_info_from_hex() {
        let hex_key = format!("{:064x}", 1);
        let info = AddressInfo::from_private_key_hex(&hex_key, ACCOUNT_HRP).unwrap();
        assert_eq!(
            info.address().as_str(),
            "okchain1w508d6qejxtdg4y5r3zarvary0c5xw7kc8d2em"
        );
        assert_eq!(info.public_key(), &info.private_key().public_key());
    }

    #[test]
    fn created_addresses_are_distinct_and_prefixed() {
        let a = create_address_info();
        let b = create_address_info();
        assert!(a.address().as_str().starts_with("okchain1"));
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn debug_hides_private_key() {
        let info = create_address_info();
        let debug = format!("{info:?}");
        assert!(!debug.contains(info.private_key().to_hex().as_str()));
    }
}
