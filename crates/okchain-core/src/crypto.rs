//! secp256k1 key material for the OKChain protocol.
//!
//! Keys and signatures follow the Tendermint `PubKeySecp256k1` scheme:
//! - public keys are 33-byte SEC1 compressed points
//! - signatures are ECDSA over SHA-256 of the message, low-S normalized,
//!   serialized as 64 bytes `r || s`
//! - the address payload is `RIPEMD-160(SHA-256(compressed_pubkey))`

use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use ripemd::Ripemd160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

use crate::constants::{ADDRESS_LEN, PUBKEY_LEN, SIGNATURE_LEN};
use crate::error::{CryptoError, OkchainError};

/// secp256k1 private key.
///
/// Wraps [`k256::ecdsa::SigningKey`], which zeroizes the scalar on drop.
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Generate a random key using the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// Create a key from a 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes(bytes.into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Parse a hex-encoded key, with or without a `0x` prefix.
    pub fn from_hex(hex_str: &str) -> Result<Self, OkchainError> {
        let trimmed = hex_str.trim();
        if trimmed.is_empty() {
            return Err(OkchainError::missing("private_key"));
        }
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(
            hex::decode(trimmed).map_err(|e| CryptoError::InvalidHex(e.to_string()))?,
        );
        let array: &[u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_bytes(array)?)
    }

    /// Raw scalar bytes. Handle with care.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes().into())
    }

    /// Lowercase hex of the scalar. Handle with care.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(*self.secret_bytes()))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: *self.signing_key.verifying_key(),
        }
    }

    /// Sign `message`, returning the compact low-S signature.
    pub fn sign(&self, message: &[u8]) -> Result<[u8; SIGNATURE_LEN], CryptoError> {
        let signature: Signature = self
            .signing_key
            .try_sign(message)
            .map_err(|_| CryptoError::InvalidSignature)?;
        let signature = signature.normalize_s().unwrap_or(signature);
        let mut out = [0u8; SIGNATURE_LEN];
        out.copy_from_slice(&signature.to_bytes());
        Ok(out)
    }
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        Self {
            signing_key: self.signing_key.clone(),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Compressed secp256k1 public key.
#[derive(Clone, Copy)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Parse a 33-byte compressed SEC1 point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PUBKEY_LEN {
            return Err(CryptoError::InvalidPublicKey);
        }
        let verifying_key =
            VerifyingKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self { verifying_key })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, OkchainError> {
        let trimmed = hex_str.trim();
        if trimmed.is_empty() {
            return Err(OkchainError::missing("public_key"));
        }
        let bytes = hex::decode(trimmed).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        Ok(Self::from_bytes(&bytes)?)
    }

    pub fn to_bytes(&self) -> [u8; PUBKEY_LEN] {
        let point = self.verifying_key.to_encoded_point(true);
        let mut out = [0u8; PUBKEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// `RIPEMD-160(SHA-256(pubkey))`, the payload of a bech32 account address.
    pub fn address_hash(&self) -> [u8; ADDRESS_LEN] {
        address_hash(&self.to_bytes())
    }

    /// Verify a compact `r || s` signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let sig = Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignature)?;
        self.verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PublicKey {}

impl std::hash::Hash for PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Compute the 20-byte address hash from raw public key bytes.
pub fn address_hash(pubkey_bytes: &[u8]) -> [u8; ADDRESS_LEN] {
    let sha = Sha256::digest(pubkey_bytes);
    Ripemd160::digest(sha).into()
}
