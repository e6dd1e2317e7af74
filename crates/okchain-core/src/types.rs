//! Value types shared by messages, fees and signing documents.
//!
//! Struct fields are declared in alphabetical order of their serialized
//! names. serde emits fields in declaration order, so this order is the
//! canonical JSON order and must not be rearranged.

use serde::{Deserialize, Serialize};

use crate::amino;
use crate::constants::{DEFAULT_FEE_AMOUNT, DEFAULT_FEE_DENOM, DEFAULT_GAS};
use crate::dec::to_amino_integer;
use crate::error::OkchainError;

/// An amount of one denomination. `amount` is a decimal string, kept verbatim.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub amount: String,
    pub denom: String,
}

impl Token {
    /// `Token::new("1.00000000", "okb")`
    pub fn new(amount: impl Into<String>, denom: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            denom: denom.into(),
        }
    }

    /// Require both fields to be non-empty. `field` prefixes the error name.
    pub fn validate(&self, field: &str) -> Result<(), OkchainError> {
        if self.denom.is_empty() {
            return Err(OkchainError::missing(format!("{field}.denom")));
        }
        if self.amount.is_empty() {
            return Err(OkchainError::missing(format!("{field}.amount")));
        }
        Ok(())
    }

    /// Amino body: 1 denom, 2 amount (scaled integer).
    pub fn encode_amino(&self, precision: usize) -> Result<Vec<u8>, OkchainError> {
        let mut buf = Vec::new();
        amino::encode_string(&mut buf, 1, &self.denom);
        amino::encode_string(&mut buf, 2, &to_amino_integer(&self.amount, "amount", precision)?);
        Ok(buf)
    }
}

/// Tokens sent to one recipient within a multi-send.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransferUnit {
    #[serde(rename = "coins")]
    pub tokens: Vec<Token>,
    #[serde(rename = "to")]
    pub recipient: String,
}

impl TransferUnit {
    pub fn new(recipient: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            recipient: recipient.into(),
        }
    }
}

/// Transaction fee: tokens paid plus the gas limit.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Fee {
    pub amount: Vec<Token>,
    #[serde(with = "u64_string")]
    pub gas: u64,
}

impl Fee {
    pub fn new(amount: Vec<Token>, gas: u64) -> Self {
        Self { amount, gas }
    }

    /// Amino body: 1 amount (repeated), 2 gas.
    pub fn encode_amino(&self, precision: usize) -> Result<Vec<u8>, OkchainError> {
        let mut buf = Vec::new();
        for token in &self.amount {
            amino::encode_struct(&mut buf, 1, &token.encode_amino(precision)?);
        }
        amino::encode_uvarint_field(&mut buf, 2, self.gas);
        Ok(buf)
    }
}

impl Default for Fee {
    fn default() -> Self {
        Self {
            amount: vec![Token::new(DEFAULT_FEE_AMOUNT, DEFAULT_FEE_DENOM)],
            gas: DEFAULT_GAS,
        }
    }
}

/// Serialize a `u64` as a JSON decimal string, as the chain expects.
pub mod u64_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
