//! # okchain-wallet
//!
//! Key derivation, the account signing context, canonical sign documents and
//! the transaction builder for OKChain.
//!
//! # Modules
//!
//! - [`mnemonic`]: BIP-39 phrase generation and parsing
//! - [`keys`]: BIP-44 derivation, `AddressInfo`
//! - [`account`]: `AccountInfo` with account number and sequence
//! - [`chain`]: `ChainConfig` network parameters
//! - [`sign_doc`]: the canonical `StdSignDoc`
//! - [`tx`]: `SignedTransaction` and its amino envelope
//! - [`builder`]: validating transaction builder

pub mod account;
pub mod builder;
pub mod chain;
pub mod keys;
pub mod mnemonic;
pub mod sign_doc;
pub mod tx;

pub use account::AccountInfo;
pub use builder::{TokenIssueParams, TransactionBuilder};
pub use chain::ChainConfig;
pub use keys::{
    create_address_info, derive_address, derive_private_key, derive_private_key_at,
    derive_public_key, AddressInfo, HdPath,
};
pub use mnemonic::generate_mnemonic;
pub use sign_doc::StdSignDoc;
pub use tx::{SignedTransaction, StdSignature};
