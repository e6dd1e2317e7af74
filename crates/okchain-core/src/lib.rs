//! # okchain-core
//! Foundation types for the OKChain client: keys, addresses, messages,
//! fees, the amino binary codec and the error taxonomy.

pub mod address;
pub mod amino;
pub mod constants;
pub mod crypto;
pub mod dec;
pub mod error;
pub mod msgs;
pub mod types;

pub use address::Address;
pub use crypto::{PrivateKey, PublicKey};
pub use error::{ErrorKind, OkchainError};
pub use msgs::Msg;
pub use types::{Fee, Token, TransferUnit};
