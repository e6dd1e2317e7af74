//! # okchain-rpc
//!
//! Talks to an OKChain node over JSON-RPC: path-addressed ABCI queries,
//! direct node methods, account refresh and transaction broadcast. Every
//! response is normalized into a [`QueryResult`].
//!
//! ```ignore
//! let client = Client::new(ClientConfig::from_env()?)?;
//! let mut account = client.account_info_from_mnemonic(&phrase)?;
//! let tx = client.builder().build_send(&account, to, &[Token::new("1", "okb")], "")?;
//! let result = client.broadcast(&tx, BroadcastMode::Block)?;
//! client.refresh_account(&mut account)?;
//! ```

pub mod client;
pub mod config;
pub mod decode;
pub mod params;
pub mod query;
pub mod transport;

pub use client::{AccountState, Client};
pub use config::{BroadcastMode, ClientConfig};
pub use decode::{QueryData, QueryResult};
pub use query::{DealsQuery, MatchesQuery, OrderListQuery, TokenShow, TransactionsQuery};
pub use transport::{HttpTransport, Transport};
