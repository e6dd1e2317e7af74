//! ABCI query paths and their data payloads.
//!
//! Each function validates its required inputs and returns an [`AbciQuery`]:
//! the resource path plus the JSON-encoded data map. Data structs declare
//! their fields alphabetically by serialized name so the encoded bytes have
//! sorted keys.

use okchain_core::error::OkchainError;
use serde::Serialize;

pub const PATH_ACCOUNT: &str = "custom/acc/account";
pub const PATH_ACCOUNT_TOKENS: &str = "custom/token/accounts";
pub const PATH_TOKENS: &str = "custom/token/tokens";
pub const PATH_TOKEN_INFO: &str = "custom/token/info";
pub const PATH_PRODUCTS: &str = "custom/token/products";
pub const PATH_DEPTH_BOOK: &str = "custom/order/depthbook";
pub const PATH_CANDLES: &str = "custom/backend/candles";
pub const PATH_TICKERS: &str = "custom/backend/tickers";
pub const PATH_MATCHES: &str = "custom/backend/matches";
pub const PATH_ORDERS_OPEN: &str = "custom/backend/orders/open";
pub const PATH_ORDERS_CLOSED: &str = "custom/backend/orders/closed";
pub const PATH_DEALS: &str = "custom/backend/deals";
/// Transaction history shares the deals endpoint; `Type` selects the kind.
pub const PATH_TRANSACTIONS: &str = PATH_DEALS;
pub const PATH_PROPOSALS: &str = "custom/gov/proposals";
pub const PATH_PROPOSAL: &str = "custom/gov/proposal";

/// Depth of the order book requested by [`depth_book`].
pub const DEPTH_BOOK_SIZE: &str = "200";

/// A path-addressed query ready to be sent through `abci_query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbciQuery {
    pub path: String,
    /// JSON bytes of the data map, hex-encoded on the wire.
    pub data: Option<Vec<u8>>,
}

impl AbciQuery {
    pub fn new(path: impl Into<String>, data: Option<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }

    fn with_data<D: Serialize>(path: impl Into<String>, data: &D) -> Result<Self, OkchainError> {
        let bytes = serde_json::to_vec(data)
            .map_err(|e| OkchainError::invalid("data", e.to_string()))?;
        Ok(Self::new(path, Some(bytes)))
    }
}

/// Which balances `account_tokens` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShow {
    /// Every token the chain knows, zero balances included.
    All,
    /// Only tokens the account holds.
    Partial,
}

impl TokenShow {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenShow::All => "all",
            TokenShow::Partial => "partial",
        }
    }
}

/// Parameters of the trade match history query.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct MatchesQuery {
    pub end: String,
    pub page: String,
    pub per_page: String,
    pub product: String,
    pub start: String,
}

/// Parameters of the open and closed order list queries.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct OrderListQuery {
    pub address: String,
    pub end: String,
    /// Only honoured for closed orders; open orders always send `false`.
    pub hide_no_fill: bool,
    pub page: String,
    pub per_page: String,
    pub product: String,
    pub side: String,
    pub start: String,
}

/// Parameters of the deal history query.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DealsQuery {
    pub address: String,
    pub end: String,
    pub page: String,
    pub per_page: String,
    pub product: String,
    pub side: String,
    pub start: String,
}

/// Parameters of the transaction history query.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionsQuery {
    pub address: String,
    pub end: String,
    pub page: String,
    pub per_page: String,
    pub start: String,
    #[serde(rename = "Type")]
    pub tx_type: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AddressData<'a> {
    address: &'a str,
}

#[derive(Serialize)]
struct AccountTokensData<'a> {
    show: &'a str,
    symbol: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DepthBookData<'a> {
    product: &'a str,
    size: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CandlesData<'a> {
    granularity: &'a str,
    product: &'a str,
    size: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TickersData<'a> {
    count: &'a str,
    product: &'a str,
    sort: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ProposalsData<'a> {
    depositor: &'a str,
    limit: &'a str,
    proposal_status: &'a str,
    voter: &'a str,
}

#[derive(Serialize)]
struct ProposalData {
    #[serde(rename = "ProposalID")]
    proposal_id: String,
}

fn require(value: &str, field: &str) -> Result<(), OkchainError> {
    if value.trim().is_empty() {
        return Err(OkchainError::missing(field));
    }
    Ok(())
}

pub fn account(address: &str) -> Result<AbciQuery, OkchainError> {
    require(address, "address")?;
    AbciQuery::with_data(PATH_ACCOUNT, &AddressData { address })
}

/// All balances of `address`, filtered by `show`.
pub fn account_tokens(address: &str, show: TokenShow) -> Result<AbciQuery, OkchainError> {
    require(address, "address")?;
    AbciQuery::with_data(
        format!("{PATH_ACCOUNT_TOKENS}/{address}"),
        &AccountTokensData {
            show: show.as_str(),
            symbol: "",
        },
    )
}

/// The balance of one token held by `address`.
pub fn account_token(address: &str, symbol: &str) -> Result<AbciQuery, OkchainError> {
    require(address, "address")?;
    require(symbol, "symbol")?;
    AbciQuery::with_data(
        format!("{PATH_ACCOUNT_TOKENS}/{address}"),
        &AccountTokensData {
            show: TokenShow::Partial.as_str(),
            symbol,
        },
    )
}

pub fn tokens() -> AbciQuery {
    AbciQuery::new(PATH_TOKENS, None)
}

pub fn token(symbol: &str) -> Result<AbciQuery, OkchainError> {
    require(symbol, "symbol")?;
    Ok(AbciQuery::new(format!("{PATH_TOKEN_INFO}/{symbol}"), None))
}

pub fn products() -> AbciQuery {
    AbciQuery::new(PATH_PRODUCTS, None)
}

pub fn depth_book(product: &str) -> Result<AbciQuery, OkchainError> {
    require(product, "product")?;
    AbciQuery::with_data(
        PATH_DEPTH_BOOK,
        &DepthBookData {
            product,
            size: DEPTH_BOOK_SIZE,
        },
    )
}

pub fn candles(granularity: &str, product: &str, size: &str) -> Result<AbciQuery, OkchainError> {
    require(product, "product")?;
    AbciQuery::with_data(
        PATH_CANDLES,
        &CandlesData {
            granularity,
            product,
            size,
        },
    )
}

/// Ticker snapshot of every product, sorted by the node.
pub fn tickers(count: &str) -> Result<AbciQuery, OkchainError> {
    AbciQuery::with_data(
        PATH_TICKERS,
        &TickersData {
            count,
            product: "",
            sort: true,
        },
    )
}

pub fn matches(query: &MatchesQuery) -> Result<AbciQuery, OkchainError> {
    require(&query.product, "product")?;
    AbciQuery::with_data(PATH_MATCHES, query)
}

pub fn open_orders(query: &OrderListQuery) -> Result<AbciQuery, OkchainError> {
    require(&query.address, "address")?;
    let query = OrderListQuery {
        hide_no_fill: false,
        ..query.clone()
    };
    AbciQuery::with_data(PATH_ORDERS_OPEN, &query)
}

pub fn closed_orders(query: &OrderListQuery) -> Result<AbciQuery, OkchainError> {
    require(&query.address, "address")?;
    AbciQuery::with_data(PATH_ORDERS_CLOSED, query)
}

pub fn deals(query: &DealsQuery) -> Result<AbciQuery, OkchainError> {
    require(&query.address, "address")?;
    AbciQuery::with_data(PATH_DEALS, query)
}

pub fn transactions(query: &TransactionsQuery) -> Result<AbciQuery, OkchainError> {
    require(&query.address, "address")?;
    AbciQuery::with_data(PATH_TRANSACTIONS, query)
}

/// Every governance proposal, unfiltered.
pub fn proposals() -> Result<AbciQuery, OkchainError> {
    AbciQuery::with_data(
        PATH_PROPOSALS,
        &ProposalsData {
            depositor: "",
            limit: "0",
            proposal_status: "",
            voter: "",
        },
    )
}

/// A single proposal. Ids start at 1.
pub fn proposal(id: u64) -> Result<AbciQuery, OkchainError> {
    if id < 1 {
        return Err(OkchainError::invalid("proposal_id", "must be at least 1"));
    }
    AbciQuery::with_data(
        PATH_PROPOSAL,
        &ProposalData {
            proposal_id: id.to_string(),
        },
    )
}
