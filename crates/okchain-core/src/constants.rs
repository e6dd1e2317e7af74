//! Chain constants for OKChain.

/// Default chain identifier committed to by every signature.
pub const DEFAULT_CHAIN_ID: &str = "okchain";

/// Bech32 human-readable prefix for account addresses.
pub const ACCOUNT_HRP: &str = "okchain";

/// Bech32 human-readable prefix for validator operator addresses.
pub const VALIDATOR_HRP: &str = "okchainvaloper";

/// SLIP-44 coin type used in the BIP-44 derivation path.
pub const OKCHAIN_COIN_TYPE: u32 = 996;

/// SLIP-44 coin type of the Cosmos Hub, for other Cosmos-SDK chains.
pub const COSMOS_COIN_TYPE: u32 = 118;

/// Default gas limit.
pub const DEFAULT_GAS: u64 = 200_000;

/// Default fee amount, as a decimal string.
pub const DEFAULT_FEE_AMOUNT: &str = "0.01250000";

/// Default fee denomination.
pub const DEFAULT_FEE_DENOM: &str = "okb";

/// Fractional digits carried by an on-chain `Dec` unless the chain config
/// says otherwise. Amounts render with exactly this many, e.g. `"0.01250000"`.
pub const DEFAULT_DEC_PRECISION: usize = 8;

/// Amino registered name of the standard transaction.
pub const STD_TX_NAME: &str = "auth/StdTx";

/// Amino registered name of a secp256k1 public key.
pub const PUBKEY_SECP256K1_NAME: &str = "tendermint/PubKeySecp256k1";

/// Length of a compressed secp256k1 public key.
pub const PUBKEY_LEN: usize = 33;

/// Length of an account address payload (RIPEMD-160 output).
pub const ADDRESS_LEN: usize = 20;

/// Length of a compact `r || s` signature.
pub const SIGNATURE_LEN: usize = 64;

/// Longest memo the chain's ante handler accepts, in characters.
pub const MAX_MEMO_CHARS: usize = 256;
