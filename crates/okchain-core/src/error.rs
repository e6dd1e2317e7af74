//! Error types for the OKChain client.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid private key bytes")] InvalidPrivateKey,
    #[error("invalid public key bytes")] InvalidPublicKey,
    #[error("invalid signature bytes")] InvalidSignature,
    #[error("signature verification failed")] VerificationFailed,
    #[error("invalid hex: {0}")] InvalidHex(String),
    #[error("invalid mnemonic: {0}")] InvalidMnemonic(String),
    #[error("key derivation: {0}")] KeyDerivation(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("unexpected HRP: expected {expected}, got {got}")] UnexpectedHrp { expected: String, got: String },
    #[error("invalid HRP: {0}")] InvalidHrp(String),
    #[error("invalid length: {0} bytes")] InvalidLength(usize),
    #[error("bech32: {0}")] Bech32(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection: {0}")] Connection(String),
    #[error("timeout")] Timeout,
    #[error("HTTP status {status}: {body}")] Status { status: u16, body: String },
    #[error("malformed body: {0}")] MalformedBody(String),
    #[error("request encoding: {0}")] Encode(String),
}

/// Coarse error classification for callers that branch on failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required field was missing or malformed. Never retryable.
    InvalidInput,
    /// Malformed key material or a signing failure.
    Crypto,
    /// Connection failure, timeout or malformed RPC body.
    Transport,
    /// The node answered a well-formed request with a failure code.
    Chain,
    /// The response shape was not recognized.
    Decode,
    /// Invalid client configuration.
    Config,
}

/// Errors surfaced by every public client operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OkchainError {
    /// A required field was empty or malformed.
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput {
        /// Name of the offending field.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Key material or signature failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Address could not be encoded or decoded.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The RPC call did not produce a usable body.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The node reported a nonzero code.
    #[error("chain error {code}: {detail}")]
    Chain {
        /// Code as reported by the node.
        code: String,
        /// Log or data text accompanying the code.
        detail: String,
    },

    /// Response did not match the expected envelope.
    #[error("decode: {0}")]
    Decode(String),

    /// Invalid configuration value.
    #[error("config: {0}")]
    Config(String),
}

impl OkchainError {
    /// A required field was empty.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: "must not be empty".into(),
        }
    }

    /// A field was present but malformed.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } | Self::Address(_) => ErrorKind::InvalidInput,
            Self::Crypto(_) => ErrorKind::Crypto,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Chain { .. } => ErrorKind::Chain,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Name of the offending field for [`ErrorKind::InvalidInput`] errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}
