//! The canonical document an account signs.
//!
//! The document is the compact JSON object
//! `{"account_number","chain_id","fee","memo","msgs","sequence"}` with keys
//! sorted at every level, no insignificant whitespace, and integers
//! rendered as decimal strings. The chain builds the same bytes with Go's
//! `encoding/json`, which also escapes `<`, `>`, `&`, U+2028 and U+2029 as
//! `\uXXXX` and writes backspace and form feed as `\u0008` and `\u000c`
//! where serde_json writes `\b` and `\f`. [`StdSignDoc::to_canonical_bytes`]
//! follows Go so that memos containing those characters still verify.

use okchain_core::error::OkchainError;
use okchain_core::types::u64_string;
use okchain_core::{Fee, Msg};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Fields are declared alphabetically; serde preserves declaration order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StdSignDoc {
    #[serde(with = "u64_string")]
    pub account_number: u64,
    pub chain_id: String,
    pub fee: Fee,
    pub memo: String,
    pub msgs: Vec<Msg>,
    #[serde(with = "u64_string")]
    pub sequence: u64,
}

impl StdSignDoc {
    /// The exact bytes that are hashed and signed.
    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        let json = serde_json::to_string(self).expect("sign doc contains only string-keyed data");
        escape_like_go(&json).into_bytes()
    }

    /// Parse bytes produced by [`Self::to_canonical_bytes`].
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self, OkchainError> {
        serde_json::from_slice(bytes).map_err(|e| OkchainError::Decode(format!("sign doc: {e}")))
    }

    /// SHA-256 of the canonical bytes.
    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(self.to_canonical_bytes()).into()
    }
}

// These characters can only occur inside JSON strings, so a textual
// replacement never touches structure. Escape sequences are copied as a
// pair so an escaped backslash followed by `b` stays as it is.
fn escape_like_go(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut chars = json.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('b') => out.push_str("\\u0008"),
                Some('f') => out.push_str("\\u000c"),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}
