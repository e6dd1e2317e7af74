//! Chain messages.
//!
//! [`Msg`] serializes in the amino JSON shape `{"type": <tag>, "value": {..}}`.
//! Value structs declare their fields alphabetically because that is the
//! canonical signing order. The binary encodings number fields in the
//! chain's own declaration order instead, which is why each value has a
//! hand-written `encode_amino`.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amino;
use crate::dec::to_amino_integer;
use crate::error::OkchainError;
use crate::types::{Token, TransferUnit};

pub const MSG_SEND: &str = "okchain/token/MsgTransfer";
pub const MSG_MULTI_SEND: &str = "okchain/token/MsgMultiTransfer";
pub const MSG_PLACE_ORDER: &str = "okchain/order/MsgNew";
pub const MSG_CANCEL_ORDER: &str = "okchain/order/MsgCancel";
pub const MSG_TRANSFER_OWNERSHIP: &str = "okchain/token/MsgTransferOwnership";
pub const MSG_TOKEN_ISSUE: &str = "okchain/token/MsgIssue";
pub const MSG_WITHDRAW_REWARD: &str = "cosmos-sdk/MsgWithdrawValidatorCommission";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MsgSend {
    pub amount: Vec<Token>,
    pub from_address: String,
    pub to_address: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MsgMultiSend {
    pub from_address: String,
    pub transfers: Vec<TransferUnit>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MsgPlaceOrder {
    pub price: String,
    pub product: String,
    pub quantity: String,
    pub sender: String,
    pub side: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MsgCancelOrder {
    pub order_id: String,
    pub sender: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MsgTransferOwnership {
    pub from_address: String,
    pub symbol: String,
    pub to_address: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MsgTokenIssue {
    pub description: String,
    pub mintable: bool,
    pub original_symbol: String,
    pub owner: String,
    pub symbol: String,
    pub total_supply: String,
    pub whole_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MsgWithdrawReward {
    pub validator_address: String,
}

/// A chain message: type tag plus typed value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "value")]
pub enum Msg {
    #[serde(rename = "okchain/token/MsgTransfer")]
    Send(MsgSend),
    #[serde(rename = "okchain/token/MsgMultiTransfer")]
    MultiSend(MsgMultiSend),
    #[serde(rename = "okchain/order/MsgNew")]
    PlaceOrder(MsgPlaceOrder),
    #[serde(rename = "okchain/order/MsgCancel")]
    CancelOrder(MsgCancelOrder),
    #[serde(rename = "okchain/token/MsgTransferOwnership")]
    TransferOwnership(MsgTransferOwnership),
    #[serde(rename = "okchain/token/MsgIssue")]
    TokenIssue(MsgTokenIssue),
    #[serde(rename = "cosmos-sdk/MsgWithdrawValidatorCommission")]
    WithdrawReward(MsgWithdrawReward),
}

impl Msg {
    /// The registered type tag. Matches the serialized `type` field.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Msg::Send(_) => MSG_SEND,
            Msg::MultiSend(_) => MSG_MULTI_SEND,
            Msg::PlaceOrder(_) => MSG_PLACE_ORDER,
            Msg::CancelOrder(_) => MSG_CANCEL_ORDER,
            Msg::TransferOwnership(_) => MSG_TRANSFER_OWNERSHIP,
            Msg::TokenIssue(_) => MSG_TOKEN_ISSUE,
            Msg::WithdrawReward(_) => MSG_WITHDRAW_REWARD,
        }
    }

    /// Amino interface encoding: 4-byte type prefix then the value body.
    pub fn encode_amino(&self, precision: usize) -> Result<Vec<u8>, OkchainError> {
        let mut buf = amino::prefix(self.type_tag()).to_vec();
        let b = &mut buf;
        match self {
            Msg::Send(m) => {
                encode_address(b, 1, &m.from_address, "from_address")?;
                encode_address(b, 2, &m.to_address, "to_address")?;
                for token in &m.amount {
                    amino::encode_struct(b, 3, &token.encode_amino(precision)?);
                }
            }
            Msg::MultiSend(m) => {
                encode_address(b, 1, &m.from_address, "from_address")?;
                for unit in &m.transfers {
                    let mut body = Vec::new();
                    encode_address(&mut body, 1, &unit.recipient, "to")?;
                    for token in &unit.tokens {
                        amino::encode_struct(&mut body, 2, &token.encode_amino(precision)?);
                    }
                    amino::encode_struct(b, 2, &body);
                }
            }
            Msg::PlaceOrder(m) => {
                encode_address(b, 1, &m.sender, "sender")?;
                amino::encode_string(b, 2, &m.product);
                amino::encode_string(b, 3, &m.side);
                amino::encode_string(b, 4, &to_amino_integer(&m.price, "price", precision)?);
                amino::encode_string(b, 5, &to_amino_integer(&m.quantity, "quantity", precision)?);
            }
            Msg::CancelOrder(m) => {
                encode_address(b, 1, &m.sender, "sender")?;
                amino::encode_string(b, 2, &m.order_id);
            }
            Msg::TransferOwnership(m) => {
                encode_address(b, 1, &m.from_address, "from_address")?;
                encode_address(b, 2, &m.to_address, "to_address")?;
                amino::encode_string(b, 3, &m.symbol);
            }
            Msg::TokenIssue(m) => {
                amino::encode_string(b, 1, &m.description);
                amino::encode_string(b, 2, &m.symbol);
                amino::encode_string(b, 3, &m.original_symbol);
                amino::encode_string(b, 4, &m.whole_name);
                amino::encode_string(b, 5, &m.total_supply);
                encode_address(b, 6, &m.owner, "owner")?;
                amino::encode_bool(b, 7, m.mintable);
            }
            Msg::WithdrawReward(m) => {
                encode_address(b, 1, &m.validator_address, "validator_address")?;
            }
        }
        Ok(buf)
    }
}

/// Addresses travel as their raw 20-byte payload in binary form.
fn encode_address(
    buf: &mut Vec<u8>,
    field_number: u32,
    address: &str,
    field: &str,
) -> Result<(), OkchainError> {
    let decoded =
        Address::decode(address).map_err(|e| OkchainError::invalid(field, e.to_string()))?;
    amino::encode_bytes(buf, field_number, decoded.as_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amino::{split_fields, Field};
    use crate::constants::DEFAULT_DEC_PRECISION;

    const ADDR: &str = "okchain1t2cvfv58764q4wdly7qjx5d2z89lewvwq2448n";

    fn all_variants() -> Vec<Msg> {
        vec![
            Msg::Send(MsgSend {
                amount: vec![Token::new("1.00000000", "okb")],
                from_address: ADDR.into(),
                to_address: ADDR.into(),
            }),
            Msg::MultiSend(MsgMultiSend {
                from_address: ADDR.into(),
                transfers: vec![TransferUnit::new(ADDR, vec![Token::new("1", "okb")])],
            }),
            Msg::PlaceOrder(MsgPlaceOrder {
                price: "1.00000000".into(),
                product: "xxb_okb".into(),
                quantity: "1.00000000".into(),
                sender: ADDR.into(),
                side: "BUY".into(),
            }),
            Msg::CancelOrder(MsgCancelOrder {
                order_id: "ID0000065785-1".into(),
                sender: ADDR.into(),
            }),
            Msg::TransferOwnership(MsgTransferOwnership {
                from_address: ADDR.into(),
                symbol: "xxb".into(),
                to_address: ADDR.into(),
            }),
            Msg::TokenIssue(MsgTokenIssue {
                description: "".into(),
                mintable: true,
                original_symbol: "xxb".into(),
                owner: ADDR.into(),
                symbol: "xxb".into(),
                total_supply: "1000000".into(),
                whole_name: "XXB Token".into(),
            }),
            Msg::WithdrawReward(MsgWithdrawReward {
                validator_address: "okchainvaloper1t2cvfv58764q4wdly7qjx5d2z89lewvwu5ysj4"
                    .into(),
            }),
        ]
    }

    #[test]
    fn type_tag_matches_serialized_type() {
        for msg in all_variants() {
            let value = serde_json::to_value(&msg).unwrap();
            assert_eq!(value["type"], msg.type_tag());
        }
    }

    #[test]
    fn json_roundtrip_every_variant() {
        for msg in all_variants() {
            let json = serde_json::to_string(&msg).unwrap();
            let back: Msg = serde_json::from_str(&json).unwrap();
            assert_eq!(back, msg);
        }
    }

    #[test]
    fn place_order_json_shape() {
        let msg = &all_variants()[2];
        let json = serde_json::to_string(msg).unwrap();
        assert_eq!(
            json,
            format!(
                r#"{{"type":"okchain/order/MsgNew","value":{{"price":"1.00000000","product":"xxb_okb","quantity":"1.00000000","sender":"{ADDR}","side":"BUY"}}}}"#
            )
        );
    }

    #[test]
    fn token_issue_fields_alphabetical() {
        let json = serde_json::to_string(&all_variants()[5]).unwrap();
        let keys = [
            "description",
            "mintable",
            "original_symbol",
            "owner",
            "symbol",
            "total_supply",
            "whole_name",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| json.find(&format!("\"{k}\":")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn binary_carries_prefix() {
        for msg in all_variants() {
            let bytes = msg.encode_amino(DEFAULT_DEC_PRECISION).unwrap();
            assert_eq!(bytes[..4], amino::prefix(msg.type_tag()));
        }
    }

    #[test]
    fn send_binary_uses_raw_addresses() {
        let bytes = all_variants()[0].encode_amino(DEFAULT_DEC_PRECISION).unwrap();
        let fields = split_fields(&bytes[4..]).unwrap();
        let raw = Address::decode(ADDR).unwrap();
        assert_eq!(fields[0], (1, Field::Bytes(raw.as_bytes())));
        assert_eq!(fields[1], (2, Field::Bytes(raw.as_bytes())));
        assert_eq!(fields[2].0, 3);
    }

    #[test]
    fn place_order_binary_scales_decimals() {
        let bytes = all_variants()[2].encode_amino(DEFAULT_DEC_PRECISION).unwrap();
        let fields = split_fields(&bytes[4..]).unwrap();
        assert_eq!(fields[1], (2, Field::Bytes(b"xxb_okb")));
        assert_eq!(fields[2], (3, Field::Bytes(b"BUY")));
        assert_eq!(fields[3], (4, Field::Bytes(b"100000000")));
        assert_eq!(fields[4], (5, Field::Bytes(b"100000000")));
    }

    #[test]
    fn malformed_address_named_in_error() {
        let msg = Msg::CancelOrder(MsgCancelOrder {
            order_id: "1".into(),
            sender: "not-an-address".into(),
        });
        assert_eq!(msg.encode_amino(DEFAULT_DEC_PRECISION).unwrap_err().field(), Some("sender"));
    }
}
