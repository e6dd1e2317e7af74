//! Transaction builder with up-front validation and signing.
//!
//! Every `build_*` operation checks its required fields in a fixed order and
//! returns the first failure as a field-named [`OkchainError::InvalidInput`]
//! before any key is touched. Building then proceeds in three steps:
//! 1. assemble the [`StdSignDoc`] from the account counters and messages
//! 2. sign its canonical bytes with the account's private key
//! 3. return a [`SignedTransaction`] ready for binary encoding
//!
//! The builder never talks to the network.

use okchain_core::constants::MAX_MEMO_CHARS;
use okchain_core::error::OkchainError;
use okchain_core::msgs::{
    MsgCancelOrder, MsgMultiSend, MsgPlaceOrder, MsgSend, MsgTokenIssue, MsgTransferOwnership,
    MsgWithdrawReward,
};
use okchain_core::{Address, Fee, Msg, Token, TransferUnit};
use tracing::debug;

use crate::account::AccountInfo;
use crate::chain::ChainConfig;
use crate::sign_doc::StdSignDoc;
use crate::tx::{SignedTransaction, StdSignature};

/// Parameters of a new token issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenIssueParams {
    pub symbol: String,
    /// Defaults to `symbol` when empty.
    pub original_symbol: String,
    pub whole_name: String,
    pub total_supply: String,
    pub description: String,
    pub mintable: bool,
}

/// Builds and signs transactions for one network.
///
/// # Example
/// ```ignore
/// let builder = TransactionBuilder::new(ChainConfig::default());
/// let tx = builder.build_send(&account, recipient, &[Token::new("1.00000000", "okb")], "")?;
/// client.broadcast(&tx, BroadcastMode::Block)?;
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    chain: ChainConfig,
}

impl TransactionBuilder {
    pub fn new(chain: ChainConfig) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Override the fee (default: the chain config's fee).
    pub fn set_fee(&mut self, fee: Fee) -> &mut Self {
        self.chain.fee = fee;
        self
    }

    /// Transfer `tokens` to `recipient`.
    pub fn build_send(
        &self,
        account: &AccountInfo,
        recipient: &str,
        tokens: &[Token],
        memo: &str,
    ) -> Result<SignedTransaction, OkchainError> {
        self.check_account_address(recipient, "recipient")?;
        check_tokens(tokens, "tokens")?;
        self.build(
            account,
            vec![Msg::Send(MsgSend {
                amount: tokens.to_vec(),
                from_address: account.address().to_string(),
                to_address: recipient.to_string(),
            })],
            memo,
        )
    }

    /// Transfer to several recipients in one message. Unit and token order
    /// are kept exactly as given.
    pub fn build_multi_send(
        &self,
        account: &AccountInfo,
        transfer_units: &[TransferUnit],
        memo: &str,
    ) -> Result<SignedTransaction, OkchainError> {
        if transfer_units.is_empty() {
            return Err(OkchainError::missing("transfer_units"));
        }
        for (i, unit) in transfer_units.iter().enumerate() {
            self.check_account_address(&unit.recipient, &format!("transfer_units[{i}].recipient"))?;
            check_tokens(&unit.tokens, &format!("transfer_units[{i}].tokens"))?;
        }
        self.build(
            account,
            vec![Msg::MultiSend(MsgMultiSend {
                from_address: account.address().to_string(),
                transfers: transfer_units.to_vec(),
            })],
            memo,
        )
    }

    pub fn build_place_order(
        &self,
        account: &AccountInfo,
        side: &str,
        product: &str,
        price: &str,
        quantity: &str,
        memo: &str,
    ) -> Result<SignedTransaction, OkchainError> {
        require(side, "side")?;
        require(product, "product")?;
        require(price, "price")?;
        require(quantity, "quantity")?;
        self.build(
            account,
            vec![Msg::PlaceOrder(MsgPlaceOrder {
                price: price.to_string(),
                product: product.to_string(),
                quantity: quantity.to_string(),
                sender: account.address().to_string(),
                side: side.to_string(),
            })],
            memo,
        )
    }

    pub fn build_cancel_order(
        &self,
        account: &AccountInfo,
        order_id: &str,
        memo: &str,
    ) -> Result<SignedTransaction, OkchainError> {
        require(order_id, "order_id")?;
        self.build(
            account,
            vec![Msg::CancelOrder(MsgCancelOrder {
                order_id: order_id.to_string(),
                sender: account.address().to_string(),
            })],
            memo,
        )
    }

    /// Hand ownership of token `symbol` to another account.
    pub fn build_transfer_ownership(
        &self,
        account: &AccountInfo,
        to: &str,
        symbol: &str,
        memo: &str,
    ) -> Result<SignedTransaction, OkchainError> {
        self.check_account_address(to, "to")?;
        require(symbol, "symbol")?;
        self.build(
            account,
            vec![Msg::TransferOwnership(MsgTransferOwnership {
                from_address: account.address().to_string(),
                symbol: symbol.to_string(),
                to_address: to.to_string(),
            })],
            memo,
        )
    }

    pub fn build_token_issue(
        &self,
        account: &AccountInfo,
        params: TokenIssueParams,
        memo: &str,
    ) -> Result<SignedTransaction, OkchainError> {
        require(&params.symbol, "symbol")?;
        require(&params.whole_name, "whole_name")?;
        require(&params.total_supply, "total_supply")?;
        let original_symbol = if params.original_symbol.is_empty() {
            params.symbol.clone()
        } else {
            params.original_symbol
        };
        self.build(
            account,
            vec![Msg::TokenIssue(MsgTokenIssue {
                description: params.description,
                mintable: params.mintable,
                original_symbol,
                owner: account.address().to_string(),
                symbol: params.symbol,
                total_supply: params.total_supply,
                whole_name: params.whole_name,
            })],
            memo,
        )
    }

    /// Withdraw the commission of the validator operated by this account.
    pub fn build_withdraw_reward(
        &self,
        account: &AccountInfo,
        validator_address: &str,
        memo: &str,
    ) -> Result<SignedTransaction, OkchainError> {
        require(validator_address, "validator_address")?;
        Address::decode_with_hrp(validator_address, &self.chain.validator_hrp)
            .map_err(|e| OkchainError::invalid("validator_address", e.to_string()))?;
        self.build(
            account,
            vec![Msg::WithdrawReward(MsgWithdrawReward {
                validator_address: validator_address.to_string(),
            })],
            memo,
        )
    }

    /// Sign arbitrary messages with `account`'s key and current counters.
    pub fn build(
        &self,
        account: &AccountInfo,
        msgs: Vec<Msg>,
        memo: &str,
    ) -> Result<SignedTransaction, OkchainError> {
        if msgs.is_empty() {
            return Err(OkchainError::missing("msgs"));
        }
        if memo.chars().count() > MAX_MEMO_CHARS {
            return Err(OkchainError::invalid(
                "memo",
                format!("longer than {MAX_MEMO_CHARS} characters"),
            ));
        }
        for (i, msg) in msgs.iter().enumerate() {
            self.check_msg(msg, &format!("msgs[{i}]"))?;
        }
        // fail on malformed addresses or decimals before signing
        let precision = self.chain.dec_precision;
        for msg in &msgs {
            msg.encode_amino(precision)?;
        }
        self.chain.fee.encode_amino(precision)?;

        let doc = self.sign_doc(account, msgs, memo);
        let bytes = doc.to_canonical_bytes();
        debug!(
            account_number = doc.account_number,
            sequence = doc.sequence,
            msgs = doc.msgs.len(),
            digest = %hex::encode(doc.digest()),
            "signing transaction"
        );
        let signature = account.private_key().sign(&bytes)?;

        Ok(SignedTransaction {
            msgs: doc.msgs,
            fee: doc.fee,
            memo: doc.memo,
            signature: StdSignature {
                pub_key: *account.public_key(),
                signature,
                account_number: doc.account_number,
                sequence: doc.sequence,
            },
            dec_precision: precision,
        })
    }

    /// The document `build` would sign, without signing it.
    pub fn sign_doc(&self, account: &AccountInfo, msgs: Vec<Msg>, memo: &str) -> StdSignDoc {
        StdSignDoc {
            account_number: account.account_number,
            chain_id: self.chain.chain_id.clone(),
            fee: self.chain.fee.clone(),
            memo: memo.to_string(),
            msgs,
            sequence: account.sequence,
        }
    }

    /// Required fields of a message, named `{at}.<field>` in errors.
    fn check_msg(&self, msg: &Msg, at: &str) -> Result<(), OkchainError> {
        let name = |field: &str| format!("{at}.{field}");
        match msg {
            Msg::Send(m) => {
                self.check_account_address(&m.from_address, &name("from_address"))?;
                self.check_account_address(&m.to_address, &name("to_address"))?;
                check_tokens(&m.amount, &name("amount"))
            }
            Msg::MultiSend(m) => {
                self.check_account_address(&m.from_address, &name("from_address"))?;
                if m.transfers.is_empty() {
                    return Err(OkchainError::missing(name("transfers")));
                }
                for (j, unit) in m.transfers.iter().enumerate() {
                    self.check_account_address(&unit.recipient, &name(&format!("transfers[{j}].to")))?;
                    check_tokens(&unit.tokens, &name(&format!("transfers[{j}].coins")))?;
                }
                Ok(())
            }
            Msg::PlaceOrder(m) => {
                require(&m.side, &name("side"))?;
                require(&m.product, &name("product"))?;
                require(&m.price, &name("price"))?;
                require(&m.quantity, &name("quantity"))?;
                self.check_account_address(&m.sender, &name("sender"))
            }
            Msg::CancelOrder(m) => {
                require(&m.order_id, &name("order_id"))?;
                self.check_account_address(&m.sender, &name("sender"))
            }
            Msg::TransferOwnership(m) => {
                self.check_account_address(&m.from_address, &name("from_address"))?;
                self.check_account_address(&m.to_address, &name("to_address"))?;
                require(&m.symbol, &name("symbol"))
            }
            Msg::TokenIssue(m) => {
                require(&m.symbol, &name("symbol"))?;
                require(&m.whole_name, &name("whole_name"))?;
                require(&m.total_supply, &name("total_supply"))?;
                self.check_account_address(&m.owner, &name("owner"))
            }
            Msg::WithdrawReward(m) => {
                let field = name("validator_address");
                require(&m.validator_address, &field)?;
                Address::decode_with_hrp(&m.validator_address, &self.chain.validator_hrp)
                    .map_err(|e| OkchainError::invalid(field, e.to_string()))?;
                Ok(())
            }
        }
    }

    fn check_account_address(&self, value: &str, field: &str) -> Result<(), OkchainError> {
        require(value, field)?;
        Address::decode_with_hrp(value, &self.chain.account_hrp)
            .map_err(|e| OkchainError::invalid(field, e.to_string()))?;
        Ok(())
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new(ChainConfig::default())
    }
}

fn require(value: &str, field: &str) -> Result<(), OkchainError> {
    if value.trim().is_empty() {
        return Err(OkchainError::missing(field));
    }
    Ok(())
}

fn check_tokens(tokens: &[Token], field: &str) -> Result<(), OkchainError> {
    if tokens.is_empty() {
        return Err(OkchainError::missing(field));
    }
    for (i, token) in tokens.iter().enumerate() {
        token.validate(&format!("{field}[{i}]"))?;
    }
    Ok(())
}
