//! Signed transactions and their amino `auth/StdTx` wire form.

use okchain_core::amino;
use okchain_core::constants::{PUBKEY_LEN, PUBKEY_SECP256K1_NAME, SIGNATURE_LEN, STD_TX_NAME};
use okchain_core::error::OkchainError;
use okchain_core::{Fee, Msg, PublicKey};
use sha2::{Digest, Sha256};

use crate::sign_doc::StdSignDoc;

/// One signer's signature over the sign doc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdSignature {
    pub pub_key: PublicKey,
    pub signature: [u8; SIGNATURE_LEN],
    pub account_number: u64,
    pub sequence: u64,
}

impl StdSignature {
    /// Amino body: 1 pub_key (prefixed), 2 signature, 3 account_number, 4 sequence.
    fn encode_amino(&self) -> Vec<u8> {
        let mut pub_key = amino::prefix(PUBKEY_SECP256K1_NAME).to_vec();
        pub_key.push(PUBKEY_LEN as u8);
        pub_key.extend_from_slice(&self.pub_key.to_bytes());

        let mut buf = Vec::new();
        amino::encode_bytes(&mut buf, 1, &pub_key);
        amino::encode_bytes(&mut buf, 2, &self.signature);
        amino::encode_uvarint_field(&mut buf, 3, self.account_number);
        amino::encode_uvarint_field(&mut buf, 4, self.sequence);
        buf
    }
}

/// A transaction signed by a single account, ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub msgs: Vec<Msg>,
    pub fee: Fee,
    pub memo: String,
    pub signature: StdSignature,
    /// Fractional digits of the chain's `Dec`, used by the binary encoding.
    pub dec_precision: usize,
}

impl SignedTransaction {
    /// Length-prefixed amino encoding of the `StdTx`.
    ///
    /// Body fields: 1 msgs (repeated), 2 fee, 3 signatures, 4 memo.
    pub fn encode(&self) -> Result<Vec<u8>, OkchainError> {
        let mut body = amino::prefix(STD_TX_NAME).to_vec();
        for msg in &self.msgs {
            amino::encode_struct(&mut body, 1, &msg.encode_amino(self.dec_precision)?);
        }
        amino::encode_struct(&mut body, 2, &self.fee.encode_amino(self.dec_precision)?);
        amino::encode_struct(&mut body, 3, &self.signature.encode_amino());
        amino::encode_string(&mut body, 4, &self.memo);
        Ok(amino::length_prefixed(&body))
    }

    /// Uppercase hex SHA-256 of the encoded transaction, as nodes index it.
    pub fn hash_hex(&self) -> Result<String, OkchainError> {
        Ok(hex::encode_upper(Sha256::digest(self.encode()?)))
    }

    /// The document this transaction's signature covers under `chain_id`.
    pub fn sign_doc(&self, chain_id: &str) -> StdSignDoc {
        StdSignDoc {
            account_number: self.signature.account_number,
            chain_id: chain_id.to_string(),
            fee: self.fee.clone(),
            memo: self.memo.clone(),
            msgs: self.msgs.clone(),
            sequence: self.signature.sequence,
        }
    }

    /// Check the signature against the rebuilt sign doc.
    pub fn verify(&self, chain_id: &str) -> Result<(), OkchainError> {
        let doc = self.sign_doc(chain_id).to_canonical_bytes();
        self.signature
            .pub_key
            .verify(&doc, &self.signature.signature)?;
        Ok(())
    }
}
