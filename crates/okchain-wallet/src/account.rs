//! Signing identity bound to its on-chain counters.

use okchain_core::{Address, PrivateKey, PublicKey};

use crate::keys::AddressInfo;

/// Key material plus the account number and sequence the chain expects
/// in the next transaction signed by this account.
#[derive(Debug, Clone)]
pub struct AccountInfo {
    pub address_info: AddressInfo,
    pub account_number: u64,
    pub sequence: u64,
}

impl AccountInfo {
    pub fn new(address_info: AddressInfo, account_number: u64, sequence: u64) -> Self {
        Self {
            address_info,
            account_number,
            sequence,
        }
    }

    /// An account the chain has not seen yet: both counters are zero.
    pub fn unregistered(address_info: AddressInfo) -> Self {
        Self::new(address_info, 0, 0)
    }

    pub fn address(&self) -> &Address {
        self.address_info.address()
    }

    pub fn public_key(&self) -> &PublicKey {
        self.address_info.public_key()
    }

    pub fn private_key(&self) -> &PrivateKey {
        self.address_info.private_key()
    }

    /// Replace both counters with values freshly read from the chain.
    pub fn update_counters(&mut self, account_number: u64, sequence: u64) {
        self.account_number = account_number;
        self.sequence = sequence;
    }
}
