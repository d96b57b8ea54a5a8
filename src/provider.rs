//! Chain state collaborator
//!
//! Omitted nonce, gas price and chain id are filled in by whatever implements
//! [`ChainStateProvider`], typically a JSON-RPC client living outside this
//! crate. All of it happens before signing starts; the signing pipeline itself
//! never performs I/O.

use std::collections::HashMap;
use std::path::Path;

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

use crate::error::{SignerError, SignerResult};
use crate::types::Address;

/// Typed queries an RPC client answers on behalf of the signer
pub trait ChainStateProvider {
    /// Pending transaction count for `address`
    fn get_nonce(&self, address: &Address) -> SignerResult<u64>;

    /// Current gas price in wei
    fn get_gas_price(&self) -> SignerResult<U256>;

    /// Chain id of the connected network
    fn get_chain_id(&self) -> SignerResult<u64>;
}

impl<P: ChainStateProvider + ?Sized> ChainStateProvider for &P {
    fn get_nonce(&self, address: &Address) -> SignerResult<u64> {
        (**self).get_nonce(address)
    }

    fn get_gas_price(&self) -> SignerResult<U256> {
        (**self).get_gas_price()
    }

    fn get_chain_id(&self) -> SignerResult<u64> {
        (**self).get_chain_id()
    }
}

/// Fixed answers, e.g. loaded from a JSON state file for offline signing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticProvider {
    /// Nonce used for any sender without an entry in `nonces`
    pub nonce: Option<u64>,
    pub nonces: HashMap<Address, u64>,
    pub gas_price: Option<U256>,
    pub chain_id: Option<u64>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_sender_nonce(mut self, address: Address, nonce: u64) -> Self {
        self.nonces.insert(address, nonce);
        self
    }

    pub fn with_gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn from_json(json: &str) -> SignerResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SignerError::provider(format!("invalid state document: {}", e)))
    }

    pub fn from_file(path: &Path) -> SignerResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SignerError::provider(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

impl ChainStateProvider for StaticProvider {
    fn get_nonce(&self, address: &Address) -> SignerResult<u64> {
        self.nonces
            .get(address)
            .copied()
            .or(self.nonce)
            .ok_or_else(|| SignerError::provider(format!("no nonce known for {}", address)))
    }

    fn get_gas_price(&self) -> SignerResult<U256> {
        self.gas_price
            .ok_or_else(|| SignerError::provider("no gas price known"))
    }

    fn get_chain_id(&self) -> SignerResult<u64> {
        self.chain_id
            .ok_or_else(|| SignerError::provider("no chain id known"))
    }
}
