//! Transaction requests with optional fields
//!
//! A request names what the caller knows. [`TransactionRequest::resolve`]
//! fills the rest from a [`ChainStateProvider`] and produces an
//! [`UnsignedTransaction`]; signing never sees a partially resolved request.

use ethers_core::types::U256;

use crate::error::{SignerError, SignerResult};
use crate::provider::ChainStateProvider;
use crate::types::{parse_input, parse_quantity, parse_u64_quantity, Address, UnsignedTransaction};

/// Signing inputs before defaults are applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionRequest {
    pub nonce: Option<u64>,
    pub gas_price: Option<U256>,
    pub gas_limit: Option<U256>,
    pub to: Option<Address>,
    pub value: Option<U256>,
    pub input: Option<Vec<u8>>,
    pub chain_id: Option<u64>,
}

impl TransactionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nonce
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Set the gas price in wei
    pub fn gas_price(mut self, gas_price: impl Into<U256>) -> Self {
        self.gas_price = Some(gas_price.into());
        self
    }

    /// Set the gas limit
    pub fn gas_limit(mut self, gas_limit: impl Into<U256>) -> Self {
        self.gas_limit = Some(gas_limit.into());
        self
    }

    /// Set the recipient
    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    /// Set the value in wei
    pub fn value(mut self, value: impl Into<U256>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the call data
    pub fn input(mut self, input: Vec<u8>) -> Self {
        self.input = Some(input);
        self
    }

    /// Set the chain id
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Build a request from textual fields, as a CLI or form would supply them.
    ///
    /// Quantities may be decimal or `0x`-hex; empty optional strings are
    /// treated as omitted.
    pub fn from_strings(fields: &RequestStrings<'_>) -> SignerResult<Self> {
        fn present(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }

        Ok(Self {
            nonce: present(fields.nonce).map(parse_u64_quantity).transpose()?,
            gas_price: present(fields.gas_price).map(parse_quantity).transpose()?,
            gas_limit: present(fields.gas_limit).map(parse_quantity).transpose()?,
            to: present(fields.to).map(str::parse::<Address>).transpose()?,
            value: present(fields.value).map(parse_quantity).transpose()?,
            input: fields.input.map(parse_input).transpose()?,
            chain_id: present(fields.chain_id).map(parse_u64_quantity).transpose()?,
        })
    }

    /// Apply defaults and produce a fully populated transaction.
    ///
    /// `gasLimit` and `to` are required. Nonce, gas price and chain id come
    /// from `provider` when omitted; value defaults to zero, input to empty.
    pub fn resolve<P>(self, sender: &Address, provider: &P) -> SignerResult<UnsignedTransaction>
    where
        P: ChainStateProvider + ?Sized,
    {
        let gas_limit = self.gas_limit.ok_or(SignerError::MissingField("gasLimit"))?;
        let to = self.to.ok_or(SignerError::MissingField("to"))?;

        let nonce = match self.nonce {
            Some(nonce) => nonce,
            None => provider.get_nonce(sender)?,
        };
        let gas_price = match self.gas_price {
            Some(price) => price,
            None => provider.get_gas_price()?,
        };
        let chain_id = match self.chain_id {
            Some(id) => id,
            None => provider.get_chain_id()?,
        };

        let tx = UnsignedTransaction {
            nonce,
            gas_price,
            gas_limit,
            to,
            value: self.value.unwrap_or_default(),
            input: self.input.unwrap_or_default(),
            chain_id,
        };
        tx.validate()?;
        Ok(tx)
    }
}

/// Borrowed textual form of a request
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestStrings<'a> {
    pub nonce: Option<&'a str>,
    pub gas_price: Option<&'a str>,
    pub gas_limit: Option<&'a str>,
    pub to: Option<&'a str>,
    pub value: Option<&'a str>,
    pub input: Option<&'a str>,
    pub chain_id: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticProvider;

    fn recipient() -> Address {
        Address([0x35; 20])
    }

    #[test]
    fn test_resolve_fully_specified() {
        let tx = TransactionRequest::new()
            .nonce(9)
            .gas_price(20_000_000_000u64)
            .gas_limit(21000u64)
            .to(recipient())
            .value(1_000_000_000_000_000_000u64)
            .chain_id(1)
            .resolve(&Address::default(), &StaticProvider::new())
            .unwrap();

        assert_eq!(tx.nonce, 9);
        assert_eq!(tx.gas_price, U256::from(20_000_000_000u64));
        assert!(tx.input.is_empty());
    }

    #[test]
    fn test_resolve_uses_provider_defaults() {
        let sender = Address([0x9d; 20]);
        let provider = StaticProvider::new()
            .with_sender_nonce(sender, 7)
            .with_gas_price(U256::from(5u64))
            .with_chain_id(11155111);

        let tx = TransactionRequest::new()
            .gas_limit(21000u64)
            .to(recipient())
            .resolve(&sender, &provider)
            .unwrap();

        assert_eq!(tx.nonce, 7);
        assert_eq!(tx.gas_price, U256::from(5u64));
        assert_eq!(tx.chain_id, 11155111);
        assert_eq!(tx.value, U256::zero());
    }

    #[test]
    fn test_required_fields() {
        let provider = StaticProvider::new().with_nonce(0).with_chain_id(1);

        let missing_gas = TransactionRequest::new()
            .to(recipient())
            .gas_price(1u64)
            .resolve(&Address::default(), &provider);
        assert_eq!(missing_gas, Err(SignerError::MissingField("gasLimit")));

        let missing_to = TransactionRequest::new()
            .gas_limit(21000u64)
            .gas_price(1u64)
            .resolve(&Address::default(), &provider);
        assert_eq!(missing_to, Err(SignerError::MissingField("to")));
    }

    #[test]
    fn test_provider_failure_aborts() {
        let result = TransactionRequest::new()
            .gas_limit(21000u64)
            .to(recipient())
            .chain_id(1)
            .resolve(&Address::default(), &StaticProvider::new());
        assert!(matches!(result, Err(SignerError::Provider(_))));
    }

    #[test]
    fn test_zero_chain_id_rejected() {
        let result = TransactionRequest::new()
            .nonce(0)
            .gas_price(1u64)
            .gas_limit(21000u64)
            .to(recipient())
            .chain_id(0)
            .resolve(&Address::default(), &StaticProvider::new());
        assert_eq!(result, Err(SignerError::InvalidChainId(0)));
    }

    #[test]
    fn test_from_strings() {
        let request = TransactionRequest::from_strings(&RequestStrings {
            nonce: Some("0x9"),
            gas_price: Some("20000000000"),
            gas_limit: Some("21000"),
            to: Some("3535353535353535353535353535353535353535"),
            value: Some("0xde0b6b3a7640000"),
            input: Some(""),
            chain_id: Some("1"),
        })
        .unwrap();

        assert_eq!(request.nonce, Some(9));
        assert_eq!(request.value, Some(U256::from(1_000_000_000_000_000_000u64)));
        assert_eq!(request.input, Some(Vec::new()));
        assert_eq!(request.to, Some(recipient()));
    }

    #[test]
    fn test_from_strings_errors() {
        let negative = TransactionRequest::from_strings(&RequestStrings {
            value: Some("-1"),
            ..RequestStrings::default()
        });
        assert!(matches!(negative, Err(SignerError::EncodingOverflow(_))));

        let bare_prefix = TransactionRequest::from_strings(&RequestStrings {
            gas_limit: Some("0x"),
            ..RequestStrings::default()
        });
        assert!(matches!(bare_prefix, Err(SignerError::EncodingOverflow(_))));

        let bad_to = TransactionRequest::from_strings(&RequestStrings {
            to: Some("0x1234"),
            ..RequestStrings::default()
        });
        assert!(matches!(bad_to, Err(SignerError::InvalidAddressFormat(_))));
    }
}
