//! Transaction Signer
//!
//! The linear pipeline: digest, ECDSA signature, recovery id / `v`, assembly.
//! Any failure aborts the whole attempt; no partial result is returned.

use crate::config::SignerSettings;
use crate::crypto::ecdsa::{sign_digest, verify_digest};
use crate::crypto::keys::{KeyPair, PrivateKey};
use crate::crypto::recovery::resolve_v;
use crate::error::{SignerError, SignerResult};
use crate::log_debug;
use crate::provider::ChainStateProvider;
use crate::types::{Address, SignedTransaction, UnsignedTransaction};
use crate::utils::crypto::to_prefixed_hex;

use super::assembler::assemble_signed_transaction;
use super::digest::signing_hash;
use super::request::TransactionRequest;

const MODULE: &str = "tx::signer";

/// A key plus its settings, passed explicitly into every signing call
#[derive(Debug, Clone)]
pub struct SigningContext {
    key_pair: KeyPair,
    settings: SignerSettings,
}

impl SigningContext {
    pub fn new(private_key: PrivateKey) -> SignerResult<Self> {
        Ok(Self {
            key_pair: KeyPair::from_private_key(private_key)?,
            settings: SignerSettings::default(),
        })
    }

    pub fn from_hex(private_key: &str) -> SignerResult<Self> {
        Self::new(PrivateKey::from_hex(private_key)?)
    }

    pub fn with_settings(mut self, settings: SignerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Toggle per-stage debug logging for this context only
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.settings.debug = debug;
        self
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn settings(&self) -> &SignerSettings {
        &self.settings
    }

    pub fn address(&self) -> Address {
        self.key_pair.address()
    }

    /// Address formatted per `checksum_addresses`
    pub fn display_address(&self) -> String {
        if self.settings.checksum_addresses {
            self.key_pair.checksum_address()
        } else {
            self.key_pair.address_hex()
        }
    }

    /// Sign a fully resolved transaction
    pub fn sign_transaction(&self, tx: &UnsignedTransaction) -> SignerResult<SignedTransaction> {
        let debug = self.settings.debug;

        tx.validate()?;
        if tx.input.len() > self.settings.max_input_bytes {
            return Err(SignerError::overflow(format!(
                "input of {} bytes exceeds limit of {}",
                tx.input.len(),
                self.settings.max_input_bytes
            )));
        }

        let message_hash = signing_hash(tx);
        log_debug!(
            debug,
            MODULE,
            "signing digest built",
            message_hash = to_prefixed_hex(&message_hash),
            to = tx.to,
            nonce = tx.nonce,
            chain_id = tx.chain_id,
        );

        let signature = sign_digest(&message_hash, self.key_pair.private_key())?;
        if self.settings.verify_after_signing
            && !verify_digest(&message_hash, &signature, self.key_pair.public_key())?
        {
            return Err(SignerError::InvalidSignature(
                "signature does not verify against the signing key".to_string(),
            ));
        }
        log_debug!(debug, MODULE, "signature produced", low_s = signature.is_low_s());

        let v = resolve_v(
            &signature,
            &message_hash,
            self.key_pair.public_key(),
            tx.chain_id,
        )?;
        log_debug!(debug, MODULE, "recovery id resolved", v = v);

        let signed = assemble_signed_transaction(tx, message_hash, v, &signature);
        log_debug!(
            debug,
            MODULE,
            "transaction assembled",
            tx_hash = signed.transaction_hash_hex(),
            raw_len = signed.raw_transaction.len(),
        );

        Ok(signed)
    }

    /// Resolve defaults through `provider`, then sign
    pub fn sign_request<P>(
        &self,
        request: TransactionRequest,
        provider: &P,
    ) -> SignerResult<SignedTransaction>
    where
        P: ChainStateProvider + ?Sized,
    {
        let tx = request.resolve(&self.address(), provider)?;
        self.sign_transaction(&tx)
    }
}

/// One-shot signing with default settings
pub fn sign_transaction(
    tx: &UnsignedTransaction,
    private_key: &PrivateKey,
) -> SignerResult<SignedTransaction> {
    SigningContext::new(private_key.clone())?.sign_transaction(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticProvider;
    use ethers_core::types::U256;

    const EIP155_KEY: &str = "0x4646464646464646464646464646464646464646464646464646464646464646";
    const EIP155_RAW: &str = "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";

    fn eip155_tx() -> UnsignedTransaction {
        UnsignedTransaction {
            nonce: 9,
            gas_price: U256::from(20_000_000_000u64),
            gas_limit: U256::from(21000u64),
            to: Address([0x35; 20]),
            value: U256::from(1_000_000_000_000_000_000u64),
            input: Vec::new(),
            chain_id: 1,
        }
    }

    #[test]
    fn test_end_to_end_vector() {
        let ctx = SigningContext::from_hex(EIP155_KEY).unwrap();
        let signed = ctx.sign_transaction(&eip155_tx()).unwrap();

        assert_eq!(signed.raw_transaction_hex(), EIP155_RAW);
        assert_eq!(signed.v, 37);
        assert_eq!(
            signed.message_hash_hex(),
            "0xdaf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
        assert_eq!(
            signed.transaction_hash_hex(),
            "0x33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788"
        );
    }

    #[test]
    fn test_idempotent() {
        let ctx = SigningContext::from_hex(EIP155_KEY).unwrap();
        let a = ctx.sign_transaction(&eip155_tx()).unwrap();
        let b = ctx.sign_transaction(&eip155_tx()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_debug_context_produces_same_bytes() {
        let quiet = SigningContext::from_hex(EIP155_KEY).unwrap();
        let loud = SigningContext::from_hex(EIP155_KEY).unwrap().with_debug(true);
        assert_eq!(
            quiet.sign_transaction(&eip155_tx()).unwrap(),
            loud.sign_transaction(&eip155_tx()).unwrap()
        );
    }

    #[test]
    fn test_recover_sender() {
        let ctx = SigningContext::from_hex(EIP155_KEY).unwrap();
        let signed = ctx.sign_transaction(&eip155_tx()).unwrap();
        assert_eq!(signed.recover_sender().unwrap(), ctx.address());
        assert_eq!(signed.recovery_id(), Some(0));
    }

    #[test]
    fn test_recover_sender_detects_tampering() {
        let ctx = SigningContext::from_hex(EIP155_KEY).unwrap();
        let mut signed = ctx.sign_transaction(&eip155_tx()).unwrap();
        signed.tx.value = U256::from(2u64);
        assert_ne!(signed.recover_sender().ok(), Some(ctx.address()));
    }

    #[test]
    fn test_sign_request_with_provider() {
        let ctx = SigningContext::from_hex(EIP155_KEY).unwrap();
        let provider = StaticProvider::new()
            .with_sender_nonce(ctx.address(), 9)
            .with_gas_price(U256::from(20_000_000_000u64))
            .with_chain_id(1);

        let request = TransactionRequest::new()
            .gas_limit(21000u64)
            .to(Address([0x35; 20]))
            .value(1_000_000_000_000_000_000u64);

        let signed = ctx.sign_request(request, &provider).unwrap();
        assert_eq!(signed.raw_transaction_hex(), EIP155_RAW);
    }

    #[test]
    fn test_input_limit() {
        let settings = SignerSettings {
            max_input_bytes: 4,
            ..SignerSettings::default()
        };
        let ctx = SigningContext::from_hex(EIP155_KEY)
            .unwrap()
            .with_settings(settings);

        let mut tx = eip155_tx();
        tx.input = vec![0u8; 5];
        assert!(matches!(
            ctx.sign_transaction(&tx),
            Err(SignerError::EncodingOverflow(_))
        ));
    }

    #[test]
    fn test_v_tracks_chain_id() {
        let ctx = SigningContext::from_hex(EIP155_KEY).unwrap();
        for chain_id in [1u64, 5, 137, 11155111] {
            let mut tx = eip155_tx();
            tx.chain_id = chain_id;
            let signed = ctx.sign_transaction(&tx).unwrap();
            assert!(signed.v == chain_id * 2 + 35 || signed.v == chain_id * 2 + 36);
        }
    }

    #[test]
    fn test_with_call_data() {
        let ctx = SigningContext::from_hex(EIP155_KEY).unwrap();
        let mut tx = eip155_tx();
        tx.input = hex::decode("a9059cbb").unwrap();
        let signed = ctx.sign_transaction(&tx).unwrap();
        assert_eq!(signed.recover_sender().unwrap(), ctx.address());
        assert_ne!(signed.raw_transaction_hex(), EIP155_RAW);
    }

    #[test]
    fn test_one_shot_helper() {
        let key = PrivateKey::from_hex(EIP155_KEY).unwrap();
        let signed = sign_transaction(&eip155_tx(), &key).unwrap();
        assert_eq!(signed.raw_transaction_hex(), EIP155_RAW);
    }

    #[test]
    fn test_json_shape() {
        let ctx = SigningContext::from_hex(EIP155_KEY).unwrap();
        let signed = ctx.sign_transaction(&eip155_tx()).unwrap();
        let json = serde_json::to_value(&signed).unwrap();

        assert_eq!(json["rawTransaction"], EIP155_RAW);
        assert_eq!(json["to"], "0x3535353535353535353535353535353535353535");
        assert_eq!(json["input"], "0x");
        assert_eq!(json["v"], 37);
        assert_eq!(json["chainId"], 1);

        let back: SignedTransaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, signed);
    }

    #[test]
    fn test_signing_is_thread_safe() {
        let ctx = std::sync::Arc::new(SigningContext::from_hex(EIP155_KEY).unwrap());
        let handles: Vec<_> = (0..4u64)
            .map(|nonce| {
                let ctx = ctx.clone();
                std::thread::spawn(move || {
                    let mut tx = eip155_tx();
                    tx.nonce = nonce;
                    ctx.sign_transaction(&tx).unwrap()
                })
            })
            .collect();

        for (nonce, handle) in handles.into_iter().enumerate() {
            let signed = handle.join().unwrap();
            assert_eq!(signed.tx.nonce, nonce as u64);
            assert_eq!(signed.recover_sender().unwrap(), ctx.address());
        }
    }
}
