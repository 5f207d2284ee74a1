//! JSON-RPC client for the marketplace contract
//!
//! The server functions reach the chain through this handle and nothing
//! else. Reads go through `eth_call`, the two state-changing operations go
//! through `eth_sendTransaction` and come back as a transaction hash; the
//! node's wallet does the signing. Receipt tracking is out of scope, callers
//! only learn that the transaction was accepted.

#![cfg(feature = "server")]

use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{Address, U256, hex};
use serde_json::{Value, json};

use crate::abi::{self, Token};
use crate::market::{Product, PublishRequest};

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("rpc response carries no result")]
    MissingResult,
    #[error("rpc result has an unexpected shape")]
    BadResult,
    #[error("return data is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("could not decode return data: {0}")]
    Abi(#[from] abi::AbiError),
    #[error("amount is not a decimal integer: {0}")]
    BadAmount(String),
    #[error("numeric field does not fit in 64 bits")]
    Overflow,
    #[error("order value overflows uint256")]
    ValueOverflow,
}

/// Where the contract lives and who signs for the storefront.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub contract: Address,
    pub account: Address,
}

/// Client handle for the marketplace contract.
pub struct Marketplace {
    config: ChainConfig,
    http: reqwest::Client,
    next_request_id: AtomicU64,
}

impl Marketplace {
    pub fn new(config: ChainConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            next_request_id: AtomicU64::new(1),
        }
    }

    fn rpc_body(&self, method: &str, params: Value) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": self.next_request_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        })
    }

    /// Transaction parameter object for `eth_sendTransaction`.
    fn tx_object(&self, data: &[u8], value: Option<U256>) -> Value {
        let mut tx = json!({
            "from": self.config.account.to_string(),
            "to": self.config.contract.to_string(),
            "data": format!("0x{}", hex::encode(data)),
        });
        if let Some(value) = value {
            tx["value"] = json!(format!("0x{value:x}"));
        }
        tx
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let body = self.rpc_body(method, params);
        log::debug!("{} -> {}", method, self.config.rpc_url);
        let response: Value = self
            .http
            .post(&self.config.rpc_url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown rpc error")
                .to_string();
            log::error!("{} failed with rpc error {}: {}", method, code, message);
            return Err(ChainError::Rpc { code, message });
        }
        response.get("result").cloned().ok_or(ChainError::MissingResult)
    }

    /// Read-only contract call, returns the raw return data.
    async fn call(&self, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let params = json!([
            {
                "to": self.config.contract.to_string(),
                "data": format!("0x{}", hex::encode(&data)),
            },
            "latest",
        ]);
        let result = self.rpc("eth_call", params).await?;
        let text = result.as_str().ok_or(ChainError::BadResult)?;
        Ok(hex::decode(text.trim_start_matches("0x"))?)
    }

    /// State-changing contract call, returns the transaction hash.
    async fn send(&self, data: Vec<u8>, value: Option<U256>) -> Result<String, ChainError> {
        let params = json!([self.tx_object(&data, value)]);
        let result = self.rpc("eth_sendTransaction", params).await?;
        result.as_str().map(str::to_string).ok_or(ChainError::BadResult)
    }

    /// Submits `publishProduct(title, description, priceWei, imageUrl)`.
    pub async fn publish_product(&self, request: &PublishRequest) -> Result<String, ChainError> {
        let price = U256::from_str_radix(&request.price_wei, 10)
            .map_err(|e| ChainError::BadAmount(e.to_string()))?;
        let data = abi::encode_call(
            "publishProduct(string,string,uint256,string)",
            &[
                Token::Str(request.title.clone()),
                Token::Str(request.description.clone()),
                Token::Uint(price),
                Token::Str(request.image.clone()),
            ],
        );
        let hash = self.send(data, None).await?;
        log::info!("published '{}' in tx {}", request.title, hash);
        Ok(hash)
    }

    /// Number of products the contract has ever listed.
    pub async fn product_count(&self) -> Result<u64, ChainError> {
        let raw = self.call(abi::encode_call("productCount()", &[])).await?;
        let count = abi::decode_uint(&raw, 0)?;
        u64::try_from(count).map_err(|_| ChainError::Overflow)
    }

    /// Reads one listing through the `getProduct(uint256)` getter.
    pub async fn product(&self, id: u64) -> Result<Product, ChainError> {
        let data = abi::encode_call("getProduct(uint256)", &[Token::Uint(U256::from(id))]);
        let raw = self.call(data).await?;
        decode_product(id, &raw)
    }

    /// Reads the full listing. A product that fails to decode is skipped and
    /// logged rather than taking the whole page down with it.
    pub async fn products(&self) -> Result<Vec<Product>, ChainError> {
        let count = self.product_count().await?;
        let mut products = Vec::with_capacity(count as usize);
        for id in 0..count {
            match self.product(id).await {
                Ok(product) => products.push(product),
                Err(e) => log::warn!("skipping product {}: {}", id, e),
            }
        }
        Ok(products)
    }

    /// Submits `buyProduct(id, quantity)` with the order total attached as
    /// the transaction value. The unit price is re-read from the chain, never
    /// taken from the client.
    pub async fn buy_product(&self, id: u64, quantity: u64) -> Result<String, ChainError> {
        let listed = self.product(id).await?;
        let price = U256::from_str_radix(&listed.price_wei, 10)
            .map_err(|e| ChainError::BadAmount(e.to_string()))?;
        let total = price
            .checked_mul(U256::from(quantity))
            .ok_or(ChainError::ValueOverflow)?;
        let data = abi::encode_call(
            "buyProduct(uint256,uint256)",
            &[Token::Uint(U256::from(id)), Token::Uint(U256::from(quantity))],
        );
        let hash = self.send(data, Some(total)).await?;
        log::info!("bought {} x product {} in tx {}", quantity, id, hash);
        Ok(hash)
    }
}

/// Maps the `(title, description, priceWei, quantity, imageUrl)` return
/// tuple of `getProduct` onto the domain type.
fn decode_product(id: u64, raw: &[u8]) -> Result<Product, ChainError> {
    let price_wei = abi::decode_uint(raw, 2)?;
    let quantity = abi::decode_uint(raw, 3)?;
    Ok(Product {
        id,
        title: abi::decode_string(raw, 0)?,
        description: abi::decode_string(raw, 1)?,
        price: crate::wallet::from_wei(price_wei),
        price_wei: price_wei.to_string(),
        quantity: u64::try_from(quantity).map_err(|_| ChainError::Overflow)?,
        image: abi::decode_string(raw, 4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const ACCOUNT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn test_market() -> Marketplace {
        Marketplace::new(ChainConfig {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            contract: CONTRACT.parse().unwrap(),
            account: ACCOUNT.parse().unwrap(),
        })
    }

    #[test]
    fn test_rpc_body_shape() {
        let market = test_market();
        let body = market.rpc_body("eth_call", json!([]));
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["method"], "eth_call");
        assert_eq!(body["id"], 1);
        // ids keep counting up per handle
        assert_eq!(market.rpc_body("eth_call", json!([]))["id"], 2);
    }

    #[test]
    fn test_tx_object_without_value() {
        let market = test_market();
        let tx = market.tx_object(&[0xab, 0xcd], None);
        assert_eq!(tx["from"], ACCOUNT);
        assert_eq!(tx["to"], CONTRACT);
        assert_eq!(tx["data"], "0xabcd");
        assert!(tx.get("value").is_none());
    }

    #[test]
    fn test_tx_object_value_is_hex_quantity() {
        let market = test_market();
        let tx = market.tx_object(&[], Some(U256::from(1_500_000_000_000_000_000u64)));
        assert_eq!(tx["value"], "0x14d1120d7b160000");
    }

    #[test]
    fn test_decode_product_from_getter_tuple() {
        // (title, description, priceWei, quantity, imageUrl) built by hand:
        // five head words, then the three string tails in slot order
        let title = "Mug";
        let description = "Blue ceramic\nDishwasher safe";
        let image = "https://img.example/mug.png";

        let mut raw = Vec::new();
        raw.extend_from_slice(&U256::from(160u64).to_be_bytes::<32>());
        raw.extend_from_slice(&U256::from(224u64).to_be_bytes::<32>());
        raw.extend_from_slice(&U256::from(1_500_000_000_000_000_000u64).to_be_bytes::<32>());
        raw.extend_from_slice(&U256::from(3u64).to_be_bytes::<32>());
        raw.extend_from_slice(&U256::from(288u64).to_be_bytes::<32>());
        for text in [title, description, image] {
            raw.extend_from_slice(&U256::from(text.len()).to_be_bytes::<32>());
            raw.extend_from_slice(text.as_bytes());
            raw.extend(std::iter::repeat(0u8).take((32 - text.len() % 32) % 32));
        }

        let product = decode_product(7, &raw).unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.title, "Mug");
        assert_eq!(product.description, description);
        assert_eq!(product.price, "1.5");
        assert_eq!(product.price_wei, "1500000000000000000");
        assert_eq!(product.quantity, 3);
        assert_eq!(product.image, image);
    }

    #[test]
    fn test_decode_product_truncated_data() {
        assert!(decode_product(0, &[]).is_err());
    }
}
