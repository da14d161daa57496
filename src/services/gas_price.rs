//! Gas price lookup.
//!
//! Polygon chains publish recommended prices on a gas station feed; other
//! chains, and any feed failure, fall back to the node's `eth_gasPrice`.

use std::time::Duration;

use rust_decimal::{
    prelude::{FromPrimitive, ToPrimitive},
    Decimal,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::{AppError, Result},
    ethereum::EthereumClient,
};

/// Wei per gwei.
const WEI_PER_GWEI: u64 = 1_000_000_000;

/// Gas station response. Prices are in gwei.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPriceFeedResponse {
    pub safe_low: Option<f64>,
    pub standard: Option<f64>,
    pub fast: Option<f64>,
    pub fastest: Option<f64>,
    pub block_time: Option<f64>,
    pub block_number: Option<u64>,
}

impl GasPriceFeedResponse {
    /// Price in wei for the requested priority, if the feed provided it.
    pub fn price_wei(&self, fastest: bool) -> Option<Result<u128>> {
        let gwei = if fastest { self.fastest } else { self.fast }?;
        Some(gwei_to_wei(gwei, fastest))
    }
}

/// Convert a feed price in gwei to wei, adding the premium for `fastest`.
///
/// The price is taken at its shortest decimal form, so `33.3` gwei is
/// exactly `33300000000` wei.
pub fn gwei_to_wei(gwei: f64, fastest: bool) -> Result<u128> {
    let mut price = Decimal::from_f64(gwei)
        .filter(|price| !price.is_sign_negative())
        .ok_or_else(|| AppError::Parse(format!("Invalid gas price: {gwei}")))?;

    if fastest {
        price = price
            .checked_mul(Decimal::new(12, 1))
            .ok_or_else(|| AppError::NumericOverflow(format!("gas price {gwei} gwei")))?;
    }

    price
        .checked_mul(Decimal::from(WEI_PER_GWEI))
        .and_then(|wei| wei.trunc().to_u128())
        .ok_or_else(|| AppError::NumericOverflow(format!("gas price {gwei} gwei")))
}

/// Service returning the gas price to use for a chain's transactions.
#[derive(Clone)]
pub struct GasPriceService {
    client: reqwest::Client,
}

impl GasPriceService {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Gas price in wei, from `feed_url` when given, else from the node.
    ///
    /// `fastest` selects the highest feed priority plus a premium.
    pub async fn get_gas_price(
        &self,
        feed_url: Option<&str>,
        node: &EthereumClient,
        fastest: bool,
    ) -> Result<u128> {
        if let Some(feed_url) = feed_url {
            match self.fetch_feed(feed_url).await {
                Ok(response) => match response.price_wei(fastest) {
                    Some(Ok(price)) => {
                        debug!(feed_url, gas_price = price, fastest, "Gas price from feed");
                        return Ok(price);
                    }
                    Some(Err(e)) => warn!(feed_url, error = %e, "Unusable gas price from feed"),
                    None => warn!(feed_url, fastest, "Gas price feed missing price"),
                },
                Err(e) => warn!(feed_url, error = %e, "Failed to fetch gas price feed"),
            }
        }

        let price = node.get_gas_price().await?;
        debug!(rpc_url = %node.rpc_url(), gas_price = price, "Gas price from node");
        Ok(price)
    }

    async fn fetch_feed(&self, url: &str) -> Result<GasPriceFeedResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to fetch gas price: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Transport(format!(
                "Gas price feed returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Failed to parse gas price feed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_price_in_wei() {
        assert_eq!(gwei_to_wei(30.5, false).unwrap(), 30_500_000_000);
        assert_eq!(gwei_to_wei(1.0, false).unwrap(), 1_000_000_000);
    }

    #[test]
    fn test_fastest_adds_premium() {
        assert_eq!(gwei_to_wei(10.0, true).unwrap(), 12_000_000_000);
    }

    #[test]
    fn test_prices_inexact_in_binary_convert_exactly() {
        assert_eq!(gwei_to_wei(33.3, false).unwrap(), 33_300_000_000);
        assert_eq!(gwei_to_wei(29.7, false).unwrap(), 29_700_000_000);
        assert_eq!(gwei_to_wei(29.7, true).unwrap(), 35_640_000_000);
    }

    #[test]
    fn test_fraction_of_a_wei_is_truncated() {
        assert_eq!(gwei_to_wei(0.0000000015, false).unwrap(), 1);
    }

    #[test]
    fn test_negative_and_nan_are_rejected() {
        assert!(matches!(gwei_to_wei(-1.0, false), Err(AppError::Parse(_))));
        assert!(matches!(gwei_to_wei(f64::NAN, false), Err(AppError::Parse(_))));
    }

    #[test]
    fn test_feed_response_parses() {
        let json = r#"{
            "safeLow": 1.0,
            "standard": 2.0,
            "fast": 5.0,
            "fastest": 10.0,
            "blockTime": 2,
            "blockNumber": 19551242
        }"#;

        let response: GasPriceFeedResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.safe_low, Some(1.0));
        assert_eq!(response.block_number, Some(19_551_242));
        assert_eq!(response.price_wei(false).unwrap().unwrap(), 5_000_000_000);
        assert_eq!(response.price_wei(true).unwrap().unwrap(), 12_000_000_000);
    }

    #[test]
    fn test_feed_response_missing_fields() {
        let response: GasPriceFeedResponse = serde_json::from_str(r#"{"standard": 3}"#).unwrap();
        assert!(response.price_wei(false).is_none());
        assert!(response.price_wei(true).is_none());
    }

    #[tokio::test]
    async fn test_falls_back_to_node_without_feed() {
        // Nothing listens on the node URL
        let service = GasPriceService::new().unwrap();
        let node = EthereumClient::new("http://127.0.0.1:1").unwrap();

        let result = service.get_gas_price(None, &node, false).await;

        assert!(matches!(result, Err(AppError::Transport(_))));
    }

    #[tokio::test]
    async fn test_unreachable_feed_falls_back_to_node() {
        let service = GasPriceService::new().unwrap();
        let node = EthereumClient::new("http://127.0.0.1:1").unwrap();

        // The feed error is logged; the node error is what surfaces
        let result = service.get_gas_price(Some("http://127.0.0.1:2"), &node, true).await;

        assert!(matches!(result, Err(AppError::Transport(_))));
    }
}
