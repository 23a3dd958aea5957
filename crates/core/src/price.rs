use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::currency::CurrencyPair;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub pair: CurrencyPair,
    /// Amount exactly as the upstream rendered it, e.g. `"42000.12"`.
    pub amount: String,
}

impl PriceQuote {
    /// Builds a quote, rejecting amounts that are not plain decimal numbers.
    pub fn parse(pair: CurrencyPair, amount: &str) -> Result<Self, PriceLookupError> {
        Decimal::from_str(amount).map_err(|error| {
            PriceLookupError::MalformedResponse(format!(
                "amount `{amount}` is not a decimal: {error}"
            ))
        })?;
        Ok(Self { pair, amount: amount.to_owned() })
    }

    pub fn decimal(&self) -> Option<Decimal> {
        Decimal::from_str(&self.amount).ok()
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PriceLookupError {
    #[error("price source did not respond in time")]
    Timeout,
    #[error("price source reported: {}", .0.join("; "))]
    Remote(Vec<String>),
    #[error("malformed price response: {0}")]
    MalformedResponse(String),
    #[error("price request failed: {0}")]
    Transport(String),
}

impl PriceLookupError {
    /// Whether the user should be invited to simply ask again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Remote(_))
    }
}

#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn spot_price(&self, pair: CurrencyPair) -> Result<PriceQuote, PriceLookupError>;
}
