//! Coinbase spot price client.
//!
//! `GET {base_url}{crypto}-{fiat}/spot` with a `CB-VERSION` header. Coinbase
//! answers unknown pairs with a 4xx status and an `errors` body, so the body is
//! always parsed regardless of the status code.

use std::time::Duration;

use async_trait::async_trait;
use cryptoprice_core::config::PriceApiConfig;
use cryptoprice_core::{CurrencyPair, PriceLookupError, PriceQuote, PriceSource};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

pub const API_VERSION_HEADER: &str = "CB-VERSION";

#[derive(Clone, Debug)]
pub struct CoinbaseClient {
    client: Client,
    base_url: String,
    api_version: String,
}

#[derive(Debug, Deserialize)]
struct SpotPriceBody {
    data: Option<SpotPriceData>,
    errors: Option<Vec<ApiErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct SpotPriceData {
    amount: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl CoinbaseClient {
    pub fn new(
        base_url: &str,
        api_version: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: format!("{}/", base_url.trim().trim_end_matches('/')),
            api_version: api_version.into(),
        })
    }

    pub fn from_config(config: &PriceApiConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            &config.base_url,
            config.api_version.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn spot_url(&self, pair: CurrencyPair) -> String {
        format!("{}{}/spot", self.base_url, pair.code())
    }

    async fn fetch(&self, url: &str) -> Result<String, PriceLookupError> {
        let response = self
            .client
            .get(url)
            .header(API_VERSION_HEADER, &self.api_version)
            .send()
            .await
            .map_err(classify_transport_error)?;

        response.text().await.map_err(classify_transport_error)
    }
}

#[async_trait]
impl PriceSource for CoinbaseClient {
    async fn spot_price(&self, pair: CurrencyPair) -> Result<PriceQuote, PriceLookupError> {
        let url = self.spot_url(pair);
        debug!(event_name = "price.fetch.start", url = %url, "fetching spot price");

        let result = match self.fetch(&url).await {
            Ok(body) => parse_spot_price(pair, &body),
            Err(error) => Err(error),
        };

        match &result {
            Ok(quote) => info!(
                event_name = "price.fetch.succeeded",
                pair = %pair,
                amount = %quote.amount,
                "obtained spot price"
            ),
            Err(error) => warn!(
                event_name = "price.fetch.failed",
                pair = %pair,
                error = %error,
                "spot price lookup failed"
            ),
        }

        result
    }
}

fn classify_transport_error(error: reqwest::Error) -> PriceLookupError {
    if error.is_timeout() {
        PriceLookupError::Timeout
    } else {
        PriceLookupError::Transport(error.to_string())
    }
}

pub(crate) fn parse_spot_price(
    pair: CurrencyPair,
    body: &str,
) -> Result<PriceQuote, PriceLookupError> {
    let parsed: SpotPriceBody = serde_json::from_str(body).map_err(|error| {
        PriceLookupError::MalformedResponse(format!("response is not a price document: {error}"))
    })?;

    if let Some(errors) = parsed.errors.filter(|errors| !errors.is_empty()) {
        let messages = errors
            .into_iter()
            .map(|entry| match (entry.message, entry.id) {
                (Some(message), _) => message,
                (None, Some(id)) => id,
                (None, None) => "unknown error".to_owned(),
            })
            .collect();
        return Err(PriceLookupError::Remote(messages));
    }

    let amount = parsed.data.and_then(|data| data.amount).ok_or_else(|| {
        PriceLookupError::MalformedResponse("response is missing `data.amount`".to_owned())
    })?;

    PriceQuote::parse(pair, &amount)
}
