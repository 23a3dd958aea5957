use std::sync::Arc;

use cryptoprice_core::{CurrencyPair, PriceSource, SkillError};
use tracing::{info, warn};

use crate::{
    dispatcher::InvocationContext,
    envelope::Intent,
    response::ResponseEnvelope,
    speech,
};

pub const GET_PRICE_INTENT: &str = "GetPriceIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";

pub const CRYPTOCURRENCY_SLOT: &str = "cryptocurrency";
pub const FIAT_CURRENCY_SLOT: &str = "fiat_currency";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkillIntent {
    GetPrice { cryptocurrency: Option<String>, fiat_currency: Option<String> },
    Help,
    Cancel,
    Stop,
    Unknown { name: String },
}

pub fn classify_intent(intent: &Intent) -> SkillIntent {
    match intent.name.as_str() {
        GET_PRICE_INTENT => SkillIntent::GetPrice {
            cryptocurrency: intent.slot_value(CRYPTOCURRENCY_SLOT).map(str::to_owned),
            fiat_currency: intent.slot_value(FIAT_CURRENCY_SLOT).map(str::to_owned),
        },
        HELP_INTENT => SkillIntent::Help,
        CANCEL_INTENT => SkillIntent::Cancel,
        STOP_INTENT => SkillIntent::Stop,
        other => SkillIntent::Unknown { name: other.to_owned() },
    }
}

pub struct IntentRouter {
    price_source: Arc<dyn PriceSource>,
}

impl IntentRouter {
    pub fn new(price_source: Arc<dyn PriceSource>) -> Self {
        Self { price_source }
    }

    pub async fn route(
        &self,
        intent: &Intent,
        ctx: &InvocationContext,
    ) -> Result<ResponseEnvelope, SkillError> {
        match classify_intent(intent) {
            SkillIntent::GetPrice { cryptocurrency, fiat_currency } => Ok(self
                .get_price(cryptocurrency.as_deref(), fiat_currency.as_deref(), ctx)
                .await),
            SkillIntent::Help => Ok(speech::welcome()),
            SkillIntent::Cancel | SkillIntent::Stop => Ok(speech::goodbye()),
            SkillIntent::Unknown { name } => Err(SkillError::UnrecognizedIntent(name)),
        }
    }

    async fn get_price(
        &self,
        cryptocurrency: Option<&str>,
        fiat_currency: Option<&str>,
        ctx: &InvocationContext,
    ) -> ResponseEnvelope {
        let pair = match CurrencyPair::resolve(cryptocurrency, fiat_currency) {
            Ok(pair) => pair,
            Err(error) => {
                info!(
                    event_name = "skill.price.unrecognized_currency",
                    correlation_id = %ctx.correlation_id,
                    error = %error,
                    "asking user to repeat currency"
                );
                return speech::unrecognized_currency(&error);
            }
        };

        match self.price_source.spot_price(pair).await {
            Ok(quote) => speech::spot_price(&quote),
            Err(error) => {
                warn!(
                    event_name = "skill.price.lookup_failed",
                    correlation_id = %ctx.correlation_id,
                    pair = %pair,
                    retryable = error.is_retryable(),
                    error = %error,
                    "price lookup failed"
                );
                speech::lookup_failed(&error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use cryptoprice_core::{
        Cryptocurrency, CurrencyPair, FiatCurrency, PriceLookupError, PriceQuote, PriceSource,
        SkillError,
    };

    use super::{classify_intent, IntentRouter, SkillIntent};
    use crate::dispatcher::InvocationContext;
    use crate::envelope::{Intent, Slot};
    use crate::speech;

    struct ScriptedSource {
        result: Result<String, PriceLookupError>,
        calls: Mutex<Vec<CurrencyPair>>,
    }

    impl ScriptedSource {
        fn new(result: Result<&str, PriceLookupError>) -> Arc<Self> {
            Arc::new(Self { result: result.map(str::to_owned), calls: Mutex::new(Vec::new()) })
        }

        fn calls(&self) -> Vec<CurrencyPair> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl PriceSource for ScriptedSource {
        async fn spot_price(&self, pair: CurrencyPair) -> Result<PriceQuote, PriceLookupError> {
            self.calls.lock().expect("calls lock").push(pair);
            match &self.result {
                Ok(amount) => PriceQuote::parse(pair, amount),
                Err(error) => Err(error.clone()),
            }
        }
    }

    fn price_intent(crypto: Option<&str>, fiat: Option<&str>) -> Intent {
        let mut slots = HashMap::new();
        slots.insert(
            "cryptocurrency".to_owned(),
            Slot { name: Some("cryptocurrency".to_owned()), value: crypto.map(str::to_owned) },
        );
        slots.insert(
            "fiat_currency".to_owned(),
            Slot { name: Some("fiat_currency".to_owned()), value: fiat.map(str::to_owned) },
        );
        Intent { name: "GetPriceIntent".to_owned(), slots }
    }

    fn ctx() -> InvocationContext {
        InvocationContext { correlation_id: "req-test".to_owned() }
    }

    #[test]
    fn classifies_builtin_and_custom_intents() {
        let named = |name: &str| Intent { name: name.to_owned(), slots: HashMap::new() };

        assert_eq!(classify_intent(&named("AMAZON.HelpIntent")), SkillIntent::Help);
        assert_eq!(classify_intent(&named("AMAZON.CancelIntent")), SkillIntent::Cancel);
        assert_eq!(classify_intent(&named("AMAZON.StopIntent")), SkillIntent::Stop);
        assert_eq!(
            classify_intent(&named("GetPriceIntent")),
            SkillIntent::GetPrice { cryptocurrency: None, fiat_currency: None }
        );
        assert_eq!(
            classify_intent(&named("getpriceintent")),
            SkillIntent::Unknown { name: "getpriceintent".to_owned() }
        );
    }

    #[tokio::test]
    async fn successful_lookup_speaks_price() {
        let source = ScriptedSource::new(Ok("42000.12"));
        let router = IntentRouter::new(source.clone());

        let response =
            router.route(&price_intent(Some("Bitcoin"), Some("usd")), &ctx()).await.expect("ok");

        let speech = response.speech_text();
        assert!(speech.contains("bitcoin"));
        assert!(speech.contains("42000.12"));
        assert!(speech.contains("USD"));
        assert!(response.should_end_session());
        assert_eq!(source.calls(), vec![CurrencyPair::default()]);
    }

    #[tokio::test]
    async fn absent_slot_values_use_defaults() {
        let source = ScriptedSource::new(Ok("3000"));
        let router = IntentRouter::new(source.clone());

        router.route(&price_intent(None, Some("Euros")), &ctx()).await.expect("ok");

        assert_eq!(
            source.calls(),
            vec![CurrencyPair::new(Cryptocurrency::Bitcoin, FiatCurrency::Euro)]
        );
    }

    #[tokio::test]
    async fn unrecognized_cryptocurrency_skips_fetch_and_keeps_session_open() {
        let source = ScriptedSource::new(Ok("1"));
        let router = IntentRouter::new(source.clone());

        let response =
            router.route(&price_intent(Some("dogecoin"), None), &ctx()).await.expect("ok");

        assert!(!response.should_end_session());
        assert_eq!(response.speech_text(), speech::UNRECOGNIZED_CRYPTOCURRENCY_SPEECH);
        let reprompt = response.response.reprompt_text();
        assert!(reprompt.contains("bitcoin"));
        assert!(reprompt.contains("litecoin"));
        assert!(reprompt.contains("ether"));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn unrecognized_fiat_skips_fetch_and_keeps_session_open() {
        let source = ScriptedSource::new(Ok("1"));
        let router = IntentRouter::new(source.clone());

        let response =
            router.route(&price_intent(Some("ltc"), Some("yen")), &ctx()).await.expect("ok");

        assert!(!response.should_end_session());
        assert_eq!(response.speech_text(), speech::UNRECOGNIZED_FIAT_SPEECH);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn timeout_produces_fixed_retry_message() {
        let router = IntentRouter::new(ScriptedSource::new(Err(PriceLookupError::Timeout)));

        let response = router.route(&price_intent(None, None), &ctx()).await.expect("ok");

        assert_eq!(response.speech_text(), speech::TIMEOUT_SPEECH);
        assert!(!response.should_end_session());
    }

    #[tokio::test]
    async fn remote_error_text_is_spoken() {
        let router = IntentRouter::new(ScriptedSource::new(Err(PriceLookupError::Remote(vec![
            "invalid currency pair".to_owned(),
        ]))));

        let response =
            router.route(&price_intent(Some("eth"), Some("gbp")), &ctx()).await.expect("ok");

        assert!(response.speech_text().contains("invalid currency pair"));
        assert!(!response.should_end_session());
    }

    #[tokio::test]
    async fn malformed_upstream_ends_session_with_generic_failure() {
        let router = IntentRouter::new(ScriptedSource::new(Err(
            PriceLookupError::MalformedResponse("missing data.amount".to_owned()),
        )));

        let response = router.route(&price_intent(None, None), &ctx()).await.expect("ok");

        assert_eq!(response.speech_text(), speech::LOOKUP_FAILED_SPEECH);
        assert!(response.should_end_session());
    }

    #[tokio::test]
    async fn stop_and_cancel_end_the_session() {
        let router = IntentRouter::new(ScriptedSource::new(Ok("1")));
        for name in ["AMAZON.StopIntent", "AMAZON.CancelIntent"] {
            let intent = Intent { name: name.to_owned(), slots: HashMap::new() };
            let response = router.route(&intent, &ctx()).await.expect("ok");
            assert_eq!(response.speech_text(), speech::GOODBYE_SPEECH);
            assert!(response.should_end_session());
        }
    }

    #[tokio::test]
    async fn unknown_intent_is_an_error_not_speech() {
        let router = IntentRouter::new(ScriptedSource::new(Ok("1")));
        let intent = Intent { name: "OrderPizzaIntent".to_owned(), slots: HashMap::new() };

        let result = router.route(&intent, &ctx()).await;

        assert_eq!(result, Err(SkillError::UnrecognizedIntent("OrderPizzaIntent".to_owned())));
    }
}
