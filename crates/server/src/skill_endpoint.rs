//! Voice platform webhook.
//!
//! Requests are accepted on `/` and `/skill`. A response envelope comes back
//! as `200`; session-ended and ignored requests come back as `204` with no
//! body. Aborted invocations map onto `403`/`400` through [`InterfaceError`].

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use cryptoprice_core::InterfaceError;
use cryptoprice_skill::{InvocationContext, RequestEnvelope, SkillDispatcher};
use serde::Serialize;
use tracing::warn;

#[derive(Clone)]
pub struct SkillState {
    dispatcher: Arc<SkillDispatcher>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    pub correlation_id: String,
}

pub fn router(dispatcher: Arc<SkillDispatcher>) -> Router {
    Router::new()
        .route("/", post(handle_skill_request))
        .route("/skill", post(handle_skill_request))
        .with_state(SkillState { dispatcher })
}

pub async fn handle_skill_request(
    State(state): State<SkillState>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Response, (StatusCode, Json<ErrorBody>)> {
    let ctx = InvocationContext::for_envelope(&envelope);

    match state.dispatcher.dispatch(&envelope, &ctx).await {
        Ok(result) => Ok(match result.into_response() {
            Some(response) => (StatusCode::OK, Json(response)).into_response(),
            None => StatusCode::NO_CONTENT.into_response(),
        }),
        Err(error) => {
            warn!(
                event_name = "system.skill_endpoint.rejected",
                correlation_id = %ctx.correlation_id,
                error = %error,
                "skill invocation aborted"
            );
            Err(error_response(error.into_interface(ctx.correlation_id)))
        }
    }
}

fn error_response(error: InterfaceError) -> (StatusCode, Json<ErrorBody>) {
    let (status, kind) = match &error {
        InterfaceError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "bad_request"),
        InterfaceError::Forbidden { .. } => (StatusCode::FORBIDDEN, "forbidden"),
    };

    (
        status,
        Json(ErrorBody {
            error: kind,
            message: error.user_message().to_owned(),
            correlation_id: error.correlation_id().to_owned(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use cryptoprice_core::{CurrencyPair, PriceLookupError, PriceQuote, PriceSource};
    use cryptoprice_skill::SkillDispatcher;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::router;

    const APP_ID: &str = "amzn1.ask.skill.crypto-price";

    struct TimedOut;

    #[async_trait]
    impl PriceSource for TimedOut {
        async fn spot_price(&self, _pair: CurrencyPair) -> Result<PriceQuote, PriceLookupError> {
            Err(PriceLookupError::Timeout)
        }
    }

    fn app() -> Router {
        router(Arc::new(SkillDispatcher::with_price_source(
            APP_ID.to_owned().into(),
            Arc::new(TimedOut),
        )))
    }

    fn envelope(application_id: &str, request: Value) -> Value {
        json!({
            "version": "1.0",
            "session": {
                "new": false,
                "sessionId": "SessionId.http",
                "application": { "applicationId": application_id }
            },
            "request": request
        })
    }

    async fn post(uri: &str, body: Value) -> (StatusCode, Option<Value>) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build");

        let response = app().oneshot(request).await.expect("router should respond");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body should read");
        (status, serde_json::from_slice(&bytes).ok())
    }

    #[tokio::test]
    async fn launch_returns_speech_envelope() {
        let (status, body) =
            post("/", envelope(APP_ID, json!({ "type": "LaunchRequest", "requestId": "r-1" })))
                .await;

        assert_eq!(status, StatusCode::OK);
        let body = body.expect("launch has a body");
        assert_eq!(body["version"], "1.0");
        assert_eq!(body["response"]["shouldEndSession"], false);
        assert_eq!(body["response"]["outputSpeech"]["type"], "PlainText");
    }

    #[tokio::test]
    async fn timeout_is_spoken_not_an_http_error() {
        let (status, body) = post(
            "/skill",
            envelope(
                APP_ID,
                json!({
                    "type": "IntentRequest",
                    "requestId": "r-2",
                    "intent": { "name": "GetPriceIntent", "slots": {} }
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body = body.expect("intent has a body");
        assert_eq!(
            body["response"]["outputSpeech"]["text"],
            "Coinbase did not respond with price data in time, please try again."
        );
        assert_eq!(body["response"]["shouldEndSession"], false);
    }

    #[tokio::test]
    async fn session_ended_returns_no_content() {
        let (status, body) = post(
            "/skill",
            envelope(
                APP_ID,
                json!({ "type": "SessionEndedRequest", "requestId": "r-3", "reason": "ERROR" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, None);
    }

    #[tokio::test]
    async fn foreign_application_id_is_forbidden() {
        let (status, body) = post(
            "/",
            envelope("amzn1.ask.skill.other", json!({ "type": "LaunchRequest", "requestId": "r-4" })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        let body = body.expect("error body");
        assert_eq!(body["error"], "forbidden");
        assert_eq!(body["correlation_id"], "r-4");
        assert!(!body.to_string().contains("amzn1.ask.skill.other"));
    }

    #[tokio::test]
    async fn unknown_intent_is_bad_request() {
        let (status, body) = post(
            "/",
            envelope(
                APP_ID,
                json!({
                    "type": "IntentRequest",
                    "requestId": "r-5",
                    "intent": { "name": "OrderPizzaIntent" }
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.expect("error body")["error"], "bad_request");
    }

    #[tokio::test]
    async fn malformed_envelope_is_rejected_by_extractor() {
        let (status, _) = post("/", json!({ "request": { "type": "LaunchRequest" } })).await;

        assert!(status.is_client_error());
    }
}
