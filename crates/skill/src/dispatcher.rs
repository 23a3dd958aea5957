use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use cryptoprice_core::{PriceSource, SkillError};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::{
    envelope::{RequestEnvelope, RequestType, SkillRequest},
    intents::IntentRouter,
    response::ResponseEnvelope,
    speech,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationContext {
    pub correlation_id: String,
}

impl InvocationContext {
    pub fn for_envelope(envelope: &RequestEnvelope) -> Self {
        let correlation_id = envelope
            .request
            .request_id()
            .map(str::to_owned)
            .unwrap_or_else(|| envelope.session.session_id.clone());
        Self { correlation_id }
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Responded(ResponseEnvelope),
    /// Handled, but the platform expects no response payload.
    Processed,
    Ignored,
}

impl HandlerResult {
    pub fn into_response(self) -> Option<ResponseEnvelope> {
        match self {
            Self::Responded(response) => Some(response),
            Self::Processed | Self::Ignored => None,
        }
    }
}

#[async_trait]
pub trait RequestHandler: Send + Sync {
    fn request_type(&self) -> RequestType;
    async fn handle(
        &self,
        envelope: &RequestEnvelope,
        ctx: &InvocationContext,
    ) -> Result<HandlerResult, SkillError>;
}

pub struct SkillDispatcher {
    application_id: SecretString,
    handlers: HashMap<RequestType, Arc<dyn RequestHandler>>,
}

impl SkillDispatcher {
    pub fn new(application_id: SecretString) -> Self {
        Self { application_id, handlers: HashMap::new() }
    }

    /// Dispatcher with the launch, intent and session-ended handlers wired to
    /// `price_source`.
    pub fn with_price_source(
        application_id: SecretString,
        price_source: Arc<dyn PriceSource>,
    ) -> Self {
        let mut dispatcher = Self::new(application_id);
        dispatcher.register(LaunchHandler);
        dispatcher.register(IntentHandler::new(IntentRouter::new(price_source)));
        dispatcher.register(SessionEndedHandler);
        dispatcher
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: RequestHandler + 'static,
    {
        self.handlers.insert(handler.request_type(), Arc::new(handler));
    }

    pub async fn dispatch(
        &self,
        envelope: &RequestEnvelope,
        ctx: &InvocationContext,
    ) -> Result<HandlerResult, SkillError> {
        let received = &envelope.session.application.application_id;
        if received != self.application_id.expose_secret() {
            warn!(
                event_name = "skill.dispatch.invalid_application_id",
                correlation_id = %ctx.correlation_id,
                application_id = %received,
                "rejecting request for foreign application id"
            );
            return Err(SkillError::InvalidApplicationId { received: received.clone() });
        }

        if envelope.session.new {
            on_session_started(envelope, ctx);
        }

        let request_type = envelope.request.request_type();
        let Some(handler) = self.handlers.get(&request_type) else {
            warn!(
                event_name = "skill.dispatch.ignored",
                correlation_id = %ctx.correlation_id,
                request_type = request_type.as_str(),
                "no handler registered for request type"
            );
            return Ok(HandlerResult::Ignored);
        };

        handler.handle(envelope, ctx).await
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

fn on_session_started(envelope: &RequestEnvelope, ctx: &InvocationContext) {
    info!(
        event_name = "skill.session.started",
        correlation_id = %ctx.correlation_id,
        session_id = %envelope.session.session_id,
        "session started"
    );
}

pub struct LaunchHandler;

#[async_trait]
impl RequestHandler for LaunchHandler {
    fn request_type(&self) -> RequestType {
        RequestType::Launch
    }

    async fn handle(
        &self,
        envelope: &RequestEnvelope,
        ctx: &InvocationContext,
    ) -> Result<HandlerResult, SkillError> {
        if !matches!(envelope.request, SkillRequest::LaunchRequest(_)) {
            return Ok(HandlerResult::Ignored);
        }

        info!(
            event_name = "skill.dispatch.launch",
            correlation_id = %ctx.correlation_id,
            session_id = %envelope.session.session_id,
            "launch request"
        );
        Ok(HandlerResult::Responded(speech::welcome()))
    }
}

pub struct IntentHandler {
    router: IntentRouter,
}

impl IntentHandler {
    pub fn new(router: IntentRouter) -> Self {
        Self { router }
    }
}

#[async_trait]
impl RequestHandler for IntentHandler {
    fn request_type(&self) -> RequestType {
        RequestType::Intent
    }

    async fn handle(
        &self,
        envelope: &RequestEnvelope,
        ctx: &InvocationContext,
    ) -> Result<HandlerResult, SkillError> {
        let SkillRequest::IntentRequest(request) = &envelope.request else {
            return Ok(HandlerResult::Ignored);
        };

        info!(
            event_name = "skill.dispatch.intent",
            correlation_id = %ctx.correlation_id,
            session_id = %envelope.session.session_id,
            intent = %request.intent.name,
            "intent request"
        );
        let response = self.router.route(&request.intent, ctx).await?;
        Ok(HandlerResult::Responded(response))
    }
}

/// The platform does not read a response to this event; nothing to clean up.
pub struct SessionEndedHandler;

#[async_trait]
impl RequestHandler for SessionEndedHandler {
    fn request_type(&self) -> RequestType {
        RequestType::SessionEnded
    }

    async fn handle(
        &self,
        envelope: &RequestEnvelope,
        ctx: &InvocationContext,
    ) -> Result<HandlerResult, SkillError> {
        let SkillRequest::SessionEndedRequest(request) = &envelope.request else {
            return Ok(HandlerResult::Ignored);
        };

        info!(
            event_name = "skill.session.ended",
            correlation_id = %ctx.correlation_id,
            session_id = %envelope.session.session_id,
            reason = request.reason.as_deref().unwrap_or("unspecified"),
            "session ended"
        );
        Ok(HandlerResult::Processed)
    }
}
