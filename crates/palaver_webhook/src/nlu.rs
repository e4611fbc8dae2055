//! Adapter for the NLU front-end envelope.

use std::{future::Future, sync::Arc};

use palaver_conversation::{
    Conversation, ConversationResponse, SESSION_DATA_CONTEXT, SESSION_DATA_LIFESPAN, session,
};
use palaver_wire::{
    AssistantPayload, EventInput, ResponsePayload, SystemIntent, WebhookRequest, WebhookResponse,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    TurnReply,
    app::AppCore,
    error::Result,
    router::{HandlerError, TurnArgs},
    verify::{IdentityVerifier, Verification},
};

/// A webhook app behind an NLU front-end. Session data rides the reserved
/// output context; the assistant response is nested in the payload block.
#[derive(Default)]
pub struct NluApp {
    core: AppCore,
}

impl NluApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an action or intent display name.
    #[must_use]
    pub fn intent<F, Fut>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Conversation, TurnArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Conversation, HandlerError>> + Send + 'static,
    {
        self.core.handlers.insert(name, handler);
        self
    }

    /// Fulfill `name` with the handler registered for `target`.
    #[must_use]
    pub fn redirect(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.core.handlers.redirect(name, target);
        self
    }

    /// Handler for intents with no registered handler.
    #[must_use]
    pub fn fallback<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Conversation, TurnArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Conversation, HandlerError>> + Send + 'static,
    {
        self.core.handlers.set_fallback(handler);
        self
    }

    /// Recover handler failures into a response instead of failing the turn.
    #[must_use]
    pub fn catch<F, Fut>(mut self, catcher: F) -> Self
    where
        F: Fn(Conversation, HandlerError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Conversation, HandlerError>> + Send + 'static,
    {
        self.core.handlers.set_catcher(catcher);
        self
    }

    /// Reject turns whose bearer token does not verify.
    #[must_use]
    pub fn verification(
        mut self,
        verification: Verification,
        verifier: Arc<dyn IdentityVerifier>,
    ) -> Self {
        self.core.verification = Some(verification);
        self.core.verifier = Some(verifier);
        self
    }

    /// Client ID for decoding user sign-in tokens.
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        self.core.client_id = Some(client_id.into());
        self.core.verifier = Some(verifier);
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.core.debug = debug;
        self
    }

    /// Process one turn from raw body bytes.
    pub async fn handle_bytes(&self, body: &[u8], token: Option<&str>) -> Result<TurnReply> {
        let body: WebhookRequest = serde_json::from_slice(body)?;
        self.handle(body, token).await
    }

    /// Process one turn: verify, construct, dispatch, finalize, serialize.
    pub async fn handle(&self, body: WebhookRequest, token: Option<&str>) -> Result<TurnReply> {
        if let Some(rejected) = self.core.reject_unverified(token).await {
            return Ok(rejected);
        }

        if self.core.debug {
            debug!(request = %serde_json::to_string(&body).unwrap_or_default(), "Turn request.");
        }

        let conv = Conversation::from_nlu(&body);
        let name = dispatch_name(&conv);
        let mut conv = self.core.run(conv, &name).await?;

        if let Some(raw) = conv.raw_response() {
            return Ok(TurnReply::ok(raw.clone()));
        }

        let response = conv.response()?;

        // Persist the session data through the reserved context before the
        // output view is serialized.
        let data = envelope(&conv.data);
        conv.contexts
            .set(SESSION_DATA_CONTEXT, SESSION_DATA_LIFESPAN, Some(data));

        let webhook_response = serialize(response, &conv);
        let reply = TurnReply::ok(serde_json::to_value(webhook_response)?);

        if self.core.debug {
            debug!(response = %reply.body, "Turn response.");
        }

        Ok(reply)
    }
}

/// Trigger a follow-up event instead of responding with a rich response.
pub fn followup(
    conv: &mut Conversation,
    event: impl Into<String>,
    parameters: Map<String, Value>,
    language: Option<String>,
) -> Result<()> {
    let response = WebhookResponse {
        followup_event_input: Some(EventInput {
            name: Some(event.into()),
            parameters,
            language_code: language.or_else(|| conv.language.clone()),
        }),
        ..WebhookResponse::default()
    };

    conv.set_raw_response(serde_json::to_value(response)?);
    Ok(())
}

/// Handlers are matched on the action name, falling back to the intent
/// display name for agents that leave actions unset.
fn dispatch_name(conv: &Conversation) -> String {
    if conv.action.is_empty() {
        conv.intent.clone()
    } else {
        conv.action.clone()
    }
}

fn envelope(data: &Map<String, Value>) -> Map<String, Value> {
    match session::to_value(data) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn serialize(response: ConversationResponse, conv: &Conversation) -> WebhookResponse {
    let ConversationResponse {
        rich_response,
        expect_user_response,
        user_storage,
        expected_intent,
        speech,
        ..
    } = response;

    let system_intent = expected_intent.map(|expected| SystemIntent {
        intent: expected.intent,
        data: expected.input_value_data,
    });

    WebhookResponse {
        fulfillment_text: speech,
        payload: Some(ResponsePayload {
            google: Some(AssistantPayload {
                expect_user_response: Some(expect_user_response),
                rich_response: Some(rich_response),
                system_intent,
                user_storage: Some(user_storage),
            }),
        }),
        output_contexts: conv.contexts.serialize(),
        ..WebhookResponse::default()
    }
}

#[cfg(test)]
#[path = "nlu_tests.rs"]
mod tests;
