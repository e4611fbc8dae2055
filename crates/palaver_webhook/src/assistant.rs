//! Adapter for the direct platform envelope.

use std::{future::Future, sync::Arc};

use palaver_conversation::{Conversation, ConversationResponse, intent, session};
use palaver_wire::{
    AppRequest, AppResponse, ExpectedInput, ExpectedIntent, FinalResponse, InputPrompt,
};
use tracing::debug;

use crate::{
    TurnReply,
    app::AppCore,
    error::Result,
    router::{HandlerError, TurnArgs},
    verify::{IdentityVerifier, Verification},
};

/// A webhook app speaking the direct platform envelope. Session data rides
/// the conversation token; user storage rides its own response field.
#[derive(Default)]
pub struct AssistantApp {
    core: AppCore,
}

impl AssistantApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an intent name.
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
        let body: AppRequest = serde_json::from_slice(body)?;
        self.handle(body, token).await
    }

    /// Process one turn: verify, construct, dispatch, finalize, serialize.
    pub async fn handle(&self, body: AppRequest, token: Option<&str>) -> Result<TurnReply> {
        if let Some(rejected) = self.core.reject_unverified(token).await {
            return Ok(rejected);
        }

        if self.core.debug {
            debug!(request = %serde_json::to_string(&body).unwrap_or_default(), "Turn request.");
        }

        let conv = Conversation::from_assistant(&body);
        let mut conv = self.core.run(conv, &body_intent(&body)).await?;

        if let Some(raw) = conv.raw_response() {
            return Ok(TurnReply::ok(raw.clone()));
        }

        let response = conv.response()?;
        let mut app_response = serialize(response);
        app_response.conversation_token = Some(session::save(&conv.data));

        let reply = TurnReply::ok(serde_json::to_value(app_response)?);

        if self.core.debug {
            debug!(response = %reply.body, "Turn response.");
        }

        Ok(reply)
    }
}

fn body_intent(body: &AppRequest) -> String {
    body.inputs
        .first()
        .and_then(|input| input.intent.clone())
        .unwrap_or_default()
}

/// Fold result to wire envelope: the rich response lands under
/// `expectedInputs` while the conversation continues and under
/// `finalResponse` once it closes.
fn serialize(response: ConversationResponse) -> AppResponse {
    let ConversationResponse {
        rich_response,
        expect_user_response,
        user_storage,
        expected_intent,
        no_input_prompts,
        ..
    } = response;

    let mut app_response = AppResponse {
        user_storage: Some(user_storage),
        expect_user_response: Some(expect_user_response),
        ..AppResponse::default()
    };

    if expect_user_response {
        // Without an explicit question, the platform should collect free
        // text next.
        let possible_intents = vec![expected_intent.unwrap_or(ExpectedIntent {
            intent: Some(intent::TEXT.to_owned()),
            input_value_data: None,
        })];

        app_response.expected_inputs = vec![ExpectedInput {
            input_prompt: Some(InputPrompt {
                rich_initial_prompt: Some(rich_response),
                no_input_prompts,
            }),
            possible_intents,
        }];
    } else {
        app_response.final_response = Some(FinalResponse {
            rich_response: Some(rich_response),
        });
    }

    app_response
}

#[cfg(test)]
#[path = "assistant_tests.rs"]
mod tests;
