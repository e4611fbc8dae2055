use assert_matches::assert_matches;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::verify::{TokenClaims, VerifyError};

fn turn(intent: &str, query: &str) -> AppRequest {
    serde_json::from_value(json!({
        "conversation": {"conversationId": "c-1", "type": "ACTIVE"},
        "inputs": [{
            "intent": intent,
            "rawInputs": [{"query": query, "inputType": "VOICE"}],
        }],
    }))
    .unwrap()
}

struct AcceptAll;

#[async_trait]
impl IdentityVerifier for AcceptAll {
    async fn verify(&self, _: &str, _: &str) -> std::result::Result<TokenClaims, VerifyError> {
        Ok(json!({"email": "crab@example.com"}).as_object().cloned().unwrap())
    }
}

struct RejectAll;

#[async_trait]
impl IdentityVerifier for RejectAll {
    async fn verify(&self, _: &str, _: &str) -> std::result::Result<TokenClaims, VerifyError> {
        Err(VerifyError("expired".to_owned()))
    }
}

#[tokio::test]
async fn welcome_turn_expects_more_input() {
    let app = AssistantApp::new().intent("welcome", |mut conv: Conversation, _| async move {
        conv.ask("Hi there!")?.ask("Pick one")?;
        Ok(conv)
    });

    let reply = app.handle(turn("welcome", "talk to crab"), None).await.unwrap();

    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["expectUserResponse"], true);

    let items = &reply.body["expectedInputs"][0]["inputPrompt"]["richInitialPrompt"]["items"];
    assert_eq!(items[0]["simpleResponse"]["textToSpeech"], "Hi there!");
    assert_eq!(items[1]["simpleResponse"]["textToSpeech"], "Pick one");

    // Free text is the default expected intent when no question was asked.
    assert_eq!(
        reply.body["expectedInputs"][0]["possibleIntents"][0]["intent"],
        "actions.intent.TEXT",
    );
    assert_eq!(reply.body.get("finalResponse"), None);
}

#[tokio::test]
async fn closing_turn_uses_final_response() {
    let app = AssistantApp::new().intent("bye", |mut conv: Conversation, _| async move {
        conv.close("Goodbye!")?;
        Ok(conv)
    });

    let reply = app.handle(turn("bye", "bye"), None).await.unwrap();

    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["expectUserResponse"], false);
    assert_eq!(reply.body.get("expectedInputs"), None);
    assert_eq!(
        reply.body["finalResponse"]["richResponse"]["items"][0]["simpleResponse"]["textToSpeech"],
        "Goodbye!",
    );
}

#[tokio::test]
async fn session_data_round_trips_through_the_token() {
    let app = AssistantApp::new().intent("count", |mut conv: Conversation, _| async move {
        let count = conv.data.get("count").and_then(|count| count.as_i64()).unwrap_or(0);
        conv.data.insert("count".to_owned(), json!(count + 1));
        conv.ask(format!("Turn {}", count + 1))?;
        Ok(conv)
    });

    let mut body = turn("count", "again");
    body.conversation.as_mut().unwrap().conversation_token =
        Some(r#"{"data":{"count":2}}"#.to_owned());

    let reply = app.handle(body, None).await.unwrap();

    assert_eq!(reply.body["conversationToken"], r#"{"data":{"count":3}}"#);
}

#[tokio::test]
async fn untouched_session_serializes_canonically() {
    let app = AssistantApp::new().intent("welcome", |mut conv: Conversation, _| async move {
        conv.ask("Hi")?;
        Ok(conv)
    });

    let reply = app.handle(turn("welcome", "hi"), None).await.unwrap();

    assert_eq!(reply.body["conversationToken"], r#"{"data":{}}"#);
    assert_eq!(reply.body["userStorage"], r#"{"data":{}}"#);
}

#[tokio::test]
async fn question_becomes_the_expected_intent() {
    let app = AssistantApp::new().intent("confirm", |mut conv: Conversation, _| async move {
        conv.ask(palaver_conversation::Question::confirmation("Sure?"))?;
        Ok(conv)
    });

    let reply = app.handle(turn("confirm", "do it"), None).await.unwrap();
    let possible = &reply.body["expectedInputs"][0]["possibleIntents"][0];

    assert_eq!(possible["intent"], "actions.intent.CONFIRMATION");
    assert_eq!(
        possible["inputValueData"]["@type"],
        "type.googleapis.com/google.actions.v2.ConfirmationValueSpec",
    );
}

#[tokio::test]
async fn verification_failure_short_circuits() {
    let app = AssistantApp::new()
        .intent("welcome", |conv: Conversation, _| async move { Ok(conv) })
        .verification(
            Verification::new("project-1").with_error("go away".to_owned()),
            std::sync::Arc::new(RejectAll),
        );

    let reply = app.handle(turn("welcome", "hi"), Some("bad-token")).await.unwrap();

    assert_eq!(reply.status, 403);
    assert_eq!(reply.body, json!({"error": "go away"}));
}

#[tokio::test]
async fn verification_passes_through_to_the_handler() {
    let app = AssistantApp::new()
        .intent("welcome", |mut conv: Conversation, _| async move {
            conv.ask("Hi")?;
            Ok(conv)
        })
        .verification(Verification::new("project-1"), std::sync::Arc::new(AcceptAll));

    let reply = app.handle(turn("welcome", "hi"), Some("good-token")).await.unwrap();

    assert_eq!(reply.status, 200);
}

#[tokio::test]
async fn missing_token_is_rejected_with_configured_status() {
    let app = AssistantApp::new()
        .intent("welcome", |conv: Conversation, _| async move { Ok(conv) })
        .verification(
            Verification::new("project-1").with_status(401),
            std::sync::Arc::new(AcceptAll),
        );

    let reply = app.handle(turn("welcome", "hi"), None).await.unwrap();

    assert_eq!(reply.status, 401);
}

#[tokio::test]
async fn sign_in_token_attaches_the_profile() {
    let app = AssistantApp::new()
        .intent("welcome", |mut conv: Conversation, _| async move {
            let email = conv.user.email.clone().unwrap_or_default();
            conv.ask(format!("Hello {email}"))?;
            Ok(conv)
        })
        .client_id("client-1", std::sync::Arc::new(AcceptAll));

    let mut body = turn("welcome", "hi");
    body.user = Some(palaver_wire::User {
        id_token: Some("signin-token".to_owned()),
        ..palaver_wire::User::default()
    });

    let reply = app.handle(body, None).await.unwrap();
    let items = &reply.body["expectedInputs"][0]["inputPrompt"]["richInitialPrompt"]["items"];

    assert_eq!(items[0]["simpleResponse"]["textToSpeech"], "Hello crab@example.com");
}

#[tokio::test]
async fn unknown_intent_without_fallback_fails_the_turn() {
    let app = AssistantApp::new().intent("welcome", |conv: Conversation, _| async move {
        Ok(conv)
    });

    let result = app.handle(turn("other", "hm"), None).await;

    assert_matches!(result, Err(crate::Error::HandlerNotFound(intent)) if intent == "other");
}
