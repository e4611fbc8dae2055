use assert_matches::assert_matches;
use palaver_wire::Suggestion;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::fragment::{Question, Suggestions};

fn app_request(json: serde_json::Value) -> wire::AppRequest {
    serde_json::from_value(json).unwrap()
}

fn webhook_request(json: serde_json::Value) -> wire::WebhookRequest {
    serde_json::from_value(json).unwrap()
}

#[test]
fn response_without_fragments_fails() {
    let mut conv = Conversation::new();

    assert_matches!(conv.response(), Err(Error::NoResponse));
}

#[test]
fn response_twice_fails() {
    let mut conv = Conversation::new();
    conv.ask("Hi there!").unwrap();

    conv.response().unwrap();
    assert_matches!(conv.response(), Err(Error::AlreadyDigested));
}

#[test]
fn add_after_digest_fails() {
    let mut conv = Conversation::new();
    conv.close("Goodbye!").unwrap();
    conv.response().unwrap();

    assert_matches!(conv.add("too late"), Err(Error::AlreadyDigested));
    assert_matches!(conv.ask("too late"), Err(Error::AlreadyDigested));
}

#[test]
fn ask_keeps_session_open_in_fragment_order() {
    let mut conv = Conversation::new();
    conv.ask("Hi there!").unwrap();
    conv.ask("Pick one").unwrap();

    let response = conv.response().unwrap();

    assert!(response.expect_user_response);
    assert_eq!(response.rich_response.texts(), ["Hi there!", "Pick one"]);
    assert_eq!(response.speech.as_deref(), Some("Hi there!  Pick one"));
}

#[test]
fn close_ends_the_session() {
    let mut conv = Conversation::new();
    conv.close("Goodbye!").unwrap();

    let response = conv.response().unwrap();

    assert!(!response.expect_user_response);
    assert_eq!(response.rich_response.texts(), ["Goodbye!"]);
}

#[test]
fn chained_calls_accumulate() {
    let mut conv = Conversation::new();
    conv.ask("One").unwrap().ask("Two").unwrap();

    let response = conv.response().unwrap();
    assert_eq!(response.rich_response.texts(), ["One", "Two"]);
}

#[test]
fn first_question_wins() {
    let mut conv = Conversation::new();
    conv.ask("Are you sure?").unwrap();
    conv.ask(Question::confirmation("Really?")).unwrap();
    conv.ask(Question::sign_in(None)).unwrap();

    let response = conv.response().unwrap();
    let expected = response.expected_intent.unwrap();

    assert_eq!(expected.intent.as_deref(), Some(crate::intent::CONFIRMATION));
}

#[test]
fn solo_question_injects_placeholder() {
    let mut conv = Conversation::new();
    conv.ask(Question::sign_in(None)).unwrap();

    let response = conv.response().unwrap();

    assert_eq!(response.rich_response.texts(), ["PLACEHOLDER"]);
    assert_eq!(
        response.expected_intent.unwrap().intent.as_deref(),
        Some(crate::intent::SIGN_IN),
    );
}

#[test]
fn question_spec_carries_type_discriminator() {
    let mut conv = Conversation::new();
    conv.ask(Question::confirmation("Really?")).unwrap();

    let response = conv.response().unwrap();
    let data = response.expected_intent.unwrap().input_value_data.unwrap();

    assert_eq!(data["@type"], crate::intent::value_spec::CONFIRMATION);
    assert_eq!(data["dialogSpec"]["requestConfirmationText"], "Really?");
}

#[test]
fn last_rich_response_wins() {
    let mut first = RichResponse::default();
    first.add_text("first");
    let mut second = RichResponse::default();
    second.add_text("second");

    let mut conv = Conversation::new();
    conv.ask(first).unwrap();
    conv.ask(second).unwrap();

    let response = conv.response().unwrap();
    assert_eq!(response.rich_response.texts(), ["second"]);
}

#[test]
fn suggestions_survive_rich_replacement() {
    let mut replacement = RichResponse::default();
    replacement.add_text("replaced");

    let mut conv = Conversation::new();
    conv.ask(Suggestions::new(["red", "green"])).unwrap();
    conv.ask(replacement).unwrap();
    conv.ask(Suggestions::new(["blue"])).unwrap();

    let response = conv.response().unwrap();
    let titles: Vec<_> = response
        .rich_response
        .suggestions
        .iter()
        .filter_map(|suggestion| suggestion.title.as_deref())
        .collect();

    assert_eq!(titles, ["red", "green", "blue"]);
}

#[test]
fn suggestions_append_to_existing_chips() {
    let rich = RichResponse {
        suggestions: vec![Suggestion {
            title: Some("kept".to_owned()),
        }],
        ..RichResponse::default()
    };

    let mut conv = Conversation::new();
    conv.ask(rich).unwrap();
    conv.ask(Suggestions::new(["added"])).unwrap();

    let response = conv.response().unwrap();
    let titles: Vec<_> = response
        .rich_response
        .suggestions
        .iter()
        .filter_map(|suggestion| suggestion.title.as_deref())
        .collect();

    assert_eq!(titles, ["kept", "added"]);
}

#[test]
fn image_folds_into_a_card() {
    let mut conv = Conversation::new();
    conv.ask("Look:").unwrap();
    conv.ask(wire::Image {
        url: Some("https://example.com/crab.png".to_owned()),
        ..wire::Image::default()
    })
    .unwrap();

    let response = conv.response().unwrap();
    let card = response.rich_response.items[1].basic_card.as_ref().unwrap();
    assert_eq!(
        card.image.as_ref().unwrap().url.as_deref(),
        Some("https://example.com/crab.png"),
    );
}

#[test]
fn media_folds_into_a_media_response() {
    let mut conv = Conversation::new();
    conv.ask("Playing.").unwrap();
    conv.ask(wire::MediaObject {
        content_url: Some("https://example.com/tune.mp3".to_owned()),
        ..wire::MediaObject::default()
    })
    .unwrap();

    let response = conv.response().unwrap();
    let media = response.rich_response.items[1].media_response.as_ref().unwrap();
    assert_eq!(media.media_type.as_deref(), Some("AUDIO"));
    assert_eq!(media.media_objects.len(), 1);
}

#[test]
fn untouched_storage_serializes_canonically() {
    let mut conv = Conversation::new();
    conv.ask("Hi").unwrap();

    let response = conv.response().unwrap();
    assert_eq!(response.user_storage, r#"{"data":{}}"#);
}

#[test]
fn from_assistant_reads_the_envelope() {
    let body = app_request(json!({
        "user": {
            "userId": "u-1",
            "locale": "en-US",
            "permissions": ["NAME"],
        },
        "surface": {
            "capabilities": [
                {"name": "actions.capability.SCREEN_OUTPUT"},
                {"name": "actions.capability.AUDIO_OUTPUT"},
            ]
        },
        "conversation": {
            "conversationId": "c-1",
            "type": "ACTIVE",
            "conversationToken": "{\"data\":{\"count\":2}}",
        },
        "inputs": [{
            "intent": "actions.intent.TEXT",
            "rawInputs": [{"query": "hello there", "inputType": "VOICE"}],
            "arguments": [{"name": "TEXT", "rawText": "hello there"}],
        }],
        "isInSandbox": true,
    }));

    let conv = Conversation::from_assistant(&body);

    assert_eq!(conv.intent, "actions.intent.TEXT");
    assert_eq!(conv.query, "hello there");
    assert_eq!(conv.id, "c-1");
    assert_eq!(conv.conversation_type, "ACTIVE");
    assert!(conv.sandbox);
    assert!(conv.screen);
    assert_eq!(conv.data["count"], 2);
    assert_eq!(conv.user.locale.as_deref(), Some("en-US"));
    assert_eq!(conv.arguments.first().unwrap().name.as_deref(), Some("TEXT"));
}

#[test]
fn from_assistant_tolerates_a_bare_envelope() {
    let conv = Conversation::from_assistant(&wire::AppRequest::default());

    assert_eq!(conv.intent, "");
    assert!(conv.data.is_empty());
    assert!(!conv.screen);
}

#[test]
fn from_nlu_reads_query_result_and_payload() {
    let body = webhook_request(json!({
        "session": "projects/demo/agent/sessions/s-1",
        "queryResult": {
            "queryText": "what is the weather",
            "action": "weather.lookup",
            "parameters": {"city": "Lisbon"},
            "languageCode": "en",
            "intent": {"displayName": "Weather"},
            "outputContexts": [{
                "name": "projects/demo/agent/sessions/s-1/contexts/_session_data",
                "lifespanCount": 99,
                "parameters": {"data": {"count": 4}},
            }],
        },
        "originalDetectIntentRequest": {
            "payload": {
                "user": {"locale": "en-US"},
                "isInSandbox": false,
                "inputs": [{
                    "arguments": [{"name": "CONFIRMATION", "boolValue": true}],
                }],
            }
        }
    }));

    let conv = Conversation::from_nlu(&body);

    assert_eq!(conv.intent, "Weather");
    assert_eq!(conv.action, "weather.lookup");
    assert_eq!(conv.query, "what is the weather");
    assert_eq!(conv.parameters["city"], "Lisbon");
    assert_eq!(conv.language.as_deref(), Some("en"));
    assert_eq!(conv.data["count"], 4);
    assert_eq!(conv.arguments.value("CONFIRMATION"), Some(&json!(true)));
}

#[test]
fn new_surface_checks_extension_status() {
    let body = app_request(json!({
        "inputs": [{
            "intent": "actions.intent.NEW_SURFACE",
            "arguments": [{
                "name": "NEW_SURFACE",
                "extension": {"status": "OK"},
            }],
        }],
    }));

    let conv = Conversation::from_assistant(&body);
    assert!(conv.is_new_surface());
}
