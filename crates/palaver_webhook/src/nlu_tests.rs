use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

const SESSION: &str = "projects/demo/agent/sessions/s-1";

fn turn(action: &str, query: &str) -> WebhookRequest {
    serde_json::from_value(json!({
        "responseId": "r-1",
        "session": SESSION,
        "queryResult": {
            "queryText": query,
            "action": action,
            "intent": {"displayName": "Some Intent"},
            "languageCode": "en",
        },
        "originalDetectIntentRequest": {
            "payload": {
                "conversation": {"conversationId": "c-1"},
            }
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn session_data_rides_the_reserved_context() {
    let app = NluApp::new().intent("count.up", |mut conv: Conversation, _| async move {
        conv.data.insert("count".to_owned(), json!(5));
        conv.ask("Counted.")?;
        Ok(conv)
    });

    let reply = app.handle(turn("count.up", "count"), None).await.unwrap();

    assert_eq!(reply.status, 200);

    let contexts = reply.body["outputContexts"].as_array().unwrap();
    let session_context = contexts
        .iter()
        .find(|context| {
            context["name"]
                .as_str()
                .is_some_and(|name| name.ends_with("/contexts/_session_data"))
        })
        .unwrap();

    assert_eq!(
        session_context["name"],
        format!("{SESSION}/contexts/_session_data"),
    );
    assert_eq!(session_context["lifespanCount"], 99);
    assert_eq!(session_context["parameters"], json!({"data": {"count": 5}}));
}

#[tokio::test]
async fn incoming_session_context_restores_data() {
    let app = NluApp::new().intent("count.up", |mut conv: Conversation, _| async move {
        let count = conv.data.get("count").and_then(|count| count.as_i64()).unwrap_or(0);
        conv.data.insert("count".to_owned(), json!(count + 1));
        conv.ask("Counted.")?;
        Ok(conv)
    });

    let mut body = turn("count.up", "count");
    body.query_result.as_mut().unwrap().output_contexts = vec![palaver_wire::Context {
        name: format!("{SESSION}/contexts/_session_data"),
        lifespan_count: 99,
        parameters: json!({"data": {"count": 7}}).as_object().cloned().unwrap(),
    }];

    let reply = app.handle(body, None).await.unwrap();
    let contexts = reply.body["outputContexts"].as_array().unwrap();

    assert_eq!(contexts[0]["parameters"]["data"]["count"], 8);
}

#[tokio::test]
async fn payload_nests_the_assistant_response() {
    let app = NluApp::new().intent("greet", |mut conv: Conversation, _| async move {
        conv.ask("Hello!")?;
        Ok(conv)
    });

    let reply = app.handle(turn("greet", "hi"), None).await.unwrap();
    let google = &reply.body["payload"]["google"];

    assert_eq!(reply.body["fulfillmentText"], "Hello!");
    assert_eq!(google["expectUserResponse"], true);
    assert_eq!(
        google["richResponse"]["items"][0]["simpleResponse"]["textToSpeech"],
        "Hello!",
    );
}

#[tokio::test]
async fn fulfillment_text_joins_multiple_fragments() {
    let app = NluApp::new().intent("greet", |mut conv: Conversation, _| async move {
        conv.ask("Hello!")?.ask("How are you?")?;
        Ok(conv)
    });

    let reply = app.handle(turn("greet", "hi"), None).await.unwrap();

    assert_eq!(reply.body["fulfillmentText"], "Hello!  How are you?");
}

#[tokio::test]
async fn question_becomes_the_system_intent() {
    let app = NluApp::new().intent("login", |mut conv: Conversation, _| async move {
        conv.ask(palaver_conversation::Question::sign_in(None))?;
        Ok(conv)
    });

    let reply = app.handle(turn("login", "sign me in"), None).await.unwrap();
    let system_intent = &reply.body["payload"]["google"]["systemIntent"];

    assert_eq!(system_intent["intent"], "actions.intent.SIGN_IN");
    assert_eq!(
        system_intent["data"]["@type"],
        "type.googleapis.com/google.actions.v2.SignInValueSpec",
    );
}

#[tokio::test]
async fn dispatch_falls_back_to_the_display_name() {
    let app = NluApp::new().intent("Some Intent", |mut conv: Conversation, _| async move {
        conv.close("Matched by display name.")?;
        Ok(conv)
    });

    let reply = app.handle(turn("", "hi"), None).await.unwrap();

    assert_eq!(
        reply.body["payload"]["google"]["richResponse"]["items"][0]["simpleResponse"]
            ["textToSpeech"],
        "Matched by display name.",
    );
}

#[tokio::test]
async fn handler_contexts_are_requalified() {
    let app = NluApp::new().intent("remember", |mut conv: Conversation, _| async move {
        conv.contexts.set("color", 5, json!({"color": "red"}).as_object().cloned());
        conv.ask("Saved.")?;
        Ok(conv)
    });

    let reply = app.handle(turn("remember", "remember red"), None).await.unwrap();
    let contexts = reply.body["outputContexts"].as_array().unwrap();
    let color = contexts
        .iter()
        .find(|context| context["name"].as_str().is_some_and(|name| name.ends_with("/color")))
        .unwrap();

    assert_eq!(color["name"], format!("{SESSION}/contexts/color"));
    assert_eq!(color["lifespanCount"], 5);
    assert_eq!(color["parameters"]["color"], "red");
}

#[tokio::test]
async fn followup_bypasses_the_fold() {
    let app = NluApp::new().intent("license", |mut conv: Conversation, _| async move {
        followup(
            &mut conv,
            "apply-for-license-event",
            json!({"kind": "fishing"}).as_object().cloned().unwrap(),
            None,
        )?;
        Ok(conv)
    });

    let reply = app.handle(turn("license", "apply"), None).await.unwrap();

    assert_eq!(
        reply.body["followupEventInput"]["name"],
        "apply-for-license-event",
    );
    assert_eq!(reply.body["followupEventInput"]["parameters"]["kind"], "fishing");
    assert_eq!(reply.body["followupEventInput"]["languageCode"], "en");
    assert_eq!(reply.body.get("payload"), None);
}

#[tokio::test]
async fn handler_that_never_responds_fails_the_turn() {
    let app = NluApp::new().intent("silent", |conv: Conversation, _| async move { Ok(conv) });

    let result = app.handle(turn("silent", "hm"), None).await;

    assert_matches!(
        result,
        Err(crate::Error::Conversation(palaver_conversation::Error::NoResponse))
    );
}
