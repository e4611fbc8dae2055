//! The NLU front-end envelope (protocol 2): an intent-matching layer wraps
//! the platform request and carries session state in named output contexts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{assistant::AppRequest, response::RichResponse};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,

    /// Fully-qualified session name; context names are prefixed with it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_result: Option<QueryResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_detect_intent_request: Option<OriginalDetectIntentRequest>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// The user's raw query text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,

    /// The developer-assigned action name for the matched intent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_contexts: Vec<Context>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// The inner platform envelope, forwarded verbatim by the NLU layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalDetectIntentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<AppRequest>,
}

/// A named, lifespan-bounded parameter bag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    /// Fully-qualified name, `<session>/contexts/<logical name>`.
    pub name: String,

    /// Number of turns the context stays alive; zero deletes it.
    #[serde(default)]
    pub lifespan_count: u32,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ResponsePayload>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_contexts: Vec<Context>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followup_event_input: Option<EventInput>,
}

/// Triggers a follow-up event instead of matching on the user's next query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// Platform-keyed payload block of the webhook response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponsePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google: Option<AssistantPayload>,
}

/// The assistant-specific response carried inside the NLU payload block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_user_response: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_response: Option<RichResponse>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_intent: Option<SystemIntent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_storage: Option<String>,
}

/// NLU-side spelling of the expected follow-up intent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemIntent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}
