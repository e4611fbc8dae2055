//! The direct platform envelope (protocol 1): the assistant posts the turn
//! straight to the webhook and persists session state in
//! `conversation.conversationToken`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    argument::Argument,
    response::{RichResponse, SimpleResponse},
    user::{Device, Surface, User},
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<Surface>,

    /// Surfaces available for cross-surface handoff.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_surfaces: Vec<Surface>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<Conversation>,

    /// Only one input is supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<Input>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_in_sandbox: Option<bool>,
}

/// Session identifiers plus the opaque token recirculated every turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub conversation_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// The resolved intent name for this turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raw_inputs: Vec<RawInput>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInput {
    /// Typed or spoken input from the end user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppResponse {
    /// Opaque session blob echoed back by the platform next turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_token: Option<String>,

    /// Opaque per-user blob persisted across conversations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_storage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_user_response: Option<bool>,

    /// Populated when the conversation continues; absent on a closing turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_inputs: Vec<ExpectedInput>,

    /// Populated when the conversation ends; absent while it continues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_response: Option<FinalResponse>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_in_sandbox: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_prompt: Option<InputPrompt>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub possible_intents: Vec<ExpectedIntent>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPrompt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_initial_prompt: Option<RichResponse>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_input_prompts: Vec<SimpleResponse>,
}

/// The follow-up intent the webhook expects the platform to collect next.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedIntent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    /// Typed value spec for the intent, keyed by an `@type` discriminator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_value_data: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_response: Option<RichResponse>,
}
