//! Response fragments accumulated by a handler during one turn.

use palaver_wire::{
    BasicCard, Image, MediaObject, RichResponse, SimpleResponse, Suggestion,
};
use serde_json::{Map, Value};

use crate::intent;

/// One fragment of the final response, folded into a single rich response on
/// finalize. The fold is matched exhaustively; adding a variant forces a
/// decision about its precedence.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Plain text, spoken and displayed as-is.
    Text(String),

    /// Voice/display pair with explicit control over both channels.
    Simple(SimpleResponse),

    /// A pre-built container; replaces everything accumulated so far.
    Rich(RichResponse),

    /// Suggestion chips; accumulate across the whole turn.
    Suggestions(Suggestions),

    Card(BasicCard),

    Image(Image),

    Media(MediaObject),

    /// A request for a specific follow-up intent.
    Question(Question),
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<SimpleResponse> for Fragment {
    fn from(simple: SimpleResponse) -> Self {
        Self::Simple(simple)
    }
}

impl From<RichResponse> for Fragment {
    fn from(rich: RichResponse) -> Self {
        Self::Rich(rich)
    }
}

impl From<Suggestions> for Fragment {
    fn from(suggestions: Suggestions) -> Self {
        Self::Suggestions(suggestions)
    }
}

impl From<BasicCard> for Fragment {
    fn from(card: BasicCard) -> Self {
        Self::Card(card)
    }
}

impl From<Image> for Fragment {
    fn from(image: Image) -> Self {
        Self::Image(image)
    }
}

impl From<MediaObject> for Fragment {
    fn from(media: MediaObject) -> Self {
        Self::Media(media)
    }
}

impl From<Question> for Fragment {
    fn from(question: Question) -> Self {
        Self::Question(question)
    }
}

/// Suggestion chips to show with the response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Suggestions(pub Vec<Suggestion>);

impl Suggestions {
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            titles
                .into_iter()
                .map(|title| Suggestion {
                    title: Some(title.into()),
                })
                .collect(),
        )
    }
}

/// Asks the platform to collect a specific follow-up intent, optionally with
/// a typed value spec describing how.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// The follow-up intent name.
    pub intent: String,

    /// Value spec attached under the intent, with its `@type` discriminator.
    pub data: Option<Map<String, Value>>,

    /// Whether the platform renders its own prompt for this question, making
    /// an accompanying text fragment unnecessary.
    solo: bool,
}

impl Question {
    /// A question for a custom intent, e.g. an option selection.
    pub fn new(intent: impl Into<String>, data: Option<Map<String, Value>>) -> Self {
        Self {
            intent: intent.into(),
            data,
            solo: false,
        }
    }

    pub fn is_solo(&self) -> bool {
        self.solo
    }

    /// Ask for a yes/no confirmation.
    pub fn confirmation(text: impl Into<String>) -> Self {
        let text = text.into();

        Self::solo_spec(
            intent::CONFIRMATION,
            intent::value_spec::CONFIRMATION,
            serde_json::json!({
                "dialogSpec": { "requestConfirmationText": text }
            }),
        )
    }

    /// Ask for a date and time.
    pub fn date_time(
        prompt: impl Into<String>,
        date_prompt: impl Into<String>,
        time_prompt: impl Into<String>,
    ) -> Self {
        let prompt = prompt.into();
        let date_prompt = date_prompt.into();
        let time_prompt = time_prompt.into();

        Self::solo_spec(
            intent::DATETIME,
            intent::value_spec::DATETIME,
            serde_json::json!({
                "dialogSpec": {
                    "requestDatetimeText": prompt,
                    "requestDateText": date_prompt,
                    "requestTimeText": time_prompt,
                }
            }),
        )
    }

    /// Ask the user to grant one or more permissions.
    pub fn permission<I, S>(context: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let context = context.into();
        let permissions: Vec<String> = permissions.into_iter().map(Into::into).collect();

        Self::solo_spec(
            intent::PERMISSION,
            intent::value_spec::PERMISSION,
            serde_json::json!({
                "optContext": context,
                "permissions": permissions,
            }),
        )
    }

    /// Hand the user off to the sign-in flow.
    pub fn sign_in(context: Option<String>) -> Self {
        let mut data = serde_json::json!({});
        if let Some(context) = context {
            data["optContext"] = Value::String(context);
        }

        Self::solo_spec(intent::SIGN_IN, intent::value_spec::SIGN_IN, data)
    }

    /// Ask for a place or address.
    pub fn place(prompt: impl Into<String>, context: impl Into<String>) -> Self {
        let prompt = prompt.into();
        let context = context.into();

        Self::solo_spec(
            intent::PLACE,
            intent::value_spec::PLACE,
            serde_json::json!({
                "dialogSpec": {
                    "extension": {
                        "@type": "type.googleapis.com/google.actions.v2.PlaceValueSpec.PlaceDialogSpec",
                        "requestPrompt": prompt,
                        "permissionContext": context,
                    }
                }
            }),
        )
    }

    /// Ask to continue the conversation on a surface with the given
    /// capability.
    pub fn new_surface(
        context: impl Into<String>,
        notification_title: impl Into<String>,
        capabilities: Vec<String>,
    ) -> Self {
        let context = context.into();
        let notification_title = notification_title.into();

        Self::solo_spec(
            intent::NEW_SURFACE,
            intent::value_spec::NEW_SURFACE,
            serde_json::json!({
                "context": context,
                "notificationTitle": notification_title,
                "capabilities": capabilities,
            }),
        )
    }

    fn solo_spec(intent: &str, type_url: &str, spec: Value) -> Self {
        // The discriminator leads so the wire output stays readable.
        let mut data = Map::new();
        data.insert("@type".to_owned(), Value::String(type_url.to_owned()));
        if let Value::Object(map) = spec {
            data.extend(map);
        }

        Self {
            intent: intent.to_owned(),
            data: Some(data),
            solo: true,
        }
    }
}
