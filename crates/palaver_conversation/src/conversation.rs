//! The single-turn conversation aggregate.
//!
//! A conversation moves through three states: accepting (fragments may be
//! added), responded (at least one fragment present) and digested (finalized,
//! terminal). Finalizing folds the fragment list into one rich response and
//! hands back everything an adapter needs to build its wire envelope.

use palaver_wire as wire;
use palaver_wire::{BasicCard, MediaResponse, RichResponse, SimpleResponse};
use serde_json::{Map, Value};

use crate::{
    arguments::Arguments,
    context::{ContextValues, SESSION_DATA_CONTEXT},
    error::{Error, Result},
    fragment::Fragment,
    session,
    surface::{self, Available, Surface},
    user::User,
};

/// Everything the platform knows about one turn, plus the response fragments
/// the handler has accumulated so far.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    /// The resolved intent name for this turn.
    pub intent: String,

    /// The developer-assigned action name (NLU front-end only).
    pub action: String,

    /// The user's raw utterance.
    pub query: String,

    /// NLU slot values for the matched intent (NLU front-end only).
    pub parameters: Map<String, Value>,

    pub arguments: Arguments,

    pub user: User,

    pub device: wire::Device,

    pub surface: Surface,

    pub available: Available,

    /// Named contexts (NLU front-end only; empty otherwise).
    pub contexts: ContextValues,

    /// Unique conversation ID, stable for the life of the conversation.
    pub id: String,

    pub conversation_type: String,

    /// True when the platform runs the app in sandbox mode.
    pub sandbox: bool,

    /// Shortcut for a screen-output capability check on the current surface.
    pub screen: bool,

    /// Conversation-scoped session data, persisted through the wire envelope.
    pub data: Map<String, Value>,

    /// Language of the current query (NLU front-end only).
    pub language: Option<String>,

    /// Whether the platform should keep the session open after this turn.
    pub expect_user_response: bool,

    /// Reprompts for turns on which the user stays silent.
    pub no_input_prompts: Vec<SimpleResponse>,

    responses: Vec<Fragment>,
    responded: bool,
    digested: bool,
    speech: Option<String>,
    display: Option<String>,
    raw_response: Option<Value>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            expect_user_response: true,
            ..Self::default()
        }
    }

    /// Build the session from a direct platform envelope. Session data is
    /// carried by the conversation token.
    pub fn from_assistant(body: &wire::AppRequest) -> Self {
        let input = body.inputs.first();
        let conversation = body.conversation.as_ref();
        let surface = Surface::new(body.surface.as_ref());

        Self {
            intent: input
                .and_then(|input| input.intent.clone())
                .unwrap_or_default(),
            query: input
                .and_then(|input| input.raw_inputs.first())
                .and_then(|raw| raw.query.clone())
                .unwrap_or_default(),
            arguments: Arguments::new(
                input.map(|input| input.arguments.as_slice()).unwrap_or_default(),
            ),
            user: User::new(body.user.as_ref()),
            device: body.device.clone().unwrap_or_default(),
            available: Available::new(&body.available_surfaces),
            id: conversation
                .and_then(|conversation| conversation.conversation_id.clone())
                .unwrap_or_default(),
            conversation_type: conversation
                .and_then(|conversation| conversation.conversation_type.clone())
                .unwrap_or_default(),
            sandbox: body.is_in_sandbox.unwrap_or_default(),
            screen: surface.has(surface::SCREEN_OUTPUT),
            surface,
            data: session::load(
                conversation.and_then(|conversation| conversation.conversation_token.as_deref()),
            ),
            expect_user_response: true,
            ..Self::default()
        }
    }

    /// Build the session from an NLU front-end envelope. Session data is
    /// carried by the reserved context; user, device and surface come from
    /// the forwarded inner payload.
    pub fn from_nlu(body: &wire::WebhookRequest) -> Self {
        let query_result = body.query_result.as_ref();
        let payload = body
            .original_detect_intent_request
            .as_ref()
            .and_then(|original| original.payload.as_ref());

        let contexts = ContextValues::new(
            query_result
                .map(|result| result.output_contexts.as_slice())
                .unwrap_or_default(),
            body.session.as_deref(),
        );
        let data = contexts
            .get(SESSION_DATA_CONTEXT)
            .map(|context| session::load_parameters(&context.parameters))
            .unwrap_or_default();

        let input = payload.and_then(|payload| payload.inputs.first());
        let surface = Surface::new(payload.and_then(|payload| payload.surface.as_ref()));

        Self {
            intent: query_result
                .and_then(|result| result.intent.as_ref())
                .and_then(|intent| intent.display_name.clone())
                .unwrap_or_default(),
            action: query_result
                .and_then(|result| result.action.clone())
                .unwrap_or_default(),
            query: query_result
                .and_then(|result| result.query_text.clone())
                .unwrap_or_default(),
            parameters: query_result
                .map(|result| result.parameters.clone())
                .unwrap_or_default(),
            arguments: Arguments::new(
                input.map(|input| input.arguments.as_slice()).unwrap_or_default(),
            ),
            user: User::new(payload.and_then(|payload| payload.user.as_ref())),
            device: payload
                .and_then(|payload| payload.device.clone())
                .unwrap_or_default(),
            available: Available::new(
                payload
                    .map(|payload| payload.available_surfaces.as_slice())
                    .unwrap_or_default(),
            ),
            id: payload
                .and_then(|payload| payload.conversation.as_ref())
                .and_then(|conversation| conversation.conversation_id.clone())
                .unwrap_or_default(),
            conversation_type: payload
                .and_then(|payload| payload.conversation.as_ref())
                .and_then(|conversation| conversation.conversation_type.clone())
                .unwrap_or_default(),
            sandbox: payload
                .and_then(|payload| payload.is_in_sandbox)
                .unwrap_or_default(),
            screen: surface.has(surface::SCREEN_OUTPUT),
            surface,
            contexts,
            data,
            language: query_result.and_then(|result| result.language_code.clone()),
            expect_user_response: true,
            ..Self::default()
        }
    }

    /// Append response fragments in call order.
    pub fn add(&mut self, fragment: impl Into<Fragment>) -> Result<&mut Self> {
        if self.digested {
            return Err(Error::AlreadyDigested);
        }

        let fragment = fragment.into();
        match &fragment {
            Fragment::Text(text) => {
                self.append_speech(text);
                self.append_display(text);
            }
            Fragment::Simple(simple) => {
                if let Some(speech) = &simple.text_to_speech {
                    self.append_speech(speech);
                }
                if let Some(display) = &simple.display_text {
                    self.append_display(display);
                }
            }
            _ => {}
        }

        self.responses.push(fragment);
        self.responded = true;
        Ok(self)
    }

    /// Append a fragment and keep the session open for the user's reply.
    pub fn ask(&mut self, fragment: impl Into<Fragment>) -> Result<&mut Self> {
        self.expect_user_response = true;
        self.add(fragment)
    }

    /// Append a fragment and end the conversation after this turn.
    pub fn close(&mut self, fragment: impl Into<Fragment>) -> Result<&mut Self> {
        self.expect_user_response = false;
        self.add(fragment)
    }

    /// Set reprompts for no-input turns. Not persisted across turns.
    pub fn set_no_input_prompts<I, S>(&mut self, prompts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.no_input_prompts = prompts
            .into_iter()
            .map(|prompt| SimpleResponse::text(prompt))
            .collect();
    }

    /// Bypass the fold and respond with a raw wire body.
    pub fn set_raw_response(&mut self, body: Value) {
        self.raw_response = Some(body);
        self.responded = true;
    }

    /// The raw body set by [`Self::set_raw_response`], if any.
    pub fn raw_response(&self) -> Option<&Value> {
        self.raw_response.as_ref()
    }

    /// Whether any response has been accumulated this turn.
    pub fn responded(&self) -> bool {
        self.responded
    }

    /// True when the user arrived here by accepting a surface handoff.
    pub fn is_new_surface(&self) -> bool {
        self.arguments
            .get("NEW_SURFACE")
            .and_then(|argument| argument.extension.as_ref())
            .and_then(|extension| extension.status.as_deref())
            == Some("OK")
    }

    /// Status of a prior sign-in question, if one was answered this turn.
    pub fn sign_in_status(&self) -> Option<&str> {
        self.arguments
            .get("SIGN_IN")
            .and_then(|argument| argument.extension.as_ref())
            .and_then(|extension| extension.status.as_deref())
    }

    /// Finalize the turn, folding all fragments into one rich response.
    ///
    /// Fails with [`Error::NoResponse`] when nothing was accumulated and with
    /// [`Error::AlreadyDigested`] on a second call.
    pub fn response(&mut self) -> Result<ConversationResponse> {
        if !self.responded {
            return Err(Error::NoResponse);
        }
        if self.digested {
            return Err(Error::AlreadyDigested);
        }
        self.digested = true;

        let mut rich = RichResponse::default();
        let mut suggestions = Vec::new();
        let mut expected_intent = None;

        for fragment in std::mem::take(&mut self.responses) {
            match fragment {
                Fragment::Text(text) => {
                    rich.add_text(text);
                }
                Fragment::Simple(simple) => {
                    rich.add_simple(simple);
                }
                // A pre-built container replaces the accumulator wholesale.
                Fragment::Rich(replacement) => rich = replacement,
                // Suggestions survive accumulator replacement; they are
                // attached once the fold is done.
                Fragment::Suggestions(chips) => suggestions.extend(chips.0),
                Fragment::Card(card) => {
                    rich.add_card(card);
                }
                Fragment::Image(image) => {
                    rich.add_card(BasicCard {
                        image: Some(image),
                        ..BasicCard::default()
                    });
                }
                Fragment::Media(media) => {
                    rich.add_media(MediaResponse {
                        media_type: Some("AUDIO".to_owned()),
                        media_objects: vec![media],
                    });
                }
                Fragment::Question(question) => {
                    if expected_intent.is_some() {
                        continue;
                    }
                    if question.is_solo() {
                        // The platform renders its own prompt for a solo
                        // question, but response validation still demands a
                        // simple item. The placeholder is never shown.
                        rich.add_text("PLACEHOLDER");
                    }
                    expected_intent = Some(wire::ExpectedIntent {
                        intent: Some(question.intent),
                        input_value_data: question.data,
                    });
                }
            }
        }
        rich.suggestions.extend(suggestions);

        Ok(ConversationResponse {
            rich_response: rich,
            expect_user_response: self.expect_user_response,
            user_storage: self.user.serialize_storage(),
            expected_intent,
            no_input_prompts: std::mem::take(&mut self.no_input_prompts),
            speech: self.speech.clone(),
            display_text: self.display.clone(),
        })
    }

    fn append_speech(&mut self, text: &str) {
        append(&mut self.speech, text);
    }

    fn append_display(&mut self, text: &str) {
        append(&mut self.display, text);
    }
}

/// The folded turn result, ready for an adapter to serialize.
#[derive(Debug, Clone)]
pub struct ConversationResponse {
    pub rich_response: RichResponse,

    pub expect_user_response: bool,

    /// The user-storage envelope, canonical-empty when untouched.
    pub user_storage: String,

    /// The follow-up intent requested by the first question fragment.
    pub expected_intent: Option<wire::ExpectedIntent>,

    pub no_input_prompts: Vec<SimpleResponse>,

    /// Running transcript of all spoken text, two-space separated.
    pub speech: Option<String>,

    pub display_text: Option<String>,
}

fn append(buffer: &mut Option<String>, text: &str) {
    match buffer {
        Some(existing) => {
            existing.push_str("  ");
            existing.push_str(text);
        }
        None => *buffer = Some(text.to_owned()),
    }
}

#[cfg(test)]
#[path = "conversation_tests.rs"]
mod tests;
