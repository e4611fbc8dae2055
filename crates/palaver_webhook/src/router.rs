//! Name-keyed handler registry and the per-turn dispatch loop.

use std::future::Future;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use palaver_conversation::Conversation;
use palaver_wire::{Argument, Status};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Error type produced by developer handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// The future a handler resolves to, yielding the conversation back.
pub type HandlerFuture = BoxFuture<'static, std::result::Result<Conversation, HandlerError>>;

/// A developer-supplied intent handler. The conversation is moved in and
/// handed back so the handler may hold it across await points.
pub type IntentHandler = Box<dyn Fn(Conversation, TurnArgs) -> HandlerFuture + Send + Sync>;

/// A developer-supplied exception handler.
pub type Catcher = Box<dyn Fn(Conversation, HandlerError) -> HandlerFuture + Send + Sync>;

/// The fixed-arity arguments every handler receives alongside the
/// conversation: the raw utterance, the NLU slot values, and the first
/// platform argument with its status.
#[derive(Debug, Clone, Default)]
pub struct TurnArgs {
    pub input: String,

    pub parameters: Map<String, Value>,

    pub argument: Option<Argument>,

    pub status: Option<Status>,
}

impl TurnArgs {
    fn from_conversation(conv: &Conversation) -> Self {
        Self {
            input: conv.query.clone(),
            parameters: conv.parameters.clone(),
            argument: conv.arguments.first().cloned(),
            status: conv.arguments.first_status().cloned(),
        }
    }
}

/// One registry entry: answer directly, or hand off to another intent name.
enum Routing {
    Handle(IntentHandler),
    Redirect(String),
}

/// The read-only handler table, built once at configuration time.
#[derive(Default)]
pub struct Handlers {
    intents: IndexMap<String, Routing>,
    fallback: Option<IntentHandler>,
    catcher: Option<Catcher>,
}

impl Handlers {
    pub fn insert<F, Fut>(&mut self, intent: impl Into<String>, handler: F)
    where
        F: Fn(Conversation, TurnArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Conversation, HandlerError>> + Send + 'static,
    {
        self.intents.insert(
            intent.into(),
            Routing::Handle(Box::new(move |conv, args| Box::pin(handler(conv, args)))),
        );
    }

    /// Register `intent` to be fulfilled by `target`'s handler.
    pub fn redirect(&mut self, intent: impl Into<String>, target: impl Into<String>) {
        self.intents
            .insert(intent.into(), Routing::Redirect(target.into()));
    }

    pub fn set_fallback<F, Fut>(&mut self, handler: F)
    where
        F: Fn(Conversation, TurnArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Conversation, HandlerError>> + Send + 'static,
    {
        self.fallback = Some(Box::new(move |conv, args| Box::pin(handler(conv, args))));
    }

    pub fn set_catcher<F, Fut>(&mut self, catcher: F)
    where
        F: Fn(Conversation, HandlerError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Conversation, HandlerError>> + Send + 'static,
    {
        self.catcher = Some(Box::new(move |conv, error| Box::pin(catcher(conv, error))));
    }

    pub fn contains(&self, intent: &str) -> bool {
        self.intents.contains_key(intent)
    }

    /// Execute the handler for `intent` against the conversation.
    ///
    /// Redirect entries are followed with a visited set keyed by registry
    /// index, so a redirect cycle fails with [`Error::CircularIntentMap`]
    /// within at most table-size steps instead of hanging the request.
    /// Handler errors go to the catcher when one is configured; the catcher
    /// receives the turn's pre-handler state, so partial mutations from the
    /// failed handler are discarded.
    pub async fn dispatch(&self, conv: Conversation, intent: &str) -> Result<Conversation> {
        let mut traversed = vec![false; self.intents.len()];
        let mut name = intent;

        let handler = loop {
            match self.intents.get_full(name) {
                Some((index, _, routing)) => {
                    if traversed[index] {
                        return Err(Error::CircularIntentMap(name.to_owned()));
                    }
                    traversed[index] = true;

                    match routing {
                        Routing::Handle(handler) => break handler,
                        Routing::Redirect(target) => name = target,
                    }
                }
                None => match &self.fallback {
                    Some(fallback) => break fallback,
                    None => return Err(Error::HandlerNotFound(intent.to_owned())),
                },
            }
        };

        let args = TurnArgs::from_conversation(&conv);
        let pristine = self.catcher.as_ref().map(|_| conv.clone());

        match handler(conv, args).await {
            Ok(conv) => Ok(conv),
            Err(error) => match (&self.catcher, pristine) {
                (Some(catcher), Some(conv)) => {
                    tracing::debug!(%error, intent, "Handler failed; invoking catcher.");
                    catcher(conv, error).await.map_err(Error::Handler)
                }
                _ => Err(Error::Handler(error)),
            },
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
