use crate::router::HandlerError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The turn's intent has no registered handler and no fallback exists.
    #[error("handler not found for intent: {0}")]
    HandlerNotFound(String),

    /// A redirect chain revisited an entry; the chain would never terminate.
    #[error("circular intent map detected: {0} traversed twice")]
    CircularIntentMap(String),

    /// The conversation state machine was violated by the handler.
    #[error(transparent)]
    Conversation(#[from] palaver_conversation::Error),

    /// A handler failed and no catcher was configured, or the catcher itself
    /// failed.
    #[error("intent handler failed: {0}")]
    Handler(#[source] HandlerError),

    /// The user's sign-in token could not be verified.
    #[error("sign-in token verification failed: {0}")]
    Profile(#[source] crate::verify::VerifyError),

    #[error("malformed request body: {0}")]
    Body(#[from] serde_json::Error),
}
