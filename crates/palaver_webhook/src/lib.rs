//! Intent routing and the protocol adapters that drive one webhook turn:
//! verify, construct the conversation, dispatch, finalize, serialize.

mod app;
pub mod assistant;
pub mod error;
pub mod nlu;
pub mod router;
pub mod service;
pub mod verify;

pub use assistant::AssistantApp;
pub use error::Error;
pub use nlu::NluApp;
pub use router::{Handlers, TurnArgs};
pub use verify::{IdentityVerifier, Verification};

/// The transport-facing result of one routed turn: an HTTP status plus the
/// serialized wire body. Successfully routed turns are always 200; only the
/// verification short-circuit uses another status.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub status: u16,

    pub body: serde_json::Value,
}

impl TurnReply {
    fn ok(body: serde_json::Value) -> Self {
        Self { status: 200, body }
    }

    fn rejected(verification: &verify::Verification) -> Self {
        Self {
            status: verification.status,
            body: serde_json::json!({ "error": verification.error }),
        }
    }
}
