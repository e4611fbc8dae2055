//! The per-turn conversation aggregate and its supporting layers: argument
//! normalization, session persistence, the named-context store, and the
//! response-fragment fold.

pub mod arguments;
pub mod context;
pub mod conversation;
pub mod error;
pub mod fragment;
pub mod intent;
pub mod session;
pub mod surface;
pub mod user;

pub use arguments::Arguments;
pub use context::{ContextValues, SESSION_DATA_CONTEXT, SESSION_DATA_LIFESPAN};
pub use conversation::{Conversation, ConversationResponse};
pub use error::Error;
pub use fragment::{Fragment, Question, Suggestions};
pub use user::User;
