//! Serde mirror of the two webhook wire protocols, limited to the boundary
//! subset the turn-processing pipeline reads and writes.
//!
//! The platform's full schema is far larger; anything the pipeline never
//! touches (orders, carousels, tables, push messages) is deliberately absent.

pub mod argument;
pub mod assistant;
pub mod nlu;
pub mod response;
pub mod user;

pub use argument::{Argument, ArgumentExtension, DateTimeValue, Status};
pub use assistant::{
    AppRequest, AppResponse, Conversation, ExpectedInput, ExpectedIntent, FinalResponse, Input,
    InputPrompt, RawInput,
};
pub use nlu::{
    AssistantPayload, Context, EventInput, IntentRef, OriginalDetectIntentRequest, QueryResult,
    ResponsePayload, SystemIntent, WebhookRequest, WebhookResponse,
};
pub use response::{
    BasicCard, Image, MediaObject, MediaResponse, RichResponse, RichResponseItem, SimpleResponse,
    Suggestion,
};
pub use user::{Capability, Device, Location, Surface, User, UserProfile};
