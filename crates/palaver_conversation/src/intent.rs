//! Built-in intent and capability name constants.

pub const MAIN: &str = "actions.intent.MAIN";
pub const TEXT: &str = "actions.intent.TEXT";
pub const PERMISSION: &str = "actions.intent.PERMISSION";
pub const OPTION: &str = "actions.intent.OPTION";
pub const CONFIRMATION: &str = "actions.intent.CONFIRMATION";
pub const DATETIME: &str = "actions.intent.DATETIME";
pub const SIGN_IN: &str = "actions.intent.SIGN_IN";
pub const NO_INPUT: &str = "actions.intent.NO_INPUT";
pub const CANCEL: &str = "actions.intent.CANCEL";
pub const NEW_SURFACE: &str = "actions.intent.NEW_SURFACE";
pub const PLACE: &str = "actions.intent.PLACE";
pub const MEDIA_STATUS: &str = "actions.intent.MEDIA_STATUS";

/// `@type` discriminators for the input value specs attached to questions.
pub mod value_spec {
    pub const PERMISSION: &str = "type.googleapis.com/google.actions.v2.PermissionValueSpec";
    pub const OPTION: &str = "type.googleapis.com/google.actions.v2.OptionValueSpec";
    pub const CONFIRMATION: &str = "type.googleapis.com/google.actions.v2.ConfirmationValueSpec";
    pub const DATETIME: &str = "type.googleapis.com/google.actions.v2.DateTimeValueSpec";
    pub const NEW_SURFACE: &str = "type.googleapis.com/google.actions.v2.NewSurfaceValueSpec";
    pub const SIGN_IN: &str = "type.googleapis.com/google.actions.v2.SignInValueSpec";
    pub const PLACE: &str = "type.googleapis.com/google.actions.v2.PlaceValueSpec";
}
