//! Per-turn argument records computed by the platform.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::user::Location;

/// One platform-computed argument for the current turn.
///
/// At most one of the typed value fields is populated. The `result_type`,
/// `user_decision` and `location` fields exist both here and inside
/// [`ArgumentExtension`]; older payloads only populate the extension, which
/// the normalization layer hoists onto the top level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    /// Name of the argument being provided for the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The raw text, typed or spoken, that provided the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime_value: Option<DateTimeValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_value: Option<Location>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_value: Option<Map<String, Value>>,

    /// Extension whose shape depends on the argument name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<ArgumentExtension>,

    /// Populated when the platform failed to compute this argument, e.g. a
    /// denied permission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_decision: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Legacy sub-record carrying result data for surface, transaction and
/// sign-in style arguments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentExtension {
    #[serde(default, rename = "@type", skip_serializing_if = "Option::is_none")]
    pub type_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_decision: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Platform-side failure description for a single argument.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeOfDay>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Date {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeOfDay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nanos: Option<u32>,
}
