//! Normalizes the turn's raw argument list into by-name lookups.
//!
//! The platform has accumulated overlapping encodings over time: newer
//! payloads carry result data on the argument record itself, older ones bury
//! it in an extension sub-record. The raw view hoists the extension fields
//! onto the top level so downstream code has one place to look.

use indexmap::IndexMap;
use palaver_wire::{Argument, Status};
use serde_json::Value;

/// Read-only views over the turn's arguments, keyed by argument name.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    raw: IndexMap<String, Argument>,
    status: IndexMap<String, Status>,
    parsed: IndexMap<String, Value>,
}

impl Arguments {
    pub fn new(list: &[Argument]) -> Self {
        let mut raw = IndexMap::new();
        let mut status = IndexMap::new();
        let mut parsed = IndexMap::new();

        for argument in list {
            let name = argument.name.clone().unwrap_or_default();
            let argument = hoist_extension(argument.clone());

            if let Some(value) = parse_value(&argument) {
                parsed.insert(name.clone(), value);
            }
            if let Some(arg_status) = argument.status.clone() {
                status.insert(name.clone(), arg_status);
            }
            raw.insert(name, argument);
        }

        Self {
            raw,
            status,
            parsed,
        }
    }

    /// The raw argument record by name.
    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.raw.get(name)
    }

    /// The platform-side failure status for an argument, if any.
    pub fn status(&self, name: &str) -> Option<&Status> {
        self.status.get(name)
    }

    /// The extracted scalar value for an argument, if one was present.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.parsed.get(name)
    }

    /// The first argument of the turn, in wire order.
    pub fn first(&self) -> Option<&Argument> {
        self.raw.values().next()
    }

    /// The first argument status of the turn, in wire order.
    pub fn first_status(&self) -> Option<&Status> {
        self.status.values().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.raw.values()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Copy legacy extension fields onto the record's top level. Fields already
/// set on the record win.
fn hoist_extension(mut argument: Argument) -> Argument {
    let Some(extension) = &argument.extension else {
        return argument;
    };

    if argument.result_type.is_none() {
        argument.result_type = extension.result_type.clone();
    }
    if argument.user_decision.is_none() {
        argument.user_decision = extension.user_decision.clone();
    }
    if argument.location.is_none() {
        argument.location = extension.location.clone();
    }

    argument
}

/// Extract the scalar value, preferring typed fields over text: the text
/// value is the loosest encoding and is only used when nothing else is set,
/// with the raw query span as a final fallback.
fn parse_value(argument: &Argument) -> Option<Value> {
    if let Some(value) = argument.bool_value {
        return Some(Value::Bool(value));
    }
    if let Some(value) = &argument.int_value {
        // Int values arrive as decimal strings on the wire.
        if let Ok(parsed) = value.parse::<i64>() {
            return Some(Value::from(parsed));
        }
        return Some(Value::String(value.clone()));
    }
    if let Some(value) = argument.float_value {
        return Some(Value::from(value));
    }
    if let Some(value) = &argument.datetime_value {
        return serde_json::to_value(value).ok();
    }
    if let Some(value) = &argument.place_value {
        return serde_json::to_value(value).ok();
    }
    if let Some(value) = &argument.structured_value {
        return Some(Value::Object(value.clone()));
    }
    if let Some(value) = &argument.text_value {
        return Some(Value::String(value.clone()));
    }

    argument
        .raw_text
        .as_ref()
        .map(|text| Value::String(text.clone()))
}
