//! Codec for the opaque session and user-storage blobs.
//!
//! The wire shape is always `{"data": <developer object>}`. The codec is
//! stateless and tolerant on input: anything absent or unparseable loads as
//! an empty object so a corrupt blob never fails the turn.

use serde_json::{Map, Value};
use tracing::warn;

/// Canonical serialization of a session that was never touched.
pub const EMPTY: &str = r#"{"data":{}}"#;

const DATA_KEY: &str = "data";

/// Deserialize a persisted blob into the developer's data object.
pub fn load(blob: Option<&str>) -> Map<String, Value> {
    let Some(blob) = blob.filter(|blob| !blob.is_empty()) else {
        return Map::new();
    };

    match serde_json::from_str::<Value>(blob) {
        Ok(value) => unwrap_envelope(value),
        Err(error) => {
            warn!(%error, "Discarding malformed session blob.");
            Map::new()
        }
    }
}

/// Deserialize the envelope when it is carried as a parameter bag rather
/// than a string field. A string under the data key is the legacy
/// double-encoded form and is parsed a second time.
pub fn load_parameters(parameters: &Map<String, Value>) -> Map<String, Value> {
    match parameters.get(DATA_KEY) {
        None => Map::new(),
        Some(Value::Object(data)) => data.clone(),
        Some(Value::String(blob)) => match serde_json::from_str::<Value>(blob) {
            Ok(Value::Object(data)) => data,
            Ok(_) | Err(_) => {
                warn!("Discarding malformed session data parameter.");
                Map::new()
            }
        },
        Some(_) => {
            warn!("Discarding session data parameter that is not an object.");
            Map::new()
        }
    }
}

/// Serialize the developer's data object into the persisted blob.
pub fn save(data: &Map<String, Value>) -> String {
    if data.is_empty() {
        return EMPTY.to_owned();
    }

    to_value(data).to_string()
}

/// The envelope as a JSON value, for carriers that persist structured
/// parameters instead of a string field.
pub fn to_value(data: &Map<String, Value>) -> Value {
    let mut envelope = Map::new();
    envelope.insert(DATA_KEY.to_owned(), Value::Object(data.clone()));
    Value::Object(envelope)
}

fn unwrap_envelope(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(mut envelope) => match envelope.remove(DATA_KEY) {
            Some(Value::Object(data)) => data,
            Some(_) | None => Map::new(),
        },
        _ => {
            warn!("Discarding session blob that is not a JSON object.");
            Map::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn data() -> Map<String, Value> {
        json!({"count": 5, "name": "crab"})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn round_trip() {
        let blob = save(&data());
        assert_eq!(load(Some(&blob)), data());
    }

    #[test]
    fn load_absent_is_empty() {
        assert_eq!(load(None), Map::new());
        assert_eq!(load(Some("")), Map::new());
    }

    #[test_log::test]
    fn load_malformed_is_empty() {
        assert_eq!(load(Some("not json")), Map::new());
        assert_eq!(load(Some("[1, 2]")), Map::new());
        assert_eq!(load(Some(r#"{"data": 7}"#)), Map::new());
    }

    #[test]
    fn save_untouched_is_canonical() {
        assert_eq!(save(&Map::new()), r#"{"data":{}}"#);
    }

    #[test]
    fn parameter_form_round_trips() {
        let value = to_value(&data());
        assert_eq!(value, json!({"data": {"count": 5, "name": "crab"}}));

        let Value::Object(bag) = value else {
            unreachable!()
        };
        assert_eq!(load_parameters(&bag), data());
    }

    #[test]
    fn parameter_form_accepts_double_encoded_string() {
        let bag = json!({"data": "{\"count\":5}"}).as_object().cloned().unwrap();
        assert_eq!(
            load_parameters(&bag),
            json!({"count": 5}).as_object().cloned().unwrap()
        );
    }
}
