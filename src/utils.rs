//! Utilities
//!
//! Helpers shared across the crate: JSON Schema compilation and validation,
//! date normalization, and lenient argument deserializers.

use crate::errors::Error;

//=============================================================================
// 1. Schema Validation
//=============================================================================

/// JSON Schema helpers backed by `jsonschema` and `schemars`
pub mod schema {
    use jsonschema::JSONSchema;
    use schemars::{JsonSchema, schema_for};
    use serde_json::Value;

    use super::Error;

    /// Generate a JSON schema for the given type
    pub fn generate_schema<T: JsonSchema>() -> Value {
        serde_json::to_value(schema_for!(T)).unwrap_or(Value::Null)
    }

    /// Compile a schema once so it can be reused for every call
    pub fn compile(schema: &Value) -> Result<JSONSchema, Error> {
        JSONSchema::compile(schema).map_err(|e| Error::Protocol(format!("Invalid schema: {}", e)))
    }

    /// Validate a value against a compiled schema, collecting every violation
    pub fn validate_compiled(compiled: &JSONSchema, value: &Value) -> Result<(), Error> {
        if let Err(errors) = compiled.validate(value) {
            let messages: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect();
            return Err(Error::InvalidParams(messages.join(", ")));
        }
        Ok(())
    }
}

//=============================================================================
// 2. Dates
//=============================================================================

/// Strip any time-of-day suffix so only `YYYY-MM-DD` remains.
pub fn normalize_date(value: &str) -> String {
    value
        .split('T')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Today's date plus `days`, formatted as `YYYY-MM-DD`
pub fn date_in_days(days: i64) -> String {
    (chrono::Utc::now().date_naive() + chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

//=============================================================================
// 3. Argument Deserializers
//=============================================================================

/// `deserialize_with` helpers accepting the loose shapes tool clients send
pub mod de {
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;

    fn scalar_to_string<E: de::Error>(value: Value) -> Result<Option<String>, E> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            other => Err(E::custom(format!("expected a string or number, got {}", other))),
        }
    }

    /// Accept `"3"` or `3`, yielding the opaque string form
    pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        scalar_to_string(Value::deserialize(deserializer)?)?
            .ok_or_else(|| de::Error::custom("value must not be null"))
    }

    pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        scalar_to_string(Value::deserialize(deserializer)?)
    }

    /// A date whose time-of-day suffix is dropped
    pub fn date<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(super::normalize_date(&raw))
    }

    pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .map(|d| super::normalize_date(&d))
            .filter(|d| !d.is_empty()))
    }

    /// Accept a list or a single comma-separated string
    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Vec::new()),
            Value::String(s) => Ok(s
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect()),
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| scalar_to_string(item).transpose())
                .collect(),
            other => Err(de::Error::custom(format!("expected a list, got {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("2025-12-15"), "2025-12-15");
        assert_eq!(normalize_date("2025-12-15T10:30:00Z"), "2025-12-15");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_date_in_days_shape() {
        let date = date_in_days(30);
        assert_eq!(date.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());
    }

    #[derive(Deserialize)]
    struct Loose {
        #[serde(deserialize_with = "de::string_or_number")]
        max: String,
        #[serde(default, deserialize_with = "de::opt_date")]
        when: Option<String>,
        #[serde(default, deserialize_with = "de::string_list")]
        tags: Vec<String>,
    }

    #[test]
    fn test_loose_deserializers() {
        let parsed: Loose = serde_json::from_value(json!({
            "max": 5,
            "when": "2025-01-02T00:00:00",
            "tags": "SIGHTS, RESTAURANT"
        }))
        .unwrap();
        assert_eq!(parsed.max, "5");
        assert_eq!(parsed.when.as_deref(), Some("2025-01-02"));
        assert_eq!(parsed.tags, vec!["SIGHTS", "RESTAURANT"]);

        let parsed: Loose = serde_json::from_value(json!({ "max": "7", "tags": ["a"] })).unwrap();
        assert_eq!(parsed.max, "7");
        assert!(parsed.when.is_none());
        assert_eq!(parsed.tags, vec!["a"]);
    }

    #[test]
    fn test_schema_validation_reports_missing_field() {
        let schema = json!({
            "type": "object",
            "properties": { "keyword": { "type": "string" } },
            "required": ["keyword"]
        });

        let compiled = schema::compile(&schema).unwrap();
        assert!(schema::validate_compiled(&compiled, &json!({ "keyword": "Paris" })).is_ok());

        let err = schema::validate_compiled(&compiled, &json!({})).unwrap_err();
        match err {
            Error::InvalidParams(message) => assert!(message.contains("keyword")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_generated_schema_accepts_tool_calls() {
        let compiled = schema::compile(&schema::generate_schema::<crate::types::CallToolParams>()).unwrap();

        let call = json!({ "name": "search_cities", "arguments": { "keyword": "Rome" } });
        assert!(schema::validate_compiled(&compiled, &call).is_ok());
        assert!(schema::validate_compiled(&compiled, &json!({ "arguments": {} })).is_err());
    }
}
