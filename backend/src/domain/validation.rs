//! Request validation helpers.
//!
//! Each helper is stateless. Assertions return the first violated rule as a
//! validation [`AppError`]; predicates return `bool`.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{AppError, AppResult};

/// Minimal structural schema understood by [`validate`].
///
/// `properties` is carried for callers that describe nested fields but is
/// never inspected; validation is shallow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSchema {
    /// Expected JSON type; only `"object"` is enforced.
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Fields that must be present and non-null, checked in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Nested field descriptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

impl ValidationSchema {
    /// Schema expecting a JSON object with no required fields.
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_owned(),
            ..Self::default()
        }
    }

    /// Replace the required field list.
    #[must_use]
    pub fn with_required<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

/// Check `data` against the shallow rules of `schema`.
///
/// # Errors
/// - `"Expected object"` when the schema type is `object` and `data` is not a
///   JSON object.
/// - `"Missing required field: {field}"` for the first required field that is
///   absent or null.
///
/// # Examples
/// ```
/// use backend::domain::validation::{ValidationSchema, validate};
/// use serde_json::json;
///
/// let schema = ValidationSchema::object().with_required(["name"]);
/// assert!(validate(&json!({ "name": "Ada" }), &schema).is_ok());
/// let err = validate(&json!({ "name": null }), &schema).unwrap_err();
/// assert_eq!(err.message(), "Missing required field: name");
/// ```
pub fn validate(data: &Value, schema: &ValidationSchema) -> AppResult<()> {
    if schema.schema_type == "object" && !data.is_object() {
        return Err(AppError::validation("Expected object"));
    }

    if let (Some(required), Some(fields)) = (&schema.required, data.as_object()) {
        let missing = required
            .iter()
            .find(|field| fields.get(field.as_str()).is_none_or(Value::is_null));
        if let Some(field) = missing {
            return Err(AppError::validation(format!(
                "Missing required field: {field}"
            )));
        }
    }

    Ok(())
}

/// Escape the five HTML-significant characters `< > " ' /`.
///
/// `&` is left untouched, so sanitising twice yields the same string.
///
/// # Examples
/// ```
/// use backend::domain::validation::sanitize_string;
///
/// assert_eq!(sanitize_string("<b>"), "&lt;b&gt;");
/// ```
pub fn sanitize_string(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            other => escaped.push(other),
        }
    }
    escaped
}

static UUID_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static ISO8601_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, name: &str, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("{name} regex failed to compile: {error}"))
    })
}

/// True for canonical 8-4-4-4-12 hexadecimal UUIDs in either letter case.
pub fn is_valid_uuid(value: &str) -> bool {
    compiled(
        &UUID_RE,
        "uuid",
        "^(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
    )
    .is_match(value)
}

/// True for `local@domain.tld`-shaped addresses without whitespace.
///
/// This is a shape check, not RFC 5322 parsing.
pub fn is_valid_email(value: &str) -> bool {
    compiled(&EMAIL_RE, "email", r"^[^\s@]+@[^\s@]+\.[^\s@]+$").is_match(value)
}

/// True for `YYYY-MM-DDTHH:MM:SS[.mmm][Z]` strings naming a real instant.
///
/// The pattern alone admits values such as month 13 or second 60; the
/// calendar parse rejects them.
pub fn is_valid_iso8601(value: &str) -> bool {
    parse_iso8601(value).is_some()
}

/// Parse a timestamp accepted by [`is_valid_iso8601`], reading it as UTC.
///
/// # Examples
/// ```
/// use backend::domain::validation::parse_iso8601;
///
/// let instant = parse_iso8601("2024-01-15T10:30:00Z").expect("valid timestamp");
/// assert_eq!(instant.to_rfc3339(), "2024-01-15T10:30:00+00:00");
/// assert!(parse_iso8601("2024-13-01T10:30:00Z").is_none());
/// ```
pub fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    let pattern = compiled(
        &ISO8601_RE,
        "iso8601",
        r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]{3})?Z?$",
    );
    if !pattern.is_match(value) {
        return None;
    }
    NaiveDateTime::parse_from_str(value.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        // chrono reads second 60 as a leap second; it is not a wall-clock value.
        .filter(|naive| naive.nanosecond() < 1_000_000_000)
        .map(|naive| naive.and_utc())
}

/// Check `data` against the rules for `activity_type`.
///
/// Types without dedicated rules pass unchecked.
///
/// # Errors
/// Returns a validation [`AppError`] naming the fields the type requires.
pub fn validate_activity_data(activity_type: &str, data: &Map<String, Value>) -> AppResult<()> {
    match activity_type {
        "code_commit" => {
            if !is_truthy(data.get("repo_url")) || !is_truthy(data.get("commit_sha")) {
                return Err(AppError::validation(
                    "code_commit requires repo_url and commit_sha",
                ));
            }
        }
        "location_checkin" => {
            if !is_number(data.get("latitude")) || !is_number(data.get("longitude")) {
                return Err(AppError::validation(
                    "location_checkin requires latitude and longitude",
                ));
            }
        }
        "iot_sensor_reading" => {
            // Zero readings are meaningful; only presence is required.
            if !is_truthy(data.get("device_id"))
                || !is_truthy(data.get("sensor_type"))
                || !data.contains_key("reading_value")
            {
                return Err(AppError::validation(
                    "iot_sensor_reading requires device_id, sensor_type, and reading_value",
                ));
            }
        }
        _ => {}
    }
    Ok(())
}

/// JSON truthiness: null, false, zero, and the empty string are falsy.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

fn is_number(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Number(_)))
}

#[cfg(test)]
mod tests;
