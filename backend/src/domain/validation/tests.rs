//! Tests for the request validation helpers.

use super::*;
use crate::domain::ErrorKind;
use rstest::{fixture, rstest};
use serde_json::json;

fn data(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(fields) => fields,
        other => panic!("fixture must be an object, got {other}"),
    }
}

#[fixture]
fn schema() -> ValidationSchema {
    ValidationSchema::object().with_required(["user_id", "activity_type"])
}

#[rstest]
#[case(json!(null))]
#[case(json!("text"))]
#[case(json!(42))]
#[case(json!([1, 2]))]
fn object_schema_rejects_non_objects(schema: ValidationSchema, #[case] input: Value) {
    let err = validate(&input, &schema).expect_err("non-object rejected");
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.message(), "Expected object");
}

#[rstest]
fn first_missing_field_in_schema_order_wins(schema: ValidationSchema) {
    let err = validate(&json!({}), &schema).expect_err("missing fields");
    assert_eq!(err.message(), "Missing required field: user_id");
}

#[rstest]
fn null_counts_as_missing(schema: ValidationSchema) {
    let err = validate(&json!({"user_id": "u", "activity_type": null}), &schema)
        .expect_err("null field");
    assert_eq!(err.message(), "Missing required field: activity_type");
}

#[rstest]
fn falsy_values_satisfy_required(schema: ValidationSchema) {
    let input = json!({"user_id": "", "activity_type": false});
    assert!(validate(&input, &schema).is_ok());
}

#[rstest]
fn nested_properties_are_not_inspected() {
    let mut properties = Map::new();
    properties.insert("inner".to_owned(), json!({"type": "number"}));
    let schema = ValidationSchema {
        properties: Some(properties),
        ..ValidationSchema::object().with_required(["inner"])
    };
    assert!(validate(&json!({"inner": "not a number"}), &schema).is_ok());
}

#[rstest]
fn non_object_schemas_skip_required_for_scalars() {
    let schema = ValidationSchema {
        schema_type: "string".to_owned(),
        ..ValidationSchema::default()
    }
    .with_required(["anything"]);
    assert!(validate(&json!("value"), &schema).is_ok());
}

#[rstest]
fn schema_deserialises_from_json() {
    let schema: ValidationSchema = serde_json::from_value(json!({
        "type": "object",
        "required": ["repo_url"],
        "properties": {"repo_url": {"type": "string"}}
    }))
    .expect("schema parses");
    assert_eq!(schema.schema_type, "object");
    assert_eq!(schema.required, Some(vec!["repo_url".to_owned()]));
    assert!(validate(&json!({"commit_sha": "abc"}), &schema).is_err());
}

#[rstest]
fn sanitize_escapes_script_payload() {
    assert_eq!(
        sanitize_string("<script>alert('xss')</script>"),
        "&lt;script&gt;alert(&#x27;xss&#x27;)&lt;&#x2F;script&gt;"
    );
}

#[rstest]
#[case("<script>alert('xss')</script>")]
#[case(r#"He said "hi" & left"#)]
#[case("plain text")]
fn sanitize_twice_equals_once(#[case] input: &str) {
    let once = sanitize_string(input);
    assert_eq!(sanitize_string(&once), once);
}

#[rstest]
fn sanitize_leaves_ampersands_alone() {
    assert_eq!(sanitize_string("a & b"), "a & b");
    assert_eq!(sanitize_string("\"q\""), "&quot;q&quot;");
}

#[rstest]
#[case("550e8400-e29b-41d4-a716-446655440000", true)]
#[case("550E8400-E29B-41D4-A716-446655440000", true)]
#[case("00000000-0000-0000-0000-000000000000", true)]
#[case("not-a-uuid", false)]
#[case("550e8400e29b41d4a716446655440000", false)]
#[case("{550e8400-e29b-41d4-a716-446655440000}", false)]
#[case("550e8400-e29b-41d4-a716-44665544000g", false)]
#[case("550e8400-e29b-41d4-a716-4466554400000", false)]
#[case("", false)]
fn uuid_shape(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(is_valid_uuid(input), expected);
}

#[rstest]
#[case("user@example.com", true)]
#[case("first.last@sub.example.org", true)]
#[case("not-an-email", false)]
#[case("user@localhost", false)]
#[case("us er@example.com", false)]
#[case("user@@example.com", false)]
#[case("@example.com", false)]
#[case("user@example.", false)]
fn email_shape(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(is_valid_email(input), expected);
}

#[rstest]
#[case("2024-01-15T10:30:00Z", true)]
#[case("2024-01-15T10:30:00.123Z", true)]
#[case("2024-01-15T10:30:00", true)]
#[case("2024-02-29T23:59:59Z", true)]
#[case("2024-13-45", false)]
#[case("2024-13-01T10:30:00Z", false)]
#[case("2023-02-29T10:30:00Z", false)]
#[case("2024-01-15T25:00:00Z", false)]
#[case("2024-01-15T10:30:00.12Z", false)]
#[case("2024-01-15 10:30:00Z", false)]
#[case("2024-01-15T10:30:00+02:00", false)]
#[case("2024-01-15T10:30:60Z", false)]
#[case("2024-06-30T23:59:60Z", false)]
#[case("2024-06-30T23:59:60.500Z", false)]
fn iso8601_shape_and_calendar(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(is_valid_iso8601(input), expected);
}

#[rstest]
fn code_commit_accepts_repo_and_sha() {
    let payload = data(json!({
        "repo_url": "https://github.com/user/repo",
        "commit_sha": "abc123"
    }));
    assert!(validate_activity_data("code_commit", &payload).is_ok());
}

#[rstest]
#[case(json!({"repo_url": "https://github.com/user/repo"}))]
#[case(json!({"repo_url": "", "commit_sha": "abc123"}))]
#[case(json!({"repo_url": "https://github.com/user/repo", "commit_sha": null}))]
fn code_commit_requires_truthy_fields(#[case] payload: Value) {
    let err = validate_activity_data("code_commit", &data(payload)).expect_err("rejected");
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.message(), "code_commit requires repo_url and commit_sha");
}

#[rstest]
#[case(json!({"latitude": 34.0522, "longitude": -118.2437}))]
#[case(json!({"latitude": 200, "longitude": 0}))]
fn location_checkin_accepts_numbers(#[case] payload: Value) {
    assert!(validate_activity_data("location_checkin", &data(payload)).is_ok());
}

#[rstest]
#[case(json!({"latitude": "not a number", "longitude": -118.2437}))]
#[case(json!({"latitude": 34.0522}))]
#[case(json!({"latitude": null, "longitude": -118.2437}))]
fn location_checkin_requires_numbers(#[case] payload: Value) {
    let err = validate_activity_data("location_checkin", &data(payload)).expect_err("rejected");
    assert_eq!(
        err.message(),
        "location_checkin requires latitude and longitude"
    );
}

#[rstest]
#[case(json!({"device_id": "sensor-001", "sensor_type": "temperature", "reading_value": 22.5}))]
#[case(json!({"device_id": "sensor-001", "sensor_type": "temperature", "reading_value": 0}))]
#[case(json!({"device_id": "sensor-001", "sensor_type": "switch", "reading_value": false}))]
fn iot_sensor_reading_accepts_defined_readings(#[case] payload: Value) {
    assert!(validate_activity_data("iot_sensor_reading", &data(payload)).is_ok());
}

#[rstest]
#[case(json!({"device_id": "sensor-001"}))]
#[case(json!({"device_id": "sensor-001", "sensor_type": "temperature"}))]
#[case(json!({"device_id": 0, "sensor_type": "temperature", "reading_value": 1}))]
fn iot_sensor_reading_requires_fields(#[case] payload: Value) {
    let err =
        validate_activity_data("iot_sensor_reading", &data(payload)).expect_err("rejected");
    assert_eq!(
        err.message(),
        "iot_sensor_reading requires device_id, sensor_type, and reading_value"
    );
}

#[rstest]
#[case("workshop_attendance")]
#[case("peer_review")]
#[case("anything_else")]
fn other_activity_types_pass(#[case] activity_type: &str) {
    assert!(validate_activity_data(activity_type, &Map::new()).is_ok());
}

#[rstest]
#[case(json!([]), true)]
#[case(json!({}), true)]
#[case(json!(-0.0), false)]
#[case(json!(0.5), true)]
#[case(json!("0"), true)]
fn truthiness_follows_json_semantics(#[case] value: Value, #[case] expected: bool) {
    assert_eq!(is_truthy(Some(&value)), expected);
}
