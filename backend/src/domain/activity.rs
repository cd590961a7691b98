//! Activity submissions checked before verification.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::{AppError, AppResult};
use super::validation::{
    ValidationSchema, is_valid_uuid, parse_iso8601, validate, validate_activity_data,
};

/// Activity kinds recognised by the achievement system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// A commit pushed to a tracked repository.
    CodeCommit,
    /// A geolocated check-in.
    LocationCheckin,
    /// A reading reported by a registered device.
    IotSensorReading,
    /// Attendance at a workshop session.
    WorkshopAttendance,
    /// A self-reported habit check-in.
    HabitCheckin,
    /// A review submitted by a peer.
    PeerReview,
}

impl ActivityType {
    /// Wire representation of the activity type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CodeCommit => "code_commit",
            Self::LocationCheckin => "location_checkin",
            Self::IotSensorReading => "iot_sensor_reading",
            Self::WorkshopAttendance => "workshop_attendance",
            Self::HabitCheckin => "habit_checkin",
            Self::PeerReview => "peer_review",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known [`ActivityType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown activity type: {0}")]
pub struct UnknownActivityType(pub String);

impl FromStr for ActivityType {
    type Err = UnknownActivityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code_commit" => Ok(Self::CodeCommit),
            "location_checkin" => Ok(Self::LocationCheckin),
            "iot_sensor_reading" => Ok(Self::IotSensorReading),
            "workshop_attendance" => Ok(Self::WorkshopAttendance),
            "habit_checkin" => Ok(Self::HabitCheckin),
            "peer_review" => Ok(Self::PeerReview),
            other => Err(UnknownActivityType(other.to_owned())),
        }
    }
}

/// Verification lifecycle of a recorded activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Awaiting verification.
    Pending,
    /// Verification succeeded.
    Verified,
    /// Verification failed.
    Failed,
    /// The owner contested a failed verification.
    Appealed,
}

const USER_ID: &str = "user_id";
const ACTIVITY_TYPE: &str = "activity_type";
const OCCURRED_AT: &str = "occurred_at";
const ACTIVITY_DATA: &str = "activity_data";

fn submission_schema() -> ValidationSchema {
    ValidationSchema::object().with_required([USER_ID, ACTIVITY_TYPE, OCCURRED_AT, ACTIVITY_DATA])
}

/// A validated activity submission.
///
/// ## Invariants
/// - `activity_data` satisfies the rules for `activity_type`.
/// - `occurred_at` came from a calendar-valid ISO 8601 timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ActivitySubmission {
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    user_id: Uuid,
    #[schema(example = "code_commit")]
    activity_type: String,
    #[schema(value_type = String, example = "2024-01-15T10:30:00Z")]
    occurred_at: DateTime<Utc>,
    #[schema(value_type = Object)]
    activity_data: Map<String, Value>,
    verification_status: VerificationStatus,
}

impl ActivitySubmission {
    /// Validate a raw request body and build a submission from it.
    ///
    /// Checks stop at the first violation.
    ///
    /// # Errors
    /// Returns a validation [`AppError`] describing the first violated rule.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ActivitySubmission;
    /// use serde_json::json;
    ///
    /// let payload = json!({
    ///     "user_id": "550e8400-e29b-41d4-a716-446655440000",
    ///     "activity_type": "code_commit",
    ///     "occurred_at": "2024-01-15T10:30:00Z",
    ///     "activity_data": { "repo_url": "https://github.com/user/repo", "commit_sha": "abc123" }
    /// });
    /// let submission = ActivitySubmission::from_payload(&payload).expect("valid submission");
    /// assert_eq!(submission.activity_type(), "code_commit");
    /// ```
    pub fn from_payload(payload: &Value) -> AppResult<Self> {
        validate(payload, &submission_schema())?;
        let Some(fields) = payload.as_object() else {
            return Err(AppError::validation("Expected object"));
        };

        let user_id = parse_user_id(fields.get(USER_ID))?;
        let activity_type = fields
            .get(ACTIVITY_TYPE)
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::validation("activity_type must be a string"))?;
        let occurred_at = parse_occurred_at(fields.get(OCCURRED_AT))?;
        let activity_data = fields
            .get(ACTIVITY_DATA)
            .and_then(Value::as_object)
            .ok_or_else(|| AppError::validation("activity_data must be an object"))?;

        validate_activity_data(activity_type, activity_data)?;

        Ok(Self {
            user_id,
            activity_type: activity_type.to_owned(),
            occurred_at,
            activity_data: activity_data.clone(),
            verification_status: VerificationStatus::Pending,
        })
    }

    /// Submitting user.
    pub fn user_id(&self) -> &Uuid {
        &self.user_id
    }

    /// Raw activity type discriminant.
    pub fn activity_type(&self) -> &str {
        self.activity_type.as_str()
    }

    /// Known activity kind, if the discriminant names one.
    pub fn known_type(&self) -> Option<ActivityType> {
        self.activity_type.parse().ok()
    }

    /// When the activity happened, in UTC.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Type-specific payload.
    pub fn activity_data(&self) -> &Map<String, Value> {
        &self.activity_data
    }

    /// Verification state; always pending for a fresh submission.
    pub fn verification_status(&self) -> VerificationStatus {
        self.verification_status
    }
}

fn parse_user_id(value: Option<&Value>) -> AppResult<Uuid> {
    // Uuid::parse_str alone also accepts braced and simple forms.
    value
        .and_then(Value::as_str)
        .filter(|raw| is_valid_uuid(raw))
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(|| invalid_field(USER_ID, "user_id must be a valid UUID", value))
}

fn parse_occurred_at(value: Option<&Value>) -> AppResult<DateTime<Utc>> {
    value
        .and_then(Value::as_str)
        .and_then(parse_iso8601)
        .ok_or_else(|| {
            invalid_field(OCCURRED_AT, "occurred_at must be an ISO 8601 timestamp", value)
        })
}

fn invalid_field(field: &str, message: &str, value: Option<&Value>) -> AppError {
    AppError::validation(message).with_details(json!({
        "field": field,
        "value": value.cloned().unwrap_or(Value::Null),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn payload() -> Value {
        json!({
            "user_id": "550e8400-e29b-41d4-a716-446655440000",
            "activity_type": "location_checkin",
            "occurred_at": "2024-01-15T10:30:00.250Z",
            "activity_data": { "latitude": 34.0522, "longitude": -118.2437 }
        })
    }

    fn with_field(mut payload: Value, field: &str, value: Value) -> Value {
        if let Some(fields) = payload.as_object_mut() {
            fields.insert(field.to_owned(), value);
        }
        payload
    }

    #[rstest]
    fn builds_pending_submission(payload: Value) {
        let submission = ActivitySubmission::from_payload(&payload).expect("valid payload");
        assert_eq!(
            submission.user_id().to_string(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(submission.known_type(), Some(ActivityType::LocationCheckin));
        assert_eq!(submission.verification_status(), VerificationStatus::Pending);
        assert_eq!(
            submission.occurred_at().to_rfc3339(),
            "2024-01-15T10:30:00.250+00:00"
        );
    }

    #[rstest]
    fn timestamps_without_zone_are_utc(payload: Value) {
        let payload = with_field(payload, OCCURRED_AT, json!("2024-01-15T10:30:00"));
        let submission = ActivitySubmission::from_payload(&payload).expect("valid payload");
        assert_eq!(submission.occurred_at().to_rfc3339(), "2024-01-15T10:30:00+00:00");
    }

    #[rstest]
    fn unknown_activity_types_pass(payload: Value) {
        let payload = with_field(payload, ACTIVITY_TYPE, json!("meditation"));
        let submission = ActivitySubmission::from_payload(&payload).expect("generic type passes");
        assert_eq!(submission.activity_type(), "meditation");
        assert!(submission.known_type().is_none());
    }

    #[rstest]
    fn first_missing_field_is_reported(payload: Value) {
        let mut payload = payload;
        if let Some(fields) = payload.as_object_mut() {
            fields.remove(OCCURRED_AT);
            fields.remove(ACTIVITY_DATA);
        }
        let err = ActivitySubmission::from_payload(&payload).expect_err("missing fields");
        assert_eq!(err.message(), "Missing required field: occurred_at");
    }

    #[rstest]
    fn rejects_malformed_user_id(payload: Value) {
        let payload = with_field(payload, USER_ID, json!("not-a-uuid"));
        let err = ActivitySubmission::from_payload(&payload).expect_err("bad uuid");
        assert_eq!(err.message(), "user_id must be a valid UUID");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "user_id", "value": "not-a-uuid"}))
        );
    }

    #[rstest]
    #[case(json!("2024-13-45"))]
    #[case(json!("2024-02-30T10:00:00Z"))]
    #[case(json!("2024-06-30T23:59:60Z"))]
    #[case(json!(1_705_314_600))]
    fn rejects_invalid_timestamps(payload: Value, #[case] occurred_at: Value) {
        let payload = with_field(payload, OCCURRED_AT, occurred_at);
        let err = ActivitySubmission::from_payload(&payload).expect_err("bad timestamp");
        assert_eq!(err.message(), "occurred_at must be an ISO 8601 timestamp");
    }

    #[rstest]
    fn rejects_non_string_activity_type(payload: Value) {
        let payload = with_field(payload, ACTIVITY_TYPE, json!(7));
        let err = ActivitySubmission::from_payload(&payload).expect_err("bad type");
        assert_eq!(err.message(), "activity_type must be a string");
    }

    #[rstest]
    fn rejects_non_object_activity_data(payload: Value) {
        let payload = with_field(payload, ACTIVITY_DATA, json!([1, 2]));
        let err = ActivitySubmission::from_payload(&payload).expect_err("bad data");
        assert_eq!(err.message(), "activity_data must be an object");
    }

    #[rstest]
    fn applies_activity_rules(payload: Value) {
        let payload = with_field(
            payload,
            ACTIVITY_DATA,
            json!({"latitude": "not a number", "longitude": -118.2437}),
        );
        let err = ActivitySubmission::from_payload(&payload).expect_err("bad coordinates");
        assert_eq!(err.message(), "location_checkin requires latitude and longitude");
    }

    #[rstest]
    #[case("code_commit", ActivityType::CodeCommit)]
    #[case("peer_review", ActivityType::PeerReview)]
    #[case("workshop_attendance", ActivityType::WorkshopAttendance)]
    fn activity_type_parses_wire_names(#[case] raw: &str, #[case] expected: ActivityType) {
        assert_eq!(raw.parse::<ActivityType>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn activity_type_rejects_unknown_names() {
        assert_eq!(
            "Code_Commit".parse::<ActivityType>(),
            Err(UnknownActivityType("Code_Commit".to_owned()))
        );
    }

    #[rstest]
    fn serialises_with_snake_case_status(payload: Value) {
        let submission = ActivitySubmission::from_payload(&payload).expect("valid payload");
        let value = serde_json::to_value(&submission).expect("submission serialises");
        assert_eq!(value["verification_status"], json!("pending"));
        assert_eq!(value["activity_type"], json!("location_checkin"));
    }
}
