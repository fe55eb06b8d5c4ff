use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::record::{require_fields, RecordError};

/// Color assigned when a class is created without one
pub const DEFAULT_COLOR: &str = "#0046FF";

/// One entry in the weekly class schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    pub id: Uuid,
    pub subject: String,
    pub instructor: String,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// Client-supplied class fields. Every field is optional at this stage;
/// creation and update decide what is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInput {
    pub subject: Option<String>,
    pub instructor: Option<String>,
    pub day_of_week: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub color: Option<String>,
    pub notes: Option<String>,
}

/// A validated class ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewClassSession {
    pub subject: String,
    pub instructor: String,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub color: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl NewClassSession {
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("subject".into(), Value::String(self.subject));
        fields.insert("instructor".into(), Value::String(self.instructor));
        fields.insert("dayOfWeek".into(), Value::String(self.day_of_week));
        fields.insert("startTime".into(), Value::String(self.start_time));
        fields.insert("endTime".into(), Value::String(self.end_time));
        fields.insert("color".into(), Value::String(self.color));
        fields.insert("notes".into(), Value::String(self.notes));
        fields.insert("createdAt".into(), timestamp(self.created_at));
        fields
    }
}

impl ClassInput {
    fn required(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("subject", self.subject.as_deref()),
            ("instructor", self.instructor.as_deref()),
            ("dayOfWeek", self.day_of_week.as_deref()),
            ("startTime", self.start_time.as_deref()),
            ("endTime", self.end_time.as_deref()),
        ]
    }

    /// Validate for creation. Missing `color`/`notes` take their defaults.
    pub fn into_new_class(self, now: DateTime<Utc>) -> Result<NewClassSession, RecordError> {
        require_fields(&self.required())?;

        Ok(NewClassSession {
            subject: self.subject.unwrap_or_default(),
            instructor: self.instructor.unwrap_or_default(),
            day_of_week: self.day_of_week.unwrap_or_default(),
            start_time: self.start_time.unwrap_or_default(),
            end_time: self.end_time.unwrap_or_default(),
            color: self.color.filter(|c| !c.is_empty()).unwrap_or_else(default_color),
            notes: self.notes.unwrap_or_default(),
            created_at: now,
        })
    }

    /// Partial update: only supplied fields are written. Empty schedule
    /// fields are ignored so a class never loses a required value;
    /// `notes` may be cleared with an empty string.
    pub fn into_patch(self, now: DateTime<Utc>) -> Map<String, Value> {
        let mut patch = Map::new();

        let schedule = [
            ("subject", self.subject),
            ("instructor", self.instructor),
            ("dayOfWeek", self.day_of_week),
            ("startTime", self.start_time),
            ("endTime", self.end_time),
            ("color", self.color),
        ];
        for (key, value) in schedule {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                patch.insert(key.into(), Value::String(v));
            }
        }
        if let Some(notes) = self.notes {
            patch.insert("notes".into(), Value::String(notes));
        }

        patch.insert("updatedAt".into(), timestamp(now));
        patch
    }
}

/// Stored timestamp form: RFC 3339 in UTC
pub fn timestamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_input() -> ClassInput {
        ClassInput {
            subject: Some("Physics".into()),
            instructor: Some("Dr. Rahman".into()),
            day_of_week: Some("Monday".into()),
            start_time: Some("09:00".into()),
            end_time: Some("10:30".into()),
            color: None,
            notes: None,
        }
    }

    #[test]
    fn creation_applies_defaults() {
        let now = Utc::now();
        let class = full_input().into_new_class(now).unwrap();
        assert_eq!(class.color, DEFAULT_COLOR);
        assert_eq!(class.notes, "");
        assert_eq!(class.created_at, now);

        let fields = class.into_fields();
        assert_eq!(fields["dayOfWeek"], json!("Monday"));
        assert_eq!(fields["color"], json!(DEFAULT_COLOR));
        assert!(fields["createdAt"].is_string());
        assert!(!fields.contains_key("updatedAt"));
    }

    #[test]
    fn empty_color_takes_default() {
        let mut input = full_input();
        input.color = Some(String::new());
        assert_eq!(input.into_new_class(Utc::now()).unwrap().color, DEFAULT_COLOR);
    }

    #[test]
    fn creation_rejects_each_missing_field() {
        let blank: [fn(&mut ClassInput); 5] = [
            |i| i.subject = None,
            |i| i.instructor = Some(String::new()),
            |i| i.day_of_week = None,
            |i| i.start_time = None,
            |i| i.end_time = Some(String::new()),
        ];
        for clear in blank {
            let mut input = full_input();
            clear(&mut input);
            assert!(matches!(
                input.into_new_class(Utc::now()),
                Err(RecordError::MissingRequiredFields(fields)) if fields.len() == 1
            ));
        }
    }

    #[test]
    fn patch_only_carries_supplied_fields() {
        let input = ClassInput {
            subject: Some("Chemistry".into()),
            instructor: Some(String::new()),
            notes: Some(String::new()),
            ..Default::default()
        };
        let patch = input.into_patch(Utc::now());
        assert_eq!(patch["subject"], json!("Chemistry"));
        assert_eq!(patch["notes"], json!(""));
        assert!(patch.contains_key("updatedAt"));
        assert!(!patch.contains_key("instructor"));
        assert!(!patch.contains_key("dayOfWeek"));
        assert!(!patch.contains_key("createdAt"));
    }

    #[test]
    fn session_decodes_with_camel_case_keys() {
        let id = Uuid::new_v4();
        let session: ClassSession = serde_json::from_value(json!({
            "id": id.to_string(),
            "subject": "Physics",
            "instructor": "Dr. Rahman",
            "dayOfWeek": "Monday",
            "startTime": "09:00",
            "endTime": "10:30",
            "createdAt": "2024-03-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.color, DEFAULT_COLOR);
        assert!(session.updated_at.is_none());
    }
}
