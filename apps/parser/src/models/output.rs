use serde::{Deserialize, Serialize};

use crate::models::entries::{Education, WorkExperience};

/// A section value that is normally structured but may hold the raw text of a
/// fallback answer instead. Serialized untagged, so both shapes share one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionField<T> {
    Parsed(T),
    Raw(String),
}

impl<T: Default> Default for SectionField<T> {
    fn default() -> Self {
        SectionField::Parsed(T::default())
    }
}

impl<T> SectionField<T> {
    pub fn as_parsed(&self) -> Option<&T> {
        match self {
            SectionField::Parsed(value) => Some(value),
            SectionField::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            SectionField::Parsed(_) => None,
            SectionField::Raw(text) => Some(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub location: String,
    pub phone_number: String,
    pub email_address: Vec<String>,
    pub personal_urls: Vec<String>,
}

/// The fixed-shape result of one run. `Default` is the empty template: every
/// key is always present, absent data stays at its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub candidate_name: String,
    pub job_title: String,
    pub bio: String,
    pub contact_info: ContactInfo,
    pub skills: SectionField<Vec<String>>,
    pub professional_development: Vec<String>,
    pub other_info: String,
    pub education: SectionField<Vec<Education>>,
    pub work_experience: Vec<WorkExperience>,
}

impl OutputRecord {
    pub fn template() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_serializes_every_key() {
        let value = serde_json::to_value(OutputRecord::template()).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        for key in [
            "candidate_name",
            "job_title",
            "bio",
            "contact_info",
            "skills",
            "professional_development",
            "other_info",
            "education",
            "work_experience",
        ] {
            assert!(keys.contains(&key), "missing key {key}");
        }
        assert_eq!(value["skills"], serde_json::json!([]));
        assert_eq!(value["contact_info"]["email_address"], serde_json::json!([]));
        assert_eq!(value["contact_info"]["phone_number"], "");
    }

    #[test]
    fn test_raw_fallback_text_survives_round_trip() {
        let raw = "Python, SQL, Docker\n".to_string();
        let record = OutputRecord {
            skills: SectionField::Raw(raw.clone()),
            education: SectionField::Raw("BSc Computer Science, MIT, 2015".to_string()),
            ..OutputRecord::template()
        };

        let json = serde_json::to_string_pretty(&record).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["skills"], serde_json::Value::String(raw.clone()));

        let recovered: OutputRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered.skills.as_raw(), Some(raw.as_str()));
        assert_eq!(
            recovered.education.as_raw(),
            Some("BSc Computer Science, MIT, 2015")
        );
        assert_eq!(recovered, record);
    }

    #[test]
    fn test_parsed_skills_serialize_as_list() {
        let record = OutputRecord {
            skills: SectionField::Parsed(vec!["Python".to_string(), "SQL".to_string()]),
            ..OutputRecord::template()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["skills"], serde_json::json!(["Python", "SQL"]));
        assert!(record.skills.as_parsed().is_some());
    }
}
