//! Structured entries produced by schema-guided extraction.
//!
//! Each entry type declares the JSON Schema the model is constrained to and is
//! validated by deserializing the returned object into the typed struct.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::llm_client::ObjectSchema;

/// Reads an explicit `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A type that can be pulled out of resume text with a schema-guided call.
pub trait Extractable: DeserializeOwned {
    fn schema() -> ObjectSchema;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl Extractable for Education {
    fn schema() -> ObjectSchema {
        ObjectSchema {
            name: "Education",
            description: "One education entry (school, university, bootcamp) listed on the resume.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "institution": {"type": "string", "description": "Name of the school or university"},
                    "degree": {"type": "string", "description": "Degree or diploma obtained, e.g. BSc, MBA"},
                    "field_of_study": {"type": "string", "description": "Major or field of study"},
                    "start_date": {"type": "string", "description": "Start date as written on the resume"},
                    "end_date": {"type": "string", "description": "End or graduation date as written on the resume"}
                },
                "required": ["institution"]
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub company: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub responsibilities: Vec<String>,
}

impl Extractable for WorkExperience {
    fn schema() -> ObjectSchema {
        ObjectSchema {
            name: "WorkExperience",
            description: "One position held at one company, as listed on the resume.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "company": {"type": "string", "description": "Name of the employer"},
                    "role": {"type": "string", "description": "Job title held at the company"},
                    "start_date": {"type": "string", "description": "Start date as written on the resume"},
                    "end_date": {"type": "string", "description": "End date as written on the resume, or 'Present'"},
                    "location": {"type": "string", "description": "City or country of the position"},
                    "responsibilities": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Responsibilities and achievements, one per item"
                    }
                },
                "required": ["company"]
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_education_only_requires_institution() {
        let entry: Education = serde_json::from_str(r#"{"institution": "MIT"}"#).unwrap();
        assert_eq!(entry.institution, "MIT");
        assert!(entry.degree.is_none());
    }

    #[test]
    fn test_education_without_institution_fails() {
        let result: Result<Education, _> = serde_json::from_str(r#"{"degree": "BSc"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_work_experience_full_deserializes() {
        let json = r#"{
            "company": "Acme",
            "role": "Backend Engineer",
            "start_date": "2019-03",
            "end_date": "Present",
            "responsibilities": ["Built billing service", "Cut p99 latency by 40%"]
        }"#;
        let entry: WorkExperience = serde_json::from_str(json).unwrap();
        assert_eq!(entry.company, "Acme");
        assert_eq!(entry.role.as_deref(), Some("Backend Engineer"));
        assert_eq!(entry.responsibilities.len(), 2);
        assert!(entry.location.is_none());
    }

    #[test]
    fn test_work_experience_null_fields_read_as_absent() {
        let entry: WorkExperience = crate::llm_client::lenient::parse(
            r#"{"company": "Acme", "role": "Eng", "location": null, "responsibilities": null}"#,
        )
        .unwrap();
        assert_eq!(entry.company, "Acme");
        assert!(entry.location.is_none());
        assert!(entry.responsibilities.is_empty());
    }

    #[test]
    fn test_work_experience_null_company_fails() {
        let result: Result<WorkExperience, _> =
            serde_json::from_str(r#"{"company": null, "role": "Eng"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_schemas_declare_required_keys() {
        assert_eq!(Education::schema().parameters["required"][0], "institution");
        assert_eq!(WorkExperience::schema().parameters["required"][0], "company");
        assert_eq!(WorkExperience::schema().name, "WorkExperience");
    }
}
