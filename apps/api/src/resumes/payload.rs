//! Wire shape for résumé submissions and its mapping onto the persisted row.
//!
//! The same shape is used three ways: deserialized from create/update request
//! bodies, rebuilt from a stored row when a PDF must be synthesized on demand,
//! and serialized (plus a synthesized `fullName`) as template input.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::resume::ResumeRow;

/// Separator for the desiredRoles denormalization: the input list is joined
/// into one column on write and split back on read. Lossy if a role contains
/// the separator itself.
pub const ROLE_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePayload {
    pub personal_details: Option<PersonalDetails>,
    pub objective: Option<Objective>,
    pub education: Option<Value>,
    pub skills: Option<Value>,
    pub experience: Option<Value>,
    pub projects: Option<Value>,
    pub extra_curricular: Option<Value>,
    pub leadership: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub portfolio: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub summary: Option<String>,
    pub years_experience: Option<String>,
    pub desired_roles: Option<Vec<String>>,
}

/// Flattened, validated form of the payload, ready for persistence.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub objective: String,
    pub years_experience: Option<String>,
    /// Already joined with [`ROLE_SEPARATOR`].
    pub desired_roles: Option<String>,
    pub education: Option<Value>,
    pub skills: Option<Value>,
    pub experience: Option<Value>,
    pub projects: Option<Value>,
    pub extra_curricular: Option<Value>,
    pub leadership: Option<Value>,
}

impl ResumePayload {
    /// Flattens the wire shape into the persisted column shape, checking that
    /// the required personal fields are present and non-blank. The error is
    /// the client-facing message naming the first missing field.
    pub fn to_record(&self) -> Result<NewResume, String> {
        let personal = self
            .personal_details
            .as_ref()
            .ok_or_else(|| "personalDetails is required".to_string())?;
        let first_name = required(&personal.first_name, "personalDetails.firstName")?;
        let last_name = required(&personal.last_name, "personalDetails.lastName")?;
        let email = required(&personal.email, "personalDetails.email")?;
        let objective = self
            .objective
            .as_ref()
            .ok_or_else(|| "objective.summary is required".to_string())?;
        let summary = required(&objective.summary, "objective.summary")?;

        Ok(NewResume {
            first_name,
            last_name,
            email,
            phone: personal.phone.clone(),
            location: personal.location.clone(),
            portfolio_url: personal.portfolio.clone(),
            linkedin_url: personal.linkedin.clone(),
            objective: summary,
            years_experience: objective.years_experience.clone(),
            desired_roles: objective.desired_roles.as_deref().map(join_roles),
            education: self.education.clone(),
            skills: self.skills.clone(),
            experience: self.experience.clone(),
            projects: self.projects.clone(),
            // Optional section fields default to an empty marker object
            // rather than SQL NULL.
            extra_curricular: Some(self.extra_curricular.clone().unwrap_or_else(empty_section)),
            leadership: Some(self.leadership.clone().unwrap_or_else(empty_section)),
        })
    }

    /// Template input: the wire shape plus `personalDetails.fullName`.
    pub fn template_data(&self) -> Value {
        let mut data = serde_json::to_value(self).unwrap_or_else(|_| json!({}));
        if let Some(personal) = &self.personal_details {
            let full_name = format!(
                "{} {}",
                personal.first_name.as_deref().unwrap_or_default(),
                personal.last_name.as_deref().unwrap_or_default()
            );
            if let Some(details) = data.get_mut("personalDetails").and_then(Value::as_object_mut) {
                details.insert(
                    "fullName".to_string(),
                    Value::String(full_name.trim().to_string()),
                );
            }
        }
        data
    }

    /// Rebuilds the wire shape from a persisted row, re-splitting
    /// `desired_roles`. Used when a PDF must be synthesized on demand.
    pub fn from_row(row: &ResumeRow) -> Self {
        ResumePayload {
            personal_details: Some(PersonalDetails {
                first_name: Some(row.first_name.clone()),
                last_name: Some(row.last_name.clone()),
                email: Some(row.email.clone()),
                phone: row.phone.clone(),
                location: row.location.clone(),
                portfolio: row.portfolio_url.clone(),
                linkedin: row.linkedin_url.clone(),
            }),
            objective: Some(Objective {
                summary: Some(row.objective.clone()),
                years_experience: row.years_experience.clone(),
                desired_roles: Some(split_roles(row.desired_roles.as_deref())),
            }),
            education: row.education_json.clone(),
            skills: row.skills_json.clone(),
            experience: row.experience_json.clone(),
            projects: row.projects_json.clone(),
            extra_curricular: row.extra_curricular_json.clone(),
            leadership: row.leadership_json.clone(),
        }
    }
}

pub fn join_roles(roles: &[String]) -> String {
    roles.join(ROLE_SEPARATOR)
}

pub fn split_roles(joined: Option<&str>) -> Vec<String> {
    match joined {
        Some(s) if !s.is_empty() => s.split(ROLE_SEPARATOR).map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

fn empty_section() -> Value {
    Value::Object(serde_json::Map::new())
}

fn required(value: &Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(format!("{field} is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_payload() -> ResumePayload {
        serde_json::from_value(json!({
            "personalDetails": {
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@x.com"
            },
            "objective": { "summary": "Engineer" },
            "education": [],
            "skills": { "technical": [] },
            "experience": [],
            "projects": []
        }))
        .unwrap()
    }

    #[test]
    fn test_minimal_payload_flattens() {
        let record = minimal_payload().to_record().unwrap();
        assert_eq!(record.first_name, "Ada");
        assert_eq!(record.last_name, "Lovelace");
        assert_eq!(record.email, "ada@x.com");
        assert_eq!(record.objective, "Engineer");
        assert!(record.desired_roles.is_none());
    }

    #[test]
    fn test_missing_first_name_is_rejected() {
        let mut payload = minimal_payload();
        payload.personal_details.as_mut().unwrap().first_name = None;
        let err = payload.to_record().unwrap_err();
        assert!(err.contains("firstName"));
    }

    #[test]
    fn test_blank_last_name_is_rejected() {
        let mut payload = minimal_payload();
        payload.personal_details.as_mut().unwrap().last_name = Some("   ".to_string());
        let err = payload.to_record().unwrap_err();
        assert!(err.contains("lastName"));
    }

    #[test]
    fn test_missing_email_is_rejected() {
        let mut payload = minimal_payload();
        payload.personal_details.as_mut().unwrap().email = None;
        assert!(payload.to_record().unwrap_err().contains("email"));
    }

    #[test]
    fn test_missing_objective_summary_is_rejected() {
        let mut payload = minimal_payload();
        payload.objective = Some(Objective::default());
        assert!(payload.to_record().unwrap_err().contains("objective.summary"));

        payload.objective = None;
        assert!(payload.to_record().unwrap_err().contains("objective.summary"));
    }

    #[test]
    fn test_missing_personal_details_is_rejected() {
        let mut payload = minimal_payload();
        payload.personal_details = None;
        assert!(payload.to_record().unwrap_err().contains("personalDetails"));
    }

    #[test]
    fn test_desired_roles_round_trip() {
        let roles = vec!["Backend".to_string(), "Infra".to_string()];
        let joined = join_roles(&roles);
        assert_eq!(joined, "Backend, Infra");
        assert_eq!(split_roles(Some(&joined)), roles);
    }

    #[test]
    fn test_empty_roles_round_trip_to_empty_list() {
        let joined = join_roles(&[]);
        assert_eq!(joined, "");
        assert!(split_roles(Some(&joined)).is_empty());
        assert!(split_roles(None).is_empty());
    }

    #[test]
    fn test_optional_sections_default_to_empty_marker() {
        let record = minimal_payload().to_record().unwrap();
        assert_eq!(record.extra_curricular, Some(json!({})));
        assert_eq!(record.leadership, Some(json!({})));
    }

    #[test]
    fn test_provided_sections_are_kept_verbatim() {
        let mut payload = minimal_payload();
        payload.leadership = Some(json!({ "role": "Captain", "organization": "Chess Club" }));
        let record = payload.to_record().unwrap();
        assert_eq!(
            record.leadership,
            Some(json!({ "role": "Captain", "organization": "Chess Club" }))
        );
    }

    #[test]
    fn test_template_data_synthesizes_full_name() {
        let data = minimal_payload().template_data();
        assert_eq!(data["personalDetails"]["fullName"], "Ada Lovelace");
        assert_eq!(data["personalDetails"]["firstName"], "Ada");
    }

    #[test]
    fn test_from_row_splits_roles_and_keeps_sections() {
        let row = ResumeRow {
            id: uuid::Uuid::new_v4(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@navy.mil".to_string(),
            phone: None,
            location: Some("Arlington".to_string()),
            portfolio_url: None,
            linkedin_url: None,
            objective: "Build compilers".to_string(),
            years_experience: Some("40".to_string()),
            desired_roles: Some("Backend, Infra".to_string()),
            education_json: Some(json!([{ "degree": "PhD" }])),
            skills_json: Some(json!({ "technical": ["COBOL"] })),
            experience_json: Some(json!([])),
            projects_json: Some(json!([])),
            extra_curricular_json: Some(json!({})),
            leadership_json: Some(json!({})),
            pdf_filename: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let payload = ResumePayload::from_row(&row);
        let objective = payload.objective.as_ref().unwrap();
        assert_eq!(
            objective.desired_roles,
            Some(vec!["Backend".to_string(), "Infra".to_string()])
        );
        assert_eq!(payload.education, Some(json!([{ "degree": "PhD" }])));

        let data = payload.template_data();
        assert_eq!(data["personalDetails"]["fullName"], "Grace Hopper");
    }
}
