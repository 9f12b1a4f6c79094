use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted résumé record.
///
/// Complex nested sections (education, skills, experience, projects,
/// extraCurricular, leadership) are stored as opaque JSONB values and returned
/// verbatim on read. `desired_roles` is the one denormalized column: a list
/// joined with `", "` on write and split back on read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub objective: String,
    pub years_experience: Option<String>,
    pub desired_roles: Option<String>,
    pub education_json: Option<Value>,
    pub skills_json: Option<Value>,
    pub experience_json: Option<Value>,
    pub projects_json: Option<Value>,
    pub extra_curricular_json: Option<Value>,
    pub leadership_json: Option<Value>,
    /// Null until a render succeeds at least once; overwritten, never versioned.
    pub pdf_filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
