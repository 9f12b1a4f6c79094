//! CRUD persistence for résumé records.
//!
//! All queries bind at runtime; nested sections round-trip through JSONB
//! columns untouched. `update` is a full replace of every column (no partial
//! merge) and refreshes `updated_at`.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::ResumeRow;
use crate::resumes::payload::NewResume;

/// Inserts a new record with a server-generated id and returns the stored row.
/// `pdf_filename` is whatever the pre-insert render attempt produced, if any.
pub async fn create(
    pool: &PgPool,
    resume: &NewResume,
    pdf_filename: Option<&str>,
) -> Result<ResumeRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (id, first_name, last_name, email, phone, location, portfolio_url,
             linkedin_url, objective, years_experience, desired_roles,
             education_json, skills_json, experience_json, projects_json,
             extra_curricular_json, leadership_json, pdf_filename)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&resume.first_name)
    .bind(&resume.last_name)
    .bind(&resume.email)
    .bind(&resume.phone)
    .bind(&resume.location)
    .bind(&resume.portfolio_url)
    .bind(&resume.linkedin_url)
    .bind(&resume.objective)
    .bind(&resume.years_experience)
    .bind(&resume.desired_roles)
    .bind(&resume.education)
    .bind(&resume.skills)
    .bind(&resume.experience)
    .bind(&resume.projects)
    .bind(&resume.extra_curricular)
    .bind(&resume.leadership)
    .bind(pdf_filename)
    .fetch_one(pool)
    .await
}

/// All records, newest first.
pub async fn find_all(pool: &PgPool) -> Result<Vec<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Full replace of every column. Returns `None` if the id is absent.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    resume: &NewResume,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes SET
            first_name = $2, last_name = $3, email = $4, phone = $5,
            location = $6, portfolio_url = $7, linkedin_url = $8,
            objective = $9, years_experience = $10, desired_roles = $11,
            education_json = $12, skills_json = $13, experience_json = $14,
            projects_json = $15, extra_curricular_json = $16,
            leadership_json = $17, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&resume.first_name)
    .bind(&resume.last_name)
    .bind(&resume.email)
    .bind(&resume.phone)
    .bind(&resume.location)
    .bind(&resume.portfolio_url)
    .bind(&resume.linkedin_url)
    .bind(&resume.objective)
    .bind(&resume.years_experience)
    .bind(&resume.desired_roles)
    .bind(&resume.education)
    .bind(&resume.skills)
    .bind(&resume.experience)
    .bind(&resume.projects)
    .bind(&resume.extra_curricular)
    .bind(&resume.leadership)
    .fetch_optional(pool)
    .await
}

/// Records a freshly generated PDF filename. Overwrites any prior value; the
/// prior file stays on disk until the résumé itself is deleted.
pub async fn set_pdf_filename(
    pool: &PgPool,
    id: Uuid,
    pdf_filename: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE resumes SET pdf_filename = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(pdf_filename)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
