use async_trait::async_trait;
use sqlx::types::BigDecimal;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::{Job, JobStatus};

const JOB_COLUMNS: &str = r#"
    id, client_id, provider_id, title, description, category,
    location, budget, status, created_at, updated_at
"#;

#[async_trait]
pub trait JobExt {
    async fn create_job(
        &self,
        client_id: Uuid,
        title: String,
        description: String,
        category: String,
        location: String,
        budget: BigDecimal,
    ) -> Result<Job, Error>;

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    /// Jobs visible to a client: the ones they posted.
    async fn list_jobs_for_client(
        &self,
        client_id: Uuid,
        status: Option<JobStatus>,
        category: Option<String>,
    ) -> Result<Vec<Job>, Error>;

    /// Jobs visible to a provider: open jobs plus the ones assigned to them.
    async fn list_jobs_for_provider(
        &self,
        provider_id: Uuid,
        status: Option<JobStatus>,
        category: Option<String>,
    ) -> Result<Vec<Job>, Error>;

    async fn list_all_jobs(
        &self,
        status: Option<JobStatus>,
        category: Option<String>,
    ) -> Result<Vec<Job>, Error>;

    /// Atomically assign a provider to an open, unassigned job.
    /// Returns `None` when the job was no longer open (or already taken).
    async fn assign_provider(&self, job_id: Uuid, provider_id: Uuid)
        -> Result<Option<Job>, Error>;

    /// Atomically move a job from `from` to `to`. Returns `None` when the
    /// job was not in `from` anymore, leaving the row untouched.
    async fn update_job_status(
        &self,
        job_id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<Option<Job>, Error>;

    /// Cancel a job from any non-terminal status.
    async fn cancel_job(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    /// Move a completed job to paid. Driven by payment confirmation only.
    async fn mark_job_paid(&self, job_id: Uuid) -> Result<Option<Job>, Error>;
}

#[async_trait]
impl JobExt for DBClient {
    async fn create_job(
        &self,
        client_id: Uuid,
        title: String,
        description: String,
        category: String,
        location: String,
        budget: BigDecimal,
    ) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (client_id, title, description, category, location, budget, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'open'::job_status)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(client_id)
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(location)
        .bind(budget)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1
            "#
        ))
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_jobs_for_client(
        &self,
        client_id: Uuid,
        status: Option<JobStatus>,
        category: Option<String>,
    ) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM jobs
            WHERE client_id = $1
              AND ($2::job_status IS NULL OR status = $2)
              AND ($3::varchar IS NULL OR category = $3)
            ORDER BY created_at DESC
            "#
        ))
        .bind(client_id)
        .bind(status)
        .bind(category)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_jobs_for_provider(
        &self,
        provider_id: Uuid,
        status: Option<JobStatus>,
        category: Option<String>,
    ) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM jobs
            WHERE (status = 'open'::job_status OR provider_id = $1)
              AND ($2::job_status IS NULL OR status = $2)
              AND ($3::varchar IS NULL OR category = $3)
            ORDER BY created_at DESC
            "#
        ))
        .bind(provider_id)
        .bind(status)
        .bind(category)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_all_jobs(
        &self,
        status: Option<JobStatus>,
        category: Option<String>,
    ) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM jobs
            WHERE ($1::job_status IS NULL OR status = $1)
              AND ($2::varchar IS NULL OR category = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(status)
        .bind(category)
        .fetch_all(&self.pool)
        .await
    }

    async fn assign_provider(
        &self,
        job_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = 'accepted'::job_status,
                provider_id = $2,
                updated_at = NOW()
            WHERE id = $1
              AND status = 'open'::job_status
              AND provider_id IS NULL
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_job_status(
        &self,
        job_id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await
    }

    async fn cancel_job(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = 'cancelled'::job_status, updated_at = NOW()
            WHERE id = $1
              AND status NOT IN ('paid'::job_status, 'cancelled'::job_status)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_job_paid(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = 'paid'::job_status, updated_at = NOW()
            WHERE id = $1 AND status = 'completed'::job_status
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }
}
