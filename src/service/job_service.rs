use std::sync::Arc;

use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, jobdb::JobExt},
    models::{
        jobmodel::{next_status, Job, JobAction, JobStatus},
        usermodel::{User, UserRole},
    },
    service::error::ServiceError,
};

/// Owns the job lifecycle. All status writes go through `transition`;
/// capability checks are evaluated here rather than per endpoint.
#[derive(Debug, Clone)]
pub struct JobService {
    db_client: Arc<DBClient>,
}

impl JobService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        JobService { db_client }
    }

    pub async fn create_job(
        &self,
        actor: &User,
        title: String,
        description: String,
        category: String,
        location: String,
        budget: BigDecimal,
    ) -> Result<Job, ServiceError> {
        if actor.role != UserRole::Client && actor.role != UserRole::Admin {
            return Err(ServiceError::Validation(
                "Only clients can post jobs".to_string(),
            ));
        }
        if budget < BigDecimal::from(0) {
            return Err(ServiceError::Validation(
                "Budget cannot be negative".to_string(),
            ));
        }

        let job = self
            .db_client
            .create_job(actor.id, title, description, category, location, budget)
            .await?;

        tracing::info!(job_id = %job.id, client_id = %actor.id, "job created");
        Ok(job)
    }

    pub async fn get_job(&self, job_id: Uuid, actor: &User) -> Result<Job, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let visible = actor.role == UserRole::Admin
            || job.is_party(actor.id)
            || job.status == JobStatus::Open;
        if !visible {
            return Err(ServiceError::Forbidden {
                user: actor.id,
                entity: job_id,
            });
        }
        Ok(job)
    }

    pub async fn list_jobs(
        &self,
        actor: &User,
        status: Option<JobStatus>,
        category: Option<String>,
    ) -> Result<Vec<Job>, ServiceError> {
        let jobs = match actor.role {
            UserRole::Client => {
                self.db_client
                    .list_jobs_for_client(actor.id, status, category)
                    .await?
            }
            UserRole::Provider => {
                self.db_client
                    .list_jobs_for_provider(actor.id, status, category)
                    .await?
            }
            UserRole::Admin => self.db_client.list_all_jobs(status, category).await?,
        };
        Ok(jobs)
    }

    /// Apply a user-triggered transition. Authorization and legality are
    /// checked before any write; the write itself is a conditional update
    /// keyed on the observed status, so a racing transition cannot be
    /// silently overwritten.
    pub async fn transition(
        &self,
        job_id: Uuid,
        action: JobAction,
        actor: &User,
    ) -> Result<Job, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        authorize(&job, action, actor)?;

        let target = next_status(job.status, action).ok_or(ServiceError::InvalidTransition {
            from: job.status,
            to: action.target_status(),
            role: actor.role,
        })?;

        let updated = match action {
            JobAction::Accept => self.db_client.assign_provider(job_id, actor.id).await?,
            JobAction::Cancel => self.db_client.cancel_job(job_id).await?,
            _ => {
                self.db_client
                    .update_job_status(job_id, job.status, target)
                    .await?
            }
        };

        match updated {
            Some(job) => {
                tracing::info!(
                    job_id = %job.id,
                    action = action.to_str(),
                    status = job.status.to_str(),
                    "job transitioned"
                );
                Ok(job)
            }
            // the conditional write matched no row: someone else moved the
            // job first
            None => Err(ServiceError::Conflict),
        }
    }
}

fn authorize(job: &Job, action: JobAction, actor: &User) -> Result<(), ServiceError> {
    let forbidden = ServiceError::Forbidden {
        user: actor.id,
        entity: job.id,
    };

    match action {
        // any provider identity may claim an open job
        JobAction::Accept => {
            if actor.role != UserRole::Provider {
                return Err(forbidden);
            }
        }
        // only the assigned provider works the job
        JobAction::Start | JobAction::Complete => {
            if job.provider_id != Some(actor.id) {
                return Err(forbidden);
            }
        }
        // either party may cancel
        JobAction::Cancel => {
            if !job.is_party(actor.id) {
                return Err(forbidden);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn job(client_id: Uuid, provider_id: Option<Uuid>, status: JobStatus) -> Job {
        Job {
            id: Uuid::new_v4(),
            client_id,
            provider_id,
            title: "Fix the roof".to_string(),
            description: "Replace broken shingles".to_string(),
            category: "Roofing".to_string(),
            location: "Springfield".to_string(),
            budget: BigDecimal::from_str("100.00").unwrap(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_client_cannot_accept() {
        let client = user(UserRole::Client);
        let job = job(client.id, None, JobStatus::Open);
        assert!(matches!(
            authorize(&job, JobAction::Accept, &client),
            Err(ServiceError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_provider_can_accept() {
        let provider = user(UserRole::Provider);
        let job = job(Uuid::new_v4(), None, JobStatus::Open);
        assert!(authorize(&job, JobAction::Accept, &provider).is_ok());
    }

    #[test]
    fn test_only_assigned_provider_completes() {
        let assigned = user(UserRole::Provider);
        let stranger = user(UserRole::Provider);
        let job = job(Uuid::new_v4(), Some(assigned.id), JobStatus::InProgress);

        assert!(authorize(&job, JobAction::Complete, &assigned).is_ok());
        assert!(matches!(
            authorize(&job, JobAction::Complete, &stranger),
            Err(ServiceError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_either_party_may_cancel() {
        let client = user(UserRole::Client);
        let provider = user(UserRole::Provider);
        let outsider = user(UserRole::Client);
        let job = job(client.id, Some(provider.id), JobStatus::Accepted);

        assert!(authorize(&job, JobAction::Cancel, &client).is_ok());
        assert!(authorize(&job, JobAction::Cancel, &provider).is_ok());
        assert!(matches!(
            authorize(&job, JobAction::Cancel, &outsider),
            Err(ServiceError::Forbidden { .. })
        ));
    }
}
