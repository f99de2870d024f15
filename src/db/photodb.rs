use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::photomodel::{Photo, PhotoType};

#[async_trait]
pub trait PhotoExt {
    #[allow(clippy::too_many_arguments)]
    async fn create_photo(
        &self,
        job_id: Uuid,
        uploader_id: Uuid,
        photo_type: PhotoType,
        url: String,
        description: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        captured_at: Option<DateTime<Utc>>,
    ) -> Result<Photo, Error>;

    async fn list_photos_for_job(&self, job_id: Uuid) -> Result<Vec<Photo>, Error>;
}

#[async_trait]
impl PhotoExt for DBClient {
    async fn create_photo(
        &self,
        job_id: Uuid,
        uploader_id: Uuid,
        photo_type: PhotoType,
        url: String,
        description: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        captured_at: Option<DateTime<Utc>>,
    ) -> Result<Photo, Error> {
        sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos
                (job_id, uploader_id, photo_type, url, description,
                 latitude, longitude, captured_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, NOW()))
            RETURNING
                id, job_id, uploader_id, photo_type, url, description,
                latitude, longitude, captured_at, created_at
            "#,
        )
        .bind(job_id)
        .bind(uploader_id)
        .bind(photo_type)
        .bind(url)
        .bind(description)
        .bind(latitude)
        .bind(longitude)
        .bind(captured_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_photos_for_job(&self, job_id: Uuid) -> Result<Vec<Photo>, Error> {
        sqlx::query_as::<_, Photo>(
            r#"
            SELECT
                id, job_id, uploader_id, photo_type, url, description,
                latitude, longitude, captured_at, created_at
            FROM photos
            WHERE job_id = $1
            ORDER BY captured_at ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
    }
}
