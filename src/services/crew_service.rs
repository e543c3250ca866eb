use crate::models::crew::{Crew, CrewCreateRequest};
use crate::utils::error::{AppError, AppResult};
use sqlx::SqlitePool;
use validator::Validate;

pub struct CrewService {
    pool: SqlitePool,
}

impl CrewService {
    pub fn new(pool: SqlitePool) -> Self {
        CrewService { pool }
    }

    pub async fn create_crew(&self, request: CrewCreateRequest) -> AppResult<Crew> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let result = sqlx::query("INSERT INTO crew (first_name, last_name) VALUES (?, ?)")
            .bind(&request.first_name)
            .bind(&request.last_name)
            .execute(&self.pool)
            .await?;

        self.get_crew(result.last_insert_rowid()).await
    }

    pub async fn get_crew(&self, id: i64) -> AppResult<Crew> {
        sqlx::query_as::<_, Crew>("SELECT id, first_name, last_name FROM crew WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Crew member {} not found", id)))
    }

    pub async fn list_crew(&self) -> AppResult<Vec<Crew>> {
        let crew = sqlx::query_as::<_, Crew>("SELECT id, first_name, last_name FROM crew ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(crew)
    }

    pub async fn update_crew(&self, id: i64, request: CrewCreateRequest) -> AppResult<Crew> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let result = sqlx::query("UPDATE crew SET first_name = ?, last_name = ? WHERE id = ?")
            .bind(&request.first_name)
            .bind(&request.last_name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Crew member {} not found", id)));
        }

        self.get_crew(id).await
    }

    pub async fn delete_crew(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM crew WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Crew member {} not found", id)));
        }

        Ok(())
    }
}
