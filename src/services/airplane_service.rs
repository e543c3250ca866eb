use crate::models::airplane::{
    AirplaneCreateRequest, AirplaneDetail, AirplaneListItem, AirplaneType,
    AirplaneTypeCreateRequest,
};
use crate::utils::error::{AppError, AppResult};
use sqlx::SqlitePool;
use validator::Validate;

pub struct AirplaneService {
    pool: SqlitePool,
}

impl AirplaneService {
    pub fn new(pool: SqlitePool) -> Self {
        AirplaneService { pool }
    }

    pub async fn create_airplane_type(
        &self,
        request: AirplaneTypeCreateRequest,
    ) -> AppResult<AirplaneType> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM airplane_type WHERE name = ?")
            .bind(&request.name)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict("Airplane type already exists".into()));
        }

        let result = sqlx::query("INSERT INTO airplane_type (name) VALUES (?)")
            .bind(&request.name)
            .execute(&self.pool)
            .await?;

        self.get_airplane_type(result.last_insert_rowid()).await
    }

    pub async fn get_airplane_type(&self, id: i64) -> AppResult<AirplaneType> {
        sqlx::query_as::<_, AirplaneType>("SELECT id, name FROM airplane_type WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Airplane type {} not found", id)))
    }

    pub async fn list_airplane_types(&self) -> AppResult<Vec<AirplaneType>> {
        let types =
            sqlx::query_as::<_, AirplaneType>("SELECT id, name FROM airplane_type ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(types)
    }

    pub async fn update_airplane_type(
        &self,
        id: i64,
        request: AirplaneTypeCreateRequest,
    ) -> AppResult<AirplaneType> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let result = sqlx::query("UPDATE airplane_type SET name = ? WHERE id = ?")
            .bind(&request.name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Airplane type {} not found", id)));
        }

        self.get_airplane_type(id).await
    }

    pub async fn delete_airplane_type(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM airplane_type WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Airplane type {} not found", id)));
        }

        Ok(())
    }

    pub async fn create_airplane(&self, request: AirplaneCreateRequest) -> AppResult<AirplaneDetail> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        // The type must exist before the insert so the client gets a 404
        // instead of a bare foreign key error.
        self.get_airplane_type(request.airplane_type).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO airplane (name, seat_rows, seats_in_row, airplane_type_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&request.name)
        .bind(request.rows)
        .bind(request.seats_in_row)
        .bind(request.airplane_type)
        .execute(&self.pool)
        .await?;

        self.get_airplane(result.last_insert_rowid()).await
    }

    pub async fn get_airplane(&self, id: i64) -> AppResult<AirplaneDetail> {
        sqlx::query_as::<_, AirplaneDetail>(
            r#"
            SELECT a.id, a.name, t.name AS airplane_type,
                   a.seat_rows, a.seats_in_row,
                   a.seat_rows * a.seats_in_row AS capacity
            FROM airplane a
            INNER JOIN airplane_type t ON a.airplane_type_id = t.id
            WHERE a.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Airplane {} not found", id)))
    }

    pub async fn list_airplanes(&self) -> AppResult<Vec<AirplaneListItem>> {
        let airplanes = sqlx::query_as::<_, AirplaneListItem>(
            r#"
            SELECT a.id, a.name, t.name AS airplane_type,
                   a.seat_rows * a.seats_in_row AS capacity
            FROM airplane a
            INNER JOIN airplane_type t ON a.airplane_type_id = t.id
            ORDER BY a.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(airplanes)
    }

    pub async fn update_airplane(
        &self,
        id: i64,
        request: AirplaneCreateRequest,
    ) -> AppResult<AirplaneDetail> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        self.get_airplane_type(request.airplane_type).await?;

        let result = sqlx::query(
            r#"
            UPDATE airplane
            SET name = ?, seat_rows = ?, seats_in_row = ?, airplane_type_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&request.name)
        .bind(request.rows)
        .bind(request.seats_in_row)
        .bind(request.airplane_type)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Airplane {} not found", id)));
        }

        self.get_airplane(id).await
    }

    pub async fn delete_airplane(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM airplane WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Airplane {} not found", id)));
        }

        Ok(())
    }
}
