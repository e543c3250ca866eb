use crate::models::airport::{Airport, AirportCreateRequest, AirportFilter};
use crate::utils::error::{AppError, AppResult};
use sqlx::SqlitePool;
use validator::Validate;

pub struct AirportService {
    pool: SqlitePool,
}

impl AirportService {
    pub fn new(pool: SqlitePool) -> Self {
        AirportService { pool }
    }

    pub async fn create_airport(&self, request: AirportCreateRequest) -> AppResult<Airport> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let result = sqlx::query("INSERT INTO airport (name, closest_big_city) VALUES (?, ?)")
            .bind(&request.name)
            .bind(&request.closest_big_city)
            .execute(&self.pool)
            .await?;

        self.get_airport(result.last_insert_rowid()).await
    }

    pub async fn get_airport(&self, id: i64) -> AppResult<Airport> {
        sqlx::query_as::<_, Airport>("SELECT id, name, closest_big_city FROM airport WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Airport {} not found", id)))
    }

    pub async fn list_airports(&self, filter: AirportFilter) -> AppResult<Vec<Airport>> {
        let mut sql = String::from("SELECT id, name, closest_big_city FROM airport");
        let mut conditions: Vec<&str> = Vec::new();

        if filter.name.is_some() {
            conditions.push("name LIKE ?");
        }
        if filter.closest_big_city.is_some() {
            conditions.push("closest_big_city LIKE ?");
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut query = sqlx::query_as::<_, Airport>(&sql);
        if let Some(name) = &filter.name {
            query = query.bind(format!("%{}%", name));
        }
        if let Some(city) = &filter.closest_big_city {
            query = query.bind(format!("%{}%", city));
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn update_airport(&self, id: i64, request: AirportCreateRequest) -> AppResult<Airport> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let result = sqlx::query("UPDATE airport SET name = ?, closest_big_city = ? WHERE id = ?")
            .bind(&request.name)
            .bind(&request.closest_big_city)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Airport {} not found", id)));
        }

        self.get_airport(id).await
    }

    pub async fn delete_airport(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM airport WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Airport {} not found", id)));
        }

        Ok(())
    }
}
