use crate::models::route::{RouteAirport, RouteCreateRequest, RouteDetail, RouteListItem};
use crate::utils::error::{AppError, AppResult};
use sqlx::SqlitePool;
use validator::Validate;

#[derive(sqlx::FromRow)]
struct RouteDetailRow {
    id: i64,
    distance: i64,
    source_name: String,
    source_city: String,
    destination_name: String,
    destination_city: String,
}

pub struct RouteService {
    pool: SqlitePool,
}

impl RouteService {
    pub fn new(pool: SqlitePool) -> Self {
        RouteService { pool }
    }

    pub async fn create_route(&self, request: RouteCreateRequest) -> AppResult<RouteDetail> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        if request.source == request.destination {
            return Err(AppError::ValidationError(
                "Source and destination airports must differ".into(),
            ));
        }

        self.ensure_airport_exists(request.source, "Source").await?;
        self.ensure_airport_exists(request.destination, "Destination")
            .await?;

        let result =
            sqlx::query("INSERT INTO route (source_id, destination_id, distance) VALUES (?, ?, ?)")
                .bind(request.source)
                .bind(request.destination)
                .bind(request.distance)
                .execute(&self.pool)
                .await?;

        self.get_route(result.last_insert_rowid()).await
    }

    pub async fn get_route(&self, id: i64) -> AppResult<RouteDetail> {
        let row = sqlx::query_as::<_, RouteDetailRow>(
            r#"
            SELECT r.id, r.distance,
                   src.name AS source_name, src.closest_big_city AS source_city,
                   dst.name AS destination_name, dst.closest_big_city AS destination_city
            FROM route r
            INNER JOIN airport src ON r.source_id = src.id
            INNER JOIN airport dst ON r.destination_id = dst.id
            WHERE r.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Route {} not found", id)))?;

        Ok(RouteDetail {
            id: row.id,
            source: RouteAirport {
                name: row.source_name,
                closest_big_city: row.source_city,
            },
            destination: RouteAirport {
                name: row.destination_name,
                closest_big_city: row.destination_city,
            },
            distance: row.distance,
        })
    }

    pub async fn list_routes(&self) -> AppResult<Vec<RouteListItem>> {
        let routes = sqlx::query_as::<_, RouteListItem>(
            r#"
            SELECT r.id, src.name AS source, dst.name AS destination, r.distance
            FROM route r
            INNER JOIN airport src ON r.source_id = src.id
            INNER JOIN airport dst ON r.destination_id = dst.id
            ORDER BY r.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    pub async fn update_route(&self, id: i64, request: RouteCreateRequest) -> AppResult<RouteDetail> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        if request.source == request.destination {
            return Err(AppError::ValidationError(
                "Source and destination airports must differ".into(),
            ));
        }

        self.ensure_airport_exists(request.source, "Source").await?;
        self.ensure_airport_exists(request.destination, "Destination")
            .await?;

        let result = sqlx::query(
            "UPDATE route SET source_id = ?, destination_id = ?, distance = ? WHERE id = ?",
        )
        .bind(request.source)
        .bind(request.destination)
        .bind(request.distance)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Route {} not found", id)));
        }

        self.get_route(id).await
    }

    pub async fn delete_route(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM route WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Route {} not found", id)));
        }

        Ok(())
    }

    async fn ensure_airport_exists(&self, id: i64, which: &str) -> AppResult<()> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM airport WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if found.is_none() {
            return Err(AppError::NotFound(format!(
                "{} airport {} not found",
                which, id
            )));
        }

        Ok(())
    }
}
