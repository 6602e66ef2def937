//! Car listing repository.
//!
//! Storefront queries are built dynamically with `QueryBuilder` so the WHERE
//! clause carries only the filters the client actually sent. The same filter
//! builder feeds both the page query and the total count so pagination can
//! never drift from the result set.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use kifaru_core::{BodyType, CarId, CarStatus, Condition, EngineType, Transmission};

use super::RepositoryError;
use crate::models::car::{Car, CarFilter, CarPatch, CarSort, NewCar};

const CAR_COLUMNS: &str = "id, name, model, year, condition, price, location, engine_type, \
     transmission, mileage, body_type, color, engine, ownership_history, verified_seller, \
     status, images, features, created_at";

/// Internal row type for car queries.
#[derive(Debug, sqlx::FromRow)]
struct CarRow {
    id: i32,
    name: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    condition: Option<String>,
    price: Option<i64>,
    location: Option<String>,
    engine_type: Option<String>,
    transmission: Option<String>,
    mileage: Option<i64>,
    body_type: Option<String>,
    color: Option<String>,
    engine: Option<String>,
    ownership_history: Option<String>,
    verified_seller: bool,
    status: String,
    images: Vec<String>,
    features: Vec<String>,
    created_at: DateTime<Utc>,
}

/// Parse an optional enum column, surfacing bad data as corruption.
fn parse_opt<T: std::str::FromStr>(
    value: Option<String>,
    column: &str,
) -> Result<Option<T>, RepositoryError> {
    value
        .map(|raw| {
            raw.parse().map_err(|_| {
                RepositoryError::DataCorruption(format!("invalid {column} in database: {raw}"))
            })
        })
        .transpose()
}

impl TryFrom<CarRow> for Car {
    type Error = RepositoryError;

    fn try_from(row: CarRow) -> Result<Self, Self::Error> {
        let status: CarStatus = row.status.parse().map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid status in database: {}", row.status))
        })?;

        Ok(Self {
            id: CarId::new(row.id),
            name: row.name,
            model: row.model,
            year: row.year,
            condition: parse_opt::<Condition>(row.condition, "condition")?,
            price: row.price,
            location: row.location,
            engine_type: parse_opt::<EngineType>(row.engine_type, "engine_type")?,
            transmission: parse_opt::<Transmission>(row.transmission, "transmission")?,
            mileage: row.mileage,
            body_type: parse_opt::<BodyType>(row.body_type, "body_type")?,
            color: row.color,
            engine: row.engine,
            ownership_history: row.ownership_history,
            verified_seller: row.verified_seller,
            status,
            images: row.images,
            features: row.features,
            created_at: row.created_at,
        })
    }
}

/// Append the storefront filter to a query. The caller has already written
/// `WHERE status = 'Published'`; every clause here starts with ` AND`.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &CarFilter) {
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        builder.push(" AND (name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR model ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR location ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }

    if let Some(price_min) = filter.price_min {
        builder.push(" AND price >= ");
        builder.push_bind(price_min);
    }
    if let Some(price_max) = filter.price_max {
        builder.push(" AND price <= ");
        builder.push_bind(price_max);
    }

    if let Some(year) = filter.year {
        builder.push(" AND year = ");
        builder.push_bind(year);
    }

    // Enumerated filters are plain equality on the stored text; an unknown
    // value simply matches nothing.
    if let Some(engine_type) = &filter.engine_type {
        builder.push(" AND engine_type = ");
        builder.push_bind(engine_type.clone());
    }
    if let Some(transmission) = &filter.transmission {
        builder.push(" AND transmission = ");
        builder.push_bind(transmission.clone());
    }
    if let Some(body_type) = &filter.body_type {
        builder.push(" AND body_type = ");
        builder.push_bind(body_type.clone());
    }

    if let Some(location) = &filter.location {
        builder.push(" AND location ILIKE ");
        builder.push_bind(format!("%{location}%"));
    }
}

/// Repository for car listing database operations.
pub struct CarRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CarRepository<'a> {
    /// Create a new car repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count published cars matching the storefront filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_published(&self, filter: &CarFilter) -> Result<i64, RepositoryError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM car WHERE status = ");
        builder.push_bind(CarStatus::Published.as_str());
        push_filters(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(self.pool).await?;
        Ok(count)
    }

    /// Fetch one page of published cars matching the storefront filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_published(
        &self,
        filter: &CarFilter,
        sort: CarSort,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Car>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {CAR_COLUMNS} FROM car WHERE status = "
        ));
        builder.push_bind(CarStatus::Published.as_str());
        push_filters(&mut builder, filter);

        // order_by() yields a fixed clause per variant, never user input
        builder.push(" ORDER BY ");
        builder.push(sort.order_by());
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(limit));
        builder.push(" OFFSET ");
        builder.push_bind(i64::from(page.saturating_sub(1)) * i64::from(limit));

        let rows: Vec<CarRow> = builder.build_query_as().fetch_all(self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List every car regardless of status, newest first (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_all(&self) -> Result<Vec<Car>, RepositoryError> {
        let rows: Vec<CarRow> = sqlx::query_as(&format!(
            "SELECT {CAR_COLUMNS} FROM car ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get one car by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: CarId) -> Result<Option<Car>, RepositoryError> {
        let row: Option<CarRow> =
            sqlx::query_as(&format!("SELECT {CAR_COLUMNS} FROM car WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a new car listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, car: NewCar) -> Result<Car, RepositoryError> {
        let row: CarRow = sqlx::query_as(&format!(
            "INSERT INTO car (name, model, year, condition, price, location, engine_type, \
             transmission, mileage, body_type, color, engine, ownership_history, \
             verified_seller, status, images, features) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING {CAR_COLUMNS}"
        ))
        .bind(car.name)
        .bind(car.model)
        .bind(car.year)
        .bind(car.condition.map(|v| v.as_str()))
        .bind(car.price)
        .bind(car.location)
        .bind(car.engine_type.map(|v| v.as_str()))
        .bind(car.transmission.map(|v| v.as_str()))
        .bind(car.mileage)
        .bind(car.body_type.map(|v| v.as_str()))
        .bind(car.color)
        .bind(car.engine)
        .bind(car.ownership_history)
        .bind(car.verified_seller)
        .bind(car.status.as_str())
        .bind(car.images)
        .bind(car.features)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Apply a partial update; only the patch's `Some` fields change.
    ///
    /// Returns `None` when the car does not exist. An empty patch is a no-op
    /// read of the current row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn update(
        &self,
        id: CarId,
        patch: CarPatch,
    ) -> Result<Option<Car>, RepositoryError> {
        if patch.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE car SET ");
        let mut updates = builder.separated(", ");

        if let Some(v) = patch.name {
            updates.push("name = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.model {
            updates.push("model = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.year {
            updates.push("year = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.condition {
            updates.push("condition = ").push_bind_unseparated(v.as_str());
        }
        if let Some(v) = patch.price {
            updates.push("price = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.location {
            updates.push("location = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.engine_type {
            updates.push("engine_type = ").push_bind_unseparated(v.as_str());
        }
        if let Some(v) = patch.transmission {
            updates
                .push("transmission = ")
                .push_bind_unseparated(v.as_str());
        }
        if let Some(v) = patch.mileage {
            updates.push("mileage = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.body_type {
            updates.push("body_type = ").push_bind_unseparated(v.as_str());
        }
        if let Some(v) = patch.color {
            updates.push("color = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.engine {
            updates.push("engine = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.ownership_history {
            updates
                .push("ownership_history = ")
                .push_bind_unseparated(v);
        }
        if let Some(v) = patch.verified_seller {
            updates
                .push("verified_seller = ")
                .push_bind_unseparated(v);
        }
        if let Some(v) = patch.status {
            updates.push("status = ").push_bind_unseparated(v.as_str());
        }
        if let Some(v) = patch.images {
            updates.push("images = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.features {
            updates.push("features = ").push_bind_unseparated(v);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(format!(" RETURNING {CAR_COLUMNS}"));

        let row: Option<CarRow> = builder.build_query_as().fetch_optional(self.pool).await?;
        row.map(TryInto::try_into).transpose()
    }

    /// Delete a car. Returns `false` when no row matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: CarId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM car WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Total number of cars.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_all(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM car")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Number of cars in a given status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_status(&self, status: CarStatus) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM car WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Sum of sale prices across sold cars.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sold_revenue(&self) -> Result<i64, RepositoryError> {
        let revenue: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(price), 0) FROM car WHERE status = $1",
        )
        .bind(CarStatus::Sold.as_str())
        .fetch_one(self.pool)
        .await?;
        Ok(revenue)
    }

    /// Number of cars listed within the last seven days.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_recent(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM car WHERE created_at > NOW() - INTERVAL '7 days'",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }
}
