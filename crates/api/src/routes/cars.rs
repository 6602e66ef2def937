//! Public storefront car routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Deserializer};
use tracing::instrument;

use kifaru_core::CarId;

use crate::db::CarRepository;
use crate::error::{AppError, Result};
use crate::models::{Car, CarFilter, CarPage, CarSort, Pagination};
use crate::state::AppState;

/// Default page size for the storefront listing.
const DEFAULT_LIMIT: u32 = 12;
/// Hard cap on the page size.
const MAX_LIMIT: u32 = 100;

/// Deserialize empty strings as None for optional fields.
///
/// The storefront submits every filter input, filled in or not.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Storefront listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListCarsQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "priceMin", deserialize_with = "empty_string_as_none")]
    pub price_min: Option<i64>,
    #[serde(default, rename = "priceMax", deserialize_with = "empty_string_as_none")]
    pub price_max: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub year: Option<i32>,
    /// Engine type filter; the storefront calls it fuel.
    #[serde(default, rename = "fuelType")]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default, rename = "bodyType")]
    pub body_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<u32>,
}

impl ListCarsQuery {
    fn filter(&self) -> CarFilter {
        let non_empty =
            |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        CarFilter {
            search: non_empty(&self.search),
            price_min: self.price_min,
            price_max: self.price_max,
            year: self.year,
            engine_type: non_empty(&self.fuel_type),
            transmission: non_empty(&self.transmission),
            body_type: non_empty(&self.body_type),
            location: non_empty(&self.location),
        }
    }

    fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// Build the public car routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars))
        .route("/{id}", get(get_car))
}

/// List published cars with filtering, sorting and pagination.
#[instrument(skip(state))]
async fn list_cars(
    State(state): State<AppState>,
    Query(query): Query<ListCarsQuery>,
) -> Result<Json<CarPage>> {
    let repo = CarRepository::new(state.pool());
    let filter = query.filter();
    let sort = CarSort::from_query(query.sort.as_deref());
    let page = query.page();
    let limit = query.limit();

    let total = repo.count_published(&filter).await?;
    let cars = repo.list_published(&filter, sort, page, limit).await?;

    Ok(Json(CarPage {
        cars,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// Fetch one car by ID, any status.
#[instrument(skip(state))]
async fn get_car(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Car>> {
    let car = CarRepository::new(state.pool())
        .get_by_id(CarId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Car not found".to_owned()))?;

    Ok(Json(car))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(query: &str) -> ListCarsQuery {
        serde_urlencoded::from_str(query).unwrap()
    }

    #[test]
    fn test_defaults() {
        let q = parse("");
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), DEFAULT_LIMIT);
        let filter = q.filter();
        assert!(filter.search.is_none());
        assert!(filter.engine_type.is_none());
    }

    #[test]
    fn test_empty_strings_ignored() {
        let q = parse("priceMin=&year=&search=&fuelType=");
        assert_eq!(q.price_min, None);
        assert_eq!(q.year, None);
        assert!(q.filter().search.is_none());
        assert!(q.filter().engine_type.is_none());
    }

    #[test]
    fn test_full_query() {
        let q = parse(
            "search=cruiser&priceMin=1000000&priceMax=9000000&year=2021&fuelType=Diesel\
             &transmission=Automatic&bodyType=SUV&location=Nairobi&sort=price&page=2&limit=24",
        );
        let filter = q.filter();
        assert_eq!(filter.search.as_deref(), Some("cruiser"));
        assert_eq!(filter.price_min, Some(1_000_000));
        assert_eq!(filter.price_max, Some(9_000_000));
        assert_eq!(filter.year, Some(2021));
        assert_eq!(filter.engine_type.as_deref(), Some("Diesel"));
        assert_eq!(filter.body_type.as_deref(), Some("SUV"));
        assert_eq!(q.page(), 2);
        assert_eq!(q.limit(), 24);
        assert_eq!(CarSort::from_query(q.sort.as_deref()), CarSort::PriceAsc);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(parse("limit=5000").limit(), MAX_LIMIT);
        assert_eq!(parse("limit=0").limit(), 1);
        assert_eq!(parse("page=0").page(), 1);
    }
}
