//! Car listing models.
//!
//! The JSON representation uses the field names the frontends already speak
//! (`engineType`, `ownershipHistory`, ...). `images` and `features` are always
//! arrays, never null.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kifaru_core::{BodyType, CarId, CarStatus, Condition, EngineType, Transmission};

/// A car listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: CarId,
    /// Make/brand of the vehicle.
    pub name: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub condition: Option<Condition>,
    /// Price in whole currency units.
    pub price: Option<i64>,
    pub location: Option<String>,
    pub engine_type: Option<EngineType>,
    pub transmission: Option<Transmission>,
    pub mileage: Option<i64>,
    pub body_type: Option<BodyType>,
    pub color: Option<String>,
    /// Free-text engine description.
    pub engine: Option<String>,
    pub ownership_history: Option<String>,
    pub verified_seller: bool,
    pub status: CarStatus,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a new car listing.
#[derive(Debug, Clone, Default)]
pub struct NewCar {
    pub name: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub condition: Option<Condition>,
    pub price: Option<i64>,
    pub location: Option<String>,
    pub engine_type: Option<EngineType>,
    pub transmission: Option<Transmission>,
    pub mileage: Option<i64>,
    pub body_type: Option<BodyType>,
    pub color: Option<String>,
    pub engine: Option<String>,
    pub ownership_history: Option<String>,
    pub verified_seller: bool,
    pub status: CarStatus,
    pub images: Vec<String>,
    pub features: Vec<String>,
}

/// Partial update for an existing listing. `None` fields are left untouched.
///
/// Also deserializes directly from a JSON PATCH body; the dashboard sends
/// quick edits (status flips) as JSON and the full edit form as multipart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarPatch {
    pub name: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub condition: Option<Condition>,
    pub price: Option<i64>,
    pub location: Option<String>,
    #[serde(alias = "fuelType")]
    pub engine_type: Option<EngineType>,
    pub transmission: Option<Transmission>,
    pub mileage: Option<i64>,
    pub body_type: Option<BodyType>,
    pub color: Option<String>,
    pub engine: Option<String>,
    pub ownership_history: Option<String>,
    pub verified_seller: Option<bool>,
    pub status: Option<CarStatus>,
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
}

impl CarPatch {
    /// Whether the patch carries any change at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.model.is_none()
            && self.year.is_none()
            && self.condition.is_none()
            && self.price.is_none()
            && self.location.is_none()
            && self.engine_type.is_none()
            && self.transmission.is_none()
            && self.mileage.is_none()
            && self.body_type.is_none()
            && self.color.is_none()
            && self.engine.is_none()
            && self.ownership_history.is_none()
            && self.verified_seller.is_none()
            && self.status.is_none()
            && self.images.is_none()
            && self.features.is_none()
    }
}

/// Storefront listing filter.
///
/// Enumerated filters are carried as raw text: an unknown value matches
/// nothing rather than rejecting the request.
#[derive(Debug, Clone, Default)]
pub struct CarFilter {
    /// Case-insensitive substring over make, model and location.
    pub search: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub year: Option<i32>,
    pub engine_type: Option<String>,
    pub transmission: Option<String>,
    pub body_type: Option<String>,
    /// Case-insensitive substring on location.
    pub location: Option<String>,
}

/// Storefront sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarSort {
    /// Newest listings first.
    #[default]
    Newest,
    /// Cheapest first.
    PriceAsc,
    /// Most recent model year first.
    YearDesc,
    /// Lowest mileage first.
    MileageAsc,
}

impl CarSort {
    /// Map the `sort` query parameter; unknown values fall back to newest.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("price") => Self::PriceAsc,
            Some("year") => Self::YearDesc,
            Some("mileage") => Self::MileageAsc,
            _ => Self::Newest,
        }
    }

    /// The ORDER BY clause for this sort order.
    #[must_use]
    pub const fn order_by(&self) -> &'static str {
        match self {
            Self::Newest => "created_at DESC",
            Self::PriceAsc => "price ASC",
            Self::YearDesc => "year DESC",
            Self::MileageAsc => "mileage ASC",
        }
    }
}

/// Pagination envelope for the storefront listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_cars: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Build the pagination envelope from a page request and a total count.
    #[must_use]
    pub fn new(page: u32, limit: u32, total_cars: i64) -> Self {
        let total_pages = if total_cars == 0 {
            0
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                (total_cars as u64).div_ceil(u64::from(limit)) as u32
            }
        };
        Self {
            current_page: page,
            total_pages,
            total_cars,
            has_next: i64::from(page) * i64::from(limit) < total_cars,
            has_prev: page > 1,
        }
    }
}

/// One page of storefront results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarPage {
    pub cars: Vec<Car>,
    pub pagination: Pagination,
}

// =============================================================================
// Multipart form mapping
// =============================================================================

/// Errors produced while mapping form fields onto a listing.
#[derive(Debug, thiserror::Error)]
pub enum CarFormError {
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Accumulates the text fields of a `multipart/form-data` car submission.
///
/// The admin dashboard posts every attribute as a string; numbers parse
/// leniently (an empty string counts as absent) and `features` may arrive
/// either as a single comma-separated string or as repeated fields.
#[derive(Debug, Default)]
pub struct CarForm {
    fields: HashMap<String, Vec<String>>,
}

impl CarForm {
    /// Record one text field.
    pub fn push(&mut self, name: &str, value: String) {
        // The dashboard uses PHP-style `features[]` for repeated fields.
        let name = name.strip_suffix("[]").unwrap_or(name);
        self.fields.entry(name.to_owned()).or_default().push(value);
    }

    /// Whether a field was submitted at all.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn first(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    fn text(&self, name: &str) -> Option<String> {
        self.first(name).map(ToOwned::to_owned)
    }

    /// Lenient numeric parse: absent or empty fields are `None`.
    fn number<T: std::str::FromStr>(&self, name: &'static str) -> Result<Option<T>, CarFormError> {
        match self.first(name) {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| CarFormError::InvalidValue {
                    field: name,
                    value: raw.to_owned(),
                }),
        }
    }

    fn enum_field<T: std::str::FromStr>(
        &self,
        name: &'static str,
    ) -> Result<Option<T>, CarFormError> {
        match self.first(name) {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| CarFormError::InvalidValue {
                field: name,
                value: raw.to_owned(),
            }),
        }
    }

    /// Normalized feature list: every submitted value is comma-split,
    /// trimmed, and empty entries dropped.
    #[must_use]
    pub fn features(&self) -> Vec<String> {
        self.fields
            .get("features")
            .map(|values| {
                values
                    .iter()
                    .flat_map(|v| v.split(','))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Image URLs submitted as text fields (kept alongside fresh uploads).
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        self.fields
            .get("images")
            .map(|values| values.iter().filter(|v| !v.is_empty()).cloned().collect())
            .unwrap_or_default()
    }

    /// Build a [`NewCar`] from the collected fields plus uploaded image URLs.
    ///
    /// # Errors
    ///
    /// Returns [`CarFormError::InvalidValue`] when a numeric or enumerated
    /// field cannot be parsed.
    pub fn into_new_car(self, images: Vec<String>) -> Result<NewCar, CarFormError> {
        let features = self.features();
        Ok(NewCar {
            name: self.text("name"),
            model: self.text("model"),
            year: self.number("year")?,
            condition: self.enum_field("condition")?,
            price: self.number("price")?,
            location: self.text("location"),
            engine_type: self.engine_type_field()?,
            transmission: self.enum_field("transmission")?,
            mileage: self.number("mileage")?,
            body_type: self.enum_field("bodyType")?,
            color: self.text("color"),
            engine: self.text("engine"),
            ownership_history: self.text("ownershipHistory"),
            verified_seller: self.first("verifiedSeller") == Some("true"),
            status: self.enum_field("status")?.unwrap_or_default(),
            images,
            features,
        })
    }

    /// Build a [`CarPatch`]: only submitted fields are set.
    ///
    /// Freshly uploaded image URLs are appended to any `images` text fields;
    /// when neither is present the stored images are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`CarFormError::InvalidValue`] when a numeric or enumerated
    /// field cannot be parsed.
    pub fn into_patch(self, uploaded: Vec<String>) -> Result<CarPatch, CarFormError> {
        let images = if uploaded.is_empty() && !self.contains("images") {
            None
        } else {
            let mut urls = self.image_urls();
            urls.extend(uploaded);
            Some(urls)
        };

        let features = if self.contains("features") {
            Some(self.features())
        } else {
            None
        };

        Ok(CarPatch {
            name: self.text("name"),
            model: self.text("model"),
            year: self.number("year")?,
            condition: self.enum_field("condition")?,
            price: self.number("price")?,
            location: self.text("location"),
            engine_type: self.engine_type_field()?,
            transmission: self.enum_field("transmission")?,
            mileage: self.number("mileage")?,
            body_type: self.enum_field("bodyType")?,
            color: self.text("color"),
            engine: self.text("engine"),
            ownership_history: self.text("ownershipHistory"),
            verified_seller: self.first("verifiedSeller").map(|v| v == "true"),
            status: self.enum_field("status")?,
            images,
            features,
        })
    }

    /// `fuelType` is accepted as an alias for `engineType`.
    fn engine_type_field(&self) -> Result<Option<EngineType>, CarFormError> {
        if self.contains("engineType") {
            self.enum_field("engineType")
        } else {
            self.enum_field("fuelType")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(entries: &[(&str, &str)]) -> CarForm {
        let mut form = CarForm::default();
        for (name, value) in entries {
            form.push(name, (*value).to_owned());
        }
        form
    }

    #[test]
    fn test_new_car_from_form() {
        let form = form(&[
            ("name", "Toyota"),
            ("model", "Land Cruiser"),
            ("year", "2021"),
            ("condition", "Used"),
            ("price", "8500000"),
            ("engineType", "Diesel"),
            ("transmission", "Automatic"),
            ("bodyType", "SUV"),
            ("mileage", "42000"),
            ("verifiedSeller", "true"),
            ("features", "Sunroof, Leather seats ,,4WD"),
        ]);

        let car = form.into_new_car(vec!["https://img/1.jpg".into()]).unwrap();
        assert_eq!(car.name.as_deref(), Some("Toyota"));
        assert_eq!(car.year, Some(2021));
        assert_eq!(car.condition, Some(Condition::Used));
        assert_eq!(car.price, Some(8_500_000));
        assert_eq!(car.engine_type, Some(EngineType::Diesel));
        assert_eq!(car.body_type, Some(BodyType::Suv));
        assert!(car.verified_seller);
        assert_eq!(car.status, CarStatus::Published);
        assert_eq!(car.features, vec!["Sunroof", "Leather seats", "4WD"]);
        assert_eq!(car.images, vec!["https://img/1.jpg"]);
    }

    #[test]
    fn test_features_repeated_fields() {
        let form = form(&[("features[]", "Sunroof"), ("features[]", "4WD")]);
        assert_eq!(form.features(), vec!["Sunroof", "4WD"]);
    }

    #[test]
    fn test_empty_numeric_fields_are_absent() {
        let form = form(&[("year", ""), ("price", "  ")]);
        let car = form.into_new_car(Vec::new()).unwrap();
        assert_eq!(car.year, None);
        assert_eq!(car.price, None);
    }

    #[test]
    fn test_invalid_numeric_field_rejected() {
        let form = form(&[("year", "twenty")]);
        let err = form.into_new_car(Vec::new()).unwrap_err();
        assert!(matches!(err, CarFormError::InvalidValue { field: "year", .. }));
    }

    #[test]
    fn test_patch_from_json_quick_edit() {
        let patch: CarPatch = serde_json::from_str(r#"{"status":"Sold"}"#).unwrap();
        assert_eq!(patch.status, Some(CarStatus::Sold));
        assert!(patch.name.is_none());
        assert!(patch.images.is_none());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_from_json_fuel_type_alias() {
        let patch: CarPatch =
            serde_json::from_str(r#"{"fuelType":"Hybrid","verifiedSeller":true}"#).unwrap();
        assert_eq!(patch.engine_type, Some(EngineType::Hybrid));
        assert_eq!(patch.verified_seller, Some(true));
    }

    #[test]
    fn test_fuel_type_alias() {
        let form = form(&[("fuelType", "Hybrid")]);
        let patch = form.into_patch(Vec::new()).unwrap();
        assert_eq!(patch.engine_type, Some(EngineType::Hybrid));
    }

    #[test]
    fn test_patch_without_images_leaves_images_alone() {
        let form = form(&[("name", "Mazda")]);
        let patch = form.into_patch(Vec::new()).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Mazda"));
        assert!(patch.images.is_none());
        assert!(patch.features.is_none());
        assert!(patch.verified_seller.is_none());
    }

    #[test]
    fn test_patch_appends_uploads_to_existing_urls() {
        let form = form(&[("images", "https://img/old.jpg")]);
        let patch = form.into_patch(vec!["https://img/new.jpg".into()]).unwrap();
        assert_eq!(
            patch.images,
            Some(vec![
                "https://img/old.jpg".to_owned(),
                "https://img/new.jpg".to_owned()
            ])
        );
    }

    #[test]
    fn test_verified_seller_false_string() {
        let form = form(&[("verifiedSeller", "false")]);
        let patch = form.into_patch(Vec::new()).unwrap();
        assert_eq!(patch.verified_seller, Some(false));
    }

    #[test]
    fn test_sort_mapping() {
        assert_eq!(CarSort::from_query(Some("price")), CarSort::PriceAsc);
        assert_eq!(CarSort::from_query(Some("year")), CarSort::YearDesc);
        assert_eq!(CarSort::from_query(Some("mileage")), CarSort::MileageAsc);
        assert_eq!(CarSort::from_query(Some("bogus")), CarSort::Newest);
        assert_eq!(CarSort::from_query(None), CarSort::Newest);
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(2, 12, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let last = Pagination::new(3, 12, 25);
        assert!(!last.has_next);

        let empty = Pagination::new(1, 12, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }

    #[test]
    fn test_car_json_field_names() {
        let car = Car {
            id: CarId::new(1),
            name: Some("Subaru".into()),
            model: Some("Forester".into()),
            year: Some(2019),
            condition: Some(Condition::Used),
            price: Some(3_200_000),
            location: Some("Nairobi".into()),
            engine_type: Some(EngineType::Petrol),
            transmission: Some(Transmission::Automatic),
            mileage: Some(58_000),
            body_type: Some(BodyType::Suv),
            color: Some("Silver".into()),
            engine: Some("2.0L boxer".into()),
            ownership_history: Some("One owner".into()),
            verified_seller: true,
            status: CarStatus::Published,
            images: vec![],
            features: vec![],
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&car).unwrap();
        assert_eq!(json["engineType"], "Petrol");
        assert_eq!(json["bodyType"], "SUV");
        assert_eq!(json["ownershipHistory"], "One owner");
        assert_eq!(json["verifiedSeller"], true);
        assert!(json["images"].is_array());
        assert!(json["features"].is_array());
    }
}
