//! Seed the database with demo listings.
//!
//! Useful for local development so the storefront has something to show.
//!
//! # Usage
//!
//! ```bash
//! kifaru seed
//! ```

use kifaru_api::db::{CarRepository, RepositoryError, create_pool};
use kifaru_api::models::NewCar;
use kifaru_core::{BodyType, CarStatus, Condition, EngineType, Transmission};

use super::MissingEnvVar;

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVar),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Repository(#[from] RepositoryError),
}

/// Insert the demo listings.
///
/// # Errors
///
/// Returns [`SeedError`] when the database is unreachable or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;
    let repo = CarRepository::new(&pool);

    let cars = demo_cars();
    let total = cars.len();

    for car in cars {
        let created = repo.create(car).await?;
        tracing::info!(
            "Seeded: {} {} ({})",
            created.name.as_deref().unwrap_or("?"),
            created.model.as_deref().unwrap_or("?"),
            created.id
        );
    }

    tracing::info!("Seeding complete: {total} listings");
    Ok(())
}

fn demo_cars() -> Vec<NewCar> {
    vec![
        NewCar {
            name: Some("Toyota".to_owned()),
            model: Some("Land Cruiser Prado".to_owned()),
            year: Some(2021),
            condition: Some(Condition::Used),
            price: Some(8_500_000),
            location: Some("Nairobi".to_owned()),
            engine_type: Some(EngineType::Diesel),
            transmission: Some(Transmission::Automatic),
            mileage: Some(42_000),
            body_type: Some(BodyType::Suv),
            color: Some("Pearl White".to_owned()),
            engine: Some("2.8L turbo diesel".to_owned()),
            ownership_history: Some("One owner".to_owned()),
            verified_seller: true,
            status: CarStatus::Published,
            images: Vec::new(),
            features: vec![
                "Sunroof".to_owned(),
                "Leather seats".to_owned(),
                "4WD".to_owned(),
            ],
        },
        NewCar {
            name: Some("Mazda".to_owned()),
            model: Some("CX-5".to_owned()),
            year: Some(2019),
            condition: Some(Condition::Used),
            price: Some(3_200_000),
            location: Some("Mombasa".to_owned()),
            engine_type: Some(EngineType::Petrol),
            transmission: Some(Transmission::Automatic),
            mileage: Some(58_000),
            body_type: Some(BodyType::Suv),
            color: Some("Soul Red".to_owned()),
            engine: Some("2.0L Skyactiv-G".to_owned()),
            verified_seller: false,
            status: CarStatus::Published,
            features: vec!["Reverse camera".to_owned(), "Cruise control".to_owned()],
            ..Default::default()
        },
        NewCar {
            name: Some("Nissan".to_owned()),
            model: Some("Note e-Power".to_owned()),
            year: Some(2020),
            condition: Some(Condition::Used),
            price: Some(1_450_000),
            location: Some("Nakuru".to_owned()),
            engine_type: Some(EngineType::Hybrid),
            transmission: Some(Transmission::Automatic),
            mileage: Some(35_000),
            body_type: Some(BodyType::Hatchback),
            color: Some("Silver".to_owned()),
            status: CarStatus::Published,
            features: vec!["Keyless entry".to_owned()],
            ..Default::default()
        },
        NewCar {
            name: Some("Mercedes-Benz".to_owned()),
            model: Some("C200".to_owned()),
            year: Some(2022),
            condition: Some(Condition::New),
            price: Some(9_800_000),
            location: Some("Nairobi".to_owned()),
            engine_type: Some(EngineType::Petrol),
            transmission: Some(Transmission::Automatic),
            mileage: Some(1_200),
            body_type: Some(BodyType::Sedan),
            color: Some("Obsidian Black".to_owned()),
            verified_seller: true,
            status: CarStatus::Draft,
            features: vec!["Ambient lighting".to_owned(), "Heated seats".to_owned()],
            ..Default::default()
        },
    ]
}
