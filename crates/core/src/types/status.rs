//! Listing vocabulary enums.
//!
//! These enums mirror the values the marketplace exposes over the API and
//! stores in the database as text. `Display`/`FromStr` use the wire spelling
//! so the database and JSON representations stay identical.

use serde::{Deserialize, Serialize};

/// Generates `Display`, `FromStr` and `as_str` for a wire-spelled enum.
macro_rules! wire_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// All values, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire/database spelling of this value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("invalid ", stringify!($name), ": {}"), s)),
                }
            }
        }
    };
}

/// Listing lifecycle status.
///
/// Only `Published` cars are visible on the public storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CarStatus {
    #[default]
    Published,
    Draft,
    Sold,
}

wire_enum!(CarStatus {
    Published => "Published",
    Draft => "Draft",
    Sold => "Sold",
});

/// Vehicle condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    New,
    Used,
}

wire_enum!(Condition {
    New => "New",
    Used => "Used",
});

/// Engine/fuel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

wire_enum!(EngineType {
    Petrol => "Petrol",
    Diesel => "Diesel",
    Electric => "Electric",
    Hybrid => "Hybrid",
});

/// Gearbox type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transmission {
    Manual,
    Automatic,
}

wire_enum!(Transmission {
    Manual => "Manual",
    Automatic => "Automatic",
});

/// Vehicle body style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    Hatchback,
    Coupe,
    Convertible,
    Wagon,
    Pickup,
    Van,
    Other,
}

wire_enum!(BodyType {
    Sedan => "Sedan",
    Suv => "SUV",
    Hatchback => "Hatchback",
    Coupe => "Coupe",
    Convertible => "Convertible",
    Wagon => "Wagon",
    Pickup => "Pickup",
    Van => "Van",
    Other => "Other",
});

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access including admin user management.
    SuperAdmin,
    /// Full access to listings and settings.
    #[default]
    Admin,
}

impl AdminRole {
    /// The wire/database spelling of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_status_roundtrip() {
        for status in CarStatus::ALL {
            let parsed: CarStatus = status.as_str().parse().expect("roundtrip");
            assert_eq!(parsed, *status);
        }
    }

    #[test]
    fn test_car_status_default_is_published() {
        assert_eq!(CarStatus::default(), CarStatus::Published);
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!("Archived".parse::<CarStatus>().is_err());
    }

    #[test]
    fn test_suv_wire_spelling() {
        assert_eq!(BodyType::Suv.as_str(), "SUV");
        assert_eq!(
            serde_json::to_string(&BodyType::Suv).expect("serialize"),
            "\"SUV\""
        );
        assert_eq!("SUV".parse::<BodyType>().expect("parse"), BodyType::Suv);
    }

    #[test]
    fn test_engine_type_serde_spelling() {
        let json = serde_json::to_string(&EngineType::Petrol).expect("serialize");
        assert_eq!(json, "\"Petrol\"");
        let back: EngineType = serde_json::from_str("\"Hybrid\"").expect("deserialize");
        assert_eq!(back, EngineType::Hybrid);
    }

    #[test]
    fn test_admin_role_roundtrip() {
        let role: AdminRole = "super_admin".parse().expect("parse");
        assert_eq!(role, AdminRole::SuperAdmin);
        assert_eq!(role.to_string(), "super_admin");
        assert!("viewer".parse::<AdminRole>().is_err());
    }
}
