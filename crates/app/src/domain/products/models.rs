//! Product Models

use std::{fmt, str::FromStr};

use jiff::{Timestamp, civil::Date};
use larder::{cadence::Frequency, status::Status, tags::TagSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{domain::users::UserUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model — the assembled record as held by the persistence
/// collaborator.
///
/// `name_normalized`, `search_tokens`, `status` and (on full updates)
/// `notification_frequency` are derived fields; mutation paths refresh them
/// through [`super::derived`] rather than setting them directly. Timestamps
/// are owned by the persistence collaborator and are `None` until a record
/// has been stored.
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: ProductUuid,
    pub owner: UserUuid,
    pub name: String,
    pub name_normalized: String,
    pub tags: TagSet,
    pub search_tokens: Vec<String>,
    pub quantity_bought: f64,
    pub quantity_consumed: f64,
    pub unit: Unit,
    pub purchase_date: Date,
    pub expiration_date: Date,
    pub status: Status,
    pub notification_frequency: Frequency,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// New Product Model
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub owner: UserUuid,
    pub name: String,
    pub tags: TagSet,
    pub quantity_bought: f64,
    pub quantity_consumed: f64,
    pub unit: Unit,
    pub purchase_date: Date,
    pub expiration_date: Date,
}

/// Product Update Model — a full update of the mutable fields. Derived fields
/// are recomputed by the service, never taken from the caller.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub tags: TagSet,
    pub quantity_bought: f64,
    pub quantity_consumed: f64,
    pub unit: Unit,
    pub purchase_date: Date,
    pub expiration_date: Date,
}

/// Unit of measure. Cosmetic to the computation core; stored and echoed back
/// under its short label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "pcs")]
    Pieces,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "l")]
    Liter,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "oz")]
    Ounce,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "cup")]
    Cup,
    #[serde(rename = "qt")]
    Quart,
    #[serde(rename = "gal")]
    Gallon,
    #[serde(rename = "bottle")]
    Bottle,
    #[serde(rename = "box")]
    Box,
    #[serde(rename = "pack")]
    Pack,
}

impl Unit {
    /// The short label used for storage and display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pieces => "pcs",
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Liter => "l",
            Self::Milliliter => "ml",
            Self::Ounce => "oz",
            Self::Pound => "lb",
            Self::Cup => "cup",
            Self::Quart => "qt",
            Self::Gallon => "gal",
            Self::Bottle => "bottle",
            Self::Box => "box",
            Self::Pack => "pack",
        }
    }

    fn variants() -> impl Iterator<Item = (Self, &'static str, &'static str)> {
        [
            (Self::Pieces, "pcs", "pieces"),
            (Self::Gram, "g", "gram"),
            (Self::Kilogram, "kg", "kilogram"),
            (Self::Liter, "l", "liter"),
            (Self::Milliliter, "ml", "milliliter"),
            (Self::Ounce, "oz", "ounce"),
            (Self::Pound, "lb", "pound"),
            (Self::Cup, "cup", "cup"),
            (Self::Quart, "qt", "quart"),
            (Self::Gallon, "gal", "gallon"),
            (Self::Bottle, "bottle", "bottle"),
            (Self::Box, "box", "box"),
            (Self::Pack, "pack", "pack"),
        ]
        .into_iter()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure to parse a unit label.
#[derive(Debug, Error)]
#[error("invalid unit: {0}")]
pub struct ParseUnitError(String);

impl FromStr for Unit {
    type Err = ParseUnitError;

    /// Accepts either the short label ("kg") or the variant name
    /// ("kilogram"), case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_lowercase();

        Self::variants()
            .find(|(_, label, name)| *label == lowered || *name == lowered)
            .map(|(unit, _, _)| unit)
            .ok_or_else(|| ParseUnitError(value.to_string()))
    }
}
