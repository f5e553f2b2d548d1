//! Meal records with nutritional macros.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{Error, UserId};

/// Which meal of the day a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// Canonical lowercase form used on the wire and in storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" => Ok(Self::Snack),
            other => Err(Error::invalid_request(
                "mealType must be one of breakfast, lunch, dinner, snack",
            )
            .with_details(json!({"field": "mealType", "value": other}))),
        }
    }
}

/// Macro-nutrient breakdown, all grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Ordered ingredient entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: u32,
}

/// Validated meal content, independent of identity and ownership.
///
/// Drafts are what clients submit on create and full-document update; the
/// store attaches identifier, owner, and creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct MealDraft {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Option<String>,
    pub meal_type: MealType,
    pub calories: f64,
    pub macros: Macros,
}

impl MealDraft {
    /// Enforce the content invariants: non-empty name and ingredient list.
    ///
    /// Numeric fields and the meal type are already typed by construction;
    /// the inbound adapter reports missing fields before building a draft.
    pub fn try_new(
        name: String,
        ingredients: Vec<Ingredient>,
        instructions: Option<String>,
        meal_type: MealType,
        calories: f64,
        macros: Macros,
    ) -> Result<Self, Error> {
        if name.trim().is_empty() {
            return Err(Error::invalid_request("meal name must not be empty")
                .with_details(json!({"field": "name"})));
        }
        if ingredients.is_empty() {
            return Err(
                Error::invalid_request("ingredients must be a non-empty sequence")
                    .with_details(json!({"field": "ingredients"})),
            );
        }
        Ok(Self {
            name,
            ingredients,
            instructions,
            meal_type,
            calories,
            macros,
        })
    }
}

/// Persisted meal record.
#[derive(Debug, Clone, PartialEq)]
pub struct Meal {
    pub id: Uuid,
    pub owner_id: UserId,
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Option<String>,
    pub meal_type: MealType,
    pub calories: f64,
    pub macros: Macros,
    pub created_at: DateTime<Utc>,
}

impl Meal {
    /// Mint a new record from a validated draft.
    pub fn create(owner_id: UserId, draft: MealDraft) -> Self {
        let MealDraft {
            name,
            ingredients,
            instructions,
            meal_type,
            calories,
            macros,
        } = draft;
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            ingredients,
            instructions,
            meal_type,
            calories,
            macros,
            created_at: Utc::now(),
        }
    }
}
