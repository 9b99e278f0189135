//! Consolidated database models

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Error;

// =============================================================================
// STOCK MOVERS
// =============================================================================

/// One row of a movers table. Quote values are stored as the upstream
/// formatted them ("+1.35%", "1.2M").
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Deserialize, Serialize)]
pub struct Stock_Mover {
    pub name: String,
    pub last_price: Option<String>,
    pub price_change: Option<String>,
    pub percent_change: Option<String>,
    pub volume: Option<String>,
    pub date_added: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Gainers,
    Decliners,
    MostActive,
}

impl Category {
    /// Load order of a run.
    pub const ALL: [Category; 3] =
        [Category::Decliners, Category::Gainers, Category::MostActive];

    /// Key of the category under `data` in the upstream payload.
    ///
    /// Most active instruments arrive as `movers` but are stored in
    /// `most_active`.
    pub fn json_key(&self) -> &'static str {
        match self {
            Category::Gainers => "gainers",
            Category::Decliners => "decliners",
            Category::MostActive => "movers",
        }
    }

    pub fn default_table(&self) -> &'static str {
        match self {
            Category::Gainers => "gainers",
            Category::Decliners => "decliners",
            Category::MostActive => "most_active",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.default_table())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(value: &str) -> Result<Category, Self::Err> {
        match value {
            "gainers" => Ok(Category::Gainers),
            "decliners" => Ok(Category::Decliners),
            "most_active" | "most-active" | "movers" => {
                Ok(Category::MostActive)
            },
            _ => Err(Error::FieldNotExist(format!(
                "Category {} not supported",
                value
            ))),
        }
    }
}

/// The three collections produced by one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Mover_Set {
    pub gainers: Vec<Stock_Mover>,
    pub decliners: Vec<Stock_Mover>,
    pub most_active: Vec<Stock_Mover>,
}

impl Mover_Set {
    pub fn get(&self, category: Category) -> &[Stock_Mover] {
        match category {
            Category::Gainers => &self.gainers,
            Category::Decliners => &self.decliners,
            Category::MostActive => &self.most_active,
        }
    }

    pub fn len(&self) -> usize {
        self.gainers.len() + self.decliners.len() + self.most_active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rows written per category by a load.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Load_Summary {
    pub inserted: Vec<(Category, u64)>,
}

impl Load_Summary {
    pub fn total(&self) -> u64 {
        self.inserted.iter().map(|(_, rows)| rows).sum()
    }
}
