use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Value type of a detected candidate.
///
/// `Currency`, `Score`, `Level` and `Experience` are legacy aliases used for
/// candidates whose provenance is a bare binary offset rather than a key. They
/// behave as `Integer` for validation and rewriting.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DataType {
    Integer,
    Float,
    String,
    Boolean,
    Currency,
    Score,
    Level,
    Experience,
}

impl DataType {
    /// The scalar type this data type is validated and written as.
    pub fn base_type(&self) -> DataType {
        match self {
            Self::Currency | Self::Score | Self::Level | Self::Experience => Self::Integer,
            other => *other,
        }
    }

    /// Offset-flavoured alias for an integer found without a key.
    pub fn legacy_alias(category: Category) -> DataType {
        match category {
            Category::Currency | Category::PremiumCurrency => Self::Currency,
            Category::Experience => Self::Experience,
            Category::Progress => Self::Level,
            Category::Stats | Category::Achievements => Self::Score,
            _ => Self::Integer,
        }
    }
}

/// Semantic tag attached to a candidate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Currency,
    PremiumCurrency,
    Experience,
    HealthEnergy,
    Progress,
    Inventory,
    Stats,
    Time,
    Achievements,
    Settings,
    Relationships,
    #[default]
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Human readable label used in candidate descriptions
    pub fn label(&self) -> &'static str {
        match self {
            Self::Currency => "Currency",
            Self::PremiumCurrency => "Premium currency",
            Self::Experience => "Experience",
            Self::HealthEnergy => "Health/energy",
            Self::Progress => "Progress/level",
            Self::Inventory => "Inventory",
            Self::Stats => "Stats",
            Self::Time => "Time",
            Self::Achievements => "Achievements",
            Self::Settings => "Settings",
            Self::Relationships => "Relationship",
            Self::Unknown => "Unknown",
        }
    }
}
