//! Recommendation quiz values: goal, diet, and budget.
//!
//! Pure input values with no identity. Each enum maps one-to-one onto the
//! wire strings the recommendation endpoint expects.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a quiz value from a UI string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {field} value: {value:?}")]
pub struct ParseQuizValueError {
    field: &'static str,
    value: String,
}

/// Training goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    MuscleGain,
    FatLoss,
    Strength,
}

impl Goal {
    /// Wire representation, also used for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MuscleGain => "muscle_gain",
            Self::FatLoss => "fat_loss",
            Self::Strength => "strength",
        }
    }
}

impl std::str::FromStr for Goal {
    type Err = ParseQuizValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "muscle_gain" => Ok(Self::MuscleGain),
            "fat_loss" => Ok(Self::FatLoss),
            "strength" => Ok(Self::Strength),
            other => Err(ParseQuizValueError {
                field: "goal",
                value: other.to_string(),
            }),
        }
    }
}

/// Dietary preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diet {
    #[default]
    Normal,
    Vegan,
    LactoseFree,
}

impl Diet {
    /// Wire representation, also used for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Vegan => "vegan",
            Self::LactoseFree => "lactose_free",
        }
    }
}

impl std::str::FromStr for Diet {
    type Err = ParseQuizValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "vegan" => Ok(Self::Vegan),
            "lactose_free" => Ok(Self::LactoseFree),
            other => Err(ParseQuizValueError {
                field: "diet",
                value: other.to_string(),
            }),
        }
    }
}

/// Budget band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Budget {
    Low,
    #[default]
    Medium,
    High,
}

impl Budget {
    /// Wire representation, also used for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for Budget {
    type Err = ParseQuizValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParseQuizValueError {
                field: "budget",
                value: other.to_string(),
            }),
        }
    }
}

/// The goal/diet/budget triple sent to the recommendation endpoint.
///
/// Defaults match the quiz's initial selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecommendationQuery {
    pub goal: Goal,
    pub diet: Diet,
    pub budget: Budget,
}

impl RecommendationQuery {
    /// Create a query from explicit selections.
    #[must_use]
    pub const fn new(goal: Goal, diet: Diet, budget: Budget) -> Self {
        Self { goal, diet, budget }
    }
}
