use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
}

impl Display for AlertCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let condition = match self {
            AlertCondition::Above => "above",
            AlertCondition::Below => "below",
        };
        write!(f, "{}", condition)
    }
}

impl FromStr for AlertCondition {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "above" => Ok(AlertCondition::Above),
            "below" => Ok(AlertCondition::Below),
            other => Err(format!("Unsupported alert condition: {}", other)),
        }
    }
}

impl AlertCondition {
    pub fn is_met(&self, value: f64, target: f64) -> bool {
        match self {
            AlertCondition::Above => value >= target,
            AlertCondition::Below => value <= target,
        }
    }
}
