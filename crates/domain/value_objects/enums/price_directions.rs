use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceDirection {
    Up,
    Down,
    #[default]
    Same,
}

impl Display for PriceDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let direction = match self {
            PriceDirection::Up => "up",
            PriceDirection::Down => "down",
            PriceDirection::Same => "same",
        };
        write!(f, "{}", direction)
    }
}

impl PriceDirection {
    pub fn from_str(value: &str) -> Self {
        match value {
            "up" => PriceDirection::Up,
            "down" => PriceDirection::Down,
            _ => PriceDirection::Same,
        }
    }

    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            PriceDirection::Up
        } else if current < previous {
            PriceDirection::Down
        } else {
            PriceDirection::Same
        }
    }
}
