use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Which upstream table a source entry came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PriceSourceKind {
    Primary,
    Fallback,
}

impl Display for PriceSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            PriceSourceKind::Primary => "primary",
            PriceSourceKind::Fallback => "fallback",
        };
        write!(f, "{}", kind)
    }
}

impl FromStr for PriceSourceKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "primary" => Ok(PriceSourceKind::Primary),
            "fallback" | "secondary" => Ok(PriceSourceKind::Fallback),
            other => Err(format!("Unsupported price source: {}", other)),
        }
    }
}
