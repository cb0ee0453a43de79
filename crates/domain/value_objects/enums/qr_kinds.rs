use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Earn codes credit the scanning customer; spend codes debit their owner.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QrKind {
    #[default]
    Earn,
    Spend,
}

impl Display for QrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            QrKind::Earn => "earn",
            QrKind::Spend => "spend",
        };
        write!(f, "{}", kind)
    }
}

impl FromStr for QrKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "earn" => Ok(QrKind::Earn),
            "spend" => Ok(QrKind::Spend),
            other => Err(format!("Unsupported QR kind: {}", other)),
        }
    }
}
