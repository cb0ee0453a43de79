use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// `Used` and `Expired` are terminal.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QrStatus {
    #[default]
    Unused,
    Used,
    Expired,
}

impl Display for QrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            QrStatus::Unused => "unused",
            QrStatus::Used => "used",
            QrStatus::Expired => "expired",
        };
        write!(f, "{}", status)
    }
}

impl FromStr for QrStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "unused" => Ok(QrStatus::Unused),
            "used" => Ok(QrStatus::Used),
            "expired" => Ok(QrStatus::Expired),
            other => Err(format!("Unsupported QR status: {}", other)),
        }
    }
}
