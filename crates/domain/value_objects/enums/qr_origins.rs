use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QrOrigin {
    Single,
    Bulk,
    Purchase,
    Customer,
}

impl Display for QrOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let origin = match self {
            QrOrigin::Single => "single",
            QrOrigin::Bulk => "bulk",
            QrOrigin::Purchase => "purchase",
            QrOrigin::Customer => "customer",
        };
        write!(f, "{}", origin)
    }
}
