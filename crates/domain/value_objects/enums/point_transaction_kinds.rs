use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PointTransactionKind {
    Earn,
    Spend,
}

impl Display for PointTransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            PointTransactionKind::Earn => "earn",
            PointTransactionKind::Spend => "spend",
        };
        write!(f, "{}", kind)
    }
}
