use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Quoted side of a price. Turkish feeds call these "alış" (buy) and "satış" (sell).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Buy,
    Sell,
}

impl Display for PriceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field = match self {
            PriceField::Buy => "buy",
            PriceField::Sell => "sell",
        };
        write!(f, "{}", field)
    }
}

impl FromStr for PriceField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "buy" | "alis" | "alış" => Ok(PriceField::Buy),
            "sell" | "satis" | "satış" => Ok(PriceField::Sell),
            other => Err(format!("Unsupported price field: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turkish_aliases_are_accepted() {
        assert_eq!("Alış".parse::<PriceField>().unwrap(), PriceField::Buy);
        assert_eq!("satis".parse::<PriceField>().unwrap(), PriceField::Sell);
        assert!("mid".parse::<PriceField>().is_err());
    }
}
