use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{customers::CustomerEntity, point_transactions::PointTransactionEntity},
    value_objects::qr_codes::random_token,
};

pub const QR_IDENTIFIER_LENGTH: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthCustomerModel {
    pub phone: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerDto {
    pub id: Uuid,
    pub phone: String,
    pub name: Option<String>,
    pub qr_identifier: String,
    pub points_earned: i64,
    pub points_spent: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<CustomerEntity> for CustomerDto {
    fn from(value: CustomerEntity) -> Self {
        let balance = value.balance();
        Self {
            id: value.id,
            phone: value.phone,
            name: value.name,
            qr_identifier: value.qr_identifier,
            points_earned: value.points_earned,
            points_spent: value.points_spent,
            balance,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerAuthDto {
    pub token: String,
    pub customer: CustomerDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointTransactionDto {
    pub id: Uuid,
    pub qr_code_id: Uuid,
    pub kind: String,
    pub points: i64,
    pub balance_after: i64,
    pub created_at: DateTime<Utc>,
}

impl From<PointTransactionEntity> for PointTransactionDto {
    fn from(value: PointTransactionEntity) -> Self {
        Self {
            id: value.id,
            qr_code_id: value.qr_code_id,
            kind: value.kind,
            points: value.points,
            balance_after: value.balance_after,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    /// `(limit, offset)` clamped to sane bounds.
    pub fn bounds(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

/// Turkish local formats (`05xx...`, `5xx...`) gain the `90` country code.
/// The result is `+` followed by 10 to 15 digits.
pub fn normalize_phone(raw: &str) -> Result<String, String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let digits = if digits.len() == 11 && digits.starts_with('0') {
        format!("90{}", &digits[1..])
    } else if digits.len() == 10 && !digits.starts_with('0') {
        format!("90{}", digits)
    } else {
        digits
    };

    if !(10..=15).contains(&digits.len()) {
        return Err(format!("Invalid phone number: {}", raw.trim()));
    }

    Ok(format!("+{}", digits))
}

pub fn generate_qr_identifier() -> String {
    random_token(QR_IDENTIFIER_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_formats_gain_country_code() {
        assert_eq!(normalize_phone("0532 123 45 67").unwrap(), "+905321234567");
        assert_eq!(normalize_phone("5321234567").unwrap(), "+905321234567");
        assert_eq!(normalize_phone("+90 (532) 123-4567").unwrap(), "+905321234567");
    }

    #[test]
    fn international_numbers_are_kept() {
        assert_eq!(normalize_phone("+44 7911 123456").unwrap(), "+447911123456");
    }

    #[test]
    fn too_short_or_long_numbers_are_rejected() {
        assert!(normalize_phone("12345").is_err());
        assert!(normalize_phone("").is_err());
        assert!(normalize_phone("1234567890123456").is_err());
    }

    #[test]
    fn page_bounds_are_clamped() {
        let page = PageQuery {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(page.bounds(), (PageQuery::MAX_LIMIT, 0));

        let default = PageQuery {
            limit: None,
            offset: None,
        };
        assert_eq!(default.bounds(), (PageQuery::DEFAULT_LIMIT, 0));
    }

    #[test]
    fn qr_identifiers_are_alphanumeric() {
        let identifier = generate_qr_identifier();
        assert_eq!(identifier.len(), QR_IDENTIFIER_LENGTH);
        assert!(identifier.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
