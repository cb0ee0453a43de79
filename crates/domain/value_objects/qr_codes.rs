use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    entities::{
        customers::CustomerEntity, point_transactions::PointTransactionEntity,
        qr_codes::QrCodeEntity,
    },
    value_objects::enums::{qr_kinds::QrKind, qr_statuses::QrStatus},
};

pub const QR_TOKEN_LENGTH: usize = 24;
pub const MAX_BULK_COUNT: u32 = 500;

pub fn random_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

pub fn generate_qr_token() -> String {
    random_token(QR_TOKEN_LENGTH)
}

/// Money spent in one category during a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmountLine {
    pub category_id: Uuid,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueQrModel {
    pub points: Option<i64>,
    pub breakdown: Option<Vec<AmountLine>>,
    pub kind: Option<QrKind>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueBulkQrModel {
    pub count: u32,
    pub points: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueEarnQrModel {
    pub breakdown: Vec<AmountLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSpendQrModel {
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseQrModel {
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QrCodeFilter {
    pub status: Option<QrStatus>,
    pub kind: Option<QrKind>,
    pub batch_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QrCodeDto {
    pub id: Uuid,
    pub token: String,
    pub kind: String,
    pub origin: String,
    pub points: i64,
    pub breakdown: Option<serde_json::Value>,
    pub status: String,
    pub batch_id: Option<Uuid>,
    pub owner_customer_id: Option<Uuid>,
    pub redeemed_by: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<QrCodeEntity> for QrCodeDto {
    fn from(value: QrCodeEntity) -> Self {
        Self {
            id: value.id,
            token: value.token,
            kind: value.kind,
            origin: value.origin,
            points: value.points,
            breakdown: value.breakdown,
            status: value.status,
            batch_id: value.batch_id,
            owner_customer_id: value.owner_customer_id,
            redeemed_by: value.redeemed_by,
            expires_at: value.expires_at,
            used_at: value.used_at,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QrBatchDto {
    pub batch_id: Uuid,
    pub codes: Vec<QrCodeDto>,
}

/// Outcome of a successful scan.
#[derive(Debug, Clone)]
pub struct RedeemedQr {
    pub qr_code: QrCodeEntity,
    pub customer: CustomerEntity,
    pub transaction: PointTransactionEntity,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedeemedQrDto {
    pub qr_code_id: Uuid,
    pub kind: String,
    pub points: i64,
    pub customer_id: Uuid,
    pub balance: i64,
}

impl From<RedeemedQr> for RedeemedQrDto {
    fn from(value: RedeemedQr) -> Self {
        Self {
            qr_code_id: value.qr_code.id,
            kind: value.qr_code.kind,
            points: value.transaction.points,
            customer_id: value.customer.id,
            balance: value.transaction.balance_after,
        }
    }
}

#[derive(Debug, Error)]
pub enum QrRedeemError {
    #[error("QR code not found")]
    NotFound,
    #[error("QR code has expired")]
    Expired,
    #[error("QR code has already been used")]
    AlreadyUsed,
    #[error("QR code is a {0} code")]
    WrongKind(String),
    #[error("QR code has no owner")]
    MissingOwner,
    #[error("insufficient points: balance {balance}, required {required}")]
    InsufficientPoints { balance: i64, required: i64 },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Checks that a code can be consumed as `expected` at `now`.
pub fn ensure_redeemable(
    qr_code: &QrCodeEntity,
    expected: QrKind,
    now: DateTime<Utc>,
) -> Result<(), QrRedeemError> {
    if qr_code.kind != expected.to_string() {
        return Err(QrRedeemError::WrongKind(qr_code.kind.clone()));
    }

    match qr_code.status.parse::<QrStatus>() {
        Ok(QrStatus::Used) => return Err(QrRedeemError::AlreadyUsed),
        Ok(QrStatus::Expired) => return Err(QrRedeemError::Expired),
        Ok(QrStatus::Unused) => {}
        Err(err) => return Err(QrRedeemError::Internal(anyhow::anyhow!(err))),
    }

    if qr_code.expires_at <= now {
        return Err(QrRedeemError::Expired);
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreakdownError {
    #[error("breakdown must not be empty")]
    Empty,
    #[error("amount for category {0} must be a positive number")]
    InvalidAmount(Uuid),
    #[error("unknown category {0}")]
    UnknownCategory(Uuid),
    #[error("purchase does not earn any points")]
    NoPoints,
    #[error("purchase earns too many points")]
    TooManyPoints,
}

/// Upper bound for the points carried by a single code.
pub const MAX_QR_POINTS: i64 = 1_000_000_000;

/// Σ floor(amount × points_rate) over the lines, using the rate of each line's category.
pub fn points_for_breakdown(
    lines: &[AmountLine],
    rates: &HashMap<Uuid, f64>,
) -> Result<i64, BreakdownError> {
    if lines.is_empty() {
        return Err(BreakdownError::Empty);
    }

    let mut total = 0i64;
    for line in lines {
        if !line.amount.is_finite() || line.amount <= 0.0 {
            return Err(BreakdownError::InvalidAmount(line.category_id));
        }
        let rate = rates
            .get(&line.category_id)
            .ok_or(BreakdownError::UnknownCategory(line.category_id))?;
        let points = (line.amount * rate).floor();
        if !points.is_finite() || points > MAX_QR_POINTS as f64 {
            return Err(BreakdownError::TooManyPoints);
        }
        total = total
            .checked_add(points as i64)
            .filter(|total| *total <= MAX_QR_POINTS)
            .ok_or(BreakdownError::TooManyPoints)?;
    }

    if total <= 0 {
        return Err(BreakdownError::NoPoints);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn qr_code(kind: &str, status: &str, expires_at: DateTime<Utc>) -> QrCodeEntity {
        QrCodeEntity {
            id: Uuid::new_v4(),
            token: generate_qr_token(),
            kind: kind.to_string(),
            origin: "single".to_string(),
            points: 100,
            breakdown: None,
            status: status.to_string(),
            batch_id: None,
            owner_customer_id: None,
            redeemed_by: None,
            expires_at,
            used_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn tokens_have_fixed_length() {
        let token = generate_qr_token();
        assert_eq!(token.len(), QR_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_qr_token());
    }

    #[test]
    fn unused_and_unexpired_code_is_redeemable() {
        let now = Utc::now();
        let code = qr_code("earn", "unused", now + Duration::minutes(5));
        assert!(ensure_redeemable(&code, QrKind::Earn, now).is_ok());
    }

    #[test]
    fn redeem_checks_reject_bad_codes() {
        let now = Utc::now();

        let spend = qr_code("spend", "unused", now + Duration::minutes(5));
        assert!(matches!(
            ensure_redeemable(&spend, QrKind::Earn, now),
            Err(QrRedeemError::WrongKind(kind)) if kind == "spend"
        ));

        let used = qr_code("earn", "used", now + Duration::minutes(5));
        assert!(matches!(
            ensure_redeemable(&used, QrKind::Earn, now),
            Err(QrRedeemError::AlreadyUsed)
        ));

        let swept = qr_code("earn", "expired", now + Duration::minutes(5));
        assert!(matches!(
            ensure_redeemable(&swept, QrKind::Earn, now),
            Err(QrRedeemError::Expired)
        ));

        let stale = qr_code("earn", "unused", now);
        assert!(matches!(
            ensure_redeemable(&stale, QrKind::Earn, now),
            Err(QrRedeemError::Expired)
        ));
    }

    #[test]
    fn breakdown_points_are_floored_per_line() {
        let rings = Uuid::new_v4();
        let coins = Uuid::new_v4();
        let rates = HashMap::from([(rings, 0.05), (coins, 0.01)]);

        let lines = vec![
            AmountLine {
                category_id: rings,
                amount: 1999.0,
            },
            AmountLine {
                category_id: coins,
                amount: 450.0,
            },
        ];

        // floor(99.95) + floor(4.5)
        assert_eq!(points_for_breakdown(&lines, &rates), Ok(103));
    }

    #[test]
    fn breakdown_rejects_unknown_categories_and_zero_totals() {
        let rings = Uuid::new_v4();
        let unknown = Uuid::new_v4();
        let rates = HashMap::from([(rings, 0.001)]);

        assert_eq!(
            points_for_breakdown(
                &[AmountLine {
                    category_id: unknown,
                    amount: 10.0
                }],
                &rates
            ),
            Err(BreakdownError::UnknownCategory(unknown))
        );
        assert_eq!(
            points_for_breakdown(
                &[AmountLine {
                    category_id: rings,
                    amount: 10.0
                }],
                &rates
            ),
            Err(BreakdownError::NoPoints)
        );
        assert_eq!(points_for_breakdown(&[], &rates), Err(BreakdownError::Empty));
        assert_eq!(
            points_for_breakdown(
                &[AmountLine {
                    category_id: rings,
                    amount: -1.0
                }],
                &rates
            ),
            Err(BreakdownError::InvalidAmount(rings))
        );
    }

    #[test]
    fn breakdown_rejects_totals_past_the_cap() {
        let rings = Uuid::new_v4();
        let rates = HashMap::from([(rings, 1.0)]);
        let huge = AmountLine {
            category_id: rings,
            amount: 1e19,
        };

        assert_eq!(
            points_for_breakdown(&[huge, huge], &rates),
            Err(BreakdownError::TooManyPoints)
        );
        assert_eq!(
            points_for_breakdown(&[huge], &rates),
            Err(BreakdownError::TooManyPoints)
        );

        let half = AmountLine {
            category_id: rings,
            amount: (MAX_QR_POINTS / 2 + 1) as f64,
        };
        assert_eq!(
            points_for_breakdown(&[half, half], &rates),
            Err(BreakdownError::TooManyPoints)
        );
    }
}
